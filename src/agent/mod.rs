//! # Deep Deterministic Policy Gradient Agent
//!
//! This module provides the agent for continuous-control problems. DDPG
//! learns a deterministic policy together with an action-value critic, off
//! policy, from replayed experience.
//!
//! ## Core Concepts
//!
//! - **Deterministic policy**: the actor maps a state straight to one action
//!   vector instead of a distribution over actions
//! - **Policy gradient through the critic**: the actor improves by following
//!   the critic's gradient with respect to the action
//! - **Target networks**: slowly tracked copies of actor and critic keep the
//!   bootstrapped targets stable
//! - **Exploration noise**: a temporally correlated Ornstein-Uhlenbeck
//!   process perturbs actions during training
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use metis::agent::DdpgAgentBuilder;
//! use ndarray::array;
//!
//! let mut agent = DdpgAgentBuilder::new(3, 1)
//!     .action_range(-2.0, 2.0)
//!     .observe(64)
//!     .batch_size(32)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! // Interact with the environment
//! let state = array![0.0f32, 1.0, -0.5];
//! let action = agent.select_action(state.view(), true).unwrap();
//!
//! // After the environment step, hand the outcome back
//! let next_state = array![0.1f32, 0.9, -0.4];
//! agent
//!     .feedback(state.view(), action.view(), 1.0, false, next_state.view())
//!     .unwrap();
//! ```

mod ddpg;
pub use ddpg::{DdpgAgent, DdpgAgentBuilder};
