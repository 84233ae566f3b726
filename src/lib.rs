//! # Metis - Deep Deterministic Policy Gradient in Rust
//!
//! Metis is a self-contained reinforcement learning library for continuous
//! control. It implements DDPG end to end on the CPU: dense networks with
//! hand-rolled backpropagation, an off-policy replay buffer, soft-tracked
//! target networks, and Ornstein-Uhlenbeck exploration noise, all behind a
//! two-call agent API.
//!
//! ## Key Features
//!
//! - **Deterministic actor-critic**: a policy network picks one action per
//!   state and learns through the critic's action gradient
//! - **Target networks**: both actor and critic keep slowly tracked copies
//!   that stabilize the bootstrapped targets
//! - **FIFO replay**: bounded experience store with uniform batch sampling
//! - **Gated training loop**: warm-up, update frequency, and repeat counts
//!   are all driven by a single step counter inside the agent
//! - **Persistence**: bincode checkpoints of every parameter set, with
//!   automatic resume from a training directory
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use metis::agent::DdpgAgentBuilder;
//! use ndarray::array;
//!
//! // An agent for a problem with 3 state inputs and 1 bounded action
//! let mut agent = DdpgAgentBuilder::new(3, 1)
//!     .action_range(-2.0, 2.0)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let state = array![0.0f32, 0.1, -0.2];
//! let action = agent.select_action(state.view(), true).unwrap();
//!
//! // ... apply the action to the environment, observe the outcome ...
//! let next_state = array![0.05f32, 0.12, -0.18];
//! agent
//!     .feedback(state.view(), action.view(), 0.5, false, next_state.view())
//!     .unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`] - The DDPG agent and its builder
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layers, activations, and weight initialization
//! - [`metrics`] - Loss tracking and CSV training telemetry
//! - [`network`] - Policy and action-value networks
//! - [`noise`] - Ornstein-Uhlenbeck exploration noise
//! - [`optimizer`] - SGD and Adam optimizers
//! - [`replay_buffer`] - Bounded FIFO experience replay

pub mod agent;
pub mod error;
pub mod layers;
pub mod metrics;
pub mod network;
pub mod noise;
pub mod optimizer;
pub mod replay_buffer;

#[cfg(test)]
mod tests;
