use std::fs;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{MetisError, Result};
use crate::metrics::{LossRecord, MetricsTracker, TrainingLog};
use crate::network::{PolicyNetwork, QNetwork};
use crate::noise::{OrnsteinUhlenbeck, DEFAULT_MU, DEFAULT_SIGMA, DEFAULT_THETA};
use crate::optimizer::{Adam, OptimizerWrapper};
use crate::replay_buffer::{ReplayBuffer, Transition};

const CHECKPOINT_FILE: &str = "ddpg.ckpt";

/// Deep Deterministic Policy Gradient agent.
///
/// The agent owns everything one training run needs: the live actor and
/// critic, their slowly tracked target copies, the replay buffer, the
/// exploration noise process, and the step counters that gate learning,
/// logging, and checkpointing. Drive it with exactly two calls per
/// environment step: [`select_action`](Self::select_action) to act and
/// [`feedback`](Self::feedback) to hand back the outcome.
///
/// Learning is fully off-policy. Each eligible `feedback` call samples a
/// uniform batch from the replay buffer, bootstraps value targets under the
/// target networks, takes one gradient step on the critic (MSE plus L2) and
/// one on the actor (through the live critic's action gradient), and then
/// moves both targets a fraction `tau` toward their live counterparts.
pub struct DdpgAgent {
    /// Live policy network
    pub actor: PolicyNetwork,
    /// Tracked copy of the policy used for bootstrapped targets
    pub actor_target: PolicyNetwork,
    /// Live action-value network
    pub critic: QNetwork,
    /// Tracked copy of the critic used for bootstrapped targets
    pub critic_target: QNetwork,
    /// Exploration noise process
    pub noise: OrnsteinUhlenbeck,

    replay: ReplayBuffer,
    metrics: MetricsTracker,
    training_log: Option<TrainingLog>,
    rng: StdRng,

    states_dim: usize,
    actions_dim: usize,
    frame_seq_num: usize,
    action_low: f32,
    action_high: f32,
    observe: usize,
    update_frequency: usize,
    train_repeat: usize,
    gamma: f32,
    tau: f32,
    batch_size: usize,
    learn_rate: f32,
    weight_decay: f32,
    log_frequency: usize,
    checkpoint_frequency: usize,
    train_dir: Option<PathBuf>,

    step_counter: usize,
    train_steps: usize,
    checkpoint_failures: usize,
}

impl DdpgAgent {
    /// Start configuring an agent for the given state and action widths.
    pub fn builder(states_dim: usize, actions_dim: usize) -> DdpgAgentBuilder {
        DdpgAgentBuilder::new(states_dim, actions_dim)
    }

    /// Compute an action for `state`.
    ///
    /// With `explore` set, the Ornstein-Uhlenbeck noise is advanced, added
    /// to the actor's output, and the sum is clamped into the configured
    /// action range. Without it the raw actor output is returned unclamped.
    pub fn select_action(&mut self, state: ArrayView1<f32>, explore: bool) -> Result<Array1<f32>> {
        self.check_dim("state", state, self.state_size())?;
        let mut action = self.actor.forward(state);
        if explore {
            let low = self.action_low;
            let high = self.action_high;
            let noise = self.noise.sample(&mut self.rng);
            action.zip_mut_with(&noise, |a, &n| *a = (*a + n).clamp(low, high));
        }
        Ok(action)
    }

    /// Record one environment step and run any learning it triggers.
    ///
    /// The transition is always stored. Once more than `observe` steps have
    /// been seen, a full batch is buffered, and the step counter divides
    /// `update_frequency`, the agent runs `train_repeat` learning
    /// iterations. Logging and checkpointing fire on their own counter
    /// cadences. The batch condition only matters after a resume, when the
    /// counter is past the warm-up but the buffer starts empty.
    pub fn feedback(
        &mut self,
        state: ArrayView1<f32>,
        action: ArrayView1<f32>,
        reward: f32,
        terminal: bool,
        next_state: ArrayView1<f32>,
    ) -> Result<()> {
        self.check_dim("state", state, self.state_size())?;
        self.check_dim("action", action, self.actions_dim)?;
        self.check_dim("next_state", next_state, self.state_size())?;

        self.step_counter += 1;
        self.replay.push(Transition {
            state: state.to_owned(),
            action: action.to_owned(),
            reward,
            terminal,
            next_state: next_state.to_owned(),
        });

        let mut latest_losses = None;
        if self.step_counter > self.observe
            && self.replay.len() >= self.batch_size
            && self.step_counter % self.update_frequency == 0
        {
            for _ in 0..self.train_repeat {
                latest_losses = Some(self.learn()?);
            }
        }

        if self.step_counter % self.log_frequency == 0 {
            if let Some((actor_loss, critic_loss)) = latest_losses {
                let record = LossRecord {
                    step: self.step_counter,
                    actor_loss,
                    critic_loss,
                };
                self.metrics.record(record);
                if let Some(log) = self.training_log.as_mut() {
                    // Telemetry is advisory; training continues on failure.
                    let _ = log.log(&record);
                }
            }
        }

        if self.step_counter % self.checkpoint_frequency == 0 {
            if let Some(dir) = self.train_dir.clone() {
                if self.save(&Self::checkpoint_file(&dir)).is_err() {
                    self.checkpoint_failures += 1;
                }
            }
        }

        Ok(())
    }

    /// One learning iteration: critic step, actor step, target tracking.
    fn learn(&mut self) -> Result<(f32, f32)> {
        let n = self.batch_size;
        let mut states = Array2::zeros((n, self.state_size()));
        let mut actions = Array2::zeros((n, self.actions_dim));
        let mut next_states = Array2::zeros((n, self.state_size()));
        let mut rewards = Vec::with_capacity(n);
        let mut terminals = Vec::with_capacity(n);
        {
            let batch = self.replay.sample(&mut self.rng, n)?;
            for (i, transition) in batch.iter().enumerate() {
                states.row_mut(i).assign(&transition.state);
                actions.row_mut(i).assign(&transition.action);
                next_states.row_mut(i).assign(&transition.next_state);
                rewards.push(transition.reward);
                terminals.push(transition.terminal);
            }
        }

        // Targets come from the tracked parameter sets as they stand before
        // this iteration's updates.
        let target_q = self.bootstrapped_targets(&rewards, &terminals, &next_states);

        // Critic regression toward the bootstrapped targets.
        let q_pred = self.critic.forward_batch(states.view(), actions.view());
        let td = &q_pred - &target_q;
        let critic_loss = td.mapv(|e| e * e).mean().unwrap_or(f32::INFINITY)
            + self.critic.l2_penalty(self.weight_decay);
        if !critic_loss.is_finite() {
            return Err(self.divergence("critic", critic_loss));
        }
        let value_errors = td.mapv(|e| 2.0 * e / n as f32);
        let critic_grads = self.critic.backward_batch(value_errors.view());
        self.critic
            .apply_gradients(critic_grads, self.weight_decay, self.learn_rate);
        self.critic_target.track(&self.critic, self.tau);

        // Actor ascends the live critic's estimate of its own actions. The
        // critic pass here only supplies the action gradient; its parameter
        // gradients are dropped.
        let live_actions = self.actor.forward_batch(states.view());
        let q_live = self
            .critic
            .forward_batch(states.view(), live_actions.view());
        let actor_loss =
            -q_live.mean().unwrap_or(f32::NEG_INFINITY) + self.actor.l2_penalty(self.weight_decay);
        if !actor_loss.is_finite() {
            return Err(self.divergence("actor", actor_loss));
        }
        let value_errors = Array1::from_elem(n, -1.0 / n as f32);
        let through_critic = self.critic.backward_batch(value_errors.view());
        let actor_grads = self.actor.backward_batch(through_critic.action_errors.view());
        self.actor
            .apply_gradients(actor_grads, self.weight_decay, self.learn_rate);
        self.actor_target.track(&self.actor, self.tau);

        self.train_steps += 1;
        Ok((actor_loss, critic_loss))
    }

    /// Bootstrapped value targets, computed entirely under the target
    /// parameter sets. Terminal transitions take the raw reward.
    pub(crate) fn bootstrapped_targets(
        &mut self,
        rewards: &[f32],
        terminals: &[bool],
        next_states: &Array2<f32>,
    ) -> Array1<f32> {
        let next_actions = self.actor_target.forward_batch(next_states.view());
        let next_q = self
            .critic_target
            .forward_batch(next_states.view(), next_actions.view());
        let mut targets = Array1::zeros(rewards.len());
        for i in 0..rewards.len() {
            targets[i] = if terminals[i] {
                rewards[i]
            } else {
                rewards[i] + self.gamma * next_q[i]
            };
        }
        targets
    }

    /// Reset the exploration noise state, typically at an episode boundary.
    pub fn reset_noise(&mut self) {
        self.noise.reset();
    }

    /// Write a checkpoint holding the four parameter sets and step counters.
    pub fn save(&self, path: &Path) -> Result<()> {
        let checkpoint = CheckpointRef {
            actor: &self.actor,
            actor_target: &self.actor_target,
            critic: &self.critic,
            critic_target: &self.critic_target,
            step_counter: self.step_counter,
            train_steps: self.train_steps,
        };
        let serialized = bincode::serialize(&checkpoint)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// Replace this agent's parameter sets and counters from a checkpoint.
    ///
    /// The checkpoint's layer shapes must agree with this agent's
    /// configuration; replay contents and noise state are not part of a
    /// checkpoint and are left untouched.
    pub fn restore(&mut self, path: &Path) -> Result<()> {
        let data = fs::read(path)?;
        let checkpoint: Checkpoint = bincode::deserialize(&data)?;
        let compatible = policy_shapes_match(&self.actor, &checkpoint.actor)
            && policy_shapes_match(&self.actor_target, &checkpoint.actor_target)
            && q_shapes_match(&self.critic, &checkpoint.critic)
            && q_shapes_match(&self.critic_target, &checkpoint.critic_target);
        if !compatible {
            return Err(MetisError::shape_mismatch(
                format!(
                    "networks sized for {} state and {} action inputs",
                    self.state_size(),
                    self.actions_dim
                ),
                "checkpoint with different layer shapes".to_string(),
            ));
        }
        self.actor = checkpoint.actor;
        self.actor_target = checkpoint.actor_target;
        self.critic = checkpoint.critic;
        self.critic_target = checkpoint.critic_target;
        self.step_counter = checkpoint.step_counter;
        self.train_steps = checkpoint.train_steps;
        Ok(())
    }

    /// Path of the checkpoint inside a training directory.
    pub fn checkpoint_file(train_dir: &Path) -> PathBuf {
        train_dir.join(CHECKPOINT_FILE)
    }

    /// Environment steps seen so far.
    pub fn step_counter(&self) -> usize {
        self.step_counter
    }

    /// Learning iterations performed so far.
    pub fn train_steps(&self) -> usize {
        self.train_steps
    }

    /// Checkpoint writes that failed and were skipped.
    pub fn checkpoint_failures(&self) -> usize {
        self.checkpoint_failures
    }

    /// Width of the flattened state input (`states_dim * frame_seq_num`).
    pub fn state_size(&self) -> usize {
        self.states_dim * self.frame_seq_num
    }

    pub fn action_range(&self) -> (f32, f32) {
        (self.action_low, self.action_high)
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    pub fn tau(&self) -> f32 {
        self.tau
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn observe(&self) -> usize {
        self.observe
    }

    pub fn replay(&self) -> &ReplayBuffer {
        &self.replay
    }

    pub fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }

    fn check_dim(&self, name: &str, vector: ArrayView1<f32>, expected: usize) -> Result<()> {
        if vector.len() != expected {
            return Err(MetisError::shape_mismatch(
                format!("{} of length {}", name, expected),
                format!("length {}", vector.len()),
            ));
        }
        Ok(())
    }

    fn divergence(&self, network: &str, loss: f32) -> MetisError {
        MetisError::NumericalInstability(format!(
            "{} loss became {} at step {}",
            network, loss, self.step_counter
        ))
    }
}

fn policy_shapes_match(a: &PolicyNetwork, b: &PolicyNetwork) -> bool {
    a.layers.len() == b.layers.len()
        && a.layers
            .iter()
            .zip(&b.layers)
            .all(|(x, y)| x.weights.dim() == y.weights.dim())
}

fn q_shapes_match(a: &QNetwork, b: &QNetwork) -> bool {
    a.state_layers.len() == b.state_layers.len()
        && a.merge_layers.len() == b.merge_layers.len()
        && a.state_layers
            .iter()
            .chain(&a.merge_layers)
            .zip(b.state_layers.iter().chain(&b.merge_layers))
            .all(|(x, y)| x.weights.dim() == y.weights.dim())
}

#[derive(Serialize)]
struct CheckpointRef<'a> {
    actor: &'a PolicyNetwork,
    actor_target: &'a PolicyNetwork,
    critic: &'a QNetwork,
    critic_target: &'a QNetwork,
    step_counter: usize,
    train_steps: usize,
}

#[derive(Deserialize)]
struct Checkpoint {
    actor: PolicyNetwork,
    actor_target: PolicyNetwork,
    critic: QNetwork,
    critic_target: QNetwork,
    step_counter: usize,
    train_steps: usize,
}

/// Builder for [`DdpgAgent`].
///
/// Every option has a default; only the state and action widths are
/// required. `build` validates the whole configuration before any network
/// is allocated.
pub struct DdpgAgentBuilder {
    states_dim: usize,
    actions_dim: usize,
    frame_seq_num: usize,
    hidden_size: usize,
    action_low: f32,
    action_high: f32,
    observe: usize,
    replay_memory: usize,
    update_frequency: usize,
    train_repeat: usize,
    gamma: f32,
    tau: f32,
    batch_size: usize,
    learn_rate: f32,
    weight_decay: f32,
    noise_mu: f32,
    noise_theta: f32,
    noise_sigma: f32,
    log_frequency: usize,
    checkpoint_frequency: usize,
    metrics_history: usize,
    train_dir: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    seed: Option<u64>,
    optimizer: OptimizerWrapper,
}

impl DdpgAgentBuilder {
    pub fn new(states_dim: usize, actions_dim: usize) -> Self {
        DdpgAgentBuilder {
            states_dim,
            actions_dim,
            frame_seq_num: 1,
            hidden_size: 512,
            action_low: -1.0,
            action_high: 1.0,
            observe: 1000,
            replay_memory: 50_000,
            update_frequency: 1,
            train_repeat: 1,
            gamma: 0.99,
            tau: 0.001,
            batch_size: 64,
            learn_rate: 1e-3,
            weight_decay: 0.01,
            noise_mu: DEFAULT_MU,
            noise_theta: DEFAULT_THETA,
            noise_sigma: DEFAULT_SIGMA,
            log_frequency: 1000,
            checkpoint_frequency: 30_000,
            metrics_history: 1000,
            train_dir: None,
            log_dir: None,
            seed: None,
            optimizer: OptimizerWrapper::Adam(Adam::default()),
        }
    }

    /// Number of consecutive frames concatenated into one state input.
    pub fn frame_seq_num(mut self, frames: usize) -> Self {
        self.frame_seq_num = frames;
        self
    }

    /// Width of the two hidden layers in every network.
    pub fn hidden_size(mut self, size: usize) -> Self {
        self.hidden_size = size;
        self
    }

    /// Inclusive bounds actions are clamped into while exploring.
    pub fn action_range(mut self, low: f32, high: f32) -> Self {
        self.action_low = low;
        self.action_high = high;
        self
    }

    /// Number of warm-up steps before any learning happens.
    pub fn observe(mut self, steps: usize) -> Self {
        self.observe = steps;
        self
    }

    /// Replay buffer capacity.
    pub fn replay_memory(mut self, capacity: usize) -> Self {
        self.replay_memory = capacity;
        self
    }

    /// Learn only on steps divisible by this frequency.
    pub fn update_frequency(mut self, frequency: usize) -> Self {
        self.update_frequency = frequency;
        self
    }

    /// Learning iterations per eligible step.
    pub fn train_repeat(mut self, repeat: usize) -> Self {
        self.train_repeat = repeat;
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Target tracking rate.
    pub fn tau(mut self, tau: f32) -> Self {
        self.tau = tau;
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn learn_rate(mut self, rate: f32) -> Self {
        self.learn_rate = rate;
        self
    }

    /// L2 penalty coefficient applied to every weight matrix.
    pub fn weight_decay(mut self, decay: f32) -> Self {
        self.weight_decay = decay;
        self
    }

    /// Ornstein-Uhlenbeck parameters for the exploration noise.
    pub fn noise_params(mut self, mu: f32, theta: f32, sigma: f32) -> Self {
        self.noise_mu = mu;
        self.noise_theta = theta;
        self.noise_sigma = sigma;
        self
    }

    /// Record losses every this many steps.
    pub fn log_frequency(mut self, frequency: usize) -> Self {
        self.log_frequency = frequency;
        self
    }

    /// Checkpoint every this many steps (requires a train dir).
    pub fn checkpoint_frequency(mut self, frequency: usize) -> Self {
        self.checkpoint_frequency = frequency;
        self
    }

    /// How many loss records the in-memory tracker retains.
    pub fn metrics_history(mut self, size: usize) -> Self {
        self.metrics_history = size;
        self
    }

    /// Directory checkpoints are written to and restored from.
    pub fn train_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.train_dir = Some(dir.into());
        self
    }

    /// Directory the CSV training log is written under.
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Seed for all randomness: weight init, noise, and batch sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn optimizer(mut self, optimizer: OptimizerWrapper) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn build(self) -> Result<DdpgAgent> {
        self.validate()?;

        let DdpgAgentBuilder {
            states_dim,
            actions_dim,
            frame_seq_num,
            hidden_size,
            action_low,
            action_high,
            observe,
            replay_memory,
            update_frequency,
            train_repeat,
            gamma,
            tau,
            batch_size,
            learn_rate,
            weight_decay,
            noise_mu,
            noise_theta,
            noise_sigma,
            log_frequency,
            checkpoint_frequency,
            metrics_history,
            train_dir,
            log_dir,
            seed,
            optimizer,
        } = self;

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let state_size = states_dim * frame_seq_num;
        let actor = PolicyNetwork::new(
            state_size,
            actions_dim,
            hidden_size,
            optimizer.clone(),
            &mut rng,
        );
        let actor_target = actor.clone();
        let critic = QNetwork::new(state_size, actions_dim, hidden_size, optimizer, &mut rng);
        let critic_target = critic.clone();

        let training_log = match &log_dir {
            Some(dir) => Some(TrainingLog::new(dir, "ddpg")?),
            None => None,
        };
        if let Some(dir) = &train_dir {
            fs::create_dir_all(dir)?;
        }

        let mut agent = DdpgAgent {
            actor,
            actor_target,
            critic,
            critic_target,
            noise: OrnsteinUhlenbeck::with_params(actions_dim, noise_mu, noise_theta, noise_sigma),
            replay: ReplayBuffer::new(replay_memory),
            metrics: MetricsTracker::new(metrics_history),
            training_log,
            rng,
            states_dim,
            actions_dim,
            frame_seq_num,
            action_low,
            action_high,
            observe,
            update_frequency,
            train_repeat,
            gamma,
            tau,
            batch_size,
            learn_rate,
            weight_decay,
            log_frequency,
            checkpoint_frequency,
            train_dir,
            step_counter: 0,
            train_steps: 0,
            checkpoint_failures: 0,
        };

        // Resume from an existing checkpoint; a missing file is a fresh run.
        if let Some(dir) = agent.train_dir.clone() {
            let path = DdpgAgent::checkpoint_file(&dir);
            if path.exists() {
                agent.restore(&path)?;
            }
        }

        Ok(agent)
    }

    fn validate(&self) -> Result<()> {
        let positive: [(&str, usize); 9] = [
            ("states_dim", self.states_dim),
            ("actions_dim", self.actions_dim),
            ("frame_seq_num", self.frame_seq_num),
            ("hidden_size", self.hidden_size),
            ("replay_memory", self.replay_memory),
            ("update_frequency", self.update_frequency),
            ("train_repeat", self.train_repeat),
            ("log_frequency", self.log_frequency),
            ("checkpoint_frequency", self.checkpoint_frequency),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(MetisError::configuration(name, "must be greater than 0"));
            }
        }
        if self.metrics_history == 0 {
            return Err(MetisError::configuration(
                "metrics_history",
                "must be greater than 0",
            ));
        }
        if self.batch_size == 0 {
            return Err(MetisError::configuration(
                "batch_size",
                "must be greater than 0",
            ));
        }
        if self.batch_size > self.replay_memory {
            return Err(MetisError::configuration(
                "batch_size",
                "cannot exceed the replay memory capacity",
            ));
        }
        if self.observe < self.batch_size {
            return Err(MetisError::configuration(
                "observe",
                "warm-up must cover at least one batch (observe >= batch_size)",
            ));
        }
        if !(self.action_low.is_finite()
            && self.action_high.is_finite()
            && self.action_low < self.action_high)
        {
            return Err(MetisError::configuration(
                "action_range",
                "low bound must be finite and strictly less than the high bound",
            ));
        }
        if !(self.gamma.is_finite() && (0.0..=1.0).contains(&self.gamma)) {
            return Err(MetisError::configuration("gamma", "must lie in [0, 1]"));
        }
        if !(self.tau.is_finite() && (0.0..=1.0).contains(&self.tau)) {
            return Err(MetisError::configuration("tau", "must lie in [0, 1]"));
        }
        if !(self.learn_rate.is_finite() && self.learn_rate > 0.0) {
            return Err(MetisError::configuration(
                "learn_rate",
                "must be finite and greater than 0",
            ));
        }
        if !(self.weight_decay.is_finite() && self.weight_decay >= 0.0) {
            return Err(MetisError::configuration(
                "weight_decay",
                "must be finite and non-negative",
            ));
        }
        if !self.noise_mu.is_finite() {
            return Err(MetisError::configuration("noise_mu", "must be finite"));
        }
        if !(self.noise_theta.is_finite() && self.noise_theta >= 0.0) {
            return Err(MetisError::configuration(
                "noise_theta",
                "must be finite and non-negative",
            ));
        }
        if !(self.noise_sigma.is_finite() && self.noise_sigma >= 0.0) {
            return Err(MetisError::configuration(
                "noise_sigma",
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::SGD;
    use ndarray::array;

    #[test]
    fn builder_applies_defaults() {
        let agent = DdpgAgentBuilder::new(3, 2).seed(1).build().unwrap();
        assert_eq!(agent.state_size(), 3);
        assert_eq!(agent.batch_size(), 64);
        assert_eq!(agent.observe(), 1000);
        assert_eq!(agent.action_range(), (-1.0, 1.0));
        assert_eq!(agent.gamma(), 0.99);
        assert_eq!(agent.tau(), 0.001);
        assert_eq!(agent.step_counter(), 0);
        assert_eq!(agent.replay().capacity(), 50_000);
    }

    #[test]
    fn builder_rejects_empty_action_range() {
        let result = DdpgAgentBuilder::new(3, 1).action_range(1.0, 1.0).build();
        assert!(matches!(
            result,
            Err(MetisError::Configuration { ref name, .. }) if name == "action_range"
        ));
    }

    #[test]
    fn select_action_matches_action_width() {
        let mut agent = DdpgAgentBuilder::new(4, 2)
            .hidden_size(16)
            .optimizer(OptimizerWrapper::SGD(SGD::new()))
            .seed(3)
            .build()
            .unwrap();
        let action = agent
            .select_action(array![0.1f32, -0.2, 0.3, 0.0].view(), false)
            .unwrap();
        assert_eq!(action.len(), 2);
    }

    #[test]
    fn select_action_rejects_wrong_state_width() {
        let mut agent = DdpgAgentBuilder::new(4, 2)
            .hidden_size(16)
            .seed(3)
            .build()
            .unwrap();
        let result = agent.select_action(array![0.1f32, -0.2].view(), false);
        assert!(matches!(result, Err(MetisError::ShapeMismatch { .. })));
    }
}
