//! Pendulum swing-up trained with the DDPG agent.
//!
//! This example demonstrates:
//! - Driving the agent with the two-call `select_action` / `feedback` loop
//! - Exploration noise resets at episode boundaries
//! - Periodic greedy evaluation alongside noisy training
//! - Checkpointing and CSV telemetry through the builder

use std::f32::consts::PI;

use metis::agent::DdpgAgentBuilder;
use metis::error::Result;
use ndarray::{array, Array1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Classic pendulum swing-up task. The state is
/// `[cos(theta), sin(theta), angular_velocity]` and the single action is a
/// torque in `[-2, 2]`.
struct Pendulum {
    theta: f32,
    theta_dot: f32,

    max_speed: f32,
    max_torque: f32,
    dt: f32,
    gravity: f32,
    mass: f32,
    length: f32,

    steps: usize,
    max_steps: usize,
}

impl Pendulum {
    fn new() -> Self {
        Pendulum {
            theta: 0.0,
            theta_dot: 0.0,
            max_speed: 8.0,
            max_torque: 2.0,
            dt: 0.05,
            gravity: 10.0,
            mass: 1.0,
            length: 1.0,
            steps: 0,
            max_steps: 200,
        }
    }

    fn reset(&mut self, rng: &mut StdRng) -> Array1<f32> {
        self.theta = rng.gen_range(-PI..PI);
        self.theta_dot = rng.gen_range(-1.0..1.0);
        self.steps = 0;
        self.state()
    }

    fn state(&self) -> Array1<f32> {
        array![self.theta.cos(), self.theta.sin(), self.theta_dot]
    }

    fn step(&mut self, action: &Array1<f32>) -> (Array1<f32>, f32, bool) {
        let torque = action[0].clamp(-self.max_torque, self.max_torque);

        let cost = angle_normalize(self.theta).powi(2)
            + 0.1 * self.theta_dot.powi(2)
            + 0.001 * torque.powi(2);

        let theta_dot = self.theta_dot
            + (-3.0 * self.gravity / (2.0 * self.length) * self.theta.sin()
                + 3.0 / (self.mass * self.length.powi(2)) * torque)
                * self.dt;
        self.theta_dot = theta_dot.clamp(-self.max_speed, self.max_speed);
        self.theta += self.theta_dot * self.dt;
        self.steps += 1;

        let done = self.steps >= self.max_steps;
        (self.state(), -cost, done)
    }
}

/// Wrap an angle into `[-pi, pi]`.
fn angle_normalize(angle: f32) -> f32 {
    let mut normalized = angle;
    while normalized > PI {
        normalized -= 2.0 * PI;
    }
    while normalized < -PI {
        normalized += 2.0 * PI;
    }
    normalized
}

fn main() -> Result<()> {
    let mut agent = DdpgAgentBuilder::new(3, 1)
        .hidden_size(128)
        .action_range(-2.0, 2.0)
        .observe(1000)
        .batch_size(64)
        .checkpoint_frequency(5000)
        .train_dir("runs/pendulum")
        .log_dir("runs/pendulum")
        .seed(7)
        .build()?;

    let mut env = Pendulum::new();
    let mut env_rng = StdRng::seed_from_u64(2024);

    println!("Training DDPG on the pendulum swing-up task");
    println!("State dim: 3, action dim: 1, torque range: [-2, 2]\n");

    let episodes = 100;
    let mut recent_rewards = Vec::new();

    for episode in 0..episodes {
        let mut state = env.reset(&mut env_rng);
        let mut episode_reward = 0.0;
        agent.reset_noise();

        loop {
            let action = agent.select_action(state.view(), true)?;
            let (next_state, reward, done) = env.step(&action);
            agent.feedback(state.view(), action.view(), reward, done, next_state.view())?;

            episode_reward += reward;
            state = next_state;
            if done {
                break;
            }
        }

        recent_rewards.push(episode_reward);
        if recent_rewards.len() > 10 {
            recent_rewards.remove(0);
        }
        if (episode + 1) % 10 == 0 {
            let avg: f32 = recent_rewards.iter().sum::<f32>() / recent_rewards.len() as f32;
            println!(
                "Episode {:>3}: reward = {:8.2}, avg(10) = {:8.2}, train steps = {}",
                episode + 1,
                episode_reward,
                avg,
                agent.train_steps()
            );
        }

        if (episode + 1) % 20 == 0 {
            let eval = evaluate(&mut agent, &mut env_rng, 5)?;
            println!("  greedy evaluation over 5 episodes: {:.2}", eval);
        }
    }

    if let Some(latest) = agent.metrics().latest() {
        println!(
            "\nFinal losses at step {}: actor = {:.4}, critic = {:.4}",
            latest.step, latest.actor_loss, latest.critic_loss
        );
    }
    agent
        .metrics()
        .save(std::path::Path::new("runs/pendulum/metrics.json"))?;
    println!("Checkpoints and telemetry written under runs/pendulum");

    Ok(())
}

/// Average reward of the greedy policy over `episodes` fresh episodes.
fn evaluate(
    agent: &mut metis::agent::DdpgAgent,
    rng: &mut StdRng,
    episodes: usize,
) -> Result<f32> {
    let mut env = Pendulum::new();
    let mut total = 0.0;

    for _ in 0..episodes {
        let mut state = env.reset(rng);
        loop {
            let action = agent.select_action(state.view(), false)?;
            let (next_state, reward, done) = env.step(&action);
            total += reward;
            state = next_state;
            if done {
                break;
            }
        }
    }
    Ok(total / episodes as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pendulum_state_is_normalized() {
        let mut env = Pendulum::new();
        let mut rng = StdRng::seed_from_u64(1);
        let state = env.reset(&mut rng);

        assert_eq!(state.len(), 3);
        assert!((state[0].powi(2) + state[1].powi(2) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pendulum_rewards_are_costs() {
        let mut env = Pendulum::new();
        let mut rng = StdRng::seed_from_u64(1);
        env.reset(&mut rng);

        let (_, reward, done) = env.step(&array![0.0]);
        assert!(reward <= 0.0);
        assert!(!done);
    }

    #[test]
    fn test_angle_normalization() {
        assert!((angle_normalize(0.0)).abs() < 1e-6);
        assert!((angle_normalize(2.0 * PI)).abs() < 1e-6);
        assert!((angle_normalize(-PI) + PI).abs() < 1e-6);
        assert!((angle_normalize(3.0 * PI) - PI).abs() < 1e-6);
    }
}
