//! Temporally correlated exploration noise for deterministic policies.

use ndarray::Array1;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Default long-run mean of the process.
pub const DEFAULT_MU: f32 = 0.0;
/// Default mean-reversion rate.
pub const DEFAULT_THETA: f32 = 0.15;
/// Default diffusion scale.
pub const DEFAULT_SIGMA: f32 = 0.2;

/// An Ornstein-Uhlenbeck process.
///
/// Each call to [`sample`](Self::sample) advances the internal state by
/// `x += theta * (mu - x) + sigma * eps` with `eps` drawn from a standard
/// normal, producing noise that is correlated across consecutive steps. The
/// state starts at zero and can be pulled back there with
/// [`reset`](Self::reset), typically at episode boundaries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrnsteinUhlenbeck {
    pub mu: f32,
    pub theta: f32,
    pub sigma: f32,
    state: Array1<f32>,
}

impl OrnsteinUhlenbeck {
    /// Create a process of the given dimension with the default parameters.
    pub fn new(size: usize) -> Self {
        Self::with_params(size, DEFAULT_MU, DEFAULT_THETA, DEFAULT_SIGMA)
    }

    /// Create a process with explicit `mu`, `theta`, and `sigma`.
    pub fn with_params(size: usize, mu: f32, theta: f32, sigma: f32) -> Self {
        OrnsteinUhlenbeck {
            mu,
            theta,
            sigma,
            state: Array1::zeros(size),
        }
    }

    /// Advance the process one step and return the new state.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Array1<f32> {
        for x in self.state.iter_mut() {
            let eps: f32 = rng.sample(StandardNormal);
            *x += self.theta * (self.mu - *x) + self.sigma * eps;
        }
        self.state.clone()
    }

    /// Pull the state back to zero.
    pub fn reset(&mut self) {
        self.state.fill(0.0);
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}
