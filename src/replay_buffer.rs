use ndarray::Array1;
use rand::seq::index;
use rand::Rng;
use std::collections::VecDeque;

use crate::error::{MetisError, Result};

/// One stored interaction with the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: Array1<f32>,
    pub action: Array1<f32>,
    pub reward: f32,
    pub terminal: bool,
    pub next_state: Array1<f32>,
}

/// Bounded FIFO experience store with uniform sampling.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        ReplayBuffer {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a transition, evicting from the front while over capacity.
    pub fn push(&mut self, transition: Transition) {
        self.buffer.push_back(transition);
        while self.buffer.len() > self.capacity {
            self.buffer.pop_front();
        }
    }

    /// Draw `batch_size` distinct transitions uniformly at random.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        batch_size: usize,
    ) -> Result<Vec<&Transition>> {
        if self.buffer.len() < batch_size {
            return Err(MetisError::InsufficientData {
                requested: batch_size,
                available: self.buffer.len(),
            });
        }
        let indices = index::sample(rng, self.buffer.len(), batch_size);
        Ok(indices.into_iter().map(|i| &self.buffer[i]).collect())
    }

    /// The transition that would be evicted next, if any.
    pub fn oldest(&self) -> Option<&Transition> {
        self.buffer.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
