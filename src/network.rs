use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::layers::{Activation, DenseLayer};
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// Run a batch through a stack of layers, front to back.
fn forward_stack(layers: &mut [DenseLayer], inputs: ArrayView2<f32>) -> Array2<f32> {
    let mut current = inputs.to_owned();
    for layer in layers.iter_mut() {
        current = layer.forward_batch(current.view());
    }
    current
}

/// Backpropagate output errors through a stack of layers.
///
/// Returns the error with respect to the stack's inputs together with the
/// per-layer `(weight, bias)` gradients in front-to-back order.
fn backward_stack(
    layers: &[DenseLayer],
    output_errors: ArrayView2<f32>,
) -> (Array2<f32>, Vec<(Array2<f32>, Array1<f32>)>) {
    let mut gradients = Vec::with_capacity(layers.len());
    let mut current = output_errors.to_owned();
    for layer in layers.iter().rev() {
        let (input_errors, weight_gradients, bias_gradients) =
            layer.backward_batch(current.view());
        gradients.push((weight_gradients, bias_gradients));
        current = input_errors;
    }
    gradients.reverse();
    (current, gradients)
}

/// Join two batches column-wise, rows aligned.
fn concat_columns(a: ArrayView2<f32>, b: ArrayView2<f32>) -> Array2<f32> {
    let mut joined = Array2::zeros((a.nrows(), a.ncols() + b.ncols()));
    joined.slice_mut(s![.., ..a.ncols()]).assign(&a);
    joined.slice_mut(s![.., a.ncols()..]).assign(&b);
    joined
}

/// Move each target layer toward its source layer:
/// `target = (1 - tau) * target + tau * source`.
fn lerp_layers(targets: &mut [DenseLayer], sources: &[DenseLayer], tau: f32) {
    for (target, source) in targets.iter_mut().zip(sources) {
        target
            .weights
            .zip_mut_with(&source.weights, |t, &s| *t = *t * (1.0 - tau) + s * tau);
        target
            .biases
            .zip_mut_with(&source.biases, |t, &s| *t = *t * (1.0 - tau) + s * tau);
    }
}

fn sum_squared_weights(layers: &[DenseLayer]) -> f32 {
    layers
        .iter()
        .map(|layer| layer.weights.iter().map(|w| w * w).sum::<f32>())
        .sum()
}

fn decay_and_apply(
    layers: &mut [DenseLayer],
    optimizer: &mut OptimizerWrapper,
    gradients: Vec<(Array2<f32>, Array1<f32>)>,
    index_offset: usize,
    weight_decay: f32,
    learning_rate: f32,
) {
    for (index, (layer, (mut weight_gradients, bias_gradients))) in
        layers.iter_mut().zip(gradients).enumerate()
    {
        if weight_decay > 0.0 {
            weight_gradients.scaled_add(weight_decay, &layer.weights);
        }
        optimizer.update(
            index_offset + index,
            &mut layer.weights,
            &mut layer.biases,
            &weight_gradients,
            &bias_gradients,
            learning_rate,
        );
    }
}

/// A deterministic policy: a dense ReLU network mapping a state to one
/// action vector, with a linear output layer.
#[derive(Serialize, Deserialize, Clone)]
pub struct PolicyNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
}

impl PolicyNetwork {
    /// Create a policy with two hidden ReLU layers of `hidden_size` units
    /// and a linear action head.
    pub fn new<R: Rng + ?Sized>(
        state_size: usize,
        action_size: usize,
        hidden_size: usize,
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Self {
        let layers = vec![
            DenseLayer::new(state_size, hidden_size, Activation::Relu, rng),
            DenseLayer::new(hidden_size, hidden_size, Activation::Relu, rng),
            DenseLayer::new(hidden_size, action_size, Activation::Linear, rng),
        ];
        PolicyNetwork { layers, optimizer }
    }

    /// Compute the action for a single state.
    pub fn forward(&mut self, state: ArrayView1<f32>) -> Array1<f32> {
        let state = state.insert_axis(Axis(0));
        let output = self.forward_batch(state);
        let width = output.shape()[1];
        output
            .into_shape((width,))
            .expect("Failed to remove the batch axis")
    }

    /// Compute actions for a batch of states.
    pub fn forward_batch(&mut self, states: ArrayView2<f32>) -> Array2<f32> {
        forward_stack(&mut self.layers, states)
    }

    /// Backpropagate errors on the action outputs into per-layer gradients.
    /// Gradients are not applied here; pass them to
    /// [`apply_gradients`](Self::apply_gradients).
    pub fn backward_batch(&self, action_errors: ArrayView2<f32>) -> Vec<(Array2<f32>, Array1<f32>)> {
        let (_input_errors, gradients) = backward_stack(&self.layers, action_errors);
        gradients
    }

    /// Take one optimizer step. `weight_decay` adds the L2 term
    /// `weight_decay * w` to every weight gradient; biases are not decayed.
    pub fn apply_gradients(
        &mut self,
        gradients: Vec<(Array2<f32>, Array1<f32>)>,
        weight_decay: f32,
        learning_rate: f32,
    ) {
        let PolicyNetwork { layers, optimizer } = self;
        decay_and_apply(layers, optimizer, gradients, 0, weight_decay, learning_rate);
    }

    /// The L2 loss term matching [`apply_gradients`](Self::apply_gradients):
    /// `weight_decay * sum(w^2) / 2` over all weight matrices.
    pub fn l2_penalty(&self, weight_decay: f32) -> f32 {
        0.5 * weight_decay * sum_squared_weights(&self.layers)
    }

    /// Soft-update this network toward `source` with rate `tau`.
    pub fn track(&mut self, source: &PolicyNetwork, tau: f32) {
        lerp_layers(&mut self.layers, &source.layers, tau);
    }

    pub fn state_size(&self) -> usize {
        self.layers.first().map(|l| l.input_size()).unwrap_or(0)
    }

    pub fn action_size(&self) -> usize {
        self.layers.last().map(|l| l.output_size()).unwrap_or(0)
    }
}

/// Gradients produced by one backward pass through a [`QNetwork`].
///
/// `action_errors` is the loss gradient with respect to the action inputs.
/// For the critic's own update it is discarded; for the policy update it is
/// the signal that flows on into the actor.
pub struct QGradients {
    pub state_grads: Vec<(Array2<f32>, Array1<f32>)>,
    pub merge_grads: Vec<(Array2<f32>, Array1<f32>)>,
    pub action_errors: Array2<f32>,
}

/// An action-value estimator. The state passes through two ReLU layers, the
/// action is concatenated onto the resulting features, and the joined vector
/// runs through one more ReLU layer and a linear scalar head.
#[derive(Serialize, Deserialize, Clone)]
pub struct QNetwork {
    pub state_layers: Vec<DenseLayer>,
    pub merge_layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
    action_size: usize,
}

impl QNetwork {
    pub fn new<R: Rng + ?Sized>(
        state_size: usize,
        action_size: usize,
        hidden_size: usize,
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Self {
        let state_layers = vec![
            DenseLayer::new(state_size, hidden_size, Activation::Relu, rng),
            DenseLayer::new(hidden_size, hidden_size, Activation::Relu, rng),
        ];
        let merge_layers = vec![
            DenseLayer::new(hidden_size + action_size, hidden_size, Activation::Relu, rng),
            DenseLayer::new(hidden_size, 1, Activation::Linear, rng),
        ];
        QNetwork {
            state_layers,
            merge_layers,
            optimizer,
            action_size,
        }
    }

    /// Estimate the value of a single state-action pair.
    pub fn forward(&mut self, state: ArrayView1<f32>, action: ArrayView1<f32>) -> f32 {
        let states = state.insert_axis(Axis(0));
        let actions = action.insert_axis(Axis(0));
        let values = self.forward_batch(states, actions);
        values[0]
    }

    /// Estimate values for a batch of state-action pairs.
    pub fn forward_batch(&mut self, states: ArrayView2<f32>, actions: ArrayView2<f32>) -> Array1<f32> {
        let features = forward_stack(&mut self.state_layers, states);
        let joined = concat_columns(features.view(), actions);
        let values = forward_stack(&mut self.merge_layers, joined.view());
        values.column(0).to_owned()
    }

    /// Backpropagate errors on the value outputs through the whole network.
    pub fn backward_batch(&self, value_errors: ArrayView1<f32>) -> QGradients {
        let errors = value_errors.insert_axis(Axis(1));
        let (joined_errors, merge_grads) = backward_stack(&self.merge_layers, errors);
        let feature_width = joined_errors.ncols() - self.action_size;
        let (_state_errors, state_grads) = backward_stack(
            &self.state_layers,
            joined_errors.slice(s![.., ..feature_width]),
        );
        let action_errors = joined_errors.slice(s![.., feature_width..]).to_owned();
        QGradients {
            state_grads,
            merge_grads,
            action_errors,
        }
    }

    /// Take one optimizer step over both layer stacks.
    pub fn apply_gradients(&mut self, gradients: QGradients, weight_decay: f32, learning_rate: f32) {
        let QNetwork {
            state_layers,
            merge_layers,
            optimizer,
            ..
        } = self;
        let offset = state_layers.len();
        decay_and_apply(
            state_layers,
            optimizer,
            gradients.state_grads,
            0,
            weight_decay,
            learning_rate,
        );
        decay_and_apply(
            merge_layers,
            optimizer,
            gradients.merge_grads,
            offset,
            weight_decay,
            learning_rate,
        );
    }

    /// The L2 loss term over every weight matrix in both stacks.
    pub fn l2_penalty(&self, weight_decay: f32) -> f32 {
        0.5 * weight_decay
            * (sum_squared_weights(&self.state_layers) + sum_squared_weights(&self.merge_layers))
    }

    /// Soft-update this network toward `source` with rate `tau`.
    pub fn track(&mut self, source: &QNetwork, tau: f32) {
        lerp_layers(&mut self.state_layers, &source.state_layers, tau);
        lerp_layers(&mut self.merge_layers, &source.merge_layers, tau);
    }

    pub fn state_size(&self) -> usize {
        self.state_layers.first().map(|l| l.input_size()).unwrap_or(0)
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }
}
