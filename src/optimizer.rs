use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// A first-order gradient optimizer.
///
/// `layer_index` identifies which layer of the owning network is being
/// updated, so stateful optimizers can keep separate accumulators per layer.
pub trait Optimizer {
    fn update(
        &mut self,
        layer_index: usize,
        weights: &mut Array2<f32>,
        biases: &mut Array1<f32>,
        weight_gradients: &Array2<f32>,
        bias_gradients: &Array1<f32>,
        learning_rate: f32,
    );
}

#[derive(Serialize, Deserialize, Clone)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn update(
        &mut self,
        layer_index: usize,
        weights: &mut Array2<f32>,
        biases: &mut Array1<f32>,
        weight_gradients: &Array2<f32>,
        bias_gradients: &Array1<f32>,
        learning_rate: f32,
    ) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update(
                layer_index,
                weights,
                biases,
                weight_gradients,
                bias_gradients,
                learning_rate,
            ),
            OptimizerWrapper::Adam(optimizer) => optimizer.update(
                layer_index,
                weights,
                biases,
                weight_gradients,
                bias_gradients,
                learning_rate,
            ),
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Default for SGD {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for SGD {
    fn update(
        &mut self,
        _layer_index: usize,
        weights: &mut Array2<f32>,
        biases: &mut Array1<f32>,
        weight_gradients: &Array2<f32>,
        bias_gradients: &Array1<f32>,
        learning_rate: f32,
    ) {
        weights.zip_mut_with(weight_gradients, |w, &g| *w -= learning_rate * g);
        biases.zip_mut_with(bias_gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// Per-layer Adam accumulators. The timestep lives in the slot so layers
/// that start updating at different times stay correctly bias-corrected.
#[derive(Serialize, Deserialize, Clone)]
struct AdamSlot {
    m_weights: Array2<f32>,
    v_weights: Array2<f32>,
    m_biases: Array1<f32>,
    v_biases: Array1<f32>,
    t: i32,
}

impl AdamSlot {
    fn zeros(weight_dim: (usize, usize), bias_dim: usize) -> Self {
        AdamSlot {
            m_weights: Array2::zeros(weight_dim),
            v_weights: Array2::zeros(weight_dim),
            m_biases: Array1::zeros(bias_dim),
            v_biases: Array1::zeros(bias_dim),
            t: 0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    slots: Vec<Option<AdamSlot>>,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            slots: Vec::new(),
        }
    }

    fn slot(
        &mut self,
        layer_index: usize,
        weight_dim: (usize, usize),
        bias_dim: usize,
    ) -> &mut AdamSlot {
        if self.slots.len() <= layer_index {
            self.slots.resize_with(layer_index + 1, || None);
        }
        self.slots[layer_index].get_or_insert_with(|| AdamSlot::zeros(weight_dim, bias_dim))
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn update(
        &mut self,
        layer_index: usize,
        weights: &mut Array2<f32>,
        biases: &mut Array1<f32>,
        weight_gradients: &Array2<f32>,
        bias_gradients: &Array1<f32>,
        learning_rate: f32,
    ) {
        let beta1 = self.beta1;
        let beta2 = self.beta2;
        let epsilon = self.epsilon;

        let slot = self.slot(layer_index, weights.dim(), biases.len());
        slot.t += 1;
        let t = slot.t;
        let m_correction = 1.0 - beta1.powi(t);
        let v_correction = 1.0 - beta2.powi(t);

        slot.m_weights
            .zip_mut_with(weight_gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        slot.v_weights
            .zip_mut_with(weight_gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);
        let m_hat = slot.m_weights.mapv(|m| m / m_correction);
        let v_hat = slot.v_weights.mapv(|v| v / v_correction);
        *weights -= &((&m_hat / (v_hat.mapv(f32::sqrt) + epsilon)) * learning_rate);

        slot.m_biases
            .zip_mut_with(bias_gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        slot.v_biases
            .zip_mut_with(bias_gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);
        let m_hat = slot.m_biases.mapv(|m| m / m_correction);
        let v_hat = slot.v_biases.mapv(|v| v / v_correction);
        *biases -= &((&m_hat / (v_hat.mapv(f32::sqrt) + epsilon)) * learning_rate);
    }
}
