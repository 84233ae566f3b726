use ndarray::{Array, Array1, Array2, ArrayView2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Default standard deviation of the truncated-normal weight draw.
pub const DEFAULT_WEIGHT_STDDEV: f32 = 0.04;
/// Default constant used to initialize biases.
pub const DEFAULT_BIAS: f32 = 0.1;

/// An enumeration of the activation functions a layer can apply.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Activation {
    #[default]
    Relu,
    Linear,
}

impl Activation {
    /// Apply the activation function to a batch of pre-activations in-place.
    pub fn apply_batch(&self, inputs: &mut Array2<f32>) {
        match self {
            Activation::Relu => {
                inputs.mapv_inplace(|v| v.max(0.0));
            }
            Activation::Linear => {}
        }
    }

    /// Compute the derivative of the activation function for a batch of
    /// pre-activation values.
    pub fn derivative_batch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        match self {
            Activation::Relu => inputs.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Linear => Array2::ones(inputs.raw_dim()),
        }
    }
}

/// Weight initialization schemes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum WeightInit {
    /// Normal draw with the given standard deviation; values beyond two
    /// standard deviations are redrawn.
    TruncatedNormal { stddev: f32 },
    /// Uniform draw over `[min, max)`.
    Uniform { min: f32, max: f32 },
}

impl Default for WeightInit {
    fn default() -> Self {
        WeightInit::TruncatedNormal {
            stddev: DEFAULT_WEIGHT_STDDEV,
        }
    }
}

impl WeightInit {
    /// Sample a weight matrix of the given shape using the provided RNG.
    pub fn sample_weights<R: Rng + ?Sized>(
        &self,
        shape: (usize, usize),
        rng: &mut R,
    ) -> Array2<f32> {
        match self {
            WeightInit::TruncatedNormal { stddev } => {
                let normal = Normal::new(0.0, *stddev)
                    .expect("standard deviation must be finite and non-negative");
                let bound = 2.0 * stddev;
                Array::from_shape_simple_fn(shape, || loop {
                    let value: f32 = normal.sample(rng);
                    if value.abs() <= bound {
                        break value;
                    }
                })
            }
            WeightInit::Uniform { min, max } => {
                Array2::random_using(shape, Uniform::new(*min, *max), rng)
            }
        }
    }
}

/// A fully connected (dense) layer in a neural network
#[derive(Serialize, Deserialize, Clone)]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
    #[serde(skip)]
    pre_activation_output: Option<Array2<f32>>,
    #[serde(skip)]
    inputs: Option<Array2<f32>>,
}

impl DenseLayer {
    /// Create a new dense layer with the given input size, output size, and
    /// activation function. Weights come from the default truncated-normal
    /// draw, biases from the default constant.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        Self::new_with_init(
            input_size,
            output_size,
            activation,
            WeightInit::default(),
            DEFAULT_BIAS,
            rng,
        )
    }

    /// Create a new dense layer with an explicit weight initializer and bias
    /// constant.
    pub fn new_with_init<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        init: WeightInit,
        bias: f32,
        rng: &mut R,
    ) -> Self {
        let weights = init.sample_weights((input_size, output_size), rng);
        let biases = Array1::from_elem(output_size, bias);
        DenseLayer {
            weights,
            biases,
            activation,
            pre_activation_output: None,
            inputs: None,
        }
    }

    pub fn with_weights(mut self, weights: Array2<f32>) -> Self {
        assert_eq!(weights.dim(), self.weights.dim());
        self.weights = weights;
        self
    }

    pub fn with_biases(mut self, biases: Array1<f32>) -> Self {
        assert_eq!(biases.dim(), self.biases.dim());
        self.biases = biases;
        self
    }

    pub fn input_size(&self) -> usize {
        self.weights.shape()[0]
    }

    pub fn output_size(&self) -> usize {
        self.weights.shape()[1]
    }

    /// Run a batch of inputs through the layer, caching what the backward
    /// pass needs.
    pub fn forward_batch(&mut self, inputs: ArrayView2<f32>) -> Array2<f32> {
        self.inputs = Some(inputs.to_owned());
        let mut outputs = inputs.dot(&self.weights) + &self.biases.to_owned().insert_axis(Axis(0));
        self.pre_activation_output = Some(outputs.clone());
        self.activation.apply_batch(&mut outputs);
        outputs
    }

    /// Backpropagate a batch of output errors through the layer.
    ///
    /// Returns `(input_errors, weight_gradients, bias_gradients)` where
    /// `input_errors` is the loss gradient with respect to this layer's
    /// inputs, ready to feed into the previous layer.
    pub fn backward_batch(
        &self,
        output_errors: ArrayView2<f32>,
    ) -> (Array2<f32>, Array2<f32>, Array1<f32>) {
        let pre_activation_output = self
            .pre_activation_output
            .as_ref()
            .expect("No pre-activation output stored. forward_batch() must be called before backward_batch()");
        let inputs = self
            .inputs
            .as_ref()
            .expect("No inputs stored. forward_batch() must be called before backward_batch()");

        let activation_deriv = self.activation.derivative_batch(pre_activation_output.view());
        let adjusted_error = output_errors.to_owned() * &activation_deriv;
        let weight_gradients = inputs.t().dot(&adjusted_error);
        let bias_gradients = adjusted_error.sum_axis(Axis(0));
        let input_errors = adjusted_error.dot(&self.weights.t());

        (input_errors, weight_gradients, bias_gradients)
    }
}
