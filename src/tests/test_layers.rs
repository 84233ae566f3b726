use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::layers::{Activation, DenseLayer, WeightInit, DEFAULT_BIAS, DEFAULT_WEIGHT_STDDEV};

#[test]
fn test_relu_apply_and_derivative() {
    let mut values = array![[-1.0f32, 0.0, 2.0]];
    Activation::Relu.apply_batch(&mut values);
    assert_eq!(values, array![[0.0f32, 0.0, 2.0]]);

    let deriv = Activation::Relu.derivative_batch(array![[-1.0f32, 0.0, 2.0]].view());
    assert_eq!(deriv, array![[0.0f32, 0.0, 1.0]]);
}

#[test]
fn test_linear_is_identity() {
    let mut values = array![[-1.5f32, 3.0]];
    Activation::Linear.apply_batch(&mut values);
    assert_eq!(values, array![[-1.5f32, 3.0]]);

    let deriv = Activation::Linear.derivative_batch(values.view());
    assert_eq!(deriv, Array2::<f32>::ones((1, 2)));
}

#[test]
fn test_truncated_normal_respects_bound() {
    let mut rng = StdRng::seed_from_u64(11);
    let weights = WeightInit::default().sample_weights((32, 32), &mut rng);
    let bound = 2.0 * DEFAULT_WEIGHT_STDDEV;
    assert!(weights.iter().all(|w| w.abs() <= bound));
}

#[test]
fn test_truncated_normal_zero_stddev_gives_zeros() {
    let mut rng = StdRng::seed_from_u64(1);
    let weights = WeightInit::TruncatedNormal { stddev: 0.0 }.sample_weights((3, 3), &mut rng);
    assert!(weights.iter().all(|&w| w == 0.0));
}

#[test]
fn test_uniform_init_respects_range() {
    let mut rng = StdRng::seed_from_u64(11);
    let weights = WeightInit::Uniform {
        min: -0.5,
        max: 0.5,
    }
    .sample_weights((16, 8), &mut rng);
    assert!(weights.iter().all(|w| (-0.5..0.5).contains(w)));
}

#[test]
fn test_new_layer_shapes_and_bias() {
    let mut rng = StdRng::seed_from_u64(5);
    let layer = DenseLayer::new(4, 3, Activation::Relu, &mut rng);
    assert_eq!(layer.input_size(), 4);
    assert_eq!(layer.output_size(), 3);
    assert_eq!(layer.weights.dim(), (4, 3));
    assert!(layer.biases.iter().all(|&b| b == DEFAULT_BIAS));
}

#[test]
fn test_forward_batch_known_values() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut layer = DenseLayer::new(2, 2, Activation::Relu, &mut rng)
        .with_weights(array![[1.0f32, -1.0], [0.5, 2.0]])
        .with_biases(array![0.0f32, 1.0]);

    // Pre-activations: [2 + 0.5, -2 + 2 + 1] = [2.5, 1.0]; ReLU keeps both.
    let out = layer.forward_batch(array![[2.0f32, 1.0]].view());
    assert_eq!(out, array![[2.5f32, 1.0]]);
}

#[test]
fn test_backward_batch_known_gradients() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut layer = DenseLayer::new(2, 1, Activation::Linear, &mut rng)
        .with_weights(array![[2.0f32], [3.0]])
        .with_biases(array![0.0f32]);

    let out = layer.forward_batch(array![[1.0f32, 2.0]].view());
    assert_eq!(out, array![[8.0f32]]);

    let (input_errors, weight_grads, bias_grads) =
        layer.backward_batch(array![[1.0f32]].view());
    assert_eq!(weight_grads, array![[1.0f32], [2.0]]);
    assert_eq!(bias_grads, array![1.0f32]);
    assert_eq!(input_errors, array![[2.0f32, 3.0]]);
}

#[test]
fn test_backward_blocks_dead_relu_units() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut layer = DenseLayer::new(1, 1, Activation::Relu, &mut rng)
        .with_weights(array![[1.0f32]])
        .with_biases(array![-2.0f32]);

    // Pre-activation is -1, so the unit is dead and blocks all gradient.
    let out = layer.forward_batch(array![[1.0f32]].view());
    assert_eq!(out, array![[0.0f32]]);

    let (input_errors, weight_grads, bias_grads) =
        layer.backward_batch(array![[1.0f32]].view());
    assert_eq!(weight_grads, array![[0.0f32]]);
    assert_eq!(bias_grads, array![0.0f32]);
    assert_eq!(input_errors, array![[0.0f32]]);
}

#[test]
fn test_batch_gradients_sum_over_rows() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut layer = DenseLayer::new(1, 1, Activation::Linear, &mut rng)
        .with_weights(array![[1.0f32]])
        .with_biases(array![0.0f32]);

    layer.forward_batch(array![[1.0f32], [2.0]].view());
    let (_, weight_grads, bias_grads) =
        layer.backward_batch(array![[1.0f32], [1.0]].view());
    // dW = 1*1 + 2*1, db = 1 + 1.
    assert_eq!(weight_grads, array![[3.0f32]]);
    assert_eq!(bias_grads, array![2.0f32]);
}
