//! Feed-forward action-value approximator for the neural policy engine.
//!
//! The engine only ever needs two operations from its function
//! approximator: predict per-action values for a state, and fit the
//! predicted values toward a target vector with one gradient step. Those two
//! operations form the [`Approximator`] trait; [`NeuralNetwork`] is the
//! default backend, but any gradient-based regressor satisfying the trait
//! substitutes.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::Result;
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// Trainable mapping from a state vector to per-action values.
pub trait Approximator {
    /// Predicted value for every action at `state`.
    fn predict(&mut self, state: ArrayView1<f32>) -> Array1<f32>;

    /// One gradient step fitting the prediction at `state` toward `targets`.
    fn fit(&mut self, state: ArrayView1<f32>, targets: ArrayView1<f32>, learning_rate: f32);
}

/// An enumeration of the activation functions used by the network layers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Activation {
    Relu,
    Linear,
}

impl Activation {
    fn apply_minibatch(&self, inputs: &mut Array2<f32>) {
        match self {
            Activation::Relu => {
                inputs.mapv_inplace(|v| v.max(0.0));
            }
            Activation::Linear => {}
        }
    }

    fn derivative_minibatch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        match self {
            Activation::Relu => inputs.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            // Derivative of linear activation is always 1
            Activation::Linear => Array2::ones(inputs.dim()),
        }
    }
}

/// A fully connected layer: weights, biases, and an activation function.
///
/// Weights are initialized from a uniform distribution between -0.1 and 0.1,
/// biases with zeros.
#[derive(Serialize, Deserialize, Clone)]
pub struct Layer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
    #[serde(skip)]
    pre_activation_output: Option<Array2<f32>>,
    #[serde(skip)]
    inputs: Option<Array2<f32>>,
}

impl Layer {
    pub fn new(input_size: usize, output_size: usize, activation: Activation) -> Self {
        let weights = Array2::random((input_size, output_size), Uniform::new(-0.1, 0.1));
        let biases = Array1::zeros(output_size);
        Layer {
            weights,
            biases,
            activation,
            pre_activation_output: None,
            inputs: None,
        }
    }

    fn forward_minibatch(&mut self, inputs: ArrayView2<f32>) -> Array2<f32> {
        self.inputs = Some(inputs.to_owned());
        let mut outputs = inputs.dot(&self.weights) + &self.biases.clone().insert_axis(Axis(0));
        self.pre_activation_output = Some(outputs.clone());
        self.activation.apply_minibatch(&mut outputs);
        outputs
    }

    /// Gradients of weights and biases with respect to the output errors,
    /// chained through the activation derivative. `forward_minibatch` must
    /// have run for the same inputs.
    fn backward_minibatch(&self, output_errors: ArrayView2<f32>) -> (Array2<f32>, Array2<f32>, Array1<f32>) {
        let pre_activation_output = self
            .pre_activation_output
            .as_ref()
            .expect("forward_minibatch() must be called before backward_minibatch()");
        let inputs = self
            .inputs
            .as_ref()
            .expect("forward_minibatch() must be called before backward_minibatch()");
        let activation_deriv = self.activation.derivative_minibatch(pre_activation_output.view());
        let adjusted_error = output_errors.to_owned() * &activation_deriv;
        let weight_gradients = inputs.t().dot(&adjusted_error);
        let bias_gradients = adjusted_error.sum_axis(Axis(0));
        (adjusted_error, weight_gradients, bias_gradients)
    }
}

/// A feed-forward neural network trained by backpropagation.
#[derive(Serialize, Deserialize, Clone)]
pub struct NeuralNetwork {
    pub layers: Vec<Layer>,
    pub optimizer: OptimizerWrapper,
}

impl NeuralNetwork {
    /// Build a network from consecutive layer sizes and one activation per
    /// layer transition.
    pub fn new(layer_sizes: &[usize], activations: &[Activation], optimizer: OptimizerWrapper) -> Self {
        assert_eq!(layer_sizes.len() - 1, activations.len());

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| Layer::new(window[0], window[1], activation))
            .collect::<Vec<_>>();

        NeuralNetwork { layers, optimizer }
    }

    /// Number of outputs, i.e. the size of the action set the network scores.
    pub fn output_size(&self) -> usize {
        self.layers
            .last()
            .expect("network has at least one layer by construction")
            .biases
            .len()
    }

    /// Forward pass for a single input vector.
    pub fn forward(&mut self, input: ArrayView1<f32>) -> Array1<f32> {
        let input = input.insert_axis(Axis(0)); // Minibatch of size 1
        let output = self.forward_minibatch(input.view());
        let shape = output.shape()[1];
        output.into_shape((shape,)).unwrap()
    }

    fn forward_minibatch(&mut self, inputs: ArrayView2<f32>) -> Array2<f32> {
        let mut current_output = inputs.to_owned();
        for layer in &mut self.layers {
            current_output = layer.forward_minibatch(current_output.view());
        }
        current_output
    }

    fn backward_minibatch(&mut self, output_errors: ArrayView2<f32>) -> Vec<(Array2<f32>, Array1<f32>)> {
        let mut gradients: Vec<(Array2<f32>, Array1<f32>)> = Vec::new();
        let mut current_error = output_errors.to_owned();

        for i in (0..self.layers.len()).rev() {
            let layer = &self.layers[i];
            let (adjusted_error, weight_gradients, bias_gradients) =
                layer.backward_minibatch(current_error.view());
            gradients.push((weight_gradients, bias_gradients));

            if i != 0 {
                current_error = adjusted_error.dot(&layer.weights.t());
            }
        }

        gradients.reverse();
        gradients
    }

    /// One gradient step on a batch of input/target pairs.
    pub fn train_minibatch(&mut self, inputs: ArrayView2<f32>, targets: ArrayView2<f32>, learning_rate: f32) {
        let outputs = self.forward_minibatch(inputs);
        let output_errors = &outputs - &targets;
        let gradients = self.backward_minibatch(output_errors.view());

        for (layer, (weight_gradients, bias_gradients)) in self.layers.iter_mut().zip(gradients) {
            self.optimizer.update_weights(&mut layer.weights, &weight_gradients, learning_rate);
            self.optimizer.update_biases(&mut layer.biases, &bias_gradients, learning_rate);
        }
    }

    /// Serialize the network (layers and optimizer state) to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// Load a network previously written by [`NeuralNetwork::save`].
    pub fn load(path: &str) -> Result<Self> {
        let data = fs::read(path)?;
        let deserialized: Self = bincode::deserialize(&data)?;
        Ok(deserialized)
    }
}

impl Approximator for NeuralNetwork {
    fn predict(&mut self, state: ArrayView1<f32>) -> Array1<f32> {
        self.forward(state)
    }

    fn fit(&mut self, state: ArrayView1<f32>, targets: ArrayView1<f32>, learning_rate: f32) {
        let state = state.insert_axis(Axis(0)); // Minibatch of size 1
        let targets = targets.insert_axis(Axis(0));
        self.train_minibatch(state.view(), targets.view(), learning_rate);
    }
}
