//! The network core: configuration, activation, and the layer/network
//! machinery in the child modules.

pub mod layer;
pub mod network;
pub mod weights;

pub use network::Network;

use serde::{Deserialize, Serialize};

/// Which local slope term the backward pass multiplies into each neuron's
/// error gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Derivative {
    /// `output * (1 - output)`, the logistic-sigmoid slope. The activation
    /// here is tanh, so this term is not its true derivative, but it is the
    /// rule the original controller was trained with, and swapping it out
    /// changes learned behavior. Kept as the default for compatibility.
    #[default]
    Logistic,
    /// `1 - output^2`, the actual tanh slope. Opt in for textbook gradient
    /// descent.
    Tanh,
}

/// Topology and learning parameters, fixed for the lifetime of a [`Network`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Width of the input vector the host supplies each step.
    pub num_inputs: usize,
    /// Number of output neurons (the controller use case reads output 0).
    pub num_outputs: usize,
    /// Hidden layer count; 0 collapses the network to a single perceptron
    /// layer.
    pub num_hidden_layers: usize,
    /// Neuron count for every hidden layer. Ignored when there are no hidden
    /// layers.
    pub neurons_per_hidden_layer: usize,
    /// How strongly each training sample pulls on the weights, conventionally
    /// in (0, 1].
    pub learning_rate: f64,
    /// Slope term used by the backward pass.
    pub derivative: Derivative,
}

impl NetworkConfig {
    pub fn new(
        num_inputs: usize,
        num_outputs: usize,
        num_hidden_layers: usize,
        neurons_per_hidden_layer: usize,
        learning_rate: f64,
    ) -> Self {
        Self {
            num_inputs,
            num_outputs,
            num_hidden_layers,
            neurons_per_hidden_layer,
            learning_rate,
            derivative: Derivative::Logistic,
        }
    }

    /// Selects the backward-pass slope term.
    pub fn with_derivative(mut self, derivative: Derivative) -> Self {
        self.derivative = derivative;
        self
    }
}

/// The saturating activation applied by every neuron, hidden and output
/// alike: `2 / (1 + e^(-2x)) - 1`, i.e. tanh. Never leaves [-1, 1] for any
/// finite input (far from zero it saturates to the bound itself in f64);
/// callers needing a different output activation must wrap the output
/// themselves.
pub fn activation(x: f64) -> f64 {
    let k = (-2.0 * x).exp();
    2.0 / (1.0 + k) - 1.0
}
