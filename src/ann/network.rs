//! The network itself: construction, forward evaluation, and the online
//! backpropagation step.

use rand::Rng;
use tracing::warn;

use crate::ann::layer::{build_layout, LayerShape};
use crate::ann::{activation, Derivative, NetworkConfig};
use crate::error::NetworkError;

/// Numerator of the initial weight range `±2.4 / fan_in`. Scaling by the
/// neuron's input count keeps the initial weighted sum inside the activation's
/// near-linear region instead of starting saturated.
const INIT_RANGE_NUMERATOR: f64 = 2.4;

/// A fully-connected feedforward network with one weight per connection and
/// one bias per neuron, all stored flat in layer-then-neuron order.
///
/// A `Network` is built once with a fixed topology and never resized. Its
/// state is owned exclusively by the instance; hosts wanting several
/// concurrently-learning agents give each agent its own `Network`.
pub struct Network {
    config: NetworkConfig,
    layers: Vec<LayerShape>,
    pub(crate) weights: Vec<f64>,
    pub(crate) biases: Vec<f64>,
}

/// Per-call scratch for one training step: the exact input vector each layer
/// consumed during the forward pass, every neuron's activation, and the
/// backpropagated error gradients. Built fresh inside every [`Network::train`]
/// call, so a step can never read state left behind by a previous sample.
struct Scratch {
    layer_inputs: Vec<Vec<f64>>,
    outputs: Vec<f64>,
    gradients: Vec<f64>,
}

impl Network {
    /// Builds a network with every weight and bias drawn independently from
    /// `±2.4 / fan_in` using the supplied generator. Passing a seeded
    /// generator makes construction fully reproducible.
    pub fn new<R: Rng + ?Sized>(config: NetworkConfig, rng: &mut R) -> Result<Self, NetworkError> {
        let layers = build_layout(&config)?;
        let total_weights: usize = layers.iter().map(|l| l.weight_count()).sum();
        let total_neurons: usize = layers.iter().map(|l| l.neurons).sum();

        let mut weights = Vec::with_capacity(total_weights);
        let mut biases = Vec::with_capacity(total_neurons);
        for shape in &layers {
            let range = INIT_RANGE_NUMERATOR / shape.inputs as f64;
            for _ in 0..shape.neurons {
                for _ in 0..shape.inputs {
                    weights.push(rng.gen_range(-range..=range));
                }
                biases.push(rng.gen_range(-range..=range));
            }
        }

        Ok(Self {
            config,
            layers,
            weights,
            biases,
        })
    }

    /// Builds a network seeded from the thread-local generator.
    pub fn from_entropy(config: NetworkConfig) -> Result<Self, NetworkError> {
        Self::new(config, &mut rand::thread_rng())
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// The layer stack, input-facing first.
    pub fn layers(&self) -> &[LayerShape] {
        &self.layers
    }

    /// Total connection count, which is also the value count of the text
    /// weight format.
    pub fn total_weights(&self) -> usize {
        self.weights.len()
    }

    /// Pure forward pass: one activation per output neuron, each inside the
    /// saturating bound [-1, 1]. Rejects inputs of the wrong width without
    /// touching any state.
    pub fn evaluate(&self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.check_input(inputs)?;
        let mut current = inputs.to_vec();
        for shape in &self.layers {
            current = self.forward_layer(shape, &current);
        }
        Ok(current)
    }

    /// One online training step: a forward pass followed by a backpropagation
    /// update of every weight and bias. Returns the forward pass's outputs,
    /// i.e. the prediction *before* this sample's update was applied.
    pub fn train(&mut self, inputs: &[f64], desired: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.check_input(inputs)?;
        if desired.len() != self.config.num_outputs {
            warn!(
                expected = self.config.num_outputs,
                actual = desired.len(),
                "desired-output size mismatch, skipping training step"
            );
            return Err(NetworkError::InputSizeMismatch {
                expected: self.config.num_outputs,
                actual: desired.len(),
            });
        }

        let (mut scratch, outputs) = self.forward_traced(inputs);
        self.backward(&mut scratch, desired);
        Ok(outputs)
    }

    fn check_input(&self, inputs: &[f64]) -> Result<(), NetworkError> {
        if inputs.len() != self.config.num_inputs {
            warn!(
                expected = self.config.num_inputs,
                actual = inputs.len(),
                "input size mismatch, skipping step"
            );
            return Err(NetworkError::InputSizeMismatch {
                expected: self.config.num_inputs,
                actual: inputs.len(),
            });
        }
        Ok(())
    }

    /// Weighted sum minus bias, then the activation, for every neuron in one
    /// layer. The bias is subtracted rather than added; the backward pass's
    /// `-1` bias-input convention depends on this sign.
    fn forward_layer(&self, shape: &LayerShape, inputs: &[f64]) -> Vec<f64> {
        let mut outputs = Vec::with_capacity(shape.neurons);
        for j in 0..shape.neurons {
            let mut n = 0.0;
            for (k, input) in inputs.iter().enumerate() {
                n += self.weights[shape.weight_index(j, k)] * input;
            }
            n -= self.biases[shape.neuron_index(j)];
            outputs.push(activation(n));
        }
        outputs
    }

    /// Forward pass that also records, per layer, the input vector it
    /// consumed and every neuron's activation. Returns the scratch plus the
    /// final layer's outputs.
    fn forward_traced(&self, inputs: &[f64]) -> (Scratch, Vec<f64>) {
        let mut scratch = Scratch {
            layer_inputs: Vec::with_capacity(self.layers.len()),
            outputs: vec![0.0; self.biases.len()],
            gradients: vec![0.0; self.biases.len()],
        };

        let mut current = inputs.to_vec();
        for shape in &self.layers {
            let outputs = self.forward_layer(shape, &current);
            for (j, &out) in outputs.iter().enumerate() {
                scratch.outputs[shape.neuron_index(j)] = out;
            }
            scratch.layer_inputs.push(current);
            current = outputs;
        }
        (scratch, current)
    }

    /// Backward pass, output layer first. For each output neuron the error is
    /// `desired - output` and the gradient scales it by the slope term; for
    /// each hidden neuron the gradient is the slope term times the gradients
    /// of the next layer routed back through the weights that connect to it.
    ///
    /// Two deliberate quirks of the trained behavior are preserved here:
    /// output-layer *weights* move by `rate * input * error` (the raw error,
    /// not the gradient), and because layers are updated back-to-front, each
    /// hidden layer's gradient is routed through the next layer's
    /// already-updated weights.
    fn backward(&mut self, scratch: &mut Scratch, desired: &[f64]) {
        let rate = self.config.learning_rate;
        let last = self.layers.len() - 1;

        for i in (0..self.layers.len()).rev() {
            let shape = self.layers[i];
            let layer_inputs = &scratch.layer_inputs[i];

            for j in 0..shape.neurons {
                let out = scratch.outputs[shape.neuron_index(j)];
                let slope = self.slope(out);

                let gradient = if i == last {
                    let error = desired[j] - out;
                    for k in 0..shape.inputs {
                        self.weights[shape.weight_index(j, k)] += rate * layer_inputs[k] * error;
                    }
                    slope * error
                } else {
                    let next = self.layers[i + 1];
                    let mut routed = 0.0;
                    for p in 0..next.neurons {
                        routed +=
                            scratch.gradients[next.neuron_index(p)] * self.weights[next.weight_index(p, j)];
                    }
                    let gradient = slope * routed;
                    for k in 0..shape.inputs {
                        self.weights[shape.weight_index(j, k)] += rate * layer_inputs[k] * gradient;
                    }
                    gradient
                };

                scratch.gradients[shape.neuron_index(j)] = gradient;
                // The bias behaves as a weight on a constant -1 input.
                self.biases[shape.neuron_index(j)] += rate * -1.0 * gradient;
            }
        }
    }

    fn slope(&self, output: f64) -> f64 {
        match self.config.derivative {
            Derivative::Logistic => output * (1.0 - output),
            Derivative::Tanh => 1.0 - output * output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ann::weights::Snapshot;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(config: NetworkConfig, seed: u64) -> Network {
        let mut rng = StdRng::seed_from_u64(seed);
        Network::new(config, &mut rng).unwrap()
    }

    #[test]
    fn initial_values_respect_fan_in_range() {
        let net = seeded(NetworkConfig::new(6, 1, 1, 4, 0.11), 3);
        for shape in net.layers() {
            let range = 2.4 / shape.inputs as f64;
            for j in 0..shape.neurons {
                for k in 0..shape.inputs {
                    let w = net.weights[shape.weight_index(j, k)];
                    assert!((-range..=range).contains(&w));
                }
                let b = net.biases[shape.neuron_index(j)];
                assert!((-range..=range).contains(&b));
            }
        }
    }

    #[test]
    fn layer_count_follows_hidden_count() {
        assert_eq!(seeded(NetworkConfig::new(6, 1, 3, 4, 0.1), 0).layers().len(), 4);
        assert_eq!(seeded(NetworkConfig::new(3, 1, 0, 0, 0.1), 0).layers().len(), 1);
    }

    #[test]
    fn evaluate_output_is_sized_and_bounded() {
        let net = seeded(NetworkConfig::new(6, 2, 2, 5, 0.1), 11);
        let out = net.evaluate(&[1.0, -2.5, 0.35, 0.0, 0.91, -0.07]).unwrap();
        assert_eq!(out.len(), 2);
        for y in out {
            assert!(y > -1.0 && y < 1.0);
        }
    }

    #[test]
    fn evaluate_rejects_wrong_input_width() {
        let net = seeded(NetworkConfig::new(6, 1, 1, 4, 0.11), 5);
        let before = net.snapshot();
        let err = net.evaluate(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            NetworkError::InputSizeMismatch {
                expected: 6,
                actual: 2
            }
        );
        assert_eq!(net.snapshot(), before);
    }

    #[test]
    fn train_rejects_wrong_target_width() {
        let mut net = seeded(NetworkConfig::new(2, 1, 1, 3, 0.1), 5);
        let before = net.snapshot();
        let err = net.train(&[0.5, 0.5], &[1.0, -1.0]).unwrap_err();
        assert_eq!(
            err,
            NetworkError::InputSizeMismatch {
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(net.snapshot(), before);
    }

    #[test]
    fn train_returns_pre_update_prediction() {
        let mut net = seeded(NetworkConfig::new(2, 1, 1, 4, 0.2), 21);
        let inputs = [0.3, -0.6];
        let before = net.evaluate(&inputs).unwrap();
        let trained = net.train(&inputs, &[0.9]).unwrap();
        assert_eq!(before, trained);
        // The update itself must have moved the weights.
        assert_ne!(net.evaluate(&inputs).unwrap(), before);
    }

    #[test]
    fn perceptron_error_shrinks_under_training() {
        // Known weights so the output starts on the positive branch, where
        // the legacy logistic slope behaves.
        let mut net = seeded(NetworkConfig::new(2, 1, 0, 0, 0.1), 1);
        net.restore(&Snapshot {
            weights: vec![0.5, 0.5],
            biases: vec![0.2],
        })
        .unwrap();

        let inputs = [1.0, 1.0];
        let target = [0.9];
        let first = net.train(&inputs, &target).unwrap();
        let initial_error = (target[0] - first[0]).abs();
        for _ in 0..50 {
            net.train(&inputs, &target).unwrap();
        }
        let final_error = (target[0] - net.evaluate(&inputs).unwrap()[0]).abs();
        assert!(
            final_error < initial_error && final_error < 0.05,
            "error went {initial_error} -> {final_error}"
        );
    }

    #[test]
    fn tanh_slope_mode_changes_the_update() {
        let config = NetworkConfig::new(2, 1, 1, 3, 0.1);
        let mut legacy = seeded(config.clone(), 9);
        let mut exact = seeded(config.with_derivative(Derivative::Tanh), 9);
        // Same seed, same starting point.
        exact.restore(&legacy.snapshot()).unwrap();

        legacy.train(&[0.4, 0.8], &[-0.5]).unwrap();
        exact.train(&[0.4, 0.8], &[-0.5]).unwrap();
        assert_ne!(legacy.snapshot(), exact.snapshot());
    }
}
