//! Layer geometry over flat weight storage.
//!
//! The network keeps every weight in one contiguous vector and every bias in
//! another, laid out layer by layer, then neuron by neuron. Each layer is
//! described by a [`LayerShape`] that records its dimensions and where its
//! slice of the flat arrays begins, so a (layer, neuron, weight) triple maps
//! to a single index with no per-neuron allocation.

use crate::ann::NetworkConfig;
use crate::error::NetworkError;

/// Dimensions of one layer plus its offsets into the flat weight and bias
/// arrays. Neuron `j`'s weights occupy
/// `weight_base + j * inputs .. weight_base + (j + 1) * inputs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerShape {
    /// Neurons in this layer; also the width of the vector it produces.
    pub neurons: usize,
    /// Width of the vector this layer consumes. Every neuron in a layer sees
    /// the same inputs, so this is also each neuron's weight count.
    pub inputs: usize,
    pub(crate) weight_base: usize,
    pub(crate) neuron_base: usize,
}

impl LayerShape {
    /// Flat index of weight `k` of neuron `j`.
    pub(crate) fn weight_index(&self, neuron: usize, input: usize) -> usize {
        self.weight_base + neuron * self.inputs + input
    }

    /// Flat index of neuron `j` in the bias/output/gradient arrays.
    pub(crate) fn neuron_index(&self, neuron: usize) -> usize {
        self.neuron_base + neuron
    }

    pub(crate) fn weight_count(&self) -> usize {
        self.neurons * self.inputs
    }
}

/// Validates a topology and computes its layer stack: input-facing hidden
/// layers first, the output layer last. With no hidden layers the whole
/// network is one `num_outputs`-neuron layer reading the raw inputs.
pub(crate) fn build_layout(config: &NetworkConfig) -> Result<Vec<LayerShape>, NetworkError> {
    if config.num_inputs == 0 {
        return Err(NetworkError::ConstructionError {
            message: "num_inputs must be at least 1".into(),
        });
    }
    if config.num_outputs == 0 {
        return Err(NetworkError::ConstructionError {
            message: "num_outputs must be at least 1".into(),
        });
    }
    if config.num_hidden_layers > 0 && config.neurons_per_hidden_layer == 0 {
        return Err(NetworkError::ConstructionError {
            message: "neurons_per_hidden_layer must be at least 1 when hidden layers exist".into(),
        });
    }

    // Dimensions first, offsets after.
    let mut dims = Vec::with_capacity(config.num_hidden_layers + 1);
    if config.num_hidden_layers > 0 {
        dims.push((config.neurons_per_hidden_layer, config.num_inputs));
        for _ in 1..config.num_hidden_layers {
            dims.push((
                config.neurons_per_hidden_layer,
                config.neurons_per_hidden_layer,
            ));
        }
        dims.push((config.num_outputs, config.neurons_per_hidden_layer));
    } else {
        dims.push((config.num_outputs, config.num_inputs));
    }

    let mut layers = Vec::with_capacity(dims.len());
    let mut weight_base = 0;
    let mut neuron_base = 0;
    for (neurons, inputs) in dims {
        layers.push(LayerShape {
            neurons,
            inputs,
            weight_base,
            neuron_base,
        });
        weight_base += neurons * inputs;
        neuron_base += neurons;
    }
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_topology_chains_widths() {
        let layers = build_layout(&NetworkConfig::new(6, 1, 2, 4, 0.1)).unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!((layers[0].neurons, layers[0].inputs), (4, 6));
        assert_eq!((layers[1].neurons, layers[1].inputs), (4, 4));
        assert_eq!((layers[2].neurons, layers[2].inputs), (1, 4));
        // Each layer consumes exactly what the previous one produces.
        for pair in layers.windows(2) {
            assert_eq!(pair[1].inputs, pair[0].neurons);
        }
    }

    #[test]
    fn perceptron_topology_is_one_layer() {
        let layers = build_layout(&NetworkConfig::new(3, 1, 0, 0, 0.1)).unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!((layers[0].neurons, layers[0].inputs), (1, 3));
    }

    #[test]
    fn offsets_are_contiguous() {
        let layers = build_layout(&NetworkConfig::new(6, 2, 1, 4, 0.1)).unwrap();
        assert_eq!(layers[0].weight_base, 0);
        assert_eq!(layers[1].weight_base, 24);
        assert_eq!(layers[0].neuron_base, 0);
        assert_eq!(layers[1].neuron_base, 4);
        assert_eq!(layers[1].weight_index(1, 3), 24 + 4 + 3);
    }

    #[test]
    fn zero_counts_are_rejected() {
        assert!(build_layout(&NetworkConfig::new(0, 1, 0, 0, 0.1)).is_err());
        assert!(build_layout(&NetworkConfig::new(6, 0, 0, 0, 0.1)).is_err());
        assert!(build_layout(&NetworkConfig::new(6, 1, 1, 0, 0.1)).is_err());
    }
}
