//! Weight persistence: the comma-separated text format and full in-memory
//! snapshots.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ann::network::Network;
use crate::error::NetworkError;

impl Network {
    /// Renders every weight as a comma-separated string, visited in layer
    /// order, then neuron order, then weight order, with a trailing comma
    /// after the last value.
    ///
    /// Biases are *not* part of the format, so a round trip through
    /// [`Network::import_weights`] preserves weights exactly but leaves
    /// biases at whatever the importing network already had. Use
    /// [`Network::snapshot`] when biases matter. The string carries no
    /// topology information either; it only restores into a network of the
    /// exact shape it came from.
    pub fn export_weights(&self) -> String {
        let mut text = String::new();
        for w in &self.weights {
            text.push_str(&w.to_string());
            text.push(',');
        }
        text
    }

    /// Parses a string produced by [`Network::export_weights`] and assigns
    /// the values back in the same traversal order. Empty input is a no-op.
    ///
    /// The import is all-or-nothing: the value count is checked against the
    /// network's weight count and every token is parsed before a single
    /// weight is touched, so a rejected import leaves the network exactly as
    /// it was.
    pub fn import_weights(&mut self, text: &str) -> Result<(), NetworkError> {
        if text.is_empty() {
            return Ok(());
        }

        // The exporter leaves a trailing comma; drop it rather than reading
        // an empty final token.
        let body = text.strip_suffix(',').unwrap_or(text);
        let tokens: Vec<&str> = body.split(',').collect();
        if tokens.len() != self.weights.len() {
            warn!(
                expected = self.weights.len(),
                actual = tokens.len(),
                "weight import rejected"
            );
            return Err(NetworkError::WeightCountMismatch {
                expected: self.weights.len(),
                actual: tokens.len(),
            });
        }

        let mut parsed = Vec::with_capacity(tokens.len());
        for (position, token) in tokens.iter().enumerate() {
            let value: f64 = token.trim().parse().map_err(|_| NetworkError::ParseError {
                token: token.to_string(),
                position,
            })?;
            parsed.push(value);
        }

        self.weights = parsed;
        Ok(())
    }

    /// Copies the complete learned state, biases included. Unlike the text
    /// format this is lossless.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            weights: self.weights.clone(),
            biases: self.biases.clone(),
        }
    }

    /// Restores a snapshot taken from a network of the same topology. Fails
    /// without partial mutation if either length disagrees.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), NetworkError> {
        if snapshot.weights.len() != self.weights.len() {
            return Err(NetworkError::WeightCountMismatch {
                expected: self.weights.len(),
                actual: snapshot.weights.len(),
            });
        }
        if snapshot.biases.len() != self.biases.len() {
            return Err(NetworkError::WeightCountMismatch {
                expected: self.biases.len(),
                actual: snapshot.biases.len(),
            });
        }
        self.weights.clone_from(&snapshot.weights);
        self.biases.clone_from(&snapshot.biases);
        Ok(())
    }
}

/// A full in-memory copy of a network's learned state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub weights: Vec<f64>,
    pub biases: Vec<f64>,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
