//! A small fully-connected feedforward neural network trained online with
//! backpropagation, built to serve as a controller: the host feeds it a vector
//! of sensor readings once per control step and consumes a single scalar
//! actuator command from the output layer.
//!
//! The crate deliberately knows nothing about the host. It does not poll
//! input, integrate velocities, or clamp commands; it maps input vectors to
//! output vectors, updates its weights when the host can supply a training
//! target, and can dump/reload its learned weights as text.
//!
//! # Quick start
//!
//! ```
//! use online_ann::{Network, NetworkConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // 6 sensors in, 1 command out, one hidden layer of 4 neurons.
//! let config = NetworkConfig::new(6, 1, 1, 4, 0.11);
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut net = Network::new(config, &mut rng).unwrap();
//!
//! let sensors = [0.2, -0.4, 1.0, 0.5, 0.0, -0.1];
//!
//! // With a known target: one online training step (returns the
//! // pre-update prediction).
//! let out = net.train(&sensors, &[0.8]).unwrap();
//! assert_eq!(out.len(), 1);
//!
//! // Without one: a pure forward pass.
//! let out = net.evaluate(&sensors).unwrap();
//! assert!(out[0] > -1.0 && out[0] < 1.0);
//! ```

pub mod ann;
pub mod error;

pub use ann::{activation, Derivative, Network, NetworkConfig};
pub use ann::layer::LayerShape;
pub use ann::weights::Snapshot;
pub use error::NetworkError;
