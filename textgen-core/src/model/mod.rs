//! Top-level module for the Markov chain model.
//!
//! This module provides a fixed-order Markov chain over word tokens:
//! - The chain aggregate and its lifecycle (`MarkovChain`)
//! - Sliding observation windows (`ObservationWindow`)
//! - Raw occurrence counts (`FrequencyTable`)
//! - Finalized cumulative distributions (`ProbabilityTable`)
//! - The sampling walk (`Generator`)

/// The chain aggregate: training passes, one-time finalization,
/// persistence, and generator creation.
pub mod chain;

/// Context tuples and the token type.
pub mod context;

/// Error taxonomy of the model layer.
pub mod error;

/// Per-context, per-next-token occurrence counts.
pub mod frequency_table;

/// The stochastic walk that samples new token sequences.
pub mod generator;

/// Cumulative probability distributions derived from the counts.
pub mod probability_table;

/// Order-N sliding window used during training.
pub mod window;

pub use chain::MarkovChain;
pub use context::{Context, Token};
pub use error::ModelError;
pub use frequency_table::FrequencyTable;
pub use generator::Generator;
pub use probability_table::{ProbabilityTable, TokenProbability};
pub use window::ObservationWindow;
