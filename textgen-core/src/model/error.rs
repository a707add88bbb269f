use thiserror::Error;

/// Errors produced by the Markov model layer.
///
/// # Variants
/// - `InvalidOrder`: the chain was constructed with an order of zero.
/// - `EmptyModel`: a generator was seeded from a probability table with no
///   entries (nothing was ever trained). Fatal configuration error.
/// - `NotSeeded`: `advance` was called on a generator that was never seeded.
/// - `AlreadyFinalized`: training or a second finalization was attempted
///   after the chain was finalized. Finalization is irreversible.
/// - `NotFinalized`: the probability table or a generator was requested
///   before the chain was finalized.
/// - `OrderMismatch`: two tables (or a table and a context) of different
///   orders were combined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
	#[error("chain order must be at least 1")]
	InvalidOrder,

	#[error("empty model: no context was ever observed during training")]
	EmptyModel,

	#[error("generator is not seeded")]
	NotSeeded,

	#[error("chain is already finalized, no further training is possible")]
	AlreadyFinalized,

	#[error("chain is not finalized yet")]
	NotFinalized,

	#[error("order mismatch: expected {expected}, got {found}")]
	OrderMismatch { expected: usize, found: usize },
}
