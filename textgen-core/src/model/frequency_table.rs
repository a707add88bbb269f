use super::context::{Context, Token};
use super::error::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw per-context, per-next-token occurrence counts gathered during training.
///
/// # Responsibilities
/// - Accumulate observation counts streamed in by the context window
/// - Merge with another table of the same order (parallel training support)
/// - Expose read-only iteration for finalization and reports
///
/// # Invariants
/// - Only fully filled contexts are ever recorded
/// - Every stored count is strictly positive
/// - Counts are monotonically non-decreasing while training, frozen after
///
/// Iteration order over contexts and tokens is unspecified; anything that
/// needs a reproducible order (finalization, reports) must impose its own.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct FrequencyTable {
	/// The order N every recorded context must have.
	order: usize,

	/// Mapping from a context to the counts of the tokens observed after it.
	counts: HashMap<Context, HashMap<Token, u64>>,
}

impl FrequencyTable {
	/// Creates an empty table for contexts of the given order.
	pub fn new(order: usize) -> Self {
		Self { order, counts: HashMap::new() }
	}

	/// The order N of this table.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of distinct contexts recorded so far.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	/// Whether no observation was ever recorded.
	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Records one observation of `next` following `context`.
	///
	/// Creates the context's inner mapping and/or the token's entry on
	/// first sight. There is no upper bound on context or token cardinality
	/// other than available memory.
	pub fn observe(&mut self, context: Context, next: Token) {
		*self.counts.entry(context).or_default().entry(next).or_insert(0) += 1;
	}

	/// The recorded count for a given (context, next token) pair.
	pub fn count(&self, context: &Context, next: &str) -> u64 {
		self.counts
			.get(context)
			.and_then(|successors| successors.get(next))
			.copied()
			.unwrap_or(0)
	}

	/// The per-token counts recorded after `context`, if any.
	pub fn successors(&self, context: &Context) -> Option<&HashMap<Token, u64>> {
		self.counts.get(context)
	}

	/// Read-only iteration over every (context, successor counts) entry.
	pub fn iter(&self) -> impl Iterator<Item = (&Context, &HashMap<Token, u64>)> {
		self.counts.iter()
	}

	/// Merges another table into this one by summing counts per
	/// context/token pair.
	///
	/// Intended for parallel training, where partial tables built from
	/// separate document sets are combined into a single one.
	///
	/// # Errors
	/// Returns [`ModelError::OrderMismatch`] if the orders differ.
	pub fn merge(&mut self, other: FrequencyTable) -> Result<(), ModelError> {
		if self.order != other.order {
			return Err(ModelError::OrderMismatch { expected: self.order, found: other.order });
		}

		for (context, successors) in other.counts {
			let existing = self.counts.entry(context).or_default();
			for (token, count) in successors {
				*existing.entry(token).or_insert(0) += count;
			}
		}

		Ok(())
	}
}
