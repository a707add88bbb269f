use super::context::{Context, Token};
use super::frequency_table::FrequencyTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of a per-context distribution: a candidate next token and the
/// cumulative probability mass up to and including it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TokenProbability {
	pub token: Token,
	pub cumulative: f64,
}

/// Per-context cumulative distributions over next tokens, derived once from
/// a [`FrequencyTable`] and read-only afterwards.
///
/// # Invariants
/// - Every context present in the source table has a non-empty entry here,
///   and the token sets match exactly
/// - Within an entry, tokens appear in lexicographic order and `cumulative`
///   is strictly increasing
/// - The last `cumulative` of an entry is 1.0 within floating-point
///   tolerance; sampling must clamp rather than rely on it exactly
/// - `ordered` holds every context exactly once, sorted, so that uniform
///   seed selection does not depend on hash-map iteration order
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProbabilityTable {
	order: usize,
	entries: HashMap<Context, Vec<TokenProbability>>,

	/// All contexts in sorted order, the seedable starting points.
	ordered: Vec<Context>,
}

impl ProbabilityTable {
	/// Converts raw occurrence counts into cumulative distributions.
	///
	/// For each context, its counts are summed, every token contributes
	/// `count / sum`, and the running sum becomes the stored cumulative
	/// value. Tokens are visited in lexicographic order so that the result
	/// does not depend on hash-map iteration order.
	///
	/// A context whose counts sum to zero cannot be produced by training,
	/// but is skipped rather than divided by.
	pub fn finalize(counts: &FrequencyTable) -> Self {
		let mut entries = HashMap::with_capacity(counts.len());

		for (context, successors) in counts.iter() {
			let sum: u64 = successors.values().sum();
			if sum == 0 {
				continue;
			}

			let mut ordered: Vec<(&Token, &u64)> = successors.iter().collect();
			ordered.sort_by(|left, right| left.0.cmp(right.0));

			let mut cumulative = 0.0;
			let mut distribution = Vec::with_capacity(ordered.len());
			for (token, count) in ordered {
				cumulative += *count as f64 / sum as f64;
				distribution.push(TokenProbability { token: token.clone(), cumulative });
			}

			entries.insert(context.clone(), distribution);
		}

		let mut ordered: Vec<Context> = entries.keys().cloned().collect();
		ordered.sort_unstable();

		Self { order: counts.order(), entries, ordered }
	}

	/// The order N of this table.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the table holds no context at all.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The cumulative distribution for `context`, if it was ever trained.
	pub fn distribution(&self, context: &Context) -> Option<&[TokenProbability]> {
		self.entries.get(context).map(Vec::as_slice)
	}

	/// Iterates over every trained context, in sorted order.
	pub fn contexts(&self) -> impl Iterator<Item = &Context> {
		self.ordered.iter()
	}

	/// All trained contexts, sorted. The slice uniform seeding indexes into.
	pub(crate) fn ordered_contexts(&self) -> &[Context] {
		&self.ordered
	}

	/// Read-only iteration over every (context, distribution) entry.
	pub fn iter(&self) -> impl Iterator<Item = (&Context, &[TokenProbability])> {
		self.entries.iter().map(|(context, distribution)| (context, distribution.as_slice()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn context(tokens: &[&str]) -> Context {
		Context::new(tokens.iter().map(|t| t.to_string()).collect())
	}

	fn observe(table: &mut FrequencyTable, ctx: &[&str], next: &str) {
		table.observe(context(ctx), next.to_string());
	}

	const TOLERANCE: f64 = 1e-9;

	#[test]
	fn even_split_uses_lexicographic_tie_break() {
		let mut counts = FrequencyTable::new(1);
		observe(&mut counts, &["cat"], "sat");
		observe(&mut counts, &["cat"], "ran");

		let table = ProbabilityTable::finalize(&counts);
		let distribution = table.distribution(&context(&["cat"])).unwrap();

		assert_eq!(distribution.len(), 2);
		assert_eq!(distribution[0].token, "ran");
		assert!((distribution[0].cumulative - 0.5).abs() < TOLERANCE);
		assert_eq!(distribution[1].token, "sat");
		assert!((distribution[1].cumulative - 1.0).abs() < TOLERANCE);
	}

	#[test]
	fn cumulative_is_increasing_and_ends_at_one() {
		let mut counts = FrequencyTable::new(1);
		for (ctx, next) in [
			("the", "cat"), ("the", "cat"), ("the", "dog"), ("the", "end"),
			("cat", "sat"), ("cat", "ran"), ("cat", "sat"),
		] {
			observe(&mut counts, &[ctx], next);
		}

		let table = ProbabilityTable::finalize(&counts);
		assert_eq!(table.len(), 2);
		for (_, distribution) in table.iter() {
			let mut previous = 0.0;
			for entry in distribution {
				assert!(entry.cumulative > previous);
				previous = entry.cumulative;
			}
			assert!((previous - 1.0).abs() < TOLERANCE);
		}
	}

	#[test]
	fn token_sets_survive_finalization() {
		let mut counts = FrequencyTable::new(2);
		observe(&mut counts, &["b", "a"], "c");
		observe(&mut counts, &["b", "a"], "d");
		observe(&mut counts, &["c", "b"], "d");

		let table = ProbabilityTable::finalize(&counts);
		for (ctx, successors) in counts.iter() {
			let distribution = table.distribution(ctx).unwrap();
			let mut expected: Vec<&str> = successors.keys().map(String::as_str).collect();
			expected.sort_unstable();
			let produced: Vec<&str> =
				distribution.iter().map(|entry| entry.token.as_str()).collect();
			assert_eq!(produced, expected);
		}
	}

	#[test]
	fn empty_counts_finalize_to_an_empty_table() {
		let counts = FrequencyTable::new(3);
		let table = ProbabilityTable::finalize(&counts);
		assert!(table.is_empty());
		assert_eq!(table.order(), 3);
	}
}
