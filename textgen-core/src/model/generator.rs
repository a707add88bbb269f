use super::context::{Context, Token};
use super::error::ModelError;
use super::probability_table::ProbabilityTable;
use rand::rngs::StdRng;
use rand::Rng;

/// Stateful walk over a finalized [`ProbabilityTable`].
///
/// The generator moves through three states: unseeded, seeded, advancing.
/// It never halts on its own; the caller decides how many tokens to pull,
/// and re-seeding restarts the walk at any time. Each generator owns its
/// own context and its own random source, so any number of generators can
/// read the same table concurrently.
///
/// # Emission convention
/// The token occupying the context's newest slot is emitted exactly once,
/// when the walk first leaves that slot: the first token of a fresh walk is
/// the seed context's newest token, and every later token is the one
/// [`advance`](Self::advance) just sampled.
#[derive(Debug)]
pub struct Generator<'a> {
	table: &'a ProbabilityTable,

	/// Current position of the walk, `None` until seeded.
	context: Option<Context>,

	/// Whether the newest slot of `context` was already emitted.
	newest_emitted: bool,

	rng: StdRng,
}

impl<'a> Generator<'a> {
	/// Creates an unseeded generator over a finalized table.
	///
	/// The random source is passed in explicitly so tests can inject a
	/// deterministic one.
	pub fn new(table: &'a ProbabilityTable, rng: StdRng) -> Self {
		Self { table, context: None, newest_emitted: false, rng }
	}

	/// The current position of the walk, if seeded.
	pub fn context(&self) -> Option<&Context> {
		self.context.as_ref()
	}

	/// Starts (or restarts) the walk at a context chosen uniformly at
	/// random among the trained contexts.
	///
	/// Every context that received at least one full observation is an
	/// equally likely starting point, regardless of how often it occurred.
	/// Selection indexes into the table's sorted context list, so a fixed
	/// random source reproduces the same walk across runs.
	///
	/// # Errors
	/// Returns [`ModelError::EmptyModel`] if the table has no entries.
	/// This is a fatal configuration error, not something to retry.
	pub fn seed(&mut self) -> Result<Context, ModelError> {
		let ordered = self.table.ordered_contexts();
		if ordered.is_empty() {
			return Err(ModelError::EmptyModel);
		}
		let context = ordered[self.rng.random_range(0..ordered.len())].clone();
		self.context = Some(context.clone());
		self.newest_emitted = false;
		Ok(context)
	}

	/// Starts (or restarts) the walk at a caller-chosen context.
	///
	/// The context does not have to be present in the table; an untrained
	/// one simply stalls on the first [`advance`](Self::advance).
	///
	/// # Errors
	/// Returns [`ModelError::OrderMismatch`] if the context's order does
	/// not match the table's.
	pub fn seed_with(&mut self, context: Context) -> Result<(), ModelError> {
		if context.order() != self.table.order() {
			return Err(ModelError::OrderMismatch {
				expected: self.table.order(),
				found: context.order(),
			});
		}
		self.context = Some(context);
		self.newest_emitted = false;
		Ok(())
	}

	/// Samples the next token from the current context's distribution and
	/// shifts the context onto it.
	///
	/// Draws `r` uniformly from `[0, 1)` and selects the first entry whose
	/// cumulative probability reaches `r`, clamping to the last entry so
	/// floating-point drift in the final cumulative value cannot push the
	/// selection out of range.
	///
	/// Returns `Ok(None)` without touching the context when the current
	/// context has no trained distribution: the walk stalls rather than
	/// failing. After training this is practically unreachable, since every
	/// recorded context has at least one successor.
	///
	/// # Errors
	/// Returns [`ModelError::NotSeeded`] if the walk was never seeded.
	pub fn advance(&mut self) -> Result<Option<Token>, ModelError> {
		let context = self.context.as_mut().ok_or(ModelError::NotSeeded)?;

		let Some(distribution) = self.table.distribution(context) else {
			return Ok(None);
		};
		let Some(last) = distribution.last() else {
			return Ok(None);
		};

		let r: f64 = self.rng.random_range(0.0..1.0);
		let selected = distribution
			.iter()
			.find(|entry| entry.cumulative >= r)
			.unwrap_or(last);

		let token = selected.token.clone();
		context.shift(token.clone());
		Ok(Some(token))
	}

	/// Pulls up to `count` tokens, seeding first if the walk never started.
	///
	/// Follows the emission convention: the first pulled token of a fresh
	/// walk is the seed context's newest token. Returns fewer than `count`
	/// tokens only if the walk stalls on an untrained context.
	///
	/// # Errors
	/// Returns [`ModelError::EmptyModel`] if seeding is needed and the
	/// table is empty.
	pub fn generate(&mut self, count: usize) -> Result<Vec<Token>, ModelError> {
		if count > 0 && self.context.is_none() {
			self.seed()?;
		}

		let mut tokens = Vec::with_capacity(count);
		while tokens.len() < count {
			match self.step()? {
				Some(token) => tokens.push(token),
				None => break,
			}
		}
		Ok(tokens)
	}

	/// One emission step: the not-yet-emitted newest token if there is one,
	/// otherwise a sampling advance.
	fn step(&mut self) -> Result<Option<Token>, ModelError> {
		if !self.newest_emitted {
			let context = self.context.as_ref().ok_or(ModelError::NotSeeded)?;
			self.newest_emitted = true;
			return Ok(Some(context.newest().clone()));
		}
		self.advance()
	}
}

/// The lazy, pull-based token stream.
///
/// Seeds on the first pull if needed. The stream ends when the walk stalls
/// on an untrained context, and is empty for an empty model; callers that
/// need the [`ModelError::EmptyModel`] error call [`Generator::seed`]
/// themselves.
impl Iterator for Generator<'_> {
	type Item = Token;

	fn next(&mut self) -> Option<Token> {
		if self.context.is_none() {
			self.seed().ok()?;
		}
		self.step().ok().flatten()
	}
}
