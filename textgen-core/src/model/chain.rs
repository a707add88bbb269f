use super::context::Token;
use super::error::ModelError;
use super::frequency_table::FrequencyTable;
use super::generator::Generator;
use super::probability_table::ProbabilityTable;
use super::window::ObservationWindow;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A fixed-order Markov chain: one frequency table, one probability table
/// and one random source.
///
/// # Lifecycle
/// Constructed empty, populated by zero or more training passes (each pass
/// owns its own window, so documents never leak context into each other),
/// finalized exactly once, then queried any number of times. Training after
/// finalization is an error; so is querying probabilities before it.
///
/// # Responsibilities
/// - Drive the window/frequency-table bookkeeping for each document
/// - Absorb partial tables built elsewhere (parallel training)
/// - Perform the one-time conversion of counts into probabilities
/// - Hand out generators that read the finalized table
#[derive(Debug)]
pub struct MarkovChain {
	order: usize,
	counts: FrequencyTable,
	probabilities: Option<ProbabilityTable>,
	rng: StdRng,
}

/// On-disk form of a trained chain. The random source is not part of it; a
/// loaded chain gets a fresh OS-seeded one.
#[derive(Serialize)]
struct StoredChainRef<'a> {
	order: usize,
	counts: &'a FrequencyTable,
	probabilities: &'a Option<ProbabilityTable>,
}

#[derive(Deserialize)]
struct StoredChain {
	order: usize,
	counts: FrequencyTable,
	probabilities: Option<ProbabilityTable>,
}

impl MarkovChain {
	/// Creates an empty chain of the given order, with a random source
	/// seeded from the operating system.
	///
	/// # Errors
	/// Returns [`ModelError::InvalidOrder`] if `order` is zero.
	pub fn new(order: usize) -> Result<Self, ModelError> {
		Self::with_rng(order, StdRng::from_os_rng())
	}

	/// Creates an empty chain with a deterministic random source.
	///
	/// Two chains built with the same seed and the same training input
	/// produce identical generated sequences.
	pub fn with_seed(order: usize, seed: u64) -> Result<Self, ModelError> {
		Self::with_rng(order, StdRng::seed_from_u64(seed))
	}

	fn with_rng(order: usize, rng: StdRng) -> Result<Self, ModelError> {
		if order == 0 {
			return Err(ModelError::InvalidOrder);
		}
		Ok(Self {
			order,
			counts: FrequencyTable::new(order),
			probabilities: None,
			rng,
		})
	}

	/// The order N of this chain.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Whether [`finalize`](Self::finalize) already ran.
	pub fn is_finalized(&self) -> bool {
		self.probabilities.is_some()
	}

	/// Trains on one document's token stream.
	///
	/// A fresh window is used for the call, so no context crosses a
	/// document boundary. The first N tokens of the document only fill the
	/// window; every later token is recorded as the successor of the
	/// context preceding it. Returns the number of recorded observations
	/// (zero for a document shorter than N+1 tokens, which is harmless).
	///
	/// # Errors
	/// Returns [`ModelError::AlreadyFinalized`] after finalization.
	pub fn train_document<I>(&mut self, tokens: I) -> Result<usize, ModelError>
	where
		I: IntoIterator<Item = Token>,
	{
		if self.is_finalized() {
			return Err(ModelError::AlreadyFinalized);
		}

		let mut window = ObservationWindow::new(self.order);
		let mut recorded = 0;
		for token in tokens {
			if let Some(context) = window.slide(&token) {
				self.counts.observe(context, token);
				recorded += 1;
			}
		}
		Ok(recorded)
	}

	/// Absorbs a frequency table built elsewhere, summing counts.
	///
	/// This is the merge point for parallel training: partial tables built
	/// on separate threads are combined here.
	///
	/// # Errors
	/// - [`ModelError::AlreadyFinalized`] after finalization
	/// - [`ModelError::OrderMismatch`] if the orders differ
	pub fn merge_counts(&mut self, other: FrequencyTable) -> Result<(), ModelError> {
		if self.is_finalized() {
			return Err(ModelError::AlreadyFinalized);
		}
		self.counts.merge(other)
	}

	/// Converts the accumulated counts into cumulative distributions.
	///
	/// Irreversible: afterwards the chain accepts no further training. A
	/// chain with zero observations finalizes without error into an empty
	/// probability table; seeding a generator from it reports
	/// [`ModelError::EmptyModel`].
	///
	/// # Errors
	/// Returns [`ModelError::AlreadyFinalized`] on a second call.
	pub fn finalize(&mut self) -> Result<(), ModelError> {
		if self.is_finalized() {
			return Err(ModelError::AlreadyFinalized);
		}
		log::debug!(
			"finalizing order-{} chain with {} contexts",
			self.order,
			self.counts.len()
		);
		self.probabilities = Some(ProbabilityTable::finalize(&self.counts));
		Ok(())
	}

	/// The raw occurrence counts. Frozen once the chain is finalized.
	pub fn counts(&self) -> &FrequencyTable {
		&self.counts
	}

	/// The finalized probability table.
	///
	/// # Errors
	/// Returns [`ModelError::NotFinalized`] before finalization.
	pub fn probabilities(&self) -> Result<&ProbabilityTable, ModelError> {
		self.probabilities.as_ref().ok_or(ModelError::NotFinalized)
	}

	/// Creates a generator over the finalized table.
	///
	/// The generator gets its own random source, forked from the chain's,
	/// and its own context; generators never mutate the chain.
	///
	/// # Errors
	/// Returns [`ModelError::NotFinalized`] before finalization.
	pub fn generator(&mut self) -> Result<Generator<'_>, ModelError> {
		let rng = StdRng::from_rng(&mut self.rng);
		let table = self.probabilities.as_ref().ok_or(ModelError::NotFinalized)?;
		Ok(Generator::new(table, rng))
	}

	/// Serializes the chain (order, counts, probabilities) to a file.
	///
	/// Uses the compact `postcard` wire format.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
		let stored = StoredChainRef {
			order: self.order,
			counts: &self.counts,
			probabilities: &self.probabilities,
		};
		let bytes = postcard::to_stdvec(&stored)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}

	/// Deserializes a chain previously written by [`save`](Self::save).
	///
	/// The loaded chain keeps its training state (finalized or not) and
	/// gets a fresh OS-seeded random source.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
		let bytes = std::fs::read(path)?;
		let stored: StoredChain = postcard::from_bytes(&bytes)?;
		if stored.order == 0 {
			return Err(Box::new(ModelError::InvalidOrder));
		}
		Ok(Self {
			order: stored.order,
			counts: stored.counts,
			probabilities: stored.probabilities,
			rng: StdRng::from_os_rng(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::context::Context;

	fn tokens(words: &[&str]) -> Vec<Token> {
		words.iter().map(|w| w.to_string()).collect()
	}

	fn context(words: &[&str]) -> Context {
		Context::new(words.iter().map(|w| w.to_string()).collect())
	}

	#[test]
	fn order_zero_is_rejected() {
		assert!(matches!(MarkovChain::new(0), Err(ModelError::InvalidOrder)));
	}

	#[test]
	fn single_document_order_one_example() {
		let mut chain = MarkovChain::with_seed(1, 0).unwrap();
		let recorded = chain
			.train_document(tokens(&["the", "cat", "sat", "the", "cat", "ran"]))
			.unwrap();
		assert_eq!(recorded, 5);

		let counts = chain.counts();
		assert_eq!(counts.count(&context(&["the"]), "cat"), 2);
		assert_eq!(counts.count(&context(&["cat"]), "sat"), 1);
		assert_eq!(counts.count(&context(&["cat"]), "ran"), 1);
		assert_eq!(counts.count(&context(&["sat"]), "the"), 1);

		chain.finalize().unwrap();
		let distribution = chain
			.probabilities()
			.unwrap()
			.distribution(&context(&["cat"]))
			.unwrap();
		assert_eq!(distribution[0].token, "ran");
		assert!((distribution[0].cumulative - 0.5).abs() < 1e-9);
		assert_eq!(distribution[1].token, "sat");
		assert!((distribution[1].cumulative - 1.0).abs() < 1e-9);
	}

	#[test]
	fn documents_do_not_leak_context_into_each_other() {
		let mut chain = MarkovChain::with_seed(2, 0).unwrap();
		chain.train_document(tokens(&["a", "b", "c"])).unwrap();
		chain.train_document(tokens(&["c", "d", "e"])).unwrap();

		// Exactly one observation per document; nothing spans the boundary.
		let counts = chain.counts();
		assert_eq!(counts.len(), 2);
		assert_eq!(counts.count(&context(&["b", "a"]), "c"), 1);
		assert_eq!(counts.count(&context(&["d", "c"]), "e"), 1);
		assert_eq!(counts.count(&context(&["c", "b"]), "c"), 0);
		assert_eq!(counts.count(&context(&["c", "b"]), "d"), 0);
	}

	#[test]
	fn empty_chain_finalizes_and_reports_empty_model_on_seed() {
		let mut chain = MarkovChain::with_seed(2, 0).unwrap();
		chain.finalize().unwrap();
		assert!(chain.probabilities().unwrap().is_empty());

		let mut generator = chain.generator().unwrap();
		assert_eq!(generator.seed(), Err(ModelError::EmptyModel));
	}

	#[test]
	fn finalization_is_one_shot_and_closes_training() {
		let mut chain = MarkovChain::with_seed(1, 0).unwrap();
		chain.train_document(tokens(&["a", "b"])).unwrap();
		chain.finalize().unwrap();

		assert_eq!(chain.finalize(), Err(ModelError::AlreadyFinalized));
		assert_eq!(
			chain.train_document(tokens(&["c", "d"])),
			Err(ModelError::AlreadyFinalized)
		);
		assert_eq!(
			chain.merge_counts(FrequencyTable::new(1)),
			Err(ModelError::AlreadyFinalized)
		);
	}

	#[test]
	fn probabilities_require_finalization() {
		let mut chain = MarkovChain::with_seed(1, 0).unwrap();
		assert_eq!(chain.probabilities().err(), Some(ModelError::NotFinalized));
		assert!(chain.generator().is_err());
		chain.finalize().unwrap();
		assert!(chain.generator().is_ok());
	}

	#[test]
	fn merge_counts_sums_partial_tables() {
		let mut chain = MarkovChain::with_seed(1, 0).unwrap();
		chain.train_document(tokens(&["a", "b"])).unwrap();

		let mut partial = FrequencyTable::new(1);
		partial.observe(context(&["a"]), "b".to_string());
		chain.merge_counts(partial).unwrap();

		assert_eq!(chain.counts().count(&context(&["a"]), "b"), 2);
	}

	#[test]
	fn same_seed_same_training_same_output() {
		let corpus = tokens(&["the", "cat", "sat", "on", "the", "mat", "the", "cat", "ran"]);

		let mut generate = |seed: u64| {
			let mut chain = MarkovChain::with_seed(2, seed).unwrap();
			chain.train_document(corpus.clone()).unwrap();
			chain.finalize().unwrap();
			let mut generator = chain.generator().unwrap();
			generator.generate(30).unwrap()
		};

		assert_eq!(generate(99), generate(99));
	}

	#[test]
	fn save_and_load_round_trip() {
		let mut chain = MarkovChain::with_seed(1, 0).unwrap();
		chain
			.train_document(tokens(&["the", "cat", "sat", "the", "cat", "ran"]))
			.unwrap();
		chain.finalize().unwrap();

		let path = std::env::temp_dir().join(format!("textgen-chain-{}.bin", std::process::id()));
		chain.save(&path).unwrap();
		let loaded = MarkovChain::load(&path).unwrap();
		std::fs::remove_file(&path).ok();

		assert_eq!(loaded.order(), 1);
		assert!(loaded.is_finalized());
		assert_eq!(loaded.counts().count(&context(&["the"]), "cat"), 2);
		let distribution = loaded
			.probabilities()
			.unwrap()
			.distribution(&context(&["cat"]))
			.unwrap();
		assert_eq!(distribution.len(), 2);
	}
}
