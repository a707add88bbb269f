use super::context::{Context, Token};

/// Order-N sliding window over the most recently observed tokens.
///
/// One window exists per training pass (one per document), so a context
/// never spans a document boundary. The generator reuses the same shifting
/// discipline through [`Context::shift`]; the window itself is only needed
/// while slots are still filling up.
///
/// # Invariants
/// - Slot 0 always holds the most recent token, slot N-1 the oldest
/// - Slots fill from the newest end; a slot once filled stays filled
/// - A completed context is only reported once every slot is filled
#[derive(Clone, Debug)]
pub struct ObservationWindow {
	/// One slot per position, `None` until a token has reached it.
	slots: Vec<Option<Token>>,
}

impl ObservationWindow {
	/// Creates an empty window of the given order.
	pub fn new(order: usize) -> Self {
		Self { slots: vec![None; order] }
	}

	/// The order N of this window.
	pub fn order(&self) -> usize {
		self.slots.len()
	}

	/// Whether every slot has been filled.
	///
	/// The oldest slot is the last to fill, so checking it is enough.
	pub fn is_full(&self) -> bool {
		self.slots.last().is_some_and(|slot| slot.is_some())
	}

	/// Observes the next token.
	///
	/// If the window is already full, returns the completed context as it
	/// stood *before* this observation; `next` is the token that followed
	/// that context. Then every slot moves one position older, the oldest
	/// token is discarded and `next` takes slot 0.
	///
	/// Returns `None` for the first N tokens of a document: they contribute
	/// to future contexts but are never themselves predicted targets.
	pub fn slide(&mut self, next: &Token) -> Option<Context> {
		let completed = if self.is_full() {
			Some(Context::new(self.slots.iter().flatten().cloned().collect()))
		} else {
			None
		};

		self.slots.pop();
		self.slots.insert(0, Some(next.clone()));

		completed
	}

	/// Empties every slot, ready for a new document.
	pub fn reset(&mut self) {
		self.slots.fill(None);
	}
}
