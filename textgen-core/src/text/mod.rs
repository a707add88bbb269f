//! Text collaborators around the model: cleanup, tokenization and output
//! composition.
//!
//! None of this carries model logic; the model only sees the finite,
//! ordered token sequence these helpers produce, and generation only hands
//! back tokens for [`compose`] to format.

/// Markup stripping ahead of tokenization.
pub mod cleaner;

/// Rendering generated tokens as prose.
pub mod compose;

/// Splitting cleaned text into word and punctuation tokens.
pub mod tokenizer;

pub use cleaner::TextCleaner;
pub use compose::compose;
pub use tokenizer::tokenize;
