//! Fixed-order Markov chain text generation library.
//!
//! This crate provides a word-level Markov chain system including:
//! - Order-N chains with sliding-window training and one-time finalization
//! - Per-context cumulative distributions and weighted sampling
//! - Restartable, lazily pulled generation walks
//! - Corpus ingestion (cleanup, tokenization, parallel counting)
//! - Prose composition of generated token streams
//!
//! The model layer never touches files or formatting; corpus ingestion and
//! text handling live in their own modules and only exchange token streams
//! with the model.

/// Core Markov chain model: windows, tables, chain lifecycle, generation.
pub mod model;

/// Text collaborators: cleanup, tokenization, output composition.
pub mod text;

/// Corpus ingestion: file-by-file and parallel training.
pub mod corpus;

/// I/O utilities (file loading, path helpers).
pub mod io;
