//! Corpus ingestion: feeding document files into a chain.
//!
//! Each file is one document: it is read whole, cleaned, tokenized and
//! trained with its own observation window, so no context ever spans two
//! files. An unreadable file is logged and skipped; it never aborts the
//! rest of the run.

use crate::io;
use crate::model::{FrequencyTable, MarkovChain, ModelError, ObservationWindow};
use crate::text::{tokenize, TextCleaner};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

/// Trains the chain on every readable file in `paths`, one document per
/// file, in order.
///
/// # Errors
/// Model lifecycle errors (training a finalized chain) and a failed
/// cleanup-pattern compilation are returned; unreadable files are only
/// logged.
pub fn train_files(
	chain: &mut MarkovChain,
	paths: &[PathBuf],
) -> Result<(), Box<dyn std::error::Error>> {
	let cleaner = TextCleaner::new()?;

	for path in paths {
		log::info!("processing {}...", path.display());
		let raw = match io::read_file(path) {
			Ok(raw) => raw,
			Err(error) => {
				log::warn!("could not read {}, skipping: {}", path.display(), error);
				continue;
			}
		};
		let recorded = chain.train_document(tokenize(&cleaner.clean(&raw)))?;
		log::debug!("{}: {} observations", path.display(), recorded);
	}

	Ok(())
}

/// Builds a frequency table from `paths` using one thread per file chunk.
///
/// The file list is split across the available CPUs; every thread builds a
/// partial table for its chunk, and the partial tables are merged by
/// summing counts. Merge order does not matter, so the result equals a
/// sequential pass over the same files.
///
/// The caller absorbs the result with [`MarkovChain::merge_counts`].
///
/// # Errors
/// Returns [`ModelError::InvalidOrder`] for order zero; merge errors
/// cannot occur since every partial table shares the same order.
pub fn build_counts_parallel(
	order: usize,
	paths: &[PathBuf],
) -> Result<FrequencyTable, ModelError> {
	if order == 0 {
		return Err(ModelError::InvalidOrder);
	}

	let mut merged = FrequencyTable::new(order);
	if paths.is_empty() {
		return Ok(merged);
	}

	let cpus = num_cpus::get().max(1);
	let chunk_size = (paths.len() + cpus - 1) / cpus;

	let (tx, rx) = mpsc::channel();
	for chunk in paths.chunks(chunk_size) {
		let tx = tx.clone();
		let chunk: Vec<PathBuf> = chunk.to_vec();

		thread::spawn(move || {
			let cleaner = TextCleaner::new().expect("cleanup patterns are valid");
			let partial = build_partial_counts(order, &chunk, &cleaner);
			tx.send(partial).expect("Failed to send from thread");
		});
	}
	drop(tx);

	for partial in rx.iter() {
		merged.merge(partial)?;
	}

	Ok(merged)
}

/// One thread's share of the corpus: a fresh window per file, all counts
/// into one partial table.
fn build_partial_counts(order: usize, paths: &[PathBuf], cleaner: &TextCleaner) -> FrequencyTable {
	let mut counts = FrequencyTable::new(order);

	for path in paths {
		let raw = match io::read_file(path) {
			Ok(raw) => raw,
			Err(error) => {
				log::warn!("could not read {}, skipping: {}", path.display(), error);
				continue;
			}
		};
		let cleaned = cleaner.clean(&raw);

		let mut window = ObservationWindow::new(order);
		for token in tokenize(&cleaned) {
			if let Some(context) = window.slide(&token) {
				counts.observe(context, token);
			}
		}
	}

	counts
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	fn scratch_corpus(name: &str, documents: &[&str]) -> (PathBuf, Vec<PathBuf>) {
		let dir = std::env::temp_dir()
			.join(format!("textgen-corpus-{}-{}", name, std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		let mut paths = Vec::new();
		for (index, document) in documents.iter().enumerate() {
			let path = dir.join(format!("doc{}.txt", index));
			fs::write(&path, document).unwrap();
			paths.push(path);
		}
		(dir, paths)
	}

	#[test]
	fn parallel_counts_equal_sequential_counts() {
		let (dir, paths) = scratch_corpus(
			"parity",
			&[
				"The cat sat on the mat. The cat ran.",
				"A dog sat on the mat, and the dog slept.",
				"---\ntitle: noise\n---\nThe <em>third</em> document.",
			],
		);

		let mut chain = MarkovChain::with_seed(2, 0).unwrap();
		train_files(&mut chain, &paths).unwrap();

		let parallel = build_counts_parallel(2, &paths).unwrap();
		assert_eq!(*chain.counts(), parallel);

		fs::remove_dir_all(&dir).ok();
	}

	#[test]
	fn unreadable_files_are_skipped() {
		let (dir, mut paths) = scratch_corpus("skip", &["the cat sat"]);
		paths.push(dir.join("missing.txt"));

		let mut chain = MarkovChain::with_seed(1, 0).unwrap();
		train_files(&mut chain, &paths).unwrap();
		assert_eq!(chain.counts().len(), 2);

		fs::remove_dir_all(&dir).ok();
	}

	#[test]
	fn parallel_rejects_order_zero() {
		assert_eq!(
			build_counts_parallel(0, &[]),
			Err(ModelError::InvalidOrder)
		);
	}
}
