use crate::model::Token;

/// Word characters: ASCII letters, digits and the apostrophe (so
/// contractions like "don't" stay one token).
fn is_word_char(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'\''
}

/// Punctuation the model keeps as tokens of their own.
fn is_punctuation(byte: u8) -> bool {
	matches!(byte, b'.' | b',' | b';' | b':' | b'-')
}

/// Lazy token stream over a cleaned document.
///
/// A token is a maximal run of word characters or a maximal run of
/// punctuation characters; every other byte separates tokens and is
/// dropped. Tokens are lowercased, so "The" and "the" feed the same model
/// entry.
#[derive(Debug)]
pub struct Tokens<'a> {
	text: &'a [u8],
	position: usize,
}

/// Splits a document into lowercased word and punctuation tokens.
pub fn tokenize(text: &str) -> Tokens<'_> {
	Tokens { text: text.as_bytes(), position: 0 }
}

impl Iterator for Tokens<'_> {
	type Item = Token;

	fn next(&mut self) -> Option<Token> {
		// skip separator bytes
		while self.position < self.text.len()
			&& !is_word_char(self.text[self.position])
			&& !is_punctuation(self.text[self.position])
		{
			self.position += 1;
		}

		if self.position >= self.text.len() {
			return None;
		}

		// consume one run of a single class
		let start = self.position;
		let class: fn(u8) -> bool = if is_punctuation(self.text[self.position]) {
			is_punctuation
		} else {
			is_word_char
		};
		while self.position < self.text.len() && class(self.text[self.position]) {
			self.position += 1;
		}

		// runs are pure ASCII, so per-byte lowercasing is safe
		Some(
			self.text[start..self.position]
				.iter()
				.map(|byte| byte.to_ascii_lowercase() as char)
				.collect(),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(text: &str) -> Vec<Token> {
		tokenize(text).collect()
	}

	#[test]
	fn words_are_lowercased_and_punctuation_splits_off() {
		assert_eq!(tokens("The Cat, sat."), vec!["the", "cat", ",", "sat", "."]);
	}

	#[test]
	fn apostrophes_stay_inside_words() {
		assert_eq!(tokens("don't stop"), vec!["don't", "stop"]);
	}

	#[test]
	fn punctuation_runs_form_one_token() {
		assert_eq!(tokens("a -- b"), vec!["a", "--", "b"]);
		assert_eq!(tokens("wait..."), vec!["wait", "..."]);
	}

	#[test]
	fn digits_are_word_characters() {
		assert_eq!(tokens("42 cats"), vec!["42", "cats"]);
	}

	#[test]
	fn unclassified_bytes_separate_tokens() {
		assert_eq!(tokens("a!b?c"), vec!["a", "b", "c"]);
		assert_eq!(tokens("  \n\t "), Vec::<Token>::new());
	}

	#[test]
	fn empty_input_yields_nothing() {
		assert_eq!(tokens(""), Vec::<Token>::new());
	}
}
