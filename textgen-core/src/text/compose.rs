use crate::model::Token;

/// Punctuation that attaches to the preceding word instead of getting a
/// space of its own.
fn attaches(token: &str) -> bool {
	matches!(token, "." | "," | ";" | ":")
}

/// Renders a generated token stream as readable prose.
///
/// Words are joined by single spaces, sentence punctuation attaches to the
/// previous word, and the first word of the output and of every sentence
/// (after a ".") is capitalized.
pub fn compose<I>(tokens: I) -> String
where
	I: IntoIterator<Item = Token>,
{
	let mut out = String::new();
	let mut capitalize_next = true;

	for token in tokens {
		let attached = attaches(&token);
		if !out.is_empty() && !attached {
			out.push(' ');
		}

		if capitalize_next && !attached {
			let mut chars = token.chars();
			if let Some(first) = chars.next() {
				out.extend(first.to_uppercase());
				out.push_str(chars.as_str());
			}
			capitalize_next = false;
		} else {
			out.push_str(&token);
		}

		if token == "." {
			capitalize_next = true;
		}
	}

	out
}
