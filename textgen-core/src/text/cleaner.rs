use regex::Regex;

/// Strips non-prose noise from raw document text before tokenization.
///
/// Corpus files are plain text or Markdown; two kinds of markup get in the
/// way of word statistics and are removed:
/// - a YAML frontmatter block at the very start of the document
/// - HTML tags, replaced by a space so adjacent words stay separated
#[derive(Debug)]
pub struct TextCleaner {
	frontmatter: Regex,
	html_tags: Regex,
}

impl TextCleaner {
	/// Compiles the cleanup patterns.
	pub fn new() -> Result<Self, regex::Error> {
		Ok(Self {
			frontmatter: Regex::new(r"\A---\s*[\r\n]+[\s\S]*?[\r\n]+---\s*")?,
			html_tags: Regex::new(r"<[^>]*>")?,
		})
	}

	/// Returns the cleaned text.
	pub fn clean(&self, raw: &str) -> String {
		let text = self.frontmatter.replace(raw, "");
		self.html_tags.replace_all(&text, " ").into_owned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn frontmatter_is_removed() {
		let cleaner = TextCleaner::new().unwrap();
		let raw = "---\ntitle: A post\ndate: 2024-01-01\n---\nThe actual text.";
		assert_eq!(cleaner.clean(raw), "The actual text.");
	}

	#[test]
	fn html_tags_become_separators() {
		let cleaner = TextCleaner::new().unwrap();
		assert_eq!(cleaner.clean("a<br>b and <em>c</em>"), "a b and  c ");
	}

	#[test]
	fn plain_text_is_untouched() {
		let cleaner = TextCleaner::new().unwrap();
		let raw = "Nothing to clean here. Dashes --- mid-text stay.";
		assert_eq!(cleaner.clean(raw), raw);
	}
}
