use crate::format::Interpolation;
use crate::parser::Fragment;
use crate::template::Template;

/// A template source text together with the information whether it should be
/// treated as a literal or as a template that needs parsing before use.
///
/// The text itself carries no format: the format is supplied by the context
/// using the source, typically when calling
/// [`to_template()`][Self::to_template].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceText {
	/// The source text.
	value: String,

	/// Whether [`Self::value`] should be treated as a literal.
	literal: bool,
}

impl SourceText {
	/// Creates a source for a literal.
	pub fn literal(value: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			literal: true,
		}
	}

	/// Creates a source for a template.
	pub fn template(value: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			literal: false,
		}
	}

	/// Creates a source from the text, marking it a literal when it contains
	/// no symbols of the given format.
	pub fn classify(value: impl Into<String>, format: &Interpolation) -> Self {
		let value = value.into();
		let literal = is_literal(format, &value);
		Self { value, literal }
	}

	/// Returns the source text.
	#[inline]
	pub fn value(&self) -> &str {
		&self.value
	}

	/// Indicates whether this source represents a literal.
	#[inline]
	pub fn is_literal(&self) -> bool {
		self.literal
	}

	/// Indicates whether this source represents a template.
	#[inline]
	pub fn is_template(&self) -> bool {
		!self.literal
	}

	/// Returns the text if this source represents a literal.
	pub fn as_literal(&self) -> Option<&str> {
		self.literal.then_some(self.value.as_str())
	}

	/// Returns the text if this source represents a template.
	pub fn as_template(&self) -> Option<&str> {
		(!self.literal).then_some(self.value.as_str())
	}

	/// Returns the template for this source.
	///
	/// A literal source parses to a literal template regardless of the
	/// format; a template source is parsed with the given format.
	pub fn to_template(&self, format: &Interpolation) -> Template {
		if self.literal {
			Template::literal(self.value.clone())
		} else {
			format.parse(&self.value)
		}
	}
}

impl std::fmt::Display for SourceText {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.write_str(&self.value)
	}
}

/// Tests whether the input consists of literal fragments only under the
/// given format.
///
/// This streams over the parsed fragments without building a template.
pub fn is_literal(format: &Interpolation, input: &str) -> bool {
	format.parser(input).all(|fragment| matches!(fragment, Fragment::Literal(_)))
}

#[cfg(test)]
mod test {
	use assert2::{assert, check};

	use super::*;
	use crate::map::NoResolution;

	#[test]
	fn test_is_literal() {
		let format = Interpolation::standard();
		check!(is_literal(&format, ""));
		check!(is_literal(&format, "no placeholders"));
		check!(!is_literal(&format, "some ${reference}"));
		check!(!is_literal(&format, "an $${escape}"));
		check!(!is_literal(&format, "a half-open ${reference"));
	}

	#[test]
	fn test_classify() {
		let format = Interpolation::standard();

		let literal = SourceText::classify("no placeholders", &format);
		check!(literal.is_literal());
		check!(!literal.is_template());
		check!(literal.as_literal() == Some("no placeholders"));
		check!(literal.as_template() == None);

		let template = SourceText::classify("some ${reference}", &format);
		check!(template.is_template());
		check!(template.as_literal() == None);
		check!(template.as_template() == Some("some ${reference}"));
	}

	#[test]
	fn test_to_template() {
		let format = Interpolation::standard();

		// A literal source keeps its text even when it looks like a template.
		let hidden = SourceText::literal("kept ${as-is}");
		assert!(hidden.to_template(&format) == Template::literal("kept ${as-is}"));
		assert!(hidden.to_template(&format).apply(&NoResolution) == "kept ${as-is}");

		let parsed = SourceText::template("some ${reference}").to_template(&format);
		assert!(parsed == format.parse("some ${reference}"));
	}

	#[test]
	fn test_display() {
		check!(SourceText::literal("text").to_string() == "text");
		check!(SourceText::template("${x}").to_string() == "${x}");
	}
}
