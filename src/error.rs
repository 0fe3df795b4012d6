//! Error types of the crate.
//!
//! The bundled interpolation format is total: every input parses as a valid
//! template, and unresolved placeholders keep their original text instead of
//! failing. The types here cover the remaining failure modes: invalid format
//! configurations, syntax errors raised by custom parsing components, and
//! aborts requested by caller-supplied resolution hooks.

/// An error constructing an [`Interpolation`][crate::Interpolation] format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
	/// The opening sequence is empty.
	EmptyOpening,

	/// The closing sequence is empty.
	EmptyClosing,

	/// The escaping sequence is empty.
	EmptyEscaping,

	/// The escaping sequence contains the opening sequence without being equal to it.
	///
	/// Such a format could never emit an escape without also emitting an
	/// opening, so it is rejected at construction time.
	EscapingContainsOpening {
		/// The offending escaping sequence.
		escaping: String,

		/// The opening sequence it contains.
		opening: String,
	},
}

impl std::error::Error for FormatError {}

impl std::fmt::Display for FormatError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::EmptyOpening => {
				write!(f, "Opening sequence must not be empty")
			},
			Self::EmptyClosing => {
				write!(f, "Closing sequence must not be empty")
			},
			Self::EmptyEscaping => {
				write!(f, "Escaping sequence must not be empty")
			},
			Self::EscapingContainsOpening { escaping, opening } => {
				write!(f, "Escaping sequence {escaping:?} must not contain the opening sequence {opening:?}")
			},
		}
	}
}

/// A syntax error reported while parsing a template.
///
/// The bundled interpolation format never produces this error. It exists for
/// custom token scanners and parser callbacks that impose additional
/// constraints on the recognized fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
	/// The position in the input where the error was detected.
	position: usize,

	/// A description of the problem.
	message: String,
}

impl SyntaxError {
	/// Creates a new error for the given input position.
	pub fn new(position: usize, message: impl Into<String>) -> Self {
		Self {
			position,
			message: message.into(),
		}
	}

	/// Returns the position in the input where the error was detected.
	pub fn position(&self) -> usize {
		self.position
	}

	/// Returns the description of the problem.
	pub fn message(&self) -> &str {
		&self.message
	}
}

impl std::error::Error for SyntaxError {}

impl std::fmt::Display for SyntaxError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "Syntax error at position {}: {}", self.position, self.message)
	}
}

/// An error raised by a caller-supplied resolver, linking, lookup or failure
/// handler that chooses to abort a resolution.
///
/// The resolving machinery itself never creates this error: an unresolved
/// placeholder keeps its definition in the output instead. When a hook does
/// return this error, it is relayed verbatim to the caller that started the
/// resolution.
#[derive(Debug)]
pub struct ResolveError {
	inner: ResolveErrorInner,
}

#[derive(Debug)]
enum ResolveErrorInner {
	Message(String),
	Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl ResolveError {
	/// Creates a new error from a message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			inner: ResolveErrorInner::Message(message.into()),
		}
	}

	/// Creates a new error wrapping another error as its source.
	pub fn with_source(error: impl std::error::Error + Send + Sync + 'static) -> Self {
		Self {
			inner: ResolveErrorInner::Custom(Box::new(error)),
		}
	}
}

impl std::error::Error for ResolveError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match &self.inner {
			ResolveErrorInner::Message(_) => None,
			ResolveErrorInner::Custom(error) => Some(error.as_ref()),
		}
	}
}

impl std::fmt::Display for ResolveError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match &self.inner {
			ResolveErrorInner::Message(message) => f.write_str(message),
			ResolveErrorInner::Custom(error) => error.fmt(f),
		}
	}
}

/// The error of [`Interpolation::constant()`][crate::Interpolation::constant]
/// for a format without an escaping sequence.
///
/// Such a format cannot represent an arbitrary string as a constant, because
/// there is no way to escape occurrences of the opening sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct NoEscaping;

impl std::error::Error for NoEscaping {}

impl std::fmt::Display for NoEscaping {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "Format has no escaping sequence")
	}
}

#[cfg(test)]
mod test {
	use assert2::check;

	use super::*;

	#[test]
	fn test_format_error_display() {
		check!(FormatError::EmptyOpening.to_string() == "Opening sequence must not be empty");
		let error = FormatError::EscapingContainsOpening {
			escaping: "%%".into(),
			opening: "%".into(),
		};
		check!(error.to_string() == "Escaping sequence \"%%\" must not contain the opening sequence \"%\"");
	}

	#[test]
	fn test_resolve_error_source() {
		use std::error::Error;

		let plain = ResolveError::new("gave up");
		check!(plain.to_string() == "gave up");
		check!(plain.source().is_none());

		let wrapped = ResolveError::with_source(SyntaxError::new(4, "odd token"));
		check!(wrapped.to_string() == "Syntax error at position 4: odd token");
		check!(wrapped.source().is_some());
	}
}
