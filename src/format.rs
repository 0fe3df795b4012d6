use crate::error::{FormatError, NoEscaping, ResolveError};
use crate::map::Resolver;
use crate::parser::{Fragment, TokenParser};
use crate::template::Template;
use crate::token::{Symbol, Token, TokenScanner};

/// The closing of a placeholder.
#[derive(Clone)]
pub enum Closing {
	/// The placeholder is closed by the next occurrence of the sequence.
	Sequence(String),

	/// The placeholder extends over the run of characters accepted by the
	/// predicate; the first rejected character (or the end of the input)
	/// closes it without consuming anything.
	Predicate(fn(char) -> bool),
}

impl std::fmt::Debug for Closing {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Sequence(sequence) => f.debug_tuple("Sequence").field(sequence).finish(),
			Self::Predicate(_) => f.write_str("Predicate(..)"),
		}
	}
}

impl PartialEq for Closing {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Sequence(left), Self::Sequence(right)) => left == right,
			// Predicates have no structure to compare, so identity must do.
			(Self::Predicate(left), Self::Predicate(right)) => *left as usize == *right as usize,
			_ => false,
		}
	}
}

impl Eq for Closing {}

/// A template format with configurable placeholder delimiters and escaping.
///
/// A format recognizes placeholders surrounded by an opening sequence and a
/// [`Closing`], with an optional escaping sequence that turns an opening into
/// plain text. The format is total: every input parses as a valid template.
/// An opening without a closing parses as a constant for the opening itself,
/// and an escaped opening parses as a constant for the escaped text.
///
/// Formats are immutable, cheap to clone and compare by their configuration.
///
/// # Examples
///
/// ```
/// use interpol::Interpolation;
///
/// let format = Interpolation::standard();
/// let variables = [("name", "world")];
/// assert_eq!(format.resolve("Hello ${name}!", &variables), "Hello world!");
/// assert_eq!(format.resolve("Escaped $${name}!", &variables), "Escaped ${name}!");
/// assert_eq!(format.resolve("Unknown ${other}!", &variables), "Unknown ${other}!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation {
	/// Placeholder opening.
	opening: String,

	/// Placeholder closing.
	closing: Closing,

	/// Placeholder escaping; empty when the format supports no escaping.
	escaping: String,
}

/// Accepts the characters of a reference of the [reduced][Interpolation::reduced] format.
fn reduced_reference(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

impl Interpolation {
	/// Returns the standard format: `${reference}` with `$` as the escaping
	/// sequence, so `$${` stands for a plain `${`.
	pub fn standard() -> Self {
		Self {
			opening: "${".to_owned(),
			closing: Closing::Sequence("}".to_owned()),
			escaping: "$".to_owned(),
		}
	}

	/// Returns the reduced format: `$reference` where a reference is a run of
	/// ASCII letters, digits and underscores, with a doubled `$` standing for
	/// a plain `$`.
	pub fn reduced() -> Self {
		Self {
			opening: "$".to_owned(),
			closing: Closing::Predicate(reduced_reference),
			escaping: "$".to_owned(),
		}
	}

	/// Creates a format with bracketing sequences and escaping.
	///
	/// All sequences must be non-empty. The escaping sequence must either
	/// equal the opening (escaping by doubling) or contain no occurrence of
	/// the opening.
	pub fn bracketed(
		opening: impl Into<String>,
		closing: impl Into<String>,
		escaping: impl Into<String>,
	) -> Result<Self, FormatError> {
		Self::escaped(opening.into(), Closing::Sequence(closing.into()), escaping.into())
	}

	/// Creates a format with bracketing sequences and no escaping.
	///
	/// Both sequences must be non-empty. [`constant()`][Self::constant] fails
	/// for such a format.
	pub fn bracketed_unescaped(opening: impl Into<String>, closing: impl Into<String>) -> Result<Self, FormatError> {
		Self::checked(opening.into(), Closing::Sequence(closing.into()), String::new())
	}

	/// Creates a format with an opening sequence, a closing predicate and
	/// escaping.
	///
	/// The opening and escaping sequences must be non-empty and the escaping
	/// sequence must either equal the opening or contain no occurrence of it.
	pub fn prefixed(
		opening: impl Into<String>,
		closing: fn(char) -> bool,
		escaping: impl Into<String>,
	) -> Result<Self, FormatError> {
		Self::escaped(opening.into(), Closing::Predicate(closing), escaping.into())
	}

	/// Creates a format with an opening sequence, a closing predicate and no
	/// escaping.
	pub fn prefixed_unescaped(opening: impl Into<String>, closing: fn(char) -> bool) -> Result<Self, FormatError> {
		Self::checked(opening.into(), Closing::Predicate(closing), String::new())
	}

	fn escaped(opening: String, closing: Closing, escaping: String) -> Result<Self, FormatError> {
		if escaping.is_empty() {
			return Err(FormatError::EmptyEscaping);
		}

		Self::checked(opening, closing, escaping)
	}

	fn checked(opening: String, closing: Closing, escaping: String) -> Result<Self, FormatError> {
		if opening.is_empty() {
			return Err(FormatError::EmptyOpening);
		}

		if let Closing::Sequence(closing) = &closing {
			if closing.is_empty() {
				return Err(FormatError::EmptyClosing);
			}
		}

		if !escaping.is_empty() && escaping != opening && escaping.contains(&opening) {
			return Err(FormatError::EscapingContainsOpening { escaping, opening });
		}

		Ok(Self {
			opening,
			closing,
			escaping,
		})
	}

	/// Returns the opening sequence.
	#[inline]
	pub fn opening(&self) -> &str {
		&self.opening
	}

	/// Returns the closing.
	#[inline]
	pub fn closing(&self) -> &Closing {
		&self.closing
	}

	/// Returns the escaping sequence, if the format has one.
	#[inline]
	pub fn escaping(&self) -> Option<&str> {
		(!self.escaping.is_empty()).then_some(self.escaping.as_str())
	}

	/// Returns a parser emitting the fragments of the input.
	pub fn parser<'a>(&self, input: &'a str) -> TokenParser<'a, &Interpolation> {
		TokenParser::new(self, input)
	}

	/// Parses the input into a template.
	///
	/// Every input is a valid template of this format, and the parsed
	/// template keeps the input as its definition:
	/// `format.parse(input).definition() == input`.
	pub fn parse(&self, input: &str) -> Template {
		Template::sequence(self.parser(input).map(Fragment::into_template).collect())
	}

	/// Resolves the input in a single pass.
	///
	/// Behaves like `parse(input).apply(variables)` without building the
	/// intermediate template; each fragment is appended to the output as it
	/// is parsed. References unknown to `variables` keep their original text.
	pub fn resolve<'a, M>(&self, input: &str, variables: &'a M) -> String
	where
		M: Resolver<'a> + ?Sized,
		M::Value: AsRef<str>,
	{
		let mut output = String::with_capacity(input.len() + input.len() / 8);
		for fragment in self.parser(input) {
			match fragment {
				Fragment::Literal(value) => output.push_str(value),
				Fragment::Constant { value, .. } => output.push_str(value),
				Fragment::Reference { definition, reference } => match variables.get(reference) {
					Some(value) => output.push_str(value.as_ref()),
					None => output.push_str(definition),
				},
			}
		}

		output
	}

	/// Resolves the input in a single pass with a resolver that may abort.
	///
	/// The resolver returns `Ok(None)` to keep a reference unresolved; an
	/// error aborts the resolution and is relayed verbatim.
	pub fn try_resolve<F>(&self, input: &str, mut resolver: F) -> Result<String, ResolveError>
	where
		F: FnMut(&str) -> Result<Option<String>, ResolveError>,
	{
		let mut output = String::with_capacity(input.len() + input.len() / 8);
		for fragment in self.parser(input) {
			match fragment {
				Fragment::Literal(value) => output.push_str(value),
				Fragment::Constant { value, .. } => output.push_str(value),
				Fragment::Reference { definition, reference } => match resolver(reference)? {
					Some(value) => output.push_str(&value),
					None => output.push_str(definition),
				},
			}
		}

		Ok(output)
	}

	/// Escapes the input so that it parses as a constant of this format.
	///
	/// Parsing the result yields a template that resolves to the input with
	/// any resolver: `format.resolve(format.constant(s)?, _) == s`. Fails for
	/// a format without an escaping sequence.
	pub fn constant(&self, string: &str) -> Result<String, NoEscaping> {
		if self.escaping.is_empty() {
			return Err(NoEscaping);
		}

		if !string.contains(&self.opening) {
			return Ok(string.to_owned());
		}

		let mut replacement = String::with_capacity(self.escaping.len() + self.opening.len());
		replacement.push_str(&self.escaping);
		replacement.push_str(&self.opening);
		Ok(string.replace(&self.opening, &replacement))
	}

	/// Escapes the input if the format supports escaping.
	pub fn reproduction(&self, string: &str) -> Option<String> {
		self.constant(string).ok()
	}

	/// Indicates whether the position starts with the escaping sequence
	/// followed by the opening sequence.
	fn escaped_opening_at(&self, input: &str, at: usize) -> bool {
		!self.escaping.is_empty()
			&& input[at..].starts_with(&self.escaping)
			&& input[at + self.escaping.len()..].starts_with(&self.opening)
	}
}

impl TokenScanner for Interpolation {
	fn find<'a>(&self, input: &'a str, offset: usize) -> Option<Token<Symbol<'a>>> {
		let opening_at = find_sequence(input, &self.opening, offset)?;
		let after_opening = opening_at + self.opening.len();

		if !self.escaping.is_empty() {
			if self.escaping == self.opening {
				// A doubled opening escapes itself; the test must look forward,
				// as backward matching would conflate the escape with the
				// preceding input.
				if input[after_opening..].starts_with(&self.opening) {
					let done = after_opening + self.opening.len();
					let symbol = Symbol::constant(&input[opening_at..done], &input[opening_at..after_opening]);
					return Some(Token::new(symbol, opening_at, done));
				}
			} else if opening_at >= offset + self.escaping.len()
				&& input.as_bytes()[opening_at - self.escaping.len()..opening_at] == *self.escaping.as_bytes()
			{
				let start = opening_at - self.escaping.len();
				let symbol = Symbol::constant(&input[start..after_opening], &input[opening_at..after_opening]);
				return Some(Token::new(symbol, start, after_opening));
			}
		}

		match &self.closing {
			Closing::Sequence(closing) => match find_sequence(input, closing, after_opening) {
				Some(closing_at) => {
					let done = closing_at + closing.len();
					let symbol = Symbol::reference(&input[opening_at..done], &input[after_opening..closing_at]);
					Some(Token::new(symbol, opening_at, done))
				},
				None => {
					// A dangling opening reduces to a constant for itself.
					let symbol = Symbol::constant(&input[opening_at..after_opening], &input[opening_at..after_opening]);
					Some(Token::new(symbol, opening_at, after_opening))
				},
			},
			Closing::Predicate(accept) => {
				let mut closing_at = input.len();
				for (index, c) in input[after_opening..].char_indices() {
					let at = after_opening + index;
					if !accept(c) || input[at..].starts_with(&self.opening) || self.escaped_opening_at(input, at) {
						closing_at = at;
						break;
					}
				}

				let symbol = Symbol::reference(&input[opening_at..closing_at], &input[after_opening..closing_at]);
				Some(Token::new(symbol, opening_at, closing_at))
			},
		}
	}
}

/// Finds the first occurrence of a non-empty sequence at or after the offset.
fn find_sequence(input: &str, sequence: &str, offset: usize) -> Option<usize> {
	memchr::memmem::find(&input.as_bytes()[offset..], sequence.as_bytes()).map(|found| offset + found)
}

#[cfg(test)]
mod test {
	use assert2::{assert, check, let_assert};

	use super::*;
	use crate::error::FormatError;
	use crate::map::{from_fn, NoResolution};

	/// Checks parsing and resolving with a resolver that upper-cases references.
	#[track_caller]
	fn check_resolve(format: &Interpolation, template: &str, resolution: &str) {
		let upper = from_fn(|reference: &str| Some(reference.to_uppercase()));
		assert!(format.parse(template).apply(&upper) == resolution, "template: {template:?}");
		assert!(format.resolve(template, &upper) == resolution, "template: {template:?}");
	}

	/// Checks escaping a template into a constant and the round trip back.
	#[track_caller]
	fn check_constant(format: &Interpolation, template: &str, constant: &str) {
		match format.reproduction(template) {
			Some(reproduction) => {
				assert!(reproduction == constant, "template: {template:?}");
				let_assert!(Ok(escaped) = format.constant(template));
				assert!(escaped == constant);
			},
			None => {
				let_assert!(Err(NoEscaping { .. }) = format.constant(template));
			},
		}

		// The constant must parse losslessly and resolve back to the template.
		assert!(format.parse(constant).to_string() == constant, "constant: {constant:?}");
		assert!(format.resolve(constant, &NoResolution) == template, "constant: {constant:?}");
	}

	#[test]
	fn test_standard_constants() {
		let format = Interpolation::standard();
		for (template, constant) in [
			("", ""),
			("literal", "literal"),
			("${reference}", "$${reference}"),
			("$${constant}", "$$${constant}"),
			("Prefixed ${reference}", "Prefixed $${reference}"),
			("Prefixed $${constant}", "Prefixed $$${constant}"),
			("${reference} with suffix", "$${reference} with suffix"),
			("$${constant} with suffix", "$$${constant} with suffix"),
			("Infixed ${reference}.", "Infixed $${reference}."),
			("Infixed $${constant}.", "Infixed $$${constant}."),
			("A $${constant} and ${reference}.", "A $$${constant} and $${reference}."),
			("Half-open $${constant", "Half-open $$${constant"),
			("Half-open ${reference", "Half-open $${reference"),
			("Half-open $${constant and ${more}", "Half-open $$${constant and $${more}"),
			("Unintended ${reference and ${more}", "Unintended $${reference and $${more}"),
		] {
			check_constant(&format, template, constant);
		}
	}

	#[test]
	fn test_custom_constants() {
		let_assert!(Ok(format) = Interpolation::bracketed("~", "~", "!"));
		for (template, constant) in [
			("", ""),
			("literal", "literal"),
			("~reference~", "!~reference!~"),
			("!~constant!~", "!!~constant!!~"),
			("Prefixed ~reference~", "Prefixed !~reference!~"),
			("A !~constant!~ and ~reference~.", "A !!~constant!!~ and !~reference!~."),
			("Half-open !~constant", "Half-open !!~constant"),
			("Half-open ~reference", "Half-open !~reference"),
			("Half-open !~constant and ~more~", "Half-open !!~constant and !~more!~"),
			("Half-open ~reference and ~more~", "Half-open !~reference and !~more!~"),
		] {
			check_constant(&format, template, constant);
		}
	}

	#[test]
	fn test_unescapable_constants() {
		let_assert!(Ok(format) = Interpolation::bracketed_unescaped("%", "%"));
		check!(format.reproduction("anything") == None);
		let_assert!(Err(NoEscaping { .. }) = format.constant("anything"));

		// Inputs without placeholders still round trip as themselves.
		for (template, constant) in [
			("", ""),
			("literal", "literal"),
			("%reference%", "%reference%"),
			("Half-open %reference", "Half-open %reference"),
			("Unintended %reference and %more%", "Unintended %reference and %more%"),
		] {
			assert!(format.parse(constant).to_string() == constant);
			assert!(format.resolve(template, &NoResolution) == constant);
		}
	}

	#[test]
	fn test_standard_resolve() {
		let format = Interpolation::standard();
		for (template, resolution) in [
			("", ""),
			("literal", "literal"),
			("${reference}", "REFERENCE"),
			("$${constant}", "${constant}"),
			("Prefixed ${reference}", "Prefixed REFERENCE"),
			("Prefixed $${constant}", "Prefixed ${constant}"),
			("${reference} with suffix", "REFERENCE with suffix"),
			("$${constant} with suffix", "${constant} with suffix"),
			("Infixed ${reference}.", "Infixed REFERENCE."),
			("Infixed $${constant}.", "Infixed ${constant}."),
			("A $${constant} and ${reference}.", "A ${constant} and REFERENCE."),
			("Surrounded$${constant}.", "Surrounded${constant}."),
			("Surrounded${reference}.", "SurroundedREFERENCE."),
			("Surrounded$${constant}${reference}.", "Surrounded${constant}REFERENCE."),
			("Half-open $${constant", "Half-open ${constant"),
			("Half-open ${reference", "Half-open ${reference"),
			("Half-open $${constant and ${more}", "Half-open ${constant and MORE"),
			("Unintended ${reference and ${more}", "Unintended REFERENCE AND ${MORE"),
			("No ${reference on dot${net}", "No REFERENCE ON DOT${NET"),
		] {
			check_resolve(&format, template, resolution);
		}
	}

	#[test]
	fn test_reduced_resolve() {
		let format = Interpolation::reduced();
		for (template, resolution) in [
			("", ""),
			("literal", "literal"),
			("$reference", "REFERENCE"),
			("$$constant", "$constant"),
			("Prefixed $reference", "Prefixed REFERENCE"),
			("Prefixed $$constant", "Prefixed $constant"),
			("$reference with suffix", "REFERENCE with suffix"),
			("$$constant with suffix", "$constant with suffix"),
			("Infixed $reference.", "Infixed REFERENCE."),
			("Infixed $$constant.", "Infixed $constant."),
			("A $$constant and $reference.", "A $constant and REFERENCE."),
			("Surrounded$$constant.", "Surrounded$constant."),
			("Surrounded$reference.", "SurroundedREFERENCE."),
			("Surrounded$$constant$reference.", "Surrounded$constantREFERENCE."),
		] {
			check_resolve(&format, template, resolution);
		}
	}

	#[test]
	fn test_custom_resolve_with_brackets() {
		let_assert!(Ok(format) = Interpolation::bracketed("~", "~", "!"));
		for (template, resolution) in [
			("", ""),
			("literal", "literal"),
			("~reference~", "REFERENCE"),
			("!~constant!~", "~constant~"),
			("A !~constant!~ and ~reference~.", "A ~constant~ and REFERENCE."),
			("Surrounded!~constant!~~reference~.", "Surrounded~constant~REFERENCE."),
			("Half-open !~constant", "Half-open ~constant"),
			("Half-open ~reference", "Half-open ~reference"),
			("Unintended ~reference and ~more~", "Unintended REFERENCE AND more~"),
			("No ~reference on dot~net~", "No REFERENCE ON DOTnet~"),
		] {
			check_resolve(&format, template, resolution);
		}
	}

	#[test]
	fn test_custom_resolve_with_predicate() {
		let_assert!(Ok(format) = Interpolation::prefixed("~", |c| !c.is_whitespace(), "!"));
		for (template, resolution) in [
			("", ""),
			("literal", "literal"),
			("~reference", "REFERENCE"),
			("!~constant", "~constant"),
			("Prefixed ~reference", "Prefixed REFERENCE"),
			("Prefixed !~constant", "Prefixed ~constant"),
			("A !~constant and ~reference.", "A ~constant and REFERENCE."),
			("Some !~special-constant.", "Some ~special-constant."),
			("Some ~special-reference.", "Some SPECIAL-REFERENCE."),
			("Surrounded!~constant~reference.", "Surrounded~constantREFERENCE."),
			("Surrounded~reference!~constant.", "SurroundedREFERENCE~constant."),
			("Surrounded~reference~more.", "SurroundedREFERENCEMORE."),
			("A ~reference and ~empty one~", "A REFERENCE and EMPTY one"),
			("A !~constant and !~empty one~", "A ~constant and ~empty one"),
		] {
			check_resolve(&format, template, resolution);
		}
	}

	#[test]
	fn test_unescapable_resolve() {
		let_assert!(Ok(format) = Interpolation::bracketed_unescaped("%", "%"));
		for (template, resolution) in [
			("", ""),
			("literal", "literal"),
			("%reference%", "REFERENCE"),
			("Surrounded%reference%.", "SurroundedREFERENCE."),
			("Half-open %reference", "Half-open %reference"),
			("Unintended %reference and %more%", "Unintended REFERENCE AND more%"),
			("No %reference on dot%net%", "No REFERENCE ON DOTnet%"),
		] {
			check_resolve(&format, template, resolution);
		}
	}

	#[test]
	fn test_construction_errors() {
		let_assert!(Err(FormatError::EmptyOpening) = Interpolation::bracketed("", "}", "$"));
		let_assert!(Err(FormatError::EmptyClosing) = Interpolation::bracketed("${", "", "$"));
		let_assert!(Err(FormatError::EmptyEscaping) = Interpolation::bracketed("${", "}", ""));
		let_assert!(Err(FormatError::EscapingContainsOpening { .. }) = Interpolation::bracketed("%", "%", "%%"));

		// Escaping equal to the opening is the one permitted overlap.
		let_assert!(Ok(_) = Interpolation::bracketed("%", "%", "%"));
		let_assert!(Ok(_) = Interpolation::prefixed("$", |c| c.is_alphanumeric(), "$"));
	}

	#[test]
	fn test_equality() {
		check!(Interpolation::standard() == Interpolation::standard());
		check!(Interpolation::reduced() == Interpolation::reduced());
		check!(Interpolation::standard() != Interpolation::reduced());

		let_assert!(Ok(custom) = Interpolation::bracketed("~", "~", "!"));
		check!(custom == custom.clone());
		check!(custom != Interpolation::standard());
	}

	#[test]
	fn test_accessors() {
		let format = Interpolation::standard();
		check!(format.opening() == "${");
		check!(format.escaping() == Some("$"));
		let_assert!(Closing::Sequence(closing) = format.closing());
		check!(closing == "}");

		let_assert!(Ok(unescaped) = Interpolation::bracketed_unescaped("%", "%"));
		check!(unescaped.escaping() == None);
	}

	#[test]
	fn test_scanner_offsets() {
		let format = Interpolation::standard();

		// The escape test must not look before the scanning offset.
		let input = "$${x}";
		let_assert!(Some(token) = format.find(input, 0));
		check!(token.range() == (0..3));
		check!(token.value().is_constant());

		let_assert!(Some(token) = format.find(input, 1));
		check!(token.range() == (1..5));
		check!(!token.value().is_constant());
		check!(token.value().value() == "x");

		check!(format.find("no placeholders", 0) == None);
		check!(format.find("tail ${x}", 9) == None);
	}
}
