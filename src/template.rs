use crate::error::ResolveError;
use crate::map::Resolver;

/// A parsed template.
///
/// A template partitions its source text into literal, constant and reference
/// fragments. Applying a template substitutes the references with values
/// supplied by a [`Resolver`]; references the resolver does not know keep
/// their original text. The [`Display`][std::fmt::Display] form of a template
/// is its definition, the exact text it was parsed from, so parsing the
/// rendered definition again yields an equal template.
///
/// Templates are immutable and compare structurally.
///
/// # Examples
///
/// ```
/// use interpol::{Interpolation, Template};
///
/// let template = Interpolation::standard().parse("Hello ${name}!");
/// let variables = [("name", "world")];
/// assert_eq!(template.apply(&variables), "Hello world!");
/// assert_eq!(template.to_string(), "Hello ${name}!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Template {
	/// A fragment whose source form equals its resolved value.
	Literal(String),

	/// A fragment whose source form differs from its fixed value, typically
	/// an escaped occurrence of the opening sequence.
	Constant {
		/// The source form, including the escaping sequence.
		definition: String,

		/// The value the constant stands for.
		value: String,
	},

	/// A placeholder to be substituted by a resolver.
	Reference {
		/// The source form, including the delimiters.
		definition: String,

		/// The reference to pass to a resolver.
		reference: String,
	},

	/// A sequence of fragments.
	///
	/// Canonical sequences, as produced by [`Template::sequence`] and by
	/// parsing, contain at least two fragments and no nested sequences.
	Sequence(Vec<Template>),
}

impl Template {
	/// Returns the empty literal.
	pub fn empty() -> Self {
		Self::Literal(String::new())
	}

	/// Creates a literal fragment.
	pub fn literal(value: impl Into<String>) -> Self {
		Self::Literal(value.into())
	}

	/// Creates a constant fragment.
	pub fn constant(definition: impl Into<String>, value: impl Into<String>) -> Self {
		Self::Constant {
			definition: definition.into(),
			value: value.into(),
		}
	}

	/// Creates a reference fragment.
	pub fn reference(definition: impl Into<String>, reference: impl Into<String>) -> Self {
		Self::Reference {
			definition: definition.into(),
			reference: reference.into(),
		}
	}

	/// Combines fragments into their canonical composition.
	///
	/// No fragments compose to the empty literal and a single fragment
	/// composes to itself, so a sequence is only created for two or more
	/// fragments.
	pub fn sequence(mut fragments: Vec<Template>) -> Self {
		if fragments.len() > 1 {
			return Self::Sequence(fragments);
		}

		fragments.pop().unwrap_or_else(Self::empty)
	}

	/// Resolves the template with the given variable source.
	///
	/// References missing from `variables` keep their definition in the
	/// output, so resolving with a source that knows nothing returns the
	/// original template text.
	pub fn apply<'a, M>(&self, variables: &'a M) -> String
	where
		M: Resolver<'a> + ?Sized,
		M::Value: AsRef<str>,
	{
		let mut output = String::new();
		self.append(&mut output, variables);
		output
	}

	/// Resolves the template with a resolver that may abort.
	///
	/// The resolver returns `Ok(None)` to keep a reference unresolved, which
	/// leaves its definition in the output. An error aborts the resolution
	/// and is relayed verbatim.
	pub fn try_apply<F>(&self, resolver: &mut F) -> Result<String, ResolveError>
	where
		F: FnMut(&str) -> Result<Option<String>, ResolveError>,
	{
		let mut output = String::new();
		self.try_append(&mut output, resolver)?;
		Ok(output)
	}

	/// Returns the definition of the template, the exact text it was parsed
	/// from.
	pub fn definition(&self) -> String {
		self.to_string()
	}

	/// Indicates whether the template consists of literal fragments only.
	pub fn is_literal(&self) -> bool {
		match self {
			Self::Literal(_) => true,
			Self::Constant { .. } | Self::Reference { .. } => false,
			Self::Sequence(fragments) => fragments.iter().all(Self::is_literal),
		}
	}

	fn append<'a, M>(&self, output: &mut String, variables: &'a M)
	where
		M: Resolver<'a> + ?Sized,
		M::Value: AsRef<str>,
	{
		match self {
			Self::Literal(value) => output.push_str(value),
			Self::Constant { value, .. } => output.push_str(value),
			Self::Reference { definition, reference } => match variables.get(reference) {
				Some(value) => output.push_str(value.as_ref()),
				None => output.push_str(definition),
			},
			Self::Sequence(fragments) => {
				for fragment in fragments {
					fragment.append(output, variables);
				}
			},
		}
	}

	fn try_append<F>(&self, output: &mut String, resolver: &mut F) -> Result<(), ResolveError>
	where
		F: FnMut(&str) -> Result<Option<String>, ResolveError>,
	{
		match self {
			Self::Literal(value) => output.push_str(value),
			Self::Constant { value, .. } => output.push_str(value),
			Self::Reference { definition, reference } => match resolver(reference)? {
				Some(value) => output.push_str(&value),
				None => output.push_str(definition),
			},
			Self::Sequence(fragments) => {
				for fragment in fragments {
					fragment.try_append(output, resolver)?;
				}
			},
		}

		Ok(())
	}
}

impl std::fmt::Display for Template {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Literal(value) => f.write_str(value),
			Self::Constant { definition, .. } => f.write_str(definition),
			Self::Reference { definition, .. } => f.write_str(definition),
			Self::Sequence(fragments) => {
				for fragment in fragments {
					std::fmt::Display::fmt(fragment, f)?;
				}
				Ok(())
			},
		}
	}
}

#[cfg(test)]
mod test {
	use std::collections::BTreeMap;

	use assert2::{assert, check, let_assert};

	use super::*;
	use crate::map::NoResolution;

	#[test]
	fn test_literal() {
		let template = Template::literal("plain text");
		check!(template.apply(&NoResolution) == "plain text");
		check!(template.to_string() == "plain text");
	}

	#[test]
	fn test_constant() {
		let template = Template::constant("$${", "${");
		check!(template.apply(&NoResolution) == "${");
		check!(template.to_string() == "$${");
	}

	#[test]
	fn test_reference() {
		let template = Template::reference("${name}", "name");

		let mut variables: BTreeMap<&str, &str> = BTreeMap::new();
		check!(template.apply(&variables) == "${name}");

		variables.insert("name", "world");
		check!(template.apply(&variables) == "world");
	}

	#[test]
	fn test_sequence() {
		let template = Template::sequence(vec![
			Template::literal("Hello "),
			Template::reference("${name}", "name"),
			Template::literal("!"),
		]);

		let variables = [("name", "world")];
		check!(template.apply(&variables) == "Hello world!");
		check!(template.apply(&NoResolution) == "Hello ${name}!");
		check!(template.to_string() == "Hello ${name}!");
	}

	#[test]
	fn test_sequence_canonical_form() {
		check!(Template::sequence(Vec::new()) == Template::empty());

		let single = Template::literal("alone");
		check!(Template::sequence(vec![single.clone()]) == single);

		let pair = Template::sequence(vec![Template::literal("a"), Template::literal("b")]);
		let_assert!(Template::Sequence(fragments) = &pair);
		assert!(fragments.len() == 2);
	}

	#[test]
	fn test_try_apply_relays_errors() {
		let template = Template::sequence(vec![
			Template::literal("Hello "),
			Template::reference("${name}", "name"),
		]);

		let_assert!(Err(error) = template.try_apply(&mut |_| Err(ResolveError::new("refused"))));
		check!(error.to_string() == "refused");

		let_assert!(Ok(kept) = template.try_apply(&mut |_| Ok(None)));
		check!(kept == "Hello ${name}");
	}

	#[test]
	fn test_is_literal() {
		check!(Template::literal("text").is_literal());
		check!(!Template::constant("$${", "${").is_literal());
		check!(!Template::reference("${x}", "x").is_literal());

		let mixed = Template::sequence(vec![Template::literal("a"), Template::reference("${x}", "x")]);
		check!(!mixed.is_literal());
	}
}
