//! Parsing and resolving of string templates with embedded placeholders.
//!
//! A template is a string like `"Hello ${name}!"` whose placeholders are
//! replaced with values computed by a caller-supplied lookup. Parsing is
//! total: every input is a valid template, and placeholders that cannot be
//! resolved keep their original text instead of failing.
//!
//! # Features
//!
//! * Configurable placeholder delimiters and escaping ([`Interpolation`]),
//!   including formats with equal opening and closing sequences and formats
//!   closed by a character predicate.
//! * Lazy fragment parsing ([`TokenParser`]) and parsed template trees
//!   ([`Template`]) with a lossless round trip back to the source text.
//! * Variable sources ranging from maps and slices to custom functions
//!   ([`Resolver`]).
//! * Recursive resolution over referenced templates with dependency cycle
//!   detection and optional thread-safe caching ([`Recursion`]).
//!
//! # Examples
//!
//! The [`resolve()`] function substitutes placeholders of the
//! [standard][Interpolation::standard] format in one pass. The variables can
//! be a [`HashMap`][std::collections::HashMap], a
//! [`BTreeMap`][std::collections::BTreeMap], a slice of pairs or any other
//! [`Resolver`].
//!
//! ```
//! # use std::collections::HashMap;
//! let mut variables = HashMap::new();
//! variables.insert("name", "Kitty");
//! variables.insert("color", "pink");
//!
//! let resolved = interpol::resolve("Hello ${name}! Do you like ${color}?", &variables);
//! assert_eq!(resolved, "Hello Kitty! Do you like pink?");
//!
//! // Unknown placeholders and escaped openings keep their text.
//! assert_eq!(interpol::resolve("And ${meal}?", &variables), "And ${meal}?");
//! assert_eq!(interpol::resolve("Pay $${cash}!", &variables), "Pay ${cash}!");
//! ```
//!
//! Templates may refer to other templates; a [`Recursion`] resolver follows
//! such references transitively and detects dependency cycles.
//!
//! ```
//! # fn main() -> Result<(), interpol::ResolveError> {
//! # use std::collections::HashMap;
//! use interpol::Recursion;
//!
//! let mut templates = HashMap::new();
//! templates.insert("host", "localhost");
//! templates.insert("url", "https://${host}/index.html");
//!
//! let resolver = Recursion::with_templates(move |name| {
//!     templates.get(name).map(|text| text.to_string())
//! })
//! .build();
//!
//! assert_eq!(resolver.apply("url")?, Some("https://localhost/index.html".to_string()));
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs, missing_debug_implementations)]

pub mod error;
pub use error::{FormatError, NoEscaping, ResolveError, SyntaxError};

mod format;
pub use format::{Closing, Interpolation};

mod map;
pub use map::*;

mod parser;
pub use parser::{Fragment, TokenParser};

pub mod recursion;
pub use recursion::{Binding, Recursion, Resolved, Source};

mod source;
pub use source::{is_literal, SourceText};

mod template;
pub use template::Template;

mod token;
pub use token::{Symbol, Token, TokenScanner};

mod features;

/// Resolves a template in the [standard][Interpolation::standard] format.
///
/// Placeholders have the form `${reference}` and `$${` escapes a literal
/// `${`. References unknown to `variables` keep their original text.
///
/// You can pass a [`HashMap`][std::collections::HashMap], a
/// [`BTreeMap`][std::collections::BTreeMap], a slice of key-value pairs or
/// any other [`Resolver`] as the `variables` parameter.
pub fn resolve<'a, M>(input: &str, variables: &'a M) -> String
where
	M: Resolver<'a> + ?Sized,
	M::Value: AsRef<str>,
{
	Interpolation::standard().resolve(input, variables)
}
