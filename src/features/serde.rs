use serde::de::Visitor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Interpolation, Template};

struct TemplateVisitor;

impl Visitor<'_> for TemplateVisitor {
	type Value = Template;

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		formatter.write_str("a template string")
	}

	fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
	where
		E: serde::de::Error,
	{
		// The standard format is total, so deserialization cannot fail.
		Ok(Interpolation::standard().parse(v))
	}
}

/// Serializes the template as its definition string.
impl Serialize for Template {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.collect_str(self)
	}
}

/// Deserializes a template by parsing a string with the standard format.
impl<'de> Deserialize<'de> for Template {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_str(TemplateVisitor)
	}
}
