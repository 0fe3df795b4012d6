//! Resolve a settings table whose entries refer to each other.
//!
//! The settings are templates in the standard `${reference}` format. Every
//! entry may refer to other entries; references unknown to the table fall
//! back to the process environment. A reference caught in a dependency cycle
//! is reported inline instead of aborting the whole table.

use std::collections::HashMap;

use interpol::recursion::Source;
use interpol::{Binding, Resolved};

static SETTINGS: &[(&str, &str)] = &[
	("data_dir", "/var/lib/${USER}"),
	("cache_dir", "${data_dir}/cache"),
	("log_file", "${cache_dir}/app.log"),
	("backup_dir", "${data_dir}/backup"),
	// These two depend on each other and cannot be resolved.
	("primary", "${secondary}"),
	("secondary", "${primary}"),
];

pub fn main() {
	let settings: HashMap<String, String> = SETTINGS
		.iter()
		.map(|(key, value)| (key.to_string(), value.to_string()))
		.collect();

	let source = Source::identity()
		.templates(move |reference: &String| Ok(settings.get(reference).cloned()))
		.fallback(|reference: &String| Ok(std::env::var(reference).ok()));

	let resolver = source
		.builder()
		.on_recursion_failure(|reference: &String, _binding: &Binding<String>, _resolved: Resolved<'_, String>| {
			Ok(Some(format!("<cycle via {reference}>")))
		})
		.caching(true)
		.build();

	for (key, _) in SETTINGS {
		let resolved = resolver
			.resolve(&key.to_string())
			.expect("the settings table never aborts a resolution");
		println!("{key} = {}", resolved.as_deref().unwrap_or("<unresolved>"));
	}
}
