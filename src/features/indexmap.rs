use indexmap::IndexMap;

use crate::Resolver;

impl<'a, V: 'a> Resolver<'a> for IndexMap<&str, V> {
	type Value = &'a V;

	#[inline]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		self.get(reference)
	}
}

impl<'a, V: 'a> Resolver<'a> for IndexMap<String, V> {
	type Value = &'a V;

	#[inline]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		self.get(reference)
	}
}
