use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Trait for types that can resolve template references.
///
/// A resolver maps the textual reference of a placeholder to its value, or to
/// [`None`] when the reference is unknown and the placeholder should keep its
/// original text.
pub trait Resolver<'a> {
	/// The type returned by the [`get()`][Self::get] function.
	type Value;

	/// Returns the value of a reference.
	fn get(&'a self, reference: &str) -> Option<Self::Value>;
}

/// Allow using key-value [`slice`]s as [`Resolver`]s.
///
/// # Performance
///
/// For a few key-value pairs, where the keys and values are small,
/// this should be reasonably performant.
///
/// However, for many key-value pairs, or when the keys or values are large,
/// you may get better performance from a [`HashMap`] or [`BTreeMap`].
///
/// # Example
/// ```rust
/// # use interpol::Resolver;
///
/// let contact_info = &[("first_name", "John"), ("last_name", "Doe")];
///
/// assert_eq!(contact_info.get("first_name"), Some(&"John"));
/// assert_eq!(contact_info.get("last_name"), Some(&"Doe"));
/// assert_eq!(contact_info.get("middle_name"), None);
/// ```
impl<'a, K, V> Resolver<'a> for [(K, V)]
where
	K: Borrow<str>,
	V: 'a,
{
	type Value = &'a V;

	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		self.iter().find_map(|(k, v)| (k.borrow() == reference).then_some(v))
	}
}

/// Allow using key-value [`arrays`](`array`) as [`Resolver`]s.
///
/// Delegates to the [`Resolver`] implementation for [`slices`](`slice`).
impl<'a, K, V, const N: usize> Resolver<'a> for [(K, V); N]
where
	K: Borrow<str>,
	V: 'a,
{
	type Value = &'a V;

	#[inline(always)]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		Resolver::get(self.as_slice(), reference)
	}
}

/// Allow using key-value [`Vec`]s as [`Resolver`]s.
///
/// Delegates to the [`Resolver`] implementation for [`slices`](`slice`).
impl<'a, K, V> Resolver<'a> for Vec<(K, V)>
where
	K: Borrow<str>,
	V: 'a,
{
	type Value = &'a V;

	#[inline(always)]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		Resolver::get(self.as_slice(), reference)
	}
}

impl<'a, T> Resolver<'a> for &'_ T
where
	T: ?Sized + Resolver<'a>,
{
	type Value = <T as Resolver<'a>>::Value;

	#[inline(always)]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		T::get(self, reference)
	}
}

impl<'a, T> Resolver<'a> for &'_ mut T
where
	T: ?Sized + Resolver<'a>,
{
	type Value = <T as Resolver<'a>>::Value;

	#[inline(always)]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		T::get(self, reference)
	}
}

impl<'a, T> Resolver<'a> for std::boxed::Box<T>
where
	T: ?Sized + Resolver<'a>,
{
	type Value = <T as Resolver<'a>>::Value;

	#[inline(always)]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		T::get(self, reference)
	}
}

impl<'a, T> Resolver<'a> for std::rc::Rc<T>
where
	T: ?Sized + Resolver<'a>,
{
	type Value = <T as Resolver<'a>>::Value;

	#[inline(always)]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		T::get(self, reference)
	}
}

impl<'a, T> Resolver<'a> for std::sync::Arc<T>
where
	T: ?Sized + Resolver<'a>,
{
	type Value = <T as Resolver<'a>>::Value;

	#[inline(always)]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		T::get(self, reference)
	}
}

/// A resolver that never resolves any reference.
///
/// Resolving a template with it returns the template definition unchanged.
#[derive(Debug)]
pub struct NoResolution;

impl<'a> Resolver<'a> for NoResolution {
	type Value = NeverValue;

	#[inline]
	fn get(&'a self, _reference: &str) -> Option<Self::Value> {
		None
	}
}

/// Value returned by the [`NoResolution`] resolver.
#[derive(Debug)]
pub enum NeverValue {}

impl<T: ?Sized> AsRef<T> for NeverValue {
	#[inline]
	fn as_ref(&self) -> &T {
		match *self {}
	}
}

/// A resolver that takes values from the process environment.
#[derive(Debug)]
pub struct Env;

impl<'a> Resolver<'a> for Env {
	type Value = String;

	#[inline]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		std::env::var(reference).ok()
	}
}

impl<'a, V: 'a> Resolver<'a> for BTreeMap<&str, V> {
	type Value = &'a V;

	#[inline]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		self.get(reference)
	}
}

impl<'a, V: 'a> Resolver<'a> for BTreeMap<String, V> {
	type Value = &'a V;

	#[inline]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		self.get(reference)
	}
}

impl<'a, V: 'a, S: BuildHasher> Resolver<'a> for HashMap<&str, V, S> {
	type Value = &'a V;

	#[inline]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		self.get(reference)
	}
}

impl<'a, V: 'a, S: BuildHasher> Resolver<'a> for HashMap<String, V, S> {
	type Value = &'a V;

	#[inline]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		self.get(reference)
	}
}

/// [`Resolver`] produced by [`fallback()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FallbackResolver<Base, Fallback> {
	base: Base,
	fallback: Fallback,
}

impl<'a, Value, Base, Fallback> Resolver<'a> for FallbackResolver<Base, Fallback>
where
	Base: Resolver<'a, Value = Value>,
	Fallback: Resolver<'a, Value = Value>,
{
	type Value = Value;

	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		self.base.get(reference).or_else(|| self.fallback.get(reference))
	}
}

/// Creates a [`Resolver`] that will first try to find values in `base`, and
/// then attempt to find values in `fallback`.
///
/// # Example
/// ```rust
/// # use interpol::{fallback, Resolver};
///
/// let contact_info = [("first_name", "John"), ("last_name", "Doe")];
/// let with_fallback = fallback(contact_info, [("middle_name", "<unknown>")]);
///
/// assert_eq!(with_fallback.get("first_name"), Some(&"John"));
/// assert_eq!(with_fallback.get("middle_name"), Some(&"<unknown>"));
/// ```
pub const fn fallback<Base, Fallback>(base: Base, fallback: Fallback) -> FallbackResolver<Base, Fallback> {
	FallbackResolver { base, fallback }
}

/// [`Resolver`] produced by [`from_fn()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FnResolver<F> {
	func: F,
}

impl<'a, F, V> Resolver<'a> for FnResolver<F>
where
	F: 'a + Fn(&str) -> Option<V>,
{
	type Value = V;

	#[inline(always)]
	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		(self.func)(reference)
	}
}

/// Creates a [`Resolver`] from a function.
///
/// # Example
/// ```rust
/// # use interpol::{from_fn, Resolver};
///
/// let contact_info = from_fn(|reference| match reference {
///     "first_name" => Some("John"),
///     "last_name" => Some("Doe"),
///     _ => None,
/// });
///
/// assert_eq!(contact_info.get("first_name"), Some("John"));
/// assert_eq!(contact_info.get("middle_name"), None);
/// ```
pub const fn from_fn<F, V>(func: F) -> FnResolver<F>
where
	F: Fn(&str) -> Option<V>,
{
	FnResolver { func }
}

/// [`Resolver`] produced by [`map_value()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MapResolver<M, F> {
	map: M,
	func: F,
}

impl<'a, M, F, V> Resolver<'a> for MapResolver<M, F>
where
	M: Resolver<'a>,
	F: Fn(M::Value) -> V,
{
	type Value = V;

	fn get(&'a self, reference: &str) -> Option<Self::Value> {
		self.map.get(reference).map(|value| (self.func)(value))
	}
}

/// Creates a [`Resolver`] that applies a function `func` to values found in
/// `map`.
///
/// # Example
/// ```rust
/// # use interpol::{map_value, Resolver};
///
/// let contact_info = [("first_name", "John"), ("last_name", "Doe")];
///
/// let capitalized = map_value(contact_info, |value| value.to_uppercase());
///
/// assert_eq!(capitalized.get("first_name"), Some("JOHN".to_string()));
/// assert_eq!(capitalized.get("middle_name"), None);
/// ```
pub const fn map_value<'a, M, F, V>(map: M, func: F) -> MapResolver<M, F>
where
	M: Resolver<'a>,
	F: Fn(M::Value) -> V,
{
	MapResolver { map, func }
}

#[cfg(test)]
mod test {
	use std::collections::BTreeMap;

	use assert2::{assert, check, let_assert};

	use super::*;
	use crate::resolve;

	#[test]
	fn test_map_resolvers() {
		let mut map: BTreeMap<String, String> = BTreeMap::new();
		map.insert("name".into(), "world".into());
		check!(resolve("Hello ${name}!", &map) == "Hello world!");

		let mut map: BTreeMap<&str, &str> = BTreeMap::new();
		map.insert("name", "world");
		check!(resolve("Hello ${name}!", &map) == "Hello world!");
	}

	#[test]
	fn test_slice_resolver() {
		let pairs = [("name", "world"), ("greeting", "Hello")];
		check!(resolve("${greeting} ${name}!", &pairs) == "Hello world!");
		check!(resolve("${other}", &pairs) == "${other}");
	}

	#[test]
	fn test_no_resolution() {
		check!(resolve("Hello ${name}!", &NoResolution) == "Hello ${name}!");
	}

	#[test]
	fn test_fallback() {
		let primary = [("name", "world")];
		let secondary = [("name", "nobody"), ("greeting", "Hi")];
		let combined = fallback(primary, secondary);
		check!(resolve("${greeting} ${name}!", &combined) == "Hi world!");
	}

	#[test]
	fn test_from_fn() {
		let upper = from_fn(|reference: &str| Some(reference.to_uppercase()));
		check!(resolve("${a} and ${b}", &upper) == "A and B");
	}

	#[test]
	fn test_map_value() {
		let pairs = [("name", "world")];
		let loud = map_value(pairs, |value| value.to_uppercase());
		check!(resolve("Hello ${name}!", &loud) == "Hello WORLD!");
	}

	#[test]
	fn test_dyn_resolver() {
		let mut variables = BTreeMap::new();
		variables.insert(String::from("aap"), String::from("noot"));
		let variables: &dyn Resolver<Value = &String> = &variables;

		let_assert!(expanded = resolve("one ${aap}", variables));
		assert!(expanded == "one noot");
	}
}
