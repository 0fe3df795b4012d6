//! Recursive resolution of referenced templates.
//!
//! A [`Recursion`] resolver maps references to templates whose values may
//! refer to further templates. Resolving a reference builds the dependency
//! graph of everything it transitively refers to, resolves the graph in
//! topological order and hands templates lying on a dependency cycle to a
//! caller-supplied handler. Everything outside a cycle resolves normally even
//! when the graph contains cycles elsewhere.
//!
//! The resolver adapts to its surroundings with three hooks: a *linking*
//! strategy turning textual placeholders into absolute references (possibly
//! relative to the template they occur in), a *lookup* strategy fetching the
//! template bound to a reference, and the recursion failure handler for
//! cycles. All hooks must return stable results for equal inputs.
//!
//! # Examples
//!
//! ```
//! # fn main() -> Result<(), interpol::ResolveError> {
//! use std::collections::HashMap;
//!
//! use interpol::Recursion;
//!
//! let mut templates = HashMap::new();
//! templates.insert("protocol", "https");
//! templates.insert("host", "localhost");
//! templates.insert("port", "443");
//! templates.insert("path", "/index.html");
//! templates.insert("url", "${protocol}://${host}:${port}${path}");
//!
//! let resolver = Recursion::with_templates(move |reference| {
//!     templates.get(reference).map(|text| text.to_string())
//! })
//! .build();
//!
//! assert_eq!(resolver.apply("url")?, Some("https://localhost:443/index.html".to_string()));
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::RwLock;

use crate::error::{ResolveError, SyntaxError};
use crate::format::Interpolation;
use crate::template::Template;

/// Linking strategy: computes the reference for a placeholder occurring in
/// the context of another reference.
///
/// The context is absent when the placeholder does not occur inside a looked
/// up template, such as at the top level of [`Recursion::apply()`]. Returning
/// `Ok(None)` keeps the placeholder unresolved.
pub type Linking<T> = dyn Fn(&str, Option<&T>) -> Result<Option<T>, ResolveError> + Send + Sync;

/// Lookup strategy: fetches the template bound to a reference.
///
/// Returning `Ok(None)` keeps placeholders referring to the reference
/// unresolved.
pub type Lookup<T> = dyn Fn(&T) -> Result<Option<Binding<T>>, ResolveError> + Send + Sync;

/// Handler supplying a replacement for a template lying on a dependency
/// cycle.
///
/// The handler receives the reference, its binding and a view of the
/// resolutions of all references outside the cycles. Returning `Ok(None)`
/// keeps the reference unresolved, so placeholders referring to it keep
/// their original text.
pub type RecursionFailureHandler<T> =
	dyn Fn(&T, &Binding<T>, Resolved<'_, T>) -> Result<Option<String>, ResolveError> + Send + Sync;

/// Handler consulted when a looked up template fails to parse.
///
/// Returning `Ok(Some(_))` substitutes the replacement as a literal for the
/// reference; `Ok(None)` falls through to the fallback of the [`Source`].
pub type ParsingFailureHandler<T> =
	dyn Fn(&T, &str, &SyntaxError) -> Result<Option<String>, ResolveError> + Send + Sync;

/// Supplies the text bound to a reference for one of the [`Source`]
/// components.
type Supplier<T> = dyn Fn(&T) -> Result<Option<String>, ResolveError> + Send + Sync;

/// A template bound to the context its reference was resolved in.
///
/// Bindings are the vertices of the dependency graph: the context travels
/// with the template so that relative placeholders occurring in it can be
/// linked to absolute references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding<T> {
	template: Template,
	context: T,
}

impl<T> Binding<T> {
	/// Creates a binding of a parsed template to a context.
	pub fn new(template: Template, context: T) -> Self {
		Self { template, context }
	}

	/// Creates a binding of a literal value to a context.
	pub fn literal(value: impl Into<String>, context: T) -> Self {
		Self::new(Template::literal(value), context)
	}

	/// Returns the bound template.
	#[inline]
	pub fn template(&self) -> &Template {
		&self.template
	}

	/// Returns the context the template was resolved in.
	#[inline]
	pub fn context(&self) -> &T {
		&self.context
	}
}

/// Read-only view of the resolutions computed so far, as passed to a
/// [`RecursionFailureHandler`].
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a, T> {
	resolutions: &'a HashMap<T, Option<String>>,
}

impl<'a, T: Eq + Hash> Resolved<'a, T> {
	/// Returns the resolved value of a reference.
	///
	/// Returns [`None`] both for an unknown reference and for a reference
	/// resolved to keeping its placeholder.
	pub fn get(&self, reference: &T) -> Option<&'a str> {
		self.resolutions.get(reference).and_then(|value| value.as_deref())
	}
}

/// A recursion-capable resolver over referenced templates.
///
/// See the [module documentation][self] for an overview and an example. Use
/// [`Recursion::builder()`] with explicit linking and lookup strategies, or
/// compose the lookup from simpler pieces with a [`Source`].
///
/// The resolver is thread-safe as long as its hooks are; the optional cache
/// of resolved references is synchronized internally and updated only after
/// a resolution has completed, so no caller observes half-built values.
pub struct Recursion<T> {
	/// Reference linking strategy.
	linking: Box<Linking<T>>,

	/// Template lookup strategy.
	lookup: Box<Lookup<T>>,

	/// Strategy for handling circular dependencies.
	on_recursion_failure: Box<RecursionFailureHandler<T>>,

	/// Cache for resolved references, when enabled.
	cache: Option<RwLock<HashMap<T, Option<String>>>>,
}

impl<T> std::fmt::Debug for Recursion<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("Recursion")
			.field("caching", &self.cache.is_some())
			.finish_non_exhaustive()
	}
}

impl<T: Clone + Eq + Hash> Recursion<T> {
	/// Starts a builder from explicit linking and lookup strategies.
	pub fn builder<L, K>(linking: L, lookup: K) -> Builder<T>
	where
		L: Fn(&str, Option<&T>) -> Result<Option<T>, ResolveError> + Send + Sync + 'static,
		K: Fn(&T) -> Result<Option<Binding<T>>, ResolveError> + Send + Sync + 'static,
	{
		Builder::new(Box::new(linking), Box::new(lookup))
	}

	/// Resolves a reference.
	///
	/// Returns `Ok(None)` when the reference should stay unresolved, which
	/// happens when the lookup knows no template for it, or when it lies on a
	/// dependency cycle and the failure handler declined to replace it.
	pub fn resolve(&self, reference: &T) -> Result<Option<String>, ResolveError> {
		if let Some(cached) = self.cached(reference) {
			return Ok(cached);
		}

		let binding = match (self.lookup)(reference)? {
			Some(binding) => binding,
			None => return Ok(None),
		};

		// The resolution works on local maps; the cache sees the batch only
		// after the whole computation succeeded.
		let mut resolution = Resolution::new(self);
		resolution.insert(reference.clone(), binding)?;
		let resolved = resolution.solve()?;

		let result = resolved.get(reference).cloned().flatten();
		if let Some(cache) = &self.cache {
			let mut cache = cache.write().unwrap_or_else(|poisoned| poisoned.into_inner());
			cache.extend(resolved);
		}

		Ok(result)
	}

	/// Resolves a placeholder with no context.
	///
	/// Links the placeholder without a context and resolves the resulting
	/// reference. This makes the resolver usable directly as the resolver of
	/// [`Interpolation::try_resolve()`][crate::Interpolation::try_resolve].
	pub fn apply(&self, placeholder: &str) -> Result<Option<String>, ResolveError> {
		match (self.linking)(placeholder, None)? {
			Some(reference) => self.resolve(&reference),
			None => Ok(None),
		}
	}

	/// Returns the cached resolution of a reference.
	///
	/// The outer [`None`] means the reference is not cached; the inner
	/// [`None`] means it is cached as unresolved.
	pub fn cached(&self, reference: &T) -> Option<Option<String>> {
		let cache = self.cache.as_ref()?;
		let cache = cache.read().unwrap_or_else(|poisoned| poisoned.into_inner());
		cache.get(reference).cloned()
	}
}

impl Recursion<String> {
	/// Starts a builder over a template store, linking every placeholder to
	/// the reference of the same name.
	pub fn with_templates<F>(templates: F) -> Builder<String>
	where
		F: Fn(&str) -> Option<String> + Send + Sync + 'static,
	{
		Source::identity()
			.templates(move |reference: &String| Ok(templates(reference)))
			.builder()
	}

	/// Starts a builder over a template store with a fallback for references
	/// the store does not know.
	pub fn with_templates_and_fallback<F, G>(templates: F, fallback: G) -> Builder<String>
	where
		F: Fn(&str) -> Option<String> + Send + Sync + 'static,
		G: Fn(&str) -> Option<String> + Send + Sync + 'static,
	{
		Source::identity()
			.templates(move |reference: &String| Ok(templates(reference)))
			.fallback(move |reference: &String| Ok(fallback(reference)))
			.builder()
	}
}

/// Builder for [`Recursion`].
pub struct Builder<T> {
	linking: Box<Linking<T>>,
	lookup: Box<Lookup<T>>,
	on_recursion_failure: Box<RecursionFailureHandler<T>>,
	caching: bool,
}

impl<T> std::fmt::Debug for Builder<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("Builder").field("caching", &self.caching).finish_non_exhaustive()
	}
}

impl<T: Clone + Eq + Hash> Builder<T> {
	fn new(linking: Box<Linking<T>>, lookup: Box<Lookup<T>>) -> Self {
		Self {
			linking,
			lookup,
			on_recursion_failure: Box::new(|_, _, _| Ok(None)),
			caching: false,
		}
	}

	/// Sets the handler for templates lying on a dependency cycle.
	///
	/// The default handler returns `Ok(None)`, which keeps such references
	/// unresolved; their dependents still resolve everything outside the
	/// cycles.
	pub fn on_recursion_failure<H>(mut self, handler: H) -> Self
	where
		H: Fn(&T, &Binding<T>, Resolved<'_, T>) -> Result<Option<String>, ResolveError> + Send + Sync + 'static,
	{
		self.on_recursion_failure = Box::new(handler);
		self
	}

	/// Sets whether the resolver caches resolved references.
	///
	/// Caching is off by default. The cache also stores negative results, so
	/// a reference once found unresolvable is not looked up again.
	pub fn caching(mut self, caching: bool) -> Self {
		self.caching = caching;
		self
	}

	/// Builds the resolver.
	pub fn build(self) -> Recursion<T> {
		Recursion {
			linking: self.linking,
			lookup: self.lookup,
			on_recursion_failure: self.on_recursion_failure,
			cache: self.caching.then(|| RwLock::new(HashMap::new())),
		}
	}
}

/// Composes a lookup strategy from simpler components.
///
/// The composed lookup consults its components in a fixed order:
///
/// 1. [`constants()`][Self::constants] may supply a value that is used as a
///    literal without parsing, overriding everything else.
/// 2. [`templates()`][Self::templates] may supply a template definition that
///    is parsed with the configured [`format()`][Self::format]. Should the
///    format report a syntax error, the
///    [`on_parsing_failure()`][Self::on_parsing_failure] handler may supply a
///    literal replacement instead.
/// 3. [`fallback()`][Self::fallback] may supply a literal for references the
///    previous components missed.
///
/// When no component delivers, the reference stays unresolved. Any component
/// may return an error to abort the resolution; the error is relayed to the
/// caller.
pub struct Source<T> {
	linking: Box<Linking<T>>,
	constants: Box<Supplier<T>>,
	templates: Box<Supplier<T>>,
	fallback: Box<Supplier<T>>,
	format: Interpolation,
	on_parsing_failure: Box<ParsingFailureHandler<T>>,
}

impl<T> std::fmt::Debug for Source<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("Source").field("format", &self.format).finish_non_exhaustive()
	}
}

impl<T: Clone + Eq + Hash> Source<T> {
	/// Creates a source with the given linking strategy.
	///
	/// All components start out supplying nothing; configure them with the
	/// setters before calling [`builder()`][Self::builder].
	pub fn new<L>(linking: L) -> Self
	where
		L: Fn(&str, Option<&T>) -> Result<Option<T>, ResolveError> + Send + Sync + 'static,
	{
		Self {
			linking: Box::new(linking),
			constants: Box::new(|_| Ok(None)),
			templates: Box::new(|_| Ok(None)),
			fallback: Box::new(|_| Ok(None)),
			format: Interpolation::standard(),
			on_parsing_failure: Box::new(|_, _, _| Ok(None)),
		}
	}

	/// Sets the component supplying constant values that are never parsed.
	pub fn constants<F>(mut self, constants: F) -> Self
	where
		F: Fn(&T) -> Result<Option<String>, ResolveError> + Send + Sync + 'static,
	{
		self.constants = Box::new(constants);
		self
	}

	/// Sets the component supplying template definitions.
	pub fn templates<F>(mut self, templates: F) -> Self
	where
		F: Fn(&T) -> Result<Option<String>, ResolveError> + Send + Sync + 'static,
	{
		self.templates = Box::new(templates);
		self
	}

	/// Sets the component supplying fallback values for references the other
	/// components missed.
	pub fn fallback<F>(mut self, fallback: F) -> Self
	where
		F: Fn(&T) -> Result<Option<String>, ResolveError> + Send + Sync + 'static,
	{
		self.fallback = Box::new(fallback);
		self
	}

	/// Sets the format for parsing supplied template definitions.
	///
	/// Defaults to [`Interpolation::standard()`].
	pub fn format(mut self, format: Interpolation) -> Self {
		self.format = format;
		self
	}

	/// Sets the handler for template definitions that fail to parse.
	///
	/// The bundled interpolation format parses every input, so this handler
	/// only matters for formats that can report syntax errors. The default
	/// handler returns `Ok(None)`, falling through to the fallback component.
	pub fn on_parsing_failure<H>(mut self, handler: H) -> Self
	where
		H: Fn(&T, &str, &SyntaxError) -> Result<Option<String>, ResolveError> + Send + Sync + 'static,
	{
		self.on_parsing_failure = Box::new(handler);
		self
	}

	/// Returns a resolver builder using the composed lookup.
	pub fn builder(self) -> Builder<T>
	where
		T: Send + Sync + 'static,
	{
		let Source {
			linking,
			constants,
			templates,
			fallback,
			format,
			on_parsing_failure,
		} = self;

		let lookup = move |reference: &T| -> Result<Option<Binding<T>>, ResolveError> {
			if let Some(constant) = constants(reference)? {
				return Ok(Some(Binding::literal(constant, reference.clone())));
			}

			if let Some(definition) = templates(reference)? {
				match parse_definition(&format, &definition) {
					Ok(template) => return Ok(Some(Binding::new(template, reference.clone()))),
					Err(error) => {
						if let Some(replacement) = on_parsing_failure(reference, &definition, &error)? {
							return Ok(Some(Binding::literal(replacement, reference.clone())));
						}
					},
				}
			}

			match fallback(reference)? {
				Some(value) => Ok(Some(Binding::literal(value, reference.clone()))),
				None => Ok(None),
			}
		};

		Builder::new(linking, Box::new(lookup))
	}
}

impl Source<String> {
	/// Creates a source whose placeholders are the references themselves.
	///
	/// This linking works when placeholders have a free form and equal the
	/// absolute references.
	pub fn identity() -> Self {
		Self::new(|placeholder, _context| Ok(Some(placeholder.to_owned())))
	}
}

/// Parses a looked up template definition.
///
/// The bundled interpolation format accepts every input; the error branch is
/// reachable only for formats that report syntax errors.
fn parse_definition(format: &Interpolation, definition: &str) -> Result<Template, SyntaxError> {
	Ok(format.parse(definition))
}

/// A vertex payload of the dependency graph.
enum Node<T> {
	/// A terminal vertex whose resolution is already known: the literal
	/// projection of a placeholder-free template, a cache hit, or [`None`]
	/// for a missing lookup.
	Value(Option<String>),

	/// A template with outstanding placeholder dependencies.
	Template(Binding<T>),
}

/// The resolution algorithm and the data it needs for a single top-level
/// [`Recursion::resolve()`] call.
///
/// The dependency graph is held as an arena: a vertex is an index into the
/// side tables. An *incoming* edge leads from vertex `A` to `B` when the
/// template of `B` contains a placeholder linking to `A`; the *outgoing*
/// edges mirror them in the other direction. The reference and index maps
/// translate between references and vertices both ways, so every distinct
/// reference is decomposed at most once per call.
///
/// Solving works by topological sort: every vertex without unresolved
/// dependencies is resolved from the `resolved` map and cut from the graph,
/// until the graph stops changing. The sort cannot handle cycles; vertices
/// remaining after it stalls all lie on or depend on a cycle. The vertices
/// lying *on* a cycle are then resolved with the recursion failure handler,
/// which breaks every cycle, and the topological sort resumes to empty the
/// graph. Only a vertex on a cycle is treated as a failure; vertices merely
/// depending on a cycle resolve as much as possible.
struct Resolution<'r, T> {
	owner: &'r Recursion<T>,

	/// The reference of each vertex.
	refs: Vec<T>,

	/// The payload of each vertex.
	nodes: Vec<Node<T>>,

	/// Translates references to vertices; the inverse of [`Self::refs`].
	index: HashMap<T, usize>,

	/// The unresolved dependencies of each vertex.
	incoming: Vec<HashSet<usize>>,

	/// The dependents of each vertex.
	outgoing: Vec<HashSet<usize>>,

	/// Vertices still in the graph.
	alive: Vec<bool>,

	/// The stable resolutions, keyed by reference; the result of the
	/// algorithm.
	resolved: HashMap<T, Option<String>>,
}

impl<'r, T: Clone + Eq + Hash> Resolution<'r, T> {
	fn new(owner: &'r Recursion<T>) -> Self {
		Self {
			owner,
			refs: Vec::new(),
			nodes: Vec::new(),
			index: HashMap::new(),
			incoming: Vec::new(),
			outgoing: Vec::new(),
			alive: Vec::new(),
			resolved: HashMap::new(),
		}
	}

	/// Adds a fresh vertex for the reference.
	fn add(&mut self, reference: T, node: Node<T>) -> usize {
		let id = self.refs.len();
		self.index.insert(reference.clone(), id);
		self.refs.push(reference);
		self.nodes.push(node);
		self.incoming.push(HashSet::new());
		self.outgoing.push(HashSet::new());
		self.alive.push(true);
		id
	}

	/// Adds a reference with its binding and, transitively, everything the
	/// binding depends on.
	fn insert(&mut self, reference: T, binding: Binding<T>) -> Result<usize, ResolveError> {
		if let Some(&id) = self.index.get(&reference) {
			// An inconsistent lookup could deliver a different binding for a
			// reference seen before; the first one wins.
			return Ok(id);
		}

		if let Some(cached) = self.owner.cached(&reference) {
			return Ok(self.add(reference, Node::Value(cached)));
		}

		let mut placeholders = Vec::new();
		let projection = decompose(binding.template(), &mut placeholders);
		if placeholders.is_empty() {
			// A template without placeholders resolves to its projection
			// without entering the graph as a dependent vertex.
			return Ok(self.add(reference, Node::Value(Some(projection))));
		}

		// The vertex must exist before its placeholders are linked, or a
		// self-reference would be inserted twice.
		let context = binding.context().clone();
		let id = self.add(reference, Node::Template(binding));

		for placeholder in placeholders {
			if let Some(target) = (self.owner.linking)(&placeholder, Some(&context))? {
				let dependency = self.dereference(target)?;
				self.incoming[id].insert(dependency);
				self.outgoing[dependency].insert(id);
			}
		}

		Ok(id)
	}

	/// Returns the vertex of a reference, adding it and its dependencies
	/// when it is new.
	fn dereference(&mut self, reference: T) -> Result<usize, ResolveError> {
		if let Some(&id) = self.index.get(&reference) {
			return Ok(id);
		}

		if let Some(cached) = self.owner.cached(&reference) {
			return Ok(self.add(reference, Node::Value(cached)));
		}

		match (self.owner.lookup)(&reference)? {
			Some(binding) => self.insert(reference, binding),
			// A missing template keeps the placeholders referring to it
			// unresolved.
			None => Ok(self.add(reference, Node::Value(None))),
		}
	}

	/// Resolves the whole graph and returns the resolutions by reference.
	fn solve(mut self) -> Result<HashMap<T, Option<String>>, ResolveError> {
		if !self.resolve_trees()? {
			let cycles = self.discover_cycles();
			self.resolve_recursion_failures(&cycles)?;
			let finished = self.resolve_trees()?;
			debug_assert!(finished, "cutting the cycles must leave a resolvable forest");
		}

		debug_assert_eq!(self.resolved.len(), self.refs.len());
		Ok(self.resolved)
	}

	/// Topological pass: resolves vertices without unresolved dependencies
	/// until the graph stops changing.
	///
	/// Returns `true` when no vertices remain in the graph.
	fn resolve_trees(&mut self) -> Result<bool, ResolveError> {
		loop {
			let mut unstable = false;
			for id in 0..self.nodes.len() {
				if !self.alive[id] || !self.incoming[id].is_empty() {
					continue;
				}

				let resolution = self.evaluate(id)?;
				self.resolved.insert(self.refs[id].clone(), resolution);
				self.cut(id);
				unstable = true;
			}

			if !unstable {
				break;
			}
		}

		Ok(self.alive.iter().all(|alive| !alive))
	}

	/// Resolves a vertex from the already resolved values of its
	/// dependencies.
	fn evaluate(&self, id: usize) -> Result<Option<String>, ResolveError> {
		match &self.nodes[id] {
			Node::Value(value) => Ok(value.clone()),
			Node::Template(binding) => {
				let context = binding.context();
				let value = binding.template().try_apply(&mut |placeholder| {
					let target = (self.owner.linking)(placeholder, Some(context))?;
					Ok(target.and_then(|target| self.resolved.get(&target).cloned().flatten()))
				})?;
				Ok(Some(value))
			},
		}
	}

	/// Removes a finished vertex from the graph, cutting it out of the
	/// incoming sets of its dependents.
	fn cut(&mut self, id: usize) {
		let dependents = std::mem::take(&mut self.outgoing[id]);
		for dependent in dependents {
			self.incoming[dependent].remove(&id);
		}

		self.alive[id] = false;
	}

	/// Finds every vertex lying on a dependency cycle, in vertex order.
	fn discover_cycles(&self) -> Vec<usize> {
		let mut on_cycle = HashSet::new();
		let mut visited = vec![false; self.nodes.len()];
		let mut path = Vec::new();
		let mut depth = vec![None; self.nodes.len()];

		for id in 0..self.nodes.len() {
			if self.alive[id] {
				self.discover_cycles_from(id, &mut on_cycle, &mut visited, &mut path, &mut depth);
			}
		}

		let mut cycles: Vec<usize> = on_cycle.into_iter().collect();
		cycles.sort_unstable();
		cycles
	}

	/// Depth-first search over incoming edges reporting the vertices of
	/// every cycle reachable from the vertex.
	fn discover_cycles_from(
		&self,
		id: usize,
		on_cycle: &mut HashSet<usize>,
		visited: &mut [bool],
		path: &mut Vec<usize>,
		depth: &mut [Option<usize>],
	) {
		if visited[id] {
			return;
		}

		if let Some(found) = depth[id] {
			// The vertex is on the current path: everything from its first
			// occurrence up to the top of the path lies on a cycle.
			on_cycle.extend(path[found..].iter().copied());
			return;
		}

		depth[id] = Some(path.len());
		path.push(id);

		for &source in &self.incoming[id] {
			self.discover_cycles_from(source, on_cycle, visited, path, depth);
		}

		path.pop();
		depth[id] = None;
		visited[id] = true;
	}

	/// Resolves the given cycle vertices with the recursion failure handler
	/// and cuts them from the graph.
	///
	/// Each handler invocation sees the resolutions of the ordinary pass
	/// only; the handler results are published together afterwards.
	fn resolve_recursion_failures(&mut self, cycles: &[usize]) -> Result<(), ResolveError> {
		let mut resolutions = Vec::with_capacity(cycles.len());

		for &id in cycles {
			let resolution = match &self.nodes[id] {
				Node::Value(value) => value.clone(),
				Node::Template(binding) => (self.owner.on_recursion_failure)(
					&self.refs[id],
					binding,
					Resolved {
						resolutions: &self.resolved,
					},
				)?,
			};

			resolutions.push((self.refs[id].clone(), resolution));
		}

		for &id in cycles {
			self.cut(id);
		}

		self.resolved.extend(resolutions);
		Ok(())
	}
}

/// Collects the placeholders of a template in first-occurrence order and
/// returns its literal projection, the resolution with every placeholder
/// kept.
fn decompose(template: &Template, placeholders: &mut Vec<String>) -> String {
	let mut output = String::new();
	decompose_into(template, &mut output, placeholders);
	output
}

fn decompose_into(template: &Template, output: &mut String, placeholders: &mut Vec<String>) {
	match template {
		Template::Literal(value) => output.push_str(value),
		Template::Constant { value, .. } => output.push_str(value),
		Template::Reference { definition, reference } => {
			if !placeholders.iter().any(|seen| seen == reference) {
				placeholders.push(reference.clone());
			}

			output.push_str(definition);
		},
		Template::Sequence(fragments) => {
			for fragment in fragments {
				decompose_into(fragment, output, placeholders);
			}
		},
	}
}
