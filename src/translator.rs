//! Direction-aware translation queries over a [`MappingSet`].
//!
//! A [`Translator`] answers "what is this entry called on the other side?" for classes,
//! fields, methods, constructors and method arguments. Member lookups fall back through the
//! declaring class's ancestors (supplied by an [`AncestorProvider`]), so a subclass that
//! doesn't re-map an inherited member still resolves through the class that does.
//!
//! Descriptor translation is split between this crate and a [`DescRewriter`]: the rewriter
//! knows the descriptor syntax and finds the embedded class names, the translator maps each
//! name and keeps unmapped ones unchanged.

use indexmap::IndexMap;
use crate::entry::{ArgumentEntry, ClassEntry, ConstructorEntry, FieldEntry, MethodEntry};
use crate::tree::mappings::{ClassMapping, MappingSet};

/// Which of the two names a query should produce.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
	/// From the names in the compiled artifact to the human-assigned ones.
	Deobfuscating,
	/// From the human-assigned names back to the ones in the compiled artifact.
	Obfuscating,
}

impl Direction {
	/// Resolves a pair of candidates to the one on the side queries arrive in: obfuscated
	/// when deobfuscating, deobfuscated when obfuscating.
	///
	/// Both this and [`Direction::target`] take the candidates in the same
	/// `(obf, deobf)` order.
	pub fn source<T>(self, obf: T, deobf: T) -> T {
		match self {
			Direction::Deobfuscating => obf,
			Direction::Obfuscating => deobf,
		}
	}

	/// Resolves a pair of candidates to the one on the side queries produce: deobfuscated
	/// when deobfuscating, obfuscated when obfuscating.
	pub fn target<T>(self, obf: T, deobf: T) -> T {
		match self {
			Direction::Deobfuscating => deobf,
			Direction::Obfuscating => obf,
		}
	}
}

/// Answers which classes a class inherits members from.
///
/// The returned order is the lookup order: nearest ancestor first. Implementations must be
/// total; a class with no known ancestors yields an empty vector, never an error.
pub trait AncestorProvider {
	fn ancestors_of(&self, class_name: &str) -> Vec<String>;
}

/// An [`AncestorProvider`] backed by a precomputed table of ancestor chains.
#[derive(Debug, Clone, Default)]
pub struct AncestryIndex {
	pub ancestors: IndexMap<String, Vec<String>>,
}

impl AncestorProvider for AncestryIndex {
	fn ancestors_of(&self, class_name: &str) -> Vec<String> {
		self.ancestors.get(class_name).cloned().unwrap_or_default()
	}
}

impl<P: AncestorProvider> AncestorProvider for Vec<P> {
	fn ancestors_of(&self, class_name: &str) -> Vec<String> {
		for provider in self {
			let ancestors = provider.ancestors_of(class_name);
			if !ancestors.is_empty() {
				return ancestors;
			}
		}
		Vec::new()
	}
}

pub struct NoAncestors;

impl NoAncestors {
	pub fn new() -> &'static NoAncestors {
		static INSTANCE: NoAncestors = NoAncestors;
		&INSTANCE
	}
}

impl AncestorProvider for NoAncestors {
	fn ancestors_of(&self, _class_name: &str) -> Vec<String> {
		Vec::new()
	}
}

/// Rewrites the class names embedded in a descriptor, leaving everything else as is.
///
/// Implementations own the descriptor syntax: they call `substitute` exactly once per
/// embedded class name, splice the result in its place, and keep all surrounding structure
/// verbatim. The substitution is total; getting the input back unchanged is normal and
/// means the name stays as it is.
pub trait DescRewriter {
	fn rewrite_desc(&self, desc: &str, substitute: &dyn Fn(&str) -> String) -> String;
}

/// Read-only translation queries over a [`MappingSet`], in one fixed [`Direction`].
///
/// Queries return `None` when no mapping exists; that is the common case, not an error.
/// The `translate_*_entry` variants never come back empty: they rebuild the entry with the
/// best available names, keeping the queried name wherever there is no mapping.
///
/// A translator borrows the set, so the set cannot change while one is alive; sharing a
/// translator between concurrent readers is fine.
#[derive(Debug)]
pub struct Translator<'a, A> {
	direction: Direction,
	by_source: IndexMap<&'a str, &'a ClassMapping>,
	ancestors: &'a A,
}

impl MappingSet {
	/// Makes a translator over this set for the given direction.
	///
	/// Top-level classes are indexed up front by their name on the source side of
	/// `direction`, so either direction resolves the outer class of a query directly.
	pub fn translator<'a, A: AncestorProvider>(&'a self, direction: Direction, ancestors: &'a A) -> Translator<'a, A> {
		let mut by_source = IndexMap::new();
		for class in self.classes() {
			by_source.insert(direction.source(class.obf_name(), class.deobf_name()), class);
		}

		Translator { direction, by_source, ancestors }
	}
}

impl<'a, A: AncestorProvider> Translator<'a, A> {
	pub fn direction(&self) -> Direction {
		self.direction
	}

	/// Translates a full class name, recomposing `outer$inner` for inner classes from both
	/// translated halves.
	///
	/// `None` if the outer class has no mapping at all, or if the name denotes an inner
	/// class the outer mapping doesn't know.
	pub fn translate_class(&self, class_name: &str) -> Option<String> {
		let entry = ClassEntry::new(class_name);
		let outer = *self.by_source.get(entry.outer_name())?;

		match entry.inner_name() {
			None => Some(self.direction.target(outer.obf_name(), outer.deobf_name()).to_owned()),
			Some(inner_name) => {
				let inner = self.inner_class_in_source(outer, inner_name)?;
				let outer_name = self.direction.target(outer.obf_name(), outer.deobf_name());
				let inner_name = self.direction.target(inner.obf_name(), inner.deobf_name());
				Some(format!("{outer_name}${inner_name}"))
			},
		}
	}

	pub fn translate_class_entry(&self, entry: &ClassEntry) -> ClassEntry {
		match self.translate_class(&entry.name) {
			Some(name) => ClassEntry::new(name),
			None => entry.clone(),
		}
	}

	/// Translates a field name, looking through the declaring class and its ancestors.
	pub fn translate_field(&self, entry: &FieldEntry) -> Option<String> {
		for class_name in self.self_and_ancestors(&entry.class.name) {
			if let Some(class) = self.find_class(&class_name) {
				let field = match self.direction {
					Direction::Deobfuscating => class.field_by_obf(&entry.name),
					Direction::Obfuscating => class.field_by_deobf(&entry.name),
				};
				if let Some(field) = field {
					return Some(self.direction.target(field.obf_name(), field.deobf_name()).to_owned());
				}
			}
		}
		None
	}

	pub fn translate_field_entry(&self, entry: &FieldEntry) -> FieldEntry {
		let name = self.translate_field(entry).unwrap_or_else(|| entry.name.clone());
		FieldEntry::new(self.translate_class_entry(&entry.class), name)
	}

	/// Translates a method name, looking through the declaring class and its ancestors.
	/// Both the name and the descriptor of `entry` must match a mapping exactly.
	pub fn translate_method(&self, entry: &MethodEntry) -> Option<String> {
		for class_name in self.self_and_ancestors(&entry.class.name) {
			if let Some(class) = self.find_class(&class_name) {
				let method = match self.direction {
					Direction::Deobfuscating => class.method_by_obf(&entry.name, &entry.desc),
					Direction::Obfuscating => class.method_by_deobf(&entry.name, &entry.desc),
				};
				if let Some(method) = method {
					return Some(self.direction.target(method.obf_name(), method.deobf_name()).to_owned());
				}
			}
		}
		None
	}

	pub fn translate_method_entry(&self, entry: &MethodEntry, rewriter: &impl DescRewriter) -> MethodEntry {
		let name = self.translate_method(entry).unwrap_or_else(|| entry.name.clone());
		MethodEntry::new(
			self.translate_class_entry(&entry.class),
			name,
			self.translate_desc(&entry.desc, rewriter),
		)
	}

	pub fn translate_constructor_entry(&self, entry: &ConstructorEntry, rewriter: &impl DescRewriter) -> ConstructorEntry {
		ConstructorEntry::new(
			self.translate_class_entry(&entry.class),
			self.translate_desc(&entry.desc, rewriter),
		)
	}

	/// Translates an argument name, looking the method up through the declaring class and
	/// its ancestors. The first class that maps the method settles the query, whether or
	/// not that mapping names the argument.
	pub fn translate_argument(&self, entry: &ArgumentEntry) -> Option<String> {
		for class_name in self.self_and_ancestors(&entry.method.class.name) {
			if let Some(class) = self.find_class(&class_name) {
				let method = match self.direction {
					Direction::Deobfuscating => class.method_by_obf(&entry.method.name, &entry.method.desc),
					Direction::Obfuscating => class.method_by_deobf(&entry.method.name, &entry.method.desc),
				};
				if let Some(method) = method {
					return self.direction
						.target(method.obf_argument_name(entry.index), method.deobf_argument_name(entry.index))
						.map(str::to_owned);
				}
			}
		}
		None
	}

	pub fn translate_argument_entry(&self, entry: &ArgumentEntry, rewriter: &impl DescRewriter) -> ArgumentEntry {
		let name = self.translate_argument(entry).unwrap_or_else(|| entry.name.clone());
		ArgumentEntry::new(self.translate_method_entry(&entry.method, rewriter), entry.index, name)
	}

	/// Translates every class name embedded in a descriptor, keeping unmapped names as
	/// they are.
	pub fn translate_desc(&self, desc: &str, rewriter: &impl DescRewriter) -> String {
		rewriter.rewrite_desc(desc, &|class_name| {
			self.translate_class(class_name).unwrap_or_else(|| class_name.to_owned())
		})
	}

	/// Resolves the class a member lookup should consult, descending into the inner-class
	/// index for nested names.
	fn find_class(&self, class_name: &str) -> Option<&'a ClassMapping> {
		let entry = ClassEntry::new(class_name);
		let outer = *self.by_source.get(entry.outer_name())?;

		match entry.inner_name() {
			None => Some(outer),
			Some(inner_name) => self.inner_class_in_source(outer, inner_name),
		}
	}

	fn inner_class_in_source(&self, outer: &'a ClassMapping, inner_name: &str) -> Option<&'a ClassMapping> {
		match self.direction {
			Direction::Deobfuscating => outer.inner_class_by_obf(inner_name),
			Direction::Obfuscating => outer.inner_class_by_deobf(inner_name),
		}
	}

	fn self_and_ancestors(&self, class_name: &str) -> Vec<String> {
		let mut chain = vec![class_name.to_owned()];
		chain.extend(self.ancestors.ancestors_of(class_name));
		chain
	}
}
