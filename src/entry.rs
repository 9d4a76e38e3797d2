//! Plain descriptions of the things a translation query can point at: a class, a field, a
//! method, a constructor, or a method argument, each located by the names it has in one of
//! the two namespaces.

/// A class, by its full name. Inner classes use the `outer$inner` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassEntry {
	pub name: String,
}

impl ClassEntry {
	pub fn new(name: impl Into<String>) -> ClassEntry {
		ClassEntry {
			name: name.into(),
		}
	}

	pub fn is_inner_class(&self) -> bool {
		self.name.contains('$')
	}

	/// The part before the first nesting separator; the whole name for a top-level class.
	pub fn outer_name(&self) -> &str {
		match self.name.split_once('$') {
			Some((outer, _)) => outer,
			None => &self.name,
		}
	}

	/// The part after the first nesting separator, if any.
	pub fn inner_name(&self) -> Option<&str> {
		self.name.split_once('$').map(|(_, inner)| inner)
	}
}

/// A field, by its declaring class and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldEntry {
	pub class: ClassEntry,
	pub name: String,
}

impl FieldEntry {
	pub fn new(class: ClassEntry, name: impl Into<String>) -> FieldEntry {
		FieldEntry {
			class,
			name: name.into(),
		}
	}
}

/// A method, by its declaring class, name and descriptor. The descriptor is part of the
/// identity, so overloads are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodEntry {
	pub class: ClassEntry,
	pub name: String,
	pub desc: String,
}

impl MethodEntry {
	pub fn new(class: ClassEntry, name: impl Into<String>, desc: impl Into<String>) -> MethodEntry {
		MethodEntry {
			class,
			name: name.into(),
			desc: desc.into(),
		}
	}
}

/// A constructor, by its declaring class and descriptor. Constructors have no renameable
/// name of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructorEntry {
	pub class: ClassEntry,
	pub desc: String,
}

impl ConstructorEntry {
	pub fn new(class: ClassEntry, desc: impl Into<String>) -> ConstructorEntry {
		ConstructorEntry {
			class,
			desc: desc.into(),
		}
	}
}

/// A method argument, by its method, position and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgumentEntry {
	pub method: MethodEntry,
	pub index: usize,
	pub name: String,
}

impl ArgumentEntry {
	pub fn new(method: MethodEntry, index: usize, name: impl Into<String>) -> ArgumentEntry {
		ArgumentEntry {
			method,
			index,
			name: name.into(),
		}
	}
}
