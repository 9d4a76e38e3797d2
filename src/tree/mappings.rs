use std::fmt::{Display, Formatter};
use anyhow::Result;
use indexmap::{Equivalent, IndexMap};
use crate::translator::DescRewriter;
use crate::tree::{DeobfKey, FromObfKey, NameValidator, ObfKey};
use crate::tree::paired::PairedIndex;

/// The full set of mappings loaded for one obfuscated artifact: every top-level class, with
/// inner classes, fields, methods and arguments nested below.
///
/// Top-level classes are reachable by both their obfuscated and their current deobfuscated
/// name. The set is meant to have exactly one writer (the component loading or editing
/// mappings); see [`MappingSet::translator`][crate::translator] for the read side.
#[derive(Debug, Clone)]
pub struct MappingSet {
	pub(crate) classes: PairedIndex<String, ClassMapping>,
}

impl MappingSet {
	pub fn new() -> MappingSet {
		MappingSet {
			classes: PairedIndex::new(),
		}
	}

	/// Adds a prebuilt class, failing if either of its names is already mapped.
	pub fn add_class(&mut self, class: ClassMapping) -> Result<()> {
		self.classes.add(class)
	}

	/// Returns the class for the given obfuscated name, creating an unrenamed one if there
	/// is none yet.
	pub fn get_or_create_class(&mut self, obf_name: &str) -> &mut ClassMapping {
		self.classes.get_or_create(obf_name.to_owned())
	}

	/// Gives the class for `obf_name` the deobfuscated name `deobf_name`, creating the
	/// class first if it isn't mapped yet.
	///
	/// The name is checked by `validator` before anything is touched; a rejected name
	/// leaves the set exactly as it was.
	pub fn rename_class(&mut self, obf_name: &str, deobf_name: &str, validator: &impl NameValidator) -> Result<()> {
		let deobf_name = validator.validate_class_name(deobf_name)?;
		self.classes.get_or_create(obf_name.to_owned());
		self.classes.rekey_deobf(obf_name, deobf_name.clone(), |class| class.deobf = deobf_name)
	}

	pub fn class_by_obf(&self, obf_name: &str) -> Option<&ClassMapping> {
		self.classes.by_obf(obf_name)
	}

	pub fn class_by_deobf(&self, deobf_name: &str) -> Option<&ClassMapping> {
		self.classes.by_deobf(deobf_name)
	}

	pub fn classes(&self) -> impl Iterator<Item = &ClassMapping> {
		self.classes.values()
	}

	pub fn len(&self) -> usize {
		self.classes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}

	/// Recomputes the deobfuscated descriptor of every method in the set from its
	/// obfuscated one, so that descriptors pick up the current class names again after
	/// classes have been renamed in bulk.
	///
	/// Class names the set doesn't map are copied into the new descriptors unchanged.
	pub fn update_deobf_method_descs(&mut self, rewriter: &impl DescRewriter) -> Result<()> {
		let table = self.class_translation_table();
		let translate_desc = |desc: &str| rewriter.rewrite_desc(desc, &|class_name| {
			table.get(class_name).cloned().unwrap_or_else(|| class_name.to_owned())
		});

		for class in self.classes.values_mut() {
			class.update_deobf_method_descs_recursively(&translate_desc)?;
		}
		Ok(())
	}

	/// Snapshots obfuscated name -> deobfuscated name for every class in the set, inner
	/// classes under their full `outer$inner` names.
	fn class_translation_table(&self) -> IndexMap<String, String> {
		fn collect(class: &ClassMapping, prefixes: Option<(&str, &str)>, table: &mut IndexMap<String, String>) {
			let (obf, deobf) = match prefixes {
				None => (class.obf.clone(), class.deobf.clone()),
				Some((obf_outer, deobf_outer)) => (
					format!("{obf_outer}${}", class.obf),
					format!("{deobf_outer}${}", class.deobf),
				),
			};
			for inner_class in class.inner_classes.values() {
				collect(inner_class, Some((obf.as_str(), deobf.as_str())), table);
			}
			table.insert(obf, deobf);
		}

		let mut table = IndexMap::new();
		for class in self.classes.values() {
			collect(class, None, &mut table);
		}
		table
	}
}

impl Default for MappingSet {
	fn default() -> MappingSet {
		MappingSet::new()
	}
}

/// The mappings of one class: its own name pair, plus the dual-keyed collections of its
/// inner classes, fields and methods.
///
/// The obfuscated name is fixed at creation; the deobfuscated name starts out equal to it
/// and moves with renames. Inner classes are keyed by their simple name, without the
/// `outer$` prefix.
#[derive(Debug, Clone)]
pub struct ClassMapping {
	pub(crate) obf: String,
	pub(crate) deobf: String,

	pub(crate) inner_classes: PairedIndex<String, ClassMapping>,
	pub(crate) fields: PairedIndex<String, FieldMapping>,
	pub(crate) methods: PairedIndex<MethodKey, MethodMapping>,
}

impl ClassMapping {
	pub fn new(obf_name: impl Into<String>) -> ClassMapping {
		let obf = obf_name.into();
		ClassMapping {
			deobf: obf.clone(),
			obf,
			inner_classes: PairedIndex::new(),
			fields: PairedIndex::new(),
			methods: PairedIndex::new(),
		}
	}

	/// Like [`ClassMapping::new`], but with a deobfuscated name already assigned.
	pub fn with_deobf_name(obf_name: impl Into<String>, deobf_name: &str, validator: &impl NameValidator) -> Result<ClassMapping> {
		let mut class = ClassMapping::new(obf_name);
		class.deobf = validator.validate_class_name(deobf_name)?;
		Ok(class)
	}

	pub fn obf_name(&self) -> &str {
		&self.obf
	}

	pub fn deobf_name(&self) -> &str {
		&self.deobf
	}

	/// Returns the inner class for the given simple obfuscated name, creating an unrenamed
	/// one if there is none yet.
	pub fn get_or_create_inner_class(&mut self, obf_name: &str) -> &mut ClassMapping {
		self.inner_classes.get_or_create(obf_name.to_owned())
	}

	/// Gives the inner class for `obf_name` the deobfuscated name `deobf_name`, creating
	/// the inner class first if it isn't mapped yet.
	///
	/// The name is checked by `validator` before anything is touched; a rejected name
	/// leaves this class exactly as it was. Renaming to the name the inner class already
	/// has is a no-op.
	pub fn rename_inner_class(&mut self, obf_name: &str, deobf_name: &str, validator: &impl NameValidator) -> Result<()> {
		let deobf_name = validator.validate_class_name(deobf_name)?;
		self.inner_classes.get_or_create(obf_name.to_owned());
		self.inner_classes.rekey_deobf(obf_name, deobf_name.clone(), |class| class.deobf = deobf_name)
	}

	pub fn inner_class_by_obf(&self, obf_name: &str) -> Option<&ClassMapping> {
		self.inner_classes.by_obf(obf_name)
	}

	pub fn inner_class_by_deobf(&self, deobf_name: &str) -> Option<&ClassMapping> {
		self.inner_classes.by_deobf(deobf_name)
	}

	pub fn inner_classes(&self) -> impl Iterator<Item = &ClassMapping> {
		self.inner_classes.values()
	}

	/// Gives the field for `obf_name` the deobfuscated name `deobf_name`, creating the
	/// field first if it isn't mapped yet. Field names are stored verbatim, unvalidated.
	pub fn set_field_name(&mut self, obf_name: &str, deobf_name: &str) -> Result<()> {
		self.fields.get_or_create(obf_name.to_owned());
		let deobf_name = deobf_name.to_owned();
		self.fields.rekey_deobf(obf_name, deobf_name.clone(), |field| field.deobf = deobf_name)
	}

	pub fn field_by_obf(&self, obf_name: &str) -> Option<&FieldMapping> {
		self.fields.by_obf(obf_name)
	}

	pub fn field_by_deobf(&self, deobf_name: &str) -> Option<&FieldMapping> {
		self.fields.by_deobf(deobf_name)
	}

	pub fn fields(&self) -> impl Iterator<Item = &FieldMapping> {
		self.fields.values()
	}

	/// Gives the method for `obf_name` + `obf_desc` the deobfuscated name and descriptor,
	/// creating the method first if it isn't mapped yet.
	///
	/// Methods are identified by name *and* descriptor, so overloads sharing a name are
	/// independent of each other.
	pub fn set_method_name_and_desc(&mut self, obf_name: &str, obf_desc: &str, deobf_name: &str, deobf_desc: &str) -> Result<()> {
		let obf_key = MethodKey::new(obf_name, obf_desc);
		self.methods.get_or_create(obf_key.clone());
		self.methods.rekey_deobf(&obf_key, MethodKey::new(deobf_name, deobf_desc), |method| {
			method.deobf = deobf_name.to_owned();
			method.deobf_desc = deobf_desc.to_owned();
		})
	}

	pub fn method_by_obf(&self, obf_name: &str, obf_desc: &str) -> Option<&MethodMapping> {
		self.methods.by_obf(&MethodKeyRef { name: obf_name, desc: obf_desc })
	}

	pub fn method_by_deobf(&self, deobf_name: &str, deobf_desc: &str) -> Option<&MethodMapping> {
		self.methods.by_deobf(&MethodKeyRef { name: deobf_name, desc: deobf_desc })
	}

	pub fn methods(&self) -> impl Iterator<Item = &MethodMapping> {
		self.methods.values()
	}

	/// Names the argument at `index` of the method for `obf_method_name` +
	/// `obf_method_desc`, creating the method first if it isn't mapped yet.
	///
	/// The argument list grows as needed, so any index is accepted; positions in between
	/// stay unmapped.
	pub fn set_argument_name(&mut self, obf_method_name: &str, obf_method_desc: &str, index: usize, argument_name: &str) {
		let method = self.methods.get_or_create(MethodKey::new(obf_method_name, obf_method_desc));
		method.set_argument_name(index, argument_name);
	}

	/// Recomputes the deobfuscated descriptor of every method of this class and its inner
	/// classes from the obfuscated one, re-keying the methods under their new descriptors.
	pub fn update_deobf_method_descs_recursively(&mut self, translate_desc: &impl Fn(&str) -> String) -> Result<()> {
		let rekeys: Vec<(MethodKey, MethodKey, String)> = self.methods.values()
			.map(|method| {
				let new_desc = translate_desc(&method.obf_desc);
				let new_key = MethodKey::new(method.deobf.as_str(), new_desc.as_str());
				(method.obf_key(), new_key, new_desc)
			})
			.collect();
		for (obf_key, new_key, new_desc) in rekeys {
			self.methods.rekey_deobf(&obf_key, new_key, |method| method.deobf_desc = new_desc)?;
		}

		for inner_class in self.inner_classes.values_mut() {
			inner_class.update_deobf_method_descs_recursively(translate_desc)?;
		}
		Ok(())
	}
}

impl Display for ClassMapping {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "{} <-> {}", self.obf, self.deobf)?;
		writeln!(f, "Fields:")?;
		for field in self.fields.values() {
			writeln!(f, "\t{} <-> {}", field.obf, field.deobf)?;
		}
		writeln!(f, "Methods:")?;
		for method in self.methods.values() {
			writeln!(f, "\t{method}")?;
		}
		Ok(())
	}
}

/// The name pair of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
	pub(crate) obf: String,
	pub(crate) deobf: String,
}

impl FieldMapping {
	pub fn new(obf_name: impl Into<String>) -> FieldMapping {
		let obf = obf_name.into();
		FieldMapping {
			deobf: obf.clone(),
			obf,
		}
	}

	pub fn obf_name(&self) -> &str {
		&self.obf
	}

	pub fn deobf_name(&self) -> &str {
		&self.deobf
	}
}

/// The mappings of one method: its name pair, its descriptor pair, and the names of its
/// arguments by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMapping {
	pub(crate) obf: String,
	pub(crate) deobf: String,
	pub(crate) obf_desc: String,
	pub(crate) deobf_desc: String,

	pub(crate) arguments: Vec<Option<ArgumentMapping>>,
}

impl MethodMapping {
	pub fn new(obf_name: impl Into<String>, obf_desc: impl Into<String>) -> MethodMapping {
		let obf = obf_name.into();
		let obf_desc = obf_desc.into();
		MethodMapping {
			deobf: obf.clone(),
			obf,
			deobf_desc: obf_desc.clone(),
			obf_desc,
			arguments: Vec::new(),
		}
	}

	pub fn obf_name(&self) -> &str {
		&self.obf
	}

	pub fn deobf_name(&self) -> &str {
		&self.deobf
	}

	pub fn obf_desc(&self) -> &str {
		&self.obf_desc
	}

	pub fn deobf_desc(&self) -> &str {
		&self.deobf_desc
	}

	pub fn argument(&self, index: usize) -> Option<&ArgumentMapping> {
		self.arguments.get(index)?.as_ref()
	}

	pub fn obf_argument_name(&self, index: usize) -> Option<&str> {
		self.argument(index).map(|argument| argument.obf_name())
	}

	pub fn deobf_argument_name(&self, index: usize) -> Option<&str> {
		self.argument(index).map(|argument| argument.deobf_name())
	}

	/// The named arguments of this method, with their positions. Unmapped positions are
	/// skipped.
	pub fn arguments(&self) -> impl Iterator<Item = (usize, &ArgumentMapping)> {
		self.arguments.iter()
			.enumerate()
			.filter_map(|(index, slot)| Some((index, slot.as_ref()?)))
	}

	pub(crate) fn set_argument_name(&mut self, index: usize, name: &str) {
		if self.arguments.len() <= index {
			self.arguments.resize_with(index + 1, || None);
		}
		if let Some(argument) = &mut self.arguments[index] {
			argument.deobf = name.to_owned();
		} else {
			self.arguments[index] = Some(ArgumentMapping::new(name));
		}
	}
}

impl Display for MethodMapping {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}{} <-> {}{}", self.obf, self.obf_desc, self.deobf, self.deobf_desc)
	}
}

/// The name pair of one method argument.
///
/// The first name ever assigned to a position becomes its obfuscated name; later
/// assignments move the deobfuscated side only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentMapping {
	pub(crate) obf: String,
	pub(crate) deobf: String,
}

impl ArgumentMapping {
	pub(crate) fn new(name: &str) -> ArgumentMapping {
		ArgumentMapping {
			obf: name.to_owned(),
			deobf: name.to_owned(),
		}
	}

	pub fn obf_name(&self) -> &str {
		&self.obf
	}

	pub fn deobf_name(&self) -> &str {
		&self.deobf
	}
}

/// Identifies a method within its class. Overloads share a name but never a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
	pub name: String,
	pub desc: String,
}

impl MethodKey {
	pub fn new(name: impl Into<String>, desc: impl Into<String>) -> MethodKey {
		MethodKey {
			name: name.into(),
			desc: desc.into(),
		}
	}
}

/// Borrowed form of [`MethodKey`] for lookups that shouldn't have to allocate.
#[derive(Debug, Hash)]
struct MethodKeyRef<'a> {
	name: &'a str,
	desc: &'a str,
}

impl Equivalent<MethodKey> for MethodKeyRef<'_> {
	fn equivalent(&self, key: &MethodKey) -> bool {
		self.name == key.name && self.desc == key.desc
	}
}

impl ObfKey<String> for ClassMapping {
	fn obf_key(&self) -> String {
		self.obf.clone()
	}
}

impl DeobfKey<String> for ClassMapping {
	fn deobf_key(&self) -> String {
		self.deobf.clone()
	}
}

impl FromObfKey<String> for ClassMapping {
	fn from_obf_key(key: &String) -> ClassMapping {
		ClassMapping::new(key.clone())
	}
}

impl ObfKey<String> for FieldMapping {
	fn obf_key(&self) -> String {
		self.obf.clone()
	}
}

impl DeobfKey<String> for FieldMapping {
	fn deobf_key(&self) -> String {
		self.deobf.clone()
	}
}

impl FromObfKey<String> for FieldMapping {
	fn from_obf_key(key: &String) -> FieldMapping {
		FieldMapping::new(key.clone())
	}
}

impl ObfKey<MethodKey> for MethodMapping {
	fn obf_key(&self) -> MethodKey {
		MethodKey::new(self.obf.as_str(), self.obf_desc.as_str())
	}
}

impl DeobfKey<MethodKey> for MethodMapping {
	fn deobf_key(&self) -> MethodKey {
		MethodKey::new(self.deobf.as_str(), self.deobf_desc.as_str())
	}
}

impl FromObfKey<MethodKey> for MethodMapping {
	fn from_obf_key(key: &MethodKey) -> MethodMapping {
		MethodMapping::new(key.name.as_str(), key.desc.as_str())
	}
}
