use anyhow::{bail, Context, Result};
use pretty_assertions::assert_eq;
use rosetta::translator::DescRewriter;
use rosetta::tree::NameValidator;
use rosetta::tree::mappings::{ClassMapping, MappingSet};

/// Accepts any non-empty name made of Java identifier characters, `/` and `$`.
struct Plain;

impl NameValidator for Plain {
	fn validate_class_name(&self, candidate: &str) -> Result<String> {
		if candidate.is_empty() {
			bail!("class name is empty");
		}
		if !candidate.chars().all(|ch| ch.is_alphanumeric() || "/$_".contains(ch)) {
			bail!("class name {candidate:?} contains illegal characters");
		}
		Ok(candidate.to_owned())
	}
}

/// Walks the `L...;` object tokens of a descriptor, leaving all other structure alone.
struct ObjectTokens;

impl DescRewriter for ObjectTokens {
	fn rewrite_desc(&self, desc: &str, substitute: &dyn Fn(&str) -> String) -> String {
		let mut out = String::new();
		let mut chars = desc.chars();
		while let Some(ch) = chars.next() {
			out.push(ch);
			if ch == 'L' {
				let mut class_name = String::new();
				for ch in chars.by_ref() {
					if ch == ';' {
						break;
					}
					class_name.push(ch);
				}
				out.push_str(&substitute(&class_name));
				out.push(';');
			}
		}
		out
	}
}

#[test]
fn creating_a_class_starts_unrenamed() {
	let mut set = MappingSet::new();

	let class = set.get_or_create_class("a");
	assert_eq!(class.obf_name(), "a");
	assert_eq!(class.deobf_name(), "a");

	set.get_or_create_class("a");
	assert_eq!(set.len(), 1);
}

#[test]
fn renaming_creates_the_class_when_missing() -> Result<()> {
	let mut set = MappingSet::new();

	set.rename_class("a", "com/example/Entity", &Plain)?;

	assert_eq!(set.len(), 1);
	let class = set.class_by_obf("a").context("class should exist")?;
	assert_eq!(class.deobf_name(), "com/example/Entity");
	assert!(set.class_by_deobf("com/example/Entity").is_some());
	assert!(set.class_by_deobf("a").is_none());
	Ok(())
}

#[test]
fn renaming_twice_is_idempotent() -> Result<()> {
	let mut set = MappingSet::new();

	set.rename_class("a", "com/example/Entity", &Plain)?;
	set.rename_class("a", "com/example/Entity", &Plain)?;

	assert_eq!(set.len(), 1);
	assert!(set.class_by_deobf("com/example/Entity").is_some());
	Ok(())
}

#[test]
fn renaming_again_moves_the_deobf_key() -> Result<()> {
	let mut set = MappingSet::new();

	set.rename_class("a", "com/example/Entity", &Plain)?;
	set.rename_class("a", "com/example/Thing", &Plain)?;

	assert!(set.class_by_deobf("com/example/Entity").is_none());
	assert_eq!(set.class_by_deobf("com/example/Thing").context("renamed class should exist")?.obf_name(), "a");
	Ok(())
}

#[test]
fn a_rejected_rename_changes_nothing() -> Result<()> {
	let mut set = MappingSet::new();
	set.rename_class("a", "com/example/Entity", &Plain)?;

	assert!(set.rename_class("a", "bad name!", &Plain).is_err());

	let class = set.class_by_obf("a").context("class should exist")?;
	assert_eq!(class.deobf_name(), "com/example/Entity");
	assert!(set.class_by_deobf("com/example/Entity").is_some());
	assert!(set.class_by_deobf("bad name!").is_none());

	// a rejected rename of an unmapped class must not even create it
	assert!(set.rename_class("b", "bad name!", &Plain).is_err());
	assert_eq!(set.len(), 1);
	assert!(set.class_by_obf("b").is_none());
	Ok(())
}

#[test]
fn renaming_onto_a_taken_name_fails() -> Result<()> {
	let mut set = MappingSet::new();
	set.rename_class("a", "com/example/Entity", &Plain)?;

	assert!(set.rename_class("b", "com/example/Entity", &Plain).is_err());

	assert_eq!(set.class_by_obf("b").context("class b was created by the attempt")?.deobf_name(), "b");
	assert_eq!(set.class_by_deobf("com/example/Entity").context("first mapping should survive")?.obf_name(), "a");
	Ok(())
}

#[test]
fn inner_classes_are_reachable_from_both_sides() -> Result<()> {
	let mut set = MappingSet::new();
	let class = set.get_or_create_class("a");

	class.rename_inner_class("b", "Builder", &Plain)?;

	assert_eq!(class.inner_class_by_obf("b").context("inner class should exist")?.deobf_name(), "Builder");
	assert_eq!(class.inner_class_by_deobf("Builder").context("inner class should exist")?.obf_name(), "b");
	assert!(class.inner_class_by_deobf("b").is_none());
	assert_eq!(class.inner_classes().count(), 1);
	Ok(())
}

#[test]
fn field_renames_keep_both_indices() -> Result<()> {
	let mut set = MappingSet::new();
	let class = set.get_or_create_class("a");

	class.set_field_name("x", "count")?;

	assert_eq!(class.field_by_obf("x").context("field should exist")?.deobf_name(), "count");
	assert_eq!(class.field_by_deobf("count").context("field should exist")?.obf_name(), "x");
	assert!(class.field_by_deobf("x").is_none());

	class.set_field_name("x", "total")?;

	assert!(class.field_by_deobf("count").is_none());
	assert_eq!(class.field_by_deobf("total").context("field should exist")?.obf_name(), "x");
	assert_eq!(class.fields().count(), 1);
	Ok(())
}

#[test]
fn overloads_are_mapped_independently() -> Result<()> {
	let mut set = MappingSet::new();
	let class = set.get_or_create_class("a");

	class.set_method_name_and_desc("m", "()V", "run", "()V")?;

	let untouched = class.method_by_obf("m", "(I)V");
	assert!(untouched.is_none(), "the other overload must not appear from nowhere");

	class.set_method_name_and_desc("m", "(I)V", "runWith", "(I)V")?;

	assert_eq!(class.method_by_obf("m", "()V").context("overload should exist")?.deobf_name(), "run");
	assert_eq!(class.method_by_obf("m", "(I)V").context("overload should exist")?.deobf_name(), "runWith");
	assert!(class.method_by_deobf("run", "()V").is_some());
	assert!(class.method_by_deobf("run", "(I)V").is_none());
	assert_eq!(class.methods().count(), 2);
	Ok(())
}

#[test]
fn a_method_rename_moves_the_whole_key() -> Result<()> {
	let mut set = MappingSet::new();
	let class = set.get_or_create_class("a");

	class.set_method_name_and_desc("m", "(La;)V", "run", "(Lcom/example/Entity;)V")?;

	assert!(class.method_by_deobf("run", "(Lcom/example/Entity;)V").is_some());
	assert!(class.method_by_deobf("m", "(La;)V").is_none());
	assert!(class.method_by_deobf("run", "(La;)V").is_none());
	Ok(())
}

#[test]
fn argument_slots_extend_as_needed() -> Result<()> {
	let mut set = MappingSet::new();
	let class = set.get_or_create_class("a");

	class.set_argument_name("m", "(IJI)V", 2, "third");

	let method = class.method_by_obf("m", "(IJI)V").context("method should exist")?;
	assert!(method.argument(0).is_none());
	assert!(method.argument(1).is_none());
	assert_eq!(method.obf_argument_name(2), Some("third"));
	assert_eq!(method.deobf_argument_name(2), Some("third"));
	assert_eq!(method.arguments().count(), 1);

	// renaming the slot moves the deobf side only
	class.set_argument_name("m", "(IJI)V", 2, "weight");
	let method = class.method_by_obf("m", "(IJI)V").context("method should exist")?;
	assert_eq!(method.obf_argument_name(2), Some("third"));
	assert_eq!(method.deobf_argument_name(2), Some("weight"));
	Ok(())
}

#[test]
fn indices_stay_symmetric_across_a_pile_of_operations() -> Result<()> {
	let mut set = MappingSet::new();
	set.rename_class("a", "com/example/Entity", &Plain)?;

	let class = set.get_or_create_class("a");
	class.set_field_name("x", "count")?;
	class.set_field_name("y", "total")?;
	class.set_field_name("x", "amount")?;
	class.set_method_name_and_desc("m", "()V", "run", "()V")?;
	class.set_method_name_and_desc("m", "(I)V", "runWith", "(I)V")?;
	class.set_method_name_and_desc("m", "()V", "start", "()V")?;
	class.rename_inner_class("b", "Builder", &Plain)?;
	class.rename_inner_class("c", "Parser", &Plain)?;
	class.rename_inner_class("b", "Factory", &Plain)?;

	let class = set.class_by_obf("a").context("class should exist")?;

	assert_eq!(class.fields().count(), 2);
	for field in class.fields() {
		assert!(class.field_by_obf(field.obf_name()).is_some());
		assert_eq!(class.field_by_deobf(field.deobf_name()).context("missing from deobf index")?.obf_name(), field.obf_name());
	}

	assert_eq!(class.methods().count(), 2);
	for method in class.methods() {
		assert!(class.method_by_obf(method.obf_name(), method.obf_desc()).is_some());
		let found = class.method_by_deobf(method.deobf_name(), method.deobf_desc()).context("missing from deobf index")?;
		assert_eq!(found.obf_name(), method.obf_name());
	}

	assert_eq!(class.inner_classes().count(), 2);
	for inner_class in class.inner_classes() {
		assert!(class.inner_class_by_obf(inner_class.obf_name()).is_some());
		assert_eq!(class.inner_class_by_deobf(inner_class.deobf_name()).context("missing from deobf index")?.obf_name(), inner_class.obf_name());
	}
	Ok(())
}

#[test]
fn refreshing_method_descs_rekeys_the_deobf_index() -> Result<()> {
	let mut set = MappingSet::new();
	set.rename_class("a", "com/example/Entity", &Plain)?;
	set.rename_class("b", "com/example/Thing", &Plain)?;

	{
		let class = set.get_or_create_class("a");
		class.set_method_name_and_desc("m", "(La;Lb;I)Lb;", "combine", "(La;Lb;I)Lb;")?;
		class.rename_inner_class("i", "Inner", &Plain)?;
		class.get_or_create_inner_class("i").set_method_name_and_desc("n", "(La$i;)V", "consume", "(La$i;)V")?;
	}

	set.update_deobf_method_descs(&ObjectTokens)?;

	let class = set.class_by_obf("a").context("class should exist")?;
	let method = class.method_by_obf("m", "(La;Lb;I)Lb;").context("method should exist")?;
	assert_eq!(method.deobf_desc(), "(Lcom/example/Entity;Lcom/example/Thing;I)Lcom/example/Thing;");
	assert!(class.method_by_deobf("combine", "(Lcom/example/Entity;Lcom/example/Thing;I)Lcom/example/Thing;").is_some());
	assert!(class.method_by_deobf("combine", "(La;Lb;I)Lb;").is_none());

	let inner_class = class.inner_class_by_obf("i").context("inner class should exist")?;
	let method = inner_class.method_by_obf("n", "(La$i;)V").context("method should exist")?;
	assert_eq!(method.deobf_desc(), "(Lcom/example/Entity$Inner;)V");
	assert!(inner_class.method_by_deobf("consume", "(Lcom/example/Entity$Inner;)V").is_some());
	Ok(())
}

#[test]
fn adding_a_prebuilt_class_rejects_taken_names() -> Result<()> {
	let mut set = MappingSet::new();
	set.rename_class("a", "com/example/Entity", &Plain)?;

	assert!(set.add_class(ClassMapping::new("a")).is_err());
	assert!(set.add_class(ClassMapping::with_deobf_name("b", "com/example/Entity", &Plain)?).is_err());
	set.add_class(ClassMapping::with_deobf_name("b", "com/example/Thing", &Plain)?)?;

	assert_eq!(set.len(), 2);
	assert_eq!(set.class_by_deobf("com/example/Thing").context("class should exist")?.obf_name(), "b");
	Ok(())
}

#[test]
fn a_mapping_dump_lists_the_members() -> Result<()> {
	let mut set = MappingSet::new();
	set.rename_class("a", "com/example/Entity", &Plain)?;

	let class = set.get_or_create_class("a");
	class.set_field_name("x", "count")?;
	class.set_method_name_and_desc("m", "()V", "run", "()V")?;

	let class = set.class_by_obf("a").context("class should exist")?;
	assert_eq!(class.to_string(), "a <-> com/example/Entity\nFields:\n\tx <-> count\nMethods:\n\tm()V <-> run()V\n");
	Ok(())
}
