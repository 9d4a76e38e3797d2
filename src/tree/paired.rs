use std::fmt::Debug;
use std::hash::Hash;
use anyhow::{anyhow, bail, Context, Result};
use indexmap::{Equivalent, IndexMap};
use indexmap::map::Entry;
use crate::tree::{DeobfKey, FromObfKey, ObfKey};

/// One set of nodes, reachable under two keys: the fixed obfuscated key, and the node's
/// current deobfuscated key.
///
/// The nodes live in the obf-keyed map; the deobf side is an index pointing back at the obf
/// key. Every mutation goes through methods that update both sides together, so both sides
/// always hold the same number of entries, and every node stays reachable under its current
/// keys even across renames.
#[derive(Debug, Clone)]
pub(crate) struct PairedIndex<K, V> {
	by_obf: IndexMap<K, V>,
	by_deobf: IndexMap<K, K>,
}

impl<K, V> PairedIndex<K, V>
where
	K: Hash + Eq + Clone + Debug,
	V: ObfKey<K> + DeobfKey<K> + FromObfKey<K> + Debug,
{
	pub(crate) fn new() -> PairedIndex<K, V> {
		PairedIndex {
			by_obf: IndexMap::new(),
			by_deobf: IndexMap::new(),
		}
	}

	pub(crate) fn len(&self) -> usize {
		debug_assert_eq!(self.by_obf.len(), self.by_deobf.len());
		self.by_obf.len()
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the node for the given obfuscated key, creating it first if there is none.
	///
	/// A fresh node starts out with its deobfuscated key equal to the obfuscated one.
	pub(crate) fn get_or_create(&mut self, obf_key: K) -> &mut V {
		match self.by_obf.entry(obf_key) {
			Entry::Occupied(e) => e.into_mut(),
			Entry::Vacant(e) => {
				let node = V::from_obf_key(e.key());
				self.by_deobf.insert(e.key().clone(), e.key().clone());
				e.insert(node)
			},
		}
	}

	/// Adds a prebuilt node, failing if either of its keys is already taken.
	pub(crate) fn add(&mut self, node: V) -> Result<()> {
		let obf_key = node.obf_key();
		let deobf_key = node.deobf_key();
		if let Some(present) = self.by_obf.get(&obf_key) {
			bail!("cannot add node {node:?} for key {obf_key:?}, as there's already one: {present:?}");
		}
		if self.by_deobf.contains_key(&deobf_key) {
			bail!("cannot add node {node:?}, as its deobfuscated key {deobf_key:?} is already in use");
		}
		self.by_deobf.insert(deobf_key, obf_key.clone());
		self.by_obf.insert(obf_key, node);
		Ok(())
	}

	pub(crate) fn by_obf<Q>(&self, key: &Q) -> Option<&V>
	where
		Q: Hash + Equivalent<K> + ?Sized,
	{
		self.by_obf.get(key)
	}

	pub(crate) fn by_deobf<Q>(&self, key: &Q) -> Option<&V>
	where
		Q: Hash + Equivalent<K> + ?Sized,
	{
		let obf_key = self.by_deobf.get(key)?;
		let node = self.by_obf.get(obf_key);
		debug_assert!(node.is_some(), "deobf index names obf key {obf_key:?} with no node");
		node
	}

	/// Moves the node at `obf_key` to a new deobfuscated key.
	///
	/// `update` must change the node so that its deobfuscated key becomes `new_deobf`; the
	/// deobf index entry is re-keyed around it. Fails without touching the node or either
	/// index if another node already holds `new_deobf`. Moving a node to the key it already
	/// has is allowed and leaves everything as is.
	pub(crate) fn rekey_deobf<Q>(&mut self, obf_key: &Q, new_deobf: K, update: impl FnOnce(&mut V)) -> Result<()>
	where
		Q: Hash + Equivalent<K> + Debug + ?Sized,
	{
		let node = self.by_obf.get_mut(obf_key)
			.with_context(|| anyhow!("no node for key {obf_key:?}"))?;
		let old_deobf = node.deobf_key();
		if old_deobf != new_deobf && self.by_deobf.contains_key(&new_deobf) {
			bail!("cannot move node {obf_key:?} to deobfuscated key {new_deobf:?}, as another node already holds it");
		}
		update(node);
		debug_assert_eq!(node.deobf_key(), new_deobf);
		let obf_key = node.obf_key();
		self.by_deobf.shift_remove(&old_deobf);
		self.by_deobf.insert(new_deobf, obf_key);
		Ok(())
	}

	pub(crate) fn values(&self) -> indexmap::map::Values<'_, K, V> {
		self.by_obf.values()
	}

	/// Mutable iteration over the nodes. Callers must not change a node's deobfuscated key
	/// through this; renames go through [`Self::rekey_deobf`].
	pub(crate) fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, K, V> {
		self.by_obf.values_mut()
	}
}
