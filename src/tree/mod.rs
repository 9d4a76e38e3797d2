use anyhow::Result;

pub(crate) mod paired;

pub mod mappings;

/// Extracts the key a node has on the obfuscated side. This key never changes.
pub(crate) trait ObfKey<K> {
	fn obf_key(&self) -> K;
}

/// Extracts the key a node currently has on the deobfuscated side.
///
/// The deobfuscated key follows renames, so it must be re-read around every mutation.
pub(crate) trait DeobfKey<K> {
	fn deobf_key(&self) -> K;
}

/// Creates a fresh node from its obfuscated key, with the deobfuscated side starting out
/// equal to the obfuscated one.
pub(crate) trait FromObfKey<K> {
	fn from_obf_key(key: &K) -> Self;
}

/// Checks a deobfuscated class name before it enters a mapping tree.
///
/// Implementations may normalize the candidate; the returned name is what gets stored.
/// Only class names go through this. Field, method and argument names are stored verbatim.
pub trait NameValidator {
	fn validate_class_name(&self, candidate: &str) -> Result<String>;
}
