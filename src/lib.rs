//! Crate for storing and querying the name mappings used when deobfuscating Java bytecode.
//!
//! A mapping tree associates the identifiers found in a compiled artifact (the "obfuscated"
//! names) with the identifiers a human assigned to them (the "deobfuscated" names), for
//! classes, inner classes, fields, methods and method arguments. See [`tree::mappings`] for
//! building and editing such a tree, and [`translator`] for querying it in either direction,
//! including lookups that fall back through a class's ancestors and the rewriting of
//! descriptors that embed class names.
//!
//! Reading and writing mapping files, class file parsing, ancestry computation and
//! descriptor tokenization are not part of this crate; the [`tree::NameValidator`],
//! [`translator::AncestorProvider`] and [`translator::DescRewriter`] traits are the seams
//! where those are plugged in.

pub mod tree;

pub mod entry;

pub mod translator;
