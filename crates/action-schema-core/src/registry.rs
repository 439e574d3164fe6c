//! Tagged schema registry
//!
//! A registry maps symbolic tags to schemas. Schemas derived from one another
//! share the same registry storage, so a tag registered anywhere in a family
//! resolves everywhere in it, including inside inline nested schemas.

use crate::schema::Schema;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Shared `tag -> Schema` mapping
///
/// Cloning a registry yields another handle to the same storage. Use
/// [`TagRegistry::detached`] for an independent copy.
#[derive(Clone, Default)]
pub struct TagRegistry {
	schemas: Arc<RwLock<IndexMap<String, Schema>>>,
}

impl TagRegistry {
	/// Creates an empty registry with its own storage
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `schema` under `tag`, returning the schema it replaced
	pub fn register(&self, tag: impl Into<String>, schema: Schema) -> Option<Schema> {
		let tag = tag.into();
		let previous = self.schemas.write().insert(tag.clone(), schema);
		if previous.is_some() {
			tracing::warn!(tag = %tag, "replacing previously registered schema");
		} else {
			tracing::debug!(tag = %tag, "registered tagged schema");
		}
		previous
	}

	/// Looks up the schema registered under `tag`
	pub fn get(&self, tag: &str) -> Option<Schema> {
		self.schemas.read().get(tag).cloned()
	}

	/// Whether `tag` is registered
	pub fn contains(&self, tag: &str) -> bool {
		self.schemas.read().contains_key(tag)
	}

	/// Removes the schema registered under `tag`
	pub fn remove(&self, tag: &str) -> Option<Schema> {
		self.schemas.write().shift_remove(tag)
	}

	/// Registered tags in registration order
	pub fn tags(&self) -> Vec<String> {
		self.schemas.read().keys().cloned().collect()
	}

	/// Number of registered tags
	pub fn len(&self) -> usize {
		self.schemas.read().len()
	}

	/// Whether nothing is registered
	pub fn is_empty(&self) -> bool {
		self.schemas.read().is_empty()
	}

	/// Copies the current entries into new, independent storage
	pub fn detached(&self) -> Self {
		Self {
			schemas: Arc::new(RwLock::new(self.schemas.read().clone())),
		}
	}

	/// Whether both handles point at the same storage
	pub fn ptr_eq(&self, other: &TagRegistry) -> bool {
		Arc::ptr_eq(&self.schemas, &other.schemas)
	}
}

impl fmt::Debug for TagRegistry {
	// Schemas hold their registry, so only the tags are printed.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TagRegistry")
			.field("tags", &self.tags())
			.finish()
	}
}
