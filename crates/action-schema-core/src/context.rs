//! Render context
//!
//! A read-only, ordered map of auxiliary values visible to computed fields,
//! conditions, refinements and hooks for the duration of one render call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered `String -> Value` mapping passed to every callable during a render
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
	entries: Map<String, Value>,
}

impl Context {
	/// Creates an empty context
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an entry, consuming and returning the context
	///
	/// # Examples
	///
	/// ```
	/// use action_schema_core::Context;
	/// use serde_json::json;
	///
	/// let context = Context::new().with("locale", "en");
	/// assert_eq!(context.get("locale"), Some(&json!("en")));
	/// ```
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(key, value);
		self
	}

	/// Inserts or overwrites an entry
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.entries.insert(key.into(), value.into());
	}

	/// Returns the value stored under `key`
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries.get(key)
	}

	/// Whether an entry exists for `key`
	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Number of entries
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the context is empty
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over entries in insertion order
	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.entries.iter()
	}

	/// Shallow merge: every key of `other` overwrites the same key here.
	///
	/// Nested objects are replaced as a whole, never merged recursively.
	pub fn merge(&mut self, other: &Context) {
		for (key, value) in other.entries.iter() {
			self.entries.insert(key.clone(), value.clone());
		}
	}

	/// Returns a new context equal to `self` shallow-merged with `other`
	pub fn merged(&self, other: &Context) -> Context {
		let mut merged = self.clone();
		merged.merge(other);
		merged
	}

	/// Consumes the context and returns it as a JSON object
	pub fn into_value(self) -> Value {
		Value::Object(self.entries)
	}
}

impl From<Map<String, Value>> for Context {
	fn from(entries: Map<String, Value>) -> Self {
		Self { entries }
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut context = Context::new();
		for (key, value) in iter {
			context.insert(key, value);
		}
		context
	}
}
