//! Process-wide configuration
//!
//! The configuration is a lazily initialised singleton. Readers take an
//! `Arc` snapshot; writers go through [`configure`], which swaps in an
//! updated copy, so a render that already took its snapshot is never
//! affected by a concurrent update.

use crate::callable::{IntoTransform, Transform};
use crate::error::{RenderError, Result};
use crate::registry::TagRegistry;
use crate::schema::Schema;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

static CONFIGURATION: Lazy<RwLock<Arc<Configuration>>> =
	Lazy::new(|| RwLock::new(Arc::new(Configuration::default())));

// Targets of `BaseSchema::Named`.
static BASE_SCHEMAS: Lazy<TagRegistry> = Lazy::new(TagRegistry::new);

/// Key transformation applied to every non-aliased output key
#[derive(Clone)]
pub struct KeyTransform(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl KeyTransform {
	/// Wraps a `key -> key` function
	pub fn new<F>(transform: F) -> Self
	where
		F: Fn(&str) -> String + Send + Sync + 'static,
	{
		Self(Arc::new(transform))
	}

	/// Upper-cases every key
	pub fn uppercase() -> Self {
		Self::new(str::to_uppercase)
	}

	/// Lower-cases every key
	pub fn lowercase() -> Self {
		Self::new(str::to_lowercase)
	}

	/// Applies the transformation
	pub fn apply(&self, key: &str) -> String {
		(self.0)(key)
	}
}

impl fmt::Debug for KeyTransform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("KeyTransform").field(&"<function>").finish()
	}
}

/// Schema that inline and host-defined schemas are derived from
#[derive(Debug, Clone, Default)]
pub enum BaseSchema {
	/// The empty root schema
	#[default]
	Root,
	/// A concrete schema
	Schema(Schema),
	/// A schema registered with [`register_base_schema`], looked up on use
	Named(String),
}

impl From<Schema> for BaseSchema {
	fn from(schema: Schema) -> Self {
		Self::Schema(schema)
	}
}

impl From<&str> for BaseSchema {
	fn from(name: &str) -> Self {
		Self::Named(name.to_string())
	}
}

impl From<String> for BaseSchema {
	fn from(name: String) -> Self {
		Self::Named(name)
	}
}

/// Global schema configuration
#[derive(Debug, Clone, Default)]
pub struct Configuration {
	base_schema: BaseSchema,
	transform_keys: Option<KeyTransform>,
	type_serializers: IndexMap<String, Transform>,
}

impl Configuration {
	/// Resolves the configured base schema.
	///
	/// The root base yields a fresh empty schema on every call.
	pub fn base_schema(&self) -> Result<Schema> {
		match &self.base_schema {
			BaseSchema::Root => Ok(Schema::empty()),
			BaseSchema::Schema(schema) => Ok(schema.clone()),
			BaseSchema::Named(name) => BASE_SCHEMAS
				.get(name)
				.ok_or_else(|| RenderError::schema_not_found(name.as_str())),
		}
	}

	/// The configured base schema reference, unresolved
	pub fn base_schema_ref(&self) -> &BaseSchema {
		&self.base_schema
	}

	/// Sets the base schema
	pub fn set_base_schema(&mut self, base: impl Into<BaseSchema>) -> &mut Self {
		self.base_schema = base.into();
		self
	}

	/// The configured key transformation
	pub fn transform_keys(&self) -> Option<&KeyTransform> {
		self.transform_keys.as_ref()
	}

	/// Sets or clears the key transformation
	pub fn set_transform_keys(&mut self, transform: Option<KeyTransform>) -> &mut Self {
		self.transform_keys = transform;
		self
	}

	/// Applies the key transformation, if any
	pub fn transform_key(&self, key: &str) -> String {
		match &self.transform_keys {
			Some(transform) => transform.apply(key),
			None => key.to_string(),
		}
	}

	/// Registers a serializer for values of the named type
	pub fn register_type_serializer<M>(
		&mut self,
		type_name: impl Into<String>,
		serializer: impl IntoTransform<M>,
	) -> &mut Self {
		self.type_serializers
			.insert(type_name.into(), serializer.into_transform());
		self
	}

	/// The serializer registered for `type_name`
	pub fn type_serializer(&self, type_name: &str) -> Option<&Transform> {
		self.type_serializers.get(type_name)
	}

	/// All registered type serializers
	pub fn type_serializers(&self) -> &IndexMap<String, Transform> {
		&self.type_serializers
	}
}

/// Snapshot of the current configuration
pub fn configuration() -> Arc<Configuration> {
	CONFIGURATION.read().clone()
}

/// Updates the configuration
///
/// `update` runs on a copy of the current snapshot with no lock held, so it
/// may build schemas or read [`configuration`] itself. Concurrent calls are
/// last-writer-wins.
///
/// # Examples
///
/// ```
/// use action_schema_core::config::{configure, configuration, reset_configuration, KeyTransform};
///
/// configure(|config| {
///     config.set_transform_keys(Some(KeyTransform::uppercase()));
/// });
/// assert_eq!(configuration().transform_key("id"), "ID");
/// reset_configuration();
/// ```
pub fn configure<F>(update: F)
where
	F: FnOnce(&mut Configuration),
{
	let mut next = Configuration::clone(&configuration());
	update(&mut next);
	*CONFIGURATION.write() = Arc::new(next);
}

/// Restores the default configuration
pub fn reset_configuration() {
	*CONFIGURATION.write() = Arc::new(Configuration::default());
}

/// Makes `schema` available as [`BaseSchema::Named`] target `name`
pub fn register_base_schema(name: impl Into<String>, schema: Schema) -> Option<Schema> {
	BASE_SCHEMAS.register(name, schema)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::SchemaBuilder;
	use rstest::rstest;
	use serde_json::{Value, json};

	#[rstest]
	fn test_defaults() {
		let config = Configuration::default();

		assert!(config.transform_keys().is_none());
		assert!(config.type_serializers().is_empty());
		assert!(matches!(config.base_schema_ref(), BaseSchema::Root));
		assert!(config.base_schema().unwrap().is_empty());
	}

	#[rstest]
	fn test_transform_key_is_identity_without_transform() {
		let config = Configuration::default();

		assert_eq!(config.transform_key("created_at"), "created_at");
	}

	#[rstest]
	fn test_named_base_schema_resolves_lazily() {
		// Arrange
		let mut config = Configuration::default();
		config.set_base_schema("config_test_named_base");
		assert!(matches!(
			config.base_schema(),
			Err(RenderError::SchemaNotFound { .. })
		));

		// Act
		register_base_schema(
			"config_test_named_base",
			SchemaBuilder::new().field("id").build().unwrap(),
		);

		// Assert
		assert_eq!(config.base_schema().unwrap().len(), 1);
	}

	#[rstest]
	fn test_type_serializers_are_queryable() {
		let mut config = Configuration::default();
		config.register_type_serializer("date", |value: Value| {
			value.as_str().map(|s| s.replace('/', "-"))
		});

		let serializer = config.type_serializer("date").unwrap();

		assert_eq!(
			serializer.apply(json!("2024/01/02"), &Default::default()),
			json!("2024-01-02")
		);
		assert!(config.type_serializer("time").is_none());
	}
}
