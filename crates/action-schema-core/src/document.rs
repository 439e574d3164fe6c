//! Declarative schema documents
//!
//! Schemas made only of plain fields and tagged associations can be written
//! as data (JSON, TOML or any other serde format) and compiled into a
//! [`Schema`] against a tag registry.
//!
//! ```
//! use action_schema_core::document::SchemaDocument;
//! use action_schema_core::TagRegistry;
//! use serde_json::json;
//!
//! let registry = TagRegistry::new();
//! SchemaDocument::from_json(r#"{"tag": "post", "fields": {"id": {"type": "field"}}}"#)
//!     .unwrap()
//!     .compile(&registry)
//!     .unwrap();
//! let user = SchemaDocument::from_json(
//!     r#"{"fields": {
//!         "id": {"type": "field"},
//!         "display": {"type": "field", "source": "name", "as": "displayName"},
//!         "posts": {"type": "association", "schema": "post"}
//!     }}"#,
//! )
//! .unwrap()
//! .compile(&registry)
//! .unwrap();
//!
//! let rendered = user
//!     .render(&json!({"id": 1, "name": "John", "posts": [{"id": 7}]}))
//!     .unwrap();
//! assert_eq!(
//!     rendered,
//!     json!({"id": 1, "displayName": "John", "posts": [{"id": 7}]})
//! );
//! ```

use crate::context::Context;
use crate::error::{RenderError, Result};
use crate::field::{AssociationOptions, FieldOptions};
use crate::registry::TagRegistry;
use crate::resolve::SchemaRef;
use crate::schema::{Schema, SchemaBuilder};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const FIELD: &str = "field";
const ASSOCIATION: &str = "association";

/// A schema described as data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
	/// Diagnostic name
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Tag the compiled schema is registered under
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tag: Option<String>,
	/// Tag of the schema this one derives from
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extends: Option<String>,
	/// Output keys in render order
	#[serde(default)]
	pub fields: IndexMap<String, FieldDocument>,
	/// Keys removed after `fields` are applied
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub omit: Vec<String>,
	/// Schema-level context
	#[serde(default, skip_serializing_if = "Context::is_empty")]
	pub context: Context,
}

/// One entry of [`SchemaDocument::fields`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDocument {
	/// `field` or `association`
	#[serde(rename = "type")]
	pub kind: String,
	/// Attribute read off the record for plain fields
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
	/// Output alias
	#[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
	pub rename: Option<String>,
	/// Tag of the nested schema for associations
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub schema: Option<Value>,
	/// Child context override for associations
	#[serde(default, skip_serializing_if = "Context::is_empty")]
	pub context: Context,
}

impl SchemaDocument {
	/// Parses a JSON document
	pub fn from_json(input: &str) -> Result<Self> {
		Ok(serde_json::from_str(input)?)
	}

	/// Converts an already parsed JSON value
	pub fn from_value(value: Value) -> Result<Self> {
		Ok(serde_json::from_value(value)?)
	}

	/// Compiles the document into a schema sharing `registry`.
	///
	/// The schema is registered under [`SchemaDocument::tag`] when set.
	pub fn compile(&self, registry: &TagRegistry) -> Result<Schema> {
		let mut builder = match &self.extends {
			Some(parent) => registry
				.get(parent)
				.ok_or_else(|| RenderError::schema_not_found(parent.as_str()))?
				.extend(),
			None => SchemaBuilder::new(),
		}
		.with_tags(registry.clone())
		.with_context(self.context.clone());

		if let Some(name) = &self.name {
			builder = builder.name(name.as_str());
		}
		if let Some(tag) = &self.tag {
			builder = builder.tag(tag.as_str());
		}

		for (key, field) in &self.fields {
			builder = field.apply(key, builder)?;
		}

		builder.omit(&self.omit).build()
	}
}

impl FieldDocument {
	fn apply(&self, key: &str, builder: SchemaBuilder) -> Result<SchemaBuilder> {
		match self.kind.as_str() {
			FIELD => {
				let mut options = FieldOptions::new();
				if let Some(source) = &self.source {
					options = options.source(source.as_str());
				}
				if let Some(alias) = &self.rename {
					options = options.rename(alias.as_str());
				}
				Ok(builder.field_with(key, options))
			}
			ASSOCIATION => {
				let tag = match &self.schema {
					Some(Value::String(tag)) => tag.clone(),
					Some(other) => {
						return Err(RenderError::InvalidSchemaValue {
							value: other.to_string(),
						});
					}
					None => {
						return Err(RenderError::argument(format!(
							"A schema, tag, or block must be provided for association '{}'",
							key
						)));
					}
				};
				let mut options = AssociationOptions::new().with_context(self.context.clone());
				if let Some(alias) = &self.rename {
					options = options.rename(alias.as_str());
				}
				Ok(builder.association_with(key, SchemaRef::Tag(tag), options))
			}
			other => Err(RenderError::InvalidFieldType {
				field: key.to_string(),
				kind: other.to_string(),
			}),
		}
	}
}
