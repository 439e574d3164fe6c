//! Association schema references and their resolution

use crate::context::Context;
use crate::error::{RenderError, Result};
use crate::registry::TagRegistry;
use crate::schema::Schema;
use std::fmt;
use std::sync::Arc;

type DeferredFn = Arc<dyn Fn(&Context) -> SchemaRef + Send + Sync>;

/// Reference from an association to the schema that renders it
///
/// Inline blocks never appear here: they are compiled into a
/// [`SchemaRef::Schema`] when the association is defined.
#[derive(Clone)]
pub enum SchemaRef {
	/// Symbolic tag looked up in the tag registry at render time
	Tag(String),
	/// Concrete schema used as is
	Schema(Schema),
	/// Closure evaluated against the render context at render time
	Deferred(DeferredFn),
}

impl SchemaRef {
	/// Reference by tag
	pub fn tag(tag: impl Into<String>) -> Self {
		Self::Tag(tag.into())
	}

	/// Reference chosen at render time from the render context
	///
	/// # Examples
	///
	/// ```
	/// use action_schema_core::{Context, SchemaRef};
	///
	/// let by_role = SchemaRef::deferred(|ctx: &Context| {
	///     if ctx.get("admin").is_some() {
	///         SchemaRef::tag("admin_post")
	///     } else {
	///         SchemaRef::tag("post")
	///     }
	/// });
	/// ```
	pub fn deferred<F>(select: F) -> Self
	where
		F: Fn(&Context) -> SchemaRef + Send + Sync + 'static,
	{
		Self::Deferred(Arc::new(select))
	}

	pub(crate) fn is_blank_tag(&self) -> bool {
		matches!(self, SchemaRef::Tag(tag) if tag.trim().is_empty())
	}

	/// Resolves the reference to a concrete schema.
	///
	/// Tags are looked up in `own` first and then in `fallback`, the registry
	/// supplied by a hosting integration.
	pub fn resolve(
		&self,
		own: &TagRegistry,
		fallback: Option<&TagRegistry>,
		context: &Context,
	) -> Result<Schema> {
		match self {
			SchemaRef::Schema(schema) => Ok(schema.clone()),
			SchemaRef::Tag(tag) => resolve_tag(tag, own, fallback),
			SchemaRef::Deferred(select) => match select(context) {
				SchemaRef::Schema(schema) => Ok(schema),
				SchemaRef::Tag(tag) => resolve_tag(&tag, own, fallback),
				SchemaRef::Deferred(_) => Err(RenderError::InvalidSchemaValue {
					value: "deferred reference resolved to another deferred reference".to_string(),
				}),
			},
		}
	}
}

fn resolve_tag(tag: &str, own: &TagRegistry, fallback: Option<&TagRegistry>) -> Result<Schema> {
	if let Some(schema) = own.get(tag) {
		tracing::trace!(tag, "resolved tag from schema registry");
		return Ok(schema);
	}
	if let Some(schema) = fallback.and_then(|registry| registry.get(tag)) {
		tracing::trace!(tag, "resolved tag from host registry");
		return Ok(schema);
	}
	tracing::debug!(tag, "no schema registered for tag");
	Err(RenderError::schema_not_found(tag))
}

impl fmt::Debug for SchemaRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SchemaRef::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
			SchemaRef::Schema(schema) => f.debug_tuple("Schema").field(schema).finish(),
			SchemaRef::Deferred(_) => f.debug_tuple("Deferred").field(&"<function>").finish(),
		}
	}
}

impl From<&str> for SchemaRef {
	fn from(tag: &str) -> Self {
		Self::Tag(tag.to_string())
	}
}

impl From<String> for SchemaRef {
	fn from(tag: String) -> Self {
		Self::Tag(tag)
	}
}

impl From<Schema> for SchemaRef {
	fn from(schema: Schema) -> Self {
		Self::Schema(schema)
	}
}

impl From<&Schema> for SchemaRef {
	fn from(schema: &Schema) -> Self {
		Self::Schema(schema.clone())
	}
}
