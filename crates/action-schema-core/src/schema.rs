//! Schema definition model
//!
//! A [`SchemaBuilder`] collects field specifications, hooks and context at
//! definition time and compiles them into an immutable [`Schema`]. Deriving
//! one schema from another goes through [`Schema::extend`], which copies the
//! definition, hooks and context but keeps the tag registry shared.

use crate::callable::{IntoCompute, IntoTransform, Transform};
use crate::config::configuration;
use crate::context::Context;
use crate::error::{RenderError, Result};
use crate::field::{AssociationOptions, FieldKind, FieldOptions, FieldSpec};
use crate::registry::TagRegistry;
use crate::resolve::SchemaRef;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Render phase a hook belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
	/// Runs on the renderable before any record is rendered
	BeforeRender,
	/// Runs on the assembled output
	AfterRender,
}

pub(crate) struct SchemaInner {
	pub(crate) name: Option<String>,
	pub(crate) definition: IndexMap<String, FieldSpec>,
	pub(crate) before_render: Vec<Transform>,
	pub(crate) after_render: Vec<Transform>,
	pub(crate) context: Context,
	pub(crate) tags: TagRegistry,
}

/// Immutable, cheaply clonable schema descriptor
#[derive(Clone)]
pub struct Schema {
	pub(crate) inner: Arc<SchemaInner>,
}

impl Schema {
	/// Starts a new, empty definition with its own tag registry
	pub fn builder() -> SchemaBuilder {
		SchemaBuilder::new()
	}

	/// An empty schema with its own tag registry
	pub fn empty() -> Schema {
		SchemaBuilder::new().compile()
	}

	/// Starts a derived definition.
	///
	/// The builder receives independent copies of the definition, hooks and
	/// context, and the same tag registry. Name and tag are not inherited.
	pub fn extend(&self) -> SchemaBuilder {
		SchemaBuilder {
			name: None,
			tag: None,
			definition: self.inner.definition.clone(),
			before_render: self.inner.before_render.clone(),
			after_render: self.inner.after_render.clone(),
			context: self.inner.context.clone(),
			tags: self.inner.tags.clone(),
			error: None,
		}
	}

	/// Diagnostic name
	pub fn name(&self) -> Option<&str> {
		self.inner.name.as_deref()
	}

	/// Definition keys in render order
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.inner.definition.keys().map(String::as_str)
	}

	/// The specification stored under `key`
	pub fn spec(&self, key: &str) -> Option<&FieldSpec> {
		self.inner.definition.get(key)
	}

	/// Number of definition entries
	pub fn len(&self) -> usize {
		self.inner.definition.len()
	}

	/// Whether the definition has no entries
	pub fn is_empty(&self) -> bool {
		self.inner.definition.is_empty()
	}

	/// Schema-level render context
	pub fn context(&self) -> &Context {
		&self.inner.context
	}

	/// The tag registry shared with the schema's family
	pub fn tags(&self) -> &TagRegistry {
		&self.inner.tags
	}

	/// Looks up a schema registered in this schema's family
	pub fn tagged(&self, tag: &str) -> Option<Schema> {
		self.inner.tags.get(tag)
	}

	/// Number of hooks registered for `phase`
	pub fn hook_count(&self, phase: HookPhase) -> usize {
		self.hooks(phase).len()
	}

	pub(crate) fn hooks(&self, phase: HookPhase) -> &[Transform] {
		match phase {
			HookPhase::BeforeRender => &self.inner.before_render,
			HookPhase::AfterRender => &self.inner.after_render,
		}
	}

	pub(crate) fn definition(&self) -> &IndexMap<String, FieldSpec> {
		&self.inner.definition
	}

	/// Whether both handles point at the same descriptor
	pub fn ptr_eq(&self, other: &Schema) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for Schema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Schema")
			.field("name", &self.inner.name)
			.field("keys", &self.inner.definition.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Definition-time builder for [`Schema`]
///
/// Later definitions of the same key overwrite earlier ones in place;
/// [`SchemaBuilder::omit`] removes keys outright.
///
/// # Examples
///
/// ```
/// use action_schema_core::SchemaBuilder;
/// use serde_json::{json, Value};
///
/// let schema = SchemaBuilder::new()
///     .fields(["id", "name"])
///     .computed("initials", |user: &Value| {
///         user["name"].as_str().unwrap_or_default().chars().take(1).collect::<String>()
///     })
///     .build()
///     .unwrap();
///
/// let rendered = schema.render(&json!({"id": 1, "name": "John", "age": 50})).unwrap();
/// assert_eq!(rendered, json!({"id": 1, "name": "John", "initials": "J"}));
/// ```
pub struct SchemaBuilder {
	name: Option<String>,
	tag: Option<String>,
	definition: IndexMap<String, FieldSpec>,
	before_render: Vec<Transform>,
	after_render: Vec<Transform>,
	context: Context,
	tags: TagRegistry,
	error: Option<RenderError>,
}

impl Default for SchemaBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl SchemaBuilder {
	/// Creates an empty builder with a fresh tag registry
	pub fn new() -> Self {
		Self {
			name: None,
			tag: None,
			definition: IndexMap::new(),
			before_render: Vec::new(),
			after_render: Vec::new(),
			context: Context::new(),
			tags: TagRegistry::new(),
			error: None,
		}
	}

	/// Sets the diagnostic name used in logs
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Registers the built schema under `tag` in the shared registry
	pub fn tag(mut self, tag: impl Into<String>) -> Self {
		let tag = tag.into();
		if tag.trim().is_empty() {
			self.fail("A schema tag must not be blank");
		} else {
			self.tag = Some(tag);
		}
		self
	}

	/// Replaces the tag registry with `registry`
	pub fn with_tags(mut self, registry: TagRegistry) -> Self {
		self.tags = registry;
		self
	}

	/// Replaces the shared tag registry with a fresh, empty one
	pub fn detach_tags(self) -> Self {
		self.with_tags(TagRegistry::new())
	}

	/// The tag registry this builder will attach to its schema
	pub fn tags(&self) -> &TagRegistry {
		&self.tags
	}

	/// Exposes `name` read off the record under the same key
	pub fn field(self, name: impl Into<String>) -> Self {
		self.field_with(name, FieldOptions::new())
	}

	/// Exposes `name` with rename, conditions, refinement or another source
	pub fn field_with(mut self, name: impl Into<String>, options: FieldOptions) -> Self {
		let name = name.into();
		if self.check_name(&name, "field") {
			let source = options.source.clone().unwrap_or_else(|| name.clone());
			let spec = options.apply(FieldKind::Field { source });
			self.definition.insert(name, spec);
		}
		self
	}

	/// Exposes each of `names` without options
	pub fn fields<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		for name in names {
			self = self.field(name);
		}
		self
	}

	/// Removes keys from the definition; absent keys are ignored
	pub fn omit<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for name in names {
			self.definition.shift_remove(name.as_ref());
		}
		self
	}

	/// Adds a value computed from the record and the render context
	pub fn computed<M>(self, name: impl Into<String>, compute: impl IntoCompute<M>) -> Self {
		self.computed_with(name, compute, FieldOptions::new())
	}

	/// Adds a computed value with rename, conditions or refinement
	pub fn computed_with<M>(
		mut self,
		name: impl Into<String>,
		compute: impl IntoCompute<M>,
		options: FieldOptions,
	) -> Self {
		let name = name.into();
		if options.source.is_some() {
			self.fail(format!("A computed field cannot read a source attribute ('{}')", name));
			return self;
		}
		if self.check_name(&name, "computed field") {
			let spec = options.apply(FieldKind::Computed(compute.into_compute()));
			self.definition.insert(name, spec);
		}
		self
	}

	/// Renders the attribute `name` with the referenced schema
	pub fn association(self, name: impl Into<String>, schema: impl Into<SchemaRef>) -> Self {
		self.association_with(name, schema, AssociationOptions::new())
	}

	/// Renders the attribute `name` with the referenced schema and options
	pub fn association_with(
		mut self,
		name: impl Into<String>,
		schema: impl Into<SchemaRef>,
		options: AssociationOptions,
	) -> Self {
		let name = name.into();
		let schema = schema.into();
		if schema.is_blank_tag() {
			self.fail(format!(
				"A schema, tag, or block must be provided for association '{}'",
				name
			));
			return self;
		}
		if self.check_name(&name, "association") {
			self.definition.insert(name, options.apply(schema));
		}
		self
	}

	/// Renders the attribute `name` with a schema defined inline.
	///
	/// The block is compiled immediately, on top of the configured base
	/// schema, and shares this builder's tag registry.
	pub fn association_inline<F>(self, name: impl Into<String>, define: F) -> Self
	where
		F: FnOnce(SchemaBuilder) -> SchemaBuilder,
	{
		self.association_inline_with(name, AssociationOptions::new(), define)
	}

	/// Inline association with options
	pub fn association_inline_with<F>(
		self,
		name: impl Into<String>,
		options: AssociationOptions,
		define: F,
	) -> Self
	where
		F: FnOnce(SchemaBuilder) -> SchemaBuilder,
	{
		let name = name.into();
		match self.compile_inline(define) {
			Ok(schema) => self.association_with(name, schema, options),
			Err(error) => self.fail_with(error),
		}
	}

	fn compile_inline<F>(&self, define: F) -> Result<Schema>
	where
		F: FnOnce(SchemaBuilder) -> SchemaBuilder,
	{
		let base = configuration().base_schema()?;
		define(base.extend().with_tags(self.tags.clone())).build()
	}

	/// Appends a hook run on the renderable before rendering
	pub fn before_render<M>(mut self, hook: impl IntoTransform<M>) -> Self {
		self.before_render.push(hook.into_transform());
		self
	}

	/// Appends a hook run on the output after rendering
	pub fn after_render<M>(mut self, hook: impl IntoTransform<M>) -> Self {
		self.after_render.push(hook.into_transform());
		self
	}

	/// Adds one schema-level context entry
	pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.context.insert(key, value);
		self
	}

	/// Merges a map into the schema-level context
	pub fn with_context(mut self, context: Context) -> Self {
		self.context.merge(&context);
		self
	}

	/// Finishes the definition.
	///
	/// Returns the first definition error recorded by the builder, if any.
	/// Tagged schemas are registered in the shared registry.
	pub fn build(mut self) -> Result<Schema> {
		if let Some(error) = self.error.take() {
			return Err(error);
		}
		let tag = self.tag.take();
		let schema = self.compile();
		if let Some(tag) = tag {
			schema.inner.tags.register(tag, schema.clone());
		}
		Ok(schema)
	}

	fn compile(self) -> Schema {
		Schema {
			inner: Arc::new(SchemaInner {
				name: self.name,
				definition: self.definition,
				before_render: self.before_render,
				after_render: self.after_render,
				context: self.context,
				tags: self.tags,
			}),
		}
	}

	fn check_name(&mut self, name: &str, what: &str) -> bool {
		if name.trim().is_empty() {
			self.fail(format!("A {} name must not be blank", what));
			return false;
		}
		true
	}

	fn fail(&mut self, message: impl Into<String>) {
		if self.error.is_none() {
			self.error = Some(RenderError::argument(message));
		}
	}

	fn fail_with(mut self, error: RenderError) -> Self {
		if self.error.is_none() {
			self.error = Some(error);
		}
		self
	}
}

impl fmt::Debug for SchemaBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SchemaBuilder")
			.field("name", &self.name)
			.field("tag", &self.tag)
			.field("keys", &self.definition.keys().collect::<Vec<_>>())
			.field("error", &self.error)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_later_definition_overwrites_in_place() {
		// Arrange & Act
		let schema = SchemaBuilder::new()
			.fields(["id", "name"])
			.computed("id", || 7)
			.build()
			.unwrap();

		// Assert
		assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["id", "name"]);
		assert!(matches!(schema.spec("id").unwrap().kind(), FieldKind::Computed(_)));
	}

	#[rstest]
	fn test_omit_ignores_absent_keys() {
		let schema = SchemaBuilder::new()
			.fields(["id", "name", "age"])
			.omit(["age", "missing"])
			.build()
			.unwrap();

		assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["id", "name"]);
	}

	#[rstest]
	fn test_extend_copies_definition_and_shares_tags() {
		// Arrange
		let base = SchemaBuilder::new()
			.field("id")
			.context("locale", "en")
			.after_render(|v: Value| v)
			.build()
			.unwrap();

		// Act
		let child = base.extend().field("name").omit(["id"]).build().unwrap();

		// Assert
		assert_eq!(base.keys().collect::<Vec<_>>(), vec!["id"]);
		assert_eq!(child.keys().collect::<Vec<_>>(), vec!["name"]);
		assert_eq!(child.context().len(), 1);
		assert_eq!(child.hook_count(HookPhase::AfterRender), 1);
		assert!(child.tags().ptr_eq(base.tags()));
	}

	#[rstest]
	fn test_detach_tags_resets_registry() {
		let base = SchemaBuilder::new().build().unwrap();

		let child = base.extend().detach_tags().build().unwrap();

		assert!(!child.tags().ptr_eq(base.tags()));
	}

	#[rstest]
	fn test_tag_registers_on_build() {
		let schema = SchemaBuilder::new().tag("post").field("id").build().unwrap();

		let tagged = schema.tagged("post").unwrap();

		assert!(tagged.ptr_eq(&schema));
	}

	#[rstest]
	#[case(SchemaBuilder::new().field(" "))]
	#[case(SchemaBuilder::new().computed("", || 1))]
	#[case(SchemaBuilder::new().association("posts", ""))]
	#[case(SchemaBuilder::new().tag(""))]
	fn test_blank_arguments_fail_at_build(#[case] builder: SchemaBuilder) {
		let error = builder.build().unwrap_err();

		assert!(matches!(error, RenderError::Argument(_)));
	}

	#[rstest]
	fn test_first_definition_error_wins() {
		let error = SchemaBuilder::new()
			.association("posts", "")
			.field("")
			.build()
			.unwrap_err();

		assert_eq!(
			error.to_string(),
			"A schema, tag, or block must be provided for association 'posts'"
		);
	}

	#[rstest]
	fn test_inline_association_shares_parent_registry() {
		// Arrange
		let registry = TagRegistry::new();

		// Act
		let schema = SchemaBuilder::new()
			.with_tags(registry.clone())
			.association_inline("posts", |post| post.fields(["id", "title"]))
			.build()
			.unwrap();

		// Assert
		match schema.spec("posts").unwrap().kind() {
			FieldKind::Association {
				schema: SchemaRef::Schema(nested),
				..
			} => {
				assert!(nested.tags().ptr_eq(&registry));
				assert_eq!(nested.keys().collect::<Vec<_>>(), vec!["id", "title"]);
			}
			other => panic!("expected compiled inline schema, got {:?}", other),
		}
	}

	#[rstest]
	fn test_inline_definition_error_propagates() {
		let error = SchemaBuilder::new()
			.association_inline("posts", |post| post.field(""))
			.build()
			.unwrap_err();

		assert!(matches!(error, RenderError::Argument(_)));
	}

	#[rstest]
	fn test_source_on_computed_field_is_rejected() {
		let error = SchemaBuilder::new()
			.computed_with("age", || 30, FieldOptions::new().source("years"))
			.build()
			.unwrap_err();

		assert!(matches!(error, RenderError::Argument(_)));
		assert_eq!(
			error.to_string(),
			"A computed field cannot read a source attribute ('age')"
		);
	}
}
