//! Named schemas and default context attached to a host type

use crate::context::ContextValue;
use action_schema_core::{
	Context, RenderError, Result, Schema, SchemaBuilder, TagRegistry, configuration,
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Name used when a host renders without naming a schema
pub const DEFAULT_SCHEMA: &str = "default";

/// Schemas and default context declared for the host type `H`
///
/// Every named schema is compiled from the configured base schema and
/// registered in the set's own registry, which also serves as the tag
/// fallback when the host renders.
///
/// # Examples
///
/// ```
/// use action_schema_controller::{ControllerSchemas, SchemaController};
/// use serde_json::json;
///
/// struct UsersController {
///     schemas: ControllerSchemas<UsersController>,
/// }
///
/// impl SchemaController for UsersController {
///     fn action_schemas(&self) -> &ControllerSchemas<Self> {
///         &self.schemas
///     }
/// }
///
/// let mut schemas = ControllerSchemas::new();
/// schemas.schema("default", |user| user.fields(["id", "name"])).unwrap();
/// let controller = UsersController { schemas };
///
/// let rendered = controller
///     .schema_for(&json!({"id": 1, "name": "Alice", "password": "x"}))
///     .unwrap();
/// assert_eq!(rendered, json!({"id": 1, "name": "Alice"}));
/// ```
pub struct ControllerSchemas<H> {
	registry: TagRegistry,
	context: IndexMap<String, ContextValue<H>>,
}

impl<H> ControllerSchemas<H> {
	/// Creates an empty set
	pub fn new() -> Self {
		Self {
			registry: TagRegistry::new(),
			context: IndexMap::new(),
		}
	}

	/// Defines the schema `name`, replacing any earlier definition
	pub fn schema<F>(&mut self, name: impl Into<String>, define: F) -> Result<&mut Self>
	where
		F: FnOnce(SchemaBuilder) -> SchemaBuilder,
	{
		self.schema_with_context(name, Context::new(), define)
	}

	/// Defines the schema `name` with additional schema-level context
	pub fn schema_with_context<F>(
		&mut self,
		name: impl Into<String>,
		context: Context,
		define: F,
	) -> Result<&mut Self>
	where
		F: FnOnce(SchemaBuilder) -> SchemaBuilder,
	{
		let name = name.into();
		if name.trim().is_empty() {
			return Err(RenderError::argument("A schema name must not be blank"));
		}

		let base = configuration().base_schema()?;
		let schema = define(base.extend().name(name.as_str()).with_context(context)).build()?;
		tracing::debug!(schema = %name, "defined host schema");
		self.registry.register(name, schema);
		Ok(self)
	}

	/// Adds a default context entry; later entries overwrite earlier ones
	pub fn schema_context(
		&mut self,
		key: impl Into<String>,
		value: impl Into<ContextValue<H>>,
	) -> &mut Self {
		self.context.insert(key.into(), value.into());
		self
	}

	/// Independent copy for a derived definition on the same host type
	///
	/// The copy starts with the same schemas and context entries; later
	/// definitions on either side do not affect the other.
	pub fn inherit(&self) -> Self {
		Self {
			registry: self.registry.detached(),
			context: self.context.clone(),
		}
	}

	/// Independent copy for a host type wrapping `H`
	///
	/// Lazy context entries are evaluated against the wrapped host.
	pub fn inherit_for<C>(&self) -> ControllerSchemas<C>
	where
		H: 'static,
		C: AsRef<H> + 'static,
	{
		let context = self
			.context
			.iter()
			.map(|(key, value)| {
				let value = match value {
					ContextValue::Static(value) => ContextValue::Static(value.clone()),
					ContextValue::Lazy(compute) => {
						let compute = compute.clone();
						ContextValue::lazy(move |host: &C| compute(host.as_ref()))
					}
				};
				(key.clone(), value)
			})
			.collect();
		ControllerSchemas {
			registry: self.registry.detached(),
			context,
		}
	}

	/// The schema registered as `name`
	pub fn get(&self, name: &str) -> Option<Schema> {
		self.registry.get(name)
	}

	/// Names of all defined schemas in definition order
	pub fn names(&self) -> Vec<String> {
		self.registry.tags()
	}

	/// Registry holding the defined schemas
	pub fn registry(&self) -> &TagRegistry {
		&self.registry
	}

	/// Declared default context entries
	pub fn context_entries(&self) -> impl Iterator<Item = (&str, &ContextValue<H>)> {
		self.context.iter().map(|(key, value)| (key.as_str(), value))
	}

	/// Evaluates the default context against `host`
	pub fn resolve_context(&self, host: &H) -> Context {
		self.context
			.iter()
			.map(|(key, value)| (key.as_str(), value.resolve(host)))
			.collect()
	}
}

impl<H> Default for ControllerSchemas<H> {
	fn default() -> Self {
		Self::new()
	}
}

impl<H> Clone for ControllerSchemas<H> {
	fn clone(&self) -> Self {
		Self {
			registry: self.registry.clone(),
			context: self.context.clone(),
		}
	}
}

impl<H> fmt::Debug for ControllerSchemas<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ControllerSchemas")
			.field("schemas", &self.registry.tags())
			.field("context", &self.context)
			.finish()
	}
}

/// How a host picks the schema to render with
#[derive(Debug, Clone, Default)]
pub enum SchemaLookup {
	/// The schema named [`DEFAULT_SCHEMA`]
	#[default]
	Default,
	/// A schema defined on the host by name
	Named(String),
	/// A schema used directly
	Schema(Schema),
}

impl From<&str> for SchemaLookup {
	fn from(name: &str) -> Self {
		Self::Named(name.to_string())
	}
}

impl From<String> for SchemaLookup {
	fn from(name: String) -> Self {
		Self::Named(name)
	}
}

impl From<Schema> for SchemaLookup {
	fn from(schema: Schema) -> Self {
		Self::Schema(schema)
	}
}

impl From<&Schema> for SchemaLookup {
	fn from(schema: &Schema) -> Self {
		Self::Schema(schema.clone())
	}
}

/// Rendering entry points for a host type
///
/// Implementors only hand out their [`ControllerSchemas`]; everything else
/// is provided.
pub trait SchemaController: Sized {
	/// The schemas and default context declared for this host
	fn action_schemas(&self) -> &ControllerSchemas<Self>;

	/// Default context resolved against this instance
	fn schema_context(&self) -> Context {
		self.action_schemas().resolve_context(self)
	}

	/// Finds the schema a lookup refers to
	fn resolve_schema(&self, lookup: impl Into<SchemaLookup>) -> Result<Schema> {
		let name = match lookup.into() {
			SchemaLookup::Schema(schema) => return Ok(schema),
			SchemaLookup::Default => DEFAULT_SCHEMA.to_string(),
			SchemaLookup::Named(name) => name,
		};
		self.action_schemas()
			.get(&name)
			.ok_or_else(|| RenderError::argument(format!("Schema `{}` not defined", name)))
	}

	/// Renders with the default schema and context
	fn schema_for<T>(&self, renderable: &T) -> Result<Value>
	where
		T: Serialize + ?Sized,
	{
		self.schema_for_with(renderable, SchemaLookup::Default, Context::new())
	}

	/// Renders with the given schema; `context` wins over the host context
	fn schema_for_with<T>(
		&self,
		renderable: &T,
		lookup: impl Into<SchemaLookup>,
		context: Context,
	) -> Result<Value>
	where
		T: Serialize + ?Sized,
	{
		let schema = self.resolve_schema(lookup)?;
		render_hosted(self, &schema, renderable, context)
	}

	/// Like [`schema_for_with`](Self::schema_for_with), with per-call entries
	/// that may be evaluated against this instance
	fn schema_for_resolving<T, K, I>(
		&self,
		renderable: &T,
		lookup: impl Into<SchemaLookup>,
		context: I,
	) -> Result<Value>
	where
		T: Serialize + ?Sized,
		K: Into<String>,
		I: IntoIterator<Item = (K, ContextValue<Self>)>,
	{
		let context = context
			.into_iter()
			.map(|(key, value)| (key.into(), value.resolve(self)))
			.collect::<Context>();
		self.schema_for_with(renderable, lookup, context)
	}

	/// Renders with a schema defined for this call only
	fn schema_inline<T, F>(&self, renderable: &T, context: Context, define: F) -> Result<Value>
	where
		T: Serialize + ?Sized,
		F: FnOnce(SchemaBuilder) -> SchemaBuilder,
	{
		let base = configuration().base_schema()?;
		let schema = define(base.extend()).build()?;
		render_hosted(self, &schema, renderable, context)
	}
}

fn render_hosted<H, T>(host: &H, schema: &Schema, renderable: &T, context: Context) -> Result<Value>
where
	H: SchemaController,
	T: Serialize + ?Sized,
{
	let context = host.schema_context().merged(&context);
	schema
		.renderer()
		.context(context)
		.fallback_tags(host.action_schemas().registry().clone())
		.render(renderable)
}
