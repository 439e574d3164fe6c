//! Render engine
//!
//! Rendering runs in three phases: the before-render hooks thread the
//! renderable, every record is rendered against the definition, and the
//! after-render hooks thread the assembled output. Each hook returns the
//! value handed to the next phase.

use crate::config::{Configuration, configuration};
use crate::context::Context;
use crate::error::{RenderError, Result};
use crate::field::{FieldKind, FieldSpec};
use crate::registry::TagRegistry;
use crate::resolve::SchemaRef;
use crate::schema::{HookPhase, Schema};
use serde::Serialize;
use serde_json::{Map, Value};

impl Schema {
	/// Renders a record or a collection of records
	pub fn render<T>(&self, renderable: &T) -> Result<Value>
	where
		T: Serialize + ?Sized,
	{
		self.renderer().render(renderable)
	}

	/// Renders with an additional call-level context
	pub fn render_with<T>(&self, renderable: &T, context: Context) -> Result<Value>
	where
		T: Serialize + ?Sized,
	{
		self.renderer().context(context).render(renderable)
	}

	/// Creates a renderer seeded with this schema's context
	pub fn renderer(&self) -> Renderer<'_> {
		Renderer {
			schema: self,
			context: self.inner.context.clone(),
			merged: Map::new(),
			fallback: None,
		}
	}

	/// Parsing input back into records is not supported
	pub fn parse(&self, _input: &Value) -> Result<Value> {
		Err(RenderError::NotImplemented("parse"))
	}
}

/// One render invocation's state: the merged context, extra attributes and
/// the host registry used for tag lookups
///
/// # Examples
///
/// ```
/// use action_schema_core::{Context, SchemaBuilder};
/// use serde_json::json;
///
/// let schema = SchemaBuilder::new().field("id").build().unwrap();
/// let rendered = schema
///     .renderer()
///     .context(Context::new().with("locale", "en"))
///     .merge([("version", json!(2))])
///     .render(&json!({"id": 1}))
///     .unwrap();
///
/// assert_eq!(rendered, json!({"id": 1, "version": 2}));
/// ```
#[derive(Debug)]
pub struct Renderer<'s> {
	schema: &'s Schema,
	context: Context,
	merged: Map<String, Value>,
	fallback: Option<TagRegistry>,
}

impl<'s> Renderer<'s> {
	/// Merges call-level context over the schema context
	pub fn context(mut self, context: Context) -> Self {
		self.context.merge(&context);
		self
	}

	/// Adds attributes appended to every rendered record.
	///
	/// Keys go through the configured key transformation and win over
	/// schema-produced keys.
	pub fn merge<I, K>(mut self, attributes: I) -> Self
	where
		I: IntoIterator<Item = (K, Value)>,
		K: Into<String>,
	{
		for (key, value) in attributes {
			self.merged.insert(key.into(), value);
		}
		self
	}

	/// Registry consulted for tags the schema family does not know
	pub fn fallback_tags(mut self, registry: TagRegistry) -> Self {
		self.fallback = Some(registry);
		self
	}

	/// The effective render context
	pub fn render_context(&self) -> &Context {
		&self.context
	}

	/// Serialises `renderable` and renders it
	pub fn render<T>(&self, renderable: &T) -> Result<Value>
	where
		T: Serialize + ?Sized,
	{
		self.render_value(serde_json::to_value(renderable)?)
	}

	/// Renders an already converted value
	pub fn render_value(&self, value: Value) -> Result<Value> {
		let config = configuration();
		self.render_with_config(value, &config)
	}

	fn render_with_config(&self, value: Value, config: &Configuration) -> Result<Value> {
		let span = tracing::debug_span!(
			"render",
			schema = self.schema.name().unwrap_or("<anonymous>")
		);
		let _entered = span.enter();

		let pass = RenderPass {
			schema: self.schema,
			context: &self.context,
			merged: &self.merged,
			fallback: self.fallback.as_ref(),
			config,
		};
		pass.run(value)
	}
}

struct RenderPass<'a> {
	schema: &'a Schema,
	context: &'a Context,
	merged: &'a Map<String, Value>,
	fallback: Option<&'a TagRegistry>,
	config: &'a Configuration,
}

impl RenderPass<'_> {
	fn run(&self, renderable: Value) -> Result<Value> {
		let data = self.apply_hooks(HookPhase::BeforeRender, renderable);

		let output = match data {
			Value::Array(records) => {
				tracing::debug!(records = records.len(), "rendering collection");
				records
					.iter()
					.map(|record| self.render_record(record))
					.collect::<Result<Vec<_>>>()
					.map(Value::Array)?
			}
			record => self.render_record(&record)?,
		};

		Ok(self.apply_hooks(HookPhase::AfterRender, output))
	}

	fn apply_hooks(&self, phase: HookPhase, value: Value) -> Value {
		self.schema
			.hooks(phase)
			.iter()
			.fold(value, |current, hook| hook.apply(current, self.context))
	}

	fn render_record(&self, record: &Value) -> Result<Value> {
		tracing::trace!("rendering record");
		let mut attributes = Map::new();

		for (key, spec) in self.schema.definition() {
			if let Some((output_key, value)) = self.render_field(record, key, spec)? {
				attributes.insert(output_key, value);
			}
		}

		for (key, value) in self.merged {
			attributes.insert(self.config.transform_key(key), value.clone());
		}

		Ok(Value::Object(attributes))
	}

	fn render_field(
		&self,
		record: &Value,
		key: &str,
		spec: &FieldSpec,
	) -> Result<Option<(String, Value)>> {
		if !spec.is_included(record, self.context) {
			return Ok(None);
		}

		let output_key = match &spec.rename {
			Some(alias) => alias.clone(),
			None => self.config.transform_key(key),
		};

		let value = match &spec.kind {
			FieldKind::Field { source } => attribute(record, source)?,
			FieldKind::Computed(compute) => compute.call(record, self.context),
			FieldKind::Association { schema, context } => {
				self.render_association(record, key, schema, context)?
			}
		};

		let value = match &spec.refine {
			Some(refine) => refine.apply(value, self.context),
			None => value,
		};

		Ok(Some((output_key, value)))
	}

	fn render_association(
		&self,
		record: &Value,
		key: &str,
		reference: &SchemaRef,
		overrides: &Context,
	) -> Result<Value> {
		let schema = reference.resolve(self.schema.tags(), self.fallback, self.context)?;
		let data = attribute(record, key)?;
		if data.is_null() {
			return Ok(Value::Null);
		}

		tracing::trace!(association = key, "rendering association");
		let mut renderer = schema
			.renderer()
			.context(self.context.merged(overrides));
		if let Some(fallback) = self.fallback {
			renderer = renderer.fallback_tags(fallback.clone());
		}
		renderer.render_with_config(data, self.config)
	}
}

fn attribute(record: &Value, name: &str) -> Result<Value> {
	record
		.as_object()
		.and_then(|object| object.get(name))
		.cloned()
		.ok_or_else(|| RenderError::field_missing(name, record))
}
