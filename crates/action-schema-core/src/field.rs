//! Field specifications
//!
//! One [`FieldSpec`] describes how a single output key is produced. The kind
//! of a field is a closed sum type, so an unknown field kind cannot exist at
//! render time.

use crate::callable::{Compute, IntoPredicate, IntoTransform, Predicate, Transform};
use crate::context::Context;
use crate::resolve::SchemaRef;
use serde_json::Value;

/// How the value of an output key is produced
#[derive(Debug, Clone)]
pub enum FieldKind {
	/// Read `source` off the record
	Field { source: String },
	/// Invoke a closure with the record and the render context
	Computed(Compute),
	/// Render the attribute named after the key with a nested schema
	Association { schema: SchemaRef, context: Context },
}

/// One entry of a schema definition
#[derive(Debug, Clone)]
pub struct FieldSpec {
	pub(crate) kind: FieldKind,
	pub(crate) rename: Option<String>,
	pub(crate) condition: Option<Predicate>,
	pub(crate) negated_condition: Option<Predicate>,
	pub(crate) refine: Option<Transform>,
}

impl FieldSpec {
	/// The field kind
	pub fn kind(&self) -> &FieldKind {
		&self.kind
	}

	/// Output alias, if the key is renamed
	pub fn rename(&self) -> Option<&str> {
		self.rename.as_deref()
	}

	/// Whether an `if` condition is attached
	pub fn has_condition(&self) -> bool {
		self.condition.is_some()
	}

	/// Whether an `unless` condition is attached
	pub fn has_negated_condition(&self) -> bool {
		self.negated_condition.is_some()
	}

	/// Whether a refinement is attached
	pub fn has_refine(&self) -> bool {
		self.refine.is_some()
	}

	/// Whether this entry renders a nested schema
	pub fn is_association(&self) -> bool {
		matches!(self.kind, FieldKind::Association { .. })
	}

	/// Evaluates `if` and `unless` against `record`
	pub(crate) fn is_included(&self, record: &Value, context: &Context) -> bool {
		if let Some(condition) = &self.condition
			&& !condition.test(record, context)
		{
			return false;
		}
		if let Some(condition) = &self.negated_condition
			&& condition.test(record, context)
		{
			return false;
		}
		true
	}
}

/// Options accepted by `field` and `computed`
///
/// # Examples
///
/// ```
/// use action_schema_core::FieldOptions;
/// use serde_json::Value;
///
/// let options = FieldOptions::new()
///     .rename("fullName")
///     .when(|record: &Value| record.get("name").is_some_and(|n| !n.is_null()))
///     .refine(|value: Value| value.as_str().map(str::to_uppercase));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
	pub(crate) source: Option<String>,
	pub(crate) rename: Option<String>,
	pub(crate) condition: Option<Predicate>,
	pub(crate) negated_condition: Option<Predicate>,
	pub(crate) refine: Option<Transform>,
}

impl FieldOptions {
	/// Creates empty options
	pub fn new() -> Self {
		Self::default()
	}

	/// Reads a differently named attribute off the record
	///
	/// Only plain fields read the record; a computed field given a source
	/// fails to build with [`RenderError::Argument`](crate::RenderError::Argument).
	pub fn source(mut self, source: impl Into<String>) -> Self {
		self.source = Some(source.into());
		self
	}

	/// Emits the value under `alias` instead of the definition key
	pub fn rename(mut self, alias: impl Into<String>) -> Self {
		self.rename = Some(alias.into());
		self
	}

	/// Includes the field only when the condition holds
	pub fn when<M>(mut self, condition: impl IntoPredicate<M>) -> Self {
		self.condition = Some(condition.into_predicate());
		self
	}

	/// Excludes the field when the condition holds
	pub fn unless<M>(mut self, condition: impl IntoPredicate<M>) -> Self {
		self.negated_condition = Some(condition.into_predicate());
		self
	}

	/// Post-processes the produced value
	pub fn refine<M>(mut self, refine: impl IntoTransform<M>) -> Self {
		self.refine = Some(refine.into_transform());
		self
	}

	pub(crate) fn apply(self, kind: FieldKind) -> FieldSpec {
		FieldSpec {
			kind,
			rename: self.rename,
			condition: self.condition,
			negated_condition: self.negated_condition,
			refine: self.refine,
		}
	}
}

/// Options accepted by `association`
#[derive(Debug, Clone, Default)]
pub struct AssociationOptions {
	pub(crate) rename: Option<String>,
	pub(crate) condition: Option<Predicate>,
	pub(crate) negated_condition: Option<Predicate>,
	pub(crate) context: Context,
}

impl AssociationOptions {
	/// Creates empty options
	pub fn new() -> Self {
		Self::default()
	}

	/// Emits the nested output under `alias`
	pub fn rename(mut self, alias: impl Into<String>) -> Self {
		self.rename = Some(alias.into());
		self
	}

	/// Includes the association only when the condition holds
	pub fn when<M>(mut self, condition: impl IntoPredicate<M>) -> Self {
		self.condition = Some(condition.into_predicate());
		self
	}

	/// Excludes the association when the condition holds
	pub fn unless<M>(mut self, condition: impl IntoPredicate<M>) -> Self {
		self.negated_condition = Some(condition.into_predicate());
		self
	}

	/// Adds one entry to the child render context
	pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.context.insert(key, value);
		self
	}

	/// Merges a whole map into the child render context
	pub fn with_context(mut self, context: Context) -> Self {
		self.context.merge(&context);
		self
	}

	pub(crate) fn apply(self, schema: SchemaRef) -> FieldSpec {
		FieldSpec {
			kind: FieldKind::Association {
				schema,
				context: self.context,
			},
			rename: self.rename,
			condition: self.condition,
			negated_condition: self.negated_condition,
			refine: None,
		}
	}
}
