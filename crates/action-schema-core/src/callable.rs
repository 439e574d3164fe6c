//! Arity-agnostic callables
//!
//! Conditions, computed fields, refinements and hooks are authored with
//! different parameter lists: an `if` condition may not care about the
//! record at all, while a computed field may need both the record and the
//! render context. The engine always invokes them with the full argument
//! list, so every user closure is normalised here into one fixed shape and
//! surplus arguments are dropped.
//!
//! The adaptation happens at compile time through marker-typed conversion
//! traits, so a closure only has to annotate the arguments it actually
//! takes:
//!
//! ```
//! use action_schema_core::callable::{Compute, Predicate};
//! use action_schema_core::Context;
//! use serde_json::{json, Value};
//!
//! let always = Predicate::new(|| true);
//! let has_name = Predicate::new(|record: &Value| record.get("name").is_some());
//! let greeting = Compute::new(|record: &Value, ctx: &Context| {
//!     format!("{} {}", ctx.get("greeting").and_then(Value::as_str).unwrap_or("Hi"), record["name"])
//! });
//!
//! let record = json!({"name": "John"});
//! assert!(always.test(&record, &Context::new()));
//! assert!(has_name.test(&record, &Context::new()));
//! assert_eq!(greeting.call(&record, &Context::new()), json!("Hi \"John\""));
//! ```

use crate::context::Context;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type PredicateFn = Arc<dyn Fn(&Value, &Context) -> bool + Send + Sync>;
type ComputeFn = Arc<dyn Fn(&Value, &Context) -> Value + Send + Sync>;
type TransformFn = Arc<dyn Fn(Value, &Context) -> Value + Send + Sync>;

/// Boolean condition evaluated against a record (`if` / `unless`)
#[derive(Clone)]
pub struct Predicate(PredicateFn);

impl Predicate {
	/// Wraps any supported closure shape
	pub fn new<M>(predicate: impl IntoPredicate<M>) -> Self {
		predicate.into_predicate()
	}

	/// Evaluates the condition
	pub fn test(&self, record: &Value, context: &Context) -> bool {
		(self.0)(record, context)
	}
}

/// Value producer for computed fields
#[derive(Clone)]
pub struct Compute(ComputeFn);

impl Compute {
	/// Wraps any supported closure shape
	pub fn new<M>(compute: impl IntoCompute<M>) -> Self {
		compute.into_compute()
	}

	/// Produces the field value for `record`
	pub fn call(&self, record: &Value, context: &Context) -> Value {
		(self.0)(record, context)
	}
}

/// Value-to-value function used for refinements and render hooks
///
/// The returned value always replaces the input: there is no implicit
/// in-place mutation path.
#[derive(Clone)]
pub struct Transform(TransformFn);

impl Transform {
	/// Wraps any supported closure shape
	pub fn new<M>(transform: impl IntoTransform<M>) -> Self {
		transform.into_transform()
	}

	/// Applies the function, returning the replacement value
	pub fn apply(&self, value: Value, context: &Context) -> Value {
		(self.0)(value, context)
	}
}

macro_rules! opaque_debug {
	($($ty:ident),*) => {
		$(
			impl fmt::Debug for $ty {
				fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
					f.debug_tuple(stringify!($ty)).field(&"<function>").finish()
				}
			}
		)*
	};
}

opaque_debug!(Predicate, Compute, Transform);

/// Conversion into a [`Predicate`]
///
/// Implemented for `Fn() -> bool`, `Fn(&Value) -> bool` and
/// `Fn(&Value, &Context) -> bool`.
pub trait IntoPredicate<Marker> {
	/// Performs the conversion
	fn into_predicate(self) -> Predicate;
}

impl IntoPredicate<Predicate> for Predicate {
	fn into_predicate(self) -> Predicate {
		self
	}
}

impl<F> IntoPredicate<fn() -> bool> for F
where
	F: Fn() -> bool + Send + Sync + 'static,
{
	fn into_predicate(self) -> Predicate {
		Predicate(Arc::new(move |_: &Value, _: &Context| self()))
	}
}

impl<F> IntoPredicate<fn(&Value) -> bool> for F
where
	F: Fn(&Value) -> bool + Send + Sync + 'static,
{
	fn into_predicate(self) -> Predicate {
		Predicate(Arc::new(move |record: &Value, _: &Context| self(record)))
	}
}

impl<F> IntoPredicate<fn(&Value, &Context) -> bool> for F
where
	F: Fn(&Value, &Context) -> bool + Send + Sync + 'static,
{
	fn into_predicate(self) -> Predicate {
		Predicate(Arc::new(self))
	}
}

/// Conversion into a [`Compute`]
///
/// Implemented for `Fn() -> R`, `Fn(&Value) -> R` and
/// `Fn(&Value, &Context) -> R` where `R: Into<Value>`.
pub trait IntoCompute<Marker> {
	/// Performs the conversion
	fn into_compute(self) -> Compute;
}

impl IntoCompute<Compute> for Compute {
	fn into_compute(self) -> Compute {
		self
	}
}

impl<F, R> IntoCompute<fn() -> R> for F
where
	F: Fn() -> R + Send + Sync + 'static,
	R: Into<Value>,
{
	fn into_compute(self) -> Compute {
		Compute(Arc::new(move |_: &Value, _: &Context| self().into()))
	}
}

impl<F, R> IntoCompute<fn(&Value) -> R> for F
where
	F: Fn(&Value) -> R + Send + Sync + 'static,
	R: Into<Value>,
{
	fn into_compute(self) -> Compute {
		Compute(Arc::new(move |record: &Value, _: &Context| {
			self(record).into()
		}))
	}
}

impl<F, R> IntoCompute<fn(&Value, &Context) -> R> for F
where
	F: Fn(&Value, &Context) -> R + Send + Sync + 'static,
	R: Into<Value>,
{
	fn into_compute(self) -> Compute {
		Compute(Arc::new(move |record: &Value, context: &Context| {
			self(record, context).into()
		}))
	}
}

/// Conversion into a [`Transform`]
///
/// Implemented for `Fn(Value) -> R` and `Fn(Value, &Context) -> R` where
/// `R: Into<Value>`.
pub trait IntoTransform<Marker> {
	/// Performs the conversion
	fn into_transform(self) -> Transform;
}

impl IntoTransform<Transform> for Transform {
	fn into_transform(self) -> Transform {
		self
	}
}

impl<F, R> IntoTransform<fn(Value) -> R> for F
where
	F: Fn(Value) -> R + Send + Sync + 'static,
	R: Into<Value>,
{
	fn into_transform(self) -> Transform {
		Transform(Arc::new(move |value: Value, _: &Context| self(value).into()))
	}
}

impl<F, R> IntoTransform<fn(Value, &Context) -> R> for F
where
	F: Fn(Value, &Context) -> R + Send + Sync + 'static,
	R: Into<Value>,
{
	fn into_transform(self) -> Transform {
		Transform(Arc::new(move |value: Value, context: &Context| {
			self(value, context).into()
		}))
	}
}
