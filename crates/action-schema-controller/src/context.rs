//! Host-level context entries

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type LazyFn<H> = Arc<dyn Fn(&H) -> Value + Send + Sync>;

/// A default context entry declared on a host type
///
/// Static entries are used as is. Lazy entries are evaluated against the
/// host instance every time the context is resolved.
pub enum ContextValue<H> {
	/// Fixed value
	Static(Value),
	/// Value computed from the host instance
	Lazy(LazyFn<H>),
}

impl<H> ContextValue<H> {
	/// Wraps a host-bound computation
	///
	/// # Examples
	///
	/// ```
	/// use action_schema_controller::ContextValue;
	/// use serde_json::json;
	///
	/// struct Host {
	///     locale: String,
	/// }
	///
	/// let value = ContextValue::lazy(|host: &Host| json!(host.locale));
	/// let host = Host { locale: "en".into() };
	/// assert_eq!(value.resolve(&host), json!("en"));
	/// ```
	pub fn lazy<F>(compute: F) -> Self
	where
		F: Fn(&H) -> Value + Send + Sync + 'static,
	{
		Self::Lazy(Arc::new(compute))
	}

	/// The value for `host`
	pub fn resolve(&self, host: &H) -> Value {
		match self {
			ContextValue::Static(value) => value.clone(),
			ContextValue::Lazy(compute) => compute(host),
		}
	}

	/// Whether the value depends on the host instance
	pub fn is_lazy(&self) -> bool {
		matches!(self, ContextValue::Lazy(_))
	}
}

impl<H> Clone for ContextValue<H> {
	fn clone(&self) -> Self {
		match self {
			ContextValue::Static(value) => ContextValue::Static(value.clone()),
			ContextValue::Lazy(compute) => ContextValue::Lazy(Arc::clone(compute)),
		}
	}
}

impl<H> fmt::Debug for ContextValue<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ContextValue::Static(value) => f.debug_tuple("Static").field(value).finish(),
			ContextValue::Lazy(_) => f.debug_tuple("Lazy").field(&"<function>").finish(),
		}
	}
}

impl<H> From<Value> for ContextValue<H> {
	fn from(value: Value) -> Self {
		Self::Static(value)
	}
}

impl<H> From<&str> for ContextValue<H> {
	fn from(value: &str) -> Self {
		Self::Static(Value::from(value))
	}
}

impl<H> From<String> for ContextValue<H> {
	fn from(value: String) -> Self {
		Self::Static(Value::from(value))
	}
}

impl<H> From<bool> for ContextValue<H> {
	fn from(value: bool) -> Self {
		Self::Static(Value::from(value))
	}
}

impl<H> From<i64> for ContextValue<H> {
	fn from(value: i64) -> Self {
		Self::Static(Value::from(value))
	}
}
