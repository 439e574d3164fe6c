//! # Action Schema
//!
//! Declarative schemas that turn records into JSON-ready objects.
//!
//! A schema lists the output keys of a record: plain fields read off the
//! record, computed values, and associations rendered recursively with
//! another schema. Fields can be renamed, made conditional or refined, and
//! hooks may rewrite the input before rendering and the output after it.
//!
//! ## Feature Flags
//!
//! - `controller` (default) - host integration: named schemas, default
//!   context and `schema_for` rendering
//!
//! ## Quick Example
//!
//! ```rust
//! use action_schema::prelude::*;
//! use serde_json::json;
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: i64,
//!     name: String,
//!     age: u32,
//! }
//!
//! let schema = SchemaBuilder::new().fields(["id", "name"]).build().unwrap();
//! let user = User { id: 1, name: "John McClane".into(), age: 50 };
//!
//! assert_eq!(
//!     schema.render(&user).unwrap(),
//!     json!({"id": 1, "name": "John McClane"})
//! );
//! ```

pub use action_schema_core::*;

#[cfg(feature = "controller")]
pub use action_schema_controller as controller;

#[cfg(feature = "controller")]
pub use action_schema_controller::{
	ContextValue, ControllerSchemas, DEFAULT_SCHEMA, SchemaController, SchemaLookup,
};

/// Commonly used types
pub mod prelude {
	pub use crate::{
		AssociationOptions, Context, FieldOptions, RenderError, Result, Schema, SchemaBuilder,
		SchemaRef, TagRegistry, configure,
	};

	#[cfg(feature = "controller")]
	pub use crate::{ContextValue, ControllerSchemas, SchemaController, SchemaLookup};

	// External
	pub use serde::{Deserialize, Serialize};
}
