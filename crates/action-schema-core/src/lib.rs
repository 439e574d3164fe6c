//! Declarative object-to-JSON rendering
//!
//! A [`Schema`] describes which attributes of a record are exposed, how they
//! are renamed or computed, which nested records are rendered with which
//! schema, and which hooks run before and after rendering. Records are any
//! `serde::Serialize` value; output is a [`serde_json::Value`].
//!
//! ## Example
//!
//! ```
//! use action_schema_core::{FieldOptions, SchemaBuilder};
//! use serde_json::{json, Value};
//!
//! let posts = SchemaBuilder::new().fields(["id", "title"]).build().unwrap();
//! let users = SchemaBuilder::new()
//!     .fields(["id", "name"])
//!     .field_with(
//!         "email",
//!         FieldOptions::new().when(|user: &Value| user["email"].is_string()),
//!     )
//!     .association("posts", &posts)
//!     .build()
//!     .unwrap();
//!
//! let user = json!({
//!     "id": 1,
//!     "name": "John McClane",
//!     "email": null,
//!     "posts": [{"id": 1, "title": "Nakatomi Plaza", "draft": true}]
//! });
//!
//! assert_eq!(
//!     users.render(&user).unwrap(),
//!     json!({
//!         "id": 1,
//!         "name": "John McClane",
//!         "posts": [{"id": 1, "title": "Nakatomi Plaza"}]
//!     })
//! );
//! ```

pub mod callable;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod field;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod schema;

pub use callable::{Compute, IntoCompute, IntoPredicate, IntoTransform, Predicate, Transform};
pub use config::{
	BaseSchema, Configuration, KeyTransform, configuration, configure, register_base_schema,
	reset_configuration,
};
pub use context::Context;
pub use document::{FieldDocument, SchemaDocument};
pub use error::{RenderError, Result};
pub use field::{AssociationOptions, FieldKind, FieldOptions, FieldSpec};
pub use registry::TagRegistry;
pub use render::Renderer;
pub use resolve::SchemaRef;
pub use schema::{HookPhase, Schema, SchemaBuilder};
