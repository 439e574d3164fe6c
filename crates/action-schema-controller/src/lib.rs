//! Host integration for action schemas
//!
//! A host type (a controller, a handler, any type that renders responses)
//! declares named schemas and default context once in a
//! [`ControllerSchemas`] and implements [`SchemaController`] to get
//! `schema_for`-style rendering with its context merged in and its named
//! schemas available as association tags.

pub mod context;
pub mod controller;

pub use context::ContextValue;
pub use controller::{ControllerSchemas, DEFAULT_SCHEMA, SchemaController, SchemaLookup};
