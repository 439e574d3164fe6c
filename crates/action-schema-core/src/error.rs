//! Render error taxonomy
//!
//! Every failure raised while defining or rendering a schema is a variant of
//! [`RenderError`]. None of them are recovered internally: a failing field
//! aborts the record, and a failing record aborts the whole collection.

/// Result alias used throughout the schema crates
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors raised while building or rendering schemas
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	/// A plain field was requested but the record does not carry it
	#[error("Field '{field}' does not exist on record: {record}")]
	FieldMissing { field: String, record: String },

	/// A declarative field entry used an unknown `type`
	#[error("Invalid field type '{kind}' for field '{field}'")]
	InvalidFieldType { field: String, kind: String },

	/// A symbolic association tag has no registered schema
	#[error("Schema with tag '{tag}' not found")]
	SchemaNotFound { tag: String },

	/// An association reference is neither a tag, a schema nor a deferred closure
	#[error("Invalid schema value: {value}")]
	InvalidSchemaValue { value: String },

	/// A builder or host call received unusable arguments
	#[error("{0}")]
	Argument(String),

	/// The requested operation is not supported
	#[error("{0} is not implemented")]
	NotImplemented(&'static str),

	/// The renderable could not be converted into a JSON value
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl RenderError {
	/// Builds a [`RenderError::FieldMissing`] carrying the record's JSON form
	pub fn field_missing(field: impl Into<String>, record: &serde_json::Value) -> Self {
		Self::FieldMissing {
			field: field.into(),
			record: record.to_string(),
		}
	}

	/// Builds a [`RenderError::SchemaNotFound`]
	pub fn schema_not_found(tag: impl Into<String>) -> Self {
		Self::SchemaNotFound { tag: tag.into() }
	}

	/// Builds a [`RenderError::Argument`]
	pub fn argument(message: impl Into<String>) -> Self {
		Self::Argument(message.into())
	}

	/// Name of the field involved in the error, if any
	pub fn field_name(&self) -> Option<&str> {
		match self {
			RenderError::FieldMissing { field, .. } => Some(field),
			RenderError::InvalidFieldType { field, .. } => Some(field),
			_ => None,
		}
	}

	/// Whether the error was raised while a schema was being defined rather
	/// than rendered
	pub fn is_definition_error(&self) -> bool {
		matches!(
			self,
			RenderError::Argument(_)
				| RenderError::InvalidFieldType { .. }
				| RenderError::InvalidSchemaValue { .. }
		)
	}
}
