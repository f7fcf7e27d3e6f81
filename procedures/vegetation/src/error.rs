use thiserror::Error;

/// Errors produced while resolving, generating or persisting trees.
#[derive(Debug, Error)]
pub enum TreeError {
	/// A configuration field holds a value the generator cannot work with.
	#[error("invalid configuration: {field}: {reason}")]
	InvalidConfiguration { field: &'static str, reason: String },

	/// Reading or writing a persisted tree file failed.
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	/// A persisted tree file could not be encoded or decoded.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl TreeError {
	pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
		Self::InvalidConfiguration { field, reason: reason.into() }
	}
}
