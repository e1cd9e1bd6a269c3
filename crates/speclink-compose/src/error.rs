//! Error types for document composition.

use std::path::PathBuf;

use speclink_model::ModelError;

/// Errors a [`DocumentLoader`](crate::loader::DocumentLoader) can report.
///
/// The resolver never propagates these; each one becomes a
/// `PARENT_LOAD_ERROR` diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No document exists at the location.
    #[error("document not found: {location}")]
    NotFound { location: String },

    /// The document exists but could not be read.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document was read but is not a valid specification.
    #[error("invalid document at {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: ModelError,
    },
}

/// Unrecoverable composition failures.
///
/// Everything expected (missing parents, cycles, depth overruns,
/// inconsistent merges) is reported as a diagnostic instead.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// A parent reference could not be turned into a location.
    ///
    /// Returned by a [`LocationResolver`](crate::location::LocationResolver);
    /// the resolver records it as a `PARENT_LOAD_ERROR`.
    #[error("invalid parent reference '{reference}' from {base}: {detail}")]
    InvalidReference {
        reference: String,
        base: String,
        detail: String,
    },

    /// Serializing a resolved document failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for composition operations.
pub type Result<T> = std::result::Result<T, ComposeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_display() {
        let err = LoadError::NotFound {
            location: "/specs/base.yaml".into(),
        };
        assert!(err.to_string().contains("/specs/base.yaml"));
    }

    #[test]
    fn invalid_reference_display() {
        let err = ComposeError::InvalidReference {
            reference: String::new(),
            base: "/specs/child.yaml".into(),
            detail: "empty reference".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/specs/child.yaml"));
        assert!(msg.contains("empty reference"));
    }
}
