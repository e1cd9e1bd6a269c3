//! Error types for the document model.

use std::path::PathBuf;

/// Errors raised while parsing or rendering specification documents.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("unrecognized document format for {}", path.display())]
    UnknownFormat { path: PathBuf },

    #[error("unknown format name '{0}' (expected yaml, json or toml)")]
    UnknownFormatName(String),
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_display() {
        let err = ModelError::UnknownFormat {
            path: PathBuf::from("spec/base.txt"),
        };
        assert!(err.to_string().contains("spec/base.txt"));
    }

    #[test]
    fn unknown_format_name_display() {
        let err = ModelError::UnknownFormatName("xml".into());
        assert!(err.to_string().contains("'xml'"));
    }
}
