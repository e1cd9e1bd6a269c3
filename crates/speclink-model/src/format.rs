//! Text formats a specification document can be stored in.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::document::SpecDocument;
use crate::error::{ModelError, Result};

/// A persisted document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(DocumentFormat::Yaml),
            Some("json") => Ok(DocumentFormat::Json),
            Some("toml") => Ok(DocumentFormat::Toml),
            _ => Err(ModelError::UnknownFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "json" => Ok(DocumentFormat::Json),
            "toml" => Ok(DocumentFormat::Toml),
            other => Err(ModelError::UnknownFormatName(other.to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Yaml => write!(f, "yaml"),
            DocumentFormat::Json => write!(f, "json"),
            DocumentFormat::Toml => write!(f, "toml"),
        }
    }
}

impl SpecDocument {
    /// Parse a document from text in the given format.
    pub fn parse(text: &str, format: DocumentFormat) -> Result<Self> {
        let doc: SpecDocument = match format {
            DocumentFormat::Yaml => serde_yaml::from_str(text)?,
            DocumentFormat::Json => serde_json::from_str(text)?,
            DocumentFormat::Toml => toml::from_str(text)?,
        };
        Ok(doc)
    }

    /// Render the document as text in the given format.
    ///
    /// Output is deterministic: equal documents render to identical text.
    pub fn to_string_pretty(&self, format: DocumentFormat) -> Result<String> {
        let text: String = match format {
            DocumentFormat::Yaml => serde_yaml::to_string(self)?,
            DocumentFormat::Json => serde_json::to_string_pretty(self)?,
            DocumentFormat::Toml => toml::to_string_pretty(self)?,
        };
        Ok(text)
    }
}
