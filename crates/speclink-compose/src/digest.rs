//! Content hashes of composed documents.
//!
//! Resolution is a deterministic recomputation, so resolving the same
//! inputs twice must hash to the same value. The hash is taken over the
//! document's compact JSON rendering.

use std::fmt;

use sha2::{Digest, Sha256};
use speclink_model::SpecDocument;

use crate::error::Result;

/// Lowercase hex SHA-256 of a document or byte string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn compute(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        ContentHash(digest.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Hash a document's canonical JSON form.
    pub fn of_document(document: &SpecDocument) -> Result<Self> {
        Ok(Self::compute(&serde_json::to_vec(document)?))
    }

    /// Whether `document` still hashes to this value.
    pub fn matches(&self, document: &SpecDocument) -> Result<bool> {
        Ok(Self::of_document(document)? == *self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speclink_model::WorkflowStep;

    #[test]
    fn hash_format() {
        let hash = ContentHash::compute(b"");
        // SHA-256 of empty input
        assert_eq!(
            hash.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn equal_documents_hash_equal() {
        let a = SpecDocument::new("x").with_step(WorkflowStep::new("s"));
        let b = a.clone();
        assert_eq!(
            ContentHash::of_document(&a).unwrap(),
            ContentHash::of_document(&b).unwrap()
        );
    }

    #[test]
    fn matches_detects_edits() {
        let doc = SpecDocument::new("x").with_step(WorkflowStep::new("s"));
        let hash = ContentHash::of_document(&doc).unwrap();
        assert!(hash.matches(&doc).unwrap());
        assert!(!hash.matches(&doc.clone().with_step(WorkflowStep::new("t"))).unwrap());
    }

    #[test]
    fn entity_order_changes_hash() {
        let a = SpecDocument::new("x")
            .with_step(WorkflowStep::new("s1"))
            .with_step(WorkflowStep::new("s2"));
        let b = SpecDocument::new("x")
            .with_step(WorkflowStep::new("s2"))
            .with_step(WorkflowStep::new("s1"));
        assert_ne!(
            ContentHash::of_document(&a).unwrap(),
            ContentHash::of_document(&b).unwrap()
        );
    }

    #[test]
    fn display_is_hex() {
        let hash = ContentHash::compute(b"speclink");
        let s = format!("{hash}");
        assert_eq!(s.len(), 64);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
