//! Specification document model for speclink.
//!
//! A [`SpecDocument`] is one composable unit of the specification language:
//! metadata, four id-keyed entity collections (business rules, data
//! structures, API endpoints, workflow steps), two optional singleton
//! sections (AI-context hints and governance metadata), and the `extends`
//! chain naming the parent documents it inherits from.
//!
//! This crate is pure data. Composition lives in `speclink-compose`.

pub mod document;
pub mod entity;
pub mod error;
pub mod format;
pub mod sections;

pub use document::{Metadata, SpecDocument};
pub use entity::{
    ApiEndpoint, BusinessRule, DataStructure, Entity, EntityKind, Field, Index, Parameter,
    Relationship, WorkflowStep,
};
pub use error::{ModelError, Result};
pub use format::DocumentFormat;
pub use sections::{AiContext, AuditEntry, Governance};
