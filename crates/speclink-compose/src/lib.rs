//! Specification composition engine.
//!
//! Given a document with an `extends` chain, loads every ancestor, rejects
//! illegal cycles, folds ancestors and descendant into one document under
//! a configurable [`MergeStrategy`], and checks the result for duplicate
//! identifiers and dangling references.
//!
//! # Architecture
//!
//! - [`InheritanceResolver`]: recursive, depth-first walk over `extends`
//! - [`ResolutionContext`]: per-session ancestor cache, resolution stack
//!   and diagnostics
//! - [`merge`]: pure base/override merge functions
//! - [`check_consistency`]: post-merge duplicate and reference checks
//! - [`DocumentLoader`], [`LocationResolver`], [`ImportCache`]: the
//!   collaborators a resolution is given, never ambient state
//!
//! Expected failures (missing parent, cycle, depth overrun, inconsistent
//! merge) are reported as [`Diagnostic`]s with stable codes. Only contract
//! violations surface as [`ComposeError`].

pub mod cache;
pub mod consistency;
pub mod context;
pub mod diagnostic;
pub mod digest;
pub mod error;
pub mod loader;
pub mod location;
pub mod merge;
pub mod options;
pub mod resolver;

// Re-exports for convenience.
pub use cache::{CacheStats, ImportCache};
pub use consistency::check_consistency;
pub use context::{ResolutionContext, StackFrame};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use digest::ContentHash;
pub use error::{ComposeError, LoadError, Result};
pub use loader::{DocumentLoader, FsLoader, MemoryLoader};
pub use location::{Location, LocationResolver, PathLocationResolver};
pub use merge::{merge_collection, merge_documents, merge_section, Combine};
pub use options::{MergeStrategy, ResolveOptions, DEFAULT_MAX_DEPTH};
pub use resolver::{resolve_inheritance, InheritanceContext, InheritanceResolver, ResolutionOutcome};
