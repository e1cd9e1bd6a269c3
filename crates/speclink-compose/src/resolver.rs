//! The inheritance resolver.
//!
//! Walks a document's `extends` chain depth-first, loading each ancestor,
//! rejecting cycles, limiting depth, and folding every resolved parent
//! underneath the accumulated result with the merge engine.
//!
//! Fold direction: for `extends: [P1, P2]` the accumulated result is
//! always the override and each newly resolved parent the base, so
//! precedence is document > P1 > P2 even though P2 is folded last.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use speclink_model::SpecDocument;

use crate::cache::ImportCache;
use crate::consistency::check_consistency;
use crate::context::ResolutionContext;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::digest::ContentHash;
use crate::error::{LoadError, Result};
use crate::loader::DocumentLoader;
use crate::location::{Location, LocationResolver, PathLocationResolver};
use crate::merge::merge_documents;
use crate::options::ResolveOptions;

/// The result of one resolution session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    /// True iff no errors were recorded. Warnings never affect validity.
    pub valid: bool,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_document: Option<SpecDocument>,
    /// Ancestors loaded during the session, in first-visit order.
    pub ancestors: Vec<Location>,
    /// Errors dropped by the `max_errors` cap.
    #[serde(skip_serializing_if = "is_zero")]
    pub suppressed_errors: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl ResolutionOutcome {
    fn unchanged(document: &SpecDocument) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            resolved_document: Some(document.clone()),
            ancestors: Vec::new(),
            suppressed_errors: 0,
        }
    }

    /// Errors followed by warnings.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(self.warnings.iter())
    }

    /// Number of recorded diagnostics carrying `code`.
    pub fn count(&self, code: DiagnosticCode) -> usize {
        self.diagnostics().filter(|d| d.code == code).count()
    }

    /// The resolved document with its `extends` list cleared.
    ///
    /// Resolving a flattened document again is a no-op.
    pub fn flattened(&self) -> Option<SpecDocument> {
        self.resolved_document.as_ref().map(|doc| SpecDocument {
            extends: Vec::new(),
            ..doc.clone()
        })
    }

    /// Content hash of the resolved document.
    pub fn digest(&self) -> Result<Option<ContentHash>> {
        self.resolved_document
            .as_ref()
            .map(ContentHash::of_document)
            .transpose()
    }
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Resolution {} ===",
            if self.valid { "OK" } else { "FAILED" }
        )?;
        writeln!(
            f,
            "Ancestors: {} | Errors: {} | Warnings: {}",
            self.ancestors.len(),
            self.errors.len() + self.suppressed_errors,
            self.warnings.len()
        )?;
        for d in self.diagnostics() {
            writeln!(f, "  {d}")?;
        }
        if self.suppressed_errors > 0 {
            writeln!(f, "  ... {} more errors suppressed", self.suppressed_errors)?;
        }
        Ok(())
    }
}

/// Resolves `extends` chains against a loader.
///
/// The resolver itself holds no session state and can be reused; each
/// [`resolve`](Self::resolve) call starts from a fresh
/// [`ResolutionContext`].
pub struct InheritanceResolver<'a> {
    loader: &'a dyn DocumentLoader,
    locations: &'a dyn LocationResolver,
    import_cache: Option<&'a ImportCache>,
    options: ResolveOptions,
}

impl<'a> InheritanceResolver<'a> {
    pub fn new(loader: &'a dyn DocumentLoader, locations: &'a dyn LocationResolver) -> Self {
        Self {
            loader,
            locations,
            import_cache: None,
            options: ResolveOptions::default(),
        }
    }

    /// Builder: set the resolution options.
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder: consult and populate a session-external cache.
    pub fn with_import_cache(mut self, cache: &'a ImportCache) -> Self {
        self.import_cache = Some(cache);
        self
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve `document`, whose own location is `base_location`.
    ///
    /// Missing or malformed parents, bad references, cycles and depth
    /// overruns are all recorded as diagnostics. `Err` is reserved for
    /// failures outside those codes.
    pub fn resolve(
        &self,
        document: &SpecDocument,
        base_location: &str,
    ) -> Result<ResolutionOutcome> {
        let root = self.locations.normalize(base_location);
        let span = tracing::info_span!("resolve_inheritance", root = %root);
        let _guard = span.enter();

        if !document.has_parents() {
            tracing::debug!("document has no parents");
            return Ok(ResolutionOutcome::unchanged(document));
        }

        let mut ctx = ResolutionContext::new(self.options.max_errors);
        let resolved = {
            let mut frame = ctx.enter(root.clone());
            self.resolve_at(&mut frame, document.clone(), &root, 0)
        };

        if self.options.validate_consistency {
            ctx.record_all(check_consistency(&resolved));
        }

        let valid = ctx.is_valid();
        let (errors, warnings, ancestors, suppressed_errors) = ctx.finish();
        tracing::info!(
            valid,
            errors = errors.len() + suppressed_errors,
            warnings = warnings.len(),
            ancestors = ancestors.len(),
            "resolution finished"
        );

        Ok(ResolutionOutcome {
            valid,
            errors,
            warnings,
            resolved_document: Some(resolved),
            ancestors,
            suppressed_errors,
        })
    }

    fn resolve_at(
        &self,
        ctx: &mut ResolutionContext,
        document: SpecDocument,
        base: &Location,
        depth: usize,
    ) -> SpecDocument {
        if depth > self.options.max_depth {
            ctx.record(Diagnostic::error(
                DiagnosticCode::MaxInheritanceDepth,
                format!(
                    "inheritance chain deeper than {} at {base} (depth {depth})",
                    self.options.max_depth
                ),
            ));
            return document;
        }
        if document.extends.is_empty() {
            return document;
        }

        let parents = document.extends.clone();
        let mut result = document;

        for reference in &parents {
            let location = match self.locations.resolve(reference, base) {
                Ok(location) => location,
                Err(e) => {
                    ctx.record(Diagnostic::error(DiagnosticCode::ParentLoadError, e.to_string()));
                    continue;
                }
            };

            if ctx.is_in_progress(&location) {
                let cycle = format_cycle(&ctx.cycle_path(&location));
                if !self.options.allow_circular {
                    ctx.record(Diagnostic::error(
                        DiagnosticCode::CircularInheritance,
                        format!("circular inheritance: {cycle}"),
                    ));
                    continue;
                }
                ctx.record(Diagnostic::warning(
                    DiagnosticCode::CircularInheritanceAllowed,
                    format!("following circular inheritance: {cycle}"),
                ));
            }

            let mut frame = ctx.enter(location.clone());
            let parent = match self.load(&mut frame, &location) {
                Ok(parent) => parent,
                Err(e) => {
                    frame.record(Diagnostic::error(
                        DiagnosticCode::ParentLoadError,
                        format!("failed to load parent '{reference}' ({location}): {e}"),
                    ));
                    continue;
                }
            };

            let resolved_parent =
                self.resolve_at(&mut frame, parent.as_ref().clone(), &location, depth + 1);
            tracing::debug!(parent = %location, depth, "folding parent");
            result = merge_documents(&resolved_parent, &result, self.options.merge_strategy);
        }

        result
    }

    /// Session cache, then import cache, then the loader.
    fn load(
        &self,
        ctx: &mut ResolutionContext,
        location: &Location,
    ) -> std::result::Result<Arc<SpecDocument>, LoadError> {
        if let Some(doc) = ctx.cached(location) {
            tracing::debug!(%location, "session cache hit");
            return Ok(doc);
        }

        if let Some(cache) = self.import_cache {
            if let Some(doc) = cache.get(location) {
                tracing::debug!(%location, "import cache hit");
                ctx.remember(location.clone(), Arc::clone(&doc));
                return Ok(doc);
            }
        }

        tracing::debug!(%location, "loading parent");
        let doc = Arc::new(self.loader.load(location)?);
        if let Some(cache) = self.import_cache {
            cache.insert(location.clone(), Arc::clone(&doc));
        }
        ctx.remember(location.clone(), Arc::clone(&doc));
        Ok(doc)
    }
}

fn format_cycle(path: &[Location]) -> String {
    path.iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Everything one resolution needs besides the document itself.
pub struct InheritanceContext<'a> {
    /// Location of the document being resolved.
    pub base_location: String,
    pub loader: &'a dyn DocumentLoader,
    pub locations: &'a dyn LocationResolver,
    pub import_cache: Option<&'a ImportCache>,
    pub options: ResolveOptions,
}

impl<'a> InheritanceContext<'a> {
    /// Context with path-based location resolution and default options.
    pub fn new(base_location: impl Into<String>, loader: &'a dyn DocumentLoader) -> Self {
        Self {
            base_location: base_location.into(),
            loader,
            locations: &PathLocationResolver,
            import_cache: None,
            options: ResolveOptions::default(),
        }
    }

    /// Builder: set the resolution options.
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder: share an import cache with this resolution.
    pub fn with_import_cache(mut self, cache: &'a ImportCache) -> Self {
        self.import_cache = Some(cache);
        self
    }

    /// Builder: use a custom location resolver.
    pub fn with_locations(mut self, locations: &'a dyn LocationResolver) -> Self {
        self.locations = locations;
        self
    }
}

/// Resolve a document's inheritance chain in a fresh session.
pub fn resolve_inheritance(
    document: &SpecDocument,
    context: &InheritanceContext<'_>,
) -> Result<ResolutionOutcome> {
    let mut resolver = InheritanceResolver::new(context.loader, context.locations)
        .with_options(context.options.clone());
    if let Some(cache) = context.import_cache {
        resolver = resolver.with_import_cache(cache);
    }
    resolver.resolve(document, &context.base_location)
}
