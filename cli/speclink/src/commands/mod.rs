//! CLI command implementations.

pub mod ancestors;
pub mod check;
pub mod resolve;

use std::path::Path;

use anyhow::{Context, Result};
use speclink_compose::{
    resolve_inheritance, DocumentLoader, FsLoader, InheritanceContext, LocationResolver,
    PathLocationResolver, ResolutionOutcome, ResolveOptions,
};

/// Load `file` from disk and resolve its inheritance chain.
///
/// Relative paths are taken from `cwd`, so every location in the
/// session is absolute and diagnostics name files unambiguously.
pub(crate) fn resolve_file(
    cwd: &Path,
    file: &Path,
    options: ResolveOptions,
) -> Result<ResolutionOutcome> {
    let location = PathLocationResolver.normalize(&cwd.join(file).to_string_lossy());
    let document = FsLoader
        .load(&location)
        .with_context(|| format!("loading {}", file.display()))?;

    tracing::debug!(
        location = %location,
        parents = document.extends.len(),
        strategy = %options.merge_strategy,
        "resolving"
    );

    let ctx = InheritanceContext::new(location.as_str(), &FsLoader).with_options(options);
    let outcome = resolve_inheritance(&document, &ctx)
        .with_context(|| format!("resolving {}", file.display()))?;
    Ok(outcome)
}

/// Print every diagnostic to stderr, one per line.
pub(crate) fn report_diagnostics(outcome: &ResolutionOutcome) {
    for d in outcome.diagnostics() {
        eprintln!("{d}");
    }
    if outcome.suppressed_errors > 0 {
        eprintln!("... {} more errors suppressed", outcome.suppressed_errors);
    }
}

/// Fail the command when the outcome carries errors.
pub(crate) fn ensure_valid(outcome: &ResolutionOutcome) -> Result<()> {
    if !outcome.valid {
        anyhow::bail!(
            "resolution failed with {} error(s)",
            outcome.errors.len() + outcome.suppressed_errors
        );
    }
    Ok(())
}
