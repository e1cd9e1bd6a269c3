//! `speclink ancestors`: list the documents a file inherits from.

use std::path::Path;

use anyhow::Result;
use speclink_compose::ResolveOptions;

use super::{report_diagnostics, resolve_file};

/// Print each ancestor location, in first-visit order.
///
/// Diagnostics go to stderr but do not fail the command; an incomplete
/// chain is still worth listing.
pub fn run(cwd: &Path, file: &Path, options: ResolveOptions) -> Result<()> {
    let outcome = resolve_file(cwd, file, options)?;
    report_diagnostics(&outcome);

    if outcome.ancestors.is_empty() {
        println!("{} has no ancestors", file.display());
        return Ok(());
    }
    for location in &outcome.ancestors {
        println!("{location}");
    }
    Ok(())
}
