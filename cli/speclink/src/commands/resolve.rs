//! `speclink resolve`: print the composed document.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use speclink_compose::{ResolutionOutcome, ResolveOptions};
use speclink_model::DocumentFormat;

use super::{ensure_valid, report_diagnostics, resolve_file};

/// Resolve `file` and write the composed document to stdout or `output`.
///
/// The document is emitted even when errors were recorded, so partial
/// results stay inspectable; the command still fails afterwards.
pub fn run(
    cwd: &Path,
    file: &Path,
    options: ResolveOptions,
    format: DocumentFormat,
    output: Option<&Path>,
    flatten: bool,
    digest: bool,
) -> Result<()> {
    let outcome = resolve_file(cwd, file, options)?;
    report_diagnostics(&outcome);

    let rendered = render(&outcome, format, flatten)?;
    match output {
        Some(path) => {
            fs::write(path, &rendered).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }

    if digest {
        if let Some(hash) = outcome.digest()? {
            eprintln!("digest: {hash}");
        }
    }

    ensure_valid(&outcome)
}

/// Render the composed document in `format`.
pub fn render(outcome: &ResolutionOutcome, format: DocumentFormat, flatten: bool) -> Result<String> {
    let document = if flatten {
        outcome.flattened()
    } else {
        outcome.resolved_document.clone()
    };
    let Some(document) = document else {
        return Ok(String::new());
    };

    let mut text = document
        .to_string_pretty(format)
        .with_context(|| format!("rendering as {format}"))?;
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}
