//! `speclink check`: resolve and report, without printing the document.

use std::path::Path;

use anyhow::Result;
use speclink_compose::{ResolutionOutcome, ResolveOptions};

use super::{ensure_valid, resolve_file};

/// Resolve `file` and print the outcome summary (or JSON).
pub fn run(cwd: &Path, file: &Path, options: ResolveOptions, json: bool) -> Result<()> {
    let outcome = resolve_file(cwd, file, options)?;
    print!("{}", summary(&outcome, json)?);
    ensure_valid(&outcome)
}

/// The text `check` prints for an outcome.
///
/// JSON output omits the composed document.
pub fn summary(outcome: &ResolutionOutcome, json: bool) -> Result<String> {
    if json {
        let report = ResolutionOutcome {
            resolved_document: None,
            ..outcome.clone()
        };
        let mut text = serde_json::to_string_pretty(&report)?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(outcome.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testutil::write;

    fn conflicting() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "base.yaml",
            "api_endpoints:\n  - id: list\n    method: get\n    path: /orders\n",
        );
        write(
            dir.path(),
            "child.yaml",
            "extends: [base.yaml]\napi_endpoints:\n  - id: index\n    method: GET\n    path: /orders\n",
        );
        dir
    }

    #[test]
    fn text_summary_names_the_collision() {
        let dir = conflicting();
        let outcome =
            resolve_file(dir.path(), Path::new("child.yaml"), ResolveOptions::default()).unwrap();

        let text = summary(&outcome, false).unwrap();
        assert!(text.starts_with("=== Resolution FAILED ==="));
        assert!(text.contains("DUPLICATE_INHERITED_ENDPOINT"));
    }

    #[test]
    fn json_summary_omits_document() {
        let dir = conflicting();
        let outcome =
            resolve_file(dir.path(), Path::new("child.yaml"), ResolveOptions::default()).unwrap();

        let text = summary(&outcome, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["errors"][0]["code"], "DUPLICATE_INHERITED_ENDPOINT");
        assert!(value.get("resolvedDocument").is_none());
    }

    #[test]
    fn consistency_can_be_disabled() {
        let dir = conflicting();
        let options = ResolveOptions::default().with_consistency(false);
        assert!(run(dir.path(), Path::new("child.yaml"), options, false).is_ok());
    }
}
