//! Resolution against documents stored on disk.

use std::path::Path;

use speclink_compose::{
    resolve_inheritance, DiagnosticCode, FsLoader, ImportCache, InheritanceContext, MergeStrategy,
    ResolveOptions,
};
use speclink_model::{DocumentFormat, SpecDocument};

fn write(dir: &Path, rel: &str, text: &str) -> String {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, text).unwrap();
    path.to_string_lossy().into_owned()
}

fn load(path: &str) -> SpecDocument {
    let text = std::fs::read_to_string(path).unwrap();
    SpecDocument::parse(&text, DocumentFormat::from_path(Path::new(path)).unwrap()).unwrap()
}

#[test]
fn mixed_format_chain_resolves() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "shared/base.toml",
        r#"
[metadata]
id = "base"
title = "Base"
tags = ["shared"]

[[workflow_steps]]
id = "validate"
"#,
    );
    write(
        dir.path(),
        "shared/payments.json",
        r#"{
  "extends": ["./base.toml"],
  "metadata": {"id": "payments", "tags": ["payments"]},
  "workflow_steps": [{"id": "charge", "depends_on": ["validate"]}],
  "governance": {"owner": "payments-team", "compliance_frameworks": ["PCI-DSS"]}
}"#,
    );
    let root = write(
        dir.path(),
        "orders/orders.yaml",
        r#"
metadata:
  id: orders
  tags: [orders]
extends:
  - ../shared/payments.json
workflow_steps:
  - id: ship
    depends_on: [charge]
governance:
  compliance_frameworks: [SOC2]
"#,
    );

    let doc = load(&root);
    let ctx = InheritanceContext::new(root.clone(), &FsLoader);
    let outcome = resolve_inheritance(&doc, &ctx).unwrap();

    assert!(outcome.valid, "{outcome}");
    assert_eq!(outcome.ancestors.len(), 2);

    let resolved = outcome.resolved_document.unwrap();
    assert_eq!(resolved.metadata.id.as_deref(), Some("orders"));
    assert_eq!(resolved.metadata.title.as_deref(), Some("Base"));
    assert_eq!(resolved.metadata.tags, vec!["shared", "payments", "orders"]);
    let steps: Vec<_> = resolved.workflow_steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(steps, vec!["validate", "charge", "ship"]);

    let gov = resolved.governance.unwrap();
    assert_eq!(gov.owner.as_deref(), Some("payments-team"));
    assert_eq!(gov.compliance_frameworks, vec!["PCI-DSS", "SOC2"]);
}

#[test]
fn malformed_parent_becomes_load_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.yaml", "workflow_steps: [ {id: ");
    let root = write(
        dir.path(),
        "child.yaml",
        "metadata:\n  id: child\nextends: [broken.yaml, absent.yaml]\n",
    );

    let doc = load(&root);
    let outcome = resolve_inheritance(&doc, &InheritanceContext::new(root.clone(), &FsLoader)).unwrap();

    assert!(!outcome.valid);
    assert_eq!(outcome.count(DiagnosticCode::ParentLoadError), 2);
    assert_eq!(
        outcome.resolved_document.unwrap().metadata.id.as_deref(),
        Some("child")
    );
}

#[test]
fn self_extending_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let root = write(
        dir.path(),
        "loop.yaml",
        "metadata:\n  id: loop\nextends: [./sub/../loop.yaml]\n",
    );

    let doc = load(&root);
    let outcome = resolve_inheritance(&doc, &InheritanceContext::new(root.clone(), &FsLoader)).unwrap();
    assert_eq!(outcome.count(DiagnosticCode::CircularInheritance), 1);
    assert!(outcome.ancestors.is_empty());
}

#[test]
fn project_build_reuses_import_cache() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "base.yaml",
        "business_rules:\n  - id: audit\n    name: Audit everything\n",
    );
    let first = write(dir.path(), "a.yaml", "extends: [base.yaml]\n");
    let second = write(dir.path(), "b.yaml", "extends: [base.yaml]\n");

    let cache = ImportCache::new();
    let options = ResolveOptions::default().with_strategy(MergeStrategy::Override);
    for root in [&first, &second] {
        let doc = load(root);
        let ctx = InheritanceContext::new(root.clone(), &FsLoader)
            .with_import_cache(&cache)
            .with_options(options.clone());
        let outcome = resolve_inheritance(&doc, &ctx).unwrap();
        assert!(outcome.valid);
        assert!(outcome.resolved_document.unwrap().rule("audit").is_some());
    }

    let stats = cache.statistics();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits, 1);
}
