//! Post-merge consistency pass.
//!
//! Runs over a fully composed document and reports what composition can
//! break: duplicate ids, duplicate endpoint routes, and workflow
//! dependencies that point at steps that do not exist. Every check runs
//! regardless of the others and every finding is an error.
//!
//! Dependency cycles are not checked here.

use std::collections::{HashMap, HashSet};

use speclink_model::{ApiEndpoint, Entity, SpecDocument, WorkflowStep};

use crate::diagnostic::{Diagnostic, DiagnosticCode};

/// Check a composed document, returning one diagnostic per finding.
pub fn check_consistency(document: &SpecDocument) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    duplicate_ids(&document.business_rules, &mut diagnostics);
    duplicate_ids(&document.data_structures, &mut diagnostics);
    duplicate_ids(&document.api_endpoints, &mut diagnostics);
    duplicate_ids(&document.workflow_steps, &mut diagnostics);
    duplicate_routes(&document.api_endpoints, &mut diagnostics);
    missing_dependencies(&document.workflow_steps, &mut diagnostics);
    diagnostics
}

/// One error for every entity whose id was already seen earlier in the
/// collection.
fn duplicate_ids<T: Entity>(entities: &[T], out: &mut Vec<Diagnostic>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for entity in entities {
        if !seen.insert(entity.id()) {
            out.push(Diagnostic::error(
                DiagnosticCode::duplicate_id(T::KIND),
                format!(
                    "duplicate {} id '{}' in resolved document",
                    T::KIND,
                    entity.id()
                ),
            ));
        }
    }
}

fn duplicate_routes(endpoints: &[ApiEndpoint], out: &mut Vec<Diagnostic>) {
    let mut seen: HashMap<(String, &str), &str> = HashMap::new();
    for endpoint in endpoints {
        let Some(key) = endpoint.route_key() else {
            continue;
        };
        if let Some(first) = seen.get(&key) {
            out.push(Diagnostic::error(
                DiagnosticCode::DuplicateInheritedEndpoint,
                format!(
                    "endpoints '{}' and '{}' both declare {} {}",
                    first, endpoint.id, key.0, key.1
                ),
            ));
        } else {
            seen.insert(key, endpoint.id.as_str());
        }
    }
}

/// Each (step, missing dependency) pair is reported once, even when the
/// dependency is listed repeatedly or the step itself is duplicated.
fn missing_dependencies(steps: &[WorkflowStep], out: &mut Vec<Diagnostic>) {
    let known: HashSet<&str> = steps.iter().map(|s| s.id.as_str()).collect();
    let mut reported: HashSet<(&str, &str)> = HashSet::new();

    for step in steps {
        for dep in &step.depends_on {
            if known.contains(dep.as_str()) {
                continue;
            }
            if reported.insert((step.id.as_str(), dep.as_str())) {
                out.push(Diagnostic::error(
                    DiagnosticCode::MissingInheritedDependency,
                    format!(
                        "workflow step '{}' depends on '{}', which is not defined in the resolved document",
                        step.id, dep
                    ),
                ));
            }
        }
    }
}
