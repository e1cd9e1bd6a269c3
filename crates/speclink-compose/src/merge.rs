//! The merge engine: combines a base (ancestor) document with an override
//! (descendant) document.
//!
//! Merging is pure. Inputs are never mutated and no diagnostics are
//! produced; inconsistencies a merge introduces (duplicate ids under
//! [`MergeStrategy::Append`], dangling dependencies) are left for the
//! consistency pass to report.
//!
//! Policy per part of the document:
//!
//! | Part | Policy |
//! |---|---|
//! | metadata | override's present fields win; `tags` concatenated |
//! | entity collections | by id, according to the [`MergeStrategy`] |
//! | AI context | field-wise; hint lists concatenated and de-duplicated |
//! | governance | field-wise; lists concatenated, audit trail kept whole |
//! | imports / exports | concatenated base-then-override |
//! | extends | override's list kept verbatim |

use speclink_model::{
    AiContext, ApiEndpoint, BusinessRule, DataStructure, Entity, Governance, Metadata,
    SpecDocument, WorkflowStep,
};

use crate::options::MergeStrategy;

/// Field-wise combination of two values of the same type.
///
/// `self` is the base, `over` the override. Present scalar fields of
/// `over` win; list fields are concatenated base-then-override.
pub trait Combine {
    fn combine(&self, over: &Self) -> Self;
}

fn pick<T: Clone>(base: &Option<T>, over: &Option<T>) -> Option<T> {
    over.as_ref().or(base.as_ref()).cloned()
}

fn concat<T: Clone>(base: &[T], over: &[T]) -> Vec<T> {
    base.iter().chain(over).cloned().collect()
}

/// Concatenate keeping only the first occurrence of each item.
fn union<T: Clone + PartialEq>(base: &[T], over: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(base.len() + over.len());
    for item in base.iter().chain(over) {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

impl Combine for Metadata {
    fn combine(&self, over: &Self) -> Self {
        Metadata {
            id: pick(&self.id, &over.id),
            version: pick(&self.version, &over.version),
            title: pick(&self.title, &over.title),
            description: pick(&self.description, &over.description),
            author: pick(&self.author, &over.author),
            tags: concat(&self.tags, &over.tags),
        }
    }
}

impl Combine for BusinessRule {
    fn combine(&self, over: &Self) -> Self {
        BusinessRule {
            id: self.id.clone(),
            name: pick(&self.name, &over.name),
            description: pick(&self.description, &over.description),
            condition: pick(&self.condition, &over.condition),
            action: pick(&self.action, &over.action),
            priority: pick(&self.priority, &over.priority),
            exceptions: concat(&self.exceptions, &over.exceptions),
        }
    }
}

impl Combine for DataStructure {
    fn combine(&self, over: &Self) -> Self {
        DataStructure {
            id: self.id.clone(),
            name: pick(&self.name, &over.name),
            description: pick(&self.description, &over.description),
            fields: concat(&self.fields, &over.fields),
            constraints: concat(&self.constraints, &over.constraints),
            relationships: concat(&self.relationships, &over.relationships),
            indexes: concat(&self.indexes, &over.indexes),
        }
    }
}

impl Combine for ApiEndpoint {
    fn combine(&self, over: &Self) -> Self {
        ApiEndpoint {
            id: self.id.clone(),
            method: pick(&self.method, &over.method),
            path: pick(&self.path, &over.path),
            summary: pick(&self.summary, &over.summary),
            description: pick(&self.description, &over.description),
            request_schema: pick(&self.request_schema, &over.request_schema),
            response_schema: pick(&self.response_schema, &over.response_schema),
            auth: pick(&self.auth, &over.auth),
            parameters: concat(&self.parameters, &over.parameters),
        }
    }
}

impl Combine for WorkflowStep {
    fn combine(&self, over: &Self) -> Self {
        WorkflowStep {
            id: self.id.clone(),
            name: pick(&self.name, &over.name),
            description: pick(&self.description, &over.description),
            actor: pick(&self.actor, &over.actor),
            action: pick(&self.action, &over.action),
            depends_on: concat(&self.depends_on, &over.depends_on),
            outputs: concat(&self.outputs, &over.outputs),
        }
    }
}

impl Combine for AiContext {
    fn combine(&self, over: &Self) -> Self {
        AiContext {
            summary: pick(&self.summary, &over.summary),
            model_hints: union(&self.model_hints, &over.model_hints),
            constraints: union(&self.constraints, &over.constraints),
            examples: union(&self.examples, &over.examples),
            max_tokens: pick(&self.max_tokens, &over.max_tokens),
        }
    }
}

impl Combine for Governance {
    fn combine(&self, over: &Self) -> Self {
        Governance {
            owner: pick(&self.owner, &over.owner),
            status: pick(&self.status, &over.status),
            data_classification: pick(&self.data_classification, &over.data_classification),
            review_cycle: pick(&self.review_cycle, &over.review_cycle),
            compliance_frameworks: concat(&self.compliance_frameworks, &over.compliance_frameworks),
            audit_trail: concat(&self.audit_trail, &over.audit_trail),
        }
    }
}

/// Merge one id-keyed entity collection.
///
/// Starts from `base` in order; each `over` entity is matched by id
/// against the accumulating list. Unmatched entities are appended.
///
/// Under [`MergeStrategy::Append`] a matched entity is still appended as
/// a new entry, deliberately producing a duplicate id. The lookup has no
/// effect in that mode; the behavior is kept as-is so composed output
/// stays compatible with existing documents.
pub fn merge_collection<T>(base: &[T], over: &[T], strategy: MergeStrategy) -> Vec<T>
where
    T: Entity + Combine,
{
    let mut merged = base.to_vec();
    for entity in over {
        match merged.iter().position(|e| e.id() == entity.id()) {
            Some(idx) => match strategy {
                MergeStrategy::Override => merged[idx] = entity.clone(),
                MergeStrategy::Merge => merged[idx] = merged[idx].combine(entity),
                MergeStrategy::Append => merged.push(entity.clone()),
            },
            None => merged.push(entity.clone()),
        }
    }
    merged
}

/// Merge an optional singleton section: one side present wins unmodified,
/// both present combine field-wise.
pub fn merge_section<T>(base: &Option<T>, over: &Option<T>) -> Option<T>
where
    T: Combine + Clone,
{
    match (base, over) {
        (Some(b), Some(o)) => Some(b.combine(o)),
        (Some(b), None) => Some(b.clone()),
        (None, o) => o.clone(),
    }
}

/// Merge a base document beneath an override document.
pub fn merge_documents(
    base: &SpecDocument,
    over: &SpecDocument,
    strategy: MergeStrategy,
) -> SpecDocument {
    SpecDocument {
        metadata: base.metadata.combine(&over.metadata),
        extends: over.extends.clone(),
        imports: concat(&base.imports, &over.imports),
        exports: concat(&base.exports, &over.exports),
        business_rules: merge_collection(&base.business_rules, &over.business_rules, strategy),
        data_structures: merge_collection(&base.data_structures, &over.data_structures, strategy),
        api_endpoints: merge_collection(&base.api_endpoints, &over.api_endpoints, strategy),
        workflow_steps: merge_collection(&base.workflow_steps, &over.workflow_steps, strategy),
        ai_context: merge_section(&base.ai_context, &over.ai_context),
        governance: merge_section(&base.governance, &over.governance),
    }
}
