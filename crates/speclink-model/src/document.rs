//! The specification document and its metadata block.

use serde::{Deserialize, Serialize};

use crate::entity::{ApiEndpoint, BusinessRule, DataStructure, WorkflowStep};
use crate::sections::{AiContext, Governance};

/// Identity and descriptive metadata of a document.
///
/// Every scalar is optional so that an absent value can be told apart from
/// an empty one: `Some("")` is present and wins over an ancestor's value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Ordered; duplicates are kept.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Metadata {
    /// Create metadata carrying only an identifier.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// One composable unit of the specification language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecDocument {
    #[serde(default)]
    pub metadata: Metadata,

    /// Parent document references, resolved relative to this document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exports: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub business_rules: Vec<BusinessRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_structures: Vec<DataStructure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_endpoints: Vec<ApiEndpoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workflow_steps: Vec<WorkflowStep>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_context: Option<AiContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governance: Option<Governance>,
}

impl SpecDocument {
    /// Create an empty document with the given metadata id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            metadata: Metadata::with_id(id),
            ..Self::default()
        }
    }

    /// Builder: add a parent reference to the `extends` chain.
    pub fn extending(mut self, reference: impl Into<String>) -> Self {
        self.extends.push(reference.into());
        self
    }

    /// Builder: add a business rule.
    pub fn with_rule(mut self, rule: BusinessRule) -> Self {
        self.business_rules.push(rule);
        self
    }

    /// Builder: add a data structure.
    pub fn with_structure(mut self, structure: DataStructure) -> Self {
        self.data_structures.push(structure);
        self
    }

    /// Builder: add an API endpoint.
    pub fn with_endpoint(mut self, endpoint: ApiEndpoint) -> Self {
        self.api_endpoints.push(endpoint);
        self
    }

    /// Builder: add a workflow step.
    pub fn with_step(mut self, step: WorkflowStep) -> Self {
        self.workflow_steps.push(step);
        self
    }

    /// Builder: set the AI-context section.
    pub fn with_ai_context(mut self, ai_context: AiContext) -> Self {
        self.ai_context = Some(ai_context);
        self
    }

    /// Builder: set the governance section.
    pub fn with_governance(mut self, governance: Governance) -> Self {
        self.governance = Some(governance);
        self
    }

    /// Whether this document declares any parents.
    pub fn has_parents(&self) -> bool {
        !self.extends.is_empty()
    }

    /// Look up a workflow step by id.
    pub fn step(&self, id: &str) -> Option<&WorkflowStep> {
        self.workflow_steps.iter().find(|s| s.id == id)
    }

    /// Look up a business rule by id.
    pub fn rule(&self, id: &str) -> Option<&BusinessRule> {
        self.business_rules.iter().find(|r| r.id == id)
    }

    /// Look up a data structure by id.
    pub fn structure(&self, id: &str) -> Option<&DataStructure> {
        self.data_structures.iter().find(|d| d.id == id)
    }

    /// Look up an API endpoint by id.
    pub fn endpoint(&self, id: &str) -> Option<&ApiEndpoint> {
        self.api_endpoints.iter().find(|e| e.id == id)
    }

    /// Total number of entities across the four collections.
    pub fn entity_count(&self) -> usize {
        self.business_rules.len()
            + self.data_structures.len()
            + self.api_endpoints.len()
            + self.workflow_steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_populates_collections() {
        let doc = SpecDocument::new("orders")
            .extending("./base.yaml")
            .with_rule(BusinessRule::new("r1"))
            .with_step(WorkflowStep::new("s1"))
            .with_endpoint(ApiEndpoint::new("e1"));

        assert_eq!(doc.metadata.id.as_deref(), Some("orders"));
        assert!(doc.has_parents());
        assert_eq!(doc.entity_count(), 3);
        assert!(doc.rule("r1").is_some());
        assert!(doc.step("s1").is_some());
        assert!(doc.endpoint("missing").is_none());
    }

    #[test]
    fn empty_document_has_no_parents() {
        let doc = SpecDocument::default();
        assert!(!doc.has_parents());
        assert_eq!(doc.entity_count(), 0);
        assert!(doc.ai_context.is_none());
    }

    #[test]
    fn empty_collections_are_not_serialized() {
        let doc = SpecDocument::new("lean");
        let json = serde_json::to_value(&doc).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("metadata"));
        assert!(!obj.contains_key("business_rules"));
        assert!(!obj.contains_key("extends"));
        assert!(!obj.contains_key("governance"));
    }

    #[test]
    fn empty_title_is_present() {
        let json = r#"{"metadata": {"title": ""}}"#;
        let doc: SpecDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.metadata.title.as_deref(), Some(""));
        assert!(doc.metadata.description.is_none());
    }
}
