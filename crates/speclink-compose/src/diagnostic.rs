//! Structured diagnostics produced during composition.

use std::fmt;

use serde::{Deserialize, Serialize};
use speclink_model::EntityKind;

/// Severity level for diagnostics.
///
/// Only errors affect the validity of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARN"),
        }
    }
}

/// Stable machine-readable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    MaxInheritanceDepth,
    CircularInheritance,
    /// Warning: a cycle was followed because circular inheritance is allowed.
    CircularInheritanceAllowed,
    ParentLoadError,
    DuplicateInheritedRuleId,
    DuplicateInheritedStructureId,
    DuplicateInheritedEndpointId,
    DuplicateInheritedStepId,
    /// Two endpoints share both method and path.
    DuplicateInheritedEndpoint,
    MissingInheritedDependency,
}

impl DiagnosticCode {
    /// The duplicate-id code for an entity collection.
    pub fn duplicate_id(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Rule => DiagnosticCode::DuplicateInheritedRuleId,
            EntityKind::Structure => DiagnosticCode::DuplicateInheritedStructureId,
            EntityKind::Endpoint => DiagnosticCode::DuplicateInheritedEndpointId,
            EntityKind::Step => DiagnosticCode::DuplicateInheritedStepId,
        }
    }

    /// The code as it appears in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::MaxInheritanceDepth => "MAX_INHERITANCE_DEPTH",
            DiagnosticCode::CircularInheritance => "CIRCULAR_INHERITANCE",
            DiagnosticCode::CircularInheritanceAllowed => "CIRCULAR_INHERITANCE_ALLOWED",
            DiagnosticCode::ParentLoadError => "PARENT_LOAD_ERROR",
            DiagnosticCode::DuplicateInheritedRuleId => "DUPLICATE_INHERITED_RULE_ID",
            DiagnosticCode::DuplicateInheritedStructureId => "DUPLICATE_INHERITED_STRUCTURE_ID",
            DiagnosticCode::DuplicateInheritedEndpointId => "DUPLICATE_INHERITED_ENDPOINT_ID",
            DiagnosticCode::DuplicateInheritedStepId => "DUPLICATE_INHERITED_STEP_ID",
            DiagnosticCode::DuplicateInheritedEndpoint => "DUPLICATE_INHERITED_ENDPOINT",
            DiagnosticCode::MissingInheritedDependency => "MISSING_INHERITED_DEPENDENCY",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic message.
///
/// `line` and `column` are zero when provenance cannot be tracked, which
/// is always the case for findings on a merged document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub line: u32,
    pub column: u32,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            severity: Severity::Error,
            line: 0,
            column: 0,
        }
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            severity: Severity::Warning,
            line: 0,
            column: 0,
        }
    }

    /// Builder: attach a source position.
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)?;
        if self.line > 0 {
            write!(f, " (line {}, column {})", self.line, self.column)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_as_stable_strings() {
        for code in [
            DiagnosticCode::MaxInheritanceDepth,
            DiagnosticCode::CircularInheritance,
            DiagnosticCode::CircularInheritanceAllowed,
            DiagnosticCode::ParentLoadError,
            DiagnosticCode::DuplicateInheritedRuleId,
            DiagnosticCode::DuplicateInheritedStructureId,
            DiagnosticCode::DuplicateInheritedEndpointId,
            DiagnosticCode::DuplicateInheritedStepId,
            DiagnosticCode::DuplicateInheritedEndpoint,
            DiagnosticCode::MissingInheritedDependency,
        ] {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, code.as_str());
        }
    }

    #[test]
    fn duplicate_id_code_per_kind() {
        assert_eq!(
            DiagnosticCode::duplicate_id(EntityKind::Step).as_str(),
            "DUPLICATE_INHERITED_STEP_ID"
        );
        assert_eq!(
            DiagnosticCode::duplicate_id(EntityKind::Rule).as_str(),
            "DUPLICATE_INHERITED_RULE_ID"
        );
    }

    #[test]
    fn diagnostic_record_shape() {
        let d = Diagnostic::error(DiagnosticCode::ParentLoadError, "boom");
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["code"], "PARENT_LOAD_ERROR");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["line"], 0);
        assert_eq!(json["column"], 0);
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn display_includes_position_when_known() {
        let plain = Diagnostic::warning(DiagnosticCode::CircularInheritanceAllowed, "cycle");
        assert_eq!(plain.to_string(), "[WARN] CIRCULAR_INHERITANCE_ALLOWED: cycle");

        let placed = Diagnostic::error(DiagnosticCode::ParentLoadError, "bad").at(3, 7);
        assert!(placed.to_string().ends_with("(line 3, column 7)"));
        assert!(placed.is_error());
    }
}
