//! Resolver configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default limit on `extends` nesting.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// How same-id entities from a base and an override document combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// The override entity replaces the base entity wholesale.
    Override,
    /// Field-wise combination; override's present fields win, lists concatenate.
    #[default]
    Merge,
    /// The override entity is appended even when the id already exists.
    ///
    /// The resulting duplicates are reported by the consistency pass.
    Append,
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "override" => Ok(MergeStrategy::Override),
            "merge" => Ok(MergeStrategy::Merge),
            "append" => Ok(MergeStrategy::Append),
            other => Err(format!(
                "unknown merge strategy '{other}' (expected override, merge or append)"
            )),
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStrategy::Override => write!(f, "override"),
            MergeStrategy::Merge => write!(f, "merge"),
            MergeStrategy::Append => write!(f, "append"),
        }
    }
}

/// Options for one inheritance resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Deepest `extends` nesting resolved; deeper branches are abandoned.
    pub max_depth: usize,
    /// Follow circular references instead of rejecting them.
    ///
    /// There is no cycle truncation in this mode: `max_depth` is what
    /// eventually stops the recursion.
    pub allow_circular: bool,
    pub merge_strategy: MergeStrategy,
    /// Run the consistency pass over the composed document.
    pub validate_consistency: bool,
    /// Cap on stored errors. `None` stores every error.
    pub max_errors: Option<usize>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_circular: false,
            merge_strategy: MergeStrategy::default(),
            validate_consistency: true,
            max_errors: None,
        }
    }
}

impl ResolveOptions {
    /// Builder: set the maximum depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder: allow or reject circular inheritance.
    pub fn with_allow_circular(mut self, allow: bool) -> Self {
        self.allow_circular = allow;
        self
    }

    /// Builder: set the merge strategy.
    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = strategy;
        self
    }

    /// Builder: enable or disable the consistency pass.
    pub fn with_consistency(mut self, enabled: bool) -> Self {
        self.validate_consistency = enabled;
        self
    }

    /// Builder: cap the number of stored errors.
    pub fn with_max_errors(mut self, cap: usize) -> Self {
        self.max_errors = Some(cap);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ResolveOptions::default();
        assert_eq!(opts.max_depth, 10);
        assert!(!opts.allow_circular);
        assert_eq!(opts.merge_strategy, MergeStrategy::Merge);
        assert!(opts.validate_consistency);
        assert_eq!(opts.max_errors, None);
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!("override".parse::<MergeStrategy>(), Ok(MergeStrategy::Override));
        assert_eq!("MERGE".parse::<MergeStrategy>(), Ok(MergeStrategy::Merge));
        assert_eq!("append".parse::<MergeStrategy>(), Ok(MergeStrategy::Append));
        assert!("replace".parse::<MergeStrategy>().is_err());
    }

    #[test]
    fn strategy_serde_is_lowercase() {
        let json = serde_json::to_string(&MergeStrategy::Append).unwrap();
        assert_eq!(json, "\"append\"");
        let back: MergeStrategy = serde_json::from_str("\"override\"").unwrap();
        assert_eq!(back, MergeStrategy::Override);
    }

    #[test]
    fn builder_chain() {
        let opts = ResolveOptions::default()
            .with_max_depth(3)
            .with_allow_circular(true)
            .with_strategy(MergeStrategy::Override)
            .with_consistency(false)
            .with_max_errors(5);
        assert_eq!(opts.max_depth, 3);
        assert!(opts.allow_circular);
        assert_eq!(opts.merge_strategy, MergeStrategy::Override);
        assert!(!opts.validate_consistency);
        assert_eq!(opts.max_errors, Some(5));
    }
}
