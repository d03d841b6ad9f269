//! Construction errors for rule trees and machines.

use thiserror::Error;

/// A single problem found while validating a rule tree.
///
/// `state`/`parent` fields hold the textual path of the offending node.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("Root state has no id. Call .id(name) on the root builder")]
    MissingRootId,

    #[error("State name '{name}' under {parent} is empty or contains '#' or '.'")]
    InvalidStateName { parent: String, name: String },

    #[error("State '{name}' is declared twice under {parent}")]
    DuplicateState { parent: String, name: String },

    #[error("Event '{event}' has more than one handler in {state}")]
    DuplicateHandler { state: String, event: String },

    #[error("Compound state {state} has no initial state")]
    MissingInitial { state: String },

    #[error("Leaf state {state} declares initial '{initial}' but has no child states")]
    UnexpectedInitial { state: String, initial: String },

    #[error("Initial '{initial}' of {state} is not one of its child states")]
    InitialOutsideStates { state: String, initial: String },

    #[error("Target '{target}' in {state} is malformed: {reason}")]
    MalformedTarget {
        state: String,
        target: String,
        reason: String,
    },

    #[error("Event '{event}' in {state} targets '{target}', which does not resolve: {reason}")]
    UnresolvedTarget {
        state: String,
        event: String,
        target: String,
        reason: String,
    },
}

/// Every issue found while validating a rule tree.
///
/// Validation never stops at the first problem, so a single error lists
/// everything that has to be fixed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid machine configuration: {}", summarize(.issues))]
pub struct ConfigError {
    pub issues: Vec<ConfigIssue>,
}

impl ConfigError {
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    pub fn contains(&self, issue: &ConfigIssue) -> bool {
        self.issues.contains(issue)
    }
}

fn summarize(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_lists_every_issue() {
        let error = ConfigError {
            issues: vec![
                ConfigIssue::MissingRootId,
                ConfigIssue::MissingInitial {
                    state: "#top.a".to_string(),
                },
            ],
        };

        let message = error.to_string();
        assert!(message.contains("no id"));
        assert!(message.contains("#top.a has no initial"));
        assert!(error.contains(&ConfigIssue::MissingRootId));
        assert_eq!(error.issues().len(), 2);
    }
}
