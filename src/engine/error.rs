//! Errors surfaced by machine construction and dispatch.

use crate::builder::ConfigError;
use crate::core::{PathError, StatePath};
use thiserror::Error;

/// A path segment that names no existing state.
///
/// `parent` is the path resolved before the failing segment; `None` means
/// the segment was checked against the root id itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("State '{segment}' does not exist in {}", location(.parent))]
pub struct UnknownState {
    pub segment: String,
    pub parent: Option<StatePath>,
}

fn location(parent: &Option<StatePath>) -> String {
    parent
        .as_ref()
        .map_or_else(|| "top level".to_string(), ToString::to_string)
}

/// Errors that can occur while building or driving a machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("Malformed path: {0}")]
    MalformedPath(#[from] PathError),

    #[error(transparent)]
    UnknownState(#[from] UnknownState),

    #[error("Event '{event}' targets '{target}', which does not resolve: {source}")]
    UnknownEventTarget {
        event: String,
        target: String,
        #[source]
        source: UnknownState,
    },

    #[error("Event '{event}' expects {expected} argument(s), {actual} given")]
    PayloadArity {
        event: String,
        expected: usize,
        actual: usize,
    },

    #[error("Transition did not settle within {limit} steps (last target {path})")]
    TransitionLoop { limit: usize, path: StatePath },
}

impl MachineError {
    /// The unresolved segment behind this error, for both the plain and the
    /// handler-target flavour.
    pub fn unknown_state(&self) -> Option<&UnknownState> {
        match self {
            Self::UnknownState(unknown) => Some(unknown),
            Self::UnknownEventTarget { source, .. } => Some(source),
            _ => None,
        }
    }
}
