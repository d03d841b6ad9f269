//! Transition history kept by callers.
//!
//! The engine itself is stateless between dispatches. Callers that want an
//! audit trail turn each [`Dispatch`](crate::engine::Dispatch) into a
//! [`TransitionRecord`] and fold it into an immutable [`History`].

use super::path::StatePath;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single transition between two stable paths.
///
/// # Example
///
/// ```rust
/// use statetree::core::{StatePath, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     event: "next".to_string(),
///     from: "#top.a.aa".parse().unwrap(),
///     to: "#top.a.ab".parse().unwrap(),
///     timestamp: Utc::now(),
///     steps: 2,
/// };
/// assert_eq!(record.to, StatePath::from_segments("top", ["a", "ab"]));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the event that caused the transition
    pub event: String,
    /// Stable path before the dispatch
    pub from: StatePath,
    /// Stable path after the dispatch
    pub to: StatePath,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
    /// Number of exit and entry actions the transition ran
    pub steps: usize,
}

/// Ordered, immutable history of transitions.
///
/// `record` returns a new history and leaves the receiver untouched.
///
/// # Example
///
/// ```rust
/// use statetree::core::{History, TransitionRecord};
/// use chrono::Utc;
///
/// let history = History::new();
/// let history = history.record(TransitionRecord {
///     event: "doThis".to_string(),
///     from: "#top.a.aa".parse().unwrap(),
///     to: "#top.b".parse().unwrap(),
///     timestamp: Utc::now(),
///     steps: 3,
/// });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path[1].to_string(), "#top.b");
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct History {
    transitions: Vec<TransitionRecord>,
}

impl History {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Paths visited: the first `from`, then every `to` in order.
    pub fn get_path(&self) -> Vec<&StatePath> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Most recent stable path, if anything was recorded.
    pub fn current(&self) -> Option<&StatePath> {
        self.transitions.last().map(|t| &t.to)
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }
}
