//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Steps allowed on top of the tree height before a dispatch is declared a
/// runaway loop.
///
/// A dispatch needs at most `height + 1` steps to settle without automatic
/// transitions: one for the transition itself and one per cascade level.
/// Each automatic transition returned by an entry action costs one more.
pub const DEFAULT_STEP_SLACK: usize = 16;

/// Tunables for a [`Machine`](crate::engine::Machine).
///
/// # Example
///
/// ```rust
/// use statetree::engine::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{ "step_slack": 4 }"#).unwrap();
/// assert_eq!(config.step_slack, 4);
/// assert_eq!(config.step_limit(3), 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Extra steps tolerated beyond `tree height + 1`
    pub step_slack: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            step_slack: DEFAULT_STEP_SLACK,
        }
    }
}

impl MachineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step_slack(mut self, slack: usize) -> Self {
        self.step_slack = slack;
        self
    }

    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Step budget for a tree of the given height.
    pub fn step_limit(&self, height: usize) -> usize {
        height
            .saturating_add(1)
            .saturating_add(self.step_slack)
    }
}
