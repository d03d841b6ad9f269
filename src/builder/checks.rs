//! Accumulating checks for rule tree validation.
//!
//! Each check is a `Validation`; failures are gathered with `all_vec` so
//! every issue is reported at once instead of stopping at the first.

use crate::builder::error::{ConfigError, ConfigIssue};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub(crate) type Check = Validation<(), NonEmptyVec<ConfigIssue>>;

/// Passes when `holds`, otherwise fails with the issue built by `issue`.
pub(crate) fn ensure<F>(holds: bool, issue: F) -> Check
where
    F: FnOnce() -> ConfigIssue,
{
    if holds {
        Validation::success(())
    } else {
        Validation::fail(issue())
    }
}

pub(crate) fn reject(issue: ConfigIssue) -> Check {
    Validation::fail(issue)
}

/// Fold all checks into a single result.
pub(crate) fn conclude(checks: Vec<Check>) -> Result<(), ConfigError> {
    match Validation::all_vec(checks) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(issues) => Err(ConfigError {
            issues: issues.iter().cloned().collect(),
        }),
    }
}
