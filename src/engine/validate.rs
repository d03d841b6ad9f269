//! Whole-tree checks run when a machine is constructed.
//!
//! The builder already checks each node in isolation. What remains needs the
//! finished tree: the root id, absolute `initial` targets and the fixed
//! targets of `on_target` handlers.

use crate::builder::{conclude, ensure, reject, Check, ConfigError, ConfigIssue};
use crate::core::{is_valid_name, StateNode, StatePath};
use crate::engine::resolver::locate;

/// Check the tree and return the path of its root.
pub(crate) fn validate<E>(root: &StateNode<E>) -> Result<StatePath, ConfigError> {
    let Some(id) = root.id() else {
        return Err(ConfigError {
            issues: vec![ConfigIssue::MissingRootId],
        });
    };
    if !is_valid_name(id) {
        return Err(ConfigError {
            issues: vec![ConfigIssue::InvalidStateName {
                parent: "top level".to_string(),
                name: id.to_string(),
            }],
        });
    }

    let root_path = StatePath::new(id);
    let mut checks = Vec::new();
    walk(root, root, &root_path, &mut checks);
    conclude(checks)?;
    Ok(root_path)
}

fn walk<E>(root: &StateNode<E>, node: &StateNode<E>, path: &StatePath, checks: &mut Vec<Check>) {
    if let Some(initial) = node.initial() {
        let issue = || ConfigIssue::InitialOutsideStates {
            state: path.to_string(),
            initial: initial.to_string(),
        };
        checks.push(match locate(root, path, initial) {
            Ok(found) => ensure(found.parent().as_ref() == Some(path), issue),
            Err(_) => reject(issue()),
        });
    }

    // Fixed targets resolve among the owner's siblings, like handler results.
    let anchor = path.parent().unwrap_or_else(|| path.clone());
    for event in node.events() {
        let Some(target) = node.handler(event).and_then(|h| h.fixed_target()) else {
            continue;
        };
        if let Err(e) = locate(root, &anchor, target) {
            checks.push(reject(ConfigIssue::UnresolvedTarget {
                state: path.to_string(),
                event: event.to_string(),
                target: target.to_string(),
                reason: e.to_string(),
            }));
        }
    }

    for (name, child) in node.children() {
        walk(root, child, &path.child(name), checks);
    }
}
