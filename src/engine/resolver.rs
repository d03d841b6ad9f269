//! Path resolution against a rule tree.
//!
//! Resolution is pure: it only reads the tree and never runs entry or exit
//! actions.

use crate::core::{StateNode, StatePath, Target};
use crate::engine::error::UnknownState;

/// Walk from the root to the node named by `path`.
pub fn resolve<'t, E>(
    root: &'t StateNode<E>,
    path: &StatePath,
) -> Result<&'t StateNode<E>, UnknownState> {
    check_root(root, path)?;
    path.segments()
        .iter()
        .enumerate()
        .try_fold(root, |node, (depth, segment)| {
            resolve_child(node, &path.prefix(depth), segment)
        })
}

/// Every node from the root down to the node named by `path`, inclusive.
///
/// The node at index `i` sits at `path.prefix(i)`.
pub fn resolve_chain<'t, E>(
    root: &'t StateNode<E>,
    path: &StatePath,
) -> Result<Vec<&'t StateNode<E>>, UnknownState> {
    check_root(root, path)?;
    let mut chain = Vec::with_capacity(path.depth() + 1);
    let mut node = root;
    chain.push(node);
    for (depth, segment) in path.segments().iter().enumerate() {
        node = resolve_child(node, &path.prefix(depth), segment)?;
        chain.push(node);
    }
    Ok(chain)
}

/// One hop: the child `name` of `node`, which lives at `node_path`.
pub fn resolve_child<'t, E>(
    node: &'t StateNode<E>,
    node_path: &StatePath,
    name: &str,
) -> Result<&'t StateNode<E>, UnknownState> {
    node.child(name).ok_or_else(|| UnknownState {
        segment: name.to_string(),
        parent: Some(node_path.clone()),
    })
}

/// Turn a target into a verified absolute path.
///
/// Relative names are looked up among the children of `anchor`;
/// segment lists are taken below the root of `anchor`.
pub fn locate<E>(
    root: &StateNode<E>,
    anchor: &StatePath,
    target: &Target,
) -> Result<StatePath, UnknownState> {
    let path = match target {
        Target::Absolute(path) => path.clone(),
        Target::Segments(segments) => {
            StatePath::from_segments(anchor.root(), segments.iter().cloned())
        }
        Target::Relative(name) => anchor.child(name.as_str()),
    };
    resolve(root, &path)?;
    Ok(path)
}

fn check_root<E>(root: &StateNode<E>, path: &StatePath) -> Result<(), UnknownState> {
    if root.id() == Some(path.root()) {
        Ok(())
    } else {
        Err(UnknownState {
            segment: path.root().to_string(),
            parent: None,
        })
    }
}
