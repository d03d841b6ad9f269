//! Builder API for rule trees.
//!
//! Rule trees are assembled with [`NodeBuilder`] and validated as they are
//! built. Every problem is collected into a single [`ConfigError`] rather
//! than failing at the first one.

mod checks;
pub mod error;
pub mod macros;
pub mod node;

pub(crate) use checks::{conclude, ensure, reject, Check};
pub use error::{ConfigError, ConfigIssue};
pub use node::NodeBuilder;

/// Start a leaf state.
///
/// # Example
///
/// ```
/// use statetree::builder::leaf;
///
/// let node = leaf::<&str>().id("idle").build().unwrap();
/// assert!(node.is_leaf());
/// ```
pub fn leaf<E>() -> NodeBuilder<E> {
    NodeBuilder::new()
}

/// Start a compound state entering `initial` by default.
///
/// # Example
///
/// ```
/// use statetree::builder::{compound, leaf};
///
/// let node = compound::<&str>("idle")
///     .id("player")
///     .state("idle", leaf())
///     .state("playing", leaf())
///     .build()
///     .unwrap();
/// assert!(node.is_compound());
/// ```
pub fn compound<E>(initial: impl Into<String>) -> NodeBuilder<E> {
    NodeBuilder::new().initial(initial)
}
