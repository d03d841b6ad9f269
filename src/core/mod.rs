//! Core types of the rule tree.
//!
//! This module contains the pure data side of the engine:
//! - State paths and the textual path codec
//! - Rule tree nodes and event handlers
//! - The `Event` trait for dispatched values
//! - Caller-owned transition history
//!
//! Nothing in this module runs entry or exit actions; that is the job of
//! the engine.

mod event;
mod history;
mod node;
mod path;

pub use event::{Event, Signal};
pub use history::{History, TransitionRecord};
pub use node::{EntryAction, ExitAction, Handler, HandlerAction, StateNode, Transition};
pub use path::{decode, encode, is_valid_name, PathError, StatePath, Target, DELIMITER, ROOT_MARKER};
