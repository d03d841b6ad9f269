//! Runtime side of the library.
//!
//! This module provides:
//! - Path resolution against a built rule tree
//! - The exit / entry / cascade transition protocol
//! - [`Machine`], which validates a tree and dispatches events
//!
//! The engine keeps no mutable state. Every call takes the caller's active
//! path and returns a new one.

pub mod config;
pub mod error;
pub mod machine;
pub mod resolver;
pub mod transition;
mod validate;

pub use config::{MachineConfig, DEFAULT_STEP_SLACK};
pub use error::{MachineError, UnknownState};
pub use machine::{Dispatch, Machine, Outcome};
pub use resolver::{locate, resolve, resolve_chain, resolve_child};
pub use transition::Step;
