//! Statetree: a hierarchical state machine engine
//!
//! Statetree evaluates statechart-style rule trees. The tree is declared once,
//! validated, and never mutated afterwards. The active state is a plain
//! [`StatePath`] owned by the caller: every dispatch takes the current path
//! and an event and returns the next path, running entry and exit actions on
//! the way.
//!
//! # Core Concepts
//!
//! - **Rule tree**: immutable [`StateNode`]s assembled with [`NodeBuilder`]
//! - **Paths**: absolute identifiers (`#top.a.aa`) and relative targets (`ab`)
//! - **Dispatch**: the deepest state on the active path that handles an event
//!   decides the transition
//! - **Cascade**: entering a compound state continues into its `initial`
//!   child until a leaf is reached
//!
//! # Example
//!
//! ```rust
//! use statetree::builder::{compound, leaf};
//! use statetree::core::Target;
//! use statetree::engine::Machine;
//!
//! let machine = Machine::from_builder(
//!     compound::<&str>("a")
//!         .id("top")
//!         .state(
//!             "a",
//!             compound("aa")
//!                 .state("aa", leaf().on("next", |_| Some(Target::relative("ab"))))
//!                 .state("ab", leaf().on_target("back", "#top.a")),
//!         )
//!         .state("b", leaf()),
//! )
//! .unwrap();
//!
//! let path = machine.initial_path().unwrap();
//! assert_eq!(path.to_string(), "#top.a.aa");
//!
//! let path = machine.emit(&path, &"next").unwrap();
//! assert_eq!(path.to_string(), "#top.a.ab");
//!
//! let path = machine.emit(&path, &"back").unwrap();
//! assert_eq!(path.to_string(), "#top.a.aa");
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{compound, leaf, ConfigError, NodeBuilder};
pub use core::{Event, History, Signal, StateNode, StatePath, Target, Transition, TransitionRecord};
pub use engine::{Dispatch, Machine, MachineConfig, MachineError, Outcome};
