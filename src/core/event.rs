//! Events dispatched to a machine.
//!
//! Handlers are looked up by [`Event::name`]. The event value itself is the
//! payload: a typed enum carries its fields in each variant, while
//! [`Signal`] carries an untyped argument list and reports its arity.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

/// Trait for values that can be dispatched to a machine.
///
/// # Example
///
/// ```rust
/// use statetree::core::Event;
///
/// #[derive(Debug)]
/// enum Player {
///     Play,
///     Seek { position: u64 },
/// }
///
/// impl Event for Player {
///     fn name(&self) -> &str {
///         match self {
///             Self::Play => "Play",
///             Self::Seek { .. } => "Seek",
///         }
///     }
/// }
///
/// assert_eq!(Player::Seek { position: 3 }.name(), "Seek");
/// assert_eq!(Player::Play.arity(), None);
/// ```
pub trait Event: Debug {
    /// Name used to look up a handler in a state's `on` map.
    fn name(&self) -> &str;

    /// Number of payload arguments, when the payload is a runtime list.
    ///
    /// Typed events return `None` (the default): their shape is already
    /// checked by the compiler.
    fn arity(&self) -> Option<usize> {
        None
    }
}

/// Dynamically shaped event: a name plus a list of JSON arguments.
///
/// Handlers declared with an arity (see `Handler::with_arity`) reject
/// signals carrying a different number of arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    #[serde(default)]
    pub payload: Vec<Value>,
}

impl Signal {
    /// Signal without arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.payload.push(value.into());
        self
    }

    /// Argument at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.payload.get(index)
    }
}

impl Event for Signal {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> Option<usize> {
        Some(self.payload.len())
    }
}

impl Event for &str {
    fn name(&self) -> &str {
        self
    }
}
