//! Rule tree nodes.
//!
//! A [`StateNode`] is immutable once built: fields are crate-private and only
//! exposed through read-only accessors. Nodes are created exclusively by
//! [`NodeBuilder`](crate::builder::NodeBuilder), which validates the shape of
//! the tree before handing it out.

use super::path::Target;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// What a handler or an entry action asks for.
///
/// `Some(target)` transitions (a target equal to the current state is a
/// self-transition and fires exit and entry). `None` is an internal
/// transition: nothing is exited or entered.
pub type Transition = Option<Target>;

/// Action run when a state is entered. A returned target starts an
/// automatic transition.
pub type EntryAction = Arc<dyn Fn() -> Transition + Send + Sync>;

/// Action run when a state is exited. Exits cannot request transitions.
pub type ExitAction = Arc<dyn Fn() + Send + Sync>;

/// Handler body, called with the dispatched event.
pub type HandlerAction<E> = Arc<dyn Fn(&E) -> Transition + Send + Sync>;

/// Event handler registered in a state's `on` map.
pub struct Handler<E> {
    action: HandlerAction<E>,
    arity: Option<usize>,
    fixed: Option<Target>,
}

impl<E> Handler<E> {
    /// Handler computing its transition from the event.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&E) -> Transition + Send + Sync + 'static,
    {
        Self {
            action: Arc::new(action),
            arity: None,
            fixed: None,
        }
    }

    /// Handler that requires events carrying exactly `arity` arguments.
    pub fn with_arity<F>(arity: usize, action: F) -> Self
    where
        F: Fn(&E) -> Transition + Send + Sync + 'static,
    {
        Self {
            arity: Some(arity),
            ..Self::new(action)
        }
    }

    /// Handler that always transitions to `target`.
    ///
    /// Fixed targets are known up front and checked when the machine is
    /// constructed.
    pub fn to(target: Target) -> Self
    where
        E: 'static,
    {
        let returned = target.clone();
        Self {
            action: Arc::new(move |_: &E| Some(returned.clone())),
            arity: None,
            fixed: Some(target),
        }
    }

    /// Expected payload arity, if declared.
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Target of a handler built with [`Handler::to`].
    pub fn fixed_target(&self) -> Option<&Target> {
        self.fixed.as_ref()
    }

    /// Run the handler body.
    pub fn call(&self, event: &E) -> Transition {
        (self.action)(event)
    }
}

impl<E> Clone for Handler<E> {
    fn clone(&self) -> Self {
        Self {
            action: Arc::clone(&self.action),
            arity: self.arity,
            fixed: self.fixed.clone(),
        }
    }
}

impl<E> fmt::Debug for Handler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("arity", &self.arity)
            .field("fixed", &self.fixed)
            .finish_non_exhaustive()
    }
}

/// One state of the rule tree, leaf or compound.
pub struct StateNode<E> {
    pub(crate) id: Option<String>,
    pub(crate) entry: Option<EntryAction>,
    pub(crate) exit: Option<ExitAction>,
    pub(crate) on: BTreeMap<String, Handler<E>>,
    pub(crate) initial: Option<Target>,
    pub(crate) states: BTreeMap<String, StateNode<E>>,
}

impl<E> StateNode<E> {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_entry(&self) -> bool {
        self.entry.is_some()
    }

    pub fn has_exit(&self) -> bool {
        self.exit.is_some()
    }

    /// Handler declared for `event`, if any.
    pub fn handler(&self, event: &str) -> Option<&Handler<E>> {
        self.on.get(event)
    }

    /// Names of the events this state handles, sorted.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.on.keys().map(String::as_str)
    }

    pub fn initial(&self) -> Option<&Target> {
        self.initial.as_ref()
    }

    pub fn child(&self, name: &str) -> Option<&StateNode<E>> {
        self.states.get(name)
    }

    /// Child states keyed by name, sorted.
    pub fn children(&self) -> impl Iterator<Item = (&str, &StateNode<E>)> {
        self.states.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn is_leaf(&self) -> bool {
        self.states.is_empty()
    }

    pub fn is_compound(&self) -> bool {
        !self.states.is_empty()
    }

    /// Length of the longest path from this node down to a leaf.
    pub fn height(&self) -> usize {
        self.states
            .values()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Run the entry action, if any.
    pub(crate) fn run_entry(&self) -> Transition {
        self.entry.as_ref().and_then(|entry| entry())
    }

    /// Run the exit action, if any.
    pub(crate) fn run_exit(&self) {
        if let Some(exit) = &self.exit {
            exit();
        }
    }
}

impl<E> fmt::Debug for StateNode<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("id", &self.id)
            .field("entry", &self.entry.is_some())
            .field("exit", &self.exit.is_some())
            .field("on", &self.on.keys().collect::<Vec<_>>())
            .field("initial", &self.initial)
            .field("states", &self.states)
            .finish()
    }
}
