//! Builder for rule tree nodes.

use crate::builder::{conclude, ensure, reject, Check};
use crate::builder::error::{ConfigError, ConfigIssue};
use crate::core::{
    decode, is_valid_name, EntryAction, ExitAction, Handler, StateNode, StatePath, Target,
    Transition,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Placeholder root id used in issue locations when the root has no id.
const UNNAMED_ROOT: &str = "<root>";

/// A target given either as a value or as text still to be decoded.
enum PendingTarget {
    Ready(Target),
    Text(String),
}

enum PendingHandler<E> {
    Ready(Handler<E>),
    Text(String),
}

/// Fluent builder for a [`StateNode`] and its subtree.
///
/// Children and handlers are collected as ordered pairs, so a repeated name
/// is reported as an issue instead of silently replacing the earlier entry.
///
/// # Example
///
/// ```rust
/// use statetree::builder::NodeBuilder;
///
/// let root = NodeBuilder::<&str>::new()
///     .id("top")
///     .initial("a")
///     .state(
///         "a",
///         NodeBuilder::new()
///             .initial("aa")
///             .state("aa", NodeBuilder::new().on_target("next", "ab"))
///             .state("ab", NodeBuilder::new().on_target("back", "#top.a")),
///     )
///     .state("b", NodeBuilder::new())
///     .build()
///     .unwrap();
///
/// assert!(root.child("a").unwrap().is_compound());
/// assert_eq!(root.height(), 2);
/// ```
pub struct NodeBuilder<E> {
    id: Option<String>,
    entry: Option<EntryAction>,
    exit: Option<ExitAction>,
    on: Vec<(String, PendingHandler<E>)>,
    initial: Option<PendingTarget>,
    states: Vec<(String, NodeBuilder<E>)>,
}

impl<E> NodeBuilder<E> {
    pub fn new() -> Self {
        Self {
            id: None,
            entry: None,
            exit: None,
            on: Vec::new(),
            initial: None,
            states: Vec::new(),
        }
    }

    /// Set the node id (required on the root).
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the entry action. Returning a target starts an automatic
    /// transition once this state is entered.
    pub fn entry<F>(mut self, action: F) -> Self
    where
        F: Fn() -> Transition + Send + Sync + 'static,
    {
        self.entry = Some(Arc::new(action));
        self
    }

    /// Set the exit action.
    pub fn exit<F>(mut self, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.exit = Some(Arc::new(action));
        self
    }

    /// Handle `event` with a closure.
    pub fn on<F>(self, event: impl Into<String>, action: F) -> Self
    where
        F: Fn(&E) -> Transition + Send + Sync + 'static,
    {
        self.handler(event, Handler::new(action))
    }

    /// Handle `event` with a closure that expects `arity` payload arguments.
    pub fn on_args<F>(self, event: impl Into<String>, arity: usize, action: F) -> Self
    where
        F: Fn(&E) -> Transition + Send + Sync + 'static,
    {
        self.handler(event, Handler::with_arity(arity, action))
    }

    /// Handle `event` with a prepared [`Handler`].
    pub fn handler(mut self, event: impl Into<String>, handler: Handler<E>) -> Self {
        self.on.push((event.into(), PendingHandler::Ready(handler)));
        self
    }

    /// Transition to a fixed textual target (`"ab"`, `"#top.a"`) on `event`.
    pub fn on_target(mut self, event: impl Into<String>, target: impl Into<String>) -> Self {
        self.on
            .push((event.into(), PendingHandler::Text(target.into())));
        self
    }

    /// Set the initial child from text (`"aa"` or `"#top.a.aa"`).
    pub fn initial(mut self, target: impl Into<String>) -> Self {
        self.initial = Some(PendingTarget::Text(target.into()));
        self
    }

    /// Set the initial child from a [`Target`] value.
    pub fn initial_target(mut self, target: Target) -> Self {
        self.initial = Some(PendingTarget::Ready(target));
        self
    }

    /// Add a child state.
    pub fn state(mut self, name: impl Into<String>, child: NodeBuilder<E>) -> Self {
        self.states.push((name.into(), child));
        self
    }

    /// Build the node, checking the local shape of every node in the subtree.
    ///
    /// Checks that need the whole tree (absolute targets, the root id) run
    /// when the node is handed to [`Machine::new`](crate::engine::Machine::new).
    pub fn build(self) -> Result<StateNode<E>, ConfigError>
    where
        E: 'static,
    {
        let root = self.id.clone().unwrap_or_else(|| UNNAMED_ROOT.to_string());
        let mut checks = Vec::new();
        let node = self.assemble(&StatePath::new(root), &mut checks);
        conclude(checks)?;
        Ok(node)
    }

    fn assemble(self, location: &StatePath, checks: &mut Vec<Check>) -> StateNode<E>
    where
        E: 'static,
    {
        let here = location.to_string();

        let mut states = BTreeMap::new();
        for (name, child) in self.states {
            checks.push(ensure(is_valid_name(&name), || {
                ConfigIssue::InvalidStateName {
                    parent: here.clone(),
                    name: name.clone(),
                }
            }));
            let duplicate = states.contains_key(&name);
            checks.push(ensure(!duplicate, || ConfigIssue::DuplicateState {
                parent: here.clone(),
                name: name.clone(),
            }));

            let node = child.assemble(&location.child(name.as_str()), checks);
            if !duplicate {
                states.insert(name, node);
            }
        }

        let mut on = BTreeMap::new();
        for (event, pending) in self.on {
            let duplicate = on.contains_key(&event);
            checks.push(ensure(!duplicate, || ConfigIssue::DuplicateHandler {
                state: here.clone(),
                event: event.clone(),
            }));

            let handler = match pending {
                PendingHandler::Ready(handler) => Some(handler),
                PendingHandler::Text(text) => match decode(&text) {
                    Ok(target) => Some(Handler::to(target)),
                    Err(e) => {
                        checks.push(reject(ConfigIssue::MalformedTarget {
                            state: here.clone(),
                            target: text,
                            reason: e.to_string(),
                        }));
                        None
                    }
                },
            };
            if let (false, Some(handler)) = (duplicate, handler) {
                on.insert(event, handler);
            }
        }

        let declared = self.initial.is_some();
        let initial = match self.initial {
            None => None,
            Some(PendingTarget::Ready(target)) => Some(target),
            Some(PendingTarget::Text(text)) => match decode(&text) {
                Ok(target) => Some(target),
                Err(e) => {
                    checks.push(reject(ConfigIssue::MalformedTarget {
                        state: here.clone(),
                        target: text,
                        reason: e.to_string(),
                    }));
                    None
                }
            },
        };

        if states.is_empty() {
            if let Some(initial) = &initial {
                checks.push(reject(ConfigIssue::UnexpectedInitial {
                    state: here.clone(),
                    initial: initial.to_string(),
                }));
            }
        } else {
            checks.push(ensure(declared, || ConfigIssue::MissingInitial {
                state: here.clone(),
            }));
        }

        if let Some(Target::Relative(name)) = &initial {
            if !states.is_empty() {
                checks.push(ensure(states.contains_key(name), || {
                    ConfigIssue::InitialOutsideStates {
                        state: here.clone(),
                        initial: name.clone(),
                    }
                }));
            }
        }

        StateNode {
            id: self.id,
            entry: self.entry,
            exit: self.exit,
            on,
            initial,
            states,
        }
    }
}

impl<E> Default for NodeBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
