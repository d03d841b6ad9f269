//! Machine: a validated rule tree plus the dispatch contract.
//!
//! A [`Machine`] never stores the active path. Callers keep the path
//! returned by [`Machine::start`] or [`Machine::emit`] and hand it back on
//! the next call.
//!
//! Entry, exit and handler actions run synchronously inside `emit`. An
//! action that calls `emit` on the same machine is allowed (the engine keeps
//! no state between calls), but the nested dispatch completes before the
//! outer one and the caller has to decide which resulting path wins.

use crate::builder::NodeBuilder;
use crate::core::{Event, StateNode, StatePath, TransitionRecord};
use crate::engine::config::MachineConfig;
use crate::engine::error::MachineError;
use crate::engine::resolver::{locate, resolve, resolve_chain};
use crate::engine::transition::{Step, Transit};
use crate::engine::validate::validate;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// How a dispatch ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The root was entered and cascaded (no event involved)
    Started,
    /// No state on the active path handles the event
    Ignored,
    /// The handler ran and requested no transition
    Internal { handled_by: StatePath },
    /// The handler's target was entered and the machine settled on a leaf
    Transitioned { handled_by: StatePath },
}

/// Full trace of one dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    /// Name of the dispatched event, `None` for [`Machine::start`]
    pub event: Option<String>,
    /// Active path handed in, `None` for [`Machine::start`]
    pub before: Option<StatePath>,
    /// Active path after the dispatch
    pub after: StatePath,
    pub outcome: Outcome,
    /// Exits and entries in the order they ran
    pub steps: Vec<Step>,
}

impl Dispatch {
    fn unchanged(event: &str, active: &StatePath, outcome: Outcome) -> Self {
        Self {
            event: Some(event.to_string()),
            before: Some(active.clone()),
            after: active.clone(),
            outcome,
            steps: Vec::new(),
        }
    }

    /// True when the active path differs from the one handed in.
    pub fn changed(&self) -> bool {
        self.before.as_ref() != Some(&self.after)
    }

    /// History record for a dispatch that transitioned.
    pub fn record(&self) -> Option<TransitionRecord> {
        let Outcome::Transitioned { .. } = self.outcome else {
            return None;
        };
        Some(TransitionRecord {
            event: self.event.clone()?,
            from: self.before.clone()?,
            to: self.after.clone(),
            timestamp: Utc::now(),
            steps: self.steps.len(),
        })
    }
}

/// A validated, immutable rule tree ready to dispatch events of type `E`.
///
/// Cloning is cheap: clones share the tree through an `Arc` and can be sent
/// to other threads.
///
/// # Example
///
/// ```rust
/// use statetree::builder::{compound, leaf};
/// use statetree::engine::Machine;
///
/// let machine = Machine::from_builder(
///     compound::<&str>("a")
///         .id("top")
///         .state("a", compound("aa").state("aa", leaf().on_target("next", "ab")).state("ab", leaf()))
///         .state("b", leaf()),
/// )
/// .unwrap();
///
/// let path = machine.initial_path().unwrap();
/// assert_eq!(path.to_string(), "#top.a.aa");
///
/// let path = machine.emit(&path, &"next").unwrap();
/// assert_eq!(path.to_string(), "#top.a.ab");
/// ```
pub struct Machine<E> {
    root: Arc<StateNode<E>>,
    root_path: StatePath,
    config: MachineConfig,
    limit: usize,
}

impl<E> Clone for Machine<E> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            root_path: self.root_path.clone(),
            config: self.config.clone(),
            limit: self.limit,
        }
    }
}

impl<E> Machine<E> {
    /// Validate `root` and build a machine with the default configuration.
    pub fn new(root: StateNode<E>) -> Result<Self, MachineError> {
        Self::with_config(root, MachineConfig::default())
    }

    pub fn with_config(root: StateNode<E>, config: MachineConfig) -> Result<Self, MachineError> {
        let root_path = validate(&root)?;
        let limit = config.step_limit(root.height());
        debug!(machine = %root_path, limit, "machine constructed");
        Ok(Self {
            root: Arc::new(root),
            root_path,
            config,
            limit,
        })
    }

    /// Build the tree and the machine in one go.
    pub fn from_builder(builder: NodeBuilder<E>) -> Result<Self, MachineError>
    where
        E: 'static,
    {
        Self::new(builder.build()?)
    }

    /// Id of the root state (pure)
    pub fn id(&self) -> &str {
        self.root_path.root()
    }

    /// Root of the rule tree (pure)
    pub fn root(&self) -> &StateNode<E> {
        &self.root
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Steps a single dispatch may take before it counts as a loop.
    pub fn step_limit(&self) -> usize {
        self.limit
    }

    /// Read-only view of the node at `path` (pure)
    pub fn peek(&self, path: &StatePath) -> Result<&StateNode<E>, MachineError> {
        Ok(resolve(&self.root, path)?)
    }

    /// Enter the root and cascade to the initial leaf, firing entry actions.
    pub fn start(&self) -> Result<Dispatch, MachineError> {
        let mut transit = Transit::new(&self.root, self.limit);
        let after = transit.start(self.root_path.clone())?;
        debug!(machine = %self.root_path, state = %after, "machine started");
        Ok(Dispatch {
            event: None,
            before: None,
            after,
            outcome: Outcome::Started,
            steps: transit.into_steps(),
        })
    }

    /// Path the machine settles on after [`Machine::start`].
    pub fn initial_path(&self) -> Result<StatePath, MachineError> {
        self.start().map(|dispatch| dispatch.after)
    }
}

impl<E: Event> Machine<E> {
    /// Dispatch `event` at `active` and return the full trace.
    ///
    /// The deepest state on `active` that handles the event wins. An
    /// unhandled event or an internal transition leaves the path unchanged.
    /// The handler's target is located before any exit runs, so a target
    /// that does not resolve fails with the active state left untouched.
    /// Actions that already ran before a later failure (an automatic
    /// transition to an unknown state) are not undone.
    pub fn dispatch(&self, active: &StatePath, event: &E) -> Result<Dispatch, MachineError> {
        let name = event.name();
        let chain = resolve_chain(&self.root, active)?;

        let latched = chain
            .iter()
            .enumerate()
            .filter_map(|(depth, node)| node.handler(name).map(|handler| (depth, handler)))
            .last();
        let Some((depth, handler)) = latched else {
            debug!(event = name, state = %active, "event ignored");
            return Ok(Dispatch::unchanged(name, active, Outcome::Ignored));
        };
        let owner = active.prefix(depth);

        if let (Some(expected), Some(actual)) = (handler.arity(), event.arity()) {
            if expected != actual {
                warn!(event = name, expected, actual, "payload arity mismatch");
                return Err(MachineError::PayloadArity {
                    event: name.to_string(),
                    expected,
                    actual,
                });
            }
        }

        let Some(request) = handler.call(event) else {
            debug!(event = name, state = %owner, "internal transition");
            return Ok(Dispatch::unchanged(
                name,
                active,
                Outcome::Internal { handled_by: owner },
            ));
        };

        let anchor = owner.parent().unwrap_or_else(|| owner.clone());
        let target = locate(&self.root, &anchor, &request).map_err(|source| {
            warn!(event = name, requested = %request, error = %source, "handler target does not resolve");
            MachineError::UnknownEventTarget {
                event: name.to_string(),
                target: request.to_string(),
                source,
            }
        })?;

        let mut transit = Transit::new(&self.root, self.limit);
        let after = transit.run(active.clone(), target)?;
        debug!(event = name, from = %active, to = %after, "transitioned");

        Ok(Dispatch {
            event: Some(name.to_string()),
            before: Some(active.clone()),
            after,
            outcome: Outcome::Transitioned { handled_by: owner },
            steps: transit.into_steps(),
        })
    }

    /// Dispatch `event` at `active` and return the new active path.
    pub fn emit(&self, active: &StatePath, event: &E) -> Result<StatePath, MachineError> {
        self.dispatch(active, event).map(|dispatch| dispatch.after)
    }

    /// [`Machine::emit`] for a textual absolute identifier such as
    /// `"#top.a.aa"`.
    pub fn emit_str(&self, active: &str, event: &E) -> Result<StatePath, MachineError> {
        let active: StatePath = active.parse()?;
        self.emit(&active, event)
    }
}
