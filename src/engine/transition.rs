//! The exit / enter / cascade protocol.
//!
//! A [`Transit`] realises transition requests for one dispatch. The active
//! path is threaded through the protocol loop as a value; the tree is only
//! read.

use crate::core::{StateNode, StatePath};
use crate::engine::error::MachineError;
use crate::engine::resolver::{locate, resolve_chain};
use serde::Serialize;
use tracing::{trace, warn};

/// One side effect performed during a dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Step {
    /// The state at this path was exited
    Exited(StatePath),
    /// The state at this path was entered
    Entered(StatePath),
}

/// Runs transitions against a tree within a step budget.
pub(crate) struct Transit<'t, E> {
    root: &'t StateNode<E>,
    limit: usize,
    taken: usize,
    steps: Vec<Step>,
}

impl<'t, E> Transit<'t, E> {
    pub(crate) fn new(root: &'t StateNode<E>, limit: usize) -> Self {
        Self {
            root,
            limit,
            taken: 0,
            steps: Vec::new(),
        }
    }

    pub(crate) fn into_steps(self) -> Vec<Step> {
        self.steps
    }

    /// Enter the root at `root_path` and cascade down to a leaf.
    pub(crate) fn start(&mut self, root_path: StatePath) -> Result<StatePath, MachineError> {
        self.drive(None, root_path)
    }

    /// Move from `active` to the already located `target`.
    pub(crate) fn run(
        &mut self,
        active: StatePath,
        target: StatePath,
    ) -> Result<StatePath, MachineError> {
        self.drive(Some(active), target)
    }

    fn drive(
        &mut self,
        mut active: Option<StatePath>,
        mut target: StatePath,
    ) -> Result<StatePath, MachineError> {
        loop {
            self.tick(&target)?;

            // Resolve both ends before any action runs.
            let target_chain = resolve_chain(self.root, &target)?;
            let active_chain = match &active {
                Some(path) => resolve_chain(self.root, path)?,
                None => Vec::new(),
            };

            let Span { exit_from, enter_from } = active
                .as_ref()
                .map_or(Span::enter_all(), |path| Span::between(path, &target));

            if let Some(path) = &active {
                for depth in (exit_from..active_chain.len()).rev() {
                    let exited = path.prefix(depth);
                    trace!(state = %exited, "exit");
                    active_chain[depth].run_exit();
                    self.steps.push(Step::Exited(exited));
                }
            }

            let mut automatic = None;
            for (depth, node) in target_chain.iter().enumerate().skip(enter_from) {
                let entered = target.prefix(depth);
                trace!(state = %entered, "entry");
                let request = node.run_entry();
                self.steps.push(Step::Entered(entered.clone()));
                if let Some(request) = request {
                    automatic = Some((entered, request));
                    break;
                }
            }

            let (from, next) = match automatic {
                Some((entered, request)) => {
                    let anchor = entered.parent().unwrap_or_else(|| entered.clone());
                    let next = locate(self.root, &anchor, &request).inspect_err(|e| {
                        warn!(state = %entered, requested = %request, error = %e, "automatic transition target does not resolve");
                    })?;
                    trace!(from = %entered, to = %next, "automatic transition");
                    (entered, next)
                }
                None => {
                    let Some(initial) = target_chain.last().and_then(|node| node.initial()) else {
                        return Ok(target);
                    };
                    let next = locate(self.root, &target, initial)?;
                    trace!(from = %target, to = %next, "cascade");
                    (target, next)
                }
            };

            active = Some(from);
            target = next;
        }
    }

    fn tick(&mut self, target: &StatePath) -> Result<(), MachineError> {
        self.taken += 1;
        if self.taken > self.limit {
            warn!(limit = self.limit, state = %target, "transition loop detected");
            return Err(MachineError::TransitionLoop {
                limit: self.limit,
                path: target.clone(),
            });
        }
        Ok(())
    }
}

/// Depths at which exiting and entering start for one transition.
///
/// Nodes of the active path at `exit_from` and below are exited; nodes of
/// the target path at `enter_from` and below are entered.
#[derive(Debug, PartialEq, Eq)]
struct Span {
    exit_from: usize,
    enter_from: usize,
}

impl Span {
    /// Nothing is active yet: enter from the root.
    fn enter_all() -> Self {
        Self {
            exit_from: 0,
            enter_from: 0,
        }
    }

    /// Everything below the lowest common node is exited.
    ///
    /// A target that is the active node itself is exited and entered again.
    /// A target above the active node is kept: only the nodes below it are
    /// exited, then the target is entered and cascades again.
    fn between(active: &StatePath, target: &StatePath) -> Self {
        let common = active.common_depth(target);
        let depth = target.depth();
        if active == target {
            Self {
                exit_from: depth,
                enter_from: depth,
            }
        } else if common == depth && active.root() == target.root() {
            Self {
                exit_from: depth + 1,
                enter_from: depth,
            }
        } else {
            Self {
                exit_from: common + 1,
                enter_from: common + 1,
            }
        }
    }
}
