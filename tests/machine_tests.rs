//! End-to-end dispatch tests against small rule trees.

use statetree::builder::{compound, leaf, ConfigIssue, NodeBuilder};
use statetree::core::{History, Signal, StatePath, Target};
use statetree::engine::{Machine, MachineConfig, MachineError, Outcome, Step};
use statetree::event_enum;
use std::sync::{Arc, Mutex};
use std::thread;

type Log = Arc<Mutex<Vec<String>>>;

fn path(identifier: &str) -> StatePath {
    identifier.parse().unwrap()
}

fn taken(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.lock().unwrap())
}

/// Attach logging entry and exit actions to `builder`.
fn traced<E>(log: &Log, name: &'static str, builder: NodeBuilder<E>) -> NodeBuilder<E> {
    let on_entry = Arc::clone(log);
    let on_exit = Arc::clone(log);
    builder
        .entry(move || {
            on_entry.lock().unwrap().push(format!("{name}.entry"));
            None
        })
        .exit(move || on_exit.lock().unwrap().push(format!("{name}.exit")))
}

/// `top` with compound `a` (`aa`, `ab`) and leaf `b`.
fn top_machine(log: &Log) -> Machine<&'static str> {
    let handler_log = Arc::clone(log);
    Machine::from_builder(traced(
        log,
        "top",
        compound("a")
            .id("top")
            .state(
                "a",
                traced(
                    log,
                    "a",
                    compound("aa")
                        .on("poke", move |_| {
                            handler_log.lock().unwrap().push("a.poke".to_string());
                            None
                        })
                        .state(
                            "aa",
                            traced(log, "aa", leaf())
                                .on_target("next", "ab")
                                .on_target("toB", "#top.b")
                                .on("again", |_| Some(Target::parse("#top.a.aa").unwrap())),
                        )
                        .state(
                            "ab",
                            traced(log, "ab", leaf())
                                .on_target("back", "#top.a")
                                .on("lost", |_| Some(Target::relative("zz"))),
                        ),
                ),
            )
            .state("b", traced(log, "b", leaf()).on_target("toA", "a")),
    ))
    .unwrap()
}

#[test]
fn initial_path_cascades_to_first_leaf() {
    let log = Log::default();
    let machine = top_machine(&log);

    assert_eq!(machine.initial_path().unwrap(), path("#top.a.aa"));
    assert_eq!(taken(&log), ["top.entry", "a.entry", "aa.entry"]);
}

#[test]
fn sibling_transition_fires_exit_then_entry() {
    let log = Log::default();
    let machine = top_machine(&log);

    let next = machine.emit(&path("#top.a.aa"), &"next").unwrap();

    assert_eq!(next, path("#top.a.ab"));
    assert_eq!(taken(&log), ["aa.exit", "ab.entry"]);
}

#[test]
fn absolute_target_to_parent_enters_and_cascades() {
    let log = Log::default();
    let machine = top_machine(&log);

    let back = machine.emit(&path("#top.a.ab"), &"back").unwrap();

    assert_eq!(back, path("#top.a.aa"));
    assert_eq!(taken(&log), ["ab.exit", "a.entry", "aa.entry"]);
}

#[test]
fn cross_branch_transition_exits_up_to_common_ancestor() {
    let log = Log::default();
    let machine = top_machine(&log);

    let to_b = machine.emit(&path("#top.a.aa"), &"toB").unwrap();
    assert_eq!(to_b, path("#top.b"));
    assert_eq!(taken(&log), ["aa.exit", "a.exit", "b.entry"]);

    let to_a = machine.emit(&to_b, &"toA").unwrap();
    assert_eq!(to_a, path("#top.a.aa"));
    assert_eq!(taken(&log), ["b.exit", "a.entry", "aa.entry"]);
}

#[test]
fn self_transition_exits_and_enters_once() {
    let log = Log::default();
    let machine = top_machine(&log);

    let dispatch = machine.dispatch(&path("#top.a.aa"), &"again").unwrap();

    assert_eq!(dispatch.after, path("#top.a.aa"));
    assert!(!dispatch.changed());
    assert_eq!(taken(&log), ["aa.exit", "aa.entry"]);
    assert_eq!(
        dispatch.steps,
        [
            Step::Exited(path("#top.a.aa")),
            Step::Entered(path("#top.a.aa")),
        ]
    );
}

#[test]
fn internal_transition_runs_handler_only() {
    let log = Log::default();
    let machine = top_machine(&log);

    let dispatch = machine.dispatch(&path("#top.a.ab"), &"poke").unwrap();

    assert_eq!(dispatch.after, path("#top.a.ab"));
    assert_eq!(
        dispatch.outcome,
        Outcome::Internal {
            handled_by: path("#top.a")
        }
    );
    assert_eq!(taken(&log), ["a.poke"]);
}

#[test]
fn unhandled_event_is_not_an_error() {
    let log = Log::default();
    let machine = top_machine(&log);

    let same = machine.emit(&path("#top.b"), &"next").unwrap();

    assert_eq!(same, path("#top.b"));
    assert!(taken(&log).is_empty());
}

#[test]
fn unknown_active_segment_is_reported() {
    let log = Log::default();
    let machine = top_machine(&log);

    let error = machine.emit(&path("#top.a.zz"), &"next").unwrap_err();

    let unknown = error.unknown_state().unwrap();
    assert_eq!(unknown.segment, "zz");
    assert_eq!(unknown.parent, Some(path("#top.a")));
    assert_eq!(error.to_string(), "State 'zz' does not exist in #top.a");
}

#[test]
fn unknown_handler_target_fires_nothing() {
    let log = Log::default();
    let machine = top_machine(&log);

    let error = machine.emit(&path("#top.a.ab"), &"lost").unwrap_err();

    assert!(matches!(
        &error,
        MachineError::UnknownEventTarget { event, target, .. } if event == "lost" && target == "zz"
    ));
    assert_eq!(error.unknown_state().unwrap().parent, Some(path("#top.a")));
    assert!(taken(&log).is_empty());
}

#[test]
fn descendant_handler_shadows_ancestor() {
    let fired = Log::default();
    let root_log = Arc::clone(&fired);
    let leaf_log = Arc::clone(&fired);
    let machine = Machine::from_builder(
        compound::<&'static str>("a")
            .id("top")
            .on("ping", move |_| {
                root_log.lock().unwrap().push("top".to_string());
                None
            })
            .state(
                "a",
                leaf().on("ping", move |_| {
                    leaf_log.lock().unwrap().push("a".to_string());
                    None
                }),
            ),
    )
    .unwrap();

    machine.emit(&path("#top.a"), &"ping").unwrap();
    assert_eq!(taken(&fired), ["a"]);

    machine.emit(&path("#top"), &"ping").unwrap();
    assert_eq!(taken(&fired), ["top"]);
}

#[test]
fn entry_loop_fails_with_transition_loop() {
    let machine = Machine::with_config(
        compound::<&'static str>("ping")
            .id("loop")
            .state("ping", leaf().entry(|| Some(Target::relative("pong"))))
            .state("pong", leaf().entry(|| Some(Target::relative("ping"))))
            .build()
            .unwrap(),
        MachineConfig::new().with_step_slack(3),
    )
    .unwrap();

    let error = machine.initial_path().unwrap_err();
    assert!(matches!(error, MachineError::TransitionLoop { limit: 5, .. }));
}

#[test]
fn entry_result_starts_automatic_transition() {
    let log = Log::default();
    let checked = Arc::clone(&log);
    let checking = leaf()
        .entry(move || {
            checked.lock().unwrap().push("checking.entry".to_string());
            Some(Target::relative("done"))
        })
        .exit({
            let log = Arc::clone(&log);
            move || log.lock().unwrap().push("checking.exit".to_string())
        });
    let machine = Machine::from_builder(
        compound::<&'static str>("idle")
            .id("job")
            .state("idle", leaf().on_target("submit", "checking"))
            .state("checking", checking)
            .state("done", traced(&log, "done", leaf())),
    )
    .unwrap();

    let done = machine.emit(&path("#job.idle"), &"submit").unwrap();

    assert_eq!(done, path("#job.done"));
    assert_eq!(
        taken(&log),
        ["checking.entry", "checking.exit", "done.entry"]
    );
}

#[test]
fn construction_reports_every_issue() {
    let result = Machine::from_builder(
        NodeBuilder::<&'static str>::new()
            .id("top")
            .state("a", leaf().initial("x"))
            .state("a", leaf()),
    );

    let Err(MachineError::InvalidConfig(error)) = result else {
        panic!("expected an invalid configuration");
    };
    assert!(error.contains(&ConfigIssue::MissingInitial {
        state: "#top".to_string()
    }));
    assert!(error.contains(&ConfigIssue::DuplicateState {
        parent: "#top".to_string(),
        name: "a".to_string(),
    }));
    assert!(error
        .issues()
        .iter()
        .any(|issue| matches!(issue, ConfigIssue::UnexpectedInitial { .. })));
}

#[test]
fn unresolved_static_target_rejected_at_construction() {
    let result = Machine::from_builder(
        compound::<&'static str>("a")
            .id("top")
            .state("a", leaf().on_target("go", "#top.nowhere")),
    );

    let Err(MachineError::InvalidConfig(error)) = result else {
        panic!("expected an invalid configuration");
    };
    assert!(matches!(
        error.issues(),
        [ConfigIssue::UnresolvedTarget { event, .. }] if event == "go"
    ));
}

event_enum! {
    enum Command {
        Submit { amount: u32 },
        Cancel,
    }
}

#[test]
fn typed_events_carry_payload() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let machine = Machine::from_builder(
        compound::<Command>("open")
            .id("order")
            .state(
                "open",
                leaf().on("Submit", move |event| {
                    if let Command::Submit { amount } = event {
                        recorder.lock().unwrap().push(*amount);
                    }
                    Some(Target::relative("submitted"))
                }),
            )
            .state("submitted", leaf().on_target("Cancel", "open")),
    )
    .unwrap();

    let submitted = machine
        .emit(&path("#order.open"), &Command::Submit { amount: 42 })
        .unwrap();
    assert_eq!(submitted, path("#order.submitted"));
    assert_eq!(*seen.lock().unwrap(), [42]);

    let reopened = machine.emit(&submitted, &Command::Cancel).unwrap();
    assert_eq!(reopened, path("#order.open"));
}

#[test]
fn signal_arity_mismatch_is_rejected() {
    let machine = Machine::from_builder(
        compound::<Signal>("idle")
            .id("m")
            .state("idle", leaf().on_args("rename", 1, |_| Some(Target::relative("named"))))
            .state("named", leaf()),
    )
    .unwrap();
    let idle = path("#m.idle");

    let error = machine
        .emit(&idle, &Signal::new("rename").arg("a").arg("b"))
        .unwrap_err();
    assert_eq!(
        error,
        MachineError::PayloadArity {
            event: "rename".to_string(),
            expected: 1,
            actual: 2,
        }
    );

    let named = machine.emit(&idle, &Signal::new("rename").arg("a")).unwrap();
    assert_eq!(named, path("#m.named"));
}

#[test]
fn dispatch_records_build_history() {
    let log = Log::default();
    let machine = top_machine(&log);
    let mut active = machine.initial_path().unwrap();
    let mut history = History::new();

    for event in ["next", "poke", "back", "toB"] {
        let dispatch = machine.dispatch(&active, &event).unwrap();
        if let Some(record) = dispatch.record() {
            history = history.record(record);
        }
        active = dispatch.after;
    }

    let visited: Vec<String> = history.get_path().iter().map(ToString::to_string).collect();
    assert_eq!(
        visited,
        ["#top.a.aa", "#top.a.ab", "#top.a.aa", "#top.b"]
    );
    assert_eq!(history.transitions().len(), 3);
}

#[test]
fn machine_is_shared_across_threads() {
    let log = Log::default();
    let machine = top_machine(&log);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let machine = machine.clone();
            thread::spawn(move || {
                let start = machine.initial_path().unwrap();
                machine.emit(&start, &"next").unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), path("#top.a.ab"));
    }
}
