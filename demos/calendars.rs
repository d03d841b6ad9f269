//! Calendars Machine
//!
//! This example drives a calendar screen through fetching, failure and
//! editing states.
//!
//! Key concepts:
//! - Compound states with `initial` children
//! - Relative targets (`"FAILURE"`) and absolute ones (`"#Calendars.DISPLAY"`)
//! - Handlers on a compound state apply to every child (`cancel`)
//! - A caller-owned path and history
//!
//! Run with: RUST_LOG=statetree=trace cargo run --example calendars

use statetree::builder::{compound, leaf, NodeBuilder};
use statetree::core::History;
use statetree::engine::{Machine, MachineError, Outcome};
use tracing_subscriber::EnvFilter;

fn fetching(first: &str, on_success: &str) -> NodeBuilder<&'static str> {
    let label = first.to_string();
    compound("LOADING")
        .on_target("cancel", "IDLE")
        .state(
            "LOADING",
            leaf()
                .entry(move || {
                    println!("  [entry] fetching {label}");
                    None
                })
                .on_target("success", on_success)
                .on_target("failure", "FAILURE"),
        )
        .state(
            "FAILURE",
            leaf()
                .entry(|| {
                    println!("  [entry] error while fetching");
                    None
                })
                .on_target("retry", "LOADING"),
        )
}

fn calendars() -> Result<Machine<&'static str>, MachineError> {
    Machine::from_builder(
        compound("IDLE")
            .id("Calendars")
            .state("IDLE", leaf().on_target("fetchData", "FETCHING_CALENDARS"))
            .state(
                "FETCHING_CALENDARS",
                fetching("calendars", "#Calendars.FETCHING_EVENTS"),
            )
            .state("FETCHING_EVENTS", fetching("events", "#Calendars.DISPLAY"))
            .state(
                "DISPLAY",
                compound("IDLE")
                    .on_target("refresh", "FETCHING_CALENDARS")
                    .state("IDLE", leaf().on_target("edit", "EDITING"))
                    .state(
                        "EDITING",
                        leaf()
                            .exit(|| println!("  [exit] leaving the editor"))
                            .on_target("cancel", "IDLE"),
                    ),
            ),
    )
}

fn main() -> Result<(), MachineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Calendars Machine ===\n");

    let machine = calendars()?;
    let mut active = machine.initial_path()?;
    let mut history = History::new();
    println!("Initial state: {active}\n");

    let script = [
        "fetchData", "failure", "retry", "success", "success", "edit", "cancel", "refresh",
        "cancel", "unknown",
    ];

    for event in script {
        let dispatch = machine.dispatch(&active, &event)?;
        let note = match &dispatch.outcome {
            Outcome::Ignored => " (ignored)".to_string(),
            Outcome::Internal { .. } => " (internal)".to_string(),
            Outcome::Transitioned { handled_by } if handled_by != &active => {
                format!(" (handled by {handled_by})")
            }
            _ => String::new(),
        };
        println!("{event:>10}: {active} -> {}{note}", dispatch.after);

        if let Some(record) = dispatch.record() {
            history = history.record(record);
        }
        active = dispatch.after;
    }

    println!("\nVisited {} states:", history.get_path().len());
    for path in history.get_path() {
        println!("  {path}");
    }

    println!("\nA path that does not exist is reported precisely:");
    match machine.emit_str("#Calendars.DISPLAY.VIEWING", &"edit") {
        Ok(path) => println!("  unexpected success: {path}"),
        Err(error) => println!("  {error}"),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
