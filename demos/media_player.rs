//! Media Player
//!
//! This example demonstrates typed events and automatic transitions.
//!
//! Key concepts:
//! - `event_enum!` events whose variants carry their own payload
//! - Internal transitions (a handler that returns `None`)
//! - Entry actions that return a target and move on by themselves
//! - Self-transitions firing exit and entry
//!
//! Run with: RUST_LOG=statetree=debug cargo run --example media_player

use statetree::builder::{compound, leaf};
use statetree::core::Target;
use statetree::engine::{Machine, MachineError, Step};
use statetree::event_enum;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

event_enum! {
    enum PlayerEvent {
        Load { track: String },
        Play,
        Pause,
        Seek { position: u64 },
        Restart,
        Eject,
    }
}

fn player(position: Arc<AtomicU64>) -> Result<Machine<PlayerEvent>, MachineError> {
    let seek_to = Arc::clone(&position);
    let rewind = Arc::clone(&position);

    Machine::from_builder(
        compound("empty")
            .id("player")
            .state(
                "empty",
                leaf().on("Load", |event| {
                    if let PlayerEvent::Load { track } = event {
                        println!("  loading {track}");
                    }
                    Some(Target::relative("loaded"))
                }),
            )
            .state(
                "loaded",
                compound("buffering")
                    .on_target("Eject", "empty")
                    .on("Seek", move |event| {
                        if let PlayerEvent::Seek { position } = event {
                            seek_to.store(*position, Ordering::SeqCst);
                        }
                        None
                    })
                    .state(
                        "buffering",
                        // Buffering finishes immediately in this demo.
                        leaf().entry(|| Some(Target::relative("paused"))),
                    )
                    .state("paused", leaf().on_target("Play", "playing"))
                    .state(
                        "playing",
                        leaf()
                            .entry(|| {
                                println!("  [entry] playback started");
                                None
                            })
                            .exit(|| println!("  [exit] playback stopped"))
                            .on_target("Pause", "paused")
                            .on("Restart", move |_| {
                                rewind.store(0, Ordering::SeqCst);
                                Some(Target::relative("playing"))
                            }),
                    ),
            ),
    )
}

fn main() -> Result<(), MachineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Media Player ===\n");

    let position = Arc::new(AtomicU64::new(0));
    let machine = player(Arc::clone(&position))?;
    let mut active = machine.initial_path()?;
    println!("Initial state: {active}\n");

    let events = vec![
        PlayerEvent::Load {
            track: "overture.flac".to_string(),
        },
        PlayerEvent::Play,
        PlayerEvent::Seek { position: 90 },
        PlayerEvent::Restart,
        PlayerEvent::Pause,
        PlayerEvent::Eject,
    ];

    for event in &events {
        let dispatch = machine.dispatch(&active, event)?;
        println!(
            "{:?}: {} -> {} (position {}s)",
            event,
            active,
            dispatch.after,
            position.load(Ordering::SeqCst)
        );
        for step in &dispatch.steps {
            match step {
                Step::Exited(path) => println!("    exited  {path}"),
                Step::Entered(path) => println!("    entered {path}"),
            }
        }
        active = dispatch.after;
    }

    println!("\nTyped events cannot carry the wrong payload: `Seek` without a");
    println!("position does not compile, so no arity check is needed at runtime.");

    println!("\n=== Example Complete ===");
    Ok(())
}
