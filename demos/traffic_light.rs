//! Traffic Light State Machine
//!
//! This example demonstrates a simple cyclic state machine.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - Rejected events as ordinary outcomes
//! - A bounded transition log
//!
//! Run with: cargo run --example traffic_light

use lockstep::builder::StateMachineBuilder;
use lockstep::machine::Outcome;
use lockstep::state_enum;
use std::num::NonZeroUsize;

state_enum! {
    enum TrafficLight {
        Red,
        Yellow,
        Green,
    }
}

state_enum! {
    enum Signal {
        Timer,
        Emergency,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let light = StateMachineBuilder::new()
        .initial(TrafficLight::Red)
        .transition(TrafficLight::Red, Signal::Timer, TrafficLight::Green)
        .transition(TrafficLight::Green, Signal::Timer, TrafficLight::Yellow)
        .transition(TrafficLight::Yellow, Signal::Timer, TrafficLight::Red)
        .transition(TrafficLight::Green, Signal::Emergency, TrafficLight::Red)
        .transition(TrafficLight::Yellow, Signal::Emergency, TrafficLight::Red)
        .log_capacity(NonZeroUsize::new(3).expect("non-zero"))
        .label("crossing")
        .build()
        .expect("table is deterministic");

    println!("Initial state: {}\n", light.state().await);

    let script = [
        Signal::Timer,
        Signal::Timer,
        Signal::Emergency,
        Signal::Emergency,
        Signal::Timer,
        Signal::Timer,
    ];

    for signal in script {
        match light.process(signal).await {
            Outcome::Committed(transition) => {
                println!("  {signal:<9} -> {}", transition.to());
            }
            Outcome::Rejected(rejection) => {
                println!("  {signal:<9} -> ignored while {}", rejection.state);
            }
        }
    }

    let snapshot = light.snapshot().await;
    println!("\nProcessed {} events", snapshot.processed_events);
    println!("  state changes: {}", snapshot.state_changes);
    println!("  rejected:      {}", snapshot.rejected_events());

    println!("\nLast {} transitions:", snapshot.log.len());
    for transition in &snapshot.log {
        println!("  {} --{}--> {}", transition.from(), transition.event(), transition.to());
    }

    println!("\n=== Example Complete ===");
}
