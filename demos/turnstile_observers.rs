//! Turnstile with Observers
//!
//! This example demonstrates the two notification sinks:
//! - pull-style lanes drained by a separate task
//! - a push-style delegate running on the runtime
//!
//! Run with: RUST_LOG=lockstep=debug cargo run --example turnstile_observers

use lockstep::builder::StateMachineBuilder;
use lockstep::core::Transition;
use lockstep::machine::Delegate;
use lockstep::state_enum;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;

state_enum! {
    enum Turnstile {
        Locked,
        Unlocked,
    }
}

state_enum! {
    enum Input {
        Coin,
        Push,
    }
}

fn turnstile() -> StateMachineBuilder<Turnstile, Input> {
    StateMachineBuilder::new()
        .initial(Turnstile::Locked)
        .transition(Turnstile::Locked, Input::Coin, Turnstile::Unlocked)
        .transition(Turnstile::Unlocked, Input::Push, Turnstile::Locked)
}

#[derive(Default)]
struct Audit {
    passages: AtomicUsize,
    blocked: AtomicUsize,
}

impl Delegate<Turnstile, Input> for Audit {
    fn on_state_changed(&self, transition: &Transition<Turnstile, Input>) {
        if *transition.event() == Input::Push {
            self.passages.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn on_event_rejected(&self, state: &Turnstile, event: &Input) {
        self.blocked.fetch_add(1, Ordering::SeqCst);
        println!("  [audit] {event} refused while {state}");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let inputs = [
        Input::Push,
        Input::Coin,
        Input::Coin,
        Input::Push,
        Input::Push,
        Input::Coin,
        Input::Push,
    ];

    println!("=== Pull-style lanes ===\n");

    let (gate, notifications) = turnstile()
        .label("north-gate")
        .build_with_notifications()
        .expect("table is deterministic");
    let (mut committed, mut rejected) = notifications.into_streams();

    let watcher = tokio::spawn(async move {
        use futures::StreamExt;
        let mut changes = 0;
        while let Some(transition) = committed.next().await {
            changes += 1;
            println!("  [lane] {} -> {}", transition.from(), transition.to());
        }
        let mut refusals = 0;
        while rejected.next().await.is_some() {
            refusals += 1;
        }
        (changes, refusals)
    });

    for input in inputs {
        gate.process(input).await;
    }
    drop(gate);

    let (changes, refusals) = watcher.await.expect("watcher task");
    println!("\n  lane saw {changes} changes and {refusals} refusals\n");

    println!("=== Push-style delegate ===\n");

    let audit = Arc::new(Audit::default());
    let gate = turnstile()
        .label("south-gate")
        .delegate(audit.clone(), Handle::current())
        .build()
        .expect("table is deterministic");

    for input in inputs {
        gate.process(input).await;
    }

    while audit.passages.load(Ordering::SeqCst) + audit.blocked.load(Ordering::SeqCst) < 5 {
        tokio::task::yield_now().await;
    }

    println!(
        "\n  delegate counted {} passages and {} refusals",
        audit.passages.load(Ordering::SeqCst),
        audit.blocked.load(Ordering::SeqCst)
    );
    println!("  gate at rest: {}", gate.state().await);

    println!("\n=== Example Complete ===");
}
