//! Property-based tests for tables, logs and event processing.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use lockstep::core::{BoundedLog, Transition, TransitionQuery, TransitionTable};
use lockstep::machine::{Outcome, StateMachine};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

type Table = TransitionTable<u8, u8>;

prop_compose! {
    fn arbitrary_transition()(from in 0..5u8, event in 0..3u8, to in 0..5u8) -> Transition<u8, u8> {
        Transition::new(from, event, to)
    }
}

prop_compose! {
    /// A transition set that is deterministic by construction.
    fn deterministic_transitions()(
        edges in prop::collection::hash_map((0..5u8, 0..3u8), 0..5u8, 0..12)
    ) -> Vec<Transition<u8, u8>> {
        edges
            .into_iter()
            .map(|((from, event), to)| Transition::new(from, event, to))
            .collect()
    }
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #[test]
    fn construction_fails_exactly_for_ambiguous_sets(
        transitions in prop::collection::vec(arbitrary_transition(), 0..16)
    ) {
        let mut targets: HashMap<(u8, u8), HashSet<u8>> = HashMap::new();
        for t in &transitions {
            targets.entry((*t.from(), *t.event())).or_default().insert(*t.to());
        }
        let ambiguous = targets.values().filter(|tos| tos.len() > 1).count();

        match Table::new(transitions) {
            Ok(table) => {
                prop_assert_eq!(ambiguous, 0);
                for ((from, event), tos) in &targets {
                    let found = table.transition(from, event).map(|t| *t.to());
                    prop_assert_eq!(found, tos.iter().next().copied());
                }
            }
            Err(err) => {
                prop_assert!(ambiguous > 0);
                prop_assert_eq!(err.conflicts.len(), ambiguous);
            }
        }
    }

    #[test]
    fn lookup_yields_at_most_one_match(transitions in deterministic_transitions()) {
        let table = Table::new(transitions).unwrap();
        for from in 0..5u8 {
            for event in 0..3u8 {
                let matches = table
                    .iter()
                    .filter(|t| *t.from() == from && *t.event() == event)
                    .count();
                prop_assert!(matches <= 1);
                prop_assert_eq!(matches == 1, table.transition(&from, &event).is_some());
            }
        }
    }

    #[test]
    fn log_keeps_the_most_recent_pushes(
        capacity in 1..8usize,
        pushes in prop::collection::vec(any::<u32>(), 0..40)
    ) {
        let mut log = BoundedLog::with_capacity(NonZeroUsize::new(capacity).unwrap());
        for (i, value) in pushes.iter().enumerate() {
            log.push(*value);
            prop_assert!(log.len() <= capacity);
            prop_assert_eq!(log.len(), (i + 1).min(capacity));
        }

        let kept: Vec<u32> = log.iter().copied().collect();
        let start = pushes.len().saturating_sub(capacity);
        prop_assert_eq!(kept, pushes[start..].to_vec());
    }

    #[test]
    fn counters_add_up_after_every_call(
        transitions in deterministic_transitions(),
        initial in 0..5u8,
        events in prop::collection::vec(0..3u8, 0..30)
    ) {
        let machine = StateMachine::create(initial, transitions, None).unwrap();

        run(async {
            for (i, event) in events.iter().enumerate() {
                machine.process(*event).await;
                let snapshot = machine.snapshot().await;
                assert_eq!(snapshot.processed_events, i as u64 + 1);
                assert_eq!(
                    snapshot.state_changes + snapshot.rejected_events(),
                    snapshot.processed_events
                );
                assert_eq!(snapshot.log.len() as u64, snapshot.state_changes);
            }
        });
    }

    #[test]
    fn rejection_changes_nothing_but_the_counter(
        transitions in deterministic_transitions(),
        initial in 0..5u8,
        events in prop::collection::vec(0..3u8, 0..30)
    ) {
        let machine = StateMachine::create(initial, transitions, NonZeroUsize::new(4)).unwrap();

        run(async {
            for event in events {
                let before = machine.snapshot().await;
                let outcome = machine.process(event).await;
                let after = machine.snapshot().await;

                match outcome {
                    Outcome::Rejected(rejection) => {
                        assert_eq!(rejection.state, before.state);
                        assert_eq!(after.state, before.state);
                        assert_eq!(after.log, before.log);
                        assert_eq!(after.state_changes, before.state_changes);
                    }
                    Outcome::Committed(transition) => {
                        assert_eq!(transition.from(), &before.state);
                        assert_eq!(&after.state, transition.to());
                        assert_eq!(after.entered_with(), Some(&transition));
                        assert_eq!(after.state_changes, before.state_changes + 1);
                    }
                }
                assert_eq!(after.processed_events, before.processed_events + 1);
            }
        });
    }

    #[test]
    fn terminal_states_stay_terminal(
        transitions in deterministic_transitions(),
        initial in 0..5u8,
        events in prop::collection::vec(0..3u8, 0..30)
    ) {
        let table = Table::new(transitions.clone()).unwrap();
        let machine = StateMachine::create(initial, transitions, None).unwrap();

        run(async {
            let mut ended = false;
            for event in events {
                machine.process(event).await;
                let state = machine.state().await;
                let at_end = machine.at_ending_state().await;

                assert_eq!(at_end, table.transitions_from(&state).is_empty());
                if ended {
                    assert!(at_end);
                }
                ended = at_end;
            }
        });
    }
}
