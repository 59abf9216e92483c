//! Transition table validation errors.

use std::fmt;
use thiserror::Error;

/// One (from, event) pair that maps to more than one target state.
///
/// Values are captured as their `Debug` renderings so the error carries no
/// type parameters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Conflict {
    pub from: String,
    pub event: String,
    pub targets: Vec<String>,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --{}--> {{{}}}",
            self.from,
            self.event,
            self.targets.join(", ")
        )
    }
}

/// A transition set was rejected because it is not deterministic.
///
/// Every conflicting pair is reported, sorted, not just the first found.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Ambiguous transition table: {}", render(.conflicts))]
pub struct AmbiguousTransitionTable {
    pub conflicts: Vec<Conflict>,
}

fn render(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(Conflict::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_lists_every_conflict() {
        let err = AmbiguousTransitionTable {
            conflicts: vec![
                Conflict {
                    from: "s1".into(),
                    event: "e1".into(),
                    targets: vec!["s2".into(), "s3".into()],
                },
                Conflict {
                    from: "s2".into(),
                    event: "e9".into(),
                    targets: vec!["s1".into(), "s3".into()],
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "Ambiguous transition table: s1 --e1--> {s2, s3}; s2 --e9--> {s1, s3}"
        );
    }
}
