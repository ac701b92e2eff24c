use std::fmt;
use serde::{Serialize, Deserialize};

/// Macro-state of a [`Round`](struct.Round.html). Only ever moves forward:
/// `Bidding -> Playing -> Complete`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Bidding,
    Playing,
    Complete
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Phase::Bidding => write!(f, "bidding"),
            Phase::Playing => write!(f, "playing"),
            Phase::Complete => write!(f, "complete"),
        }
    }
}
