use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::game_state::Phase;

/// What an accepted submission did to its round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionSuccess {
    /// Bid recorded, others still to bid.
    Bid,
    /// Last bid recorded; the round moved to `Playing`.
    BiddingComplete,
    /// Trick count recorded, others still to report.
    Tricks,
    /// Last trick count recorded; the round moved to `Complete`.
    RoundComplete,
    /// A correction was applied without changing the phase.
    Corrected,
}

/// Abstract category of a [`TransitionError`], for callers that report by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Argument,
    OutOfTurn,
    InvalidPhase,
    InvalidBid,
    InvalidTrickCount,
    ForbiddenBid,
}

/// A rejected operation. State is never modified when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum TransitionError {
    #[error("Error: A game needs at least one player.")]
    EmptyRoster,
    #[error("Error: A game needs at least {min} players, got {count}.")]
    TooFewPlayers { count: usize, min: usize },
    #[error("Error: A game seats at most {max} players, got {count}.")]
    TooManyPlayers { count: usize, max: u32 },
    #[error("Error: Player {0:?} appears more than once.")]
    DuplicatePlayer(String),
    #[error("Error: Invalid player name {name:?}: {reason}.")]
    InvalidPlayerName { name: String, reason: String },
    #[error("Error: Unknown player {0:?}.")]
    UnknownPlayer(String),
    #[error("Error: Cards dealt must be positive.")]
    InvalidCardsDealt,
    #[error("Error: Cards dealt must be between 1 and {max}, got {cards_dealt}.")]
    CardsExceedDeck { cards_dealt: u32, max: u32 },
    #[error("Error: Starting position must be at least 1.")]
    InvalidStartingPosition,
    #[error("Error: Round {0} does not exist.")]
    UnknownRound(usize),
    #[error("Error: Inconsistent record: {0}.")]
    InconsistentRecord(String),
    #[error("Error: It is {expected:?}'s turn to bid, not {player:?}.")]
    OutOfTurn { player: String, expected: String },
    #[error("Error: Expected {expected} phase, currently in {actual}.")]
    InvalidPhase { expected: Phase, actual: Phase },
    #[error("Error: Bid {bid} is outside 0..={cards_dealt}.")]
    InvalidBid { bid: i32, cards_dealt: u32 },
    #[error("Error: Trick count {tricks} is outside 0..={cards_dealt}.")]
    InvalidTrickCount { tricks: i32, cards_dealt: u32 },
    #[error("Error: Cannot bid {bid}, it is the forbidden number.")]
    ForbiddenBid { bid: u32 },
}

impl TransitionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransitionError::EmptyRoster
            | TransitionError::TooFewPlayers { .. }
            | TransitionError::TooManyPlayers { .. }
            | TransitionError::DuplicatePlayer(_)
            | TransitionError::InvalidPlayerName { .. }
            | TransitionError::UnknownPlayer(_)
            | TransitionError::InvalidCardsDealt
            | TransitionError::CardsExceedDeck { .. }
            | TransitionError::InvalidStartingPosition
            | TransitionError::UnknownRound(_)
            | TransitionError::InconsistentRecord(_) => ErrorKind::Argument,
            TransitionError::OutOfTurn { .. } => ErrorKind::OutOfTurn,
            TransitionError::InvalidPhase { .. } => ErrorKind::InvalidPhase,
            TransitionError::InvalidBid { .. } => ErrorKind::InvalidBid,
            TransitionError::InvalidTrickCount { .. } => ErrorKind::InvalidTrickCount,
            TransitionError::ForbiddenBid { .. } => ErrorKind::ForbiddenBid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::test_case;
    use std::error::Error;

    fn sample(variant_name: &str) -> TransitionError {
        match variant_name {
            "EmptyRoster" => TransitionError::EmptyRoster,
            "TooFewPlayers" => TransitionError::TooFewPlayers { count: 1, min: 2 },
            "TooManyPlayers" => TransitionError::TooManyPlayers { count: 53, max: 52 },
            "DuplicatePlayer" => TransitionError::DuplicatePlayer("A".to_string()),
            "InvalidPlayerName" => TransitionError::InvalidPlayerName { name: String::new(), reason: "empty".to_string() },
            "UnknownPlayer" => TransitionError::UnknownPlayer("Z".to_string()),
            "InvalidCardsDealt" => TransitionError::InvalidCardsDealt,
            "CardsExceedDeck" => TransitionError::CardsExceedDeck { cards_dealt: 18, max: 17 },
            "InvalidStartingPosition" => TransitionError::InvalidStartingPosition,
            "UnknownRound" => TransitionError::UnknownRound(3),
            "InconsistentRecord" => TransitionError::InconsistentRecord("bad".to_string()),
            "OutOfTurn" => TransitionError::OutOfTurn { player: "B".to_string(), expected: "A".to_string() },
            "InvalidPhase" => TransitionError::InvalidPhase { expected: Phase::Playing, actual: Phase::Bidding },
            "InvalidBid" => TransitionError::InvalidBid { bid: -1, cards_dealt: 5 },
            "InvalidTrickCount" => TransitionError::InvalidTrickCount { tricks: 6, cards_dealt: 5 },
            "ForbiddenBid" => TransitionError::ForbiddenBid { bid: 1 },
            _ => unreachable!(),
        }
    }

    #[test_case("EmptyRoster")]
    #[test_case("TooFewPlayers")]
    #[test_case("TooManyPlayers")]
    #[test_case("DuplicatePlayer")]
    #[test_case("InvalidPlayerName")]
    #[test_case("UnknownPlayer")]
    #[test_case("InvalidCardsDealt")]
    #[test_case("CardsExceedDeck")]
    #[test_case("InvalidStartingPosition")]
    #[test_case("UnknownRound")]
    #[test_case("InconsistentRecord")]
    fn argument_errors_share_a_kind(variant_name: &str) {
        let err = sample(variant_name);
        assert_eq!(err.kind(), ErrorKind::Argument, "{} should be an argument error", variant_name);
        assert!(err.to_string().starts_with("Error:"), "got: {}", err);
    }

    #[test_case("OutOfTurn")]
    #[test_case("InvalidPhase")]
    #[test_case("InvalidBid")]
    #[test_case("InvalidTrickCount")]
    #[test_case("ForbiddenBid")]
    fn rule_errors_display_contains_error(variant_name: &str) {
        let err = sample(variant_name);
        assert_ne!(err.kind(), ErrorKind::Argument);
        assert!(err.to_string().starts_with("Error:"), "got: {}", err);
    }

    #[test]
    fn phase_error_names_both_phases() {
        let err = TransitionError::InvalidPhase { expected: Phase::Playing, actual: Phase::Bidding };
        assert_eq!(err.to_string(), "Error: Expected playing phase, currently in bidding.");
        assert!(err.source().is_none());
    }
}
