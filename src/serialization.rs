//! Plain JSON-compatible representation of rounds and games.
//!
//! ```text
//! Round: { players: [string], cards_dealt: int, starting_position: int,
//!          phase: "bidding"|"playing"|"complete",
//!          bids: {player: int}, tricks_won: {player: int} }
//! Game:  { players: [string], rounds: [Round] }
//! ```
//!
//! Players who haven't acted are absent from `bids`/`tricks_won`, never `null`.
//! Reading a record checks every invariant the live types keep, so a record that
//! loads is one the engine could have produced.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use crate::game_state::Phase;
use crate::result::TransitionError;
use crate::round::Round;
use crate::validation;
use crate::{Game, Player, MIN_PLAYERS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub players: Vec<Player>,
    pub cards_dealt: u32,
    #[serde(default = "first_position")]
    pub starting_position: u32,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub bids: BTreeMap<Player, u32>,
    #[serde(default)]
    pub tricks_won: BTreeMap<Player, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub players: Vec<Player>,
    #[serde(default)]
    pub rounds: Vec<Round>,
}

fn first_position() -> u32 {
    1
}

impl From<Round> for RoundRecord {
    fn from(round: Round) -> RoundRecord {
        RoundRecord {
            players: round.players,
            cards_dealt: round.cards_dealt,
            starting_position: round.starting_position,
            phase: round.phase,
            bids: round.bids,
            tricks_won: round.tricks_won,
        }
    }
}

impl TryFrom<RoundRecord> for Round {
    type Error = TransitionError;

    fn try_from(record: RoundRecord) -> Result<Round, TransitionError> {
        let players = validation::validate_roster(&record.players, 1)?;
        if players != record.players {
            return Err(inconsistent("player names must be trimmed"));
        }
        if record.cards_dealt == 0 {
            return Err(TransitionError::InvalidCardsDealt);
        }
        if record.starting_position == 0 {
            return Err(TransitionError::InvalidStartingPosition);
        }

        for (player, &bid) in &record.bids {
            if !players.contains(player) {
                return Err(TransitionError::UnknownPlayer(player.clone()));
            }
            if bid > record.cards_dealt {
                return Err(TransitionError::InvalidBid { bid: saturating_i32(bid), cards_dealt: record.cards_dealt });
            }
        }
        for (player, &tricks) in &record.tricks_won {
            if !players.contains(player) {
                return Err(TransitionError::UnknownPlayer(player.clone()));
            }
            if tricks > record.cards_dealt {
                return Err(TransitionError::InvalidTrickCount { tricks: saturating_i32(tricks), cards_dealt: record.cards_dealt });
            }
        }

        let all_bid = record.bids.len() == players.len();
        let all_reported = record.tricks_won.len() == players.len();
        match record.phase {
            Phase::Bidding if all_bid => return Err(inconsistent("every player has bid but the round is still bidding")),
            Phase::Playing | Phase::Complete if !all_bid => return Err(inconsistent("bids missing after bidding")),
            Phase::Playing if all_reported => return Err(inconsistent("every player has reported but the round is still playing")),
            Phase::Complete if !all_reported => return Err(inconsistent("trick counts missing in a complete round")),
            _ => {}
        }

        Ok(Round {
            players,
            cards_dealt: record.cards_dealt,
            starting_position: record.starting_position,
            phase: record.phase,
            bids: record.bids,
            tricks_won: record.tricks_won,
        })
    }
}

impl From<Game> for GameRecord {
    fn from(game: Game) -> GameRecord {
        GameRecord { players: game.players, rounds: game.rounds }
    }
}

impl TryFrom<GameRecord> for Game {
    type Error = TransitionError;

    fn try_from(record: GameRecord) -> Result<Game, TransitionError> {
        let players = validation::validate_roster(&record.players, MIN_PLAYERS)?;
        if players != record.players {
            return Err(inconsistent("player names must be trimmed"));
        }
        let seats = validation::seat_count(&players)?;
        // the record doesn't say which rounds had trump, so allow the full deck
        let max = crate::max_cards(seats, false);

        let mut expected_position = 1;
        for (index, round) in record.rounds.iter().enumerate() {
            if round.players() != players.as_slice() {
                return Err(inconsistent(&format!("round {} seats different players than the game", index + 1)));
            }
            if round.cards_dealt() > max {
                return Err(TransitionError::CardsExceedDeck { cards_dealt: round.cards_dealt(), max });
            }
            if round.starting_position() != expected_position {
                return Err(inconsistent(&format!(
                    "round {} starts at position {}, expected {}",
                    index + 1,
                    round.starting_position(),
                    expected_position
                )));
            }
            expected_position = crate::next_starting_position(expected_position, seats);
        }

        Ok(Game { players, rounds: record.rounds })
    }
}

impl Round {
    /// The record form of this round as a JSON value.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Rebuild a round from its record form, rejecting records that break an invariant.
    pub fn from_value(value: Value) -> Result<Round, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl Game {
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn from_value(value: Value) -> Result<Game, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Game, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn inconsistent(reason: &str) -> TransitionError {
    TransitionError::InconsistentRecord(reason.to_string())
}

fn saturating_i32(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
