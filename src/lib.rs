//! This crate keeps score for [La Podrida](https://en.wikipedia.org/wiki/Oh_Hell), a trick-bidding
//! card game (an Oh Hell variant) played by a fixed table of named players over rounds of varying size.
//!
//! Each [`Round`](struct.Round.html) runs `bidding -> playing -> complete`. The last player to bid may
//! not pick the number that would make all bids add up to the cards dealt, so at least one prediction
//! always fails. An exact prediction scores `10 + 2 * tricks`; a miss scores the tricks taken.
//!
//! ## Example usage
//! ```
//! use podrida::{Game, Phase, TransitionError};
//!
//! let mut g = Game::new(["A", "B"]).unwrap();
//! g.create_round(5, true).unwrap();
//!
//! g.place_bid(1, "A", 2).unwrap();
//! // 5 - 2 = 3 is forbidden for the last bidder
//! assert_eq!(g.place_bid(1, "B", 3), Err(TransitionError::ForbiddenBid { bid: 3 }));
//! g.place_bid(1, "B", 1).unwrap();
//!
//! g.record_tricks(1, "A", 2).unwrap();
//! g.record_tricks(1, "B", 3).unwrap();
//!
//! assert_eq!(g.current_round().unwrap().phase(), Phase::Complete);
//! assert_eq!(g.points_for("A"), 14);
//! assert_eq!(g.points_for("B"), 3);
//! assert_eq!(g.winner(), Some("A"));
//! ```
//!
//! The engine is synchronous and owns no global state. Persisting games and serializing concurrent
//! edits is the caller's job; see [`GameStore`](trait.GameStore.html).

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

mod game_state;
mod result;
mod round;
pub mod forbidden_bid;
pub mod ids;
pub mod leaderboard;
pub mod scoring;
pub mod serialization;
pub mod storage;
pub mod validation;
#[cfg(feature = "sqlite")]
pub mod sqlite_store;

#[cfg(test)]
mod tests;

pub use game_state::*;
pub use result::*;
pub use round::Round;
pub use ids::GameId;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use storage::{GameStore, MemoryStore, StorageError, StoredGame};
#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteStore;

/// Players are identified by their (trimmed) display name.
pub type Player = String;

pub const DECK_SIZE: u32 = 52;
/// Cards set aside to show the trump suit.
pub const TRUMP_RESERVE: u32 = 1;
pub const MIN_PLAYERS: usize = 2;
/// Every player must be able to hold at least one card.
pub const MAX_PLAYERS: u32 = DECK_SIZE;

/// A table of players and the rounds they have played, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serialization::GameRecord", into = "serialization::GameRecord")]
pub struct Game {
    players: Vec<Player>,
    rounds: Vec<Round>,
}

impl Game {
    /// Seat `players` in the given order. Names are trimmed and must be unique.
    pub fn new<I, S>(players: I) -> Result<Game, TransitionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let players = validation::validate_roster(players, MIN_PLAYERS)?;
        validation::seat_count(&players)?;
        Ok(Game { players, rounds: Vec::new() })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Largest hand that can be dealt to every player, keeping one card back for trump if needed.
    pub fn max_cards_per_player(&self, has_trump: bool) -> u32 {
        // rosters above MAX_PLAYERS are rejected on construction
        validation::seat_count(&self.players).map_or(0, |seats| max_cards(seats, has_trump))
    }

    /// Deal a new round. The starting position rotates by one seat each round.
    pub fn create_round(&mut self, cards_dealt: u32, has_trump: bool) -> Result<&mut Round, TransitionError> {
        let seats = validation::seat_count(&self.players)?;
        let max = max_cards(seats, has_trump);
        if cards_dealt == 0 {
            return Err(TransitionError::InvalidCardsDealt);
        }
        if cards_dealt > max {
            return Err(TransitionError::CardsExceedDeck { cards_dealt, max });
        }

        let starting_position = match self.rounds.last() {
            Some(previous) => next_starting_position(previous.starting_position(), seats),
            None => 1,
        };
        log::info!(
            "Round {}: {} cards, trump: {}, starting at position {}",
            self.rounds.len() + 1,
            cards_dealt,
            has_trump,
            starting_position
        );

        self.rounds.push(Round::from_roster(self.players.clone(), cards_dealt, starting_position));
        let index = self.rounds.len() - 1;
        Ok(&mut self.rounds[index])
    }

    /// First round not yet complete, or the last round once all are complete.
    pub fn current_round(&self) -> Option<&Round> {
        self.current_round_index().map(|i| &self.rounds[i])
    }

    pub fn current_round_mut(&mut self) -> Option<&mut Round> {
        self.current_round_index().map(move |i| &mut self.rounds[i])
    }

    /// 1-based number of [`current_round`](#method.current_round).
    pub fn current_round_number(&self) -> Option<usize> {
        self.current_round_index().map(|i| i + 1)
    }

    /// Round by 1-based number.
    pub fn round(&self, number: usize) -> Option<&Round> {
        number.checked_sub(1).and_then(|i| self.rounds.get(i))
    }

    pub fn round_mut(&mut self, number: usize) -> Option<&mut Round> {
        number.checked_sub(1).and_then(move |i| self.rounds.get_mut(i))
    }

    pub fn place_bid(&mut self, round_number: usize, player: &str, count: i32) -> Result<TransitionSuccess, TransitionError> {
        self.expect_round(round_number)?.place_bid(player, count)
    }

    pub fn correct_bid(&mut self, round_number: usize, player: &str, new_count: i32) -> Result<TransitionSuccess, TransitionError> {
        self.expect_round(round_number)?.correct_bid(player, new_count)
    }

    pub fn record_tricks(&mut self, round_number: usize, player: &str, count: i32) -> Result<TransitionSuccess, TransitionError> {
        self.expect_round(round_number)?.record_tricks(player, count)
    }

    pub fn correct_tricks(&mut self, round_number: usize, player: &str, new_count: i32) -> Result<TransitionSuccess, TransitionError> {
        self.expect_round(round_number)?.correct_tricks(player, new_count)
    }

    /// Total over all rounds; rounds where the player hasn't scored yet count as zero.
    pub fn points_for(&self, player: &str) -> u64 {
        self.rounds
            .iter()
            .filter_map(|r| r.points_for(player))
            .fold(0, u64::saturating_add)
    }

    pub fn scores(&self) -> BTreeMap<Player, u64> {
        self.players.iter().map(|p| (p.clone(), self.points_for(p))).collect()
    }

    /// Players by descending score. Equal scores keep seating order.
    pub fn standings(&self) -> Vec<(&str, u64)> {
        let mut standings: Vec<(&str, u64)> = self.players
            .iter()
            .map(|p| (p.as_str(), self.points_for(p)))
            .collect();
        standings.sort_by(|a, b| b.1.cmp(&a.1));
        standings
    }

    /// Highest score once every round is complete. A tie goes to whoever sits first.
    pub fn winner(&self) -> Option<&str> {
        if !self.is_complete() {
            return None;
        }
        self.standings().first().map(|&(player, _)| player)
    }

    pub fn is_complete(&self) -> bool {
        !self.rounds.is_empty() && self.rounds.iter().all(Round::is_complete)
    }

    pub fn is_valid(&self) -> bool {
        self.is_complete() && self.rounds.iter().all(Round::is_valid)
    }

    fn current_round_index(&self) -> Option<usize> {
        self.rounds
            .iter()
            .position(|r| !r.is_complete())
            .or_else(|| self.rounds.len().checked_sub(1))
    }

    fn expect_round(&mut self, round_number: usize) -> Result<&mut Round, TransitionError> {
        self.round_mut(round_number).ok_or(TransitionError::UnknownRound(round_number))
    }
}

/// Largest hand for `seats` players, keeping one card back for trump if needed.
pub(crate) fn max_cards(seats: u32, has_trump: bool) -> u32 {
    let available = if has_trump { DECK_SIZE - TRUMP_RESERVE } else { DECK_SIZE };
    available / seats
}

/// Seat that opens the round after one opened by `previous` (both 1-based).
/// `seats` comes from [`validation::seat_count`], so it is at least one.
pub(crate) fn next_starting_position(previous: u32, seats: u32) -> u32 {
    (previous % seats) + 1
}
