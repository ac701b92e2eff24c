use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use crate::forbidden_bid;
use crate::game_state::Phase;
use crate::result::{TransitionError, TransitionSuccess};
use crate::scoring;
use crate::serialization::RoundRecord;
use crate::validation;
use crate::Player;

/// One hand of La Podrida: every player bids, then reports the tricks they took.
///
/// A round keeps its own copy of the seating order, so it can be tested and serialized
/// without the [`Game`](struct.Game.html) that created it. Phase completeness and
/// validity are separate: a round whose trick counts don't add up is still `Complete`
/// once everybody has reported, but [`is_valid`](#method.is_valid) is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoundRecord", into = "RoundRecord")]
pub struct Round {
    pub(crate) players: Vec<Player>,
    pub(crate) cards_dealt: u32,
    pub(crate) starting_position: u32,
    pub(crate) phase: Phase,
    pub(crate) bids: BTreeMap<Player, u32>,
    pub(crate) tricks_won: BTreeMap<Player, u32>,
}

impl Round {
    /// `starting_position` is 1-based and wraps around the seating order.
    pub fn new<I, S>(players: I, cards_dealt: u32, starting_position: u32) -> Result<Round, TransitionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let players = validation::validate_roster(players, 1)?;
        if cards_dealt == 0 {
            return Err(TransitionError::InvalidCardsDealt);
        }
        if starting_position == 0 {
            return Err(TransitionError::InvalidStartingPosition);
        }
        Ok(Round::from_roster(players, cards_dealt, starting_position))
    }

    /// Caller guarantees a validated roster and positive `cards_dealt`/`starting_position`.
    pub(crate) fn from_roster(players: Vec<Player>, cards_dealt: u32, starting_position: u32) -> Round {
        Round {
            players,
            cards_dealt,
            starting_position,
            phase: Phase::Bidding,
            bids: BTreeMap::new(),
            tricks_won: BTreeMap::new(),
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn cards_dealt(&self) -> u32 {
        self.cards_dealt
    }

    pub fn starting_position(&self) -> u32 {
        self.starting_position
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn bids(&self) -> &BTreeMap<Player, u32> {
        &self.bids
    }

    pub fn tricks_won(&self) -> &BTreeMap<Player, u32> {
        &self.tricks_won
    }

    pub fn bid_for(&self, player: &str) -> Option<u32> {
        self.bids.get(player).copied()
    }

    pub fn tricks_for(&self, player: &str) -> Option<u32> {
        self.tricks_won.get(player).copied()
    }

    pub fn is_bidding(&self) -> bool {
        self.phase == Phase::Bidding
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Seating order rotated so the player at `starting_position` bids first.
    pub fn players_in_order(&self) -> Vec<&str> {
        let offset = self.rotation_offset();
        self.players[offset..]
            .iter()
            .chain(self.players[..offset].iter())
            .map(String::as_str)
            .collect()
    }

    pub fn starting_player(&self) -> &str {
        &self.players[self.rotation_offset()]
    }

    /// The next player expected to bid. Only defined while bidding.
    pub fn current_bidder(&self) -> Option<&str> {
        if self.phase != Phase::Bidding {
            return None;
        }
        self.players_in_order().into_iter().find(|p| !self.bids.contains_key(*p))
    }

    /// True when everybody except `player` has bid.
    pub fn is_last_bidder(&self, player: &str) -> bool {
        self.bids.len() + 1 == self.players.len() && !self.bids.contains_key(player)
    }

    pub fn forbidden_number(&self) -> Option<u32> {
        forbidden_bid::forbidden_number(self.cards_dealt, &self.bids, self.players.len())
    }

    pub fn can_change_bid(&self, player: &str) -> bool {
        self.phase == Phase::Bidding && self.bids.contains_key(player)
    }

    /// Record `player`'s bid in rotation order. The last bid of the round moves it to `Playing`.
    pub fn place_bid(&mut self, player: &str, count: i32) -> Result<TransitionSuccess, TransitionError> {
        self.expect_phase(Phase::Bidding)?;
        let player = self.seat(player)?;
        let bid = self.check_bid(count)?;

        if let Some(expected) = self.current_bidder() {
            if expected != player {
                return Err(TransitionError::OutOfTurn {
                    player: player.to_string(),
                    expected: expected.to_string(),
                });
            }
        }
        if self.is_last_bidder(player) && forbidden_bid::is_forbidden(self.cards_dealt, &self.bids, self.players.len(), bid) {
            log::warn!("Rejected forbidden bid {} from {}", bid, player);
            return Err(TransitionError::ForbiddenBid { bid });
        }

        let player = player.to_string();
        log::debug!("{} bids {} of {}", player, bid, self.cards_dealt);
        self.bids.insert(player, bid);

        if self.all_bids_placed() {
            log::debug!("Bidding complete, total bid {}", self.total_bids());
            // trick counts may already be in from corrections
            return Ok(self.advance());
        }
        Ok(TransitionSuccess::Bid)
    }

    /// Overwrite (or supply) a bid in any phase and in any order.
    ///
    /// The forbidden number is checked against everybody else's bids, so once all bids
    /// are in, their total still can't equal the cards dealt.
    pub fn correct_bid(&mut self, player: &str, new_count: i32) -> Result<TransitionSuccess, TransitionError> {
        let player = self.seat(player)?.to_string();
        let bid = self.check_bid(new_count)?;

        let others: BTreeMap<Player, u32> = self.bids
            .iter()
            .filter(|(p, _)| **p != player)
            .map(|(p, b)| (p.clone(), *b))
            .collect();
        if forbidden_bid::is_forbidden(self.cards_dealt, &others, self.players.len(), bid) {
            log::warn!("Rejected forbidden bid correction {} for {}", bid, player);
            return Err(TransitionError::ForbiddenBid { bid });
        }

        log::debug!("Correcting bid of {} to {}", player, bid);
        self.bids.insert(player, bid);
        Ok(self.advance())
    }

    pub fn record_tricks(&mut self, player: &str, count: i32) -> Result<TransitionSuccess, TransitionError> {
        self.expect_phase(Phase::Playing)?;
        let player = self.seat(player)?.to_string();
        let tricks = self.check_tricks(count)?;

        log::debug!("{} took {} tricks", player, tricks);
        self.tricks_won.insert(player, tricks);

        if self.all_tricks_recorded() {
            self.phase = Phase::Complete;
            log::debug!("Round complete, {} of {} tricks reported", self.total_tricks(), self.cards_dealt);
            return Ok(TransitionSuccess::RoundComplete);
        }
        Ok(TransitionSuccess::Tricks)
    }

    /// Overwrite (or supply) a trick count in any phase.
    pub fn correct_tricks(&mut self, player: &str, new_count: i32) -> Result<TransitionSuccess, TransitionError> {
        let player = self.seat(player)?.to_string();
        let tricks = self.check_tricks(new_count)?;

        log::debug!("Correcting tricks of {} to {}", player, tricks);
        self.tricks_won.insert(player, tricks);
        Ok(self.advance())
    }

    pub fn points_for(&self, player: &str) -> Option<u64> {
        scoring::points(self.bid_for(player), self.tricks_for(player))
    }

    pub fn total_bids(&self) -> u64 {
        self.bids.values().map(|&b| u64::from(b)).sum()
    }

    pub fn total_tricks(&self) -> u64 {
        self.tricks_won.values().map(|&t| u64::from(t)).sum()
    }

    /// Complete, every dealt card accounted for, and the bids don't add up to the hand.
    pub fn is_valid(&self) -> bool {
        let cards = u64::from(self.cards_dealt);
        self.phase == Phase::Complete && self.total_tricks() == cards && self.total_bids() != cards
    }

    pub fn is_invalid(&self) -> bool {
        self.phase == Phase::Complete && !self.is_valid()
    }

    fn rotation_offset(&self) -> usize {
        // starting_position >= 1 and players is non-empty
        usize::try_from(self.starting_position - 1).map_or(0, |start| start % self.players.len())
    }

    fn all_bids_placed(&self) -> bool {
        self.bids.len() == self.players.len()
    }

    fn all_tricks_recorded(&self) -> bool {
        self.tricks_won.len() == self.players.len()
    }

    // Re-check phase after a bid or correction. Steps forward one phase at a time, never back.
    fn advance(&mut self) -> TransitionSuccess {
        let before = self.phase;
        if self.phase == Phase::Bidding && self.all_bids_placed() {
            self.phase = Phase::Playing;
        }
        if self.phase == Phase::Playing && self.all_tricks_recorded() {
            self.phase = Phase::Complete;
        }
        if before != self.phase {
            log::debug!("Round moved from {} to {}", before, self.phase);
        }

        match (before == self.phase, self.phase) {
            (true, _) => TransitionSuccess::Corrected,
            (false, Phase::Complete) => TransitionSuccess::RoundComplete,
            (false, _) => TransitionSuccess::BiddingComplete,
        }
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), TransitionError> {
        if self.phase != expected {
            return Err(TransitionError::InvalidPhase { expected, actual: self.phase });
        }
        Ok(())
    }

    fn seat(&self, player: &str) -> Result<&str, TransitionError> {
        self.players
            .iter()
            .find(|p| p.as_str() == player)
            .map(String::as_str)
            .ok_or_else(|| TransitionError::UnknownPlayer(player.to_string()))
    }

    fn check_bid(&self, count: i32) -> Result<u32, TransitionError> {
        u32::try_from(count)
            .ok()
            .filter(|&b| b <= self.cards_dealt)
            .ok_or(TransitionError::InvalidBid { bid: count, cards_dealt: self.cards_dealt })
    }

    fn check_tricks(&self, count: i32) -> Result<u32, TransitionError> {
        u32::try_from(count)
            .ok()
            .filter(|&t| t <= self.cards_dealt)
            .ok_or(TransitionError::InvalidTrickCount { tricks: count, cards_dealt: self.cards_dealt })
    }
}
