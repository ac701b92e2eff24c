//! The defining rule of La Podrida: the last player to bid may not choose the number
//! that would make the bids add up to the cards dealt, so somebody always misses.

use std::collections::BTreeMap;

/// The value the remaining bidder may not choose.
///
/// `None` unless exactly one player is left to bid. Also `None` when earlier players
/// already over-bid the hand (`cards_dealt < sum(bids)`): then any bid keeps the total
/// away from `cards_dealt` and nothing is forbidden.
pub fn forbidden_number(cards_dealt: u32, bids: &BTreeMap<String, u32>, player_count: usize) -> Option<u32> {
    if player_count == 0 || bids.len() != player_count - 1 {
        return None;
    }
    let placed: u64 = bids.values().map(|&b| u64::from(b)).sum();
    u64::from(cards_dealt).checked_sub(placed).and_then(|n| u32::try_from(n).ok())
}

pub fn is_forbidden(cards_dealt: u32, bids: &BTreeMap<String, u32>, player_count: usize, new_bid: u32) -> bool {
    forbidden_number(cards_dealt, bids, player_count) == Some(new_bid)
}
