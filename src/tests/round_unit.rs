use std::collections::BTreeMap;
use ntest::test_case;
use crate::{Round, Phase, TransitionError, TransitionSuccess, ErrorKind};

const NAMES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// Helper: a fresh round for the first `player_count` of A, B, C, ...
fn setup_round(player_count: usize, cards_dealt: u32, starting_position: u32) -> Round {
    Round::new(&NAMES[..player_count], cards_dealt, starting_position).unwrap()
}

/// Helper: bid for every player in rotation order.
fn bid_all(round: &mut Round, bids: &[i32]) {
    for &bid in bids {
        let player = round.current_bidder().unwrap().to_string();
        round.place_bid(&player, bid).unwrap();
    }
}

fn map(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
    entries.iter().map(|(p, n)| (p.to_string(), *n)).collect()
}

// ── construction ──

#[test]
fn test_new_round_starts_bidding() {
    let round = setup_round(3, 5, 1);
    assert_eq!(round.players(), &["A", "B", "C"]);
    assert_eq!(round.cards_dealt(), 5);
    assert_eq!(round.starting_position(), 1);
    assert_eq!(round.phase(), Phase::Bidding);
    assert!(round.bids().is_empty());
    assert!(round.tricks_won().is_empty());
}

#[test]
fn test_new_round_rejects_bad_arguments() {
    assert_eq!(Round::new(Vec::<String>::new(), 5, 1), Err(TransitionError::EmptyRoster));
    assert_eq!(Round::new(["A", "B"], 0, 1), Err(TransitionError::InvalidCardsDealt));
    assert_eq!(Round::new(["A", "B"], 5, 0), Err(TransitionError::InvalidStartingPosition));
    assert_eq!(Round::new(["A", "A"], 5, 1), Err(TransitionError::DuplicatePlayer("A".to_string())));
}

#[test]
fn test_single_player_round_is_allowed() {
    let mut round = setup_round(1, 3, 1);
    // alone at the table, the only bid is also the last one
    assert_eq!(round.forbidden_number(), Some(3));
    assert_eq!(round.place_bid("A", 3), Err(TransitionError::ForbiddenBid { bid: 3 }));
    assert_eq!(round.place_bid("A", 2), Ok(TransitionSuccess::BiddingComplete));
}

// ── rotation ──

#[test_case(1, "A,B,C,D")]
#[test_case(2, "B,C,D,A")]
#[test_case(4, "D,A,B,C")]
#[test_case(5, "A,B,C,D")]
#[test_case(7, "C,D,A,B")]
fn test_players_in_order(starting_position: u32, expected: &str) {
    let round = setup_round(4, 5, starting_position);
    assert_eq!(round.players_in_order().join(","), expected);
    assert_eq!(round.starting_player(), &expected[..1]);
}

#[test]
fn test_current_bidder_follows_rotation() {
    let mut round = setup_round(3, 5, 2);

    assert_eq!(round.current_bidder(), Some("B"));
    round.place_bid("B", 1).unwrap();
    assert_eq!(round.current_bidder(), Some("C"));
    round.place_bid("C", 2).unwrap();
    assert_eq!(round.current_bidder(), Some("A"));
    round.place_bid("A", 0).unwrap();
    assert_eq!(round.current_bidder(), None);
}

#[test]
fn test_out_of_turn_bid_is_rejected() {
    let mut round = setup_round(3, 5, 1);
    assert_eq!(
        round.place_bid("B", 1),
        Err(TransitionError::OutOfTurn { player: "B".to_string(), expected: "A".to_string() })
    );
    round.place_bid("A", 1).unwrap();
    // bidding twice is out of turn too
    let err = round.place_bid("A", 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfTurn);
    assert_eq!(round.bids(), &map(&[("A", 1)]));
}

#[test]
fn test_last_bidder() {
    let mut round = setup_round(3, 5, 1);
    assert!(!round.is_last_bidder("A"));
    bid_all(&mut round, &[2, 1]);
    assert!(round.is_last_bidder("C"));
    assert!(!round.is_last_bidder("A"));
}

// ── bidding ──

#[test_case(0)]
#[test_case(3)]
#[test_case(5)]
fn test_place_bid_accepts_range(bid: i32) {
    let mut round = setup_round(2, 5, 1);
    assert_eq!(round.place_bid("A", bid), Ok(TransitionSuccess::Bid));
    assert_eq!(round.bid_for("A"), Some(bid as u32));
}

#[test]
fn test_place_bid_rejects_out_of_range() {
    let mut round = setup_round(2, 5, 1);
    for bid in [-1, 6, i32::MIN, i32::MAX] {
        let err = round.place_bid("A", bid).unwrap_err();
        assert_eq!(err, TransitionError::InvalidBid { bid, cards_dealt: 5 });
        assert_eq!(err.kind(), ErrorKind::InvalidBid);
    }
    assert!(round.bids().is_empty());
}

#[test]
fn test_place_bid_rejects_unknown_player() {
    let mut round = setup_round(2, 5, 1);
    let err = round.place_bid("Unknown", 1).unwrap_err();
    assert_eq!(err, TransitionError::UnknownPlayer("Unknown".to_string()));
    assert_eq!(err.kind(), ErrorKind::Argument);
}

#[test]
fn test_forbidden_number_only_for_last_bidder() {
    let mut round = setup_round(3, 5, 1);
    assert_eq!(round.forbidden_number(), None);
    round.place_bid("A", 2).unwrap();
    assert_eq!(round.forbidden_number(), None);
    round.place_bid("B", 1).unwrap();
    assert_eq!(round.forbidden_number(), Some(2));

    assert_eq!(round.place_bid("C", 2), Err(TransitionError::ForbiddenBid { bid: 2 }));
    assert_eq!(round.bid_for("C"), None);
    assert_eq!(round.phase(), Phase::Bidding);

    assert_eq!(round.place_bid("C", 0), Ok(TransitionSuccess::BiddingComplete));
    assert_eq!(round.phase(), Phase::Playing);
}

#[test]
fn test_over_bid_table_forbids_nothing() {
    let mut round = setup_round(3, 5, 1);
    bid_all(&mut round, &[4, 3]);
    assert_eq!(round.forbidden_number(), None);
    round.place_bid("C", 0).unwrap();
    assert_eq!(round.phase(), Phase::Playing);
}

#[test]
fn test_bid_in_playing_phase_is_rejected() {
    let mut round = setup_round(2, 5, 1);
    bid_all(&mut round, &[2, 1]);
    let err = round.place_bid("A", 1).unwrap_err();
    assert_eq!(err, TransitionError::InvalidPhase { expected: Phase::Bidding, actual: Phase::Playing });
}

#[test]
fn test_can_change_bid() {
    let mut round = setup_round(2, 5, 1);
    assert!(!round.can_change_bid("A"));
    round.place_bid("A", 2).unwrap();
    assert!(round.can_change_bid("A"));
    round.place_bid("B", 1).unwrap();
    assert!(!round.can_change_bid("A"));
}

// ── Scenario A: 4 players, 5 cards, start = 1 ──

#[test]
fn test_scenario_forbidden_last_bid() {
    let mut round = setup_round(4, 5, 1);
    round.place_bid("A", 2).unwrap();
    round.place_bid("B", 1).unwrap();
    round.place_bid("C", 1).unwrap();

    assert_eq!(round.current_bidder(), Some("D"));
    assert_eq!(round.forbidden_number(), Some(1));
    let err = round.place_bid("D", 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ForbiddenBid);
    assert_eq!(round.phase(), Phase::Bidding);

    assert_eq!(round.place_bid("D", 0), Ok(TransitionSuccess::BiddingComplete));
    assert_eq!(round.phase(), Phase::Playing);
}

// ── tricks ──

#[test]
fn test_tricks_rejected_while_bidding() {
    let mut round = setup_round(2, 5, 1);
    assert_eq!(
        round.record_tricks("A", 2),
        Err(TransitionError::InvalidPhase { expected: Phase::Playing, actual: Phase::Bidding })
    );
}

#[test]
fn test_tricks_out_of_range() {
    let mut round = setup_round(2, 5, 1);
    bid_all(&mut round, &[2, 1]);
    for tricks in [-1, 6] {
        let err = round.record_tricks("A", tricks).unwrap_err();
        assert_eq!(err, TransitionError::InvalidTrickCount { tricks, cards_dealt: 5 });
        assert_eq!(err.kind(), ErrorKind::InvalidTrickCount);
    }
    assert!(round.tricks_won().is_empty());
}

#[test]
fn test_tricks_unknown_player() {
    let mut round = setup_round(2, 5, 1);
    bid_all(&mut round, &[2, 1]);
    assert_eq!(round.record_tricks("Z", 1), Err(TransitionError::UnknownPlayer("Z".to_string())));
}

#[test]
fn test_record_tricks_overwrites_while_playing() {
    let mut round = setup_round(3, 5, 1);
    bid_all(&mut round, &[2, 1, 1]);
    assert_eq!(round.record_tricks("A", 1), Ok(TransitionSuccess::Tricks));
    assert_eq!(round.record_tricks("A", 2), Ok(TransitionSuccess::Tricks));
    assert_eq!(round.tricks_for("A"), Some(2));
    assert_eq!(round.phase(), Phase::Playing);
}

#[test]
fn test_tricks_rejected_once_complete() {
    let mut round = setup_round(2, 5, 1);
    bid_all(&mut round, &[2, 1]);
    round.record_tricks("A", 2).unwrap();
    round.record_tricks("B", 3).unwrap();
    assert_eq!(
        round.record_tricks("A", 1),
        Err(TransitionError::InvalidPhase { expected: Phase::Playing, actual: Phase::Complete })
    );
}

// ── Scenarios B and C ──

#[test]
fn test_scenario_valid_two_player_round() {
    let mut round = setup_round(2, 5, 1);
    round.place_bid("A", 2).unwrap();
    assert_eq!(round.place_bid("B", 1), Ok(TransitionSuccess::BiddingComplete));
    assert_eq!(round.phase(), Phase::Playing);

    assert_eq!(round.record_tricks("A", 2), Ok(TransitionSuccess::Tricks));
    assert_eq!(round.record_tricks("B", 3), Ok(TransitionSuccess::RoundComplete));
    assert_eq!(round.phase(), Phase::Complete);

    assert_eq!(round.points_for("A"), Some(14));
    assert_eq!(round.points_for("B"), Some(3));
    assert!(round.is_valid());
    assert!(!round.is_invalid());
}

#[test]
fn test_scenario_trick_sum_mismatch_is_complete_but_invalid() {
    let mut round = setup_round(2, 5, 1);
    bid_all(&mut round, &[2, 1]);
    round.record_tricks("A", 2).unwrap();
    round.record_tricks("B", 2).unwrap();

    assert_eq!(round.phase(), Phase::Complete);
    assert_eq!(round.total_tricks(), 4);
    assert!(!round.is_valid());
    assert!(round.is_invalid());
}

#[test]
fn test_points_absent_until_both_known() {
    let mut round = setup_round(2, 5, 1);
    assert_eq!(round.points_for("A"), None);
    bid_all(&mut round, &[2, 1]);
    assert_eq!(round.points_for("A"), None);
    round.record_tricks("A", 0).unwrap();
    assert_eq!(round.points_for("A"), Some(0));
    assert_eq!(round.points_for("B"), None);
}

#[test]
fn test_points_for_largest_hand() {
    let mut round = setup_round(2, u32::MAX, 1);
    round.place_bid("A", i32::MAX).unwrap();
    round.place_bid("B", 0).unwrap();
    round.record_tricks("A", i32::MAX).unwrap();
    round.record_tricks("B", 0).unwrap();

    // 10 + 2 * (2^31 - 1) no longer fits in a u32
    assert_eq!(round.points_for("A"), Some(4_294_967_304));
    assert_eq!(round.points_for("B"), Some(10));
}

#[test]
fn test_unfinished_round_is_neither_valid_nor_invalid() {
    let mut round = setup_round(2, 5, 1);
    bid_all(&mut round, &[2, 1]);
    assert!(!round.is_valid());
    assert!(!round.is_invalid());
}

// ── corrections ──

#[test]
fn test_correct_bid_overwrites_in_any_phase() {
    let mut round = setup_round(2, 5, 1);
    bid_all(&mut round, &[2, 1]);
    round.record_tricks("A", 2).unwrap();
    round.record_tricks("B", 3).unwrap();

    // A bid 2, so B may not correct to 3
    assert_eq!(round.correct_bid("B", 3), Err(TransitionError::ForbiddenBid { bid: 3 }));
    assert_eq!(round.correct_bid("B", 4), Ok(TransitionSuccess::Corrected));
    assert_eq!(round.bid_for("B"), Some(4));
    assert_eq!(round.phase(), Phase::Complete);
    assert_eq!(round.points_for("B"), Some(3));

    assert_eq!(round.correct_bid("A", 2), Ok(TransitionSuccess::Corrected));
    assert_eq!(round.points_for("A"), Some(14));
}

#[test]
fn test_last_bid_completes_round_with_corrected_tricks() {
    let mut round = setup_round(2, 5, 1);
    // trick counts entered early through corrections
    assert_eq!(round.correct_tricks("A", 2), Ok(TransitionSuccess::Corrected));
    assert_eq!(round.correct_tricks("B", 3), Ok(TransitionSuccess::Corrected));
    assert_eq!(round.phase(), Phase::Bidding);

    round.place_bid("A", 2).unwrap();
    assert_eq!(round.place_bid("B", 1), Ok(TransitionSuccess::RoundComplete));
    assert_eq!(round.phase(), Phase::Complete);
    assert!(round.is_valid());

    let restored = Round::from_value(round.to_value().unwrap()).unwrap();
    assert_eq!(restored, round);
}

#[test]
fn test_correct_bid_keeps_forbidden_rule() {
    let mut round = setup_round(3, 5, 1);
    bid_all(&mut round, &[2, 1, 1]);
    // others bid 1 + 1, so A may not make the total 5
    assert_eq!(round.correct_bid("A", 3), Err(TransitionError::ForbiddenBid { bid: 3 }));
    assert_eq!(round.bid_for("A"), Some(2));
    assert_eq!(round.correct_bid("A", 4), Ok(TransitionSuccess::Corrected));
    assert_ne!(round.total_bids(), 5);
}

#[test]
fn test_correct_bid_validates_range_and_player() {
    let mut round = setup_round(2, 5, 1);
    assert_eq!(round.correct_bid("A", 6), Err(TransitionError::InvalidBid { bid: 6, cards_dealt: 5 }));
    assert_eq!(round.correct_bid("A", -1), Err(TransitionError::InvalidBid { bid: -1, cards_dealt: 5 }));
    assert_eq!(round.correct_bid("Z", 1), Err(TransitionError::UnknownPlayer("Z".to_string())));
}

#[test]
fn test_correct_bid_is_idempotent() {
    let mut round = setup_round(3, 5, 1);
    bid_all(&mut round, &[2, 1, 1]);
    let bids_before = round.bids().clone();

    assert_eq!(round.correct_bid("B", 1), Ok(TransitionSuccess::Corrected));
    assert_eq!(round.correct_bid("B", 1), Ok(TransitionSuccess::Corrected));
    assert_eq!(round.bids(), &bids_before);
    assert_eq!(round.phase(), Phase::Playing);
}

#[test]
fn test_correct_bid_ignores_order_and_can_finish_bidding() {
    let mut round = setup_round(2, 5, 1);
    // B bids before A through a correction
    assert_eq!(round.correct_bid("B", 2), Ok(TransitionSuccess::Corrected));
    assert_eq!(round.current_bidder(), Some("A"));
    assert_eq!(round.correct_bid("A", 3), Err(TransitionError::ForbiddenBid { bid: 3 }));
    assert_eq!(round.correct_bid("A", 1), Ok(TransitionSuccess::BiddingComplete));
    assert_eq!(round.phase(), Phase::Playing);
}

#[test]
fn test_correct_tricks_fixes_invalid_round() {
    let mut round = setup_round(2, 5, 1);
    bid_all(&mut round, &[2, 1]);
    round.record_tricks("A", 2).unwrap();
    round.record_tricks("B", 2).unwrap();
    assert!(round.is_invalid());

    assert_eq!(round.correct_tricks("B", 3), Ok(TransitionSuccess::Corrected));
    assert!(round.is_valid());
}

#[test]
fn test_correct_tricks_completes_playing_round() {
    let mut round = setup_round(2, 5, 1);
    bid_all(&mut round, &[2, 1]);
    round.record_tricks("A", 2).unwrap();
    assert_eq!(round.correct_tricks("B", 3), Ok(TransitionSuccess::RoundComplete));
    assert_eq!(round.phase(), Phase::Complete);
}

#[test]
fn test_correct_tricks_while_bidding_does_not_skip_phases() {
    let mut round = setup_round(2, 5, 1);
    round.correct_tricks("A", 2).unwrap();
    round.correct_tricks("B", 3).unwrap();
    assert_eq!(round.phase(), Phase::Bidding);

    round.place_bid("A", 2).unwrap();
    // last bid walks through playing straight to complete, trick counts are all in
    assert_eq!(round.correct_bid("B", 1), Ok(TransitionSuccess::RoundComplete));
    assert!(round.is_valid());
}

#[test]
fn test_correct_tricks_validates_range() {
    let mut round = setup_round(2, 5, 1);
    assert_eq!(round.correct_tricks("A", 6), Err(TransitionError::InvalidTrickCount { tricks: 6, cards_dealt: 5 }));
    assert!(round.tricks_won().is_empty());
}

#[test]
fn test_rejected_operations_leave_state_unchanged() {
    let mut round = setup_round(3, 5, 1);
    bid_all(&mut round, &[2, 1]);
    let before = round.clone();

    let _ = round.place_bid("C", 2);
    let _ = round.place_bid("C", 9);
    let _ = round.place_bid("A", 1);
    let _ = round.record_tricks("A", 1);
    let _ = round.correct_tricks("Z", 1);
    let _ = round.correct_bid("C", 2);

    assert_eq!(round, before);
}
