use podrida::{Game, TransitionError};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

const PLAYERS: [&str; 4] = ["Pedro", "Auro", "Leon", "Sofia"];

/// Split `cards` tricks randomly between `players` seats.
fn deal_tricks<R: Rng>(rng: &mut R, cards: u32, players: usize) -> Vec<i32> {
    let mut tricks = vec![0; players];
    for _ in 0..cards {
        tricks[rng.gen_range(0..players)] += 1;
    }
    tricks
}

fn play_round<R: Rng>(rng: &mut R, game: &mut Game, cards: u32, has_trump: bool) -> Result<(), TransitionError> {
    game.create_round(cards, has_trump)?;
    let number = game.rounds().len();

    while let Some(player) = game.round(number).and_then(|r| r.current_bidder()).map(String::from) {
        let forbidden = game.round(number).and_then(|r| r.forbidden_number());
        let choices: Vec<i32> = (0..=cards)
            .filter(|&b| Some(b) != forbidden)
            .filter_map(|b| i32::try_from(b).ok())
            .collect();
        let bid = choices.choose(rng).copied().unwrap_or(0);
        game.place_bid(number, &player, bid)?;
    }

    let players = game.players().to_vec();
    for (player, tricks) in players.iter().zip(deal_tricks(rng, cards, players.len())) {
        game.record_tricks(number, player, tricks)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut rng = thread_rng();
    let mut game = Game::new(PLAYERS)?;

    // up to the largest trumped hand and back down again
    let max = game.max_cards_per_player(true);
    let schedule: Vec<u32> = (1..=max).chain((1..max).rev()).collect();
    for cards in schedule {
        play_round(&mut rng, &mut game, cards, true)?;
    }
    let full_deck = game.max_cards_per_player(false);
    play_round(&mut rng, &mut game, full_deck, false)?;

    println!("{} rounds, valid: {}", game.rounds().len(), game.is_valid());
    for (player, points) in game.standings() {
        println!("{:>8} {:>4}", player, points);
    }
    if let Some(winner) = game.winner() {
        println!("Winner: {}", winner);
    }
    println!("{}", serde_json::to_string_pretty(&game)?);
    Ok(())
}
