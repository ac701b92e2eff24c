use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use crate::{Game, Player};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: Player,
    pub games_played: u32,
    pub games_won: u32,
    pub total_points: u64,
}

/// Standings across many games. Players are matched by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Games still in progress count towards points and games played, but not wins.
    pub fn from_games<'a, I>(games: I) -> Leaderboard
    where
        I: IntoIterator<Item = &'a Game>,
    {
        let mut by_player: HashMap<Player, LeaderboardEntry> = HashMap::new();
        for game in games {
            let winner = game.winner();
            for player in game.players() {
                let entry = by_player.entry(player.clone()).or_insert_with(|| LeaderboardEntry {
                    player: player.clone(),
                    games_played: 0,
                    games_won: 0,
                    total_points: 0,
                });
                entry.games_played += 1;
                entry.total_points = entry.total_points.saturating_add(game.points_for(player));
                if winner == Some(player.as_str()) {
                    entry.games_won += 1;
                }
            }
        }

        let mut entries: Vec<LeaderboardEntry> = by_player.into_values().collect();
        entries.sort_by(|a, b| {
            b.games_won
                .cmp(&a.games_won)
                .then(b.total_points.cmp(&a.total_points))
                .then_with(|| a.player.cmp(&b.player))
        });
        Leaderboard { entries }
    }

    /// Entries ranked by wins, then points, then name.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn get(&self, player: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.player == player)
    }

    pub fn leader(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }
}
