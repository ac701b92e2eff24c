use std::collections::HashSet;
use crate::result::TransitionError;
use crate::MAX_PLAYERS;

pub const MAX_NAME_LEN: usize = 32;

/// Validate and normalize a player display name.
/// Returns the trimmed name on success.
pub fn validate_player_name(raw: &str) -> Result<String, TransitionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_name(raw, "name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(invalid_name(raw, "name must be 32 characters or fewer"));
    }
    Ok(trimmed.to_string())
}

/// Validate a whole seating order: every name valid, no repeats, at least `min_players`.
/// Order is preserved since it defines the bid rotation.
pub fn validate_roster<I, S>(raw: I, min_players: usize) -> Result<Vec<String>, TransitionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut players = Vec::new();
    for name in raw {
        let name = validate_player_name(name.as_ref())?;
        if !seen.insert(name.clone()) {
            return Err(TransitionError::DuplicatePlayer(name));
        }
        players.push(name);
    }

    if players.is_empty() {
        return Err(TransitionError::EmptyRoster);
    }
    if players.len() < min_players {
        return Err(TransitionError::TooFewPlayers { count: players.len(), min: min_players });
    }
    Ok(players)
}

/// Number of seats at a game table, rejecting rosters too large to deal to.
pub fn seat_count(players: &[String]) -> Result<u32, TransitionError> {
    u32::try_from(players.len())
        .ok()
        .filter(|&seats| seats <= MAX_PLAYERS)
        .ok_or(TransitionError::TooManyPlayers { count: players.len(), max: MAX_PLAYERS })
}

fn invalid_name(raw: &str, reason: &str) -> TransitionError {
    TransitionError::InvalidPlayerName { name: raw.to_string(), reason: reason.to_string() }
}
