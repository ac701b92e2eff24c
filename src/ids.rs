use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use sqids::Sqids;
use uuid::Uuid;

/// Identifier a [`GameStore`](trait.GameStore.html) assigns to a saved game.
///
/// Besides the uuid form, a game can be shared by a short code such as `"Uk3Xa9"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(Uuid);

fn sqids_instance() -> Option<Sqids> {
    Sqids::builder().min_length(6).build().ok()
}

impl GameId {
    pub fn new() -> GameId {
        GameId(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> GameId {
        GameId(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn short_code(&self) -> String {
        let (high, low) = self.0.as_u64_pair();
        sqids_instance()
            .and_then(|s| s.encode(&[high, low]).ok())
            .unwrap_or_else(|| self.0.simple().to_string())
    }

    pub fn from_short_code(code: &str) -> Option<GameId> {
        let nums = sqids_instance()?.decode(code);
        match nums.as_slice() {
            [high, low] => Some(GameId(Uuid::from_u64_pair(*high, *low))),
            _ => None,
        }
    }
}

impl Default for GameId {
    fn default() -> GameId {
        GameId::new()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<GameId, uuid::Error> {
        Uuid::parse_str(s).map(GameId)
    }
}
