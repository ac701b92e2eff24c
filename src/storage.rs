//! Persistence boundary. The engine itself holds no registry of games: callers construct
//! [`Game`](../struct.Game.html) values and hand them to a store they own.
//!
//! Stores keep the serialized record, never a live object, and version every save.
//! Two writers that loaded the same version can't both save: the second gets
//! [`StorageError::VersionConflict`] and must reload and reapply its edit.

use std::collections::HashMap;
use std::sync::RwLock;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::ids::GameId;
use crate::Game;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Error: Could not (de)serialize game: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Error: Database failure: {0}")]
    Database(String),
    #[error("Error: Game {0} not found.")]
    GameNotFound(GameId),
    #[error("Error: Game {id} was modified concurrently (expected version {expected}, found {found}).")]
    VersionConflict { id: GameId, expected: u64, found: u64 },
    #[error("Error: Store lock poisoned.")]
    LockPoisoned,
}

/// A game as loaded from a store, with the version to pass back to [`GameStore::save`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredGame {
    pub id: GameId,
    pub version: u64,
    pub game: Game,
}

pub trait GameStore {
    /// Persist a new game under a fresh id, at version 1.
    fn insert(&self, game: &Game) -> Result<GameId, StorageError>;

    fn load(&self, id: GameId) -> Result<StoredGame, StorageError>;

    /// Overwrite the game if it is still at `expected_version`. Returns the new version.
    fn save(&self, id: GameId, game: &Game, expected_version: u64) -> Result<u64, StorageError>;

    fn delete(&self, id: GameId) -> Result<(), StorageError>;

    fn list(&self) -> Result<Vec<GameId>, StorageError>;

    /// Load, apply `edit`, and save, in one read-modify-write cycle.
    ///
    /// A rejected edit leaves the stored game untouched and its error is returned as `Ok(Err(_))`.
    fn update<T, E, F>(&self, id: GameId, edit: F) -> Result<Result<T, E>, StorageError>
    where
        F: FnOnce(&mut Game) -> Result<T, E>,
        Self: Sized,
    {
        let mut stored = self.load(id)?;
        match edit(&mut stored.game) {
            Ok(value) => {
                self.save(id, &stored.game, stored.version)?;
                Ok(Ok(value))
            },
            Err(e) => Ok(Err(e)),
        }
    }
}

struct Entry {
    version: u64,
    data: String,
}

/// In-process store, mostly for tests and single-process tools.
#[derive(Default)]
pub struct MemoryStore {
    games: RwLock<HashMap<GameId, Entry>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn count(&self) -> Result<usize, StorageError> {
        Ok(self.games.read().map_err(|_| StorageError::LockPoisoned)?.len())
    }
}

impl GameStore for MemoryStore {
    fn insert(&self, game: &Game) -> Result<GameId, StorageError> {
        let data = game.to_json()?;
        let id = GameId::new();
        let mut games = self.games.write().map_err(|_| StorageError::LockPoisoned)?;
        games.insert(id, Entry { version: 1, data });
        log::info!("Game {} saved to memory store (new)", id);
        Ok(id)
    }

    fn load(&self, id: GameId) -> Result<StoredGame, StorageError> {
        let games = self.games.read().map_err(|_| StorageError::LockPoisoned)?;
        let entry = games.get(&id).ok_or_else(|| {
            log::warn!("Game {} not found in memory store", id);
            StorageError::GameNotFound(id)
        })?;
        let game = Game::from_json(&entry.data)?;
        Ok(StoredGame { id, version: entry.version, game })
    }

    fn save(&self, id: GameId, game: &Game, expected_version: u64) -> Result<u64, StorageError> {
        let data = game.to_json()?;
        let mut games = self.games.write().map_err(|_| StorageError::LockPoisoned)?;
        let entry = games.get_mut(&id).ok_or(StorageError::GameNotFound(id))?;
        if entry.version != expected_version {
            log::warn!("Version conflict saving game {}: expected {}, found {}", id, expected_version, entry.version);
            return Err(StorageError::VersionConflict { id, expected: expected_version, found: entry.version });
        }
        entry.version += 1;
        entry.data = data;
        log::debug!("Game {} updated in memory store (version {})", id, entry.version);
        Ok(entry.version)
    }

    fn delete(&self, id: GameId) -> Result<(), StorageError> {
        let mut games = self.games.write().map_err(|_| StorageError::LockPoisoned)?;
        if games.remove(&id).is_none() {
            log::warn!("Attempted to delete non-existent game {}", id);
            return Err(StorageError::GameNotFound(id));
        }
        log::info!("Game {} deleted from memory store", id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<GameId>, StorageError> {
        let games = self.games.read().map_err(|_| StorageError::LockPoisoned)?;
        let mut ids: Vec<GameId> = games.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}
