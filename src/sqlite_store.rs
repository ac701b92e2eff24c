use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use rusqlite::{Connection, OptionalExtension, params};
use crate::ids::GameId;
use crate::storage::{GameStore, StorageError, StoredGame};
use crate::Game;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS games (
    id TEXT PRIMARY KEY,
    data TEXT NOT NULL,
    version INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);";

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

/// SQLite-backed persistence for games. Each row holds the game's JSON record.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

fn epoch_secs_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

fn to_db_version(version: u64) -> Result<i64, StorageError> {
    i64::try_from(version).map_err(|e| StorageError::Database(e.to_string()))
}

fn from_db_version(version: i64) -> Result<u64, StorageError> {
    u64::try_from(version).map_err(|e| StorageError::Database(e.to_string()))
}

impl SqliteStore {
    /// Open (or create) a SQLite database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        log::info!("Opening game storage at: {:?}", path.as_ref());
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        log::debug!("Creating in-memory game storage");
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn: Mutex::new(conn) })
    }

    fn stored_version(conn: &Connection, id: GameId) -> Result<Option<u64>, StorageError> {
        let version: Option<i64> = conn
            .query_row("SELECT version FROM games WHERE id = ?1", params![id.to_string()], |row| row.get(0))
            .optional()?;
        version.map(from_db_version).transpose()
    }
}

impl GameStore for SqliteStore {
    fn insert(&self, game: &Game) -> Result<GameId, StorageError> {
        let json = game.to_json()?;
        let id = GameId::new();
        let now = epoch_secs_now();
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO games (id, data, version, created_at, updated_at) VALUES (?1, ?2, 1, ?3, ?3)",
            params![id.to_string(), json, now],
        )?;
        log::info!("Game {} saved to storage (new)", id);
        Ok(id)
    }

    fn load(&self, id: GameId) -> Result<StoredGame, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let row: Option<(String, i64)> = conn
            .query_row(
                "SELECT data, version FROM games WHERE id = ?1",
                params![id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (json, version) = row.ok_or_else(|| {
            log::warn!("Game {} not found in storage", id);
            StorageError::GameNotFound(id)
        })?;
        let game = Game::from_json(&json)?;
        log::debug!("Game {} loaded from storage", id);
        Ok(StoredGame { id, version: from_db_version(version)?, game })
    }

    fn save(&self, id: GameId, game: &Game, expected_version: u64) -> Result<u64, StorageError> {
        let json = game.to_json()?;
        let next_version = expected_version + 1;
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let updated = conn.execute(
            "UPDATE games SET data = ?1, version = ?2, updated_at = ?3 WHERE id = ?4 AND version = ?5",
            params![json, to_db_version(next_version)?, epoch_secs_now(), id.to_string(), to_db_version(expected_version)?],
        )?;

        if updated == 0 {
            return match SqliteStore::stored_version(&conn, id)? {
                Some(found) => {
                    log::warn!("Version conflict saving game {}: expected {}, found {}", id, expected_version, found);
                    Err(StorageError::VersionConflict { id, expected: expected_version, found })
                },
                None => Err(StorageError::GameNotFound(id)),
            };
        }
        log::debug!("Game {} updated in storage (version {})", id, next_version);
        Ok(next_version)
    }

    fn delete(&self, id: GameId) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let deleted = conn.execute("DELETE FROM games WHERE id = ?1", params![id.to_string()])?;
        if deleted == 0 {
            log::warn!("Attempted to delete non-existent game {} from storage", id);
            return Err(StorageError::GameNotFound(id));
        }
        log::info!("Game {} deleted from storage", id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<GameId>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut stmt = conn.prepare("SELECT id FROM games ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut ids = Vec::new();
        for row in rows {
            let raw = row?;
            match raw.parse::<GameId>() {
                Ok(id) => ids.push(id),
                Err(e) => {
                    log::error!("Failed to parse game id from database: {} - {}", raw, e);
                    return Err(StorageError::Database(format!("bad game id {raw:?}")));
                },
            }
        }
        log::debug!("Found {} games in storage", ids.len());
        Ok(ids)
    }
}
