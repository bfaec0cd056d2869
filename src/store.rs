// src/store.rs
// Storage for player accounts and saved games: the registry traits used by the game,
// a JSON file backend and an in-memory backend.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::error::GameResult;
use crate::player::{Identity, PlayerRecord};
use crate::record::GameRecord;

/// Saved games keyed by game ID.
pub trait GameRegistry {
    fn load_all(&self) -> GameResult<Vec<GameRecord>>;

    /// Replace every stored game with `records`.
    fn store_all(&mut self, records: Vec<GameRecord>) -> GameResult<()>;

    fn exists(&self, id: &str) -> GameResult<bool> {
        Ok(self.load_all()?.iter().any(|record| record.id == id))
    }

    /// First `<prefix><n>`, n = 1, 2, ..., not used by a saved game.
    fn next_unused_id(&self, prefix: &str) -> GameResult<String> {
        let records = self.load_all()?;
        let used: HashSet<&str> = records.iter().map(|record| record.id.as_str()).collect();
        let mut n: u64 = 1;
        loop {
            let candidate = format!("{prefix}{n}");
            if !used.contains(candidate.as_str()) {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    /// Insert `record`, replacing a stored game with the same ID in place.
    fn save(&mut self, record: &GameRecord) -> GameResult<()> {
        let mut records = self.load_all()?;
        match records.iter_mut().find(|stored| stored.id == record.id) {
            Some(stored) => *stored = record.clone(),
            None => records.push(record.clone()),
        }
        self.store_all(records)
    }

    /// Drop every saved game matching `predicate` and return how many were removed.
    fn remove_where(&mut self, predicate: &dyn Fn(&GameRecord) -> bool) -> GameResult<usize> {
        let mut records = self.load_all()?;
        let before = records.len();
        records.retain(|record| !predicate(record));
        let removed = before - records.len();
        if removed > 0 {
            self.store_all(records)?;
        }
        Ok(removed)
    }
}

/// Player accounts with their statistics.
pub trait PlayerStore {
    fn load_players(&self) -> GameResult<Vec<PlayerRecord>>;

    fn store_players(&mut self, records: Vec<PlayerRecord>) -> GameResult<()>;

    fn find_player(&self, username: &str) -> GameResult<Option<PlayerRecord>> {
        Ok(self
            .load_players()?
            .into_iter()
            .find(|record| record.username == username))
    }

    fn add_player(&mut self, record: PlayerRecord) -> GameResult<()> {
        let mut records = self.load_players()?;
        records.push(record);
        self.store_players(records)
    }

    /// Remove stale copies of the given players and append the current ones.
    fn upsert_players(&mut self, current: &[PlayerRecord]) -> GameResult<()> {
        let mut records = self.load_players()?;
        records.retain(|stored| !current.iter().any(|fresh| fresh.same_identity(stored)));
        records.extend_from_slice(current);
        self.store_players(records)
    }
}

/// Which file a kind of record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Account,
    Game,
}

impl RecordKind {
    pub fn file_name(self) -> &'static str {
        match self {
            RecordKind::Account => "Account.json",
            RecordKind::Game => "Game.json",
        }
    }
}

/// Stores each record kind as a JSON array in its own file under `data_dir`.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    /// Open the store, creating the data directory and empty files on first use.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> GameResult<Self> {
        let store = Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        };

        if !store.data_dir.exists() {
            info!("Creating data directory {}", store.data_dir.display());
            fs::create_dir_all(&store.data_dir)
                .inspect_err(|e| error!("Error creating data directory: {e}"))?;
        }
        for kind in [RecordKind::Account, RecordKind::Game] {
            let path = store.path_for(kind);
            if !path.exists() {
                fs::write(&path, "[]")?;
            }
        }
        info!("Data directory ready: {}", store.data_dir.display());
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, kind: RecordKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    fn read<T: DeserializeOwned>(&self, kind: RecordKind) -> GameResult<Vec<T>> {
        let path = self.path_for(kind);
        if !path.exists() {
            info!("File not found: {}", path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .inspect_err(|e| error!("Error loading {}: {e}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records = serde_json::from_str(&content)
            .inspect_err(|e| error!("Error parsing {}: {e}", path.display()))?;
        Ok(records)
    }

    fn write<T: Serialize>(&self, kind: RecordKind, records: &[T]) -> GameResult<()> {
        let path = self.path_for(kind);
        let content = serde_json::to_string_pretty(records)?;
        fs::write(&path, content).inspect_err(|e| error!("Failed to write {}: {e}", path.display()))?;
        info!("Data saved to {}", path.display());
        Ok(())
    }
}

impl GameRegistry for JsonStore {
    fn load_all(&self) -> GameResult<Vec<GameRecord>> {
        self.read(RecordKind::Game)
    }

    fn store_all(&mut self, records: Vec<GameRecord>) -> GameResult<()> {
        self.write(RecordKind::Game, &records)
    }
}

impl PlayerStore for JsonStore {
    fn load_players(&self) -> GameResult<Vec<PlayerRecord>> {
        self.read(RecordKind::Account)
    }

    fn store_players(&mut self, records: Vec<PlayerRecord>) -> GameResult<()> {
        self.write(RecordKind::Account, &records)
    }
}

/// Keeps everything in memory; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    players: Vec<PlayerRecord>,
    games: Vec<GameRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameRegistry for MemoryStore {
    fn load_all(&self) -> GameResult<Vec<GameRecord>> {
        Ok(self.games.clone())
    }

    fn store_all(&mut self, records: Vec<GameRecord>) -> GameResult<()> {
        self.games = records;
        Ok(())
    }
}

impl PlayerStore for MemoryStore {
    fn load_players(&self) -> GameResult<Vec<PlayerRecord>> {
        Ok(self.players.clone())
    }

    fn store_players(&mut self, records: Vec<PlayerRecord>) -> GameResult<()> {
        self.players = records;
        Ok(())
    }
}
