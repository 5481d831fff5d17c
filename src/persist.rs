use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::{MatchState, Player, Snapshot};

pub const STORAGE_KEY: &str = "tennisScoreState";
const DATA_DIR: &str = "courtside_score";

/// On-disk record. Field names are the wire contract shared with older saves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub player_a_name: String,
    pub player_b_name: String,
    pub point_a: u32,
    pub point_b: u32,
    pub games_a: u32,
    pub games_b: u32,
    pub sets_a: u32,
    pub sets_b: u32,
    pub server: Player,
    pub match_over: bool,
    pub history: Vec<Snapshot>,
}

impl PersistedState {
    pub fn from_state(state: &MatchState) -> Self {
        Self {
            player_a_name: state.player_a_name.clone(),
            player_b_name: state.player_b_name.clone(),
            point_a: state.point_a,
            point_b: state.point_b,
            games_a: state.games_a,
            games_b: state.games_b,
            sets_a: state.sets_a,
            sets_b: state.sets_b,
            server: state.server,
            match_over: state.match_over,
            history: state.history().iter().copied().collect(),
        }
    }

    pub fn current(&self) -> Snapshot {
        Snapshot {
            point_a: self.point_a,
            point_b: self.point_b,
            games_a: self.games_a,
            games_b: self.games_b,
            sets_a: self.sets_a,
            sets_b: self.sets_b,
            server: self.server,
            match_over: self.match_over,
        }
    }

    /// Every snapshot, live and historic, is one the engine could have produced.
    pub fn is_settled(&self) -> bool {
        self.current().is_settled() && self.history.iter().all(Snapshot::is_settled)
    }

    pub fn apply_to(self, state: &mut MatchState) {
        let current = self.current();
        state.player_a_name = self.player_a_name;
        state.player_b_name = self.player_b_name;
        state.load_scores(current, self.history);
    }
}

/// Byte store keyed by string, the only thing persistence needs from the host.
pub trait ScoreStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn insert(&mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(key.into(), bytes.into());
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// One JSON file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ScoreStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("read {}", path.display())),
        }
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create {}", self.dir.display()))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("rename into {}", path.display()))?;
        Ok(())
    }
}

/// Reads the saved record. Anything missing, unreadable or undecodable comes
/// back as `None` so the caller falls back to a fresh board.
pub fn load_state(store: &impl ScoreStore) -> Option<PersistedState> {
    let bytes = match store.read(STORAGE_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            tracing::debug!("no saved score under {STORAGE_KEY}");
            return None;
        }
        Err(err) => {
            tracing::warn!("score store read failed: {err:#}");
            return None;
        }
    };
    match serde_json::from_slice::<PersistedState>(&bytes) {
        Ok(saved) if !saved.is_settled() => {
            tracing::info!("ignoring saved score with unresolved games or sets");
            None
        }
        Ok(saved) => Some(saved),
        Err(err) => {
            tracing::info!("ignoring undecodable saved score: {err}");
            None
        }
    }
}

pub fn save_state(store: &mut impl ScoreStore, state: &MatchState) -> Result<()> {
    let json = serde_json::to_vec(&PersistedState::from_state(state))
        .context("failed to encode score state")?;
    store.write(STORAGE_KEY, &json)
}

/// `SCORE_DATA_DIR`, then `$XDG_DATA_HOME`, then `~/.local/share`.
pub fn default_data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("SCORE_DATA_DIR") {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    if let Ok(base) = std::env::var("XDG_DATA_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(DATA_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DATA_DIR),
    )
}
