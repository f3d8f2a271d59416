//! Persistence for the question collection and the score ledger.
//!
//! The raw layer is a small key-value store holding opaque JSON blobs. On
//! top of it, `QuizStorage` knows the two keys, validates what it reads and
//! never lets a storage failure reach the caller.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::ledger::ScoreLedger;
use crate::models::QuestionBank;

const QUESTIONS_KEY: &str = "questions";
const SCORES_KEY: &str = "scores";

/// Synchronous key-value storage of serialized blobs.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory: {:?}", dir))?;
        Ok(Self { dir })
    }

    /// Get default storage location.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zhuyin-quiz")
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // Write beside the target and rename so a crash never leaves half a blob.
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|source| StoreError::Write {
                key: key.to_string(),
                source,
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Write {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Volatile store, used when nothing should touch the disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Typed access to the quiz data held in a `KeyValueStore`.
pub struct QuizStorage {
    store: Box<dyn KeyValueStore>,
}

impl QuizStorage {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    pub fn load_questions(&self) -> QuestionBank {
        self.load_or(QUESTIONS_KEY, QuestionBank::default(), QuestionBank::is_well_formed)
    }

    pub fn save_questions(&mut self, bank: &QuestionBank) {
        self.save(QUESTIONS_KEY, bank);
    }

    pub fn load_ledger(&self) -> ScoreLedger {
        self.load_or(SCORES_KEY, ScoreLedger::default(), ScoreLedger::is_well_formed)
    }

    pub fn save_ledger(&mut self, ledger: &ScoreLedger) {
        self.save(SCORES_KEY, ledger);
    }

    /// Forget the stored ledger entirely.
    pub fn clear_ledger(&mut self) {
        if let Err(e) = self.store.remove(SCORES_KEY) {
            tracing::warn!("could not clear stored scores: {}", e);
        }
    }

    /// Read and validate one key. Anything missing, unreadable or off-schema
    /// yields `default`.
    fn load_or<T, F>(&self, key: &str, default: T, valid: F) -> T
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let blob = match self.store.get(key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!("{}; starting with an empty value", e);
                return default;
            }
        };

        match serde_json::from_str::<T>(&blob) {
            Ok(value) if valid(&value) => value,
            Ok(_) => {
                tracing::warn!(key, "stored value violates schema invariants, ignoring it");
                default
            }
            Err(e) => {
                tracing::warn!(key, "malformed stored value ({}), ignoring it", e);
                default
            }
        }
    }

    /// Serialize and write one key. Failures are logged and dropped; the
    /// in-memory value stays authoritative for the session.
    fn save<T: Serialize>(&mut self, key: &str, value: &T) {
        let blob = match serde_json::to_string(value) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(key, "could not serialize value: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(key, &blob) {
            tracing::warn!("{}; change kept in memory only", e);
        }
    }
}
