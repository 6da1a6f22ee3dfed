//! Persisted watch state.
//!
//! The store owns the single authoritative [`WatchState`] in memory and the
//! JSON file backing it. Every mutation goes through [`StateStore::update`],
//! which works on a copy, writes the copy to disk, and only then swaps it
//! in. A failed write therefore leaves both the file and the in-memory state
//! exactly as they were.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use levelwatch_types::{LevelRecord, SchemaVersion, WatchState};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Store shared between the scheduled cycle and the command handler.
///
/// Holding the lock is the critical section: read-modify-write sequences of
/// the two never interleave.
pub type SharedStore = Arc<Mutex<StateStore>>;

/// Errors reading or writing the state file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("State file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("State file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("State file {path} has schema version {found:?}, expected major {expected}")]
    UnsupportedVersion {
        path: PathBuf,
        found: SchemaVersion,
        expected: u32,
    },
}

/// Where a fresh store takes its initial contents from when no state file
/// exists yet.
#[derive(Debug, Clone, Default)]
pub struct Seed {
    /// Names to start watching.
    pub monitored: Vec<String>,
    /// A plain `{ "name": level }` JSON file from an older deployment.
    pub legacy_levels: Option<PathBuf>,
}

/// The persisted [`WatchState`] plus the path it lives at.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    state: WatchState,
}

impl StateStore {
    /// Load the state file at `path`, or start from `seed` if it does not exist.
    ///
    /// A seeded store is written out immediately so the next start reads it
    /// back instead of seeding again.
    pub fn open(path: impl Into<PathBuf>, seed: &Seed) -> Result<Self, StoreError> {
        let path = path.into();

        if path.exists() {
            let state = read_state(&path)?;
            info!(
                "Loaded state from {}: {} monitored, {} levels",
                path.display(),
                state.monitored.len(),
                state.levels.len()
            );
            return Ok(Self { path, state });
        }

        let mut state = WatchState::with_monitored(
            seed.monitored
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty()),
        );
        if let Some(legacy) = &seed.legacy_levels {
            if legacy.exists() {
                state.levels = read_legacy_levels(legacy)?;
                info!(
                    "Imported {} levels from {}",
                    state.levels.len(),
                    legacy.display()
                );
            }
        }

        write_state(&path, &state)?;
        info!(
            "Created state file {} with {} monitored",
            path.display(),
            state.monitored.len()
        );
        Ok(Self { path, state })
    }

    /// Wrap the store for sharing between tasks.
    pub fn shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current committed state.
    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// Atomically apply `f` to the state.
    ///
    /// The closure mutates a copy. If the copy differs from the current
    /// state it is persisted and then becomes current; if persisting fails
    /// the error is returned and nothing changes. The closure's return value
    /// is passed through on success.
    pub fn update<T, F>(&mut self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut WatchState) -> T,
    {
        let mut next = self.state.clone();
        let result = f(&mut next);

        if next != self.state {
            write_state(&self.path, &next)?;
            self.state = next;
            debug!("Persisted state to {}", self.path.display());
        }

        Ok(result)
    }

    /// Re-read the file from disk, replacing the in-memory copy.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.state = read_state(&self.path)?;
        Ok(())
    }
}

fn read_state(path: &Path) -> Result<WatchState, StoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let state: WatchState = serde_json::from_str(&content).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if !state.version.is_compatible() {
        return Err(StoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: state.version,
            expected: SchemaVersion::current().major,
        });
    }

    Ok(state)
}

fn read_legacy_levels(path: &Path) -> Result<LevelRecord, StoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let levels: BTreeMap<String, u32> =
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(levels.into_iter().collect())
}

/// Write `state` to a temp file next to `path` and rename it into place.
fn write_state(path: &Path, state: &WatchState) -> Result<(), StoreError> {
    let io_err = |source: io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(state).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(io_err)?;
            parent
        }
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(json.as_bytes()).map_err(io_err)?;
    tmp.write_all(b"\n").map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
