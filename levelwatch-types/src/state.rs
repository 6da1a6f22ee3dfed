//! WatchState - the single persisted document.

use crate::{LevelRecord, MonitoredSet, SchemaVersion};

/// Everything that survives a restart: who is watched and their last levels.
///
/// Keeping both in one document means adding or removing a character and
/// the matching level entry can never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatchState {
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: SchemaVersion,
    #[cfg_attr(feature = "serde", serde(default))]
    pub monitored: MonitoredSet,
    #[cfg_attr(feature = "serde", serde(default))]
    pub levels: LevelRecord,
}

/// Result of [`WatchState::add_monitored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyMonitored,
    EmptyName,
}

/// Result of [`WatchState::remove_monitored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotMonitored,
}

impl WatchState {
    /// Create a state watching `names`, with no known levels.
    pub fn with_monitored<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            monitored: names.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Start watching `name`. Whitespace around the name is ignored.
    pub fn add_monitored(&mut self, name: &str) -> AddOutcome {
        let name = name.trim();
        if name.is_empty() {
            return AddOutcome::EmptyName;
        }
        if self.monitored.insert(name) {
            AddOutcome::Added
        } else {
            AddOutcome::AlreadyMonitored
        }
    }

    /// Stop watching `name` and forget its last known level.
    pub fn remove_monitored(&mut self, name: &str) -> RemoveOutcome {
        let name = name.trim();
        if self.monitored.remove(name) {
            self.levels.remove(name);
            RemoveOutcome::Removed
        } else {
            RemoveOutcome::NotMonitored
        }
    }
}
