//! Persisted collections: the monitored names and their last known levels.

use std::collections::BTreeMap;

/// Last observed level of each monitored character.
///
/// A name that was never observed has an implicit level of 0, which the
/// notification policy reads as "baseline unknown".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LevelRecord {
    levels: BTreeMap<String, u32>,
}

impl LevelRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known level of `name`, 0 if never observed.
    pub fn level(&self, name: &str) -> u32 {
        self.levels.get(name).copied().unwrap_or(0)
    }

    /// Check if `name` has a recorded level.
    pub fn contains(&self, name: &str) -> bool {
        self.levels.contains_key(name)
    }

    /// Store `level` as the last known level of `name`.
    pub fn set(&mut self, name: impl Into<String>, level: u32) {
        self.levels.insert(name.into(), level);
    }

    /// Forget `name`. Returns the level it had, if any.
    pub fn remove(&mut self, name: &str) -> Option<u32> {
        self.levels.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u32)> {
        self.levels.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for LevelRecord {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        Self {
            levels: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Ordered list of character names under watch.
///
/// Insertion order is kept for display. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MonitoredSet {
    names: Vec<String>,
}

impl MonitoredSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` unless it is already present. Returns `true` if added.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Remove `name`. Returns `true` if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(index) => {
                self.names.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The names in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}

impl<S: Into<String>> FromIterator<S> for MonitoredSet {
    /// Collect names, dropping duplicates after their first occurrence.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}
