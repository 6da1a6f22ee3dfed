//! OnlineSnapshot - the characters online at the moment the listing was fetched.

use std::collections::BTreeMap;

/// A point-in-time view of the remote online listing.
///
/// Maps a character name (case-sensitive, already trimmed) to its current
/// level. Snapshots are rebuilt on every cycle and never persisted; a
/// character missing from the snapshot is simply not online right now.
///
/// # Example
///
/// ```rust
/// use levelwatch_types::OnlineSnapshot;
///
/// let snapshot = OnlineSnapshot::builder()
///     .player("Knight", 51)
///     .build();
///
/// assert_eq!(snapshot.level("Knight"), Some(51));
/// assert_eq!(snapshot.level("Ghost"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnlineSnapshot {
    /// Current level of each online character, keyed by name.
    pub players: BTreeMap<String, u32>,
}

impl OnlineSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> OnlineSnapshotBuilder {
        OnlineSnapshotBuilder::new()
    }

    /// Record a character as online at `level`.
    ///
    /// A later insert for the same name replaces the earlier one.
    pub fn insert(&mut self, name: impl Into<String>, level: u32) {
        self.players.insert(name.into(), level);
    }

    /// Level of `name`, or `None` if the character is not online.
    pub fn level(&self, name: &str) -> Option<u32> {
        self.players.get(name).copied()
    }

    /// Check if nobody is online (or the fetch failed).
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of online characters.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Iterate over all online characters.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u32)> {
        self.players.iter()
    }
}

/// Builder for constructing `OnlineSnapshot` instances.
#[derive(Debug, Default)]
pub struct OnlineSnapshotBuilder {
    players: BTreeMap<String, u32>,
}

impl OnlineSnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an online character.
    pub fn player(mut self, name: impl Into<String>, level: u32) -> Self {
        self.players.insert(name.into(), level);
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> OnlineSnapshot {
        OnlineSnapshot {
            players: self.players,
        }
    }
}
