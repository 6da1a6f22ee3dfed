//! Per-character level transitions computed once per cycle.

use std::cmp::Ordering;
use std::fmt;

/// Which way a level moved between two observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Up,
    Down,
    None,
}

/// The change observed for one monitored character in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelTransition {
    pub name: String,
    /// Last recorded level, 0 when the character was never observed.
    pub previous: u32,
    pub current: u32,
    pub direction: Direction,
}

impl LevelTransition {
    /// Compare `previous` against `current` and derive the direction.
    pub fn new(name: impl Into<String>, previous: u32, current: u32) -> Self {
        let direction = match current.cmp(&previous) {
            Ordering::Greater => Direction::Up,
            Ordering::Less => Direction::Down,
            Ordering::Equal => Direction::None,
        };
        Self {
            name: name.into(),
            previous,
            current,
            direction,
        }
    }

    /// Check if the stored level has to change.
    pub fn is_change(&self) -> bool {
        self.direction != Direction::None
    }

    /// Only a single-step level-up from a known, nonzero level is announced.
    ///
    /// First sightings (previous == 0) and multi-level jumps update the
    /// record silently.
    pub fn is_announced(&self) -> bool {
        self.direction == Direction::Up && self.previous != 0 && self.current - self.previous == 1
    }

    /// Broadcast text for this transition, if it is announced.
    pub fn announcement(&self) -> Option<String> {
        self.is_announced().then(|| self.to_string())
    }
}

impl fmt::Display for LevelTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Up => write!(
                f,
                "📈 **{}** subiu de nível: {} ➡️ {}",
                self.name, self.previous, self.current
            ),
            Direction::Down => write!(
                f,
                "📉 **{}** desceu de nível: {} ➡️ {}",
                self.name, self.previous, self.current
            ),
            Direction::None => write!(f, "**{}** continua no nível {}", self.name, self.current),
        }
    }
}
