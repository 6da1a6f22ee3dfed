//! # levelwatch-types
//!
//! Core types shared by the levelwatch crates. Nothing in here performs I/O:
//! the adapters produce these values and the monitor consumes them.
//!
//! ## Features
//!
//! - `serde`: serialization of the persisted state
//!
//! ## Example
//!
//! ```rust
//! use levelwatch_types::{LevelRecord, OnlineSnapshot};
//!
//! let snapshot = OnlineSnapshot::builder()
//!     .player("Knight", 51)
//!     .player("Mage", 10)
//!     .build();
//!
//! let mut record = LevelRecord::new();
//! record.set("Knight", 50);
//!
//! assert_eq!(snapshot.level("Knight"), Some(51));
//! assert_eq!(record.level("Mage"), 0);
//! ```
//!
//! ## Schema Version
//!
//! The persisted [`WatchState`] carries a [`SchemaVersion`]; the current
//! major version is **1**.

mod levels;
mod message;
mod snapshot;
mod state;
mod transition;
mod version;

pub use levels::*;
pub use message::*;
pub use snapshot::*;
pub use state::*;
pub use transition::*;
pub use version::*;

/// Current schema version of the persisted state.
///
/// Increment this when making breaking changes to the state file format.
pub const SCHEMA_VERSION: u32 = 1;
