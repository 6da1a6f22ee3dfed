//! Chat-side capabilities: sending notifications and receiving commands.

use std::fmt::Debug;

use async_trait::async_trait;
use levelwatch_types::{Destination, IncomingMessage};

use crate::AdapterError;

/// Delivers plain text notifications.
///
/// Failures are reported to the caller, which logs them; a failed
/// notification never undoes the state change that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    /// Send `text` to `destination`.
    async fn notify(&self, destination: Destination, text: &str) -> Result<(), AdapterError>;
}

/// Trait for receiving chat messages from various sources.
///
/// Implementations return every message seen since the previous poll, oldest
/// first. Filtering (channel, bot authors) is left to the command handler.
#[async_trait]
pub trait CommandSource: Send + Debug {
    /// Poll for messages that arrived since the last call.
    async fn poll(&mut self) -> Result<Vec<IncomingMessage>, AdapterError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
