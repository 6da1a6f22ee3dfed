//! Notifier posting to two Discord channels.

use async_trait::async_trait;
use levelwatch_types::Destination;

use super::DiscordClient;
use crate::{AdapterError, Notifier};

/// Sends level-ups to the broadcast channel and command replies to the
/// command channel.
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    client: DiscordClient,
    broadcast_channel_id: String,
    command_channel_id: String,
}

impl DiscordNotifier {
    pub fn new(
        client: DiscordClient,
        broadcast_channel_id: impl Into<String>,
        command_channel_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            broadcast_channel_id: broadcast_channel_id.into(),
            command_channel_id: command_channel_id.into(),
        }
    }

    /// Channel id a destination resolves to.
    pub fn channel_for(&self, destination: Destination) -> &str {
        match destination {
            Destination::Broadcast => &self.broadcast_channel_id,
            Destination::Commands => &self.command_channel_id,
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, destination: Destination, text: &str) -> Result<(), AdapterError> {
        self.client
            .send_message(self.channel_for(destination), text)
            .await
    }
}
