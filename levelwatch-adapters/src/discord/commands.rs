//! Command source polling a Discord channel's message history.

use async_trait::async_trait;
use levelwatch_types::IncomingMessage;
use tracing::debug;

use super::DiscordClient;
use crate::{AdapterError, CommandSource};

/// Upper bound the messages endpoint accepts per request.
const PAGE_LIMIT: u8 = 100;

/// A command source reading new messages from one channel.
///
/// The first poll only records the newest existing message as a baseline, so
/// commands typed while the bot was offline are not replayed.
#[derive(Debug)]
pub struct DiscordCommandSource {
    client: DiscordClient,
    channel_id: String,
    description: String,
    last_seen: Option<String>,
}

impl DiscordCommandSource {
    pub fn new(client: DiscordClient, channel_id: impl Into<String>) -> Self {
        let channel_id = channel_id.into();
        let description = format!("discord: channel {}", channel_id);
        Self {
            client,
            channel_id,
            description,
            last_seen: None,
        }
    }

    /// Id of the newest message already handed out.
    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }
}

#[async_trait]
impl CommandSource for DiscordCommandSource {
    async fn poll(&mut self) -> Result<Vec<IncomingMessage>, AdapterError> {
        let Some(after) = self.last_seen.clone() else {
            let latest = self.client.messages(&self.channel_id, None, 1).await?;
            let baseline = latest
                .first()
                .map(|m| m.id.clone())
                .unwrap_or_else(|| "0".to_string());
            debug!("Command channel baseline set to message {}", baseline);
            self.last_seen = Some(baseline);
            return Ok(Vec::new());
        };

        let mut batch = self
            .client
            .messages(&self.channel_id, Some(&after), PAGE_LIMIT)
            .await?;
        batch.sort_by_key(|m| m.snowflake());

        if let Some(newest) = batch.last() {
            self.last_seen = Some(newest.id.clone());
        }

        Ok(batch.into_iter().map(IncomingMessage::from).collect())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
