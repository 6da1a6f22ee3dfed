//! Discord adapter using the REST API.
//!
//! Outbound notifications are plain channel messages. Commands are read by
//! polling the command channel's message history, which avoids keeping a
//! gateway websocket open for a handful of text commands.
//!
//! ## Example
//!
//! ```rust,no_run
//! use levelwatch_adapters::discord::{DiscordClient, DiscordNotifier};
//! use levelwatch_adapters::{Destination, Notifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DiscordClient::builder().token("bot-token").build();
//!     let notifier = DiscordNotifier::new(client, "111", "222");
//!
//!     notifier.notify(Destination::Commands, "hello").await?;
//!     Ok(())
//! }
//! ```

mod commands;
mod notifier;

pub use commands::DiscordCommandSource;
pub use notifier::DiscordNotifier;

use std::time::Duration;

use levelwatch_types::IncomingMessage;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::AdapterError;

/// Default REST API base.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Thin REST client shared by the notifier and the command source.
#[derive(Clone)]
pub struct DiscordClient {
    client: Client,
    api_base: String,
    token: String,
}

impl DiscordClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> DiscordClientBuilder {
        DiscordClientBuilder::default()
    }

    /// Post `content` to `channel_id`.
    pub async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), AdapterError> {
        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);
        let request = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "content": content }));

        self.execute(request, channel_id).await?;
        Ok(())
    }

    /// Fetch up to `limit` messages from `channel_id`, newer than `after`.
    ///
    /// Without `after` the most recent messages are returned. Discord orders
    /// them newest first; callers sort as they need.
    pub async fn messages(
        &self,
        channel_id: &str,
        after: Option<&str>,
        limit: u8,
    ) -> Result<Vec<ChannelMessage>, AdapterError> {
        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);
        let mut request = self
            .client
            .get(&url)
            .query(&[("limit", limit.to_string())]);
        if let Some(after) = after {
            request = request.query(&[("after", after)]);
        }

        let response = self.execute(request, channel_id).await?;
        let messages: Vec<ChannelMessage> = response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;

        Ok(messages)
    }

    async fn execute(&self, request: RequestBuilder, channel_id: &str) -> Result<Response, AdapterError> {
        let response = request
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(AdapterError::Auth("Invalid bot token".to_string())),
            StatusCode::FORBIDDEN => Err(AdapterError::Auth(format!(
                "Missing access to channel '{}'",
                channel_id
            ))),
            StatusCode::NOT_FOUND => Err(AdapterError::NotFound(format!(
                "Channel '{}' not found",
                channel_id
            ))),
            status if !status.is_success() => Err(AdapterError::Http(format!(
                "API returned status {}",
                status
            ))),
            _ => Ok(response),
        }
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Builder for DiscordClient.
#[derive(Debug, Default)]
pub struct DiscordClientBuilder {
    api_base: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl DiscordClientBuilder {
    /// Set the REST API base (default: [`DEFAULT_API_BASE`]).
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the bot token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> DiscordClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        DiscordClient {
            client,
            api_base: self
                .api_base
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            token: self.token.unwrap_or_default(),
        }
    }
}

/// A message object from the channel messages endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelMessage {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub content: String,
    pub author: Author,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub bot: bool,
}

impl ChannelMessage {
    /// Snowflake ids grow with time, so they double as a sort key.
    fn snowflake(&self) -> u64 {
        self.id.parse().unwrap_or(0)
    }
}

impl From<ChannelMessage> for IncomingMessage {
    fn from(message: ChannelMessage) -> Self {
        IncomingMessage {
            id: message.id,
            channel_id: message.channel_id,
            from_bot: message.author.bot,
            content: message.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = DiscordClient::builder().token("t").build();
        assert_eq!(client.api_base, DEFAULT_API_BASE);
        assert_eq!(client.token, "t");
    }

    #[test]
    fn test_api_base_trailing_slash() {
        let client = DiscordClient::builder()
            .api_base("http://localhost:1234/api/")
            .build();
        assert_eq!(client.api_base, "http://localhost:1234/api");
    }

    #[test]
    fn test_debug_hides_token() {
        let client = DiscordClient::builder().token("super-secret").build();
        assert!(!format!("{:?}", client).contains("super-secret"));
    }

    #[tokio::test]
    async fn test_send_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/channels/42/messages")
            .match_header("authorization", "Bot tok")
            .match_body(mockito::Matcher::Json(serde_json::json!({ "content": "hi" })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = DiscordClient::builder()
            .api_base(server.url())
            .token("tok")
            .build();
        client.send_message("42", "hi").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let mut server = mockito::Server::new_async().await;
        let _unauthorized = server
            .mock("POST", "/channels/1/messages")
            .with_status(401)
            .create_async()
            .await;
        let _missing = server
            .mock("POST", "/channels/2/messages")
            .with_status(404)
            .create_async()
            .await;
        let _broken = server
            .mock("POST", "/channels/3/messages")
            .with_status(500)
            .create_async()
            .await;

        let client = DiscordClient::builder().api_base(server.url()).build();

        assert!(matches!(
            client.send_message("1", "x").await,
            Err(AdapterError::Auth(_))
        ));
        assert!(matches!(
            client.send_message("2", "x").await,
            Err(AdapterError::NotFound(_))
        ));
        assert!(matches!(
            client.send_message("3", "x").await,
            Err(AdapterError::Http(_))
        ));
    }

    #[test]
    fn test_message_conversion() {
        let raw = r#"{"id":"10","channel_id":"42","content":"!listar","author":{"id":"7","bot":true}}"#;
        let message: ChannelMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(message.snowflake(), 10);

        let incoming = IncomingMessage::from(message);
        assert!(incoming.from_bot);
        assert_eq!(incoming.content, "!listar");
        assert_eq!(incoming.channel_id, "42");
    }
}
