//! Messages flowing in from and out to the chat side.

/// Where an outbound notification goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Level-up announcements.
    Broadcast,
    /// Command acknowledgements and listings.
    Commands,
}

/// A chat message as seen by the command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Platform message id.
    pub id: String,
    /// Channel the message was posted in.
    pub channel_id: String,
    /// True when the author is an automated account.
    pub from_bot: bool,
    pub content: String,
}

impl IncomingMessage {
    /// A message posted by a person in `channel_id`.
    pub fn new(channel_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            channel_id: channel_id.into(),
            from_bot: false,
            content: content.into(),
        }
    }

    /// Mark the message as posted by a bot.
    pub fn by_bot(mut self) -> Self {
        self.from_bot = true;
        self
    }
}
