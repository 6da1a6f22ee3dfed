//! Channel-based command source.
//!
//! Receives chat messages via a tokio mpsc channel. This is useful when
//! messages are pushed by another part of the program rather than polled
//! from a chat service.

use async_trait::async_trait;
use levelwatch_adapters::{AdapterError, CommandSource};
use levelwatch_types::IncomingMessage;
use tokio::sync::mpsc;

/// A command source that receives messages via a channel.
///
/// # Example
///
/// ```
/// use levelwatch::ChannelSource;
/// use levelwatch_adapters::CommandSource;
/// use levelwatch_types::IncomingMessage;
///
/// let (tx, mut source) = ChannelSource::create("bridge");
/// tx.send(IncomingMessage::new("200", "!listar")).unwrap();
///
/// let messages = tokio_test::block_on(source.poll()).unwrap();
/// assert_eq!(messages.len(), 1);
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::UnboundedReceiver<IncomingMessage>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// * `receiver` - The receiving end of an unbounded channel
    /// * `source_description` - Where the messages come from
    pub fn new(receiver: mpsc::UnboundedReceiver<IncomingMessage>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair; push messages into the returned sender.
    pub fn create(source_description: &str) -> (mpsc::UnboundedSender<IncomingMessage>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx, source_description))
    }
}

#[async_trait]
impl CommandSource for ChannelSource {
    async fn poll(&mut self) -> Result<Vec<IncomingMessage>, AdapterError> {
        let mut messages = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => messages.push(message),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if messages.is_empty() {
                        return Err(AdapterError::Connection(format!(
                            "{} closed",
                            self.description
                        )));
                    }
                    break;
                }
            }
        }
        Ok(messages)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Nothing sent yet
        assert!(source.poll().await.unwrap().is_empty());

        tx.send(IncomingMessage::new("1", "!addplayer Knight")).unwrap();
        tx.send(IncomingMessage::new("1", "!listar")).unwrap();

        let messages = source.poll().await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "!addplayer Knight");

        assert!(source.poll().await.unwrap().is_empty());
        assert_eq!(source.description(), "channel: test");
    }

    #[tokio::test]
    async fn test_closed_channel_is_an_error() {
        let (tx, mut source) = ChannelSource::create("test");
        tx.send(IncomingMessage::new("1", "!listar")).unwrap();
        drop(tx);

        // buffered messages are still delivered first
        assert_eq!(source.poll().await.unwrap().len(), 1);
        assert!(matches!(
            source.poll().await,
            Err(AdapterError::Connection(_))
        ));
    }
}
