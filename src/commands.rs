//! Chat commands that edit the monitored set.
//!
//! | command                | effect                                   |
//! |------------------------|------------------------------------------|
//! | `!addplayer <name>`    | start watching `name`                    |
//! | `!removeplayer <name>` | stop watching `name`, forget its level   |
//! | `!listar`              | post the monitored names                 |

use std::sync::Arc;
use std::time::Duration;

use levelwatch_adapters::{CommandSource, Notifier};
use levelwatch_types::{AddOutcome, Destination, IncomingMessage, RemoveOutcome};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::store::SharedStore;

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPlayer(String),
    RemovePlayer(String),
    List,
}

impl Command {
    /// Parse a message body.
    ///
    /// Returns `None` for anything that is not one of the known commands.
    /// The argument is everything after the command word, trimmed; spaces
    /// inside it are kept as typed so names match the listing exactly.
    pub fn parse(content: &str) -> Option<Self> {
        let content = content.trim();
        let (command, rest) = content
            .split_once(char::is_whitespace)
            .unwrap_or((content, ""));
        let name = rest.trim().to_string();

        match command {
            "!addplayer" => Some(Self::AddPlayer(name)),
            "!removeplayer" => Some(Self::RemovePlayer(name)),
            "!listar" => Some(Self::List),
            _ => None,
        }
    }
}

/// Applies commands from the command channel to the shared store.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    store: SharedStore,
    notifier: Arc<dyn Notifier>,
    channel_id: String,
}

impl CommandHandler {
    pub fn new(
        store: SharedStore,
        notifier: Arc<dyn Notifier>,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            channel_id: channel_id.into(),
        }
    }

    /// Handle one incoming message.
    ///
    /// Bot messages, messages from other channels and anything that does not
    /// parse as a command are ignored. Returns the command that was applied.
    pub async fn handle(&self, message: &IncomingMessage) -> Option<Command> {
        if message.from_bot {
            return None;
        }
        if message.channel_id != self.channel_id {
            debug!(
                "Ignoring message from channel {} (commands are read from {})",
                message.channel_id, self.channel_id
            );
            return None;
        }

        let command = Command::parse(&message.content)?;
        debug!("Received command: {:?}", command);

        let reply = match &command {
            Command::AddPlayer(name) => self.add_monitored(name).await,
            Command::RemovePlayer(name) => self.remove_monitored(name).await,
            Command::List => Some(self.list_message().await),
        };

        if let Some(text) = reply {
            if let Err(e) = self.notifier.notify(Destination::Commands, &text).await {
                error!("Failed to reply in command channel: {}", e);
            }
        }

        Some(command)
    }

    /// Start watching `name`. Returns the acknowledgement to post, if any.
    pub async fn add_monitored(&self, name: &str) -> Option<String> {
        let mut store = self.store.lock().await;
        match store.update(|s| s.add_monitored(name)) {
            Ok(AddOutcome::Added) => {
                info!("Player \"{}\" added", name);
                Some(format!("Jogador \"{}\" adicionado com sucesso.", name))
            }
            Ok(AddOutcome::AlreadyMonitored) => {
                info!("Player \"{}\" is already monitored", name);
                None
            }
            Ok(AddOutcome::EmptyName) => {
                info!("Ignoring !addplayer without a name");
                None
            }
            Err(e) => {
                error!("Failed to add player \"{}\": {}", name, e);
                None
            }
        }
    }

    /// Stop watching `name`. Returns the acknowledgement to post, if any.
    pub async fn remove_monitored(&self, name: &str) -> Option<String> {
        let mut store = self.store.lock().await;
        match store.update(|s| s.remove_monitored(name)) {
            Ok(RemoveOutcome::Removed) => {
                info!("Player \"{}\" removed", name);
                Some(format!("Jogador \"{}\" removido com sucesso.", name))
            }
            Ok(RemoveOutcome::NotMonitored) => {
                info!("Player \"{}\" is not monitored", name);
                None
            }
            Err(e) => {
                error!("Failed to remove player \"{}\": {}", name, e);
                None
            }
        }
    }

    /// The monitored names, in the order they were added.
    pub async fn list_monitored(&self) -> Vec<String> {
        self.store.lock().await.state().monitored.as_slice().to_vec()
    }

    async fn list_message(&self) -> String {
        format!(
            "Jogadores monitorados: {}",
            self.list_monitored().await.join(", ")
        )
    }
}

/// Poll `source` every `every` and hand each message to `handler` until
/// `stop` flips to `true`.
///
/// Poll errors are logged and retried on the next round.
pub async fn run_command_loop<S>(
    mut source: S,
    handler: CommandHandler,
    every: Duration,
    mut stop: watch::Receiver<bool>,
) where
    S: CommandSource,
{
    info!("Reading commands from {}", source.description());
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match source.poll().await {
                    Ok(messages) => {
                        for message in &messages {
                            handler.handle(message).await;
                        }
                    }
                    Err(e) => warn!("Failed to poll {}: {}", source.description(), e),
                }
            }
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
        }
    }

    info!("Command loop stopped");
}
