//! # levelwatch
//!
//! Watches a game server's public online list and announces level-ups of
//! selected characters in a Discord channel.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          levelwatch                          │
//! │                                                              │
//! │  ┌───────────┐  tick  ┌──────────┐ snapshot ┌─────────────┐  │
//! │  │ scheduler │───────▶│ monitor  │◀─────────│ListingSource│  │
//! │  └───────────┘        └────┬─────┘          └─────────────┘  │
//! │                            │ reconcile + update              │
//! │                            ▼                                 │
//! │  ┌───────────┐        ┌──────────┐  notify  ┌─────────────┐  │
//! │  │ commands  │───────▶│  store   │          │  Notifier   │  │
//! │  └─────▲─────┘ update └──────────┘          └─────────────┘  │
//! │        │                                                     │
//! │  CommandSource ◀── DiscordCommandSource | ChannelSource      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`monitor`]**: one fetch → parse → reconcile → persist → notify cycle,
//!   never two at once
//! - **[`reconcile`]**: the pure level comparison deciding what to store and
//!   what to announce
//! - **[`store`]**: the single persisted [`WatchState`] (monitored names and
//!   last known levels) with atomic read-modify-write
//! - **[`schedule`]** / **[`scheduler`]**: cron or fixed-interval ticks
//! - **[`commands`]**: `!addplayer`, `!removeplayer` and `!listar`
//! - **[`settings`]**: runtime configuration
//!
//! ## Usage
//!
//! ```bash
//! # Run with levelwatch.json in the working directory
//! levelwatch
//!
//! # One check, then exit
//! levelwatch --config /etc/levelwatch.json --once
//! ```
//!
//! ### As a library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use levelwatch::{Monitor, Seed, StateStore};
//! use levelwatch_adapters::discord::{DiscordClient, DiscordNotifier};
//! use levelwatch_adapters::listing::OnlineListAdapter;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = StateStore::open("state.json", &Seed::default())?.shared();
//! let client = DiscordClient::builder().token("bot-token").build();
//! let monitor = Monitor::new(
//!     Arc::new(OnlineListAdapter::builder().build()),
//!     store,
//!     Arc::new(DiscordNotifier::new(client, "100", "200")),
//! );
//! monitor.run_cycle().await;
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod duration;
pub mod monitor;
pub mod reconcile;
pub mod schedule;
pub mod scheduler;
pub mod settings;
pub mod source;
pub mod store;

pub use commands::{run_command_loop, Command, CommandHandler};
pub use monitor::{CycleOutcome, CycleReport, CycleState, Monitor};
pub use reconcile::{reconcile, Reconciliation};
pub use schedule::{CheckSchedule, ScheduleError};
pub use scheduler::{Scheduler, SchedulerHandle};
pub use settings::Settings;
pub use source::ChannelSource;
pub use store::{Seed, SharedStore, StateStore, StoreError};

pub use levelwatch_types::WatchState;
