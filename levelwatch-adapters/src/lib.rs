//! # levelwatch-adapters
//!
//! Adapters for everything levelwatch talks to over the network.
//!
//! ## Capabilities
//!
//! - [`ListingSource`] - produces an [`OnlineSnapshot`] per call. The
//!   [`listing::OnlineListAdapter`] fetches the remote online list page with a
//!   browser-like request and parses its table.
//! - [`Notifier`] - delivers plain text to a [`Destination`].
//! - [`CommandSource`] - yields chat messages that may contain commands.
//!
//! The Discord implementations of the last two live behind the `discord`
//! feature (enabled by default) and only use the REST API, so no gateway
//! connection is required.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use levelwatch_adapters::listing::OnlineListAdapter;
//! use levelwatch_adapters::ListingSource;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = OnlineListAdapter::builder()
//!         .url("https://ntoultimate.com.br/onlinelist.php")
//!         .timeout(Duration::from_secs(15))
//!         .build();
//!
//!     let snapshot = adapter.snapshot().await?;
//!     println!("{} characters online", snapshot.len());
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod error;
pub mod listing;

#[cfg(feature = "discord")]
pub mod discord;

pub use chat::{CommandSource, Notifier};
pub use error::AdapterError;
pub use listing::ListingSource;

// Re-export types for convenience
pub use levelwatch_types::{Destination, IncomingMessage, OnlineSnapshot};
