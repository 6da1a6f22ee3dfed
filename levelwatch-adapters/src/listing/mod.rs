//! Online listing source.
//!
//! The listing is a public HTML page with a table of every character
//! currently online. [`PageFetcher`] downloads it, [`parse_listing`] turns
//! it into an [`OnlineSnapshot`], and [`OnlineListAdapter`] chains the two.
//!
//! ## Example
//!
//! ```rust,no_run
//! use levelwatch_adapters::listing::OnlineListAdapter;
//! use levelwatch_adapters::ListingSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = OnlineListAdapter::builder().build();
//!     let snapshot = adapter.snapshot().await?;
//!
//!     for (name, level) in snapshot.iter() {
//!         println!("{name}: {level}");
//!     }
//!     Ok(())
//! }
//! ```

mod fetch;
mod parse;

pub use fetch::{PageFetcher, PageFetcherBuilder, DEFAULT_LISTING_URL};
pub use parse::parse_listing;

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use levelwatch_types::OnlineSnapshot;

use crate::AdapterError;

/// Trait for producing online snapshots.
///
/// # Example
///
/// ```rust,no_run
/// use levelwatch_adapters::listing::OnlineListAdapter;
/// use levelwatch_adapters::ListingSource;
///
/// # tokio_test::block_on(async {
/// let source = OnlineListAdapter::builder().build();
/// match source.snapshot().await {
///     Ok(snapshot) => println!("Got {} players", snapshot.len()),
///     Err(e) => eprintln!("{}: {}", source.description(), e),
/// }
/// # });
/// ```
#[async_trait]
pub trait ListingSource: Send + Sync + Debug {
    /// Fetch and parse the current listing.
    async fn snapshot(&self) -> Result<OnlineSnapshot, AdapterError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}

/// Fetches the online list page and parses it into a snapshot.
#[derive(Debug, Clone)]
pub struct OnlineListAdapter {
    fetcher: PageFetcher,
    description: String,
}

impl OnlineListAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> OnlineListAdapterBuilder {
        OnlineListAdapterBuilder::default()
    }

    /// Wrap an already configured fetcher.
    pub fn new(fetcher: PageFetcher) -> Self {
        let description = format!("listing: {}", fetcher.url());
        Self {
            fetcher,
            description,
        }
    }

    /// The underlying fetcher.
    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }
}

#[async_trait]
impl ListingSource for OnlineListAdapter {
    async fn snapshot(&self) -> Result<OnlineSnapshot, AdapterError> {
        let document = self.fetcher.fetch().await?;
        Ok(parse_listing(&document))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for OnlineListAdapter.
#[derive(Debug, Default)]
pub struct OnlineListAdapterBuilder {
    inner: PageFetcherBuilder,
}

impl OnlineListAdapterBuilder {
    /// Set the listing URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.url(url);
        self
    }

    /// Set the request timeout (default: 15 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> OnlineListAdapter {
        OnlineListAdapter::new(self.inner.build())
    }
}
