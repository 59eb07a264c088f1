//! Data source abstraction layer.
//!
//! This module defines the [`DataSource`] trait, the closed set of
//! [`EndpointKey`]s, and the opaque [`Item`] record.  The concrete HTTP
//! implementation lives in [`http`].
//!
//! ## For contributors — adding a new endpoint
//!
//! 1. Add a variant to [`EndpointKey`] and extend `EndpointKey::ALL`.
//! 2. Give it a `path()` and `title()`.
//!
//! That's it. The registry, poller and UI all iterate `EndpointKey::ALL`.

mod endpoint;
mod http;
mod item;

pub use endpoint::EndpointKey;
pub use http::HttpSource;
pub use item::{empty_snapshot, Item, Snapshot};

use anyhow::Result;
use async_trait::async_trait;

/// The remote side of the poller.
///
/// [`fetch()`](DataSource::fetch) is called from spawned tasks, possibly
/// several times concurrently for the same key, so implementations must be
/// `Send + Sync`.
///
/// ## Implementing a new source
///
/// ```ignore
/// struct Canned(Vec<Item>);
///
/// #[async_trait]
/// impl DataSource for Canned {
///     async fn fetch(&self, _key: EndpointKey) -> Result<Vec<Item>> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the latest full collection for `key`.
    ///
    /// Errors are not inspected by the poller, only counted: it reports a
    /// failed fetch and keeps the previous snapshot.
    async fn fetch(&self, key: EndpointKey) -> Result<Vec<Item>>;
}
