//! The endpoint table: one fetch function and one channel per key.
//!
//! Built once at startup and shared as `Arc<Registry>`.  Nothing in it is
//! mutable after construction except the snapshots inside the channels,
//! which only the poller writes.

use std::sync::Arc;

use crate::broadcast::{Channel, SnapshotReader};
use crate::source::{DataSource, EndpointKey, Snapshot};

/// One row of the table.
pub struct Endpoint {
    pub source: Arc<dyn DataSource>,
    pub channel: Channel,
}

pub struct Registry {
    endpoints: [Endpoint; EndpointKey::COUNT],
}

impl Registry {
    /// Build the table by asking `source_for` for each key in
    /// [`EndpointKey::ALL`] order.
    pub fn new<F>(mut source_for: F) -> Self
    where
        F: FnMut(EndpointKey) -> Arc<dyn DataSource>,
    {
        let endpoints = EndpointKey::ALL.map(|key| Endpoint {
            source: source_for(key),
            channel: Channel::new(),
        });
        Self { endpoints }
    }

    /// Every key served by one shared source.
    pub fn with_source(source: Arc<dyn DataSource>) -> Self {
        Self::new(|_| Arc::clone(&source))
    }

    pub fn endpoint(&self, key: EndpointKey) -> &Endpoint {
        &self.endpoints[key.index()]
    }

    /// The current snapshot for `key`; empty until the first successful
    /// fetch.
    pub fn read_snapshot(&self, key: EndpointKey) -> Snapshot {
        self.endpoint(key).channel.current()
    }

    /// A reactive reader for `key`.
    pub fn subscribe(&self, key: EndpointKey) -> SnapshotReader {
        self.endpoint(key).channel.subscribe()
    }
}
