//! Per-endpoint broadcast channels.
//!
//! A [`Channel`] holds the current [`Snapshot`] for one endpoint and pushes
//! every replacement to its [`SnapshotReader`]s.  It is a thin wrapper over
//! [`tokio::sync::watch`]: readers always see the latest value and skip any
//! intermediate ones they were too slow to observe, which is exactly what a
//! "show the newest data" view wants.

use tokio::sync::watch;

use crate::source::{empty_snapshot, Item, Snapshot};

/// Holder of one endpoint's latest snapshot.
///
/// Only the poller publishes; everything else gets a read-only
/// [`SnapshotReader`].
#[derive(Debug)]
pub struct Channel {
    tx: watch::Sender<Snapshot>,
}

impl Channel {
    /// A channel whose snapshot starts empty.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(empty_snapshot());
        Self { tx }
    }

    /// Replace the snapshot wholesale and wake every reader.
    pub(crate) fn publish(&self, items: Vec<Item>) {
        // `send_replace` stores the value even when no reader is attached yet.
        self.tx.send_replace(Snapshot::new(items));
    }

    /// The current snapshot.
    pub fn current(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> SnapshotReader {
        SnapshotReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::new()
    }
}

/// A read-only view of one channel.
///
/// Cloning a reader copies its "last seen" marker, so a clone taken right
/// after [`current`](SnapshotReader::current) only wakes for newer
/// publishes.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Snapshot>,
}

impl SnapshotReader {
    /// The latest snapshot, marking it as seen.
    pub fn current(&mut self) -> Snapshot {
        self.rx.borrow_and_update().clone()
    }

    /// Whether a snapshot newer than the last one seen has been published.
    pub fn has_changed(&self) -> bool {
        // The sender lives in the registry; if it is gone nothing will ever
        // change again.
        self.rx.has_changed().unwrap_or(false)
    }

    /// Resolve on the next publish.  Pending forever once the channel is
    /// dropped.
    pub async fn changed(&mut self) {
        if self.rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(names: &[&str]) -> Vec<Item> {
        names
            .iter()
            .map(|n| Item::new(json!({ "name": n })))
            .collect()
    }

    #[test]
    fn starts_empty() {
        let channel = Channel::new();
        assert!(channel.current().is_empty());
        assert!(channel.subscribe().current().is_empty());
    }

    #[test]
    fn publish_replaces_instead_of_merging() {
        let channel = Channel::new();
        channel.publish(items(&["a", "b"]));
        channel.publish(items(&["c"]));

        assert_eq!(*channel.current(), items(&["c"]));
    }

    #[test]
    fn publish_without_readers_is_kept() {
        let channel = Channel::new();
        channel.publish(items(&["a"]));

        let mut reader = channel.subscribe();
        assert_eq!(*reader.current(), items(&["a"]));
    }

    #[test]
    fn readers_track_what_they_have_seen() {
        let channel = Channel::new();
        let mut reader = channel.subscribe();
        assert!(!reader.has_changed());

        channel.publish(items(&["a"]));
        assert!(reader.has_changed());

        reader.current();
        assert!(!reader.has_changed());
    }

    #[test]
    fn every_reader_sees_the_same_snapshot() {
        let channel = Channel::new();
        let mut first = channel.subscribe();
        let mut second = channel.subscribe();

        channel.publish(items(&["x", "y"]));

        let a = first.current();
        let b = second.current();
        assert!(Snapshot::ptr_eq(&a, &b), "readers should share one allocation");
    }

    #[tokio::test]
    async fn changed_wakes_on_publish() {
        let channel = Channel::new();
        let mut reader = channel.subscribe();

        channel.publish(items(&["a"]));
        reader.changed().await;

        assert_eq!(*reader.current(), items(&["a"]));
    }
}
