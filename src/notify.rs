//! Fire-and-forget user notifications.
//!
//! The poller reports failed fetches through a [`Notifier`].  The dashboard
//! plugs in a [`ChannelNotifier`] whose receiving end feeds the status-bar
//! toast; tests plug in a recorder.

use tokio::sync::mpsc;

use crate::error::PollError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Info,
        }
    }

    /// The notification raised for a failed fetch.  Names the collection
    /// only; the error itself goes to the log.
    pub fn fetch_failed(err: &PollError) -> Self {
        Self {
            title: format!("Failed to fetch {}", err.key()),
            body: "Showing the last data received. Retrying.".to_string(),
            severity: Severity::Error,
        }
    }
}

/// A sink for notifications.  `notify` must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Forwards notifications over an unbounded channel.
///
/// Sends to a dropped receiver are ignored: once the UI is gone nobody is
/// left to read them.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        let _ = self.tx.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EndpointKey;

    #[test]
    fn fetch_failed_names_the_endpoint() {
        let err = PollError::FetchFailed {
            key: EndpointKey::Sweeps,
            source: anyhow::anyhow!("connection refused"),
        };
        let n = Notification::fetch_failed(&err);

        assert_eq!(n.title, "Failed to fetch sweeps");
        assert_eq!(n.severity, Severity::Error);
        assert!(!n.body.contains("connection refused"));
    }

    #[test]
    fn channel_notifier_forwards() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notification::info("t", "b"));
        let n = rx.try_recv().unwrap();
        assert_eq!(n.title, "t");
        assert_eq!(n.severity, Severity::Info);
    }

    #[test]
    fn channel_notifier_ignores_closed_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notification {
            title: "t".into(),
            body: "b".into(),
            severity: Severity::Error,
        });
    }
}
