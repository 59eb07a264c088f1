use thiserror::Error;

use crate::source::EndpointKey;

/// The one runtime failure the poller knows about.
///
/// It never reaches consumers: the poller logs it and turns it into a
/// notification, and the channel keeps its previous snapshot.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("failed to fetch {key}")]
    FetchFailed {
        key: EndpointKey,
        #[source]
        source: anyhow::Error,
    },
}

impl PollError {
    pub fn key(&self) -> EndpointKey {
        match self {
            PollError::FetchFailed { key, .. } => *key,
        }
    }
}
