//! The closed set of remote collections the dashboard knows how to poll.
//!
//! Every [`EndpointKey`] owns exactly one slot in the
//! [`Registry`](crate::registry::Registry) table, indexed by
//! [`EndpointKey::index`].  Adding a collection means adding a variant here
//! and extending [`EndpointKey::ALL`]; the registry is built by iterating
//! that array, so a key can never exist without its fetch function and
//! channel.

use std::fmt;

/// A logical name identifying one polled remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKey {
    Sweeps,
    Tensorboards,
    Data,
}

impl EndpointKey {
    pub const COUNT: usize = 3;

    /// Every key, in tab order.  `ALL[k.index()] == k` for every key.
    pub const ALL: [EndpointKey; EndpointKey::COUNT] = [
        EndpointKey::Sweeps,
        EndpointKey::Tensorboards,
        EndpointKey::Data,
    ];

    /// Position of this key in [`EndpointKey::ALL`] and the registry table.
    pub const fn index(self) -> usize {
        match self {
            EndpointKey::Sweeps => 0,
            EndpointKey::Tensorboards => 1,
            EndpointKey::Data => 2,
        }
    }

    /// Path segment under `/api/` on the app server.
    pub const fn path(self) -> &'static str {
        match self {
            EndpointKey::Sweeps => "sweeps",
            EndpointKey::Tensorboards => "tensorboards",
            EndpointKey::Data => "data",
        }
    }

    /// Tab title.
    pub const fn title(self) -> &'static str {
        match self {
            EndpointKey::Sweeps => "Sweeps",
            EndpointKey::Tensorboards => "Tensorboards",
            EndpointKey::Data => "Data",
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_indexed_by_index() {
        for (i, key) in EndpointKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i, "{key} is out of place in ALL");
        }
    }

    #[test]
    fn display_uses_path() {
        assert_eq!(EndpointKey::Tensorboards.to_string(), "tensorboards");
    }
}
