//! Command-line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Used when neither `--url` nor an embedding app provides a server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7501";

/// Set by a Lightning app for the processes it launches; points at the
/// app's own server.
pub const PARENT_APP_URL_VAR: &str = "LIGHTNING_APP_STATE_URL";

/// Live terminal dashboard for a Lightning HPO app.
#[derive(Debug, Parser)]
#[command(name = "hpo-watch", version, about)]
pub struct Args {
    /// Base URL of the app server.  Defaults to the embedding app's URL when
    /// launched from one, otherwise to a local server.
    #[arg(long, env = "HPO_WATCH_URL")]
    pub url: Option<String>,

    /// Poll period in milliseconds.
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 5000, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: u64,

    /// Where to write logs.  The terminal belongs to the dashboard.
    #[arg(long, default_value = "hpo-watch.log")]
    pub log_file: PathBuf,
}

impl Args {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The server to poll, resolved against the process environment.
    pub fn base_url(&self) -> String {
        let parent = std::env::var(PARENT_APP_URL_VAR).ok();
        resolve_base_url(self.url.as_deref(), parent.as_deref())
    }
}

/// Pick the server URL: an explicit URL wins, then the URL of the app we
/// are embedded in, then the local default.  Blank values count as unset.
pub fn resolve_base_url(explicit: Option<&str>, parent: Option<&str>) -> String {
    [explicit, parent]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_wins() {
        assert_eq!(
            resolve_base_url(Some("http://explicit:1"), Some("http://parent:2")),
            "http://explicit:1"
        );
    }

    #[test]
    fn embedded_uses_parent_url() {
        assert_eq!(
            resolve_base_url(None, Some("https://abc.lightning.ai/")),
            "https://abc.lightning.ai"
        );
    }

    #[test]
    fn standalone_uses_default() {
        assert_eq!(resolve_base_url(None, None), DEFAULT_BASE_URL);
        assert_eq!(resolve_base_url(Some("  "), Some("")), DEFAULT_BASE_URL);
    }

    #[test]
    fn parses_defaults() {
        let args = Args::try_parse_from(["hpo-watch", "--url", "http://x"]).unwrap();
        assert_eq!(args.interval(), Duration::from_millis(1000));
        assert_eq!(args.timeout(), Duration::from_millis(5000));
        assert_eq!(args.url.as_deref(), Some("http://x"));
        assert_eq!(args.log_file, PathBuf::from("hpo-watch.log"));
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(Args::try_parse_from(["hpo-watch", "--interval-ms", "0"]).is_err());
    }
}
