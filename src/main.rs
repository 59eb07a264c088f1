//! hpo-watch — a live terminal dashboard for a Lightning HPO app.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  fetch()  ┌──────────┐ publish  ┌──────────┐ current() ┌──────────┐
//! │ source/  │ ◄──────── │ poll.rs  │ ───────► │ registry │ ◄──────── │  app.rs  │
//! │  (HTTP)  │           │ (timers) │          │(channels)│  changed  │ (state)  │
//! └──────────┘           └──────────┘          └──────────┘           └──────────┘
//!                             │ fetch failed                           ▲      │
//!                             ▼                                        │      ▼
//!                        ┌──────────┐  toast                      ┌────────┐ ┌──────┐
//!                        │notify.rs │ ─────────────────────────►  │input.rs│ │ui.rs │
//!                        └──────────┘                             └────────┘ └──────┘
//! ```
//!
//! * **`source/`** — the `DataSource` trait, the closed set of endpoint keys,
//!   and the HTTP implementation.
//! * **`registry`** / **`broadcast`** — one fetch function and one watch
//!   channel per endpoint, built once and shared.
//! * **`poll`** — per-endpoint timers that fetch and publish snapshots.
//! * **`notify`** — fire-and-forget notifications for failed fetches.
//! * **`app`** / **`ui`** / **`input`** — the dashboard: state, rendering,
//!   and key handling.
//! * **`main`** — wires everything together: parse args, start polling, set
//!   up the terminal, and run the event loop.

mod app;
mod broadcast;
mod config;
mod error;
mod input;
mod logging;
mod notify;
mod poll;
mod registry;
mod source;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use app::App;
use config::Args;
use notify::{ChannelNotifier, Notification};
use poll::{PollHandle, Poller};
use registry::Registry;
use source::{EndpointKey, HttpSource};

/// Wakes the loop to expire toasts even when nothing else happens.
const TICK_RATE: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default hook prints the panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init(&args.log_file)?;

    // Everything runs on one thread: fetches interleave with rendering at
    // await points.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    install_panic_hook();

    // -- configure data sources ----------------------------------------------
    let base_url = args.base_url();
    let source = Arc::new(HttpSource::new(&base_url, args.timeout())?);
    let registry = Arc::new(Registry::with_source(source));
    info!(%base_url, interval_ms = args.interval_ms, "starting");

    // -- start background polling --------------------------------------------
    let (notifier, mut notifications) = ChannelNotifier::new();
    let poller = Poller::new(Arc::clone(&registry), Arc::new(notifier))
        .with_interval(args.interval());
    let sessions: Vec<PollHandle> = EndpointKey::ALL
        .iter()
        .map(|&key| poller.begin_polling(key))
        .collect();

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(&registry, &base_url);
    app.show(
        Notification::info("Polling", format!("every {} ms", args.interval_ms)),
        Instant::now(),
    );
    let mut events = EventStream::new();
    let mut ticks = tokio::time::interval(TICK_RATE);
    let mut dirty = true;

    // -- main event loop -----------------------------------------------------
    // Redraws only when something changed: a key press, a notification, a
    // new snapshot on the visible tab, or an expiring toast.
    loop {
        dirty |= app.refresh();
        dirty |= app.expire_toast(Instant::now());

        if dirty {
            guard.terminal.draw(|f| ui::draw(&mut app, f))?;
            dirty = false;
        }

        if app.quit {
            break;
        }

        let mut watcher = app.active_watcher();
        tokio::select! {
            _ = watcher.changed() => dirty = true,
            Some(notification) = notifications.recv() => {
                app.show(notification, Instant::now());
                dirty = true;
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    input::handle_key_event(&mut app, key);
                    dirty = true;
                }
                Some(Ok(Event::Resize(..))) => dirty = true,
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = ticks.tick() => {}
        }
    }

    // Stop the timers before the terminal is restored.
    for session in sessions {
        let key = session.key();
        session.stop();
        info!(%key, items = registry.read_snapshot(key).len(), "last snapshot");
    }
    Ok(())
}
