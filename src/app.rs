use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use ratatui::widgets::ListState;

use crate::broadcast::SnapshotReader;
use crate::notify::Notification;
use crate::registry::Registry;
use crate::source::{EndpointKey, Item, Snapshot};

/// How long a notification stays in the status bar.
pub const TOAST_TTL: Duration = Duration::from_secs(5);

/// A notification currently on screen.
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// What one tab shows: the last snapshot read from its channel.
pub struct TabView {
    pub items: Snapshot,
    pub list_state: ListState,
    /// When this tab last saw a new snapshot.
    pub updated: Option<DateTime<Local>>,
    reader: SnapshotReader,
}

impl TabView {
    fn new(mut reader: SnapshotReader) -> Self {
        Self {
            items: reader.current(),
            list_state: ListState::default(),
            updated: None,
            reader,
        }
    }

    /// Pull a newer snapshot if one was published.
    fn refresh(&mut self) -> bool {
        if !self.reader.has_changed() {
            return false;
        }
        self.items = self.reader.current();
        self.updated = Some(Local::now());

        // Snapshots are full replacements; keep the cursor inside the list.
        match self.list_state.selected() {
            Some(_) if self.items.is_empty() => self.list_state.select(None),
            Some(i) if i >= self.items.len() => self.list_state.select(Some(self.items.len() - 1)),
            _ => {}
        }
        true
    }
}

pub struct App {
    /// Index into [`EndpointKey::ALL`] of the visible tab.
    pub active: usize,
    pub tabs: Vec<TabView>,
    pub toast: Option<Toast>,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Shown in the status bar when there is no toast.
    pub status: String,
}

impl App {
    pub fn new(registry: &Registry, base_url: &str) -> Self {
        Self {
            active: 0,
            tabs: EndpointKey::ALL
                .iter()
                .map(|&key| TabView::new(registry.subscribe(key)))
                .collect(),
            toast: None,
            quit: false,
            status: format!("Watching {base_url}"),
        }
    }

    pub fn active_key(&self) -> EndpointKey {
        EndpointKey::ALL[self.active]
    }

    pub fn active_tab(&self) -> &TabView {
        &self.tabs[self.active]
    }

    pub fn active_tab_mut(&mut self) -> &mut TabView {
        &mut self.tabs[self.active]
    }

    pub fn items(&self) -> &[Item] {
        &self.active_tab().items
    }

    /// Pull new snapshots into every tab.  Returns whether any tab changed;
    /// the tab bar shows every tab's item count, so any change needs a
    /// redraw.
    pub fn refresh(&mut self) -> bool {
        let mut changed = false;
        for tab in &mut self.tabs {
            changed |= tab.refresh();
        }
        changed
    }

    /// A reader that wakes on the next publish to the visible tab.
    ///
    /// Taken after [`refresh`](App::refresh), it only fires for snapshots the
    /// tab has not shown yet.
    pub fn active_watcher(&self) -> SnapshotReader {
        self.active_tab().reader.clone()
    }

    // -- notifications -------------------------------------------------------

    pub fn show(&mut self, notification: Notification, now: Instant) {
        self.toast = Some(Toast {
            notification,
            shown_at: now,
        });
    }

    /// Drop the toast once it has been up for [`TOAST_TTL`].  Returns whether
    /// anything was removed.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        match &self.toast {
            Some(toast) if now.duration_since(toast.shown_at) >= TOAST_TTL => {
                self.toast = None;
                true
            }
            _ => false,
        }
    }

    // -- tabs ----------------------------------------------------------------

    pub fn next_tab(&mut self) {
        self.active = (self.active + 1) % self.tabs.len();
    }

    pub fn previous_tab(&mut self) {
        self.active = (self.active + self.tabs.len() - 1) % self.tabs.len();
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.active = index;
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.items().len();
        if len == 0 {
            return;
        }
        let state = &mut self.active_tab_mut().list_state;
        let i = match state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.items().is_empty() {
            return;
        }
        let state = &mut self.active_tab_mut().list_state;
        let i = match state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.items().is_empty() {
            self.active_tab_mut().list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.items().len();
        if len > 0 {
            self.active_tab_mut().list_state.select(Some(len - 1));
        }
    }
}

/// A registry with no network behind it, for UI tests.
#[cfg(test)]
pub(crate) fn test_registry() -> Registry {
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Arc;

    use crate::source::DataSource;

    struct Offline;

    #[async_trait]
    impl DataSource for Offline {
        async fn fetch(&self, _key: EndpointKey) -> Result<Vec<Item>> {
            anyhow::bail!("offline")
        }
    }

    Registry::with_source(Arc::new(Offline))
}

#[cfg(test)]
pub(crate) fn sweep(id: &str, stage: &str) -> Item {
    Item::new(serde_json::json!({
        "sweep_id": id,
        "stage": stage,
        "trials_done": 1,
        "n_trials": 3,
    }))
}
