//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering only reads the
//! snapshots the app already pulled from its channels; it never touches the
//! network or the poller.
//!
//! ## For contributors
//!
//! * The layout is three rows: endpoint tabs, a scrollable item list, and a
//!   one-line status bar.
//! * The status bar shows the latest notification while it is fresh and the
//!   connection line otherwise.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
    Frame,
};

use crate::app::App;
use crate::notify::Severity;
use crate::source::{EndpointKey, Item};

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [tabs_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_tabs(app, frame, tabs_area);
    draw_item_list(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

fn draw_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let titles = EndpointKey::ALL
        .iter()
        .zip(&app.tabs)
        .enumerate()
        .map(|(i, (key, tab))| format!("{} {} ({})", i + 1, key.title(), tab.items.len()));

    let tabs = Tabs::new(titles)
        .block(Block::default().title(" hpo-watch ").borders(Borders::ALL))
        .select(app.active)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn status_color(status: &str) -> Color {
    match status.to_ascii_lowercase().as_str() {
        "running" => Color::Green,
        "succeeded" => Color::Blue,
        "failed" => Color::Red,
        "stopped" | "pruned" => Color::DarkGray,
        _ => Color::Yellow,
    }
}

fn item_line(item: &Item) -> Line<'static> {
    let id = item.id().unwrap_or_else(|| "(unnamed)".into());
    let status = item.status().unwrap_or_default();
    let summary = item.summary().unwrap_or_default();

    Line::from(vec![
        Span::styled(format!("{id:<20}"), Style::default().fg(Color::White)),
        Span::raw(" "),
        Span::styled(format!("{status:<12}"), Style::default().fg(status_color(&status))),
        Span::raw(" "),
        Span::styled(summary, Style::default().fg(Color::DarkGray)),
    ])
}

/// Render the scrollable list for the active tab.
fn draw_item_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let key = app.active_key();
    let list_items: Vec<ListItem> = app
        .items()
        .iter()
        .map(|item| ListItem::new(item_line(item)))
        .collect();

    let list = List::new(list_items)
        .block(
            Block::default()
                .title(format!(" {} ", key.title()))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.active_tab_mut().list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let message = match &app.toast {
        Some(toast) => {
            let n = &toast.notification;
            let color = match n.severity {
                Severity::Error => Color::Red,
                Severity::Info => Color::Green,
            };
            Span::styled(format!("{}: {}", n.title, n.body), Style::default().fg(color))
        }
        None => Span::styled(app.status.clone(), Style::default().fg(Color::Yellow)),
    };

    let tab = app.active_tab();
    let updated = tab
        .updated
        .map(|t| format!("updated {}", t.format("%H:%M:%S")))
        .unwrap_or_else(|| "waiting for data".into());

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        message,
        Span::raw("  "),
        Span::styled(
            format!("{} items", tab.items.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(updated, Style::default().fg(Color::DarkGray)),
        Span::raw("  q: quit  tab: switch  ↑/↓: scroll"),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::app::{sweep, test_registry};
    use crate::notify::Notification;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();

        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn draw_does_not_panic_with_no_items() {
        let registry = test_registry();
        let mut app = App::new(&registry, "http://test");
        let text = render(&mut app);
        assert!(text.contains("waiting for data"));
    }

    #[test]
    fn draw_shows_items_of_active_tab() {
        let registry = test_registry();
        let mut app = App::new(&registry, "http://test");
        registry
            .endpoint(EndpointKey::Sweeps)
            .channel
            .publish(vec![sweep("abc123", "running"), sweep("def456", "failed")]);
        app.refresh();
        app.select_first();

        let text = render(&mut app);
        assert!(text.contains("abc123"));
        assert!(text.contains("def456"));
        assert!(text.contains("1/3 trials"));
        assert!(text.contains("2 items"));
    }

    #[test]
    fn draw_status_shows_toast_over_status_line() {
        let registry = test_registry();
        let mut app = App::new(&registry, "http://test");
        app.show(
            Notification {
                title: "Failed to fetch sweeps".into(),
                body: "Retrying.".into(),
                severity: Severity::Error,
            },
            Instant::now(),
        );

        let text = render(&mut app);
        assert!(text.contains("Failed to fetch sweeps"));
        assert!(!text.contains("Watching http://test"));
    }

    #[test]
    fn status_colors() {
        assert_eq!(status_color("Running"), Color::Green);
        assert_eq!(status_color("failed"), Color::Red);
        assert_eq!(status_color("pending"), Color::Yellow);
    }
}
