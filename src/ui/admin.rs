//! Admin screen: the tracked-developer table and the scraper status line.

use crate::app::Dashboard;
use crate::model::SyncState;
use crate::util::{format_date, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

pub(super) fn render(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    render_developer_table(f, dash, chunks[0]);
    render_sync_status(f, dash, chunks[1]);
}

fn render_developer_table(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let header = Row::new(vec!["", "Name", "Platform", "Active", "Publisher", "Last scraped"])
        .style(dash.theme.resolve("admin_header"));

    let rows: Vec<Row> = dash
        .developers
        .iter()
        .enumerate()
        .map(|(i, dev)| {
            let selected = i == dash.selected_developer;
            let cursor = if selected { ">" } else { " " };
            let name = truncate_to_width(&strip_control_chars(&dev.name), 28).into_owned();

            let active_cell = if dev.active {
                Cell::from("yes").style(dash.theme.resolve("admin_active"))
            } else {
                Cell::from("no").style(dash.theme.resolve("admin_inactive"))
            };
            let publisher_cell = if dev.is_publisher {
                Cell::from("yes").style(dash.theme.resolve("admin_publisher"))
            } else {
                Cell::from("")
            };
            let scraped = dev
                .apps_last_scraped_at
                .map(|dt| format_date(dt.date_naive()))
                .unwrap_or_else(|| "never".to_string());

            let row = Row::new(vec![
                Cell::from(cursor),
                Cell::from(name),
                Cell::from(dev.platform.as_str()),
                active_cell,
                publisher_cell,
                Cell::from(scraped),
            ]);
            if selected {
                row.style(dash.theme.resolve("admin_selected"))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(dash.theme.resolve("panel_border"))
            .title(format!(" {} developers ", dash.developers.len())),
    );
    f.render_widget(table, area);
}

/// One line per platform from the latest `jobs/sync-status` poll.
fn render_sync_status(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    if dash.sync_status.is_empty() {
        spans.push(Span::styled(
            "sync status unknown",
            dash.theme.resolve("sync_idle"),
        ));
    }
    for status in &dash.sync_status {
        let role = match status.status {
            SyncState::Idle => "sync_idle",
            SyncState::Running => "sync_running",
            SyncState::Failed => "sync_failed",
        };
        let last = status
            .last_run_at
            .map(|dt| format!(" (last {})", format_date(dt.date_naive())))
            .unwrap_or_default();
        spans.push(Span::styled(
            format!("{}: {}{}  ", status.platform, status.status.label(), last),
            dash.theme.resolve(role),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(dash.theme.resolve("panel_border"))
            .title(" Scraper "),
    );
    f.render_widget(paragraph, area);
}
