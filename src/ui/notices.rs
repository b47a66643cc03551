//! Full-screen notice screens: landing, sign-in, activation, not-found, and
//! the holding screen while the session resolves.

use crate::app::Dashboard;
use ratatui::{
    layout::{Alignment, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn notice(f: &mut Frame, dash: &Dashboard, area: Rect, title: &str, text: &str) {
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(dash.theme.resolve("notice_info"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(dash.theme.resolve("panel_border"))
                .title(format!(" {} ", title)),
        );
    f.render_widget(paragraph, area);
}

pub(super) fn render_loading(f: &mut Frame, dash: &Dashboard, area: Rect) {
    notice(f, dash, area, "GameScout", "\nChecking session...");
}

pub(super) fn render_landing(f: &mut Frame, dash: &Dashboard, area: Rect) {
    notice(
        f,
        dash,
        area,
        "GameScout",
        "\nMarket research for mobile games.\n\nTrack new releases and updates from the developers you follow.\n\n(Enter) Open the feed  (q) Quit",
    );
}

pub(super) fn render_signin(f: &mut Frame, dash: &Dashboard, area: Rect) {
    notice(
        f,
        dash,
        area,
        "Sign In",
        "\nSign in with your Google account.\n\nThe sign-in completes in your browser; this terminal keeps the\nsession cookie once the backend has it.\n\n(Enter) Open browser  (r) Re-check session  (q) Quit",
    );
}

pub(super) fn render_activation(f: &mut Frame, dash: &Dashboard, area: Rect) {
    notice(
        f,
        dash,
        area,
        "Activate Plan",
        "\nYour account has no active plan.\n\nCheckout opens in the browser; press r afterwards to refresh\nyour entitlement.\n\n(Enter) Start checkout  (r) Re-check session  (q) Quit",
    );
}

pub(super) fn render_not_found(f: &mut Frame, dash: &Dashboard, area: Rect) {
    notice(
        f,
        dash,
        area,
        "Not Found",
        "\nNo such screen.\n\n(Tab) Back to the feed",
    );
}
