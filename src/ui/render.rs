//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the appropriate
//! screen based on the current route, and draws the overlay popups.

use crate::app::{ConfirmAction, Dashboard, FolderPickerState};
use crate::model::BookmarkFolder;
use crate::session::{resolve_guard, Guard, Route};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{admin, cards, folders, notices, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
///
/// Routes to the appropriate screen renderer based on the current route and
/// session phase. Handles terminal size validation before rendering.
pub(super) fn render(f: &mut Frame, dash: &mut Dashboard) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, dash, chunks[0]);
    render_screen(f, dash, chunks[1]);
    status::render(f, dash, chunks[2]);

    // Overlays, innermost last
    if let Some(picker) = &dash.folder_picker {
        render_folder_picker_overlay(f, dash, picker);
    }
    if let Some(input) = &dash.developer_input {
        render_developer_input_overlay(f, dash, input);
    }
    if let Some(confirm) = &dash.pending_confirm {
        render_confirm_overlay(f, dash, confirm);
    }
}

/// Dispatch the main screen area per route. A protected route whose session
/// is still resolving shows the loading notice instead of flashing sign-in.
fn render_screen(f: &mut Frame, dash: &Dashboard, area: Rect) {
    if matches!(resolve_guard(&dash.route, &dash.auth), Guard::Pending) {
        notices::render_loading(f, dash, area);
        return;
    }

    match &dash.route {
        Route::NewGames | Route::PublisherTracking | Route::Folder(_) => {
            cards::render(f, dash, area);
        }
        Route::Bookmarks => folders::render(f, dash, area),
        Route::Admin => admin::render(f, dash, area),
        Route::Landing => notices::render_landing(f, dash, area),
        Route::SignIn | Route::SignUp => notices::render_signin(f, dash, area),
        Route::Activation => notices::render_activation(f, dash, area),
        Route::NotFound => notices::render_not_found(f, dash, area),
    }
}

/// Header line: route title plus, on feed routes, the filter bar.
fn render_header(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", dash.route.title()),
            dash.theme.resolve("panel_border_focused"),
        ),
        Span::raw(" "),
    ];

    if matches!(
        dash.route,
        Route::NewGames | Route::PublisherTracking | Route::Folder(_)
    ) {
        spans.push(Span::styled("range:", dash.theme.resolve("filter_label")));
        spans.push(Span::styled(
            format!("{} ", dash.filters.preset.label()),
            dash.theme.resolve("filter_active"),
        ));
        spans.push(Span::styled("platform:", dash.theme.resolve("filter_label")));
        spans.push(Span::styled(
            format!("{} ", dash.filters.platform.label()),
            dash.theme.resolve("filter_active"),
        ));
        if dash.filters.publishers_only {
            spans.push(Span::styled(
                "publishers only ",
                dash.theme.resolve("filter_active"),
            ));
        }
    }

    if let Some(user) = dash.auth.user() {
        spans.push(Span::styled(
            format!("  {}", user.email),
            dash.theme.resolve("filter_label"),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ============================================================================
// Overlays
// ============================================================================

/// Center a popup of at most `width` x `height` inside `area`.
fn centered_overlay(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Render a confirmation dialog overlay centered on screen.
fn render_confirm_overlay(f: &mut Frame, dash: &Dashboard, confirm: &ConfirmAction) {
    let text = match confirm {
        ConfirmAction::DeleteFolder { name } => {
            format!(
                "Delete folder \"{}\"?\n\nAll bookmarks inside it will be removed.\n\n(y) Confirm  (n/Esc) Cancel",
                name
            )
        }
        ConfirmAction::DeleteDeveloper { name, .. } => {
            format!(
                "Stop tracking \"{}\"?\n\nIts apps will be dropped from the feed.\n\n(y) Confirm  (n/Esc) Cancel",
                name
            )
        }
    };

    let overlay = centered_overlay(f.area(), 54, 7);
    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(dash.theme.resolve("popup_border"))
                .title(" Confirm "),
        )
        .alignment(Alignment::Center);
    f.render_widget(paragraph, overlay);
}

/// Render the add-developer URL prompt centered on screen.
fn render_developer_input_overlay(f: &mut Frame, dash: &Dashboard, input: &str) {
    let text = format!(
        "Store page URL of the developer:\n\n> {}_\n\n(Enter) Add  (Esc) Cancel",
        input
    );

    let overlay = centered_overlay(f.area(), 64, 7);
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(dash.theme.resolve("popup_border"))
            .title(" Track Developer "),
    );
    f.render_widget(paragraph, overlay);
}

/// Render the folder picker overlay for one app card.
///
/// Folder rows pass through the picker's text filter and carry a membership
/// marker for the app the picker was opened on; the final row creates a new
/// folder.
fn render_folder_picker_overlay(f: &mut Frame, dash: &Dashboard, picker: &FolderPickerState) {
    let visible: Vec<&BookmarkFolder> = dash
        .folders
        .folders()
        .iter()
        .filter(|folder| picker.matches(&folder.name))
        .collect();

    let mut lines: Vec<String> = Vec::with_capacity(visible.len() + 2);
    if !picker.filter.is_empty() {
        lines.push(format!("filter: {}_", picker.filter));
    }
    for (i, folder) in visible.iter().enumerate() {
        let cursor = if i == picker.selected { ">" } else { " " };
        let marker = if folder.contains(&picker.key) {
            "[x]"
        } else {
            "[ ]"
        };
        lines.push(format!("{} {} {}", cursor, marker, folder.name));
    }

    let create_row = visible.len();
    match &picker.new_folder_input {
        Some(input) => lines.push(format!("> New folder: {}_", input)),
        None => {
            let cursor = if picker.selected == create_row { ">" } else { " " };
            lines.push(format!("{}     + New folder...", cursor));
        }
    }

    let hint = if picker.new_folder_input.is_some() {
        "(Enter) Create  (Esc) Back"
    } else if picker.filter.is_empty() {
        "(Enter) Toggle  (type) Filter  (Esc) Close"
    } else {
        "(Enter) Toggle  (Esc) Clear filter"
    };
    let text = format!("{}\n\n{}", lines.join("\n"), hint);

    let height = lines.len() as u16 + 4; // borders + blank + hint
    let overlay = centered_overlay(f.area(), 48, height);
    if overlay.width < 20 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(dash.theme.resolve("popup_border"))
            .title(format!(" Bookmark: {} ", picker.title)),
    );
    f.render_widget(paragraph, overlay);
}
