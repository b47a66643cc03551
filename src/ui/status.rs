use crate::app::Dashboard;
use crate::session::Route;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Spinner frames, one per 250ms tick while a feed page is in flight.
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the status bar.
pub(super) fn render(f: &mut Frame, dash: &Dashboard, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Cow keeps the static hint strings allocation-free
    let text: Cow<'_, str> = if dash.feed.is_loading() {
        Cow::Owned(format!(
            "{} Loading page {}...",
            SPINNER[dash.spinner_frame % SPINNER.len()],
            dash.feed.current_page() + 1
        ))
    } else if let Some((msg, _)) = &dash.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        match dash.route {
            Route::NewGames | Route::PublisherTracking | Route::Folder(_) => Cow::Borrowed(
                "[j/k]move [r]ange [p]latform [b]ookmark [o]pen store [Tab]switch [q]uit",
            ),
            Route::Bookmarks => {
                Cow::Borrowed("[j/k]move [Enter]open folder [d]elete [Tab]switch [q]uit")
            }
            Route::Admin => Cow::Borrowed(
                "[j/k]move [a]dd [d]elete [space]active [u]publisher [m]anual sync [s]ync platform [q]uit",
            ),
            _ => Cow::Borrowed("[Tab]switch [q]uit"),
        }
    };

    let paragraph = Paragraph::new(text).style(dash.theme.resolve("status_bar"));
    f.render_widget(paragraph, area);
}
