//! Feed card list widget.
//!
//! Each app in the accumulated feed renders as one row: bookmark marker,
//! platform badge, title, developer, release/update date, version, and the
//! screenshot load progress for the selected card.

use crate::app::Dashboard;
use crate::feed::FeedPhase;
use crate::model::App;
use crate::util::{smart_date, strip_control_chars, truncate_to_width};
use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the feed card list panel.
pub(super) fn render(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let apps = dash.feed.apps();
    let today = Local::now().date_naive();

    let items: Vec<ListItem> = if dash.feed.shows_no_results() {
        vec![ListItem::new(Span::styled(
            "No apps in this range",
            dash.theme.resolve("notice_info"),
        ))]
    } else if apps.is_empty() && dash.feed.phase() == FeedPhase::Error {
        vec![ListItem::new(Span::styled(
            "Could not load the feed. Press r to retry.",
            dash.theme.resolve("notice_error"),
        ))]
    } else if apps.is_empty() && dash.feed.is_loading() {
        vec![ListItem::new(Span::styled(
            "Loading...",
            dash.theme.resolve("notice_info"),
        ))]
    } else {
        apps.iter()
            .enumerate()
            .map(|(i, app)| card_item(dash, app, i == dash.selected_card, today, area.width))
            .collect()
    };

    let mut title = format!(" {} apps ", apps.len());
    if dash.feed.phase() == FeedPhase::Error {
        title.push_str("(load failed, press r to retry) ");
    } else if !dash.feed.has_more() && !apps.is_empty() {
        title.push_str("(end) ");
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(dash.theme.resolve("panel_border"))
            .title(title),
    );
    f.render_widget(list, area);
}

/// One card row.
///
/// Titles and developer names come from store scrapes, so both are stripped
/// of control characters before they reach the terminal.
fn card_item<'a>(
    dash: &'a Dashboard,
    app: &'a App,
    selected: bool,
    today: chrono::NaiveDate,
    width: u16,
) -> ListItem<'a> {
    let mut spans = Vec::new();

    // Bookmark marker
    if dash.folders.is_bookmarked(&app.key) {
        spans.push(Span::styled("★ ", dash.theme.resolve("card_bookmark")));
    } else {
        spans.push(Span::raw("  "));
    }

    // Platform badge
    let (badge, badge_role) = match app.platform() {
        crate::model::Platform::Ios => ("[iOS] ", "card_platform_ios"),
        crate::model::Platform::Android => ("[And] ", "card_platform_android"),
    };
    spans.push(Span::styled(badge, dash.theme.resolve(badge_role)));

    // Title, bounded so the date and version still fit
    let max_title = (width as usize).saturating_sub(40).max(12);
    let clean_title = strip_control_chars(&app.title);
    let title = truncate_to_width(&clean_title, max_title).into_owned();
    let title_role = if selected { "card_selected" } else { "card_title" };
    spans.push(Span::styled(title, dash.theme.resolve(title_role)));

    // Developer
    let clean_dev = strip_control_chars(&app.developer_name);
    let dev = truncate_to_width(&clean_dev, 20).into_owned();
    spans.push(Span::styled(
        format!("  {}", dev),
        dash.theme.resolve("card_developer"),
    ));

    // Release or update date, whichever the feed is about
    let date = app.update_date.or(app.release_date);
    if let Some(date) = date {
        spans.push(Span::styled(
            format!("  {}", smart_date(date.date_naive(), today)),
            dash.theme.resolve("card_date"),
        ));
    }

    // First release, never updated
    if app.version_history_len <= 1 && app.update_date.is_none() {
        spans.push(Span::styled(" NEW", dash.theme.resolve("card_new_badge")));
    }

    // Version and update count; the store's history includes the release
    if !app.version.is_empty() {
        let updates = app.version_history_len.saturating_sub(1);
        spans.push(Span::styled(
            format!("  v{} ({} updates)", app.version, updates),
            dash.theme.resolve("card_date"),
        ));
    }

    // Screenshot load progress for the card being inspected
    if selected {
        let urls = app.screenshots.urls();
        if !urls.is_empty() {
            let loaded = dash.screenshots.loaded_count(urls);
            spans.push(Span::styled(
                format!("  shots {}/{}", loaded, urls.len()),
                dash.theme.resolve("card_screenshot_pending"),
            ));
        }
    }

    ListItem::new(Line::from(spans))
}
