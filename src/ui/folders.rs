//! Bookmark folder list widget.

use crate::app::Dashboard;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the bookmark folder panel: one row per folder with its member
/// count and a short preview of the apps inside.
pub(super) fn render(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let items: Vec<ListItem> = if dash.folders.is_empty() {
        vec![ListItem::new(Span::styled(
            "No folders yet. Bookmark an app with b to create one.",
            dash.theme.resolve("notice_info"),
        ))]
    } else {
        dash.folders
            .folders()
            .iter()
            .enumerate()
            .map(|(i, folder)| {
                let selected = i == dash.selected_folder;
                let mut spans = Vec::new();

                let name_role = if selected { "folder_selected" } else { "folder_title" };
                spans.push(Span::styled(
                    folder.name.clone(),
                    dash.theme.resolve(name_role),
                ));
                spans.push(Span::styled(
                    format!("  ({} apps)", folder.apps.len()),
                    dash.theme.resolve("folder_count"),
                ));
                if folder.is_default {
                    spans.push(Span::styled(
                        "  [default]",
                        dash.theme.resolve("folder_default_badge"),
                    ));
                }

                // Preview titles, as far as they have arrived
                let preview = dash.folders.preview(&folder.name);
                if !preview.is_empty() {
                    let titles: Vec<String> = preview
                        .iter()
                        .map(|app| {
                            truncate_to_width(&strip_control_chars(&app.title), 18).into_owned()
                        })
                        .collect();
                    spans.push(Span::styled(
                        format!("  {}", titles.join(", ")),
                        dash.theme.resolve("card_developer"),
                    ));
                }

                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(dash.theme.resolve("panel_border"))
            .title(format!(" {} folders ", dash.folders.len())),
    );
    f.render_widget(list, area);
}
