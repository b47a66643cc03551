//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on the current route and any open overlay. Overlays capture
//! all keys while visible, in precedence order: confirmation dialog, add-
//! developer input, folder picker.

use crate::app::{AppEvent, ConfirmAction, Dashboard};
use crate::session::Route;
use crate::util::validate_open_url;
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

use super::helpers::{
    enter_route, spawn_bookmark_call, spawn_checkout, spawn_create_folder, spawn_delete_developer,
    spawn_delete_folder, spawn_developers_load, spawn_feed_fetch, spawn_manual_sync,
    spawn_session_load, spawn_set_developer_active, spawn_set_developer_publisher,
    spawn_trigger_sync,
};
use super::Action;

/// Cap on free-text inputs (folder names, store URLs).
const MAX_INPUT_LENGTH: usize = 256;

/// Main input dispatch function.
pub(super) fn handle_input(
    dash: &mut Dashboard,
    code: KeyCode,
    _modifiers: KeyModifiers,
    event_tx: &UnboundedSender<AppEvent>,
) -> Result<Action> {
    // Overlays capture all keys while visible
    if dash.pending_confirm.is_some() {
        return Ok(handle_confirm_input(dash, code, event_tx));
    }
    if dash.developer_input.is_some() {
        return Ok(handle_developer_input(dash, code, event_tx));
    }
    if dash.folder_picker.is_some() {
        return Ok(handle_picker_input(dash, code, event_tx));
    }

    // Global keys
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Tab => {
            cycle_route(dash, event_tx);
            return Ok(Action::Continue);
        }
        KeyCode::Char('T') => {
            let name = dash.cycle_theme();
            dash.set_status(format!("Theme: {}", name));
            return Ok(Action::Continue);
        }
        _ => {}
    }

    match dash.route.clone() {
        Route::NewGames | Route::PublisherTracking | Route::Folder(_) => {
            handle_feed_input(dash, code, event_tx)
        }
        Route::Bookmarks => handle_bookmarks_input(dash, code, event_tx),
        Route::Admin => handle_admin_input(dash, code, event_tx),
        Route::SignIn | Route::SignUp => handle_signin_input(dash, code, event_tx),
        Route::Activation => handle_activation_input(dash, code, event_tx),
        Route::Landing | Route::NotFound => handle_landing_input(dash, code, event_tx),
    }
    Ok(Action::Continue)
}

/// Tab order through the main screens. Admin only appears for admins.
fn cycle_route(dash: &mut Dashboard, event_tx: &UnboundedSender<AppEvent>) {
    let is_admin = dash.auth.user().is_some_and(|u| u.is_admin());
    let next = match dash.route {
        Route::NewGames => Route::Bookmarks,
        Route::Bookmarks | Route::Folder(_) => Route::PublisherTracking,
        Route::PublisherTracking => {
            if is_admin {
                Route::Admin
            } else {
                Route::NewGames
            }
        }
        _ => Route::NewGames,
    };
    if dash.navigate(next) {
        enter_route(dash, event_tx);
    }
}

// ============================================================================
// Feed routes
// ============================================================================

fn handle_feed_input(dash: &mut Dashboard, code: KeyCode, event_tx: &UnboundedSender<AppEvent>) {
    match code {
        KeyCode::Char('k') | KeyCode::Up => dash.nav_up(),
        KeyCode::Char('j') | KeyCode::Down => {
            dash.nav_down();
            // Scrolling near the end of the loaded list is the sentinel
            if let Some(plan) = dash.maybe_fetch_next() {
                spawn_feed_fetch(dash, plan, event_tx);
            }
        }
        KeyCode::Char('p') => {
            dash.filters.platform = dash.filters.platform.next();
            dash.set_status(format!("Platform: {}", dash.filters.platform.label()));
            let plan = dash.reset_feed();
            spawn_feed_fetch(dash, plan, event_tx);
        }
        KeyCode::Char('r') => {
            let preset = dash.filters.preset.next();
            dash.filters.set_preset(preset, Local::now().date_naive());
            dash.set_status(format!("Range: {}", preset.label()));
            let plan = dash.reset_feed();
            spawn_feed_fetch(dash, plan, event_tx);
        }
        KeyCode::Char('b') => {
            if dash.open_folder_picker() {
                // First picker open of the session may predate any visit to
                // the bookmarks screen
                if dash.folders.is_empty() {
                    super::helpers::spawn_folders_load(dash, event_tx);
                }
            } else {
                dash.set_status("No app selected");
            }
        }
        KeyCode::Char('o') => {
            open_selected_store_page(dash);
        }
        KeyCode::Esc => {
            // A folder view backs out to the folder list
            if matches!(dash.route, Route::Folder(_)) && dash.navigate(Route::Bookmarks) {
                enter_route(dash, event_tx);
            }
        }
        _ => {}
    }
}

/// Open the selected app's store page in the system browser.
fn open_selected_store_page(dash: &mut Dashboard) {
    let Some(app) = dash.selected_app() else {
        return;
    };
    if app.url.is_empty() {
        dash.set_status("No store page for this app");
        return;
    }
    match validate_open_url(&app.url) {
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                dash.set_status(format!("Failed to open browser: {}", e));
            }
        }
        Err(e) => dash.set_status(format!("Refusing to open URL: {}", e)),
    }
}

// ============================================================================
// Bookmarks route
// ============================================================================

fn handle_bookmarks_input(
    dash: &mut Dashboard,
    code: KeyCode,
    event_tx: &UnboundedSender<AppEvent>,
) {
    match code {
        KeyCode::Char('k') | KeyCode::Up => dash.nav_up(),
        KeyCode::Char('j') | KeyCode::Down => dash.nav_down(),
        KeyCode::Enter => {
            if let Some(folder) = dash.selected_folder() {
                let name = folder.name.clone();
                if dash.navigate(Route::Folder(name)) {
                    enter_route(dash, event_tx);
                }
            }
        }
        KeyCode::Char('d') => {
            if let Some(folder) = dash.selected_folder() {
                let name = folder.name.clone();
                if dash.folders.can_delete(&name) {
                    dash.pending_confirm = Some(ConfirmAction::DeleteFolder { name });
                } else {
                    dash.set_status("The default folder cannot be deleted");
                }
            }
        }
        _ => {}
    }
}

// ============================================================================
// Admin route
// ============================================================================

fn handle_admin_input(dash: &mut Dashboard, code: KeyCode, event_tx: &UnboundedSender<AppEvent>) {
    match code {
        KeyCode::Char('k') | KeyCode::Up => dash.nav_up(),
        KeyCode::Char('j') | KeyCode::Down => dash.nav_down(),
        KeyCode::Char('a') => {
            dash.developer_input = Some(String::new());
            dash.needs_redraw = true;
        }
        KeyCode::Char('d') => {
            if let Some(dev) = dash.selected_developer() {
                dash.pending_confirm = Some(ConfirmAction::DeleteDeveloper {
                    id: dev.id.clone(),
                    name: dev.name.clone(),
                });
            }
        }
        KeyCode::Char(' ') => {
            if let Some(dev) = dash.selected_developer() {
                let developer_id = dev.developer_id.clone();
                let activate = !dev.active;
                spawn_set_developer_active(dash, developer_id, activate, event_tx);
            }
        }
        KeyCode::Char('u') => {
            if let Some(dev) = dash.selected_developer() {
                let developer_id = dev.developer_id.clone();
                let flag = !dev.is_publisher;
                spawn_set_developer_publisher(dash, developer_id, flag, event_tx);
            }
        }
        KeyCode::Char('m') => {
            if let Some(dev) = dash.selected_developer() {
                let developer_id = dev.developer_id.clone();
                let platform = dev.platform;
                spawn_manual_sync(dash, developer_id, platform, event_tx);
            }
        }
        KeyCode::Char('s') => {
            if let Some(dev) = dash.selected_developer() {
                let platform = dev.platform;
                spawn_trigger_sync(dash, platform, event_tx);
            }
        }
        KeyCode::Char('R') => {
            spawn_developers_load(dash, event_tx);
            dash.set_status("Reloading developers...");
        }
        _ => {}
    }
}

// ============================================================================
// Auth screens
// ============================================================================

fn handle_signin_input(dash: &mut Dashboard, code: KeyCode, event_tx: &UnboundedSender<AppEvent>) {
    match code {
        KeyCode::Enter | KeyCode::Char('o') => match dash.client.google_signin_url() {
            Ok(url) => {
                if let Err(e) = open::that(url.as_str()) {
                    dash.set_status(format!("Failed to open browser: {}", e));
                } else {
                    dash.set_status("Complete the sign-in in your browser, then press r");
                }
            }
            Err(e) => dash.set_status(format!("Error: {}", e)),
        },
        KeyCode::Char('r') => {
            dash.set_status("Checking session...");
            spawn_session_load(dash, event_tx);
        }
        _ => {}
    }
}

fn handle_activation_input(
    dash: &mut Dashboard,
    code: KeyCode,
    event_tx: &UnboundedSender<AppEvent>,
) {
    match code {
        KeyCode::Enter | KeyCode::Char('c') => {
            dash.set_status("Creating checkout session...");
            spawn_checkout(dash, event_tx);
        }
        KeyCode::Char('r') => {
            dash.set_status("Checking session...");
            spawn_session_load(dash, event_tx);
        }
        _ => {}
    }
}

fn handle_landing_input(dash: &mut Dashboard, code: KeyCode, event_tx: &UnboundedSender<AppEvent>) {
    if code == KeyCode::Enter && dash.navigate(Route::NewGames) {
        enter_route(dash, event_tx);
    }
}

// ============================================================================
// Overlays
// ============================================================================

/// Handle input while a confirmation dialog is visible.
fn handle_confirm_input(
    dash: &mut Dashboard,
    code: KeyCode,
    event_tx: &UnboundedSender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('y') | KeyCode::Enter => {
            if let Some(action) = dash.pending_confirm.take() {
                match action {
                    ConfirmAction::DeleteFolder { name } => {
                        spawn_delete_folder(dash, name, event_tx);
                    }
                    ConfirmAction::DeleteDeveloper { id, .. } => {
                        spawn_delete_developer(dash, id, event_tx);
                    }
                }
            }
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            dash.pending_confirm = None;
        }
        _ => {}
    }
    dash.needs_redraw = true;
    Action::Continue
}

/// Handle input while the add-developer URL prompt is visible.
fn handle_developer_input(
    dash: &mut Dashboard,
    code: KeyCode,
    event_tx: &UnboundedSender<AppEvent>,
) -> Action {
    let Some(input) = dash.developer_input.as_mut() else {
        return Action::Continue;
    };
    match code {
        KeyCode::Char(c) => {
            if input.len() < MAX_INPUT_LENGTH {
                input.push(c);
            }
        }
        KeyCode::Backspace => {
            input.pop();
        }
        KeyCode::Enter => {
            let url = input.trim().to_owned();
            dash.developer_input = None;
            if url.is_empty() {
                dash.set_status("Store URL cannot be empty");
            } else if validate_open_url(&url).is_err() {
                dash.set_status("Not a valid store URL");
            } else {
                // The backend infers platform and developer id from the URL.
                // The publisher flag is flipped afterwards with `u`.
                super::helpers::spawn_add_developer(dash, url, false, event_tx);
                dash.set_status("Adding developer...");
            }
        }
        KeyCode::Esc => {
            dash.developer_input = None;
        }
        _ => {}
    }
    dash.needs_redraw = true;
    Action::Continue
}

/// Handle input while the folder picker is visible.
///
/// The picker lists the user's folders behind a text filter, with membership
/// markers for the app it was opened on; the final row starts new-folder name
/// entry.
fn handle_picker_input(
    dash: &mut Dashboard,
    code: KeyCode,
    event_tx: &UnboundedSender<AppEvent>,
) -> Action {
    let Some(mut picker) = dash.folder_picker.take() else {
        return Action::Continue;
    };

    // Text-entry sub-state for a new folder name
    if let Some(input) = picker.new_folder_input.as_mut() {
        match code {
            KeyCode::Char(c) => {
                if input.len() < MAX_INPUT_LENGTH {
                    input.push(c);
                }
                dash.folder_picker = Some(picker);
            }
            KeyCode::Backspace => {
                input.pop();
                dash.folder_picker = Some(picker);
            }
            KeyCode::Enter => {
                let raw = input.clone();
                picker.new_folder_input = None;
                match dash.folders.begin_create(&raw) {
                    Some(name) => {
                        // The new folder immediately receives the app the
                        // picker was opened on; a failed create rolls both
                        // the folder and the membership back.
                        let key = picker.key.clone();
                        let bookmark = dash.folders.begin_toggle(&name, &key).map(|_| key);
                        spawn_create_folder(dash, name, bookmark, event_tx);
                    }
                    None => {
                        dash.set_status("Folder name is empty or already taken");
                    }
                }
                dash.folder_picker = Some(picker);
            }
            KeyCode::Esc => {
                picker.new_folder_input = None;
                dash.folder_picker = Some(picker);
            }
            _ => {
                dash.folder_picker = Some(picker);
            }
        }
        dash.needs_redraw = true;
        return Action::Continue;
    }

    // Rows under the text filter: matching folders first, then the create
    // row. Typed characters narrow the filter; arrows move the selection.
    let visible: Vec<String> = dash
        .folders
        .folders()
        .iter()
        .filter(|f| picker.matches(&f.name))
        .map(|f| f.name.clone())
        .collect();
    let row_count = visible.len() + 1;
    match code {
        KeyCode::Up => {
            picker.selected = picker.selected.saturating_sub(1);
            dash.folder_picker = Some(picker);
        }
        KeyCode::Down => {
            picker.selected = (picker.selected + 1).min(row_count - 1);
            dash.folder_picker = Some(picker);
        }
        KeyCode::Char(c) => {
            if picker.filter.len() < MAX_INPUT_LENGTH {
                picker.filter.push(c);
                picker.selected = 0;
            }
            dash.folder_picker = Some(picker);
        }
        KeyCode::Backspace => {
            picker.filter.pop();
            picker.selected = 0;
            dash.folder_picker = Some(picker);
        }
        KeyCode::Enter => {
            if let Some(folder) = visible.get(picker.selected).cloned() {
                let key = picker.key.clone();
                // Phase one: flip locally. Phase two: the matching API call,
                // reverted by the BookmarkToggled handler on failure.
                if let Some(action) = dash.folders.begin_toggle(&folder, &key) {
                    spawn_bookmark_call(dash, folder, key, action, event_tx);
                }
                dash.folder_picker = Some(picker);
            } else {
                picker.new_folder_input = Some(String::new());
                dash.folder_picker = Some(picker);
            }
        }
        KeyCode::Esc => {
            if picker.filter.is_empty() {
                dash.close_folder_picker();
            } else {
                picker.filter.clear();
                picker.selected = 0;
                dash.folder_picker = Some(picker);
            }
        }
        _ => {
            dash.folder_picker = Some(picker);
        }
    }
    dash.needs_redraw = true;
    Action::Continue
}

// ============================================================================
// Tests
// ============================================================================
