//! Application event handling.
//!
//! This module processes background task completion events: feed pages,
//! session resolution, bookmark call outcomes, admin mutations, sync polls,
//! and screenshot probes.

use crate::app::{AppEvent, Dashboard};
use crate::bookmarks::ToggleAction;
use crate::feed::PageOutcome;
use crate::model::{AppKey, BookmarkFolder, Developer, Page, User};
use crate::session::AuthPhase;
use crate::util::validate_open_url;
use crate::{api::ApiError, model::App};
use tokio::sync::mpsc::UnboundedSender;

use super::helpers;

/// Handle application events from background tasks.
pub(super) fn handle_app_event(
    dash: &mut Dashboard,
    event: AppEvent,
    event_tx: &UnboundedSender<AppEvent>,
) {
    match event {
        AppEvent::SessionLoaded(result) => {
            handle_session_loaded(dash, result, event_tx);
        }
        AppEvent::FeedPageLoaded {
            generation,
            page,
            result,
        } => {
            handle_feed_page(dash, generation, page, result, event_tx);
        }
        AppEvent::FoldersLoaded(result) => {
            handle_folders_loaded(dash, result, event_tx);
        }
        AppEvent::FolderPreviewLoaded { folder, result } => {
            handle_folder_preview(dash, folder, result);
        }
        AppEvent::BookmarkToggled {
            folder,
            key,
            action,
            result,
        } => {
            handle_bookmark_toggled(dash, folder, key, action, result);
        }
        AppEvent::FolderCreated { name, result } => {
            handle_folder_created(dash, name, result);
        }
        AppEvent::FolderDeleted { name, result } => {
            handle_folder_deleted(dash, name, result);
        }
        AppEvent::DevelopersLoaded(result) => {
            handle_developers_loaded(dash, result);
        }
        AppEvent::DeveloperMutated { action, result } => {
            handle_developer_mutated(dash, action, result, event_tx);
        }
        AppEvent::SyncStatusLoaded(result) => match result {
            Ok(statuses) => {
                dash.sync_status = statuses;
            }
            Err(e) => {
                // The poller retries on its own schedule; no need to nag
                tracing::debug!(error = %e, "Sync status poll failed");
            }
        },
        AppEvent::SyncTriggered { platform, result } => match result {
            Ok(()) => dash.set_status(format!("Sync queued for {}", platform)),
            Err(e) => dash.set_status(format!("Sync trigger failed: {}", e)),
        },
        AppEvent::ScreenshotProbed { url, ok } => {
            if ok {
                dash.screenshots.mark_loaded(&url);
            } else {
                dash.screenshots.mark_failed(&url);
            }
        }
        AppEvent::CheckoutSessionCreated(result) => {
            handle_checkout_created(dash, result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            dash.set_status(format!("Internal error in {} task", task));
        }
    }
}

/// Handle the `/auth/me` result: settle the auth phase, re-run the guard on
/// the current route, and load whatever the settled route needs.
fn handle_session_loaded(
    dash: &mut Dashboard,
    result: Result<Option<User>, ApiError>,
    event_tx: &UnboundedSender<AppEvent>,
) {
    match result {
        Ok(Some(user)) => {
            tracing::info!(email = %user.email, "Session resolved");
            dash.auth = AuthPhase::SignedIn(user);
        }
        Ok(None) => {
            tracing::info!("No active session");
            dash.auth = AuthPhase::SignedOut;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session check failed");
            dash.auth = AuthPhase::SignedOut;
            dash.set_status(format!("Backend unreachable: {}", e));
        }
    }
    dash.reapply_guard();
    helpers::enter_route(dash, event_tx);
}

fn handle_feed_page(
    dash: &mut Dashboard,
    generation: u64,
    page: u32,
    result: Result<Page<App>, ApiError>,
    event_tx: &UnboundedSender<AppEvent>,
) {
    match dash.feed.apply_page(generation, page, result) {
        PageOutcome::Applied { appended, exhausted } => {
            tracing::debug!(page, appended, exhausted, "Feed page applied");
            dash.clamp_selections();
            // The selection may already sit inside the sentinel margin,
            // e.g. when a short page arrives; keep the list filling.
            if let Some(plan) = dash.maybe_fetch_next() {
                helpers::spawn_feed_fetch(dash, plan, event_tx);
            }
        }
        PageOutcome::Stale => {}
        PageOutcome::Failed => {
            let message = format!(
                "Feed load failed: {}",
                dash.feed.last_error().unwrap_or("unknown error")
            );
            dash.set_status(message);
        }
    }
}

fn handle_folders_loaded(
    dash: &mut Dashboard,
    result: Result<Vec<BookmarkFolder>, ApiError>,
    event_tx: &UnboundedSender<AppEvent>,
) {
    match result {
        Ok(folders) => {
            tracing::debug!(count = folders.len(), "Folders loaded");
            dash.folders.set_folders(folders);
            dash.clamp_selections();
            let pending = dash.folders.folders_without_preview();
            helpers::spawn_folder_previews(dash, pending, event_tx);
        }
        Err(e) => {
            dash.set_status(format!("Failed to load folders: {}", e));
        }
    }
}

fn handle_folder_preview(dash: &mut Dashboard, folder: String, result: Result<Page<App>, ApiError>) {
    match result {
        Ok(page) => {
            dash.folders.set_preview(&folder, page.data);
        }
        Err(e) => {
            // The folder card still renders, just without the preview titles
            tracing::debug!(folder = %folder, error = %e, "Folder preview failed");
        }
    }
}

/// Phase two of an optimistic toggle landed. Success needs no state change;
/// failure rolls the local membership back.
fn handle_bookmark_toggled(
    dash: &mut Dashboard,
    folder: String,
    key: AppKey,
    action: ToggleAction,
    result: Result<(), ApiError>,
) {
    match result {
        Ok(()) => {
            let verb = match action {
                ToggleAction::Added => "Added to",
                ToggleAction::Removed => "Removed from",
            };
            dash.set_status(format!("{} {}", verb, folder));
        }
        Err(e) => {
            tracing::warn!(folder = %folder, error = %e, "Bookmark toggle failed, rolling back");
            dash.folders.revert_toggle(&folder, &key, action);
            dash.set_status(format!("Bookmark change failed, reverted: {}", e));
        }
    }
}

fn handle_folder_created(dash: &mut Dashboard, name: String, result: Result<(), ApiError>) {
    match result {
        Ok(()) => {
            dash.set_status(format!("Created folder '{}'", name));
        }
        Err(e) => {
            tracing::warn!(folder = %name, error = %e, "Folder create failed, rolling back");
            dash.folders.revert_create(&name);
            dash.clamp_selections();
            dash.set_status(format!("Could not create folder: {}", e));
        }
    }
}

fn handle_folder_deleted(dash: &mut Dashboard, name: String, result: Result<(), ApiError>) {
    match result {
        Ok(()) => {
            dash.folders.remove_folder(&name);
            // A folder route scoped to the deleted folder has nothing to show
            if dash.filters.folder.as_deref() == Some(name.as_str()) {
                dash.filters.folder = None;
            }
            dash.clamp_selections();
            dash.set_status(format!("Deleted folder '{}'", name));
        }
        Err(e) => {
            dash.set_status(format!("Could not delete folder: {}", e));
        }
    }
}

fn handle_developers_loaded(dash: &mut Dashboard, result: Result<Vec<Developer>, ApiError>) {
    match result {
        Ok(developers) => {
            tracing::debug!(count = developers.len(), "Developers loaded");
            dash.developers = developers;
            dash.clamp_selections();
        }
        Err(e) => {
            dash.set_status(format!("Failed to load developers: {}", e));
        }
    }
}

/// An admin mutation finished. The developer list is authoritative on the
/// backend, so success triggers a refetch instead of patching local rows.
fn handle_developer_mutated(
    dash: &mut Dashboard,
    action: &'static str,
    result: Result<(), ApiError>,
    event_tx: &UnboundedSender<AppEvent>,
) {
    match result {
        Ok(()) => {
            dash.set_status(format!("Developer {}", action));
            helpers::spawn_developers_load(dash, event_tx);
        }
        Err(e) => {
            dash.set_status(format!("Developer action failed: {}", e));
        }
    }
}

fn handle_checkout_created(dash: &mut Dashboard, result: Result<String, ApiError>) {
    match result {
        Ok(url) => match validate_open_url(&url) {
            Ok(checked) => {
                if let Err(e) = open::that(checked.as_str()) {
                    dash.set_status(format!("Failed to open browser: {}", e));
                } else {
                    dash.set_status("Opening checkout in browser...");
                }
            }
            Err(e) => {
                dash.set_status(format!("Refusing to open checkout URL: {}", e));
            }
        },
        Err(e) => {
            dash.set_status(format!("Checkout failed: {}", e));
        }
    }
}
