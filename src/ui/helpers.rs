//! Task spawning and route-entry side effects.
//!
//! Every network call the UI makes goes through a `spawn_*` helper: clone the
//! client and the event sender, run the call on a background task, and report
//! the outcome as an [`AppEvent`]. The event loop stays single-threaded over
//! the `Dashboard` state; background tasks never touch it directly.

use crate::app::{AppEvent, Dashboard};
use crate::bookmarks::ToggleAction;
use crate::feed::FetchPlan;
use crate::model::{AppKey, Platform};
use crate::session::{resolve_guard, Guard, Route};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// How many apps each folder's grid preview shows.
pub(super) const PREVIEW_LIMIT: u32 = 4;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of a panicking background task silently disappearing into Tokio's
/// runtime, the panic message comes back as `Err(String)` and is reported
/// through [`AppEvent::TaskPanicked`].
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Spawn a task, catching panics and reporting the outcome as an event.
fn spawn_reported<F>(task: &'static str, tx: UnboundedSender<AppEvent>, future: F)
where
    F: std::future::Future<Output = AppEvent> + Send + 'static,
{
    tokio::spawn(async move {
        match catch_task_panic(future).await {
            Ok(event) => {
                let _ = tx.send(event);
            }
            Err(panic_msg) => {
                tracing::error!(task, error = %panic_msg, "Background task panicked");
                let _ = tx.send(AppEvent::TaskPanicked {
                    task,
                    error: panic_msg,
                });
            }
        }
    });
}

// ============================================================================
// Route entry
// ============================================================================

/// Kick off the loads the current route needs and manage the sync poller.
///
/// Called after every navigation and after the session resolves. Only an
/// allowed route loads data; pending and redirected routes stay inert. The
/// poller runs exactly while the admin screen is showing.
pub(super) fn enter_route(dash: &mut Dashboard, event_tx: &UnboundedSender<AppEvent>) {
    if dash.route != Route::Admin {
        dash.poller.stop();
    }
    if !matches!(resolve_guard(&dash.route, &dash.auth), Guard::Allow) {
        return;
    }

    match dash.route.clone() {
        Route::NewGames => {
            dash.filters.folder = None;
            dash.filters.publishers_only = false;
            let plan = dash.reset_feed();
            spawn_feed_fetch(dash, plan, event_tx);
        }
        Route::PublisherTracking => {
            dash.filters.folder = None;
            dash.filters.publishers_only = true;
            let plan = dash.reset_feed();
            spawn_feed_fetch(dash, plan, event_tx);
        }
        Route::Folder(name) => {
            dash.filters.folder = Some(name);
            dash.filters.publishers_only = false;
            let plan = dash.reset_feed();
            spawn_feed_fetch(dash, plan, event_tx);
        }
        Route::Bookmarks => {
            spawn_folders_load(dash, event_tx);
        }
        Route::Admin => {
            spawn_developers_load(dash, event_tx);
            dash.poller.start(
                dash.client.clone(),
                Duration::from_secs(dash.sync_poll_secs),
                event_tx.clone(),
            );
        }
        _ => {}
    }
}

// ============================================================================
// Session
// ============================================================================

pub(super) fn spawn_session_load(dash: &Dashboard, event_tx: &UnboundedSender<AppEvent>) {
    let client = dash.client.clone();
    spawn_reported("session_load", event_tx.clone(), async move {
        AppEvent::SessionLoaded(client.fetch_session().await)
    });
}

pub(super) fn spawn_checkout(dash: &Dashboard, event_tx: &UnboundedSender<AppEvent>) {
    let client = dash.client.clone();
    spawn_reported("checkout", event_tx.clone(), async move {
        AppEvent::CheckoutSessionCreated(client.create_checkout_session().await)
    });
}

// ============================================================================
// Feed
// ============================================================================

/// Issue the fetch for a committed [`FetchPlan`]. The generation rides along
/// so the engine can discard the response if the filters changed meanwhile.
pub(super) fn spawn_feed_fetch(
    dash: &Dashboard,
    plan: FetchPlan,
    event_tx: &UnboundedSender<AppEvent>,
) {
    let client = dash.client.clone();
    let filters = dash.filters.clone();
    let limit = dash.page_limit;
    tracing::debug!(
        page = plan.page,
        generation = plan.generation,
        "Spawning feed fetch"
    );
    spawn_reported("feed_fetch", event_tx.clone(), async move {
        let result = client.fetch_feed_page(&filters, plan.page, limit).await;
        AppEvent::FeedPageLoaded {
            generation: plan.generation,
            page: plan.page,
            result,
        }
    });
}

// ============================================================================
// Bookmarks
// ============================================================================

pub(super) fn spawn_folders_load(dash: &Dashboard, event_tx: &UnboundedSender<AppEvent>) {
    let client = dash.client.clone();
    spawn_reported("folders_load", event_tx.clone(), async move {
        AppEvent::FoldersLoaded(client.fetch_bookmark_folders().await)
    });
}

/// Fetch the grid previews for the given folders one at a time, in display
/// order. Each folder reports as its own event; the next request is not
/// issued until the previous one finished.
pub(super) fn spawn_folder_previews(
    dash: &Dashboard,
    folders: Vec<String>,
    event_tx: &UnboundedSender<AppEvent>,
) {
    if folders.is_empty() {
        return;
    }
    let client = dash.client.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        for folder in folders {
            let result = client.fetch_folder_preview(&folder, PREVIEW_LIMIT).await;
            // A closed channel means the UI is gone; stop fetching
            if tx
                .send(AppEvent::FolderPreviewLoaded { folder, result })
                .is_err()
            {
                break;
            }
        }
    });
}

/// Phase two of an optimistic toggle: the API call matching the local change
/// already applied by `FolderStore::begin_toggle`.
pub(super) fn spawn_bookmark_call(
    dash: &Dashboard,
    folder: String,
    key: AppKey,
    action: ToggleAction,
    event_tx: &UnboundedSender<AppEvent>,
) {
    let client = dash.client.clone();
    spawn_reported("bookmark_toggle", event_tx.clone(), async move {
        let result = match action {
            ToggleAction::Added => client.add_bookmark(&key, &folder).await,
            ToggleAction::Removed => client.remove_bookmark(&key, &folder).await,
        };
        AppEvent::BookmarkToggled {
            folder,
            key,
            action,
            result,
        }
    });
}

/// Create a folder on the backend. When the picker started the creation,
/// `bookmark` carries the app whose membership was already applied locally;
/// the matching add call runs right after a successful create.
pub(super) fn spawn_create_folder(
    dash: &Dashboard,
    name: String,
    bookmark: Option<AppKey>,
    event_tx: &UnboundedSender<AppEvent>,
) {
    let client = dash.client.clone();
    let tx = event_tx.clone();
    spawn_reported("create_folder", event_tx.clone(), async move {
        let result = client.create_bookmark_folder(&name).await;
        match bookmark {
            Some(key) if result.is_ok() => {
                let _ = tx.send(AppEvent::FolderCreated {
                    name: name.clone(),
                    result,
                });
                let add = client.add_bookmark(&key, &name).await;
                AppEvent::BookmarkToggled {
                    folder: name,
                    key,
                    action: ToggleAction::Added,
                    result: add,
                }
            }
            _ => AppEvent::FolderCreated { name, result },
        }
    });
}

pub(super) fn spawn_delete_folder(
    dash: &Dashboard,
    name: String,
    event_tx: &UnboundedSender<AppEvent>,
) {
    let client = dash.client.clone();
    spawn_reported("delete_folder", event_tx.clone(), async move {
        let result = client.delete_bookmark_folder(&name).await;
        AppEvent::FolderDeleted { name, result }
    });
}

// ============================================================================
// Admin
// ============================================================================

pub(super) fn spawn_developers_load(dash: &Dashboard, event_tx: &UnboundedSender<AppEvent>) {
    let client = dash.client.clone();
    spawn_reported("developers_load", event_tx.clone(), async move {
        AppEvent::DevelopersLoaded(client.fetch_developers().await)
    });
}

pub(super) fn spawn_add_developer(
    dash: &Dashboard,
    developer_url: String,
    is_publisher: bool,
    event_tx: &UnboundedSender<AppEvent>,
) {
    let client = dash.client.clone();
    spawn_reported("add_developer", event_tx.clone(), async move {
        let result = client.add_developer(&developer_url, is_publisher).await;
        AppEvent::DeveloperMutated {
            action: "added",
            result,
        }
    });
}

pub(super) fn spawn_delete_developer(
    dash: &Dashboard,
    id: String,
    event_tx: &UnboundedSender<AppEvent>,
) {
    let client = dash.client.clone();
    spawn_reported("delete_developer", event_tx.clone(), async move {
        let result = client.delete_developer(&id).await;
        AppEvent::DeveloperMutated {
            action: "deleted",
            result,
        }
    });
}

pub(super) fn spawn_set_developer_active(
    dash: &Dashboard,
    developer_id: String,
    active: bool,
    event_tx: &UnboundedSender<AppEvent>,
) {
    let client = dash.client.clone();
    spawn_reported("set_developer_active", event_tx.clone(), async move {
        let result = client.set_developer_active(&developer_id, active).await;
        AppEvent::DeveloperMutated {
            action: if active { "activated" } else { "deactivated" },
            result,
        }
    });
}

pub(super) fn spawn_set_developer_publisher(
    dash: &Dashboard,
    developer_id: String,
    is_publisher: bool,
    event_tx: &UnboundedSender<AppEvent>,
) {
    let client = dash.client.clone();
    spawn_reported("set_developer_publisher", event_tx.clone(), async move {
        let result = client
            .set_developer_publisher(&developer_id, is_publisher)
            .await;
        AppEvent::DeveloperMutated {
            action: "publisher flag updated",
            result,
        }
    });
}

pub(super) fn spawn_manual_sync(
    dash: &Dashboard,
    developer_id: String,
    platform: Platform,
    event_tx: &UnboundedSender<AppEvent>,
) {
    let client = dash.client.clone();
    spawn_reported("manual_sync", event_tx.clone(), async move {
        let result = client.manual_sync_developer(&developer_id, platform).await;
        AppEvent::DeveloperMutated {
            action: "sync queued",
            result,
        }
    });
}

pub(super) fn spawn_trigger_sync(
    dash: &Dashboard,
    platform: Platform,
    event_tx: &UnboundedSender<AppEvent>,
) {
    let client = dash.client.clone();
    spawn_reported("trigger_sync", event_tx.clone(), async move {
        let result = client.trigger_sync(platform).await;
        AppEvent::SyncTriggered { platform, result }
    });
}

// ============================================================================
// Screenshots
// ============================================================================

/// Probe the selected card's unconfirmed screenshots through the image proxy.
///
/// The tracker marks each URL in flight on `needs_probe`, so calling this on
/// every tick spawns at most one probe per URL.
pub(super) fn spawn_screenshot_probes(dash: &mut Dashboard, event_tx: &UnboundedSender<AppEvent>) {
    let urls: Vec<String> = match dash.selected_app() {
        Some(app) => app.screenshots.urls().to_vec(),
        None => return,
    };
    for url in urls {
        if !dash.screenshots.needs_probe(&url) {
            continue;
        }
        let client = dash.client.clone();
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let ok = client.probe_image(&url).await.is_ok();
            let _ = tx.send(AppEvent::ScreenshotProbed { url, ok });
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
