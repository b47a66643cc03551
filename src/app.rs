use crate::api::{ApiClient, ApiError};
use crate::bookmarks::{FolderStore, ToggleAction};
use crate::feed::{FeedEngine, FetchPlan};
use crate::filters::FilterState;
use crate::jobs::SyncPoller;
use crate::model::{App, AppKey, BookmarkFolder, Developer, Page, Platform, SyncStatus, User};
use crate::screenshots::ScreenshotTracker;
use crate::session::{resolve_guard, AuthPhase, Guard, Route};
use crate::theme::{StyleMap, ThemeVariant};
use std::borrow::Cow;
use tokio::time::Instant;

/// How close to the end of the card list the selection must get before the
/// next feed page is requested. The terminal equivalent of an off-screen
/// scroll sentinel.
pub const SENTINEL_MARGIN: usize = 5;

// ============================================================================
// Overlay State
// ============================================================================

/// State for the folder-picker popup opened from an app card.
pub struct FolderPickerState {
    /// The app whose memberships are being edited.
    pub key: AppKey,
    /// Display title for the popup header.
    pub title: String,
    /// Highlighted row. Folder rows come first; the final row is
    /// "create new folder".
    pub selected: usize,
    /// Case-insensitive text filter over folder names. Typed characters land
    /// here; arrow keys move the selection.
    pub filter: String,
    /// Text buffer while the user is typing a new folder name.
    pub new_folder_input: Option<String>,
}

impl FolderPickerState {
    /// Whether a folder name passes the current text filter.
    pub fn matches(&self, name: &str) -> bool {
        self.filter.is_empty() || name.to_lowercase().contains(&self.filter.to_lowercase())
    }
}

/// Pending confirmation action for destructive operations.
pub enum ConfirmAction {
    /// Delete a bookmark folder and all its memberships.
    DeleteFolder { name: String },
    /// Stop tracking a developer and drop its apps.
    DeleteDeveloper { id: String, name: String },
}

// ============================================================================
// Events
// ============================================================================

/// Events from background tasks, delivered to the main event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// `/auth/me` resolved. `Ok(None)` means signed out.
    SessionLoaded(Result<Option<User>, ApiError>),
    /// One feed page arrived.
    ///
    /// Fields:
    /// - `generation`: The feed generation when this fetch was spawned
    /// - `page`: The 1-based page number that was requested
    /// - `result`: The page payload or error from fetching
    FeedPageLoaded {
        generation: u64,
        page: u32,
        result: Result<Page<App>, ApiError>,
    },
    /// The user's folder list arrived.
    FoldersLoaded(Result<Vec<BookmarkFolder>, ApiError>),
    /// One folder's grid preview arrived.
    FolderPreviewLoaded {
        folder: String,
        result: Result<Page<App>, ApiError>,
    },
    /// Phase two of an optimistic bookmark toggle completed.
    BookmarkToggled {
        folder: String,
        key: AppKey,
        action: ToggleAction,
        result: Result<(), ApiError>,
    },
    /// Folder creation call completed.
    FolderCreated {
        name: String,
        result: Result<(), ApiError>,
    },
    /// Folder deletion call completed.
    FolderDeleted {
        name: String,
        result: Result<(), ApiError>,
    },
    /// The tracked-developer list arrived.
    DevelopersLoaded(Result<Vec<Developer>, ApiError>),
    /// An admin mutation (add, delete, activate, publisher flag, manual sync)
    /// finished. The list is refetched on success, so only the label and the
    /// error matter here.
    DeveloperMutated {
        action: &'static str,
        result: Result<(), ApiError>,
    },
    /// A sync-status poll round trip completed.
    SyncStatusLoaded(Result<Vec<SyncStatus>, ApiError>),
    /// A manual platform sync was requested.
    SyncTriggered {
        platform: Platform,
        result: Result<(), ApiError>,
    },
    /// A screenshot probe finished.
    ScreenshotProbed { url: String, ok: bool },
    /// A plan checkout session was created; the URL opens in the browser.
    CheckoutSessionCreated(Result<String, ApiError>),
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
pub struct Dashboard {
    pub client: ApiClient,

    // Theme
    /// Current theme variant (for cycling).
    pub theme_variant: ThemeVariant,
    /// Active style map for all UI rendering.
    pub theme: StyleMap,

    // Session and navigation
    pub auth: AuthPhase,
    pub route: Route,

    // Feed
    pub filters: FilterState,
    pub feed: FeedEngine,
    /// Feed page size requested from the backend.
    pub page_limit: u32,

    // Bookmarks
    pub folders: FolderStore,

    // Screenshots
    pub screenshots: ScreenshotTracker,

    // Admin
    pub developers: Vec<Developer>,
    pub sync_status: Vec<SyncStatus>,
    pub poller: SyncPoller,
    pub sync_poll_secs: u64,

    // Selections
    pub selected_card: usize,
    pub selected_folder: usize,
    pub selected_developer: usize,

    // Overlays
    pub folder_picker: Option<FolderPickerState>,
    /// Text buffer while the admin is typing a developer store URL.
    pub developer_input: Option<String>,
    pub pending_confirm: Option<ConfirmAction>,

    // Status message with expiry — Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,
}

impl Dashboard {
    pub fn new(
        client: ApiClient,
        filters: FilterState,
        page_limit: u32,
        sync_poll_secs: u64,
    ) -> Self {
        Self {
            client,
            theme_variant: ThemeVariant::Dark,
            theme: StyleMap::from_palette(&ThemeVariant::Dark.palette()),
            auth: AuthPhase::Loading,
            route: Route::Landing,
            filters,
            feed: FeedEngine::new(),
            page_limit,
            folders: FolderStore::new(),
            screenshots: ScreenshotTracker::new(),
            developers: Vec::new(),
            sync_status: Vec::new(),
            poller: SyncPoller::new(),
            sync_poll_secs,
            selected_card: 0,
            selected_folder: 0,
            selected_developer: 0,
            folder_picker: None,
            developer_input: None,
            pending_confirm: None,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
        }
    }

    /// Switch to a different theme variant at runtime.
    ///
    /// Rebuilds the `StyleMap` from the new variant's palette and
    /// marks the UI as needing a full redraw.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant (Dark → Light → Dark).
    ///
    /// Returns the name of the new theme for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Navigate to `target`, following guard redirects until a route is
    /// allowed or the session is still resolving. Returns `true` if the
    /// current route changed.
    pub fn navigate(&mut self, target: Route) -> bool {
        let mut next = target;
        // Guard redirects terminate: every redirect target is allowed under
        // the phase that produced it, so two hops always suffice.
        for _ in 0..4 {
            match resolve_guard(&next, &self.auth) {
                Guard::Allow | Guard::Pending => break,
                Guard::Redirect(to) => next = to,
            }
        }
        if next == self.route {
            return false;
        }
        tracing::debug!(from = ?self.route, to = ?next, "navigating");
        self.route = next;
        self.needs_redraw = true;
        true
    }

    /// Re-check the current route after a session change. Returns `true` if
    /// a guard forced a move.
    pub fn reapply_guard(&mut self) -> bool {
        self.navigate(self.route.clone())
    }

    // ------------------------------------------------------------------
    // Feed
    // ------------------------------------------------------------------

    /// Wipe the feed and plan a first-page fetch. Used when filters change
    /// or a feed route is entered.
    pub fn reset_feed(&mut self) -> FetchPlan {
        self.selected_card = 0;
        self.needs_redraw = true;
        self.feed.reset()
    }

    /// Plan the next page fetch if the selection sits close enough to the
    /// bottom of the loaded list.
    pub fn maybe_fetch_next(&mut self) -> Option<FetchPlan> {
        if self.selected_card + SENTINEL_MARGIN < self.feed.apps().len() {
            return None;
        }
        self.feed.sentinel_visible()
    }

    /// Get the currently selected app card (bounds-checked).
    pub fn selected_app(&self) -> Option<&App> {
        self.feed.apps().get(self.selected_card)
    }

    /// Get the currently selected folder (bounds-checked).
    pub fn selected_folder(&self) -> Option<&BookmarkFolder> {
        self.folders.folders().get(self.selected_folder)
    }

    /// Get the currently selected developer row (bounds-checked).
    pub fn selected_developer(&self) -> Option<&Developer> {
        self.developers.get(self.selected_developer)
    }

    /// Clamp all selection indices to valid ranges.
    ///
    /// Call this after any operation that may invalidate selection indices,
    /// such as a feed reset, folder deletion, or developer list reload.
    pub fn clamp_selections(&mut self) {
        let apps = self.feed.apps().len();
        self.selected_card = if apps == 0 {
            0
        } else {
            self.selected_card.min(apps - 1)
        };
        let folders = self.folders.len();
        self.selected_folder = if folders == 0 {
            0
        } else {
            self.selected_folder.min(folders - 1)
        };
        let developers = self.developers.len();
        self.selected_developer = if developers == 0 {
            0
        } else {
            self.selected_developer.min(developers - 1)
        };

        debug_assert!(
            self.feed.apps().is_empty() || self.selected_card < self.feed.apps().len(),
            "selected_card {} out of bounds for {} apps",
            self.selected_card,
            self.feed.apps().len()
        );
    }

    /// Navigate up in the list the current route shows.
    pub fn nav_up(&mut self) {
        match self.route {
            Route::Bookmarks => {
                self.selected_folder = self.selected_folder.saturating_sub(1);
            }
            Route::Admin => {
                self.selected_developer = self.selected_developer.saturating_sub(1);
            }
            _ => {
                self.selected_card = self.selected_card.saturating_sub(1);
            }
        }
        self.needs_redraw = true;
    }

    /// Navigate down in the list the current route shows.
    pub fn nav_down(&mut self) {
        match self.route {
            Route::Bookmarks => {
                if !self.folders.is_empty() {
                    let max_index = self.folders.len() - 1;
                    self.selected_folder = self.selected_folder.saturating_add(1).min(max_index);
                }
            }
            Route::Admin => {
                if !self.developers.is_empty() {
                    let max_index = self.developers.len() - 1;
                    self.selected_developer =
                        self.selected_developer.saturating_add(1).min(max_index);
                }
            }
            _ => {
                if !self.feed.apps().is_empty() {
                    let max_index = self.feed.apps().len() - 1;
                    self.selected_card = self.selected_card.saturating_add(1).min(max_index);
                }
            }
        }
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // Folder picker
    // ------------------------------------------------------------------

    /// Open the folder picker for the currently selected app card.
    pub fn open_folder_picker(&mut self) -> bool {
        let Some(app) = self.selected_app() else {
            return false;
        };
        self.folder_picker = Some(FolderPickerState {
            key: app.key.clone(),
            title: app.title.clone(),
            selected: 0,
            filter: String::new(),
            new_folder_input: None,
        });
        self.needs_redraw = true;
        true
    }

    pub fn close_folder_picker(&mut self) {
        self.folder_picker = None;
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Screenshots;
    use chrono::NaiveDate;
    use tokio::time::{self, Duration};

    fn test_dashboard() -> Dashboard {
        let client = ApiClient::new("http://localhost:4000/api", None).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        Dashboard::new(client, FilterState::new(today), 20, 30)
    }

    fn test_app_card(id: &str) -> App {
        App {
            key: AppKey::new(Platform::Ios, id),
            title: format!("Game {id}"),
            developer_name: "Studio".to_string(),
            icon: String::new(),
            release_date: None,
            update_date: None,
            version: "1.0".to_string(),
            version_history_len: 1,
            url: String::new(),
            screenshots: Screenshots::Android(Vec::new()),
        }
    }

    fn page(ids: &[&str], total_pages: u32) -> Page<App> {
        Page {
            data: ids.iter().map(|id| test_app_card(id)).collect(),
            total_pages,
        }
    }

    fn signed_in(dash: &mut Dashboard) {
        dash.auth = AuthPhase::SignedIn(User {
            name: "Ada".to_string(),
            surname: String::new(),
            email: "ada@example.com".to_string(),
            role: "member".to_string(),
            picture: None,
            has_active_plan: true,
        });
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut dash = test_dashboard();
        time::pause();
        dash.set_status("Test message");

        assert!(dash.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        dash.clear_expired_status();
        assert!(dash.status_message.is_some()); // Still present at 2s

        time::advance(Duration::from_secs(2)).await;
        dash.clear_expired_status();
        assert!(dash.status_message.is_none()); // Expired after 3s
    }

    #[tokio::test]
    async fn test_navigate_redirects_signed_out_to_signin() {
        let mut dash = test_dashboard();
        dash.auth = AuthPhase::SignedOut;

        dash.navigate(Route::NewGames);

        assert_eq!(dash.route, Route::SignIn);
    }

    #[tokio::test]
    async fn test_navigate_holds_while_session_loading() {
        let mut dash = test_dashboard();
        assert_eq!(dash.auth, AuthPhase::Loading);

        // Pending: the route is taken and shows a loading screen until
        // /auth/me answers, then reapply_guard settles it
        let changed = dash.navigate(Route::NewGames);

        assert!(changed);
        assert_eq!(dash.route, Route::NewGames);
    }

    #[tokio::test]
    async fn test_reapply_guard_after_session_loads() {
        let mut dash = test_dashboard();
        dash.route = Route::NewGames;
        dash.auth = AuthPhase::SignedOut;

        let moved = dash.reapply_guard();

        assert!(moved);
        assert_eq!(dash.route, Route::SignIn);
    }

    #[tokio::test]
    async fn test_unpaid_user_lands_on_activation() {
        let mut dash = test_dashboard();
        dash.auth = AuthPhase::SignedIn(User {
            name: "Ada".to_string(),
            surname: String::new(),
            email: "ada@example.com".to_string(),
            role: "member".to_string(),
            picture: None,
            has_active_plan: false,
        });

        dash.navigate(Route::NewGames);

        assert_eq!(dash.route, Route::Activation);
    }

    #[tokio::test]
    async fn test_sentinel_fires_near_list_end() {
        let mut dash = test_dashboard();
        signed_in(&mut dash);
        let plan = dash.reset_feed();
        let ids: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        dash.feed
            .apply_page(plan.generation, plan.page, Ok(page(&refs, 3)));

        dash.selected_card = 5;
        assert!(dash.maybe_fetch_next().is_none());

        dash.selected_card = 15; // within SENTINEL_MARGIN of index 19
        let next = dash.maybe_fetch_next().expect("should plan page 2");
        assert_eq!(next.page, 2);
    }

    #[tokio::test]
    async fn test_sentinel_silent_when_exhausted() {
        let mut dash = test_dashboard();
        let plan = dash.reset_feed();
        dash.feed
            .apply_page(plan.generation, plan.page, Ok(page(&["1", "2"], 1)));

        dash.selected_card = 1;
        assert!(dash.maybe_fetch_next().is_none());
    }

    #[tokio::test]
    async fn test_clamp_selections_after_feed_reset() {
        let mut dash = test_dashboard();
        let plan = dash.reset_feed();
        dash.feed
            .apply_page(plan.generation, plan.page, Ok(page(&["1", "2", "3"], 1)));
        dash.selected_card = 2;

        dash.reset_feed();
        dash.clamp_selections();

        assert_eq!(dash.selected_card, 0);
    }

    #[tokio::test]
    async fn test_nav_down_clamps_to_list_end() {
        let mut dash = test_dashboard();
        let plan = dash.reset_feed();
        dash.feed
            .apply_page(plan.generation, plan.page, Ok(page(&["1", "2"], 1)));

        dash.nav_down();
        dash.nav_down();
        dash.nav_down();

        assert_eq!(dash.selected_card, 1);
    }

    #[tokio::test]
    async fn test_nav_routes_to_folder_list_on_bookmarks() {
        let mut dash = test_dashboard();
        signed_in(&mut dash);
        dash.navigate(Route::Bookmarks);
        dash.folders
            .set_folders(vec![BookmarkFolder::empty("A"), BookmarkFolder::empty("B")]);

        dash.nav_down();

        assert_eq!(dash.selected_folder, 1);
        assert_eq!(dash.selected_card, 0);
    }

    #[tokio::test]
    async fn test_folder_picker_opens_for_selected_card() {
        let mut dash = test_dashboard();
        let plan = dash.reset_feed();
        dash.feed
            .apply_page(plan.generation, plan.page, Ok(page(&["42"], 1)));

        assert!(dash.open_folder_picker());
        let picker = dash.folder_picker.as_ref().unwrap();
        assert_eq!(picker.key, AppKey::new(Platform::Ios, "42"));

        dash.close_folder_picker();
        assert!(dash.folder_picker.is_none());
    }

    #[tokio::test]
    async fn test_folder_picker_needs_a_card() {
        let mut dash = test_dashboard();
        assert!(!dash.open_folder_picker());
    }

    #[tokio::test]
    async fn test_picker_filter_matches_case_insensitively() {
        let mut dash = test_dashboard();
        let plan = dash.reset_feed();
        dash.feed
            .apply_page(plan.generation, plan.page, Ok(page(&["42"], 1)));
        dash.open_folder_picker();

        let picker = dash.folder_picker.as_mut().unwrap();
        assert!(picker.matches("Favorites"));

        picker.filter.push_str("fav");
        assert!(picker.matches("Favorites"));
        assert!(!picker.matches("Strategy"));
    }

    #[tokio::test]
    async fn test_cycle_theme_dark_to_light() {
        let mut dash = test_dashboard();
        let name = dash.cycle_theme();
        assert_eq!(name, "Light");
        assert_eq!(dash.theme_variant, ThemeVariant::Light);
        assert!(dash.needs_redraw);
    }
}
