//! The feed pagination engine.
//!
//! Owns the accumulated app list for one feed view and the state machine
//! that drives infinite scroll: filter changes reset to page 1, a sentinel
//! signal near the end of the rendered list requests the next page, and
//! `page < totalPages` decides whether more pages exist.
//!
//! Every fetch plan carries a monotonically increasing generation token.
//! A filter-driven reset bumps the generation, so a response from a
//! superseded in-flight fetch is discarded instead of being appended to the
//! wrong result set. Out-of-order arrival therefore cannot corrupt the
//! accumulated list.

use crate::api::ApiError;
use crate::model::{App, Page};

// ============================================================================
// Phases
// ============================================================================

/// Feed state machine phases.
///
/// Only one fetch may be in flight at a time: `sentinel_visible` refuses to
/// plan a fetch unless the engine is `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// No fetch in flight; more pages may exist.
    Idle,
    /// Page 1 is being fetched after a reset; the list will be replaced.
    LoadingFirstPage,
    /// A subsequent page is being fetched; the list will be extended.
    LoadingNextPage,
    /// The last page has been loaded; the scroll sentinel is retired.
    Exhausted,
    /// The most recent fetch failed. Accumulated apps are untouched and no
    /// automatic retry happens; only a reset leaves this phase.
    Error,
}

// ============================================================================
// Fetch Plans and Outcomes
// ============================================================================

/// A fetch the engine has committed to. The caller issues the request and
/// feeds the response back through [`FeedEngine::apply_page`] with the same
/// page number and generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    pub page: u32,
    pub generation: u64,
}

/// Result of applying a fetched page to the engine.
#[derive(Debug, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was merged into the accumulated list.
    Applied { appended: usize, exhausted: bool },
    /// The response belonged to a superseded generation and was dropped.
    Stale,
    /// The fetch failed; the engine is now in `Error`.
    Failed,
}

// ============================================================================
// Engine
// ============================================================================

/// Pagination engine for one feed view.
///
/// UI-agnostic: the TUI translates "selection scrolled near the end of the
/// list" into [`sentinel_visible`](Self::sentinel_visible) calls, the same
/// signal a viewport intersection observer would provide.
#[derive(Debug)]
pub struct FeedEngine {
    phase: FeedPhase,
    /// Accumulated apps across fetched pages, in fetch order.
    apps: Vec<App>,
    /// Last successfully loaded page (0 before any page has landed).
    page: u32,
    /// Authoritative total supplied by the backend per request.
    total_pages: u32,
    /// Token of the current request lineage; bumped on every reset.
    generation: u64,
    last_error: Option<String>,
}

impl Default for FeedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedEngine {
    pub fn new() -> Self {
        Self {
            phase: FeedPhase::Idle,
            apps: Vec::new(),
            page: 0,
            total_pages: 1,
            generation: 0,
            last_error: None,
        }
    }

    /// Filter-tuple change: drop accumulated apps, return to page 1, and
    /// supersede any in-flight fetch by bumping the generation.
    pub fn reset(&mut self) -> FetchPlan {
        self.generation = self.generation.wrapping_add(1);
        self.apps.clear();
        self.page = 0;
        self.total_pages = 1;
        self.last_error = None;
        self.phase = FeedPhase::LoadingFirstPage;
        FetchPlan {
            page: 1,
            generation: self.generation,
        }
    }

    /// The scroll sentinel became visible. Plans the next page only when
    /// more pages exist and no fetch is in flight; intersection signals
    /// during a load or after exhaustion are ignored.
    pub fn sentinel_visible(&mut self) -> Option<FetchPlan> {
        if self.phase != FeedPhase::Idle || !self.has_more() {
            return None;
        }
        self.phase = FeedPhase::LoadingNextPage;
        Some(FetchPlan {
            page: self.page + 1,
            generation: self.generation,
        })
    }

    /// Merge a fetched page into the engine.
    ///
    /// Responses whose generation no longer matches are discarded without
    /// touching state. Page 1 replaces the accumulated list; later pages
    /// append in arrival order. Failures move to `Error` and leave the
    /// accumulated apps intact.
    pub fn apply_page(
        &mut self,
        generation: u64,
        page: u32,
        result: Result<Page<App>, ApiError>,
    ) -> PageOutcome {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                page,
                "Discarding response from superseded feed fetch"
            );
            return PageOutcome::Stale;
        }

        match result {
            Ok(fetched) => {
                let appended = fetched.data.len();
                if page <= 1 {
                    self.apps = fetched.data;
                } else {
                    self.apps.extend(fetched.data);
                }
                self.page = page;
                self.total_pages = fetched.total_pages;
                let exhausted = !self.has_more();
                self.phase = if exhausted {
                    FeedPhase::Exhausted
                } else {
                    FeedPhase::Idle
                };
                tracing::debug!(
                    page,
                    total_pages = self.total_pages,
                    appended,
                    accumulated = self.apps.len(),
                    "Feed page applied"
                );
                PageOutcome::Applied { appended, exhausted }
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "Feed fetch failed");
                self.last_error = Some(e.to_string());
                self.phase = FeedPhase::Error;
                PageOutcome::Failed
            }
        }
    }

    /// `currentPage < totalPages`, per the backend's authoritative count.
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn apps(&self) -> &[App] {
        &self.apps
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.phase,
            FeedPhase::LoadingFirstPage | FeedPhase::LoadingNextPage
        )
    }

    /// Explicit "no results" state: page 1 came back empty and nothing is
    /// loading. Rendered instead of an empty grid.
    pub fn shows_no_results(&self) -> bool {
        self.apps.is_empty() && !self.is_loading() && self.page > 0
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppKey, Platform, Screenshots};

    fn test_app(id: &str) -> App {
        App {
            key: AppKey::Android {
                bundle_id: id.to_string(),
            },
            title: format!("App {}", id),
            developer_name: "Dev".to_string(),
            icon: String::new(),
            release_date: None,
            update_date: None,
            version: "1.0".to_string(),
            version_history_len: 0,
            url: String::new(),
            screenshots: Screenshots::Android(Vec::new()),
        }
    }

    fn page(ids: &[&str], total_pages: u32) -> Page<App> {
        Page {
            data: ids.iter().map(|id| test_app(id)).collect(),
            total_pages,
        }
    }

    fn ids(engine: &FeedEngine) -> Vec<&str> {
        engine.apps().iter().map(|a| a.key.id()).collect()
    }

    #[test]
    fn test_reset_plans_first_page() {
        let mut engine = FeedEngine::new();
        let plan = engine.reset();
        assert_eq!(plan.page, 1);
        assert_eq!(engine.phase(), FeedPhase::LoadingFirstPage);
        assert!(engine.apps().is_empty());
    }

    #[test]
    fn test_pages_accumulate_in_fetch_order() {
        let mut engine = FeedEngine::new();
        let plan = engine.reset();
        engine.apply_page(plan.generation, 1, Ok(page(&["a", "b"], 3)));
        assert_eq!(engine.phase(), FeedPhase::Idle);

        let plan = engine.sentinel_visible().unwrap();
        assert_eq!(plan.page, 2);
        engine.apply_page(plan.generation, 2, Ok(page(&["c"], 3)));

        let plan = engine.sentinel_visible().unwrap();
        assert_eq!(plan.page, 3);
        engine.apply_page(plan.generation, 3, Ok(page(&["d", "e"], 3)));

        assert_eq!(ids(&engine), ["a", "b", "c", "d", "e"]);
        assert_eq!(engine.phase(), FeedPhase::Exhausted);
        assert!(!engine.has_more());
    }

    #[test]
    fn test_exhausted_engine_ignores_sentinel() {
        let mut engine = FeedEngine::new();
        let plan = engine.reset();
        engine.apply_page(plan.generation, 1, Ok(page(&["a"], 1)));
        assert_eq!(engine.phase(), FeedPhase::Exhausted);
        assert!(engine.sentinel_visible().is_none());
        assert!(engine.sentinel_visible().is_none());
    }

    #[test]
    fn test_single_page_response_triggers_no_follow_up() {
        // GET ...page=1&limit=20 -> totalPages: 1 means zero subsequent fetches
        let mut engine = FeedEngine::new();
        let plan = engine.reset();
        let outcome = engine.apply_page(plan.generation, 1, Ok(page(&["a", "b"], 1)));
        assert_eq!(
            outcome,
            PageOutcome::Applied {
                appended: 2,
                exhausted: true
            }
        );
        assert!(!engine.has_more());
        assert!(engine.sentinel_visible().is_none());
    }

    #[test]
    fn test_sentinel_ignored_while_loading() {
        let mut engine = FeedEngine::new();
        let plan = engine.reset();
        engine.apply_page(plan.generation, 1, Ok(page(&["a"], 5)));

        let first = engine.sentinel_visible();
        assert!(first.is_some());
        // Fetch in flight: further intersection signals are no-ops
        assert!(engine.sentinel_visible().is_none());
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut engine = FeedEngine::new();
        let old = engine.reset();
        engine.apply_page(old.generation, 1, Ok(page(&["a"], 5)));
        let in_flight = engine.sentinel_visible().unwrap();

        // Filter change while page 2 is in flight
        let fresh = engine.reset();
        let outcome = engine.apply_page(in_flight.generation, 2, Ok(page(&["zzz"], 5)));
        assert_eq!(outcome, PageOutcome::Stale);
        assert!(engine.apps().is_empty());

        // The superseding fetch still lands normally
        engine.apply_page(fresh.generation, 1, Ok(page(&["b"], 1)));
        assert_eq!(ids(&engine), ["b"]);
    }

    #[test]
    fn test_failure_preserves_accumulated_apps() {
        let mut engine = FeedEngine::new();
        let plan = engine.reset();
        engine.apply_page(plan.generation, 1, Ok(page(&["a", "b"], 3)));

        let plan = engine.sentinel_visible().unwrap();
        let outcome = engine.apply_page(plan.generation, 2, Err(ApiError::HttpStatus(500)));

        assert_eq!(outcome, PageOutcome::Failed);
        assert_eq!(engine.phase(), FeedPhase::Error);
        assert_eq!(ids(&engine), ["a", "b"]);
        assert!(engine.last_error().is_some());
        // No automatic retry: the sentinel is dead until a reset
        assert!(engine.sentinel_visible().is_none());
    }

    #[test]
    fn test_reset_recovers_from_error() {
        let mut engine = FeedEngine::new();
        let plan = engine.reset();
        engine.apply_page(plan.generation, 1, Err(ApiError::HttpStatus(502)));
        assert_eq!(engine.phase(), FeedPhase::Error);

        let plan = engine.reset();
        assert_eq!(engine.phase(), FeedPhase::LoadingFirstPage);
        engine.apply_page(plan.generation, 1, Ok(page(&["a"], 1)));
        assert_eq!(ids(&engine), ["a"]);
        assert!(engine.last_error().is_none());
    }

    #[test]
    fn test_empty_first_page_shows_no_results() {
        let mut engine = FeedEngine::new();
        let plan = engine.reset();
        assert!(!engine.shows_no_results()); // still loading
        engine.apply_page(plan.generation, 1, Ok(page(&[], 1)));
        assert!(engine.shows_no_results());
    }

    #[test]
    fn test_first_page_replaces_rather_than_appends() {
        let mut engine = FeedEngine::new();
        let plan = engine.reset();
        engine.apply_page(plan.generation, 1, Ok(page(&["a"], 2)));

        let plan = engine.reset();
        engine.apply_page(plan.generation, 1, Ok(page(&["b"], 2)));
        assert_eq!(ids(&engine), ["b"]);
    }

    #[test]
    fn test_accumulated_length_is_sum_of_page_sizes() {
        let mut engine = FeedEngine::new();
        let plan = engine.reset();
        engine.apply_page(plan.generation, 1, Ok(page(&["a", "b", "c"], 4)));
        let mut expected = 3;

        for (n, size) in [(2u32, 2usize), (3, 1), (4, 3)] {
            let plan = engine.sentinel_visible().unwrap();
            assert_eq!(plan.page, n);
            let page_ids: Vec<String> = (0..size).map(|i| format!("p{}x{}", n, i)).collect();
            let refs: Vec<&str> = page_ids.iter().map(String::as_str).collect();
            engine.apply_page(plan.generation, n, Ok(page(&refs, 4)));
            expected += size;
            assert_eq!(engine.apps().len(), expected);
        }
        assert_eq!(engine.phase(), FeedPhase::Exhausted);
    }
}
