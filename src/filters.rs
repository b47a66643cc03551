//! Date-range presets and the filter tuple that parameterizes feed fetches.
//!
//! Presets resolve against "today" at the moment they are selected, not on
//! every render. Switching to `Custom` leaves the current start/end values
//! under direct user control; switching to any other preset always
//! overwrites both dates.

use crate::model::PlatformFilter;
use chrono::{Days, NaiveDate};

// ============================================================================
// Range Presets
// ============================================================================

/// Named shorthand for a concrete date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePreset {
    #[default]
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    Custom,
}

impl RangePreset {
    /// Resolve the preset to concrete inclusive (start, end) dates.
    ///
    /// Returns `None` for `Custom`, which never overwrites user-supplied
    /// dates. `today` is injected so resolution is pure and testable.
    pub fn resolve(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let back = |days: u64| today.checked_sub_days(Days::new(days)).unwrap_or(today);
        match self {
            Self::Today => Some((today, today)),
            Self::Yesterday => Some((back(1), back(1))),
            Self::Last7Days => Some((back(6), today)),
            Self::Last30Days => Some((back(29), today)),
            Self::Custom => None,
        }
    }

    /// Cycle for the range toggle, in filter-bar display order.
    pub fn next(self) -> Self {
        match self {
            Self::Today => Self::Yesterday,
            Self::Yesterday => Self::Last7Days,
            Self::Last7Days => Self::Last30Days,
            Self::Last30Days => Self::Custom,
            Self::Custom => Self::Today,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::Last7Days => "7 days",
            Self::Last30Days => "30 days",
            Self::Custom => "Custom",
        }
    }
}

// ============================================================================
// Filter State
// ============================================================================

/// The filter tuple owned by a page and passed down to the feed engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub platform: PlatformFilter,
    pub preset: RangePreset,
    /// Folder scope: restricts the feed to one bookmark folder.
    pub folder: Option<String>,
    /// Restrict the feed to developers flagged as publishers.
    pub publishers_only: bool,
}

/// The subset of filter state whose change forces a feed reset.
/// Preset identity is deliberately excluded: only the resolved dates and
/// platform matter to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterFingerprint {
    start: NaiveDate,
    end: NaiveDate,
    platform: PlatformFilter,
    folder: Option<String>,
    publishers_only: bool,
}

impl FilterState {
    /// Fresh filter state: "today" preset, all platforms, unscoped.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            start: today,
            end: today,
            platform: PlatformFilter::All,
            preset: RangePreset::Today,
            folder: None,
            publishers_only: false,
        }
    }

    /// Select a preset, resolving dates against the supplied `today`.
    ///
    /// Non-custom presets deterministically overwrite start/end even if the
    /// user edited them manually while on Custom. Custom is a no-op on dates.
    pub fn set_preset(&mut self, preset: RangePreset, today: NaiveDate) {
        self.preset = preset;
        if let Some((start, end)) = preset.resolve(today) {
            self.start = start;
            self.end = end;
        }
    }

    /// Directly set the custom date range. Implies the Custom preset.
    pub fn set_custom_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.preset = RangePreset::Custom;
        self.start = start;
        self.end = end;
    }

    /// Change fingerprint for reset detection in the feed engine.
    pub fn fingerprint(&self) -> FilterFingerprint {
        FilterFingerprint {
            start: self.start,
            end: self.end,
            platform: self.platform,
            folder: self.folder.clone(),
            publishers_only: self.publishers_only,
        }
    }

    /// ISO `YYYY-MM-DD` start date for the query string.
    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// ISO `YYYY-MM-DD` end date for the query string.
    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_resolves_to_single_day() {
        let today = day(2024, 6, 15);
        assert_eq!(RangePreset::Today.resolve(today), Some((today, today)));
    }

    #[test]
    fn test_yesterday_resolves_to_single_prior_day() {
        let today = day(2024, 6, 15);
        let yest = day(2024, 6, 14);
        assert_eq!(RangePreset::Yesterday.resolve(today), Some((yest, yest)));
    }

    #[test]
    fn test_seven_days_spans_six_back() {
        let today = day(2024, 6, 15);
        assert_eq!(
            RangePreset::Last7Days.resolve(today),
            Some((day(2024, 6, 9), today))
        );
    }

    #[test]
    fn test_thirty_days_spans_twenty_nine_back() {
        let today = day(2024, 6, 15);
        assert_eq!(
            RangePreset::Last30Days.resolve(today),
            Some((day(2024, 5, 17), today))
        );
    }

    #[test]
    fn test_custom_resolves_to_none() {
        assert_eq!(RangePreset::Custom.resolve(day(2024, 6, 15)), None);
    }

    #[test]
    fn test_preset_crosses_month_boundary() {
        let today = day(2024, 3, 2);
        assert_eq!(
            RangePreset::Last7Days.resolve(today),
            Some((day(2024, 2, 25), today))
        );
    }

    #[test]
    fn test_set_preset_overwrites_manual_edits() {
        let today = day(2024, 6, 15);
        let mut filters = FilterState::new(today);
        filters.set_custom_range(day(2020, 1, 1), day(2020, 12, 31));

        filters.set_preset(RangePreset::Yesterday, today);

        assert_eq!(filters.start, day(2024, 6, 14));
        assert_eq!(filters.end, day(2024, 6, 14));
    }

    #[test]
    fn test_switching_to_custom_keeps_dates() {
        let today = day(2024, 6, 15);
        let mut filters = FilterState::new(today);
        filters.set_preset(RangePreset::Last7Days, today);
        let (start, end) = (filters.start, filters.end);

        filters.set_preset(RangePreset::Custom, today);

        assert_eq!(filters.start, start);
        assert_eq!(filters.end, end);
    }

    #[test]
    fn test_fingerprint_ignores_preset_identity() {
        let today = day(2024, 6, 15);
        let mut a = FilterState::new(today);
        let mut b = FilterState::new(today);
        // Same resolved dates via different presets
        a.set_preset(RangePreset::Today, today);
        b.set_custom_range(today, today);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_changes_with_platform() {
        let today = day(2024, 6, 15);
        let mut a = FilterState::new(today);
        let b = FilterState::new(today);
        a.platform = PlatformFilter::Ios;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_changes_with_folder_scope() {
        let today = day(2024, 6, 15);
        let mut a = FilterState::new(today);
        let b = FilterState::new(today);
        a.folder = Some("Favorites".to_string());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    proptest! {
        /// For every non-custom preset: start <= end and both dates fall
        /// within [today - 29, today].
        #[test]
        fn prop_presets_yield_ordered_recent_ranges(
            days_offset in 0u64..20_000,
            preset_idx in 0usize..4,
        ) {
            let base = day(1970, 1, 1);
            let today = base.checked_add_days(Days::new(days_offset)).unwrap();
            let preset = [
                RangePreset::Today,
                RangePreset::Yesterday,
                RangePreset::Last7Days,
                RangePreset::Last30Days,
            ][preset_idx];

            let (start, end) = preset.resolve(today).unwrap();
            prop_assert!(start <= end);
            prop_assert!(end <= today);
            prop_assert!(start >= today.checked_sub_days(Days::new(29)).unwrap_or(today));
        }
    }
}
