//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette — semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
///
/// Each field corresponds to a specific visual element in the TUI.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- App cards --
    pub card_title: Style,
    pub card_selected: Style,
    pub card_developer: Style,
    pub card_date: Style,
    pub card_bookmark: Style,
    pub card_platform_ios: Style,
    pub card_platform_android: Style,
    pub card_new_badge: Style,
    pub card_screenshot_pending: Style,

    // -- Filter bar --
    pub filter_label: Style,
    pub filter_active: Style,

    // -- Folder grid --
    pub folder_title: Style,
    pub folder_selected: Style,
    pub folder_count: Style,
    pub folder_default_badge: Style,

    // -- Admin table --
    pub admin_header: Style,
    pub admin_selected: Style,
    pub admin_active: Style,
    pub admin_inactive: Style,
    pub admin_publisher: Style,
    pub sync_idle: Style,
    pub sync_running: Style,
    pub sync_failed: Style,

    // -- Notices --
    pub notice_error: Style,
    pub notice_info: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub popup_border: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            // App cards
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            card_developer: Style::default().fg(Color::Cyan),
            card_date: Style::default().fg(Color::DarkGray),
            card_bookmark: Style::default().fg(Color::Yellow),
            card_platform_ios: Style::default().fg(Color::White).bg(Color::Black),
            card_platform_android: Style::default().fg(Color::Green),
            card_new_badge: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            card_screenshot_pending: Style::default().fg(Color::DarkGray),

            // Filter bar
            filter_label: Style::default().fg(Color::DarkGray),
            filter_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            // Folder grid
            folder_title: Style::default().add_modifier(Modifier::BOLD),
            folder_selected: Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            folder_count: Style::default().fg(Color::DarkGray),
            folder_default_badge: Style::default().fg(Color::Yellow),

            // Admin table
            admin_header: Style::default().add_modifier(Modifier::BOLD),
            admin_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            admin_active: Style::default().fg(Color::Green),
            admin_inactive: Style::default().fg(Color::DarkGray),
            admin_publisher: Style::default().fg(Color::Magenta),
            sync_idle: Style::default().fg(Color::DarkGray),
            sync_running: Style::default().fg(Color::Yellow),
            sync_failed: Style::default().fg(Color::Red),

            // Notices
            notice_error: Style::default().fg(Color::Red),
            notice_info: Style::default().fg(Color::Yellow),

            // Chrome
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            popup_border: Style::default().fg(Color::Yellow),
        }
    }

    /// Light palette — adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            // App cards
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_selected: Style::default().bg(Color::Blue).fg(Color::White),
            card_developer: Style::default().fg(Color::Blue),
            card_date: Style::default().fg(Color::DarkGray),
            card_bookmark: Style::default().fg(Color::Magenta),
            card_platform_ios: Style::default().fg(Color::Black),
            card_platform_android: Style::default().fg(Color::Green),
            card_new_badge: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            card_screenshot_pending: Style::default().fg(Color::DarkGray),

            // Filter bar
            filter_label: Style::default().fg(Color::DarkGray),
            filter_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            // Folder grid
            folder_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            folder_selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            folder_count: Style::default().fg(Color::DarkGray),
            folder_default_badge: Style::default().fg(Color::Magenta),

            // Admin table
            admin_header: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            admin_selected: Style::default().bg(Color::Blue).fg(Color::White),
            admin_active: Style::default().fg(Color::Green),
            admin_inactive: Style::default().fg(Color::DarkGray),
            admin_publisher: Style::default().fg(Color::Magenta),
            sync_idle: Style::default().fg(Color::DarkGray),
            sync_running: Style::default().fg(Color::Magenta),
            sync_failed: Style::default().fg(Color::Red),

            // Notices
            notice_error: Style::default().fg(Color::Red),
            notice_info: Style::default().fg(Color::Magenta),

            // Chrome
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            popup_border: Style::default().fg(Color::Magenta),
        }
    }
}

// ============================================================================
// Style Map — string-keyed lookup for config-driven overrides
// ============================================================================

/// String-keyed style lookup for dynamic/config-driven overrides.
///
/// Built from a `ColorPalette`, this allows resolving role names (e.g.
/// `"card_selected"`) to their concrete `Style` at runtime.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 29] = [
    "card_title",
    "card_selected",
    "card_developer",
    "card_date",
    "card_bookmark",
    "card_platform_ios",
    "card_platform_android",
    "card_new_badge",
    "card_screenshot_pending",
    "filter_label",
    "filter_active",
    "folder_title",
    "folder_selected",
    "folder_count",
    "folder_default_badge",
    "admin_header",
    "admin_selected",
    "admin_active",
    "admin_inactive",
    "admin_publisher",
    "sync_idle",
    "sync_running",
    "sync_failed",
    "notice_error",
    "notice_info",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "popup_border",
];

impl StyleMap {
    /// Build a `StyleMap` from a `ColorPalette`.
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 29] = [
            p.card_title,
            p.card_selected,
            p.card_developer,
            p.card_date,
            p.card_bookmark,
            p.card_platform_ios,
            p.card_platform_android,
            p.card_new_badge,
            p.card_screenshot_pending,
            p.filter_label,
            p.filter_active,
            p.folder_title,
            p.folder_selected,
            p.folder_count,
            p.folder_default_badge,
            p.admin_header,
            p.admin_selected,
            p.admin_active,
            p.admin_inactive,
            p.admin_publisher,
            p.sync_idle,
            p.sync_running,
            p.sync_failed,
            p.notice_error,
            p.notice_info,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.popup_border,
        ];

        let mut map = HashMap::with_capacity(ROLE_NAMES.len());
        for (name, style) in ROLE_NAMES.iter().zip(styles.iter()) {
            map.insert(*name, *style);
        }

        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_palette_card_selected() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.card_selected,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
    }

    #[test]
    fn dark_palette_focus_border() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.panel_border_focused,
            Style::default().fg(Color::Cyan)
        );
    }

    #[test]
    fn dark_palette_status_bar() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.status_bar,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
    }

    #[test]
    fn dark_palette_bookmark_marker() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(palette.card_bookmark, Style::default().fg(Color::Yellow));
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        // Light selection uses Blue bg instead of DarkGray
        assert_ne!(dark.card_selected, light.card_selected);
        assert_ne!(dark.folder_selected, light.folder_selected);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(
            ThemeVariant::from_str_name("dark"),
            Some(ThemeVariant::Dark)
        );
        assert_eq!(
            ThemeVariant::from_str_name("Light"),
            Some(ThemeVariant::Light)
        );
        assert_eq!(
            ThemeVariant::from_str_name("DARK"),
            Some(ThemeVariant::Dark)
        );
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);

        assert_eq!(sm.resolve("card_selected"), palette.card_selected);
        assert_eq!(sm.resolve("sync_running"), palette.sync_running);
        assert_eq!(sm.resolve("status_bar"), palette.status_bar);
    }

    #[test]
    fn style_map_returns_default_for_unknown() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn style_map_has_all_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        for name in ROLE_NAMES {
            assert_ne!(
                sm.map.get(name),
                None,
                "Role '{}' missing from StyleMap",
                name
            );
        }
    }

    #[test]
    fn role_names_count_matches_palette_fields() {
        // Ensure ROLE_NAMES array stays in sync with palette fields.
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
    }
}
