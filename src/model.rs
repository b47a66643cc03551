//! Wire and domain types for the market-research backend.
//!
//! The backend speaks JSON with camelCase keys and discriminates apps by
//! `platform`: iOS apps carry an `appId` and bucketed screenshots, Android
//! apps carry a `bundleId` and a flat screenshot list. Deserialization goes
//! through raw row structs and converts into domain types that make the
//! exactly-one-identifier invariant unrepresentable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Invariant violations detected while converting wire rows to domain types.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An iOS app row without an `appId`, or an Android row without a `bundleId`.
    #[error("App '{title}' is missing the identifier for platform {platform}")]
    MissingId { platform: Platform, title: String },

    /// A row carrying both `appId` and `bundleId` — never valid.
    #[error("App '{title}' carries both appId and bundleId")]
    ConflictingIds { title: String },
}

// ============================================================================
// Platform
// ============================================================================

/// Store platform an app was released on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// Lowercase wire/query representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform scope for feed queries. Unlike [`Platform`] this includes `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformFilter {
    #[default]
    All,
    Android,
    Ios,
}

impl PlatformFilter {
    /// Query-string value expected by the backend (`platform=` parameter).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }

    /// Whether an app of the given platform falls inside this scope.
    pub fn matches(self, platform: Platform) -> bool {
        match self {
            Self::All => true,
            Self::Android => platform == Platform::Android,
            Self::Ios => platform == Platform::Ios,
        }
    }

    /// Cycle for the platform toggle: All → Android → iOS → All.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Android,
            Self::Android => Self::Ios,
            Self::Ios => Self::All,
        }
    }

    /// Label for the filter bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Android => "Android",
            Self::Ios => "iOS",
        }
    }
}

// ============================================================================
// App Identity
// ============================================================================

/// Platform-discriminated app identity.
///
/// Exactly one identifier exists per app, determined by platform: the App
/// Store id for iOS, the package bundle id for Android. Using a tagged enum
/// makes "both" and "neither" unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppKey {
    Ios { app_id: String },
    Android { bundle_id: String },
}

impl AppKey {
    pub fn new(platform: Platform, id: impl Into<String>) -> Self {
        match platform {
            Platform::Ios => Self::Ios { app_id: id.into() },
            Platform::Android => Self::Android {
                bundle_id: id.into(),
            },
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            Self::Ios { .. } => Platform::Ios,
            Self::Android { .. } => Platform::Android,
        }
    }

    /// The platform-specific identifier (appId or bundleId).
    pub fn id(&self) -> &str {
        match self {
            Self::Ios { app_id } => app_id,
            Self::Android { bundle_id } => bundle_id,
        }
    }
}

// ============================================================================
// Screenshots
// ============================================================================

/// Device/form-factor keys in the order the dashboard prefers them.
/// The first non-empty bucket wins when flattening iOS screenshots.
pub const DEVICE_PRIORITY: [&str; 8] = [
    "iphone_6_5",
    "ipadPro_2018",
    "iphone_d74",
    "ipad",
    "iphone",
    "iphone5",
    "iphone6",
    "iphone6+",
];

/// Screenshot storage mirrors the two wire shapes: iOS buckets screenshots
/// by device key, Android ships a flat ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screenshots {
    Ios(BTreeMap<String, Vec<String>>),
    Android(Vec<String>),
}

impl Screenshots {
    /// Flattened, ordered screenshot URLs for rendering.
    ///
    /// iOS: the first non-empty bucket in [`DEVICE_PRIORITY`] order, falling
    /// back to the first non-empty bucket of any key. Android: the flat list.
    pub fn urls(&self) -> &[String] {
        match self {
            Self::Android(list) => list,
            Self::Ios(by_type) => {
                for key in DEVICE_PRIORITY {
                    if let Some(bucket) = by_type.get(key) {
                        if !bucket.is_empty() {
                            return bucket;
                        }
                    }
                }
                by_type
                    .values()
                    .find(|bucket| !bucket.is_empty())
                    .map(Vec::as_slice)
                    .unwrap_or(&[])
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.urls().is_empty()
    }
}

// ============================================================================
// App
// ============================================================================

/// One app in the feed: identity plus the attributes the cards render.
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    pub key: AppKey,
    pub title: String,
    pub developer_name: String,
    pub icon: String,
    pub release_date: Option<DateTime<Utc>>,
    pub update_date: Option<DateTime<Utc>>,
    pub version: String,
    /// Number of entries in the store's version history. The iOS card footer
    /// shows `len - 1` as the update count.
    pub version_history_len: usize,
    /// Store page URL (App Store or Play Store).
    pub url: String,
    pub screenshots: Screenshots,
}

impl App {
    pub fn platform(&self) -> Platform {
        self.key.platform()
    }
}

/// iOS screenshot entry on the wire: `{ "url": "..." }`.
#[derive(Debug, Deserialize)]
struct IosScreenshot {
    url: String,
}

/// Raw wire row for an app. Converts to [`App`] via `TryFrom`, which is
/// where the one-identifier-per-platform invariant is enforced.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppRow {
    platform: Platform,
    #[serde(default)]
    app_id: Option<String>,
    #[serde(default)]
    bundle_id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    developer_name: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    update_date: Option<DateTime<Utc>>,
    #[serde(default)]
    version: String,
    #[serde(default)]
    version_history: Vec<serde_json::Value>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    screenshots_by_type: Option<BTreeMap<String, Vec<IosScreenshot>>>,
    #[serde(default)]
    screenshots: Option<Vec<String>>,
}

impl TryFrom<AppRow> for App {
    type Error = ModelError;

    fn try_from(row: AppRow) -> Result<Self, Self::Error> {
        if row.app_id.is_some() && row.bundle_id.is_some() {
            return Err(ModelError::ConflictingIds { title: row.title });
        }

        let key = match row.platform {
            Platform::Ios => match row.app_id {
                Some(app_id) => AppKey::Ios { app_id },
                None => {
                    return Err(ModelError::MissingId {
                        platform: Platform::Ios,
                        title: row.title,
                    })
                }
            },
            Platform::Android => match row.bundle_id {
                Some(bundle_id) => AppKey::Android { bundle_id },
                None => {
                    return Err(ModelError::MissingId {
                        platform: Platform::Android,
                        title: row.title,
                    })
                }
            },
        };

        let screenshots = match row.platform {
            Platform::Ios => Screenshots::Ios(
                row.screenshots_by_type
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(device, shots)| {
                        (device, shots.into_iter().map(|s| s.url).collect())
                    })
                    .collect(),
            ),
            Platform::Android => Screenshots::Android(row.screenshots.unwrap_or_default()),
        };

        Ok(App {
            key,
            title: row.title,
            developer_name: row.developer_name,
            icon: row.icon,
            release_date: row.release_date,
            update_date: row.update_date,
            version: row.version,
            version_history_len: row.version_history.len(),
            url: row.url,
            screenshots,
        })
    }
}

impl<'de> Deserialize<'de> for App {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let row = AppRow::deserialize(deserializer)?;
        App::try_from(row).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Bookmarks
// ============================================================================

/// One bookmarked app inside a folder, identified by (platform, id).
///
/// The wire field is named `appId` for both platforms; for Android it carries
/// the bundle id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub app_id: String,
    pub platform: Platform,
}

impl Bookmark {
    /// Membership check: platform AND platform-specific id must both match.
    pub fn matches(&self, key: &AppKey) -> bool {
        self.platform == key.platform() && self.app_id == key.id()
    }
}

impl From<&AppKey> for Bookmark {
    fn from(key: &AppKey) -> Self {
        Self {
            app_id: key.id().to_string(),
            platform: key.platform(),
        }
    }
}

/// A named, user-owned grouping of bookmarks. Names are unique per user
/// (case-sensitive). Default folders cannot be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkFolder {
    pub name: String,
    #[serde(default)]
    pub apps: Vec<Bookmark>,
    #[serde(default, rename = "isDefault")]
    pub is_default: bool,
}

impl BookmarkFolder {
    /// A freshly created folder with no members.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            apps: Vec::new(),
            is_default: false,
        }
    }

    pub fn contains(&self, key: &AppKey) -> bool {
        self.apps.iter().any(|b| b.matches(key))
    }
}

// ============================================================================
// Pagination Envelope
// ============================================================================

/// Paginated response envelope: `{ "data": [...], "totalPages": n }`.
/// `totalPages` is authoritative and supplied by the backend per request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_pages: u32,
}

// ============================================================================
// Developers (admin)
// ============================================================================

/// A tracked developer/publisher account on one store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    #[serde(rename = "_id")]
    pub id: String,
    pub developer_id: String,
    pub name: String,
    pub platform: Platform,
    #[serde(default)]
    pub url: String,
    pub active: bool,
    #[serde(default)]
    pub is_publisher: bool,
    #[serde(default)]
    pub apps_last_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub apps_last_scraped_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Scrape Jobs
// ============================================================================

/// Lifecycle state of a platform's scrape job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Idle,
    Running,
    Failed,
}

impl SyncState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Failed => "failed",
        }
    }
}

/// One entry from `GET /jobs/sync-status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub platform: Platform,
    pub status: SyncState,
    #[serde(default)]
    pub last_run_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Users
// ============================================================================

/// Session user returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub surname: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub picture: Option<String>,
    /// Billing entitlement gating access to the main application routes.
    #[serde(default)]
    pub has_active_plan: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

// ============================================================================
// Tests
// ============================================================================
