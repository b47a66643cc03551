//! GameScout: a terminal market-research dashboard for mobile games.
//!
//! Talks to the GameScout backend API to show a paginated feed of newly
//! released and recently updated apps, bookmark folders, and the admin
//! screens for tracked developers and scraper jobs.

pub mod api;
pub mod app;
pub mod bookmarks;
pub mod config;
pub mod feed;
pub mod filters;
pub mod jobs;
pub mod model;
pub mod screenshots;
pub mod session;
pub mod theme;
pub mod ui;
pub mod util;
