//! Terminal User Interface module.
//!
//! This module provides the TUI for the market-research dashboard:
//! - Main event loop (`run`)
//! - Keyboard input handling per route and overlay
//! - Rendering for the feed cards, bookmark folders, and admin screens
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch and overlays
//! - `helpers` - Task spawning and route-entry side effects
//! - `cards` - Feed card list widget
//! - `folders` - Bookmark folder list widget
//! - `admin` - Developer table and sync status widget
//! - `notices` - Landing, sign-in, activation, and not-found screens
//! - `status` - Status bar widget

mod admin;
mod cards;
mod events;
mod folders;
mod helpers;
mod input;
mod loop_runner;
mod notices;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
