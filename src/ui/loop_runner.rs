//! Main event loop for the TUI.
//!
//! This module contains the core event loop that multiplexes terminal input,
//! background task events, and periodic ticks.

use crate::app::{AppEvent, Dashboard};
use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::helpers::spawn_screenshot_probes;
use super::input::handle_input;
use super::render::render;

/// Result of handling a key press event.
///
/// Returned by input handlers to signal whether the application should
/// continue running or terminate gracefully.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex three event sources:
/// - **Terminal input**: Key presses from crossterm's async event stream
/// - **Background tasks**: Feed pages, bookmark calls, sync polls via the
///   `AppEvent` channel
/// - **Periodic tick**: 250ms timer for status expiry, the loading spinner,
///   and screenshot probes for the selected card
///
/// # Panic Safety
///
/// Installs a panic hook that restores terminal state before unwinding,
/// ensuring the terminal is not left in raw mode on panic.
pub async fn run(
    dash: &mut Dashboard,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    mut event_rx: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();

    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    // Signal handlers for graceful shutdown (Unix only)
    // On non-Unix platforms, these become pending futures that never complete
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        // Only render when state has changed
        if dash.needs_redraw {
            terminal.draw(|f| render(f, dash))?;
            dash.needs_redraw = false;
        }

        // Clear expired status messages and trigger redraw if cleared
        if dash.clear_expired_status() {
            dash.needs_redraw = true;
        }

        // Drain all pending app events before handling more input so feed
        // pages and bookmark results land promptly even during rapid input.
        while let Ok(event) = event_rx.try_recv() {
            dash.needs_redraw = true;
            handle_app_event(dash, event, &event_tx);
        }

        // Platform-specific signal futures
        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;  // Process in order listed for predictable behavior

            // Signal handlers for graceful shutdown (highest priority)
            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            // Terminal input events
            maybe_event = event_stream.next() => {
                if let Some(Ok(Event::Key(key))) = maybe_event {
                    dash.needs_redraw = true;
                    match handle_input(dash, key.code, key.modifiers, &event_tx) {
                        Ok(Action::Quit) => break,
                        Ok(Action::Continue) => {}
                        Err(e) => dash.set_status(format!("Error: {}", e)),
                    }
                }
            }

            // Background task events (blocking recv for when queue was empty)
            Some(event) = event_rx.recv() => {
                dash.needs_redraw = true;
                handle_app_event(dash, event, &event_tx);
            }

            // Periodic tick for status expiry, spinner, and screenshot probes
            _ = tick_interval.tick() => {
                handle_tick(dash, &event_tx);
            }
        }
    }

    dash.poller.stop();
    restore_terminal(terminal)?;
    Ok(())
}

/// Number of frames in the loading spinner animation.
const SPINNER_FRAMES: usize = 10;

/// Handle periodic tick: spinner animation and screenshot probes.
fn handle_tick(dash: &mut Dashboard, event_tx: &mpsc::UnboundedSender<AppEvent>) {
    // Animate spinner while a feed page is in flight
    if dash.feed.is_loading() {
        dash.spinner_frame = (dash.spinner_frame + 1) % SPINNER_FRAMES;
        dash.needs_redraw = true;
    }

    // The selected card is the one whose screenshots the user is looking at.
    // needs_probe() marks each URL in flight, so ticking every 250ms spawns
    // at most one probe per URL.
    spawn_screenshot_probes(dash, event_tx);
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
