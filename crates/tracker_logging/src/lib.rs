#![deny(missing_docs)]
//! Shared logging utilities for the job tracker workspace.
//!
//! This crate provides the `tracker_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every message is
//! prefixed with the UI surface (panel, dashboard, ...) that was active on the
//! current thread when it was logged.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the surface currently driving the workspace.
    static SURFACE: Cell<&'static str> = const { Cell::new("-") };
}

/// Sets the surface label for the current thread.
/// The app calls this when it switches between the panel and dashboard flows.
pub fn set_surface(surface: &'static str) {
    SURFACE.with(|v| v.set(surface));
}

/// Retrieves the surface label for the current thread.
/// Returns `"-"` if no surface has been set.
pub fn current_surface() -> &'static str {
    SURFACE.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current surface.
#[macro_export]
macro_rules! tracker_trace {
    ($($arg:tt)*) => {{
        log::trace!("[{}] {}", $crate::current_surface(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current surface.
#[macro_export]
macro_rules! tracker_info {
    ($($arg:tt)*) => {{
        log::info!("[{}] {}", $crate::current_surface(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current surface.
#[macro_export]
macro_rules! tracker_debug {
    ($($arg:tt)*) => {{
        log::debug!("[{}] {}", $crate::current_surface(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current surface.
#[macro_export]
macro_rules! tracker_warn {
    ($($arg:tt)*) => {{
        log::warn!("[{}] {}", $crate::current_surface(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current surface.
#[macro_export]
macro_rules! tracker_error {
    ($($arg:tt)*) => {{
        log::error!("[{}] {}", $crate::current_surface(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode};

    let level = if std::env::var_os("TRACKER_TEST_TRACE").is_some() {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_defaults_and_updates_per_thread() {
        assert_eq!(current_surface(), "-");
        set_surface("panel");
        assert_eq!(current_surface(), "panel");

        let other = std::thread::spawn(current_surface).join().unwrap();
        assert_eq!(other, "-");
    }
}
