#![deny(missing_docs)]
//! Shared logging utilities for the exporter workspace.
//!
//! This crate provides the `exporter_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line logged
//! through the macros carries the scan tick of the discovery run on the
//! current thread, so interleaved timer and mutation work can be told apart.

use std::cell::Cell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Scan tick of the discovery run driven on this thread.
    static SCAN_TICK: Cell<u64> = const { Cell::new(0) };
}

/// Sets the scan tick for the current thread.
/// The discovery engine calls this once per tick and resets it to 0 on start.
pub fn set_scan_tick(tick: u64) {
    SCAN_TICK.with(|v| v.set(tick));
}

/// Retrieves the scan tick for the current thread.
/// Returns 0 before the first tick of a run.
pub fn scan_tick() -> u64 {
    SCAN_TICK.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current scan tick.
#[macro_export]
macro_rules! exporter_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!("[tick {}] {}", $crate::scan_tick(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current scan tick.
#[macro_export]
macro_rules! exporter_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!("[tick {}] {}", $crate::scan_tick(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current scan tick.
#[macro_export]
macro_rules! exporter_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!("[tick {}] {}", $crate::scan_tick(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current scan tick.
#[macro_export]
macro_rules! exporter_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!("[tick {}] {}", $crate::scan_tick(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current scan tick.
#[macro_export]
macro_rules! exporter_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!("[tick {}] {}", $crate::scan_tick(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may have installed the logger already.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
