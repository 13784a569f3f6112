//! Shared logging utilities for consistent tracing across all actors
//!
//! Every event emitted through the `actor_*` macros carries the actor that
//! produced it (`coordinator`, `worker_<n>`, `promoter`) and a wall-clock
//! timestamp, so interleaved worker output stays attributable.

use crate::types::ActorId;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Filter directive applied when `RUST_LOG` is not set
pub fn default_filter(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("benchdeploy={base_level},bench_deploy={base_level},shared={base_level}")
}

/// Initialize tracing subscriber with an optional log level
///
/// `RUST_LOG` takes precedence over the level passed in.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for actor-aware info logging
#[macro_export]
macro_rules! actor_info {
    ($actor:expr, $($arg:tt)*) => {
        tracing::info!(
            actor = %$actor,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for actor-aware warning logging
#[macro_export]
macro_rules! actor_warn {
    ($actor:expr, $($arg:tt)*) => {
        tracing::warn!(
            actor = %$actor,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for actor-aware error logging
#[macro_export]
macro_rules! actor_error {
    ($actor:expr, $($arg:tt)*) => {
        tracing::error!(
            actor = %$actor,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for actor-aware debug logging
#[macro_export]
macro_rules! actor_debug {
    ($actor:expr, $($arg:tt)*) => {
        tracing::debug!(
            actor = %$actor,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(actor: &ActorId, details: &str) {
    info!(
        actor = %actor,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(actor: &ActorId, reason: &str) {
    info!(
        actor = %actor,
        timestamp = format_timestamp(),
        "🛑 Shutting down: {}",
        reason
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(actor: &ActorId, context: &str, error: &dyn std::fmt::Display) {
    error!(
        actor = %actor,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(actor: &ActorId, message: &str) {
    info!(
        actor = %actor,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}

/// Contextual logging helper for progress updates
pub fn log_progress(actor: &ActorId, action: &str, details: &str) {
    info!(
        actor = %actor,
        timestamp = format_timestamp(),
        "📋 {}: {}",
        action,
        details
    );
}
