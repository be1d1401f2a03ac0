/*!
 * Structured Tracing
 * Subscriber setup and the span that wraps one scheduling run
 *
 * Output goes to stderr: stdout belongs to the scheduled programs.
 */

use crate::core::limits::{DEFAULT_LOG_FILTER, TRACE_JSON_ENV_VAR};
use std::io;
use std::time::Duration;
use tracing::{debug, info_span, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize the global subscriber
///
/// Environment variables:
/// - RUST_LOG: log filter (default: warn, so successful runs print nothing)
/// - USPS_TRACE_JSON: JSON output when "1" or "true"
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if json_requested() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(false)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        debug!("Tracing initialized");
    }
}

fn json_requested() -> bool {
    std::env::var(TRACE_JSON_ENV_VAR)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false)
}

/// Unique id correlating every event of one run
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping a whole scheduling run
pub fn run_span(quantum: Duration) -> Span {
    info_span!(
        "run",
        run_id = %generate_run_id(),
        quantum_ms = quantum.as_millis() as u64,
    )
}
