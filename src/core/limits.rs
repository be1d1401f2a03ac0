/*!
 * System Limits and Constants
 *
 * Centralized location for environment variable names, exit codes and bounds.
 */

use std::time::Duration;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Environment fallback for the time quantum (milliseconds)
/// Consulted only when no command-line override is given
pub const QUANTUM_ENV_VAR: &str = "USPS_QUANTUM_MSEC";

/// Upper bound on the quantum (24 hours)
/// Keeps deadline arithmetic far away from `Instant` overflow
pub const MAX_QUANTUM: Duration = Duration::from_secs(24 * 60 * 60);

// =============================================================================
// LOGGING
// =============================================================================

/// Log filter used when RUST_LOG is unset
/// Successful runs stay silent; only warnings and fatal errors are printed
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Switches the subscriber to JSON output when set to "1" or "true"
pub const TRACE_JSON_ENV_VAR: &str = "USPS_TRACE_JSON";

// =============================================================================
// PROCESS LAUNCH
// =============================================================================

/// Exit status of a child whose program could not be executed
/// [LINUX-COMPAT] Same convention as POSIX shells for "command not found"
pub const EXEC_FAILURE_EXIT_CODE: i32 = 127;

/// Name of the thread that forwards OS signals into the event channel
pub const SIGNAL_THREAD_NAME: &str = "usps-signals";
