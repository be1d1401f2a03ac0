/*!
 * Monitoring
 * Logging setup for the scheduler binary and library
 */

mod tracer;

pub use tracer::{generate_run_id, init_tracing, run_span};
