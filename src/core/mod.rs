/*!
 * Core Module
 * Shared types, error taxonomy and constants
 */

pub mod errors;
pub mod limits;
pub mod types;

pub use errors::{
    ConfigError, ControlError, ControlOp, InputError, LaunchError, QuantumOrigin, SchedulerError,
    SignalError, UspsError, UspsResult,
};
pub use types::{ExitStatus, TaskId};
