/*!
 * Scheduler Configuration
 *
 * Resolves the time quantum from an explicit override and an environment
 * fallback. Resolution is a pure function of the two raw values so the
 * precedence rules can be tested without touching the process environment.
 */

mod cli;

pub use cli::{CliArgs, InputPath, USAGE};

use crate::core::limits::{MAX_QUANTUM, QUANTUM_ENV_VAR};
use crate::core::{ConfigError, QuantumOrigin};
use std::time::Duration;

/// Immutable per-run scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    quantum: Duration,
}

impl SchedulerConfig {
    /// Create a configuration from an already-resolved quantum
    pub fn new(quantum: Duration) -> Result<Self, ConfigError> {
        if quantum.is_zero() {
            return Err(ConfigError::InvalidQuantum {
                value: format!("{:?}", quantum),
                origin: QuantumOrigin::Override,
                reason: "must be positive".to_string(),
            });
        }
        if quantum > MAX_QUANTUM {
            return Err(ConfigError::InvalidQuantum {
                value: format!("{:?}", quantum),
                origin: QuantumOrigin::Override,
                reason: format!("must not exceed {} ms", MAX_QUANTUM.as_millis()),
            });
        }
        Ok(Self { quantum })
    }

    /// Create a configuration from a quantum in milliseconds
    pub fn from_millis(millis: u64) -> Result<Self, ConfigError> {
        Self::new(Duration::from_millis(millis))
    }

    /// Resolve the quantum: the override wins, the fallback is used only when
    /// no override was given, and neither present is an error.
    pub fn resolve(
        override_value: Option<&str>,
        fallback_value: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let (raw, origin) = match (override_value, fallback_value) {
            (Some(raw), _) => (raw, QuantumOrigin::Override),
            (None, Some(raw)) => (raw, QuantumOrigin::Environment),
            (None, None) => return Err(ConfigError::MissingQuantum),
        };

        let millis = parse_millis(raw, origin)?;
        Self::from_millis(millis).map_err(|err| match err {
            ConfigError::InvalidQuantum { reason, .. } => ConfigError::InvalidQuantum {
                value: raw.to_string(),
                origin,
                reason,
            },
            other => other,
        })
    }

    /// Resolve using the real `USPS_QUANTUM_MSEC` environment variable as fallback
    pub fn from_env(override_value: Option<&str>) -> Result<Self, ConfigError> {
        let fallback = std::env::var(QUANTUM_ENV_VAR).ok();
        Self::resolve(override_value, fallback.as_deref())
    }

    #[inline]
    #[must_use]
    pub const fn quantum(&self) -> Duration {
        self.quantum
    }
}

fn parse_millis(raw: &str, origin: QuantumOrigin) -> Result<u64, ConfigError> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| ConfigError::InvalidQuantum {
        value: raw.to_string(),
        origin,
        reason: reason.to_string(),
    };

    if trimmed.starts_with('-') {
        return Err(invalid("must be positive"));
    }
    let millis: u64 = trimmed.parse().map_err(|_| invalid("not a whole number"))?;
    if millis == 0 {
        return Err(invalid("must be positive"));
    }
    Ok(millis)
}
