/*!
 * Configuration Tests
 * Quantum precedence against the real process environment, and argument parsing
 */

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use usps::config::{CliArgs, InputPath};
use usps::core::limits::QUANTUM_ENV_VAR;
use usps::core::{ConfigError, QuantumOrigin};
use usps::SchedulerConfig;

struct EnvGuard {
    previous: Option<String>,
}

impl EnvGuard {
    fn set(value: Option<&str>) -> Self {
        let previous = env::var(QUANTUM_ENV_VAR).ok();
        match value {
            Some(value) => env::set_var(QUANTUM_ENV_VAR, value),
            None => env::remove_var(QUANTUM_ENV_VAR),
        }
        Self { previous }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(value) => env::set_var(QUANTUM_ENV_VAR, value),
            None => env::remove_var(QUANTUM_ENV_VAR),
        }
    }
}

#[test]
#[serial]
fn test_override_beats_environment() {
    let _env = EnvGuard::set(Some("200"));
    let config = SchedulerConfig::from_env(Some("500")).unwrap();
    assert_eq!(config.quantum(), Duration::from_millis(500));
}

#[test]
#[serial]
fn test_environment_used_without_override() {
    let _env = EnvGuard::set(Some("200"));
    let config = SchedulerConfig::from_env(None).unwrap();
    assert_eq!(config.quantum(), Duration::from_millis(200));
}

#[test]
#[serial]
fn test_neither_source_is_an_error() {
    let _env = EnvGuard::set(None);
    assert_eq!(SchedulerConfig::from_env(None), Err(ConfigError::MissingQuantum));
}

#[test]
#[serial]
fn test_valid_override_ignores_broken_environment() {
    let _env = EnvGuard::set(Some("not-a-number"));
    let config = SchedulerConfig::from_env(Some("75")).unwrap();
    assert_eq!(config.quantum(), Duration::from_millis(75));
}

#[test]
#[serial]
fn test_broken_environment_without_override() {
    let _env = EnvGuard::set(Some("0"));
    let err = SchedulerConfig::from_env(None).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidQuantum {
            origin: QuantumOrigin::Environment,
            ..
        }
    ));
}

#[test]
fn test_cli_to_config() {
    let args = CliArgs::parse(["--quantum=40", "--summary", "jobs.txt"]).unwrap();
    assert!(args.summary);
    assert_eq!(args.input, InputPath::File(PathBuf::from("jobs.txt")));

    let config = SchedulerConfig::resolve(args.quantum.as_deref(), None).unwrap();
    assert_eq!(config.quantum(), Duration::from_millis(40));
}

#[test]
fn test_cli_defaults_to_stdin() {
    let args = CliArgs::parse(Vec::<String>::new()).unwrap();
    assert_eq!(args.input, InputPath::Stdin);
    assert_eq!(args.quantum, None);
    assert!(!args.summary);
}
