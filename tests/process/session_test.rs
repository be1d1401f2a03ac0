/*!
 * Session Tests
 * Real child processes launched suspended and scheduled round robin
 */

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use usps::config::InputPath;
use usps::core::ExitStatus;
use usps::process::Command;
use usps::scheduler::Completion;
use usps::{input, session, SchedulerConfig};

fn command(line: &str) -> Command {
    input::tokenize(line).unwrap()
}

fn commands(lines: &[&str]) -> Vec<Result<Command, usps::core::InputError>> {
    lines.iter().map(|line| Ok(command(line))).collect()
}

fn sh(script: &str) -> Result<Command, usps::core::InputError> {
    Ok(Command::new(vec!["sh".to_string(), "-c".to_string(), script.to_string()]).unwrap())
}

fn config(millis: u64) -> SchedulerConfig {
    SchedulerConfig::from_millis(millis).unwrap()
}

#[test]
#[serial]
fn test_quick_commands_complete_in_order() {
    let summary = session::run(config(200), commands(&["true", "true", "true"])).unwrap();

    assert_eq!(summary.finished.len(), 3);
    assert_eq!(summary.stats.quanta_granted, 3);
    assert!(summary.all_succeeded());
    for pcb in &summary.finished {
        assert_eq!(pcb.dispatches, 1);
        assert_eq!(pcb.command, "true");
    }
}

#[test]
#[serial]
fn test_exit_codes_are_recorded() {
    let summary = session::run(config(200), vec![sh("exit 3"), Ok(command("true"))]).unwrap();

    let statuses: Vec<Option<ExitStatus>> =
        summary.finished.iter().map(|pcb| pcb.exit_status()).collect();
    assert_eq!(statuses, vec![Some(ExitStatus::Code(3)), Some(ExitStatus::Code(0))]);
    assert!(!summary.all_succeeded());
}

#[test]
#[serial]
fn test_missing_program_exits_127() {
    let summary = session::run(
        config(200),
        commands(&["/nonexistent/usps-test-program", "true"]),
    )
    .unwrap();

    assert_eq!(summary.finished[0].exit_status(), Some(ExitStatus::Code(127)));
    assert_eq!(summary.finished[1].exit_status(), Some(ExitStatus::Code(0)));
    assert_eq!(summary.stats.lost, 0);
}

#[test]
#[serial]
fn test_killed_program_reports_signal() {
    let summary = session::run(config(200), vec![sh("kill -9 $$")]).unwrap();

    assert_eq!(summary.finished[0].exit_status(), Some(ExitStatus::Signaled(9)));
}

#[test]
#[serial]
fn test_long_command_is_preempted() {
    let summary = session::run(config(20), commands(&["sleep 0.2", "true"])).unwrap();

    // the short command overtakes the long one
    let order: Vec<&str> = summary.finished.iter().map(|pcb| pcb.command.as_str()).collect();
    assert_eq!(order, vec!["true", "sleep 0.2"]);

    let sleeper = &summary.finished[1];
    assert!(sleeper.dispatches > 1);
    assert_eq!(
        sleeper.cumulative_run_time,
        Duration::from_millis(20) * (sleeper.dispatches - 1)
    );
    assert!(summary.stats.preemptions >= 1);
    assert!(summary.all_succeeded());
}

#[test]
#[serial]
fn test_commands_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "true").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "   sh   -c   exit\t0  ").unwrap();
    file.flush().unwrap();

    let source = input::open(&InputPath::File(file.path().to_path_buf())).unwrap();
    let summary = session::run(config(100), source).unwrap();

    assert_eq!(summary.finished.len(), 2);
    assert_eq!(summary.finished[1].command, "sh -c exit 0");
    assert!(summary
        .finished
        .iter()
        .all(|pcb| matches!(pcb.completion, Completion::Exited { .. })));
}

#[test]
#[serial]
fn test_summary_serializes() {
    let summary = session::run(config(50), commands(&["true"])).unwrap();
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["quantum_ms"], 50);
    assert_eq!(json["finished"][0]["command"], "true");
    assert_eq!(json["finished"][0]["completion"]["status"]["value"], 0);
}
