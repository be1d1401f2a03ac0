/*!
 * Cleanup Tests
 * Fatal errors after launching must not leave children behind
 */

use nix::errno::Errno;
use nix::sys::signal::{raise, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag};
use nix::unistd::Pid;
use serial_test::serial;
use std::io;
use std::thread;
use std::time::Duration;
use usps::core::{InputError, LaunchError, SchedulerError, UspsError};
use usps::process::Command;
use usps::{session, SchedulerConfig};

fn no_children_left() -> bool {
    matches!(waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)), Err(Errno::ECHILD))
}

fn argv(words: &[&str]) -> Command {
    Command::new(words.iter().map(|w| w.to_string()).collect()).unwrap()
}

#[test]
#[serial]
fn test_input_error_terminates_launched_children() {
    let source = vec![
        Ok(argv(&["sleep", "30"])),
        Ok(argv(&["sleep", "30"])),
        Err(InputError::Read(io::Error::new(io::ErrorKind::Other, "disk gone"))),
        Ok(argv(&["true"])),
    ];

    let err = session::run(SchedulerConfig::from_millis(50).unwrap(), source).unwrap_err();

    assert!(matches!(err, UspsError::Input(InputError::Read(_))));
    assert!(no_children_left());
}

#[test]
#[serial]
fn test_launch_error_terminates_launched_children() {
    let source = vec![Ok(argv(&["sleep", "30"])), Ok(argv(&["bad\0arg"]))];

    let err = session::run(SchedulerConfig::from_millis(50).unwrap(), source).unwrap_err();

    assert!(matches!(err, UspsError::Launch(LaunchError::NulByte(_))));
    assert!(no_children_left());
}

#[test]
#[serial]
fn test_interrupt_while_reading_stops_launching() {
    let mut reads = 0usize;
    let source = std::iter::from_fn(|| {
        reads += 1;
        match reads {
            1 => Some(Ok(argv(&["sleep", "30"]))),
            // Ctrl-C arrives while the next line is still being read
            2 => {
                raise(Signal::SIGINT).unwrap();
                thread::sleep(Duration::from_millis(200));
                Some(Ok(argv(&["true"])))
            }
            n if n <= 50 => Some(Ok(argv(&["true"]))),
            _ => None,
        }
    });

    let err = session::run(SchedulerConfig::from_millis(50).unwrap(), source).unwrap_err();

    assert!(matches!(
        err,
        UspsError::Scheduler(SchedulerError::Interrupted(Signal::SIGINT))
    ));
    // nothing past the interrupted read was consumed
    assert_eq!(reads, 2);
    assert!(no_children_left());
}
