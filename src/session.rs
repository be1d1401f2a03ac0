/*!
 * Scheduling Session
 *
 * Wires one run together: install the signal watcher, launch every command
 * suspended, then hand the ready queue to the scheduler. Any fatal error
 * after launching started terminates whatever was already launched.
 */

use crate::config::SchedulerConfig;
use crate::core::{InputError, SchedulerError, UspsError, UspsResult};
use crate::monitoring::run_span;
use crate::process::{ChildProcess, Command, ProcessLauncher};
use crate::scheduler::{PcbSnapshot, RunSummary, Scheduler};
use crate::signals::{ChildWatcher, SignalCoordinator};
use tracing::{enabled, error, info, trace, warn, Level};

/// Launch and schedule every command from `commands`
///
/// Commands are consumed lazily, but all of them are launched before the
/// first dispatch.
pub fn run<I>(config: SchedulerConfig, commands: I) -> UspsResult<RunSummary>
where
    I: IntoIterator<Item = Result<Command, InputError>>,
{
    let span = run_span(config.quantum());
    let _entered = span.enter();

    let coordinator = SignalCoordinator::new();
    // registered before the first fork so no exit goes unnoticed
    let _watcher = ChildWatcher::install(coordinator.notifier())?;

    let mut scheduler = build_scheduler(config, coordinator);
    let launcher = ProcessLauncher::new();

    for next in commands {
        // an interrupt during a blocking read is seen once the read returns
        if let Some(signal) = scheduler.pending_interrupt() {
            warn!(%signal, launched = scheduler.len(), "Interrupted while launching");
            scheduler.abort();
            return Err(SchedulerError::Interrupted(signal).into());
        }

        let launched = next.map_err(UspsError::from).and_then(|command| {
            let child = launcher.launch_suspended(&command)?;
            Ok((child, command))
        });

        match launched {
            Ok((child, command)) => {
                scheduler.admit(child, command.to_string());
            }
            Err(err) => {
                error!(error = %err, launched = scheduler.len(), "Aborting before scheduling");
                scheduler.abort();
                return Err(err);
            }
        }
    }

    info!(tasks = scheduler.len(), "All commands launched");
    let summary = scheduler.run()?;
    info!(
        completed = summary.stats.completed,
        lost = summary.stats.lost,
        all_succeeded = summary.all_succeeded(),
        "Run complete"
    );
    Ok(summary)
}

/// Cycle reporting costs a queue snapshot, so it is only wired up when traced
fn build_scheduler(config: SchedulerConfig, coordinator: SignalCoordinator) -> Scheduler<ChildProcess> {
    let scheduler = Scheduler::new(config, coordinator);
    if enabled!(Level::TRACE) {
        scheduler.with_observer(trace_cycle)
    } else {
        scheduler
    }
}

fn trace_cycle(dispatched: &PcbSnapshot, ready: &[PcbSnapshot]) {
    trace!(
        pid = dispatched.id,
        state = ?dispatched.state,
        dispatches = dispatched.dispatches,
        queue = ?ready.iter().map(|pcb| pcb.id).collect::<Vec<_>>(),
        "Dispatch cycle"
    );
}
