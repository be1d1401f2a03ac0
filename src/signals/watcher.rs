/*!
 * Child Watcher
 *
 * Forwards SIGCHLD, SIGINT and SIGTERM into the coordinator from a dedicated
 * thread running a single-threaded tokio runtime. Listeners are registered
 * before `install` returns, so a child that exits any time after launch is
 * always reported.
 *
 * Shutdown follows a graceful-with-fallback shape: dropping the watcher sends
 * a shutdown message and joins the thread; if the coordinator disappears
 * first, the forwarding loop notices the closed channel and exits on its own.
 */

use super::coordinator::EventNotifier;
use crate::core::limits::SIGNAL_THREAD_NAME;
use crate::core::SignalError;
use nix::sys::signal::Signal;
use std::thread::{self, JoinHandle};
use tokio::runtime::Runtime;
use tokio::signal::unix::{signal, Signal as SignalStream, SignalKind};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Registered OS signal listeners
struct Listeners {
    child: SignalStream,
    interrupt: SignalStream,
    terminate: SignalStream,
}

impl Listeners {
    /// Must run inside the runtime context
    fn register() -> Result<Self, SignalError> {
        Ok(Self {
            child: listen(SignalKind::child(), Signal::SIGCHLD)?,
            interrupt: listen(SignalKind::interrupt(), Signal::SIGINT)?,
            terminate: listen(SignalKind::terminate(), Signal::SIGTERM)?,
        })
    }
}

fn listen(kind: SignalKind, signal_id: Signal) -> Result<SignalStream, SignalError> {
    signal(kind).map_err(|cause| SignalError::Register {
        signal: signal_id,
        cause,
    })
}

/// Handle to the signal forwarding thread
pub struct ChildWatcher {
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ChildWatcher {
    /// Register listeners and start forwarding to `notifier`
    pub fn install(notifier: EventNotifier) -> Result<Self, SignalError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .build()
            .map_err(SignalError::Runtime)?;

        let listeners = {
            let _guard = runtime.enter();
            Listeners::register()?
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = thread::Builder::new()
            .name(SIGNAL_THREAD_NAME.to_string())
            .spawn(move || run_forwarder(runtime, listeners, notifier, shutdown_rx))
            .map_err(SignalError::Thread)?;

        info!("Signal watcher installed (SIGCHLD, SIGINT, SIGTERM)");

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }
}

impl Drop for ChildWatcher {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Signal watcher thread panicked");
            } else {
                debug!("Signal watcher stopped");
            }
        }
    }
}

fn run_forwarder(
    runtime: Runtime,
    mut listeners: Listeners,
    notifier: EventNotifier,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    runtime.block_on(async move {
        loop {
            let delivered = tokio::select! {
                _ = &mut shutdown_rx => break,
                Some(()) = listeners.child.recv() => notifier.child_changed(),
                Some(()) = listeners.interrupt.recv() => notifier.interrupted(Signal::SIGINT),
                Some(()) = listeners.terminate.recv() => notifier.interrupted(Signal::SIGTERM),
                else => break,
            };
            if !delivered {
                debug!("Coordinator closed, signal forwarding ends");
                break;
            }
        }
    });
}
