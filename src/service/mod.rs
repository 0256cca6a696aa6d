//! Worker lifecycle control
//!
//! [`Service`] wraps the "run a loop on a dedicated worker until told to
//! stop" pattern used by the dispatcher. The worker future cooperates
//! through [`StopSignals`]: it checks the terminated flag between
//! iterations and may await [`StopSignals::interrupted`] to have a blocking
//! wait cut short by [`Service::terminate`].
//!
//! Termination is always cooperative; the worker task is never aborted, so
//! whatever it has in hand runs to completion.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use tokio::task::JoinHandle;


/// Start/terminate wrapper around a single background worker task.
pub struct Service {
    terminated: Arc<AtomicBool>,
    interrupt: Arc<Notify>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

/// Stop-flag view handed to the worker future.
#[derive(Clone)]
pub struct StopSignals {
    terminated: Arc<AtomicBool>,
    interrupt: Arc<Notify>,
}

impl StopSignals {
    /// True once [`Service::terminate`] has been called.
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Resolves when the service is terminated with `interrupt = true`.
    ///
    /// A resolved wait carries no payload; the worker is expected to
    /// re-check [`Self::is_terminated`] and continue or exit.
    pub async fn interrupted(&self) {
        self.interrupt.notified().await;
    }
}

impl Service {
    pub fn new() -> Self {
        Self {
            terminated: Arc::new(AtomicBool::new(false)),
            interrupt: Arc::new(Notify::new()),
            handle: Mutex::new(None),
        }
    }

    /// Returns the signal view to move into the worker future.
    pub fn signals(&self) -> StopSignals {
        StopSignals {
            terminated: Arc::clone(&self.terminated),
            interrupt: Arc::clone(&self.interrupt),
        }
    }

    /// Spawns `worker` as the background task.
    ///
    /// No-op returning false if a live worker already exists. Must be
    /// called from within a tokio runtime.
    pub fn start<F>(&self, worker: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut handle = self.handle.lock().unwrap();
        if let Some(h) = handle.as_ref() {
            if !h.is_finished() {
                return false;
            }
        }
        self.terminated.store(false, Ordering::SeqCst);
        *handle = Some(tokio::spawn(worker));
        true
    }

    /// True while the worker task is alive.
    pub fn is_running(&self) -> bool {
        matches!(self.handle.lock().unwrap().as_ref(), Some(h) if !h.is_finished())
    }

    /// Flags the worker loop to exit after its current iteration.
    ///
    /// With `interrupt = true` a blocked wait inside the worker is woken so
    /// the flag is observed promptly instead of after the next event.
    /// Returns false if no live worker exists.
    pub fn terminate(&self, interrupt: bool) -> bool {
        let handle = self.handle.lock().unwrap();
        match handle.as_ref() {
            Some(h) if !h.is_finished() => {
                self.terminated.store(true, Ordering::SeqCst);
                if interrupt {
                    // notify_one stores a permit, so the wake-up is not
                    // lost when the worker is mid-iteration rather than
                    // parked on the wait
                    self.interrupt.notify_one();
                }
                true
            }
            _ => false,
        }
    }
}

impl Default for Service {
    fn default() -> Self {
        Self::new()
    }
}
