//! Asynchronous event delivery
//!
//! The [`Dispatcher`] owns a bounded FIFO queue of addressed deliveries and
//! exactly one background worker draining it. Enqueueing never blocks: a
//! full (or shut down) queue rejects the item and the caller treats that as
//! a hard failure. The worker is the only blocking point in the system; it
//! parks on the empty queue and hands each event to its recipient's handler
//! synchronously, so delivery order across the whole bus equals enqueue
//! order.
//!
//! A panicking handler is caught and logged; it costs that one delivery,
//! never the worker.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::event::Event;
use crate::service::{Service, StopSignals};
use crate::subscriber::Subscriber;

#[cfg(test)]
mod tests;

/// One ready-to-deliver event copy together with its recipient's handler.
pub struct Delivery {
    pub event: Event,
    pub recipient: Arc<dyn Subscriber>,
}

/// Single-worker async delivery engine.
///
/// Construction spawns the worker, so a tokio runtime must be current.
pub struct Dispatcher {
    queue: mpsc::Sender<Delivery>,
    worker: Service,
}

impl Dispatcher {
    /// Creates a dispatcher with the given queue capacity (clamped to a
    /// minimum of 1) and starts its worker.
    pub fn new(queue_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let worker = Service::new();
        worker.start(run(rx, worker.signals()));
        Self { queue: tx, worker }
    }

    /// Attempts to queue one delivery without blocking.
    ///
    /// Returns false if the queue is at capacity or the worker has shut
    /// down; the caller must treat false as a failed delivery.
    pub fn enqueue(&self, delivery: Delivery) -> bool {
        match self.queue.try_send(delivery) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(d)) => {
                warn!(
                    subscriber = %d.recipient.id(),
                    "delivery queue full, event rejected"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(d)) => {
                warn!(
                    subscriber = %d.recipient.id(),
                    "dispatcher stopped, event rejected"
                );
                false
            }
        }
    }

    /// True while the worker task is alive.
    pub fn is_running(&self) -> bool {
        self.worker.is_running()
    }

    /// Stops the worker after the delivery currently in hand.
    ///
    /// Events still queued are not drained. With `interrupt = true` an
    /// empty-queue wait is woken so the worker exits promptly.
    pub fn terminate(&self, interrupt: bool) -> bool {
        self.worker.terminate(interrupt)
    }
}

async fn run(mut queue: mpsc::Receiver<Delivery>, signals: StopSignals) {
    debug!("dispatch worker started");
    while !signals.is_terminated() {
        tokio::select! {
            // woken only to re-check the terminated flag
            _ = signals.interrupted() => {}
            next = queue.recv() => match next {
                Some(delivery) => deliver(delivery).await,
                None => break,
            },
        }
    }
    debug!("dispatch worker stopped");
}

async fn deliver(delivery: Delivery) {
    let Delivery { event, recipient } = delivery;
    let subscriber = recipient.id();
    let event_id = event.event_id().to_string();

    let handled = std::panic::AssertUnwindSafe(recipient.handle(event))
        .catch_unwind()
        .await;
    if handled.is_err() {
        error!(%subscriber, %event_id, "subscriber handler panicked, delivery abandoned");
    }
}
