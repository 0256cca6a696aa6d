use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, mpsc};
use tokio::time::timeout;

use super::{Delivery, Dispatcher};
use crate::event::Event;
use crate::subscriber::{Subscriber, SubscriberId};

struct Recorder {
    id: SubscriberId,
    delivered: mpsc::UnboundedSender<Event>,
}

impl Recorder {
    fn new(id: &str) -> (Arc<Self>, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                id: id.to_string(),
                delivered: tx,
            }),
            rx,
        )
    }
}

#[async_trait]
impl Subscriber for Recorder {
    fn id(&self) -> SubscriberId {
        self.id.clone()
    }

    async fn handle(&self, event: Event) {
        let _ = self.delivered.send(event);
    }
}

/// Signals when its handler starts, then blocks until released.
struct Staller {
    id: SubscriberId,
    started: mpsc::UnboundedSender<()>,
    release: Arc<Notify>,
}

#[async_trait]
impl Subscriber for Staller {
    fn id(&self) -> SubscriberId {
        self.id.clone()
    }

    async fn handle(&self, _event: Event) {
        let _ = self.started.send(());
        self.release.notified().await;
    }
}

struct Panicker {
    id: SubscriberId,
}

#[async_trait]
impl Subscriber for Panicker {
    fn id(&self) -> SubscriberId {
        self.id.clone()
    }

    async fn handle(&self, _event: Event) {
        panic!("handler failure");
    }
}

async fn wait_until_stopped(dispatcher: &Dispatcher) {
    for _ in 0..100 {
        if !dispatcher.is_running() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("dispatch worker did not stop in time");
}

#[tokio::test]
async fn test_deliveries_are_fifo() {
    let dispatcher = Dispatcher::new(16);
    let (recorder, mut delivered) = Recorder::new("fifo");

    for seq in 0..5u32 {
        assert!(dispatcher.enqueue(Delivery {
            event: Event::new(seq),
            recipient: Arc::clone(&recorder) as Arc<dyn Subscriber>,
        }));
    }

    for expected in 0..5u32 {
        let event = timeout(Duration::from_secs(1), delivered.recv())
            .await
            .expect("delivery timed out")
            .expect("channel closed");
        assert_eq!(*event.payload_as::<u32>().unwrap(), expected);
    }

    dispatcher.terminate(true);
}

#[tokio::test]
async fn test_enqueue_rejects_when_queue_full() {
    let dispatcher = Dispatcher::new(1);
    let (started_tx, mut started_rx) = mpsc::unbounded_channel();
    let release = Arc::new(Notify::new());
    let staller = Arc::new(Staller {
        id: "staller".to_string(),
        started: started_tx,
        release: Arc::clone(&release),
    });

    // First delivery occupies the worker.
    assert!(dispatcher.enqueue(Delivery {
        event: Event::new(0u32),
        recipient: Arc::clone(&staller) as Arc<dyn Subscriber>,
    }));
    timeout(Duration::from_secs(1), started_rx.recv())
        .await
        .expect("handler never started");

    // Second delivery fills the single queue slot; third must be rejected.
    assert!(dispatcher.enqueue(Delivery {
        event: Event::new(1u32),
        recipient: Arc::clone(&staller) as Arc<dyn Subscriber>,
    }));
    assert!(!dispatcher.enqueue(Delivery {
        event: Event::new(2u32),
        recipient: Arc::clone(&staller) as Arc<dyn Subscriber>,
    }));

    release.notify_waiters();
    dispatcher.terminate(true);
}

#[tokio::test]
async fn test_enqueue_rejects_after_terminate() {
    let dispatcher = Dispatcher::new(8);
    assert!(dispatcher.terminate(true));
    wait_until_stopped(&dispatcher).await;

    let (recorder, _delivered) = Recorder::new("late");
    assert!(!dispatcher.enqueue(Delivery {
        event: Event::new(0u32),
        recipient: recorder as Arc<dyn Subscriber>,
    }));
}

#[tokio::test]
async fn test_handler_panic_does_not_kill_worker() {
    let dispatcher = Dispatcher::new(8);
    let panicker = Arc::new(Panicker {
        id: "panicker".to_string(),
    });
    let (recorder, mut delivered) = Recorder::new("survivor");

    assert!(dispatcher.enqueue(Delivery {
        event: Event::new(0u32),
        recipient: panicker as Arc<dyn Subscriber>,
    }));
    assert!(dispatcher.enqueue(Delivery {
        event: Event::new(1u32),
        recipient: Arc::clone(&recorder) as Arc<dyn Subscriber>,
    }));

    let event = timeout(Duration::from_secs(1), delivered.recv())
        .await
        .expect("delivery after panic timed out")
        .expect("channel closed");
    assert_eq!(*event.payload_as::<u32>().unwrap(), 1);
    assert!(dispatcher.is_running());

    dispatcher.terminate(true);
}

#[tokio::test]
async fn test_terminate_does_not_drain_queue() {
    let dispatcher = Dispatcher::new(8);
    let (started_tx, mut started_rx) = mpsc::unbounded_channel();
    let release = Arc::new(Notify::new());
    let staller = Arc::new(Staller {
        id: "staller".to_string(),
        started: started_tx,
        release: Arc::clone(&release),
    });
    let (recorder, mut delivered) = Recorder::new("pending");

    dispatcher.enqueue(Delivery {
        event: Event::new(0u32),
        recipient: staller as Arc<dyn Subscriber>,
    });
    timeout(Duration::from_secs(1), started_rx.recv())
        .await
        .expect("handler never started");

    dispatcher.enqueue(Delivery {
        event: Event::new(1u32),
        recipient: recorder as Arc<dyn Subscriber>,
    });
    dispatcher.terminate(true);
    release.notify_waiters();
    wait_until_stopped(&dispatcher).await;

    // The queued delivery behind the in-flight one is abandoned.
    assert!(delivered.try_recv().is_err());
}
