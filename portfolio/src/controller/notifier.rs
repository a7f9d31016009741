use parking_lot::Mutex;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::{debug, warn};

use crate::controller::intent::Notification;

/// Bounded one-shot notification queue with at most one listener.
///
/// Notifications emitted before anyone subscribes are buffered (up to
/// `capacity`) for the first subscriber. A later `subscribe` replaces the
/// previous listener, whose receiver then closes.
pub struct Notifier {
    capacity: usize,
    inner: Mutex<Inner>,
}

struct Inner {
    tx: Sender<Notification>,
    unclaimed: Option<Receiver<Notification>>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            capacity,
            inner: Mutex::new(Inner {
                tx,
                unclaimed: Some(rx),
            }),
        }
    }

    pub fn subscribe(&self) -> Receiver<Notification> {
        let mut inner = self.inner.lock();
        if let Some(rx) = inner.unclaimed.take() {
            return rx;
        }

        let (tx, rx) = mpsc::channel(self.capacity);
        inner.tx = tx;
        debug!("notification listener replaced");
        rx
    }

    pub fn emit(&self, notification: Notification) {
        let inner = self.inner.lock();
        match inner.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(n)) => {
                warn!(notification = ?n, "notification queue full; dropping");
            }
            Err(TrySendError::Closed(n)) => {
                debug!(notification = ?n, "no notification listener attached; dropping");
            }
        }
    }
}
