use std::thread::JoinHandle;

use crossbeam_channel::{Sender, TrySendError};

use crate::notification::domain::notification_sink::NotificationSink;

const DEFAULT_QUEUE_CAPACITY: usize = 4;

/// Delivers notifications on a dedicated worker thread.
///
/// `notify` only enqueues, so slow speech never stalls the recognition
/// loop. When the queue is full the notification is refused (and the
/// caller's cooldown stays untouched). Dropping the sink drains the queue
/// and joins the worker.
pub struct BackgroundNotificationSink {
    tx: Option<Sender<String>>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundNotificationSink {
    pub fn new(inner: Box<dyn NotificationSink>) -> Self {
        Self::with_capacity(inner, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(mut inner: Box<dyn NotificationSink>, capacity: usize) -> Self {
        let (tx, rx) = crossbeam_channel::bounded::<String>(capacity.max(1));
        let worker = std::thread::spawn(move || {
            for identity in rx {
                if let Err(e) = inner.notify(&identity) {
                    log::warn!("Greeting for '{identity}' failed: {e}");
                }
            }
        });
        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }
}

impl NotificationSink for BackgroundNotificationSink {
    fn notify(&mut self, identity: &str) -> Result<(), Box<dyn std::error::Error>> {
        let tx = self.tx.as_ref().ok_or("notification worker stopped")?;
        match tx.try_send(identity.to_string()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err("notification queue is full".into()),
            Err(TrySendError::Disconnected(_)) => Err("notification worker stopped".into()),
        }
    }
}

impl Drop for BackgroundNotificationSink {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Notification worker panicked");
            }
        }
    }
}
