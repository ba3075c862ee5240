use std::time::{Duration, Instant};

use crate::notification::domain::notification_sink::NotificationSink;
use crate::notification::domain::notification_throttle::NotificationThrottle;
use crate::recognition::domain::match_verdict::MatchVerdict;

/// Greets recognized identities at most once per cooldown.
///
/// Only `Recognized` verdicts reach the sink. The cooldown is recorded
/// after the sink accepted the notification, so a failed delivery can be
/// retried on the next frame. Disabling keeps the cooldown table intact.
pub struct GreetUseCase {
    throttle: NotificationThrottle,
    sink: Box<dyn NotificationSink>,
    cooldown: Duration,
    enabled: bool,
}

impl GreetUseCase {
    pub fn new(sink: Box<dyn NotificationSink>, cooldown: Duration) -> Self {
        Self {
            throttle: NotificationThrottle::new(),
            sink,
            cooldown,
            enabled: true,
        }
    }

    /// Returns true if a greeting was delivered for `verdict`.
    pub fn handle(&mut self, verdict: &MatchVerdict, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        let MatchVerdict::Recognized { name, .. } = verdict else {
            return false;
        };
        if !self.throttle.should_notify(name, now, self.cooldown) {
            return false;
        }

        match self.sink.notify(name) {
            Ok(()) => {
                self.throttle.record_notified(name, now);
                true
            }
            Err(e) => {
                log::warn!("Could not greet '{name}': {e}");
                false
            }
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn throttle(&self) -> &NotificationThrottle {
        &self.throttle
    }
}
