use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-identity cooldown gate for greetings.
///
/// Remembers when each identity was last notified. Entries are never
/// evicted: the table grows with the number of distinct identities seen
/// over the process lifetime and is only emptied by [`reset`](Self::reset).
/// Not tied to the signature store; any identity string may be tracked.
#[derive(Debug, Default)]
pub struct NotificationThrottle {
    last_notified: HashMap<String, Instant>,
}

impl NotificationThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `identity` was never recorded or at least `cooldown` has
    /// elapsed since it was. Does not modify state.
    ///
    /// A `now` earlier than the recorded instant counts as zero elapsed.
    pub fn should_notify(&self, identity: &str, now: Instant, cooldown: Duration) -> bool {
        match self.last_notified.get(identity) {
            None => true,
            Some(&last) => now.saturating_duration_since(last) >= cooldown,
        }
    }

    /// Records a delivered notification. Call only after delivery happened.
    pub fn record_notified(&mut self, identity: &str, now: Instant) {
        match self.last_notified.get_mut(identity) {
            Some(last) => *last = now,
            None => {
                self.last_notified.insert(identity.to_string(), now);
            }
        }
    }

    pub fn last_notified(&self, identity: &str) -> Option<Instant> {
        self.last_notified.get(identity).copied()
    }

    pub fn len(&self) -> usize {
        self.last_notified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_notified.is_empty()
    }

    pub fn reset(&mut self) {
        self.last_notified.clear();
    }
}
