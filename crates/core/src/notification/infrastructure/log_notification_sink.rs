use crate::notification::domain::greeting::{render_greeting, DEFAULT_GREETING};
use crate::notification::domain::notification_sink::NotificationSink;

/// Writes the greeting to the log instead of speaking it.
///
/// Used when speech is disabled or unavailable.
pub struct LogNotificationSink {
    greeting: String,
}

impl LogNotificationSink {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            greeting: greeting.into(),
        }
    }
}

impl Default for LogNotificationSink {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

impl NotificationSink for LogNotificationSink {
    fn notify(&mut self, identity: &str) -> Result<(), Box<dyn std::error::Error>> {
        log::info!("{}", render_greeting(&self.greeting, identity));
        Ok(())
    }
}
