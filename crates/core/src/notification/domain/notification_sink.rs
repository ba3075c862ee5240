/// Domain interface for delivering a "greet this identity" event.
///
/// Called only after the throttle has allowed it. Delivery failures are
/// reported back so the caller can leave the cooldown untouched.
pub trait NotificationSink: Send {
    fn notify(&mut self, identity: &str) -> Result<(), Box<dyn std::error::Error>>;
}
