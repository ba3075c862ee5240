pub mod greeting;
pub mod notification_sink;
pub mod notification_throttle;
