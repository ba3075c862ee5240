pub mod background_notification_sink;
pub mod command_speech_sink;
pub mod log_notification_sink;
