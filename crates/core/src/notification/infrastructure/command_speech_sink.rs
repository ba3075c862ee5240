use std::process::{Command, Stdio};

use crate::notification::domain::greeting::render_greeting;
use crate::notification::domain::notification_sink::NotificationSink;

pub const DEFAULT_SPEECH_COMMAND: &str = "espeak";

/// Speaks the greeting through an external text-to-speech program.
///
/// The rendered greeting is passed as the last argument, e.g.
/// `espeak "Hello Alice"`. Blocks until the program exits; wrap in a
/// [`BackgroundNotificationSink`] to keep callers responsive.
///
/// [`BackgroundNotificationSink`]: super::background_notification_sink::BackgroundNotificationSink
pub struct CommandSpeechSink {
    program: String,
    args: Vec<String>,
    greeting: String,
}

impl CommandSpeechSink {
    pub fn new(program: impl Into<String>, args: Vec<String>, greeting: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args,
            greeting: greeting.into(),
        }
    }

    /// Splits a command line such as `"say -v Thomas"` on whitespace.
    pub fn from_command_line(command_line: &str, greeting: impl Into<String>) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect(), greeting))
    }
}

impl NotificationSink for CommandSpeechSink {
    fn notify(&mut self, identity: &str) -> Result<(), Box<dyn std::error::Error>> {
        let text = render_greeting(&self.greeting, identity);
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|e| format!("cannot run '{}': {e}", self.program))?;
        if !status.success() {
            return Err(format!("'{}' exited with {status}", self.program).into());
        }
        Ok(())
    }
}
