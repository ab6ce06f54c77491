//! Text-to-speech by shelling out to a system speech command.

use async_trait::async_trait;
use orator_core::speech::Speaker;
use tokio::process::Command;
use tracing::warn;

/// Speaks text with a command such as `espeak` or `say`.
///
/// The configured command may carry its own arguments (`"espeak -s 150"`);
/// the text is passed as the final argument, after `--`.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    /// Returns `None` for a blank command line.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Replies can start with `-` (markdown bullets), so option parsing is
    /// ended before the text.
    fn command(&self, text: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg("--").arg(text);
        command
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str) {
        let status = self.command(text).status().await;
        match status {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(program = %self.program, %status, "Speech command failed"),
            Err(e) => warn!(program = %self.program, error = %e, "Could not run speech command"),
        }
    }
}

/// A `Speaker` that stays quiet, used when no speech command is configured.
pub struct MutedSpeaker;

#[async_trait]
impl Speaker for MutedSpeaker {
    async fn speak(&self, _text: &str) {}
}
