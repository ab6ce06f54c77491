//! The text channel between the trainer and the user.

use std::collections::VecDeque;
use std::io;

/// Defines how pipelines talk to the user.
pub trait Console {
    /// Displays a line of output.
    fn show(&mut self, text: &str);

    /// Displays `prompt` and reads one line, without its line terminator.
    ///
    /// End of input is reported as an [`io::ErrorKind::UnexpectedEof`] error.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
}

/// A `Console` that replays canned input and records everything shown.
///
/// Useful for driving the pipelines without a terminal.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    /// Every line shown and every prompt issued, in order.
    pub transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// True if the transcript contains a line equal to `line`.
    pub fn saw(&self, line: &str) -> bool {
        self.transcript.iter().any(|l| l == line)
    }
}

impl Console for ScriptedConsole {
    fn show(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.transcript.push(prompt.to_string());
        self.inputs
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted input"))
    }
}
