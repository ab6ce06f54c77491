//! Orator Core
//!
//! Session orchestration and progress tracking for the verbal communication
//! trainer. Everything that talks to the outside world (the terminal, the
//! microphone, the language model, the disk) is reached through a narrow trait
//! so the pipelines here can be driven by any implementation.

pub mod catalog;
pub mod console;
pub mod conversation;
pub mod error;
pub mod gateway;
pub mod pipeline;
pub mod presentation;
pub mod progress;
pub mod speech;
pub mod store;
pub mod topic;

/// A user's answer to an exercise, tagged with where it came from.
///
/// Pipelines consume both variants the same way; the tag only matters for
/// logging and for echoing a transcription back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseInput {
    /// Text typed at the console.
    Text(String),
    /// Text produced by the speech recognizer.
    Voice(String),
}

impl ResponseInput {
    /// The raw response text, regardless of its source.
    pub fn text(&self) -> &str {
        match self {
            ResponseInput::Text(text) | ResponseInput::Voice(text) => text,
        }
    }

    /// Short label for the input source, used in log fields.
    pub fn source(&self) -> &'static str {
        match self {
            ResponseInput::Text(_) => "text",
            ResponseInput::Voice(_) => "voice",
        }
    }
}
