//! Shared error types for the trainer core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Placeholder returned to the user when the backend could not be reached.
pub const TRANSPORT_SENTINEL: &str = "Error: Failed to connect to AI service.";
/// Placeholder returned when the backend answered in an unexpected shape.
pub const FORMAT_SENTINEL: &str = "Error: Unexpected API response format.";
/// Prefix of the placeholder returned when the backend reported an error.
pub const BACKEND_SENTINEL_PREFIX: &str = "Error: AI service reported:";

/// Errors emitted by a `ProgressStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("failed to read progress file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write progress file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("progress file {path} is not a valid progress record: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode progress record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// The three ways a call to the language model can fail.
///
/// None of these ever escape the gateway; they are turned into sentinel
/// strings with [`GatewayError::sentinel`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No response was received (connection refused, DNS, timeout).
    #[error("transport failure: {0}")]
    Transport(String),
    /// A response arrived but not in the chat-completions shape.
    #[error("unexpected response format: {0}")]
    Format(String),
    /// The backend answered with an error payload.
    #[error("backend reported an error: {0}")]
    Backend(String),
}

impl GatewayError {
    /// Short, stable name of the failure class for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Transport(_) => "transport",
            GatewayError::Format(_) => "format",
            GatewayError::Backend(_) => "backend",
        }
    }

    /// The user-visible placeholder shown in place of a model reply.
    pub fn sentinel(&self) -> String {
        match self {
            GatewayError::Transport(_) => TRANSPORT_SENTINEL.to_string(),
            GatewayError::Format(_) => FORMAT_SENTINEL.to_string(),
            GatewayError::Backend(message) => format!("{BACKEND_SENTINEL_PREFIX} {message}"),
        }
    }
}

/// Errors emitted by a `SpeechRecognizer`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// Audio was captured but no words could be made out of it.
    #[error("speech was not recognized")]
    Unrecognized,
    /// The recognition service (or the microphone feeding it) failed.
    #[error("speech recognition service error: {0}")]
    Service(String),
}

impl RecognitionError {
    /// Message shown to the user before the current attempt is dropped.
    pub fn user_message(&self) -> &'static str {
        match self {
            RecognitionError::Unrecognized => "Could not understand audio.",
            RecognitionError::Service(_) => "Speech recognition service error.",
        }
    }
}

/// Errors that end a pipeline run early.
///
/// Gateway and recognition failures are not here: both are recovered inside
/// the pipelines.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("failed to read input: {0}")]
    Input(#[from] io::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PipelineError {
    /// True when the console reached end of input.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, PipelineError::Input(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}
