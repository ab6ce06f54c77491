//! Speech collaborators: turning the user's voice into text and reading
//! replies aloud.

use async_trait::async_trait;

use crate::error::RecognitionError;

/// Listens for one utterance and returns what was said.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn transcribe(&self) -> Result<String, RecognitionError>;
}

/// Reads text aloud. Fire-and-forget: failures are the implementation's to log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str);
}
