//! Speech-to-text over an OpenAI-compatible `/audio/transcriptions` endpoint.

use async_trait::async_trait;
use orator_core::error::RecognitionError;
use orator_core::speech::SpeechRecognizer;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, warn};

use super::capture::{self, CaptureError, CaptureSettings};
use crate::config::SpeechConfig;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Uploads recorded audio and returns the recognized text.
pub struct TranscriptionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl TranscriptionClient {
    /// Fails only if the HTTP client cannot be constructed.
    pub fn new(config: &SpeechConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/audio/transcriptions",
                config.api_base.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends a WAV recording; empty text means the speech was not understood.
    pub async fn transcribe_wav(&self, wav: Vec<u8>) -> Result<String, RecognitionError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            RecognitionError::Service("SPEECH_API_KEY is not set".to_string())
        })?;

        let file = Part::bytes(wav)
            .file_name("speech.wav")
            .mime_str("audio/wav")
            .map_err(|e| RecognitionError::Service(e.to_string()))?;
        let form = Form::new()
            .text("model", self.model.clone())
            .part("file", file);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognitionError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Service(format!("status {status}: {body}")));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::Service(e.to_string()))?;
        let text = parsed.text.trim();
        if text.is_empty() {
            return Err(RecognitionError::Unrecognized);
        }
        debug!(chars = text.len(), "Transcription received");
        Ok(text.to_string())
    }
}

/// A `SpeechRecognizer` that records from the microphone and transcribes
/// remotely.
pub struct MicrophoneRecognizer {
    settings: CaptureSettings,
    client: TranscriptionClient,
}

impl MicrophoneRecognizer {
    pub fn new(config: &SpeechConfig) -> reqwest::Result<Self> {
        Ok(Self {
            settings: CaptureSettings::new(config.max_duration),
            client: TranscriptionClient::new(config)?,
        })
    }
}

#[async_trait]
impl SpeechRecognizer for MicrophoneRecognizer {
    async fn transcribe(&self) -> Result<String, RecognitionError> {
        if !self.client.is_configured() {
            return Err(RecognitionError::Service(
                "SPEECH_API_KEY is not set".to_string(),
            ));
        }

        let settings = self.settings.clone();
        let recording = tokio::task::spawn_blocking(move || capture::record_wav(&settings))
            .await
            .map_err(|e| RecognitionError::Service(e.to_string()))?;

        let wav = match recording {
            Ok(wav) => wav,
            Err(CaptureError::NoSpeech) => return Err(RecognitionError::Unrecognized),
            Err(e) => {
                warn!(error = %e, "Microphone capture failed");
                return Err(RecognitionError::Service(e.to_string()));
            }
        };

        self.client.transcribe_wav(wav).await
    }
}
