//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the collaborators
//! built once at startup and shared by every menu entry.

use std::sync::Arc;

use anyhow::Context;
use orator_core::catalog::ExerciseCatalog;
use orator_core::gateway::{ChatCompletionsGateway, FeedbackGateway, GatewaySettings};
use orator_core::pipeline::TrainingPipeline;
use orator_core::presentation::PresentationPipeline;
use orator_core::speech::{Speaker, SpeechRecognizer};
use orator_core::store::{JsonFileStore, ProgressStore};
use tracing::{info, warn};

use crate::config::Config;
use crate::speech::{CommandSpeaker, MicrophoneRecognizer, MutedSpeaker};

/// The shared application state, created once at startup.
/// All fields are public to be accessible from other modules.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn FeedbackGateway>,
    pub store: Arc<dyn ProgressStore>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub speaker: Arc<dyn Speaker>,
    pub catalog: ExerciseCatalog,
}

impl AppState {
    /// Builds the production collaborators described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let gateway = ChatCompletionsGateway::new(GatewaySettings {
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
            model: config.chat_model.clone(),
            timeout: config.request_timeout,
        })
        .context("Failed to build HTTP client for the AI backend")?;

        if config.speech.api_key.is_none() {
            warn!("SPEECH_API_KEY is not set; voice input will be unavailable");
        }

        let speaker: Arc<dyn Speaker> = match CommandSpeaker::from_command_line(&config.tts_command)
        {
            Some(speaker) => {
                info!(program = %speaker.program(), "Using speech command for voice output");
                Arc::new(speaker)
            }
            None => Arc::new(MutedSpeaker),
        };

        Ok(Self {
            gateway: Arc::new(gateway),
            store: Arc::new(JsonFileStore::new(&config.progress_path)),
            recognizer: Arc::new(
                MicrophoneRecognizer::new(&config.speech)
                    .context("Failed to build HTTP client for speech recognition")?,
            ),
            speaker,
            catalog: ExerciseCatalog::default(),
        })
    }

    pub fn training(&self) -> TrainingPipeline {
        TrainingPipeline::new(
            self.catalog.clone(),
            self.gateway.clone(),
            self.store.clone(),
        )
    }

    pub fn presentation(&self) -> PresentationPipeline {
        PresentationPipeline::new(
            self.gateway.clone(),
            self.store.clone(),
            self.recognizer.clone(),
        )
    }
}
