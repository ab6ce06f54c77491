//! Presentation Assessment Pipeline
//!
//! Scores a whole presentation against a fixed rubric. The presentation can be
//! typed or spoken; only the latest assessment is kept, under the reserved
//! `presentation` key.

use std::sync::Arc;

use tracing::{info, warn};

use crate::ResponseInput;
use crate::console::Console;
use crate::error::PipelineError;
use crate::gateway::FeedbackGateway;
use crate::pipeline::{AttemptOutcome, CompletedAttempt};
use crate::progress::{Attempt, PRESENTATION_KEY};
use crate::speech::SpeechRecognizer;
use crate::store::ProgressStore;

/// Rubric placed ahead of the presentation text.
pub const PRESENTATION_RUBRIC: &str = "Evaluate this presentation for structure, clarity, persuasiveness, vocabulary, relevance and engagement. Provide scores out of 10 for Structure, Delivery, and Content, along with specific improvement suggestions:";

/// Builds the full assessment instruction for `text`.
pub fn assessment_instruction(text: &str) -> String {
    format!("{PRESENTATION_RUBRIC} {text}")
}

pub struct PresentationPipeline {
    gateway: Arc<dyn FeedbackGateway>,
    store: Arc<dyn ProgressStore>,
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl PresentationPipeline {
    pub fn new(
        gateway: Arc<dyn FeedbackGateway>,
        store: Arc<dyn ProgressStore>,
        recognizer: Arc<dyn SpeechRecognizer>,
    ) -> Self {
        Self {
            gateway,
            store,
            recognizer,
        }
    }

    /// Asks for the input source, collects the presentation, and scores it.
    pub async fn run(&self, console: &mut dyn Console) -> Result<AttemptOutcome, PipelineError> {
        console.show("\nAssessment Options:");
        console.show("1. Text Input");
        console.show("2. Voice Recording");

        let input = match console.read_line("Enter your choice: ")?.trim() {
            "1" => ResponseInput::Text(console.read_line("Enter your presentation text: ")?),
            "2" => {
                console.show("\nRecording your presentation... Speak now.");
                match self.recognizer.transcribe().await {
                    Ok(text) => {
                        console.show(&format!("You said: {text}"));
                        ResponseInput::Voice(text)
                    }
                    Err(e) => {
                        warn!(error = %e, "Presentation recording abandoned");
                        console.show(e.user_message());
                        return Ok(AttemptOutcome::Abandoned);
                    }
                }
            }
            _ => {
                console.show("Invalid choice.");
                return Ok(AttemptOutcome::Rejected);
            }
        };

        self.assess(console, input).await
    }

    /// Scores an already collected presentation and stores the result.
    pub async fn assess(
        &self,
        console: &mut dyn Console,
        input: ResponseInput,
    ) -> Result<AttemptOutcome, PipelineError> {
        let feedback = self
            .gateway
            .respond(&assessment_instruction(input.text()))
            .await;
        console.show("\nAI Scoring and Feedback:");
        console.show(&feedback);

        let mut record = self.store.load()?;
        record.set_presentation(Attempt::new(input.text(), feedback.clone()));
        self.store.save(&record)?;
        info!(source = input.source(), "Presentation assessment recorded");

        Ok(AttemptOutcome::Completed(CompletedAttempt {
            topic: PRESENTATION_KEY.to_string(),
            sequence: None,
            response: input,
            feedback,
        }))
    }
}
