//! Attempt Pipeline
//!
//! Drives one Training Mode attempt from topic selection to persistence:
//!
//! 1. Select a topic from the catalog (an unknown key rejects the attempt).
//! 2. Ask the gateway for a fresh exercise prompt.
//! 3. Read the user's response.
//! 4. Show feedback from earlier attempts at the same topic.
//! 5. Ask the gateway to score the response.
//! 6. Append the attempt to the progress record and save it.
//!
//! Gateway failures never stop the pipeline: their sentinel strings flow
//! through as the prompt or the feedback. A failed save is reported after the
//! feedback has already been shown, and is not retried.

use std::sync::Arc;

use tracing::info;

use crate::ResponseInput;
use crate::catalog::ExerciseCatalog;
use crate::console::Console;
use crate::error::PipelineError;
use crate::gateway::FeedbackGateway;
use crate::progress::Attempt;
use crate::store::ProgressStore;

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Every step ran and the attempt was saved.
    Completed(CompletedAttempt),
    /// The user made an invalid selection; nothing was recorded.
    Rejected,
    /// Input could not be obtained (e.g. speech not recognized); nothing was
    /// recorded.
    Abandoned,
}

/// Summary of a saved attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedAttempt {
    /// Key the attempt was filed under.
    pub topic: String,
    /// Position within the topic; `None` for the overwritten presentation slot.
    pub sequence: Option<u32>,
    pub response: ResponseInput,
    pub feedback: String,
}

/// Runs Training Mode attempts against a catalog, a gateway and a store.
pub struct TrainingPipeline {
    catalog: ExerciseCatalog,
    gateway: Arc<dyn FeedbackGateway>,
    store: Arc<dyn ProgressStore>,
}

impl TrainingPipeline {
    pub fn new(
        catalog: ExerciseCatalog,
        gateway: Arc<dyn FeedbackGateway>,
        store: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            catalog,
            gateway,
            store,
        }
    }

    pub fn catalog(&self) -> &ExerciseCatalog {
        &self.catalog
    }

    /// Runs one attempt, talking to the user through `console`.
    pub async fn run(&self, console: &mut dyn Console) -> Result<AttemptOutcome, PipelineError> {
        console.show("\nChoose a training module:");
        for topic in self.catalog.topics() {
            console.show(&format!("{}. {}", topic.key, topic.name));
        }

        let choice = console.read_line("Enter your choice: ")?;
        let Some(topic) = self.catalog.get(&choice) else {
            info!(choice = %choice.trim(), "Rejected training module selection");
            console.show("Invalid choice.");
            return Ok(AttemptOutcome::Rejected);
        };

        let prompt = self
            .catalog
            .generate_prompt(self.gateway.as_ref(), topic)
            .await;
        console.show(&format!("\nYour task: {prompt}"));

        let response = ResponseInput::Text(console.read_line("Your response: ")?);

        let mut record = self.store.load()?;
        let history = record.attempts(&topic.name);
        if !history.is_empty() {
            console.show("\nPrevious Feedback:");
            for (index, attempt) in history.iter().enumerate() {
                console.show(&format!("Attempt {}: {}", index + 1, attempt.feedback));
            }
        }

        let feedback = self
            .gateway
            .respond(&topic.feedback_instruction(response.text()))
            .await;
        console.show("\nAI Scoring and Feedback:");
        console.show(&feedback);

        let sequence = record.append_attempt(
            &topic.name,
            Attempt::new(response.text(), feedback.clone()),
        );
        self.store.save(&record)?;
        info!(topic = %topic.name, sequence, source = response.source(), "Training attempt recorded");

        Ok(AttemptOutcome::Completed(CompletedAttempt {
            topic: topic.name.clone(),
            sequence: Some(sequence),
            response,
            feedback,
        }))
    }
}
