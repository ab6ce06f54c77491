//! Exercise Catalog
//!
//! The fixed set of training topics offered in Training Mode. Exercise prompts
//! are not stored here: they are generated on demand by the gateway so every
//! run presents a different task.

use tracing::debug;

use crate::gateway::FeedbackGateway;
use crate::topic::Topic;

/// Template shared by every built-in topic for prompt generation.
pub const PROMPT_TEMPLATE: &str =
    "Generate a random prompt for a {topic} exercise. Keep it concise and engaging.";

/// An ordered, immutable registry of topics keyed by their menu key.
#[derive(Debug, Clone)]
pub struct ExerciseCatalog {
    topics: Vec<Topic>,
}

impl ExerciseCatalog {
    /// Builds a catalog from an explicit topic list, in display order.
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    /// All topics, in menu order.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Looks up a topic by menu key. Surrounding whitespace is ignored.
    pub fn get(&self, key: &str) -> Option<&Topic> {
        let key = key.trim();
        self.topics.iter().find(|t| t.key == key)
    }

    /// Asks the gateway for a fresh exercise prompt for `topic`.
    ///
    /// A gateway failure yields its sentinel string, which is shown in place
    /// of the prompt; the user can still answer it.
    pub async fn generate_prompt(&self, gateway: &dyn FeedbackGateway, topic: &Topic) -> String {
        debug!(topic = %topic.name, "Generating exercise prompt");
        gateway.respond(&topic.prompt_instruction()).await
    }
}

impl Default for ExerciseCatalog {
    fn default() -> Self {
        Self::new(vec![
            Topic::new(
                "1",
                "Impromptu Speaking",
                PROMPT_TEMPLATE,
                "Evaluate the following response for structure, clarity, and engagement. Provide scores out of 10 and offer specific improvement suggestions:",
            ),
            Topic::new(
                "2",
                "Storytelling",
                PROMPT_TEMPLATE,
                "Critique the following story for narrative flow, vocabulary richness, and emotional impact. Provide scores out of 10 and suggest improvements:",
            ),
            Topic::new(
                "3",
                "Conflict Resolution",
                PROMPT_TEMPLATE,
                "Analyze the following response for empathy, assertiveness, and diplomatic communication. Provide scores out of 10 and suggest ways to improve handling conflicts:",
            ),
        ])
    }
}
