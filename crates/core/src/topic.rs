/// A single exercise category in the training catalog.
///
/// Each topic carries two instruction templates: one asking the model for a
/// fresh exercise prompt, and one asking it to score the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    /// Menu key used to select the topic (e.g. `"1"`).
    pub key: String,
    /// Display name, also the key under which attempts are stored.
    pub name: String,
    /// Prompt-generation template; `{topic}` is replaced with `name`.
    pub prompt_template: String,
    /// Evaluation instruction placed ahead of the user's response.
    pub feedback_template: String,
}

impl Topic {
    /// Creates a new `Topic`.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        prompt_template: impl Into<String>,
        feedback_template: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            prompt_template: prompt_template.into(),
            feedback_template: feedback_template.into(),
        }
    }

    /// The instruction that asks the model for an exercise prompt.
    pub fn prompt_instruction(&self) -> String {
        self.prompt_template.replace("{topic}", &self.name)
    }

    /// The instruction that asks the model to score `response`.
    pub fn feedback_instruction(&self, response: &str) -> String {
        format!("{}\n\n{}", self.feedback_template, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storytelling() -> Topic {
        Topic::new(
            "2",
            "Storytelling",
            "Generate a random prompt for a {topic} exercise.",
            "Critique the following story:",
        )
    }

    #[test]
    fn test_prompt_instruction_substitutes_name() {
        assert_eq!(
            storytelling().prompt_instruction(),
            "Generate a random prompt for a Storytelling exercise."
        );
    }

    #[test]
    fn test_feedback_instruction_keeps_empty_response() {
        assert_eq!(
            storytelling().feedback_instruction(""),
            "Critique the following story:\n\n"
        );
    }
}
