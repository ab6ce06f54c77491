//! Free-form conversation modes.
//!
//! Chat Mode and Voice Mode send each user turn to the gateway on its own (no
//! history is carried over) and persist nothing. Both loops end when the user
//! types or says `exit`.

use std::io;

use tracing::{debug, warn};

use crate::console::Console;
use crate::error::RecognitionError;
use crate::gateway::FeedbackGateway;
use crate::speech::{Speaker, SpeechRecognizer};

/// Keyword that ends a conversation loop, compared case-insensitively.
pub const EXIT_KEYWORD: &str = "exit";

/// Consecutive recognition service failures after which Voice Mode gives up.
pub const MAX_VOICE_SERVICE_FAILURES: u32 = 3;

/// True if `input` asks to leave the current loop.
///
/// Trailing punctuation is ignored: transcribers tend to return "Exit." for a
/// spoken `exit`.
pub fn is_exit(input: &str) -> bool {
    input
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim_end()
        .eq_ignore_ascii_case(EXIT_KEYWORD)
}

/// Runs Chat Mode until the user types `exit`.
pub async fn run_chat(console: &mut dyn Console, gateway: &dyn FeedbackGateway) -> io::Result<()> {
    console.show("\nChat Mode: Type your messages below. Type 'exit' to return to main menu.");
    loop {
        let line = console.read_line("You: ")?;
        if is_exit(&line) {
            return Ok(());
        }
        let reply = gateway.respond(&line).await;
        console.show(&format!("AI: {reply}"));
    }
}

/// Runs Voice Mode until the user says `exit`.
///
/// An utterance that is not understood is skipped. If the recognition service
/// fails [`MAX_VOICE_SERVICE_FAILURES`] times in a row the loop returns to the
/// menu instead of listening forever.
pub async fn run_voice(
    console: &mut dyn Console,
    recognizer: &dyn SpeechRecognizer,
    speaker: &dyn Speaker,
    gateway: &dyn FeedbackGateway,
) {
    console.show("\nVoice Mode: Speak now. Say 'exit' to return to main menu.");
    let mut service_failures = 0;
    loop {
        console.show("Listening...");
        let heard = match recognizer.transcribe().await {
            Ok(text) => {
                service_failures = 0;
                text
            }
            Err(e) => {
                console.show(e.user_message());
                if let RecognitionError::Service(reason) = &e {
                    service_failures += 1;
                    warn!(%reason, attempt = service_failures, "Speech recognition failed");
                    if service_failures >= MAX_VOICE_SERVICE_FAILURES {
                        console.show("Leaving Voice Mode after repeated recognition errors.");
                        return;
                    }
                }
                continue;
            }
        };

        console.show(&format!("You: {heard}"));
        if is_exit(&heard) {
            return;
        }

        let reply = gateway.respond(&heard).await;
        console.show(&format!("AI: {reply}"));
        debug!(chars = reply.len(), "Speaking reply");
        speaker.speak(&reply).await;
    }
}
