use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::mock;
use orator_core::catalog::ExerciseCatalog;
use orator_core::console::ScriptedConsole;
use orator_core::error::RecognitionError;
use orator_core::gateway::FeedbackGateway;
use orator_core::speech::{Speaker, SpeechRecognizer};
use orator_core::store::{JsonFileStore, ProgressStore};
use orator_service::menu;
use orator_service::state::AppState;
use tempfile::TempDir;

mock! {
    Gateway {}

    #[async_trait]
    impl FeedbackGateway for Gateway {
        async fn respond(&self, instruction: &str) -> String;
    }
}

mock! {
    Recognizer {}

    #[async_trait]
    impl SpeechRecognizer for Recognizer {
        async fn transcribe(&self) -> Result<String, RecognitionError>;
    }
}

/// Remembers everything it was asked to say.
#[derive(Default)]
struct RecordingSpeaker {
    spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

fn state_with(
    gateway: MockGateway,
    recognizer: MockRecognizer,
    speaker: Arc<RecordingSpeaker>,
    dir: &TempDir,
) -> AppState {
    AppState {
        gateway: Arc::new(gateway),
        store: Arc::new(JsonFileStore::new(dir.path().join("progress.json"))),
        recognizer: Arc::new(recognizer),
        speaker,
        catalog: ExerciseCatalog::default(),
    }
}

#[tokio::test]
async fn test_invalid_menu_input_reprompts_then_exits() {
    let dir = TempDir::new().unwrap();
    let mut gateway = MockGateway::new();
    gateway.expect_respond().never();
    let state = state_with(
        gateway,
        MockRecognizer::new(),
        Arc::new(RecordingSpeaker::default()),
        &dir,
    );

    let mut console = ScriptedConsole::new(["9", "", "5"]);
    menu::run(&state, &mut console).await.unwrap();

    let invalid = console
        .transcript
        .iter()
        .filter(|l| *l == "Invalid choice. Try again.")
        .count();
    assert_eq!(invalid, 2);
    assert!(console.saw("Goodbye!"));
}

#[tokio::test]
async fn test_training_then_chat_session() {
    let dir = TempDir::new().unwrap();
    let mut gateway = MockGateway::new();
    gateway
        .expect_respond()
        .withf(|i| i.starts_with("Generate a random prompt"))
        .returning(|_| "Pitch a new product.".to_string());
    gateway
        .expect_respond()
        .withf(|i| i.starts_with("Evaluate the following response"))
        .returning(|_| "Clarity 8/10".to_string());
    gateway
        .expect_respond()
        .withf(|i| i == "any tips?")
        .returning(|_| "Slow down.".to_string());
    let state = state_with(
        gateway,
        MockRecognizer::new(),
        Arc::new(RecordingSpeaker::default()),
        &dir,
    );

    let mut console = ScriptedConsole::new([
        "3",
        "1",
        "Our gadget saves time.",
        "1",
        "any tips?",
        "exit",
        "5",
    ]);
    menu::run(&state, &mut console).await.unwrap();

    assert!(console.saw("\nYour task: Pitch a new product."));
    assert!(console.saw("Clarity 8/10"));
    assert!(console.saw("AI: Slow down."));

    let record = state.store.load().unwrap();
    assert_eq!(record.attempts("Impromptu Speaking").len(), 1);
    assert_eq!(record.attempts("Impromptu Speaking")[0].response, "Our gadget saves time.");
}

#[tokio::test]
async fn test_voice_mode_speaks_replies() {
    let dir = TempDir::new().unwrap();
    let mut gateway = MockGateway::new();
    gateway
        .expect_respond()
        .withf(|i| i == "how was that")
        .times(1)
        .returning(|_| "Nicely paced.".to_string());

    let mut recognizer = MockRecognizer::new();
    let mut heard = vec!["exit".to_string(), "how was that".to_string()];
    recognizer
        .expect_transcribe()
        .times(2)
        .returning(move || Ok(heard.pop().unwrap_or_default()));

    let speaker = Arc::new(RecordingSpeaker::default());
    let state = state_with(gateway, recognizer, speaker.clone(), &dir);

    let mut console = ScriptedConsole::new(["2", "5"]);
    menu::run(&state, &mut console).await.unwrap();

    assert_eq!(*speaker.spoken.lock().unwrap(), vec!["Nicely paced.".to_string()]);
    assert!(!dir.path().join("progress.json").exists());
}

#[tokio::test]
async fn test_unreadable_progress_is_reported_and_menu_continues() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("progress.json"), "{ broken").unwrap();

    let mut gateway = MockGateway::new();
    gateway.expect_respond().returning(|_| "ok".to_string());
    let state = state_with(
        gateway,
        MockRecognizer::new(),
        Arc::new(RecordingSpeaker::default()),
        &dir,
    );

    let mut console = ScriptedConsole::new(["3", "2", "A story", "5"]);
    menu::run(&state, &mut console).await.unwrap();

    assert!(
        console
            .transcript
            .iter()
            .any(|l| l.starts_with("Could not read your progress:"))
    );
    assert!(
        !console
            .transcript
            .iter()
            .any(|l| l.starts_with("Could not save your progress:"))
    );
    assert!(console.saw("Goodbye!"));
}

#[tokio::test]
async fn test_failed_save_is_reported_after_feedback() {
    let dir = TempDir::new().unwrap();
    // A directory where the temporary file should go makes the save fail.
    std::fs::create_dir(dir.path().join("progress.json.tmp")).unwrap();

    let mut gateway = MockGateway::new();
    gateway.expect_respond().returning(|_| "Narrative 6/10".to_string());
    let state = state_with(
        gateway,
        MockRecognizer::new(),
        Arc::new(RecordingSpeaker::default()),
        &dir,
    );

    let mut console = ScriptedConsole::new(["3", "2", "A story", "5"]);
    menu::run(&state, &mut console).await.unwrap();

    let feedback_at = console
        .transcript
        .iter()
        .position(|l| l == "Narrative 6/10")
        .unwrap();
    let error_at = console
        .transcript
        .iter()
        .position(|l| l.starts_with("Could not save your progress:"))
        .unwrap();
    assert!(feedback_at < error_at);
    assert!(console.saw("Goodbye!"));
}

#[tokio::test]
async fn test_end_of_input_ends_the_session() {
    let dir = TempDir::new().unwrap();
    let state = state_with(
        MockGateway::new(),
        MockRecognizer::new(),
        Arc::new(RecordingSpeaker::default()),
        &dir,
    );

    let mut console = ScriptedConsole::new(["1"]);
    menu::run(&state, &mut console).await.unwrap();
    assert!(console.saw("Goodbye!"));
}
