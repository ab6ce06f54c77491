//! The top-level menu loop.

use std::io;

use orator_core::console::Console;
use orator_core::conversation::{run_chat, run_voice};
use orator_core::error::{PipelineError, StorageError};
use orator_core::pipeline::AttemptOutcome;
use tracing::{debug, error};

use crate::state::AppState;

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Chat,
    Voice,
    Training,
    Presentation,
    Exit,
}

impl MenuChoice {
    /// Parses a menu key; anything unrecognized is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Chat),
            "2" => Some(MenuChoice::Voice),
            "3" => Some(MenuChoice::Training),
            "4" => Some(MenuChoice::Presentation),
            "5" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

fn show_menu(console: &mut dyn Console) {
    console.show("\n===== Verbal Communication Skills Trainer CLI =====");
    console.show("Choose an option:");
    console.show("1. Chat Mode");
    console.show("2. Voice Mode");
    console.show("3. Training Mode");
    console.show("4. Assess Presentation");
    console.show("5. Exit");
}

/// Whether the menu loop should keep going after a pipeline run.
enum Next {
    Continue,
    Stop,
}

fn settle(
    console: &mut dyn Console,
    result: Result<AttemptOutcome, PipelineError>,
) -> io::Result<Next> {
    match result {
        Ok(outcome) => {
            debug!(?outcome, "Pipeline finished");
            Ok(Next::Continue)
        }
        Err(e) if e.is_end_of_input() => Ok(Next::Stop),
        Err(PipelineError::Storage(
            e @ (StorageError::Read { .. } | StorageError::Corrupt { .. }),
        )) => {
            error!(error = %e, "Failed to load progress");
            console.show(&format!("Could not read your progress: {e}"));
            Ok(Next::Continue)
        }
        Err(PipelineError::Storage(e)) => {
            error!(error = %e, "Failed to persist progress");
            console.show(&format!("Could not save your progress: {e}"));
            Ok(Next::Continue)
        }
        Err(PipelineError::Input(e)) => Err(e),
        Err(e) => Err(io::Error::other(e)),
    }
}

/// Runs the menu until the user exits or input ends.
pub async fn run(state: &AppState, console: &mut dyn Console) -> io::Result<()> {
    loop {
        show_menu(console);
        let line = match console.read_line("Enter your choice: ") {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };

        let next = match MenuChoice::parse(&line) {
            Some(MenuChoice::Chat) => match run_chat(console, state.gateway.as_ref()).await {
                Ok(()) => Next::Continue,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Next::Stop,
                Err(e) => return Err(e),
            },
            Some(MenuChoice::Voice) => {
                run_voice(
                    console,
                    state.recognizer.as_ref(),
                    state.speaker.as_ref(),
                    state.gateway.as_ref(),
                )
                .await;
                Next::Continue
            }
            Some(MenuChoice::Training) => {
                let result = state.training().run(console).await;
                settle(console, result)?
            }
            Some(MenuChoice::Presentation) => {
                let result = state.presentation().run(console).await;
                settle(console, result)?
            }
            Some(MenuChoice::Exit) => Next::Stop,
            None => {
                console.show("Invalid choice. Try again.");
                Next::Continue
            }
        };

        if let Next::Stop = next {
            break;
        }
    }

    console.show("Goodbye!");
    Ok(())
}
