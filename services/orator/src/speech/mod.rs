//! Voice I/O for the trainer.
//!
//! - `capture`: records an utterance from the microphone as WAV.
//! - `transcribe`: turns recordings into text through a remote service.
//! - `tts`: reads replies aloud through a system command.

pub mod capture;
pub mod transcribe;
pub mod tts;

pub use transcribe::{MicrophoneRecognizer, TranscriptionClient};
pub use tts::{CommandSpeaker, MutedSpeaker};
