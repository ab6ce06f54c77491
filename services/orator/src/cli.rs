//! Command-line flags that override environment configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Verbal communication skills trainer.
#[derive(Debug, Parser)]
#[command(name = "orator", version)]
pub struct Cli {
    /// JSON file holding XAI_API_KEY, used when the variable is not set.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Where attempt history is stored.
    #[arg(long, value_name = "PATH")]
    pub progress: Option<PathBuf>,

    /// Chat model identifier sent to the AI backend.
    #[arg(long, value_name = "ID")]
    pub model: Option<String>,
}

impl Cli {
    /// Applies the flags that take effect after configuration is loaded.
    pub fn apply(&self, config: &mut Config) {
        if let Some(progress) = &self.progress {
            config.progress_path = progress.clone();
        }
        if let Some(model) = &self.model {
            config.chat_model = model.clone();
        }
    }
}
