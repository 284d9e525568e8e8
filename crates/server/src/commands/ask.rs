//! Ask command handler.
//!
//! Runs the same pipeline as `POST /generate` and writes the fragments to
//! stdout as they arrive.

use askrelay::Relay;
use askrelay_core::{config::AppConfig, AppResult};
use askrelay_prompt::{trim_history, ConversationTurn};
use clap::Args;
use futures::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Answer one question and print the streamed reply
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// JSON file holding prior turns: [{"role": "...", "message": "..."}]
    #[arg(long)]
    pub history_file: Option<PathBuf>,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let history = match &self.history_file {
            Some(path) => load_history(path)?,
            None => Vec::new(),
        };
        let history = trim_history(history);
        tracing::debug!("Using {} history turns", history.len());

        let relay = Arc::new(Relay::from_config(config)?);
        let mut fragments = relay.answer(self.question.clone(), history);

        let mut stdout = std::io::stdout();
        while let Some(fragment) = fragments.next().await {
            stdout.write_all(fragment.as_bytes())?;
            stdout.flush()?;
        }
        writeln!(stdout)?;

        Ok(())
    }
}

fn load_history(path: &Path) -> AppResult<Vec<ConversationTurn>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            r#"[{"role": "user", "message": "salam"}, {"role": "model", "message": "wa alaikum salam"}]"#,
        )
        .unwrap();

        let history = load_history(&path).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1], ConversationTurn::new("model", "wa alaikum salam"));
    }

    #[test]
    fn test_load_history_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(load_history(&path).is_err());
    }

    #[test]
    fn test_load_history_missing_file() {
        let err = load_history(Path::new("/nonexistent/history.json")).unwrap_err();
        assert!(err.to_string().contains("I/O error"));
    }
}
