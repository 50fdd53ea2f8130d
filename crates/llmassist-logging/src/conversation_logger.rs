use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use llmassist_core::{Speaker, TranscriptEntry};

#[derive(Serialize)]
struct LogEntry<'a> {
    timestamp: String, // ISO‑8601 Local time
    index: usize,
    speaker: Speaker,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    replaced: bool,
}

/// Append-only JSONL log of transcript changes.
///
/// A replaced placeholder is logged again with `"replaced": true` and the
/// same index, so the file replays to the final transcript.
pub struct ConversationLogger {
    file_path: PathBuf,
    file: Option<tokio::fs::File>,
}

impl ConversationLogger {
    /// Create a new logger in `log_dir`; the file name carries the current local time.
    pub async fn new(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .await
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        let now_local = Local::now();
        let filename = format!("llmassist-{}.jsonl", now_local.format("%Y-%m-%d-%H%M%S"));
        let file_path = log_dir.join(filename);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await
            .with_context(|| format!("Failed to open conversation log {}", file_path.display()))?;
        Ok(Self { file_path, file: Some(file) })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Append one transcript entry. Write failures are reported, never propagated.
    pub async fn log(&mut self, index: usize, entry: &TranscriptEntry, model: Option<&str>, replaced: bool) {
        let record = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            index,
            speaker: entry.speaker,
            content: &entry.message,
            model: if entry.speaker == Speaker::Assistant { model } else { None },
            replaced,
        };
        if let Some(file) = &mut self.file {
            if let Ok(mut json) = serde_json::to_string(&record) {
                json.push('\n');
                if let Err(e) = file.write_all(json.as_bytes()).await {
                    eprintln!("[Logging error] {}", e);
                }
            }
        }
    }

    /// Flush and close the file. Called on graceful shutdown.
    pub async fn shutdown(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush().await;
            let _ = file.sync_all().await;
        }
    }
}
