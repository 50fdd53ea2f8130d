use serde::{Deserialize, Serialize};

use crate::render::render_document;

/// Assistant text shown while a call is in flight
pub const THINKING_PLACEHOLDER: &str = "Thinking...";

/// Replaces a placeholder whose call was superseded by a newer one
pub const SUPERSEDED_MESSAGE: &str = "[Superseded by a newer request]";

/// Who a transcript entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    System,
    User,
    Assistant,
}

impl Speaker {
    /// Label used in the transcript text and by the renderer
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::System => "SYSTEM",
            Speaker::User => "YOU",
            Speaker::Assistant => "AI",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub message: String,
}

impl TranscriptEntry {
    pub fn is_placeholder(&self) -> bool {
        self.speaker == Speaker::Assistant && self.message == THINKING_PLACEHOLDER
    }

    /// `LABEL: message` followed by a blank line
    pub fn to_text(&self) -> String {
        format!("{}: {}\n\n", self.speaker.label(), self.message)
    }
}

/// Ordered, speaker-labelled log of a panel session.
///
/// Append-only, with one exception: the most recent assistant entry may
/// be replaced in place while it still holds [`THINKING_PLACEHOLDER`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its index
    pub fn push(&mut self, speaker: Speaker, message: impl Into<String>) -> usize {
        self.entries.push(TranscriptEntry {
            speaker,
            message: message.into(),
        });
        self.entries.len() - 1
    }

    /// Append the assistant placeholder for a call that just started
    pub fn push_placeholder(&mut self) -> usize {
        self.push(Speaker::Assistant, THINKING_PLACEHOLDER)
    }

    /// Index of the most recent assistant entry, if it is still a placeholder
    pub fn pending_placeholder(&self) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|e| e.speaker == Speaker::Assistant)
            .filter(|&idx| self.entries[idx].is_placeholder())
    }

    /// Replace the pending placeholder with `message`.
    ///
    /// Returns the index of the replaced entry, or `None` (and changes
    /// nothing) when there is no pending placeholder.
    pub fn resolve_placeholder(&mut self, message: impl Into<String>) -> Option<usize> {
        let idx = self.pending_placeholder()?;
        self.entries[idx].message = message.into();
        Some(idx)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&TranscriptEntry> {
        self.entries.get(idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain text form fed to the renderer
    pub fn to_text(&self) -> String {
        self.entries.iter().map(TranscriptEntry::to_text).collect()
    }

    /// Full HTML document for display
    pub fn render_html(&self) -> String {
        render_document(&self.to_text())
    }
}
