//! Pitch deck text extraction
//!
//! Decks arrive as PDF, PowerPoint (`.pptx`) or plain text/markdown. Only the
//! text layer is read; slide images are ignored.

mod extract;

pub use extract::{extract_deck_text, extract_pptx_text};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Minimum amount of trimmed text a deck must yield to be analysed
pub const MIN_DECK_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckFormat {
    Pdf,
    Pptx,
    Text,
}

impl DeckFormat {
    /// Detects the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, DeckError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "pptx" => Ok(Self::Pptx),
            "txt" | "md" => Ok(Self::Text),
            "" => Err(DeckError::UnsupportedFormat("(no extension)".to_string())),
            other => Err(DeckError::UnsupportedFormat(format!(".{}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Pptx => "pptx",
            Self::Text => "text",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeckText {
    pub source: PathBuf,
    pub format: DeckFormat,
    pub text: String,
}

impl DeckText {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Deck file not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported deck format {0}. Supported formats: .pdf, .pptx, .txt, .md")]
    UnsupportedFormat(String),

    #[error("Insufficient text extracted from deck: {found} characters (need at least {required})")]
    InsufficientText { found: usize, required: usize },

    #[error("Failed to read deck: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("PowerPoint extraction failed: {0}")]
    Pptx(String),
}
