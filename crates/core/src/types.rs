//! Domain types shared by the extraction backends.

use serde::{Deserialize, Serialize};

/// How a payload is turned into text, decided from its declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    /// PDF token-stream extraction.
    Pdf,
    /// PPTX (Office Open XML) slide extraction.
    Presentation,
    /// Anything else: the bytes are decoded as UTF-8 text.
    PlainText,
}

impl ContentKind {
    /// Detect the extraction route from a MIME type.
    ///
    /// Case-insensitive substring test; the first matching rule wins, so a
    /// type mentioning both "pdf" and "presentation" is treated as PDF.
    pub fn from_content_type(content_type: &str) -> Self {
        let content_type = content_type.to_ascii_lowercase();

        if content_type.contains("pdf") {
            Self::Pdf
        } else if content_type.contains("presentation") || content_type.contains("ppt") {
            Self::Presentation
        } else {
            Self::PlainText
        }
    }
}
