//! Content-type based routing of payloads to an extraction backend.

use crate::error::{Error, Result};
use crate::types::ContentKind;

/// A backend that turns a complete payload into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract text from the given bytes.
    fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}

/// Routes payloads to the PDF or presentation backend, or decodes them
/// as text, based on the declared content type.
pub struct Dispatcher {
    pdf: Box<dyn TextExtractor>,
    presentation: Box<dyn TextExtractor>,
}

impl Dispatcher {
    /// Create a dispatcher over the given backends.
    pub fn new(pdf: Box<dyn TextExtractor>, presentation: Box<dyn TextExtractor>) -> Self {
        Self { pdf, presentation }
    }

    /// Extract text from an object body.
    ///
    /// Fails with [`Error::MissingBody`] before any backend runs when there
    /// is no body. Holds no state between calls.
    pub fn extract(&self, body: Option<&[u8]>, content_type: &str) -> Result<String> {
        let bytes = body.ok_or(Error::MissingBody)?;

        match ContentKind::from_content_type(content_type) {
            ContentKind::Pdf => {
                log::debug!("Extracting {} bytes as PDF ({})", bytes.len(), content_type);
                self.pdf.extract_text(bytes)
            }
            ContentKind::Presentation => {
                log::debug!("Extracting {} bytes as presentation ({})", bytes.len(), content_type);
                self.presentation.extract_text(bytes)
            }
            ContentKind::PlainText => {
                log::debug!("Decoding {} bytes as text ({})", bytes.len(), content_type);
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}
