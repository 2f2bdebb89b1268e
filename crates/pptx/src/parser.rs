//! PPTX text assembly.

use crate::container::Container;
use crate::slide_text::extract_slide_text;
use crate::slides::select_slides;
use crate::xml_tree::XmlNode;
use s3doc_core::{Error, Result, TextExtractor};

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of every slide, in slide-number order.
    ///
    /// Each slide contributes a `===== SLIDE <n> =====` banner line followed
    /// by its paragraphs. Container and XML errors are wrapped in
    /// [`Error::PresentationExtraction`].
    pub fn parse(&self, bytes: &[u8]) -> Result<String> {
        self.assemble(bytes)
            .map_err(|e| Error::PresentationExtraction(Box::new(e)))
    }

    fn assemble(&self, bytes: &[u8]) -> Result<String> {
        let mut container = Container::open(bytes)?;
        let entries = container.entries().to_vec();
        let slides = select_slides(&entries);

        log::debug!("Found {} slides in {} container entries", slides.len(), entries.len());

        let mut text = String::new();
        for slide in slides {
            let xml = container.read_entry_as_text(slide.entry)?;
            let document = XmlNode::parse(&xml)?;

            text.push_str(&format!("\n===== SLIDE {} =====\n", slide.number));
            text.push_str(&extract_slide_text(&document));
        }

        Ok(text)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PptxParser {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        self.parse(bytes)
    }
}
