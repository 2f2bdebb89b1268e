//! PDF token events.

use lopdf::Document;
use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use s3doc_core::{Error, Result};

/// Horizontal gap, in font-size units, that separates two text runs.
const RUN_GAP: f64 = 0.2;
/// Vertical shift, in font-size units, that starts a new line.
const LINE_SHIFT: f64 = 0.5;

/// One parse event read from a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfToken {
    /// Start of a page (1-based).
    Page(u32),
    /// A run of text shown on the current page.
    Text(String),
}

impl PdfToken {
    /// The text payload, if this token carries a non-empty one.
    pub fn into_text(self) -> Option<String> {
        match self {
            PdfToken::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Something that reads a PDF buffer and pushes tokens as it goes.
pub trait TokenSource: Send + Sync {
    /// Parse `bytes`, calling `emit` for each token in document order.
    ///
    /// Returns once the whole document has been read, or with
    /// [`Error::PdfParse`] on the first decode failure.
    fn parse_buffer(&self, bytes: &[u8], emit: &mut dyn FnMut(PdfToken)) -> Result<()>;
}

/// Token source backed by `pdf-extract`.
///
/// Glyphs are decoded through the font's encoding, its `ToUnicode` map and
/// CID mappings, so composite (Type0) fonts come out as real text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractTokenSource;

impl TokenSource for PdfExtractTokenSource {
    fn parse_buffer(&self, bytes: &[u8], emit: &mut dyn FnMut(PdfToken)) -> Result<()> {
        let mut document = Document::load_mem(bytes)
            .map_err(|e| Error::PdfParse(format!("Failed to load PDF: {}", e)))?;

        if document.is_encrypted() {
            document
                .decrypt("")
                .map_err(|e| Error::PdfParse(format!("Failed to decrypt PDF: {}", e)))?;
        }

        let mut sink = RunCollector::new(emit);
        pdf_extract::output_doc(&document, &mut sink)
            .map_err(|e| Error::PdfParse(format!("Failed to read PDF content: {}", e)))?;
        sink.flush();

        Ok(())
    }
}

/// Groups decoded glyphs into text runs.
///
/// A run ends when the next glyph starts on another line, jumps back, or
/// leaves a horizontal gap wider than [`RUN_GAP`] of the font size (the
/// word gap a `TJ` kerning offset usually encodes).
struct RunCollector<'e> {
    emit: &'e mut dyn FnMut(PdfToken),
    run: String,
    last_end: f64,
    last_y: f64,
}

impl<'e> RunCollector<'e> {
    fn new(emit: &'e mut dyn FnMut(PdfToken)) -> Self {
        Self {
            emit,
            run: String::new(),
            last_end: 0.0,
            last_y: 0.0,
        }
    }

    fn push_glyph(&mut self, x: f64, y: f64, advance: f64, size: f64, text: &str) {
        if !self.run.is_empty() {
            let new_line = (y - self.last_y).abs() > size * LINE_SHIFT;
            let gap = (x - self.last_end).abs() > size * RUN_GAP;
            if new_line || gap {
                self.flush();
            }
        }

        self.run.push_str(text);
        self.last_end = x + advance;
        self.last_y = y;
    }

    fn flush(&mut self) {
        let run = std::mem::take(&mut self.run);
        let text = run.trim();
        if !text.is_empty() {
            (self.emit)(PdfToken::Text(text.to_string()));
        }
    }
}

impl OutputDev for RunCollector<'_> {
    fn begin_page(
        &mut self,
        page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        self.flush();
        log::debug!("Reading page {}", page_num);
        (self.emit)(PdfToken::Page(page_num));
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        glyph: &str,
    ) -> std::result::Result<(), OutputError> {
        let scale = (trm.m11 * trm.m22 - trm.m12 * trm.m21).abs().sqrt();
        let size = font_size * scale;
        self.push_glyph(trm.m31, trm.m32, width * size, size, glyph);
        Ok(())
    }

    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }
}
