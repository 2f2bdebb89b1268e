//! PDF text collection.

use crate::tokens::{PdfExtractTokenSource, PdfToken, TokenSource};
use s3doc_core::{Error, Result, TextExtractor};
use std::sync::mpsc::{sync_channel, Receiver};
use std::thread;

/// Number of tokens the reader may run ahead of the collector.
const TOKEN_BUFFER: usize = 256;

enum StreamEvent {
    Token(PdfToken),
    Done,
    Failed(Error),
}

/// Parser for PDF files.
pub struct PdfParser<S = PdfExtractTokenSource> {
    source: S,
}

impl PdfParser {
    /// Create a new PDF parser backed by `pdf-extract`.
    pub fn new() -> Self {
        Self::with_source(PdfExtractTokenSource)
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TokenSource> PdfParser<S> {
    /// Create a parser over a custom token source.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Extract all text tokens, joined by single spaces in emission order.
    ///
    /// A document without text yields an empty string. All tokens are
    /// buffered before returning.
    pub fn parse(&self, bytes: &[u8]) -> Result<String> {
        let (sender, receiver) = sync_channel(TOKEN_BUFFER);
        let source = &self.source;

        thread::scope(|scope| {
            let reader = scope.spawn(move || {
                let outcome = source.parse_buffer(bytes, &mut |token: PdfToken| {
                    // The collector only hangs up after Done/Failed.
                    let _ = sender.send(StreamEvent::Token(token));
                });
                let last = match outcome {
                    Ok(()) => StreamEvent::Done,
                    Err(e) => StreamEvent::Failed(e),
                };
                let _ = sender.send(last);
            });

            let collected = collect_text(&receiver);

            match reader.join() {
                Ok(()) => collected,
                Err(_) => Err(Error::PdfParse("PDF reader panicked".to_string())),
            }
        })
    }
}

impl<S: TokenSource> TextExtractor for PdfParser<S> {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        self.parse(bytes)
    }
}

fn collect_text(receiver: &Receiver<StreamEvent>) -> Result<String> {
    let mut items: Vec<String> = Vec::new();

    loop {
        match receiver.recv() {
            Ok(StreamEvent::Token(token)) => {
                if let Some(text) = token.into_text() {
                    items.push(text);
                }
            }
            Ok(StreamEvent::Done) => return Ok(items.join(" ")),
            Ok(StreamEvent::Failed(e)) => return Err(e),
            Err(_) => return Err(Error::PdfParse("Token stream ended unexpectedly".to_string())),
        }
    }
}
