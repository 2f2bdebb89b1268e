//! Error types for document text extraction.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting text from a stored object.
#[derive(Error, Debug)]
pub enum Error {
    /// The payload is not a readable ZIP container.
    #[error("Invalid ZIP container: {0}")]
    ContainerFormat(String),

    /// A container entry is not valid UTF-8 text.
    #[error("Failed to decode entry '{path}' as UTF-8: {reason}")]
    EntryDecode { path: String, reason: String },

    /// Malformed XML markup.
    #[error("XML syntax error: {0}")]
    XmlSyntax(String),

    /// Building the presentation text failed.
    #[error("Presentation extraction failed: {0}")]
    PresentationExtraction(#[source] Box<Error>),

    /// The PDF parser reported a decode error.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The stored object has no body to extract from.
    #[error("No body found")]
    MissingBody,
}
