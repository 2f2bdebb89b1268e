//! PDF backend for S3 document text extraction.
//!
//! A token source walks the pages and emits one event per visually
//! contiguous run of text; the parser collects those events into a single
//! space-separated string.

pub mod parser;
pub mod tokens;

pub use parser::PdfParser;
pub use tokens::{PdfExtractTokenSource, PdfToken, TokenSource};
