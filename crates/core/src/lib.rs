//! Core error types, content-type detection and extraction dispatch
//! for S3 document text extraction.

pub mod dispatch;
pub mod error;
pub mod types;

pub use dispatch::{Dispatcher, TextExtractor};
pub use error::{Error, Result};
pub use types::ContentKind;
