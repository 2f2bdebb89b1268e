//! PPTX (Office Open XML) backend for S3 document text extraction.
//!
//! A .pptx file is a ZIP archive; each slide is an XML member under
//! `ppt/slides/`. Text is read from the shape tree of every slide and
//! assembled in slide-number order.

pub mod container;
pub mod parser;
pub mod slide_text;
pub mod slides;
pub mod xml_tree;

pub use container::{Container, ContainerEntry};
pub use parser::PptxParser;
pub use slide_text::extract_slide_text;
pub use slides::{select_slides, SlideRef};
pub use xml_tree::XmlNode;
