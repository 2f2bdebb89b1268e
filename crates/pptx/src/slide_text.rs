//! Text extraction from a parsed slide.
//!
//! Walks `p:sld / p:cSld / p:spTree / p:sp / p:txBody / a:p / a:r / a:t`.
//! Any hop may be absent; an absent hop contributes no text and never
//! stops its siblings from being read.

use crate::xml_tree::XmlNode;
use thiserror::Error;

/// Markup that has the expected tags but not the expected shape.
#[derive(Error, Debug)]
enum TraversalError {
    #[error("text run <a:t> contains nested elements")]
    NestedTextElement,
}

/// Extract the text of one slide, one line per non-empty paragraph.
///
/// Runs of a paragraph are joined without separator. If the slide markup
/// turns out to be malformed midway, the text gathered so far is returned
/// and the problem is logged.
pub fn extract_slide_text(document: &XmlNode) -> String {
    let mut text = String::new();

    if let Err(e) = collect_slide_text(document, &mut text) {
        log::warn!("Stopped reading slide text early: {}", e);
    }

    text
}

fn collect_slide_text(document: &XmlNode, out: &mut String) -> Result<(), TraversalError> {
    let shape_tree = document
        .first("p:sld")
        .and_then(|slide| slide.first("p:cSld"))
        .and_then(|common| common.first("p:spTree"));

    let Some(shape_tree) = shape_tree else {
        return Ok(());
    };

    for shape in shape_tree.children("p:sp") {
        let Some(text_body) = shape.first("p:txBody") else {
            continue;
        };

        for paragraph in text_body.children("a:p") {
            let mut paragraph_text = String::new();

            for run in paragraph.children("a:r") {
                if let Some(run_text) = run.first("a:t") {
                    if run_text.has_children() {
                        push_paragraph(out, &paragraph_text);
                        return Err(TraversalError::NestedTextElement);
                    }
                    paragraph_text.push_str(run_text.text());
                }
            }

            push_paragraph(out, &paragraph_text);
        }
    }

    Ok(())
}

fn push_paragraph(out: &mut String, paragraph_text: &str) {
    if !paragraph_text.is_empty() {
        out.push_str(paragraph_text);
        out.push('\n');
    }
}
