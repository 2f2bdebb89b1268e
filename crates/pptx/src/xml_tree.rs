//! Generic XML tree used for slide traversal.
//!
//! Every element maps each child tag name to the ordered list of children
//! carrying that name, so repeated siblings (`<a:p>`, `<a:r>`, ...) stay
//! indexable. Lookups never fail: an absent tag yields an empty slice.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use s3doc_core::{Error, Result};
use std::collections::BTreeMap;

/// An XML element, or the document node holding the root element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    children: BTreeMap<String, Vec<XmlNode>>,
    text: String,
}

impl XmlNode {
    /// Parse a document into its document node.
    ///
    /// The returned node has exactly one child: the root element under its
    /// qualified tag name (e.g. `p:sld`).
    pub fn parse(xml: &str) -> Result<XmlNode> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(false);

        // (qualified name, node) for each open element; index 0 is the document.
        let mut stack: Vec<(String, XmlNode)> = vec![(String::new(), XmlNode::default())];

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::XmlSyntax(format!("{} at byte {}", e, reader.buffer_position()))
            })?;

            match event {
                Event::Start(ref e) => {
                    let name = qualified_name(e);
                    if stack.len() == 1 && stack[0].1.has_children() {
                        return Err(Error::XmlSyntax(format!("Second root element <{}>", name)));
                    }
                    check_attributes(e)?;
                    stack.push((name, XmlNode::default()));
                }
                Event::Empty(ref e) => {
                    let name = qualified_name(e);
                    check_attributes(e)?;
                    attach(&mut stack, name, XmlNode::default())?;
                }
                Event::End(_) => {
                    if stack.len() == 1 {
                        return Err(Error::XmlSyntax("Unexpected closing tag".to_string()));
                    }
                    if let Some((name, node)) = stack.pop() {
                        attach(&mut stack, name, node)?;
                    }
                }
                Event::Text(ref e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::XmlSyntax(format!("Invalid text content: {}", err)))?;
                    push_text(&mut stack, &text)?;
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    push_text(&mut stack, &text)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() != 1 {
            let open = stack.last().map(|(name, _)| name.as_str()).unwrap_or_default();
            return Err(Error::XmlSyntax(format!("Unclosed element <{}>", open)));
        }

        let (_, document) = stack.remove(0);
        if document.children.is_empty() {
            return Err(Error::XmlSyntax("Document has no root element".to_string()));
        }

        Ok(document)
    }

    /// Children with the given qualified tag name, in document order.
    pub fn children(&self, tag: &str) -> &[XmlNode] {
        self.children.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First child with the given qualified tag name.
    pub fn first(&self, tag: &str) -> Option<&XmlNode> {
        self.children(tag).first()
    }

    /// Character data directly inside this element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this element contains any child elements.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    fn add_child(&mut self, name: String, child: XmlNode) {
        self.children.entry(name).or_default().push(child);
    }
}

/// Add a finished element to the innermost open element.
fn attach(stack: &mut [(String, XmlNode)], name: String, node: XmlNode) -> Result<()> {
    match stack {
        [(_, document)] if document.has_children() => {
            Err(Error::XmlSyntax(format!("Second root element <{}>", name)))
        }
        [.., (_, parent)] => {
            parent.add_child(name, node);
            Ok(())
        }
        [] => Err(Error::XmlSyntax("Unexpected closing tag".to_string())),
    }
}

/// Attributes are not kept, but malformed ones still reject the document.
fn check_attributes(start: &BytesStart<'_>) -> Result<()> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::XmlSyntax(format!("Invalid attribute: {}", e)))?;
        attr.unescape_value()
            .map_err(|e| Error::XmlSyntax(format!("Invalid attribute value: {}", e)))?;
    }
    Ok(())
}

fn qualified_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

/// Append character data to the innermost open element.
///
/// Outside the root only whitespace is allowed.
fn push_text(stack: &mut [(String, XmlNode)], text: &str) -> Result<()> {
    match stack {
        [_] => {
            if text.trim().is_empty() {
                Ok(())
            } else {
                Err(Error::XmlSyntax("Text outside the root element".to_string()))
            }
        }
        [.., (_, node)] => {
            node.text.push_str(text);
            Ok(())
        }
        [] => Ok(()),
    }
}
