use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::RootElement;
use crate::core::{ElementNode, FatturaError};

/// An element opened below the root and not yet closed.
struct OpenElement {
    name: String,
    text: Option<String>,
    children: Vec<ElementNode>,
}

impl OpenElement {
    fn new(name: String) -> Self {
        Self {
            name,
            text: None,
            children: Vec::new(),
        }
    }

    fn push_text(&mut self, text: &str) {
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    fn finish(self) -> Result<ElementNode, FatturaError> {
        match self.text {
            Some(_) if !self.children.is_empty() => Err(FatturaError::Xml(format!(
                "mixed content in <{}> is not supported",
                self.name
            ))),
            Some(text) => Ok(ElementNode::leaf(self.name, text)),
            None => Ok(ElementNode::branch(self.name, self.children)),
        }
    }
}

/// Parse an XML document into a [`RootElement`] of generic element nodes.
///
/// Whitespace around text is trimmed. Attributes are only kept on the root;
/// an attribute on any inner element, mixed content, or a truncated document
/// is an error.
pub fn parse_document(xml: &str) -> Result<RootElement, FatturaError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<RootElement> = None;
    let mut root_open = false;
    let mut stack: Vec<OpenElement> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            FatturaError::Xml(format!(
                "parse error at position {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(ref e) => {
                if root.is_none() {
                    root = Some(start_root(e)?);
                    root_open = true;
                } else if root_open {
                    stack.push(OpenElement::new(inner_name(e)?));
                } else {
                    return Err(content_after_root());
                }
            }
            Event::Empty(ref e) => {
                if root.is_none() {
                    root = Some(start_root(e)?);
                } else if root_open {
                    let node = ElementNode::empty(inner_name(e)?);
                    attach(node, &mut stack, &mut root);
                } else {
                    return Err(content_after_root());
                }
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|e| FatturaError::Xml(format!("invalid text: {e}")))?;
                push_text(&text, &mut stack)?;
            }
            Event::CData(ref e) => {
                let text = std::str::from_utf8(e)
                    .map_err(|e| FatturaError::Xml(format!("invalid CDATA: {e}")))?;
                push_text(text, &mut stack)?;
            }
            Event::End(_) => match stack.pop() {
                Some(open) => {
                    let node = open.finish()?;
                    attach(node, &mut stack, &mut root);
                }
                None => root_open = false,
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if root_open || !stack.is_empty() {
        return Err(FatturaError::Xml("unexpected end of document".into()));
    }
    root.ok_or_else(|| FatturaError::Xml("document has no root element".into()))
}

fn start_root(e: &BytesStart<'_>) -> Result<RootElement, FatturaError> {
    let mut root = RootElement::new(element_name(e)?);
    for attr in e.attributes() {
        let attr = attr.map_err(|e| FatturaError::Xml(format!("invalid attribute: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| FatturaError::Xml(format!("invalid attribute name: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| FatturaError::Xml(format!("invalid attribute value: {e}")))?
            .into_owned();
        root.attributes.push((key, value));
    }
    Ok(root)
}

fn inner_name(e: &BytesStart<'_>) -> Result<String, FatturaError> {
    let name = element_name(e)?;
    if e.attributes().next().is_some() {
        return Err(FatturaError::Xml(format!(
            "attributes on <{name}> are not supported"
        )));
    }
    Ok(name)
}

fn element_name(e: &BytesStart<'_>) -> Result<String, FatturaError> {
    std::str::from_utf8(e.name().as_ref())
        .map(str::to_string)
        .map_err(|e| FatturaError::Xml(format!("invalid element name: {e}")))
}

/// Text pieces are trimmed after unescaping so that CDATA sections and
/// character references follow the same rule as plain text.
fn push_text(text: &str, stack: &mut [OpenElement]) -> Result<(), FatturaError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(open) => {
            open.push_text(text);
            Ok(())
        }
        None => Err(FatturaError::Xml(
            "text outside of an inner element is not supported".into(),
        )),
    }
}

fn attach(node: ElementNode, stack: &mut [OpenElement], root: &mut Option<RootElement>) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if let Some(root) = root.as_mut() {
        root.children.push(node);
    }
}

fn content_after_root() -> FatturaError {
    FatturaError::Xml("content after the root element".into())
}
