use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use super::{RootElement, WriteOptions};
use crate::core::{Content, ElementNode, FatturaError};

fn xml_io(e: std::io::Error) -> FatturaError {
    FatturaError::Xml(format!("write error: {e}"))
}

pub(crate) struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub(crate) fn new(options: &WriteOptions) -> Result<Self, FatturaError> {
        let cursor = Cursor::new(Vec::new());
        let mut writer = match options.indent {
            Some(width) => Writer::new_with_indent(cursor, b' ', width),
            None => Writer::new(cursor),
        };
        if options.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(xml_io)?;
        }
        Ok(Self { writer })
    }

    pub(crate) fn into_string(self) -> Result<String, FatturaError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| FatturaError::Xml(format!("UTF-8 error: {e}")))
    }

    pub(crate) fn write_root(&mut self, root: &RootElement) -> Result<(), FatturaError> {
        let mut start = BytesStart::new(root.name.as_str());
        for (k, v) in &root.attributes {
            start.push_attribute((k.as_str(), v.as_str()));
        }
        if root.children.is_empty() {
            return self.write(Event::Empty(start));
        }
        self.write(Event::Start(start))?;
        for child in &root.children {
            self.write_node(child)?;
        }
        self.write(Event::End(BytesEnd::new(root.name.as_str())))
    }

    pub(crate) fn write_node(&mut self, node: &ElementNode) -> Result<(), FatturaError> {
        let name = node.tag.as_str();
        match &node.content {
            Content::Text(text) => {
                self.write(Event::Start(BytesStart::new(name)))?;
                self.write(Event::Text(BytesText::new(text)))?;
                self.write(Event::End(BytesEnd::new(name)))
            }
            Content::Children(children) if children.is_empty() => {
                self.write(Event::Empty(BytesStart::new(name)))
            }
            Content::Children(children) => {
                self.write(Event::Start(BytesStart::new(name)))?;
                for child in children {
                    self.write_node(child)?;
                }
                self.write(Event::End(BytesEnd::new(name)))
            }
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), FatturaError> {
        self.writer.write_event(event).map_err(xml_io)
    }
}

/// Serialize a complete document: optional declaration, then the root element.
pub fn to_xml_string(root: &RootElement, options: &WriteOptions) -> Result<String, FatturaError> {
    let mut w = XmlWriter::new(options)?;
    w.write_root(root)?;
    w.into_string()
}

/// Serialize a sequence of sibling nodes as a fragment. No declaration is written.
pub fn nodes_to_xml_string(nodes: &[ElementNode], options: &WriteOptions) -> Result<String, FatturaError> {
    let fragment = WriteOptions {
        declaration: false,
        ..options.clone()
    };
    let mut w = XmlWriter::new(&fragment)?;
    for node in nodes {
        w.write_node(node)?;
    }
    w.into_string()
}
