//! XML materialization of element trees.
//!
//! The tree builder produces abstract [`ElementNode`]s. This module owns the
//! document root (namespace declarations, attributes) and turns the result
//! into text with quick-xml, or reads such text back.
//!
//! # Example
//!
//! ```
//! use fattura::{convert, field_map};
//! use fattura::xml::{RootElement, WriteOptions, to_xml_string};
//!
//! let nodes = convert(&field_map! { "Divisa" => "EUR" }).unwrap();
//! let root = RootElement::new("p:Doc")
//!     .namespace("p", "urn:example")
//!     .append(nodes);
//! let xml = to_xml_string(&root, &WriteOptions::default()).unwrap();
//! assert!(xml.contains("<Divisa>EUR</Divisa>"));
//! ```

mod reader;
mod writer;

use serde::{Deserialize, Serialize};

use crate::core::ElementNode;

pub use reader::parse_document;
pub use writer::{nodes_to_xml_string, to_xml_string};

/// Output settings for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Spaces per nesting level, or `None` for a single line.
    pub indent: Option<usize>,
    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` first.
    pub declaration: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: Some(2),
            declaration: true,
        }
    }
}

/// Document root: the only element carrying attributes and namespace declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootElement {
    /// Qualified name, e.g. `p:FatturaElettronica`.
    pub name: String,
    /// Attributes in output order, namespace declarations included.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<ElementNode>,
}

impl RootElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Declare `xmlns:{prefix}`.
    pub fn namespace(self, prefix: &str, uri: impl Into<String>) -> Self {
        self.attribute(format!("xmlns:{prefix}"), uri)
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append nodes after any existing children, keeping their order.
    pub fn append(mut self, nodes: impl IntoIterator<Item = ElementNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Value of the attribute with the given qualified name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&ElementNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Follow a path of tags from the root (first match at each level).
    pub fn find(&self, path: &[&str]) -> Option<&ElementNode> {
        let (first, rest) = path.split_first()?;
        self.child(first)?.find(rest)
    }
}
