use serde::{Deserialize, Serialize};

/// Body of an [`ElementNode`]: either text or child elements, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Content {
    /// Leaf element with text content.
    Text(String),
    /// Branch element; an empty vector is an empty element.
    Children(Vec<ElementNode>),
}

/// A generic XML element: tag name plus text or ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementNode {
    pub tag: String,
    pub content: Content,
}

impl ElementNode {
    pub fn leaf(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            content: Content::Text(text.into()),
        }
    }

    pub fn branch(tag: impl Into<String>, children: Vec<ElementNode>) -> Self {
        Self {
            tag: tag.into(),
            content: Content::Children(children),
        }
    }

    /// Element with neither text nor children.
    pub fn empty(tag: impl Into<String>) -> Self {
        Self::branch(tag, Vec::new())
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(t) => Some(t),
            Content::Children(_) => None,
        }
    }

    /// Child elements; a leaf has none.
    pub fn children(&self) -> &[ElementNode] {
        match &self.content {
            Content::Text(_) => &[],
            Content::Children(c) => c,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.content, Content::Text(_))
    }

    /// First child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&ElementNode> {
        self.children().iter().find(|c| c.tag == tag)
    }

    /// All children with the given tag, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ElementNode> {
        self.children().iter().filter(move |c| c.tag == tag)
    }

    /// Follow a path of tags (first match at each level), starting below `self`.
    pub fn find(&self, path: &[&str]) -> Option<&ElementNode> {
        path.iter().try_fold(self, |node, tag| node.child(tag))
    }

    /// Total number of elements in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(ElementNode::count).sum::<usize>()
    }
}
