//! Element builder - owned page fragments before they are mounted
//!
//! Pages are described with `Element` / `Node` values and then mounted into
//! a [`Tree`](super::Tree), where the reveal engine works on them by id.

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::{Attrs, AttrsExt, DRAW_ATTR, DRAW_TYPE_ATTR};

use super::{DrawKind, Text};

// =============================================================================
// Node
// =============================================================================

/// Owned node: either an element or a text run.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
}

impl Node {
    /// Check if this is an element node.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Get as element reference.
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Node::Element(Box::new(elem))
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

// =============================================================================
// Element
// =============================================================================

/// Element with attributes and children
#[derive(Debug, Clone)]
pub struct Element {
    /// Tag name
    pub tag: CompactString,
    /// Element attributes
    pub attrs: Attrs,
    /// Child nodes
    pub children: SmallVec<[Node; 8]>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<CompactString>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: SmallVec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reveal annotations
    // ─────────────────────────────────────────────────────────────────────────

    /// `<tag data-draw="container">`
    pub fn container(tag: impl Into<CompactString>) -> Self {
        Self::new(tag).draw(DrawKind::Container)
    }

    /// `<tag data-draw="element" data-draw-type="{subtype}">`
    pub fn drawn(tag: impl Into<CompactString>, subtype: &str) -> Self {
        Self::new(tag).draw(DrawKind::Element).attr(DRAW_TYPE_ATTR, subtype)
    }

    /// `<tag data-draw="comments">`
    pub fn slot(tag: impl Into<CompactString>) -> Self {
        Self::new(tag).draw(DrawKind::DynamicSlot)
    }

    /// Set the `data-draw` annotation.
    pub fn draw(self, kind: DrawKind) -> Self {
        match kind.as_str() {
            Some(value) => self.attr(DRAW_ATTR, value),
            None => self,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder
    // ─────────────────────────────────────────────────────────────────────────

    /// Add or replace an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.set_attr(name, value);
        self
    }

    /// Set the `id` attribute.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Add a class name.
    pub fn with_class(mut self, class: &str) -> Self {
        self.attrs.add_class(class);
        self
    }

    /// Append a child element.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text run.
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.children.push(Text::new(content).into());
        self
    }

    /// Append `<strong>{content}</strong>`.
    pub fn strong(self, content: impl Into<String>) -> Self {
        self.child(Element::new("strong").text(content))
    }

    /// Append `<br>`.
    pub fn br(self) -> Self {
        self.child(Element::new("br"))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Get attribute value by name
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attr(name)
    }

    /// Parsed `data-draw` annotation.
    pub fn draw_kind(&self) -> DrawKind {
        self.get_attr(DRAW_ATTR).map(DrawKind::parse).unwrap_or_default()
    }

    /// Check if element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Get text content of this element (concatenated from all text nodes)
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => buf.push_str(&t.content),
                Node::Element(e) => e.collect_text(buf),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_builder() {
        let elem = Element::drawn("p", "text-body")
            .with_id("intro")
            .text("Hello ")
            .strong("world")
            .br();

        assert_eq!(elem.tag.as_str(), "p");
        assert_eq!(elem.get_attr("id"), Some("intro"));
        assert_eq!(elem.get_attr(DRAW_TYPE_ATTR), Some("text-body"));
        assert_eq!(elem.draw_kind(), DrawKind::Element);
        assert_eq!(elem.children.len(), 3);
        assert_eq!(elem.text_content(), "Hello world");
    }

    #[test]
    fn test_annotation_constructors() {
        assert_eq!(Element::container("main").draw_kind(), DrawKind::Container);
        assert_eq!(Element::slot("ul").draw_kind(), DrawKind::DynamicSlot);
        assert_eq!(Element::new("div").draw_kind(), DrawKind::None);
    }
}
