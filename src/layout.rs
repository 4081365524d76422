//! Geometry reads for the reveal.
//!
//! After mutating the tree the next geometry read must reflect the mutation.
//! The core never assumes that happens by itself: it asks a [`Layout`] to
//! measure a node whenever it needs a size, and the host answers from its
//! real layout engine. Two implementations ship with the crate: fixed boxes
//! and a small deterministic flow model.

use rustc_hash::FxHashMap;

use crate::attr::AttrsExt;
use crate::node::{NodeData, NodeId, Tree};
use crate::reveal::border::OVERLAY_CLASS;

/// Rendered box size in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Measures the current box of a node.
pub trait Layout: Send + Sync {
    /// Current size of `node`, reflecting every mutation made so far.
    fn measure(&self, tree: &Tree, node: NodeId) -> Size;
}

impl<L: Layout> Layout for &L {
    fn measure(&self, tree: &Tree, node: NodeId) -> Size {
        (**self).measure(tree, node)
    }
}

// =============================================================================
// FixedLayout
// =============================================================================

/// Explicit sizes per node; unknown nodes measure as zero.
#[derive(Debug, Clone, Default)]
pub struct FixedLayout {
    sizes: FxHashMap<NodeId, Size>,
}

impl FixedLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the size of a node.
    pub fn set(&mut self, node: NodeId, size: Size) {
        self.sizes.insert(node, size);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, node: NodeId, size: Size) -> Self {
        self.set(node, size);
        self
    }
}

impl Layout for FixedLayout {
    fn measure(&self, _tree: &Tree, node: NodeId) -> Size {
        self.sizes.get(&node).copied().unwrap_or_default()
    }
}

// =============================================================================
// FlowLayout
// =============================================================================

/// Deterministic block flow: every element stacks its children vertically,
/// text wraps at a fixed character width.
///
/// Border overlays are positioned over their container and take no space.
/// Nodes the host has not painted yet still take space, like
/// `visibility: hidden` content does.
#[derive(Debug, Clone, Copy)]
pub struct FlowLayout {
    /// Width of the root box.
    pub viewport_width: f64,
    /// Width of one character.
    pub char_width: f64,
    /// Height of one text line.
    pub line_height: f64,
    /// Padding on every side of a drawable container.
    pub container_padding: f64,
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self {
            viewport_width: 640.0,
            char_width: 8.0,
            line_height: 16.0,
            container_padding: 8.0,
        }
    }
}

impl FlowLayout {
    fn padding(&self, tree: &Tree, node: NodeId) -> f64 {
        match tree.draw_kind(node) {
            crate::node::DrawKind::Container => self.container_padding,
            _ => 0.0,
        }
    }

    /// Width available to `node`: the viewport minus ancestor padding.
    fn width_of(&self, tree: &Tree, node: NodeId) -> f64 {
        let mut width = self.viewport_width;
        let mut current = tree.parent(node);
        while let Some(ancestor) = current {
            width -= 2.0 * self.padding(tree, ancestor);
            current = tree.parent(ancestor);
        }
        width.max(0.0)
    }

    fn height_of(&self, tree: &Tree, node: NodeId, width: f64) -> f64 {
        match tree.data(node) {
            None => 0.0,
            Some(NodeData::Text(text)) => self.text_height(text.char_count(), width),
            Some(NodeData::Element(elem)) => {
                if elem.attrs.has_class(OVERLAY_CLASS) {
                    return 0.0;
                }
                if elem.tag.as_str() == "br" {
                    return self.line_height;
                }
                let padding = self.padding(tree, node);
                let inner = (width - 2.0 * padding).max(0.0);
                let mut height = 0.0;
                let mut run = 0usize;
                for child in tree.children(node) {
                    // Inline runs (text and <strong>) share lines
                    match tree.data(*child) {
                        Some(NodeData::Text(t)) => run += t.char_count(),
                        Some(NodeData::Element(e)) if e.tag.as_str() == "strong" => {
                            run += tree.text_content(*child).chars().count();
                        }
                        _ => {
                            height += self.text_height(run, inner);
                            run = 0;
                            height += self.height_of(tree, *child, inner);
                        }
                    }
                }
                height += self.text_height(run, inner);
                height + 2.0 * padding
            }
        }
    }

    fn text_height(&self, chars: usize, width: f64) -> f64 {
        if chars == 0 {
            return 0.0;
        }
        let per_line = (width / self.char_width).floor().max(1.0);
        (chars as f64 / per_line).ceil() * self.line_height
    }
}

impl Layout for FlowLayout {
    fn measure(&self, tree: &Tree, node: NodeId) -> Size {
        if !tree.contains(node) {
            return Size::default();
        }
        let width = self.width_of(tree, node);
        Size::new(width, self.height_of(tree, node, width))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Element;

    #[test]
    fn test_fixed_layout() {
        let tree = Tree::new(Element::new("div"));
        let root = tree.root();
        let layout = FixedLayout::new().with(root, Size::new(100.0, 40.0));
        assert_eq!(layout.measure(&tree, root), Size::new(100.0, 40.0));
        assert_eq!(layout.measure(&tree, NodeId::from_raw(99)), Size::default());
    }

    #[test]
    fn test_flow_wraps_text() {
        let layout = FlowLayout { viewport_width: 80.0, ..FlowLayout::default() };
        // 10 chars per line
        let tree = Tree::new(Element::new("p").text("x".repeat(25)));
        assert_eq!(layout.measure(&tree, tree.root()), Size::new(80.0, 48.0));
    }

    #[test]
    fn test_flow_container_grows_with_content() {
        let layout = FlowLayout::default();
        let mut tree = Tree::new(Element::container("main").child(Element::slot("ul")));
        let main = tree.root();
        let ul = tree.children(main)[0];

        let empty = layout.measure(&tree, main);
        assert_eq!(empty, Size::new(640.0, 16.0));

        tree.append(ul, Element::new("li").text("hello"));
        tree.append(ul, Element::new("li").text("world"));
        assert_eq!(layout.measure(&tree, main).height, 16.0 + 32.0);
        assert_eq!(layout.measure(&tree, ul).width, 624.0);
    }

    #[test]
    fn test_flow_ignores_overlays() {
        let layout = FlowLayout::default();
        let mut tree = Tree::new(Element::container("nav").text("home"));
        let nav = tree.root();
        let before = layout.measure(&tree, nav);
        tree.append(nav, Element::new("svg").with_class(OVERLAY_CLASS));
        assert_eq!(layout.measure(&tree, nav), before);
    }
}
