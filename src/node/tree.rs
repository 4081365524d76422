//! Arena-backed visual tree
//!
//! The live tree the reveal engine mutates. Nodes are addressed by
//! [`NodeId`]; parents and children are stored as ids so revealers can
//! detach, rebuild and reattach content without fighting the borrow checker.

use std::sync::Arc;

use compact_str::CompactString;
use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::attr::{Attrs, AttrsExt, DRAW_ATTR, DRAW_TYPE_ATTR};

use super::{DrawKind, DrawSubtype, Element, Node, NodeId, Presentation, RevealState, Text};

// =============================================================================
// Node payloads
// =============================================================================

/// Element payload of a mounted node
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name
    pub tag: CompactString,
    /// Element attributes
    pub attrs: Attrs,
    /// How the host should paint this element
    pub presentation: Presentation,
    /// Reveal progress
    pub reveal: RevealState,
}

impl ElementData {
    fn mount(tag: CompactString, attrs: Attrs) -> Self {
        // Annotated nodes start hidden; everything else renders immediately.
        let annotated = attrs
            .get_attr(DRAW_ATTR)
            .map(DrawKind::parse)
            .is_some_and(DrawKind::is_drawable);
        let (presentation, reveal) = if annotated {
            (Presentation::HIDDEN, RevealState::Hidden)
        } else {
            (Presentation::SHOWN, RevealState::Revealed)
        };
        Self { tag, attrs, presentation, reveal }
    }

    /// Parsed `data-draw` annotation.
    pub fn draw_kind(&self) -> DrawKind {
        self.attrs.get_attr(DRAW_ATTR).map(DrawKind::parse).unwrap_or_default()
    }

    /// Parsed `data-draw-type` annotation.
    pub fn draw_subtype(&self) -> Option<DrawSubtype> {
        self.attrs.get_attr(DRAW_TYPE_ATTR).and_then(DrawSubtype::parse)
    }
}

/// Payload of a mounted node
#[derive(Debug, Clone)]
pub enum NodeData {
    Element(ElementData),
    Text(Text),
}

#[derive(Debug, Clone)]
struct Slot {
    data: NodeData,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 8]>,
}

// =============================================================================
// Tree
// =============================================================================

/// Mounted visual tree
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Option<Slot>>,
    root: NodeId,
}

impl Tree {
    /// Mount `root` and everything under it.
    pub fn new(root: Element) -> Self {
        let mut tree = Self { slots: Vec::new(), root: NodeId::from_raw(0) };
        tree.root = tree.mount(root.into(), None);
        tree
    }

    /// Root element id.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn mount(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::from_raw(self.slots.len() as u32);
        match node {
            Node::Text(text) => {
                self.slots.push(Some(Slot { data: NodeData::Text(text), parent, children: SmallVec::new() }));
            }
            Node::Element(elem) => {
                let Element { tag, attrs, children } = *elem;
                self.slots.push(Some(Slot {
                    data: NodeData::Element(ElementData::mount(tag, attrs)),
                    parent,
                    children: SmallVec::new(),
                }));
                for child in children {
                    let child_id = self.mount(child, Some(id));
                    self.slot_mut(id).children.push(child_id);
                }
            }
        }
        id
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    // Callers only pass ids they just created or already resolved.
    fn slot_mut(&mut self, id: NodeId) -> &mut Slot {
        match self.slots.get_mut(id.index()).and_then(Option::as_mut) {
            Some(slot) => slot,
            None => unreachable!("node {id} was resolved before mutation"),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────────

    /// Check if a node is still mounted.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Number of mounted nodes (elements and text).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of ids handed out so far, freed ones included.
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Check if every node has been removed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Node payload.
    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.slot(id).map(|s| &s.data)
    }

    /// Element payload, if `id` is a mounted element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.data(id)? {
            NodeData::Element(e) => Some(e),
            NodeData::Text(_) => None,
        }
    }

    /// Mutable element payload, if `id` is a mounted element.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.slots.get_mut(id.index()).and_then(Option::as_mut).map(|s| &mut s.data)? {
            NodeData::Element(e) => Some(e),
            NodeData::Text(_) => None,
        }
    }

    /// Text payload, if `id` is a mounted text node.
    pub fn text(&self, id: NodeId) -> Option<&Text> {
        match self.data(id)? {
            NodeData::Text(t) => Some(t),
            NodeData::Element(_) => None,
        }
    }

    /// Parent of a node (`None` for the root and detached nodes).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id)?.parent
    }

    /// Direct children in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map(|s| s.children.as_slice()).unwrap_or_default()
    }

    /// Tag name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    /// Parsed `data-draw` annotation (`None` for text and missing nodes).
    pub fn draw_kind(&self, id: NodeId) -> DrawKind {
        self.element(id).map(ElementData::draw_kind).unwrap_or_default()
    }

    /// Direct element children matching `predicate`, in document order.
    pub fn children_where<F>(&self, id: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.element(*c).is_some_and(&predicate))
            .collect()
    }

    /// Nearest element, starting at `id` itself, that matches `predicate`.
    pub fn closest<F>(&self, id: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.element(node).is_some_and(&predicate) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// First element in depth-first order matching `predicate`.
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if self.element(node).is_some_and(&predicate) {
                return Some(node);
            }
            // Reverse so children are visited left-to-right
            stack.extend(self.children(node).iter().rev().copied());
        }
        None
    }

    /// Element with the given `id` attribute.
    pub fn find_by_id(&self, id_attr: &str) -> Option<NodeId> {
        self.find(|e| e.attrs.get_attr("id") == Some(id_attr))
    }

    /// Concatenated text of a subtree.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut buf = String::new();
        self.collect_text(id, &mut buf);
        buf
    }

    fn collect_text(&self, id: NodeId, buf: &mut String) {
        match self.data(id) {
            Some(NodeData::Text(t)) => buf.push_str(&t.content),
            Some(NodeData::Element(_)) => {
                for child in self.children(id) {
                    self.collect_text(*child, buf);
                }
            }
            None => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Structure mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Mount `node` as the last child of `parent`.
    ///
    /// Returns `None` when `parent` is not a mounted element.
    pub fn append(&mut self, parent: NodeId, node: impl Into<Node>) -> Option<NodeId> {
        self.element(parent)?;
        let id = self.mount(node.into(), Some(parent));
        self.slot_mut(parent).children.push(id);
        Some(id)
    }

    /// Mount a text run as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, content: impl Into<String>) -> Option<NodeId> {
        self.append(parent, Text::new(content))
    }

    /// Replace the content of a text node. Returns `false` if `id` is not a
    /// mounted text node.
    pub fn set_text(&mut self, id: NodeId, content: impl Into<String>) -> bool {
        match self.slots.get_mut(id.index()).and_then(Option::as_mut) {
            Some(Slot { data: NodeData::Text(text), .. }) => {
                text.content = content.into();
                true
            }
            _ => false,
        }
    }

    /// Unlink every child of `id`, keeping them mounted but parentless.
    pub fn detach_children(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let children = std::mem::take(&mut self.slot_mut(id).children);
        for child in &children {
            if let Some(slot) = self.slots.get_mut(child.index()).and_then(Option::as_mut) {
                slot.parent = None;
            }
        }
        children.into_vec()
    }

    /// Relink previously detached nodes under `id`, after existing children.
    ///
    /// Nodes that were removed in the meantime are skipped.
    pub fn attach_children(&mut self, id: NodeId, children: impl IntoIterator<Item = NodeId>) {
        if !self.contains(id) {
            return;
        }
        for child in children {
            if let Some(slot) = self.slots.get_mut(child.index()).and_then(Option::as_mut) {
                slot.parent = Some(id);
                self.slot_mut(id).children.push(child);
            }
        }
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, id: NodeId) {
        let Some(slot) = self.slot(id) else { return };
        if let Some(parent) = slot.parent {
            if let Some(parent_slot) = self.slots.get_mut(parent.index()).and_then(Option::as_mut) {
                parent_slot.children.retain(|c| *c != id);
            }
        }
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if let Some(slot) = self.slots.get_mut(node.index()).and_then(Option::take) {
                stack.extend(slot.children);
            }
        }
    }

    /// Remove every child subtree of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.detach_children(id) {
            self.remove(child);
        }
    }

    /// Remove the direct element children matching `predicate`.
    pub fn remove_children_where<F>(&mut self, id: NodeId, predicate: F) -> usize
    where
        F: Fn(&ElementData) -> bool,
    {
        let doomed = self.children_where(id, predicate);
        for child in &doomed {
            self.remove(*child);
        }
        doomed.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Presentation
    // ─────────────────────────────────────────────────────────────────────────

    /// Make an element visible at full opacity.
    pub fn show(&mut self, id: NodeId) {
        if let Some(e) = self.element_mut(id) {
            e.presentation = Presentation::SHOWN;
        }
    }

    /// Reveal state of an element (`Hidden` for missing nodes).
    pub fn reveal_state(&self, id: NodeId) -> RevealState {
        self.element(id).map(|e| e.reveal).unwrap_or_default()
    }

    /// Set the reveal state of an element.
    pub fn set_reveal_state(&mut self, id: NodeId, state: RevealState) {
        if let Some(e) = self.element_mut(id) {
            e.reveal = state;
        }
    }
}

// =============================================================================
// SharedTree
// =============================================================================

/// Tree shared between the engine, its revealers and the host.
///
/// Uses `parking_lot::RwLock`. Access goes through closures so a guard can
/// never be held across an await point.
#[derive(Debug, Clone)]
pub struct SharedTree {
    inner: Arc<RwLock<Tree>>,
}

impl SharedTree {
    /// Share a mounted tree.
    pub fn new(tree: Tree) -> Self {
        Self { inner: Arc::new(RwLock::new(tree)) }
    }

    /// Execute a closure with read access to the tree.
    pub fn read<R>(&self, f: impl FnOnce(&Tree) -> R) -> R {
        let guard = self.inner.read();
        f(&guard)
    }

    /// Execute a closure with write access to the tree.
    pub fn write<R>(&self, f: impl FnOnce(&mut Tree) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    /// Root element id.
    pub fn root(&self) -> NodeId {
        self.read(Tree::root)
    }

    /// Clone the current tree state.
    pub fn snapshot(&self) -> Tree {
        self.read(Tree::clone)
    }
}

impl From<Tree> for SharedTree {
    fn from(tree: Tree) -> Self {
        Self::new(tree)
    }
}

// =============================================================================
// Tests
// =============================================================================
