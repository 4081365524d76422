//! Visual tree types.
//!
//! This module provides the owned `Element` builder, the arena-backed `Tree`
//! the engine mutates during a reveal, and the draw annotations that decide
//! how each node takes part in it.
//!
//! # Key Features
//!
//! - `Element` / `Node` are plain owned values for building a page
//! - `Tree` stores mounted nodes by `NodeId`, with parent links for
//!   `closest`-style ancestor queries
//! - `SharedTree` hands out closure-scoped access so no lock guard can be
//!   held across an await point

mod element;
mod text;
mod tree;

pub use element::{Element, Node};
pub use text::Text;
pub use tree::{ElementData, NodeData, SharedTree, Tree};

use std::fmt;

// =============================================================================
// NodeId
// =============================================================================

/// Index of a node mounted in a [`Tree`].
///
/// Ids are never reused within a tree, so an id held past a removal simply
/// stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Create from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw index.
    #[inline]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Draw annotations
// =============================================================================

/// How a node takes part in the reveal walk (`data-draw`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawKind {
    /// Not annotated: rendered immediately, never walked.
    #[default]
    None,
    /// Outline drawn first, then its own annotated children.
    Container,
    /// Revealed by the element revealer.
    Element,
    /// Content fetched and revealed at walk time.
    DynamicSlot,
}

impl DrawKind {
    /// Parse a `data-draw` value. Unknown values are not walked.
    pub fn parse(value: &str) -> Self {
        match value {
            "container" => DrawKind::Container,
            "element" => DrawKind::Element,
            "comments" => DrawKind::DynamicSlot,
            _ => DrawKind::None,
        }
    }

    /// The `data-draw` value for this kind, if any.
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            DrawKind::None => None,
            DrawKind::Container => Some("container"),
            DrawKind::Element => Some("element"),
            DrawKind::DynamicSlot => Some("comments"),
        }
    }

    /// Whether the walker visits this node.
    pub fn is_drawable(self) -> bool {
        !matches!(self, DrawKind::None)
    }
}

/// Reveal style of an element (`data-draw-type`).
///
/// The subtype name also determines the styling classes applied before and
/// after the reveal (`{name}-pre` / `{name}-post`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawSubtype {
    /// Character-by-character text reveal.
    TypedText(String),
    /// Waits for the surrounding form outline, no per-character work.
    FormOutline(String),
    /// Any other name: class swap only.
    Plain(String),
}

impl DrawSubtype {
    /// Classify a subtype name. Returns `None` for an empty name.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let owned = name.to_string();
        Some(if name.starts_with("text-") || name == "comment" || name == "block-red" {
            DrawSubtype::TypedText(owned)
        } else if name.starts_with("form-") {
            DrawSubtype::FormOutline(owned)
        } else {
            DrawSubtype::Plain(owned)
        })
    }

    /// The subtype name as written in the annotation.
    pub fn name(&self) -> &str {
        match self {
            DrawSubtype::TypedText(n) | DrawSubtype::FormOutline(n) | DrawSubtype::Plain(n) => n,
        }
    }

    /// Subtype-specific pre-reveal class.
    pub fn pre_class(&self) -> String {
        format!("{}-pre", self.name())
    }

    /// Subtype-specific post-reveal class.
    pub fn post_class(&self) -> String {
        format!("{}-post", self.name())
    }

    /// Whether the element is typed out character by character.
    #[inline]
    pub fn is_typed_text(&self) -> bool {
        matches!(self, DrawSubtype::TypedText(_))
    }
}

/// Generic class applied while an element is being revealed.
pub const PRE_CLASS: &str = "drawing-element-pre";

/// Generic class applied once an element has been revealed.
pub const POST_CLASS: &str = "drawing-element-post";

/// Reveal progress of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    /// Invisible, zero opacity.
    #[default]
    Hidden,
    /// Animation in progress.
    Revealing,
    /// Fully visible with final styling.
    Revealed,
}

/// Visibility and opacity of an element, as the host should paint it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub visible: bool,
    pub opacity: f32,
}

impl Presentation {
    /// Invisible with zero opacity.
    pub const HIDDEN: Self = Self { visible: false, opacity: 0.0 };

    /// Visible at full opacity.
    pub const SHOWN: Self = Self { visible: true, opacity: 1.0 };

    /// Whether the host would paint anything.
    pub fn is_shown(&self) -> bool {
        self.visible && self.opacity >= 1.0
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::SHOWN
    }
}
