//! Prelude module for common imports.
//!
//! ```ignore
//! use tola_reveal::prelude::*;
//! ```

// Node types
pub use crate::node::{
    DrawKind, DrawSubtype, Element, ElementData, Node, NodeData, NodeId, Presentation, RevealState, SharedTree, Text,
    Tree,
};

// Attributes
pub use crate::attr::{AttrsExt, Attrs};

// Host interfaces
pub use crate::clock::Clock;
#[cfg(feature = "tokio")]
pub use crate::clock::TokioClock;
pub use crate::layout::{FixedLayout, FlowLayout, Layout, Size};

// Reveal
pub use crate::reveal::Context;
pub use crate::reveal::element::{finalize_element, reveal_element};
pub use crate::reveal::engine::Engine;
pub use crate::slot::{DynamicSlot, NoSlot};

// Collaborators
pub use crate::comments::{Comment, CommentBoard, CommentSource, MemorySource};
pub use crate::storage::{MemoryStorage, Storage};

// Configuration and diagnostics
pub use crate::config::Timings;
pub use crate::journal::{Event, EventKind, Journal};

// Render
pub use crate::render::{inner_html, outer_html};

// Error
pub use crate::error::{CommentError, RevealError, RevealResult};
