//! tola-reveal - Sequential reveal animator for annotated visual trees
//!
//! ## Core Concepts
//!
//! **Annotations drive the reveal**: elements opt in with `data-draw`
//! (`container`, `element`, `comments`) and pick a style with
//! `data-draw-type`. Everything else stays out of the animation.
//!
//! **Strictly sequential**: siblings are revealed one after another, each
//! including its whole subtree. Containers get an SVG outline stroked over
//! time, typed-text elements appear one character at a time, dynamic slots
//! are filled by a collaborator and then the enclosing outline is redrawn.
//!
//! **Host-driven time and geometry**: the engine never reads a global clock
//! or layout. It asks a [`Clock`] for timers and frames and a [`Layout`] for
//! sizes, so the same core runs in a browser bridge or under tokio's paused
//! time.
//!
//! ## Modules
//! - `node`: arena tree, annotations, presentation state
//! - `reveal`: stroke animator, border renderer, element revealer, engine
//! - `slot`: dynamic slot collaborator trait
//! - `comments`: guestbook slot with local fallback
//! - `clock` / `layout`: host interfaces
//! - `config`: timing configuration
//! - `journal`: timestamped event log
//!
//! ## Usage
//!
//! ```ignore
//! use tola_reveal::prelude::*;
//!
//! let page = Element::new("body")
//!     .child(Element::container("main")
//!         .child(Element::drawn("h1", "text-title").text("Hello"))
//!         .child(Element::slot("ul")));
//!
//! let tree = SharedTree::new(Tree::new(page));
//! let ctx = Context::new(tree.clone(), TokioClock::new(), FlowLayout::default());
//! let board = CommentBoard::new(MemorySource::default(), MemoryStorage::new());
//!
//! Engine::new(ctx, board).run(tree.root()).await?;
//! ```

/// Attribute helpers
pub mod attr;

/// Time source
pub mod clock;

/// Guestbook slot
pub mod comments;

/// Timing configuration
pub mod config;

/// Error types
pub mod error;

/// Reveal event log
pub mod journal;

/// Geometry reads
pub mod layout;

/// Node types: Tree, Element, Text
pub mod node;

/// Prelude for common imports
pub mod prelude;

/// HTML rendering
pub mod render;

/// Reveal core: stroke, border, element, engine
pub mod reveal;

/// Dynamic slot collaborator
pub mod slot;

/// Local key-value storage
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{
    DrawKind, DrawSubtype, Element, ElementData, Node, NodeData, NodeId, Presentation, RevealState, SharedTree, Text,
    Tree,
};

// Host interfaces
pub use clock::Clock;
#[cfg(feature = "tokio")]
pub use clock::TokioClock;
pub use layout::{FixedLayout, FlowLayout, Layout, Size};

// Reveal
pub use reveal::Context;
pub use reveal::engine::Engine;
pub use slot::{DynamicSlot, NoSlot};

// Collaborators
pub use comments::{Comment, CommentBoard, CommentSource, MemorySource};
pub use storage::{MemoryStorage, Storage};

// Configuration and diagnostics
pub use config::Timings;
pub use journal::{Event, EventKind, Journal};

// Error types
pub use error::{CommentError, RevealError, RevealResult};
