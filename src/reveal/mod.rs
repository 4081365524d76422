//! The reveal core.
//!
//! # Module Structure
//!
//! - `stroke` - one border outline drawn over a fixed duration, frame by frame
//! - `border` - outline overlays for containers, animated or static
//! - `element` - per-element reveal (typed text, form outline, class swap)
//! - `engine` - the recursive walk that sequences all of the above
//!
//! Every component receives the same [`Context`]: the shared tree, the
//! clock, the layout, the timings and the journal. Nothing reads ambient
//! state.
//!
//! # Example
//!
//! ```ignore
//! use tola_reveal::prelude::*;
//!
//! let tree = SharedTree::new(Tree::new(page));
//! let ctx = Context::new(tree.clone(), TokioClock::new(), FlowLayout::default());
//! let engine = Engine::new(ctx, CommentBoard::new(source, MemoryStorage::new()));
//! engine.run(tree.root()).await?;
//! ```

pub mod border;
pub mod element;
pub mod engine;
pub mod stroke;

use std::time::Duration;

use crate::clock::Clock;
use crate::config::Timings;
use crate::journal::{EventKind, Journal};
use crate::layout::{Layout, Size};
use crate::node::{NodeId, SharedTree};

/// Everything a revealer needs, threaded explicitly through every call.
#[derive(Debug, Clone)]
pub struct Context<C, L> {
    /// The tree being revealed.
    pub tree: SharedTree,
    /// Timers and frame ticks.
    pub clock: C,
    /// Geometry reads.
    pub layout: L,
    /// Pacing.
    pub timings: Timings,
    /// Event log.
    pub journal: Journal,
}

impl<C: Clock, L: Layout> Context<C, L> {
    /// Context with default timings and a fresh journal.
    pub fn new(tree: SharedTree, clock: C, layout: L) -> Self {
        Self {
            tree,
            clock,
            layout,
            timings: Timings::default(),
            journal: Journal::new(),
        }
    }

    /// Replace the timings.
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Record into an existing journal.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Current size of `node` as the layout sees it right now.
    pub fn measure(&self, node: NodeId) -> Size {
        self.tree.read(|t| self.layout.measure(t, node))
    }

    pub(crate) fn record(&self, node: NodeId, kind: EventKind) {
        self.journal.record(self.clock.now(), node, kind);
    }

    pub(crate) async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            self.clock.sleep(duration).await;
        }
    }
}
