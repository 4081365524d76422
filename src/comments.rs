//! Comment board
//!
//! The stock [`DynamicSlot`]: a guestbook list filled from a remote
//! [`CommentSource`], falling back to a list kept in local [`Storage`] when
//! the source is unreachable.
//!
//! Every entry is mounted as
//! `<li data-draw="element" data-draw-type="comment"><strong>name</strong>: comment</li>`
//! and revealed as typed text. All entries of one render are revealed
//! together, which is the only place the reveal runs concurrently.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::join_all;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::CommentError;
use crate::journal::EventKind;
use crate::layout::Layout;
use crate::node::{DrawKind, Element, NodeId};
use crate::reveal::Context;
use crate::reveal::element::{finalize_element, reveal_element};
use crate::slot::DynamicSlot;
use crate::storage::Storage;

/// Subtype given to every rendered entry.
pub const COMMENT_SUBTYPE: &str = "comment";

// =============================================================================
// Comment
// =============================================================================

/// One guestbook entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub name: String,
    pub comment: String,
}

impl Comment {
    pub fn new(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self { name: name.into(), comment: comment.into() }
    }

    /// Trimmed copy, or `None` if either field is blank.
    pub fn normalized(name: &str, comment: &str) -> Option<Self> {
        let (name, comment) = (name.trim(), comment.trim());
        if name.is_empty() || comment.is_empty() {
            return None;
        }
        Some(Self::new(name, comment))
    }

    /// The `<li>` this entry renders as.
    pub fn to_element(&self) -> Element {
        Element::drawn("li", COMMENT_SUBTYPE)
            .strong(self.name.as_str())
            .text(format!(": {}", self.comment))
    }
}

// =============================================================================
// CommentSource
// =============================================================================

/// Remote comment endpoint.
pub trait CommentSource: Send + Sync {
    /// Current list of comments, oldest first.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Comment>, CommentError>> + Send;

    /// Publish a new comment.
    fn submit(&self, comment: &Comment) -> impl Future<Output = Result<(), CommentError>> + Send;
}

impl<S: CommentSource> CommentSource for Arc<S> {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Comment>, CommentError>> + Send {
        (**self).fetch()
    }

    fn submit(&self, comment: &Comment) -> impl Future<Output = Result<(), CommentError>> + Send {
        (**self).submit(comment)
    }
}

/// In-process comment source that can be switched offline.
///
/// Clones share the same list and the same switch.
#[derive(Debug, Clone)]
pub struct MemorySource {
    comments: Arc<RwLock<Vec<Comment>>>,
    online: Arc<AtomicBool>,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MemorySource {
    /// Online source holding `comments`.
    pub fn new(comments: Vec<Comment>) -> Self {
        Self {
            comments: Arc::new(RwLock::new(comments)),
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Source that refuses every request.
    pub fn offline() -> Self {
        let source = Self::default();
        source.set_online(false);
        source
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }

    /// Everything published so far.
    pub fn comments(&self) -> Vec<Comment> {
        self.comments.read().clone()
    }

    fn check(&self) -> Result<(), CommentError> {
        if self.online.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(CommentError::unavailable("source is offline"))
        }
    }
}

impl CommentSource for MemorySource {
    async fn fetch(&self) -> Result<Vec<Comment>, CommentError> {
        self.check()?;
        Ok(self.comments())
    }

    async fn submit(&self, comment: &Comment) -> Result<(), CommentError> {
        self.check()?;
        self.comments.write().push(comment.clone());
        Ok(())
    }
}

// =============================================================================
// CommentBoard
// =============================================================================

/// Guestbook slot backed by a remote source and a local fallback.
#[derive(Debug, Clone)]
pub struct CommentBoard<S, St> {
    source: S,
    storage: St,
}

impl<S: CommentSource, St: Storage> CommentBoard<S, St> {
    /// Storage key of the local list.
    pub const STORAGE_KEY: &'static str = "comments";

    pub fn new(source: S, storage: St) -> Self {
        Self { source, storage }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn storage(&self) -> &St {
        &self.storage
    }

    /// The locally stored list; missing or corrupt data reads as empty.
    pub fn load_local(&self) -> Vec<Comment> {
        let Some(raw) = self.storage.get(Self::STORAGE_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(comments) => comments,
            Err(err) => {
                warn!(error = %CommentError::from(err), "discarding stored comments");
                Vec::new()
            }
        }
    }

    /// Overwrite the locally stored list.
    pub fn store_local(&self, comments: &[Comment]) {
        match serde_json::to_string(comments) {
            Ok(json) => self.storage.set(Self::STORAGE_KEY, json),
            Err(err) => warn!(error = %err, "could not serialize comments"),
        }
    }

    /// Replace the content of `slot` with `comments`.
    ///
    /// With `animate` every entry is revealed at once and the call resolves
    /// when the slowest one is done; without it entries get their final
    /// state immediately.
    pub async fn render<C, L>(&self, ctx: &Context<C, L>, slot: NodeId, comments: &[Comment], animate: bool)
    where
        C: Clock,
        L: Layout,
    {
        let entries: Vec<NodeId> = ctx.tree.write(|t| {
            t.clear_children(slot);
            comments.iter().filter_map(|c| t.append(slot, c.to_element())).collect()
        });
        debug!(slot = %slot, entries = entries.len(), animate, "rendering comments");

        if animate {
            join_all(entries.iter().map(|id| reveal_element(ctx, *id))).await;
        } else {
            ctx.tree.write(|t| entries.iter().for_each(|id| finalize_element(t, *id)));
        }

        // The next outer geometry read must see the new list
        let height = ctx.measure(slot).height;
        let container = ctx.tree.read(|t| t.closest(slot, |e| e.draw_kind() == DrawKind::Container));
        if let Some(container) = container {
            ctx.measure(container);
        }
        debug!(slot = %slot, height, "comments rendered");
        ctx.sleep(ctx.timings.comment_render_settle()).await;
    }

    /// Fetch the list and render it; on failure render the local list.
    ///
    /// Returns the number of entries rendered.
    pub async fn fetch_and_render<C, L>(&self, ctx: &Context<C, L>, slot: NodeId, animate: bool) -> usize
    where
        C: Clock,
        L: Layout,
    {
        match self.source.fetch().await {
            Ok(comments) => {
                self.render(ctx, slot, &comments, animate).await;
                self.store_local(&comments);
                comments.len()
            }
            Err(err) => {
                warn!(error = %err, "comment source failed, using local comments");
                let local = self.load_local();
                self.render(ctx, slot, &local, animate).await;
                local.len()
            }
        }
    }

    /// Post a new comment and re-render the list animated.
    ///
    /// Blank fields are rejected without contacting the source. When the
    /// source refuses, the comment is kept locally instead. Returns whether
    /// the comment was accepted.
    pub async fn submit<C, L>(&self, ctx: &Context<C, L>, slot: NodeId, name: &str, comment: &str) -> bool
    where
        C: Clock,
        L: Layout,
    {
        let Some(entry) = Comment::normalized(name, comment) else {
            debug!("ignoring comment with blank fields");
            return false;
        };

        match self.source.submit(&entry).await {
            Ok(()) => {
                info!(name = %entry.name, "comment submitted");
                self.fetch_and_render(ctx, slot, true).await;
            }
            Err(err) => {
                warn!(error = %err, "comment submit failed, keeping it locally");
                let mut local = self.load_local();
                local.push(entry);
                self.store_local(&local);
                self.render(ctx, slot, &local, true).await;
            }
        }
        true
    }
}

impl<S: CommentSource, St: Storage> DynamicSlot for CommentBoard<S, St> {
    async fn fill<C: Clock, L: Layout>(&self, ctx: &Context<C, L>, slot: NodeId) {
        let entries = self.fetch_and_render(ctx, slot, true).await;

        let container = ctx.tree.read(|t| t.closest(slot, |e| e.draw_kind() == DrawKind::Container));
        if let Some(container) = container {
            ctx.measure(container);
        }
        ctx.record(slot, EventKind::SlotFilled { entries });
        info!(slot = %slot, entries, "comment board filled");
    }
}

// =============================================================================
// Tests
// =============================================================================
