//! Drawing engine
//!
//! Walks the annotated tree top-down and reveals it in document order:
//!
//! - **Container**: outline drawn, then its own annotated children walked
//! - **Element**: handed to the element revealer
//! - **DynamicSlot**: filled by the collaborator, then the enclosing
//!   container's outline is redrawn statically at its new size
//!
//! Siblings never overlap: each child, including its entire subtree, is done
//! before the next one starts. The only concurrency in a reveal lives inside
//! the slot collaborator's batch.

use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::BoxFuture;
use tracing::{debug, info, trace};

use crate::clock::Clock;
use crate::error::{RevealError, RevealResult};
use crate::journal::EventKind;
use crate::layout::Layout;
use crate::node::{DrawKind, ElementData, NodeId, RevealState};
use crate::slot::{DynamicSlot, NoSlot};

use super::element::reveal_element;
use super::{Context, border};

fn is_container(e: &ElementData) -> bool {
    e.draw_kind() == DrawKind::Container
}

// =============================================================================
// Engine
// =============================================================================

/// Single-shot reveal of one annotated tree.
///
/// The host makes the root itself visible, then calls [`run`](Engine::run)
/// once the tree is fully built.
#[derive(Debug)]
pub struct Engine<C, L, D = NoSlot> {
    ctx: Context<C, L>,
    slot: D,
    started: AtomicBool,
}

impl<C: Clock, L: Layout> Engine<C, L> {
    /// Engine for pages without dynamic slots.
    pub fn without_slots(ctx: Context<C, L>) -> Self {
        Self::new(ctx, NoSlot)
    }
}

impl<C: Clock, L: Layout, D: DynamicSlot> Engine<C, L, D> {
    /// Engine revealing through `ctx`, filling slots with `slot`.
    pub fn new(ctx: Context<C, L>, slot: D) -> Self {
        Self { ctx, slot, started: AtomicBool::new(false) }
    }

    /// The context shared with every revealer.
    pub fn context(&self) -> &Context<C, L> {
        &self.ctx
    }

    /// The slot collaborator.
    pub fn slot(&self) -> &D {
        &self.slot
    }

    /// Whether `run` has been called.
    pub fn has_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Reveal every annotated descendant of `root`.
    ///
    /// Resolves once the whole subtree is revealed. A reveal is not
    /// restartable: a second call, concurrent or not, returns
    /// [`RevealError::AlreadyRun`] without touching the tree.
    pub async fn run(&self, root: NodeId) -> RevealResult<()> {
        if self.ctx.tree.read(|t| t.element(root).is_none()) {
            return Err(RevealError::MissingNode(root));
        }
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(RevealError::AlreadyRun);
        }

        let started_at = self.ctx.clock.now();
        info!(root = %root, "reveal started");
        walk(&self.ctx, &self.slot, root).await;
        info!(root = %root, elapsed_ms = self.ctx.clock.now() - started_at, "reveal finished");
        Ok(())
    }
}

/// Reveal the direct annotated children of `root`, recursing into containers.
fn walk<'a, C, L, D>(ctx: &'a Context<C, L>, slot: &'a D, root: NodeId) -> BoxFuture<'a, ()>
where
    C: Clock,
    L: Layout,
    D: DynamicSlot,
{
    Box::pin(async move {
        let children = ctx.tree.read(|t| t.children_where(root, |e| e.draw_kind().is_drawable()));
        trace!(root = %root, count = children.len(), "walking level");

        for child in children {
            match ctx.tree.read(|t| t.draw_kind(child)) {
                DrawKind::Container => {
                    border::draw_animated(ctx, child).await;
                    walk(ctx, slot, child).await;
                }
                DrawKind::Element => reveal_element(ctx, child).await,
                DrawKind::DynamicSlot => {
                    // Entries are revealed inside the slot, so it must paint first
                    ctx.tree.write(|t| {
                        t.show(child);
                        t.set_reveal_state(child, RevealState::Revealed);
                    });
                    slot.fill(ctx, child).await;
                    restore_border(ctx, child);

                    // Later outer borders must see the new height
                    let size = ctx.measure(root);
                    trace!(root = %root, height = size.height, "root remeasured");
                    ctx.sleep(ctx.timings.slot_settle()).await;
                }
                // Removed or re-annotated since the level was listed
                DrawKind::None => debug!(node = %child, "skipping node that is no longer drawable"),
            }
        }
    })
}

/// Redraw the outline of the container around `slot` at its new size.
fn restore_border<C, L>(ctx: &Context<C, L>, slot: NodeId)
where
    C: Clock,
    L: Layout,
{
    let Some(container) = ctx.tree.read(|t| t.closest(slot, is_container)) else {
        return;
    };
    ctx.tree.write(|t| border::remove_overlays(t, container));
    let size = ctx.measure(container);
    border::draw_static(ctx, container);
    ctx.record(container, EventKind::BorderRestored { height: size.height });
    debug!(node = %container, height = size.height, "border redrawn after dynamic content");
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(all(test, feature = "tokio"))]
mod tests {
    use std::sync::Arc;

    use futures_util::future::join_all;
    use parking_lot::Mutex;

    use super::*;
    use crate::attr::AttrsExt;
    use crate::clock::TokioClock;
    use crate::journal::Journal;
    use crate::layout::{FixedLayout, FlowLayout, Size};
    use crate::comments::{Comment, CommentBoard, MemorySource};
    use crate::node::{Element, POST_CLASS, SharedTree, Tree};
    use crate::storage::MemoryStorage;
    use crate::reveal::border::overlays;
    use crate::reveal::element::finalize_element;

    static_assertions::assert_impl_all!(Engine<TokioClock, FlowLayout>: Send, Sync);

    fn started(journal: &Journal, node: NodeId) -> f64 {
        journal
            .first_at(node, |k| matches!(k, EventKind::BorderStarted { .. } | EventKind::RevealStarted))
            .unwrap()
    }

    fn finished(journal: &Journal, node: NodeId) -> f64 {
        journal
            .first_at(node, |k| matches!(k, EventKind::BorderFinished { .. } | EventKind::RevealFinished))
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_container_scenario() {
        // Box 102x102 → outline length 400 → 160ms at 2.5 units/ms
        let tree = Tree::new(
            Element::new("div").child(Element::container("main").child(Element::drawn("p", "text-body").text("Hello"))),
        );
        let root = tree.root();
        let main = tree.children(root)[0];
        let p = tree.children(main)[0];
        let layout = FixedLayout::new().with(main, Size::new(102.0, 102.0));
        let shared = SharedTree::new(tree);
        let engine = Engine::without_slots(Context::new(shared.clone(), TokioClock::new(), layout));

        engine.run(root).await.unwrap();
        let ctx = engine.context();

        // Border: first frame at 16, stroke until 176, settle to 196.
        // Text: 4 gaps + 100ms settle + 50ms after the swap.
        assert_eq!(started(&ctx.journal, main), 0.0);
        assert_eq!(finished(&ctx.journal, main), 176.0);
        assert_eq!(started(&ctx.journal, p), 196.0);
        assert_eq!(finished(&ctx.journal, p), 196.0 + 4.0 * 50.0 + 100.0);
        assert_eq!(ctx.clock.now(), 196.0 + 4.0 * 50.0 + 100.0 + 50.0);

        shared.read(|t| {
            let svg = overlays(t, main)[0];
            let line = t.children(svg)[0];
            assert_eq!(t.element(line).unwrap().attrs.get_attr("stroke"), Some("#FF0"));
            assert_eq!(t.text_content(p), "Hello");
            let e = t.element(p).unwrap();
            assert!(e.attrs.has_class(POST_CLASS));
            assert!(e.attrs.has_class("text-body-post"));
            assert_eq!(e.reveal, RevealState::Revealed);
            assert_eq!(t.reveal_state(main), RevealState::Revealed);
            assert!(t.element(main).unwrap().presentation.is_shown());
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_siblings_run_strictly_in_order() {
        let tree = Tree::new(
            Element::new("div")
                .child(
                    Element::container("nav")
                        .child(Element::drawn("a", "text-link").text("Home"))
                        .child(Element::container("ul").child(Element::drawn("li", "text-item").text("deep"))),
                )
                .child(Element::drawn("p", "text-body").text("B"))
                .child(Element::drawn("form", "form-comment")),
        );
        let root = tree.root();
        let kids = tree.children(root).to_vec();
        let (a, b, c) = (kids[0], kids[1], kids[2]);
        let deep = tree.find(|e| e.tag.as_str() == "li").unwrap();
        let engine = Engine::without_slots(Context::new(
            SharedTree::new(tree),
            TokioClock::new(),
            FlowLayout::default(),
        ));

        engine.run(root).await.unwrap();
        let journal = &engine.context().journal;

        // A's own border, then A's subtree, then B, then C
        assert!(finished(journal, a) <= started(journal, deep));
        assert!(finished(journal, deep) < started(journal, b));
        assert!(finished(journal, b) < started(journal, c));

        // Nothing at the top level overlaps
        let mut spans: Vec<(f64, f64)> = [b, c].iter().map(|n| (started(journal, *n), finished(journal, *n))).collect();
        spans.insert(0, (started(journal, a), finished(journal, deep)));
        assert!(spans.windows(2).all(|w| w[0].1 <= w[1].0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_run_is_rejected() {
        let tree = SharedTree::new(Tree::new(Element::new("div").child(Element::drawn("p", "text-x").text("a"))));
        let root = tree.root();
        let engine = Engine::without_slots(Context::new(tree.clone(), TokioClock::new(), FixedLayout::new()));

        let (first, second) = tokio::join!(engine.run(root), engine.run(root));
        assert!(first.is_ok());
        assert!(matches!(second, Err(RevealError::AlreadyRun)));
        assert!(matches!(engine.run(root).await, Err(RevealError::AlreadyRun)));
        assert!(engine.has_started());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_root_is_an_error() {
        let tree = SharedTree::new(Tree::new(Element::new("div")));
        let engine = Engine::without_slots(Context::new(tree, TokioClock::new(), FixedLayout::new()));
        let err = engine.run(NodeId::from_raw(42)).await.unwrap_err();
        assert!(matches!(err, RevealError::MissingNode(_)));
        assert!(!engine.has_started());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unannotated_children_are_not_walked() {
        let tree = Tree::new(
            Element::new("div")
                .child(Element::new("section").child(Element::drawn("p", "text-x").text("hidden forever")))
                .child(Element::drawn("p", "text-x").text("ok")),
        );
        let root = tree.root();
        let nested = tree.find(|e| e.tag.as_str() == "section").map(|s| tree.children(s)[0]).unwrap();
        let shared = SharedTree::new(tree);
        let engine = Engine::without_slots(Context::new(shared.clone(), TokioClock::new(), FixedLayout::new()));

        engine.run(root).await.unwrap();
        assert_eq!(shared.read(|t| t.reveal_state(nested)), RevealState::Hidden);
    }

    /// Appends fixed entries and reveals them as one concurrent batch.
    struct Batch {
        entries: Vec<&'static str>,
        filled: Arc<Mutex<Vec<NodeId>>>,
    }

    impl DynamicSlot for Batch {
        async fn fill<C: Clock, L: Layout>(&self, ctx: &Context<C, L>, slot: NodeId) {
            let ids: Vec<NodeId> = ctx.tree.write(|t| {
                self.entries
                    .iter()
                    .filter_map(|text| t.append(slot, Element::drawn("li", "comment").text(*text)))
                    .collect()
            });
            join_all(ids.iter().map(|id| reveal_element(ctx, *id))).await;
            ctx.tree.write(|t| ids.iter().for_each(|id| finalize_element(t, *id)));
            self.filled.lock().extend(ids);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_redraws_enclosing_border_at_new_height() {
        let tree = Tree::new(
            Element::new("div").child(
                Element::container("main")
                    .child(Element::drawn("h2", "text-title").text("Guestbook"))
                    .child(Element::slot("ul")),
            ),
        );
        let root = tree.root();
        let main = tree.children(root)[0];
        let shared = SharedTree::new(tree);
        let filled = Arc::new(Mutex::new(Vec::new()));
        let slot = Batch { entries: vec!["first!", "hello"], filled: filled.clone() };
        let layout = FlowLayout::default();
        let engine = Engine::new(Context::new(shared.clone(), TokioClock::new(), layout), slot);

        let height_before = shared.read(|t| layout.measure(t, main).height);
        engine.run(root).await.unwrap();
        let journal = &engine.context().journal;

        let ids = filled.lock().clone();
        assert_eq!(ids.len(), 2);

        // The batch is the one place reveals overlap: both entries start together
        assert_eq!(started(journal, ids[0]), started(journal, ids[1]));

        let restored = journal
            .for_node(main)
            .into_iter()
            .find_map(|e| match e.kind {
                EventKind::BorderRestored { height } => Some(height),
                _ => None,
            })
            .unwrap();
        assert_eq!(restored, height_before + 32.0);

        shared.read(|t| {
            let svgs = overlays(t, main);
            assert_eq!(svgs.len(), 1);
            let view_box = t.element(svgs[0]).unwrap().attrs.get_attr("viewBox").map(str::to_string);
            assert_eq!(view_box, Some(format!("0 0 640 {restored}")));
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_settle_follows_border_restore() {
        let tree = Tree::new(Element::new("div").child(Element::container("main").child(Element::slot("ul"))));
        let root = tree.root();
        let main = tree.children(root)[0];
        let engine = Engine::without_slots(Context::new(
            SharedTree::new(tree),
            TokioClock::new(),
            FixedLayout::new().with(main, Size::new(1.0, 1.0)),
        ));

        engine.run(root).await.unwrap();
        let ctx = engine.context();
        // Degenerate border is instant; only the slot settle remains
        assert_eq!(ctx.clock.now(), 50.0);
        assert!(ctx.tree.read(|t| overlays(t, main).is_empty()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_comment_board_falls_back_without_error() {
        let tree = Tree::new(
            Element::new("div")
                .child(
                    Element::container("main")
                        .child(Element::slot("ul").with_id("comments"))
                        .child(Element::drawn("form", "form-comment")),
                )
                .child(Element::drawn("p", "text-footer").text("bye")),
        );
        let root = tree.root();
        let main = tree.children(root)[0];
        let footer = tree.children(root)[1];
        let ul = tree.find_by_id("comments").unwrap();
        let form = tree.children(main)[1];
        let shared = SharedTree::new(tree);

        let storage = MemoryStorage::new();
        let board = CommentBoard::new(MemorySource::offline(), storage.clone());
        board.store_local(&[Comment::new("ann", "hi"), Comment::new("bob", "yo")]);
        let engine = Engine::new(Context::new(shared.clone(), TokioClock::new(), FlowLayout::default()), board);

        assert!(engine.run(root).await.is_ok());
        let journal = &engine.context().journal;

        let lis = shared.read(|t| t.children(ul).to_vec());
        assert_eq!(lis.len(), 2);
        assert_eq!(started(journal, lis[0]), started(journal, lis[1]));

        // Siblings after the slot still run, in order
        assert!(finished(journal, lis[0]) < started(journal, form));
        assert!(finished(journal, form) < started(journal, footer));

        shared.read(|t| {
            let slot = t.element(ul).unwrap();
            assert!(slot.presentation.is_shown());
            assert_eq!(slot.reveal, RevealState::Revealed);
            for li in &lis {
                assert_eq!(t.reveal_state(*li), RevealState::Revealed);
            }
            assert_eq!(t.reveal_state(footer), RevealState::Revealed);
            assert_eq!(t.text_content(ul), "ann: hibob: yo");
        });
    }
}
