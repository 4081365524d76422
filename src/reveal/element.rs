//! Element revealer
//!
//! Moves one element from hidden to revealed. Typed text is rebuilt one
//! character at a time from a snapshot of the element's content, form
//! elements wait for their outline, every other subtype only swaps classes.
//!
//! Whatever the path, a revealed element ends visible at full opacity with
//! its post-reveal classes, and typed text ends with exactly its original
//! content: the snapshot is reattached, not the rebuilt approximation.

use tracing::{debug, warn};

use crate::attr::AttrsExt;
use crate::clock::Clock;
use crate::journal::EventKind;
use crate::layout::Layout;
use crate::node::{DrawSubtype, Element, NodeData, NodeId, POST_CLASS, PRE_CLASS, Presentation, RevealState, Tree};

use super::Context;

// =============================================================================
// Segments
// =============================================================================

/// A run of typed-text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text.
    Plain(String),
    /// Text rendered inside `<strong>`.
    Emphasis(String),
    /// A line break; contributes no characters.
    Break,
}

impl Segment {
    /// Characters this segment contributes to the typing count.
    pub fn char_count(&self) -> usize {
        match self {
            Segment::Plain(s) | Segment::Emphasis(s) => s.chars().count(),
            Segment::Break => 0,
        }
    }
}

/// Split the content of `node` into typed-text segments.
///
/// Anchors are typed as their trimmed text so the link itself stays intact.
/// Otherwise non-blank text runs, `<strong>` and `<br>` children are kept and
/// any other markup is left out of the animation.
pub fn segments(tree: &Tree, node: NodeId) -> Vec<Segment> {
    if tree.tag(node) == Some("a") {
        return vec![Segment::Plain(tree.text_content(node).trim().to_string())];
    }
    tree.children(node)
        .iter()
        .filter_map(|child| match tree.data(*child)? {
            NodeData::Text(t) if !t.is_whitespace() => Some(Segment::Plain(t.content.clone())),
            NodeData::Text(_) => None,
            NodeData::Element(e) => match e.tag.as_str() {
                "strong" => Some(Segment::Emphasis(tree.text_content(*child))),
                "br" => Some(Segment::Break),
                _ => None,
            },
        })
        .collect()
}

/// Total number of characters to type.
pub fn total_chars(segments: &[Segment]) -> usize {
    segments.iter().map(Segment::char_count).sum()
}

/// Characters each segment shows once `visible` characters are typed.
///
/// Each segment shows `min(len, max(0, visible - chars_before))` characters.
pub fn shown_counts(segments: &[Segment], visible: usize) -> Vec<usize> {
    let mut before = 0usize;
    segments
        .iter()
        .map(|segment| {
            let shown = segment.char_count().min(visible.saturating_sub(before));
            before += segment.char_count();
            shown
        })
        .collect()
}

/// Mount one empty node per segment under `node`.
///
/// Returns, per segment, the text node that grows while typing (`None` for
/// breaks). Steps then rewrite these in place instead of remounting.
fn mount_frame(tree: &mut Tree, node: NodeId, segments: &[Segment]) -> Vec<Option<NodeId>> {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Plain(_) => tree.append_text(node, ""),
            Segment::Emphasis(_) => {
                let strong = tree.append(node, Element::new("strong"))?;
                tree.append_text(strong, "")
            }
            Segment::Break => {
                tree.append(node, Element::new("br"));
                None
            }
        })
        .collect()
}

fn prefix(s: &str, chars: usize) -> String {
    s.chars().take(chars).collect()
}

// =============================================================================
// ContentSnapshot
// =============================================================================

/// Original children of an element, detached for the length of a reveal.
///
/// Owned by the revealer; nothing else touches these nodes until
/// [`restore`](ContentSnapshot::restore) puts them back verbatim.
#[derive(Debug)]
pub struct ContentSnapshot {
    node: NodeId,
    children: Vec<NodeId>,
}

impl ContentSnapshot {
    /// Detach the children of `node`.
    pub fn take(tree: &mut Tree, node: NodeId) -> Self {
        Self { node, children: tree.detach_children(node) }
    }

    /// Drop whatever `node` holds now and reattach the original children.
    ///
    /// If `node` itself is gone, the detached children are freed instead.
    pub fn restore(self, tree: &mut Tree) {
        if tree.contains(self.node) {
            tree.clear_children(self.node);
            tree.attach_children(self.node, self.children);
        } else {
            for child in self.children {
                tree.remove(child);
            }
        }
    }
}

// =============================================================================
// Reveal
// =============================================================================

/// Reveal one element according to its `data-draw-type`.
///
/// Elements without a subtype are shown immediately. Missing nodes are
/// skipped with a warning.
pub async fn reveal_element<C, L>(ctx: &Context<C, L>, node: NodeId)
where
    C: Clock,
    L: Layout,
{
    let Some(subtype) = ctx.tree.read(|t| t.element(node).map(|e| e.draw_subtype())) else {
        warn!(node = %node, "element vanished before its reveal");
        return;
    };
    let Some(subtype) = subtype else {
        ctx.tree.write(|t| {
            t.show(node);
            t.set_reveal_state(node, RevealState::Revealed);
        });
        return;
    };

    ctx.tree.write(|t| {
        if let Some(e) = t.element_mut(node) {
            e.attrs.add_class(PRE_CLASS);
            e.attrs.add_class(&subtype.pre_class());
            e.presentation = Presentation::SHOWN;
            e.reveal = RevealState::Revealing;
        }
    });
    ctx.record(node, EventKind::RevealStarted);
    debug!(node = %node, subtype = subtype.name(), "revealing element");

    let snapshot = match &subtype {
        DrawSubtype::TypedText(_) => Some(type_out(ctx, node).await),
        DrawSubtype::FormOutline(_) => {
            ctx.sleep(ctx.timings.pre_draw()).await;
            None
        }
        DrawSubtype::Plain(_) => None,
    };

    ctx.tree.write(|t| {
        if let Some(e) = t.element_mut(node) {
            e.attrs.remove_class(PRE_CLASS);
            e.attrs.remove_class(&subtype.pre_class());
            e.attrs.add_class(POST_CLASS);
            e.attrs.add_class(&subtype.post_class());
            e.presentation = Presentation::SHOWN;
            e.reveal = RevealState::Revealed;
        }
        if let Some(snapshot) = snapshot {
            snapshot.restore(t);
        }
    });
    ctx.record(node, EventKind::RevealFinished);
    ctx.sleep(ctx.timings.after_transition()).await;
}

/// Type the content of `node` character by character.
async fn type_out<C, L>(ctx: &Context<C, L>, node: NodeId) -> ContentSnapshot
where
    C: Clock,
    L: Layout,
{
    let (segments, snapshot, frame) = ctx.tree.write(|t| {
        let segments = segments(t, node);
        let snapshot = ContentSnapshot::take(t, node);
        let frame = mount_frame(t, node, &segments);
        (segments, snapshot, frame)
    });
    let total = total_chars(&segments);
    let mut shown = vec![0usize; segments.len()];

    for visible in 1..=total {
        let next = shown_counts(&segments, visible);
        let mounted = ctx.tree.write(|t| {
            if !t.contains(node) {
                return false;
            }
            for (i, segment) in segments.iter().enumerate() {
                if next[i] == shown[i] {
                    continue;
                }
                if let (Segment::Plain(text) | Segment::Emphasis(text), Some(id)) = (segment, frame[i]) {
                    t.set_text(id, prefix(text, next[i]));
                }
            }
            true
        });
        if !mounted {
            warn!(node = %node, "element removed while typing");
            return snapshot;
        }
        shown = next;
        ctx.record(node, EventKind::TextStep { visible });

        if visible < total {
            ctx.sleep(ctx.timings.per_character()).await;
        }
    }

    ctx.sleep(ctx.timings.text_settle()).await;
    snapshot
}

/// Put an element straight into its revealed state, without animation.
pub fn finalize_element(tree: &mut Tree, node: NodeId) {
    let Some(e) = tree.element_mut(node) else { return };
    if let Some(subtype) = e.draw_subtype() {
        e.attrs.add_class(POST_CLASS);
        e.attrs.add_class(&subtype.post_class());
    }
    e.presentation = Presentation::SHOWN;
    e.reveal = RevealState::Revealed;
}

// =============================================================================
// Tests
// =============================================================================
