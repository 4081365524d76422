//! Stroke animator
//!
//! Draws one outline by shrinking its dash offset from the full length to
//! zero, one step per display frame.

use tracing::trace;

use crate::attr::AttrsExt;
use crate::clock::Clock;
use crate::journal::EventKind;
use crate::layout::Layout;
use crate::node::NodeId;

use super::Context;

/// Dash offset attribute driven by the animation.
pub const OFFSET_ATTR: &str = "stroke-dashoffset";

/// An outline element whose visible length grows during the animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePath {
    /// The `<polyline>` carrying the dash attributes.
    pub node: NodeId,
    /// Total perimeter length L.
    pub length: f64,
}

impl StrokePath {
    pub fn new(node: NodeId, length: f64) -> Self {
        Self { node, length }
    }
}

/// Fraction of the animation done after `elapsed` ms, clamped to `[0, 1]`.
///
/// A non-positive duration is already complete.
pub fn progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

/// Still-hidden length of a stroke after `elapsed` ms.
///
/// The drawn length `length - offset` grows linearly from 0 to `length`.
pub fn stroke_offset(length: f64, elapsed: f64, duration: f64) -> f64 {
    length * (1.0 - progress(elapsed, duration))
}

/// Animate `path` over `duration_ms`, resolving once after the frame on
/// which the stroke is fully drawn.
///
/// The first frame's timestamp is the start of the animation. There is no
/// cancellation: once started the animation always runs to completion.
pub async fn animate_stroke<C, L>(ctx: &Context<C, L>, path: StrokePath, duration_ms: f64)
where
    C: Clock,
    L: Layout,
{
    let mut start = None;
    let mut frames = 0u32;
    loop {
        let timestamp = ctx.clock.next_frame().await;
        let start = *start.get_or_insert(timestamp);
        let done = progress(timestamp - start, duration_ms);
        let offset = path.length * (1.0 - done);
        frames += 1;

        ctx.tree.write(|t| {
            if let Some(e) = t.element_mut(path.node) {
                e.attrs.set_attr(OFFSET_ATTR, offset.to_string());
            }
        });
        ctx.record(path.node, EventKind::StrokeFrame { offset });
        trace!(node = %path.node, offset, "stroke frame");

        if done >= 1.0 {
            break;
        }
    }
    trace!(node = %path.node, frames, "stroke complete");
}

// =============================================================================
// Tests
// =============================================================================
