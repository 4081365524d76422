//! Border renderer
//!
//! Containers are outlined by an SVG overlay holding one closed polyline
//! inset by one unit. The overlay is sized from the container's box at the
//! moment it is built, so it is thrown away and rebuilt whenever that box
//! may have changed.
//!
//! A container never carries more than one overlay: both the animated and
//! the static path remove existing overlays before appending a new one.

use tracing::debug;

use crate::attr::AttrsExt;
use crate::clock::Clock;
use crate::journal::EventKind;
use crate::layout::{Layout, Size};
use crate::node::{Element, NodeId, RevealState, Tree};

use super::Context;
use super::stroke::{OFFSET_ATTR, StrokePath, animate_stroke};

/// Class marking outline overlays.
pub const OVERLAY_CLASS: &str = "dynamic-svg-border";

/// Boxes at or below this extent on either axis get no outline.
pub const MIN_EXTENT: f64 = 2.0;

// =============================================================================
// StrokeStyle
// =============================================================================

/// Paint of the outline stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    pub color: &'static str,
    pub width: &'static str,
}

impl StrokeStyle {
    /// While the stroke is being drawn.
    pub const DRAWING: Self = Self { color: "#550", width: "1px" };

    /// Once the stroke is complete.
    pub const FINAL: Self = Self { color: "#FF0", width: "2px" };

    fn apply(&self, elem: &mut crate::node::ElementData) {
        elem.attrs.set_attr("stroke", self.color);
        elem.attrs.set_attr("stroke-width", self.width);
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Whether a box is too small to outline.
pub fn is_degenerate(size: Size) -> bool {
    size.width <= MIN_EXTENT || size.height <= MIN_EXTENT
}

/// Perimeter of the 1-unit inset rectangle of a box.
pub fn outline_length(size: Size) -> f64 {
    let (x2, y2) = inset_corner(size);
    2.0 * (x2 - 1.0) + 2.0 * (y2 - 1.0)
}

fn inset_corner(size: Size) -> (f64, f64) {
    ((size.width - 1.0).max(1.0), (size.height - 1.0).max(1.0))
}

/// Build an overlay for a box of `size` whose stroke is at `offset`.
fn overlay(size: Size, style: StrokeStyle, offset: f64, dashed: bool) -> Element {
    let (x2, y2) = inset_corner(size);
    let length = outline_length(size);
    let points = format!("1,1 {x2},1 {x2},{y2} 1,{y2} 1,1");

    let mut polyline = Element::new("polyline")
        .attr("points", points)
        .attr("data-length", length.to_string());
    if dashed {
        polyline = polyline.attr("stroke-dasharray", length.to_string());
    }
    let polyline = polyline
        .attr(OFFSET_ATTR, offset.to_string())
        .attr("stroke", style.color)
        .attr("stroke-width", style.width);

    Element::new("svg")
        .with_class(OVERLAY_CLASS)
        .attr("viewBox", format!("0 0 {} {}", size.width, size.height))
        .child(polyline)
}

/// Remove every outline overlay from `container`. Returns how many were removed.
pub fn remove_overlays(tree: &mut Tree, container: NodeId) -> usize {
    tree.remove_children_where(container, |e| e.attrs.has_class(OVERLAY_CLASS))
}

/// Outline overlays currently attached to `container`.
pub fn overlays(tree: &Tree, container: NodeId) -> Vec<NodeId> {
    tree.children_where(container, |e| e.attrs.has_class(OVERLAY_CLASS))
}

/// Replace the overlays of `container` with `overlay`; returns the polyline.
fn attach(tree: &mut Tree, container: NodeId, overlay: Element) -> Option<NodeId> {
    remove_overlays(tree, container);
    let svg = tree.append(container, overlay)?;
    tree.show(container);
    tree.children(svg).first().copied()
}

// =============================================================================
// Drawing
// =============================================================================

/// Draw the outline of `container`, animated at the configured stroke speed.
///
/// Degenerate boxes are only made visible. Otherwise the outline is drawn,
/// switched to its final style, and followed by the border settle delay.
pub async fn draw_animated<C, L>(ctx: &Context<C, L>, container: NodeId)
where
    C: Clock,
    L: Layout,
{
    let size = ctx.measure(container);
    if is_degenerate(size) {
        debug!(node = %container, width = size.width, height = size.height, "container too small to outline");
        ctx.tree.write(|t| {
            t.show(container);
            t.set_reveal_state(container, RevealState::Revealed);
        });
        ctx.record(container, EventKind::BorderFinished { skipped: true });
        return;
    }

    let length = outline_length(size);
    let Some(line) = ctx.tree.write(|t| {
        let line = attach(t, container, overlay(size, StrokeStyle::DRAWING, length, true))?;
        t.set_reveal_state(container, RevealState::Revealing);
        Some(line)
    }) else {
        return;
    };

    let duration = ctx.timings.stroke_duration_ms(length);
    debug!(node = %container, length, duration, "drawing border");
    ctx.record(container, EventKind::BorderStarted { length });

    animate_stroke(ctx, StrokePath::new(line, length), duration).await;

    ctx.tree.write(|t| {
        if let Some(e) = t.element_mut(line) {
            StrokeStyle::FINAL.apply(e);
        }
        t.set_reveal_state(container, RevealState::Revealed);
    });
    ctx.record(container, EventKind::BorderFinished { skipped: false });
    ctx.sleep(ctx.timings.border_settle()).await;
}

/// Draw the outline of `container` at its current size in final style,
/// without animation. Used after a container's content resized it.
pub fn draw_static<C, L>(ctx: &Context<C, L>, container: NodeId)
where
    C: Clock,
    L: Layout,
{
    let size = ctx.measure(container);
    ctx.tree.write(|t| {
        if is_degenerate(size) {
            remove_overlays(t, container);
            t.show(container);
        } else {
            attach(t, container, overlay(size, StrokeStyle::FINAL, 0.0, false));
        }
        t.set_reveal_state(container, RevealState::Revealed);
    });
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_length() {
        // 2*(w-2) + 2*(h-2)
        assert_eq!(outline_length(Size::new(102.0, 102.0)), 400.0);
        assert_eq!(outline_length(Size::new(50.0, 10.0)), 112.0);
    }

    #[test]
    fn test_degenerate_threshold() {
        assert!(is_degenerate(Size::new(1.0, 1.0)));
        assert!(is_degenerate(Size::new(2.0, 300.0)));
        assert!(!is_degenerate(Size::new(3.0, 3.0)));
    }

    #[test]
    fn test_overlay_shape() {
        let svg = overlay(Size::new(50.0, 10.0), StrokeStyle::DRAWING, 112.0, true);
        assert_eq!(svg.get_attr("viewBox"), Some("0 0 50 10"));
        let line = svg.children[0].as_element().unwrap();
        assert_eq!(line.get_attr("points"), Some("1,1 49,1 49,9 1,9 1,1"));
        assert_eq!(line.get_attr("stroke-dasharray"), Some("112"));
        assert_eq!(line.get_attr(OFFSET_ATTR), Some("112"));
        assert_eq!(line.get_attr("stroke"), Some("#550"));
    }

    #[test]
    fn test_attach_replaces_existing_overlays() {
        let mut tree = Tree::new(Element::container("main").text("body"));
        let main = tree.root();
        for _ in 0..3 {
            attach(&mut tree, main, overlay(Size::new(20.0, 20.0), StrokeStyle::FINAL, 0.0, false));
        }
        assert_eq!(overlays(&tree, main).len(), 1);
        assert_eq!(tree.children(main).len(), 2);
        assert!(tree.element(main).unwrap().presentation.is_shown());
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_static_draw_reveals_container() {
        use crate::clock::TokioClock;
        use crate::layout::FixedLayout;
        use crate::node::SharedTree;

        let tree = Tree::new(Element::container("main").text("body"));
        let main = tree.root();
        let layout = FixedLayout::new().with(main, Size::new(30.0, 20.0));
        let ctx = Context::new(SharedTree::new(tree), TokioClock::new(), layout);

        draw_static(&ctx, main);

        ctx.tree.read(|t| {
            assert_eq!(t.reveal_state(main), RevealState::Revealed);
            assert_eq!(overlays(t, main).len(), 1);
        });
    }

    #[cfg(feature = "tokio")]
    mod timed {
        use super::super::*;
        use crate::clock::TokioClock;
        use crate::journal::EventKind;
        use crate::layout::FixedLayout;
        use crate::node::{Element, RevealState, SharedTree, Tree};
        use crate::reveal::Context;

        fn context(size: Size) -> (Context<TokioClock, FixedLayout>, NodeId) {
            let tree = Tree::new(Element::container("section").text("x"));
            let root = tree.root();
            let layout = FixedLayout::new().with(root, size);
            (Context::new(SharedTree::new(tree), TokioClock::new(), layout), root)
        }

        fn line_attr(ctx: &Context<TokioClock, FixedLayout>, container: NodeId, name: &str) -> Option<String> {
            ctx.tree.read(|t| {
                let svg = overlays(t, container).into_iter().next()?;
                let line = t.children(svg)[0];
                t.element(line)?.attrs.get_attr(name).map(str::to_string)
            })
        }

        #[tokio::test(start_paused = true)]
        async fn test_animated_border_timing_and_final_style() {
            let (ctx, section) = context(Size::new(102.0, 102.0));

            draw_animated(&ctx, section).await;

            // 1 frame to start + 160ms stroke + 20ms settle
            assert_eq!(ctx.clock.now(), 196.0);
            assert_eq!(line_attr(&ctx, section, "stroke").as_deref(), Some("#FF0"));
            assert_eq!(line_attr(&ctx, section, "stroke-width").as_deref(), Some("2px"));
            assert_eq!(line_attr(&ctx, section, OFFSET_ATTR).as_deref(), Some("0"));
            assert_eq!(
                ctx.journal.first_at(section, |k| matches!(k, EventKind::BorderStarted { .. })),
                Some(0.0)
            );
            assert_eq!(ctx.tree.read(|t| t.reveal_state(section)), RevealState::Revealed);
        }

        #[tokio::test(start_paused = true)]
        async fn test_container_is_revealing_while_stroking() {
            let (ctx, section) = context(Size::new(102.0, 102.0));

            let watcher = async {
                ctx.clock.sleep(std::time::Duration::from_millis(80)).await;
                ctx.tree.read(|t| t.reveal_state(section))
            };
            let ((), midway) = tokio::join!(draw_animated(&ctx, section), watcher);

            assert_eq!(midway, RevealState::Revealing);
            assert_eq!(ctx.tree.read(|t| t.reveal_state(section)), RevealState::Revealed);
        }

        #[tokio::test(start_paused = true)]
        async fn test_degenerate_container_skips_stroke() {
            let (ctx, section) = context(Size::new(1.0, 1.0));

            draw_animated(&ctx, section).await;

            assert_eq!(ctx.clock.now(), 0.0);
            ctx.tree.read(|t| {
                assert!(overlays(t, section).is_empty());
                assert!(t.element(section).unwrap().presentation.is_shown());
                assert_eq!(t.reveal_state(section), RevealState::Revealed);
            });
            let frames = ctx
                .journal
                .events()
                .iter()
                .filter(|e| matches!(e.kind, EventKind::StrokeFrame { .. }))
                .count();
            assert_eq!(frames, 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_rerenders_never_accumulate_overlays() {
            let (ctx, section) = context(Size::new(40.0, 30.0));

            draw_animated(&ctx, section).await;
            draw_static(&ctx, section);
            draw_animated(&ctx, section).await;
            draw_static(&ctx, section);
            draw_static(&ctx, section);

            assert_eq!(ctx.tree.read(|t| overlays(t, section).len()), 1);
            assert_eq!(line_attr(&ctx, section, "stroke").as_deref(), Some("#FF0"));
            assert_eq!(line_attr(&ctx, section, "stroke-dasharray"), None);
        }
    }
}
