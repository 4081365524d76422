//! Dynamic slot collaborator.
//!
//! A dynamic slot is a node whose content is only known at reveal time. When
//! the walker reaches one it hands control to a [`DynamicSlot`], which must:
//!
//! 1. fetch its entries from wherever they live,
//! 2. mount each entry under the slot as a typed-text element,
//! 3. reveal them (or finalize them without animation),
//! 4. measure the slot and its closest container before returning.
//!
//! The engine only needs the completion; failures stay inside the
//! collaborator.

use std::future::Future;

use crate::clock::Clock;
use crate::layout::Layout;
use crate::node::NodeId;
use crate::reveal::Context;

/// Fills and reveals a dynamic slot.
///
/// # Example
///
/// ```ignore
/// struct Headlines(Vec<String>);
///
/// impl DynamicSlot for Headlines {
///     async fn fill<C: Clock, L: Layout>(&self, ctx: &Context<C, L>, slot: NodeId) {
///         let ids: Vec<_> = ctx.tree.write(|t| {
///             self.0.iter()
///                 .filter_map(|h| t.append(slot, Element::drawn("li", "text-news").text(h)))
///                 .collect()
///         });
///         join_all(ids.into_iter().map(|id| reveal_element(ctx, id))).await;
///     }
/// }
/// ```
pub trait DynamicSlot: Send + Sync {
    /// Run the whole fetch-render-reveal cycle for `slot`.
    fn fill<C: Clock, L: Layout>(&self, ctx: &Context<C, L>, slot: NodeId) -> impl Future<Output = ()> + Send;
}

impl<D: DynamicSlot> DynamicSlot for &D {
    fn fill<C: Clock, L: Layout>(&self, ctx: &Context<C, L>, slot: NodeId) -> impl Future<Output = ()> + Send {
        (**self).fill(ctx, slot)
    }
}

// =============================================================================
// NoSlot
// =============================================================================

/// A collaborator that leaves every slot empty.
///
/// The default for pages without dynamic content; the walker still redraws
/// the enclosing border afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSlot;

impl DynamicSlot for NoSlot {
    #[inline]
    async fn fill<C: Clock, L: Layout>(&self, _ctx: &Context<C, L>, _slot: NodeId) {}
}
