use crate::components::entity::Entity;
use crate::core::pixmap::Pixmap;
use crate::core::scene::Scene;

/// Optional fine-grained draw ordering inside a layer.
///
/// Categories are matched against entity tags. Within a layer, entities
/// whose tag appears earlier in the list draw before entities whose tag
/// appears later; entities matching no category draw after all matched ones,
/// in plain spawn order. Layer order always dominates — a paint order never
/// lifts an entity above a later layer.
#[derive(Debug, Clone, Default)]
pub struct PaintOrder {
    categories: Vec<String>,
}

impl PaintOrder {
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of the entity's category in the list; unmatched entities
    /// rank after every listed category.
    fn rank(&self, entity: &Entity) -> usize {
        self.categories
            .iter()
            .position(|category| *category == entity.tag)
            .unwrap_or(self.categories.len())
    }
}

/// Draw every entity in the scene onto the canvas, exactly once, back to
/// front: earlier layers first, later layers strictly on top. Ties inside a
/// layer fall to the paint order (when given), then to spawn order.
///
/// The pass is a pure projection of entity state — it never mutates an
/// entity, and a degenerate entity draws nothing rather than aborting the
/// frame. An empty scene is a no-op.
pub fn render_scene(scene: &Scene, canvas: &mut Pixmap, paint_order: Option<&PaintOrder>) {
    let mut order: Vec<&Entity> = scene.iter().collect();
    // Stable sort: spawn order survives as the final tie-breaker.
    order.sort_by_key(|entity| {
        (
            entity.layer(),
            paint_order.map_or(0, |p| p.rank(entity)),
        )
    });
    for entity in &order {
        entity.render(canvas);
    }
    log::trace!("render pass drew {} entities", order.len());
}
