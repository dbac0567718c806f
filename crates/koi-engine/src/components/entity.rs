use glam::{DVec2, IVec2, UVec2};

use crate::api::types::EntityId;
use crate::components::layer::RenderLayer;
use crate::components::sprite::SpriteVisual;
use crate::core::geometry::{bearing, normalize_degrees, rotate_vec, sin_cos_degrees};
use crate::core::pixmap::Pixmap;

/// Fat Entity — position, heading, rotation and an optional visual in a
/// single struct. Designed for simplicity over ECS purity.
///
/// Position is a pair of independent f64 coordinates, deliberately separate
/// from the pixel grid the visual is drawn on. Heading steers movement;
/// rotation steers only how the image is drawn. The two are independent: an
/// entity can swim one way while visually facing another, and game logic
/// typically eases rotation toward heading over several ticks.
///
/// Rotation, mirroring and image swaps go through setters because each one
/// has to recompute the derived images before the next render; everything
/// else is plain data.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name and for paint-order matching.
    pub tag: String,
    /// Position in world space.
    pub pos: DVec2,
    /// Draw-order bucket, fixed at construction.
    layer: RenderLayer,
    heading: f64,
    rotation: f64,
    sprite: Option<SpriteVisual>,
}

impl Entity {
    /// Create an imageless entity at the origin on the given layer.
    pub fn new(id: EntityId, layer: RenderLayer) -> Self {
        Self {
            id,
            tag: String::new(),
            pos: DVec2::ZERO,
            layer,
            heading: 0.0,
            rotation: 0.0,
            sprite: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: DVec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.set_heading(heading);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn with_image(mut self, image: Pixmap) -> Self {
        self.set_image(image);
        self
    }

    // -- Image pipeline mutators --

    /// Replace the source image. The center of rotation resets to the new
    /// image's geometric center and both derived images are recomputed. An
    /// empty image clears the visual entirely (the entity renders nothing).
    pub fn set_image(&mut self, image: Pixmap) {
        if image.is_empty() {
            self.sprite = None;
            return;
        }
        match &mut self.sprite {
            Some(sprite) => sprite.replace_image(image, self.rotation),
            None => self.sprite = Some(SpriteVisual::new(image, self.rotation)),
        }
    }

    /// Drop the visual; the entity keeps position, heading and rotation.
    pub fn clear_image(&mut self) {
        self.sprite = None;
    }

    /// Set the pivot, in the current (mirror-applied) image's coordinates.
    pub fn set_center_of_rotation(&mut self, x: i32, y: i32) {
        let rotation = self.rotation;
        if let Some(sprite) = &mut self.sprite {
            sprite.set_center(x, y, rotation);
        }
    }

    /// Set the visual orientation in degrees. Any value is accepted and
    /// wrapped into [0, 360); the transformed image is recomputed.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
        let rotation = self.rotation;
        if let Some(sprite) = &mut self.sprite {
            sprite.rebuild_transformed(rotation);
        }
    }

    /// Mirror the visual across the vertical axis. Setting the current value
    /// again is a no-op; toggling flips the stored image and reflects the
    /// pivot's x coordinate exactly once.
    pub fn set_mirror_x(&mut self, mirrored: bool) {
        let rotation = self.rotation;
        if let Some(sprite) = &mut self.sprite {
            sprite.set_mirror_x(mirrored, rotation);
        }
    }

    /// Mirror the visual across the horizontal axis; same contract as
    /// [`set_mirror_x`](Entity::set_mirror_x).
    pub fn set_mirror_y(&mut self, mirrored: bool) {
        let rotation = self.rotation;
        if let Some(sprite) = &mut self.sprite {
            sprite.set_mirror_y(mirrored, rotation);
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if let Some(sprite) = &mut self.sprite {
            sprite.set_visible(visible);
        }
    }

    /// 0-255 opacity applied to the transformed image at draw time
    /// (255 = opaque).
    pub fn set_transparency(&mut self, transparency: u8) {
        if let Some(sprite) = &mut self.sprite {
            sprite.set_transparency(transparency);
        }
    }

    // -- Movement --

    /// Set the movement direction in degrees, wrapped into [0, 360).
    /// Does not touch the image pipeline.
    pub fn set_heading(&mut self, degrees: f64) {
        self.heading = normalize_degrees(degrees);
    }

    /// Point the heading at a world-space target.
    pub fn set_heading_towards(&mut self, x: f64, y: f64) {
        self.heading = bearing(self.pos, DVec2::new(x, y));
    }

    /// Translate along the current heading. Negative distances move
    /// backwards.
    pub fn advance(&mut self, distance: f64) {
        let (sin, cos) = sin_cos_degrees(self.heading);
        self.pos += DVec2::new(cos, sin) * distance;
    }

    // -- World mapping --

    /// Map a point given as an offset from the top-left of the *unmirrored,
    /// unrotated* original image to world coordinates: reflect across each
    /// mirrored axis, take it relative to the center of rotation, rotate by
    /// the current rotation, then translate by the entity position.
    ///
    /// Every attachment-point lookup (mouths, hooks, rod tips) goes through
    /// this one function so they all agree bit-for-bit.
    pub fn image_offset_world_position(&self, offset_x: f64, offset_y: f64) -> DVec2 {
        let Some(sprite) = &self.sprite else {
            return self.pos;
        };
        let size = sprite.original_size();
        let mut x = offset_x;
        let mut y = offset_y;
        if sprite.mirror_x() {
            x = (size.x as f64 - 1.0) - x;
        }
        if sprite.mirror_y() {
            y = (size.y as f64 - 1.0) - y;
        }
        let center = sprite.center();
        let relative = DVec2::new(x - center.x as f64, y - center.y as f64);
        self.pos + rotate_vec(relative, self.rotation)
    }

    /// Draw the transformed image onto the canvas. Invisible or imageless
    /// entities draw nothing; this never fails.
    ///
    /// The anchor is the world position of the original image's geometric
    /// center pushed through the same mirror/pivot/rotation mapping as any
    /// other offset; the transformed image is blitted with its own center on
    /// that point, draw origin rounded with `ceil` so the placement cannot
    /// drift between equal frames.
    pub fn render(&self, canvas: &mut Pixmap) {
        let Some(sprite) = &self.sprite else {
            return;
        };
        if !sprite.visible() || sprite.transformed().is_empty() {
            return;
        }
        let size = sprite.original_size();
        let anchor =
            self.image_offset_world_position((size.x / 2) as f64, (size.y / 2) as f64);
        let transformed = sprite.transformed();
        let origin_x = (anchor.x - transformed.width() as f64 / 2.0).ceil() as i32;
        let origin_y = (anchor.y - transformed.height() as f64 / 2.0).ceil() as i32;
        canvas.draw_pixmap_faded(transformed, origin_x, origin_y, sprite.transparency());
    }

    // -- Accessors --

    pub fn layer(&self) -> RenderLayer {
        self.layer
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Exact rotation in degrees, [0, 360).
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotation truncated to whole degrees.
    pub fn rotation_int(&self) -> i32 {
        self.rotation as i32
    }

    pub fn x(&self) -> f64 {
        self.pos.x
    }

    pub fn y(&self) -> f64 {
        self.pos.y
    }

    /// Position truncated to the integer pixel grid.
    pub fn grid_position(&self) -> IVec2 {
        IVec2::new(self.pos.x as i32, self.pos.y as i32)
    }

    pub fn mirror_x(&self) -> bool {
        self.sprite.as_ref().is_some_and(|s| s.mirror_x())
    }

    pub fn mirror_y(&self) -> bool {
        self.sprite.as_ref().is_some_and(|s| s.mirror_y())
    }

    pub fn is_visible(&self) -> bool {
        self.sprite.as_ref().is_some_and(|s| s.visible())
    }

    pub fn transparency(&self) -> u8 {
        self.sprite.as_ref().map_or(255, |s| s.transparency())
    }

    /// Read-only view of the visual state, if any.
    pub fn sprite(&self) -> Option<&SpriteVisual> {
        self.sprite.as_ref()
    }

    /// The current (mirror-applied) source image, if any.
    pub fn image(&self) -> Option<&Pixmap> {
        self.sprite.as_ref().map(|s| s.original())
    }

    /// The rotated, tightly-cropped image the renderer draws, if any.
    pub fn transformed_image(&self) -> Option<&Pixmap> {
        self.sprite.as_ref().map(|s| s.transformed())
    }

    /// Bounding size of the transformed image; zero when imageless.
    pub fn transformed_size(&self) -> UVec2 {
        self.sprite
            .as_ref()
            .map_or(UVec2::ZERO, |s| s.transformed_size())
    }

    /// Pivot in current image coordinates; None when imageless.
    pub fn center_of_rotation(&self) -> Option<IVec2> {
        self.sprite.as_ref().map(|s| s.center())
    }
}
