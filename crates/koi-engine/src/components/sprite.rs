//! Visual state for an entity: the mirror-applied original image plus the
//! derived bitmaps the renderer actually draws.
//!
//! Three representations are kept consistent at all times:
//!
//! - original: the source image with the current mirror flags applied.
//! - expanded: a square with side `ceil(hypot(w, h))` and the original
//!   centered in it, so any rotation fits without clipping.
//! - transformed: the expanded image rotated by the entity's rotation and
//!   cropped back to the minimal bounding box of the rotated original,
//!   centered on the expanded image's center.
//!
//! Every mutation recomputes the affected derived images before returning;
//! nothing is deferred to render time.

use glam::{IVec2, UVec2};

use crate::core::geometry::sin_cos_degrees;
use crate::core::pixmap::Pixmap;

#[derive(Debug, Clone)]
pub struct SpriteVisual {
    original: Pixmap,
    expanded: Pixmap,
    transformed: Pixmap,
    /// Pivot in the current (mirror-applied) original image's coordinates.
    center: IVec2,
    mirror_x: bool,
    mirror_y: bool,
    visible: bool,
    transparency: u8,
}

impl SpriteVisual {
    /// Wrap an image with the pivot at its geometric center and derived
    /// images computed for the given rotation.
    pub(crate) fn new(image: Pixmap, rotation: f64) -> Self {
        let center = geometric_center(&image);
        let mut visual = Self {
            original: image,
            expanded: Pixmap::new(0, 0),
            transformed: Pixmap::new(0, 0),
            center,
            mirror_x: false,
            mirror_y: false,
            visible: true,
            transparency: 255,
        };
        visual.rebuild(rotation);
        visual
    }

    /// Swap in a new source image, keeping the current mirror state applied
    /// to it. The pivot resets to the new image's geometric center.
    pub(crate) fn replace_image(&mut self, image: Pixmap, rotation: f64) {
        let mut image = image;
        if self.mirror_x {
            image = image.mirrored_x();
        }
        if self.mirror_y {
            image = image.mirrored_y();
        }
        self.center = geometric_center(&image);
        self.original = image;
        self.rebuild(rotation);
    }

    pub(crate) fn set_center(&mut self, x: i32, y: i32, rotation: f64) {
        self.center = IVec2::new(x, y);
        // The pivot does not move pixels; only the final placement and the
        // world mapping change, so the expanded image stays valid.
        self.rebuild_transformed(rotation);
    }

    /// Toggle horizontal mirroring. A no-op when the flag is unchanged, so
    /// the image and pivot are never flipped twice for one logical state.
    pub(crate) fn set_mirror_x(&mut self, mirrored: bool, rotation: f64) {
        if self.mirror_x == mirrored {
            return;
        }
        self.mirror_x = mirrored;
        self.original = self.original.mirrored_x();
        self.center.x = self.original.width() as i32 - 1 - self.center.x;
        self.rebuild(rotation);
    }

    /// Toggle vertical mirroring. Same contract as [`set_mirror_x`].
    ///
    /// [`set_mirror_x`]: SpriteVisual::set_mirror_x
    pub(crate) fn set_mirror_y(&mut self, mirrored: bool, rotation: f64) {
        if self.mirror_y == mirrored {
            return;
        }
        self.mirror_y = mirrored;
        self.original = self.original.mirrored_y();
        self.center.y = self.original.height() as i32 - 1 - self.center.y;
        self.rebuild(rotation);
    }

    /// Recompute both derived images.
    pub(crate) fn rebuild(&mut self, rotation: f64) {
        self.rebuild_expanded();
        self.rebuild_transformed(rotation);
    }

    fn rebuild_expanded(&mut self) {
        let w = self.original.width();
        let h = self.original.height();
        if w == 0 || h == 0 {
            self.expanded = Pixmap::new(0, 0);
            return;
        }
        let side = (w as f64).hypot(h as f64).ceil() as u32;
        let mut expanded = Pixmap::new(side, side);
        expanded.draw_pixmap(
            &self.original,
            ((side - w) / 2) as i32,
            ((side - h) / 2) as i32,
        );
        self.expanded = expanded;
    }

    /// Rotate the expanded image and crop it, centered, to the bounding box
    /// of the rotated original: `ceil(w|cos| + h|sin|)` by
    /// `ceil(w|sin| + h|cos|)`.
    pub(crate) fn rebuild_transformed(&mut self, rotation: f64) {
        if self.expanded.is_empty() {
            self.transformed = Pixmap::new(0, 0);
            return;
        }
        let w = self.original.width() as f64;
        let h = self.original.height() as f64;
        let (sin, cos) = sin_cos_degrees(rotation);
        let (sin, cos) = (sin.abs(), cos.abs());
        let bound_w = (w * cos + h * sin).ceil() as u32;
        let bound_h = (w * sin + h * cos).ceil() as u32;

        let rotated = self.expanded.rotated(rotation);
        let side = self.expanded.width() as i32;
        self.transformed = rotated.crop(
            (side - bound_w as i32) / 2,
            (side - bound_h as i32) / 2,
            bound_w,
            bound_h,
        );
    }

    // -- Accessors --

    pub fn original(&self) -> &Pixmap {
        &self.original
    }

    pub fn transformed(&self) -> &Pixmap {
        &self.transformed
    }

    pub fn original_size(&self) -> UVec2 {
        self.original.size()
    }

    pub fn transformed_size(&self) -> UVec2 {
        self.transformed.size()
    }

    pub fn center(&self) -> IVec2 {
        self.center
    }

    pub fn mirror_x(&self) -> bool {
        self.mirror_x
    }

    pub fn mirror_y(&self) -> bool {
        self.mirror_y
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn transparency(&self) -> u8 {
        self.transparency
    }

    pub(crate) fn set_transparency(&mut self, transparency: u8) {
        self.transparency = transparency;
    }
}

fn geometric_center(image: &Pixmap) -> IVec2 {
    IVec2::new((image.width() / 2) as i32, (image.height() / 2) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pixmap::Rgba8;

    const RED: Rgba8 = Rgba8::opaque(255, 0, 0);

    fn solid(w: u32, h: u32) -> Pixmap {
        let mut pixmap = Pixmap::new(w, h);
        pixmap.fill(RED);
        pixmap
    }

    #[test]
    fn expanded_is_square_with_hypot_side() {
        let visual = SpriteVisual::new(solid(10, 10), 0.0);
        // hypot(10, 10) = 14.14 -> 15
        assert_eq!(visual.expanded.size(), UVec2::new(15, 15));
    }

    #[test]
    fn transformed_at_zero_rotation_matches_original() {
        let mut source = Pixmap::new(4, 3);
        source.put(0, 0, RED);
        source.put(3, 2, Rgba8::opaque(0, 255, 0));
        let visual = SpriteVisual::new(source.clone(), 0.0);
        assert_eq!(visual.transformed, source);
    }

    #[test]
    fn bounding_box_formula_holds_for_all_angles() {
        for angle in [0.0, 17.0, 30.0, 45.0, 90.0, 135.0, 222.5, 359.0] {
            let visual = SpriteVisual::new(solid(12, 5), angle);
            let (sin, cos) = sin_cos_degrees(angle);
            let expected_w = (12.0 * cos.abs() + 5.0 * sin.abs()).ceil() as u32;
            let expected_h = (12.0 * sin.abs() + 5.0 * cos.abs()).ceil() as u32;
            assert_eq!(
                visual.transformed_size(),
                UVec2::new(expected_w, expected_h),
                "angle {}",
                angle
            );
        }
    }

    #[test]
    fn quarter_turn_swaps_bounding_dimensions() {
        let visual = SpriteVisual::new(solid(8, 2), 90.0);
        assert_eq!(visual.transformed_size(), UVec2::new(2, 8));
    }

    #[test]
    fn mirror_reflects_center() {
        let mut visual = SpriteVisual::new(solid(10, 6), 0.0);
        visual.set_center(2, 1, 0.0);
        visual.set_mirror_x(true, 0.0);
        assert_eq!(visual.center(), IVec2::new(7, 1));
        visual.set_mirror_y(true, 0.0);
        assert_eq!(visual.center(), IVec2::new(7, 4));
    }

    #[test]
    fn setting_same_mirror_value_is_a_no_op() {
        let mut visual = SpriteVisual::new(solid(9, 4), 0.0);
        visual.set_center(1, 1, 0.0);
        visual.set_mirror_x(true, 0.0);
        let center = visual.center();
        let image = visual.original().clone();
        visual.set_mirror_x(true, 0.0);
        assert_eq!(visual.center(), center);
        assert_eq!(visual.original(), &image);
    }

    #[test]
    fn mirror_and_back_restores_everything() {
        let mut source = Pixmap::new(6, 4);
        source.put(1, 0, RED);
        let mut visual = SpriteVisual::new(source.clone(), 0.0);
        visual.set_center(2, 3, 0.0);
        visual.set_mirror_x(true, 0.0);
        visual.set_mirror_x(false, 0.0);
        assert_eq!(visual.original(), &source);
        assert_eq!(visual.center(), IVec2::new(2, 3));
    }

    #[test]
    fn replace_image_keeps_mirror_applied() {
        let mut visual = SpriteVisual::new(solid(4, 4), 0.0);
        visual.set_mirror_x(true, 0.0);

        let mut replacement = Pixmap::new(3, 1);
        replacement.put(0, 0, RED);
        visual.replace_image(replacement, 0.0);

        // Still facing the mirrored way: the marker pixel flipped to x = 2.
        assert_eq!(visual.original().get(2, 0), RED);
        assert_eq!(visual.center(), IVec2::new(1, 0));
    }

    #[test]
    fn zero_area_image_disables_the_pipeline() {
        let visual = SpriteVisual::new(Pixmap::new(0, 5), 45.0);
        assert!(visual.transformed().is_empty());
        assert_eq!(visual.transformed_size(), UVec2::ZERO);
    }

    #[test]
    fn rotation_round_trip_recovers_original() {
        let mut source = Pixmap::new(7, 3);
        source.put(0, 0, RED);
        source.put(6, 2, Rgba8::opaque(0, 255, 0));
        let mut visual = SpriteVisual::new(source.clone(), 38.0);
        visual.rebuild_transformed(0.0);
        assert_eq!(visual.transformed, source);
    }
}
