//! On-demand image assembly: a base image plus a variable set of overlays
//! becomes a single tightly-bounded image, ready to be fed back into an
//! entity as its new source image.

use glam::IVec2;
use thiserror::Error;

use crate::core::pixmap::Pixmap;

/// One overlay: an image and its offset relative to the base's top-left
/// corner. Offsets may be negative or reach past the base on any side.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub image: Pixmap,
    pub offset: IVec2,
}

impl Overlay {
    pub fn new(image: Pixmap, x: i32, y: i32) -> Self {
        Self {
            image,
            offset: IVec2::new(x, y),
        }
    }
}

/// A compositing call that cannot produce a meaningful image. These are
/// caller contract violations and surface immediately instead of producing
/// visually corrupt output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("composite base image has zero area")]
    EmptyBase,
    #[error("overlay {index} has zero area")]
    EmptyOverlay { index: usize },
}

/// Composite `base` with `overlays` into a new image sized to the minimal
/// axis-aligned box containing all of them. The base is drawn first, then
/// each overlay in slice order, so later overlays win overlapping pixels.
///
/// The returned vector is how far the box extends above/left of the base's
/// origin — add it to a pivot on the base to keep that pivot anchored to the
/// same physical point in the composited frame.
///
/// With no overlays the base is returned as-is with a zero shift, so the
/// common single-image case allocates nothing and stays pixel-identical.
pub fn compose(base: Pixmap, overlays: &[Overlay]) -> Result<(Pixmap, IVec2), ComposeError> {
    if base.is_empty() {
        return Err(ComposeError::EmptyBase);
    }
    if overlays.is_empty() {
        return Ok((base, IVec2::ZERO));
    }
    for (index, overlay) in overlays.iter().enumerate() {
        if overlay.image.is_empty() {
            return Err(ComposeError::EmptyOverlay { index });
        }
    }

    let mut min = IVec2::ZERO;
    let mut max = IVec2::new(base.width() as i32, base.height() as i32);
    for overlay in overlays {
        min = min.min(overlay.offset);
        max = max.max(overlay.offset + IVec2::new(
            overlay.image.width() as i32,
            overlay.image.height() as i32,
        ));
    }

    let shift = -min;
    let mut out = Pixmap::new((max.x - min.x) as u32, (max.y - min.y) as u32);
    out.draw_pixmap(&base, shift.x, shift.y);
    for overlay in overlays {
        out.draw_pixmap(
            &overlay.image,
            overlay.offset.x + shift.x,
            overlay.offset.y + shift.y,
        );
    }
    Ok((out, shift))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pixmap::Rgba8;

    const RED: Rgba8 = Rgba8::opaque(255, 0, 0);
    const GREEN: Rgba8 = Rgba8::opaque(0, 255, 0);
    const BLUE: Rgba8 = Rgba8::opaque(0, 0, 255);

    fn solid(w: u32, h: u32, color: Rgba8) -> Pixmap {
        let mut pixmap = Pixmap::new(w, h);
        pixmap.fill(color);
        pixmap
    }

    #[test]
    fn no_overlays_returns_base_unchanged() {
        let base = solid(5, 3, RED);
        let (out, shift) = compose(base.clone(), &[]).unwrap();
        assert_eq!(out, base);
        assert_eq!(shift, IVec2::ZERO);
    }

    #[test]
    fn overlay_reaching_up_left_grows_the_box_and_shifts_the_pivot() {
        let base = solid(10, 10, RED);
        let overlays = [Overlay::new(solid(4, 4, GREEN), -2, -2)];
        let (out, shift) = compose(base, &overlays).unwrap();

        assert_eq!(out.size(), glam::UVec2::new(12, 12));
        assert_eq!(shift, IVec2::new(2, 2));
        // A pivot at (5, 5) on the base moves to (7, 7) in the new frame.
        assert_eq!(IVec2::new(5, 5) + shift, IVec2::new(7, 7));
        // Overlay sits in the extended corner, base shifted by two.
        assert_eq!(out.get(0, 0), GREEN);
        assert_eq!(out.get(4, 4), RED);
        assert_eq!(out.get(11, 11), RED);
    }

    #[test]
    fn overlay_past_the_bottom_right_needs_no_shift() {
        let base = solid(4, 4, RED);
        let overlays = [Overlay::new(solid(3, 3, GREEN), 3, 3)];
        let (out, shift) = compose(base, &overlays).unwrap();
        assert_eq!(out.size(), glam::UVec2::new(6, 6));
        assert_eq!(shift, IVec2::ZERO);
        assert_eq!(out.get(5, 5), GREEN);
    }

    #[test]
    fn later_overlays_draw_over_earlier_ones() {
        let base = solid(4, 4, RED);
        let overlays = [
            Overlay::new(solid(2, 2, GREEN), 0, 0),
            Overlay::new(solid(2, 2, BLUE), 1, 1),
        ];
        let (out, _) = compose(base, &overlays).unwrap();
        assert_eq!(out.get(0, 0), GREEN);
        assert_eq!(out.get(1, 1), BLUE);
        assert_eq!(out.get(3, 3), RED);
    }

    #[test]
    fn zero_area_inputs_are_contract_violations() {
        assert_eq!(
            compose(Pixmap::new(0, 4), &[]).unwrap_err(),
            ComposeError::EmptyBase
        );
        let overlays = [
            Overlay::new(solid(2, 2, GREEN), 0, 0),
            Overlay::new(Pixmap::new(3, 0), 1, 1),
        ];
        assert_eq!(
            compose(solid(4, 4, RED), &overlays).unwrap_err(),
            ComposeError::EmptyOverlay { index: 1 }
        );
    }
}
