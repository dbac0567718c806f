// core/geometry.rs
//
// Angle and vector helpers for movement, visual rotation and attachment
// point lookups. Degrees throughout; 0 points along +x, 90 along +y
// (y grows downward on the canvas). No dependencies on Entity/Scene.

use glam::DVec2;

/// Wrap any angle into [0, 360). Never returns a negative value, even for
/// negative inputs (-90 becomes 270).
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Sine and cosine of an angle in degrees, exact at quarter turns.
///
/// `f64::cos(90.0_f64.to_radians())` is ~6e-17 rather than zero, which is
/// enough to push a `ceil` over and grow a rotated bounding box by a pixel.
/// Quarter turns come up constantly, so they bypass the radian path.
pub fn sin_cos_degrees(degrees: f64) -> (f64, f64) {
    let angle = normalize_degrees(degrees);
    if angle == 0.0 {
        (0.0, 1.0)
    } else if angle == 90.0 {
        (1.0, 0.0)
    } else if angle == 180.0 {
        (0.0, -1.0)
    } else if angle == 270.0 {
        (-1.0, 0.0)
    } else {
        angle.to_radians().sin_cos()
    }
}

/// Rotate a vector by an angle in degrees.
#[inline]
pub fn rotate_vec(v: DVec2, degrees: f64) -> DVec2 {
    let (sin, cos) = sin_cos_degrees(degrees);
    DVec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Direction from one point to another, in [0, 360).
#[inline]
pub fn bearing(from: DVec2, to: DVec2) -> f64 {
    normalize_degrees((to.y - from.y).atan2(to.x - from.x).to_degrees())
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Signed shortest arc from one angle to another, in (-180, 180].
#[inline]
pub fn angle_diff(from: f64, to: f64) -> f64 {
    let diff = normalize_degrees(to - from);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Step an angle toward a target along the shortest arc, at most `max_step`
/// degrees per call. Reaches the target exactly rather than oscillating
/// around it. `max_step` is treated as a magnitude.
pub fn turn_toward(current: f64, target: f64, max_step: f64) -> f64 {
    let diff = angle_diff(current, target);
    if diff.abs() <= max_step.abs() {
        normalize_degrees(target)
    } else {
        normalize_degrees(current + max_step.abs().copysign(diff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_handles_negative_and_large_angles() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_degrees(365.5), 5.5);
        assert!(normalize_degrees(-0.25) >= 0.0);
    }

    #[test]
    fn bearing_follows_screen_axes() {
        // to_degrees is not exact at the quadrants, so compare with slack.
        let origin = DVec2::ZERO;
        assert_eq!(bearing(origin, DVec2::new(10.0, 0.0)), 0.0);
        assert!((bearing(origin, DVec2::new(0.0, 10.0)) - 90.0).abs() < 1e-9);
        assert!((bearing(origin, DVec2::new(-10.0, 0.0)) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn rotate_vec_quarter_turn() {
        let v = rotate_vec(DVec2::new(1.0, 0.0), 90.0);
        assert!(v.x.abs() < 1e-9);
        assert!((v.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn angle_diff_picks_shortest_arc() {
        assert_eq!(angle_diff(350.0, 10.0), 20.0);
        assert_eq!(angle_diff(10.0, 350.0), -20.0);
        assert_eq!(angle_diff(0.0, 180.0), 180.0);
    }

    #[test]
    fn turn_toward_crosses_the_wrap() {
        let turned = turn_toward(350.0, 10.0, 5.0);
        assert_eq!(turned, 355.0);
        let turned = turn_toward(355.0, 10.0, 5.0);
        assert_eq!(turned, 0.0);
    }

    #[test]
    fn turn_toward_snaps_when_close() {
        assert_eq!(turn_toward(8.0, 10.0, 5.0), 10.0);
        assert_eq!(turn_toward(10.0, 10.0, 5.0), 10.0);
    }

    #[test]
    fn quarter_turns_are_exact() {
        assert_eq!(sin_cos_degrees(90.0), (1.0, 0.0));
        assert_eq!(sin_cos_degrees(180.0), (0.0, -1.0));
        assert_eq!(sin_cos_degrees(-90.0), (-1.0, 0.0));
        assert_eq!(sin_cos_degrees(450.0), (1.0, 0.0));
    }
}
