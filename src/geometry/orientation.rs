//! Stable reference-corner selection under device rotation.
//!
//! Detectors report corners in a fixed order relative to the camera sensor, so
//! the corner at index 0 wanders around the tag as the device rotates. To keep
//! labels anchored to the visually top-left corner, the quad is de-rotated
//! about its centroid and the corner nearest the origin is chosen as the new
//! index 0. The returned points are the original, untouched corners.

use super::point::{Point, Quad, centroid};

/// Cyclically shift `corners` so index 0 is the corner that lies nearest the
/// origin once the quad is rotated by `-rotation_degrees` about its centroid.
///
/// Ties go to the earliest corner in input order.
pub fn normalize_orientation(corners: Quad, rotation_degrees: f32) -> Quad {
    let pivot = centroid(&corners);
    let origin = Point::default();

    let mut reference = 0;
    let mut best = f32::INFINITY;
    for (i, corner) in corners.iter().enumerate() {
        let distance = corner
            .rotated_about(&pivot, -rotation_degrees)
            .distance_sq(&origin);
        if distance < best {
            best = distance;
            reference = i;
        }
    }

    std::array::from_fn(|j| corners[(reference + j) % corners.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Quad {
        [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    fn is_cyclic_shift(a: &Quad, b: &Quad) -> bool {
        (0..4).any(|k| (0..4).all(|j| a[(k + j) % 4] == b[j]))
    }

    #[test]
    fn test_upright_keeps_top_left() {
        assert_eq!(normalize_orientation(square(), 0.0)[0], Point::new(0.0, 0.0));
    }

    #[test]
    fn test_half_turn_starts_at_opposite_corner() {
        let out = normalize_orientation(square(), 180.0);
        assert_eq!(out[0], Point::new(10.0, 10.0));
        assert_eq!(out[1], Point::new(0.0, 10.0));
        assert_eq!(out[2], Point::new(0.0, 0.0));
        assert_eq!(out[3], Point::new(10.0, 0.0));
    }

    #[test]
    fn test_quarter_turns() {
        assert_eq!(normalize_orientation(square(), 90.0)[0], Point::new(10.0, 0.0));
        assert_eq!(normalize_orientation(square(), 270.0)[0], Point::new(0.0, 10.0));
        assert_eq!(normalize_orientation(square(), -90.0)[0], Point::new(0.0, 10.0));
    }

    #[test]
    fn test_output_is_cyclic_shift_of_input() {
        let quad = [
            Point::new(120.0, 40.0),
            Point::new(180.0, 70.0),
            Point::new(150.0, 130.0),
            Point::new(90.0, 100.0),
        ];
        for step in 0..24 {
            let rotation = step as f32 * 15.0;
            let out = normalize_orientation(quad, rotation);
            assert!(is_cyclic_shift(&quad, &out), "rotation {rotation}");
        }
    }

    #[test]
    fn test_reference_choice_is_stable() {
        let quad = [
            Point::new(30.0, 20.0),
            Point::new(60.0, 25.0),
            Point::new(55.0, 60.0),
            Point::new(25.0, 50.0),
        ];
        for rotation in [0.0, 33.0, 90.0, 181.0, 300.0] {
            let once = normalize_orientation(quad, rotation);
            let twice = normalize_orientation(once, rotation);
            assert_eq!(once, twice, "rotation {rotation}");
        }
    }

    #[test]
    fn test_tie_goes_to_first_corner() {
        // Degenerate quad: every corner is the same point.
        let p = Point::new(3.0, 4.0);
        let out = normalize_orientation([p; 4], 45.0);
        assert_eq!(out, [p; 4]);
    }
}
