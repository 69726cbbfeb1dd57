use crate::terrain::Segment;

/// The closest part of a ground segment to a probe point: either the
/// segment's interior or one of its endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feature {
    Edge(Segment),
    Vertex { x: f64, y: f64 },
}

/// Closest feature of `seg` to the point `(px, py)` and the distance to it.
///
/// Projects the point onto the segment and clamps the projection parameter to
/// `[0, 1]`; a clamped projection means an endpoint is closest.
pub fn closest_feature(px: f64, py: f64, seg: &Segment) -> (Feature, f64) {
    let dx = seg.x2 - seg.x1;
    let dy = seg.y2 - seg.y1;
    let len_sq = dx * dx + dy * dy;
    assert!(len_sq > 0.0, "zero-length ground segment");

    let t = (((px - seg.x1) * dx + (py - seg.y1) * dy) / len_sq).clamp(0.0, 1.0);
    let cx = seg.x1 + t * dx;
    let cy = seg.y1 + t * dy;
    let dist = ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt();

    let feature = if t <= 0.0 {
        Feature::Vertex {
            x: seg.x1,
            y: seg.y1,
        }
    } else if t >= 1.0 {
        Feature::Vertex {
            x: seg.x2,
            y: seg.y2,
        }
    } else {
        Feature::Edge(*seg)
    };
    (feature, dist)
}

/// Distance from `(px, py)` to the infinite line through `seg`.
///
/// Unclamped on purpose; render overlays use it to draw aim guides. Collision
/// goes through [`closest_feature`] instead.
pub fn point_to_line(px: f64, py: f64, seg: &Segment) -> f64 {
    let dx = seg.x2 - seg.x1;
    let dy = seg.y2 - seg.y1;
    let len = (dx * dx + dy * dy).sqrt();
    assert!(len > 0.0, "zero-length ground segment");
    ((py - seg.y1) * dx - (px - seg.x1) * dy).abs() / len
}

/// Reflect the velocity `(dx, dy)` off `feature`, for a ball centered at
/// `(px, py)`. Edge contacts reflect about the edge perpendicular, vertex
/// contacts about the vertex-to-center direction.
pub fn bounce(dx: f64, dy: f64, px: f64, py: f64, feature: &Feature) -> (f64, f64) {
    let (nx, ny) = match feature {
        Feature::Edge(seg) => normalize(-(seg.y2 - seg.y1), seg.x2 - seg.x1),
        Feature::Vertex { x, y } => normalize(px - x, py - y),
    };
    let dot = dx * nx + dy * ny;
    (dx - 2.0 * dot * nx, dy - 2.0 * dot * ny)
}

/// Scale `(dx, dy)` to unit length. The input must not be the zero vector.
pub fn normalize(dx: f64, dy: f64) -> (f64, f64) {
    let len = (dx * dx + dy * dy).sqrt();
    assert!(len > 0.0, "cannot normalize a zero-length vector");
    (dx / len, dy / len)
}

/// Unit vector for an angle in degrees, unit circle style: 0 points along
/// +x, 90 straight up.
pub fn degrees_to_vector(deg: f64) -> (f64, f64) {
    let rad = deg.to_radians();
    (rad.cos(), rad.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Segment {
        Segment {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: 0.0,
        }
    }

    #[test]
    fn interior_projection_is_an_edge() {
        let (feature, dist) = closest_feature(5.0, 3.0, &floor());
        assert_eq!(feature, Feature::Edge(floor()));
        assert!((dist - 3.0).abs() < 1e-12);
    }

    #[test]
    fn projection_past_an_end_is_a_vertex() {
        let (feature, dist) = closest_feature(-4.0, 3.0, &floor());
        assert_eq!(feature, Feature::Vertex { x: 0.0, y: 0.0 });
        assert!((dist - 5.0).abs() < 1e-12, "3-4-5 triangle, got {dist}");

        let (feature, _) = closest_feature(14.0, 3.0, &floor());
        assert_eq!(feature, Feature::Vertex { x: 10.0, y: 0.0 });
    }

    #[test]
    fn point_to_line_ignores_segment_ends() {
        // Beyond the right end: the infinite line is still y = 0
        let d = point_to_line(25.0, 3.0, &floor());
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn bounce_off_a_floor_flips_dy() {
        let feature = Feature::Edge(floor());
        let (dx, dy) = bounce(2.0, -5.0, 5.0, 1.0, &feature);
        assert!((dx - 2.0).abs() < 1e-12);
        assert!((dy - 5.0).abs() < 1e-12);
    }

    #[test]
    fn bounce_off_a_slope_turns_the_velocity() {
        // 45 degree ramp: a horizontal hit leaves straight up
        let ramp = Segment {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: 10.0,
        };
        let (dx, dy) = bounce(1.0, 0.0, 2.0, 5.0, &Feature::Edge(ramp));
        assert!(dx.abs() < 1e-12, "got dx = {dx}");
        assert!((dy - 1.0).abs() < 1e-12, "got dy = {dy}");
    }

    #[test]
    fn bounce_off_a_vertex_points_away_from_it() {
        // Ball straight above the vertex, falling: reflection sends it back up
        let feature = Feature::Vertex { x: 5.0, y: 0.0 };
        let (dx, dy) = bounce(0.0, -3.0, 5.0, 4.0, &feature);
        assert!(dx.abs() < 1e-12);
        assert!((dy - 3.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_returns_unit_vectors() {
        let (nx, ny) = normalize(3.0, 4.0);
        assert!((nx - 0.6).abs() < 1e-12);
        assert!((ny - 0.8).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "zero-length")]
    fn normalize_rejects_the_zero_vector() {
        normalize(0.0, 0.0);
    }

    #[test]
    fn degrees_follow_the_unit_circle() {
        let (x, y) = degrees_to_vector(0.0);
        assert!((x - 1.0).abs() < 1e-12 && y.abs() < 1e-12);

        let (x, y) = degrees_to_vector(90.0);
        assert!(x.abs() < 1e-12 && (y - 1.0).abs() < 1e-12);

        let (x, y) = degrees_to_vector(-90.0);
        assert!(x.abs() < 1e-12 && (y + 1.0).abs() < 1e-12);

        let (x, y) = degrees_to_vector(180.0);
        assert!((x + 1.0).abs() < 1e-12 && y.abs() < 1e-12);
    }

    // ================================================================
    // Property tests
    // ================================================================

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn reflection_preserves_speed(
                dx in -30.0f64..30.0,
                dy in -30.0f64..30.0,
                x2 in 1.0f64..100.0,
                y2 in -50.0f64..50.0,
            ) {
                let seg = Segment { x1: 0.0, y1: 0.0, x2, y2 };
                let (rx, ry) = bounce(dx, dy, 3.0, 40.0, &Feature::Edge(seg));
                let before = (dx * dx + dy * dy).sqrt();
                let after = (rx * rx + ry * ry).sqrt();
                prop_assert!((before - after).abs() < 1e-9);
            }

            #[test]
            fn clamped_distance_never_beats_the_endpoints(
                px in -100.0f64..200.0,
                py in -100.0f64..100.0,
                x2 in 1.0f64..100.0,
                y2 in -50.0f64..50.0,
            ) {
                let seg = Segment { x1: 0.0, y1: 0.0, x2, y2 };
                let (_, dist) = closest_feature(px, py, &seg);
                let to_a = (px * px + py * py).sqrt();
                let to_b = ((px - x2) * (px - x2) + (py - y2) * (py - y2)).sqrt();
                prop_assert!(dist <= to_a + 1e-9);
                prop_assert!(dist <= to_b + 1e-9);
                prop_assert!(dist >= point_to_line(px, py, &seg) - 1e-9);
            }
        }
    }
}
