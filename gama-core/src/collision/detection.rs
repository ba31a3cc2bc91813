//! Narrow-phase collision detection.
//!
//! Two layers share the same shape-pair dispatch:
//!
//! - **Quick tests** ([`detect`] and the per-pair predicates): boolean overlap,
//!   no square roots except where unavoidable
//! - **Contact geometry** ([`contact`], [`penetration`]): penetration depth and
//!   the unit normal pointing from the first body to the second
//!
//! Boundary behaviour differs per pair: boxes and circles that exactly touch do
//! not collide, while a circle exactly touching a box does.

use crate::types::{constants, Body, Shape, Vec2};

/// Penetration depth and separation normal of an overlapping pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Overlap along the normal, always positive
    pub penetration: f64,
    /// Unit vector from the first body toward the second
    pub normal: Vec2,
}

// =============================================================================
// Quick tests
// =============================================================================

/// Axis-aligned box overlap. Boxes sharing an edge do not collide.
///
/// Circles are tested through their bounding box.
pub fn aabb_vs_aabb(a: &Body, b: &Body) -> bool {
    let (ha, hb) = (a.shape.half_extents(), b.shape.half_extents());

    let a_left = a.position.x - ha.x;
    let a_right = a.position.x + ha.x;
    let a_top = a.position.y + ha.y;
    let a_bottom = a.position.y - ha.y;

    let b_left = b.position.x - hb.x;
    let b_right = b.position.x + hb.x;
    let b_top = b.position.y + hb.y;
    let b_bottom = b.position.y - hb.y;

    !(a_right <= b_left || a_left >= b_right || a_top <= b_bottom || a_bottom >= b_top)
}

/// Circle overlap using squared distances. Tangent circles do not collide.
///
/// Returns false unless both bodies are circles.
pub fn circle_vs_circle(a: &Body, b: &Body) -> bool {
    let (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) = (a.shape, b.shape) else {
        return false;
    };
    let total_radius = ra + rb;
    (b.position - a.position).magnitude_squared() < total_radius * total_radius
}

/// Circle against box, via the closest point of the box to the circle center.
///
/// A circle exactly touching the box counts as colliding. Returns false unless
/// `circle` is a circle and `rect` a rectangle.
pub fn circle_vs_aabb(circle: &Body, rect: &Body) -> bool {
    let (Shape::Circle { radius }, Shape::Rect { .. }) = (circle.shape, rect.shape) else {
        return false;
    };
    let closest = closest_point_on_rect(circle.position, rect);
    (circle.position - closest).magnitude_squared() <= radius * radius
}

/// Boolean collision test for any pair of bodies.
///
/// Symmetric: `detect(a, b) == detect(b, a)`.
pub fn detect(a: &Body, b: &Body) -> bool {
    match (a.shape, b.shape) {
        (Shape::Rect { .. }, Shape::Rect { .. }) => aabb_vs_aabb(a, b),
        (Shape::Circle { .. }, Shape::Circle { .. }) => circle_vs_circle(a, b),
        (Shape::Circle { .. }, Shape::Rect { .. }) => circle_vs_aabb(a, b),
        (Shape::Rect { .. }, Shape::Circle { .. }) => circle_vs_aabb(b, a),
    }
}

// =============================================================================
// Contact geometry
// =============================================================================

/// Penetration depth and normal, or `None` when the pair does not overlap.
pub fn contact(a: &Body, b: &Body) -> Option<Contact> {
    match measure(a, b) {
        (penetration, Some(normal)) if penetration > 0.0 => Some(Contact {
            penetration,
            normal,
        }),
        _ => None,
    }
}

/// Signed penetration depth of an ordered pair; zero or negative when apart.
pub fn penetration(a: &Body, b: &Body) -> f64 {
    measure(a, b).0
}

/// Penetration depth plus the normal when the pair overlaps.
pub(crate) fn measure(a: &Body, b: &Body) -> (f64, Option<Vec2>) {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a.position, ra, b.position, rb)
        }
        (Shape::Rect { width: wa, height: ha }, Shape::Rect { width: wb, height: hb }) => {
            let (delta, overlap) = (
                b.position - a.position,
                Vec2::new((wa + wb) * 0.5, (ha + hb) * 0.5),
            );
            rect_rect(delta, overlap)
        }
        (Shape::Circle { radius }, Shape::Rect { .. }) => {
            // Normal comes out rect -> circle, we want a -> b
            let (depth, normal) = circle_rect(a.position, radius, b);
            (depth, normal.map(|n| -n))
        }
        (Shape::Rect { .. }, Shape::Circle { radius }) => circle_rect(b.position, radius, a),
    }
}

fn circle_circle(pa: Vec2, ra: f64, pb: Vec2, rb: f64) -> (f64, Option<Vec2>) {
    let mut delta = pb - pa;
    let mut distance = delta.magnitude();
    if distance == 0.0 {
        // Coincident centers: separate along +X
        distance = constants::COINCIDENT_DISTANCE;
        delta.x = constants::COINCIDENT_DISTANCE;
    }

    let depth = ra + rb - distance;
    if depth > 0.0 {
        (depth, Some(delta / distance))
    } else {
        (depth, None)
    }
}

/// `delta` is the center offset a -> b, `overlap` the summed half extents.
fn rect_rect(delta: Vec2, overlap: Vec2) -> (f64, Option<Vec2>) {
    let overlap_x = overlap.x - delta.x.abs();
    let overlap_y = overlap.y - delta.y.abs();

    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return (overlap_x.min(overlap_y), None);
    }

    // Separate along the axis of least overlap
    if overlap_x < overlap_y {
        let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
        (overlap_x, Some(Vec2::new(sign, 0.0)))
    } else {
        let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
        (overlap_y, Some(Vec2::new(0.0, sign)))
    }
}

/// Depth and normal pointing from the rectangle surface to the circle center.
fn circle_rect(center: Vec2, radius: f64, rect: &Body) -> (f64, Option<Vec2>) {
    let closest = closest_point_on_rect(center, rect);
    let offset = center - closest;
    let distance_sq = offset.magnitude_squared();
    let distance = distance_sq.sqrt();

    if distance_sq >= radius * radius {
        return (radius - distance, None);
    }

    if distance > constants::INSIDE_EPSILON {
        return (radius - distance, Some(offset / distance));
    }

    // Center inside the box: the closest point degenerates, push out through
    // the nearest edge instead.
    let half = rect.shape.half_extents();
    let left = center.x - (rect.position.x - half.x);
    let right = (rect.position.x + half.x) - center.x;
    let bottom = center.y - (rect.position.y - half.y);
    let top = (rect.position.y + half.y) - center.y;

    let min_x = left.min(right);
    let min_y = bottom.min(top);

    if min_x < min_y {
        let sign = if left < right { -1.0 } else { 1.0 };
        (min_x + radius, Some(Vec2::new(sign, 0.0)))
    } else {
        let sign = if bottom < top { -1.0 } else { 1.0 };
        (min_y + radius, Some(Vec2::new(0.0, sign)))
    }
}

fn closest_point_on_rect(point: Vec2, rect: &Body) -> Vec2 {
    let half = rect.shape.half_extents();
    Vec2::new(
        point.x.clamp(rect.position.x - half.x, rect.position.x + half.x),
        point.y.clamp(rect.position.y - half.y, rect.position.y + half.y),
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_eq(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).magnitude() < 1e-9,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    /// A spread of pairs covering every shape combination, overlapping or not.
    fn sample_pairs() -> Vec<(Body, Body)> {
        vec![
            (Body::circle(1.0, 0.0, 0.0, 0.5), Body::circle(1.0, 0.8, 0.1, 0.5)),
            (Body::circle(1.0, 0.0, 0.0, 0.5), Body::circle(1.0, 1.2, 0.0, 0.5)),
            (Body::rect(1.0, 0.0, 0.0, 1.0, 1.0), Body::rect(1.0, 0.7, 0.3, 1.0, 1.0)),
            (Body::rect(1.0, 0.0, 0.0, 1.0, 1.0), Body::rect(1.0, 0.0, 1.5, 1.0, 1.0)),
            (Body::circle(1.0, 1.3, 0.2, 0.5), Body::rect(1.0, 0.0, 0.0, 2.0, 2.0)),
            (Body::circle(1.0, 0.2, 0.1, 0.3), Body::rect(1.0, 0.0, 0.0, 2.0, 2.0)),
            (Body::circle(1.0, 3.0, 3.0, 0.5), Body::rect(1.0, 0.0, 0.0, 2.0, 2.0)),
            (Body::rect(1.0, 0.0, 0.0, 0.4, 3.0), Body::circle(1.0, -0.35, 1.0, 0.2)),
        ]
    }

    #[test]
    fn test_detection_is_symmetric() {
        for (a, b) in sample_pairs() {
            assert_eq!(detect(&a, &b), detect(&b, &a), "asymmetric for {:?} / {:?}", a, b);
        }
    }

    #[test]
    fn test_detected_pairs_have_positive_penetration() {
        for (a, b) in sample_pairs() {
            if detect(&a, &b) {
                assert!(penetration(&a, &b) > 0.0, "{:?} / {:?}", a, b);
                assert!(penetration(&b, &a) > 0.0, "{:?} / {:?}", b, a);
                assert!(contact(&a, &b).is_some());
            } else {
                assert!(contact(&a, &b).is_none());
            }
        }
    }

    #[test]
    fn test_circle_touching_box_collides() {
        let rect = Body::rect(1.0, 0.0, 0.0, 2.0, 2.0);
        let circle = Body::circle(1.0, 1.5, 0.0, 0.5);

        assert!(circle_vs_aabb(&circle, &rect));
        assert!(detect(&rect, &circle));
    }

    #[test]
    fn test_abutting_boxes_do_not_collide() {
        let a = Body::rect(1.0, 0.0, 0.0, 2.0, 2.0);
        let b = Body::rect(1.0, 2.0, 0.0, 2.0, 2.0);

        assert!(!aabb_vs_aabb(&a, &b));
        assert!(!detect(&a, &b));
        assert!(contact(&a, &b).is_none());
    }

    #[test]
    fn test_tangent_circles_do_not_collide() {
        let a = Body::circle(1.0, 0.0, 0.0, 0.5);
        let b = Body::circle(1.0, 1.0, 0.0, 0.5);
        assert!(!circle_vs_circle(&a, &b));
    }

    #[test]
    fn test_predicates_reject_wrong_shapes() {
        let circle = Body::circle(1.0, 0.0, 0.0, 0.5);
        let rect = Body::rect(1.0, 0.0, 0.0, 1.0, 1.0);
        assert!(!circle_vs_circle(&circle, &rect));
        assert!(!circle_vs_aabb(&rect, &circle));
    }

    #[test]
    fn test_circle_circle_contact() {
        let a = Body::circle(1.0, 0.0, 0.0, 0.5);
        let b = Body::circle(1.0, 0.0, 0.8, 0.5);

        let c = contact(&a, &b).expect("circles overlap");
        assert!((c.penetration - 0.2).abs() < 1e-9);
        assert_vec_eq(c.normal, Vec2::new(0.0, 1.0));

        let reversed = contact(&b, &a).expect("circles overlap");
        assert_vec_eq(reversed.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_coincident_circles_separate_along_x() {
        let a = Body::circle(1.0, 0.3, 0.3, 0.5);
        let b = Body::circle(1.0, 0.3, 0.3, 0.5);

        let c = contact(&a, &b).expect("coincident circles overlap");
        assert_vec_eq(c.normal, Vec2::new(1.0, 0.0));
        assert!((c.penetration - (1.0 - constants::COINCIDENT_DISTANCE)).abs() < 1e-9);
    }

    #[test]
    fn test_rect_rect_picks_least_overlap() {
        let a = Body::rect(1.0, 0.0, 0.0, 1.0, 1.0);
        let b = Body::rect(1.0, 0.9, -0.2, 1.0, 1.0);

        let c = contact(&a, &b).expect("boxes overlap");
        assert!((c.penetration - 0.1).abs() < 1e-9);
        assert_vec_eq(c.normal, Vec2::new(1.0, 0.0));

        let below = Body::rect(1.0, 0.1, -0.7, 1.0, 1.0);
        let c = contact(&a, &below).expect("boxes overlap");
        assert!((c.penetration - 0.3).abs() < 1e-9);
        assert_vec_eq(c.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_circle_outside_box_normal_points_first_to_second() {
        let rect = Body::rect(1.0, 0.0, 0.0, 2.0, 2.0);
        let circle = Body::circle(1.0, 1.3, 0.0, 0.5);

        let c = contact(&rect, &circle).expect("overlap");
        assert!((c.penetration - 0.2).abs() < 1e-9);
        assert_vec_eq(c.normal, Vec2::new(1.0, 0.0));

        let c = contact(&circle, &rect).expect("overlap");
        assert!((c.penetration - 0.2).abs() < 1e-9);
        assert_vec_eq(c.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_circle_center_inside_box_pushes_through_nearest_edge() {
        let rect = Body::rect(1.0, 0.0, 0.0, 2.0, 2.0);
        // 0.1 from the top edge, far from the sides
        let circle = Body::circle(1.0, 0.2, 0.9, 0.3);

        let c = contact(&rect, &circle).expect("circle inside box");
        assert!((c.penetration - 0.4).abs() < 1e-9);
        assert_vec_eq(c.normal, Vec2::new(0.0, 1.0));

        let c = contact(&circle, &rect).expect("circle inside box");
        assert_vec_eq(c.normal, Vec2::new(0.0, -1.0));

        // Nearest edge on the left
        let circle = Body::circle(1.0, -0.95, 0.0, 0.3);
        let c = contact(&rect, &circle).expect("circle inside box");
        assert!((c.penetration - 0.35).abs() < 1e-9);
        assert_vec_eq(c.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_separated_pairs_report_non_positive_penetration() {
        let a = Body::circle(1.0, 0.0, 0.0, 0.5);
        let b = Body::circle(1.0, 2.0, 0.0, 0.5);
        assert!(penetration(&a, &b) < 0.0);

        let r1 = Body::rect(1.0, 0.0, 0.0, 1.0, 1.0);
        let r2 = Body::rect(1.0, 3.0, 0.0, 1.0, 1.0);
        assert!(penetration(&r1, &r2) <= 0.0);

        let circle = Body::circle(1.0, 0.0, 5.0, 0.5);
        assert!(penetration(&circle, &r1) <= 0.0);
    }
}
