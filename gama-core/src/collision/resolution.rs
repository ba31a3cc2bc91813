//! Collision resolution.
//!
//! Single-pass impulse response followed by positional correction:
//!
//! 1. Measure penetration and normal (the resolver owns this geometry)
//! 2. Skip pairs that are not overlapping or already separating
//! 3. Apply the impulse `j = -(1 + e) * v_rel·n / (1/m_a + 1/m_b)`
//! 4. Push both bodies apart by a fraction of the penetration beyond the slop
//!
//! ## Model Assumptions
//!
//! - **No rotation**: bodies have no angular state, so the impulse acts on the
//!   center of mass only.
//! - **Less bouncy body wins**: `e = min(e_a, e_b)`.
//! - **Immovable bodies**: static or non-positive-mass bodies have zero inverse
//!   mass and are never touched.
//!
//! ```text
//!   a ●──►  ◄──● b        n points a → b
//!        overlap          a gets -j·n/m_a, b gets +j·n/m_b
//! ```

use super::detection::{measure, Contact};
use crate::types::{constants, Body, Collision};

/// Impulse-based collision resolver.
pub struct CollisionResolver;

impl CollisionResolver {
    /// Resolve the contact between `a` and `b`, if any.
    ///
    /// Returns the contact geometry used for the response, or `None` when the
    /// pair does not overlap (in which case neither body is modified).
    pub fn resolve(a: &mut Body, b: &mut Body) -> Option<Contact> {
        let (penetration, normal) = measure(a, b);
        let normal = normal.filter(|_| penetration > 0.0)?;
        let contact = Contact {
            penetration,
            normal,
        };
        Self::apply(a, b, &contact);
        Some(contact)
    }

    /// Resolve and record the final penetration and normal on `collision`.
    ///
    /// `a` and `b` must be the bodies of `collision.bodies`, in that order.
    pub fn resolve_record(collision: &mut Collision, a: &mut Body, b: &mut Body) {
        let (penetration, normal) = measure(a, b);
        collision.penetration = penetration;
        let Some(normal) = normal else {
            return;
        };
        collision.normal = normal;

        if penetration > 0.0 {
            let contact = Contact {
                penetration,
                normal,
            };
            Self::apply(a, b, &contact);
        }
    }

    /// Apply impulse and positional correction for a known contact.
    ///
    /// Returns `false` when nothing could be resolved (separating pair or two
    /// immovable bodies).
    pub fn apply(a: &mut Body, b: &mut Body, contact: &Contact) -> bool {
        let normal = contact.normal;

        // === Velocity ===
        let relative = b.velocity - a.velocity;
        let vel_along_normal = relative.dot(&normal);

        // Separating: do not add energy
        if vel_along_normal > 0.0 {
            return false;
        }

        let inv_mass_a = a.inverse_mass();
        let inv_mass_b = b.inverse_mass();
        let inv_mass_sum = inv_mass_a + inv_mass_b;
        if inv_mass_sum == 0.0 {
            return false;
        }

        let restitution = a.restitution.min(b.restitution);
        let j = -(1.0 + restitution) * vel_along_normal / inv_mass_sum;
        let impulse = normal * j;

        if inv_mass_a > 0.0 {
            a.velocity -= impulse * inv_mass_a;
        }
        if inv_mass_b > 0.0 {
            b.velocity += impulse * inv_mass_b;
        }

        // === Positional correction ===
        let correction_amount = (contact.penetration - constants::CORRECTION_SLOP).max(0.0)
            / inv_mass_sum
            * constants::CORRECTION_PERCENT;
        let correction = normal * correction_amount;

        if inv_mass_a > 0.0 {
            a.position -= correction * inv_mass_a;
        }
        if inv_mass_b > 0.0 {
            b.position += correction * inv_mass_b;
        }

        true
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BodyHandle, Vec2};

    fn approaching_circles(restitution: f64) -> (Body, Body) {
        let mut a = Body::circle(1.0, -0.4, 0.0, 0.5);
        let mut b = Body::circle(1.0, 0.4, 0.0, 0.5);
        a.velocity = Vec2::new(0.5, 0.0);
        b.velocity = Vec2::new(-0.5, 0.0);
        a.restitution = restitution;
        b.restitution = restitution;
        (a, b)
    }

    #[test]
    fn test_elastic_equal_masses_exchange_velocities() {
        let (mut a, mut b) = approaching_circles(1.0);

        let contact = CollisionResolver::resolve(&mut a, &mut b).expect("overlapping");
        assert!((contact.penetration - 0.2).abs() < 1e-9);

        assert!((a.velocity.x + 0.5).abs() < 1e-9, "a.vx = {}", a.velocity.x);
        assert!((b.velocity.x - 0.5).abs() < 1e-9, "b.vx = {}", b.velocity.x);
        assert!(a.velocity.y.abs() < 1e-12 && b.velocity.y.abs() < 1e-12);
    }

    #[test]
    fn test_inelastic_collision_stops_both() {
        let (mut a, mut b) = approaching_circles(0.0);
        b.restitution = 1.0; // min() wins

        CollisionResolver::resolve(&mut a, &mut b);
        assert!(a.velocity.x.abs() < 1e-9);
        assert!(b.velocity.x.abs() < 1e-9);
    }

    #[test]
    fn test_positional_correction_splits_by_inverse_mass() {
        let (mut a, mut b) = approaching_circles(1.0);

        CollisionResolver::resolve(&mut a, &mut b);

        // (0.2 - 0.01) / 2 * 0.2 = 0.019, each body moves 0.019
        assert!((a.position.x - (-0.4 - 0.019)).abs() < 1e-9);
        assert!((b.position.x - (0.4 + 0.019)).abs() < 1e-9);
    }

    #[test]
    fn test_static_body_is_never_moved() {
        let mut wall = Body::rect(0.0, 0.0, 0.0, 2.0, 2.0);
        let mut ball = Body::circle(1.0, 1.3, 0.0, 0.5);
        ball.velocity = Vec2::new(-2.0, 0.0);

        let before = wall;
        CollisionResolver::resolve(&mut wall, &mut ball).expect("overlapping");
        assert_eq!(wall, before);
        assert!(ball.velocity.x > 0.0, "ball should bounce off the wall");

        // Same with the static flag and a positive mass
        let mut wall = Body::rect(5.0, 0.0, 0.0, 2.0, 2.0);
        wall.is_static = true;
        let mut ball = Body::circle(1.0, 1.3, 0.0, 0.5);
        ball.velocity = Vec2::new(-2.0, 0.0);

        let before = wall;
        CollisionResolver::resolve(&mut ball, &mut wall).expect("overlapping");
        assert_eq!(wall, before);
        assert!((ball.velocity.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_overlapping_pair_is_untouched() {
        let mut a = Body::circle(1.0, 0.0, 0.0, 0.5);
        let mut b = Body::circle(1.0, 3.0, 0.0, 0.5);
        a.velocity = Vec2::new(1.0, 0.0);
        b.velocity = Vec2::new(-1.0, 0.0);
        let (before_a, before_b) = (a, b);

        assert!(CollisionResolver::resolve(&mut a, &mut b).is_none());
        assert_eq!(a, before_a);
        assert_eq!(b, before_b);
    }

    #[test]
    fn test_separating_pair_is_untouched() {
        let mut a = Body::circle(1.0, -0.4, 0.0, 0.5);
        let mut b = Body::circle(1.0, 0.4, 0.0, 0.5);
        a.velocity = Vec2::new(-1.0, 0.0);
        b.velocity = Vec2::new(1.0, 0.0);
        let (before_a, before_b) = (a, b);

        CollisionResolver::resolve(&mut a, &mut b);
        assert_eq!(a, before_a);
        assert_eq!(b, before_b);
    }

    #[test]
    fn test_two_static_bodies_are_skipped() {
        let mut a = Body::rect(0.0, 0.0, 0.0, 1.0, 1.0);
        let mut b = Body::rect(0.0, 0.5, 0.0, 1.0, 1.0);
        let (before_a, before_b) = (a, b);

        let contact = CollisionResolver::resolve(&mut a, &mut b);
        assert!(contact.is_some());
        assert_eq!(a, before_a);
        assert_eq!(b, before_b);
    }

    #[test]
    fn test_resolve_record_fills_geometry() {
        let (mut a, mut b) = approaching_circles(1.0);
        let mut record = Collision::new(BodyHandle(0), BodyHandle(1));

        CollisionResolver::resolve_record(&mut record, &mut a, &mut b);

        assert!((record.penetration - 0.2).abs() < 1e-9);
        assert_eq!(record.normal, Vec2::new(1.0, 0.0));
        assert_eq!(record.since, 0.0);
        assert!((a.velocity.x + 0.5).abs() < 1e-9);
    }
}
