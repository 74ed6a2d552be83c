//! Turns a detected overlap into position and velocity changes.

use crate::collision::CollisionResult;
use crate::math::vec2::Vec2;
use crate::objects::rigid_body::{BodyType, RigidBody};

/// Corrects penetration, then applies restitution and friction impulses.
///
/// `result.direction` must point from `a` toward `b`. Triggers are never passed here.
pub fn resolve(a: &mut RigidBody, b: &mut RigidBody, result: &CollisionResult) {
    apply_positional_correction(a, b, result);
    apply_collision_impulse(a, b, result);
}

/// Pushes the bodies apart along the contact direction by the full depth.
/// Only Normal bodies move; two Normal bodies split the depth evenly.
pub fn apply_positional_correction(a: &mut RigidBody, b: &mut RigidBody, result: &CollisionResult) {
    let correction = result.direction * result.depth;
    match (a.body_type(), b.body_type()) {
        (BodyType::Normal, BodyType::Normal) => {
            a.transform.position -= correction * 0.5;
            b.transform.position += correction * 0.5;
        }
        (BodyType::Normal, BodyType::Static) => a.transform.position -= correction,
        (BodyType::Static, BodyType::Normal) => b.transform.position += correction,
        _ => {}
    }
}

/// Restitution and Coulomb friction impulses at each contact point.
///
/// Every contact's impulse is computed from the same velocities and split evenly
/// between contacts, then all of them are applied. Friction follows the same pattern
/// on the post-restitution velocities.
pub fn apply_collision_impulse(a: &mut RigidBody, b: &mut RigidBody, result: &CollisionResult) {
    let material = a.material().combine(b.material());
    let normal = result.direction;

    let midpoint = (a.transform.position + b.transform.position) * 0.5;
    let contacts: &[Vec2] = if result.contacts().is_empty() {
        std::slice::from_ref(&midpoint)
    } else {
        result.contacts()
    };
    let share = 1.0 / contacts.len() as f64;

    // (lever a, lever b, normal impulse magnitude) per contact, zero when skipped
    let mut arms = [(Vec2::ZERO, Vec2::ZERO, 0.0); 2];

    // --- Normal impulse ---
    for (&contact, arm) in contacts.iter().zip(arms.iter_mut()) {
        let r_a = contact - a.transform.position;
        let r_b = contact - b.transform.position;
        *arm = (r_a, r_b, 0.0);

        let relative_velocity = b.velocity_at(contact) - a.velocity_at(contact);
        let velocity_along_normal = relative_velocity.dot(normal);
        if velocity_along_normal > 0.0 {
            continue;
        }
        let effective_mass = effective_mass(a, b, r_a, r_b, normal);
        if effective_mass <= 0.0 {
            continue;
        }
        arm.2 = -(1.0 + material.bounciness) * velocity_along_normal / effective_mass * share;
    }
    for &(r_a, r_b, j) in arms.iter().take(contacts.len()) {
        if j != 0.0 {
            apply_impulse(a, b, normal * j, r_a, r_b);
        }
    }

    // --- Friction ---
    let mut frictions = [Vec2::ZERO; 2];
    for ((&contact, &(r_a, r_b, j)), friction) in contacts.iter().zip(&arms).zip(frictions.iter_mut()) {
        if j == 0.0 {
            continue;
        }
        let relative_velocity = b.velocity_at(contact) - a.velocity_at(contact);
        let tangent = relative_velocity - normal * relative_velocity.dot(normal);
        if tangent.magnitude_squared() < 1e-12 {
            continue;
        }
        let tangent = tangent.normalize();
        let effective_mass = effective_mass(a, b, r_a, r_b, tangent);
        if effective_mass <= 0.0 {
            continue;
        }

        let jt = -relative_velocity.dot(tangent) / effective_mass * share;
        *friction = if jt.abs() <= j * material.static_friction {
            tangent * jt
        } else {
            tangent * (-j * material.dynamic_friction)
        };
    }
    for (&(r_a, r_b, _), &friction) in arms.iter().zip(&frictions).take(contacts.len()) {
        if friction != Vec2::ZERO {
            apply_impulse(a, b, friction, r_a, r_b);
        }
    }
}

/// Inverse of the pair's effective mass along `axis` at the given lever arms.
fn effective_mass(a: &RigidBody, b: &RigidBody, r_a: Vec2, r_b: Vec2, axis: Vec2) -> f64 {
    let ra_cross = r_a.cross(axis);
    let rb_cross = r_b.cross(axis);
    a.inverse_mass()
        + b.inverse_mass()
        + ra_cross * ra_cross * a.inverse_inertia()
        + rb_cross * rb_cross * b.inverse_inertia()
}

/// Applies `-impulse` to `a` and `+impulse` to `b` at the given lever arms.
fn apply_impulse(a: &mut RigidBody, b: &mut RigidBody, impulse: Vec2, r_a: Vec2, r_b: Vec2) {
    a.linear_velocity -= impulse * a.inverse_mass();
    b.linear_velocity += impulse * b.inverse_mass();
    if a.use_rotation {
        a.angular_velocity -= r_a.cross(impulse) * a.inverse_inertia();
    }
    if b.use_rotation {
        b.angular_velocity += r_b.cross(impulse) * b.inverse_inertia();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::detection;
    use crate::common::Material;
    const EPSILON: f64 = 1e-9;

    fn circle_body(body_type: BodyType, material: Material, position: Vec2, radius: f64) -> RigidBody {
        let mut body = RigidBody::new(body_type, material).at(position);
        body.add_circle(radius, Vec2::ZERO).unwrap();
        body.update_shapes();
        body
    }

    #[test]
    fn test_head_on_circles() {
        let material = Material::new(1.0, 0.5, 0.0, 0.0);
        let mut a = circle_body(BodyType::Normal, material, Vec2::new(0.0, 0.0), 10.0);
        let mut b = circle_body(BodyType::Normal, material, Vec2::new(15.0, 0.0), 10.0);
        a.linear_velocity = Vec2::new(5.0, 0.0);
        b.linear_velocity = Vec2::new(-5.0, 0.0);

        let result = detection::intersects_bodies(&a, &b);
        assert!((result.depth - 5.0).abs() < EPSILON);
        assert!((result.direction - Vec2::new(1.0, 0.0)).magnitude() < EPSILON);

        resolve(&mut a, &mut b, &result);
        let relative = (b.linear_velocity - a.linear_velocity).dot(result.direction);
        assert!((relative - 5.0).abs() < EPSILON);
        // Momentum is conserved for equal masses
        assert!((a.linear_velocity + b.linear_velocity).magnitude() < EPSILON);
        // Each body moved half the depth
        assert!((a.transform.position.x + 2.5).abs() < EPSILON);
        assert!((b.transform.position.x - 17.5).abs() < EPSILON);
        assert_eq!(a.angular_velocity, 0.0);
    }

    #[test]
    fn test_perfectly_elastic_keeps_relative_speed() {
        let material = Material::new(1.0, 1.0, 0.0, 0.0);
        let mut a = circle_body(BodyType::Normal, material, Vec2::new(0.0, 0.0), 1.0);
        let mut b = circle_body(BodyType::Normal, material, Vec2::new(1.2, 1.0), 1.0);
        a.linear_velocity = Vec2::new(3.0, 1.0);
        b.linear_velocity = Vec2::new(-2.0, 0.5);

        let result = detection::intersects_bodies(&a, &b);
        assert!(result.intersects);
        let before = (b.linear_velocity - a.linear_velocity).dot(result.direction);
        apply_collision_impulse(&mut a, &mut b, &result);
        let after = (b.linear_velocity - a.linear_velocity).dot(result.direction);
        assert!(before < 0.0);
        assert!((after.abs() - before.abs()).abs() < 1e-9);
    }

    #[test]
    fn test_separating_bodies_are_left_alone() {
        let material = Material::new(1.0, 1.0, 0.5, 0.5);
        let mut a = circle_body(BodyType::Normal, material, Vec2::new(0.0, 0.0), 1.0);
        let mut b = circle_body(BodyType::Normal, material, Vec2::new(1.5, 0.0), 1.0);
        a.linear_velocity = Vec2::new(-1.0, 0.0);
        b.linear_velocity = Vec2::new(1.0, 0.0);

        let result = detection::intersects_bodies(&a, &b);
        apply_collision_impulse(&mut a, &mut b, &result);
        assert_eq!(a.linear_velocity, Vec2::new(-1.0, 0.0));
        assert_eq!(b.linear_velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_static_body_never_moves() {
        let material = Material::new(1.0, 0.3, 0.6, 0.4);
        let mut ground = RigidBody::new(BodyType::Static, material).at(Vec2::new(0.0, 10.0));
        ground.add_box(40.0, 4.0, Vec2::ZERO).unwrap();
        ground.update_shapes();
        let mut ball = circle_body(BodyType::Normal, material, Vec2::new(0.5, 7.5), 1.0);
        ball.linear_velocity = Vec2::new(2.0, 6.0);

        let result = detection::intersects_bodies(&ball, &ground);
        assert!(result.intersects);
        let ground_before = (ground.transform, ground.linear_velocity, ground.angular_velocity);
        resolve(&mut ball, &mut ground, &result);
        assert_eq!((ground.transform, ground.linear_velocity, ground.angular_velocity), ground_before);

        // Ball was pushed out by the full depth and no longer moves into the ground
        assert!((ball.transform.position.y - 7.0).abs() < EPSILON);
        assert!(ball.linear_velocity.y <= 0.0);

        // Same when the static body comes first
        ball.transform.position.y = 7.5;
        ball.linear_velocity = Vec2::new(0.0, 6.0);
        ball.update_shapes();
        let result = detection::intersects_bodies(&ground, &ball);
        resolve(&mut ground, &mut ball, &result);
        assert_eq!((ground.transform, ground.linear_velocity, ground.angular_velocity), ground_before);
        assert!((ball.transform.position.y - 7.0).abs() < EPSILON);
    }

    #[test]
    fn test_static_friction_stops_sliding() {
        let material = Material::new(1.0, 0.0, 1.0, 1.0);
        let mut ground = RigidBody::new(BodyType::Static, material).at(Vec2::new(0.0, 10.0));
        ground.add_box(100.0, 4.0, Vec2::ZERO).unwrap();
        ground.update_shapes();
        let mut block = RigidBody::new(BodyType::Normal, material).at(Vec2::new(0.0, 7.1));
        block.add_box(2.0, 2.0, Vec2::ZERO).unwrap();
        block.use_rotation = false;
        block.update_shapes();
        block.linear_velocity = Vec2::new(0.5, 5.0);

        let result = detection::intersects_bodies(&block, &ground);
        assert!(result.intersects);
        apply_collision_impulse(&mut block, &mut ground, &result);
        assert!(block.linear_velocity.x.abs() < 1e-9);
        assert!(block.linear_velocity.y.abs() < 1e-9);
    }

    #[test]
    fn test_dynamic_friction_only_slows() {
        let material = Material::new(1.0, 0.0, 0.1, 0.1);
        let mut ground = RigidBody::new(BodyType::Static, material).at(Vec2::new(0.0, 10.0));
        ground.add_box(100.0, 4.0, Vec2::ZERO).unwrap();
        ground.update_shapes();
        let mut block = RigidBody::new(BodyType::Normal, material).at(Vec2::new(0.0, 7.1));
        block.add_box(2.0, 2.0, Vec2::ZERO).unwrap();
        block.use_rotation = false;
        block.update_shapes();
        block.linear_velocity = Vec2::new(20.0, 1.0);

        let result = detection::intersects_bodies(&block, &ground);
        apply_collision_impulse(&mut block, &mut ground, &result);
        // Normal impulse per unit mass is 1, friction removes 0.1 of it
        assert!((block.linear_velocity.x - 19.9).abs() < 1e-9);
        assert!(block.linear_velocity.y.abs() < 1e-9);
    }

    #[test]
    fn test_off_center_hit_spins() {
        let material = Material::new(1.0, 0.5, 0.0, 0.0);
        let mut ground = RigidBody::new(BodyType::Static, material).at(Vec2::new(0.0, 10.0));
        ground.add_box(100.0, 4.0, Vec2::ZERO).unwrap();
        ground.update_shapes();
        // A tilted box touching with one corner
        let mut block = RigidBody::new(BodyType::Normal, material)
            .with_transform(crate::math::Transform::new(Vec2::new(0.0, 6.8), 0.3));
        block.add_box(2.0, 2.0, Vec2::ZERO).unwrap();
        block.update_shapes();
        block.linear_velocity = Vec2::new(0.0, 4.0);

        let result = detection::intersects_bodies(&block, &ground);
        assert!(result.intersects);
        apply_collision_impulse(&mut block, &mut ground, &result);
        assert!(block.angular_velocity != 0.0);

        block.angular_velocity = 0.0;
        block.linear_velocity = Vec2::new(0.0, 4.0);
        block.use_rotation = false;
        apply_collision_impulse(&mut block, &mut ground, &result);
        assert_eq!(block.angular_velocity, 0.0);
    }
}
