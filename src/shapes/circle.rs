use crate::collision::AABB;
use crate::common::PhysicsError;
use crate::math::{Transform, Vec2};

/// A circular collider.
///
/// `world_*` fields are only meaningful right after [`Circle::refresh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    radius: f64,
    /// Local offset from the owner's position, scaled but never rotated.
    pub offset: Vec2,
    world_radius: f64,
    world_center: Vec2,
    bounding_box: AABB,
}

impl Circle {
    pub fn new(radius: f64, offset: Vec2) -> Result<Self, PhysicsError> {
        if !(radius >= 0.0 && radius.is_finite()) {
            return Err(PhysicsError::InvalidRadius(radius));
        }
        let mut circle = Self {
            radius,
            offset,
            world_radius: radius,
            world_center: offset,
            bounding_box: AABB::point(offset),
        };
        circle.refresh(&Transform::identity());
        Ok(circle)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    /// Recomputes world radius, center and bounding box against the owner's transform.
    pub fn refresh(&mut self, transform: &Transform) {
        self.world_radius = self.radius * transform.scale.max_element();
        self.world_center = transform.position + self.offset.scale(transform.scale);
        self.bounding_box = AABB::from_center(self.world_center, Vec2::splat(self.world_radius));
    }

    pub fn world_radius(&self) -> f64 {
        self.world_radius
    }

    pub fn world_center(&self) -> Vec2 {
        self.world_center
    }

    pub fn bounding_box(&self) -> AABB {
        self.bounding_box
    }
}
