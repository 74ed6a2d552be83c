pub mod circle;
pub mod polygon;

pub use circle::Circle;
pub use polygon::Polygon;

use crate::collision::AABB;
use crate::math::{Transform, Vec2};

/// Collider geometry owned by a rigid body.
///
/// A closed set: the narrow phase dispatches on the variant pair with a single match.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
}

impl Shape {
    /// Local area, independent of the owner's scale.
    pub fn area(&self) -> f64 {
        match self {
            Shape::Circle(circle) => circle.area(),
            Shape::Polygon(polygon) => polygon.area(),
        }
    }

    pub fn offset(&self) -> Vec2 {
        match self {
            Shape::Circle(circle) => circle.offset,
            Shape::Polygon(polygon) => polygon.offset,
        }
    }

    /// Recomputes the cached world geometry against the owner's transform.
    pub fn refresh(&mut self, transform: &Transform) {
        match self {
            Shape::Circle(circle) => circle.refresh(transform),
            Shape::Polygon(polygon) => polygon.refresh(transform),
        }
    }

    /// World center as of the last refresh.
    pub fn center(&self) -> Vec2 {
        match self {
            Shape::Circle(circle) => circle.world_center(),
            Shape::Polygon(polygon) => polygon.world_center(),
        }
    }

    /// Distance from `origin` to the farthest point of the world geometry.
    pub fn extent_from(&self, origin: Vec2) -> f64 {
        match self {
            Shape::Circle(circle) => circle.world_center().distance(origin) + circle.world_radius(),
            Shape::Polygon(polygon) => polygon
                .world_vertices()
                .iter()
                .map(|v| v.distance(origin))
                .fold(0.0, f64::max),
        }
    }

    /// World bounding box as of the last refresh.
    pub fn bounding_box(&self) -> AABB {
        match self {
            Shape::Circle(circle) => circle.bounding_box(),
            Shape::Polygon(polygon) => polygon.bounding_box(),
        }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon(polygon)
    }
}
