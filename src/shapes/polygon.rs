use crate::collision::AABB;
use crate::common::PhysicsError;
use crate::math::{Transform, Vec2};

/// Represents a convex polygon collider defined by its vertices in local space.
/// Vertices may be wound either way, as long as it is consistent.
///
/// World vertices, center and bounding box are only meaningful right after
/// [`Polygon::refresh`].
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    /// Local offset applied before scale and rotation.
    pub offset: Vec2,
    signed_area: f64,
    world_vertices: Vec<Vec2>,
    world_center: Vec2,
    bounding_box: AABB,
}

impl Polygon {
    /// Creates a new polygon from a vector of vertices. Convexity is not checked.
    pub fn new(vertices: Vec<Vec2>, offset: Vec2) -> Result<Self, PhysicsError> {
        if vertices.len() < 3 {
            return Err(PhysicsError::TooFewVertices(vertices.len()));
        }
        if let Some(bad) = vertices.iter().find(|v| !v.is_finite()) {
            return Err(PhysicsError::NonFiniteVertex(bad.x, bad.y));
        }
        let signed_area = Self::calculate_signed_area(&vertices);
        let mut polygon = Polygon {
            world_vertices: vertices.clone(),
            vertices,
            offset,
            signed_area,
            world_center: Vec2::ZERO,
            bounding_box: AABB::point(offset),
        };
        polygon.refresh(&Transform::identity());
        Ok(polygon)
    }

    /// An axis-aligned `width` x `height` rectangle centred on `offset`.
    pub fn new_box(width: f64, height: f64, offset: Vec2) -> Result<Self, PhysicsError> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(PhysicsError::InvalidBoxSize { width, height });
        }
        let hw = width * 0.5;
        let hh = height * 0.5;
        Polygon::new(
            vec![
                Vec2::new(-hw, -hh),
                Vec2::new(hw, -hh),
                Vec2::new(hw, hh),
                Vec2::new(-hw, hh),
            ],
            offset,
        )
    }

    /// Calculates the signed area of the polygon using the Shoelace formula.
    /// Positive for counter-clockwise winding in a y-up frame.
    pub fn calculate_signed_area(vertices: &[Vec2]) -> f64 {
        let n = vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            area += vertices[i].cross(vertices[(i + 1) % n]);
        }
        area / 2.0
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn signed_area(&self) -> f64 {
        self.signed_area
    }

    pub fn area(&self) -> f64 {
        self.signed_area.abs()
    }

    /// Replaces one local vertex and recomputes the area.
    pub fn set_vertex(&mut self, index: usize, vertex: Vec2) {
        if let Some(slot) = self.vertices.get_mut(index) {
            *slot = vertex;
            self.signed_area = Self::calculate_signed_area(&self.vertices);
        }
    }

    /// Transforms every local vertex by offset, scale and rotation about the owner's
    /// position, computing world vertices, bounding box and centroid in the same pass.
    pub fn refresh(&mut self, transform: &Transform) {
        let mut min = Vec2::splat(f64::INFINITY);
        let mut max = Vec2::splat(f64::NEG_INFINITY);
        let mut sum = Vec2::ZERO;

        for (world, local) in self.world_vertices.iter_mut().zip(&self.vertices) {
            *world = transform.apply(*local + self.offset);
            min.x = min.x.min(world.x);
            min.y = min.y.min(world.y);
            max.x = max.x.max(world.x);
            max.y = max.y.max(world.y);
            sum += *world;
        }

        self.bounding_box = AABB { min, max };
        self.world_center = sum / self.vertices.len() as f64;
    }

    pub fn world_vertices(&self) -> &[Vec2] {
        &self.world_vertices
    }

    /// Arithmetic mean of the world vertices.
    pub fn world_center(&self) -> Vec2 {
        self.world_center
    }

    pub fn bounding_box(&self) -> AABB {
        self.bounding_box
    }
}
