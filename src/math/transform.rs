use super::vec2::Vec2;

/// Position, rotation and scale of a body in world space.
///
/// Rendering and tile-map collision read this after a physics step; physics writes
/// position and rotation back during integration and correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f64, // Angle in radians
    pub scale: Vec2,
}

impl Transform {
    /// Creates a new transform with unit scale.
    pub fn new(position: Vec2, rotation: f64) -> Self {
        Self {
            position,
            rotation,
            scale: Vec2::ONE,
        }
    }

    /// Creates a new transform with an explicit scale.
    pub fn with_scale(position: Vec2, rotation: f64, scale: Vec2) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Creates an identity transform (no translation, no rotation, unit scale).
    pub fn identity() -> Self {
        Self::new(Vec2::ZERO, 0.0)
    }

    /// Applies the transform to a local point: scale, then rotate, then translate.
    pub fn apply(self, point: Vec2) -> Vec2 {
        point.scale(self.scale).rotate(self.rotation) + self.position
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
