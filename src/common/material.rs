//! Defines physical material properties.

/// Smallest density a material can have.
pub const MIN_DENSITY: f64 = 0.5;

/// Represents the physical properties of a rigid body affecting mass and collisions.
///
/// Values are clamped on the way in, so a `Material` is always in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    density: f64,
    bounciness: f64,
    static_friction: f64,
    dynamic_friction: f64,
}

/// The material of a colliding pair, each coefficient averaged between both bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairMaterial {
    pub bounciness: f64,
    pub static_friction: f64,
    pub dynamic_friction: f64,
}

impl Material {
    /// Creates a new material.
    ///
    /// Density is clamped to at least [`MIN_DENSITY`]; bounciness and both frictions to `[0, 1]`.
    pub fn new(density: f64, bounciness: f64, static_friction: f64, dynamic_friction: f64) -> Self {
        Material {
            density: clamp_density(density),
            bounciness: clamp_unit(bounciness),
            static_friction: clamp_unit(static_friction),
            dynamic_friction: clamp_unit(dynamic_friction),
        }
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Coefficient of restitution. 0 = no bounce, 1 = perfectly elastic.
    pub fn bounciness(&self) -> f64 {
        self.bounciness
    }

    /// Friction used while the contact is not sliding.
    pub fn static_friction(&self) -> f64 {
        self.static_friction
    }

    /// Friction used once the contact slides.
    pub fn dynamic_friction(&self) -> f64 {
        self.dynamic_friction
    }

    pub fn set_density(&mut self, density: f64) {
        self.density = clamp_density(density);
    }

    pub fn set_bounciness(&mut self, bounciness: f64) {
        self.bounciness = clamp_unit(bounciness);
    }

    pub fn set_static_friction(&mut self, friction: f64) {
        self.static_friction = clamp_unit(friction);
    }

    pub fn set_dynamic_friction(&mut self, friction: f64) {
        self.dynamic_friction = clamp_unit(friction);
    }

    /// Combines two materials for a contact by averaging their coefficients.
    pub fn combine(&self, other: &Material) -> PairMaterial {
        PairMaterial {
            bounciness: (self.bounciness + other.bounciness) * 0.5,
            static_friction: (self.static_friction + other.static_friction) * 0.5,
            dynamic_friction: (self.dynamic_friction + other.dynamic_friction) * 0.5,
        }
    }
}

impl Default for Material {
    /// Density 0.5, bounciness 0.5, static friction 0.6, dynamic friction 0.4.
    fn default() -> Self {
        Material::new(0.5, 0.5, 0.6, 0.4)
    }
}

fn clamp_density(density: f64) -> f64 {
    // NaN falls through max() as MIN_DENSITY
    density.max(MIN_DENSITY)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_material_clamps_inputs() {
        let m = Material::new(0.1, 1.5, -0.2, 2.0);
        assert_eq!(m.density(), MIN_DENSITY);
        assert_eq!(m.bounciness(), 1.0);
        assert_eq!(m.static_friction(), 0.0);
        assert_eq!(m.dynamic_friction(), 1.0);
    }

    #[test]
    fn test_material_setters_clamp() {
        let mut m = Material::default();
        m.set_density(-3.0);
        m.set_bounciness(f64::NAN);
        m.set_static_friction(0.25);
        assert_eq!(m.density(), MIN_DENSITY);
        assert_eq!(m.bounciness(), 0.0);
        assert_eq!(m.static_friction(), 0.25);
    }

    #[test]
    fn test_material_default() {
        let m = Material::default();
        assert_eq!(m.density(), 0.5);
        assert_eq!(m.bounciness(), 0.5);
        assert_eq!(m.static_friction(), 0.6);
        assert_eq!(m.dynamic_friction(), 0.4);
    }

    #[test]
    fn test_material_combine_averages() {
        let a = Material::new(1.0, 0.2, 0.4, 0.0);
        let b = Material::new(3.0, 0.6, 0.8, 1.0);
        let pair = a.combine(&b);
        assert!((pair.bounciness - 0.4).abs() < EPSILON);
        assert!((pair.static_friction - 0.6).abs() < EPSILON);
        assert!((pair.dynamic_friction - 0.5).abs() < EPSILON);
        assert_eq!(pair, b.combine(&a));
    }
}
