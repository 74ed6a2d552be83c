//! Tunables for the simulation.

use tracing::warn;

use super::error::ConfigError;
use crate::math::vec2::Vec2;

pub const DEFAULT_GRID_CELL_SIZE: f64 = 400.0;
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;
pub const DEFAULT_UNIT: f64 = 16.0;
pub const DEFAULT_TARGET_FRAME_DELAY: f64 = 1.0 / 60.0;

/// Configuration for the physics simulation.
///
/// Owned by [`PhysicsWorld`](crate::world::PhysicsWorld) and passed by reference into
/// every body step.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Acceleration applied to bodies with gravity enabled, in physics units/s².
    /// Default: (0, 9.8), y pointing down the screen.
    pub gravity: Vec2,
    /// World units per physics unit. Integrated displacement is `velocity * unit * dt`.
    /// Default: 16.
    pub unit: f64,
    /// Maximum number of solver iterations per frame. Default: 5.
    pub max_iterations: u32,
    /// Target frame time in seconds. Default: 1/60.
    pub target_frame_delay: f64,
    /// Edge length of a broad-phase grid cell in world units. Default: 400.
    pub grid_cell_size: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 9.8),
            unit: DEFAULT_UNIT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            target_frame_delay: DEFAULT_TARGET_FRAME_DELAY,
            grid_cell_size: DEFAULT_GRID_CELL_SIZE,
        }
    }
}

impl PhysicsConfig {
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_unit(mut self, unit: f64) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_target_frame_delay(mut self, delay: f64) -> Self {
        self.target_frame_delay = delay;
        self
    }

    pub fn with_grid_cell_size(mut self, cell_size: f64) -> Self {
        self.grid_cell_size = cell_size;
        self
    }

    /// Checks every field, reporting the first unusable one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_cell_size > 0.0 && self.grid_cell_size.is_finite()) {
            return Err(ConfigError::InvalidCellSize(self.grid_cell_size));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !(self.target_frame_delay > 0.0 && self.target_frame_delay.is_finite()) {
            return Err(ConfigError::InvalidFrameDelay(self.target_frame_delay));
        }
        if !(self.unit > 0.0 && self.unit.is_finite()) {
            return Err(ConfigError::InvalidUnit(self.unit));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFiniteGravity(self.gravity.x, self.gravity.y));
        }
        Ok(())
    }

    /// Returns a copy where every unusable field is replaced by its default.
    pub fn sanitized(mut self) -> Self {
        let defaults = PhysicsConfig::default();

        if !(self.grid_cell_size > 0.0 && self.grid_cell_size.is_finite()) {
            warn!(cell_size = self.grid_cell_size, "invalid grid cell size, using default");
            self.grid_cell_size = defaults.grid_cell_size;
        }
        if self.max_iterations == 0 {
            warn!("max iterations is zero, using default");
            self.max_iterations = defaults.max_iterations;
        }
        if !(self.target_frame_delay > 0.0 && self.target_frame_delay.is_finite()) {
            warn!(delay = self.target_frame_delay, "invalid target frame delay, using default");
            self.target_frame_delay = defaults.target_frame_delay;
        }
        if !(self.unit > 0.0 && self.unit.is_finite()) {
            warn!(unit = self.unit, "invalid unit scale, using default");
            self.unit = defaults.unit;
        }
        if !self.gravity.is_finite() {
            warn!(gravity = ?self.gravity, "non-finite gravity, using default");
            self.gravity = defaults.gravity;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PhysicsConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.grid_cell_size, 400.0);
        assert_eq!(config.max_iterations, 5);
    }

    #[test]
    fn test_validate_reports_bad_cell_size() {
        let config = PhysicsConfig::default().with_grid_cell_size(0.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidCellSize(0.0)));
    }

    #[test]
    fn test_validate_reports_zero_iterations() {
        let config = PhysicsConfig::default().with_max_iterations(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroIterations));
    }

    #[test]
    fn test_sanitized_falls_back_per_field() {
        let config = PhysicsConfig::default()
            .with_grid_cell_size(-5.0)
            .with_unit(f64::NAN)
            .with_gravity(Vec2::new(0.0, -20.0))
            .sanitized();
        assert_eq!(config.grid_cell_size, DEFAULT_GRID_CELL_SIZE);
        assert_eq!(config.unit, DEFAULT_UNIT);
        // Valid fields survive
        assert_eq!(config.gravity, Vec2::new(0.0, -20.0));
        assert_eq!(config.validate(), Ok(()));
    }
}
