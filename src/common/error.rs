//! Error types for setup-time operations.
//!
//! The per-frame pipeline never returns these; they only come out of construction,
//! shape building and handle lookups.

use thiserror::Error;

use crate::world::BodyHandle;

/// A [`PhysicsConfig`](super::PhysicsConfig) value that cannot be used as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),
    #[error("max iterations must be at least 1")]
    ZeroIterations,
    #[error("target frame delay must be positive and finite, got {0}")]
    InvalidFrameDelay(f64),
    #[error("unit scale must be positive and finite, got {0}")]
    InvalidUnit(f64),
    #[error("gravity must be finite, got ({0}, {1})")]
    NonFiniteGravity(f64, f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("no body registered for {0:?}")]
    UnknownBody(BodyHandle),
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("circle radius must be non-negative and finite, got {0}")]
    InvalidRadius(f64),
    #[error("box extents must be positive and finite, got {width}x{height}")]
    InvalidBoxSize { width: f64, height: f64 },
    #[error("non-finite vertex ({0}, {1})")]
    NonFiniteVertex(f64, f64),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
