pub mod aabb;
pub mod detection;
pub mod raycast;
pub mod result;
pub mod spatial_grid;

// Re-export key types
pub use aabb::AABB;
pub use detection::{intersects, intersects_bodies};
pub use raycast::{cast, RayCaster};
pub use result::CollisionResult;
pub use spatial_grid::{CellCoords, GridMembership, SpatialGrid};
