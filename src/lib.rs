//! A 2D rigid-body physics core: circle and convex polygon shapes, a hashed-grid
//! broad phase, SAT narrow phase, impulse resolution with friction, and a grid ray caster.
//!
//! The [`PhysicsWorld`] owns bodies and steps them once per frame:
//!
//! ```
//! use physics2d::{BodyType, Material, PhysicsConfig, PhysicsWorld, RigidBody, Vec2};
//!
//! let mut world = PhysicsWorld::new(PhysicsConfig::default());
//!
//! let mut floor = RigidBody::new(BodyType::Static, Material::default()).at(Vec2::new(0.0, 200.0));
//! floor.add_box(400.0, 20.0, Vec2::ZERO).unwrap();
//! world.add_body(floor);
//!
//! let mut ball = RigidBody::new(BodyType::Normal, Material::default());
//! ball.add_circle(10.0, Vec2::ZERO).unwrap();
//! let ball = world.add_body(ball);
//!
//! world.step(1.0 / 60.0);
//! assert!(world.body(ball).unwrap().transform.position.y > 0.0);
//! ```

pub mod collision;
pub mod common;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{CollisionResult, RayCaster, SpatialGrid, AABB};
pub use common::{ConfigError, Material, PhysicsConfig, PhysicsError};
pub use math::{Transform, Vec2};
pub use objects::{BodyType, ContactHandler, RigidBody};
pub use shapes::{Circle, Polygon, Shape};
pub use world::{BodyHandle, PhysicsWorld};
