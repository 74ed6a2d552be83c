pub mod handle;
pub mod physics_world;
pub mod resolver;

pub use handle::BodyHandle;
pub use physics_world::PhysicsWorld;
