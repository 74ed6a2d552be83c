pub mod config;
pub mod error;
pub mod material;

pub use config::PhysicsConfig;
pub use error::{ConfigError, PhysicsError};
pub use material::{Material, PairMaterial};
