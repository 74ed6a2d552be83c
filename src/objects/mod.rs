pub mod contact_handler;
pub mod rigid_body;

pub use contact_handler::ContactHandler;
pub use rigid_body::{BodyType, RigidBody};
