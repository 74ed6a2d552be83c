use crate::common::PhysicsConfig;
use crate::objects::rigid_body::{BodyType, RigidBody};

/// Integrates the rigid body's state forward in time using Semi-Implicit Euler.
///
/// Pending impulses (`impulse * unit * inverse_mass * dt`) and gravity change the velocity
/// first, then the transform moves by `velocity * unit * dt`. Shapes are not refreshed here.
pub fn integrate(body: &mut RigidBody, config: &PhysicsConfig, dt: f64) {
    if body.body_type() == BodyType::Static {
        body.take_impulse();
        return;
    }

    // --- Linear Motion --- //
    let impulse = body.take_impulse();
    let inv_mass = body.inverse_mass();
    if inv_mass > 0.0 {
        body.linear_velocity += impulse * config.unit * inv_mass * dt;
        if body.use_gravity {
            body.linear_velocity += config.gravity * dt;
        }
    }
    body.transform.position += body.linear_velocity * config.unit * dt;

    // --- Angular Motion --- //
    if body.use_rotation && body.angular_velocity != 0.0 {
        body.transform.rotation = wrap_angle(body.transform.rotation + body.angular_velocity * dt);
    }
}

/// Wraps an angle in radians to the range [-PI, PI].
pub fn wrap_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}
