use crate::collision::CollisionResult;

/// Gameplay reaction to contacts, attached to a [`RigidBody`](super::RigidBody).
///
/// The result passed in is always from the receiving body's point of view:
/// `result.body` is the receiver and `result.direction` points toward `result.other`.
pub trait ContactHandler {
    /// Called when this body touches a solid body.
    /// Returning `false` skips position correction and impulses for the pair this time.
    fn colliding(&mut self, _result: &CollisionResult) -> bool {
        true
    }

    /// Called when this body overlaps a trigger, or when this trigger is overlapped.
    /// Never leads to resolution.
    fn triggering(&mut self, _result: &CollisionResult) {}
}
