use crate::math::vec2::Vec2;
use crate::world::BodyHandle;

/// Outcome of one narrow-phase test between two shapes.
///
/// `direction` is the unit minimum-translation axis and points from `body`
/// toward `other`. Handles are `None` when the test ran on bare shapes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResult {
    pub intersects: bool,
    /// Penetration along `direction`, never negative when `intersects` is set.
    pub depth: f64,
    pub direction: Vec2,
    contacts: [Vec2; 2],
    contact_count: usize,
    pub body: Option<BodyHandle>,
    pub other: Option<BodyHandle>,
    /// Index of the shape inside `body`.
    pub body_shape: usize,
    /// Index of the shape inside `other`.
    pub other_shape: usize,
}

impl CollisionResult {
    /// A non-intersecting result.
    pub fn miss() -> Self {
        Self::default()
    }

    pub(crate) fn hit(depth: f64, direction: Vec2) -> Self {
        Self {
            intersects: true,
            depth,
            direction,
            ..Self::default()
        }
    }

    /// World-space contact points, zero to two of them.
    pub fn contacts(&self) -> &[Vec2] {
        &self.contacts[..self.contact_count]
    }

    pub fn contact_count(&self) -> usize {
        self.contact_count
    }

    /// Adds a contact point. Extra points beyond two are dropped.
    pub fn push_contact(&mut self, point: Vec2) {
        if self.contact_count < self.contacts.len() {
            self.contacts[self.contact_count] = point;
            self.contact_count += 1;
        }
    }

    pub(crate) fn set_contacts(&mut self, points: &[Vec2]) {
        self.contact_count = 0;
        for &point in points {
            self.push_contact(point);
        }
    }

    /// Attaches body handles and shape indices.
    pub fn with_bodies(mut self, body: BodyHandle, body_shape: usize, other: BodyHandle, other_shape: usize) -> Self {
        self.body = Some(body);
        self.other = Some(other);
        self.body_shape = body_shape;
        self.other_shape = other_shape;
        self
    }

    /// The same contact seen from the other participant: references swapped, direction negated.
    pub fn reversed(&self) -> Self {
        Self {
            direction: -self.direction,
            body: self.other,
            other: self.body,
            body_shape: self.other_shape,
            other_shape: self.body_shape,
            ..*self
        }
    }

    /// Clears the result for reuse.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_contact_caps_at_two() {
        let mut result = CollisionResult::hit(1.0, Vec2::new(1.0, 0.0));
        result.push_contact(Vec2::new(1.0, 1.0));
        result.push_contact(Vec2::new(2.0, 2.0));
        result.push_contact(Vec2::new(3.0, 3.0));
        assert_eq!(result.contact_count(), 2);
        assert_eq!(result.contacts(), &[Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)]);
    }

    #[test]
    fn test_reversed_swaps_perspective() {
        let a = BodyHandle::from_raw(3);
        let b = BodyHandle::from_raw(7);
        let mut result = CollisionResult::hit(0.5, Vec2::new(0.0, 1.0)).with_bodies(a, 0, b, 2);
        result.push_contact(Vec2::new(4.0, 4.0));

        let flipped = result.reversed();
        assert_eq!(flipped.body, Some(b));
        assert_eq!(flipped.other, Some(a));
        assert_eq!(flipped.body_shape, 2);
        assert_eq!(flipped.other_shape, 0);
        assert_eq!(flipped.direction, Vec2::new(0.0, -1.0));
        assert_eq!(flipped.depth, 0.5);
        assert_eq!(flipped.contacts(), result.contacts());
        assert_eq!(flipped.reversed(), result);
    }

    #[test]
    fn test_reset() {
        let mut result = CollisionResult::hit(2.0, Vec2::new(1.0, 0.0));
        result.push_contact(Vec2::ZERO);
        result.reset();
        assert_eq!(result, CollisionResult::miss());
        assert!(result.contacts().is_empty());
    }
}
