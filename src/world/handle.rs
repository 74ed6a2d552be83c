use std::fmt;

/// Stable reference to a body registered in a [`PhysicsWorld`](super::PhysicsWorld).
///
/// Handles are never reused, so a handle to a removed body stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u64);

impl BodyHandle {
    pub(crate) fn from_raw(raw: u64) -> Self {
        BodyHandle(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}
