use std::fmt;

use crate::collision::spatial_grid::GridMembership;
use crate::collision::{CollisionResult, AABB};
use crate::common::{Material, PhysicsConfig, PhysicsError};
use crate::integration::integrator;
use crate::math::{Transform, Vec2};
use crate::shapes::{Circle, Polygon, Shape};

use super::contact_handler::ContactHandler;

/// How a body takes part in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyType {
    /// Moves, is pushed by contacts and pushes other bodies.
    Normal,
    /// Infinite mass. Other bodies collide with it, it never moves from contacts.
    Static,
    /// Detects overlaps and reports them, never receives or causes impulses.
    Trigger,
}

/// Transform and shape count at the last shape refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SyncState {
    transform: Transform,
    shape_count: usize,
}

pub struct RigidBody {
    /// Authoritative transform, read on every refresh and written by integration
    /// and contact correction.
    pub transform: Transform,
    pub linear_velocity: Vec2,
    pub angular_velocity: f64, // Radians per second
    /// Disabled bodies are skipped by the world entirely.
    pub enabled: bool,
    pub use_gravity: bool,
    /// When false, angular velocity is neither integrated nor changed by contacts.
    pub use_rotation: bool,

    body_type: BodyType,
    material: Material,
    shapes: Vec<Shape>,

    // Accumulated through `impulse`, consumed by the next integration
    pending_impulse: Vec2,

    mass: f64,
    inv_mass: f64,
    inv_inertia: f64,
    mass_dirty: bool,
    synced: Option<SyncState>,

    pub(crate) membership: GridMembership,
    handler: Option<Box<dyn ContactHandler>>,
}

impl RigidBody {
    /// Creates a body with no shapes at the origin.
    pub fn new(body_type: BodyType, material: Material) -> Self {
        Self {
            transform: Transform::identity(),
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            enabled: true,
            use_gravity: true,
            use_rotation: true,
            body_type,
            material,
            shapes: Vec::new(),
            pending_impulse: Vec2::ZERO,
            mass: 0.0,
            inv_mass: 0.0,
            inv_inertia: 0.0,
            mass_dirty: true,
            synced: None,
            membership: GridMembership::default(),
            handler: None,
        }
    }

    /// Builder-style position setter.
    pub fn at(mut self, position: Vec2) -> Self {
        self.transform.position = position;
        self
    }

    /// Builder-style transform setter.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_handler(mut self, handler: impl ContactHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    // --- Shapes ---

    /// Appends a circle collider and returns its index.
    pub fn add_circle(&mut self, radius: f64, offset: Vec2) -> Result<usize, PhysicsError> {
        let circle = Circle::new(radius, offset)?;
        Ok(self.add_shape(Shape::Circle(circle)))
    }

    /// Appends an axis-aligned box collider centred on `offset` and returns its index.
    pub fn add_box(&mut self, width: f64, height: f64, offset: Vec2) -> Result<usize, PhysicsError> {
        let polygon = Polygon::new_box(width, height, offset)?;
        Ok(self.add_shape(Shape::Polygon(polygon)))
    }

    /// Appends a convex polygon collider and returns its index.
    pub fn add_polygon(&mut self, vertices: Vec<Vec2>, offset: Vec2) -> Result<usize, PhysicsError> {
        let polygon = Polygon::new(vertices, offset)?;
        Ok(self.add_shape(Shape::Polygon(polygon)))
    }

    /// Appends an already built shape and returns its index.
    pub fn add_shape(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.mass_dirty = true;
        self.shapes.len() - 1
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    // --- Material & type ---

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
        self.mass_dirty = true;
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
        self.mass_dirty = true;
    }

    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    pub fn is_trigger(&self) -> bool {
        self.body_type == BodyType::Trigger
    }

    // --- Mass ---

    /// Mass as of the last [`update_shapes`](Self::update_shapes). Zero without shapes.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Zero for static bodies and for bodies without shapes.
    pub fn inverse_mass(&self) -> f64 {
        self.inv_mass
    }

    /// Zero for static bodies, bodies without shapes, and bodies with rotation off.
    pub fn inverse_inertia(&self) -> f64 {
        if self.use_rotation {
            self.inv_inertia
        } else {
            0.0
        }
    }

    // --- Motion ---

    /// Queues an external impulse, applied as `impulse * unit * inverse_mass * dt` on the next step.
    pub fn impulse(&mut self, impulse: Vec2) {
        self.pending_impulse += impulse;
    }

    pub fn pending_impulse(&self) -> Vec2 {
        self.pending_impulse
    }

    pub(crate) fn take_impulse(&mut self) -> Vec2 {
        std::mem::take(&mut self.pending_impulse)
    }

    /// Applies gravity and pending impulses, integrates the transform, then refreshes shapes.
    pub fn step(&mut self, config: &PhysicsConfig, dt: f64) {
        self.update_shapes();
        integrator::integrate(self, config, dt);
        self.update_shapes();
    }

    /// Whether a step would change anything for this body.
    pub fn is_moving(&self, config: &PhysicsConfig) -> bool {
        if self.body_type != BodyType::Normal {
            return false;
        }
        let falls = self.use_gravity && self.inv_mass > 0.0 && config.gravity != Vec2::ZERO;
        falls
            || self.linear_velocity != Vec2::ZERO
            || (self.use_rotation && self.angular_velocity != 0.0)
            || self.pending_impulse != Vec2::ZERO
    }

    /// Whether the transform or shape list changed since the last refresh.
    pub fn needs_refresh(&self) -> bool {
        match self.synced {
            Some(state) => {
                self.mass_dirty || state.transform != self.transform || state.shape_count != self.shapes.len()
            }
            None => true,
        }
    }

    /// Refreshes every shape's world geometry and recomputes mass and inertia, but only
    /// when the transform or shape list changed since the previous call.
    /// Returns whether anything was recomputed.
    pub fn update_shapes(&mut self) -> bool {
        if !self.needs_refresh() {
            return false;
        }

        for shape in &mut self.shapes {
            shape.refresh(&self.transform);
        }

        self.mass = self.shapes.iter().map(|s| s.area() * self.material.density()).sum();

        let (inv_mass, inv_inertia) = if self.body_type == BodyType::Static || self.mass <= 0.0 {
            (0.0, 0.0)
        } else {
            // I = m * r² / 12 over the combined bounding radius
            let radius = self.bounding_radius();
            let inertia = self.mass * radius * radius / 12.0;
            let inv_inertia = if inertia > 0.0 { 1.0 / inertia } else { 0.0 };
            (1.0 / self.mass, inv_inertia)
        };
        self.inv_mass = inv_mass;
        self.inv_inertia = inv_inertia;

        self.mass_dirty = false;
        self.synced = Some(SyncState {
            transform: self.transform,
            shape_count: self.shapes.len(),
        });
        true
    }

    /// Union of every shape's bounding box as of the last refresh, `None` without shapes.
    pub fn bounding_box(&self) -> Option<AABB> {
        let mut shapes = self.shapes.iter();
        let mut aabb = shapes.next()?.bounding_box();
        for shape in shapes {
            aabb.merge(&shape.bounding_box());
        }
        Some(aabb)
    }

    /// Largest distance from the body's position to any shape's extent, as of the last refresh.
    pub fn bounding_radius(&self) -> f64 {
        let origin = self.transform.position;
        self.shapes.iter().map(|s| s.extent_from(origin)).fold(0.0, f64::max)
    }

    /// Velocity of a world point rigidly attached to this body.
    pub fn velocity_at(&self, point: Vec2) -> Vec2 {
        let lever = point - self.transform.position;
        self.linear_velocity + Vec2::cross_scalar(self.angular_velocity, lever)
    }

    // --- Hooks ---

    pub fn set_contact_handler(&mut self, handler: Box<dyn ContactHandler>) {
        self.handler = Some(handler);
    }

    pub fn take_contact_handler(&mut self) -> Option<Box<dyn ContactHandler>> {
        self.handler.take()
    }

    pub(crate) fn notify_colliding(&mut self, result: &CollisionResult) -> bool {
        match self.handler.as_mut() {
            Some(handler) => handler.colliding(result),
            None => true,
        }
    }

    pub(crate) fn notify_triggering(&mut self, result: &CollisionResult) {
        if let Some(handler) = self.handler.as_mut() {
            handler.triggering(result);
        }
    }
}

impl fmt::Debug for RigidBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RigidBody")
            .field("body_type", &self.body_type)
            .field("transform", &self.transform)
            .field("linear_velocity", &self.linear_velocity)
            .field("angular_velocity", &self.angular_velocity)
            .field("mass", &self.mass)
            .field("shapes", &self.shapes.len())
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
