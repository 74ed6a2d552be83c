use std::collections::HashMap;

use tracing::{debug, trace};

use crate::collision::{self, CollisionResult, SpatialGrid};
use crate::common::{ConfigError, PhysicsConfig, PhysicsError};
use crate::objects::rigid_body::{BodyType, RigidBody};

use super::handle::BodyHandle;
use super::resolver;

/// Owns every body and the broad-phase grid, and drives the per-frame solver.
///
/// Bodies live in a dense array; handles map to dense indices so removal is a swap-remove.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    grid: SpatialGrid,
    bodies: Vec<RigidBody>,
    handles: Vec<BodyHandle>,          // Dense index -> handle
    slots: HashMap<BodyHandle, usize>, // Handle -> dense index
    next_handle: u64,
    dirty: bool,
    // Results resolved or reported during the last step
    contacts: Vec<CollisionResult>,
    // Scratch buffer for broad-phase queries
    neighbors: Vec<BodyHandle>,
}

impl PhysicsWorld {
    /// Creates an empty world. Unusable config fields fall back to their defaults.
    pub fn new(config: PhysicsConfig) -> Self {
        let config = config.sanitized();
        debug!(?config, "creating physics world");
        Self {
            grid: SpatialGrid::new(config.grid_cell_size),
            config,
            bodies: Vec::new(),
            handles: Vec::new(),
            slots: HashMap::new(),
            next_handle: 0,
            dirty: true,
            contacts: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    /// Like [`new`](Self::new), but rejects an unusable config instead of fixing it.
    pub fn try_new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Mutable access to the tunables. Changes take effect on the next step;
    /// a new grid cell size rebuilds the grid.
    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        self.dirty = true;
        &mut self.config
    }

    /// Replaces the tunables, rejecting unusable values.
    pub fn set_config(&mut self, config: PhysicsConfig) -> Result<(), PhysicsError> {
        config.validate()?;
        self.config = config;
        self.dirty = true;
        self.rebuild_grid_if_needed();
        Ok(())
    }

    // --- Bodies ---

    /// Registers a body and returns its handle.
    pub fn add_body(&mut self, mut body: RigidBody) -> BodyHandle {
        let handle = BodyHandle::from_raw(self.next_handle);
        self.next_handle += 1;

        body.update_shapes();
        if body.enabled {
            self.grid.update(handle, body.bounding_box().as_ref(), &mut body.membership);
        }

        self.slots.insert(handle, self.bodies.len());
        self.handles.push(handle);
        self.bodies.push(body);
        self.dirty = true;

        debug!(%handle, count = self.bodies.len(), "body added");
        handle
    }

    /// Unregisters a body from the world and every grid cell, handing it back.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody, PhysicsError> {
        let index = self.slots.remove(&handle).ok_or(PhysicsError::UnknownBody(handle))?;

        let mut body = self.bodies.swap_remove(index);
        self.handles.swap_remove(index);
        if let Some(&moved) = self.handles.get(index) {
            self.slots.insert(moved, index);
        }

        self.grid.remove(handle, &mut body.membership);
        self.dirty = true;

        debug!(%handle, count = self.bodies.len(), "body removed");
        Ok(body)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.slots.get(&handle).map(|&i| &self.bodies[i])
    }

    /// Mutable access to a body. Marks the world dirty.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        let index = *self.slots.get(&handle)?;
        self.dirty = true;
        Some(&mut self.bodies[index])
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.slots.contains_key(&handle)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Every registered body with its handle, in iteration order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.handles.iter().copied().zip(self.bodies.iter())
    }

    /// Contacts resolved or reported during the most recent step, from the driving body's view.
    pub fn contacts(&self) -> &[CollisionResult] {
        &self.contacts
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Whether the next step has anything to do, as of the last check.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // --- Stepping ---

    /// Number of solver iterations for a frame that took `unscaled_delta_time` seconds:
    /// `min(max_iterations, floor(unscaled_delta_time / target_frame_delay * max_iterations))`.
    pub fn iteration_count(&self, unscaled_delta_time: f64) -> u32 {
        let max = self.config.max_iterations as f64;
        let iterations = (unscaled_delta_time / self.config.target_frame_delay * max).floor();
        if iterations.is_nan() {
            return 0;
        }
        iterations.clamp(0.0, max) as u32
    }

    /// Advances the simulation by one frame of `delta_time` seconds.
    /// Returns the number of iterations run.
    pub fn step(&mut self, delta_time: f64) -> u32 {
        self.step_scaled(delta_time, delta_time)
    }

    /// Advances the simulation with a separately scaled delta time. The iteration count
    /// follows the real frame time, the integration follows the scaled one.
    pub fn step_scaled(&mut self, delta_time: f64, unscaled_delta_time: f64) -> u32 {
        self.contacts.clear();
        if self.config.validate().is_err() {
            self.config = self.config.clone().sanitized();
        }
        self.rebuild_grid_if_needed();

        let iterations = self.iteration_count(unscaled_delta_time);
        if iterations == 0 {
            trace!(unscaled_delta_time, "frame too short, no iterations");
            return 0;
        }

        self.refresh_dirty();
        if !self.dirty {
            trace!("world at rest, skipping step");
            return 0;
        }

        let sub_dt = delta_time / iterations as f64;
        trace!(iterations, sub_dt, bodies = self.bodies.len(), "stepping");

        let mut resolved = false;
        for _ in 0..iterations {
            for body in &mut self.bodies {
                if body.enabled && body.body_type() == BodyType::Normal {
                    body.step(&self.config, sub_dt);
                }
            }

            self.sync_grid();

            resolved = false;
            for index in 0..self.bodies.len() {
                let body = &self.bodies[index];
                if body.enabled && body.body_type() == BodyType::Normal {
                    resolved |= self.solve_body(index);
                }
            }
        }

        // Corrections in the last iteration may leave overlaps for the next frame
        self.dirty = resolved;
        iterations
    }

    /// Sets the dirty flag if any enabled body moves, changed shapes or is pending a refresh.
    fn refresh_dirty(&mut self) {
        let config = &self.config;
        self.dirty |= self
            .bodies
            .iter()
            .any(|body| body.enabled && (body.needs_refresh() || body.is_moving(config)));
    }

    fn rebuild_grid_if_needed(&mut self) {
        if self.grid.cell_size() == self.config.grid_cell_size {
            return;
        }
        debug!(cell_size = self.config.grid_cell_size, "rebuilding grid");
        self.grid = SpatialGrid::new(self.config.grid_cell_size);
        for body in &mut self.bodies {
            body.membership = Default::default();
        }
        self.sync_grid();
        self.dirty = true;
    }

    /// Brings every body's shapes and grid membership up to date.
    fn sync_grid(&mut self) {
        for index in 0..self.bodies.len() {
            self.sync_body(index);
        }
    }

    fn sync_body(&mut self, index: usize) {
        let handle = self.handles[index];
        let body = &mut self.bodies[index];
        body.update_shapes();
        let aabb = if body.enabled { body.bounding_box() } else { None };
        self.grid.update(handle, aabb.as_ref(), &mut body.membership);
    }

    /// Tests the Normal body at `index` against its grid neighbors and resolves contacts.
    /// Returns whether any contact was resolved.
    fn solve_body(&mut self, index: usize) -> bool {
        let handle = self.handles[index];
        let mut neighbors = std::mem::take(&mut self.neighbors);
        self.grid.query_neighbors(handle, &self.bodies[index].membership, &mut neighbors);

        let mut resolved = false;
        for other_handle in &neighbors {
            let Some(&other) = self.slots.get(other_handle) else {
                continue;
            };
            let other_body = &self.bodies[other];
            if !other_body.enabled {
                continue;
            }
            // Normal pairs are driven once, by the lower index
            if other_body.body_type() == BodyType::Normal && other < index {
                continue;
            }
            resolved |= self.solve_pair(index, other);
        }

        self.neighbors = neighbors;
        resolved
    }

    /// Narrow phase and resolution for every shape pair of two bodies.
    /// Returns whether any shape pair was resolved.
    fn solve_pair(&mut self, index: usize, other: usize) -> bool {
        let (handle, other_handle) = (self.handles[index], self.handles[other]);
        let mut touched = false;

        let (a, b) = pair_mut(&mut self.bodies, index, other);
        for shape_a in 0..a.shape_count() {
            for shape_b in 0..b.shape_count() {
                let result = collision::intersects(&a.shapes()[shape_a], &b.shapes()[shape_b]);
                if !result.intersects {
                    continue;
                }
                let result = result.with_bodies(handle, shape_a, other_handle, shape_b);

                if a.is_trigger() || b.is_trigger() {
                    a.notify_triggering(&result);
                    b.notify_triggering(&result.reversed());
                    self.contacts.push(result);
                    continue;
                }

                let mut proceed = a.notify_colliding(&result);
                if b.body_type() == BodyType::Normal {
                    proceed &= b.notify_colliding(&result.reversed());
                }
                if !proceed {
                    continue;
                }

                resolver::resolve(a, b, &result);
                a.update_shapes();
                b.update_shapes();
                touched = true;
                self.contacts.push(result);
            }
        }

        if touched {
            self.sync_body(index);
            self.sync_body(other);
        }
        touched
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

/// Two distinct mutable elements of a slice.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = items.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}
