//! Grid traversal of a line segment, one cell at a time.
//!
//! Independent of the solver: the caller decides what a cell contains through a
//! predicate, typically a tile-map lookup.

use crate::math::vec2::Vec2;

use super::spatial_grid::CellCoords;

/// DDA walk over a uniform grid from `start` toward `end`.
///
/// The start cell itself is never tested. Each [`advance`](Self::advance) moves to the
/// next cell crossed by the segment and asks the predicate whether it blocks the ray.
#[derive(Debug, Clone)]
pub struct RayCaster {
    cell_size: Vec2,
    start: Vec2,     // In cell space
    direction: Vec2, // Unit, in cell space
    step: (i32, i32),
    step_size: Vec2,
    ray_length: Vec2,
    cell: CellCoords,
    distance: f64,
    max_distance: f64, // In cells
    hit: bool,
    ended: bool,
    hit_point: Option<Vec2>,
}

impl RayCaster {
    /// Prepares a walk from `start` to `end` (world units) over cells of `cell_size`.
    /// The walk ends once it has travelled the segment's length.
    ///
    /// A zero-length segment or a non-positive cell size yields a caster that has already ended.
    pub fn new(start: Vec2, end: Vec2, cell_size: Vec2) -> Self {
        let valid_cells = cell_size.x > 0.0 && cell_size.y > 0.0 && cell_size.is_finite();
        let inv_cell = if valid_cells {
            Vec2::new(1.0 / cell_size.x, 1.0 / cell_size.y)
        } else {
            Vec2::ZERO
        };
        let start = start.scale(inv_cell);
        let end = end.scale(inv_cell);
        let length = start.distance(end);
        let direction = (end - start).normalize();

        let cell = (start.x.floor() as i32, start.y.floor() as i32);
        let step = (sign_one(direction.x), sign_one(direction.y));
        let step_size = Vec2::new((1.0 / direction.x).abs(), (1.0 / direction.y).abs());

        let ray_length = Vec2::new(
            boundary_distance(start.x, cell.0, direction.x) * step_size.x,
            boundary_distance(start.y, cell.1, direction.y) * step_size.y,
        );

        RayCaster {
            cell_size,
            start,
            direction,
            step,
            step_size,
            ray_length,
            cell,
            distance: 0.0,
            max_distance: length,
            hit: false,
            ended: !(valid_cells && length > 0.0 && length.is_finite()),
            hit_point: None,
        }
    }

    /// Overrides how far the walk may go, in cells. Non-finite values are ignored.
    pub fn with_max_distance(mut self, cells: f64) -> Self {
        if cells.is_finite() {
            self.max_distance = cells;
        }
        self
    }

    /// Moves to the next cell and tests it. Does nothing once the walk has ended.
    pub fn advance(&mut self, mut predicate: impl FnMut(CellCoords) -> bool) {
        if self.ended {
            return;
        }

        if self.ray_length.x < self.ray_length.y {
            self.distance = self.ray_length.x;
            self.cell.0 += self.step.0;
            self.ray_length.x += self.step_size.x;
        } else {
            self.distance = self.ray_length.y;
            self.cell.1 += self.step.1;
            self.ray_length.y += self.step_size.y;
        }

        self.hit = predicate(self.cell);
        self.hit_point = if self.hit {
            Some((self.start + self.direction * self.distance).scale(self.cell_size))
        } else {
            None
        };
        self.ended = self.hit || self.distance >= self.max_distance;
    }

    /// Advances until the walk ends, returning the hit point if any.
    pub fn run(&mut self, mut predicate: impl FnMut(CellCoords) -> bool) -> Option<Vec2> {
        while !self.ended {
            self.advance(&mut predicate);
        }
        self.hit_point
    }

    pub fn hit(&self) -> bool {
        self.hit
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    /// World-space point where the ray entered the blocking cell.
    pub fn hit_point(&self) -> Option<Vec2> {
        self.hit_point
    }

    /// The cell tested last, or the start cell before the first advance.
    pub fn cell(&self) -> CellCoords {
        self.cell
    }

    /// Distance travelled so far, in cells.
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

/// Walks the segment from `start` to `end` and returns where it first enters a cell
/// for which `predicate` is true.
pub fn cast(start: Vec2, end: Vec2, cell_size: Vec2, predicate: impl FnMut(CellCoords) -> bool) -> Option<Vec2> {
    RayCaster::new(start, end, cell_size).run(predicate)
}

fn sign_one(value: f64) -> i32 {
    if value < 0.0 {
        -1
    } else {
        1
    }
}

/// Distance along one axis from `start` to the first cell boundary in the direction of travel.
fn boundary_distance(start: f64, cell: i32, direction: f64) -> f64 {
    if direction >= 0.0 {
        (cell as f64 + 1.0) - start
    } else {
        start - cell as f64
    }
}
