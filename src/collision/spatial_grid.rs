// Uniform hashed grid for broadphase collision detection.

use std::collections::HashMap;

use tracing::{trace, warn};

use crate::collision::AABB;
use crate::common::config::DEFAULT_GRID_CELL_SIZE;
use crate::math::vec2::Vec2;
use crate::world::BodyHandle;

/// Integer cell coordinates.
pub type CellCoords = (i32, i32);

/// Inclusive rectangle of cells covered by a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min: CellCoords,
    pub max: CellCoords,
}

impl CellRange {
    pub fn contains(&self, (col, row): CellCoords) -> bool {
        col >= self.min.0 && col <= self.max.0 && row >= self.min.1 && row <= self.max.1
    }

    fn iter(self) -> impl Iterator<Item = CellCoords> {
        (self.min.1..=self.max.1).flat_map(move |row| (self.min.0..=self.max.0).map(move |col| (col, row)))
    }
}

/// The cells a body is registered in, kept on the body so it can remove itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridMembership {
    cells: Vec<usize>,
    range: Option<CellRange>,
}

impl GridMembership {
    pub fn range(&self) -> Option<CellRange> {
        self.range
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Represents a cell in the spatial grid.
#[derive(Debug, Clone)]
struct GridCell {
    coords: CellCoords,
    bodies: Vec<BodyHandle>,
}

/// An unbounded uniform grid. Cells are created on first use and never deleted.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f64,
    inv_cell_size: f64, // 1.0 / cell_size, cached for performance
    cells: Vec<GridCell>,
    lookup: HashMap<CellCoords, usize>,
}

impl SpatialGrid {
    /// Creates an empty grid. A non-positive or non-finite `cell_size` falls back to the default.
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size > 0.0 && cell_size.is_finite() {
            cell_size
        } else {
            warn!(cell_size, "invalid grid cell size, using default");
            DEFAULT_GRID_CELL_SIZE
        };

        SpatialGrid {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of cells ever created.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Converts world coordinates to cell coordinates.
    #[inline]
    pub fn cell_coords(&self, point: Vec2) -> CellCoords {
        let col = (point.x * self.inv_cell_size).floor() as i32;
        let row = (point.y * self.inv_cell_size).floor() as i32;
        (col, row)
    }

    /// Determines the range of grid cells overlapped by an AABB.
    pub fn cell_range(&self, aabb: &AABB) -> CellRange {
        CellRange {
            min: self.cell_coords(aabb.min),
            max: self.cell_coords(aabb.max),
        }
    }

    /// World-space box covered by a cell.
    pub fn cell_bounds(&self, (col, row): CellCoords) -> AABB {
        AABB::from_rect(
            col as f64 * self.cell_size,
            row as f64 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    /// Bodies registered in the cell at `coords`, `None` if the cell was never created.
    pub fn bodies_in(&self, coords: CellCoords) -> Option<&[BodyHandle]> {
        self.lookup.get(&coords).map(|&i| self.cells[i].bodies.as_slice())
    }

    /// Coordinates of every cell ever created.
    pub fn cells(&self) -> impl Iterator<Item = CellCoords> + '_ {
        self.cells.iter().map(|cell| cell.coords)
    }

    fn cell_index(&mut self, coords: CellCoords) -> usize {
        if let Some(&index) = self.lookup.get(&coords) {
            return index;
        }
        let index = self.cells.len();
        self.cells.push(GridCell {
            coords,
            bodies: Vec::new(),
        });
        self.lookup.insert(coords, index);
        index
    }

    /// Re-registers a body against its current bounding box.
    ///
    /// Membership only changes when the covered cell range differs from the stored one;
    /// a `None` box removes the body from the grid. Returns whether membership changed.
    pub fn update(&mut self, handle: BodyHandle, aabb: Option<&AABB>, membership: &mut GridMembership) -> bool {
        let range = aabb.map(|aabb| self.cell_range(aabb));
        if range == membership.range {
            return false;
        }

        self.remove(handle, membership);

        if let Some(range) = range {
            for coords in range.iter() {
                let index = self.cell_index(coords);
                self.cells[index].bodies.push(handle);
                membership.cells.push(index);
            }
            membership.range = Some(range);
        }

        trace!(?handle, ?range, "grid membership changed");
        true
    }

    /// Removes a body from every cell it is registered in. Cells themselves are kept.
    pub fn remove(&mut self, handle: BodyHandle, membership: &mut GridMembership) {
        for index in membership.cells.drain(..) {
            let bodies = &mut self.cells[index].bodies;
            if let Some(pos) = bodies.iter().position(|&h| h == handle) {
                bodies.swap_remove(pos);
            }
        }
        membership.range = None;
    }

    /// Collects every other body sharing at least one cell with `handle`, each once.
    pub fn query_neighbors(&self, handle: BodyHandle, membership: &GridMembership, out: &mut Vec<BodyHandle>) {
        out.clear();
        for &index in &membership.cells {
            for &other in &self.cells[index].bodies {
                if other != handle && !out.contains(&other) {
                    out.push(other);
                }
            }
        }
    }

    /// Empties every cell and clears the given memberships.
    pub fn clear<'a>(&mut self, memberships: impl IntoIterator<Item = &'a mut GridMembership>) {
        for cell in &mut self.cells {
            cell.bodies.clear();
        }
        for membership in memberships {
            membership.cells.clear();
            membership.range = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(raw: u64) -> BodyHandle {
        BodyHandle::from_raw(raw)
    }

    /// Every created cell lists exactly the bodies whose box overlaps it.
    fn assert_grid_invariant(grid: &SpatialGrid, bodies: &[(BodyHandle, AABB)]) {
        for coords in grid.cells() {
            let registered = grid.bodies_in(coords).unwrap();
            for (h, aabb) in bodies {
                let expected = grid.cell_range(aabb).contains(coords);
                assert_eq!(registered.contains(h), expected, "body {h:?} in cell {coords:?}");
            }
        }
        for (h, aabb) in bodies {
            for coords in grid.cell_range(aabb).iter() {
                assert!(grid.bodies_in(coords).unwrap().contains(h));
            }
        }
    }

    #[test]
    fn test_grid_new_falls_back_on_bad_cell_size() {
        assert_eq!(SpatialGrid::new(10.0).cell_size(), 10.0);
        assert_eq!(SpatialGrid::new(0.0).cell_size(), DEFAULT_GRID_CELL_SIZE);
        assert_eq!(SpatialGrid::new(-5.0).cell_size(), DEFAULT_GRID_CELL_SIZE);
        assert_eq!(SpatialGrid::new(f64::NAN).cell_size(), DEFAULT_GRID_CELL_SIZE);
    }

    #[test]
    fn test_cell_coords() {
        let grid = SpatialGrid::new(5.0);
        let points = vec![
            (Vec2::new(0.0, 0.0), (0, 0)),
            (Vec2::new(4.9, 4.9), (0, 0)),
            (Vec2::new(5.0, 5.0), (1, 1)),
            (Vec2::new(-0.1, 0.0), (-1, 0)),
            (Vec2::new(-5.0, -5.1), (-1, -2)),
            (Vec2::new(12.0, -7.0), (2, -2)),
        ];
        for (point, expected) in points {
            assert_eq!(grid.cell_coords(point), expected, "Point {:?}", point);
        }
    }

    #[test]
    fn test_small_body_occupies_corner_cells() {
        let mut grid = SpatialGrid::new(10.0);
        let mut one = GridMembership::default();
        let mut two = GridMembership::default();
        let mut four = GridMembership::default();

        grid.update(handle(1), Some(&AABB::from_rect(1.0, 1.0, 2.0, 2.0)), &mut one);
        grid.update(handle(2), Some(&AABB::from_rect(8.0, 1.0, 4.0, 2.0)), &mut two);
        grid.update(handle(3), Some(&AABB::from_rect(8.0, 8.0, 4.0, 4.0)), &mut four);

        assert_eq!(one.cell_count(), 1);
        assert_eq!(two.cell_count(), 2);
        assert_eq!(four.cell_count(), 4);
        assert_eq!(grid.bodies_in((0, 0)).unwrap(), &[handle(1), handle(2), handle(3)]);
        assert_eq!(grid.bodies_in((1, 1)).unwrap(), &[handle(3)]);
    }

    #[test]
    fn test_update_is_noop_within_same_cells() {
        let mut grid = SpatialGrid::new(10.0);
        let mut membership = GridMembership::default();
        assert!(grid.update(handle(1), Some(&AABB::from_rect(1.0, 1.0, 2.0, 2.0)), &mut membership));
        assert!(!grid.update(handle(1), Some(&AABB::from_rect(5.0, 5.0, 2.0, 2.0)), &mut membership));
        assert!(grid.update(handle(1), Some(&AABB::from_rect(9.0, 5.0, 2.0, 2.0)), &mut membership));
        assert_eq!(membership.cell_count(), 2);
    }

    #[test]
    fn test_moving_bodies_keep_grid_invariant() {
        let mut grid = SpatialGrid::new(10.0);
        let handles = [handle(1), handle(2), handle(3)];
        let mut memberships = vec![GridMembership::default(); 3];

        let frames = [
            [AABB::from_rect(1.0, 1.0, 2.0, 2.0), AABB::from_rect(15.0, 15.0, 3.0, 3.0), AABB::from_rect(-4.0, 2.0, 30.0, 2.0)],
            [AABB::from_rect(9.0, 1.0, 2.0, 2.0), AABB::from_rect(15.0, 19.0, 3.0, 3.0), AABB::from_rect(-4.0, 8.0, 30.0, 2.0)],
            [AABB::from_rect(-9.0, -9.0, 2.0, 2.0), AABB::from_rect(15.0, 15.0, 3.0, 3.0), AABB::from_rect(0.0, 0.0, 1.0, 1.0)],
        ];

        for boxes in frames {
            for ((h, aabb), membership) in handles.iter().zip(&boxes).zip(&mut memberships) {
                grid.update(*h, Some(aabb), membership);
            }
            let bodies: Vec<_> = handles.iter().copied().zip(boxes).collect();
            assert_grid_invariant(&grid, &bodies);
        }
    }

    #[test]
    fn test_remove_keeps_empty_cells() {
        let mut grid = SpatialGrid::new(10.0);
        let mut membership = GridMembership::default();
        grid.update(handle(1), Some(&AABB::from_rect(8.0, 8.0, 4.0, 4.0)), &mut membership);
        assert_eq!(grid.cell_count(), 4);

        grid.remove(handle(1), &mut membership);
        assert!(membership.is_empty());
        assert_eq!(membership.range(), None);
        assert_eq!(grid.cell_count(), 4);
        assert!(grid.cells().all(|c| grid.bodies_in(c).unwrap().is_empty()));
    }

    #[test]
    fn test_update_without_box_removes_body() {
        let mut grid = SpatialGrid::new(10.0);
        let mut membership = GridMembership::default();
        grid.update(handle(1), Some(&AABB::from_rect(1.0, 1.0, 1.0, 1.0)), &mut membership);
        assert!(grid.update(handle(1), None, &mut membership));
        assert!(membership.is_empty());
        assert!(grid.bodies_in((0, 0)).unwrap().is_empty());
    }

    #[test]
    fn test_query_neighbors_deduplicates() {
        let mut grid = SpatialGrid::new(10.0);
        let mut a = GridMembership::default();
        let mut b = GridMembership::default();
        let mut c = GridMembership::default();
        // a and b share four cells, c is far away
        grid.update(handle(1), Some(&AABB::from_rect(8.0, 8.0, 4.0, 4.0)), &mut a);
        grid.update(handle(2), Some(&AABB::from_rect(7.0, 7.0, 6.0, 6.0)), &mut b);
        grid.update(handle(3), Some(&AABB::from_rect(100.0, 100.0, 1.0, 1.0)), &mut c);

        let mut out = Vec::new();
        grid.query_neighbors(handle(1), &a, &mut out);
        assert_eq!(out, vec![handle(2)]);
        grid.query_neighbors(handle(3), &c, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_cell_bounds() {
        let grid = SpatialGrid::new(10.0);
        assert_eq!(grid.cell_bounds((-1, 2)), AABB::from_rect(-10.0, 20.0, 10.0, 10.0));
    }
}
