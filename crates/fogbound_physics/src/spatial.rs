//! Uniform grid broad phase
//!
//! Solids are registered in every cell their bounds touch. Queries collect
//! the indices stored in the cells covered by the query bounds, so a query
//! only ever narrows the set of boxes a brute-force scan would visit.

use std::collections::HashMap;

use crate::shapes::Aabb;

/// Default edge length of a grid cell in world units
pub const DEFAULT_CELL_SIZE: f32 = 8.0;

const MIN_CELL_SIZE: f32 = 0.001;

/// Queries covering more cells than this skip the grid and visit everything
const MAX_QUERY_CELLS: i64 = 4096;

/// Boxes covering more cells than this are kept in a separate always-visited list
const MAX_INSERT_CELLS: i64 = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct CellKey {
    x: i32,
    y: i32,
    z: i32,
}

#[derive(Clone, Copy, Debug)]
struct CellRange {
    min: CellKey,
    max: CellKey,
}

impl CellRange {
    fn cell_count(&self) -> i64 {
        let span = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1).max(0);
        span(self.min.x, self.max.x)
            .saturating_mul(span(self.min.y, self.max.y))
            .saturating_mul(span(self.min.z, self.max.z))
    }

    fn keys(&self) -> impl Iterator<Item = CellKey> + '_ {
        (self.min.z..=self.max.z).flat_map(move |z| {
            (self.min.y..=self.max.y)
                .flat_map(move |y| (self.min.x..=self.max.x).map(move |x| CellKey { x, y, z }))
        })
    }
}

/// Hash grid over solid box indices
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<usize>>,
    oversized: Vec<usize>,
    item_count: usize,
}

impl SpatialGrid {
    /// Create an empty grid with the given cell size
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() {
            cell_size.max(MIN_CELL_SIZE)
        } else {
            DEFAULT_CELL_SIZE
        };

        Self {
            cell_size,
            cells: HashMap::new(),
            oversized: Vec::new(),
            item_count: 0,
        }
    }

    /// Edge length of a cell
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of indices registered
    pub fn len(&self) -> usize {
        self.item_count
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Remove every registered index
    pub fn clear(&mut self) {
        self.cells.clear();
        self.oversized.clear();
        self.item_count = 0;
    }

    /// Register `index` in every cell touched by `bounds`
    ///
    /// Indices are expected to be handed out sequentially from zero.
    pub fn insert(&mut self, index: usize, bounds: &Aabb) {
        self.item_count = self.item_count.max(index + 1);

        let range = self.cell_range(bounds);
        if range.cell_count() > MAX_INSERT_CELLS {
            self.oversized.push(index);
            return;
        }

        for key in range.keys() {
            self.cells.entry(key).or_default().push(index);
        }
    }

    /// Collect candidate indices for `bounds` into `out`, sorted and unique
    pub fn query(&self, bounds: &Aabb, out: &mut Vec<usize>) {
        out.clear();
        if self.item_count == 0 {
            return;
        }

        let range = self.cell_range(bounds);
        if range.cell_count() > MAX_QUERY_CELLS {
            out.extend(0..self.item_count);
            return;
        }

        for key in range.keys() {
            if let Some(indices) = self.cells.get(&key) {
                out.extend_from_slice(indices);
            }
        }
        out.extend_from_slice(&self.oversized);

        // Visit in insertion order, like a plain scan would
        out.sort_unstable();
        out.dedup();
    }

    fn cell_coord(&self, value: f32) -> i32 {
        (value / self.cell_size).floor() as i32
    }

    fn cell_range(&self, bounds: &Aabb) -> CellRange {
        CellRange {
            min: CellKey {
                x: self.cell_coord(bounds.min.x),
                y: self.cell_coord(bounds.min.y),
                z: self.cell_coord(bounds.min.z),
            },
            max: CellKey {
                x: self.cell_coord(bounds.max.x),
                y: self.cell_coord(bounds.max.y),
                z: self.cell_coord(bounds.max.z),
            },
        }
    }
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}
