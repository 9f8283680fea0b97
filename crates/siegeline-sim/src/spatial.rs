//! 1-D bucketed index over the X axis for fast proximity candidates.

use std::collections::HashMap;

/// Spatial hash over X. Rebuilt every tick by each system from whatever
/// population that system cares about.
///
/// Queries return a candidate superset: every id whose bucket spans the
/// interval. Callers still apply exact distance and eligibility checks.
pub struct SpatialHash {
    cell_width: f32,
    cells: HashMap<i32, Vec<usize>>,
}

impl SpatialHash {
    pub fn new(cell_width: f32) -> Self {
        Self {
            cell_width,
            cells: HashMap::new(),
        }
    }

    /// Remove all entries, keeping bucket allocations for the rebuild.
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    pub fn insert(&mut self, idx: usize, x: f32) {
        let cell = self.cell_of(x);
        self.cells.entry(cell).or_default().push(idx);
    }

    /// Candidates within `radius` of `center` along X.
    pub fn query_radius(&self, center: f32, radius: f32) -> Vec<usize> {
        self.query_range(center - radius, center + radius)
    }

    /// Candidates whose bucket overlaps [min, max]. Buckets are visited in
    /// ascending order so iteration order is deterministic.
    pub fn query_range(&self, min: f32, max: f32) -> Vec<usize> {
        let lo = self.cell_of(min);
        let hi = self.cell_of(max);
        let mut result = Vec::new();
        for cell in lo..=hi {
            if let Some(bucket) = self.cells.get(&cell) {
                result.extend(bucket);
            }
        }
        result
    }

    fn cell_of(&self, x: f32) -> i32 {
        (x / self.cell_width).floor() as i32
    }
}
