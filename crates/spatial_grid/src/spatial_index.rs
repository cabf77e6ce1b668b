use std::hash::Hash;
use std::num::NonZeroU32;

use crate::bbox::Bbox;
use crate::cell_range::{CellCoord, CellRange};
use crate::cell_store::{CellStore, PoolStats};
use crate::config::GridConfig;
use crate::errors::*;
use crate::pool::Pool;
use crate::query_results::QueryResults;
use crate::registry::Registry;

/// A `SpatialIndex` can tell us which objects might be within a rectangle.
///
/// The world is divided into square cells of a fixed size, and each object is recorded in every cell its box touches.
/// Queries gather the objects of the cells the query box touches.  The answer is a set of *candidates*: everything
/// which shares a cell with the query, which is a superset of everything actually overlapping it.  Callers wanting
/// exact answers filter the candidates with their own test (for example [Bbox::intersects]).
///
/// Objects are identified by handles of type `H`, which the index clones and hashes.  See [crate::ByAddress] for
/// identity-keyed handles.
///
/// The index is not internally synchronized.  Share it across threads behind a single lock.
#[derive(Debug)]
pub struct SpatialIndex<H> {
    cell_size: NonZeroU32,
    objects: Registry<H>,
    cells: CellStore,
    result_pool: Pool<QueryResults<H>>,
}

impl<H: Clone + Eq + Hash> SpatialIndex<H> {
    pub fn new(cell_size: NonZeroU32) -> SpatialIndex<H> {
        Self::from_config(&GridConfig {
            cell_size,
            ..Default::default()
        })
    }

    pub fn from_config(config: &GridConfig) -> SpatialIndex<H> {
        SpatialIndex {
            cell_size: config.cell_size,
            objects: Registry::with_capacity(config.initial_object_capacity),
            cells: CellStore::new(),
            result_pool: Pool::new(),
        }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size.get()
    }

    fn range_of(&self, bbox: &Bbox) -> CellRange {
        CellRange::from_bbox(bbox, self.cell_size.get())
    }

    /// The cells a box would occupy, without touching the index.
    pub fn cell_range_of(&self, x: f64, y: f64, w: f64, h: f64) -> Result<CellRange> {
        Ok(self.range_of(&Bbox::new(x, y, w, h)?))
    }

    /// Add a new object.
    ///
    /// Fails with [Error::AlreadyExists] if `handle` is already present, and [Error::InvalidDimensions] for empty or
    /// non-finite boxes.  On failure the index is unchanged.
    pub fn add(&mut self, handle: H, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        let bbox = Bbox::new(x, y, w, h)?;
        let id = self.objects.add(handle, bbox)?;
        let range = self.range_of(&bbox);
        self.cells.add_to_range(id, &range);
        Ok(())
    }

    /// Move or resize an object, returning its previous box.
    ///
    /// Moving within the same set of cells only rewrites the stored box.
    pub fn update(&mut self, handle: &H, x: f64, y: f64, w: f64, h: f64) -> Result<Bbox> {
        let bbox = Bbox::new(x, y, w, h)?;
        let (id, old) = self.objects.update(handle, bbox)?;

        let old_range = self.range_of(&old);
        let new_range = self.range_of(&bbox);
        if old_range != new_range {
            self.cells.remove_from_range(id, &old_range);
            self.cells.add_to_range(id, &new_range);
        }

        Ok(old)
    }

    /// Remove an object, returning the last box it had.
    pub fn remove(&mut self, handle: &H) -> Result<Bbox> {
        let (id, bbox) = self.objects.remove(handle)?;
        let range = self.range_of(&bbox);
        self.cells.remove_from_range(id, &range);
        Ok(bbox)
    }

    /// Find every object sharing at least one cell with the given box.
    pub fn query(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<QueryResults<H>> {
        self.query_with(x, y, w, h, |_| true)
    }

    /// Like [Self::query], but only keep objects for which `predicate` returns true.
    ///
    /// `predicate` is called at most once per object, however many cells the object spans.
    pub fn query_with(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        predicate: impl FnMut(&H) -> bool,
    ) -> Result<QueryResults<H>> {
        // Validate first so that a bad query doesn't cost a pooled set.
        let bbox = Bbox::new(x, y, w, h)?;
        let mut out = self.result_pool.acquire();
        self.cells
            .query_range(&self.range_of(&bbox), &self.objects, predicate, &mut out);
        Ok(out)
    }

    /// Query into a set the caller already holds.  `out` is cleared first.
    pub fn query_into(
        &self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        predicate: impl FnMut(&H) -> bool,
        out: &mut QueryResults<H>,
    ) -> Result<()> {
        let bbox = Bbox::new(x, y, w, h)?;
        out.clear();
        self.cells
            .query_range(&self.range_of(&bbox), &self.objects, predicate, out);
        Ok(())
    }

    /// Give a result set back for reuse by later queries.
    pub fn recycle(&mut self, results: QueryResults<H>) {
        self.result_pool.release(results);
    }

    pub fn get_bbox(&self, handle: &H) -> Result<Bbox> {
        self.objects.get_bbox(handle).ok_or(Error::UnknownObject)
    }

    pub fn contains(&self, handle: &H) -> bool {
        self.objects.contains(handle)
    }

    /// Number of objects in the index.
    pub fn count(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Iterate over all objects and their boxes, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&H, Bbox)> {
        self.objects.iter()
    }

    /// Iterate over every allocated cell and the number of objects in it, in arbitrary order.
    ///
    /// Intended for debug overlays.  Empty cells are never allocated, so never appear.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (CellCoord, usize)> + '_ {
        self.cells.occupied_cells()
    }

    /// Iterate over the objects recorded in one cell.
    pub fn cell_members(&self, cell: CellCoord) -> impl Iterator<Item = &H> {
        self.cells
            .members(cell)
            .unwrap_or_default()
            .iter()
            .map(move |id| self.objects.handle_of(*id))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Number of rows holding at least one cell.
    pub fn row_count(&self) -> usize {
        self.cells.row_count()
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            cells: self.cells.pooled_cells(),
            rows: self.cells.pooled_rows(),
            results: self.result_pool.len(),
        }
    }

    /// Free pooled containers until at most `max` of each kind remain.
    ///
    /// Pools only grow on their own; call this after a burst of activity to give the memory back.
    pub fn shrink_pools(&mut self, max: usize) {
        self.cells.shrink_pools(max);
        self.result_pool.shrink_to(max);
    }

    /// Remove every object.  Cell storage goes back to the pools.
    pub fn clear(&mut self) {
        log::debug!(
            "clearing spatial index: {} objects in {} cells",
            self.objects.len(),
            self.cells.cell_count()
        );
        self.objects.clear();
        self.cells.clear();
    }

    /// Check that every object is in exactly the cells its box covers, and that no cell is empty.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut expected_memberships = 0u64;
        for (id, bbox) in self.objects.iter_ids() {
            let range = self.range_of(&bbox);
            for cell in range.iter() {
                let members = self
                    .cells
                    .members(cell)
                    .unwrap_or_else(|| panic!("{} should have cell {}", id, cell));
                assert!(members.contains(&id), "{} missing from cell {}", id, cell);
            }
            expected_memberships += range.cell_count();
        }

        let mut actual_memberships = 0u64;
        for (cell, n) in self.occupied_cells() {
            assert!(n > 0, "cell {} is empty but allocated", cell);
            actual_memberships += n as u64;
        }
        assert_eq!(
            expected_memberships, actual_memberships,
            "cells hold stale memberships"
        );
    }
}

impl<H: Clone + Eq + Hash> Default for SpatialIndex<H> {
    fn default() -> Self {
        Self::from_config(&Default::default())
    }
}
