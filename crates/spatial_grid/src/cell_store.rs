//! Sparse storage for grid cells.
//!
//! Cells live in a two-level map, row then column, so that walking a range visits one row map per row.  Only cells
//! with at least one member exist; a row exists only while it has at least one cell.  Member lists are kept in a
//! [Slab] and their containers are recycled through [Pool]s.
use rustc_hash::FxHashMap;
use slab::Slab;
use smallvec::SmallVec;

use crate::cell_range::{CellCoord, CellRange};
use crate::pool::Pool;
use crate::query_results::QueryResults;
use crate::registry::{ObjectId, Registry};

/// Members of one cell.  Unordered, never containing duplicates.
///
/// Most cells hold a handful of objects, so this stays inline until it doesn't.
pub(crate) type Members = SmallVec<[ObjectId; 8]>;

/// One row of the grid: column to the key of the cell's members in the slab.
type Row = FxHashMap<i64, usize>;

/// Sizes of the free lists, for profiling.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolStats {
    /// Empty member lists waiting for a new cell.
    pub cells: usize,
    /// Empty row maps waiting for a new row.
    pub rows: usize,
    /// Returned query result sets.
    pub results: usize,
}

#[derive(Debug, Default)]
pub(crate) struct CellStore {
    rows: FxHashMap<i64, Row>,
    cells: Slab<Members>,
    cell_pool: Pool<Members>,
    row_pool: Pool<Row>,
}

impl CellStore {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    /// Add `id` to every cell of `range`, creating cells as needed.
    pub(crate) fn add_to_range(&mut self, id: ObjectId, range: &CellRange) {
        let CellStore {
            rows,
            cells,
            cell_pool,
            row_pool,
        } = self;

        for row in range.row_min..=range.row_max {
            let r = rows.entry(row).or_insert_with(|| row_pool.acquire());
            for col in range.col_min..=range.col_max {
                let key = *r.entry(col).or_insert_with(|| {
                    log::trace!("allocating cell ({}, {})", col, row);
                    cells.insert(cell_pool.acquire())
                });
                let members = &mut cells[key];
                debug_assert!(
                    !members.contains(&id),
                    "{} is already in cell ({}, {})",
                    id,
                    col,
                    row
                );
                members.push(id);
            }
        }
    }

    /// Remove `id` from every cell of `range`, freeing cells and rows which become empty.
    pub(crate) fn remove_from_range(&mut self, id: ObjectId, range: &CellRange) {
        let CellStore {
            rows,
            cells,
            cell_pool,
            row_pool,
        } = self;

        for row in range.row_min..=range.row_max {
            let row_now_empty = {
                let r = match rows.get_mut(&row) {
                    Some(r) => r,
                    None => {
                        debug_assert!(false, "{} should have cells in row {}", id, row);
                        continue;
                    }
                };

                for col in range.col_min..=range.col_max {
                    let key = match r.get(&col) {
                        Some(k) => *k,
                        None => {
                            debug_assert!(
                                false,
                                "{} should be in cell ({}, {})",
                                id,
                                col,
                                row
                            );
                            continue;
                        }
                    };

                    let members = &mut cells[key];
                    if let Some(pos) = members.iter().position(|m| *m == id) {
                        members.swap_remove(pos);
                    }

                    if members.is_empty() {
                        log::trace!("freeing cell ({}, {})", col, row);
                        r.remove(&col);
                        cell_pool.release(cells.remove(key));
                    }
                }

                r.is_empty()
            };

            if row_now_empty {
                if let Some(r) = rows.remove(&row) {
                    row_pool.release(r);
                }
            }
        }
    }

    /// Call `visit` for every existing cell in `range`, in no particular order.
    ///
    /// Wide ranges over a sparse grid walk the stored rows and columns instead of every coordinate in the range, so a
    /// huge viewport over a few objects stays cheap.
    fn for_each_cell_in(&self, range: &CellRange, mut visit: impl FnMut(CellCoord, &Members)) {
        let row_span = range.row_max.abs_diff(range.row_min).saturating_add(1);
        let col_span = range.col_max.abs_diff(range.col_min).saturating_add(1);

        let mut visit_row = |row: i64, r: &Row| {
            if (r.len() as u64) < col_span {
                for (col, key) in r.iter() {
                    if (range.col_min..=range.col_max).contains(col) {
                        visit(CellCoord { col: *col, row }, &self.cells[*key]);
                    }
                }
            } else {
                for col in range.col_min..=range.col_max {
                    if let Some(key) = r.get(&col) {
                        visit(CellCoord { col, row }, &self.cells[*key]);
                    }
                }
            }
        };

        if (self.rows.len() as u64) < row_span {
            for (row, r) in self.rows.iter() {
                if (range.row_min..=range.row_max).contains(row) {
                    visit_row(*row, r);
                }
            }
        } else {
            for row in range.row_min..=range.row_max {
                if let Some(r) = self.rows.get(&row) {
                    visit_row(row, r);
                }
            }
        }
    }

    /// Gather the handles of every object in `range` that passes `predicate` into `out`.
    ///
    /// Each object is considered once, however many of the range's cells it occupies.
    pub(crate) fn query_range<H: Clone + Eq + std::hash::Hash>(
        &self,
        range: &CellRange,
        registry: &Registry<H>,
        mut predicate: impl FnMut(&H) -> bool,
        out: &mut QueryResults<H>,
    ) {
        self.for_each_cell_in(range, |_, members| {
            for id in members.iter() {
                out.offer(*id, registry.handle_of(*id), &mut predicate);
            }
        });
    }

    pub(crate) fn members(&self, cell: CellCoord) -> Option<&[ObjectId]> {
        let key = self.rows.get(&cell.row)?.get(&cell.col)?;
        Some(self.cells[*key].as_slice())
    }

    /// Every allocated cell and how many objects it holds.
    pub(crate) fn occupied_cells(&self) -> impl Iterator<Item = (CellCoord, usize)> + '_ {
        self.rows.iter().flat_map(move |(row, r)| {
            r.iter().map(move |(col, key)| {
                (
                    CellCoord {
                        col: *col,
                        row: *row,
                    },
                    self.cells[*key].len(),
                )
            })
        })
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn pooled_cells(&self) -> usize {
        self.cell_pool.len()
    }

    pub(crate) fn pooled_rows(&self) -> usize {
        self.row_pool.len()
    }

    pub(crate) fn shrink_pools(&mut self, max: usize) {
        self.cell_pool.shrink_to(max);
        self.row_pool.shrink_to(max);
    }

    /// Free every cell and row, sending their containers to the pools.
    pub(crate) fn clear(&mut self) {
        for (_, r) in self.rows.drain() {
            self.row_pool.release(r);
        }
        for members in self.cells.drain() {
            self.cell_pool.release(members);
        }
    }
}
