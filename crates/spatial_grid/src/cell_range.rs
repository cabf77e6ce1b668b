//! Mapping from world space to grid cells.
use derive_more::Display;

use crate::bbox::Bbox;

/// The integer coordinates of one grid cell.
#[derive(Copy, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display(fmt = "({}, {})", col, row)]
pub struct CellCoord {
    pub col: i64,
    pub row: i64,
}

/// The cells a box covers: `col_min..=col_max` by `row_min..=row_max`.
///
/// Both ranges are inclusive on both ends.  A box lying entirely inside one cell gives `col_min == col_max` and
/// `row_min == row_max`.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct CellRange {
    pub col_min: i64,
    pub row_min: i64,
    pub col_max: i64,
    pub row_max: i64,
}

/// Map a low edge to the cell containing it.
///
/// This must be a floor, not a truncation: `-1.0 / 32.0` is in cell `-1`, not cell `0`.
fn low_cell(v: f64, cell_size: f64) -> i64 {
    (v / cell_size).floor() as i64
}

/// Map a high edge to the last cell it reaches.
///
/// High edges are exclusive, so a box ending exactly on a cell boundary does not spill into the next cell.
fn high_cell(v: f64, cell_size: f64) -> i64 {
    ((v / cell_size).ceil() as i64).saturating_sub(1)
}

impl CellRange {
    /// Compute the range of cells covered by `bbox` on a grid of square cells of side `cell_size`.
    ///
    /// The grid is unbounded; negative coordinates are fine.
    pub fn from_bbox(bbox: &Bbox, cell_size: u32) -> CellRange {
        let cs = f64::from(cell_size);
        let (x2, y2) = bbox.get_p2();
        let col_min = low_cell(bbox.x, cs);
        let row_min = low_cell(bbox.y, cs);

        // For very large coordinates `x + w` can round back down to `x`; never produce an inverted range.
        CellRange {
            col_min,
            row_min,
            col_max: high_cell(x2, cs).max(col_min),
            row_max: high_cell(y2, cs).max(row_min),
        }
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        (self.col_min..=self.col_max).contains(&cell.col)
            && (self.row_min..=self.row_max).contains(&cell.row)
    }

    /// How many cells this range covers.
    pub fn cell_count(&self) -> u64 {
        let cols = self.col_max.abs_diff(self.col_min) + 1;
        let rows = self.row_max.abs_diff(self.row_min) + 1;
        cols.saturating_mul(rows)
    }

    /// Visit every cell of the range, row by row starting from the minimum row:
    ///
    /// `(0, 0), (1, 0), ... (0, 1), (1, 1), ...`
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> {
        let CellRange {
            col_min,
            row_min,
            col_max,
            row_max,
        } = *self;
        (row_min..=row_max)
            .flat_map(move |row| (col_min..=col_max).map(move |col| CellCoord { col, row }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn range(x: f64, y: f64, w: f64, h: f64, cell_size: u32) -> CellRange {
        CellRange::from_bbox(&Bbox::new(x, y, w, h).unwrap(), cell_size)
    }

    #[test]
    fn single_cell() {
        let r = range(10.0, 10.0, 8.0, 8.0, 32);
        assert_eq!(
            r,
            CellRange {
                col_min: 0,
                row_min: 0,
                col_max: 0,
                row_max: 0
            }
        );
        assert_eq!(r.cell_count(), 1);
    }

    #[test]
    fn exact_cell_is_one_cell() {
        let r = range(32.0, 64.0, 32.0, 32.0, 32);
        assert_eq!((r.col_min, r.col_max), (1, 1));
        assert_eq!((r.row_min, r.row_max), (2, 2));
    }

    #[test]
    fn negative_coordinates_floor() {
        // Truncating division would put this in cell 0.
        let r = range(-1.0, -33.0, 0.5, 2.0, 32);
        assert_eq!((r.col_min, r.col_max), (-1, -1));
        assert_eq!((r.row_min, r.row_max), (-2, -1));

        let r = range(-50.0, -50.0, 10.0, 10.0, 32);
        assert_eq!((r.col_min, r.col_max), (-2, -2));
    }

    #[test]
    fn iteration_order_and_count() {
        let r = range(-40.0, 0.0, 60.0, 40.0, 32);
        let cells = r.iter().collect::<Vec<_>>();
        pretty_assertions::assert_eq!(
            cells,
            vec![
                CellCoord { col: -2, row: 0 },
                CellCoord { col: -1, row: 0 },
                CellCoord { col: 0, row: 0 },
                CellCoord { col: -2, row: 1 },
                CellCoord { col: -1, row: 1 },
                CellCoord { col: 0, row: 1 },
            ]
        );
        assert_eq!(r.cell_count(), 6);
    }

    #[test]
    fn huge_coordinates_never_invert() {
        let r = range(1e300, 1e300, 1e-300, 1e-300, 32);
        assert!(r.col_min <= r.col_max);
        assert!(r.row_min <= r.row_max);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10000))]
        #[test]
        fn covers_exactly_the_touched_cells(
            x in -5000.0..5000.0f64,
            y in -5000.0..5000.0f64,
            w in 0.01..300.0f64,
            h in 0.01..300.0f64,
            cell_size in 1..100u32,
        ) {
            let b = Bbox::new(x, y, w, h).unwrap();
            let r = CellRange::from_bbox(&b, cell_size);
            let cs = f64::from(cell_size);

            // Division rounding can land a hair on either side of a boundary.
            let eps = 1e-6;

            // The corner cell holds the top-left point.
            prop_assert!(r.col_min as f64 * cs <= x + eps && x < (r.col_min + 1) as f64 * cs + eps);
            prop_assert!(r.row_min as f64 * cs <= y + eps && y < (r.row_min + 1) as f64 * cs + eps);

            // The far cells start strictly before the far edges, and the next ones do not.
            prop_assert!((r.col_max as f64) * cs < x + w + eps);
            prop_assert!((r.col_max + 1) as f64 * cs + eps >= x + w);
            prop_assert!((r.row_max as f64) * cs < y + h + eps);
            prop_assert!((r.row_max + 1) as f64 * cs + eps >= y + h);
        }
    }
}
