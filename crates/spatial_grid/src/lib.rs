//! A sparse, fixed-size grid for finding which objects might be near a rectangle.
//!
//! Objects are added with an axis-aligned box `(x, y, w, h)` and can be moved and resized every frame.  Queries by
//! rectangle return every object sharing a grid cell with the query, each exactly once.  This is a broad phase: it
//! never misses an overlapping object, but may return nearby objects which don't actually overlap.
//!
//! ```
//! use cellgrid_spatial_grid::SpatialIndex;
//!
//! let mut index = SpatialIndex::default();
//! index.add("player", 10.0, 10.0, 8.0, 8.0).unwrap();
//! index.add("tree", 100.0, 100.0, 8.0, 8.0).unwrap();
//!
//! let visible = index.query(0.0, 0.0, 50.0, 50.0).unwrap();
//! assert_eq!(visible.iter().collect::<Vec<_>>(), vec![&"player"]);
//! index.recycle(visible);
//! ```
mod bbox;
mod cell_range;
mod cell_store;
mod config;
mod errors;
mod handle;
mod pool;
mod query_results;
mod registry;
mod spatial_index;


pub use bbox::*;
pub use cell_range::*;
pub use cell_store::PoolStats;
pub use config::*;
pub use errors::*;
pub use handle::*;
pub use query_results::*;
pub use spatial_index::*;
