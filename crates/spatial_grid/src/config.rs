//! Construction-time settings for a [SpatialIndex](crate::SpatialIndex).
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CELL_SIZE: NonZeroU32 = match NonZeroU32::new(32) {
    Some(x) => x,
    None => panic!("32 is not zero"),
};

/// Settings chosen once, when the index is built.
///
/// Pick a cell size a bit larger than the typical object: objects much larger than a cell occupy many cells and
/// make every move expensive, while cells much larger than objects make queries return too many candidates.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Side length of one square cell, in world units.
    pub cell_size: NonZeroU32,

    /// How many objects to reserve registry space for up front.
    pub initial_object_capacity: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            cell_size: DEFAULT_CELL_SIZE,
            initial_object_capacity: 0,
        }
    }
}
