//! Identity handles.
//!
//! Any `Clone + Eq + Hash` type can be a handle, and for ids, entity keys, and the like that is the right choice.  When
//! the objects being indexed are shared values, two distinct objects can compare equal; wrap the pointer in
//! [ByAddress] so that each physical object is its own key.
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// A pointer compared and hashed by the address it points at, not by the value there.
///
/// ```
/// use std::rc::Rc;
/// use cellgrid_spatial_grid::{ByAddress, SpatialIndex};
///
/// let a = Rc::new("rock");
/// let b = Rc::new("rock");
/// let mut index = SpatialIndex::default();
/// index.add(ByAddress(a.clone()), 0.0, 0.0, 4.0, 4.0).unwrap();
/// index.add(ByAddress(b.clone()), 0.0, 0.0, 4.0, 4.0).unwrap();
/// assert_eq!(index.count(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ByAddress<P>(pub P);

impl<P: Deref> ByAddress<P> {
    fn addr(&self) -> *const () {
        (&*self.0 as *const P::Target).cast::<()>()
    }

    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P: Deref> PartialEq for ByAddress<P> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl<P: Deref> Eq for ByAddress<P> {}

impl<P: Deref> Hash for ByAddress<P> {
    fn hash<HS: Hasher>(&self, state: &mut HS) {
        self.addr().hash(state);
    }
}

impl<P: Deref> Deref for ByAddress<P> {
    type Target = P::Target;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
