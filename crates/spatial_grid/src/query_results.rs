//! The set of handles a query found.
use rustc_hash::FxHashSet;

use crate::pool::Recycle;
use crate::registry::ObjectId;

/// The objects found by one query.
///
/// This is a set: every object appears at most once, and the order of iteration means nothing.  Results are a
/// snapshot of the grid at the time of the query; removing or moving objects afterward does not change them.
///
/// Sets come from a pool inside the index.  Hand them back with
/// [SpatialIndex::recycle](crate::SpatialIndex::recycle) when done to avoid allocating a fresh one next time; simply
/// dropping them is also fine.
#[derive(Debug, Clone)]
pub struct QueryResults<H> {
    /// Ids already considered by the running query, whether or not they passed the predicate.
    seen: FxHashSet<ObjectId>,
    handles: Vec<H>,
}

impl<H> QueryResults<H> {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, H> {
        self.handles.iter()
    }

    /// Take the handles out, giving up the set's allocations.
    pub fn into_vec(self) -> Vec<H> {
        self.handles
    }

    pub fn clear(&mut self) {
        self.seen.clear();
        self.handles.clear();
    }
}

impl<H: PartialEq> QueryResults<H> {
    /// Linear in the size of the set.
    pub fn contains(&self, handle: &H) -> bool {
        self.handles.contains(handle)
    }
}

impl<H: Clone> QueryResults<H> {
    /// Consider one object for inclusion.
    ///
    /// The first time an id is offered, `predicate` decides whether the handle goes in.  Later offers of the same id
    /// are ignored without calling `predicate` again.
    pub(crate) fn offer(&mut self, id: ObjectId, handle: &H, predicate: &mut impl FnMut(&H) -> bool) {
        if self.seen.insert(id) && predicate(handle) {
            self.handles.push(handle.clone());
        }
    }
}

impl<H> Default for QueryResults<H> {
    fn default() -> Self {
        QueryResults {
            seen: Default::default(),
            handles: Vec::new(),
        }
    }
}

impl<H> Recycle for QueryResults<H> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<'a, H> IntoIterator for &'a QueryResults<H> {
    type Item = &'a H;
    type IntoIter = std::slice::Iter<'a, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<H> IntoIterator for QueryResults<H> {
    type Item = H;
    type IntoIter = std::vec::IntoIter<H>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.into_iter()
    }
}
