//! The registry maps caller handles to dense internal records.
//!
//! Cells refer to objects by [ObjectId], never by handle: ids are small integers which are cheap to hash, compare, and
//! store many times over, whatever the cost of hashing the caller's handle type.
use std::hash::Hash;

use derive_more::Display;
use rustc_hash::FxHashMap;
use slab::Slab;

use crate::bbox::Bbox;
use crate::errors::*;

/// The internal identifier of one live object.
///
/// An id is assigned when a handle is added and stays the same until that handle is removed.  After removal the id
/// may be handed to a later object; by then no cell refers to it.
#[derive(Copy, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display(fmt = "object#{}", _0)]
pub struct ObjectId(usize);

impl ObjectId {
    fn get_key(&self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Record<H> {
    handle: H,
    bbox: Bbox,
}

#[derive(Debug)]
pub(crate) struct Registry<H> {
    ids: FxHashMap<H, ObjectId>,
    records: Slab<Record<H>>,
}

impl<H: Clone + Eq + Hash> Registry<H> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Registry {
            ids: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            records: Slab::with_capacity(capacity),
        }
    }

    /// Register a new handle.  Touches no cells.
    pub(crate) fn add(&mut self, handle: H, bbox: Bbox) -> Result<ObjectId> {
        use std::collections::hash_map::Entry;

        match self.ids.entry(handle) {
            Entry::Occupied(_) => Err(Error::AlreadyExists),
            Entry::Vacant(v) => {
                let key = self.records.insert(Record {
                    handle: v.key().clone(),
                    bbox,
                });
                let id = ObjectId(key);
                v.insert(id);
                Ok(id)
            }
        }
    }

    /// Overwrite a handle's box, returning its id and the box it replaced.
    pub(crate) fn update(&mut self, handle: &H, bbox: Bbox) -> Result<(ObjectId, Bbox)> {
        let id = *self.ids.get(handle).ok_or(Error::UnknownObject)?;
        let record = &mut self.records[id.get_key()];
        let old = std::mem::replace(&mut record.bbox, bbox);
        Ok((id, old))
    }

    /// Forget a handle, returning the id it had and its last box.
    pub(crate) fn remove(&mut self, handle: &H) -> Result<(ObjectId, Bbox)> {
        let id = self.ids.remove(handle).ok_or(Error::UnknownObject)?;
        let record = self.records.remove(id.get_key());
        Ok((id, record.bbox))
    }

    pub(crate) fn get_bbox(&self, handle: &H) -> Option<Bbox> {
        let id = self.ids.get(handle)?;
        Some(self.records[id.get_key()].bbox)
    }

    /// Resolve an id stored in a cell back to the caller's handle.
    ///
    /// # Panics
    ///
    /// If `id` is not live.  Cells only ever hold live ids, so this indicates a bookkeeping bug.
    pub(crate) fn handle_of(&self, id: ObjectId) -> &H {
        &self
            .records
            .get(id.get_key())
            .expect("Cells should only reference live objects")
            .handle
    }

    pub(crate) fn contains(&self, handle: &H) -> bool {
        self.ids.contains_key(handle)
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&H, Bbox)> {
        self.records.iter().map(|(_, r)| (&r.handle, r.bbox))
    }

    #[cfg(test)]
    pub(crate) fn iter_ids(&self) -> impl Iterator<Item = (ObjectId, Bbox)> + '_ {
        self.records.iter().map(|(k, r)| (ObjectId(k), r.bbox))
    }

    pub(crate) fn clear(&mut self) {
        self.ids.clear();
        self.records.clear();
    }
}
