//! A free list of reusable containers.
//!
//! Objects crossing cell boundaries every frame would otherwise allocate and free a member list per crossing.  The
//! pool keeps emptied containers around, with their heap capacity, so the next cell to be created can take one.

/// A container that can be emptied for reuse without giving up its allocation.
pub trait Recycle: Default {
    /// Empty the container.  Capacity should be kept.
    fn reset(&mut self);
}

impl<A: smallvec::Array> Recycle for smallvec::SmallVec<A> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<K, V, S: std::hash::BuildHasher + Default> Recycle for std::collections::HashMap<K, V, S> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<K, S: std::hash::BuildHasher + Default> Recycle for std::collections::HashSet<K, S> {
    fn reset(&mut self) {
        self.clear();
    }
}

/// An unbounded stack of empty containers.
///
/// The pool only ever grows to the peak number of containers released at once; it never frees on its own.  Use
/// [Pool::shrink_to] to give memory back.
#[derive(Debug)]
pub struct Pool<T> {
    free: Vec<T>,
}

impl<T: Recycle> Pool<T> {
    pub fn new() -> Self {
        Pool { free: Vec::new() }
    }

    /// Take a container from the pool, or make a fresh one if the pool is empty.
    ///
    /// The returned container is always empty.
    pub fn acquire(&mut self) -> T {
        self.free.pop().unwrap_or_default()
    }

    /// Hand a container back.
    pub fn release(&mut self, mut item: T) {
        item.reset();
        self.free.push(item);
    }

    /// Number of containers waiting to be reused.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Drop pooled containers until at most `max` remain.
    pub fn shrink_to(&mut self, max: usize) {
        self.free.truncate(max);
        self.free.shrink_to_fit();
    }
}

impl<T: Recycle> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use smallvec::SmallVec;

    #[test]
    fn recycles_capacity() {
        let mut pool = Pool::<SmallVec<[u32; 2]>>::new();
        let mut v = pool.acquire();
        v.extend(0..100);
        let cap = v.capacity();
        pool.release(v);
        assert_eq!(pool.len(), 1);

        let v = pool.acquire();
        assert!(v.is_empty());
        assert_eq!(v.capacity(), cap);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn empty_pool_allocates() {
        let mut pool = Pool::<rustc_hash::FxHashSet<u32>>::new();
        let a = pool.acquire();
        let b = pool.acquire();
        assert!(a.is_empty() && b.is_empty());
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.len(), 2);
        pool.shrink_to(1);
        assert_eq!(pool.len(), 1);
    }
}
