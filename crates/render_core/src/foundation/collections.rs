//! Id-keyed resource pools
//!
//! Every renderer resource lives in an [`IdPool`], keyed by a small positive
//! integer. Ids are recycled: a new insertion always receives the smallest id
//! that is not currently in use, so `create → destroy → create` hands back the
//! same id. Zero is never allocated and stands for "no resource".

use std::collections::{BTreeMap, BTreeSet};

/// Opaque resource identifier, unique within one pool at any instant
pub type ResourceId = u32;

/// Reserved identifier that never refers to a live resource
pub const INVALID_ID: ResourceId = 0;

/// Smallest-available id allocator
///
/// Keeps a high-water mark plus the set of released ids below it. Releasing
/// the current maximum lowers the mark (and swallows any released ids that
/// become the new maximum) instead of growing the free set, so freeing ids in
/// allocation order does not accumulate bookkeeping.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    high_water: ResourceId,
    free_ids: BTreeSet<ResourceId>,
}

impl IdAllocator {
    /// Create an allocator with no ids handed out
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the smallest unused id, or `None` once the id space is exhausted
    pub fn allocate(&mut self) -> Option<ResourceId> {
        if let Some(id) = self.free_ids.pop_first() {
            return Some(id);
        }
        self.high_water = self.high_water.checked_add(1)?;
        Some(self.high_water)
    }

    /// Return an id to the allocator
    ///
    /// Returns `false` for ids that were never handed out or are already free.
    pub fn release(&mut self, id: ResourceId) -> bool {
        if id == INVALID_ID || id > self.high_water || self.free_ids.contains(&id) {
            return false;
        }

        if id == self.high_water {
            self.high_water -= 1;
            while self.free_ids.last() == Some(&self.high_water) && self.high_water != INVALID_ID {
                self.free_ids.pop_last();
                self.high_water -= 1;
            }
        } else {
            self.free_ids.insert(id);
        }
        true
    }

    /// Largest id currently reserved (zero when nothing is allocated)
    pub fn high_water_mark(&self) -> ResourceId {
        self.high_water
    }

    /// Number of released ids waiting below the high-water mark
    pub fn free_count(&self) -> usize {
        self.free_ids.len()
    }
}

/// Map from [`ResourceId`] to an owned resource, with id recycling
///
/// Iteration is in ascending id order, which makes draw order deterministic.
#[derive(Debug)]
pub struct IdPool<T> {
    items: BTreeMap<ResourceId, T>,
    allocator: IdAllocator,
}

impl<T> IdPool<T> {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            allocator: IdAllocator::new(),
        }
    }

    /// Insert a resource and return its id
    ///
    /// On id exhaustion the resource is handed back so the caller can release it.
    pub fn insert(&mut self, item: T) -> Result<ResourceId, T> {
        match self.allocator.allocate() {
            Some(id) => {
                self.items.insert(id, item);
                Ok(id)
            }
            None => Err(item),
        }
    }

    /// Remove a resource, releasing its id for reuse
    pub fn remove(&mut self, id: ResourceId) -> Option<T> {
        let item = self.items.remove(&id)?;
        self.allocator.release(id);
        Some(item)
    }

    /// Get a resource by id
    pub fn get(&self, id: ResourceId) -> Option<&T> {
        self.items.get(&id)
    }

    /// Get a mutable reference to a resource by id
    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut T> {
        self.items.get_mut(&id)
    }

    /// Whether `id` currently names a resource in this pool
    pub fn contains(&self, id: ResourceId) -> bool {
        self.items.contains_key(&id)
    }

    /// Number of live resources
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the pool holds no resources
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over live resources in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &T)> {
        self.items.iter().map(|(id, item)| (*id, item))
    }

    /// Iterate mutably over live resources in ascending id order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ResourceId, &mut T)> {
        self.items.iter_mut().map(|(id, item)| (*id, item))
    }

    /// Iterate over live resources without their ids
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    /// Remove every resource, resetting id allocation
    pub fn drain(&mut self) -> impl Iterator<Item = (ResourceId, T)> {
        self.allocator = IdAllocator::new();
        std::mem::take(&mut self.items).into_iter()
    }
}

impl<T> Default for IdPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one() {
        let mut allocator = IdAllocator::new();
        assert_eq!(allocator.allocate(), Some(1));
        assert_eq!(allocator.allocate(), Some(2));
        assert_eq!(allocator.allocate(), Some(3));
    }

    #[test]
    fn test_smallest_released_id_is_reused_first() {
        let mut allocator = IdAllocator::new();
        for _ in 0..5 {
            allocator.allocate();
        }

        assert!(allocator.release(4));
        assert!(allocator.release(2));

        assert_eq!(allocator.allocate(), Some(2));
        assert_eq!(allocator.allocate(), Some(4));
        assert_eq!(allocator.allocate(), Some(6));
    }

    #[test]
    fn test_releasing_maximum_lowers_mark() {
        let mut allocator = IdAllocator::new();
        for _ in 0..3 {
            allocator.allocate();
        }

        allocator.release(3);
        assert_eq!(allocator.high_water_mark(), 2);
        assert_eq!(allocator.free_count(), 0);
    }

    #[test]
    fn test_mark_collapses_over_free_tail() {
        let mut allocator = IdAllocator::new();
        for _ in 0..4 {
            allocator.allocate();
        }

        allocator.release(2);
        allocator.release(3);
        assert_eq!(allocator.free_count(), 2);

        // Releasing 4 leaves 1 as the only live id
        allocator.release(4);
        assert_eq!(allocator.high_water_mark(), 1);
        assert_eq!(allocator.free_count(), 0);
        assert_eq!(allocator.allocate(), Some(2));
    }

    #[test]
    fn test_release_rejects_unknown_and_double_free() {
        let mut allocator = IdAllocator::new();
        allocator.allocate();
        allocator.allocate();

        assert!(!allocator.release(INVALID_ID));
        assert!(!allocator.release(9));
        assert!(allocator.release(1));
        assert!(!allocator.release(1));
        assert_eq!(allocator.allocate(), Some(1));
        assert_eq!(allocator.allocate(), Some(3));
    }

    #[test]
    fn test_pool_create_destroy_create_reuses_id() {
        let mut pool = IdPool::new();
        let first = pool.insert("a").unwrap();
        pool.remove(first);
        let second = pool.insert("b").unwrap();

        assert_eq!(first, second);
        assert_eq!(pool.get(second), Some(&"b"));
    }

    #[test]
    fn test_pool_remove_unknown_keeps_allocator_intact() {
        let mut pool = IdPool::new();
        let a = pool.insert(10).unwrap();
        assert!(pool.remove(42).is_none());
        assert!(pool.remove(a).is_some());
        assert!(pool.remove(a).is_none());
        assert_eq!(pool.insert(11).unwrap(), 1);
    }

    #[test]
    fn test_pool_iterates_in_id_order() {
        let mut pool = IdPool::new();
        for value in ["x", "y", "z"] {
            pool.insert(value).unwrap();
        }
        pool.remove(2);

        let ids: Vec<_> = pool.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_drain_resets_allocation() {
        let mut pool = IdPool::new();
        pool.insert(1).unwrap();
        pool.insert(2).unwrap();

        assert_eq!(pool.drain().count(), 2);
        assert!(pool.is_empty());
        assert_eq!(pool.insert(3).unwrap(), 1);
    }
}
