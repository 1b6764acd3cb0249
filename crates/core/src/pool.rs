//! Pool module - reusable handles with a rotating cursor and lazy growth
//!
//! The pool never tracks free/busy state itself: every element exposes one
//! authoritative [`Pooled::in_use`] flag and callers release an element simply
//! by clearing that flag on the element.
//!
//! Acquisition advances the cursor one slot at a time (modulo the current
//! length) and returns the first slot that is not in use. After a full sweep
//! without success the pool grows by exactly one element. Acquisition therefore
//! never fails, and the pool never shrinks.

/// An element that can live in a [`ResourcePool`].
pub trait Pooled {
    fn in_use(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct ResourcePool<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> Default for ResourcePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResourcePool<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
        }
    }

    /// Build `count` elements up front. `make` receives each element's index.
    pub fn prewarm(count: usize, mut make: impl FnMut(usize) -> T) -> Self {
        let mut pool = Self {
            items: Vec::with_capacity(count),
            cursor: 0,
        };
        for index in 0..count {
            pool.items.push(make(index));
        }
        pool
    }

    /// Append an element and return its index.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slot the last acquisition stopped at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Mutable view for collaborators that update elements in place
    /// (including clearing their in-use flag).
    pub fn items_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: Pooled> ResourcePool<T> {
    /// Return the index of an element that is not in use.
    ///
    /// `grow` is only called when every existing element is in use; it receives
    /// the index the new element will occupy.
    pub fn acquire(&mut self, grow: impl FnOnce(usize) -> T) -> usize {
        let len = self.items.len();
        for _ in 0..len {
            self.cursor = (self.cursor + 1) % len;
            if !self.items[self.cursor].in_use() {
                return self.cursor;
            }
        }

        let index = len;
        let item = grow(index);
        self.push(item)
    }

    pub fn in_use_count(&self) -> usize {
        self.items.iter().filter(|item| item.in_use()).count()
    }

    /// Indices of elements currently in use, in pool order.
    pub fn in_use_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.in_use())
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Slot {
        busy: bool,
    }

    impl Pooled for Slot {
        fn in_use(&self) -> bool {
            self.busy
        }
    }

    fn take(pool: &mut ResourcePool<Slot>) -> usize {
        let index = pool.acquire(|_| Slot::default());
        pool.get_mut(index).unwrap().busy = true;
        index
    }

    #[test]
    fn first_acquire_probes_after_cursor() {
        let mut pool = ResourcePool::prewarm(5, |_| Slot::default());
        assert_eq!(take(&mut pool), 1);
        assert_eq!(take(&mut pool), 2);
        assert_eq!(pool.cursor(), 2);
    }

    #[test]
    fn cursor_wraps_to_free_low_slots() {
        let mut pool = ResourcePool::prewarm(3, |_| Slot::default());
        assert_eq!(take(&mut pool), 1);
        assert_eq!(take(&mut pool), 2);
        assert_eq!(take(&mut pool), 0);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn grows_by_exactly_one_when_exhausted() {
        let mut pool = ResourcePool::prewarm(2, |_| Slot::default());
        take(&mut pool);
        take(&mut pool);

        let mut grown_at = None;
        let index = pool.acquire(|i| {
            grown_at = Some(i);
            Slot::default()
        });

        assert_eq!(index, 2);
        assert_eq!(grown_at, Some(2));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn growth_leaves_cursor_in_place() {
        let mut pool = ResourcePool::prewarm(2, |_| Slot::default());
        take(&mut pool);
        take(&mut pool);
        let cursor = pool.cursor();
        take(&mut pool);
        assert_eq!(pool.cursor(), cursor);
    }

    #[test]
    fn empty_pool_grows_on_first_acquire() {
        let mut pool: ResourcePool<Slot> = ResourcePool::new();
        assert!(pool.is_empty());
        assert_eq!(take(&mut pool), 0);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn released_slot_is_reused_before_growing() {
        let mut pool = ResourcePool::prewarm(3, |_| Slot::default());
        let a = take(&mut pool);
        take(&mut pool);
        take(&mut pool);

        pool.get_mut(a).unwrap().busy = false;
        assert_eq!(take(&mut pool), a);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn never_hands_out_busy_slots_and_never_shrinks() {
        let mut pool = ResourcePool::prewarm(4, |_| Slot::default());
        let mut last_len = pool.len();

        // Deterministic interleaving of acquisitions and releases.
        for step in 0..200usize {
            let index = pool.acquire(|_| Slot::default());
            assert!(!pool.get(index).unwrap().in_use());
            pool.get_mut(index).unwrap().busy = true;

            if step % 3 == 0 {
                let victim = (step * 7) % pool.len();
                pool.get_mut(victim).unwrap().busy = false;
            }

            assert!(pool.len() >= last_len);
            last_len = pool.len();
        }
    }

    #[test]
    fn in_use_indices_follow_pool_order() {
        let mut pool = ResourcePool::prewarm(4, |_| Slot::default());
        pool.get_mut(3).unwrap().busy = true;
        pool.get_mut(1).unwrap().busy = true;
        assert_eq!(pool.in_use_indices().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(pool.in_use_count(), 2);
    }
}
