use std::collections::VecDeque;

/// Most-recent-first sequence with a hard capacity.
///
/// New items go to the front; once the capacity is reached the oldest item
/// falls off the back. Items are never touched after insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedLog<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        self.items.push_front(item);
        self.items.truncate(self.capacity);
    }

    /// Newest entry, if any.
    pub fn first(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_newest_first() {
        let mut log = BoundedLog::with_capacity(3);
        log.push(1);
        log.push(2);
        assert_eq!(log.first(), Some(&2));
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_oldest_dropped_at_capacity() {
        let mut log = BoundedLog::with_capacity(3);
        for i in 0..5 {
            log.push(i);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![4, 3, 2]);
    }

    #[test]
    fn test_zero_capacity_stays_empty() {
        let mut log = BoundedLog::with_capacity(0);
        log.push("x");
        assert!(log.is_empty());
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_capacity(cap in 1usize..100, pushes in proptest::collection::vec(any::<u32>(), 0..400)) {
            let mut log = BoundedLog::with_capacity(cap);
            for p in &pushes {
                log.push(*p);
                prop_assert!(log.len() <= cap);
                prop_assert_eq!(log.first(), Some(p));
            }
            let expected: Vec<u32> = pushes.iter().rev().take(cap).copied().collect();
            prop_assert_eq!(log.iter().copied().collect::<Vec<_>>(), expected);
        }
    }
}
