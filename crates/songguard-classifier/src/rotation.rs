//! Round-robin rotation over a fixed list of redundant resources

use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed ordered list plus a shared cursor.
///
/// `next` reads and advances the cursor in one atomic step, so concurrent
/// callers never observe the same position twice within a cycle.
#[derive(Debug)]
pub struct RotationPool<T> {
    items: Vec<T>,
    cursor: AtomicUsize,
}

impl<T> RotationPool<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Index of the next item, wrapping after the last one.
    pub fn next_index(&self) -> Option<usize> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        let previous = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
            .unwrap_or_else(|i| i);
        Some(previous % len)
    }

    pub fn next(&self) -> Option<&T> {
        self.next_index().map(|i| &self.items[i])
    }
}
