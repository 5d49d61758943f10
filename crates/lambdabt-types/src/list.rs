//! [`PersistentList`] – immutable singly-linked list with shared tails.
//!
//! `cons` never copies its tail: the new cell points at the same `Arc` the
//! tail already owns. Since no operation mutates a cell after construction,
//! any number of lists (and the composites holding them) can share a tail.
//!
//! # Example
//!
//! ```rust
//! use lambdabt_types::PersistentList;
//!
//! let base = PersistentList::from_vec(vec![2, 3]);
//! let a = PersistentList::cons(1, base.clone());
//! let b = PersistentList::cons(9, base.clone());
//!
//! assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! assert!(a.tail().unwrap().ptr_eq(b.tail().unwrap()));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::BtError;

struct ConsCell<T> {
    head: T,
    tail: PersistentList<T>,
}

/// An immutable list that is either empty or a head followed by a tail.
pub struct PersistentList<T> {
    cell: Option<Arc<ConsCell<T>>>,
}

impl<T> PersistentList<T> {
    /// The empty list.
    pub fn empty() -> Self {
        Self { cell: None }
    }

    /// Prepend `head` to `tail` in O(1).
    pub fn cons(head: T, tail: PersistentList<T>) -> Self {
        Self {
            cell: Some(Arc::new(ConsCell { head, tail })),
        }
    }

    /// Build a list holding `items` in order; the first item becomes the head.
    pub fn from_vec(items: Vec<T>) -> Self {
        items
            .into_iter()
            .rev()
            .fold(Self::empty(), |tail, head| Self::cons(head, tail))
    }

    pub fn is_empty(&self) -> bool {
        self.cell.is_none()
    }

    /// First element.
    ///
    /// Returns [`BtError::InvalidOperation`] on the empty list.
    pub fn head(&self) -> Result<&T, BtError> {
        self.cell
            .as_deref()
            .map(|c| &c.head)
            .ok_or(BtError::InvalidOperation("head of empty list"))
    }

    /// Everything after the head.
    ///
    /// Returns [`BtError::InvalidOperation`] on the empty list.
    pub fn tail(&self) -> Result<&PersistentList<T>, BtError> {
        self.cell
            .as_deref()
            .map(|c| &c.tail)
            .ok_or(BtError::InvalidOperation("tail of empty list"))
    }

    /// Number of elements. O(n).
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.cell.as_deref(),
        }
    }

    /// `true` when both lists are the same shared structure (or both empty).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.cell, &other.cell) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T> Clone for PersistentList<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> Default for PersistentList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

// Unlink uniquely-owned cells one at a time so long lists don't blow the
// stack through nested `Arc` drops.
impl<T> Drop for PersistentList<T> {
    fn drop(&mut self) {
        let mut next = self.cell.take();
        while let Some(cell) = next {
            match Arc::try_unwrap(cell) {
                Ok(mut owned) => next = owned.tail.cell.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T> From<Vec<T>> for PersistentList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> FromIterator<T> for PersistentList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a PersistentList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator from head to end.
pub struct Iter<'a, T> {
    next: Option<&'a ConsCell<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.next?;
        self.next = cell.tail.cell.as_deref();
        Some(&cell.head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_no_head_or_tail() {
        let list: PersistentList<u8> = PersistentList::empty();
        assert!(list.is_empty());
        assert_eq!(
            list.head().unwrap_err(),
            BtError::InvalidOperation("head of empty list")
        );
        assert!(matches!(list.tail(), Err(BtError::InvalidOperation(_))));
    }

    #[test]
    fn cons_puts_value_at_head() {
        let list = PersistentList::cons("a", PersistentList::empty());
        assert!(!list.is_empty());
        assert_eq!(*list.head().unwrap(), "a");
        assert!(list.tail().unwrap().is_empty());
    }

    #[test]
    fn from_vec_preserves_order() {
        let list = PersistentList::from_vec(vec![1, 2, 3]);
        assert_eq!(*list.head().unwrap(), 1);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn from_empty_vec_is_empty() {
        let list: PersistentList<i32> = Vec::new().into();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn collect_matches_from_vec() {
        let list: PersistentList<char> = "xyz".chars().collect();
        assert_eq!(format!("{list:?}"), "['x', 'y', 'z']");
    }

    #[test]
    fn shared_tail_is_not_copied() {
        let l1 = PersistentList::from_vec(vec![10, 20]);
        let l2 = PersistentList::cons(1, l1.clone());
        let l3 = PersistentList::cons(2, l1.clone());

        assert!(l2.tail().unwrap().ptr_eq(&l1));
        assert!(l3.tail().unwrap().ptr_eq(&l1));
        assert!(!l2.ptr_eq(&l3));
    }

    #[test]
    fn dropping_one_sharer_leaves_others_intact() {
        let l1 = PersistentList::from_vec(vec![10, 20]);
        let l2 = PersistentList::cons(1, l1.clone());
        let l3 = PersistentList::cons(2, l1.clone());
        drop(l2);
        drop(l1);
        assert_eq!(l3.iter().copied().collect::<Vec<_>>(), vec![2, 10, 20]);
    }

    #[test]
    fn dropping_a_long_list_does_not_overflow() {
        let list: PersistentList<u32> = (0..200_000).collect();
        assert_eq!(list.len(), 200_000);
        drop(list);
    }
}
