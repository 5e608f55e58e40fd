// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sorted vector with binary search membership

use std::cmp::Ordering;
use std::fmt;

/// Strict total order over list elements
pub type OrderFn<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Elements kept sorted and deduplicated under one order function
///
/// Construction sorts and collapses equal neighbours, so every query runs
/// against a sorted array.
pub struct SortedList<T> {
    elements: Vec<T>,
    order: OrderFn<T>,
}

impl<T> SortedList<T> {
    pub fn new(mut elements: Vec<T>, order: OrderFn<T>) -> Self {
        elements.sort_by(|a, b| order(a, b));
        elements.dedup_by(|a, b| order(a, b) == Ordering::Equal);
        Self { elements, order }
    }

    /// Number of distinct elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn contains(&self, probe: &T) -> bool {
        self.position(probe).is_some()
    }

    /// Index of the element equal to `probe` under the order function
    pub fn position(&self, probe: &T) -> Option<usize> {
        self.elements
            .binary_search_by(|element| (self.order)(element, probe))
            .ok()
    }
}

impl<T: fmt::Debug> fmt::Debug for SortedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedList")
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}

/// An integer list element remembering its signedness
///
/// Unsigned values are stored by bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntKey {
    pub value: i64,
    pub unsigned: bool,
}

impl IntKey {
    pub fn signed(value: i64) -> Self {
        Self {
            value,
            unsigned: false,
        }
    }

    pub fn unsigned(value: u64) -> Self {
        Self {
            value: value as i64,
            unsigned: true,
        }
    }
}

/// Order integers of possibly different signedness
///
/// When signedness differs and the unsigned value does not fit in `i64`, the
/// unsigned one is greater. Otherwise both are compared as signed values,
/// except that two unsigned values compare as unsigned.
pub fn cmp_mixed_sign(a: &IntKey, b: &IntKey) -> Ordering {
    if a.unsigned != b.unsigned {
        if a.unsigned && a.value < 0 {
            return Ordering::Greater;
        }
        if b.unsigned && b.value < 0 {
            return Ordering::Less;
        }
    }
    if a.unsigned && b.unsigned {
        return (a.value as u64).cmp(&(b.value as u64));
    }
    a.value.cmp(&b.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn natural() -> OrderFn<i64> {
        Box::new(|a: &i64, b: &i64| a.cmp(b))
    }

    #[test]
    fn test_sort_and_dedup() {
        let list = SortedList::new(vec![5, 1, 3, 1, 5, 5, 2], natural());
        assert_eq!(list.as_slice(), &[1, 2, 3, 5]);
        assert_eq!(list.len(), 4);
        assert!(list.contains(&3));
        assert!(!list.contains(&4));
        assert_eq!(list.position(&5), Some(3));
    }

    #[test]
    fn test_empty() {
        let list = SortedList::new(Vec::new(), natural());
        assert!(list.is_empty());
        assert!(!list.contains(&0));
    }

    #[test]
    fn test_mixed_sign_keys() {
        let big = IntKey::unsigned(u64::MAX);
        let minus_one = IntKey::signed(-1);
        assert_eq!(cmp_mixed_sign(&big, &minus_one), Ordering::Greater);
        assert_eq!(cmp_mixed_sign(&minus_one, &big), Ordering::Less);
        assert_eq!(
            cmp_mixed_sign(&IntKey::unsigned(7), &IntKey::signed(7)),
            Ordering::Equal
        );
        assert_eq!(
            cmp_mixed_sign(&IntKey::unsigned(0), &IntKey::signed(-5)),
            Ordering::Greater
        );
        assert_eq!(
            cmp_mixed_sign(&IntKey::unsigned(u64::MAX), &IntKey::unsigned(1)),
            Ordering::Greater
        );

        let list = SortedList::new(
            vec![big, minus_one, IntKey::unsigned(3), IntKey::signed(3)],
            Box::new(cmp_mixed_sign),
        );
        assert_eq!(list.len(), 3);
        assert!(list.contains(&IntKey::signed(-1)));
        assert!(!list.contains(&IntKey::unsigned(u64::MAX - 1)));
    }

    #[test]
    fn test_custom_order() {
        let by_len: OrderFn<&str> = Box::new(|a: &&str, b: &&str| a.len().cmp(&b.len()));
        let list = SortedList::new(vec!["ccc", "a", "bb", "dd"], by_len);
        assert_eq!(list.len(), 3);
        assert!(list.contains(&"zz"));
    }
}
