// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! IN list membership
//!
//! Constant lists are evaluated once into a sorted, deduplicated vector of
//! keys and probed by binary search. Lists that cannot be materialized (non
//! constant elements, incompatible element types, rows with NULL columns)
//! are answered by comparing the probe against every element in turn.

mod predicate;
mod sorted;
mod vector;

pub use predicate::InPredicate;
pub use sorted::{cmp_mixed_sign, IntKey, OrderFn, SortedList};
pub use vector::{InVector, KeyKind, ListKey};

use std::fmt;

/// Outcome of a membership query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListMatch {
    Found,
    NotFound,
    /// The probe was NULL
    Unknown,
}

impl fmt::Display for ListMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ListMatch::Found => "FOUND",
            ListMatch::NotFound => "NOT FOUND",
            ListMatch::Unknown => "UNKNOWN",
        };
        write!(f, "{}", text)
    }
}
