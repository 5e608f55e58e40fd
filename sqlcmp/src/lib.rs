// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! SqlCmp - SQL comparison semantics and aggregate scope resolution
//!
//! SqlCmp is the part of a SQL query processor that decides how two values
//! compare under three-valued logic, and which query block computes each
//! aggregate function occurrence.
//!
//! # Features
//!
//! - **Typed comparators**: The comparison strategy is chosen once, when a
//!   predicate is bound, from the static result types of both operands
//! - **Row comparison**: Tuple comparison with operator-specific NULL handling
//! - **IN lists**: Sorted-vector membership with binary search
//! - **LIKE**: Turbo Boyer-Moore substring search with collation folding
//! - **Aggregate scope**: Binds aggregates in nested subqueries to the query
//!   block that must compute them
//!
//! # Usage
//!
//! ```rust,ignore
//! use sqlcmp::{parse_item, ComparisonOp, ComparisonPredicate, CompareOptions, EvalContext};
//!
//! let left = parse_item("(1, 2)")?;
//! let right = parse_item("(1, 3)")?;
//! let options = CompareOptions::default();
//! let predicate = ComparisonPredicate::bind(ComparisonOp::Lt, &*left, &*right, &options)?;
//! let mut ctx = EvalContext::default();
//! assert_eq!(predicate.evaluate(&mut ctx), Some(true));
//! ```

pub mod collation;
pub mod compare;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod inlist;
pub mod pattern;
pub mod scope;
pub mod value;

pub use collation::{CollationRef, CollationSpec, Derivation};
pub use compare::{
    BetweenPredicate, CompareError, CompareOptions, CompareStrategy, Comparator, ComparisonOp,
    ComparisonPredicate, SqlOrdering,
};
pub use config::EngineConfig;
pub use context::EvalContext;
pub use diagnostics::{Condition, ConditionLevel, Diagnostics};
pub use error::{Error, Result};
pub use inlist::{InPredicate, InVector, ListMatch, SortedList};
pub use pattern::{LikePattern, LikePredicate, TurboBoyerMoore};
pub use scope::{
    AggregateId, BlockId, NestingMap, QueryBlockTree, ScopeError, ScopeOptions, ScopeResolver,
    ScopeState,
};
pub use value::{parse_item, Evaluated, Item, Literal, PackedTemporal, ResultType, RowItem, Value};

/// SqlCmp version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// SqlCmp crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
