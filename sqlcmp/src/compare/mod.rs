// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Three-valued comparison of expression nodes
//!
//! A [`Comparator`] is bound once per operand pair. Binding inspects the
//! static result types and collations of both operands and fixes a
//! [`CompareStrategy`]; evaluation then dispatches on that tag without any
//! further type inspection.

mod comparator;
mod error;
mod predicate;
mod row;
mod scalar;
mod strategy;

pub use comparator::Comparator;
pub use error::CompareError;
pub(crate) use error::reserve;
pub use predicate::{BetweenPredicate, ComparisonPredicate};
pub use scalar::DecimalKey;
pub use strategy::CompareStrategy;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Ordering result under three-valued logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlOrdering {
    Less,
    Equal,
    Greater,
    /// At least one operand was NULL
    Unknown,
}

impl SqlOrdering {
    pub fn is_unknown(self) -> bool {
        self == SqlOrdering::Unknown
    }

    pub fn is_equal(self) -> bool {
        self == SqlOrdering::Equal
    }

    /// The ordering, or `None` when unknown
    pub fn as_ordering(self) -> Option<Ordering> {
        match self {
            SqlOrdering::Less => Some(Ordering::Less),
            SqlOrdering::Equal => Some(Ordering::Equal),
            SqlOrdering::Greater => Some(Ordering::Greater),
            SqlOrdering::Unknown => None,
        }
    }

    /// Result of the same comparison with operands swapped
    pub fn reverse(self) -> Self {
        match self {
            SqlOrdering::Less => SqlOrdering::Greater,
            SqlOrdering::Greater => SqlOrdering::Less,
            other => other,
        }
    }
}

impl From<Ordering> for SqlOrdering {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => SqlOrdering::Less,
            Ordering::Equal => SqlOrdering::Equal,
            Ordering::Greater => SqlOrdering::Greater,
        }
    }
}

impl From<Option<Ordering>> for SqlOrdering {
    fn from(ordering: Option<Ordering>) -> Self {
        ordering.map_or(SqlOrdering::Unknown, SqlOrdering::from)
    }
}

impl fmt::Display for SqlOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SqlOrdering::Less => "LESS",
            SqlOrdering::Equal => "EQUAL",
            SqlOrdering::Greater => "GREATER",
            SqlOrdering::Unknown => "UNKNOWN",
        };
        write!(f, "{}", text)
    }
}

/// The operator owning a comparator
///
/// Row comparison consults the owner to decide how a NULL column affects
/// the overall result. `Other` stands for owners that are not comparison
/// predicates, such as MIN/MAX accumulation; their truth value is equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    NullSafeEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Other,
}

impl ComparisonOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::NullSafeEq => "<=>",
            ComparisonOp::Ne => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Other => "comparison",
        }
    }

    /// True for `<`, `<=`, `>`, `>=`
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            ComparisonOp::Lt | ComparisonOp::Le | ComparisonOp::Gt | ComparisonOp::Ge
        )
    }

    /// The operator that gives the same answer with operands swapped
    pub fn swap(self) -> Self {
        match self {
            ComparisonOp::Lt => ComparisonOp::Gt,
            ComparisonOp::Le => ComparisonOp::Ge,
            ComparisonOp::Gt => ComparisonOp::Lt,
            ComparisonOp::Ge => ComparisonOp::Le,
            other => other,
        }
    }

    /// SQL truth value of this operator for an ordering result
    ///
    /// `<=>` is never evaluated through an ordering; it treats unknown as
    /// "not equal" here.
    pub fn truth(self, ordering: SqlOrdering) -> Option<bool> {
        if self == ComparisonOp::NullSafeEq {
            return Some(ordering.is_equal());
        }
        let ordering = ordering.as_ordering()?;
        Some(match self {
            ComparisonOp::Eq | ComparisonOp::NullSafeEq | ComparisonOp::Other => {
                ordering == Ordering::Equal
            }
            ComparisonOp::Ne => ordering != Ordering::Equal,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::Le => ordering != Ordering::Greater,
            ComparisonOp::Gt => ordering == Ordering::Greater,
            ComparisonOp::Ge => ordering != Ordering::Less,
        })
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for ComparisonOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "=" | "eq" => Ok(ComparisonOp::Eq),
            "<=>" | "nseq" => Ok(ComparisonOp::NullSafeEq),
            "<>" | "!=" | "ne" => Ok(ComparisonOp::Ne),
            "<" | "lt" => Ok(ComparisonOp::Lt),
            "<=" | "le" => Ok(ComparisonOp::Le),
            ">" | "gt" => Ok(ComparisonOp::Gt),
            ">=" | "ge" => Ok(ComparisonOp::Ge),
            other => Err(format!("unknown comparison operator '{}'", other)),
        }
    }
}

/// Options fixed when a comparator is bound
#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    /// The owner is a direct date/datetime comparison
    pub temporal: bool,

    /// Approximate float equality epsilon requested by the owner
    pub epsilon: Option<f64>,

    /// Derive an epsilon when both float operands declare their decimals
    pub derive_epsilon_from_decimals: bool,

    /// A NULL column under `=` ends a row comparison at once
    pub abort_on_null: bool,

    /// Largest IN list materialized into a sorted vector
    pub max_in_list_elements: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            temporal: false,
            epsilon: None,
            derive_epsilon_from_decimals: true,
            abort_on_null: false,
            max_in_list_elements: 1_000_000,
        }
    }
}
