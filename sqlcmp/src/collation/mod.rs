// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Collations for string comparison
//!
//! A collation is an external collaborator: the comparator only needs a
//! three-way compare over byte strings, plus (for single-byte collations) a
//! sort-order table that maps every byte to its folded weight. The pattern
//! matcher uses that table to fold characters before comparing them.

mod builtin;
mod registry;

pub use builtin::{AsciiGeneralCi, BinaryCollation, Utf8GeneralCi};
pub use registry::{binary, lookup, CollationRegistry};

use crate::compare::CompareError;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Pluggable string collation
pub trait Collation: fmt::Debug + Send + Sync {
    /// Registered name, lowercase
    fn name(&self) -> &str;

    /// True when comparison is plain byte order
    fn is_binary(&self) -> bool {
        false
    }

    /// Three-way comparison of two byte strings
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering;

    /// Weight table for single-byte collations
    fn sort_order(&self) -> Option<&[u8; 256]> {
        None
    }

    /// Fold one character for pattern matching in multi-byte collations
    fn fold_char(&self, c: char) -> char {
        c
    }

    /// True when characters may span more than one byte
    fn is_multibyte(&self) -> bool {
        !self.is_binary() && self.sort_order().is_none()
    }
}

/// Shared handle to a collation
pub type CollationRef = Arc<dyn Collation>;

/// How strongly an operand insists on its collation
///
/// Lower values win when two operands are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Derivation {
    /// COLLATE clause
    Explicit,
    /// Column or expression with a declared collation
    Implicit,
    /// Literal
    Coercible,
    /// NULL, or a value with no string nature
    Ignorable,
}

/// A collation together with its derivation
#[derive(Debug, Clone)]
pub struct CollationSpec {
    pub collation: CollationRef,
    pub derivation: Derivation,
}

impl CollationSpec {
    pub fn new(collation: CollationRef, derivation: Derivation) -> Self {
        Self {
            collation,
            derivation,
        }
    }

    pub fn coercible(collation: CollationRef) -> Self {
        Self::new(collation, Derivation::Coercible)
    }

    pub fn implicit(collation: CollationRef) -> Self {
        Self::new(collation, Derivation::Implicit)
    }

    pub fn explicit(collation: CollationRef) -> Self {
        Self::new(collation, Derivation::Explicit)
    }

    /// Binary collation that yields to anything else
    pub fn ignorable() -> Self {
        Self::new(binary(), Derivation::Ignorable)
    }

    pub fn name(&self) -> &str {
        self.collation.name()
    }

    /// Pick the collation used when comparing operands with these two specs
    pub fn aggregate(&self, other: &CollationSpec, operation: &str) -> Result<Self, CompareError> {
        if self.name() == other.name() {
            let derivation = self.derivation.min(other.derivation);
            return Ok(Self::new(self.collation.clone(), derivation));
        }

        match self.derivation.cmp(&other.derivation) {
            Ordering::Less => Ok(self.clone()),
            Ordering::Greater => Ok(other.clone()),
            Ordering::Equal => {
                if self.collation.is_binary() {
                    Ok(self.clone())
                } else if other.collation.is_binary() {
                    Ok(other.clone())
                } else {
                    Err(CompareError::IllegalCollationMix {
                        left: format!("{},{:?}", self.name(), self.derivation),
                        right: format!("{},{:?}", other.name(), other.derivation),
                        operation: operation.to_string(),
                    })
                }
            }
        }
    }
}

impl Default for CollationSpec {
    fn default() -> Self {
        Self::coercible(binary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ci() -> CollationRef {
        lookup("ascii_general_ci").unwrap()
    }

    fn utf8() -> CollationRef {
        lookup("utf8_general_ci").unwrap()
    }

    #[test]
    fn test_stronger_derivation_wins() {
        let column = CollationSpec::implicit(ci());
        let literal = CollationSpec::coercible(utf8());

        let agg = column.aggregate(&literal, "=").unwrap();
        assert_eq!(agg.name(), "ascii_general_ci");
        assert_eq!(agg.derivation, Derivation::Implicit);

        let agg = literal.aggregate(&column, "=").unwrap();
        assert_eq!(agg.name(), "ascii_general_ci");
    }

    #[test]
    fn test_binary_wins_at_equal_derivation() {
        let left = CollationSpec::implicit(ci());
        let right = CollationSpec::implicit(binary());
        assert!(left.aggregate(&right, "=").unwrap().collation.is_binary());
    }

    #[test]
    fn test_illegal_mix() {
        let left = CollationSpec::implicit(ci());
        let right = CollationSpec::implicit(utf8());
        let err = left.aggregate(&right, "<").unwrap_err();
        assert!(matches!(err, CompareError::IllegalCollationMix { .. }));
        assert!(err.to_string().contains("'<'"));
    }

    #[test]
    fn test_ignorable_yields() {
        let null = CollationSpec::ignorable();
        let column = CollationSpec::implicit(ci());
        assert_eq!(null.aggregate(&column, "=").unwrap().name(), "ascii_general_ci");
    }
}
