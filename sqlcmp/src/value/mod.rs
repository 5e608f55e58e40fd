// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Value accessor contract for expression nodes
//!
//! Expression trees are owned elsewhere; the comparison engine only borrows
//! nodes through the [`Item`] trait. Every accessor returns an explicit
//! [`Evaluated`] pair instead of setting a "null value" flag on the node, so
//! the caller always sees the unknown-ness of the exact evaluation it made.

mod convert;
mod literal;
mod parse;
mod row;
mod temporal;

pub use literal::{Literal, Value};
pub use parse::{parse_item, ParseError};
pub use row::RowItem;
pub use temporal::{PackedTemporal, Temporal};

use crate::collation::CollationSpec;
use crate::context::EvalContext;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Static result type of an expression node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    SignedInt,
    UnsignedInt,
    Decimal,
    Float,
    String,
    Temporal,
    Row,
    /// NULL literal or otherwise untyped
    Unknown,
}

impl ResultType {
    pub fn is_integer(self) -> bool {
        matches!(self, ResultType::SignedInt | ResultType::UnsignedInt)
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ResultType::SignedInt
                | ResultType::UnsignedInt
                | ResultType::Decimal
                | ResultType::Float
        )
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultType::SignedInt => "BIGINT",
            ResultType::UnsignedInt => "BIGINT UNSIGNED",
            ResultType::Decimal => "DECIMAL",
            ResultType::Float => "DOUBLE",
            ResultType::String => "VARCHAR",
            ResultType::Temporal => "DATETIME",
            ResultType::Row => "ROW",
            ResultType::Unknown => "NULL",
        };
        write!(f, "{}", name)
    }
}

/// Result of one evaluation: the value and whether it is SQL NULL
///
/// When `is_unknown` is set the value is a placeholder and must not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluated<T> {
    pub value: T,
    pub is_unknown: bool,
}

impl<T> Evaluated<T> {
    pub fn known(value: T) -> Self {
        Self {
            value,
            is_unknown: false,
        }
    }

    pub fn unknown() -> Self
    where
        T: Default,
    {
        Self {
            value: T::default(),
            is_unknown: true,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.is_unknown
    }

    /// The value, or `None` when unknown
    pub fn into_option(self) -> Option<T> {
        if self.is_unknown {
            None
        } else {
            Some(self.value)
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Evaluated<U> {
        Evaluated {
            value: f(self.value),
            is_unknown: self.is_unknown,
        }
    }
}

impl<T: Default> From<Option<T>> for Evaluated<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Evaluated::known(v),
            None => Evaluated::unknown(),
        }
    }
}

/// Typed value accessors of an expression node
///
/// Accessors may record soft diagnostics in the context (lossy conversion,
/// malformed temporal text). Integer accessors follow the usual convention:
/// `val_int` and `val_uint` return the same 64 bits and `is_unsigned` says
/// how to read them.
pub trait Item: fmt::Debug {
    fn result_type(&self) -> ResultType;

    fn is_unsigned(&self) -> bool {
        self.result_type() == ResultType::UnsignedInt
    }

    /// Declared number of fractional digits, if fixed
    fn decimals(&self) -> Option<u8> {
        None
    }

    fn collation(&self) -> CollationSpec {
        CollationSpec::default()
    }

    /// True when the value cannot change between rows
    fn is_constant(&self) -> bool {
        false
    }

    fn val_int(&self, ctx: &mut EvalContext) -> Evaluated<i64>;

    fn val_uint(&self, ctx: &mut EvalContext) -> Evaluated<u64> {
        self.val_int(ctx).map(|v| v as u64)
    }

    fn val_decimal(&self, ctx: &mut EvalContext) -> Evaluated<Decimal>;

    fn val_real(&self, ctx: &mut EvalContext) -> Evaluated<f64>;

    fn val_str(&self, ctx: &mut EvalContext) -> Evaluated<Cow<'_, [u8]>>;

    fn val_temporal(&self, ctx: &mut EvalContext) -> Evaluated<PackedTemporal> {
        temporal::temporal_from_item(self, ctx)
    }

    /// Number of columns; 1 for scalars
    fn cols(&self) -> usize {
        1
    }

    /// Column `index` of a row
    fn element(&self, _index: usize) -> Option<&dyn Item> {
        None
    }

    /// Evaluate a row as a whole; true when the entire row is NULL
    fn row_is_unknown(&self, _ctx: &mut EvalContext) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluated_pair() {
        let known = Evaluated::known(7i64);
        assert!(!known.is_unknown());
        assert_eq!(known.into_option(), Some(7));

        let unknown: Evaluated<i64> = Evaluated::unknown();
        assert!(unknown.is_unknown());
        assert_eq!(unknown.map(|v| v + 1).into_option(), None);

        let from: Evaluated<u64> = None.into();
        assert!(from.is_unknown());
    }

    #[test]
    fn test_result_type_classes() {
        assert!(ResultType::UnsignedInt.is_integer());
        assert!(ResultType::Decimal.is_numeric());
        assert!(!ResultType::Temporal.is_numeric());
        assert_eq!(ResultType::UnsignedInt.to_string(), "BIGINT UNSIGNED");
    }
}
