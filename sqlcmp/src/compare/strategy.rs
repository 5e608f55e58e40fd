// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Comparison strategy selection

use super::{CompareError, CompareOptions, ComparisonOp};
use crate::collation::CollationRef;
use crate::value::{Item, ResultType};
use std::fmt;

/// Decimals at or above this count mean "not fixed"
const NOT_FIXED_DECIMALS: u8 = 31;

/// How a bound comparator evaluates its operands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompareStrategy {
    /// Both operands signed integers
    SignedInt,
    /// Both operands unsigned integers
    UnsignedInt,
    /// Left signed, right unsigned
    SignedUnsigned,
    /// Left unsigned, right signed
    UnsignedSigned,
    Decimal,
    Float,
    /// Float equality within the given absolute epsilon
    FloatEpsilon(f64),
    /// Byte-wise string comparison
    BinaryString,
    /// String comparison through the cached collation
    CollatedString,
    /// Packed 64-bit temporal comparison
    Temporal,
    /// Column-wise comparison through child comparators
    Row,
}

impl CompareStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            CompareStrategy::SignedInt => "signed-int",
            CompareStrategy::UnsignedInt => "unsigned-int",
            CompareStrategy::SignedUnsigned => "signed-unsigned",
            CompareStrategy::UnsignedSigned => "unsigned-signed",
            CompareStrategy::Decimal => "decimal",
            CompareStrategy::Float => "float",
            CompareStrategy::FloatEpsilon(_) => "float-epsilon",
            CompareStrategy::BinaryString => "binary-string",
            CompareStrategy::CollatedString => "collated-string",
            CompareStrategy::Temporal => "temporal",
            CompareStrategy::Row => "row",
        }
    }

    pub fn epsilon(&self) -> Option<f64> {
        match self {
            CompareStrategy::FloatEpsilon(e) => Some(*e),
            _ => None,
        }
    }
}

impl fmt::Display for CompareStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareStrategy::FloatEpsilon(e) => write!(f, "{}({})", self.name(), e),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Outcome of strategy selection
#[derive(Debug)]
pub(super) struct Selection {
    pub strategy: CompareStrategy,
    /// Present only for collated string comparison
    pub collation: Option<CollationRef>,
}

impl Selection {
    fn plain(strategy: CompareStrategy) -> Self {
        Self {
            strategy,
            collation: None,
        }
    }
}

/// Pick the strategy for comparing `left` with `right`
pub(super) fn select(
    left: &dyn Item,
    right: &dyn Item,
    owner: ComparisonOp,
    options: &CompareOptions,
) -> Result<Selection, CompareError> {
    let left_type = left.result_type();
    let right_type = right.result_type();

    // Arity first: rows compare only with rows of the same width
    if left_type == ResultType::Row || right_type == ResultType::Row {
        if left_type != right_type || left.cols() != right.cols() {
            return Err(CompareError::OperandColumns {
                expected: left.cols(),
                actual: right.cols(),
            });
        }
        return Ok(Selection::plain(CompareStrategy::Row));
    }

    // An untyped operand (NULL) takes the type of the other side
    let mut left_unsigned = left.is_unsigned();
    let mut right_unsigned = right.is_unsigned();
    let (left_type, right_type) = match (left_type, right_type) {
        (ResultType::Unknown, ResultType::Unknown) => (ResultType::String, ResultType::String),
        (ResultType::Unknown, t) => {
            left_unsigned = right_unsigned;
            (t, t)
        }
        (t, ResultType::Unknown) => {
            right_unsigned = left_unsigned;
            (t, t)
        }
        pair => pair,
    };

    if options.temporal || left_type == ResultType::Temporal || right_type == ResultType::Temporal
    {
        return Ok(Selection::plain(CompareStrategy::Temporal));
    }

    if left_type.is_integer() && right_type.is_integer() {
        let strategy = match (left_unsigned, right_unsigned) {
            (false, false) => CompareStrategy::SignedInt,
            (true, true) => CompareStrategy::UnsignedInt,
            (false, true) => CompareStrategy::SignedUnsigned,
            (true, false) => CompareStrategy::UnsignedSigned,
        };
        return Ok(Selection::plain(strategy));
    }

    if left_type == ResultType::Decimal || right_type == ResultType::Decimal {
        return Ok(Selection::plain(CompareStrategy::Decimal));
    }

    if left_type == ResultType::Float || right_type == ResultType::Float {
        let strategy = match float_epsilon(left, right, options) {
            Some(epsilon) => CompareStrategy::FloatEpsilon(epsilon),
            None => CompareStrategy::Float,
        };
        return Ok(Selection::plain(strategy));
    }

    let collation = left
        .collation()
        .aggregate(&right.collation(), owner.symbol())?;
    if collation.collation.is_binary() {
        Ok(Selection::plain(CompareStrategy::BinaryString))
    } else {
        Ok(Selection {
            strategy: CompareStrategy::CollatedString,
            collation: Some(collation.collation),
        })
    }
}

/// Epsilon for approximate float equality, if any applies
fn float_epsilon(left: &dyn Item, right: &dyn Item, options: &CompareOptions) -> Option<f64> {
    if let Some(epsilon) = options.epsilon {
        return Some(epsilon);
    }
    if !options.derive_epsilon_from_decimals {
        return None;
    }
    match (left.decimals(), right.decimals()) {
        (Some(l), Some(r)) if l < NOT_FIXED_DECIMALS && r < NOT_FIXED_DECIMALS => {
            // Half a unit in the last declared digit
            let decimals = i32::from(l.max(r));
            Some(5.0 * 10f64.powi(-(decimals + 1)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation::{self, CollationSpec};
    use crate::value::{Literal, RowItem};
    use rust_decimal::Decimal;

    fn pick(left: &dyn Item, right: &dyn Item) -> CompareStrategy {
        select(left, right, ComparisonOp::Eq, &CompareOptions::default())
            .unwrap()
            .strategy
    }

    #[test]
    fn test_integer_signedness() {
        let s = Literal::int(1);
        let u = Literal::uint(1);
        assert_eq!(pick(&s, &s), CompareStrategy::SignedInt);
        assert_eq!(pick(&u, &u), CompareStrategy::UnsignedInt);
        assert_eq!(pick(&s, &u), CompareStrategy::SignedUnsigned);
        assert_eq!(pick(&u, &s), CompareStrategy::UnsignedSigned);
    }

    #[test]
    fn test_priority_order() {
        let date = crate::value::parse_item("DATE'2024-01-01'").unwrap();
        let int = Literal::int(20240101);
        let dec = Literal::decimal(Decimal::new(15, 1));
        let float = Literal::float(1.5);
        let s = Literal::string("1.5");

        assert_eq!(pick(date.as_ref(), &int), CompareStrategy::Temporal);
        assert_eq!(pick(&s, date.as_ref()), CompareStrategy::Temporal);
        assert_eq!(pick(&int, &dec), CompareStrategy::Decimal);
        assert_eq!(pick(&dec, &float), CompareStrategy::Decimal);
        assert_eq!(pick(&int, &float), CompareStrategy::Float);
        assert_eq!(pick(&s, &float), CompareStrategy::Float);
        assert_eq!(pick(&int, &s), CompareStrategy::BinaryString);

        let temporal_owner = CompareOptions {
            temporal: true,
            ..CompareOptions::default()
        };
        let chosen = select(&s, &s, ComparisonOp::Eq, &temporal_owner).unwrap();
        assert_eq!(chosen.strategy, CompareStrategy::Temporal);
    }

    #[test]
    fn test_null_adopts_other_type() {
        let null = Literal::null();
        assert_eq!(pick(&null, &Literal::uint(3)), CompareStrategy::UnsignedInt);
        assert_eq!(pick(&Literal::float(1.0), &null), CompareStrategy::Float);
        assert_eq!(pick(&null, &null), CompareStrategy::BinaryString);
    }

    #[test]
    fn test_epsilon_selection() {
        let a = Literal::float(1.0).with_decimals(2);
        let b = Literal::float(1.0).with_decimals(1);
        match pick(&a, &b) {
            CompareStrategy::FloatEpsilon(e) => assert!((e - 0.005).abs() < 1e-12),
            other => panic!("unexpected strategy {:?}", other),
        }
        assert_eq!(pick(&a, &Literal::float(2.0)), CompareStrategy::Float);

        let explicit = CompareOptions {
            epsilon: Some(0.1),
            ..CompareOptions::default()
        };
        let chosen = select(&a, &b, ComparisonOp::Eq, &explicit).unwrap();
        assert_eq!(chosen.strategy.epsilon(), Some(0.1));

        let no_derive = CompareOptions {
            derive_epsilon_from_decimals: false,
            ..CompareOptions::default()
        };
        let chosen = select(&a, &b, ComparisonOp::Eq, &no_derive).unwrap();
        assert_eq!(chosen.strategy, CompareStrategy::Float);
    }

    #[test]
    fn test_collation_selection() {
        let ci = collation::lookup("ascii_general_ci").unwrap();
        let utf8 = collation::lookup("utf8_general_ci").unwrap();
        let plain = Literal::string("a");
        let explicit_ci = Literal::string("A").with_collation(CollationSpec::explicit(ci.clone()));

        let chosen = select(&plain, &explicit_ci, ComparisonOp::Eq, &CompareOptions::default())
            .unwrap();
        assert_eq!(chosen.strategy, CompareStrategy::CollatedString);
        assert_eq!(chosen.collation.unwrap().name(), "ascii_general_ci");

        let implicit_ci = Literal::string("a").with_collation(CollationSpec::implicit(ci));
        let implicit_utf8 = Literal::string("a").with_collation(CollationSpec::implicit(utf8));
        let err = select(
            &implicit_ci,
            &implicit_utf8,
            ComparisonOp::Lt,
            &CompareOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CompareError::IllegalCollationMix { ref operation, .. } if operation == "<"
        ));
    }

    #[test]
    fn test_row_arity() {
        let pair = RowItem::new(vec![Box::new(Literal::int(1)), Box::new(Literal::int(2))]);
        let triple = RowItem::new(vec![
            Box::new(Literal::int(1)),
            Box::new(Literal::int(2)),
            Box::new(Literal::int(3)),
        ]);
        assert_eq!(pick(&pair, &pair), CompareStrategy::Row);

        let err = select(&pair, &triple, ComparisonOp::Eq, &CompareOptions::default()).unwrap_err();
        assert_eq!(
            err,
            CompareError::OperandColumns {
                expected: 2,
                actual: 3
            }
        );
        let options = CompareOptions::default();
        assert!(select(&pair, &Literal::int(1), ComparisonOp::Eq, &options).is_err());
    }
}
