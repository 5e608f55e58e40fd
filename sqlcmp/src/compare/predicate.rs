// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Comparison predicates with SQL truth values

use super::{CompareError, CompareOptions, Comparator, ComparisonOp, SqlOrdering};
use crate::context::EvalContext;
use crate::value::Item;

/// `left <op> right`
#[derive(Debug)]
pub struct ComparisonPredicate<'a> {
    op: ComparisonOp,
    comparator: Comparator<'a>,
}

impl<'a> ComparisonPredicate<'a> {
    pub fn bind(
        op: ComparisonOp,
        left: &'a dyn Item,
        right: &'a dyn Item,
        options: &CompareOptions,
    ) -> Result<Self, CompareError> {
        Ok(Self {
            op,
            comparator: Comparator::bind(left, right, op, options)?,
        })
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    pub fn comparator(&self) -> &Comparator<'a> {
        &self.comparator
    }

    /// SQL truth value; `None` is unknown. `<=>` is never unknown.
    pub fn evaluate(&self, ctx: &mut EvalContext) -> Option<bool> {
        match self.op {
            ComparisonOp::NullSafeEq => Some(self.comparator.equal_null_safe(ctx)),
            op => op.truth(self.comparator.compare(ctx)),
        }
    }
}

/// `value [NOT] BETWEEN low AND high`
#[derive(Debug)]
pub struct BetweenPredicate<'a> {
    lower: Comparator<'a>,
    upper: Comparator<'a>,
    negated: bool,
}

impl<'a> BetweenPredicate<'a> {
    pub fn bind(
        value: &'a dyn Item,
        low: &'a dyn Item,
        high: &'a dyn Item,
        negated: bool,
        options: &CompareOptions,
    ) -> Result<Self, CompareError> {
        Ok(Self {
            lower: Comparator::bind(value, low, ComparisonOp::Ge, options)?,
            upper: Comparator::bind(value, high, ComparisonOp::Le, options)?,
            negated,
        })
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Three-valued `value >= low AND value <= high`, negated for NOT BETWEEN
    ///
    /// A bound that is definitely violated makes the result false even when
    /// the other bound is unknown.
    pub fn evaluate(&self, ctx: &mut EvalContext) -> Option<bool> {
        let above_low = ComparisonOp::Ge.truth(self.lower.compare(ctx));
        let within = if above_low == Some(false) {
            Some(false)
        } else {
            match (above_low, ComparisonOp::Le.truth(self.upper.compare(ctx))) {
                (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            }
        };
        if self.negated {
            within.map(|b| !b)
        } else {
            within
        }
    }

    /// Orderings of the value against both bounds
    pub fn orderings(&self, ctx: &mut EvalContext) -> (SqlOrdering, SqlOrdering) {
        (self.lower.compare(ctx), self.upper.compare(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{parse_item, Literal};

    fn eval(op: ComparisonOp, left: &str, right: &str) -> Option<bool> {
        let mut ctx = EvalContext::new();
        let l = parse_item(left).unwrap();
        let r = parse_item(right).unwrap();
        ComparisonPredicate::bind(op, l.as_ref(), r.as_ref(), &CompareOptions::default())
            .unwrap()
            .evaluate(&mut ctx)
    }

    #[test]
    fn test_comparison_truth() {
        assert_eq!(eval(ComparisonOp::Lt, "1", "2"), Some(true));
        assert_eq!(eval(ComparisonOp::Ge, "-1", "0u"), Some(false));
        assert_eq!(eval(ComparisonOp::Eq, "NULL", "1"), None);
        assert_eq!(eval(ComparisonOp::Ne, "'a'", "'b'"), Some(true));
        assert_eq!(eval(ComparisonOp::NullSafeEq, "NULL", "NULL"), Some(true));
        assert_eq!(eval(ComparisonOp::NullSafeEq, "NULL", "1"), Some(false));
        assert_eq!(eval(ComparisonOp::Ne, "(1, NULL)", "(1, 2)"), None);
        assert_eq!(eval(ComparisonOp::Lt, "(1, 3)", "(1, 2)"), Some(false));
    }

    #[test]
    fn test_decimal_against_huge_float() {
        assert_eq!(eval(ComparisonOp::Lt, "1.5d", "1e30"), Some(true));
        assert_eq!(eval(ComparisonOp::Gt, "1.5d", "-1e30"), Some(true));
        assert_eq!(eval(ComparisonOp::Eq, "1e30", "1.5d"), Some(false));
    }

    #[test]
    fn test_between() {
        let mut ctx = EvalContext::new();
        let options = CompareOptions::default();
        let five = Literal::int(5);
        let one = Literal::int(1);
        let ten = Literal::int(10);
        let null = Literal::null();

        let p = BetweenPredicate::bind(&five, &one, &ten, false, &options).unwrap();
        assert_eq!(p.evaluate(&mut ctx), Some(true));
        assert_eq!(
            p.orderings(&mut ctx),
            (SqlOrdering::Greater, SqlOrdering::Less)
        );

        let p = BetweenPredicate::bind(&five, &one, &ten, true, &options).unwrap();
        assert_eq!(p.evaluate(&mut ctx), Some(false));

        // Upper bound unknown, lower satisfied
        let p = BetweenPredicate::bind(&five, &one, &null, false, &options).unwrap();
        assert_eq!(p.evaluate(&mut ctx), None);

        // Upper bound violated wins over an unknown lower bound
        let p = BetweenPredicate::bind(&five, &null, &one, false, &options).unwrap();
        assert_eq!(p.evaluate(&mut ctx), Some(false));
        let p = BetweenPredicate::bind(&five, &null, &one, true, &options).unwrap();
        assert_eq!(p.evaluate(&mut ctx), Some(true));
    }
}
