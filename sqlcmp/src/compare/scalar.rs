// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Scalar comparison strategies
//!
//! Ordering functions evaluate the left operand first and return
//! [`SqlOrdering::Unknown`] without touching the right operand when the left
//! one is NULL. Null-safe equality functions always evaluate both operands;
//! two NULLs are equal, one NULL is not.

use super::SqlOrdering;
use crate::collation::Collation;
use crate::context::EvalContext;
use crate::value::{Evaluated, Item, ResultType};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Evaluate both sides for an ordering comparison, left first
macro_rules! eval_pair {
    ($left:expr, $right:expr, $ctx:expr, $accessor:ident) => {{
        let a = $left.$accessor($ctx);
        if a.is_unknown() {
            return SqlOrdering::Unknown;
        }
        let b = $right.$accessor($ctx);
        if b.is_unknown() {
            return SqlOrdering::Unknown;
        }
        (a.value, b.value)
    }};
}

/// Null-safe equality over two evaluated values
fn null_safe<A, B>(a: Evaluated<A>, b: Evaluated<B>, eq: impl FnOnce(A, B) -> bool) -> bool {
    match (a.is_unknown, b.is_unknown) {
        (true, true) => true,
        (false, false) => eq(a.value, b.value),
        _ => false,
    }
}

pub(super) fn compare_signed(
    left: &dyn Item,
    right: &dyn Item,
    ctx: &mut EvalContext,
) -> SqlOrdering {
    let (a, b) = eval_pair!(left, right, ctx, val_int);
    a.cmp(&b).into()
}

pub(super) fn equal_signed(left: &dyn Item, right: &dyn Item, ctx: &mut EvalContext) -> bool {
    let a = left.val_int(ctx);
    let b = right.val_int(ctx);
    null_safe(a, b, |a, b| a == b)
}

pub(super) fn compare_unsigned(
    left: &dyn Item,
    right: &dyn Item,
    ctx: &mut EvalContext,
) -> SqlOrdering {
    let (a, b) = eval_pair!(left, right, ctx, val_uint);
    a.cmp(&b).into()
}

pub(super) fn equal_unsigned(left: &dyn Item, right: &dyn Item, ctx: &mut EvalContext) -> bool {
    let a = left.val_uint(ctx);
    let b = right.val_uint(ctx);
    null_safe(a, b, |a, b| a == b)
}

/// Order a signed value against an unsigned one
///
/// A negative signed value is less than every unsigned value.
pub(crate) fn cmp_signed_unsigned(signed: i64, unsigned: u64) -> Ordering {
    if signed < 0 {
        Ordering::Less
    } else {
        (signed as u64).cmp(&unsigned)
    }
}

pub(super) fn compare_signed_unsigned(
    left: &dyn Item,
    right: &dyn Item,
    ctx: &mut EvalContext,
) -> SqlOrdering {
    let a = left.val_int(ctx);
    if a.is_unknown() {
        return SqlOrdering::Unknown;
    }
    let b = right.val_uint(ctx);
    if b.is_unknown() {
        return SqlOrdering::Unknown;
    }
    cmp_signed_unsigned(a.value, b.value).into()
}

pub(super) fn equal_signed_unsigned(
    left: &dyn Item,
    right: &dyn Item,
    ctx: &mut EvalContext,
) -> bool {
    let a = left.val_int(ctx);
    let b = right.val_uint(ctx);
    null_safe(a, b, |a, b| a >= 0 && a as u64 == b)
}

pub(super) fn compare_unsigned_signed(
    left: &dyn Item,
    right: &dyn Item,
    ctx: &mut EvalContext,
) -> SqlOrdering {
    let a = left.val_uint(ctx);
    if a.is_unknown() {
        return SqlOrdering::Unknown;
    }
    let b = right.val_int(ctx);
    if b.is_unknown() {
        return SqlOrdering::Unknown;
    }
    cmp_signed_unsigned(b.value, a.value).reverse().into()
}

pub(super) fn equal_unsigned_signed(
    left: &dyn Item,
    right: &dyn Item,
    ctx: &mut EvalContext,
) -> bool {
    let a = left.val_uint(ctx);
    let b = right.val_int(ctx);
    null_safe(a, b, |a, b| b >= 0 && b as u64 == a)
}

/// Decimal view of an operand under the decimal strategy
///
/// Floats beyond the decimal range are pinned below or above every decimal
/// instead of failing the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecimalKey {
    BelowRange,
    Exact(Decimal),
    AboveRange,
}

impl Default for DecimalKey {
    fn default() -> Self {
        DecimalKey::Exact(Decimal::ZERO)
    }
}

impl DecimalKey {
    /// Evaluate `item` for a decimal comparison; unknown for NULL and NaN
    pub fn evaluate(item: &dyn Item, ctx: &mut EvalContext) -> Evaluated<DecimalKey> {
        if item.result_type() != ResultType::Float {
            return item.val_decimal(ctx).map(DecimalKey::Exact);
        }
        let v = item.val_real(ctx);
        if v.is_unknown() || v.value.is_nan() {
            return Evaluated::unknown();
        }
        Evaluated::known(match Decimal::from_f64(v.value) {
            Some(d) => DecimalKey::Exact(d),
            None if v.value < 0.0 => DecimalKey::BelowRange,
            None => DecimalKey::AboveRange,
        })
    }
}

pub(super) fn compare_decimal(
    left: &dyn Item,
    right: &dyn Item,
    ctx: &mut EvalContext,
) -> SqlOrdering {
    let a = DecimalKey::evaluate(left, ctx);
    if a.is_unknown() {
        return SqlOrdering::Unknown;
    }
    let b = DecimalKey::evaluate(right, ctx);
    if b.is_unknown() {
        return SqlOrdering::Unknown;
    }
    a.value.cmp(&b.value).into()
}

pub(super) fn equal_decimal(left: &dyn Item, right: &dyn Item, ctx: &mut EvalContext) -> bool {
    let a = DecimalKey::evaluate(left, ctx);
    let b = DecimalKey::evaluate(right, ctx);
    // Out-of-range floats equal nothing
    null_safe(a, b, |a, b| match (a, b) {
        (DecimalKey::Exact(x), DecimalKey::Exact(y)) => x == y,
        _ => false,
    })
}

pub(super) fn compare_real(
    left: &dyn Item,
    right: &dyn Item,
    ctx: &mut EvalContext,
) -> SqlOrdering {
    let (a, b) = eval_pair!(left, right, ctx, val_real);
    // NaN has no place in the order
    a.partial_cmp(&b).into()
}

pub(super) fn equal_real(left: &dyn Item, right: &dyn Item, ctx: &mut EvalContext) -> bool {
    let a = left.val_real(ctx);
    let b = right.val_real(ctx);
    null_safe(a, b, |a, b| a == b)
}

/// Float ordering where values within `epsilon` of each other are equal
pub(crate) fn cmp_real_epsilon(a: f64, b: f64, epsilon: f64) -> Option<Ordering> {
    if a == b || (a - b).abs() < epsilon {
        return Some(Ordering::Equal);
    }
    a.partial_cmp(&b)
}

pub(super) fn compare_real_epsilon(
    left: &dyn Item,
    right: &dyn Item,
    epsilon: f64,
    ctx: &mut EvalContext,
) -> SqlOrdering {
    let (a, b) = eval_pair!(left, right, ctx, val_real);
    cmp_real_epsilon(a, b, epsilon).into()
}

pub(super) fn equal_real_epsilon(
    left: &dyn Item,
    right: &dyn Item,
    epsilon: f64,
    ctx: &mut EvalContext,
) -> bool {
    let a = left.val_real(ctx);
    let b = right.val_real(ctx);
    null_safe(a, b, |a, b| cmp_real_epsilon(a, b, epsilon) == Some(Ordering::Equal))
}

pub(super) fn compare_binary_string(
    left: &dyn Item,
    right: &dyn Item,
    ctx: &mut EvalContext,
) -> SqlOrdering {
    let (a, b) = eval_pair!(left, right, ctx, val_str);
    a.as_ref().cmp(b.as_ref()).into()
}

pub(super) fn equal_binary_string(
    left: &dyn Item,
    right: &dyn Item,
    ctx: &mut EvalContext,
) -> bool {
    let a = left.val_str(ctx);
    let b = right.val_str(ctx);
    null_safe(a, b, |a, b| a.as_ref() == b.as_ref())
}

pub(super) fn compare_collated_string(
    left: &dyn Item,
    right: &dyn Item,
    collation: &dyn Collation,
    ctx: &mut EvalContext,
) -> SqlOrdering {
    let (a, b) = eval_pair!(left, right, ctx, val_str);
    collation.compare(&a, &b).into()
}

pub(super) fn equal_collated_string(
    left: &dyn Item,
    right: &dyn Item,
    collation: &dyn Collation,
    ctx: &mut EvalContext,
) -> bool {
    let a = left.val_str(ctx);
    let b = right.val_str(ctx);
    null_safe(a, b, |a, b| collation.compare(&a, &b) == Ordering::Equal)
}

pub(super) fn compare_temporal(
    left: &dyn Item,
    right: &dyn Item,
    ctx: &mut EvalContext,
) -> SqlOrdering {
    let (a, b) = eval_pair!(left, right, ctx, val_temporal);
    a.cmp(&b).into()
}

pub(super) fn equal_temporal(left: &dyn Item, right: &dyn Item, ctx: &mut EvalContext) -> bool {
    let a = left.val_temporal(ctx);
    let b = right.val_temporal(ctx);
    null_safe(a, b, |a, b| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation;
    use crate::value::Literal;

    #[test]
    fn test_mixed_sign_order() {
        assert_eq!(cmp_signed_unsigned(-1, 0), Ordering::Less);
        assert_eq!(cmp_signed_unsigned(-1, u64::MAX), Ordering::Less);
        assert_eq!(cmp_signed_unsigned(5, 5), Ordering::Equal);
        assert_eq!(cmp_signed_unsigned(i64::MAX, u64::MAX), Ordering::Less);
    }

    #[test]
    fn test_mixed_sign_equality_rejects_bit_patterns() {
        let mut ctx = EvalContext::new();
        let minus_one = Literal::int(-1);
        let max = Literal::uint(u64::MAX);
        assert!(!equal_signed_unsigned(&minus_one, &max, &mut ctx));
        assert!(!equal_unsigned_signed(&max, &minus_one, &mut ctx));
        assert_eq!(
            compare_unsigned_signed(&max, &minus_one, &mut ctx),
            SqlOrdering::Greater
        );
        assert!(equal_signed_unsigned(&Literal::int(7), &Literal::uint(7), &mut ctx));
    }

    #[test]
    fn test_left_unknown_skips_right() {
        let mut ctx = EvalContext::new();
        // The right operand would record a truncation warning if evaluated
        let garbage = Literal::string("x");
        assert_eq!(
            compare_signed(&Literal::null(), &garbage, &mut ctx),
            SqlOrdering::Unknown
        );
        assert!(ctx.diagnostics().is_empty());

        assert_eq!(
            compare_signed(&garbage, &Literal::null(), &mut ctx),
            SqlOrdering::Unknown
        );
        assert_eq!(ctx.diagnostics().total(), 1);
    }

    #[test]
    fn test_null_safe_pairs() {
        let mut ctx = EvalContext::new();
        let null = Literal::null();
        assert!(equal_signed(&null, &null, &mut ctx));
        assert!(!equal_signed(&null, &Literal::int(0), &mut ctx));
        assert!(!equal_binary_string(&Literal::string(""), &null, &mut ctx));
    }

    #[test]
    fn test_decimal_against_float_beyond_decimal_range() {
        let mut ctx = EvalContext::new();
        let dec = Literal::decimal(Decimal::new(15, 1));
        for (big, expected) in [
            (1e30, SqlOrdering::Less),
            (-1e30, SqlOrdering::Greater),
            (f64::INFINITY, SqlOrdering::Less),
            (f64::NEG_INFINITY, SqlOrdering::Greater),
        ] {
            let float = Literal::float(big);
            assert_eq!(compare_decimal(&dec, &float, &mut ctx), expected, "{}", big);
            assert_eq!(
                compare_decimal(&float, &dec, &mut ctx),
                expected.reverse(),
                "{}",
                big
            );
            assert!(!equal_decimal(&dec, &float, &mut ctx));
        }
        assert!(ctx.diagnostics().is_empty());

        let nan = Literal::float(f64::NAN);
        assert_eq!(compare_decimal(&dec, &nan, &mut ctx), SqlOrdering::Unknown);
        assert_eq!(
            compare_decimal(&Literal::float(1.5), &dec, &mut ctx),
            SqlOrdering::Equal
        );
    }

    #[test]
    fn test_epsilon() {
        assert_eq!(cmp_real_epsilon(1.0, 1.004, 0.005), Some(Ordering::Equal));
        assert_eq!(cmp_real_epsilon(1.004, 1.0, 0.005), Some(Ordering::Equal));
        assert_eq!(cmp_real_epsilon(1.0, 1.01, 0.005), Some(Ordering::Less));
        assert_eq!(cmp_real_epsilon(f64::NAN, 1.0, 0.5), None);

        let mut ctx = EvalContext::new();
        let nan = Literal::float(f64::NAN);
        assert_eq!(
            compare_real(&nan, &Literal::float(1.0), &mut ctx),
            SqlOrdering::Unknown
        );
    }

    #[test]
    fn test_strings() {
        let mut ctx = EvalContext::new();
        let abc = Literal::string("abc");
        let upper = Literal::string("ABC ");
        assert_eq!(
            compare_binary_string(&abc, &upper, &mut ctx),
            SqlOrdering::Greater
        );
        let ci = collation::lookup("ascii_general_ci").unwrap();
        assert_eq!(
            compare_collated_string(&abc, &upper, ci.as_ref(), &mut ctx),
            SqlOrdering::Equal
        );
        assert!(equal_collated_string(&abc, &upper, ci.as_ref(), &mut ctx));
    }

    #[test]
    fn test_temporal_parse_failure_is_unknown() {
        let mut ctx = EvalContext::new();
        let good = Literal::string("2024-05-01");
        let bad = Literal::string("not a date");
        assert_eq!(
            compare_temporal(&good, &bad, &mut ctx),
            SqlOrdering::Unknown
        );
        assert_eq!(ctx.diagnostics().total(), 1);
        assert_eq!(
            compare_temporal(&good, &Literal::int(20240430), &mut ctx),
            SqlOrdering::Greater
        );
    }
}
