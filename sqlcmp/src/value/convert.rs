// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lossy cross-type conversions used by value accessors
//!
//! String to number conversion reads the longest numeric prefix. Anything
//! left over other than trailing spaces records a truncation warning.

use super::Evaluated;
use crate::context::EvalContext;
use crate::diagnostics::{
    ER_TRUNCATED_WRONG_VALUE, ER_TRUNCATED_WRONG_VALUE_FOR_FIELD, ER_WARN_DATA_OUT_OF_RANGE,
};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Split `text` into its leading numeric literal and the remainder
///
/// With `integer_only` the prefix stops before any fraction or exponent.
fn numeric_prefix(text: &str, integer_only: bool) -> (&str, &str) {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;

    if !integer_only && end < bytes.len() && bytes[end] == b'.' {
        let dot = end;
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        mantissa_digits += end - dot - 1;
        if mantissa_digits == 0 {
            end = dot;
        }
    }

    if mantissa_digits == 0 {
        return ("", text);
    }

    if !integer_only && end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    (&text[..end], &text[end..])
}

fn warn_truncated(ctx: &mut EvalContext, type_name: &str, text: &str) {
    ctx.warn(
        ER_TRUNCATED_WRONG_VALUE,
        format!("Truncated incorrect {} value: '{}'", type_name, text),
    );
}

/// Read the numeric prefix of `bytes`, warning when something was dropped
fn checked_prefix(
    bytes: &[u8],
    integer_only: bool,
    type_name: &str,
    ctx: &mut EvalContext,
) -> String {
    let text = String::from_utf8_lossy(bytes);
    let (prefix, rest) = numeric_prefix(&text, integer_only);
    if prefix.is_empty() || !rest.trim_end_matches(' ').is_empty() {
        warn_truncated(ctx, type_name, &text);
    }
    prefix.to_string()
}

pub(crate) fn str_to_int(bytes: &[u8], ctx: &mut EvalContext) -> i64 {
    let prefix = checked_prefix(bytes, true, "INTEGER", ctx);
    if prefix.is_empty() {
        return 0;
    }
    match prefix.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            warn_truncated(ctx, "INTEGER", &prefix);
            if prefix.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            }
        }
    }
}

pub(crate) fn str_to_uint(bytes: &[u8], ctx: &mut EvalContext) -> u64 {
    let prefix = checked_prefix(bytes, true, "INTEGER", ctx);
    if prefix.is_empty() {
        return 0;
    }
    if prefix.starts_with('-') {
        // Negative text keeps its two's complement bit pattern
        return match prefix.parse::<i64>() {
            Ok(v) => v as u64,
            Err(_) => {
                warn_truncated(ctx, "INTEGER", &prefix);
                i64::MIN as u64
            }
        };
    }
    match prefix.trim_start_matches('+').parse::<u64>() {
        Ok(v) => v,
        Err(_) => {
            warn_truncated(ctx, "INTEGER", &prefix);
            u64::MAX
        }
    }
}

pub(crate) fn str_to_real(bytes: &[u8], ctx: &mut EvalContext) -> f64 {
    let prefix = checked_prefix(bytes, false, "DOUBLE", ctx);
    prefix.parse::<f64>().unwrap_or(0.0)
}

pub(crate) fn str_to_decimal(bytes: &[u8], ctx: &mut EvalContext) -> Evaluated<Decimal> {
    let prefix = checked_prefix(bytes, false, "DECIMAL", ctx);
    if prefix.is_empty() {
        return Evaluated::known(Decimal::ZERO);
    }
    let parsed = if prefix.contains(['e', 'E']) {
        Decimal::from_scientific(&prefix).ok()
    } else {
        Decimal::from_str(prefix.trim_start_matches('+')).ok()
    };
    match parsed {
        Some(d) => Evaluated::known(d),
        None => {
            ctx.warn(
                ER_TRUNCATED_WRONG_VALUE_FOR_FIELD,
                format!("Incorrect DECIMAL value: '{}'", prefix),
            );
            Evaluated::unknown()
        }
    }
}

pub(crate) fn real_to_int(value: f64, ctx: &mut EvalContext) -> i64 {
    if value.is_nan() {
        return 0;
    }
    let rounded = value.round();
    if rounded >= i64::MAX as f64 || rounded < i64::MIN as f64 {
        ctx.warn(
            ER_WARN_DATA_OUT_OF_RANGE,
            format!("Out of range value for BIGINT: {}", value),
        );
    }
    rounded as i64
}

pub(crate) fn real_to_uint(value: f64, ctx: &mut EvalContext) -> u64 {
    if value.is_nan() {
        return 0;
    }
    let rounded = value.round();
    if rounded < 0.0 {
        return real_to_int(value, ctx) as u64;
    }
    if rounded >= u64::MAX as f64 {
        ctx.warn(
            ER_WARN_DATA_OUT_OF_RANGE,
            format!("Out of range value for BIGINT UNSIGNED: {}", value),
        );
    }
    rounded as u64
}

pub(crate) fn real_to_decimal(value: f64, ctx: &mut EvalContext) -> Evaluated<Decimal> {
    match Decimal::from_f64(value) {
        Some(d) => Evaluated::known(d),
        None => {
            ctx.warn(
                ER_TRUNCATED_WRONG_VALUE_FOR_FIELD,
                format!("Incorrect DECIMAL value: '{}'", value),
            );
            Evaluated::unknown()
        }
    }
}

pub(crate) fn decimal_to_int(value: Decimal, ctx: &mut EvalContext) -> i64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    match rounded.to_i64() {
        Some(v) => v,
        None => {
            ctx.warn(
                ER_WARN_DATA_OUT_OF_RANGE,
                format!("Out of range value for BIGINT: {}", value),
            );
            if rounded.is_sign_negative() {
                i64::MIN
            } else {
                i64::MAX
            }
        }
    }
}

pub(crate) fn decimal_to_uint(value: Decimal, ctx: &mut EvalContext) -> u64 {
    if value.is_sign_negative() {
        return decimal_to_int(value, ctx) as u64;
    }
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    match rounded.to_u64() {
        Some(v) => v,
        None => {
            ctx.warn(
                ER_WARN_DATA_OUT_OF_RANGE,
                format!("Out of range value for BIGINT UNSIGNED: {}", value),
            );
            u64::MAX
        }
    }
}

pub(crate) fn decimal_to_real(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Text form of a double: integral values without a fraction, otherwise shortest form
pub(crate) fn format_real(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:?}", value)
    }
}
