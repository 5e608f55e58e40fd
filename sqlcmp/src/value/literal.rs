// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Constant expression nodes

use super::convert;
use super::temporal::{self, PackedTemporal, Temporal};
use super::{Evaluated, Item, ResultType};
use crate::collation::CollationSpec;
use crate::context::EvalContext;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::fmt;

/// A typed constant value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    UInt(u64),
    Decimal(Decimal),
    Float(f64),
    Str(Vec<u8>),
    Temporal(Temporal),
}

impl Value {
    pub fn result_type(&self) -> ResultType {
        match self {
            Value::Null => ResultType::Unknown,
            Value::Int(_) => ResultType::SignedInt,
            Value::UInt(_) => ResultType::UnsignedInt,
            Value::Decimal(_) => ResultType::Decimal,
            Value::Float(_) => ResultType::Float,
            Value::Str(_) => ResultType::String,
            Value::Temporal(_) => ResultType::Temporal,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", convert::format_real(*v)),
            Value::Str(bytes) => {
                write!(f, "'{}'", String::from_utf8_lossy(bytes).replace('\'', "''"))
            }
            Value::Temporal(t) => write!(f, "{}", t),
        }
    }
}

/// Constant expression node
#[derive(Debug, Clone)]
pub struct Literal {
    value: Value,
    collation: CollationSpec,
    decimals: Option<u8>,
}

impl Literal {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            collation: CollationSpec::default(),
            decimals: None,
        }
    }

    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    pub fn int(value: i64) -> Self {
        Self::new(Value::Int(value))
    }

    pub fn uint(value: u64) -> Self {
        Self::new(Value::UInt(value))
    }

    pub fn decimal(value: Decimal) -> Self {
        Self::new(Value::Decimal(value))
    }

    pub fn float(value: f64) -> Self {
        Self::new(Value::Float(value))
    }

    pub fn string(value: impl Into<Vec<u8>>) -> Self {
        Self::new(Value::Str(value.into()))
    }

    pub fn temporal(value: Temporal) -> Self {
        Self::new(Value::Temporal(value))
    }

    /// Attach a collation; only meaningful for strings
    pub fn with_collation(mut self, collation: CollationSpec) -> Self {
        self.collation = collation;
        self
    }

    /// Declare a fixed number of fractional digits for a float
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Item for Literal {
    fn result_type(&self) -> ResultType {
        self.value.result_type()
    }

    fn decimals(&self) -> Option<u8> {
        match &self.value {
            Value::Int(_) | Value::UInt(_) => Some(0),
            Value::Decimal(d) => u8::try_from(d.scale()).ok(),
            Value::Float(_) => self.decimals,
            _ => None,
        }
    }

    fn collation(&self) -> CollationSpec {
        match self.value {
            Value::Str(_) => self.collation.clone(),
            _ => CollationSpec::ignorable(),
        }
    }

    fn is_constant(&self) -> bool {
        true
    }

    fn val_int(&self, ctx: &mut EvalContext) -> Evaluated<i64> {
        match &self.value {
            Value::Null => Evaluated::unknown(),
            Value::Int(v) => Evaluated::known(*v),
            Value::UInt(v) => Evaluated::known(*v as i64),
            Value::Decimal(d) => Evaluated::known(convert::decimal_to_int(*d, ctx)),
            Value::Float(v) => Evaluated::known(convert::real_to_int(*v, ctx)),
            Value::Str(bytes) => Evaluated::known(convert::str_to_int(bytes, ctx)),
            Value::Temporal(t) => Evaluated::known(t.to_number()),
        }
    }

    fn val_uint(&self, ctx: &mut EvalContext) -> Evaluated<u64> {
        match &self.value {
            Value::Null => Evaluated::unknown(),
            Value::Int(v) => Evaluated::known(*v as u64),
            Value::UInt(v) => Evaluated::known(*v),
            Value::Decimal(d) => Evaluated::known(convert::decimal_to_uint(*d, ctx)),
            Value::Float(v) => Evaluated::known(convert::real_to_uint(*v, ctx)),
            Value::Str(bytes) => Evaluated::known(convert::str_to_uint(bytes, ctx)),
            Value::Temporal(t) => Evaluated::known(t.to_number() as u64),
        }
    }

    fn val_decimal(&self, ctx: &mut EvalContext) -> Evaluated<Decimal> {
        match &self.value {
            Value::Null => Evaluated::unknown(),
            Value::Int(v) => Evaluated::known(Decimal::from(*v)),
            Value::UInt(v) => Evaluated::known(Decimal::from(*v)),
            Value::Decimal(d) => Evaluated::known(*d),
            Value::Float(v) => convert::real_to_decimal(*v, ctx),
            Value::Str(bytes) => convert::str_to_decimal(bytes, ctx),
            Value::Temporal(t) => {
                let fraction = Decimal::new(i64::from(t.micros()), 6);
                Evaluated::known(Decimal::from(t.to_number()) + fraction)
            }
        }
    }

    fn val_real(&self, ctx: &mut EvalContext) -> Evaluated<f64> {
        match &self.value {
            Value::Null => Evaluated::unknown(),
            Value::Int(v) => Evaluated::known(*v as f64),
            Value::UInt(v) => Evaluated::known(*v as f64),
            Value::Decimal(d) => Evaluated::known(convert::decimal_to_real(*d)),
            Value::Float(v) => Evaluated::known(*v),
            Value::Str(bytes) => Evaluated::known(convert::str_to_real(bytes, ctx)),
            Value::Temporal(t) => Evaluated::known(t.to_real()),
        }
    }

    fn val_str(&self, _ctx: &mut EvalContext) -> Evaluated<Cow<'_, [u8]>> {
        let text = match &self.value {
            Value::Null => return Evaluated::unknown(),
            Value::Str(bytes) => return Evaluated::known(Cow::Borrowed(bytes.as_slice())),
            Value::Int(v) => v.to_string(),
            Value::UInt(v) => v.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Float(v) => convert::format_real(*v),
            Value::Temporal(t) => t.to_string(),
        };
        Evaluated::known(Cow::Owned(text.into_bytes()))
    }

    fn val_temporal(&self, ctx: &mut EvalContext) -> Evaluated<PackedTemporal> {
        match &self.value {
            Value::Temporal(t) => Evaluated::known(t.pack()),
            _ => temporal::temporal_from_item(self, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation::{self, Derivation};
    use crate::diagnostics::{ER_TRUNCATED_WRONG_VALUE, ER_TRUNCATED_WRONG_VALUE_FOR_FIELD};
    use chrono::NaiveDate;

    #[test]
    fn test_null_is_unknown_everywhere() {
        let mut ctx = EvalContext::new();
        let null = Literal::null();
        assert_eq!(null.result_type(), ResultType::Unknown);
        assert!(null.val_int(&mut ctx).is_unknown());
        assert!(null.val_uint(&mut ctx).is_unknown());
        assert!(null.val_decimal(&mut ctx).is_unknown());
        assert!(null.val_real(&mut ctx).is_unknown());
        assert!(null.val_str(&mut ctx).is_unknown());
        assert!(null.val_temporal(&mut ctx).is_unknown());
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_numeric_conversions() {
        let mut ctx = EvalContext::new();
        let uint = Literal::uint(u64::MAX);
        assert!(uint.is_unsigned());
        assert_eq!(uint.val_int(&mut ctx).value, -1);
        assert_eq!(uint.val_uint(&mut ctx).value, u64::MAX);

        let dec = Literal::decimal(Decimal::new(1250, 3));
        assert_eq!(dec.decimals(), Some(3));
        assert_eq!(dec.val_int(&mut ctx).value, 1);
        assert_eq!(dec.val_real(&mut ctx).value, 1.25);
        assert_eq!(dec.val_str(&mut ctx).value.as_ref(), b"1.250");

        let float = Literal::float(2.5).with_decimals(1);
        assert_eq!(float.decimals(), Some(1));
        assert_eq!(float.val_int(&mut ctx).value, 3);
        assert_eq!(float.val_str(&mut ctx).value.as_ref(), b"2.5");
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_string_conversions_warn() {
        let mut ctx = EvalContext::new();
        let s = Literal::string("12abc");
        assert_eq!(s.val_int(&mut ctx).value, 12);
        assert_eq!(ctx.diagnostics().conditions()[0].code, ER_TRUNCATED_WRONG_VALUE);

        let inf = Literal::float(f64::INFINITY);
        assert!(inf.val_decimal(&mut ctx).is_unknown());
        assert_eq!(
            ctx.diagnostics().conditions()[1].code,
            ER_TRUNCATED_WRONG_VALUE_FOR_FIELD
        );
    }

    #[test]
    fn test_temporal_accessors() {
        let mut ctx = EvalContext::new();
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let lit = Literal::temporal(Temporal::Date(date));
        assert_eq!(lit.val_int(&mut ctx).value, 20240229);
        assert_eq!(lit.val_str(&mut ctx).value.as_ref(), b"2024-02-29");
        assert_eq!(
            lit.val_temporal(&mut ctx).value,
            PackedTemporal::from_date(&date)
        );

        let text = Literal::string("2024-02-29");
        assert_eq!(text.val_temporal(&mut ctx).value, PackedTemporal::from_date(&date));

        let number = Literal::int(20240229);
        assert_eq!(
            number.val_temporal(&mut ctx).value,
            PackedTemporal::from_date(&date)
        );

        let bad = Literal::string("2024-02-30");
        assert!(bad.val_temporal(&mut ctx).is_unknown());
        assert_eq!(ctx.diagnostics().total(), 1);
    }

    #[test]
    fn test_collation_only_for_strings() {
        let ci = collation::lookup("ascii_general_ci").unwrap();
        let s = Literal::string("a").with_collation(CollationSpec::explicit(ci.clone()));
        assert_eq!(s.collation().name(), "ascii_general_ci");
        assert_eq!(s.collation().derivation, Derivation::Explicit);

        let n = Literal::int(1).with_collation(CollationSpec::explicit(ci));
        assert_eq!(n.collation().derivation, Derivation::Ignorable);
    }

    #[test]
    fn test_display_quotes_strings() {
        assert_eq!(Literal::string("it's").to_string(), "'it''s'");
        assert_eq!(Literal::null().to_string(), "NULL");
        assert_eq!(Literal::float(1.0).to_string(), "1");
    }
}
