// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Packed temporal values
//!
//! Dates, times and datetimes share one integer space:
//!
//! ```text
//! ymd    = (year * 13 + month) << 5 | day
//! hms    = hour << 12 | minute << 6 | second
//! packed = ((ymd << 17) | hms) << 24 | microseconds
//! ```
//!
//! Plain unsigned comparison of two packed values orders them
//! chronologically. Time-only values use the zero date.

use super::{Evaluated, Item, ResultType};
use crate::context::EvalContext;
use crate::diagnostics::ER_TRUNCATED_WRONG_VALUE;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// Ordering-preserving 64-bit encoding of a temporal value
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct PackedTemporal(u64);

impl PackedTemporal {
    pub fn from_parts(
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        micros: u32,
    ) -> Self {
        let ymd = ((u64::from(year) * 13 + u64::from(month)) << 5) | u64::from(day);
        let hms = (u64::from(hour) << 12) | (u64::from(minute) << 6) | u64::from(second);
        PackedTemporal((((ymd << 17) | hms) << 24) | u64::from(micros))
    }

    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self::from_parts(
            u32::try_from(dt.year()).unwrap_or(0),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
            (dt.nanosecond() / 1000).min(999_999),
        )
    }

    pub fn from_date(date: &NaiveDate) -> Self {
        Self::from_parts(
            u32::try_from(date.year()).unwrap_or(0),
            date.month(),
            date.day(),
            0,
            0,
            0,
            0,
        )
    }

    pub fn from_time(time: &NaiveTime) -> Self {
        Self::from_parts(
            0,
            0,
            0,
            time.hour(),
            time.minute(),
            time.second(),
            (time.nanosecond() / 1000).min(999_999),
        )
    }

    /// Parse date, time or datetime text
    pub fn parse(text: &str) -> Option<Self> {
        Temporal::parse(text).map(|t| t.pack())
    }

    /// Interpret `YYMMDD`, `YYYYMMDD`, `YYMMDDhhmmss` or `YYYYMMDDhhmmss`
    pub fn from_number(number: i64) -> Option<Self> {
        Temporal::from_number(number).map(|t| t.pack())
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Split into (year, month, day, hour, minute, second, micros)
    pub fn unpack(self) -> (u32, u32, u32, u32, u32, u32, u32) {
        let micros = (self.0 & 0xFF_FFFF) as u32;
        let ymdhms = self.0 >> 24;
        let hms = ymdhms & 0x1_FFFF;
        let ymd = ymdhms >> 17;
        let day = (ymd & 0x1F) as u32;
        let ym = ymd >> 5;
        let year = (ym / 13) as u32;
        let month = (ym % 13) as u32;
        let second = (hms & 0x3F) as u32;
        let minute = ((hms >> 6) & 0x3F) as u32;
        let hour = (hms >> 12) as u32;
        (year, month, day, hour, minute, second, micros)
    }
}

impl fmt::Display for PackedTemporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day, hour, minute, second, micros) = self.unpack();
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year, month, day, hour, minute, second
        )?;
        if micros > 0 {
            write!(f, ".{:06}", micros)?;
        }
        Ok(())
    }
}

/// A decoded temporal value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Temporal {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Temporal {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let parsed = DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .map(Temporal::DateTime)
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .map(Temporal::Date)
            })
            .or_else(|| {
                TIME_FORMATS
                    .iter()
                    .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
                    .map(Temporal::Time)
            });

        match parsed {
            Some(t) if t.year_in_range() => Some(t),
            Some(_) => None,
            None if text.bytes().all(|b| b.is_ascii_digit()) => {
                text.parse::<i64>().ok().and_then(Self::from_number)
            }
            None => None,
        }
    }

    pub fn from_number(number: i64) -> Option<Self> {
        if number <= 0 {
            return None;
        }

        let (date_part, time_part) = match number {
            n if n <= 9999_12_31 => (n, None),
            n if n <= 9999_12_31_23_59_59 => (n / 1_000_000, Some(n % 1_000_000)),
            _ => return None,
        };

        let mut year = date_part / 10_000;
        // Two-digit years: 70-99 are 19xx, 00-69 are 20xx
        if number <= 99_12_31 || (time_part.is_some() && number <= 99_12_31_23_59_59) {
            year += if year < 70 { 2000 } else { 1900 };
        }
        let month = (date_part / 100) % 100;
        let day = date_part % 100;

        let date = NaiveDate::from_ymd_opt(
            i32::try_from(year).ok()?,
            u32::try_from(month).ok()?,
            u32::try_from(day).ok()?,
        )?;

        match time_part {
            None => Some(Temporal::Date(date)),
            Some(hms) => {
                let time = NaiveTime::from_hms_opt(
                    u32::try_from(hms / 10_000).ok()?,
                    u32::try_from((hms / 100) % 100).ok()?,
                    u32::try_from(hms % 100).ok()?,
                )?;
                Some(Temporal::DateTime(date.and_time(time)))
            }
        }
    }

    pub fn pack(&self) -> PackedTemporal {
        match self {
            Temporal::Date(d) => PackedTemporal::from_date(d),
            Temporal::Time(t) => PackedTemporal::from_time(t),
            Temporal::DateTime(dt) => PackedTemporal::from_datetime(dt),
        }
    }

    /// Numeric form: `YYYYMMDD`, `hhmmss` or `YYYYMMDDhhmmss`
    pub fn to_number(&self) -> i64 {
        let date_number =
            |d: &NaiveDate| i64::from(d.year()) * 10_000 + i64::from(d.month() * 100 + d.day());
        let time_number =
            |t: &NaiveTime| i64::from(t.hour() * 10_000 + t.minute() * 100 + t.second());
        match self {
            Temporal::Date(d) => date_number(d),
            Temporal::Time(t) => time_number(t),
            Temporal::DateTime(dt) => date_number(&dt.date()) * 1_000_000 + time_number(&dt.time()),
        }
    }

    /// Numeric form including fractional seconds
    pub fn to_real(&self) -> f64 {
        self.to_number() as f64 + f64::from(self.micros()) / 1_000_000.0
    }

    /// Fractional seconds in microseconds
    pub fn micros(&self) -> u32 {
        let nanos = match self {
            Temporal::Date(_) => 0,
            Temporal::Time(t) => t.nanosecond(),
            Temporal::DateTime(dt) => dt.nanosecond(),
        };
        (nanos / 1000).min(999_999)
    }

    fn year_in_range(&self) -> bool {
        let year = match self {
            Temporal::Date(d) => d.year(),
            Temporal::DateTime(dt) => dt.year(),
            Temporal::Time(_) => return true,
        };
        (0..=9999).contains(&year)
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temporal::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Temporal::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            Temporal::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

/// Default temporal accessor: interpret the item's value as a temporal
///
/// A value that cannot be interpreted records a warning and is unknown.
pub(crate) fn temporal_from_item<I: Item + ?Sized>(
    item: &I,
    ctx: &mut EvalContext,
) -> Evaluated<PackedTemporal> {
    match item.result_type() {
        ResultType::SignedInt | ResultType::UnsignedInt => {
            let number = item.val_int(ctx);
            if number.is_unknown() {
                return Evaluated::unknown();
            }
            packed_or_warn(
                PackedTemporal::from_number(number.value),
                &number.value.to_string(),
                ctx,
            )
        }
        ResultType::Decimal | ResultType::Float => {
            let number = item.val_real(ctx);
            if number.is_unknown() {
                return Evaluated::unknown();
            }
            packed_or_warn(
                PackedTemporal::from_number(number.value.trunc() as i64),
                &number.value.to_string(),
                ctx,
            )
        }
        _ => {
            let text = item.val_str(ctx);
            if text.is_unknown() {
                return Evaluated::unknown();
            }
            let text = String::from_utf8_lossy(&text.value).into_owned();
            packed_or_warn(PackedTemporal::parse(&text), &text, ctx)
        }
    }
}

fn packed_or_warn(
    packed: Option<PackedTemporal>,
    source: &str,
    ctx: &mut EvalContext,
) -> Evaluated<PackedTemporal> {
    match packed {
        Some(p) => Evaluated::known(p),
        None => {
            ctx.warn(
                ER_TRUNCATED_WRONG_VALUE,
                format!("Incorrect datetime value: '{}'", source),
            );
            Evaluated::unknown()
        }
    }
}
