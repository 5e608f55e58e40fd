// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Soft-error reporting
//!
//! Value errors (a malformed temporal literal, a truncated numeric conversion)
//! never abort evaluation. They are recorded here as conditions, the operand is
//! treated as unknown, and the statement keeps running. Conditions are surfaced
//! to the caller after the statement completes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Out of range value for column
pub const ER_WARN_DATA_OUT_OF_RANGE: u32 = 1264;
/// Truncated incorrect value
pub const ER_TRUNCATED_WRONG_VALUE: u32 = 1292;
/// Incorrect value
pub const ER_TRUNCATED_WRONG_VALUE_FOR_FIELD: u32 = 1366;

/// Severity of a recorded condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionLevel {
    Note,
    Warning,
}

impl fmt::Display for ConditionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionLevel::Note => write!(f, "Note"),
            ConditionLevel::Warning => write!(f, "Warning"),
        }
    }
}

/// A single non-fatal condition raised during evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub level: ConditionLevel,
    pub code: u32,
    pub message: String,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.level, self.code, self.message)
    }
}

/// Ordered list of conditions for one statement
///
/// At most `max_stored` conditions are kept; every reported condition is
/// still counted so callers can tell how many were dropped.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    conditions: Vec<Condition>,
    total: usize,
    max_stored: usize,
}

impl Diagnostics {
    /// Create an empty diagnostics area keeping up to `max_stored` conditions
    pub fn new(max_stored: usize) -> Self {
        Self {
            conditions: Vec::new(),
            total: 0,
            max_stored,
        }
    }

    /// Record a condition
    pub fn report(&mut self, level: ConditionLevel, code: u32, message: impl Into<String>) {
        let message = message.into();
        match level {
            ConditionLevel::Warning => log::warn!("{} ({}): {}", level, code, message),
            ConditionLevel::Note => log::debug!("{} ({}): {}", level, code, message),
        }

        self.total += 1;
        if self.conditions.len() < self.max_stored {
            self.conditions.push(Condition {
                level,
                code,
                message,
            });
        }
    }

    /// Record a warning
    pub fn warn(&mut self, code: u32, message: impl Into<String>) {
        self.report(ConditionLevel::Warning, code, message);
    }

    /// Stored conditions, in report order
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Number of conditions reported, including those not stored
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn warning_count(&self) -> usize {
        self.conditions
            .iter()
            .filter(|c| c.level == ConditionLevel::Warning)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Remove and return all stored conditions, resetting the counter
    pub fn take(&mut self) -> Vec<Condition> {
        self.total = 0;
        std::mem::take(&mut self.conditions)
    }

    pub fn clear(&mut self) {
        self.conditions.clear();
        self.total = 0;
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(64)
    }
}
