// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Per-level allow-aggregation bit set

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deepest nesting level representable in a [`NestingMap`]
pub const MAX_NESTING_LEVEL: usize = 63;

/// One bit per query block nesting level
///
/// Bit `n` is set while aggregation is syntactically permitted at level `n`
/// (select list, HAVING) and clear where it is not (WHERE, GROUP BY).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NestingMap(u64);

impl NestingMap {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub fn from_levels(levels: impl IntoIterator<Item = usize>) -> Self {
        let mut map = Self::empty();
        for level in levels {
            map.allow(level);
        }
        map
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn allows(&self, level: usize) -> bool {
        bit(level).map_or(false, |b| self.0 & b != 0)
    }

    /// Levels beyond [`MAX_NESTING_LEVEL`] are ignored
    pub fn allow(&mut self, level: usize) {
        if let Some(b) = bit(level) {
            self.0 |= b;
        }
    }

    pub fn forbid(&mut self, level: usize) {
        if let Some(b) = bit(level) {
            self.0 &= !b;
        }
    }

    /// Allowed levels, outermost first
    pub fn levels(&self) -> impl Iterator<Item = usize> + '_ {
        (0..=MAX_NESTING_LEVEL).filter(move |level| self.allows(*level))
    }
}

fn bit(level: usize) -> Option<u64> {
    u32::try_from(level).ok().and_then(|l| 1u64.checked_shl(l))
}

impl fmt::Display for NestingMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let levels: Vec<String> = self.levels().map(|l| l.to_string()).collect();
        write!(f, "{{{}}}", levels.join(","))
    }
}
