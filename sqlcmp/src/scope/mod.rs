// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Aggregate scope resolution
//!
//! Decides which query block computes each aggregate function call in a
//! statement of nested query blocks, and rejects calls that no block may
//! legally compute.

mod aggregate;
mod block;
mod error;
mod nesting;
mod resolver;
mod script;

pub use aggregate::{AggregateId, AggregateOccurrence, ScopeState};
pub use block::{BlockId, GroupByFlags, QueryBlock, QueryBlockTree};
pub use error::ScopeError;
pub use nesting::{NestingMap, MAX_NESTING_LEVEL};
pub use resolver::ScopeResolver;
pub use script::{
    AggregateReport, BeginStep, BlockReport, BlockSpec, ScopeScript, ScriptReport, Step, StepError,
};

use serde::{Deserialize, Serialize};

/// Options of one resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeOptions {
    /// Aggregates whose arguments only reference outer blocks must be
    /// computed in an outer block
    pub ansi: bool,
    /// Reject blocks mixing aggregates and plain columns without GROUP BY
    pub only_full_group_by: bool,
    pub max_nesting_level: usize,
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self {
            ansi: false,
            only_full_group_by: false,
            max_nesting_level: MAX_NESTING_LEVEL,
        }
    }
}
