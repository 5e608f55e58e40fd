// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Aggregate scope errors

use super::{AggregateId, BlockId};
use thiserror::Error;

/// Hard errors raised while binding aggregates to query blocks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("Invalid use of group function ({aggregate})")]
    InvalidGroupFuncUse { aggregate: AggregateId },

    #[error(
        "Mixing of GROUP columns (MIN(),MAX(),COUNT(),...) with no GROUP columns is illegal \
         if there is no GROUP BY clause ({block})"
    )]
    MixOfGroupFuncAndFields { block: BlockId },

    #[error("Too high level of nesting for select: level {level} exceeds {max}")]
    NestingTooDeep { level: usize, max: usize },

    #[error("Unknown query block {0}")]
    UnknownBlock(BlockId),

    #[error("Unknown aggregate {0}")]
    UnknownAggregate(AggregateId),

    #[error("Aggregate {0} has already been resolved")]
    AlreadyResolved(AggregateId),

    #[error("Aggregate {aggregate} resolved before the nested aggregate {innermost}")]
    OutOfOrder {
        aggregate: AggregateId,
        innermost: AggregateId,
    },

    #[error("Column of {block} is not visible from aggregate {aggregate}")]
    ColumnNotVisible {
        aggregate: AggregateId,
        block: BlockId,
    },

    #[error("Invalid scope script: {0}")]
    InvalidScript(String),
}

impl ScopeError {
    /// Server error number for the errors that have one
    pub fn code(&self) -> Option<u32> {
        match self {
            ScopeError::InvalidGroupFuncUse { .. } => Some(1111),
            ScopeError::MixOfGroupFuncAndFields { .. } => Some(1140),
            ScopeError::NestingTooDeep { .. } => Some(1473),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ScopeError {
    fn from(err: serde_json::Error) -> Self {
        ScopeError::InvalidScript(err.to_string())
    }
}
