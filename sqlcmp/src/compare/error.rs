// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Comparison binding errors

use thiserror::Error;

/// Hard errors raised while binding comparators and building matchers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    #[error("Operand should contain {expected} column(s), got {actual}")]
    OperandColumns { expected: usize, actual: usize },

    #[error("Illegal mix of collations ({left}) and ({right}) for operation '{operation}'")]
    IllegalCollationMix {
        left: String,
        right: String,
        operation: String,
    },

    #[error("Unknown collation: '{0}'")]
    UnknownCollation(String),

    #[error("Incorrect arguments to ESCAPE: '{0}' is not a single character of the collation")]
    IncorrectEscape(char),

    #[error("Out of memory allocating {what} ({requested} elements)")]
    ResourceExhausted { what: String, requested: usize },
}

impl CompareError {
    pub(crate) fn exhausted(what: &str, requested: usize) -> Self {
        CompareError::ResourceExhausted {
            what: what.to_string(),
            requested,
        }
    }
}

/// Reserve exactly `additional` slots, reporting allocator refusal as an error
pub(crate) fn reserve<T>(
    vec: &mut Vec<T>,
    additional: usize,
    what: &str,
) -> Result<(), CompareError> {
    vec.try_reserve_exact(additional)
        .map_err(|_| CompareError::exhausted(what, additional))
}
