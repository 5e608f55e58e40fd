// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Crate-level error type

use crate::compare::CompareError;
use crate::config::ConfigError;
use crate::scope::ScopeError;
use crate::value::ParseError;
use thiserror::Error;

/// Any hard failure raised by the engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Scope error: {0}")]
    Scope(#[from] ScopeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;
