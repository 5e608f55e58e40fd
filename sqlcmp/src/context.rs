// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Per-statement evaluation context

use crate::config::EngineConfig;
use crate::diagnostics::Diagnostics;

/// State threaded through every value accessor during one statement
///
/// Accessors never mutate the items they are called on; anything an
/// evaluation needs to record goes through this context.
#[derive(Debug, Default)]
pub struct EvalContext {
    diagnostics: Diagnostics,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context sized from the engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            diagnostics: Diagnostics::new(config.max_error_count),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Record a warning for the current statement
    pub fn warn(&mut self, code: u32, message: impl Into<String>) {
        self.diagnostics.warn(code, message);
    }
}
