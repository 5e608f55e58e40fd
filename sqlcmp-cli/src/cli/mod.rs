// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for SqlCmp
//!
//! Binds comparison, IN and LIKE predicates over literal operands and runs
//! aggregate scope scripts, printing what the engine decided.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{handle_compare, handle_in, handle_like, handle_scope, load_config};
