// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sqlcmp")]
#[command(about = "SQL comparison semantics and aggregate scope resolution", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (overrides RUST_LOG)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Compare two literals
    Compare {
        /// Left operand, e.g. `(1, 'a')` or `18446744073709551615u`
        #[arg(allow_hyphen_values = true)]
        left: String,

        /// Right operand
        #[arg(allow_hyphen_values = true)]
        right: String,

        /// Comparison operator (=, <=>, <>, <, <=, >, >=)
        #[arg(short, long, default_value = "=")]
        op: String,

        /// Collation applied to string operands
        #[arg(long)]
        collation: Option<String>,

        /// Approximate float equality epsilon
        #[arg(short, long)]
        epsilon: Option<f64>,
    },

    /// Match a subject against a LIKE pattern
    Like {
        subject: String,

        pattern: String,

        /// Collation applied to string operands
        #[arg(long)]
        collation: Option<String>,

        /// Escape character
        #[arg(long, default_value_t = '\\')]
        escape: char,

        /// Evaluate NOT LIKE
        #[arg(long)]
        not: bool,
    },

    /// Test a probe for membership in a list of literals
    ///
    /// Operands may start with `-`, so give `--not` before them.
    In {
        #[arg(allow_hyphen_values = true)]
        probe: String,

        #[arg(required = true, allow_hyphen_values = true)]
        items: Vec<String>,

        /// Evaluate NOT IN
        #[arg(long)]
        not: bool,
    },

    /// Resolve the aggregates of a JSON scope script
    Scope {
        /// Script file
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
