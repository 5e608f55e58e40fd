// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! SqlCmp CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments first to get log level
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        // -v/--verbose flag takes precedence
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        // Default to Warn (can still be overridden by RUST_LOG env var)
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Version => {
            println!("{} {}", "SqlCmp".bold().green(), sqlcmp::VERSION);
            println!("SQL comparison semantics and aggregate scope resolution");
            Ok(())
        }

        Commands::Compare {
            left,
            right,
            op,
            collation,
            epsilon,
        } => cli::handle_compare(&config, &left, &right, &op, collation, epsilon, cli.format),

        Commands::Like {
            subject,
            pattern,
            collation,
            escape,
            not,
        } => cli::handle_like(&config, &subject, &pattern, collation, escape, not, cli.format),

        Commands::In { probe, items, not } => {
            cli::handle_in(&config, &probe, &items, not, cli.format)
        }

        Commands::Scope { file } => cli::handle_scope(&config, &file, cli.format),
    }
}
