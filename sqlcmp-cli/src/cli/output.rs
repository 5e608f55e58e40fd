// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for CLI output

use super::commands::OutputFormat;
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use sqlcmp::scope::ScriptReport;
use sqlcmp::Condition;

/// Labelled facts about one evaluated predicate
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub fields: Vec<(String, String)>,
    pub result: Option<bool>,
    pub conditions: Vec<Condition>,
}

impl Report {
    pub fn new(title: String) -> Self {
        Self {
            title,
            fields: Vec::new(),
            result: None,
            conditions: Vec::new(),
        }
    }

    pub fn field(&mut self, name: &str, value: impl ToString) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    /// Record the predicate's truth value, `None` meaning unknown
    pub fn truth(&mut self, name: &str, value: Option<bool>) {
        self.result = value;
        self.field(name, truth_to_string(value));
    }

    pub fn conditions(&mut self, conditions: &[Condition]) {
        self.conditions = conditions.to_vec();
    }
}

fn truth_to_string(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "TRUE",
        Some(false) => "FALSE",
        None => "UNKNOWN",
    }
}

/// Result formatter for different output formats
pub struct ResultFormatter;

impl ResultFormatter {
    pub fn format(report: &Report, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_table(report),
            OutputFormat::Json => Self::format_json(report),
        }
    }

    pub fn format_scope(report: &ScriptReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_scope_table(report),
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_else(|_| {
                "{\"status\": \"error\", \"error\": \"Could not serialize report to JSON\"}"
                    .to_string()
            }),
        }
    }

    fn format_table(report: &Report) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n\n", report.title.bold().green()));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Property").fg(Color::Green),
            Cell::new("Value").fg(Color::Green),
        ]);
        for (name, value) in &report.fields {
            let cell = if name == "result" {
                let color = match report.result {
                    Some(true) => Color::Green,
                    Some(false) => Color::Red,
                    None => Color::Yellow,
                };
                Cell::new(value).fg(color)
            } else {
                Cell::new(value)
            };
            table.add_row(vec![Cell::new(name), cell]);
        }
        output.push_str(&table.to_string());
        output.push('\n');

        Self::push_conditions(&mut output, &report.conditions);
        output
    }

    fn format_json(report: &Report) -> String {
        let mut fields = serde_json::Map::new();
        for (name, value) in &report.fields {
            fields.insert(name.clone(), serde_json::Value::String(value.clone()));
        }
        let json = serde_json::json!({
            "expression": report.title,
            "result": report.result,
            "details": fields,
            "warnings": report.conditions,
        });

        serde_json::to_string_pretty(&json).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize result to JSON\"}".to_string()
        })
    }

    fn format_scope_table(report: &ScriptReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "Aggregates".bold().green()));
        let mut aggregates = Table::new();
        aggregates.load_preset(UTF8_FULL);
        aggregates.set_header(
            ["Name", "Function", "Block", "State", "Bound To", "Level"]
                .iter()
                .map(|h| Cell::new(h).fg(Color::Green))
                .collect::<Vec<_>>(),
        );
        for aggregate in &report.aggregates {
            aggregates.add_row(vec![
                aggregate.name.clone(),
                aggregate.function.clone(),
                aggregate.block.clone(),
                aggregate.state.to_string(),
                aggregate.bound_block.clone().unwrap_or_else(|| "-".to_string()),
                aggregate
                    .aggr_level
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }
        output.push_str(&aggregates.to_string());
        output.push_str("\n\n");

        output.push_str(&format!("{}\n", "Query Blocks".bold().green()));
        let mut blocks = Table::new();
        blocks.load_preset(UTF8_FULL);
        blocks.set_header(
            [
                "Name",
                "Level",
                "GROUP BY",
                "Aggregates",
                "Aggregates Used",
                "Plain Fields",
                "Outer Ref",
            ]
            .iter()
            .map(|h| Cell::new(h).fg(Color::Green))
            .collect::<Vec<_>>(),
        );
        for block in &report.blocks {
            blocks.add_row(vec![
                block.name.clone(),
                block.level.to_string(),
                yes_no(block.has_group_by),
                block.aggregates.join(", "),
                yes_no(block.sum_func_used),
                yes_no(block.non_agg_field_used),
                yes_no(block.contains_outer_aggregate_ref),
            ]);
        }
        output.push_str(&blocks.to_string());
        output.push('\n');

        if report.errors.is_empty() {
            output.push_str(&format!("\n{}\n", "✅ All steps resolved".green()));
        } else {
            output.push_str(&format!("\n{}\n", "Errors:".bold().red()));
            for error in &report.errors {
                let code = error.code.map(|c| format!(" ({})", c)).unwrap_or_default();
                output.push_str(&format!(
                    "  step {}{}: {}\n",
                    error.step,
                    code,
                    error.message.red()
                ));
            }
        }
        output
    }

    fn push_conditions(output: &mut String, conditions: &[Condition]) {
        if conditions.is_empty() {
            return;
        }
        output.push_str(&format!("\n{}\n", "Warnings:".bold().yellow()));
        for (i, condition) in conditions.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, condition.to_string().yellow()));
        }
    }
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}
