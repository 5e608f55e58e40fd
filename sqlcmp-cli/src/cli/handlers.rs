// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command handlers

use super::commands::OutputFormat;
use super::output::{Report, ResultFormatter};
use sqlcmp::scope::ScopeScript;
use sqlcmp::{
    parse_item, Comparator, ComparisonOp, ComparisonPredicate, Derivation, EngineConfig,
    EvalContext, InPredicate, Item, LikePredicate, ResultType,
};
use std::error::Error;
use std::path::Path;

/// Load the engine configuration, or the defaults when no file is given
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(EngineConfig::from_path(path)?),
        None => Ok(EngineConfig::default()),
    }
}

pub fn handle_compare(
    config: &EngineConfig,
    left: &str,
    right: &str,
    op: &str,
    collation: Option<String>,
    epsilon: Option<f64>,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let op: ComparisonOp = op.parse()?;
    let collation = collation.unwrap_or_else(|| config.default_collation.clone());
    let title = format!("{} {} {}", left, op, right);
    let left = operand(left, &collation)?;
    let right = operand(right, &collation)?;

    let mut options = config.compare_options();
    if epsilon.is_some() {
        options.epsilon = epsilon;
    }

    let comparator = Comparator::bind(left.as_ref(), right.as_ref(), op, &options)?;
    let predicate = ComparisonPredicate::bind(op, left.as_ref(), right.as_ref(), &options)?;

    // Ordering and <=> are shown for reference; warnings come from the predicate alone
    let mut scratch = EvalContext::from_config(config);
    let ordering = comparator.compare(&mut scratch);
    let null_safe = comparator.equal_null_safe(&mut scratch);

    let mut ctx = EvalContext::from_config(config);
    let result = predicate.evaluate(&mut ctx);

    let mut report = Report::new(title);
    report.field("left type", left.result_type());
    report.field("right type", right.result_type());
    report.field("strategy", comparator.strategy());
    if let Some(collation) = comparator.collation() {
        report.field("collation", collation.name());
    }
    if let Some(epsilon) = comparator.epsilon() {
        report.field("epsilon", epsilon);
    }
    report.field("ordering", ordering);
    report.field("<=>", null_safe);
    report.truth("result", result);
    report.conditions(ctx.diagnostics().conditions());

    println!("{}", ResultFormatter::format(&report, format));
    Ok(())
}

pub fn handle_like(
    config: &EngineConfig,
    subject: &str,
    pattern: &str,
    collation: Option<String>,
    escape: char,
    negated: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let collation = collation.unwrap_or_else(|| config.default_collation.clone());
    let not = if negated { "NOT " } else { "" };
    let title = format!("{} {}LIKE {}", subject, not, pattern);
    let subject = operand(subject, &collation)?;
    let pattern = operand(pattern, &collation)?;

    let mut ctx = EvalContext::from_config(config);
    let predicate =
        LikePredicate::bind(subject.as_ref(), pattern.as_ref(), escape, negated, &mut ctx)?;
    let result = predicate.evaluate(&mut ctx)?;

    let mut report = Report::new(title);
    match predicate.pattern() {
        Some(compiled) => {
            report.field("collation", compiled.collation().name());
            let matcher = if compiled.uses_turbo_boyer_moore() {
                "turbo-boyer-moore"
            } else {
                "wildcard"
            };
            report.field("matcher", matcher);
        }
        None => report.field("matcher", "none (pattern is NULL)"),
    }
    report.truth("result", result);
    report.conditions(ctx.diagnostics().conditions());

    println!("{}", ResultFormatter::format(&report, format));
    Ok(())
}

pub fn handle_in(
    config: &EngineConfig,
    probe: &str,
    items: &[String],
    negated: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let not = if negated { "NOT " } else { "" };
    let title = format!("{} {}IN ({})", probe, not, items.join(", "));
    let probe = operand(probe, &config.default_collation)?;
    let items = items
        .iter()
        .map(|text| operand(text, &config.default_collation))
        .collect::<Result<Vec<_>, _>>()?;
    let refs: Vec<&dyn Item> = items.iter().map(|item| item.as_ref()).collect();

    let options = config.compare_options();
    let mut ctx = EvalContext::from_config(config);
    let predicate = InPredicate::bind(probe.as_ref(), &refs, negated, &options, &mut ctx)?;
    let result = predicate.evaluate(&mut ctx);

    let mut report = Report::new(title);
    match predicate.vector() {
        Some(vector) => {
            report.field("matcher", "sorted vector");
            report.field("distinct keys", vector.len());
            report.field("list has NULL", vector.has_null());
        }
        None => report.field("matcher", "linear scan"),
    }
    report.truth("result", result);
    report.conditions(ctx.diagnostics().conditions());

    println!("{}", ResultFormatter::format(&report, format));
    Ok(())
}

pub fn handle_scope(
    config: &EngineConfig,
    file: &Path,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let script = ScopeScript::from_path(file)?;
    let report = script.run(config.scope_options())?;
    println!("{}", ResultFormatter::format_scope(&report, format));
    Ok(())
}

/// Parse an operand, giving string literals `collation` unless they carry
/// their own COLLATE clause
fn operand(text: &str, collation: &str) -> Result<Box<dyn Item>, Box<dyn Error>> {
    let item = parse_item(text)?;
    if collation == "binary"
        || item.result_type() != ResultType::String
        || item.collation().derivation == Derivation::Explicit
    {
        return Ok(item);
    }
    Ok(parse_item(&format!("{} COLLATE {}", text, collation))?)
}
