// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! JSON description of a block tree and the resolution steps run over it
//!
//! ```json
//! {
//!   "blocks": [
//!     {"name": "outer"},
//!     {"name": "sub", "outer": "outer"}
//!   ],
//!   "steps": [
//!     {"begin": {"name": "s", "function": "SUM", "block": "sub"}},
//!     {"column": "outer"},
//!     {"resolve": "s"}
//!   ]
//! }
//! ```

use super::{
    AggregateId, BlockId, GroupByFlags, NestingMap, QueryBlockTree, ScopeError, ScopeOptions,
    ScopeResolver, ScopeState,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeScript {
    /// Overrides the options supplied by the caller
    #[serde(default)]
    pub options: Option<ScopeOptions>,
    pub blocks: Vec<BlockSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A query block; blocks must be listed after their outer block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub name: String,
    #[serde(default)]
    pub outer: Option<String>,
    #[serde(default)]
    pub group_by: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Permit aggregation exactly at the levels of these blocks
    Allow(Vec<String>),
    Begin(BeginStep),
    /// Column of the named block, inside the innermost open aggregate if any
    Column(String),
    Resolve(String),
    CheckFullGroupBy(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeginStep {
    pub name: String,
    pub function: String,
    pub block: String,
}

/// Outcome of running a script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptReport {
    pub aggregates: Vec<AggregateReport>,
    pub blocks: Vec<BlockReport>,
    pub errors: Vec<StepError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub name: String,
    pub function: String,
    pub block: String,
    pub state: ScopeState,
    pub bound_block: Option<String>,
    pub aggr_level: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockReport {
    pub name: String,
    pub level: usize,
    pub has_group_by: bool,
    pub aggregates: Vec<String>,
    pub sum_func_used: bool,
    pub non_agg_field_used: bool,
    pub contains_outer_aggregate_ref: bool,
}

/// A resolution error raised by one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepError {
    /// Zero-based step index
    pub step: usize,
    pub code: Option<u32>,
    pub message: String,
}

impl ScopeScript {
    pub fn from_json_str(json: &str) -> Result<Self, ScopeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScopeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScopeError::InvalidScript(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Build the tree and run every step
    ///
    /// Resolution errors are collected per step and do not stop the run;
    /// malformed scripts (unknown or duplicate names) fail outright.
    pub fn run(&self, options: ScopeOptions) -> Result<ScriptReport, ScopeError> {
        let options = self.options.unwrap_or(options);
        let mut tree = QueryBlockTree::new();
        let mut blocks: HashMap<&str, BlockId> = HashMap::new();
        let mut block_names = Vec::new();

        for spec in &self.blocks {
            if blocks.contains_key(spec.name.as_str()) {
                return Err(invalid(format!("duplicate block '{}'", spec.name)));
            }
            let id = match &spec.outer {
                Some(outer) => tree.add_block(lookup(&blocks, outer, "block")?)?,
                None => tree.add_root(),
            };
            tree.set_group_by(id, spec.group_by)?;
            blocks.insert(&spec.name, id);
            block_names.push(spec.name.clone());
        }

        let levels: Vec<usize> = tree.blocks().iter().map(|b| b.level).collect();
        let mut aggregates: HashMap<&str, AggregateId> = HashMap::new();
        let mut aggregate_names: HashMap<AggregateId, String> = HashMap::new();
        let mut errors = Vec::new();

        let mut resolver = ScopeResolver::new(&mut tree, NestingMap::from_levels(levels), options);
        for (index, step) in self.steps.iter().enumerate() {
            let outcome = match step {
                Step::Allow(names) => {
                    let mut allowed = NestingMap::empty();
                    for name in names {
                        let id = lookup(&blocks, name, "block")?;
                        allowed.allow(resolver.tree().block(id)?.level);
                    }
                    resolver.set_allowed(allowed);
                    Ok(())
                }
                Step::Begin(begin) => {
                    if aggregates.contains_key(begin.name.as_str()) {
                        return Err(invalid(format!("duplicate aggregate '{}'", begin.name)));
                    }
                    let block = lookup(&blocks, &begin.block, "block")?;
                    let result = resolver.begin_aggregate(&begin.function, block);
                    let id = match &result {
                        Ok(id) => Some(*id),
                        Err(ScopeError::InvalidGroupFuncUse { aggregate }) => Some(*aggregate),
                        Err(_) => None,
                    };
                    if let Some(id) = id {
                        aggregates.insert(&begin.name, id);
                        aggregate_names.insert(id, begin.name.clone());
                    }
                    result.map(|_| ())
                }
                Step::Column(name) => resolver.note_column(lookup(&blocks, name, "block")?),
                Step::Resolve(name) => resolver
                    .resolve_aggregate_scope(lookup(&aggregates, name, "aggregate")?)
                    .map(|_| ()),
                Step::CheckFullGroupBy(name) => {
                    resolver.check_full_group_by(lookup(&blocks, name, "block")?)
                }
            };

            if let Err(err) = outcome {
                log::debug!("SCOPE SCRIPT: step {} failed: {}", index, err);
                errors.push(StepError {
                    step: index,
                    code: err.code(),
                    message: err.to_string(),
                });
            }
        }

        let block_name = |id: BlockId| block_names.get(id.0).cloned().unwrap_or_default();
        let aggregate_name =
            |id: &AggregateId| aggregate_names.get(id).cloned().unwrap_or_default();

        let aggregates = tree
            .aggregates()
            .iter()
            .map(|a| AggregateReport {
                name: aggregate_name(&a.id),
                function: a.function.clone(),
                block: block_name(a.block),
                state: a.state,
                bound_block: a.aggr_block.map(block_name),
                aggr_level: a.aggr_level,
            })
            .collect();

        let blocks = tree
            .blocks()
            .iter()
            .map(|b| BlockReport {
                name: block_name(b.id),
                level: b.level,
                has_group_by: b.has_group_by,
                aggregates: b.aggregates.iter().map(aggregate_name).collect(),
                sum_func_used: b.flags.contains(GroupByFlags::SUM_FUNC_USED),
                non_agg_field_used: b.flags.contains(GroupByFlags::NON_AGG_FIELD_USED),
                contains_outer_aggregate_ref: b.contains_outer_aggregate_ref,
            })
            .collect();

        Ok(ScriptReport {
            aggregates,
            blocks,
            errors,
        })
    }
}

impl ScriptReport {
    pub fn aggregate(&self, name: &str) -> Option<&AggregateReport> {
        self.aggregates.iter().find(|a| a.name == name)
    }

    pub fn block(&self, name: &str) -> Option<&BlockReport> {
        self.blocks.iter().find(|b| b.name == name)
    }
}

fn lookup<T: Copy>(names: &HashMap<&str, T>, name: &str, kind: &str) -> Result<T, ScopeError> {
    names
        .get(name)
        .copied()
        .ok_or_else(|| invalid(format!("unknown {} '{}'", kind, name)))
}

fn invalid(message: String) -> ScopeError {
    ScopeError::InvalidScript(message)
}
