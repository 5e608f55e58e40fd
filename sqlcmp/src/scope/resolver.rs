// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Aggregate scope resolution
//!
//! An aggregate is computed by the query block at its own level unless its
//! arguments only reference outer blocks, or aggregation is not permitted
//! where it appears. Then the resolver walks outward to find a block that
//! may compute it.

use super::aggregate::{AggregateId, ScopeState};
use super::block::{BlockId, GroupByFlags, QueryBlockTree};
use super::{NestingMap, ScopeError, ScopeOptions};

/// One resolution pass over a statement
///
/// Aggregates must be resolved innermost first: an aggregate nested in the
/// arguments of another is begun after it and resolved before it.
#[derive(Debug)]
pub struct ScopeResolver<'t> {
    tree: &'t mut QueryBlockTree,
    allowed: NestingMap,
    options: ScopeOptions,
    in_progress: Vec<AggregateId>,
}

impl<'t> ScopeResolver<'t> {
    pub fn new(tree: &'t mut QueryBlockTree, allowed: NestingMap, options: ScopeOptions) -> Self {
        Self {
            tree,
            allowed,
            options,
            in_progress: Vec::new(),
        }
    }

    pub fn tree(&self) -> &QueryBlockTree {
        self.tree
    }

    pub fn options(&self) -> &ScopeOptions {
        &self.options
    }

    pub fn allowed(&self) -> NestingMap {
        self.allowed
    }

    /// Replace the allow-aggregation map, e.g. when moving from WHERE to
    /// the select list
    pub fn set_allowed(&mut self, allowed: NestingMap) {
        self.allowed = allowed;
    }

    /// Aggregates begun and not yet resolved, innermost last
    pub fn in_progress(&self) -> &[AggregateId] {
        &self.in_progress
    }

    /// Start resolving an aggregate call that appears in `block`
    ///
    /// Fails immediately when no level permits aggregation.
    pub fn begin_aggregate(
        &mut self,
        function: &str,
        block: BlockId,
    ) -> Result<AggregateId, ScopeError> {
        let level = self.tree.block(block)?.level;
        if level > self.options.max_nesting_level {
            return Err(ScopeError::NestingTooDeep {
                level,
                max: self.options.max_nesting_level,
            });
        }

        let enclosing = self.in_progress.last().copied();
        let id = self.tree.push_aggregate(function, block, enclosing)?;

        if self.allowed.is_empty() {
            log::debug!("SCOPE: {}() in {} where no level allows aggregation", function, block);
            self.tree.aggregate_mut(id)?.state = ScopeState::Rejected;
            return Err(ScopeError::InvalidGroupFuncUse { aggregate: id });
        }

        self.in_progress.push(id);
        Ok(id)
    }

    /// Record a column reference from the arguments of `aggregate`
    pub fn note_column_reference(
        &mut self,
        aggregate: AggregateId,
        column_block: BlockId,
    ) -> Result<(), ScopeError> {
        let occurrence = self.tree.aggregate(aggregate)?;
        if occurrence.state != ScopeState::Unresolved {
            return Err(ScopeError::AlreadyResolved(aggregate));
        }
        if !self.tree.is_visible_from(column_block, occurrence.block) {
            return Err(ScopeError::ColumnNotVisible {
                aggregate,
                block: column_block,
            });
        }

        let level = self.tree.block(column_block)?.level;
        let occurrence = self.tree.aggregate_mut(aggregate)?;
        occurrence.max_arg_level = occurrence.max_arg_level.max(Some(level));
        if level < occurrence.nest_level {
            occurrence.outer_fields.push(column_block);
        }
        Ok(())
    }

    /// Record a column reference at the current position: inside the
    /// innermost aggregate being resolved, or as a plain column of its block
    pub fn note_column(&mut self, column_block: BlockId) -> Result<(), ScopeError> {
        match self.in_progress.last().copied() {
            Some(aggregate) => self.note_column_reference(aggregate, column_block),
            None => {
                let block = self.tree.block_mut(column_block)?;
                block.flags.insert(GroupByFlags::NON_AGG_FIELD_USED);
                Ok(())
            }
        }
    }

    /// Choose the block that computes `aggregate`
    ///
    /// On success the aggregate is appended to that block's aggregate list
    /// and every subquery boundary between the two blocks is flagged.
    pub fn resolve_aggregate_scope(
        &mut self,
        aggregate: AggregateId,
    ) -> Result<BlockId, ScopeError> {
        let occurrence = self.tree.aggregate(aggregate)?;
        if occurrence.state != ScopeState::Unresolved {
            return Err(ScopeError::AlreadyResolved(aggregate));
        }
        if let Some(&innermost) = self.in_progress.last() {
            if innermost != aggregate {
                return Err(ScopeError::OutOfOrder {
                    aggregate,
                    innermost,
                });
            }
        }

        let block = occurrence.block;
        let nest_level = occurrence.nest_level;
        let max_arg_level = occurrence.max_arg_level;
        let allowed_here = self.allowed.allows(nest_level);

        let mut aggr_block = None;
        let mut invalid = if max_arg_level == Some(nest_level) {
            !allowed_here
        } else if max_arg_level.is_some() || !allowed_here {
            aggr_block = self.register_outer(aggregate)?;
            let mut invalid = aggr_block.is_none() && !allowed_here;
            if !invalid && self.options.ansi {
                // Outer-only arguments must be aggregated in an outer block
                invalid = aggr_block.is_none() && max_arg_level.map_or(true, |m| m < nest_level);
            }
            invalid
        } else {
            false
        };

        if !invalid && aggr_block.is_none() {
            self.tree.block_mut(block)?.aggregates.push(aggregate);
            aggr_block = Some(block);
        }

        let aggr_level = match aggr_block {
            Some(id) => Some(self.tree.block(id)?.level),
            None => None,
        };
        let occurrence = self.tree.aggregate(aggregate)?;
        let enclosing = occurrence.enclosing;
        if !invalid {
            invalid = aggr_level <= occurrence.max_sum_func_level;
        }

        if !invalid {
            if let Some(outer) = enclosing {
                let max_sum_func_level = occurrence.max_sum_func_level;
                let outer = self.tree.aggregate_mut(outer)?;
                if aggr_level <= Some(outer.nest_level) {
                    outer.max_sum_func_level = outer.max_sum_func_level.max(aggr_level);
                }
                outer.max_sum_func_level = outer.max_sum_func_level.max(max_sum_func_level);
            }
        }

        let mixture = self.check_outer_fields(aggregate, aggr_level.unwrap_or(nest_level))?;

        self.in_progress.pop();
        if invalid {
            self.reject(aggregate, aggr_block)?;
            log::debug!("SCOPE: {} rejected, no block may compute it", aggregate);
            return Err(ScopeError::InvalidGroupFuncUse { aggregate });
        }
        if let Some(block) = mixture {
            self.reject(aggregate, aggr_block)?;
            return Err(ScopeError::MixOfGroupFuncAndFields { block });
        }

        let Some(aggr_block) = aggr_block else {
            return Err(ScopeError::InvalidGroupFuncUse { aggregate });
        };
        self.bind(aggregate, block, aggr_block, aggr_level)?;
        Ok(aggr_block)
    }

    /// Apply the per-block checks that run once the whole block is resolved
    pub fn check_full_group_by(&self, block: BlockId) -> Result<(), ScopeError> {
        if self.options.only_full_group_by {
            self.tree.check_full_group_by(block)
        } else {
            self.tree.block(block).map(|_| ())
        }
    }

    /// Walk outward from the aggregate's block looking for one that may
    /// compute it, and register it there
    fn register_outer(&mut self, aggregate: AggregateId) -> Result<Option<BlockId>, ScopeError> {
        let occurrence = self.tree.aggregate(aggregate)?;
        let max_arg_level = occurrence.max_arg_level;

        let mut candidate = None;
        let mut cursor = self.tree.block(occurrence.block)?.outer;
        while let Some(id) = cursor {
            let block = self.tree.block(id)?;
            if max_arg_level.map_or(false, |m| block.level <= m) {
                break;
            }
            // Innermost block that permits aggregation
            if candidate.is_none() && self.allowed.allows(block.level) {
                candidate = Some(id);
            }
            cursor = block.outer;
        }

        // The block owning the deepest argument wins when it permits aggregation
        if let Some(id) = cursor {
            if self.allowed.allows(self.tree.block(id)?.level) {
                candidate = Some(id);
            }
        }

        if let Some(id) = candidate {
            self.tree.block_mut(id)?.aggregates.push(aggregate);
            let occurrence = self.tree.aggregate_mut(aggregate)?;
            occurrence.aggr_block = Some(id);
            occurrence.state = ScopeState::Pending;
            log::debug!("SCOPE: {} registered with outer {}", aggregate, id);
        }
        Ok(candidate)
    }

    /// Hand outer fields up to the enclosing aggregate or mark them as plain
    /// columns, and find any deeper block illegally mixing aggregates and
    /// fields
    fn check_outer_fields(
        &mut self,
        aggregate: AggregateId,
        aggr_level: usize,
    ) -> Result<Option<BlockId>, ScopeError> {
        let occurrence = self.tree.aggregate(aggregate)?;
        let enclosing = occurrence.enclosing;
        let fields = occurrence.outer_fields.clone();

        let mut mixture = None;
        for field_block in fields {
            let block = self.tree.block(field_block)?;
            let level = block.level;
            let mixes = level > aggr_level
                && block.flags.contains(GroupByFlags::SUM_FUNC_USED)
                && !block.has_group_by;

            if level < aggr_level {
                match enclosing {
                    Some(outer) => self.tree.aggregate_mut(outer)?.outer_fields.push(field_block),
                    None => self
                        .tree
                        .block_mut(field_block)?
                        .flags
                        .insert(GroupByFlags::NON_AGG_FIELD_USED),
                }
            }
            if mixes && mixture.is_none() {
                mixture = Some(field_block);
            }
        }
        Ok(mixture)
    }

    fn bind(
        &mut self,
        aggregate: AggregateId,
        block: BlockId,
        aggr_block: BlockId,
        aggr_level: Option<usize>,
    ) -> Result<(), ScopeError> {
        self.tree
            .block_mut(aggr_block)?
            .flags
            .insert(GroupByFlags::SUM_FUNC_USED);

        let boundaries: Vec<BlockId> = self
            .tree
            .outer_chain(block)
            .take_while(|b| b.id != aggr_block)
            .map(|b| b.id)
            .collect();
        for id in boundaries {
            self.tree.block_mut(id)?.contains_outer_aggregate_ref = true;
        }

        let occurrence = self.tree.aggregate_mut(aggregate)?;
        occurrence.aggr_block = Some(aggr_block);
        occurrence.aggr_level = aggr_level;
        occurrence.state = ScopeState::Bound;
        log::debug!(
            "SCOPE: {}() bound to {} at level {:?}",
            occurrence.function,
            aggr_block,
            aggr_level
        );
        Ok(())
    }

    fn reject(
        &mut self,
        aggregate: AggregateId,
        registered: Option<BlockId>,
    ) -> Result<(), ScopeError> {
        if let Some(id) = registered {
            self.tree.block_mut(id)?.aggregates.retain(|a| *a != aggregate);
        }
        let occurrence = self.tree.aggregate_mut(aggregate)?;
        occurrence.aggr_block = None;
        occurrence.aggr_level = None;
        occurrence.state = ScopeState::Rejected;
        Ok(())
    }
}
