// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query block nesting tree

use super::aggregate::{AggregateId, AggregateOccurrence};
use super::{ScopeError, MAX_NESTING_LEVEL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a query block in its [`QueryBlockTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub usize);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block #{}", self.0)
    }
}

/// Full GROUP BY usage flags of a block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupByFlags(u8);

impl GroupByFlags {
    /// An aggregate is computed in the block
    pub const SUM_FUNC_USED: GroupByFlags = GroupByFlags(1);
    /// A column of the block is used outside any aggregate
    pub const NON_AGG_FIELD_USED: GroupByFlags = GroupByFlags(2);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn contains(&self, other: GroupByFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: GroupByFlags) {
        self.0 |= other.0;
    }
}

/// One SELECT of a (possibly nested) statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryBlock {
    pub id: BlockId,
    /// 0 for the outermost block
    pub level: usize,
    pub outer: Option<BlockId>,
    pub has_group_by: bool,
    pub flags: GroupByFlags,
    /// Aggregates computed by this block
    pub aggregates: Vec<AggregateId>,
    /// The boundary of this block contains an aggregate computed further out,
    /// so the block cannot be evaluated on its own
    pub contains_outer_aggregate_ref: bool,
}

/// Arena of query blocks and the aggregate occurrences found in them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryBlockTree {
    blocks: Vec<QueryBlock>,
    aggregates: Vec<AggregateOccurrence>,
}

impl QueryBlockTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an outermost block
    pub fn add_root(&mut self) -> BlockId {
        self.push_block(0, None)
    }

    /// Add a subquery block nested directly in `outer`
    pub fn add_block(&mut self, outer: BlockId) -> Result<BlockId, ScopeError> {
        let level = self.block(outer)?.level + 1;
        if level > MAX_NESTING_LEVEL {
            return Err(ScopeError::NestingTooDeep {
                level,
                max: MAX_NESTING_LEVEL,
            });
        }
        Ok(self.push_block(level, Some(outer)))
    }

    fn push_block(&mut self, level: usize, outer: Option<BlockId>) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(QueryBlock {
            id,
            level,
            outer,
            has_group_by: false,
            flags: GroupByFlags::empty(),
            aggregates: Vec::new(),
            contains_outer_aggregate_ref: false,
        });
        id
    }

    pub fn set_group_by(&mut self, id: BlockId, has_group_by: bool) -> Result<(), ScopeError> {
        self.block_mut(id)?.has_group_by = has_group_by;
        Ok(())
    }

    pub fn block(&self, id: BlockId) -> Result<&QueryBlock, ScopeError> {
        self.blocks.get(id.0).ok_or(ScopeError::UnknownBlock(id))
    }

    pub fn block_mut(&mut self, id: BlockId) -> Result<&mut QueryBlock, ScopeError> {
        self.blocks.get_mut(id.0).ok_or(ScopeError::UnknownBlock(id))
    }

    pub fn blocks(&self) -> &[QueryBlock] {
        &self.blocks
    }

    pub fn aggregate(&self, id: AggregateId) -> Result<&AggregateOccurrence, ScopeError> {
        self.aggregates.get(id.0).ok_or(ScopeError::UnknownAggregate(id))
    }

    pub fn aggregate_mut(
        &mut self,
        id: AggregateId,
    ) -> Result<&mut AggregateOccurrence, ScopeError> {
        self.aggregates
            .get_mut(id.0)
            .ok_or(ScopeError::UnknownAggregate(id))
    }

    pub fn aggregates(&self) -> &[AggregateOccurrence] {
        &self.aggregates
    }

    pub(crate) fn push_aggregate(
        &mut self,
        function: &str,
        block: BlockId,
        enclosing: Option<AggregateId>,
    ) -> Result<AggregateId, ScopeError> {
        let level = self.block(block)?.level;
        let id = AggregateId(self.aggregates.len());
        self.aggregates
            .push(AggregateOccurrence::new(id, function, block, level, enclosing));
        Ok(id)
    }

    /// `id` followed by each enclosing block out to the root
    pub fn outer_chain(&self, id: BlockId) -> impl Iterator<Item = &QueryBlock> + '_ {
        std::iter::successors(self.blocks.get(id.0), move |block| {
            block.outer.and_then(|outer| self.blocks.get(outer.0))
        })
    }

    /// True when `ancestor` is `id` or encloses it
    pub fn is_visible_from(&self, ancestor: BlockId, id: BlockId) -> bool {
        self.outer_chain(id).any(|block| block.id == ancestor)
    }

    /// Reject a block that computes aggregates and also uses plain columns
    /// without GROUP BY
    pub fn check_full_group_by(&self, id: BlockId) -> Result<(), ScopeError> {
        let block = self.block(id)?;
        if block.flags.contains(GroupByFlags::SUM_FUNC_USED)
            && block.flags.contains(GroupByFlags::NON_AGG_FIELD_USED)
            && !block.has_group_by
        {
            return Err(ScopeError::MixOfGroupFuncAndFields { block: id });
        }
        Ok(())
    }
}
