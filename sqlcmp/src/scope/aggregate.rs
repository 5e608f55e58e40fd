// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Aggregate function occurrences

use super::BlockId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an aggregate occurrence in its [`super::QueryBlockTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AggregateId(pub usize);

impl fmt::Display for AggregateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aggregate #{}", self.0)
    }
}

/// Resolution state of one occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeState {
    /// Begun; arguments are still being resolved
    Unresolved,
    /// Registered with an outer block, final checks outstanding
    Pending,
    Bound,
    Rejected,
}

impl fmt::Display for ScopeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ScopeState::Unresolved => "unresolved",
            ScopeState::Pending => "pending",
            ScopeState::Bound => "bound",
            ScopeState::Rejected => "rejected",
        };
        write!(f, "{}", text)
    }
}

/// One aggregate function call in the query text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateOccurrence {
    pub id: AggregateId,
    /// Function name, for reporting
    pub function: String,
    /// Block the call appears in
    pub block: BlockId,
    /// Level of `block`
    pub nest_level: usize,
    /// Deepest level of any column referenced by the arguments
    pub max_arg_level: Option<usize>,
    /// Deepest aggregation level of any aggregate nested in the arguments
    pub max_sum_func_level: Option<usize>,
    /// Block that computes the aggregate, once chosen
    pub aggr_block: Option<BlockId>,
    pub aggr_level: Option<usize>,
    /// Blocks of column references from levels outside `nest_level`,
    /// including ones handed up by nested aggregates
    pub outer_fields: Vec<BlockId>,
    /// Aggregate whose arguments contain this one
    pub enclosing: Option<AggregateId>,
    pub state: ScopeState,
}

impl AggregateOccurrence {
    pub(crate) fn new(
        id: AggregateId,
        function: impl Into<String>,
        block: BlockId,
        nest_level: usize,
        enclosing: Option<AggregateId>,
    ) -> Self {
        Self {
            id,
            function: function.into(),
            block,
            nest_level,
            max_arg_level: None,
            max_sum_func_level: None,
            aggr_block: None,
            aggr_level: None,
            outer_fields: Vec::new(),
            enclosing,
            state: ScopeState::Unresolved,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.state == ScopeState::Bound
    }
}

impl fmt::Display for AggregateOccurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}() in {} [{}]", self.function, self.block, self.state)
    }
}
