// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Bound comparator descriptor

use super::error::reserve;
use super::strategy::{self, CompareStrategy};
use super::{row, scalar, CompareError, CompareOptions, ComparisonOp, SqlOrdering};
use crate::collation::CollationRef;
use crate::context::EvalContext;
use crate::value::Item;

/// A comparison of two borrowed operands with its strategy fixed at bind time
#[derive(Debug)]
pub struct Comparator<'a> {
    left: &'a dyn Item,
    right: &'a dyn Item,
    strategy: CompareStrategy,
    collation: Option<CollationRef>,
    owner: ComparisonOp,
    abort_on_null: bool,
    /// One child per column for row comparison
    children: Vec<Comparator<'a>>,
}

impl<'a> Comparator<'a> {
    /// Choose the strategy for `left` against `right` on behalf of `owner`
    ///
    /// Fails on row arity mismatch and on collations that cannot be combined.
    pub fn bind(
        left: &'a dyn Item,
        right: &'a dyn Item,
        owner: ComparisonOp,
        options: &CompareOptions,
    ) -> Result<Self, CompareError> {
        let selection = strategy::select(left, right, owner, options)?;

        let mut children = Vec::new();
        if selection.strategy == CompareStrategy::Row {
            let cols = left.cols();
            reserve(&mut children, cols, "row comparators")?;
            for i in 0..cols {
                let (Some(l), Some(r)) = (left.element(i), right.element(i)) else {
                    return Err(CompareError::OperandColumns {
                        expected: cols,
                        actual: i,
                    });
                };
                children.push(Comparator::bind(l, r, owner, options)?);
            }
        }

        log::debug!(
            "COMPARATOR: {} {} {} -> {} (collation: {})",
            left.result_type(),
            owner,
            right.result_type(),
            selection.strategy,
            selection
                .collation
                .as_ref()
                .map(|c| c.name().to_string())
                .unwrap_or_else(|| "-".to_string())
        );

        Ok(Self {
            left,
            right,
            strategy: selection.strategy,
            collation: selection.collation,
            owner,
            abort_on_null: options.abort_on_null,
            children,
        })
    }

    pub fn strategy(&self) -> CompareStrategy {
        self.strategy
    }

    pub fn collation(&self) -> Option<&CollationRef> {
        self.collation.as_ref()
    }

    pub fn epsilon(&self) -> Option<f64> {
        self.strategy.epsilon()
    }

    pub fn owner(&self) -> ComparisonOp {
        self.owner
    }

    pub fn abort_on_null(&self) -> bool {
        self.abort_on_null
    }

    pub fn left(&self) -> &'a dyn Item {
        self.left
    }

    pub fn right(&self) -> &'a dyn Item {
        self.right
    }

    pub fn children(&self) -> &[Comparator<'a>] {
        &self.children
    }

    /// Three-way comparison; unknown when an operand is NULL
    pub fn compare(&self, ctx: &mut EvalContext) -> SqlOrdering {
        let (l, r) = (self.left, self.right);
        match self.strategy {
            CompareStrategy::SignedInt => scalar::compare_signed(l, r, ctx),
            CompareStrategy::UnsignedInt => scalar::compare_unsigned(l, r, ctx),
            CompareStrategy::SignedUnsigned => scalar::compare_signed_unsigned(l, r, ctx),
            CompareStrategy::UnsignedSigned => scalar::compare_unsigned_signed(l, r, ctx),
            CompareStrategy::Decimal => scalar::compare_decimal(l, r, ctx),
            CompareStrategy::Float => scalar::compare_real(l, r, ctx),
            CompareStrategy::FloatEpsilon(e) => scalar::compare_real_epsilon(l, r, e, ctx),
            CompareStrategy::BinaryString => scalar::compare_binary_string(l, r, ctx),
            CompareStrategy::CollatedString => match &self.collation {
                Some(c) => scalar::compare_collated_string(l, r, c.as_ref(), ctx),
                None => scalar::compare_binary_string(l, r, ctx),
            },
            CompareStrategy::Temporal => scalar::compare_temporal(l, r, ctx),
            CompareStrategy::Row => row::compare_rows(self, ctx),
        }
    }

    /// Null-safe equality: two NULLs are equal, one NULL is not
    pub fn equal_null_safe(&self, ctx: &mut EvalContext) -> bool {
        let (l, r) = (self.left, self.right);
        match self.strategy {
            CompareStrategy::SignedInt => scalar::equal_signed(l, r, ctx),
            CompareStrategy::UnsignedInt => scalar::equal_unsigned(l, r, ctx),
            CompareStrategy::SignedUnsigned => scalar::equal_signed_unsigned(l, r, ctx),
            CompareStrategy::UnsignedSigned => scalar::equal_unsigned_signed(l, r, ctx),
            CompareStrategy::Decimal => scalar::equal_decimal(l, r, ctx),
            CompareStrategy::Float => scalar::equal_real(l, r, ctx),
            CompareStrategy::FloatEpsilon(e) => scalar::equal_real_epsilon(l, r, e, ctx),
            CompareStrategy::BinaryString => scalar::equal_binary_string(l, r, ctx),
            CompareStrategy::CollatedString => match &self.collation {
                Some(c) => scalar::equal_collated_string(l, r, c.as_ref(), ctx),
                None => scalar::equal_binary_string(l, r, ctx),
            },
            CompareStrategy::Temporal => scalar::equal_temporal(l, r, ctx),
            CompareStrategy::Row => row::equal_rows(self, ctx),
        }
    }
}
