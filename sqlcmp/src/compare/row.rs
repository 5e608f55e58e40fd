// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Column-wise row comparison

use super::{Comparator, ComparisonOp, SqlOrdering};
use crate::context::EvalContext;

/// Compare two rows column by column
///
/// The first column that compares unequal decides. A NULL column is handled
/// according to the owning operator: `<>` keeps scanning, ordering operators
/// stop with unknown, `=` stops only when it aborts on NULL. If the scan ends
/// after seeing a NULL column the result is unknown rather than equal.
pub(super) fn compare_rows(cmp: &Comparator<'_>, ctx: &mut EvalContext) -> SqlOrdering {
    // A whole-row NULL such as an empty scalar subquery
    if cmp.left().row_is_unknown(ctx) || cmp.right().row_is_unknown(ctx) {
        return SqlOrdering::Unknown;
    }

    let mut saw_unknown = false;
    for child in cmp.children() {
        match child.compare(ctx) {
            SqlOrdering::Equal => {}
            SqlOrdering::Unknown => match cmp.owner() {
                ComparisonOp::Ne => saw_unknown = true,
                ComparisonOp::Eq if !cmp.abort_on_null() => saw_unknown = true,
                _ => return SqlOrdering::Unknown,
            },
            decided => return decided,
        }
    }

    if saw_unknown {
        SqlOrdering::Unknown
    } else {
        SqlOrdering::Equal
    }
}

/// Null-safe row equality: every column must be null-safe equal
pub(super) fn equal_rows(cmp: &Comparator<'_>, ctx: &mut EvalContext) -> bool {
    cmp.children()
        .iter()
        .all(|child| child.equal_null_safe(ctx))
}
