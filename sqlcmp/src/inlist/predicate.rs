// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! `probe [NOT] IN (list)`

use super::vector::{InVector, KeyKind};
use super::ListMatch;
use crate::compare::{
    reserve, CompareError, CompareOptions, Comparator, ComparisonOp, SqlOrdering,
};
use crate::context::EvalContext;
use crate::value::{Item, ResultType};

/// IN predicate with three-valued semantics
///
/// `x IN (a, b, NULL)` is true when `x` matches, unknown when it does not
/// (the NULL might have matched), and unknown when `x` is NULL.
#[derive(Debug)]
pub struct InPredicate<'a> {
    probe: &'a dyn Item,
    comparators: Vec<Comparator<'a>>,
    vector: Option<InVector>,
    negated: bool,
}

impl<'a> InPredicate<'a> {
    /// Bind the probe against every element and materialize constant lists
    ///
    /// Constant list elements are evaluated here, so conversions may record
    /// diagnostics in `ctx`.
    pub fn bind(
        probe: &'a dyn Item,
        items: &[&'a dyn Item],
        negated: bool,
        options: &CompareOptions,
        ctx: &mut EvalContext,
    ) -> Result<Self, CompareError> {
        // Row elements keep scanning past NULL columns, as `x = a` does
        let element_options = CompareOptions {
            abort_on_null: false,
            ..options.clone()
        };

        let mut comparators = Vec::new();
        reserve(&mut comparators, items.len(), "IN comparators")?;
        for item in items {
            comparators.push(Comparator::bind(
                probe,
                *item,
                ComparisonOp::Eq,
                &element_options,
            )?);
        }

        let materialize = !items.is_empty()
            && items.len() <= options.max_in_list_elements
            && items.iter().all(|item| item.is_constant());
        let vector = match common_kind(&comparators) {
            Some(kind) if materialize => InVector::build(kind, items, ctx)?,
            _ => None,
        };

        if vector.is_none() {
            log::debug!("IN: {} elements answered by linear scan", items.len());
        }

        Ok(Self {
            probe,
            comparators,
            vector,
            negated,
        })
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// True when membership is answered by binary search
    pub fn uses_vector(&self) -> bool {
        self.vector.is_some()
    }

    pub fn vector(&self) -> Option<&InVector> {
        self.vector.as_ref()
    }

    /// Membership of the probe, before NULL list elements are taken into account
    pub fn list_contains(&self, ctx: &mut EvalContext) -> ListMatch {
        match &self.vector {
            Some(vector) => vector.contains(self.probe, ctx),
            None => match self.scan(ctx) {
                Some(true) => ListMatch::Found,
                Some(false) => ListMatch::NotFound,
                None => ListMatch::Unknown,
            },
        }
    }

    /// SQL truth value; `None` is unknown
    pub fn evaluate(&self, ctx: &mut EvalContext) -> Option<bool> {
        let found = match &self.vector {
            Some(vector) => match vector.contains(self.probe, ctx) {
                ListMatch::Found => Some(true),
                ListMatch::NotFound if vector.has_null() => None,
                ListMatch::NotFound => Some(false),
                // A row probe with some NULL columns may still differ everywhere
                ListMatch::Unknown if self.probe.result_type() == ResultType::Row => {
                    self.scan(ctx)
                }
                ListMatch::Unknown => None,
            },
            None => self.scan(ctx),
        };

        if self.negated {
            found.map(|b| !b)
        } else {
            found
        }
    }

    /// Compare against every element: true on a match, unknown if some
    /// comparison was unknown, false otherwise
    fn scan(&self, ctx: &mut EvalContext) -> Option<bool> {
        let mut saw_unknown = false;
        for cmp in &self.comparators {
            match cmp.compare(ctx) {
                SqlOrdering::Equal => return Some(true),
                SqlOrdering::Unknown => saw_unknown = true,
                _ => {}
            }
        }
        if saw_unknown {
            None
        } else {
            Some(false)
        }
    }
}

/// The key kind shared by every element comparator, if there is one
fn common_kind(comparators: &[Comparator<'_>]) -> Option<KeyKind> {
    let (first, rest) = comparators.split_first()?;
    let kind = KeyKind::for_comparator(first)?;
    for cmp in rest {
        if !KeyKind::for_comparator(cmp)?.same_as(&kind) {
            return None;
        }
    }
    Some(kind)
}
