// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Row constructor node

use super::{Evaluated, Item, ResultType};
use crate::context::EvalContext;
use rust_decimal::Decimal;
use std::borrow::Cow;

/// Ordered tuple of expression nodes
///
/// Scalar accessors are meaningless on a row and report unknown.
#[derive(Debug)]
pub struct RowItem {
    elements: Vec<Box<dyn Item>>,
    unknown: bool,
}

impl RowItem {
    pub fn new(elements: Vec<Box<dyn Item>>) -> Self {
        Self {
            elements,
            unknown: false,
        }
    }

    /// A row whose evaluation yields NULL as a whole, as a subquery returning no rows does
    pub fn with_unknown(elements: Vec<Box<dyn Item>>) -> Self {
        Self {
            elements,
            unknown: true,
        }
    }

    pub fn elements(&self) -> &[Box<dyn Item>] {
        &self.elements
    }
}

impl Item for RowItem {
    fn result_type(&self) -> ResultType {
        ResultType::Row
    }

    fn is_constant(&self) -> bool {
        self.elements.iter().all(|e| e.is_constant())
    }

    fn val_int(&self, _ctx: &mut EvalContext) -> Evaluated<i64> {
        Evaluated::unknown()
    }

    fn val_decimal(&self, _ctx: &mut EvalContext) -> Evaluated<Decimal> {
        Evaluated::unknown()
    }

    fn val_real(&self, _ctx: &mut EvalContext) -> Evaluated<f64> {
        Evaluated::unknown()
    }

    fn val_str(&self, _ctx: &mut EvalContext) -> Evaluated<Cow<'_, [u8]>> {
        Evaluated::unknown()
    }

    fn cols(&self) -> usize {
        self.elements.len()
    }

    fn element(&self, index: usize) -> Option<&dyn Item> {
        self.elements.get(index).map(|e| e.as_ref())
    }

    fn row_is_unknown(&self, _ctx: &mut EvalContext) -> bool {
        self.unknown
    }
}
