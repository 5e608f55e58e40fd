// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Materialized IN list keys

use super::sorted::{cmp_mixed_sign, IntKey, SortedList};
use super::ListMatch;
use crate::collation::CollationRef;
use crate::compare::{reserve, CompareError, CompareStrategy, Comparator, DecimalKey};
use crate::context::EvalContext;
use crate::value::Item;
use std::cmp::Ordering;
use std::mem;

/// How list elements are turned into keys and ordered
#[derive(Debug, Clone)]
pub enum KeyKind {
    /// Integers of either signedness
    Int,
    Decimal,
    Float,
    /// Byte strings, ordered by the collation when one is present
    Str(Option<CollationRef>),
    Temporal,
    /// One kind per column
    Row(Vec<KeyKind>),
}

/// One evaluated list element
#[derive(Debug, Clone, PartialEq)]
pub enum ListKey {
    Int(IntKey),
    Decimal(DecimalKey),
    Float(f64),
    Str(Vec<u8>),
    Temporal(u64),
    Row(Vec<ListKey>),
}

impl ListKey {
    fn rank(&self) -> u8 {
        match self {
            ListKey::Int(_) => 0,
            ListKey::Decimal(_) => 1,
            ListKey::Float(_) => 2,
            ListKey::Str(_) => 3,
            ListKey::Temporal(_) => 4,
            ListKey::Row(_) => 5,
        }
    }
}

impl KeyKind {
    /// Key kind matching a bound comparator, if its strategy is a total order
    pub fn for_comparator(cmp: &Comparator<'_>) -> Option<Self> {
        match cmp.strategy() {
            CompareStrategy::SignedInt
            | CompareStrategy::UnsignedInt
            | CompareStrategy::SignedUnsigned
            | CompareStrategy::UnsignedSigned => Some(KeyKind::Int),
            CompareStrategy::Decimal => Some(KeyKind::Decimal),
            CompareStrategy::Float => Some(KeyKind::Float),
            // Approximate equality is not transitive
            CompareStrategy::FloatEpsilon(_) => None,
            CompareStrategy::BinaryString => Some(KeyKind::Str(None)),
            CompareStrategy::CollatedString => Some(KeyKind::Str(cmp.collation().cloned())),
            CompareStrategy::Temporal => Some(KeyKind::Temporal),
            CompareStrategy::Row => cmp
                .children()
                .iter()
                .map(KeyKind::for_comparator)
                .collect::<Option<Vec<_>>>()
                .map(KeyKind::Row),
        }
    }

    /// True when both kinds build and order keys identically
    pub fn same_as(&self, other: &KeyKind) -> bool {
        match (self, other) {
            (KeyKind::Str(a), KeyKind::Str(b)) => {
                a.as_ref().map(|c| c.name()) == b.as_ref().map(|c| c.name())
            }
            (KeyKind::Row(a), KeyKind::Row(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_as(y))
            }
            (a, b) => mem::discriminant(a) == mem::discriminant(b),
        }
    }

    /// Evaluate `item` into a key; `None` when it is NULL or otherwise unknown
    pub fn key_for(&self, item: &dyn Item, ctx: &mut EvalContext) -> Option<ListKey> {
        match self {
            KeyKind::Int => {
                if item.is_unsigned() {
                    item.val_uint(ctx)
                        .into_option()
                        .map(|v| ListKey::Int(IntKey::unsigned(v)))
                } else {
                    item.val_int(ctx)
                        .into_option()
                        .map(|v| ListKey::Int(IntKey::signed(v)))
                }
            }
            KeyKind::Decimal => DecimalKey::evaluate(item, ctx)
                .into_option()
                .map(ListKey::Decimal),
            KeyKind::Float => {
                let v = item.val_real(ctx).into_option()?;
                if v.is_nan() {
                    // NaN compares unknown against everything
                    return None;
                }
                Some(ListKey::Float(if v == 0.0 { 0.0 } else { v }))
            }
            KeyKind::Str(_) => item
                .val_str(ctx)
                .into_option()
                .map(|s| ListKey::Str(s.into_owned())),
            KeyKind::Temporal => item
                .val_temporal(ctx)
                .into_option()
                .map(|t| ListKey::Temporal(t.as_u64())),
            KeyKind::Row(kinds) => {
                if item.row_is_unknown(ctx) || item.cols() != kinds.len() {
                    return None;
                }
                let mut keys = Vec::with_capacity(kinds.len());
                for (i, kind) in kinds.iter().enumerate() {
                    keys.push(kind.key_for(item.element(i)?, ctx)?);
                }
                Some(ListKey::Row(keys))
            }
        }
    }

    /// Total order over keys of this kind
    pub fn compare(&self, a: &ListKey, b: &ListKey) -> Ordering {
        match (self, a, b) {
            (KeyKind::Int, ListKey::Int(x), ListKey::Int(y)) => cmp_mixed_sign(x, y),
            (KeyKind::Decimal, ListKey::Decimal(x), ListKey::Decimal(y)) => x.cmp(y),
            (KeyKind::Float, ListKey::Float(x), ListKey::Float(y)) => x.total_cmp(y),
            (KeyKind::Str(Some(c)), ListKey::Str(x), ListKey::Str(y)) => c.compare(x, y),
            (KeyKind::Str(None), ListKey::Str(x), ListKey::Str(y)) => x.cmp(y),
            (KeyKind::Temporal, ListKey::Temporal(x), ListKey::Temporal(y)) => x.cmp(y),
            (KeyKind::Row(kinds), ListKey::Row(xs), ListKey::Row(ys)) => kinds
                .iter()
                .zip(xs.iter().zip(ys))
                .map(|(kind, (x, y))| kind.compare(x, y))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or_else(|| xs.len().cmp(&ys.len())),
            _ => a.rank().cmp(&b.rank()),
        }
    }
}

/// Sorted, deduplicated keys of a constant IN list
#[derive(Debug)]
pub struct InVector {
    kind: KeyKind,
    list: SortedList<ListKey>,
    has_null: bool,
    source_len: usize,
}

impl InVector {
    /// Evaluate `items` into a sorted key vector
    ///
    /// NULL scalar elements are left out and remembered. Returns `Ok(None)`
    /// when a row element has a NULL column, since such a row cannot be
    /// placed in a total order.
    pub fn build(
        kind: KeyKind,
        items: &[&dyn Item],
        ctx: &mut EvalContext,
    ) -> Result<Option<Self>, CompareError> {
        let mut keys = Vec::new();
        reserve(&mut keys, items.len(), "IN list")?;
        let mut has_null = false;

        for item in items {
            match kind.key_for(*item, ctx) {
                Some(key) => keys.push(key),
                None if matches!(kind, KeyKind::Row(_)) => {
                    log::debug!("IN: row element with NULL column, list not materialized");
                    return Ok(None);
                }
                None => has_null = true,
            }
        }

        let order_kind = kind.clone();
        let list = SortedList::new(
            keys,
            Box::new(move |a: &ListKey, b: &ListKey| order_kind.compare(a, b)),
        );
        log::debug!(
            "IN: materialized {} distinct of {} elements (kind: {:?}, has_null: {})",
            list.len(),
            items.len(),
            kind,
            has_null
        );

        Ok(Some(Self {
            kind,
            list,
            has_null,
            source_len: items.len(),
        }))
    }

    /// Membership of `probe`
    ///
    /// A NULL probe is `Unknown`; an empty vector never matches. Whether a
    /// miss against a list holding NULL is unknown is left to the caller.
    pub fn contains(&self, probe: &dyn Item, ctx: &mut EvalContext) -> ListMatch {
        let Some(key) = self.kind.key_for(probe, ctx) else {
            return ListMatch::Unknown;
        };
        if self.list.is_empty() {
            return ListMatch::NotFound;
        }
        if self.list.contains(&key) {
            ListMatch::Found
        } else {
            ListMatch::NotFound
        }
    }

    pub fn kind(&self) -> &KeyKind {
        &self.kind
    }

    /// Distinct non-NULL keys
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Number of list elements before deduplication, NULLs included
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// True when some list element was NULL
    pub fn has_null(&self) -> bool {
        self.has_null
    }

    pub fn keys(&self) -> &[ListKey] {
        self.list.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation;
    use crate::value::{parse_item, Literal};

    fn build(kind: KeyKind, items: &[Box<dyn Item>]) -> InVector {
        let mut ctx = EvalContext::new();
        let refs: Vec<&dyn Item> = items.iter().map(|i| i.as_ref()).collect();
        InVector::build(kind, &refs, &mut ctx).unwrap().unwrap()
    }

    fn items(texts: &[&str]) -> Vec<Box<dyn Item>> {
        texts.iter().map(|t| parse_item(t).unwrap()).collect()
    }

    #[test]
    fn test_int_vector_mixed_sign() {
        let v = build(KeyKind::Int, &items(&["3", "18446744073709551615u", "-1", "3u", "NULL"]));
        assert_eq!(v.len(), 3);
        assert_eq!(v.source_len(), 5);
        assert!(v.has_null());

        let mut ctx = EvalContext::new();
        assert_eq!(v.contains(&Literal::int(-1), &mut ctx), ListMatch::Found);
        assert_eq!(v.contains(&Literal::uint(3), &mut ctx), ListMatch::Found);
        assert_eq!(v.contains(&Literal::int(4), &mut ctx), ListMatch::NotFound);
        assert_eq!(
            v.contains(&Literal::uint(u64::MAX), &mut ctx),
            ListMatch::Found
        );
        assert_eq!(v.contains(&Literal::null(), &mut ctx), ListMatch::Unknown);
    }

    #[test]
    fn test_empty_vector() {
        let v = build(KeyKind::Int, &items(&["NULL"]));
        let mut ctx = EvalContext::new();
        assert!(v.is_empty());
        assert_eq!(v.contains(&Literal::int(1), &mut ctx), ListMatch::NotFound);
    }

    #[test]
    fn test_float_zero_and_nan() {
        let v = build(
            KeyKind::Float,
            &[
                Box::new(Literal::float(-0.0)) as Box<dyn Item>,
                Box::new(Literal::float(f64::NAN)),
                Box::new(Literal::float(2.5)),
            ],
        );
        assert_eq!(v.len(), 2);
        assert!(v.has_null());
        let mut ctx = EvalContext::new();
        assert_eq!(v.contains(&Literal::float(0.0), &mut ctx), ListMatch::Found);
        assert_eq!(
            v.contains(&Literal::float(f64::NAN), &mut ctx),
            ListMatch::Unknown
        );
    }

    #[test]
    fn test_collated_strings() {
        let ci = collation::lookup("ascii_general_ci").unwrap();
        let v = build(KeyKind::Str(Some(ci)), &items(&["'abc'", "'ABC '", "'xyz'"]));
        assert_eq!(v.len(), 2);
        let mut ctx = EvalContext::new();
        assert_eq!(v.contains(&Literal::string("Xyz"), &mut ctx), ListMatch::Found);

        let bin = build(KeyKind::Str(None), &items(&["'abc'", "'ABC'"]));
        assert_eq!(bin.len(), 2);
        assert_eq!(bin.contains(&Literal::string("aBc"), &mut ctx), ListMatch::NotFound);
    }

    #[test]
    fn test_rows() {
        let kind = KeyKind::Row(vec![KeyKind::Int, KeyKind::Str(None)]);
        let v = build(kind.clone(), &items(&["(1, 'a')", "(2, 'b')", "(1, 'a')"]));
        assert_eq!(v.len(), 2);
        let mut ctx = EvalContext::new();
        let probe = parse_item("(2, 'b')").unwrap();
        assert_eq!(v.contains(probe.as_ref(), &mut ctx), ListMatch::Found);
        let partial = parse_item("(2, NULL)").unwrap();
        assert_eq!(v.contains(partial.as_ref(), &mut ctx), ListMatch::Unknown);

        let with_null = items(&["(1, 'a')", "(NULL, 'b')"]);
        let refs: Vec<&dyn Item> = with_null.iter().map(|i| i.as_ref()).collect();
        assert!(InVector::build(kind, &refs, &mut ctx).unwrap().is_none());
    }

    #[test]
    fn test_same_as() {
        let ci = collation::lookup("ascii_general_ci").unwrap();
        assert!(KeyKind::Int.same_as(&KeyKind::Int));
        assert!(!KeyKind::Int.same_as(&KeyKind::Float));
        assert!(!KeyKind::Str(None).same_as(&KeyKind::Str(Some(ci.clone()))));
        assert!(KeyKind::Str(Some(ci.clone())).same_as(&KeyKind::Str(Some(ci))));
        assert!(!KeyKind::Row(vec![KeyKind::Int]).same_as(&KeyKind::Row(vec![])));
    }
}
