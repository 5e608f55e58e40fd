// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Built-in collations

use super::Collation;
use once_cell::sync::Lazy;
use std::cmp::Ordering;

/// Case-folding weights for ASCII: lowercase letters weigh as uppercase
static ASCII_CI_SORT_ORDER: Lazy<[u8; 256]> = Lazy::new(|| {
    let mut table = [0u8; 256];
    for (byte, weight) in table.iter_mut().enumerate() {
        *weight = (byte as u8).to_ascii_uppercase();
    }
    table
});

/// Byte-wise comparison
#[derive(Debug, Default)]
pub struct BinaryCollation;

impl Collation for BinaryCollation {
    fn name(&self) -> &str {
        "binary"
    }

    fn is_binary(&self) -> bool {
        true
    }

    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
        // Slice order: common prefix first, then the shorter one is smaller
        left.cmp(right)
    }
}

/// Single-byte, ASCII case-insensitive, trailing-space insensitive
#[derive(Debug, Default)]
pub struct AsciiGeneralCi;

impl Collation for AsciiGeneralCi {
    fn name(&self) -> &str {
        "ascii_general_ci"
    }

    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
        let table = &*ASCII_CI_SORT_ORDER;
        let common = left.len().min(right.len());

        for (l, r) in left[..common].iter().zip(&right[..common]) {
            match table[*l as usize].cmp(&table[*r as usize]) {
                Ordering::Equal => {}
                other => return other,
            }
        }

        // The longer string is compared against implicit padding spaces
        let (rest, flipped) = if left.len() > common {
            (&left[common..], false)
        } else {
            (&right[common..], true)
        };
        for byte in rest {
            let ord = table[*byte as usize].cmp(&b' ');
            if ord != Ordering::Equal {
                return if flipped { ord.reverse() } else { ord };
            }
        }
        Ordering::Equal
    }

    fn sort_order(&self) -> Option<&[u8; 256]> {
        Some(&ASCII_CI_SORT_ORDER)
    }
}

/// Multi-byte UTF-8, case-insensitive by Unicode lowercase mapping
#[derive(Debug, Default)]
pub struct Utf8GeneralCi;

impl Collation for Utf8GeneralCi {
    fn name(&self) -> &str {
        "utf8_general_ci"
    }

    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
        let left = String::from_utf8_lossy(left);
        let right = String::from_utf8_lossy(right);
        let left = left.trim_end_matches(' ').chars().map(|c| self.fold_char(c));
        let right = right.trim_end_matches(' ').chars().map(|c| self.fold_char(c));
        left.cmp(right)
    }

    fn fold_char(&self, c: char) -> char {
        c.to_lowercase().next().unwrap_or(c)
    }
}
