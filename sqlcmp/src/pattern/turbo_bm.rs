// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Turbo Boyer-Moore substring search
//!
//! Both shift tables depend only on the (folded) pattern, so one instance
//! serves any number of subjects. The turbo shift remembers how much of the
//! pattern matched in the previous window and skips re-comparing that part.

use crate::compare::{reserve, CompareError};

const ALPHABET: usize = 256;

/// Precomputed Turbo Boyer-Moore tables for one pattern and fold table
#[derive(Debug, Clone)]
pub struct TurboBoyerMoore {
    pattern: Vec<u8>,
    /// Good-suffix shift per pattern position
    good_suffix: Vec<isize>,
    /// Bad-character shift per byte value
    bad_char: Vec<isize>,
    fold: Option<Box<[u8; ALPHABET]>>,
}

impl TurboBoyerMoore {
    /// Build the tables; with `fold`, pattern and subject bytes are mapped
    /// through the table before comparison
    pub fn new(pattern: &[u8], fold: Option<&[u8; ALPHABET]>) -> Result<Self, CompareError> {
        let mut folded = Vec::new();
        reserve(&mut folded, pattern.len(), "pattern")?;
        match fold {
            Some(table) => folded.extend(pattern.iter().map(|b| table[*b as usize])),
            None => folded.extend_from_slice(pattern),
        }

        let good_suffix = good_suffix_shifts(&folded)?;
        let bad_char = bad_char_shifts(&folded)?;

        Ok(Self {
            pattern: folded,
            good_suffix,
            bad_char,
            fold: fold.map(|t| Box::new(*t)),
        })
    }

    /// The pattern after folding
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn good_suffix_table(&self) -> &[isize] {
        &self.good_suffix
    }

    pub fn bad_char_table(&self) -> &[isize] {
        &self.bad_char
    }

    pub fn matches(&self, subject: &[u8]) -> bool {
        self.find(subject).is_some()
    }

    /// Offset of the first occurrence of the pattern in `subject`
    pub fn find(&self, subject: &[u8]) -> Option<usize> {
        let m = self.pattern.len() as isize;
        let n = subject.len() as isize;
        if m == 0 {
            return Some(0);
        }
        if m > n {
            return None;
        }

        let fold = |b: u8| match &self.fold {
            Some(table) => table[b as usize],
            None => b,
        };
        let x = &self.pattern;
        let last = m - 1;

        let mut j: isize = 0;
        let mut u: isize = 0;
        let mut shift: isize = m;

        while j <= n - m {
            let mut i = last;
            while i >= 0 && x[i as usize] == fold(subject[(i + j) as usize]) {
                i -= 1;
                if u != 0 && i == last - shift {
                    // Skip the part that matched in the previous window
                    i -= u;
                }
            }
            if i < 0 {
                return Some(j as usize);
            }

            let v = last - i;
            let turbo_shift = u - v;
            let bc_shift = self.bad_char[fold(subject[(i + j) as usize]) as usize] - m + 1 + i;
            let gs_shift = self.good_suffix[i as usize];

            shift = turbo_shift.max(bc_shift).max(gs_shift);
            if shift == gs_shift {
                u = (m - shift).min(v);
            } else {
                if turbo_shift < bc_shift {
                    shift = shift.max(u + 1);
                }
                u = 0;
            }
            j += shift;
        }
        None
    }
}

/// `suff[i]`: length of the longest suffix of `x[..=i]` that is also a suffix of `x`
fn suffixes(x: &[u8]) -> Result<Vec<isize>, CompareError> {
    let m = x.len() as isize;
    let mut suff = Vec::new();
    reserve(&mut suff, x.len(), "pattern suffix table")?;
    suff.resize(x.len(), 0);

    suff[(m - 1) as usize] = m;
    let mut g = m - 1;
    let mut f = m - 1;
    for i in (0..m - 1).rev() {
        if i > g && suff[(i + m - 1 - f) as usize] < i - g {
            suff[i as usize] = suff[(i + m - 1 - f) as usize];
        } else {
            if i < g {
                g = i;
            }
            f = i;
            while g >= 0 && x[g as usize] == x[(g + m - 1 - f) as usize] {
                g -= 1;
            }
            suff[i as usize] = f - g;
        }
    }
    Ok(suff)
}

fn good_suffix_shifts(x: &[u8]) -> Result<Vec<isize>, CompareError> {
    let m = x.len() as isize;
    let mut gs = Vec::new();
    reserve(&mut gs, x.len(), "good-suffix table")?;
    gs.resize(x.len(), m);
    if m == 0 {
        return Ok(gs);
    }

    let suff = suffixes(x)?;

    // Shifts aligning a pattern prefix with a matched suffix
    let mut j: isize = 0;
    for i in (-1..m).rev() {
        if i == -1 || suff[i as usize] == i + 1 {
            while j < m - 1 - i {
                if gs[j as usize] == m {
                    gs[j as usize] = m - 1 - i;
                }
                j += 1;
            }
        }
    }

    // Shifts to the previous occurrence of a matched suffix
    for i in 0..m - 1 {
        gs[(m - 1 - suff[i as usize]) as usize] = m - 1 - i;
    }
    Ok(gs)
}

fn bad_char_shifts(x: &[u8]) -> Result<Vec<isize>, CompareError> {
    let m = x.len() as isize;
    let mut bc = Vec::new();
    reserve(&mut bc, ALPHABET, "bad-character table")?;
    bc.resize(ALPHABET, m);
    for (i, byte) in x.iter().enumerate().take(x.len().saturating_sub(1)) {
        bc[*byte as usize] = m - 1 - i as isize;
    }
    Ok(bc)
}
