// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! General LIKE matcher for `%`, `_` and an escape character

use crate::collation::{Collation, CollationRef};
use crate::compare::{reserve, CompareError};

/// One compiled pattern element
///
/// Literal units are bytes for single-byte collations and Unicode scalar
/// values for multi-byte ones, already folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Literal(u32),
    /// `_`
    AnyOne,
    /// `%`; consecutive ones are collapsed
    AnyMany,
}

/// Splits strings into comparable units under one collation
#[derive(Debug, Clone)]
pub(crate) enum Folding {
    Bytes,
    Table(Box<[u8; 256]>),
    Chars(CollationRef),
}

impl Folding {
    pub(crate) fn for_collation(collation: &CollationRef) -> Self {
        if collation.is_binary() {
            Folding::Bytes
        } else if let Some(table) = collation.sort_order() {
            Folding::Table(Box::new(*table))
        } else {
            Folding::Chars(collation.clone())
        }
    }

    pub(crate) fn units(&self, text: &[u8]) -> Result<Vec<u32>, CompareError> {
        let mut units = Vec::new();
        reserve(&mut units, text.len(), "pattern units")?;
        match self {
            Folding::Bytes => units.extend(text.iter().map(|b| *b as u32)),
            Folding::Table(table) => units.extend(text.iter().map(|b| table[*b as usize] as u32)),
            Folding::Chars(collation) => units.extend(
                String::from_utf8_lossy(text)
                    .chars()
                    .map(|c| fold(collation.as_ref(), c)),
            ),
        }
        Ok(units)
    }

    /// Units of the pattern itself, before folding, with the raw escape unit
    fn raw_units(&self, text: &[u8]) -> Vec<u32> {
        match self {
            Folding::Bytes | Folding::Table(_) => text.iter().map(|b| *b as u32).collect(),
            Folding::Chars(_) => String::from_utf8_lossy(text)
                .chars()
                .map(|c| c as u32)
                .collect(),
        }
    }

    /// The escape as one pattern unit; single-byte foldings take ASCII only
    pub(crate) fn escape_unit(&self, escape: char) -> Result<u32, CompareError> {
        match self {
            Folding::Chars(_) => Ok(escape as u32),
            _ if escape.is_ascii() => Ok(escape as u32),
            _ => Err(CompareError::IncorrectEscape(escape)),
        }
    }

    fn fold_unit(&self, unit: u32) -> u32 {
        match self {
            Folding::Bytes => unit,
            Folding::Table(table) => table[(unit & 0xff) as usize] as u32,
            Folding::Chars(collation) => match char::from_u32(unit) {
                Some(c) => fold(collation.as_ref(), c),
                None => unit,
            },
        }
    }
}

fn fold(collation: &dyn Collation, c: char) -> u32 {
    collation.fold_char(c) as u32
}

/// Compile pattern text into tokens
///
/// An escape character escapes the next unit; a trailing escape is a literal.
pub(crate) fn tokenize(
    pattern: &[u8],
    escape: char,
    folding: &Folding,
) -> Result<Vec<Token>, CompareError> {
    let escape = folding.escape_unit(escape)?;
    let raw = folding.raw_units(pattern);
    let mut tokens = Vec::new();
    reserve(&mut tokens, raw.len(), "pattern tokens")?;

    let mut units = raw.iter().copied();
    while let Some(unit) = units.next() {
        let token = if unit == escape {
            match units.next() {
                Some(escaped) => Token::Literal(folding.fold_unit(escaped)),
                None => Token::Literal(folding.fold_unit(unit)),
            }
        } else if unit == '%' as u32 {
            if tokens.last() == Some(&Token::AnyMany) {
                continue;
            }
            Token::AnyMany
        } else if unit == '_' as u32 {
            Token::AnyOne
        } else {
            Token::Literal(folding.fold_unit(unit))
        };
        tokens.push(token);
    }
    Ok(tokens)
}

/// Match folded subject units against tokens
///
/// Greedy with a single backtrack point at the most recent `%`, which is
/// sufficient because `%` matches any run of units.
pub(crate) fn wildcard_match(tokens: &[Token], subject: &[u32]) -> bool {
    let mut t = 0;
    let mut s = 0;
    let mut backtrack: Option<(usize, usize)> = None;

    while s < subject.len() {
        match tokens.get(t) {
            Some(Token::AnyMany) => {
                backtrack = Some((t, s));
                t += 1;
            }
            Some(Token::AnyOne) => {
                t += 1;
                s += 1;
            }
            Some(Token::Literal(unit)) if *unit == subject[s] => {
                t += 1;
                s += 1;
            }
            _ => match backtrack {
                Some((star, consumed)) => {
                    t = star + 1;
                    s = consumed + 1;
                    backtrack = Some((star, consumed + 1));
                }
                None => return false,
            },
        }
    }

    tokens[t..].iter().all(|token| *token == Token::AnyMany)
}
