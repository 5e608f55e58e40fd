// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! `subject [NOT] LIKE pattern [ESCAPE c]`

use super::turbo_bm::TurboBoyerMoore;
use super::wildcard::{tokenize, wildcard_match, Folding, Token};
use crate::collation::CollationRef;
use crate::compare::CompareError;
use crate::context::EvalContext;
use crate::value::Item;

/// Default escape character
pub const DEFAULT_ESCAPE: char = '\\';

#[derive(Debug, Clone)]
enum Matcher {
    /// `%literal%` under a single-byte collation
    Substring(TurboBoyerMoore),
    Wildcard { tokens: Vec<Token>, folding: Folding },
}

/// A LIKE pattern compiled for one collation
///
/// Compile once per distinct (pattern, collation) pair and reuse it for
/// every subject.
#[derive(Debug, Clone)]
pub struct LikePattern {
    matcher: Matcher,
    collation: CollationRef,
}

impl LikePattern {
    pub fn compile(
        pattern: &[u8],
        escape: char,
        collation: CollationRef,
    ) -> Result<Self, CompareError> {
        let folding = Folding::for_collation(&collation);
        let tokens = tokenize(pattern, escape, &folding)?;

        let matcher = match substring_literal(&tokens) {
            Some(literal) if !collation.is_multibyte() => {
                // Folding is idempotent, so the folded literal passes through unchanged
                let tbm = TurboBoyerMoore::new(&literal, collation.sort_order())?;
                log::trace!(
                    "LIKE: substring search for {} bytes under {}",
                    literal.len(),
                    collation.name()
                );
                Matcher::Substring(tbm)
            }
            _ => Matcher::Wildcard { tokens, folding },
        };

        Ok(Self { matcher, collation })
    }

    pub fn collation(&self) -> &CollationRef {
        &self.collation
    }

    /// True when matching runs the Turbo Boyer-Moore substring search
    pub fn uses_turbo_boyer_moore(&self) -> bool {
        matches!(self.matcher, Matcher::Substring(_))
    }

    pub fn matches(&self, subject: &[u8]) -> Result<bool, CompareError> {
        match &self.matcher {
            Matcher::Substring(tbm) => Ok(tbm.matches(subject)),
            Matcher::Wildcard { tokens, folding } => {
                Ok(wildcard_match(tokens, &folding.units(subject)?))
            }
        }
    }
}

/// The literal of a `%literal%` pattern, as bytes
fn substring_literal(tokens: &[Token]) -> Option<Vec<u8>> {
    let inner = match tokens {
        [Token::AnyMany, inner @ .., Token::AnyMany] if !inner.is_empty() => inner,
        _ => return None,
    };
    inner
        .iter()
        .map(|token| match token {
            Token::Literal(unit) => u8::try_from(*unit).ok(),
            _ => None,
        })
        .collect()
}

/// LIKE predicate over two expression nodes
///
/// A constant pattern is compiled when the predicate is bound; otherwise the
/// pattern is compiled for each evaluation.
#[derive(Debug)]
pub struct LikePredicate<'a> {
    subject: &'a dyn Item,
    pattern: &'a dyn Item,
    escape: char,
    collation: CollationRef,
    compiled: Option<LikePattern>,
    negated: bool,
}

impl<'a> LikePredicate<'a> {
    pub fn bind(
        subject: &'a dyn Item,
        pattern: &'a dyn Item,
        escape: char,
        negated: bool,
        ctx: &mut EvalContext,
    ) -> Result<Self, CompareError> {
        let collation = subject
            .collation()
            .aggregate(&pattern.collation(), "like")?
            .collation;
        Folding::for_collation(&collation).escape_unit(escape)?;

        let compiled = if pattern.is_constant() {
            let text = pattern.val_str(ctx);
            if text.is_unknown() {
                None
            } else {
                Some(LikePattern::compile(&text.value, escape, collation.clone())?)
            }
        } else {
            None
        };

        Ok(Self {
            subject,
            pattern,
            escape,
            collation,
            compiled,
            negated,
        })
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn pattern(&self) -> Option<&LikePattern> {
        self.compiled.as_ref()
    }

    /// SQL truth value; `Ok(None)` is unknown
    pub fn evaluate(&self, ctx: &mut EvalContext) -> Result<Option<bool>, CompareError> {
        let subject = self.subject.val_str(ctx);
        if subject.is_unknown() {
            return Ok(None);
        }

        let matched = match &self.compiled {
            Some(pattern) => pattern.matches(&subject.value)?,
            None => {
                let text = self.pattern.val_str(ctx);
                if text.is_unknown() {
                    return Ok(None);
                }
                LikePattern::compile(&text.value, self.escape, self.collation.clone())?
                    .matches(&subject.value)?
            }
        };

        Ok(Some(matched != self.negated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation;
    use crate::value::{parse_item, Literal};

    fn compile(pattern: &str, collation: &str) -> LikePattern {
        let collation = collation::lookup(collation).unwrap();
        LikePattern::compile(pattern.as_bytes(), DEFAULT_ESCAPE, collation).unwrap()
    }

    fn like(subject: &str, pattern: &str, negated: bool) -> Option<bool> {
        let subject = parse_item(subject).unwrap();
        let pattern = parse_item(pattern).unwrap();
        let mut ctx = EvalContext::new();
        LikePredicate::bind(subject.as_ref(), pattern.as_ref(), DEFAULT_ESCAPE, negated, &mut ctx)
            .unwrap()
            .evaluate(&mut ctx)
            .unwrap()
    }

    #[test]
    fn test_substring_patterns_use_turbo_boyer_moore() {
        assert!(compile("%needle%", "binary").uses_turbo_boyer_moore());
        assert!(compile("%%needle%%", "ascii_general_ci").uses_turbo_boyer_moore());
        assert!(!compile("%needle%", "utf8_general_ci").uses_turbo_boyer_moore());
        assert!(!compile("%ne_dle%", "binary").uses_turbo_boyer_moore());
        assert!(!compile("needle%", "binary").uses_turbo_boyer_moore());
        assert!(!compile("%", "binary").uses_turbo_boyer_moore());
        // An escaped wildcard is part of the literal
        assert!(compile("%50\\%%", "binary").uses_turbo_boyer_moore());
    }

    #[test]
    fn test_substring_matching() {
        let pattern = compile("%needle%", "binary");
        assert!(pattern.matches(b"haystack with a needle inside").unwrap());
        assert!(!pattern.matches(b"haystack with a NEEDLE inside").unwrap());
        assert!(!pattern.matches(b"needl").unwrap());

        let pattern = compile("%needle%", "ascii_general_ci");
        assert!(pattern.matches(b"haystack with a NEEDLE inside").unwrap());

        let pattern = compile("%50\\%%", "binary");
        assert!(pattern.matches(b"up to 50% off").unwrap());
        assert!(!pattern.matches(b"up to 500 off").unwrap());
    }

    #[test]
    fn test_wildcard_matching() {
        let pattern = compile("a_c%", "binary");
        assert!(pattern.matches(b"abcdef").unwrap());
        assert!(!pattern.matches(b"acdef").unwrap());

        let pattern = compile("%ÜBER%", "utf8_general_ci");
        assert!(pattern.matches("so über alles".as_bytes()).unwrap());
    }

    #[test]
    fn test_predicate_truth() {
        assert_eq!(like("'hello world'", "'%o w%'", false), Some(true));
        assert_eq!(like("'hello world'", "'%o w%'", true), Some(false));
        assert_eq!(like("'hello'", "'h_llo'", false), Some(true));
        assert_eq!(like("'hello'", "'H%'", false), Some(false));
        assert_eq!(like("'hello'", "'H%' COLLATE ascii_general_ci", false), Some(true));
    }

    #[test]
    fn test_unknown_propagation() {
        assert_eq!(like("NULL", "'%'", false), None);
        assert_eq!(like("NULL", "'%'", true), None);
        assert_eq!(like("'abc'", "NULL", false), None);
    }

    #[test]
    fn test_numbers_match_their_text() {
        assert_eq!(like("12345", "'%234%'", false), Some(true));
    }

    #[test]
    fn test_illegal_collation_mix() {
        let subject = parse_item("'a' COLLATE ascii_general_ci").unwrap();
        let pattern = parse_item("'a' COLLATE utf8_general_ci").unwrap();
        let mut ctx = EvalContext::new();
        let err =
            LikePredicate::bind(subject.as_ref(), pattern.as_ref(), '\\', false, &mut ctx)
                .unwrap_err();
        assert!(matches!(err, CompareError::IllegalCollationMix { .. }));
    }

    #[test]
    fn test_escape_must_fit_the_collation() {
        let mut ctx = EvalContext::new();
        let subject = parse_item("'50%'").unwrap();
        let null_pattern = Literal::null();
        let err = LikePredicate::bind(subject.as_ref(), &null_pattern, 'é', false, &mut ctx)
            .unwrap_err();
        assert_eq!(err, CompareError::IncorrectEscape('é'));

        let utf8 = collation::lookup("utf8_general_ci").unwrap();
        let pattern = LikePattern::compile("50é%".as_bytes(), 'é', utf8).unwrap();
        assert!(pattern.matches(b"50%").unwrap());
        assert!(!pattern.matches(b"500").unwrap());
    }
}
