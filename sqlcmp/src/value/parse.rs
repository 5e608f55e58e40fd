// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Literal syntax for constant operands
//!
//! ```text
//! item     := base [COLLATE name]
//! base     := '(' item (',' item)* ')' | typed | NULL | string | number
//! typed    := (DATE | TIME | TIMESTAMP | DATETIME | DECIMAL) string
//! number   := [+-] digits ['.' digits] [e [+-] digits] [u | d]
//! string   := '\'' ( '\'\'' | any )* '\''
//! ```
//!
//! A `u` suffix makes an unsigned integer and `d` a decimal. Unsuffixed
//! integers widen from signed to unsigned to decimal as needed; a fraction
//! or exponent makes a float.

use super::{Item, Literal, RowItem, Temporal};
use crate::collation::{self, CollationSpec};
use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, digit0, digit1, multispace0, one_of, satisfy},
    combinator::{map, not, opt, recognize},
    error::ErrorKind,
    multi::separated_list1,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Literal syntax errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("Unexpected input after literal: '{0}'")]
    TrailingInput(String),

    #[error("Invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("Invalid {kind} literal '{text}'")]
    InvalidTemporal { kind: String, text: String },

    #[error("Unknown collation '{0}'")]
    UnknownCollation(String),

    #[error("COLLATE applies only to string literals")]
    CollateOnNonString,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TypedKind {
    Date,
    Time,
    Timestamp,
    Decimal,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Null,
    Number { text: String, suffix: Option<char> },
    Str(String),
    Typed(TypedKind, String),
    Row(Vec<Expr>),
    Collate(Box<Expr>, String),
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(word), not(satisfy(is_ident_char)))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(is_ident_char)(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    let (mut rest, _) = char('\'')(input)?;
    let mut text = String::new();
    loop {
        let Some(pos) = rest.find('\'') else {
            // Unterminated quote; no other branch can succeed either
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                ErrorKind::Char,
            )));
        };
        text.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];
        match rest.strip_prefix('\'') {
            Some(after) => {
                text.push('\'');
                rest = after;
            }
            None => return Ok((rest, text)),
        }
    }
}

fn number(input: &str) -> IResult<&str, Expr> {
    let (input, text) = recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;
    let (input, suffix) = opt(one_of("uUdD"))(input)?;
    let (input, _) = not(satisfy(is_ident_char))(input)?;
    Ok((
        input,
        Expr::Number {
            text: text.to_string(),
            suffix: suffix.map(|c| c.to_ascii_lowercase()),
        },
    ))
}

fn typed_literal(input: &str) -> IResult<&str, Expr> {
    let kind = alt((
        map(keyword("TIMESTAMP"), |_| TypedKind::Timestamp),
        map(keyword("DATETIME"), |_| TypedKind::Timestamp),
        map(keyword("DATE"), |_| TypedKind::Date),
        map(keyword("TIME"), |_| TypedKind::Time),
        map(keyword("DECIMAL"), |_| TypedKind::Decimal),
    ));
    map(
        pair(kind, preceded(multispace0, string_literal)),
        |(kind, text)| Expr::Typed(kind, text),
    )(input)
}

fn row(input: &str) -> IResult<&str, Expr> {
    map(
        delimited(
            terminated(char('('), multispace0),
            separated_list1(delimited(multispace0, char(','), multispace0), expr),
            preceded(multispace0, char(')')),
        ),
        |mut elements| {
            // A parenthesised single item is that item, not a row
            if elements.len() == 1 {
                elements.remove(0)
            } else {
                Expr::Row(elements)
            }
        },
    )(input)
}

fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, base) = preceded(
        multispace0,
        alt((
            row,
            typed_literal,
            map(keyword("NULL"), |_| Expr::Null),
            map(string_literal, Expr::Str),
            number,
        )),
    )(input)?;
    let (input, collation) = opt(preceded(
        delimited(multispace0, keyword("COLLATE"), multispace0),
        identifier,
    ))(input)?;
    Ok(match collation {
        Some(name) => (input, Expr::Collate(Box::new(base), name.to_string())),
        None => (input, base),
    })
}

/// Parse one literal operand into an expression node
pub fn parse_item(input: &str) -> Result<Box<dyn Item>, ParseError> {
    let ast = match expr(input) {
        Ok((rest, ast)) => {
            let rest = rest.trim();
            if !rest.is_empty() {
                return Err(ParseError::TrailingInput(rest.to_string()));
            }
            ast
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = input.len() - e.input.len();
            let message = if e.input.is_empty() {
                "unexpected end of input".to_string()
            } else if e.code == ErrorKind::Char && e.input.starts_with('\'') {
                "unterminated string literal".to_string()
            } else {
                format!("unexpected '{}'", e.input.chars().take(16).collect::<String>())
            };
            return Err(ParseError::Syntax { position, message });
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(ParseError::Syntax {
                position: input.len(),
                message: "unexpected end of input".to_string(),
            })
        }
    };
    build(ast)
}

fn build(ast: Expr) -> Result<Box<dyn Item>, ParseError> {
    match ast {
        Expr::Row(elements) => {
            let items = elements
                .into_iter()
                .map(build)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Box::new(RowItem::new(items)))
        }
        other => Ok(Box::new(build_literal(other)?)),
    }
}

fn build_literal(ast: Expr) -> Result<Literal, ParseError> {
    match ast {
        Expr::Null => Ok(Literal::null()),
        Expr::Str(text) => Ok(Literal::string(text)),
        Expr::Number { text, suffix } => build_number(&text, suffix),
        Expr::Typed(kind, text) => build_typed(kind, &text),
        Expr::Collate(base, name) => {
            let literal = build_literal(*base)?;
            if !matches!(literal.value(), super::Value::Str(_)) {
                return Err(ParseError::CollateOnNonString);
            }
            let collation =
                collation::lookup(&name).ok_or_else(|| ParseError::UnknownCollation(name))?;
            Ok(literal.with_collation(CollationSpec::explicit(collation)))
        }
        Expr::Row(_) => Err(ParseError::CollateOnNonString),
    }
}

fn build_number(text: &str, suffix: Option<char>) -> Result<Literal, ParseError> {
    let invalid = || ParseError::InvalidNumber(text.to_string());
    let unsigned_text = text.trim_start_matches('+');
    let is_integral = !text.contains(['.', 'e', 'E']);

    match suffix {
        Some('u') if is_integral => unsigned_text
            .parse::<u64>()
            .map(Literal::uint)
            .map_err(|_| invalid()),
        Some('u') => Err(invalid()),
        Some(_) => parse_decimal(text).map(Literal::decimal).ok_or_else(invalid),
        None if is_integral => {
            if let Ok(v) = text.parse::<i64>() {
                Ok(Literal::int(v))
            } else if let Ok(v) = unsigned_text.parse::<u64>() {
                Ok(Literal::uint(v))
            } else {
                parse_decimal(text).map(Literal::decimal).ok_or_else(invalid)
            }
        }
        None => text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Literal::float)
            .ok_or_else(invalid),
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim_start_matches('+');
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).ok()
    } else {
        Decimal::from_str(text).ok()
    }
}

fn build_typed(kind: TypedKind, text: &str) -> Result<Literal, ParseError> {
    let invalid = |name: &str| ParseError::InvalidTemporal {
        kind: name.to_string(),
        text: text.to_string(),
    };

    match kind {
        TypedKind::Decimal => parse_decimal(text.trim())
            .map(Literal::decimal)
            .ok_or_else(|| ParseError::InvalidNumber(text.to_string())),
        TypedKind::Date => match Temporal::parse(text) {
            Some(t @ Temporal::Date(_)) => Ok(Literal::temporal(t)),
            _ => Err(invalid("DATE")),
        },
        TypedKind::Time => match Temporal::parse(text) {
            Some(t @ Temporal::Time(_)) => Ok(Literal::temporal(t)),
            _ => Err(invalid("TIME")),
        },
        TypedKind::Timestamp => match Temporal::parse(text) {
            Some(t @ Temporal::DateTime(_)) => Ok(Literal::temporal(t)),
            Some(Temporal::Date(d)) => d
                .and_hms_opt(0, 0, 0)
                .map(|dt| Literal::temporal(Temporal::DateTime(dt)))
                .ok_or_else(|| invalid("TIMESTAMP")),
            _ => Err(invalid("TIMESTAMP")),
        },
    }
}
