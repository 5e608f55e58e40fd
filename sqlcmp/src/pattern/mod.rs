// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! LIKE pattern matching
//!
//! `%literal%` patterns under single-byte collations run a Turbo Boyer-Moore
//! substring search; everything else goes through the general wildcard
//! matcher.

mod like;
mod turbo_bm;
mod wildcard;

pub use like::{LikePattern, LikePredicate, DEFAULT_ESCAPE};
pub use turbo_bm::TurboBoyerMoore;
pub use wildcard::Token;
