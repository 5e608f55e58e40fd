//! Test utilities for SqlCmp integration tests
//!
//! - TestFixture: binds and evaluates predicates over literal text
//! - TestSuite: data-driven truth tables over a fixture
//! - Scope fixtures: JSON block trees under `tests/fixtures/scope`

#![allow(dead_code)]

pub mod test_fixture;
