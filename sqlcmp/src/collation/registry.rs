// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Collation lookup by name

use super::builtin::{AsciiGeneralCi, BinaryCollation, Utf8GeneralCi};
use super::CollationRef;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

static BINARY: Lazy<CollationRef> = Lazy::new(|| Arc::new(BinaryCollation));

static DEFAULT_REGISTRY: Lazy<CollationRegistry> = Lazy::new(CollationRegistry::new);

/// Name-keyed set of collations
#[derive(Debug, Clone)]
pub struct CollationRegistry {
    collations: HashMap<String, CollationRef>,
}

impl CollationRegistry {
    /// Create a registry holding the built-in collations
    pub fn new() -> Self {
        let mut registry = Self {
            collations: HashMap::new(),
        };
        registry.register(BINARY.clone());
        registry.register(Arc::new(AsciiGeneralCi));
        registry.register(Arc::new(Utf8GeneralCi));
        registry
    }

    /// Add or replace a collation under its own name
    pub fn register(&mut self, collation: CollationRef) {
        self.collations
            .insert(collation.name().to_ascii_lowercase(), collation);
    }

    pub fn lookup(&self, name: &str) -> Option<CollationRef> {
        self.collations.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.collations.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for CollationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up a built-in collation
pub fn lookup(name: &str) -> Option<CollationRef> {
    DEFAULT_REGISTRY.lookup(name)
}

/// The binary collation
pub fn binary() -> CollationRef {
    BINARY.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation::Collation;
    use std::cmp::Ordering;

    #[derive(Debug)]
    struct ReverseCollation;

    impl Collation for ReverseCollation {
        fn name(&self) -> &str {
            "reverse_bin"
        }

        fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
            right.cmp(left)
        }
    }

    #[test]
    fn test_builtins() {
        let registry = CollationRegistry::new();
        assert_eq!(
            registry.names(),
            vec!["ascii_general_ci", "binary", "utf8_general_ci"]
        );
        assert!(lookup("BINARY").unwrap().is_binary());
        assert!(lookup("latin7_estonian_cs").is_none());
    }

    #[test]
    fn test_register_custom() {
        let mut registry = CollationRegistry::new();
        registry.register(Arc::new(ReverseCollation));
        let c = registry.lookup("Reverse_Bin").unwrap();
        assert_eq!(c.compare(b"a", b"b"), Ordering::Greater);
        assert!(c.is_multibyte());
    }
}
