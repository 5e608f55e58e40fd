//! Test fixture for SqlCmp integration tests
//!
//! Operands are written in the literal syntax accepted by `parse_item`, so
//! tests read like the predicates they check.

use sqlcmp::scope::{ScopeScript, ScriptReport};
use sqlcmp::{
    parse_item, BetweenPredicate, CompareOptions, Comparator, ComparisonOp, ComparisonPredicate,
    EngineConfig, EvalContext, InPredicate, Item, LikePredicate, ScopeOptions, SqlOrdering,
};
use std::path::PathBuf;
use std::time::Instant;

/// Predicate evaluation over parsed literals
pub struct TestFixture {
    config: EngineConfig,
    ctx: EvalContext,
}

impl TestFixture {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        init_logging();
        let ctx = EvalContext::from_config(&config);
        Self { config, ctx }
    }

    /// Fixture comparing floats with an explicit epsilon
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self::with_config(EngineConfig {
            float_epsilon: Some(epsilon),
            ..EngineConfig::default()
        })
    }

    pub fn options(&self) -> CompareOptions {
        self.config.compare_options()
    }

    pub fn context(&self) -> &EvalContext {
        &self.ctx
    }

    pub fn item(text: &str) -> Box<dyn Item> {
        parse_item(text).unwrap_or_else(|e| panic!("Failed to parse '{}': {}", text, e))
    }

    /// Three-way comparison as an owning `op` would see it
    pub fn ordering_for(&mut self, op: ComparisonOp, left: &str, right: &str) -> SqlOrdering {
        let (left, right) = (Self::item(left), Self::item(right));
        let options = self.options();
        let comparator = Comparator::bind(left.as_ref(), right.as_ref(), op, &options)
            .unwrap_or_else(|e| panic!("Failed to bind comparator: {}", e));
        comparator.compare(&mut self.ctx)
    }

    pub fn ordering(&mut self, left: &str, right: &str) -> SqlOrdering {
        self.ordering_for(ComparisonOp::Lt, left, right)
    }

    pub fn equal_null_safe(&mut self, left: &str, right: &str) -> bool {
        let (left, right) = (Self::item(left), Self::item(right));
        let options = self.options();
        Comparator::bind(left.as_ref(), right.as_ref(), ComparisonOp::NullSafeEq, &options)
            .unwrap_or_else(|e| panic!("Failed to bind comparator: {}", e))
            .equal_null_safe(&mut self.ctx)
    }

    pub fn compare(&mut self, left: &str, op: &str, right: &str) -> Option<bool> {
        let op: ComparisonOp = op
            .parse()
            .unwrap_or_else(|e| panic!("Bad operator '{}': {}", op, e));
        let (left, right) = (Self::item(left), Self::item(right));
        let options = self.options();
        ComparisonPredicate::bind(op, left.as_ref(), right.as_ref(), &options)
            .unwrap_or_else(|e| panic!("Failed to bind predicate: {}", e))
            .evaluate(&mut self.ctx)
    }

    /// Bind error message, for predicates expected to fail
    pub fn compare_error(&mut self, left: &str, op: &str, right: &str) -> String {
        let op: ComparisonOp = op
            .parse()
            .unwrap_or_else(|e| panic!("Bad operator '{}': {}", op, e));
        let (left, right) = (Self::item(left), Self::item(right));
        let options = self.options();
        match ComparisonPredicate::bind(op, left.as_ref(), right.as_ref(), &options) {
            Ok(_) => panic!("Expected binding to fail"),
            Err(e) => e.to_string(),
        }
    }

    pub fn between(&mut self, value: &str, low: &str, high: &str) -> Option<bool> {
        let (value, low, high) = (Self::item(value), Self::item(low), Self::item(high));
        let options = self.options();
        BetweenPredicate::bind(value.as_ref(), low.as_ref(), high.as_ref(), false, &options)
            .unwrap_or_else(|e| panic!("Failed to bind BETWEEN: {}", e))
            .evaluate(&mut self.ctx)
    }

    pub fn in_list(&mut self, probe: &str, items: &[&str], negated: bool) -> Option<bool> {
        let probe = Self::item(probe);
        let items: Vec<Box<dyn Item>> = items.iter().map(|t| Self::item(t)).collect();
        let refs: Vec<&dyn Item> = items.iter().map(|i| i.as_ref()).collect();
        let options = self.options();
        InPredicate::bind(probe.as_ref(), &refs, negated, &options, &mut self.ctx)
            .unwrap_or_else(|e| panic!("Failed to bind IN: {}", e))
            .evaluate(&mut self.ctx)
    }

    pub fn like(&mut self, subject: &str, pattern: &str) -> Option<bool> {
        let (subject, pattern) = (Self::item(subject), Self::item(pattern));
        LikePredicate::bind(subject.as_ref(), pattern.as_ref(), '\\', false, &mut self.ctx)
            .and_then(|p| p.evaluate(&mut self.ctx))
            .unwrap_or_else(|e| panic!("LIKE failed: {}", e))
    }

    /// Assert a predicate's truth value, `None` meaning unknown
    pub fn assert_compare(&mut self, left: &str, op: &str, right: &str, expected: Option<bool>) {
        let actual = self.compare(left, op, right);
        assert_eq!(
            actual, expected,
            "{} {} {} evaluated to {:?}, expected {:?}",
            left, op, right, actual, expected
        );
    }

    pub fn warning_count(&self) -> usize {
        self.ctx.diagnostics().total()
    }

    pub fn scope_options(&self) -> ScopeOptions {
        self.config.scope_options()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Route engine logs to the test harness; set RUST_LOG to see them
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Path of a scope fixture by file stem
pub fn scope_fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("scope")
        .join(format!("{}.json", name))
}

/// Load and run a scope fixture
pub fn run_scope_fixture(name: &str, options: ScopeOptions) -> ScriptReport {
    init_logging();
    let script = ScopeScript::from_path(scope_fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to load scope fixture '{}': {}", name, e));
    script
        .run(options)
        .unwrap_or_else(|e| panic!("Scope fixture '{}' is malformed: {}", name, e))
}

/// One row of a predicate truth table
#[derive(Debug, Clone)]
pub struct TestCase {
    pub left: String,
    pub op: String,
    pub right: String,
    pub expected: Option<bool>,
}

impl TestCase {
    pub fn new(left: &str, op: &str, right: &str, expected: Option<bool>) -> Self {
        Self {
            left: left.to_string(),
            op: op.to_string(),
            right: right.to_string(),
            expected,
        }
    }
}

/// Test suite results
#[derive(Debug)]
pub struct TestSuiteResults {
    pub suite_name: String,
    pub passed: usize,
    pub failed: usize,
    pub failures: Vec<String>,
}

impl TestSuiteResults {
    pub fn print_summary(&self) {
        println!("\n=== Test Suite: {} ===", self.suite_name);
        println!(
            "Passed: {}, Failed: {}, Total: {}",
            self.passed,
            self.failed,
            self.passed + self.failed
        );
        for failure in &self.failures {
            println!("  FAILED: {}", failure);
        }
    }
}

/// A named truth table run against one fixture
#[derive(Debug)]
pub struct TestSuite {
    pub name: String,
    pub test_cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: &str, test_cases: Vec<TestCase>) -> Self {
        Self {
            name: name.to_string(),
            test_cases,
        }
    }

    pub fn run(&self, fixture: &mut TestFixture) -> TestSuiteResults {
        let start = Instant::now();
        let mut results = TestSuiteResults {
            suite_name: self.name.clone(),
            passed: 0,
            failed: 0,
            failures: Vec::new(),
        };

        for case in &self.test_cases {
            let actual = fixture.compare(&case.left, &case.op, &case.right);
            if actual == case.expected {
                results.passed += 1;
            } else {
                results.failed += 1;
                results.failures.push(format!(
                    "{} {} {}: got {:?}, expected {:?}",
                    case.left, case.op, case.right, actual, case.expected
                ));
            }
        }

        log::debug!("Suite {} ran in {:?}", self.name, start.elapsed());
        results
    }
}
