//! Row comparison semantics

#[path = "testutils/mod.rs"]
mod testutils;

use sqlcmp::{
    parse_item, CompareError, CompareOptions, Comparator, ComparisonOp, EvalContext, Item, Literal,
    RowItem, SqlOrdering,
};
use testutils::test_fixture::{TestCase, TestFixture, TestSuite};

#[test]
fn test_row_scenarios() {
    let mut fixture = TestFixture::new();
    fixture.assert_compare("(1, 2)", "=", "(1, 2)", Some(true));
    assert_eq!(
        fixture.ordering_for(ComparisonOp::Eq, "(1, 2)", "(1, 2)"),
        SqlOrdering::Equal
    );

    // Only the NULL column could make them differ
    fixture.assert_compare("(1, NULL)", "<>", "(1, 2)", None);

    // The second column decides
    fixture.assert_compare("(1, 3)", "<", "(1, 2)", Some(false));
    assert_eq!(fixture.ordering("(1, 3)", "(1, 2)"), SqlOrdering::Greater);
}

#[test]
fn test_null_handling_by_operator() {
    let suite = TestSuite::new(
        "row nulls",
        vec![
            // `<>` scans past the NULL and finds a difference
            TestCase::new("(NULL, 1)", "<>", "(2, 0)", Some(true)),
            // Ordering operators stop at the NULL
            TestCase::new("(NULL, 1)", "<", "(2, 0)", None),
            TestCase::new("(1, NULL)", "<", "(2, 0)", Some(true)),
            TestCase::new("(1, NULL)", "<", "(1, 0)", None),
            // `=` keeps scanning unless it aborts on NULL
            TestCase::new("(NULL, 1)", "=", "(2, 0)", Some(false)),
            TestCase::new("(NULL, 1)", "=", "(2, 1)", None),
            TestCase::new("(NULL, 1)", "<=>", "(NULL, 1)", Some(true)),
            TestCase::new("(NULL, 1)", "<=>", "(2, 1)", Some(false)),
        ],
    );
    let mut fixture = TestFixture::new();
    let results = suite.run(&mut fixture);
    results.print_summary();
    assert_eq!(results.failed, 0, "{:?}", results.failures);
}

#[test]
fn test_abort_on_null_equality() {
    let left = parse_item("(NULL, 1)").unwrap();
    let right = parse_item("(2, 0)").unwrap();
    let options = CompareOptions {
        abort_on_null: true,
        ..CompareOptions::default()
    };
    let cmp = Comparator::bind(left.as_ref(), right.as_ref(), ComparisonOp::Eq, &options).unwrap();
    let mut ctx = EvalContext::new();
    assert_eq!(cmp.compare(&mut ctx), SqlOrdering::Unknown);
}

#[test]
fn test_nested_rows() {
    let mut fixture = TestFixture::new();
    fixture.assert_compare("(1, (2, 3))", "=", "(1, (2, 3))", Some(true));
    fixture.assert_compare("(1, (2, 3))", "<", "(1, (2, 4))", Some(true));
    fixture.assert_compare("(1, (2, NULL))", "<>", "(1, (2, 4))", None);
}

#[test]
fn test_whole_row_unknown() {
    let unknown = RowItem::with_unknown(vec![Box::new(Literal::int(1)), Box::new(Literal::int(2))]);
    let known = parse_item("(1, 2)").unwrap();
    let options = CompareOptions::default();
    let cmp = Comparator::bind(&unknown, known.as_ref(), ComparisonOp::Ne, &options).unwrap();
    let mut ctx = EvalContext::new();
    assert_eq!(cmp.compare(&mut ctx), SqlOrdering::Unknown);
    assert_eq!(unknown.cols(), 2);
}

#[test]
fn test_arity_mismatch() {
    let mut fixture = TestFixture::new();
    let message = fixture.compare_error("(1, 2)", "=", "(1, 2, 3)");
    assert_eq!(message, "Operand should contain 2 column(s), got 3");

    let nested_left = parse_item("(1, (2, 3))").unwrap();
    let nested_right = parse_item("(1, (2, 3, 4))").unwrap();
    let err = Comparator::bind(
        nested_left.as_ref(),
        nested_right.as_ref(),
        ComparisonOp::Eq,
        &CompareOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CompareError::OperandColumns { .. }));

    let scalar = parse_item("1").unwrap();
    assert!(Comparator::bind(
        scalar.as_ref(),
        nested_left.as_ref(),
        ComparisonOp::Eq,
        &CompareOptions::default()
    )
    .is_err());
}
