//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for allocation types that give
//! more meaningful error messages than standard assertions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_allocation::{ChartSeries, DerivedTree, ValidationResult};

/// Tolerance used when comparing derived amounts
pub const AMOUNT_TOLERANCE: Decimal = dec!(0.0001);

/// Asserts that two decimals are approximately equal within a tolerance
///
/// # Arguments
///
/// * `actual` - The actual value
/// * `expected` - The expected value
/// * `tolerance` - The allowed difference
///
/// # Panics
///
/// Panics if the values differ by more than tolerance
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Values differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a validation passed
pub fn assert_valid(result: &ValidationResult) {
    assert!(
        result.is_valid(),
        "Expected a valid tree, got message {:?}",
        result.message()
    );
}

/// Asserts that a validation failed with exactly `expected` as its message
pub fn assert_validation_message(result: &ValidationResult, expected: &str) {
    assert_eq!(
        result.message().as_deref(),
        Some(expected),
        "Unexpected validation message"
    );
}

/// Asserts that category amounts add up to the total, and that every split
/// category's sub-category amounts add up to the category amount
pub fn assert_amounts_balance(derived: &DerivedTree) {
    assert_decimal_approx_eq(derived.allocated_total(), derived.total_amount, AMOUNT_TOLERANCE);

    for category in derived.categories.iter().filter(|c| !c.sub_categories.is_empty()) {
        let diff = (category.sub_category_total() - category.amount).abs();
        assert!(
            diff <= AMOUNT_TOLERANCE,
            "Sub-categories of {} allocate {} of {}",
            category.name,
            category.sub_category_total(),
            category.amount
        );
    }
}

/// Asserts that a series is the sample fallback
pub fn assert_sample_series(series: &ChartSeries) {
    assert!(series.is_sample, "Expected sample series, got real data");
    assert!(
        series.records.iter().all(|r| r.is_sample),
        "Sample series contains a record not tagged as sample"
    );
}

/// Asserts that a series holds real data with the given names in order
pub fn assert_real_series(series: &ChartSeries, names: &[&str]) {
    assert!(!series.is_sample, "Expected real data, got sample series");
    let actual: Vec<&str> = series.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(actual, names, "Unexpected series records");
}
