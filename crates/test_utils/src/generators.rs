//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating trees and inputs that
//! maintain (or deliberately break) the sum invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_allocation::{AllocationTree, Category, SubCategory};

/// Strategy for positive total amounts with up to two decimal places
pub fn total_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000_000i64).prop_map(|minor| Decimal::new(minor, 2))
}

/// Strategy for 1 to 6 two-decimal percentages that sum to exactly 100
pub fn percentages_summing_to_hundred() -> impl Strategy<Value = Vec<Decimal>> {
    proptest::collection::vec(0u32..=10_000u32, 0..5).prop_map(|mut cuts| {
        cuts.sort_unstable();
        let mut previous = 0u32;
        let mut parts: Vec<Decimal> = cuts
            .into_iter()
            .map(|cut| {
                let part = Decimal::new(i64::from(cut - previous), 2);
                previous = cut;
                part
            })
            .collect();
        parts.push(Decimal::new(i64::from(10_000 - previous), 2));
        parts
    })
}

/// Strategy for arbitrary text typed into a numeric field
pub fn raw_numeric_input_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,9}",
        "[0-9]{1,6}\\.[0-9]{1,4}",
        "[0-9 ,.%a-z₹-]{0,16}",
    ]
}

/// Strategy for valid trees: positive total, category percentages summing
/// to 100, and every category split into sub-categories summing to 100
pub fn valid_tree_strategy() -> impl Strategy<Value = AllocationTree> {
    (total_amount_strategy(), percentages_summing_to_hundred())
        .prop_flat_map(|(total, categories)| {
            let count = categories.len();
            (
                Just(total),
                Just(categories),
                proptest::collection::vec(percentages_summing_to_hundred(), count),
            )
        })
        .prop_map(|(total, categories, subs)| {
            let categories = categories
                .into_iter()
                .zip(subs)
                .enumerate()
                .map(|(i, (percentage, subs))| {
                    subs.into_iter().enumerate().fold(
                        Category::new(format!("c{}", i), format!("Category {}", i))
                            .with_percentage(percentage),
                        |category, (j, sub)| {
                            category.with_sub_category(SubCategory::new(
                                (j + 1).to_string(),
                                format!("Sub {}", j),
                                sub,
                            ))
                        },
                    )
                })
                .collect();
            AllocationTree::from_parts(total, categories)
        })
}
