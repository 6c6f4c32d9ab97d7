//! Comprehensive tests for domain_allocation

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{CategoryId, CoreError, SubCategoryId};
use domain_allocation::{
    validate, AllocationEngine, AllocationError, AllocationTree, Category, ChartDataAdapter,
    Recomputer, SubCategory, ValidationIssue, MUTUAL_FUNDS_ID, STOCKS_ID,
};
use test_utils::{
    assert_amounts_balance, assert_sample_series, assert_valid, assert_validation_message,
    percentages_summing_to_hundred, raw_numeric_input_strategy, valid_tree_strategy,
    InputFixtures, TestTreeBuilder, TreeFixtures,
};

fn mutual_funds() -> CategoryId {
    CategoryId::from(MUTUAL_FUNDS_ID)
}

fn stocks() -> CategoryId {
    CategoryId::from(STOCKS_ID)
}

/// Builds the reference scenario through the editing API
fn reference_tree() -> AllocationTree {
    let mut tree = AllocationTree::new();
    tree.set_total_amount("1000000");
    tree.set_category_percentage(&mutual_funds(), "60").unwrap();
    tree.set_category_percentage(&stocks(), "40").unwrap();

    for (name, percentage) in [("Large Cap", "40"), ("Mid Cap", "35"), ("Small Cap", "25")] {
        let id = tree.add_sub_category(&mutual_funds()).unwrap();
        tree.rename_sub_category(&mutual_funds(), &id, name).unwrap();
        tree.set_sub_category_percentage(&mutual_funds(), &id, percentage).unwrap();
    }
    tree
}

// ============================================================================
// Scenario Tests
// ============================================================================

mod scenario_tests {
    use super::*;

    #[test]
    fn test_reference_scenario_amounts() {
        let derived = AllocationEngine::new().derive(&reference_tree()).unwrap();

        let mf = derived.category(&mutual_funds()).unwrap();
        assert_eq!(mf.amount, dec!(600000));
        assert_eq!(mf.sub_categories[0].name, "Large Cap");
        assert_eq!(mf.sub_categories[0].amount, dec!(240000));
    }

    #[test]
    fn test_categories_summing_to_99_fall_back_to_sample() {
        let mut tree = reference_tree();
        tree.set_category_percentage(&stocks(), "39").unwrap();

        let validation = validate(&tree);
        assert_eq!(
            validation.message().as_deref(),
            Some("Main category percentages must sum to 100%.")
        );

        let derived = AllocationEngine::new().derive(&tree).ok();
        assert!(derived.is_none());

        let series = ChartDataAdapter::new().main_series(derived.as_ref());
        assert!(series.is_sample);
    }

    #[test]
    fn test_removing_sub_category_breaks_sub_sum() {
        let mut tree = reference_tree();
        let last = tree.category(&mutual_funds()).unwrap().sub_categories[2].id.clone();
        tree.remove_sub_category(&mutual_funds(), &last).unwrap();

        let validation = validate(&tree);
        assert!(matches!(
            validation.issue,
            Some(ValidationIssue::SubCategorySum { ref category_name, total, .. })
                if category_name == "Mutual Funds" && total == dec!(75)
        ));
    }

    #[test]
    fn test_percentage_input_is_sanitized() {
        let mut tree = reference_tree();
        tree.set_category_percentage(&mutual_funds(), "60%").unwrap();
        tree.set_category_percentage(&stocks(), "4a0").unwrap();

        assert_eq!(tree.category(&mutual_funds()).unwrap().percentage.as_str(), "60");
        assert_eq!(tree.category(&stocks()).unwrap().percentage.as_str(), "40");
        assert!(validate(&tree).is_valid());
    }

    #[test]
    fn test_unknown_sub_category_is_reported() {
        let mut tree = reference_tree();
        let result = tree.set_sub_category_percentage(&stocks(), &SubCategoryId::from("missing"), "10");
        assert!(matches!(result, Err(AllocationError::SubCategoryNotFound { .. })));
    }
}

// ============================================================================
// Validation Precedence Tests
// ============================================================================

mod precedence_tests {
    use super::*;

    #[test]
    fn test_total_checked_before_everything() {
        let mut tree = reference_tree();
        tree.set_total_amount("");
        tree.set_category_percentage(&stocks(), "1").unwrap();

        assert_eq!(validate(&tree).issue, Some(ValidationIssue::InvalidTotalAmount));
    }

    #[test]
    fn test_later_category_overwrites_earlier_sub_issue() {
        let tree = AllocationTree::from_parts(
            "500",
            vec![
                Category::fixed(MUTUAL_FUNDS_ID, "Mutual Funds")
                    .with_percentage("50")
                    .with_sub_category(SubCategory::new("1", "Large Cap", "50")),
                Category::fixed(STOCKS_ID, "Stocks")
                    .with_percentage("50")
                    .with_sub_category(SubCategory::new("1", "Banking", "20")),
            ],
        );

        assert_eq!(
            validate(&tree).message().as_deref(),
            Some("Sub-categories under Stocks must sum to 100%.")
        );
    }

    #[test]
    fn test_user_category_sub_issue_reported_by_name() {
        let tree = TestTreeBuilder::with_defaults()
            .total("250000")
            .percentage(MUTUAL_FUNDS_ID, "60")
            .percentage(STOCKS_ID, "30")
            .category("bonds", "Bonds", "10")
            .sub("bonds", "Government", "70")
            .sub("bonds", "Corporate", "20")
            .build();

        assert_validation_message(&validate(&tree), "Sub-categories under Bonds must sum to 100%.");
    }

    #[test]
    fn test_validation_is_idempotent() {
        let tree = reference_tree();
        assert_eq!(validate(&tree), validate(&tree));
    }
}

// ============================================================================
// Fixture Tests
// ============================================================================

mod fixture_tests {
    use super::*;

    #[test]
    fn test_editing_api_builds_the_reference_fixture() {
        let built = reference_tree();
        let fixture = TreeFixtures::reference();

        assert_eq!(validate(&built), validate(&fixture));

        // Sub-category keys differ; names and amounts must not
        let amounts = |tree: &AllocationTree| -> Vec<(String, Decimal)> {
            let derived = AllocationEngine::new().derive(tree).unwrap();
            derived
                .categories
                .iter()
                .flat_map(|c| c.sub_categories.iter().map(|s| (s.name.clone(), s.amount)))
                .collect()
        };
        assert_eq!(amounts(&built), amounts(&fixture));
    }

    #[test]
    fn test_fully_split_tree_balances() {
        let tree = TreeFixtures::fully_split();
        assert_valid(&validate(&tree));

        let derived = AllocationEngine::new().derive(&tree).unwrap();
        assert_amounts_balance(&derived);
        assert_eq!(derived.categories[1].sub_categories[1].amount, dec!(140000));
    }

    #[test]
    fn test_broken_fixtures_report_their_issue() {
        assert_validation_message(
            &validate(&TreeFixtures::main_sum_off()),
            "Main category percentages must sum to 100%.",
        );
        assert_validation_message(
            &validate(&TreeFixtures::sub_sum_off()),
            "Sub-categories under Mutual Funds must sum to 100%.",
        );
        assert_validation_message(
            &validate(&TreeFixtures::without_total()),
            "Please enter a valid total investment amount.",
        );
    }

    #[test]
    fn test_total_input_is_sanitized() {
        for (raw, sanitized) in InputFixtures::sanitizing_pairs() {
            let mut tree = TreeFixtures::reference();
            tree.set_total_amount(raw);
            assert_eq!(tree.total_amount.as_str(), *sanitized, "input {:?}", raw);
        }
    }

    #[test]
    fn test_unusable_totals_are_rejected() {
        for raw in InputFixtures::unusable_amounts() {
            let mut tree = TreeFixtures::reference();
            tree.set_total_amount(raw);
            assert_eq!(
                validate(&tree).issue,
                Some(ValidationIssue::InvalidTotalAmount),
                "input {:?}",
                raw
            );
        }
    }
}

// ============================================================================
// Range Tests
// ============================================================================

mod range_tests {
    use super::*;

    const LARGEST_TOTAL: &str = "79228162514264337593543950335";

    #[test]
    fn test_full_share_of_huge_total_is_exact() {
        let tree = TestTreeBuilder::new()
            .total("9999999999999999999999999999")
            .fixed_category(MUTUAL_FUNDS_ID, "Mutual Funds", "100")
            .fixed_category(STOCKS_ID, "Stocks", "0")
            .build();

        let derived = AllocationEngine::new().derive(&tree).unwrap();
        assert_eq!(derived.categories[0].amount, dec!(9999999999999999999999999999));
        assert_eq!(derived.categories[1].amount, Decimal::ZERO);
    }

    #[test]
    fn test_share_above_full_of_largest_total_is_an_error() {
        let tree = TestTreeBuilder::with_defaults()
            .total(LARGEST_TOTAL)
            .percentage(MUTUAL_FUNDS_ID, "150")
            .percentage(STOCKS_ID, "-50")
            .build();
        assert_valid(&validate(&tree));

        let result = AllocationEngine::new().derive(&tree);
        assert!(matches!(result, Err(AllocationError::Core(CoreError::Overflow(_)))));
    }

    #[test]
    fn test_out_of_range_tree_is_committed_as_invalid_total() {
        let mut recomputer = Recomputer::new();
        assert!(recomputer.refresh(&reference_tree()).derived.is_some());

        let mut tree = reference_tree();
        tree.total_amount = LARGEST_TOTAL.into();
        tree.categories[0].percentage = "150".into();
        tree.categories[1].percentage = "-50".into();

        let outcome = recomputer.refresh(&tree).clone();
        assert_eq!(outcome.validation.issue, Some(ValidationIssue::InvalidTotalAmount));
        assert!(outcome.derived.is_none());
        assert_eq!(recomputer.latest(), Some(&outcome));
        assert_sample_series(&ChartDataAdapter::new().main_series(outcome.derived.as_ref()));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn tree_with(total: Decimal, categories: &[Decimal], subs: &[Decimal]) -> AllocationTree {
    let categories = categories
        .iter()
        .enumerate()
        .map(|(i, percentage)| {
            let mut category = Category::new(format!("c{}", i), format!("Category {}", i))
                .with_percentage(*percentage);
            if i == 0 {
                for (j, sub) in subs.iter().enumerate() {
                    category = category.with_sub_category(SubCategory::new(j.to_string(), "", *sub));
                }
            }
            category
        })
        .collect();
    AllocationTree::from_parts(total, categories)
}

proptest! {
    #[test]
    fn prop_category_amounts_sum_to_total(
        total in (1i64..1_000_000_000i64).prop_map(|m| Decimal::new(m, 2)),
        categories in percentages_summing_to_hundred(),
    ) {
        let tree = tree_with(total, &categories, &[]);
        prop_assert!(validate(&tree).is_valid());

        let derived = AllocationEngine::new().derive(&tree).unwrap();
        let diff = (derived.allocated_total() - total).abs();
        prop_assert!(diff <= dec!(0.0001), "diff {}", diff);
    }

    #[test]
    fn prop_sub_amounts_sum_to_category_amount(
        total in (1i64..1_000_000_000i64).prop_map(|m| Decimal::new(m, 2)),
        categories in percentages_summing_to_hundred(),
        subs in percentages_summing_to_hundred(),
    ) {
        let tree = tree_with(total, &categories, &subs);
        let derived = AllocationEngine::new().derive(&tree).unwrap();

        let first = &derived.categories[0];
        let diff = (first.sub_category_total() - first.amount).abs();
        prop_assert!(diff <= dec!(0.0001), "diff {}", diff);
    }

    #[test]
    fn prop_off_target_sum_is_reported(
        categories in percentages_summing_to_hundred(),
        bump in 1i64..10_000i64,
    ) {
        let mut categories = categories;
        categories[0] += Decimal::new(bump, 3);
        let tree = tree_with(dec!(1000), &categories, &[]);

        let is_main_issue = matches!(validate(&tree).issue, Some(ValidationIssue::MainCategorySum { .. }));
        prop_assert!(is_main_issue);
    }

    #[test]
    fn prop_valid_trees_derive_balanced_amounts(tree in valid_tree_strategy()) {
        assert_valid(&validate(&tree));
        let derived = AllocationEngine::new().derive(&tree).unwrap();
        assert_amounts_balance(&derived);
    }

    #[test]
    fn prop_percentage_setter_keeps_only_numeric_text(raw in raw_numeric_input_strategy()) {
        let mut tree = reference_tree();
        tree.set_category_percentage(&stocks(), &raw).unwrap();

        let stored = tree.category(&stocks()).unwrap().percentage.as_str().to_string();
        prop_assert!(stored.chars().all(|c| c.is_ascii_digit() || c == '.'));
        prop_assert!(stored.matches('.').count() <= 1);
        prop_assert!(stored.len() <= raw.len());
    }
}
