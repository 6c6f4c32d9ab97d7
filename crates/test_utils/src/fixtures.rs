//! Pre-built Test Fixtures
//!
//! Provides ready-to-use trees and inputs for the allocation engine. Every
//! fixture uses fixed sub-category keys so trees built twice compare equal.

use core_kernel::CategoryId;
use domain_allocation::{AllocationTree, Category, SubCategory, MUTUAL_FUNDS_ID, STOCKS_ID};

/// Fixture for allocation trees
pub struct TreeFixtures;

impl TreeFixtures {
    /// The untouched initial tree
    pub fn initial() -> AllocationTree {
        AllocationTree::new()
    }

    /// Total 10,00,000: Mutual Funds 60% (Large Cap 40, Mid Cap 35,
    /// Small Cap 25), Stocks 40% with no sub-categories
    pub fn reference() -> AllocationTree {
        AllocationTree::from_parts(
            "1000000",
            vec![
                Category::fixed(MUTUAL_FUNDS_ID, "Mutual Funds")
                    .with_percentage("60")
                    .with_sub_category(SubCategory::new("1", "Large Cap", "40"))
                    .with_sub_category(SubCategory::new("2", "Mid Cap", "35"))
                    .with_sub_category(SubCategory::new("3", "Small Cap", "25")),
                Category::fixed(STOCKS_ID, "Stocks").with_percentage("40"),
            ],
        )
    }

    /// The reference tree with both categories split into sub-categories
    pub fn fully_split() -> AllocationTree {
        let mut tree = Self::reference();
        tree.categories[1] = Category::fixed(STOCKS_ID, "Stocks")
            .with_percentage("40")
            .with_sub_category(SubCategory::new("1", "IT Sector", "45"))
            .with_sub_category(SubCategory::new("2", "Banking", "35"))
            .with_sub_category(SubCategory::new("3", "FMCG", "20"));
        tree
    }

    /// Category percentages summing to 99
    pub fn main_sum_off() -> AllocationTree {
        let mut tree = Self::reference();
        tree.categories[1].percentage = "39".into();
        tree
    }

    /// Mutual Funds sub-categories summing to 75
    pub fn sub_sum_off() -> AllocationTree {
        let mut tree = Self::reference();
        tree.categories[0].sub_categories.pop();
        tree
    }

    /// A valid tree with no total amount
    pub fn without_total() -> AllocationTree {
        let mut tree = Self::reference();
        tree.total_amount = "".into();
        tree
    }
}

/// Fixture for category keys
pub struct IdFixtures;

impl IdFixtures {
    pub fn mutual_funds() -> CategoryId {
        CategoryId::from(MUTUAL_FUNDS_ID)
    }

    pub fn stocks() -> CategoryId {
        CategoryId::from(STOCKS_ID)
    }

    /// Key for a user-defined category
    pub fn bonds() -> CategoryId {
        CategoryId::from("bonds")
    }
}

/// Fixture for raw user input
pub struct InputFixtures;

impl InputFixtures {
    /// Inputs that sanitize to nothing usable
    pub fn unusable_amounts() -> &'static [&'static str] {
        &["", "0", "0.00", "abc", "-", "."]
    }

    /// Raw input paired with its sanitized form
    pub fn sanitizing_pairs() -> &'static [(&'static str, &'static str)] {
        &[
            ("1,00,000", "100000"),
            ("₹ 2500.50", "2500.50"),
            ("12.5.3", "12.53"),
            ("60%", "60"),
            ("-40", "40"),
        ]
    }
}
