//! Sum validation for the percentage tree
//!
//! Validation produces at most one issue. The checks run in a fixed order:
//!
//! 1. The total amount must be a positive number. If it is not, validation
//!    stops here.
//! 2. Category percentages must sum to 100 within [`SUM_TOLERANCE`].
//! 3. For every category with a positive percentage and at least one
//!    sub-category, the sub-category percentages must sum to 100 within
//!    [`SUM_TOLERANCE`].
//!
//! Steps 2 and 3 share one result slot and every failing check overwrites
//! it, so the issue reported is the one from the last failing check in the
//! pass. A failing sub-category sum therefore replaces a failing category
//! sum, and a later failing category replaces an earlier one.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use core_kernel::CategoryId;
use crate::tree::{AllocationTree, Category};

/// Target for every percentage sum
pub const SUM_TARGET: Decimal = dec!(100);
/// Allowed deviation from [`SUM_TARGET`]
pub const SUM_TOLERANCE: Decimal = dec!(0.0001);

/// Returns true if `sum` is within tolerance of 100
pub fn sums_to_hundred(sum: Decimal) -> bool {
    sum.checked_sub(SUM_TARGET)
        .map_or(false, |deviation| deviation.abs() <= SUM_TOLERANCE)
}

/// Adds percentages, saturating instead of overflowing
pub fn percentage_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.checked_add(v).unwrap_or(Decimal::MAX))
}

/// Sum of a category's sub-category percentages
pub fn sub_category_sum(category: &Category) -> Decimal {
    percentage_sum(category.sub_categories.iter().map(|s| s.percentage_value()))
}

/// Sum of all category percentages
pub fn category_sum(tree: &AllocationTree) -> Decimal {
    percentage_sum(tree.categories.iter().map(|c| c.percentage_value()))
}

/// A violated tree invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// The total amount is missing, unparsable, or not positive
    InvalidTotalAmount,
    /// Category percentages do not sum to 100
    MainCategorySum {
        total: Decimal,
    },
    /// A category's sub-category percentages do not sum to 100
    SubCategorySum {
        category_id: CategoryId,
        category_name: String,
        total: Decimal,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::InvalidTotalAmount => {
                f.write_str("Please enter a valid total investment amount.")
            }
            ValidationIssue::MainCategorySum { .. } => {
                f.write_str("Main category percentages must sum to 100%.")
            }
            ValidationIssue::SubCategorySum { category_name, .. } => {
                write!(f, "Sub-categories under {} must sum to 100%.", category_name)
            }
        }
    }
}

/// Outcome of validating a tree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationResult {
    /// The single reported issue, if any
    pub issue: Option<ValidationIssue>,
}

impl ValidationResult {
    /// A passing result
    pub fn ok() -> Self {
        Self { issue: None }
    }

    /// A failing result
    pub fn fail(issue: ValidationIssue) -> Self {
        Self { issue: Some(issue) }
    }

    pub fn is_valid(&self) -> bool {
        self.issue.is_none()
    }

    /// The user-facing message, or `None` when the tree is valid
    pub fn message(&self) -> Option<String> {
        self.issue.as_ref().map(ToString::to_string)
    }
}

/// Checks the tree's sum invariants
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationEngine;

impl ValidationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Validates the tree and reports at most one issue
    ///
    /// See the module documentation for check order and overwrite rules.
    pub fn validate(&self, tree: &AllocationTree) -> ValidationResult {
        if tree.total_amount().is_none() {
            debug!(total_amount = %tree.total_amount, "Total amount is not a positive number");
            return ValidationResult::fail(ValidationIssue::InvalidTotalAmount);
        }

        let mut issue = None;

        let total = category_sum(tree);
        if !sums_to_hundred(total) {
            debug!(%total, "Category percentages do not sum to 100");
            issue = Some(ValidationIssue::MainCategorySum { total });
        }

        for category in &tree.categories {
            if category.percentage_value() <= Decimal::ZERO || category.sub_categories.is_empty() {
                continue;
            }

            let total = sub_category_sum(category);
            if !sums_to_hundred(total) {
                debug!(category_id = %category.id, %total, "Sub-category percentages do not sum to 100");
                issue = Some(ValidationIssue::SubCategorySum {
                    category_id: category.id.clone(),
                    category_name: category.name.clone(),
                    total,
                });
            }
        }

        ValidationResult { issue }
    }
}

/// Validates a tree with the default engine
pub fn validate(tree: &AllocationTree) -> ValidationResult {
    ValidationEngine::new().validate(tree)
}
