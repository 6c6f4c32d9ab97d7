//! Amount derivation
//!
//! Percentages compose multiplicatively down the tree:
//!
//! - `category amount = total × category % / 100`
//! - `sub-category amount = category amount × sub-category % / 100`
//!
//! A sub-category's percentage is relative to its parent's derived amount,
//! never to the grand total. Derived amounts are not rounded.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use core_kernel::{percent_of, CategoryId, SubCategoryId};
use crate::error::AllocationError;
use crate::tree::{AllocationTree, Category};
use crate::validation::{ValidationEngine, ValidationIssue};

/// A sub-category with its derived amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSubCategory {
    pub id: SubCategoryId,
    pub name: String,
    pub percentage: Decimal,
    pub amount: Decimal,
}

/// A category with its derived amount and sub-categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedCategory {
    pub id: CategoryId,
    pub name: String,
    pub percentage: Decimal,
    pub amount: Decimal,
    /// Every sub-category, including zero-weight ones
    pub sub_categories: Vec<DerivedSubCategory>,
}

impl DerivedCategory {
    /// Sum of the derived sub-category amounts
    pub fn sub_category_total(&self) -> Decimal {
        self.sub_categories.iter().map(|s| s.amount).sum()
    }
}

/// A validated tree with absolute amounts for every node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTree {
    pub total_amount: Decimal,
    pub categories: Vec<DerivedCategory>,
}

impl DerivedTree {
    /// Looks up a derived category by key
    pub fn category(&self, id: &CategoryId) -> Option<&DerivedCategory> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Sum of the derived category amounts
    pub fn allocated_total(&self) -> Decimal {
        self.categories.iter().map(|c| c.amount).sum()
    }

    /// Returns true if at least one category carries a positive percentage
    pub fn has_positive_category(&self) -> bool {
        self.categories.iter().any(|c| c.percentage > Decimal::ZERO)
    }
}

/// Derives monetary amounts from a valid percentage tree
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationEngine {
    validator: ValidationEngine,
}

impl AllocationEngine {
    pub fn new() -> Self {
        Self {
            validator: ValidationEngine::new(),
        }
    }

    /// Validates the tree, then derives amounts for every node
    ///
    /// # Arguments
    ///
    /// * `tree` - The percentage tree to evaluate
    ///
    /// # Returns
    ///
    /// A `DerivedTree` preserving category and sub-category order
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::Invalid` with the validation issue if the
    /// tree does not pass validation, or `AllocationError::Core` if an
    /// amount overflows
    pub fn derive(&self, tree: &AllocationTree) -> Result<DerivedTree, AllocationError> {
        if let Some(issue) = self.validator.validate(tree).issue {
            return Err(AllocationError::Invalid(issue));
        }
        self.derive_amounts(tree)
    }

    /// Derives amounts without validating the sums
    ///
    /// Callers must have validated the tree already. A missing total is
    /// still reported as `InvalidTotalAmount`.
    pub(crate) fn derive_amounts(&self, tree: &AllocationTree) -> Result<DerivedTree, AllocationError> {
        let total_amount = tree
            .total_amount()
            .ok_or(AllocationError::Invalid(ValidationIssue::InvalidTotalAmount))?;

        let categories = tree
            .categories
            .iter()
            .map(|category| derive_category(total_amount, category))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(%total_amount, categories = categories.len(), "Derived allocation amounts");
        Ok(DerivedTree {
            total_amount,
            categories,
        })
    }
}

fn derive_category(total_amount: Decimal, category: &Category) -> Result<DerivedCategory, AllocationError> {
    let percentage = category.percentage_value();
    let amount = percent_of(total_amount, percentage)?;

    let sub_categories = category
        .sub_categories
        .iter()
        .map(|sub| -> Result<DerivedSubCategory, AllocationError> {
            let sub_percentage = sub.percentage_value();
            Ok(DerivedSubCategory {
                id: sub.id.clone(),
                name: sub.name.clone(),
                percentage: sub_percentage,
                amount: percent_of(amount, sub_percentage)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DerivedCategory {
        id: category.id.clone(),
        name: category.name.clone(),
        percentage,
        amount,
        sub_categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use crate::tree::{SubCategory, MUTUAL_FUNDS_ID, STOCKS_ID};

    fn scenario() -> AllocationTree {
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

    #[test]
    fn test_category_and_sub_amounts() {
        let derived = AllocationEngine::new().derive(&scenario()).unwrap();

        let mf = derived.category(&CategoryId::from(MUTUAL_FUNDS_ID)).unwrap();
        assert_eq!(mf.amount, dec!(600000));
        assert_eq!(mf.sub_categories[0].amount, dec!(240000));
        assert_eq!(mf.sub_categories[1].amount, dec!(210000));
        assert_eq!(mf.sub_categories[2].amount, dec!(150000));
        assert_eq!(derived.categories[1].amount, dec!(400000));
    }

    #[test]
    fn test_amounts_sum_to_total() {
        let derived = AllocationEngine::new().derive(&scenario()).unwrap();
        assert_eq!(derived.allocated_total(), dec!(1000000));
        assert_eq!(derived.categories[0].sub_category_total(), dec!(600000));
    }

    #[test]
    fn test_zero_weight_sub_category_kept() {
        let mut tree = scenario();
        tree.categories[1].sub_categories.push(SubCategory::new("9", "IT", "100"));
        tree.categories[1].sub_categories.push(SubCategory::new("10", "", "0"));

        let derived = AllocationEngine::new().derive(&tree).unwrap();
        let stocks = &derived.categories[1];
        assert_eq!(stocks.sub_categories.len(), 2);
        assert_eq!(stocks.sub_categories[1].amount, Decimal::ZERO);
    }

    #[test]
    fn test_invalid_tree_not_derived() {
        let mut tree = scenario();
        tree.categories[1].percentage = "39".into();

        let result = AllocationEngine::new().derive(&tree);
        assert!(matches!(
            result,
            Err(AllocationError::Invalid(ValidationIssue::MainCategorySum { .. }))
        ));
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let engine = AllocationEngine::new();
        let tree = scenario();
        assert_eq!(engine.derive(&tree).unwrap(), engine.derive(&tree).unwrap());
    }
}
