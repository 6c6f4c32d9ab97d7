//! Test Data Builders
//!
//! Provides builder patterns for constructing trees and profiles with
//! sensible defaults. Sub-category keys are assigned sequentially per
//! category so built trees are deterministic.

use fake::faker::company::en::CompanyName;
use fake::Fake;

use core_kernel::RawNumber;
use domain_allocation::{AllocationTree, Category, SubCategory};
use domain_profile::Profile;

use crate::fixtures::TreeFixtures;

/// Builder for allocation trees
///
/// Starts with no categories at all; use [`TestTreeBuilder::with_defaults`]
/// to start from the two built-in categories.
pub struct TestTreeBuilder {
    total_amount: RawNumber,
    categories: Vec<Category>,
}

impl Default for TestTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTreeBuilder {
    /// Creates a new builder with no total and no categories
    pub fn new() -> Self {
        Self {
            total_amount: RawNumber::empty(),
            categories: Vec::new(),
        }
    }

    /// Creates a builder holding the two built-in categories
    pub fn with_defaults() -> Self {
        Self {
            total_amount: RawNumber::empty(),
            categories: TreeFixtures::initial().categories,
        }
    }

    /// Sets the total amount
    pub fn total(mut self, total: impl Into<RawNumber>) -> Self {
        self.total_amount = total.into();
        self
    }

    /// Appends a user-defined category
    pub fn category(mut self, id: &str, name: &str, percentage: impl Into<RawNumber>) -> Self {
        self.categories
            .push(Category::new(id, name).with_percentage(percentage));
        self
    }

    /// Appends a built-in category
    pub fn fixed_category(mut self, id: &str, name: &str, percentage: impl Into<RawNumber>) -> Self {
        self.categories
            .push(Category::fixed(id, name).with_percentage(percentage));
        self
    }

    /// Sets the percentage of an existing category
    pub fn percentage(mut self, id: &str, percentage: impl Into<RawNumber>) -> Self {
        if let Some(category) = self.categories.iter_mut().find(|c| c.id == id) {
            category.percentage = percentage.into();
        }
        self
    }

    /// Appends a sub-category to the category with key `category_id`
    pub fn sub(mut self, category_id: &str, name: &str, percentage: impl Into<RawNumber>) -> Self {
        if let Some(category) = self.categories.iter_mut().find(|c| c.id == category_id) {
            let key = (category.sub_categories.len() + 1).to_string();
            category
                .sub_categories
                .push(SubCategory::new(key, name, percentage));
        }
        self
    }

    /// Builds the tree
    pub fn build(self) -> AllocationTree {
        AllocationTree::from_parts(self.total_amount, self.categories)
    }
}

/// Builder for profiles
pub struct TestProfileBuilder {
    name: String,
    tree: AllocationTree,
}

impl Default for TestProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProfileBuilder {
    /// Creates a builder with a random name and the reference tree
    pub fn new() -> Self {
        Self {
            name: random_profile_name(),
            tree: TreeFixtures::reference(),
        }
    }

    /// Sets the profile name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the captured tree
    pub fn tree(mut self, tree: AllocationTree) -> Self {
        self.tree = tree;
        self
    }

    /// Builds the profile
    pub fn build(self) -> Profile {
        Profile::capture(self.name, &self.tree)
    }
}

/// A random non-blank profile name
pub fn random_profile_name() -> String {
    let name: String = CompanyName().fake();
    format!("{} Portfolio", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_allocation::validate;

    #[test]
    fn test_builder_matches_reference_fixture() {
        let tree = TestTreeBuilder::with_defaults()
            .total("1000000")
            .percentage("mutualFunds", "60")
            .percentage("stocks", "40")
            .sub("mutualFunds", "Large Cap", "40")
            .sub("mutualFunds", "Mid Cap", "35")
            .sub("mutualFunds", "Small Cap", "25")
            .build();

        assert_eq!(tree, TreeFixtures::reference());
        assert!(validate(&tree).is_valid());
    }

    #[test]
    fn test_random_profile_names_are_not_blank() {
        for _ in 0..10 {
            assert!(!random_profile_name().trim().is_empty());
        }
    }
}
