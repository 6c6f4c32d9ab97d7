//! The percentage tree
//!
//! An [`AllocationTree`] holds the total amount and an ordered list of
//! categories, each with its own ordered list of sub-categories. Percentages
//! are kept as raw text; numeric interpretation happens in validation and
//! derivation through [`RawNumber::value`].
//!
//! The serialized form matches the stored profile layout:
//!
//! ```json
//! {
//!   "totalAmount": "1000000",
//!   "categories": [
//!     {
//!       "id": "mutualFunds",
//!       "name": "Mutual Funds",
//!       "percentage": "60",
//!       "subCategories": [{ "id": "1718000000000", "name": "Large Cap", "percentage": "40" }],
//!       "isFixed": true
//!     }
//!   ]
//! }
//! ```

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{CategoryId, RawNumber, SubCategoryId};
use crate::error::AllocationError;

/// Key of the built-in "Mutual Funds" category
pub const MUTUAL_FUNDS_ID: &str = "mutualFunds";
/// Key of the built-in "Stocks" category
pub const STOCKS_ID: &str = "stocks";

/// An allocation bucket inside a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    /// Key, unique within the parent category
    pub id: SubCategoryId,
    /// Display name, may be blank
    #[serde(default)]
    pub name: String,
    /// Share of the parent category's amount, as typed
    #[serde(default)]
    pub percentage: RawNumber,
}

impl SubCategory {
    /// Creates a sub-category with the given key, name and percentage
    pub fn new(
        id: impl Into<SubCategoryId>,
        name: impl Into<String>,
        percentage: impl Into<RawNumber>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            percentage: percentage.into(),
        }
    }

    /// The percentage as a number, zero when unparsable
    pub fn percentage_value(&self) -> Decimal {
        self.percentage.value()
    }
}

/// A top-level allocation bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Stable key, unique within the tree
    pub id: CategoryId,
    /// Display name
    pub name: String,
    /// Share of the total amount, as typed
    #[serde(default)]
    pub percentage: RawNumber,
    /// Ordered sub-categories
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
    /// Built-in categories cannot be renamed or removed
    #[serde(rename = "isFixed", default)]
    pub fixed: bool,
}

impl Category {
    /// Creates a user-defined category with no percentage and no sub-categories
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            percentage: RawNumber::empty(),
            sub_categories: Vec::new(),
            fixed: false,
        }
    }

    /// Creates a built-in category
    pub fn fixed(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            fixed: true,
            ..Self::new(id, name)
        }
    }

    /// Sets the percentage
    pub fn with_percentage(mut self, percentage: impl Into<RawNumber>) -> Self {
        self.percentage = percentage.into();
        self
    }

    /// Appends a sub-category
    pub fn with_sub_category(mut self, sub_category: SubCategory) -> Self {
        self.sub_categories.push(sub_category);
        self
    }

    /// The percentage as a number, zero when unparsable
    pub fn percentage_value(&self) -> Decimal {
        self.percentage.value()
    }

    /// Looks up a sub-category by key
    pub fn sub_category(&self, id: &SubCategoryId) -> Option<&SubCategory> {
        self.sub_categories.iter().find(|s| &s.id == id)
    }

    fn sub_category_mut(&mut self, id: &SubCategoryId) -> Result<&mut SubCategory, AllocationError> {
        let category_id = self.id.clone();
        self.sub_categories
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| AllocationError::sub_category_not_found(&category_id, id))
    }

    /// Generates a sub-category key from the current time in milliseconds,
    /// bumped until it is unused within this category
    fn next_sub_category_id(&self) -> SubCategoryId {
        let mut millis = Utc::now().timestamp_millis();
        loop {
            let candidate = millis.to_string();
            if !self.sub_categories.iter().any(|s| s.id == candidate.as_str()) {
                return SubCategoryId::new(candidate);
            }
            millis += 1;
        }
    }
}

/// Total amount plus the ordered category tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationTree {
    /// Amount to distribute, as typed
    #[serde(default)]
    pub total_amount: RawNumber,
    /// Ordered categories; order is display order
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Default for AllocationTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationTree {
    /// Creates the initial tree: no total, and the two built-in categories
    /// with empty percentages and no sub-categories
    pub fn new() -> Self {
        Self {
            total_amount: RawNumber::empty(),
            categories: vec![
                Category::fixed(MUTUAL_FUNDS_ID, "Mutual Funds"),
                Category::fixed(STOCKS_ID, "Stocks"),
            ],
        }
    }

    /// Creates a tree from parts without any checks
    pub fn from_parts(total_amount: impl Into<RawNumber>, categories: Vec<Category>) -> Self {
        Self {
            total_amount: total_amount.into(),
            categories,
        }
    }

    /// Restores the initial two-category shape
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The total amount when it is a positive number
    pub fn total_amount(&self) -> Option<Decimal> {
        self.total_amount.positive()
    }

    /// Sets the total amount from raw input, keeping digits and one decimal point
    pub fn set_total_amount(&mut self, raw: &str) {
        self.total_amount = RawNumber::sanitized(raw);
    }

    /// Looks up a category by key
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Position of a category in display order
    pub fn position(&self, id: &CategoryId) -> Option<usize> {
        self.categories.iter().position(|c| &c.id == id)
    }

    fn category_mut(&mut self, id: &CategoryId) -> Result<&mut Category, AllocationError> {
        self.categories
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| AllocationError::CategoryNotFound(id.clone()))
    }

    /// Appends a user-defined category under a caller-assigned key
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCategory` if the key is already in use
    pub fn add_category(
        &mut self,
        id: impl Into<CategoryId>,
        name: impl Into<String>,
    ) -> Result<&mut Category, AllocationError> {
        let id = id.into();
        if self.category(&id).is_some() {
            return Err(AllocationError::DuplicateCategory(id));
        }

        debug!(category_id = %id, "Adding category");
        self.categories.push(Category::new(id, name));
        let last = self.categories.len() - 1;
        Ok(&mut self.categories[last])
    }

    /// Removes a user-defined category
    ///
    /// # Errors
    ///
    /// Returns `FixedCategory` for built-in categories and
    /// `CategoryNotFound` for unknown keys
    pub fn remove_category(&mut self, id: &CategoryId) -> Result<Category, AllocationError> {
        let index = self
            .position(id)
            .ok_or_else(|| AllocationError::CategoryNotFound(id.clone()))?;
        if self.categories[index].fixed {
            return Err(AllocationError::FixedCategory(id.clone()));
        }

        debug!(category_id = %id, "Removing category");
        Ok(self.categories.remove(index))
    }

    /// Renames a user-defined category
    pub fn rename_category(&mut self, id: &CategoryId, name: impl Into<String>) -> Result<(), AllocationError> {
        let category = self.category_mut(id)?;
        if category.fixed {
            return Err(AllocationError::FixedCategory(id.clone()));
        }
        category.name = name.into();
        Ok(())
    }

    /// Sets a category's percentage from raw input
    pub fn set_category_percentage(&mut self, id: &CategoryId, raw: &str) -> Result<(), AllocationError> {
        self.category_mut(id)?.percentage = RawNumber::sanitized(raw);
        Ok(())
    }

    /// Appends a blank sub-category (empty name, percentage "0") and returns its key
    pub fn add_sub_category(&mut self, category_id: &CategoryId) -> Result<SubCategoryId, AllocationError> {
        let category = self.category_mut(category_id)?;
        let id = category.next_sub_category_id();

        debug!(category_id = %category_id, sub_category_id = %id, "Adding sub-category");
        category
            .sub_categories
            .push(SubCategory::new(id.clone(), "", "0"));
        Ok(id)
    }

    /// Removes a sub-category
    pub fn remove_sub_category(
        &mut self,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
    ) -> Result<SubCategory, AllocationError> {
        let category = self.category_mut(category_id)?;
        let index = category
            .sub_categories
            .iter()
            .position(|s| &s.id == sub_category_id)
            .ok_or_else(|| AllocationError::sub_category_not_found(category_id, sub_category_id))?;

        debug!(category_id = %category_id, sub_category_id = %sub_category_id, "Removing sub-category");
        Ok(category.sub_categories.remove(index))
    }

    /// Renames a sub-category
    pub fn rename_sub_category(
        &mut self,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
        name: impl Into<String>,
    ) -> Result<(), AllocationError> {
        self.category_mut(category_id)?
            .sub_category_mut(sub_category_id)?
            .name = name.into();
        Ok(())
    }

    /// Sets a sub-category's percentage from raw input
    pub fn set_sub_category_percentage(
        &mut self,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
        raw: &str,
    ) -> Result<(), AllocationError> {
        self.category_mut(category_id)?
            .sub_category_mut(sub_category_id)?
            .percentage = RawNumber::sanitized(raw);
        Ok(())
    }
}
