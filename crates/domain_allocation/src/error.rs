//! Allocation domain errors

use thiserror::Error;

use core_kernel::{CategoryId, CoreError, SubCategoryId};
use crate::validation::ValidationIssue;

/// Errors that can occur in the allocation domain
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("Sub-category {sub_category_id} not found under category {category_id}")]
    SubCategoryNotFound {
        category_id: CategoryId,
        sub_category_id: SubCategoryId,
    },

    #[error("Category {0} is built in and cannot be renamed or removed")]
    FixedCategory(CategoryId),

    #[error("Category already exists: {0}")]
    DuplicateCategory(CategoryId),

    #[error("Allocation is not valid: {0}")]
    Invalid(ValidationIssue),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AllocationError {
    pub fn sub_category_not_found(category_id: &CategoryId, sub_category_id: &SubCategoryId) -> Self {
        AllocationError::SubCategoryNotFound {
            category_id: category_id.clone(),
            sub_category_id: sub_category_id.clone(),
        }
    }
}
