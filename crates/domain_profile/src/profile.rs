//! Profile definition
//!
//! A profile is a named deep copy of an allocation tree. Its serialized form
//! is one element of the stored profile array:
//! `{ "name": ..., "totalAmount": ..., "categories": [...] }`.

use serde::{Deserialize, Serialize};

use core_kernel::RawNumber;
use domain_allocation::{AllocationTree, Category};

/// A named, persisted snapshot of an allocation tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Unique among saved profiles
    pub name: String,
    /// Total amount as it was typed
    #[serde(default)]
    pub total_amount: RawNumber,
    /// Full category tree
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Profile {
    /// Snapshots a tree under a name
    pub fn capture(name: impl Into<String>, tree: &AllocationTree) -> Self {
        Self {
            name: name.into(),
            total_amount: tree.total_amount.clone(),
            categories: tree.categories.clone(),
        }
    }

    /// Returns a deep copy of the stored tree
    pub fn to_tree(&self) -> AllocationTree {
        AllocationTree::from_parts(self.total_amount.clone(), self.categories.clone())
    }
}
