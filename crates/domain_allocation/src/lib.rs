//! Allocation Domain
//!
//! This crate implements the allocation engine: splitting a total amount
//! across a two-level tree of categories and sub-categories expressed as
//! percentages.
//!
//! # Key Concepts
//!
//! - **Allocation Tree**: Total amount plus ordered categories, each with
//!   ordered sub-categories. Percentages are stored as typed.
//! - **Validation**: Category percentages, and the sub-category percentages of
//!   every funded category, must sum to 100 within a tolerance of 0.0001.
//! - **Derivation**: Amounts compose down the tree; a sub-category's share is
//!   taken from its parent category's amount.
//! - **Chart Series**: Flat records for rendering, with a fixed sample
//!   dataset whenever no valid real allocation exists.
//!
//! # Example
//!
//! ```rust
//! use domain_allocation::{AllocationEngine, AllocationTree};
//! use core_kernel::CategoryId;
//! use rust_decimal_macros::dec;
//!
//! let mut tree = AllocationTree::new();
//! tree.set_total_amount("1000000");
//! tree.set_category_percentage(&CategoryId::from("mutualFunds"), "60").unwrap();
//! tree.set_category_percentage(&CategoryId::from("stocks"), "40").unwrap();
//!
//! let derived = AllocationEngine::new().derive(&tree).unwrap();
//! assert_eq!(derived.categories[0].amount, dec!(600000));
//! ```

pub mod tree;
pub mod validation;
pub mod engine;
pub mod chart;
pub mod recompute;
pub mod error;

pub use tree::{AllocationTree, Category, SubCategory, MUTUAL_FUNDS_ID, STOCKS_ID};
pub use validation::{
    validate, ValidationEngine, ValidationIssue, ValidationResult, SUM_TARGET, SUM_TOLERANCE,
};
pub use engine::{AllocationEngine, DerivedCategory, DerivedSubCategory, DerivedTree};
pub use chart::{sample_tree, ChartDataAdapter, ChartRecord, ChartSeries, PALETTE, SAMPLE_TOTAL_AMOUNT};
pub use recompute::{GenerationGate, Recomputation, RecomputeToken, Recomputer};
pub use error::AllocationError;
