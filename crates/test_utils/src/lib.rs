//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! allocation planner test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built trees and inputs
//! - `builders`: Builder patterns for test data construction
//! - `stores`: Temporary key-value stores and test tracing
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod stores;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use stores::*;
pub use assertions::*;
pub use generators::*;
