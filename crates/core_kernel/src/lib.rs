//! Core Kernel - Foundational types and utilities for the allocation planner
//!
//! This crate provides the building blocks used by every other layer:
//! - Lenient numeric parsing of raw user text into precise decimals
//! - Indian digit-grouping currency formatting
//! - Stable string identifiers for categories and sub-categories
//! - The key-value storage port and its error type

pub mod money;
pub mod numeric;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{format_indian, format_amount, percent_of};
pub use numeric::{RawNumber, sanitize_numeric_input, parse_or_zero, parse_positive};
pub use identifiers::{CategoryId, SubCategoryId};
pub use ports::{DomainPort, KeyValueStore, PortError};
pub use error::CoreError;
