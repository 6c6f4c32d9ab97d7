//! Profile Domain
//!
//! Named snapshots of allocation trees, persisted through the
//! [`core_kernel::KeyValueStore`] port.
//!
//! # Storage Layout
//!
//! | Key | Value |
//! |---|---|
//! | `investmentProfiles` | JSON array of `{name, totalAmount, categories}` |
//! | `lastUsedProfile` | Plain profile name |
//!
//! Loading a profile trusts the stored tree: it is not re-validated, and any
//! sum violations surface on the next recomputation.

pub mod profile;
pub mod store;
pub mod error;

pub use profile::Profile;
pub use store::{DeleteOutcome, ProfileStore, LAST_USED_KEY, PROFILES_KEY};
pub use error::ProfileError;
