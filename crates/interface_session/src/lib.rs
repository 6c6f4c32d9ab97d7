//! Session Layer
//!
//! This crate is the surface consumed by a UI: an [`AllocationSession`]
//! accepts raw edits and profile actions and exposes the validation message,
//! chart series and profile list.
//!
//! # Architecture
//!
//! - **Session**: Edit, validate, derive and chart pipeline plus profile actions
//! - **Configuration**: `ALLOCATOR_*` environment variables and `.env`
//! - **Telemetry**: Tracing subscriber setup
//!
//! # Example
//!
//! ```rust
//! use core_kernel::CategoryId;
//! use infra_store::MemoryKeyValueStore;
//! use interface_session::AllocationSession;
//!
//! let mut session = AllocationSession::start(MemoryKeyValueStore::new()).unwrap();
//! session.set_total_amount("1000000").unwrap();
//! session.set_category_percentage(&CategoryId::from("mutualFunds"), "60").unwrap();
//! session.set_category_percentage(&CategoryId::from("stocks"), "40").unwrap();
//!
//! assert_eq!(session.validation_message(), None);
//! assert!(!session.main_chart().is_sample);
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;

use tracing::info;

use infra_store::{open_store, StoreHandle};

pub use config::SessionConfig;
pub use error::SessionError;
pub use session::AllocationSession;
pub use telemetry::init_tracing;

/// Opens the configured store and starts a session on it
///
/// # Arguments
///
/// * `config` - Session configuration
///
/// # Errors
///
/// Returns an error if the store cannot be opened or its profiles cannot be read
pub fn bootstrap(config: &SessionConfig) -> Result<AllocationSession<StoreHandle>, SessionError> {
    let store = open_store(&config.store_config())?;
    info!(durable = store.is_durable(), "Store opened");
    AllocationSession::start(store)
}

/// Loads configuration from the environment, installs tracing, and starts a
/// session
pub fn bootstrap_from_env() -> Result<AllocationSession<StoreHandle>, SessionError> {
    let config = SessionConfig::load()?;
    init_tracing(&config.log_level, config.log_json);
    bootstrap(&config)
}
