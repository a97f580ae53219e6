//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ThorConfig (validated, immutable)
//!     → handed to the client, builder and poller at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Private keys never live in the file, only in environment variables

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ConfirmationConfig, DelegationConfig, NodeConfig, ObservabilityConfig, ThorConfig,
    TransactionsConfig,
};
pub use validation::{validate_config, ValidationError};
