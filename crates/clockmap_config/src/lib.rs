//! Parsing and validation of `clockmap.toml` configuration files.
//!
//! Every table is optional and defaults to the values the constraint
//! generator and template patcher use when no configuration exists.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
