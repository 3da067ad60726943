//! Configuration — routing schema, file loading, `.env` and token lookup.
//!
//! # Usage
//! ```no_run
//! use threadwatch_core::config;
//!
//! config::load_env_file(None).unwrap();
//! let cfg = config::load_config(None).unwrap();
//! let token = config::load_token(config::DEFAULT_TOKEN_VAR).unwrap();
//! println!("{} source(s)", cfg.sources.len());
//! ```

pub mod error;
pub mod loader;
pub mod schema;

// Re-export key types
pub use error::ConfigError;
pub use loader::{
    load_config, load_env_file, load_token, DEFAULT_CONFIG_PATH, DEFAULT_ENV_PATH,
    DEFAULT_TOKEN_VAR,
};
pub use schema::{
    DestinationChannel, DestinationConfig, MessageTemplate, NotifierSettings, RoutingConfig,
    SourceConfig,
};
