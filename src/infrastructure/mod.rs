//! Infrastructure layer - external adapters (configuration, HTTP).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod http_transport;

pub use config::{
    ensure_config_exists, load_config, load_config_from_file, load_config_or_default,
    load_keyword_table, RuntimeConfig, StaticConfig,
};
pub use http_transport::HttpTransport;
