//! Configuration module for Similar-Proxy
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so the proxy also runs
//! without a file.
//!
//! # Example
//!
//! ```no_run
//! use similar_proxy::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("similar-proxy.toml")).unwrap();
//! println!("Listening on port {}", config.server.port);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, PaginationConfig, ServerConfig, UpstreamConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::validate;
