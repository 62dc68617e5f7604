//! Configuration module for HUJI-Cheese
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so a run without a configuration file targets the
//! live university sources.
//!
//! # Example
//!
//! ```no_run
//! use huji_cheese::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("cheese.toml")).unwrap();
//! println!("At most {} courses in flight", config.batch.max_concurrent_courses);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BatchConfig, Config, FetchConfig, OutputConfig, SourcesConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_with_hash, parse_config};
pub use validation::validate;
