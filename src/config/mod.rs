//! Configuration module for Job-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional: `Config::default()` reproduces the stock listing site.
//!
//! # Example
//!
//! ```no_run
//! use job_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting from: {}", config.scraper.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, ScraperConfig, SelectorConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

pub(crate) use validation::validate_selector;
