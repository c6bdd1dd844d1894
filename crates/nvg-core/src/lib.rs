//! # NVG Core
//!
//! Configuration and error handling shared by the NVG viewer crates.
//!
//! - **Configuration**: [`AppConfig`] loaded from YAML files, optionally merged with
//!   `NVGVIEW__*` environment variables, and validated before use.
//! - **Errors**: [`NvgError`] and [`ConfigError`] built with `thiserror`.
//!
//! ## Example
//!
//! ```
//! use nvg_core::config::{AppConfig, OutputFormat};
//!
//! let config = AppConfig::from_yaml("output:\n  format: json\n").unwrap();
//! assert_eq!(config.output.format, OutputFormat::Json);
//! assert!(config.loader.skip_empty_points);
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{ConfigError, NvgError, Result};
