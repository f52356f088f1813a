//! Configuration System
//!
//! One YAML document (schema v1) per analysis run. Every field has a
//! default, so an empty file (or no file) is a valid configuration.
//!
//! # Examples
//!
//! ```rust,ignore
//! use looppar_analysis::config::{AnalysisConfig, SolverBackend};
//!
//! let config = AnalysisConfig::new()
//!     .with_backend(SolverBackend::Builtin)
//!     .with_timeout_ms(2_000);
//! config.validate()?;
//!
//! let config = AnalysisConfig::from_yaml_file("looppar.yaml")?;
//! ```

pub mod analysis_config;
pub mod error;

// Re-exports
pub use analysis_config::{AnalysisConfig, SolverBackend, SolverConfig};
pub use error::{ConfigError, ConfigResult};
