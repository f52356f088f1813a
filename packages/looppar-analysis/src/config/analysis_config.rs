//! Analysis configuration
//!
//! YAML schema v1:
//!
//! ```yaml
//! version: 1
//! solver:
//!   backend: builtin      # builtin | z3
//!   timeout_ms: 5000
//!   max_disjuncts: 256
//!   witness_search_bound: 64
//! entry_points: ["<Main: main([Ljava/lang/String;)V>"]
//! output: annotationMap.json
//! skip_library_classes: true
//! ```

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Which solver decides the dependence formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SolverBackend {
    /// Pure-Rust integer decision procedure
    #[default]
    Builtin,
    /// Z3 (requires the `z3` cargo feature)
    Z3,
}

impl SolverBackend {
    pub fn name(self) -> &'static str {
        match self {
            SolverBackend::Builtin => "builtin",
            SolverBackend::Z3 => "z3",
        }
    }

    pub fn is_available(self) -> bool {
        match self {
            SolverBackend::Builtin => true,
            SolverBackend::Z3 => cfg!(feature = "z3"),
        }
    }
}

impl FromStr for SolverBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "builtin" => Ok(SolverBackend::Builtin),
            "z3" => Ok(SolverBackend::Z3),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub backend: SolverBackend,

    /// Per-query timeout; a timeout rejects the loop
    pub timeout_ms: u64,

    /// Cap on DNF expansion before the builtin solver gives up
    pub max_disjuncts: usize,

    /// Absolute bound of the witness search (builtin solver)
    pub witness_search_bound: i64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Builtin,
            timeout_ms: 5_000,
            max_disjuncts: 256,
            witness_search_bound: 64,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.timeout_ms == 0 || self.timeout_ms > 600_000 {
            return Err(ConfigError::range_with_hint(
                "solver.timeout_ms",
                self.timeout_ms,
                1,
                600_000,
                "Every solver query must be bounded",
            ));
        }

        if self.max_disjuncts == 0 || self.max_disjuncts > 100_000 {
            return Err(ConfigError::range_with_hint(
                "solver.max_disjuncts",
                self.max_disjuncts,
                1,
                100_000,
                "DNF expansion must be finite",
            ));
        }

        if self.witness_search_bound < 1 || self.witness_search_bound > 10_000 {
            return Err(ConfigError::range_with_hint(
                "solver.witness_search_bound",
                self.witness_search_bound,
                1,
                10_000,
                "Witness search range must be reasonable",
            ));
        }

        if !self.backend.is_available() {
            return Err(ConfigError::BackendUnavailable(
                self.backend.name().to_string(),
                "Rebuild with `--features z3` or use the builtin backend.".to_string(),
            ));
        }

        Ok(())
    }
}

/// Top-level configuration of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Schema version (always 1)
    pub version: u32,

    pub solver: SolverConfig,

    /// Entry-point signatures; empty means methods marked `entry`, else `main`
    pub entry_points: Vec<String>,

    /// Where the annotation map is written
    pub output: PathBuf,

    /// Never analyze loops of library classes
    pub skip_library_classes: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            version: 1,
            solver: SolverConfig::default(),
            entry_points: Vec::new(),
            output: PathBuf::from("annotationMap.json"),
            skip_library_classes: true,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.solver.backend = backend;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.solver.timeout_ms = timeout_ms;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_entry_points(mut self, entry_points: Vec<String>) -> Self {
        self.entry_points = entry_points;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output path must not be empty".to_string(),
            ));
        }

        for sig in &self.entry_points {
            if !(sig.starts_with('<') && sig.ends_with('>')) {
                return Err(ConfigError::Validation(format!(
                    "entry point '{}' is not a method signature like <Main: main([Ljava/lang/String;)V>",
                    sig
                )));
            }
        }

        self.solver.validate()
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: AnalysisConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        serde_yaml::to_string(self).map_err(ConfigError::Yaml)
    }
}
