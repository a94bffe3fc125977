//! Explorer configuration
//!
//! Two levels:
//! - Level 1: Preset (`ExplorerConfig::preset(Preset::Fast)`)
//! - Level 2: YAML file overriding any field of a preset
//!
//! ```yaml
//! version: 1
//! preset: fast
//! solver:
//!   timeout_ms: 500
//! trace_branches: true
//! ```

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported YAML schema versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Solver backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Built-in bounded search (always available)
    #[default]
    Bounded,
    /// Z3 (requires the `z3` cargo feature)
    Z3,
}

/// Per-check solver budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub backend: BackendKind,

    /// Wall-clock budget per satisfiability check
    pub timeout_ms: u64,

    /// Search node budget per check (bounded backend)
    pub max_nodes: u64,

    /// Integers in `-int_window..=int_window` are always candidate values
    pub int_window: i64,
}

impl SolverConfig {
    fn for_preset(preset: Preset) -> Self {
        let (timeout_ms, max_nodes, int_window) = match preset {
            Preset::Fast => (200, 10_000, 4),
            Preset::Balanced => (2_000, 200_000, 8),
            Preset::Thorough => (30_000, 5_000_000, 32),
        };
        Self {
            backend: BackendKind::Bounded,
            timeout_ms,
            max_nodes,
            int_window,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::for_preset(Preset::default())
    }
}

/// Path explorer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerConfig {
    pub solver: SolverConfig,

    /// Maximum branch constraints on one path (`None` = unbounded)
    pub max_path_constraints: Option<usize>,

    /// Record store snapshots around every conditional
    pub trace_branches: bool,

    /// Analyze the functions of a module in parallel
    pub parallel_functions: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

#[derive(Serialize)]
struct ConfigFileV1<'a> {
    version: u32,
    #[serde(flatten)]
    config: &'a ExplorerConfig,
}

impl ExplorerConfig {
    /// Complete configuration for a preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            solver: SolverConfig::for_preset(preset),
            max_path_constraints: None,
            trace_branches: false,
            parallel_functions: true,
        }
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.solver.backend = backend;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.solver.timeout_ms = timeout_ms;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.solver.max_nodes = max_nodes;
        self
    }

    pub fn with_max_path_constraints(mut self, limit: usize) -> Self {
        self.max_path_constraints = Some(limit);
        self
    }

    pub fn with_trace_branches(mut self, enabled: bool) -> Self {
        self.trace_branches = enabled;
        self
    }

    pub fn with_parallel_functions(mut self, enabled: bool) -> Self {
        self.parallel_functions = enabled;
        self
    }

    /// Load from a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Load from YAML text: `version` is required, `preset` selects the base
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let mut doc: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let mapping = doc.as_mapping_mut().ok_or(ConfigError::MissingVersion)?;

        let version = mapping
            .remove("version")
            .ok_or(ConfigError::MissingVersion)?
            .as_u64()
            .ok_or(ConfigError::MissingVersion)?;
        let version = u32::try_from(version).unwrap_or(u32::MAX);
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match mapping.remove("preset") {
            Some(serde_yaml::Value::String(name)) => Preset::from_str(&name)?,
            Some(other) => return Err(ConfigError::UnknownPreset(format!("{:?}", other))),
            None => Preset::default(),
        };

        let mut merged = serde_yaml::to_value(Self::preset(preset))?;
        merge_yaml(&mut merged, doc);
        let config: Self = serde_yaml::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as a versioned YAML document
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(&ConfigFileV1 {
            version: SUPPORTED_VERSIONS[SUPPORTED_VERSIONS.len() - 1],
            config: self,
        })?)
    }

    /// Range checks
    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=600_000).contains(&self.solver.timeout_ms) {
            return Err(ConfigError::range_with_hint(
                "solver.timeout_ms",
                self.solver.timeout_ms,
                1,
                600_000,
                "Each check needs a non-zero budget of at most ten minutes",
            ));
        }
        if !(1..=1_000_000_000).contains(&self.solver.max_nodes) {
            return Err(ConfigError::range_with_hint(
                "solver.max_nodes",
                self.solver.max_nodes,
                1,
                1_000_000_000,
                "The bounded search must be allowed to visit at least one node",
            ));
        }
        if !(0..=1024).contains(&self.solver.int_window) {
            return Err(ConfigError::range_with_hint(
                "solver.int_window",
                self.solver.int_window,
                0,
                1024,
                "Large windows slow down every integer search",
            ));
        }
        if let Some(limit) = self.max_path_constraints {
            if !(1..=100_000).contains(&limit) {
                return Err(ConfigError::range_with_hint(
                    "max_path_constraints",
                    limit,
                    1,
                    100_000,
                    "Omit the field for an unbounded path",
                ));
            }
        }
        Ok(())
    }
}

/// Recursively overlay `overlay` onto `base`
fn merge_yaml(base: &mut serde_yaml::Value, overlay: serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base), serde_yaml::Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_yaml(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
