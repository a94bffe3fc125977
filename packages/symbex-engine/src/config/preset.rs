//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI/CD: small per-check budget
    ///
    /// - Solver: 200ms, 10k search nodes, integer window ±4
    Fast,

    /// Development: default budget
    ///
    /// - Solver: 2s, 200k search nodes, integer window ±8
    Balanced,

    /// Audit: large budget for arithmetic-heavy functions
    ///
    /// - Solver: 30s, 5M search nodes, integer window ±32
    Thorough,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trip_names() {
        for preset in [Preset::Fast, Preset::Balanced, Preset::Thorough] {
            assert_eq!(Preset::from_str(preset.as_str()).unwrap(), preset);
        }
        assert_eq!(Preset::from_str("FAST").unwrap(), Preset::Fast);
    }

    #[test]
    fn test_unknown_preset() {
        let err = Preset::from_str("turbo").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPreset(ref name) if name == "turbo"));
    }
}
