//! # Engine Settings
//!
//! Caller preferences that apply across sections: the display unit system,
//! whether exterior girders drop their outer shear-key block-out, and the
//! default strand limits. Stored as JSON; any field left out takes its
//! default.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::settings::EngineSettings;
//! use girder_core::units::UnitSystem;
//!
//! let settings = EngineSettings::from_json(r#"{ "unit_system": "Si" }"#).unwrap();
//! assert_eq!(settings.unit_system, UnitSystem::Si);
//! assert!(settings.exclude_exterior_shear_keys);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{SectionError, SectionResult};
use crate::file_io::read_text;
use crate::section::StrandLimits;
use crate::units::UnitSystem;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub unit_system: UnitSystem,
    /// Exterior girders of a group are built without their outside block-out
    pub exclude_exterior_shear_keys: bool,
    pub strand_limits: StrandLimits,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            unit_system: UnitSystem::default(),
            exclude_exterior_shear_keys: true,
            strand_limits: StrandLimits::default(),
        }
    }
}

impl EngineSettings {
    pub fn from_json(json: &str) -> SectionResult<Self> {
        serde_json::from_str(json).map_err(|e| SectionError::invalid_file_format("EngineSettings", e.to_string()))
    }

    pub fn with_unit_system(mut self, unit_system: UnitSystem) -> Self {
        self.unit_system = unit_system;
        self
    }
}

/// Load settings from a JSON file.
pub fn load_settings(path: &Path) -> SectionResult<EngineSettings> {
    let contents = read_text(path)?;
    let settings = EngineSettings::from_json(&contents)?;
    log::debug!("loaded settings from {} ({})", path.display(), settings.unit_system);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{BeamFace, FaceLimit};
    use crate::units::inches;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_object_gives_defaults() {
        let settings = EngineSettings::from_json("{}").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.unit_system, UnitSystem::Us);
    }

    #[test]
    fn test_partial_strand_limits() {
        let json = r#"{
            "exclude_exterior_shear_keys": false,
            "strand_limits": {
                "end_top": { "face": "Top", "limit": 0.1 },
                "end_bottom": { "face": "Bottom", "limit": 0.05 },
                "harp_top": { "face": "Top", "limit": 0.1 },
                "harp_bottom": { "face": "Bottom", "limit": 0.05 },
                "end_increment": 0.05,
                "harp_increment": -1.0
            }
        }"#;
        let settings = EngineSettings::from_json(json).unwrap();
        assert!(!settings.exclude_exterior_shear_keys);
        assert_eq!(settings.strand_limits.end_top, FaceLimit::new(BeamFace::Top, 0.1));
        assert_relative_eq!(settings.strand_limits.end_increment, 0.05);
    }

    #[test]
    fn test_default_limits_are_two_inches() {
        let limits = EngineSettings::default().strand_limits;
        assert_relative_eq!(limits.harp_bottom.limit, inches(2.0), epsilon = 1e-12);
        assert_eq!(limits.harp_bottom.face, BeamFace::Bottom);
    }

    #[test]
    fn test_bad_json_rejected() {
        let err = EngineSettings::from_json("{ \"unit_system\": \"Imperial\" }").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_FILE_FORMAT");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("girder_core_test_settings.json");
        std::fs::write(&path, r#"{ "unit_system": "Si" }"#).unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.unit_system, UnitSystem::Si);
        let _ = std::fs::remove_file(&path);
    }
}
