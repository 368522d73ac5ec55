//! Calculator inputs
//!
//! One snapshot of everything the user can change. Derived values are never
//! stored here; see `snapshot` for the recompute step.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_LANE, DEFAULT_LANE_WIDTH, DEFAULT_REFERENCE_LENGTH, DEFAULT_START,
    DEFAULT_TOTAL_DISTANCE,
};
use crate::error::{CalcError, Result};
use crate::geometry::RaceConfig;
use crate::oval::OvalGeometry;
use crate::wrap_unit;

/// User-adjustable inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Distance to run (m)
    pub total_distance: f64,
    /// Length of lane 1 (m)
    pub reference_length: f64,
    /// Running lane, 1-based
    pub lane: u32,
    /// Lane width (m)
    pub lane_width: f64,
    /// Normalized start location, wraps modulo 1
    pub start_position: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_distance: DEFAULT_TOTAL_DISTANCE,
            reference_length: DEFAULT_REFERENCE_LENGTH,
            lane: DEFAULT_LANE,
            lane_width: DEFAULT_LANE_WIDTH,
            start_position: DEFAULT_START,
        }
    }
}

impl Settings {
    pub fn config(&self) -> RaceConfig {
        RaceConfig::new(
            self.total_distance,
            self.reference_length,
            self.lane,
            self.lane_width,
        )
    }

    pub fn validate(&self) -> Result<()> {
        CalcError::require_finite("start position", self.start_position)?;
        self.config().validate().inspect_err(|e| {
            log::warn!("Rejected settings: {}", e);
        })
    }

    /// Set the start location (wrapped into [0, 1))
    pub fn set_start(&mut self, start_position: f64) -> Result<()> {
        let start = CalcError::require_finite("start position", start_position)?;
        self.start_position = wrap_unit(start);
        Ok(())
    }

    /// Move the start to where a pointer lands on the current lane
    ///
    /// `point` must already be in diagram-local coordinates.
    pub fn start_from_pointer(&mut self, point: DVec2, oval: &OvalGeometry) -> Result<f64> {
        let progress = oval.inverse(point, self.lane)?;
        log::debug!(
            "Pointer ({:.1}, {:.1}) -> start {:.3}",
            point.x,
            point.y,
            progress
        );
        self.start_position = progress;
        Ok(progress)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file, defaults when the file does not exist
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
