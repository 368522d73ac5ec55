//! Lane Laps - lap and finish-point calculator for a standard running track
//!
//! Core modules:
//! - `geometry`: Lane perimeter, lap/remainder and finish-position arithmetic
//! - `oval`: Stadium-shape parametrization and its pointer inverse
//! - `snapshot`: Recompute every derived value from one input snapshot
//! - `diagram`: Schematic of the track with start/finish markers (SVG)
//! - `settings`: Input snapshot with defaults and JSON persistence

pub mod diagram;
pub mod error;
pub mod geometry;
pub mod oval;
pub mod settings;
pub mod snapshot;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::{CalcError, Result};
pub use geometry::{LaneMetrics, RaceConfig};
pub use oval::{LaneShape, OvalGeometry, Segment};
pub use settings::Settings;
pub use snapshot::RaceSnapshot;

/// Calculator configuration constants
pub mod consts {
    /// Diagram view box (local coordinate space of the oval)
    pub const VIEW_WIDTH: f64 = 500.0;
    pub const VIEW_HEIGHT: f64 = 280.0;

    /// Lane 1 boundary shape, in diagram units
    pub const BASE_WIDTH: f64 = 240.0;
    pub const BASE_HEIGHT: f64 = 110.0;
    /// Radial spacing between drawn lanes, in diagram units
    pub const LANE_GAP: f64 = 8.0;
    /// Lanes on a standard track
    pub const LANE_COUNT: u32 = 8;

    /// Default inputs
    pub const DEFAULT_TOTAL_DISTANCE: f64 = 5000.0;
    pub const DEFAULT_REFERENCE_LENGTH: f64 = 400.0;
    pub const DEFAULT_LANE: u32 = 1;
    /// Standard lane width (m)
    pub const DEFAULT_LANE_WIDTH: f64 = 1.22;
    /// Start of the left curve
    pub const DEFAULT_START: f64 = 0.25;
}

/// Wrap a value into [0, 1)
#[inline]
pub fn wrap_unit(value: f64) -> f64 {
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_unit() {
        assert_eq!(wrap_unit(0.0), 0.0);
        assert_eq!(wrap_unit(1.0), 0.0);
        assert!((wrap_unit(1.75) - 0.75).abs() < 1e-12);
        assert!((wrap_unit(-0.25) - 0.75).abs() < 1e-12);
        assert!(wrap_unit(-1e-18) < 1.0);
    }
}
