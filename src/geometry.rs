//! Lane perimeter and lap arithmetic
//!
//! Each lane outward from lane 1 adds a ring whose extra length is the
//! circumference of a circle with radius equal to the accumulated lane width.
//! That is the usual staggered-start compensation for a stadium track.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::{CalcError, Result};
use crate::wrap_unit;

/// Numeric race inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Distance to run (m)
    pub total_distance: f64,
    /// Length of lane 1 (m)
    pub reference_length: f64,
    /// Running lane, 1-based
    pub lane: u32,
    /// Radial width added per lane (m)
    pub lane_width: f64,
}

/// Derived lap figures for one lane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneMetrics {
    /// Length of one circuit in the chosen lane (m)
    pub effective_perimeter: f64,
    /// Exact laps, `total_distance / effective_perimeter`
    pub total_laps: f64,
    /// Whole laps completed
    pub full_laps: u64,
    /// Distance left after the whole laps (m), in [0, effective_perimeter)
    pub remainder_distance: f64,
}

impl RaceConfig {
    pub fn new(total_distance: f64, reference_length: f64, lane: u32, lane_width: f64) -> Self {
        Self {
            total_distance,
            reference_length,
            lane,
            lane_width,
        }
    }

    /// Check every input without computing anything
    pub fn validate(&self) -> Result<()> {
        check_distance(self.total_distance)?;
        effective_perimeter(self.reference_length, self.lane, self.lane_width).map(|_| ())
    }

    pub fn effective_perimeter(&self) -> Result<f64> {
        effective_perimeter(self.reference_length, self.lane, self.lane_width)
    }

    pub fn metrics(&self) -> Result<LaneMetrics> {
        lap_metrics(self.total_distance, self.effective_perimeter()?)
    }

    /// Extra length per lap compared to lane 1 (m)
    pub fn extra_distance(&self) -> Result<f64> {
        Ok(self.effective_perimeter()? - self.reference_length)
    }

    /// Fraction of the lane's circuit covered by the lane 1 length, in (0, 1]
    pub fn reference_share(&self) -> Result<f64> {
        Ok(self.reference_length / self.effective_perimeter()?)
    }
}

fn check_distance(total_distance: f64) -> Result<f64> {
    if total_distance.is_finite() && total_distance >= 0.0 {
        Ok(total_distance)
    } else {
        Err(CalcError::InvalidDistance(total_distance))
    }
}

fn check_perimeter(perimeter: f64) -> Result<f64> {
    if perimeter.is_finite() && perimeter > 0.0 {
        Ok(perimeter)
    } else {
        Err(CalcError::NonPositivePerimeter(perimeter))
    }
}

/// Circuit length of `lane` given the lane 1 length and the per-lane width
///
/// Lane 1 returns `reference_length` untouched, whatever the width.
pub fn effective_perimeter(reference_length: f64, lane: u32, lane_width: f64) -> Result<f64> {
    if !(reference_length.is_finite() && reference_length > 0.0) {
        return Err(CalcError::InvalidReferenceLength(reference_length));
    }
    if lane < 1 {
        return Err(CalcError::InvalidLaneIndex(lane));
    }
    if lane == 1 {
        return Ok(reference_length);
    }
    if !(lane_width.is_finite() && lane_width >= 0.0) {
        return Err(CalcError::InvalidLaneWidth(lane_width));
    }

    let extra = TAU * lane_width * f64::from(lane - 1);
    check_perimeter(reference_length + extra)
}

/// Split a distance into whole laps and a remainder
pub fn lap_metrics(total_distance: f64, effective_perimeter: f64) -> Result<LaneMetrics> {
    let perimeter = check_perimeter(effective_perimeter)?;
    let distance = check_distance(total_distance)?;

    let total_laps = distance / perimeter;
    let mut full_laps = total_laps.floor();
    let mut remainder = distance - full_laps * perimeter;

    // Keep the remainder in [0, perimeter) despite rounding in the division
    if remainder < 0.0 {
        remainder = 0.0;
    } else if remainder >= perimeter {
        remainder -= perimeter;
        full_laps += 1.0;
    }

    // 2^64 as f64; anything at or past it saturates the cast
    if !total_laps.is_finite() || full_laps >= u64::MAX as f64 {
        return Err(CalcError::LapCountOutOfRange(total_laps));
    }

    Ok(LaneMetrics {
        effective_perimeter: perimeter,
        total_laps,
        full_laps: full_laps as u64,
        remainder_distance: remainder,
    })
}

/// Normalized finish location: start advanced by the remainder's share of a lap
pub fn finish_position(
    start_position: f64,
    remainder_distance: f64,
    effective_perimeter: f64,
) -> Result<f64> {
    let perimeter = check_perimeter(effective_perimeter)?;
    let start = CalcError::require_finite("start position", start_position)?;
    let remainder = CalcError::require_finite("remainder distance", remainder_distance)?;

    Ok(wrap_unit(start + remainder / perimeter))
}
