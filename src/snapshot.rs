//! Full recompute of every derived value
//!
//! Callers rebuild a snapshot whenever any input changes. Nothing is cached
//! between calls and nothing is updated incrementally.

use glam::DVec2;
use serde::Serialize;

use crate::error::Result;
use crate::geometry::{LaneMetrics, RaceConfig, finish_position};
use crate::oval::{OvalGeometry, Segment};
use crate::settings::Settings;
use crate::wrap_unit;

/// Where a marker sits on the diagram
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackMarker {
    /// Normalized progress in [0, 1)
    pub progress: f64,
    pub point: DVec2,
    pub segment: Segment,
}

/// Everything derived from one `Settings`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RaceSnapshot {
    pub config: RaceConfig,
    pub metrics: LaneMetrics,
    /// Extra length per lap over lane 1 (m)
    pub extra_distance: f64,
    /// Lane 1 length as a share of this lane's circuit
    pub reference_share: f64,
    pub start: TrackMarker,
    pub finish: TrackMarker,
}

impl RaceSnapshot {
    /// Compute against the standard diagram oval
    pub fn compute(settings: &Settings) -> Result<Self> {
        Self::compute_with(settings, &OvalGeometry::default())
    }

    pub fn compute_with(settings: &Settings, oval: &OvalGeometry) -> Result<Self> {
        settings.validate()?;
        oval.validate()?;
        let config = settings.config();
        let metrics = config.metrics()?;

        let start = wrap_unit(settings.start_position);
        let finish = finish_position(
            start,
            metrics.remainder_distance,
            metrics.effective_perimeter,
        )?;

        let shape = oval.lane_shape(config.lane)?;
        let marker = |progress: f64| TrackMarker {
            progress,
            point: shape.point_at(progress),
            segment: Segment::at(progress),
        };

        let snapshot = Self {
            config,
            metrics,
            extra_distance: config.extra_distance()?,
            reference_share: config.reference_share()?,
            start: marker(start),
            finish: marker(finish),
        };

        log::debug!(
            "Lane {}: perimeter {:.2} m, {:.2} laps ({} + {:.1} m), finish {:.3}",
            config.lane,
            metrics.effective_perimeter,
            metrics.total_laps,
            metrics.full_laps,
            metrics.remainder_distance,
            finish
        );

        Ok(snapshot)
    }

    /// Human-readable summary, figures rounded like the calculator shows them
    pub fn summary(&self) -> String {
        format!(
            "Lane {lane} perimeter: {perimeter:.2} m (+{extra:.2} m per lap)\n\
             Total laps: {laps:.2} ({full} laps + {rest:.1} m)\n\
             Start: {start:.0}% ({start_seg})\n\
             Finish: {finish:.0}% ({finish_seg})",
            lane = self.config.lane,
            perimeter = self.metrics.effective_perimeter,
            extra = self.extra_distance,
            laps = self.metrics.total_laps,
            full = self.metrics.full_laps,
            rest = self.metrics.remainder_distance,
            start = self.start.progress * 100.0,
            start_seg = self.start.segment,
            finish = self.finish.progress * 100.0,
            finish_seg = self.finish.segment,
        )
    }

    /// Start and finish points as a pair, for renderers
    pub fn marker_points(&self) -> (DVec2, DVec2) {
        (self.start.point, self.finish.point)
    }
}
