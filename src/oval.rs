//! Stadium-shape track geometry
//!
//! A lane boundary is two straights joined by two semicircles. Progress in
//! [0, 1) walks the boundary in four quarters of equal *parameter* length:
//! - [0, 0.25]: top straight, right to left
//! - (0.25, 0.5]: left curve, top to bottom
//! - (0.5, 0.75]: bottom straight, left to right
//! - (0.75, 1): right curve, bottom to top
//!
//! The quarters are not equal in arc length. The start slider reads as
//! "quarter of the way around", so this stays uniform in parameter space.
//!
//! Coordinates are diagram-local with y pointing down.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::consts::{BASE_HEIGHT, BASE_WIDTH, LANE_GAP, VIEW_HEIGHT, VIEW_WIDTH};
use crate::error::{CalcError, Result};
use crate::wrap_unit;

/// Pointers closer than this to the center have no usable direction
const MIN_POINTER_DISTANCE: f64 = 1e-9;

/// One quarter of the parametrized boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    TopStraight,
    LeftCurve,
    BottomStraight,
    RightCurve,
}

impl Segment {
    pub const ALL: [Segment; 4] = [
        Segment::TopStraight,
        Segment::LeftCurve,
        Segment::BottomStraight,
        Segment::RightCurve,
    ];

    /// Segment containing a progress value (wrapped into [0, 1) first)
    pub fn at(progress: f64) -> Self {
        let p = wrap_unit(progress);
        if p <= 0.25 {
            Segment::TopStraight
        } else if p <= 0.5 {
            Segment::LeftCurve
        } else if p <= 0.75 {
            Segment::BottomStraight
        } else {
            Segment::RightCurve
        }
    }

    /// Progress where this segment begins
    pub fn start(&self) -> f64 {
        match self {
            Segment::TopStraight => 0.0,
            Segment::LeftCurve => 0.25,
            Segment::BottomStraight => 0.5,
            Segment::RightCurve => 0.75,
        }
    }

    pub fn is_curve(&self) -> bool {
        matches!(self, Segment::LeftCurve | Segment::RightCurve)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Segment::TopStraight => "Top straight start",
            Segment::LeftCurve => "Left curve",
            Segment::BottomStraight => "Bottom straight",
            Segment::RightCurve => "Right curve",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Base oval the lanes are inflated from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvalGeometry {
    /// Diagram view box size; the oval is centered in it
    pub view_size: DVec2,
    /// Lane 1 boundary width (includes both curves)
    pub base_width: f64,
    /// Lane 1 boundary height (curve diameter)
    pub base_height: f64,
    /// Offset added on every side per lane
    pub lane_gap: f64,
}

impl Default for OvalGeometry {
    fn default() -> Self {
        Self {
            view_size: DVec2::new(VIEW_WIDTH, VIEW_HEIGHT),
            base_width: BASE_WIDTH,
            base_height: BASE_HEIGHT,
            lane_gap: LANE_GAP,
        }
    }
}

/// Resolved boundary of a single lane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneShape {
    pub lane: u32,
    pub center: DVec2,
    pub width: f64,
    pub height: f64,
    /// Curve radius, `height / 2`
    pub radius: f64,
    /// Length of each straight, `width - height`
    pub straight: f64,
}

impl OvalGeometry {
    /// Custom base oval; the width must not be smaller than the height
    pub fn new(view_size: DVec2, base_width: f64, base_height: f64, lane_gap: f64) -> Result<Self> {
        let geometry = Self {
            view_size,
            base_width,
            base_height,
            lane_gap,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn validate(&self) -> Result<()> {
        CalcError::require_finite("view width", self.view_size.x)?;
        CalcError::require_finite("view height", self.view_size.y)?;
        CalcError::require_finite("base width", self.base_width)?;
        CalcError::require_finite("base height", self.base_height)?;
        CalcError::require_finite("lane gap", self.lane_gap)?;
        if self.base_height <= 0.0 {
            return Err(CalcError::InvalidOval("base height must be positive"));
        }
        if self.base_width < self.base_height {
            return Err(CalcError::InvalidOval("base width is smaller than base height"));
        }
        if self.lane_gap < 0.0 {
            return Err(CalcError::InvalidOval("lane gap is negative"));
        }
        Ok(())
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        self.view_size / 2.0
    }

    /// Boundary of `lane`, inflated by `(lane - 1) * lane_gap` on every side
    pub fn lane_shape(&self, lane: u32) -> Result<LaneShape> {
        if lane < 1 {
            return Err(CalcError::InvalidLaneIndex(lane));
        }
        let offset = f64::from(lane - 1) * self.lane_gap;
        let width = self.base_width + 2.0 * offset;
        let height = self.base_height + 2.0 * offset;

        Ok(LaneShape {
            lane,
            center: self.center(),
            width,
            height,
            radius: height / 2.0,
            straight: width - height,
        })
    }

    /// Point on the lane boundary for a normalized progress value
    pub fn forward(&self, progress: f64, lane: u32) -> Result<DVec2> {
        let progress = CalcError::require_finite("progress", progress)?;
        Ok(self.lane_shape(lane)?.point_at(progress))
    }

    /// Progress of the boundary point on the ray from the center through `point`
    pub fn inverse(&self, point: DVec2, lane: u32) -> Result<f64> {
        CalcError::require_finite("pointer x", point.x)?;
        CalcError::require_finite("pointer y", point.y)?;
        self.lane_shape(lane)?.progress_toward(point)
    }
}

impl LaneShape {
    #[inline]
    pub fn straight_half(&self) -> f64 {
        self.straight / 2.0
    }

    /// Total boundary length in diagram units
    pub fn perimeter(&self) -> f64 {
        2.0 * self.straight + 2.0 * PI * self.radius
    }

    /// Top-left corner of the bounding box
    pub fn top_left(&self) -> DVec2 {
        self.center - DVec2::new(self.width, self.height) / 2.0
    }

    /// Forward mapping; `progress` is wrapped into [0, 1)
    pub fn point_at(&self, progress: f64) -> DVec2 {
        let p = wrap_unit(progress);
        let c = self.center;
        let r = self.radius;
        let half = self.straight_half();

        match Segment::at(p) {
            Segment::TopStraight => {
                let t = p / 0.25;
                DVec2::new(c.x + half - t * self.straight, c.y - r)
            }
            Segment::LeftCurve => {
                let angle = PI * 1.5 - ((p - 0.25) / 0.25) * PI;
                DVec2::new(c.x - half + angle.cos() * r, c.y + angle.sin() * r)
            }
            Segment::BottomStraight => {
                let t = (p - 0.5) / 0.25;
                DVec2::new(c.x - half + t * self.straight, c.y + r)
            }
            Segment::RightCurve => {
                let angle = PI * 0.5 - ((p - 0.75) / 0.25) * PI;
                DVec2::new(c.x + half + angle.cos() * r, c.y + angle.sin() * r)
            }
        }
    }

    /// Inverse mapping for a pointer in diagram coordinates
    ///
    /// Not a nearest-point projection: the pointer only picks a direction
    /// from the center, and the boundary point along that direction is used.
    pub fn progress_toward(&self, point: DVec2) -> Result<f64> {
        let d = point - self.center;
        if d.length() < MIN_POINTER_DISTANCE {
            return Err(CalcError::DegeneratePointer);
        }
        let dir = d.normalize();
        let r = self.radius;
        let half = self.straight_half();

        // Rays between the center and the four straight/curve junctions
        // bound the straights
        let on_straight = half > 0.0 && dir.x.abs() * r <= half * dir.y.abs();

        let progress = if on_straight {
            if dir.y < 0.0 {
                let x = dir.x * (-r / dir.y);
                0.25 * ((half - x) / self.straight).clamp(0.0, 1.0)
            } else {
                let x = dir.x * (r / dir.y);
                0.5 + 0.25 * ((x + half) / self.straight).clamp(0.0, 1.0)
            }
        } else {
            let arc_center = DVec2::new(if dir.x < 0.0 { -half } else { half }, 0.0);
            let hit = dir * far_circle_hit(dir, arc_center, r);
            let angle = hit.y.atan2(hit.x - arc_center.x);
            if dir.x < 0.0 {
                let angle = if angle < 0.0 { angle + 2.0 * PI } else { angle };
                0.25 + (PI * 1.5 - angle) / PI * 0.25
            } else {
                0.75 + (PI * 0.5 - angle) / PI * 0.25
            }
        };

        Ok(wrap_unit(progress))
    }
}

/// Distance along unit ray `dir` from the origin to the far crossing of a circle
fn far_circle_hit(dir: DVec2, center: DVec2, radius: f64) -> f64 {
    let along = dir.dot(center);
    let disc = along * along - center.length_squared() + radius * radius;
    along + disc.max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: DVec2, b: DVec2) {
        assert!((a - b).length() < 1e-6, "{a:?} != {b:?}");
    }

    #[test]
    fn test_lane_shape_inflates() {
        let oval = OvalGeometry::default();
        let lane1 = oval.lane_shape(1).unwrap();
        assert_eq!(lane1.width, 240.0);
        assert_eq!(lane1.height, 110.0);
        assert_eq!(lane1.radius, 55.0);
        assert_eq!(lane1.straight, 130.0);

        let lane8 = oval.lane_shape(8).unwrap();
        assert_eq!(lane8.width, 240.0 + 2.0 * 7.0 * 8.0);
        assert_eq!(lane8.height, 110.0 + 2.0 * 7.0 * 8.0);
        // Straights keep their length, only the curves grow
        assert_eq!(lane8.straight, lane1.straight);

        assert_eq!(oval.lane_shape(0), Err(CalcError::InvalidLaneIndex(0)));
    }

    #[test]
    fn test_segment_corners() {
        let oval = OvalGeometry::default();
        // Lane 1: center (250, 140), half straight 65, radius 55
        assert_close(oval.forward(0.0, 1).unwrap(), DVec2::new(315.0, 85.0));
        assert_close(oval.forward(0.25, 1).unwrap(), DVec2::new(185.0, 85.0));
        assert_close(oval.forward(0.375, 1).unwrap(), DVec2::new(130.0, 140.0));
        assert_close(oval.forward(0.5, 1).unwrap(), DVec2::new(185.0, 195.0));
        assert_close(oval.forward(0.75, 1).unwrap(), DVec2::new(315.0, 195.0));
        assert_close(oval.forward(0.875, 1).unwrap(), DVec2::new(370.0, 140.0));
    }

    #[test]
    fn test_cycle_closes_at_start() {
        let oval = OvalGeometry::default();
        for lane in 1..=8 {
            let start = oval.forward(0.0, lane).unwrap();
            let end = oval.forward(1.0 - 1e-12, lane).unwrap();
            assert_close(start, end);
            // Rightmost point of the top straight
            let shape = oval.lane_shape(lane).unwrap();
            assert_eq!(start.y, shape.center.y - shape.radius);
            assert_eq!(start.x, shape.center.x + shape.straight_half());
            // Progress of exactly 1 wraps back to 0
            assert_close(oval.forward(1.0, lane).unwrap(), start);
        }
    }

    #[test]
    fn test_forward_rejects_bad_input() {
        let oval = OvalGeometry::default();
        assert!(oval.forward(f64::NAN, 1).is_err());
        assert_eq!(oval.forward(0.5, 0), Err(CalcError::InvalidLaneIndex(0)));
    }

    #[test]
    fn test_inverse_cardinal_points() {
        let oval = OvalGeometry::default();
        let c = oval.center();
        // Left of center lands mid left curve, right of center mid right curve
        let left = oval.inverse(c + DVec2::new(-200.0, 0.0), 1).unwrap();
        assert!((left - 0.375).abs() < EPS);
        let right = oval.inverse(c + DVec2::new(10.0, 0.0), 1).unwrap();
        assert!((right - 0.875).abs() < EPS);
        // Straight up is mid top straight, straight down mid bottom straight
        let up = oval.inverse(c + DVec2::new(0.0, -5.0), 3).unwrap();
        assert!((up - 0.125).abs() < EPS);
        let down = oval.inverse(c + DVec2::new(0.0, 90.0), 3).unwrap();
        assert!((down - 0.625).abs() < EPS);
    }

    #[test]
    fn test_inverse_degenerate_pointer() {
        let oval = OvalGeometry::default();
        assert_eq!(
            oval.inverse(oval.center(), 1),
            Err(CalcError::DegeneratePointer)
        );
        assert!(oval.inverse(DVec2::new(f64::NAN, 0.0), 1).is_err());
    }

    #[test]
    fn test_segment_at() {
        assert_eq!(Segment::at(0.0), Segment::TopStraight);
        assert_eq!(Segment::at(0.25), Segment::TopStraight);
        assert_eq!(Segment::at(0.3), Segment::LeftCurve);
        assert_eq!(Segment::at(0.6), Segment::BottomStraight);
        assert_eq!(Segment::at(0.99), Segment::RightCurve);
        assert_eq!(Segment::at(1.1), Segment::TopStraight);
        assert!(Segment::RightCurve.is_curve());
        assert!(!Segment::BottomStraight.is_curve());
    }

    #[test]
    fn test_geometry_validation() {
        assert!(OvalGeometry::default().validate().is_ok());
        assert!(OvalGeometry::new(DVec2::new(500.0, 280.0), 100.0, 110.0, 8.0).is_err());
        assert!(OvalGeometry::new(DVec2::new(500.0, 280.0), 240.0, 0.0, 8.0).is_err());
        // A circle is a valid degenerate stadium
        let circle = OvalGeometry::new(DVec2::new(500.0, 280.0), 110.0, 110.0, 8.0).unwrap();
        let p = circle.inverse(circle.forward(0.3, 2).unwrap(), 2).unwrap();
        assert!((p - 0.3).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_forward_continuous_at_boundaries(lane in 1u32..=8, k in 1usize..=4) {
            let oval = OvalGeometry::default();
            let boundary = k as f64 * 0.25;
            let before = oval.forward(boundary - 1e-9, lane).unwrap();
            let after = oval.forward(boundary + 1e-9, lane).unwrap();
            prop_assert!((before - after).length() < 1e-4);
        }

        #[test]
        fn prop_inverse_round_trips_on_curves(
            lane in 1u32..=8,
            t in 0.001f64..0.999,
            right in any::<bool>(),
        ) {
            let oval = OvalGeometry::default();
            let progress = if right { 0.75 + 0.25 * t } else { 0.25 + 0.25 * t };
            let point = oval.forward(progress, lane).unwrap();
            let back = oval.inverse(point, lane).unwrap();
            prop_assert!((back - progress).abs() < 1e-6, "{} -> {}", progress, back);
        }

        #[test]
        fn prop_inverse_round_trips_on_straights(
            lane in 1u32..=8,
            t in 0.001f64..0.999,
            bottom in any::<bool>(),
        ) {
            let oval = OvalGeometry::default();
            let progress = if bottom { 0.5 + 0.25 * t } else { 0.25 * t };
            let point = oval.forward(progress, lane).unwrap();
            let back = oval.inverse(point, lane).unwrap();
            prop_assert!((back - progress).abs() < 1e-6, "{} -> {}", progress, back);
        }

        #[test]
        fn prop_inverse_in_unit_range(x in -1000.0f64..1000.0, y in -1000.0f64..1000.0) {
            let oval = OvalGeometry::default();
            let point = oval.center() + DVec2::new(x, y);
            prop_assume!(DVec2::new(x, y).length() > 1e-6);
            let p = oval.inverse(point, 4).unwrap();
            prop_assert!((0.0..1.0).contains(&p));
        }
    }
}
