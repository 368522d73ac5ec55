//! Track schematic
//!
//! Builds a flat scene (running surface, infield, lane outlines, start and
//! finish markers) in diagram-local coordinates, and writes it as SVG.

use glam::DVec2;
use serde::Serialize;
use std::fmt::Write;

use crate::consts::LANE_COUNT;
use crate::error::Result;
use crate::oval::{LaneShape, OvalGeometry};
use crate::snapshot::RaceSnapshot;

const SURFACE_FILL: &str = "#c25141";
const INFIELD_FILL: &str = "#10b981";
const SELECTED_STROKE: &str = "#facc15";
const LANE_STROKE: &str = "rgba(255,255,255,0.25)";
const BACKGROUND_FILL: &str = "#f1f5f9";

/// Marker glyphs are drawn from this offset relative to their anchor
const MARKER_OFFSET: DVec2 = DVec2::new(-10.0, -20.0);

/// Axis-aligned rectangle with fully rounded short sides
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoundedRect {
    pub origin: DVec2,
    pub size: DVec2,
    /// Corner radius, half the height for a stadium
    pub corner: f64,
}

impl RoundedRect {
    /// Stadium centered on `center`
    pub fn stadium(center: DVec2, width: f64, height: f64) -> Self {
        Self {
            origin: center - DVec2::new(width, height) / 2.0,
            size: DVec2::new(width, height),
            corner: height / 2.0,
        }
    }

    fn from_lane(shape: &LaneShape) -> Self {
        Self {
            origin: shape.top_left(),
            size: DVec2::new(shape.width, shape.height),
            corner: shape.radius,
        }
    }
}

/// Outline of one lane boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaneOutline {
    pub lane: u32,
    pub rect: RoundedRect,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerKind {
    Start,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    /// Point on the lane boundary the glyph points at
    pub anchor: DVec2,
    pub progress: f64,
}

/// Complete schematic for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackDiagram {
    pub view_size: DVec2,
    pub surface: RoundedRect,
    pub infield: RoundedRect,
    pub lanes: Vec<LaneOutline>,
    pub markers: [Marker; 2],
}

impl TrackDiagram {
    pub fn build(snapshot: &RaceSnapshot, oval: &OvalGeometry) -> Result<Self> {
        oval.validate()?;
        let center = oval.center();
        let selected = snapshot.config.lane;
        // Standard lanes, plus the selected one when it lies outside them
        let drawn_lanes = (1..=LANE_COUNT).chain((selected > LANE_COUNT).then_some(selected));

        let inflate = 2.0 * f64::from(LANE_COUNT) * oval.lane_gap;
        let surface = RoundedRect::stadium(
            center,
            oval.base_width + inflate,
            oval.base_height + inflate,
        );
        let infield = RoundedRect::stadium(center, oval.base_width, oval.base_height);

        let lanes = drawn_lanes
            .map(|lane| {
                oval.lane_shape(lane).map(|shape| LaneOutline {
                    lane,
                    rect: RoundedRect::from_lane(&shape),
                    selected: lane == selected,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let (start, finish) = snapshot.marker_points();
        let markers = [
            Marker {
                kind: MarkerKind::Start,
                anchor: start,
                progress: snapshot.start.progress,
            },
            Marker {
                kind: MarkerKind::Finish,
                anchor: finish,
                progress: snapshot.finish.progress,
            },
        ];

        Ok(Self {
            view_size: oval.view_size,
            surface,
            infield,
            lanes,
            markers,
        })
    }

    pub fn selected_lane(&self) -> Option<&LaneOutline> {
        self.lanes.iter().find(|l| l.selected)
    }

    /// Standalone SVG document
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(4096);
        // Writing into a String cannot fail
        let _ = self.write_svg(&mut svg);
        svg
    }

    fn write_svg(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" preserveAspectRatio="xMidYMid meet">"#,
            fmt_num(self.view_size.x),
            fmt_num(self.view_size.y)
        )?;
        writeln!(
            out,
            r#"  <rect width="100%" height="100%" fill="{BACKGROUND_FILL}" />"#
        )?;
        write_rect(out, &self.surface, &format!(r#"fill="{SURFACE_FILL}""#))?;
        write_rect(out, &self.infield, &format!(r#"fill="{INFIELD_FILL}""#))?;

        for lane in &self.lanes {
            let (stroke, width) = if lane.selected {
                (SELECTED_STROKE, 4)
            } else {
                (LANE_STROKE, 1)
            };
            write_rect(
                out,
                &lane.rect,
                &format!(r#"fill="none" stroke="{stroke}" stroke-width="{width}""#),
            )?;
        }

        for marker in &self.markers {
            let origin = marker.anchor + MARKER_OFFSET;
            writeln!(
                out,
                r#"  <g transform="translate({}, {})">"#,
                fmt_num(origin.x),
                fmt_num(origin.y)
            )?;
            match marker.kind {
                MarkerKind::Start => writeln!(
                    out,
                    r##"    <path d="M4 21v-17l11 4-11 4" stroke="white" stroke-width="2.5" stroke-linecap="round" stroke-linejoin="round" fill="#facc15" />"##
                )?,
                MarkerKind::Finish => {
                    writeln!(
                        out,
                        r#"    <circle cx="10" cy="10" r="8" fill="black" stroke="white" stroke-width="1.5" />"#
                    )?;
                    writeln!(
                        out,
                        r#"    <path d="M7 10l2 2 4-4" stroke="white" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" fill="none" />"#
                    )?;
                }
            }
            writeln!(out, "  </g>")?;
        }

        writeln!(out, "</svg>")
    }
}

fn write_rect(out: &mut String, rect: &RoundedRect, paint: &str) -> std::fmt::Result {
    writeln!(
        out,
        r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="{}" {} />"#,
        fmt_num(rect.origin.x),
        fmt_num(rect.origin.y),
        fmt_num(rect.size.x),
        fmt_num(rect.size.y),
        fmt_num(rect.corner),
        paint
    )
}

/// Two decimals, trailing zeros dropped
fn fmt_num(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
