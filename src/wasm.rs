//! Browser bindings
//!
//! The page owns inputs and rendering. It passes the current settings as
//! JSON and gets a full snapshot (or the SVG diagram) back. Pointer events
//! must already be converted to diagram-local coordinates.

use glam::DVec2;
use wasm_bindgen::prelude::*;

use crate::diagram::TrackDiagram;
use crate::error::{CalcError, Result};
use crate::oval::OvalGeometry;
use crate::settings::Settings;
use crate::snapshot::RaceSnapshot;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) only fails to replace the logger
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Lane Laps starting...");
}

fn to_js(err: CalcError) -> JsValue {
    log::warn!("{}", err);
    JsValue::from_str(&err.to_string())
}

fn snapshot_json(settings: &Settings) -> Result<String> {
    let snapshot = RaceSnapshot::compute(settings)?;
    Ok(serde_json::to_string(&snapshot)?)
}

/// Recompute everything for a settings JSON document
#[wasm_bindgen]
pub fn compute(settings_json: &str) -> std::result::Result<String, JsValue> {
    Settings::from_json(settings_json)
        .and_then(|settings| snapshot_json(&settings))
        .map_err(to_js)
}

/// Apply a click on the diagram and return the updated settings JSON
#[wasm_bindgen]
pub fn click(settings_json: &str, x: f64, y: f64) -> std::result::Result<String, JsValue> {
    let run = || -> Result<String> {
        let mut settings = Settings::from_json(settings_json)?;
        settings.start_from_pointer(DVec2::new(x, y), &OvalGeometry::default())?;
        settings.to_json()
    };
    run().map_err(to_js)
}

/// SVG markup of the track diagram
#[wasm_bindgen]
pub fn diagram_svg(settings_json: &str) -> std::result::Result<String, JsValue> {
    let run = || -> Result<String> {
        let settings = Settings::from_json(settings_json)?;
        let oval = OvalGeometry::default();
        let snapshot = RaceSnapshot::compute_with(&settings, &oval)?;
        Ok(TrackDiagram::build(&snapshot, &oval)?.to_svg())
    };
    run().map_err(to_js)
}

/// Default settings, for initializing the page
#[wasm_bindgen]
pub fn default_settings() -> String {
    Settings::default().to_json().unwrap_or_default()
}
