//! Lane Laps entry point
//!
//! Native: command-line calculator. WASM: exports live in `lane_laps::wasm`.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::DVec2;

    use lane_laps::diagram::TrackDiagram;
    use lane_laps::{CalcError, OvalGeometry, RaceSnapshot, Result, Settings};

    /// Laps, lane perimeter and finish point for a race on a standard track
    #[derive(Debug, Parser)]
    #[command(name = "lane-laps", version, about)]
    pub struct Args {
        /// JSON settings file to start from
        #[arg(long)]
        pub config: Option<PathBuf>,

        /// Total race distance (m)
        #[arg(long, short = 'd')]
        pub distance: Option<f64>,

        /// Length of lane 1 (m)
        #[arg(long, short = 't')]
        pub track_length: Option<f64>,

        /// Running lane, 1-based
        #[arg(long, short = 'l')]
        pub lane: Option<u32>,

        /// Lane width (m)
        #[arg(long, short = 'w')]
        pub lane_width: Option<f64>,

        /// Normalized start position, 0 to 1
        #[arg(long, short = 's', allow_negative_numbers = true)]
        pub start: Option<f64>,

        /// Set the start from a diagram point, as X,Y
        #[arg(long, value_parser = parse_point, allow_negative_numbers = true)]
        pub click: Option<DVec2>,

        /// Write the track diagram as SVG
        #[arg(long)]
        pub svg: Option<PathBuf>,

        /// Save the resulting settings as JSON
        #[arg(long)]
        pub save: Option<PathBuf>,

        /// Print the snapshot as JSON instead of text
        #[arg(long)]
        pub json: bool,
    }

    fn parse_point(s: &str) -> std::result::Result<DVec2, String> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
        let x: f64 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
        let y: f64 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
        Ok(DVec2::new(x, y))
    }

    impl Args {
        /// Settings file first, then flags on top
        pub fn settings(&self) -> Result<Settings> {
            let mut settings = match &self.config {
                Some(path) => Settings::load(path)?,
                None => Settings::default(),
            };
            if let Some(distance) = self.distance {
                settings.total_distance = distance;
            }
            if let Some(length) = self.track_length {
                settings.reference_length = length;
            }
            if let Some(lane) = self.lane {
                settings.lane = lane;
            }
            if let Some(width) = self.lane_width {
                settings.lane_width = width;
            }
            if let Some(start) = self.start {
                settings.set_start(start)?;
            }
            Ok(settings)
        }
    }

    pub fn run(args: Args) -> Result<()> {
        let oval = OvalGeometry::default();
        let mut settings = args.settings()?;

        if let Some(point) = args.click {
            settings.start_from_pointer(point, &oval)?;
        }

        let snapshot = RaceSnapshot::compute_with(&settings, &oval)?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        } else {
            println!("{}", snapshot.summary());
        }

        if let Some(path) = &args.svg {
            let diagram = TrackDiagram::build(&snapshot, &oval)?;
            std::fs::write(path, diagram.to_svg())?;
            log::info!("Diagram written to {}", path.display());
        }

        if let Some(path) = &args.save {
            settings.save(path)?;
        }

        Ok(())
    }

    pub fn report(err: &CalcError) {
        log::error!("{}", err);
        eprintln!("error: {err}");
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_point() {
            assert_eq!(parse_point("12.5, -3").unwrap(), DVec2::new(12.5, -3.0));
            assert!(parse_point("12.5").is_err());
            assert!(parse_point("a,b").is_err());
        }

        #[test]
        fn test_flags_override_defaults() {
            let args = Args::parse_from(["lane-laps", "--lane", "4", "-d", "10000", "--start", "1.5"]);
            let settings = args.settings().unwrap();
            assert_eq!(settings.lane, 4);
            assert_eq!(settings.total_distance, 10000.0);
            assert_eq!(settings.reference_length, 400.0);
            assert!((settings.start_position - 0.5).abs() < 1e-12);
        }

        #[test]
        fn test_click_flag() {
            let args = Args::parse_from(["lane-laps", "--click", "250,-40"]);
            assert_eq!(args.click, Some(DVec2::new(250.0, -40.0)));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::debug!("Lane Laps (native) starting...");

    if let Err(err) = cli::run(cli::Args::parse()) {
        cli::report(&err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm::start, this is just to satisfy the compiler
}
