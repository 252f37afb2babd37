// cli.rs
use std::time::Duration;
use clap::Parser;
use crate::{
    config,
    location::{DeviceLocation, FixedLocation, NoLocation, SimulatedWalk},
    map_loader::TrailSource,
    proximity::{HaversineMode, Position},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// GeoJSON trail collection, a file path or an http(s) URL
    #[arg(long, default_value = config::MAP_FILE_PATH)]
    pub data: String,
    /// Pretend the device is at LAT,LON
    #[arg(long, value_name = "LAT,LON")]
    pub position: Option<Position>,
    /// Random-walk from --position (or the Broad) instead of standing still
    #[arg(long)]
    pub simulate: bool,
    #[arg(long, default_value_t = config::WALK_INTERVAL_MS)]
    pub walk_interval_ms: u64,
    /// Behave as if no location capability exists
    #[arg(long)]
    pub no_location: bool,
    /// Use the original longitude-delta formula for the proximity gate
    #[arg(long)]
    pub legacy_haversine: bool,
}

impl Args {
    pub fn source(&self) -> TrailSource {
        TrailSource::from_arg(&self.data)
    }

    pub fn haversine_mode(&self) -> HaversineMode {
        if self.legacy_haversine { HaversineMode::Legacy } else { HaversineMode::Corrected }
    }

    pub fn location(&self) -> DeviceLocation {
        if self.no_location {
            return DeviceLocation::None(NoLocation);
        }
        match (self.position, self.simulate) {
            (start, true) => DeviceLocation::Walk(SimulatedWalk::new(
                start.unwrap_or_else(Position::reference),
                Duration::from_millis(self.walk_interval_ms),
            )),
            (Some(p), false) => DeviceLocation::Fixed(FixedLocation(p)),
            (None, false) => DeviceLocation::None(NoLocation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["broad-trails"]);
        assert_eq!(args.source(), TrailSource::default());
        assert_eq!(args.haversine_mode(), HaversineMode::Corrected);
        assert!(matches!(args.location(), DeviceLocation::None(_)));
    }

    #[test]
    fn position_and_simulation() {
        let args = Args::parse_from(["broad-trails", "--position", "52.63,1.25"]);
        assert!(matches!(args.location(), DeviceLocation::Fixed(FixedLocation(p)) if p == Position::new(52.63, 1.25)));

        let args = Args::parse_from(["broad-trails", "--simulate", "--walk-interval-ms", "250"]);
        match args.location() {
            DeviceLocation::Walk(w) => {
                assert_eq!(w.start, Position::reference());
                assert_eq!(w.interval, Duration::from_millis(250));
            }
            _ => panic!("expected a simulated walk"),
        }
    }

    #[test]
    fn no_location_wins() {
        let args = Args::parse_from(["broad-trails", "--position", "52.63,1.25", "--simulate", "--no-location", "--legacy-haversine"]);
        assert!(matches!(args.location(), DeviceLocation::None(_)));
        assert_eq!(args.haversine_mode(), HaversineMode::Legacy);
    }

    #[test]
    fn bad_position_is_rejected() {
        assert!(Args::try_parse_from(["broad-trails", "--position", "nowhere"]).is_err());
    }
}
