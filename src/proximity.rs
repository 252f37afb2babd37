// proximity.rs
use crate::config;

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// The UEA Broad, the fixed point the gate measures from.
    pub const fn reference() -> Self {
        Self::new(config::REFERENCE_LAT, config::REFERENCE_LON)
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    /// Parses `"lat,lon"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s.split_once(',').ok_or_else(|| format!("expected LAT,LON, got {s:?}"))?;
        let latitude = lat.trim().parse::<f64>().map_err(|e| format!("bad latitude {lat:?}: {e}"))?;
        let longitude = lon.trim().parse::<f64>().map_err(|e| format!("bad longitude {lon:?}: {e}"))?;
        Ok(Self::new(latitude, longitude))
    }
}

/// Which longitude delta the haversine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HaversineMode {
    /// `lon2 - lon1`
    #[default]
    Corrected,
    /// `lat2 - lon1`, as the first web release computed it. Kept for comparison runs.
    Legacy,
}

/// Great-circle distance in metres from `from` to `to`.
pub fn distance_in_meters(from: Position, to: Position, mode: HaversineMode) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = match mode {
        HaversineMode::Corrected => (to.longitude - from.longitude).to_radians(),
        HaversineMode::Legacy => (to.latitude - from.longitude).to_radians(),
    };

    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos() * to.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    config::EARTH_RADIUS_M * c
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Near,
    Mid,
    Far,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
}

impl Zone {
    /// Near and Far both reveal the trails; only the middle band hides them.
    pub fn visibility(self) -> Visibility {
        match self {
            Zone::Near | Zone::Far => Visibility::Shown,
            Zone::Mid => Visibility::Hidden,
        }
    }
}

pub fn classify(distance_m: f64) -> Zone {
    if distance_m <= config::NEAR_LIMIT {
        Zone::Near
    } else if distance_m <= config::MID_LIMIT {
        Zone::Mid
    } else {
        Zone::Far
    }
}
