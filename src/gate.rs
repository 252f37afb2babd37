// gate.rs
use crate::location::{LocationProvider, LocationResult};
use crate::proximity::{classify, distance_in_meters, HaversineMode, Position, Visibility, Zone};

/// What one gate check decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateOutcome {
    /// `None` when no fix was available.
    pub distance_m: Option<f64>,
    pub zone: Option<Zone>,
    pub visibility: Visibility,
}

impl GateOutcome {
    fn fail_open() -> Self {
        Self { distance_m: None, zone: None, visibility: Visibility::Shown }
    }
}

/// Decides trail visibility from a single position reading at startup.
#[derive(Debug, Clone, Copy)]
pub struct ProximityGate {
    reference: Position,
    mode: HaversineMode,
}

impl ProximityGate {
    pub fn new(reference: Position, mode: HaversineMode) -> Self {
        Self { reference, mode }
    }

    pub fn evaluate(&self, fix: LocationResult) -> GateOutcome {
        match fix {
            Ok(pos) => {
                let dist = distance_in_meters(pos, self.reference, self.mode);
                let zone = classify(dist);
                log::info!("Distance from Broad: {:.1} m ({:?})", dist, zone);
                GateOutcome { distance_m: Some(dist), zone: Some(zone), visibility: zone.visibility() }
            }
            Err(e) => {
                log::warn!("GPS error: {}", e);
                GateOutcome::fail_open()
            }
        }
    }

    /// Issues one position request and reports the outcome, if one ever arrives.
    pub fn check<P, F>(&self, provider: &P, on_outcome: F)
    where
        P: LocationProvider,
        F: FnOnce(GateOutcome) + Send + 'static,
    {
        let gate = *self;
        provider.current_position(move |fix| on_outcome(gate.evaluate(fix)));
    }
}

impl Default for ProximityGate {
    fn default() -> Self {
        Self::new(Position::reference(), HaversineMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::location::{FixedLocation, LocationError, NoLocation};
    use std::sync::mpsc;

    fn offset_north(m: f64) -> Position {
        // ~111.195 km per degree of latitude on the 6371 km sphere
        Position::new(config::REFERENCE_LAT + m / 111_194.93, config::REFERENCE_LON)
    }

    #[test]
    fn near_mid_far_visibility() {
        let gate = ProximityGate::default();
        assert_eq!(gate.evaluate(Ok(offset_north(500.0))).visibility, Visibility::Shown);
        let mid = gate.evaluate(Ok(offset_north(2500.0)));
        assert_eq!(mid.zone, Some(Zone::Mid));
        assert_eq!(mid.visibility, Visibility::Hidden);
        let far = gate.evaluate(Ok(offset_north(50_000.0)));
        assert_eq!(far.zone, Some(Zone::Far));
        assert_eq!(far.visibility, Visibility::Shown);
    }

    #[test]
    fn errors_fail_open() {
        let gate = ProximityGate::default();
        for e in [
            LocationError::Unavailable,
            LocationError::PermissionDenied,
            LocationError::PositionUnavailable("timeout".into()),
        ] {
            let out = gate.evaluate(Err(e));
            assert_eq!(out.visibility, Visibility::Shown);
            assert_eq!(out.distance_m, None);
        }
    }

    #[test]
    fn legacy_measures_from_the_user() {
        // dLon = BROAD_LAT - userLon, worked by hand for a user at 52.63, 1.25
        let gate = ProximityGate::new(Position::reference(), HaversineMode::Legacy);
        let out = gate.evaluate(Ok(Position::new(52.63, 1.25)));
        let d = out.distance_m.unwrap();
        assert!((d - 3_392_409.4).abs() < 1.0, "{d}");
        assert_eq!(out.zone, Some(Zone::Far));

        // Swapping the endpoints would give ~3 393 469 m
        let user = Position::new(52.63, 1.25);
        let swapped = distance_in_meters(Position::reference(), user, HaversineMode::Legacy);
        assert!((swapped - d).abs() > 1000.0);
    }

    #[test]
    fn check_without_capability_shows_trails() {
        let (tx, rx) = mpsc::channel();
        ProximityGate::default().check(&NoLocation, move |o| { let _ = tx.send(o); });
        assert_eq!(rx.recv().unwrap().visibility, Visibility::Shown);
    }

    #[test]
    fn check_uses_one_shot_fix() {
        let (tx, rx) = mpsc::channel();
        let provider = FixedLocation(offset_north(2000.0));
        ProximityGate::default().check(&provider, move |o| { let _ = tx.send(o); });
        let out = rx.recv().unwrap();
        assert_eq!(out.zone, Some(Zone::Mid));
        assert!(rx.try_recv().is_err());
    }
}
