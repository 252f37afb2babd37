// location.rs
use std::thread;
use std::time::Duration;
use rand::Rng;
use thiserror::Error;
use crate::{config, proximity::Position};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("location capability unavailable")]
    Unavailable,
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
}

pub type LocationResult = Result<Position, LocationError>;

/// Device location capability: one-shot fixes and a continuous watch.
///
/// Answers may arrive on any thread, or never. Neither call times out or retries.
pub trait LocationProvider {
    fn current_position<F>(&self, on_fix: F)
    where F: FnOnce(LocationResult) + Send + 'static;

    fn watch<F>(&self, on_fix: F)
    where F: FnMut(LocationResult) + Send + 'static;
}

/// No location capability at all.
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn current_position<F>(&self, on_fix: F)
    where F: FnOnce(LocationResult) + Send + 'static {
        on_fix(Err(LocationError::Unavailable));
    }

    fn watch<F>(&self, mut on_fix: F)
    where F: FnMut(LocationResult) + Send + 'static {
        on_fix(Err(LocationError::Unavailable));
    }
}

/// A device that never moves.
pub struct FixedLocation(pub Position);

impl LocationProvider for FixedLocation {
    fn current_position<F>(&self, on_fix: F)
    where F: FnOnce(LocationResult) + Send + 'static {
        on_fix(Ok(self.0));
    }

    fn watch<F>(&self, mut on_fix: F)
    where F: FnMut(LocationResult) + Send + 'static {
        on_fix(Ok(self.0));
    }
}

/// Random walk from a start point, for desktops without a GPS.
pub struct SimulatedWalk {
    pub start: Position,
    pub interval: Duration,
    pub step_deg: f64,
}

impl SimulatedWalk {
    pub fn new(start: Position, interval: Duration) -> Self {
        Self { start, interval, step_deg: config::WALK_STEP_DEG }
    }
}

impl LocationProvider for SimulatedWalk {
    fn current_position<F>(&self, on_fix: F)
    where F: FnOnce(LocationResult) + Send + 'static {
        on_fix(Ok(self.start));
    }

    fn watch<F>(&self, mut on_fix: F)
    where F: FnMut(LocationResult) + Send + 'static {
        let mut pos = self.start;
        let interval = self.interval;
        let step = self.step_deg;

        // Runs for the life of the process
        let spawned = thread::Builder::new().name("simulated-walk".into()).spawn(move || {
            let mut rng = rand::thread_rng();
            loop {
                on_fix(Ok(pos));
                thread::sleep(interval);
                pos.latitude += rng.gen_range(-step..=step);
                pos.longitude += rng.gen_range(-step..=step);
            }
        });
        if let Err(e) = spawned {
            log::error!("Could not start simulated walk: {}", e);
        }
    }
}

/// Whichever provider the command line picked.
pub enum DeviceLocation {
    None(NoLocation),
    Fixed(FixedLocation),
    Walk(SimulatedWalk),
}

impl LocationProvider for DeviceLocation {
    fn current_position<F>(&self, on_fix: F)
    where F: FnOnce(LocationResult) + Send + 'static {
        match self {
            DeviceLocation::None(p) => p.current_position(on_fix),
            DeviceLocation::Fixed(p) => p.current_position(on_fix),
            DeviceLocation::Walk(p) => p.current_position(on_fix),
        }
    }

    fn watch<F>(&self, on_fix: F)
    where F: FnMut(LocationResult) + Send + 'static {
        match self {
            DeviceLocation::None(p) => p.watch(on_fix),
            DeviceLocation::Fixed(p) => p.watch(on_fix),
            DeviceLocation::Walk(p) => p.watch(on_fix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn no_location_reports_unavailable() {
        let (tx, rx) = mpsc::channel();
        NoLocation.current_position(move |r| { let _ = tx.send(r); });
        assert_eq!(rx.recv().unwrap(), Err(LocationError::Unavailable));
    }

    #[test]
    fn fixed_location_answers_both_calls() {
        let p = Position::new(52.0, 1.0);
        let provider = FixedLocation(p);
        let (tx, rx) = mpsc::channel();
        let tx2 = tx.clone();
        provider.current_position(move |r| { let _ = tx.send(r); });
        provider.watch(move |r| { let _ = tx2.send(r); });
        assert_eq!(rx.recv().unwrap(), Ok(p));
        assert_eq!(rx.recv().unwrap(), Ok(p));
    }

    #[test]
    fn simulated_walk_stays_near_start() {
        let start = Position::reference();
        let walk = SimulatedWalk::new(start, Duration::from_millis(1));
        let (tx, rx) = mpsc::channel();
        walk.watch(move |r| { let _ = tx.send(r); });

        let first = rx.recv().unwrap().unwrap();
        assert_eq!(first, start);
        for i in 1..5 {
            let p = rx.recv().unwrap().unwrap();
            let bound = walk.step_deg * i as f64 + 1e-12;
            assert!((p.latitude - start.latitude).abs() <= bound);
            assert!((p.longitude - start.longitude).abs() <= bound);
        }
    }
}
