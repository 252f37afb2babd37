// marker.rs
use crate::location::LocationResult;
use crate::proximity::Position;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerChange {
    Placed(Position),
    Moved(Position),
    Unchanged,
}

/// "You are here" marker fed by the continuous watch. Never consulted by the gate.
#[derive(Debug, Default)]
pub struct LiveMarker {
    position: Option<Position>,
}

impl LiveMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn update(&mut self, fix: LocationResult) -> MarkerChange {
        match fix {
            Ok(pos) => {
                let change = if self.position.is_none() { MarkerChange::Placed(pos) } else { MarkerChange::Moved(pos) };
                self.position = Some(pos);
                change
            }
            Err(e) => {
                log::error!("GPS error: {}", e);
                MarkerChange::Unchanged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationError;

    #[test]
    fn placed_then_moved() {
        let mut m = LiveMarker::new();
        assert_eq!(m.position(), None);
        let a = Position::new(52.62, 1.24);
        let b = Position::new(52.63, 1.25);
        assert_eq!(m.update(Ok(a)), MarkerChange::Placed(a));
        assert_eq!(m.update(Ok(b)), MarkerChange::Moved(b));
        assert_eq!(m.position(), Some(b));
    }

    #[test]
    fn errors_leave_marker_alone() {
        let mut m = LiveMarker::new();
        assert_eq!(m.update(Err(LocationError::PermissionDenied)), MarkerChange::Unchanged);
        assert_eq!(m.position(), None);

        let a = Position::new(52.62, 1.24);
        m.update(Ok(a));
        assert_eq!(m.update(Err(LocationError::Unavailable)), MarkerChange::Unchanged);
        assert_eq!(m.position(), Some(a));
    }
}
