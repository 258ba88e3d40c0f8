//! Lap counting with marker cooldown

use crate::common::types::Millis;

/// Laps counted so far. Reset only by constructing a new value at start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LapState {
    pub laps_completed: u32,
    /// `None` until the first marker is accepted
    pub last_lap_marker_time_ms: Option<Millis>,
}

impl LapState {
    pub fn new() -> Self {
        LapState::default()
    }

    /// Count a marker sighting at `now_ms` unless it falls within
    /// `cooldown_ms` of the last accepted one. Returns whether it counted.
    pub fn register_marker(&mut self, now_ms: Millis, cooldown_ms: Millis) -> bool {
        let cooled_down = self
            .last_lap_marker_time_ms
            .map_or(true, |last| now_ms.saturating_sub(last) > cooldown_ms);
        if cooled_down {
            self.laps_completed += 1;
            self.last_lap_marker_time_ms = Some(now_ms);
        }
        cooled_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_marker_always_counts() {
        let mut laps = LapState::new();
        assert!(laps.register_marker(0, 2000));
        assert_eq!(laps.laps_completed, 1);
        assert_eq!(laps.last_lap_marker_time_ms, Some(0));
    }

    #[test]
    fn markers_within_cooldown_count_once() {
        let mut laps = LapState::new();
        assert!(laps.register_marker(1000, 2000));
        assert!(!laps.register_marker(1500, 2000));
        assert_eq!(laps.laps_completed, 1);
        assert_eq!(laps.last_lap_marker_time_ms, Some(1000));
    }

    #[test]
    fn cooldown_boundary_is_exclusive() {
        let mut laps = LapState::new();
        assert!(laps.register_marker(1000, 2000));
        assert!(!laps.register_marker(3000, 2000));
        assert!(laps.register_marker(3001, 2000));
        assert_eq!(laps.laps_completed, 2);
    }

    #[test]
    fn rejected_sighting_does_not_extend_cooldown() {
        let mut laps = LapState::new();
        laps.register_marker(0, 2000);
        laps.register_marker(1900, 2000);
        assert!(laps.register_marker(2100, 2000));
    }
}
