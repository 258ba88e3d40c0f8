//! Open-loop maneuvers

use std::time::Duration;

/// What a maneuver does with the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManeuverKind {
    /// Steer to an angle, hold, return to straight. Drive keeps running.
    SteerArc,
    /// Stop, lower the probe, settle, vote on the color, raise the probe
    ProbeInspect,
    /// Steer into the lot, creep forward, stop and straighten
    ParkSequence,
}

/// A fixed-angle, fixed-duration action. Runs to completion once started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Maneuver {
    pub kind: ManeuverKind,
    pub steer_angle_deg: i32,
    pub hold: Duration,
}

impl Maneuver {
    pub fn steer_arc(steer_angle_deg: i32, hold: Duration) -> Self {
        Maneuver {
            kind: ManeuverKind::SteerArc,
            steer_angle_deg,
            hold,
        }
    }

    /// `settle` is the pause between lowering the probe and sampling
    pub fn probe_inspect(settle: Duration) -> Self {
        Maneuver {
            kind: ManeuverKind::ProbeInspect,
            steer_angle_deg: 0,
            hold: settle,
        }
    }

    pub fn park(steer_angle_deg: i32, hold: Duration) -> Self {
        Maneuver {
            kind: ManeuverKind::ParkSequence,
            steer_angle_deg,
            hold,
        }
    }
}
