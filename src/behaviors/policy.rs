//! Priority-ordered reactive decision policy
//!
//! Detectors are checked in a fixed order and the first match wins:
//!
//! 1. corner with the right side open: hard right
//! 2. corner with the right side blocked: hard left (failsafe)
//! 3. right wall too near: small nudge left
//! 4. free-standing object ahead: probe it and pass on the side its color asks for
//! 5. otherwise nothing, keep cruising
//!
//! A sentinel distance is a large value, so it never satisfies a "below"
//! threshold.

use tracing::{debug, info};

use crate::common::types::DistanceReading;
use crate::config::{DistanceThresholds, SteeringConfig, TimingConfig};
use crate::control::{Maneuver, ManeuverExecutor, ManeuverOutcome};
use crate::error::HardwareError;
use crate::hardware::Hardware;
use crate::perception::{ColorClassifier, ColorLabel};

/// What the current reading looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Situation {
    CornerRightOpen,
    CornerLeftFailsafe,
    WallTooNear,
    PillarCandidate,
    NoAction,
}

/// What one policy iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyOutcome {
    pub situation: Situation,
    /// Color vote taken, for pillar candidates only
    pub verdict: Option<ColorLabel>,
}

#[derive(Debug, Clone)]
pub struct DecisionPolicy {
    thresholds: DistanceThresholds,
    steering: SteeringConfig,
    timing: TimingConfig,
}

impl DecisionPolicy {
    pub fn new(thresholds: DistanceThresholds, steering: SteeringConfig, timing: TimingConfig) -> Self {
        DecisionPolicy {
            thresholds,
            steering,
            timing,
        }
    }

    /// Classify a reading. Pure, first match wins.
    pub fn assess(&self, reading: DistanceReading) -> Situation {
        let t = &self.thresholds;
        let front_blocked = reading.front_mm < t.corner_front_mm;

        if front_blocked && reading.side_mm > t.corner_right_open_mm {
            Situation::CornerRightOpen
        } else if front_blocked && reading.side_mm < t.corner_right_tight_mm {
            Situation::CornerLeftFailsafe
        } else if reading.side_mm < t.wall_too_near_mm {
            Situation::WallTooNear
        } else if reading.front_mm < t.pillar_front_mm && reading.side_mm > t.pillar_side_clear_mm {
            Situation::PillarCandidate
        } else {
            Situation::NoAction
        }
    }

    /// The maneuver a situation calls for, if any
    pub fn maneuver_for(&self, situation: Situation) -> Option<Maneuver> {
        match situation {
            Situation::CornerRightOpen => Some(Maneuver::steer_arc(
                self.steering.right_turn_deg,
                self.timing.turn_hold(),
            )),
            Situation::CornerLeftFailsafe => Some(Maneuver::steer_arc(
                self.steering.left_turn_deg,
                self.timing.turn_hold(),
            )),
            Situation::WallTooNear => Some(Maneuver::steer_arc(
                self.steering.wall_nudge_deg,
                self.timing.wall_nudge(),
            )),
            Situation::PillarCandidate => Some(Maneuver::probe_inspect(self.timing.probe_settle())),
            Situation::NoAction => None,
        }
    }

    /// Keep left of green, right of red, straight on anything else
    pub fn sign_avoidance(&self, label: ColorLabel) -> Option<Maneuver> {
        match label {
            ColorLabel::Green => Some(Maneuver::steer_arc(
                self.steering.left_sign_deg,
                self.timing.sign_hold(),
            )),
            ColorLabel::Red => Some(Maneuver::steer_arc(
                self.steering.right_sign_deg,
                self.timing.sign_hold(),
            )),
            _ => None,
        }
    }

    /// Run one policy iteration: assess, then carry out at most one response
    pub fn step<H: Hardware>(
        &self,
        hw: &mut H,
        reading: DistanceReading,
        executor: &ManeuverExecutor,
        classifier: &ColorClassifier,
    ) -> Result<PolicyOutcome, HardwareError> {
        let situation = self.assess(reading);
        let mut verdict = None;

        if let Some(maneuver) = self.maneuver_for(situation) {
            debug!(
                "{:?} at front={}mm side={}mm",
                situation, reading.front_mm, reading.side_mm
            );
            if let ManeuverOutcome::Inspected(label) = executor.execute(hw, &maneuver, classifier)? {
                info!("Pillar ahead reads {}", label);
                if let Some(avoid) = self.sign_avoidance(label) {
                    executor.execute(hw, &avoid, classifier)?;
                }
                executor.resume_drive(hw)?;
                verdict = Some(label);
            }
        }

        Ok(PolicyOutcome { situation, verdict })
    }
}
