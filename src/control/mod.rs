//! Control module for the racer
//!
//! Translates a [`Maneuver`] into actuation calls with explicit timing holds.
//! Every call blocks; nothing is sensed while a maneuver runs.
pub mod maneuvers;

pub use self::maneuvers::{Maneuver, ManeuverKind};

use tracing::debug;

use crate::config::{DriveConfig, ProbeConfig};
use crate::error::HardwareError;
use crate::hardware::Hardware;
use crate::perception::{ColorClassifier, ColorLabel};

/// Result of a completed maneuver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManeuverOutcome {
    Completed,
    Inspected(ColorLabel),
}

/// Runs maneuvers against the hardware
#[derive(Debug, Clone)]
pub struct ManeuverExecutor {
    drive: DriveConfig,
    probe: ProbeConfig,
}

impl ManeuverExecutor {
    pub fn new(drive: DriveConfig, probe: ProbeConfig) -> Self {
        ManeuverExecutor { drive, probe }
    }

    /// Execute a maneuver to completion
    pub fn execute<H: Hardware>(
        &self,
        hw: &mut H,
        maneuver: &Maneuver,
        classifier: &ColorClassifier,
    ) -> Result<ManeuverOutcome, HardwareError> {
        debug!("Executing {:?}", maneuver);
        match maneuver.kind {
            ManeuverKind::SteerArc => {
                hw.set_steer_angle(maneuver.steer_angle_deg)?;
                hw.sleep(maneuver.hold);
                hw.set_steer_angle(0)?;
                Ok(ManeuverOutcome::Completed)
            }
            ManeuverKind::ProbeInspect => {
                hw.stop_drive()?;
                hw.set_probe_angle(self.probe.down_deg)?;
                hw.sleep(maneuver.hold);
                let label = classifier.vote(hw);
                hw.set_probe_angle(self.probe.up_deg)?;
                Ok(ManeuverOutcome::Inspected(label))
            }
            ManeuverKind::ParkSequence => {
                hw.set_steer_angle(maneuver.steer_angle_deg)?;
                hw.set_drive_speed(self.drive.park_speed)?;
                hw.sleep(maneuver.hold);
                hw.stop_drive()?;
                hw.set_steer_angle(0)?;
                Ok(ManeuverOutcome::Completed)
            }
        }
    }

    /// Drive straight ahead at cruise speed
    pub fn resume_drive<H: Hardware>(&self, hw: &mut H) -> Result<(), HardwareError> {
        hw.set_drive_speed(self.drive.cruise_speed)
    }

    /// Probe up, wheels straight, drive stopped
    pub fn rest_posture<H: Hardware>(&self, hw: &mut H) -> Result<(), HardwareError> {
        hw.set_probe_angle(self.probe.up_deg)?;
        hw.set_steer_angle(0)?;
        hw.stop_drive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RaceConfig;
    use crate::hardware::sim::{Actuation, SimHardware};
    use crate::hardware::Clock;
    use std::time::Duration;

    fn setup() -> (ManeuverExecutor, ColorClassifier) {
        let config = RaceConfig::default();
        (
            ManeuverExecutor::new(config.drive.clone(), config.probe.clone()),
            ColorClassifier::new(config.color.clone(), config.timing.sample_delay()),
        )
    }

    #[test]
    fn steer_arc_holds_then_straightens() {
        let (executor, classifier) = setup();
        let mut hw = SimHardware::new();
        let outcome = executor
            .execute(&mut hw, &Maneuver::steer_arc(-45, Duration::from_millis(900)), &classifier)
            .unwrap();
        assert_eq!(outcome, ManeuverOutcome::Completed);
        assert_eq!(
            hw.timed_actuations(),
            &[(0, Actuation::SteerAngle(-45)), (900, Actuation::SteerAngle(0))]
        );
    }

    #[test]
    fn probe_inspect_stops_samples_and_retracts() {
        let (executor, classifier) = setup();
        let mut hw = SimHardware::new().with_color(120..1000, (10, 60, 20));
        let outcome = executor
            .execute(&mut hw, &Maneuver::probe_inspect(Duration::from_millis(120)), &classifier)
            .unwrap();
        assert_eq!(outcome, ManeuverOutcome::Inspected(ColorLabel::Green));
        let calls: Vec<_> = hw.actuations().collect();
        assert_eq!(
            calls,
            vec![
                Actuation::StopDrive,
                Actuation::ProbeAngle(215),
                Actuation::ProbeAngle(301),
            ]
        );
        // settle plus eight spaced samples
        assert_eq!(hw.now_ms(), 120 + 8 * 20);
    }

    #[test]
    fn park_sequence_creeps_and_stops_straight() {
        let (executor, classifier) = setup();
        let mut hw = SimHardware::new();
        executor
            .execute(&mut hw, &Maneuver::park(30, Duration::from_millis(1500)), &classifier)
            .unwrap();
        assert_eq!(
            hw.timed_actuations(),
            &[
                (0, Actuation::SteerAngle(30)),
                (0, Actuation::DriveSpeed(300)),
                (1500, Actuation::StopDrive),
                (1500, Actuation::SteerAngle(0)),
            ]
        );
    }

    #[test]
    fn actuation_failure_aborts_maneuver() {
        let (executor, classifier) = setup();
        let mut hw = SimHardware::new();
        hw.fail_actuation(true);
        let result =
            executor.execute(&mut hw, &Maneuver::steer_arc(15, Duration::from_millis(200)), &classifier);
        assert!(matches!(result, Err(HardwareError::ActuationFailed { .. })));
        assert_eq!(hw.now_ms(), 0);
    }
}
