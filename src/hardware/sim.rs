//! Simulated hardware for dry runs and tests
//!
//! Runs on a virtual clock that only moves when the core sleeps. Sensor
//! values are scripted as time windows on that clock, so a whole race can be
//! described as "front is blocked from 1.2 s to 1.3 s, the lap tile is under
//! the probe from 3 s to 3.05 s" and replayed deterministically.

use std::collections::VecDeque;
use std::ops::Range;
use std::time::Duration;

use super::{Actuators, Clock, ColorSensor, DistanceSensors, StartButton};
use crate::common::types::{Millis, SENTINEL_FAR_MM};
use crate::error::HardwareError;

/// One actuation call, as recorded by [`SimHardware`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuation {
    DriveSpeed(i32),
    StopDrive,
    SteerAngle(i32),
    ProbeAngle(i32),
}

/// A value that changes over virtual time
///
/// Later windows take precedence over earlier ones where they overlap.
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    default: T,
    windows: Vec<(Range<Millis>, T)>,
}

impl<T: Clone> Timeline<T> {
    pub fn new(default: T) -> Self {
        Timeline {
            default,
            windows: Vec::new(),
        }
    }

    pub fn set(&mut self, window: Range<Millis>, value: T) {
        self.windows.push((window, value));
    }

    pub fn at(&self, t: Millis) -> T {
        self.windows
            .iter()
            .rev()
            .find(|(window, _)| window.contains(&t))
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

/// Deterministic vehicle stand-in with a scripted environment
#[derive(Debug, Clone)]
pub struct SimHardware {
    now_ms: Millis,
    front: Timeline<u32>,
    side: Timeline<u32>,
    color: Timeline<(i32, i32, i32)>,
    color_queue: VecDeque<(i32, i32, i32)>,
    button: Timeline<bool>,
    front_fault: bool,
    side_fault: bool,
    color_fault: bool,
    actuation_fault: bool,
    log: Vec<(Millis, Actuation)>,
    color_reads: usize,
}

impl Default for SimHardware {
    fn default() -> Self {
        SimHardware::new()
    }
}

impl SimHardware {
    /// Open track, dark floor, button never pressed
    pub fn new() -> Self {
        SimHardware {
            now_ms: 0,
            front: Timeline::new(SENTINEL_FAR_MM),
            side: Timeline::new(SENTINEL_FAR_MM),
            color: Timeline::new((0, 0, 0)),
            color_queue: VecDeque::new(),
            button: Timeline::new(false),
            front_fault: false,
            side_fault: false,
            color_fault: false,
            actuation_fault: false,
            log: Vec::new(),
            color_reads: 0,
        }
    }

    /// Baseline distances outside any scripted window
    pub fn with_default_distances(mut self, front_mm: u32, side_mm: u32) -> Self {
        self.front.default = front_mm;
        self.side.default = side_mm;
        self
    }

    pub fn with_front(mut self, window: Range<Millis>, mm: u32) -> Self {
        self.front.set(window, mm);
        self
    }

    pub fn with_side(mut self, window: Range<Millis>, mm: u32) -> Self {
        self.side.set(window, mm);
        self
    }

    pub fn with_color(mut self, window: Range<Millis>, rgb: (i32, i32, i32)) -> Self {
        self.color.set(window, rgb);
        self
    }

    pub fn with_button_press(mut self, window: Range<Millis>) -> Self {
        self.button.set(window, true);
        self
    }

    /// Samples returned, in order, before the color timeline is consulted
    pub fn queue_color_samples<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = (i32, i32, i32)>,
    {
        self.color_queue.extend(samples);
    }

    pub fn fail_distance_reads(&mut self, front: bool, side: bool) {
        self.front_fault = front;
        self.side_fault = side;
    }

    pub fn fail_color_reads(&mut self, fail: bool) {
        self.color_fault = fail;
    }

    pub fn fail_actuation(&mut self, fail: bool) {
        self.actuation_fault = fail;
    }

    pub fn actuations(&self) -> impl Iterator<Item = Actuation> + '_ {
        self.log.iter().map(|(_, a)| *a)
    }

    pub fn timed_actuations(&self) -> &[(Millis, Actuation)] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn color_reads(&self) -> usize {
        self.color_reads
    }

    /// Last commanded steering angle
    pub fn steer_angle(&self) -> i32 {
        self.log
            .iter()
            .rev()
            .find_map(|(_, a)| match a {
                Actuation::SteerAngle(angle) => Some(*angle),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Last commanded drive speed, 0 when stopped
    pub fn drive_speed(&self) -> i32 {
        self.log
            .iter()
            .rev()
            .find_map(|(_, a)| match a {
                Actuation::DriveSpeed(speed) => Some(*speed),
                Actuation::StopDrive => Some(0),
                _ => None,
            })
            .unwrap_or(0)
    }

    fn record(&mut self, device: &'static str, actuation: Actuation) -> Result<(), HardwareError> {
        if self.actuation_fault {
            return Err(HardwareError::ActuationFailed {
                device,
                reason: "simulated fault".to_string(),
            });
        }
        self.log.push((self.now_ms, actuation));
        Ok(())
    }
}

impl DistanceSensors for SimHardware {
    fn read_front_distance_mm(&mut self) -> Result<u32, HardwareError> {
        if self.front_fault {
            return Err(HardwareError::Disconnected("front distance sensor"));
        }
        Ok(self.front.at(self.now_ms))
    }

    fn read_side_distance_mm(&mut self) -> Result<u32, HardwareError> {
        if self.side_fault {
            return Err(HardwareError::Disconnected("side distance sensor"));
        }
        Ok(self.side.at(self.now_ms))
    }
}

impl ColorSensor for SimHardware {
    fn read_color_sample(&mut self) -> Result<(i32, i32, i32), HardwareError> {
        self.color_reads += 1;
        if self.color_fault {
            return Err(HardwareError::ReadFailed {
                device: "color sensor",
                reason: "simulated fault".to_string(),
            });
        }
        if let Some(sample) = self.color_queue.pop_front() {
            return Ok(sample);
        }
        Ok(self.color.at(self.now_ms))
    }
}

impl Actuators for SimHardware {
    fn set_drive_speed(&mut self, speed: i32) -> Result<(), HardwareError> {
        self.record("drive motor", Actuation::DriveSpeed(speed))
    }

    fn stop_drive(&mut self) -> Result<(), HardwareError> {
        self.record("drive motor", Actuation::StopDrive)
    }

    fn set_steer_angle(&mut self, angle_deg: i32) -> Result<(), HardwareError> {
        self.record("steering motor", Actuation::SteerAngle(angle_deg))
    }

    fn set_probe_angle(&mut self, angle_deg: i32) -> Result<(), HardwareError> {
        self.record("probe motor", Actuation::ProbeAngle(angle_deg))
    }
}

impl StartButton for SimHardware {
    fn is_pressed(&mut self) -> bool {
        self.button.at(self.now_ms)
    }
}

impl Clock for SimHardware {
    fn now_ms(&self) -> Millis {
        self.now_ms
    }

    fn sleep(&mut self, duration: Duration) {
        self.now_ms += duration.as_millis() as Millis;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_windows_override_earlier_ones() {
        let mut timeline = Timeline::new(0);
        timeline.set(0..100, 1);
        timeline.set(50..60, 2);
        assert_eq!(timeline.at(10), 1);
        assert_eq!(timeline.at(55), 2);
        assert_eq!(timeline.at(60), 1);
        assert_eq!(timeline.at(100), 0);
    }

    #[test]
    fn readings_follow_the_virtual_clock() {
        let mut hw = SimHardware::new().with_front(100..200, 150);
        assert_eq!(hw.read_front_distance_mm().unwrap(), SENTINEL_FAR_MM);
        hw.sleep(Duration::from_millis(120));
        assert_eq!(hw.read_front_distance_mm().unwrap(), 150);
        hw.sleep(Duration::from_millis(100));
        assert_eq!(hw.read_front_distance_mm().unwrap(), SENTINEL_FAR_MM);
    }

    #[test]
    fn queued_samples_take_precedence() {
        let mut hw = SimHardware::new().with_color(0..1000, (80, 80, 80));
        hw.queue_color_samples([(1, 2, 3)]);
        assert_eq!(hw.read_color_sample().unwrap(), (1, 2, 3));
        assert_eq!(hw.read_color_sample().unwrap(), (80, 80, 80));
        assert_eq!(hw.color_reads(), 2);
    }

    #[test]
    fn actuation_log_tracks_last_commands() {
        let mut hw = SimHardware::new();
        hw.set_drive_speed(400).unwrap();
        hw.set_steer_angle(-45).unwrap();
        assert_eq!(hw.drive_speed(), 400);
        assert_eq!(hw.steer_angle(), -45);
        hw.stop_drive().unwrap();
        assert_eq!(hw.drive_speed(), 0);

        hw.fail_actuation(true);
        assert!(hw.set_steer_angle(0).is_err());
        assert_eq!(hw.steer_angle(), -45);
    }
}
