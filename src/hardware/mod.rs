//! Hardware access layer consumed by the racer core
//!
//! The core never talks to motors or sensors directly. It drives these
//! traits, and a board-specific crate (or [`sim::SimHardware`] in tests)
//! implements them.
pub mod sim;

use std::time::Duration;

use crate::common::types::Millis;
use crate::error::HardwareError;

/// Front and right-side distance sensors
pub trait DistanceSensors {
    /// Distance ahead in mm
    fn read_front_distance_mm(&mut self) -> Result<u32, HardwareError>;

    /// Distance to the right-hand wall in mm
    fn read_side_distance_mm(&mut self) -> Result<u32, HardwareError>;
}

/// RGB sensor at the tip of the probe arm
pub trait ColorSensor {
    /// Raw channel intensities, nominally in `0..=100`
    fn read_color_sample(&mut self) -> Result<(i32, i32, i32), HardwareError>;
}

/// Drive, steering and probe motors
pub trait Actuators {
    fn set_drive_speed(&mut self, speed: i32) -> Result<(), HardwareError>;

    fn stop_drive(&mut self) -> Result<(), HardwareError>;

    /// 0 is straight, positive is left. Blocks until the position is reached.
    fn set_steer_angle(&mut self, angle_deg: i32) -> Result<(), HardwareError>;

    /// Blocks until the probe arm reaches the position
    fn set_probe_angle(&mut self, angle_deg: i32) -> Result<(), HardwareError>;
}

/// Start button on the hub
pub trait StartButton {
    fn is_pressed(&mut self) -> bool;
}

/// Monotonic time source and blocking delay
pub trait Clock {
    fn now_ms(&self) -> Millis;

    fn sleep(&mut self, duration: Duration);
}

/// Everything the control loop needs from the vehicle
pub trait Hardware: DistanceSensors + ColorSensor + Actuators + StartButton + Clock {}

impl<T> Hardware for T where T: DistanceSensors + ColorSensor + Actuators + StartButton + Clock {}
