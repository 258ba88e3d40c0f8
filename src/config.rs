//! Tuning surface for the racer
//!
//! Every threshold, angle, hold duration and vote parameter lives in
//! [`RaceConfig`]. Values are fixed at startup: either the reference tuning
//! from `Default`, a JSON file via [`RaceConfig::load`], or flat overrides via
//! [`RaceConfig::configure`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Distance thresholds (mm) used by the decision policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceThresholds {
    /// front below this => corner zone
    pub corner_front_mm: u32,
    /// side above this => open to the right
    pub corner_right_open_mm: u32,
    /// side below this => tight corner, escape left
    pub corner_right_tight_mm: u32,
    /// front below this => likely pillar
    pub pillar_front_mm: u32,
    /// side above this => not hugging the wall
    pub pillar_side_clear_mm: u32,
    /// side below this => nudge away
    pub wall_too_near_mm: u32,
}

impl Default for DistanceThresholds {
    fn default() -> Self {
        DistanceThresholds {
            corner_front_mm: 200,
            corner_right_open_mm: 600,
            corner_right_tight_mm: 200,
            pillar_front_mm: 250,
            pillar_side_clear_mm: 350,
            wall_too_near_mm: 130,
        }
    }
}

/// Steering angles in degrees. 0 is straight, positive is left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    pub right_turn_deg: i32,
    pub left_turn_deg: i32,
    pub right_sign_deg: i32,
    pub left_sign_deg: i32,
    pub wall_nudge_deg: i32,
    pub park_deg: i32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        SteeringConfig {
            right_turn_deg: -45,
            left_turn_deg: 45,
            right_sign_deg: -30,
            left_sign_deg: 30,
            wall_nudge_deg: 15,
            park_deg: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub cruise_speed: i32,
    pub park_speed: i32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        DriveConfig {
            cruise_speed: 400,
            park_speed: 300,
        }
    }
}

/// Probe arm positions in degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub down_deg: i32,
    pub up_deg: i32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            down_deg: 215,
            up_deg: 301,
        }
    }
}

/// Hold durations and loop cadences, all in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub turn_hold_ms: u64,
    pub sign_hold_ms: u64,
    pub wall_nudge_ms: u64,
    pub park_drive_ms: u64,
    pub probe_settle_ms: u64,
    pub sample_delay_ms: u64,
    pub parking_retry_ms: u64,
    pub loop_tick_ms: u64,
    pub button_poll_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            turn_hold_ms: 900,
            sign_hold_ms: 600,
            wall_nudge_ms: 200,
            park_drive_ms: 1500,
            probe_settle_ms: 120,
            sample_delay_ms: 20,
            parking_retry_ms: 30,
            loop_tick_ms: 10,
            button_poll_ms: 30,
        }
    }
}

impl TimingConfig {
    pub fn turn_hold(&self) -> Duration {
        Duration::from_millis(self.turn_hold_ms)
    }

    pub fn sign_hold(&self) -> Duration {
        Duration::from_millis(self.sign_hold_ms)
    }

    pub fn wall_nudge(&self) -> Duration {
        Duration::from_millis(self.wall_nudge_ms)
    }

    pub fn park_drive(&self) -> Duration {
        Duration::from_millis(self.park_drive_ms)
    }

    pub fn probe_settle(&self) -> Duration {
        Duration::from_millis(self.probe_settle_ms)
    }

    pub fn sample_delay(&self) -> Duration {
        Duration::from_millis(self.sample_delay_ms)
    }

    pub fn parking_retry(&self) -> Duration {
        Duration::from_millis(self.parking_retry_ms)
    }

    pub fn loop_tick(&self) -> Duration {
        Duration::from_millis(self.loop_tick_ms)
    }

    pub fn button_poll(&self) -> Duration {
        Duration::from_millis(self.button_poll_ms)
    }
}

/// An angular range on the hue circle, `center ± half_width` degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HueWindow {
    pub center_deg: f64,
    pub half_width_deg: f64,
}

impl HueWindow {
    pub const fn new(center_deg: f64, half_width_deg: f64) -> Self {
        HueWindow {
            center_deg,
            half_width_deg,
        }
    }
}

/// Color classification and voting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// samples per vote
    pub samples: u32,
    /// minimum count for a vote winner to be trusted
    pub quorum: u32,
    /// r+g+b below this is too dark to classify
    pub min_value_sum: u32,
    /// every channel must exceed this for White
    pub white_floor: u8,
    /// largest pairwise channel difference must stay below this for White
    pub white_balance: u8,
    pub red: HueWindow,
    pub green: HueWindow,
    pub magenta: HueWindow,
}

impl Default for ColorConfig {
    fn default() -> Self {
        ColorConfig {
            samples: 8,
            quorum: 2,
            min_value_sum: 40,
            white_floor: 60,
            white_balance: 15,
            red: HueWindow::new(0.0, 20.0),
            green: HueWindow::new(120.0, 25.0),
            magenta: HueWindow::new(300.0, 25.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LapConfig {
    pub target_laps: u32,
    /// minimum time between two accepted lap markers
    pub marker_cooldown_ms: u64,
    /// pause after an accepted marker so the same tile is not counted twice
    pub marker_settle_ms: u64,
}

impl Default for LapConfig {
    fn default() -> Self {
        LapConfig {
            target_laps: 3,
            marker_cooldown_ms: 2000,
            marker_settle_ms: 400,
        }
    }
}

impl LapConfig {
    pub fn marker_settle(&self) -> Duration {
        Duration::from_millis(self.marker_settle_ms)
    }
}

/// Complete tuning of the racer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub distances: DistanceThresholds,
    pub steering: SteeringConfig,
    pub drive: DriveConfig,
    pub probe: ProbeConfig,
    pub timing: TimingConfig,
    pub color: ColorConfig,
    pub laps: LapConfig,
}

impl RaceConfig {
    /// Load a JSON tuning file. Missing fields keep their reference values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: RaceConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply flat named overrides, e.g. `"corner_front_mm" => 180.0`.
    ///
    /// The config is left untouched if any key is unknown, any value is out
    /// of range, or the result fails [`RaceConfig::validate`].
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), ConfigError> {
        let mut next = self.clone();
        for (key, &value) in params {
            next.apply(key, value)?;
        }
        if let Err(e) = next.validate() {
            warn!("Rejected parameter overrides: {}", e);
            return Err(e);
        }
        *self = next;
        Ok(())
    }

    fn apply(&mut self, key: &str, value: f64) -> Result<(), ConfigError> {
        let d = &mut self.distances;
        let s = &mut self.steering;
        let t = &mut self.timing;
        let c = &mut self.color;
        match key {
            "corner_front_mm" => d.corner_front_mm = unsigned("corner_front_mm", value)?,
            "corner_right_open_mm" => {
                d.corner_right_open_mm = unsigned("corner_right_open_mm", value)?
            }
            "corner_right_tight_mm" => {
                d.corner_right_tight_mm = unsigned("corner_right_tight_mm", value)?
            }
            "pillar_front_mm" => d.pillar_front_mm = unsigned("pillar_front_mm", value)?,
            "pillar_side_clear_mm" => {
                d.pillar_side_clear_mm = unsigned("pillar_side_clear_mm", value)?
            }
            "wall_too_near_mm" => d.wall_too_near_mm = unsigned("wall_too_near_mm", value)?,

            "steer_right_turn_deg" => s.right_turn_deg = signed("steer_right_turn_deg", value)?,
            "steer_left_turn_deg" => s.left_turn_deg = signed("steer_left_turn_deg", value)?,
            "steer_right_sign_deg" => s.right_sign_deg = signed("steer_right_sign_deg", value)?,
            "steer_left_sign_deg" => s.left_sign_deg = signed("steer_left_sign_deg", value)?,
            "steer_wall_nudge_deg" => s.wall_nudge_deg = signed("steer_wall_nudge_deg", value)?,
            "steer_park_deg" => s.park_deg = signed("steer_park_deg", value)?,

            "cruise_speed" => self.drive.cruise_speed = signed("cruise_speed", value)?,
            "park_speed" => self.drive.park_speed = signed("park_speed", value)?,
            "probe_down_deg" => self.probe.down_deg = signed("probe_down_deg", value)?,
            "probe_up_deg" => self.probe.up_deg = signed("probe_up_deg", value)?,

            "turn_hold_ms" => t.turn_hold_ms = millis("turn_hold_ms", value)?,
            "sign_hold_ms" => t.sign_hold_ms = millis("sign_hold_ms", value)?,
            "wall_nudge_ms" => t.wall_nudge_ms = millis("wall_nudge_ms", value)?,
            "park_drive_ms" => t.park_drive_ms = millis("park_drive_ms", value)?,
            "probe_settle_ms" => t.probe_settle_ms = millis("probe_settle_ms", value)?,
            "sample_delay_ms" => t.sample_delay_ms = millis("sample_delay_ms", value)?,
            "parking_retry_ms" => t.parking_retry_ms = millis("parking_retry_ms", value)?,
            "loop_tick_ms" => t.loop_tick_ms = millis("loop_tick_ms", value)?,
            "button_poll_ms" => t.button_poll_ms = millis("button_poll_ms", value)?,

            "color_samples" => c.samples = unsigned("color_samples", value)?,
            "color_quorum" => c.quorum = unsigned("color_quorum", value)?,
            "min_value_sum" => c.min_value_sum = unsigned("min_value_sum", value)?,
            "white_floor" => c.white_floor = channel("white_floor", value)?,
            "white_balance" => c.white_balance = channel("white_balance", value)?,
            "red_hue_center_deg" => c.red.center_deg = value,
            "red_hue_half_width_deg" => c.red.half_width_deg = value,
            "green_hue_center_deg" => c.green.center_deg = value,
            "green_hue_half_width_deg" => c.green.half_width_deg = value,
            "magenta_hue_center_deg" => c.magenta.center_deg = value,
            "magenta_hue_half_width_deg" => c.magenta.half_width_deg = value,

            "target_laps" => self.laps.target_laps = unsigned("target_laps", value)?,
            "marker_cooldown_ms" => {
                self.laps.marker_cooldown_ms = millis("marker_cooldown_ms", value)?
            }
            "marker_settle_ms" => self.laps.marker_settle_ms = millis("marker_settle_ms", value)?,

            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Reject tuning that would make the policy or the vote meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.distances;
        if d.corner_right_tight_mm > d.corner_right_open_mm {
            return Err(ConfigError::InvalidValue {
                key: "corner_right_tight_mm",
                reason: format!(
                    "{} exceeds corner_right_open_mm ({})",
                    d.corner_right_tight_mm, d.corner_right_open_mm
                ),
            });
        }

        let c = &self.color;
        if c.samples == 0 {
            return Err(ConfigError::InvalidValue {
                key: "color_samples",
                reason: "at least one sample is required".to_string(),
            });
        }
        if c.quorum == 0 || c.quorum > c.samples {
            return Err(ConfigError::InvalidValue {
                key: "color_quorum",
                reason: format!("must be within 1..={}, got {}", c.samples, c.quorum),
            });
        }
        for (center_key, width_key, window) in [
            ("red_hue_center_deg", "red_hue_half_width_deg", c.red),
            ("green_hue_center_deg", "green_hue_half_width_deg", c.green),
            ("magenta_hue_center_deg", "magenta_hue_half_width_deg", c.magenta),
        ] {
            if !window.center_deg.is_finite() {
                return Err(ConfigError::InvalidValue {
                    key: center_key,
                    reason: format!("must be a finite angle, got {}", window.center_deg),
                });
            }
            if !(window.half_width_deg > 0.0 && window.half_width_deg < 180.0) {
                return Err(ConfigError::InvalidValue {
                    key: width_key,
                    reason: format!("must be within (0, 180), got {}", window.half_width_deg),
                });
            }
        }

        if self.laps.target_laps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "target_laps",
                reason: "at least one lap is required".to_string(),
            });
        }
        Ok(())
    }
}

fn unsigned(key: &'static str, value: f64) -> Result<u32, ConfigError> {
    if !is_whole(value) || value < 0.0 || value > u32::MAX as f64 {
        return Err(ConfigError::InvalidValue {
            key,
            reason: format!("expected a non-negative integer, got {}", value),
        });
    }
    Ok(value as u32)
}

fn millis(key: &'static str, value: f64) -> Result<u64, ConfigError> {
    unsigned(key, value).map(u64::from)
}

fn signed(key: &'static str, value: f64) -> Result<i32, ConfigError> {
    if !is_whole(value) || value.abs() > i32::MAX as f64 {
        return Err(ConfigError::InvalidValue {
            key,
            reason: format!("expected an integer, got {}", value),
        });
    }
    Ok(value as i32)
}

fn channel(key: &'static str, value: f64) -> Result<u8, ConfigError> {
    if !is_whole(value) || !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::InvalidValue {
            key,
            reason: format!("expected an integer channel value in 0..=100, got {}", value),
        });
    }
    Ok(value as u8)
}

/// Finite with no fractional part
fn is_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}
