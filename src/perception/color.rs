//! Color classification from raw RGB samples
//!
//! A sample is classified by hue first (red, green, magenta windows on the
//! hue circle), then by a bright-and-balanced test for the white lap tile.
//! Everything here except [`ColorClassifier::vote`] and
//! [`ColorClassifier::see_marker`] is a pure function of the sample.

use std::fmt;
use std::time::Duration;

use nalgebra::Vector3;
use tracing::debug;

use super::filters::ColorVote;
use super::sensors;
use crate::config::{ColorConfig, HueWindow};
use crate::hardware::{Clock, ColorSensor};

/// Categorical color seen by the probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorLabel {
    Red,
    Green,
    Magenta,
    White,
    Unknown,
}

impl ColorLabel {
    /// Labels that take part in a vote, in tie-break order
    pub const VOTING: [ColorLabel; 4] = [
        ColorLabel::Red,
        ColorLabel::Green,
        ColorLabel::Magenta,
        ColorLabel::White,
    ];
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorLabel::Red => "red",
            ColorLabel::Green => "green",
            ColorLabel::Magenta => "magenta",
            ColorLabel::White => "white",
            ColorLabel::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One raw RGB reading, each channel in `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSample {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        ColorSample { r, g, b }
    }

    /// Clamp raw driver values into `0..=100`
    pub fn from_raw(r: i32, g: i32, b: i32) -> Self {
        let clamp = |v: i32| v.clamp(0, 100) as u8;
        ColorSample::new(clamp(r), clamp(g), clamp(b))
    }

    pub fn value_sum(&self) -> u32 {
        u32::from(self.r) + u32::from(self.g) + u32::from(self.b)
    }

    /// Largest pairwise channel difference
    pub fn channel_spread(&self) -> u8 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        max - min
    }
}

/// HSV hue in degrees `[0, 360)`, or `None` for a fully desaturated sample
pub fn hue_degrees(sample: ColorSample) -> Option<f64> {
    let rgb = Vector3::new(f64::from(sample.r), f64::from(sample.g), f64::from(sample.b)) / 100.0;
    let max = rgb.max();
    let min = rgb.min();
    let delta = max - min;
    if delta == 0.0 {
        return None;
    }

    let sector = if max == rgb.x {
        ((rgb.y - rgb.z) / delta).rem_euclid(6.0)
    } else if max == rgb.y {
        (rgb.z - rgb.x) / delta + 2.0
    } else {
        (rgb.x - rgb.y) / delta + 4.0
    };

    let hue = 60.0 * sector;
    Some(if hue >= 360.0 { hue - 360.0 } else { hue })
}

/// Whether `hue` lies in the window. Windows may span the 0/360 seam.
pub fn in_hue_window(hue: f64, window: HueWindow) -> bool {
    let lo = (window.center_deg - window.half_width_deg).rem_euclid(360.0);
    let hi = (window.center_deg + window.half_width_deg).rem_euclid(360.0);
    if lo <= hi {
        lo <= hue && hue <= hi
    } else {
        hue >= lo || hue <= hi
    }
}

/// Turns RGB samples into [`ColorLabel`]s, singly or by majority vote
#[derive(Debug, Clone)]
pub struct ColorClassifier {
    config: ColorConfig,
    sample_delay: Duration,
}

impl ColorClassifier {
    pub fn new(config: ColorConfig, sample_delay: Duration) -> Self {
        ColorClassifier {
            config,
            sample_delay,
        }
    }

    pub fn config(&self) -> &ColorConfig {
        &self.config
    }

    /// Classify a single sample
    pub fn classify_one(&self, sample: ColorSample) -> ColorLabel {
        if sample.value_sum() < self.config.min_value_sum {
            return ColorLabel::Unknown;
        }

        if let Some(hue) = hue_degrees(sample) {
            if in_hue_window(hue, self.config.red) {
                return ColorLabel::Red;
            }
            if in_hue_window(hue, self.config.green) {
                return ColorLabel::Green;
            }
            if in_hue_window(hue, self.config.magenta) {
                return ColorLabel::Magenta;
            }
        }

        if self.is_marker(sample) {
            ColorLabel::White
        } else {
            ColorLabel::Unknown
        }
    }

    /// Bright, near-gray surface: the lap tile
    pub fn is_marker(&self, sample: ColorSample) -> bool {
        let floor = self.config.white_floor;
        sample.r > floor
            && sample.g > floor
            && sample.b > floor
            && sample.channel_spread() < self.config.white_balance
    }

    /// Classify `samples` fresh readings spaced by the sample delay and
    /// return the quorum-checked winner
    pub fn vote<H: ColorSensor + Clock>(&self, hw: &mut H) -> ColorLabel {
        let mut tally = ColorVote::new();
        for _ in 0..self.config.samples {
            let sample = sensors::read_color(hw);
            tally.record(self.classify_one(sample));
            hw.sleep(self.sample_delay);
        }
        let verdict = tally.resolve(self.config.quorum);
        debug!("Color vote {:?} -> {}", tally, verdict);
        verdict
    }

    /// Single-sample lap tile check, no hue and no voting
    pub fn see_marker<H: ColorSensor>(&self, hw: &mut H) -> bool {
        self.is_marker(sensors::read_color(hw))
    }
}
