//! Sensor reads with safe fallbacks
//!
//! A failed read is never propagated. Distances fall back to
//! [`SENTINEL_FAR_MM`] and color falls back to a dark sample, so the policy
//! always sees a well-formed value and degrades to "no action".

use tracing::warn;

use super::color::ColorSample;
use crate::common::types::{DistanceReading, SENTINEL_FAR_MM};
use crate::hardware::{ColorSensor, DistanceSensors};

pub fn read_distances<H: DistanceSensors>(hw: &mut H) -> DistanceReading {
    let front_mm = hw.read_front_distance_mm().unwrap_or_else(|e| {
        warn!("Front distance unavailable, assuming far: {}", e);
        SENTINEL_FAR_MM
    });
    let side_mm = hw.read_side_distance_mm().unwrap_or_else(|e| {
        warn!("Side distance unavailable, assuming far: {}", e);
        SENTINEL_FAR_MM
    });
    DistanceReading::new(front_mm, side_mm)
}

pub fn read_color<H: ColorSensor>(hw: &mut H) -> ColorSample {
    match hw.read_color_sample() {
        Ok((r, g, b)) => ColorSample::from_raw(r, g, b),
        Err(e) => {
            warn!("Color sample unavailable, treating as dark: {}", e);
            ColorSample::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::sim::SimHardware;

    #[test]
    fn failed_distance_reads_become_far() {
        let mut hw = SimHardware::new().with_default_distances(150, 100);
        assert_eq!(read_distances(&mut hw), DistanceReading::new(150, 100));

        hw.fail_distance_reads(true, false);
        assert_eq!(read_distances(&mut hw), DistanceReading::new(SENTINEL_FAR_MM, 100));

        hw.fail_distance_reads(true, true);
        assert_eq!(read_distances(&mut hw), DistanceReading::far());
    }

    #[test]
    fn failed_color_read_is_dark() {
        let mut hw = SimHardware::new().with_color(0..100, (80, 80, 80));
        hw.fail_color_reads(true);
        assert_eq!(read_color(&mut hw), ColorSample::new(0, 0, 0));
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        let mut hw = SimHardware::new();
        hw.queue_color_samples([(-3, 101, 40)]);
        assert_eq!(read_color(&mut hw), ColorSample::new(0, 100, 40));
    }
}
