//! Common utilities and types for the racer core

/// Common types and utilities used across the codebase
pub mod types {
    /// Distance reported when a sensor has no valid reading. Always "far".
    pub const SENTINEL_FAR_MM: u32 = 99_999;

    /// Monotonic timestamp in milliseconds since process start
    pub type Millis = u64;

    /// Front and side distances sampled in one control-loop iteration
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DistanceReading {
        pub front_mm: u32,
        pub side_mm: u32,
    }

    impl DistanceReading {
        pub fn new(front_mm: u32, side_mm: u32) -> Self {
            DistanceReading { front_mm, side_mm }
        }

        /// Both sensors unavailable
        pub fn far() -> Self {
            DistanceReading::new(SENTINEL_FAR_MM, SENTINEL_FAR_MM)
        }
    }
}
