//! Error types for the racer core

use thiserror::Error;

use crate::race::RacePhase;

/// Failures reported by the hardware access layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareError {
    #[error("{device} read failed: {reason}")]
    ReadFailed { device: &'static str, reason: String },

    #[error("{device} actuation failed: {reason}")]
    ActuationFailed { device: &'static str, reason: String },

    #[error("{0} is disconnected")]
    Disconnected(&'static str),
}

/// Problems with the tuning surface
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("unknown parameter `{0}`")]
    UnknownKey(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level error for the control loop
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Hardware(#[from] HardwareError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("illegal race phase transition {from:?} -> {to:?}")]
    InvalidTransition { from: RacePhase, to: RacePhase },

    #[error("{0} is not active")]
    NotActive(String),
}
