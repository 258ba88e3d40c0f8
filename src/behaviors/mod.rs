//! Behaviors module for the racer
//!
//! Holds the reactive decision policy that maps distance readings to
//! situations and situations to maneuvers.
pub mod policy;

pub use self::policy::{DecisionPolicy, PolicyOutcome, Situation};
