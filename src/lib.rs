pub mod behaviors;
pub mod common;
pub mod config;
pub mod control;
pub mod error;
pub mod hardware;
pub mod lifecycle;
pub mod perception;
pub mod race;

use crate::config::RaceConfig;
use crate::error::CoreError;
use crate::hardware::Hardware;
use crate::lifecycle::LifecycleNode;
use crate::race::{RaceController, RaceSummary};

/// Core functionality for the racer: one controller driving one vehicle
pub struct RacerCore<H: Hardware> {
    controller: RaceController<H>,
}

impl<H: Hardware> RacerCore<H> {
    /// Create a new core around the given hardware
    pub fn new(hw: H, config: RaceConfig) -> Self {
        RacerCore {
            controller: RaceController::new(hw, config),
        }
    }

    /// Configure and activate the controller
    pub fn init(&mut self) -> Result<(), CoreError> {
        self.controller.on_configure()?;
        self.controller.on_activate()?;
        Ok(())
    }

    /// Run the full phase sequence once
    pub fn run(&mut self) -> Result<RaceSummary, CoreError> {
        self.controller.run()
    }

    /// Stop the vehicle and release the controller
    pub fn shutdown(&mut self) -> Result<(), CoreError> {
        self.controller.on_deactivate()?;
        self.controller.on_cleanup()?;
        Ok(())
    }

    pub fn controller(&self) -> &RaceController<H> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RaceController<H> {
        &mut self.controller
    }
}
