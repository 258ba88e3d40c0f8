//! Lifecycle management for racer components

use tracing::debug;

use crate::error::CoreError;

/// Trait for components that follow a lifecycle pattern
pub trait LifecycleNode {
    /// Configure the node
    fn on_configure(&mut self) -> Result<(), CoreError>;

    /// Activate the node
    fn on_activate(&mut self) -> Result<(), CoreError>;

    /// Deactivate the node
    fn on_deactivate(&mut self) -> Result<(), CoreError>;

    /// Clean up the node
    fn on_cleanup(&mut self) -> Result<(), CoreError>;
}

/// Base implementation for lifecycle nodes
#[derive(Debug)]
pub struct LifecycleNodeBase {
    pub name: String,
    state: State,
}

/// State of a lifecycle node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unconfigured,
    Inactive,
    Active,
}

impl LifecycleNodeBase {
    /// Create a new lifecycle node base
    pub fn new(name: &str) -> Self {
        LifecycleNodeBase {
            name: name.to_string(),
            state: State::Unconfigured,
        }
    }

    /// Get the current state
    pub fn get_state(&self) -> State {
        self.state
    }

    /// Set the state
    pub fn set_state(&mut self, state: State) {
        debug!("{}: {:?} -> {:?}", self.name, self.state, state);
        self.state = state;
    }

    /// Fail unless the node is active
    pub fn ensure_active(&self) -> Result<(), CoreError> {
        if self.state == State::Active {
            Ok(())
        } else {
            Err(CoreError::NotActive(self.name.clone()))
        }
    }
}
