//! Lap/race controller
//!
//! Top-level state machine: `WaitForStart -> Racing -> Parking -> Finished`.
//! Phases only move forward. All state is owned by the controller and
//! mutated from the single control loop.
pub mod lap;
pub mod trigger;

pub use self::lap::LapState;
pub use self::trigger::StartTrigger;

use std::collections::HashMap;

use tracing::{debug, info};

use crate::behaviors::{DecisionPolicy, PolicyOutcome, Situation};
use crate::config::RaceConfig;
use crate::control::{Maneuver, ManeuverExecutor};
use crate::error::CoreError;
use crate::hardware::Hardware;
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use crate::perception::{sensors, ColorClassifier, ColorLabel};

/// Process-wide race phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RacePhase {
    WaitForStart,
    Racing,
    Parking,
    Finished,
}

impl RacePhase {
    /// The only phase this one may move to
    pub fn next(self) -> Option<RacePhase> {
        match self {
            RacePhase::WaitForStart => Some(RacePhase::Racing),
            RacePhase::Racing => Some(RacePhase::Parking),
            RacePhase::Parking => Some(RacePhase::Finished),
            RacePhase::Finished => None,
        }
    }
}

/// What happened during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaceSummary {
    pub laps: LapState,
    pub iterations: u64,
    pub situations: HashMap<Situation, u32>,
    pub pillar_verdicts: HashMap<ColorLabel, u32>,
    pub parking_votes: u32,
}

impl RaceSummary {
    pub fn situation_count(&self, situation: Situation) -> u32 {
        self.situations.get(&situation).copied().unwrap_or(0)
    }

    pub fn verdict_count(&self, label: ColorLabel) -> u32 {
        self.pillar_verdicts.get(&label).copied().unwrap_or(0)
    }

    fn record(&mut self, outcome: PolicyOutcome) {
        self.iterations += 1;
        *self.situations.entry(outcome.situation).or_insert(0) += 1;
        if let Some(label) = outcome.verdict {
            *self.pillar_verdicts.entry(label).or_insert(0) += 1;
        }
    }
}

/// Sequences the whole run against one vehicle
pub struct RaceController<H: Hardware> {
    base: LifecycleNodeBase,
    hw: H,
    config: RaceConfig,
    classifier: ColorClassifier,
    policy: DecisionPolicy,
    executor: ManeuverExecutor,
    phase: RacePhase,
    trigger: StartTrigger,
    summary: RaceSummary,
}

impl<H: Hardware> RaceController<H> {
    pub fn new(hw: H, config: RaceConfig) -> Self {
        let (classifier, policy, executor) = Self::build_components(&config);
        RaceController {
            base: LifecycleNodeBase::new("race_controller"),
            hw,
            config,
            classifier,
            policy,
            executor,
            phase: RacePhase::WaitForStart,
            trigger: StartTrigger::new(),
            summary: RaceSummary::default(),
        }
    }

    fn build_components(config: &RaceConfig) -> (ColorClassifier, DecisionPolicy, ManeuverExecutor) {
        (
            ColorClassifier::new(config.color.clone(), config.timing.sample_delay()),
            DecisionPolicy::new(
                config.distances.clone(),
                config.steering.clone(),
                config.timing.clone(),
            ),
            ManeuverExecutor::new(config.drive.clone(), config.probe.clone()),
        )
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn laps(&self) -> LapState {
        self.summary.laps
    }

    pub fn summary(&self) -> &RaceSummary {
        &self.summary
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn lifecycle_state(&self) -> State {
        self.base.get_state()
    }

    /// Run phases until `Finished`. Parking waits for magenta without a timeout.
    pub fn run(&mut self) -> Result<RaceSummary, CoreError> {
        while self.step()? != RacePhase::Finished {}
        Ok(self.summary.clone())
    }

    /// Advance the current phase by one unit of work: one button poll, one
    /// racing iteration, or one parking vote. Returns the phase afterwards.
    pub fn step(&mut self) -> Result<RacePhase, CoreError> {
        self.base.ensure_active()?;
        match self.phase {
            RacePhase::WaitForStart => self.poll_start()?,
            RacePhase::Racing => self.race_iteration()?,
            RacePhase::Parking => self.parking_attempt()?,
            RacePhase::Finished => {}
        }
        Ok(self.phase)
    }

    fn transition(&mut self, to: RacePhase) -> Result<(), CoreError> {
        if self.phase.next() != Some(to) {
            return Err(CoreError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        info!("Race phase {:?} -> {:?}", self.phase, to);
        self.phase = to;
        Ok(())
    }

    fn poll_start(&mut self) -> Result<(), CoreError> {
        let pressed = self.hw.is_pressed();
        if self.trigger.poll(pressed) {
            self.transition(RacePhase::Racing)?;
            self.executor.resume_drive(&mut self.hw)?;
        } else {
            self.hw.sleep(self.config.timing.button_poll());
        }
        Ok(())
    }

    fn race_iteration(&mut self) -> Result<(), CoreError> {
        let reading = sensors::read_distances(&mut self.hw);
        let outcome = self
            .policy
            .step(&mut self.hw, reading, &self.executor, &self.classifier)?;
        self.summary.record(outcome);

        if self.classifier.see_marker(&mut self.hw) {
            let now = self.hw.now_ms();
            let laps = &mut self.summary.laps;
            if laps.register_marker(now, self.config.laps.marker_cooldown_ms) {
                info!(
                    "Lap {}/{} at {}ms",
                    laps.laps_completed, self.config.laps.target_laps, now
                );
                self.hw.sleep(self.config.laps.marker_settle());
            } else {
                debug!("Marker at {}ms ignored during cooldown", now);
            }
        }

        self.hw.sleep(self.config.timing.loop_tick());

        if self.summary.laps.laps_completed >= self.config.laps.target_laps {
            self.transition(RacePhase::Parking)?;
            self.hw.stop_drive()?;
        }
        Ok(())
    }

    fn parking_attempt(&mut self) -> Result<(), CoreError> {
        let label = self.classifier.vote(&mut self.hw);
        self.summary.parking_votes += 1;
        if label != ColorLabel::Magenta {
            debug!("Waiting for parking marker, saw {}", label);
            self.hw.sleep(self.config.timing.parking_retry());
            return Ok(());
        }

        info!("Parking marker found after {} votes", self.summary.parking_votes);
        let park = Maneuver::park(self.config.steering.park_deg, self.config.timing.park_drive());
        self.executor.execute(&mut self.hw, &park, &self.classifier)?;
        self.transition(RacePhase::Finished)?;
        info!(
            "Parked after {} laps and {} iterations",
            self.summary.laps.laps_completed, self.summary.iterations
        );
        Ok(())
    }
}

impl<H: Hardware> LifecycleNode for RaceController<H> {
    fn on_configure(&mut self) -> Result<(), CoreError> {
        info!("Configuring race controller");
        self.config.validate()?;
        let (classifier, policy, executor) = Self::build_components(&self.config);
        self.classifier = classifier;
        self.policy = policy;
        self.executor = executor;
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<(), CoreError> {
        info!("Activating race controller");
        self.executor.rest_posture(&mut self.hw)?;
        self.base.set_state(State::Active);
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<(), CoreError> {
        info!("Deactivating race controller");
        self.hw.stop_drive()?;
        self.hw.set_steer_angle(0)?;
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<(), CoreError> {
        info!("Cleaning up race controller");
        self.base.set_state(State::Unconfigured);
        Ok(())
    }
}
