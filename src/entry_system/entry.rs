use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::config::EntryConfig;
use crate::constants::{GRAVITY, JOULES_PER_MEGATON};
use crate::errors::SimulationError;

use super::atmosphere::density_factor;
use super::impactor::ImpactorSpec;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryState {
    pub time_s: f64,
    pub altitude_km: f64,
    pub velocity_km_s: f64,
    pub mass_kg: f64,
    pub mass_fraction_remaining: f64,
    /// Kinetic energy carried off by ablated mass so far
    pub energy_deposited_megatons: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOutcome {
    GroundImpact,
    Airburst,
}

/// Steps a body from entry altitude down to the ground or to disintegration.
///
/// The simulator holds no mutable state. `steps()` hands out a fresh lazy
/// sequence on every call and `run()` collects one, so both consumption modes
/// see the same numbers.
#[derive(Debug, Clone)]
pub struct EntrySimulator {
    spec: ImpactorSpec,
    config: EntryConfig,
    initial_mass: f64,
    floor_mass: f64,
    sin_angle: f64,
}

impl EntrySimulator {
    pub fn new(spec: ImpactorSpec, config: EntryConfig) -> Result<Self, SimulationError> {
        spec.validate()?;
        config.validate()?;

        let initial_mass = spec.mass_kg();
        Ok(EntrySimulator {
            spec,
            initial_mass,
            floor_mass: initial_mass * config.airburst_mass_fraction,
            sin_angle: spec.entry_angle_deg.to_radians().sin(),
            config,
        })
    }

    pub fn spec(&self) -> &ImpactorSpec {
        &self.spec
    }

    pub fn config(&self) -> &EntryConfig {
        &self.config
    }

    pub fn initial_mass(&self) -> f64 {
        self.initial_mass
    }

    pub fn initial_state(&self) -> EntryState {
        EntryState {
            time_s: 0.0,
            altitude_km: self.config.start_altitude_km,
            velocity_km_s: self.spec.velocity_km_s,
            mass_kg: self.initial_mass,
            mass_fraction_remaining: 1.0,
            energy_deposited_megatons: 0.0,
        }
    }

    /// Lazy, restartable sequence of states.
    pub fn steps(&self) -> EntrySteps<'_> {
        EntrySteps {
            simulator: self,
            pending: Some(self.initial_state()),
            produced: 0,
            outcome: None,
        }
    }

    /// Eager sequence, collected to completion.
    pub fn run(&self) -> EntryTrajectory {
        let mut steps = self.steps();
        let states: Vec<EntryState> = steps.by_ref().collect();
        let outcome = steps.outcome();

        if let (Some(last), Some(outcome)) = (states.last(), outcome) {
            log::debug!(
                "entry finished after {} states ({:?}) at t={:.1}s, {:.1} km, {:.2} km/s, {:.1}% mass",
                states.len(),
                outcome,
                last.time_s,
                last.altitude_km,
                last.velocity_km_s,
                last.mass_fraction_remaining * 100.0
            );
        }

        EntryTrajectory { states, outcome }
    }

    fn terminal_outcome(&self, state: &EntryState) -> Option<EntryOutcome> {
        if state.altitude_km <= 0.0 {
            Some(EntryOutcome::GroundImpact)
        } else if state.mass_kg <= self.floor_mass {
            Some(EntryOutcome::Airburst)
        } else {
            None
        }
    }

    fn advance(&self, state: &EntryState) -> EntryState {
        let dt = self.config.time_step_s;
        let factor = density_factor(state.altitude_km);

        // Drag scales speed down, gravity along the path adds a little back.
        let drag = self.config.drag_rate * factor * dt;
        let gravity_gain = GRAVITY / 1000.0 * self.sin_angle * dt;
        let velocity_km_s = state.velocity_km_s * (1.0 - drag) + gravity_gain;

        let speed_ratio = state.velocity_km_s / self.spec.velocity_km_s;
        let ablation = (self.config.ablation_rate * factor * speed_ratio * dt).clamp(0.0, 1.0);
        let mass_kg = (state.mass_kg * (1.0 - ablation)).max(self.floor_mass);

        let altitude_km = (state.altitude_km - velocity_km_s * self.sin_angle * dt).max(0.0);

        let velocity_m_s = velocity_km_s * 1000.0;
        let energy_deposited_megatons =
            0.5 * (self.initial_mass - mass_kg) * velocity_m_s.powi(2) / JOULES_PER_MEGATON;

        let next = EntryState {
            time_s: state.time_s + dt,
            altitude_km,
            velocity_km_s,
            mass_kg,
            mass_fraction_remaining: mass_kg / self.initial_mass,
            energy_deposited_megatons,
        };
        log::debug!(
            "t={:.1}s altitude {:.3} km, {:.3} km/s, {:.2}% mass, {:.4} Mt deposited",
            next.time_s,
            next.altitude_km,
            next.velocity_km_s,
            next.mass_fraction_remaining * 100.0,
            next.energy_deposited_megatons
        );
        next
    }
}

/// Lazy view over an entry. Yields the initial state first and the terminal
/// state last; `outcome()` is set once the terminal state has been yielded.
pub struct EntrySteps<'a> {
    simulator: &'a EntrySimulator,
    pending: Option<EntryState>,
    produced: usize,
    outcome: Option<EntryOutcome>,
}

impl EntrySteps<'_> {
    pub fn outcome(&self) -> Option<EntryOutcome> {
        self.outcome
    }

    pub fn produced(&self) -> usize {
        self.produced
    }
}

impl Iterator for EntrySteps<'_> {
    type Item = EntryState;

    fn next(&mut self) -> Option<EntryState> {
        let current = self.pending.take()?;
        self.produced += 1;

        match self.simulator.terminal_outcome(&current) {
            Some(outcome) => self.outcome = Some(outcome),
            None if self.produced >= self.simulator.config.max_steps => {
                log::warn!(
                    "entry stopped after {} states at {:.3} km without terminating",
                    self.produced,
                    current.altitude_km
                );
            }
            None => self.pending = Some(self.simulator.advance(&current)),
        }

        Some(current)
    }
}

impl FusedIterator for EntrySteps<'_> {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryTrajectory {
    pub states: Vec<EntryState>,
    /// `None` when the step limit cut the entry short
    pub outcome: Option<EntryOutcome>,
}

impl EntryTrajectory {
    pub fn terminal_state(&self) -> Option<&EntryState> {
        self.states.last()
    }

    /// Terminal state and outcome, or a degenerate-impact error if the entry
    /// never finished.
    pub fn finish(&self) -> Result<(EntryState, EntryOutcome), SimulationError> {
        match (self.terminal_state(), self.outcome) {
            (Some(state), Some(outcome)) => Ok((*state, outcome)),
            (Some(state), None) => Err(SimulationError::DegenerateImpact(format!(
                "entry did not terminate within {} steps (stalled at {:.3} km)",
                self.states.len(),
                state.altitude_km
            ))),
            (None, _) => Err(SimulationError::DegenerateImpact(
                "entry produced no states".to_string(),
            )),
        }
    }
}
