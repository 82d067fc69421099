//! Simulation configuration.
//!
//! Parameters are normally read from a JSON file whose keys match the field names of
//! [`Parameters`]:
//!
//! ```json
//! {
//!     "grid_width": 492,
//!     "grid_height": 492,
//!     "density": 0.259,
//!     "initial_infected": 0.05,
//!     "recovery_period": 168,
//!     "infect_rate": 0.1,
//!     "critical_rate": 0.15,
//!     "hospital_capacity_rate": 0.02,
//!     "immunity_chance": 1.0,
//!     "quarantine_rate": 0.6,
//!     "hospital_period": 252,
//!     "die_in_hospital_rate": 0.000179,
//!     "lockdown_policy": {"kind": "case_threshold"},
//!     "rate_basis": "per_episode"
//! }
//! ```
//!
//! Every key without a default must be present, unknown keys are rejected, and values are
//! range-checked by [`Parameters::validate`] before a simulation is built.
use std::fs;
use std::path::Path;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::EpiError;
use crate::policy::{LockdownPolicyConfig, TICKS_PER_DAY};

/// Fraction of the population-scaled hospital capacity that is available as beds.
const BED_FRACTION: f64 = 0.2;

/// How `critical_rate` and `quarantine_rate` are expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    /// Probabilities are drawn as given, once per tick.
    #[default]
    PerTick,
    /// Probabilities apply to a whole infection and are spread evenly over the recovery period.
    PerEpisode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub grid_width: usize,
    pub grid_height: usize,
    /// Agents per grid cell; the population is `floor(density * width * height)`.
    pub density: f64,
    /// Probability that an agent starts out infected.
    pub initial_infected: f64,
    /// Ticks an infection lasts before the agent recovers.
    pub recovery_period: u32,
    /// Probability that an infectious agent infects a given cell-mate in a tick.
    pub infect_rate: f64,
    pub critical_rate: f64,
    /// Fraction of the population convertible to hospital beds (before `BED_FRACTION`).
    pub hospital_capacity_rate: f64,
    /// Probability of gaining permanent immunity on recovery.
    pub immunity_chance: f64,
    pub quarantine_rate: f64,
    /// Ticks a hospitalized agent occupies a bed.
    pub hospital_period: u32,
    pub die_in_hospital_rate: f64,
    pub lockdown_policy: LockdownPolicyConfig,

    /// Run budget in ticks.
    #[serde(default = "default_cycles")]
    pub cycles: usize,
    #[serde(default)]
    pub rate_basis: RateBasis,
    /// Stop the run once there are no active cases left.
    #[serde(default)]
    pub stop_on_extinction: bool,
}

fn default_cycles() -> usize {
    200 * TICKS_PER_DAY
}

impl Default for Parameters {
    /// A small version of the reference scenario, convenient for experiments and tests.
    fn default() -> Self {
        Parameters {
            grid_width: 50,
            grid_height: 50,
            density: 0.259,
            initial_infected: 0.05,
            recovery_period: 14 * TICKS_PER_DAY as u32,
            infect_rate: 0.1,
            critical_rate: 0.15,
            hospital_capacity_rate: 0.02,
            immunity_chance: 1.0,
            quarantine_rate: 0.6,
            hospital_period: 21 * TICKS_PER_DAY as u32,
            die_in_hospital_rate: 0.000179,
            lockdown_policy: LockdownPolicyConfig::default(),
            cycles: default_cycles(),
            rate_basis: RateBasis::PerEpisode,
            stop_on_extinction: false,
        }
    }
}

impl Parameters {
    /// Parses and validates parameters from a JSON string.
    ///
    /// # Errors
    /// Returns `MissingParameter` for an absent key, `JsonError` for malformed input or unknown
    /// keys, and `InvalidParameter` if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, EpiError> {
        let parameters: Parameters = serde_json::from_str(json)?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Reads, parses and validates parameters from a JSON file.
    ///
    /// # Errors
    /// As [`Parameters::from_json_str`], plus `IoError` if the file cannot be read.
    pub fn from_json_file(path: &Path) -> Result<Self, EpiError> {
        trace!("loading parameters from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks every value against its domain.
    ///
    /// # Errors
    /// Returns `InvalidParameter` naming the first offending parameter.
    pub fn validate(&self) -> Result<(), EpiError> {
        if self.grid_width == 0 {
            return Err(EpiError::invalid("grid_width", "must be positive"));
        }
        if self.grid_height == 0 {
            return Err(EpiError::invalid("grid_height", "must be positive"));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(EpiError::invalid(
                "density",
                format!("must be a positive number, got {}", self.density),
            ));
        }
        if self.recovery_period == 0 {
            return Err(EpiError::invalid("recovery_period", "must be positive"));
        }
        if self.hospital_period == 0 {
            return Err(EpiError::invalid("hospital_period", "must be positive"));
        }

        let probabilities = [
            ("initial_infected", self.initial_infected),
            ("infect_rate", self.infect_rate),
            ("critical_rate", self.critical_rate),
            ("hospital_capacity_rate", self.hospital_capacity_rate),
            ("immunity_chance", self.immunity_chance),
            ("quarantine_rate", self.quarantine_rate),
            ("die_in_hospital_rate", self.die_in_hospital_rate),
        ];
        for (name, value) in probabilities {
            check_probability(name, value)?;
        }
        if let Some(threshold) = self.lockdown_policy.threshold() {
            if !(threshold.is_finite() && threshold >= 0.0) {
                return Err(EpiError::invalid(
                    "lockdown_policy",
                    format!("threshold must be a non-negative number, got {threshold}"),
                ));
            }
        }

        if self.population_size() == 0 {
            return Err(EpiError::invalid(
                "density",
                "grid is too sparse to hold a single agent",
            ));
        }
        Ok(())
    }

    pub fn population_size(&self) -> usize {
        (self.density * self.grid_width as f64 * self.grid_height as f64).floor() as usize
    }

    /// Number of agents that can be hospitalized at once.
    pub fn bed_capacity(&self) -> usize {
        (self.hospital_capacity_rate * self.population_size() as f64 * BED_FRACTION).floor()
            as usize
    }

    pub fn per_tick_critical_rate(&self) -> f64 {
        self.per_tick(self.critical_rate)
    }

    pub fn per_tick_quarantine_rate(&self) -> f64 {
        self.per_tick(self.quarantine_rate)
    }

    fn per_tick(&self, rate: f64) -> f64 {
        match self.rate_basis {
            RateBasis::PerTick => rate,
            RateBasis::PerEpisode => rate / f64::from(self.recovery_period),
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), EpiError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EpiError::invalid(
            name,
            format!("must be within [0, 1], got {value}"),
        ))
    }
}
