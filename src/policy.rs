//! Lockdown policies: given the case and death history so far, decide how many ticks of
//! lockdown to declare (0 for none).
use serde::{Deserialize, Serialize};

/// Ticks per simulated day in the reference scenario.
pub const TICKS_PER_DAY: usize = 12;

/// Lockdown length of the reference policy: three weeks.
pub const DEFAULT_LOCKDOWN_DURATION: usize = 21 * TICKS_PER_DAY;

pub trait LockdownPolicy {
    /// Returns the length of the lockdown to declare now, in ticks. The histories hold one entry
    /// per completed tick, oldest first.
    fn decide(&self, active_cases: &[usize], deaths: &[usize], population_size: usize) -> usize;
}

impl<F> LockdownPolicy for F
where
    F: Fn(&[usize], &[usize], usize) -> usize,
{
    fn decide(&self, active_cases: &[usize], deaths: &[usize], population_size: usize) -> usize {
        self(active_cases, deaths, population_size)
    }
}

fn tail(series: &[usize], window: usize) -> &[usize] {
    &series[series.len().saturating_sub(window)..]
}

fn exceeds(count: usize, population_size: usize, threshold: f64) -> bool {
    population_size > 0 && count as f64 / population_size as f64 > threshold
}

/// Declares a lockdown whenever the peak number of active cases over the last `window` ticks
/// is above `threshold` of the population.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaseThresholdPolicy {
    pub window: usize,
    pub threshold: f64,
    pub duration: usize,
}

impl Default for CaseThresholdPolicy {
    fn default() -> Self {
        CaseThresholdPolicy {
            window: 20,
            threshold: 0.2,
            duration: DEFAULT_LOCKDOWN_DURATION,
        }
    }
}

impl LockdownPolicy for CaseThresholdPolicy {
    fn decide(&self, active_cases: &[usize], _deaths: &[usize], population_size: usize) -> usize {
        match tail(active_cases, self.window).iter().max() {
            Some(&peak) if exceeds(peak, population_size, self.threshold) => self.duration,
            _ => 0,
        }
    }
}

/// Declares a lockdown when the deaths added over the last `window` ticks are above
/// `threshold` of the population.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeathTrendPolicy {
    pub window: usize,
    pub threshold: f64,
    pub duration: usize,
}

impl Default for DeathTrendPolicy {
    fn default() -> Self {
        DeathTrendPolicy {
            window: 7 * TICKS_PER_DAY,
            threshold: 0.001,
            duration: DEFAULT_LOCKDOWN_DURATION,
        }
    }
}

impl LockdownPolicy for DeathTrendPolicy {
    fn decide(&self, _active_cases: &[usize], deaths: &[usize], population_size: usize) -> usize {
        // The window spans `window` increments, so it needs one extra sample.
        let recent = tail(deaths, self.window.saturating_add(1));
        let (Some(first), Some(last)) = (recent.first(), recent.last()) else {
            return 0;
        };
        if exceeds(last.saturating_sub(*first), population_size, self.threshold) {
            self.duration
        } else {
            0
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeverLockdown;

impl LockdownPolicy for NeverLockdown {
    fn decide(&self, _active_cases: &[usize], _deaths: &[usize], _population_size: usize) -> usize {
        0
    }
}

/// The built-in policies as they appear in a configuration file, e.g.
/// `{"kind": "case_threshold", "threshold": 0.2}`. Omitted fields take the policy's defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LockdownPolicyConfig {
    CaseThreshold(CaseThresholdPolicy),
    DeathTrend(DeathTrendPolicy),
    Never,
}

impl Default for LockdownPolicyConfig {
    fn default() -> Self {
        LockdownPolicyConfig::CaseThreshold(CaseThresholdPolicy::default())
    }
}

impl LockdownPolicyConfig {
    pub fn build(self) -> Box<dyn LockdownPolicy> {
        match self {
            LockdownPolicyConfig::CaseThreshold(policy) => Box::new(policy),
            LockdownPolicyConfig::DeathTrend(policy) => Box::new(policy),
            LockdownPolicyConfig::Never => Box::new(NeverLockdown),
        }
    }

    pub(crate) fn threshold(&self) -> Option<f64> {
        match self {
            LockdownPolicyConfig::CaseThreshold(policy) => Some(policy.threshold),
            LockdownPolicyConfig::DeathTrend(policy) => Some(policy.threshold),
            LockdownPolicyConfig::Never => None,
        }
    }
}
