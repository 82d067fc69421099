//! Population-wide feedback: hospital bed availability and lockdowns, recomputed between ticks
//! from the aggregate history.
use log::{debug, info};

use crate::policy::LockdownPolicy;

/// The gates every agent reads during a tick. A value snapshot taken before the agents step,
/// so all of them see the same capacity and policy state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickGates {
    /// Beds are available.
    pub hospital_takeup: bool,
    /// Movement and infection spread are suppressed.
    pub lockdown: bool,
}

pub struct FeedbackController {
    bed_capacity: usize,
    hospital_takeup: bool,
    /// Remaining locked-down ticks.
    lockdown: usize,
    policy: Box<dyn LockdownPolicy>,
}

impl FeedbackController {
    pub fn new(bed_capacity: usize, policy: Box<dyn LockdownPolicy>) -> Self {
        FeedbackController {
            bed_capacity,
            hospital_takeup: true,
            lockdown: 0,
            policy,
        }
    }

    pub fn bed_capacity(&self) -> usize {
        self.bed_capacity
    }

    pub fn hospital_takeup(&self) -> bool {
        self.hospital_takeup
    }

    pub fn lockdown(&self) -> usize {
        self.lockdown
    }

    pub fn gates(&self) -> TickGates {
        TickGates {
            hospital_takeup: self.hospital_takeup,
            lockdown: self.lockdown > 0,
        }
    }

    /// Opens the hospital gate iff fewer than `bed_capacity` agents are hospitalized. The count
    /// comes from the last recorded snapshot, so admissions lag occupancy by one tick.
    pub fn update_hospital_gate(&mut self, hospitalized_count: usize) -> bool {
        let takeup = hospitalized_count < self.bed_capacity;
        if takeup != self.hospital_takeup {
            debug!(
                "hospital beds {}: {hospitalized_count} of {} occupied",
                if takeup { "available" } else { "full" },
                self.bed_capacity
            );
        }
        self.hospital_takeup = takeup;
        takeup
    }

    /// Counts an ongoing lockdown down by one tick, or, when none is in force, asks the policy
    /// whether to declare one. Returns the new countdown.
    pub fn update_lockdown(
        &mut self,
        active_cases: &[usize],
        deaths: &[usize],
        population_size: usize,
    ) -> usize {
        if self.lockdown > 0 {
            self.lockdown -= 1;
            if self.lockdown == 0 {
                info!("lockdown lifted");
            }
        } else {
            self.lockdown = self.policy.decide(active_cases, deaths, population_size);
            if self.lockdown > 0 {
                info!("lockdown declared for {} ticks", self.lockdown);
            }
        }
        self.lockdown
    }
}
