//! A spatial agent-based epidemic model with hospital capacity and lockdown feedback.
//!
//! A population of agents lives on a toroidal grid. Each tick every living agent, in random
//! order, progresses its infection, tries to infect the agents sharing its cell, and steps to a
//! neighboring cell. Two population-wide gates feed back into that behavior:
//!
//! * the hospital gate closes once the number of hospitalized agents reaches the bed capacity;
//!   critical cases that find it closed die instead of being admitted;
//! * a [`policy::LockdownPolicy`] reads the case and death history and may declare a lockdown,
//!   during which nobody moves or infects anyone.
//!
//! The crate is organised as follows:
//! * [`simulation`]: the clock that runs ticks and dispatches agent actions;
//! * [`person`]: an agent and its disease state machine;
//! * [`population`]: the agents and the aggregate counts over them;
//! * [`controller`] and [`policy`]: the feedback gates;
//! * [`grid`]: the space agents move in;
//! * [`parameters`], [`history`], [`report`] and [`runner`]: configuration in, data out.
//!
//! ```no_run
//! use epigrid::prelude::*;
//!
//! let mut simulation = Simulation::new(Parameters::default(), 42)?;
//! simulation.run();
//! println!("{:?}", simulation.counts());
//! # Ok::<(), EpiError>(())
//! ```
pub mod controller;
pub mod error;
pub mod grid;
pub mod history;
pub mod log;
pub mod parameters;
pub mod person;
pub mod policy;
pub mod population;
pub mod random;
pub mod report;
pub mod runner;
pub mod simulation;

pub mod prelude {
    pub use crate::controller::TickGates;
    pub use crate::error::EpiError;
    pub use crate::grid::{MultiGrid, Position, Space};
    pub use crate::history::{History, HistoryRow};
    pub use crate::parameters::{Parameters, RateBasis};
    pub use crate::person::{HealthStatus, Person, PersonId};
    pub use crate::policy::{
        CaseThresholdPolicy, DeathTrendPolicy, LockdownPolicy, LockdownPolicyConfig,
        NeverLockdown,
    };
    pub use crate::population::{Population, PopulationCounts};
    pub use crate::report::{write_history, ReportOptions};
    pub use crate::simulation::Simulation;
}
