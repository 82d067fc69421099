//! The simulation clock.
//!
//! One tick is:
//!
//! 1. record the aggregate counts into the history;
//! 2. update the hospital gate from the counts just recorded;
//! 3. step every living agent once, in a fresh random order;
//! 4. count the lockdown down, or ask the policy whether to declare one;
//! 5. advance the cycle counter.
//!
//! Agents read the gates through a [`TickGates`] snapshot taken before step 3, so admissions
//! see the previous tick's bed occupancy rather than a live count. Activation order matters:
//! within a tick, whoever steps first infects or moves first.
use log::{info, trace};

use crate::controller::{FeedbackController, TickGates};
use crate::error::EpiError;
use crate::grid::{MultiGrid, Space};
use crate::history::History;
use crate::parameters::Parameters;
use crate::person::{DiseaseRates, PersonId, Progression};
use crate::policy::LockdownPolicy;
use crate::population::{Population, PopulationCounts};
use crate::random::SimRng;

pub struct Simulation<S: Space = MultiGrid> {
    parameters: Parameters,
    rates: DiseaseRates,
    rng: SimRng,
    space: S,
    population: Population,
    controller: FeedbackController,
    history: History,
    current_cycle: usize,
    running: bool,
}

impl Simulation<MultiGrid> {
    /// Builds a simulation on a toroidal grid, using the lockdown policy named in the
    /// parameters.
    ///
    /// # Errors
    /// Returns an error if the parameters fail validation.
    pub fn new(parameters: Parameters, seed: u64) -> Result<Self, EpiError> {
        let policy = parameters.lockdown_policy.build();
        Self::with_policy(parameters, seed, policy)
    }

    /// Like [`Simulation::new`], with a caller-supplied lockdown policy in place of the
    /// configured one.
    ///
    /// # Errors
    /// Returns an error if the parameters fail validation.
    pub fn with_policy(
        parameters: Parameters,
        seed: u64,
        policy: Box<dyn LockdownPolicy>,
    ) -> Result<Self, EpiError> {
        // Validate before the grid is built; it panics on zero dimensions.
        parameters.validate()?;
        let grid = MultiGrid::new(parameters.grid_width, parameters.grid_height);
        Self::with_space(parameters, seed, grid, policy)
    }
}

impl<S: Space> Simulation<S> {
    /// Builds a simulation in an arbitrary, empty space.
    ///
    /// # Errors
    /// Returns an error if the parameters fail validation.
    pub fn with_space(
        parameters: Parameters,
        seed: u64,
        mut space: S,
        policy: Box<dyn LockdownPolicy>,
    ) -> Result<Self, EpiError> {
        parameters.validate()?;
        let mut rng = SimRng::new(seed);
        let population_size = parameters.population_size();
        let bed_capacity = parameters.bed_capacity();
        info!("Population: {population_size}");
        info!("Free beds in the hospital: {bed_capacity}");

        let population = Population::initialize(
            population_size,
            parameters.initial_infected,
            &mut space,
            &mut rng,
        );

        Ok(Simulation {
            rates: DiseaseRates::from(&parameters),
            parameters,
            rng,
            space,
            population,
            controller: FeedbackController::new(bed_capacity, policy),
            history: History::default(),
            current_cycle: 0,
            running: true,
        })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn space(&self) -> &S {
        &self.space
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn counts(&self) -> PopulationCounts {
        self.population.counts()
    }

    pub fn gates(&self) -> TickGates {
        self.controller.gates()
    }

    pub fn bed_capacity(&self) -> usize {
        self.controller.bed_capacity()
    }

    /// Remaining ticks of the current lockdown; 0 when none is in force.
    pub fn lockdown(&self) -> usize {
        self.controller.lockdown()
    }

    pub fn current_cycle(&self) -> usize {
        self.current_cycle
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stops [`Simulation::run`] before its next tick.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self) {
        let counts = self.population.counts();
        self.history.record(counts, self.controller.gates().lockdown);
        trace!("cycle {}: {:?}", self.current_cycle, counts);
        self.controller.update_hospital_gate(counts.hospitalized);

        let gates = self.controller.gates();
        for index in self.rng.permutation(self.population.len()) {
            let person_id = PersonId(index);
            if self.population.get(person_id).is_alive() {
                self.decide_action(person_id, &gates);
            }
        }

        self.controller.update_lockdown(
            self.history.active_cases(),
            self.history.deaths(),
            self.population.len(),
        );
        self.current_cycle += 1;
    }

    /// Runs until the configured `cycles` budget is spent or the run is stopped.
    pub fn run(&mut self) {
        let remaining = self.parameters.cycles.saturating_sub(self.current_cycle);
        self.run_for(remaining);
        info!(
            "run finished after {} cycles: {} deaths",
            self.current_cycle,
            self.population.counts().deaths
        );
    }

    /// Runs at most `cycles` more ticks, stopping early if the run is stopped.
    pub fn run_for(&mut self, cycles: usize) {
        for _ in 0..cycles {
            if !self.running {
                break;
            }
            self.tick();
            if self.parameters.stop_on_extinction
                && self.population.count_where(|person| person.is_infected()) == 0
            {
                info!("no active cases left at cycle {}", self.current_cycle);
                self.stop();
            }
        }
    }

    /// One agent's turn: an infected agent's disease progresses first; then, unless it is
    /// confined by quarantine or lockdown, an agent that was infected when its turn began tries
    /// to infect its cell-mates, and the agent steps to a neighboring cell.
    fn decide_action(&mut self, person_id: PersonId, gates: &TickGates) {
        let person = self.population.get_mut(person_id);
        // An agent that recovers this tick is still infectious for the rest of it.
        let was_infected = person.is_infected();
        if was_infected {
            let progression = person.infection_progression(&self.rates, gates, &mut self.rng);
            if progression != Progression::Continuing {
                trace!("{person_id:?}: {progression:?}");
            }
            if progression == Progression::Died {
                return;
            }
        }

        if self.population.get(person_id).is_confined(gates) {
            return;
        }
        if was_infected {
            self.infect_cellmates(person_id);
        }
        self.move_person(person_id);
    }

    /// Every living cell-mate is a target; `set_infected` ignores immune ones and restarts
    /// the clock of those already infected.
    fn infect_cellmates(&mut self, person_id: PersonId) {
        let position = self.space.position_of(person_id);
        let cellmates = self.space.cell_contents(position);
        for &other in cellmates {
            if other == person_id {
                continue;
            }
            let target = self.population.get_mut(other);
            if target.is_alive() && self.rng.sample_bool(self.parameters.infect_rate) {
                trace!("{person_id:?} infected {other:?}");
                target.set_infected();
            }
        }
    }

    fn move_person(&mut self, person_id: PersonId) {
        assert!(
            self.population.get(person_id).is_alive(),
            "{person_id:?} is dead and cannot move"
        );
        let neighbors = self.space.neighborhood(self.space.position_of(person_id));
        if let Some(&target) = self.rng.choose(&neighbors) {
            self.space.move_to(person_id, target);
        }
    }
}
