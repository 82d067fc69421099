//! A single agent and its disease state machine.
//!
//! ```text
//! Susceptible -> Infected -> {Recovered, Hospitalized, Dead}
//! Hospitalized -> {Recovered, Dead}
//! Recovered -> Infected      (only without immunity)
//! ```
//!
//! `Dead` is absorbing. Immunity is a flag rather than a state: once set, the agent can never
//! be infected again.
use log::trace;
use serde::Serialize;

use crate::controller::TickGates;
use crate::parameters::Parameters;
use crate::random::SimRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PersonId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum HealthStatus {
    Susceptible,
    Infected,
    Hospitalized,
    Recovered,
    Dead,
}

/// The per-tick probabilities and durations that drive [`Person::infection_progression`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiseaseRates {
    pub recovery_period: u32,
    pub critical_rate: f64,
    pub quarantine_rate: f64,
    pub immunity_chance: f64,
    pub hospital_period: u32,
    pub die_in_hospital_rate: f64,
}

impl From<&Parameters> for DiseaseRates {
    fn from(parameters: &Parameters) -> Self {
        DiseaseRates {
            recovery_period: parameters.recovery_period,
            critical_rate: parameters.per_tick_critical_rate(),
            quarantine_rate: parameters.per_tick_quarantine_rate(),
            immunity_chance: parameters.immunity_chance,
            hospital_period: parameters.hospital_period,
            die_in_hospital_rate: parameters.die_in_hospital_rate,
        }
    }
}

/// The branch of [`Person::infection_progression`] taken in a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progression {
    /// Still infected, nothing changed besides the infection clock.
    Continuing,
    /// Still infected and went into quarantine this tick.
    Quarantined,
    Hospitalized,
    Recovered,
    Died,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Person {
    id: PersonId,
    alive: bool,
    infected: bool,
    immune: bool,
    quarantined: bool,
    /// Ticks of hospital stay left; 0 means not hospitalized.
    hospital_beds_remaining: u32,
    ticks_since_infected: u32,
    ever_infected: bool,
}

impl Person {
    pub fn new(id: PersonId) -> Self {
        Person {
            id,
            alive: true,
            infected: false,
            immune: false,
            quarantined: false,
            hospital_beds_remaining: 0,
            ticks_since_infected: 0,
            ever_infected: false,
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_infected(&self) -> bool {
        self.infected
    }

    pub fn is_immune(&self) -> bool {
        self.immune
    }

    pub fn is_quarantined(&self) -> bool {
        self.quarantined
    }

    pub fn is_hospitalized(&self) -> bool {
        self.hospital_beds_remaining > 0
    }

    pub fn hospital_beds_remaining(&self) -> u32 {
        self.hospital_beds_remaining
    }

    pub fn ticks_since_infected(&self) -> u32 {
        self.ticks_since_infected
    }

    pub fn health_status(&self) -> HealthStatus {
        if !self.alive {
            HealthStatus::Dead
        } else if self.is_hospitalized() {
            HealthStatus::Hospitalized
        } else if self.infected {
            HealthStatus::Infected
        } else if self.ever_infected {
            HealthStatus::Recovered
        } else {
            HealthStatus::Susceptible
        }
    }

    /// Whether this agent stays put and keeps to itself this tick.
    pub fn is_confined(&self, gates: &TickGates) -> bool {
        self.quarantined || gates.lockdown
    }

    /// Infects the agent unless it is immune. Restarts the infection clock.
    pub fn set_infected(&mut self) {
        assert!(self.alive, "{:?} is dead and cannot be infected", self.id);
        if self.immune {
            return;
        }
        self.infected = true;
        self.ever_infected = true;
        self.ticks_since_infected = 0;
    }

    /// Ends the infection. The agent becomes immune with probability `immunity_chance`.
    pub fn recover(&mut self, immunity_chance: f64, rng: &mut SimRng) {
        self.infected = false;
        self.quarantined = false;
        self.hospital_beds_remaining = 0;
        self.ticks_since_infected = 0;
        if rng.sample_bool(immunity_chance) {
            self.immune = true;
        }
    }

    /// Admits the agent to hospital for `hospital_period` ticks. Hospital implies quarantine.
    pub fn hospitalize(&mut self, hospital_period: u32) {
        self.hospital_beds_remaining = hospital_period;
        self.quarantined = true;
    }

    pub fn die(&mut self) {
        self.alive = false;
        self.infected = false;
        self.immune = false;
        self.quarantined = false;
        self.hospital_beds_remaining = 0;
        self.ticks_since_infected = 0;
    }

    /// Advances an infected agent by one tick. The checks run in a fixed order and stop at the
    /// first branch that settles the tick:
    ///
    /// 1. a hospitalized agent may die, otherwise it uses up a day of its stay and recovers once
    ///    the stay is over;
    /// 2. a non-hospitalized agent may go into quarantine;
    /// 3. within the recovery period it may turn critical, and is then hospitalized if
    ///    `gates.hospital_takeup` says beds are free, or dies if not;
    /// 4. past the recovery period it recovers.
    pub fn infection_progression(
        &mut self,
        rates: &DiseaseRates,
        gates: &TickGates,
        rng: &mut SimRng,
    ) -> Progression {
        assert!(
            self.alive && self.infected,
            "{:?} must be alive and infected to progress",
            self.id
        );
        self.ticks_since_infected += 1;

        if self.is_hospitalized() {
            if rng.sample_bool(rates.die_in_hospital_rate) {
                trace!("{:?} died in hospital", self.id);
                self.die();
                return Progression::Died;
            }
            self.hospital_beds_remaining -= 1;
            if self.hospital_beds_remaining == 0 {
                trace!("{:?} discharged from hospital", self.id);
                self.recover(rates.immunity_chance, rng);
                return Progression::Recovered;
            }
            return Progression::Continuing;
        }

        let mut progression = Progression::Continuing;
        if rng.sample_bool(rates.quarantine_rate) && !self.quarantined {
            self.quarantined = true;
            progression = Progression::Quarantined;
        }

        if self.ticks_since_infected < rates.recovery_period {
            if rng.sample_bool(rates.critical_rate) {
                if gates.hospital_takeup {
                    trace!("{:?} hospitalized", self.id);
                    self.hospitalize(rates.hospital_period);
                    return Progression::Hospitalized;
                }
                trace!("{:?} died without a hospital bed", self.id);
                self.die();
                return Progression::Died;
            }
            progression
        } else {
            self.recover(rates.immunity_chance, rng);
            Progression::Recovered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> DiseaseRates {
        DiseaseRates {
            recovery_period: 10,
            critical_rate: 0.0,
            quarantine_rate: 0.0,
            immunity_chance: 1.0,
            hospital_period: 3,
            die_in_hospital_rate: 0.0,
        }
    }

    const OPEN: TickGates = TickGates {
        hospital_takeup: true,
        lockdown: false,
    };

    const FULL: TickGates = TickGates {
        hospital_takeup: false,
        lockdown: false,
    };

    fn infected_person() -> Person {
        let mut person = Person::new(PersonId(0));
        person.set_infected();
        person
    }

    #[test]
    fn new_person_is_susceptible() {
        let person = Person::new(PersonId(3));
        assert_eq!(person.health_status(), HealthStatus::Susceptible);
        assert_eq!(person.id(), PersonId(3));
    }

    #[test]
    fn immune_person_cannot_be_infected() {
        let mut rng = SimRng::new(0);
        let mut person = infected_person();
        person.recover(1.0, &mut rng);
        assert!(person.is_immune());
        person.set_infected();
        assert!(!person.is_infected());
        assert_eq!(person.health_status(), HealthStatus::Recovered);
    }

    #[test]
    fn recovered_without_immunity_can_be_reinfected() {
        let mut rng = SimRng::new(0);
        let mut person = infected_person();
        person.recover(0.0, &mut rng);
        assert!(!person.is_immune());
        person.set_infected();
        assert_eq!(person.health_status(), HealthStatus::Infected);
    }

    #[test]
    fn set_infected_restarts_clock() {
        let mut rng = SimRng::new(0);
        let mut person = infected_person();
        person.infection_progression(&rates(), &OPEN, &mut rng);
        assert_eq!(person.ticks_since_infected(), 1);
        person.set_infected();
        assert_eq!(person.ticks_since_infected(), 0);
    }

    #[test]
    fn recovers_once_recovery_period_elapses() {
        let mut rng = SimRng::new(0);
        let mut person = infected_person();
        for _ in 0..9 {
            assert_eq!(
                person.infection_progression(&rates(), &OPEN, &mut rng),
                Progression::Continuing
            );
        }
        assert_eq!(
            person.infection_progression(&rates(), &OPEN, &mut rng),
            Progression::Recovered
        );
        assert!(!person.is_infected());
        assert!(person.is_immune());
        assert_eq!(person.ticks_since_infected(), 0);
    }

    #[test]
    fn critical_case_is_hospitalized_when_beds_are_free() {
        let mut rng = SimRng::new(0);
        let mut person = infected_person();
        let critical = DiseaseRates {
            critical_rate: 1.0,
            ..rates()
        };
        assert_eq!(
            person.infection_progression(&critical, &OPEN, &mut rng),
            Progression::Hospitalized
        );
        assert_eq!(person.hospital_beds_remaining(), 3);
        assert!(person.is_quarantined());
        assert_eq!(person.health_status(), HealthStatus::Hospitalized);
    }

    #[test]
    fn critical_case_dies_when_hospitals_are_full() {
        let mut rng = SimRng::new(0);
        let mut person = infected_person();
        let critical = DiseaseRates {
            critical_rate: 1.0,
            recovery_period: u32::MAX,
            ..rates()
        };
        assert_eq!(
            person.infection_progression(&critical, &FULL, &mut rng),
            Progression::Died
        );
        assert_eq!(person.health_status(), HealthStatus::Dead);
        assert!(!person.is_infected() && !person.is_quarantined() && !person.is_immune());
        assert_eq!(person.hospital_beds_remaining(), 0);
    }

    #[test]
    fn hospital_stay_ends_in_recovery() {
        let mut rng = SimRng::new(0);
        let mut person = infected_person();
        person.hospitalize(3);
        // The stay is not interrupted by new critical draws.
        let critical = DiseaseRates {
            critical_rate: 1.0,
            ..rates()
        };
        assert_eq!(
            person.infection_progression(&critical, &FULL, &mut rng),
            Progression::Continuing
        );
        assert_eq!(
            person.infection_progression(&critical, &FULL, &mut rng),
            Progression::Continuing
        );
        assert_eq!(
            person.infection_progression(&critical, &FULL, &mut rng),
            Progression::Recovered
        );
        assert!(!person.is_hospitalized());
        assert!(!person.is_quarantined());
        assert!(person.is_alive());
    }

    #[test]
    fn hospitalized_person_can_die() {
        let mut rng = SimRng::new(0);
        let mut person = infected_person();
        person.hospitalize(3);
        let deadly = DiseaseRates {
            die_in_hospital_rate: 1.0,
            ..rates()
        };
        assert_eq!(
            person.infection_progression(&deadly, &OPEN, &mut rng),
            Progression::Died
        );
        assert!(!person.is_alive());
        assert_eq!(person.hospital_beds_remaining(), 0);
    }

    #[test]
    fn quarantine_is_reported_once() {
        let mut rng = SimRng::new(0);
        let mut person = infected_person();
        let isolating = DiseaseRates {
            quarantine_rate: 1.0,
            ..rates()
        };
        assert_eq!(
            person.infection_progression(&isolating, &OPEN, &mut rng),
            Progression::Quarantined
        );
        assert_eq!(
            person.infection_progression(&isolating, &OPEN, &mut rng),
            Progression::Continuing
        );
        assert!(person.is_quarantined() && person.is_infected());
    }

    #[test]
    fn confinement_follows_quarantine_and_lockdown() {
        let mut person = infected_person();
        let locked = TickGates {
            hospital_takeup: true,
            lockdown: true,
        };
        assert!(!person.is_confined(&OPEN));
        assert!(person.is_confined(&locked));
        person.hospitalize(2);
        assert!(person.is_confined(&OPEN));
    }

    #[test]
    #[should_panic(expected = "cannot be infected")]
    fn infecting_the_dead_panics() {
        let mut person = Person::new(PersonId(0));
        person.die();
        person.set_infected();
    }

    #[test]
    #[should_panic(expected = "must be alive and infected")]
    fn progressing_a_healthy_person_panics() {
        let mut rng = SimRng::new(0);
        Person::new(PersonId(0)).infection_progression(&rates(), &OPEN, &mut rng);
    }
}
