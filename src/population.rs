//! The set of all agents, in creation order.
use log::info;
use serde::Serialize;

use crate::grid::Space;
use crate::person::{Person, PersonId};
use crate::random::SimRng;

/// Aggregate counts over the population at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PopulationCounts {
    pub active_cases: usize,
    pub deaths: usize,
    pub immune: usize,
    pub hospitalized: usize,
}

#[derive(Default)]
pub struct Population {
    people: Vec<Person>,
}

impl Population {
    /// Creates `count` agents, each infected with probability `initial_infected`, and places
    /// each on a uniformly random cell of `space`.
    pub fn initialize(
        count: usize,
        initial_infected: f64,
        space: &mut impl Space,
        rng: &mut SimRng,
    ) -> Self {
        let mut people = Vec::with_capacity(count);
        for index in 0..count {
            let mut person = Person::new(PersonId(index));
            if rng.sample_bool(initial_infected) {
                person.set_infected();
            }
            let position = space.random_position(rng);
            space.place(person.id(), position);
            people.push(person);
        }
        let population = Population { people };
        info!(
            "created {count} people, {} initially infected",
            population.count_where(Person::is_infected)
        );
        population
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn get(&self, person_id: PersonId) -> &Person {
        &self.people[person_id.0]
    }

    pub fn get_mut(&mut self, person_id: PersonId) -> &mut Person {
        &mut self.people[person_id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    pub fn count_where(&self, predicate: impl Fn(&Person) -> bool) -> usize {
        self.people.iter().filter(|person| predicate(person)).count()
    }

    pub fn counts(&self) -> PopulationCounts {
        PopulationCounts {
            active_cases: self.count_where(Person::is_infected),
            deaths: self.count_where(|person| !person.is_alive()),
            immune: self.count_where(Person::is_immune),
            hospitalized: self.count_where(Person::is_hospitalized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MultiGrid;

    #[test]
    fn initialize_places_everyone() {
        let mut grid = MultiGrid::new(4, 4);
        let mut rng = SimRng::new(11);
        let population = Population::initialize(30, 0.0, &mut grid, &mut rng);
        assert_eq!(population.len(), 30);
        let placed: usize = (0..4)
            .flat_map(|x| (0..4).map(move |y| (x, y)))
            .map(|position| grid.cell_contents(position).len())
            .sum();
        assert_eq!(placed, 30);
        assert_eq!(population.counts(), PopulationCounts::default());
    }

    #[test]
    fn initial_infection_probability_extremes() {
        let mut rng = SimRng::new(11);
        let all = Population::initialize(25, 1.0, &mut MultiGrid::new(5, 5), &mut rng);
        assert_eq!(all.counts().active_cases, 25);
        let none = Population::initialize(25, 0.0, &mut MultiGrid::new(5, 5), &mut rng);
        assert_eq!(none.counts().active_cases, 0);
    }

    #[test]
    fn counts_track_state() {
        let mut rng = SimRng::new(11);
        let mut population = Population::initialize(4, 1.0, &mut MultiGrid::new(2, 2), &mut rng);
        population.get_mut(PersonId(0)).die();
        population.get_mut(PersonId(1)).recover(1.0, &mut rng);
        population.get_mut(PersonId(2)).hospitalize(5);
        assert_eq!(
            population.counts(),
            PopulationCounts {
                active_cases: 2,
                deaths: 1,
                immune: 1,
                hospitalized: 1,
            }
        );
    }

    #[test]
    fn count_where_is_idempotent() {
        let mut rng = SimRng::new(5);
        let population = Population::initialize(50, 0.5, &mut MultiGrid::new(5, 5), &mut rng);
        let first = population.count_where(Person::is_infected);
        assert_eq!(population.count_where(Person::is_infected), first);
        assert_eq!(population.counts(), population.counts());
    }
}
