//! The single seedable random source of a simulation instance.
//!
//! Every probabilistic branch of a run (agent placement, activation order, infection draws,
//! state-transition draws, movement targets) goes through one [`SimRng`], so two simulations
//! built from the same parameters and seed produce identical histories.
use log::trace;
use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};

pub struct SimRng {
    seed: u64,
    rng: StdRng,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        trace!("initializing random source with seed {seed}");
        SimRng {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Gets a random boolean value which is true with probability `p`.
    ///
    /// Probabilities are validated when the parameters are loaded, so `p` outside `[0, 1]` is a
    /// caller bug and panics.
    pub fn sample_bool(&mut self, p: f64) -> bool {
        self.rng.random_bool(p)
    }

    /// Gets a random sample within `range`.
    pub fn sample_range<S, T>(&mut self, range: S) -> T
    where
        S: SampleRange<T>,
        T: SampleUniform,
    {
        self.rng.random_range(range)
    }

    /// Chooses one element of `items` uniformly, or `None` if it is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Returns a fresh uniformly random permutation of `0..n`.
    pub fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut self.rng);
        order
    }
}
