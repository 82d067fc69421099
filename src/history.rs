//! Per-tick time series of the aggregate counts.
use serde::Serialize;

use crate::population::PopulationCounts;

/// One tick of history, as written to the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub cycle: usize,
    pub active_cases: usize,
    pub deaths: usize,
    pub immune: usize,
    pub hospitalized: usize,
    pub lockdown: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    active_cases: Vec<usize>,
    deaths: Vec<usize>,
    immune: Vec<usize>,
    hospitalized: Vec<usize>,
    lockdown: Vec<bool>,
}

impl History {
    pub fn record(&mut self, counts: PopulationCounts, lockdown: bool) {
        self.active_cases.push(counts.active_cases);
        self.deaths.push(counts.deaths);
        self.immune.push(counts.immune);
        self.hospitalized.push(counts.hospitalized);
        self.lockdown.push(lockdown);
    }

    pub fn len(&self) -> usize {
        self.active_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_cases.is_empty()
    }

    pub fn active_cases(&self) -> &[usize] {
        &self.active_cases
    }

    pub fn deaths(&self) -> &[usize] {
        &self.deaths
    }

    pub fn immune(&self) -> &[usize] {
        &self.immune
    }

    pub fn hospitalized(&self) -> &[usize] {
        &self.hospitalized
    }

    pub fn lockdown(&self) -> &[bool] {
        &self.lockdown
    }

    pub fn rows(&self) -> impl Iterator<Item = HistoryRow> + '_ {
        (0..self.len()).map(|cycle| HistoryRow {
            cycle,
            active_cases: self.active_cases[cycle],
            deaths: self.deaths[cycle],
            immune: self.immune[cycle],
            hospitalized: self.hospitalized[cycle],
            lockdown: self.lockdown[cycle],
        })
    }
}
