//! Naive evaluator: per-cell neighbor counting over the sparse alive set.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use rayon::prelude::*;

use super::{Cell, CellState, GameOfLifeAlgorithm, LifeRule, Point, Rule};

/// Advances one generation at a time by visiting every alive cell and its
/// neighborhood. Cost is proportional to population times generations.
#[derive(Clone, Debug)]
pub struct NaiveAlgorithm {
    rule: LifeRule,
    /// Candidate count above which counting runs on the rayon pool
    parallel_threshold: usize,
}

impl Default for NaiveAlgorithm {
    fn default() -> Self {
        Self::new(LifeRule::conway())
    }
}

impl NaiveAlgorithm {
    pub fn new(rule: LifeRule) -> Self {
        Self {
            rule,
            parallel_threshold: 4096,
        }
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// One generation, serial.
    /// Counts are accumulated by scattering from alive cells, so every
    /// key of `counts` is a neighbor of some alive cell.
    pub fn evolve(&self, state: &CellState) -> CellState {
        let mut counts: HashMap<Point, u8> = HashMap::with_capacity(state.len() * 8);
        for cell in state.iter() {
            for neighbor in cell.neighbors() {
                *counts.entry(neighbor).or_insert(0) += 1;
            }
        }

        // Alive cells with no alive neighbors never appear in `counts`.
        let isolated = state
            .iter()
            .filter(|p| !counts.contains_key(p))
            .map(|p| (p, 0u8));

        counts
            .iter()
            .map(|(&p, &n)| (p, n))
            .chain(isolated)
            .filter(|&(p, n)| {
                self.rule
                    .evolve(Cell::from(state.contains(p)), n)
                    .is_alive()
            })
            .map(|(p, _)| p)
            .collect()
    }

    /// One generation with neighbor counting spread over the rayon pool.
    /// Produces exactly the same state as [`NaiveAlgorithm::evolve`].
    pub fn evolve_parallel(&self, state: &CellState) -> CellState {
        let alive: HashSet<Point> = state.iter().collect();
        let candidates: HashSet<Point> = state
            .iter()
            .flat_map(|p| p.neighbors())
            .chain(state.iter())
            .collect();
        let candidates: Vec<Point> = candidates.into_iter().collect();

        let survivors: Vec<Point> = candidates
            .par_iter()
            .filter(|p| {
                let neighbors = p.neighbors().filter(|n| alive.contains(n)).count() as u8;
                self.rule
                    .evolve(Cell::from(alive.contains(*p)), neighbors)
                    .is_alive()
            })
            .copied()
            .collect();

        survivors.into_iter().collect()
    }

    fn evolve_once(&self, state: &CellState) -> CellState {
        // Each alive cell contributes at most 9 candidates.
        if state.len().saturating_mul(9) > self.parallel_threshold {
            self.evolve_parallel(state)
        } else {
            self.evolve(state)
        }
    }
}

impl GameOfLifeAlgorithm for NaiveAlgorithm {
    fn compute_generation_with_step(&self, state: &CellState, step: u64) -> CellState {
        let start = Instant::now();
        let mut current = state.clone();
        for generation in 0..step {
            if current.is_empty() {
                log::trace!("naive: state died out after {} generations", generation);
                break;
            }
            current = self.evolve_once(&current);
        }
        log::debug!(
            "naive: advanced {} generations, population {} -> {} in {:.3} ms",
            step,
            state.len(),
            current.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        current
    }

    fn rule(&self) -> &LifeRule {
        &self.rule
    }
}
