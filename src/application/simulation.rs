use std::sync::Arc;
use std::time::Instant;

use crate::config::{ConfigError, EngineConfig};
use crate::domain::{AlgorithmType, CellState, GameOfLifeAlgorithm};

/// Simulation orchestrates a running pattern.
/// This is the application layer that coordinates domain logic.
pub struct Simulation {
    cells: CellState,
    algorithm_type: AlgorithmType,
    algorithm: Arc<dyn GameOfLifeAlgorithm>,
    config: EngineConfig,
    pub is_running: bool,
    pub generation: u64,
    pub generations_per_step: u64,
    pub target_steps_per_second: f64,
    pub update_timer: f64,
    /// Evolution performance metric
    pub last_evolution_time_ms: f32,
}

impl Simulation {
    /// Empty simulation using the configured algorithm, rule and pacing
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let algorithm_type = config.algorithm;
        let algorithm = Arc::from(algorithm_type.build(&config)?);
        Ok(Self {
            cells: CellState::empty(),
            algorithm_type,
            algorithm,
            generations_per_step: config.simulation.generations_per_step,
            target_steps_per_second: config.simulation.target_steps_per_second,
            config,
            is_running: false,
            generation: 0,
            update_timer: 0.0,
            last_evolution_time_ms: 0.0,
        })
    }

    /// Start from `cells` (builder pattern)
    pub fn with_cells(mut self, cells: CellState) -> Self {
        self.set_cell_state(cells);
        self
    }

    pub fn cells(&self) -> &CellState {
        &self.cells
    }

    pub fn algorithm_type(&self) -> AlgorithmType {
        self.algorithm_type
    }

    /// Shared handle to the active evaluator, for use off this thread
    pub fn algorithm(&self) -> Arc<dyn GameOfLifeAlgorithm> {
        Arc::clone(&self.algorithm)
    }

    /// Replace the pattern and reset the generation counter
    pub fn set_cell_state(&mut self, cells: CellState) {
        self.cells = cells;
        self.generation = 0;
        self.update_timer = 0.0;
    }

    /// Swap the evaluator; the current pattern and generation are kept
    pub fn set_algorithm(&mut self, algorithm_type: AlgorithmType) -> Result<(), ConfigError> {
        if algorithm_type == self.algorithm_type {
            return Ok(());
        }
        self.algorithm = Arc::from(algorithm_type.build(&self.config)?);
        self.algorithm_type = algorithm_type;
        log::info!("switched evaluator to {}", algorithm_type);
        Ok(())
    }

    /// Set running state (builder pattern)
    pub fn with_running(mut self, running: bool) -> Self {
        self.is_running = running;
        self
    }

    /// Toggle play/pause state
    pub fn toggle_running(mut self) -> Self {
        self.is_running = !self.is_running;
        self
    }

    /// Remove every cell and reset generation counter
    pub fn clear(mut self) -> Self {
        self.set_cell_state(CellState::empty());
        self.is_running = false;
        self
    }

    /// Change how many steps run per second while running
    pub fn adjust_speed(mut self, delta: f64) -> Self {
        self.target_steps_per_second = (self.target_steps_per_second + delta).clamp(1.0, 240.0);
        self
    }

    /// Advance by `generations_per_step` right away, running or not
    pub fn step(mut self) -> Self {
        let start = Instant::now();
        self.cells = self
            .algorithm
            .compute_generation_with_step(&self.cells, self.generations_per_step);
        self.generation += self.generations_per_step;
        self.last_evolution_time_ms = start.elapsed().as_secs_f32() * 1000.0;
        log::trace!(
            "generation {} population {} ({:.3} ms)",
            self.generation,
            self.cells.len(),
            self.last_evolution_time_ms
        );
        self
    }

    /// Update simulation by one frame.
    /// Steps once the accumulated time reaches the step interval.
    pub fn tick(mut self, delta_seconds: f64) -> Self {
        if !self.is_running {
            return self;
        }

        self.update_timer += delta_seconds;
        let update_interval = 1.0 / self.target_steps_per_second;

        if self.update_timer >= update_interval {
            self = self.step();
            self.update_timer = 0.0;
        }

        self
    }
}
