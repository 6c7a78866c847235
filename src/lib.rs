//! Conway's Game of Life on an unbounded grid.
//!
//! A [`CellState`] is an immutable set of alive cells. Two evaluators
//! implement [`GameOfLifeAlgorithm`]: [`NaiveAlgorithm`] counts neighbors
//! one generation at a time, [`HashLifeAlgorithm`] memoizes a hash-consed
//! quadtree and jumps by powers of two. [`AlgorithmType`] selects between
//! them at runtime.
//!
//! ```rust
//! use life_engine::{GameOfLifeAlgorithm, HashLifeAlgorithm, presets};
//!
//! let glider = presets::glider().cells;
//! let far = HashLifeAlgorithm::default().compute_generation_with_step(&glider, 1_000_000);
//! assert_eq!(far, glider.offset(life_engine::Point::new(250_000, 250_000)));
//! ```

// Domain layer - Core business logic
pub mod domain;

// Application layer - Use cases and coordination
pub mod application;

// Infrastructure layer - config, pattern files, errors
pub mod config;
pub mod error;
pub mod format;

// Re-exports for convenience
pub use application::{BackgroundEvaluator, EvaluationHandle, Simulation};
pub use config::{ConfigError, EngineConfig};
pub use domain::{
    AlgorithmType, CellState, GameOfLifeAlgorithm, HashLifeAlgorithm, LifeRule, NaiveAlgorithm,
    Pattern, Point, Rect, presets,
};
pub use error::{Error, Result};
pub use format::{CellStateFormat, FormatError, ParsedPattern, parse_cell_state};
