mod algorithm;
mod cell;
mod cell_state;
pub mod hashlife;
mod naive;
mod patterns;
pub mod point;
mod rules;

pub use algorithm::{
    AlgorithmType, GameOfLifeAlgorithm, Generations, UnknownAlgorithm, generations_with_step,
};
pub use cell::Cell;
pub use cell_state::CellState;
pub use hashlife::HashLifeAlgorithm;
pub use naive::NaiveAlgorithm;
pub use patterns::{Pattern, presets, random_soup};
pub use point::{Point, Rect};
pub use rules::{LifeRule, Rule, RuleError, all_rules};
