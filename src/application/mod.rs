mod evaluator;
mod simulation;

pub use evaluator::{BackgroundEvaluator, EvaluationHandle};
pub use simulation::Simulation;
