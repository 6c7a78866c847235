//! Evaluator selection and the strategy trait both evaluators implement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CellState, HashLifeAlgorithm, LifeRule, NaiveAlgorithm};
use crate::config::{ConfigError, EngineConfig};

/// A Game of Life evaluator.
///
/// Implementations are pure with respect to their input: the given state is
/// an immutable snapshot and a new state is returned.
pub trait GameOfLifeAlgorithm: Send + Sync {
    /// The state `step` generations after `state`. `step == 0` is the identity.
    fn compute_generation_with_step(&self, state: &CellState, step: u64) -> CellState;

    /// The rule this evaluator applies
    fn rule(&self) -> &LifeRule;

    /// `state`, then every `step` generations after it, without end
    fn generations_with_step<'a>(
        &'a self,
        state: &CellState,
        step: u64,
    ) -> Generations<'a, Self>
    where
        Self: Sized,
    {
        Generations {
            algorithm: self,
            next: Some(state.clone()),
            step,
        }
    }
}

/// Iterator returned by [`GameOfLifeAlgorithm::generations_with_step`]
pub struct Generations<'a, A: ?Sized> {
    algorithm: &'a A,
    next: Option<CellState>,
    step: u64,
}

impl<A: GameOfLifeAlgorithm + ?Sized> Iterator for Generations<'_, A> {
    type Item = CellState;

    fn next(&mut self) -> Option<CellState> {
        let current = self.next.take()?;
        self.next = Some(
            self.algorithm
                .compute_generation_with_step(&current, self.step),
        );
        Some(current)
    }
}

/// Same as [`GameOfLifeAlgorithm::generations_with_step`] for boxed evaluators
pub fn generations_with_step<'a>(
    algorithm: &'a dyn GameOfLifeAlgorithm,
    state: &CellState,
    step: u64,
) -> Generations<'a, dyn GameOfLifeAlgorithm + 'a> {
    Generations {
        algorithm,
        next: Some(state.clone()),
        step,
    }
}

/// Available evaluators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmType {
    /// Neighbor counting over the alive set, one generation at a time
    Naive,
    /// Memoized quadtree, jumps by powers of two
    #[default]
    #[serde(alias = "hash-life", alias = "hash_life")]
    HashLife,
}

impl AlgorithmType {
    pub fn all() -> Vec<AlgorithmType> {
        vec![AlgorithmType::Naive, AlgorithmType::HashLife]
    }

    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmType::Naive => "Naive",
            AlgorithmType::HashLife => "HashLife",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AlgorithmType::Naive => "Sparse cell set, per-cell neighbor count",
            AlgorithmType::HashLife => "Hash-consed quadtree with memoized advance",
        }
    }

    /// Construct the evaluator this type names
    pub fn build(&self, config: &EngineConfig) -> Result<Box<dyn GameOfLifeAlgorithm>, ConfigError> {
        let rule = config.life_rule()?;
        let algorithm: Box<dyn GameOfLifeAlgorithm> = match self {
            AlgorithmType::Naive => Box::new(
                NaiveAlgorithm::new(rule).with_parallel_threshold(config.naive.parallel_threshold),
            ),
            AlgorithmType::HashLife => {
                Box::new(HashLifeAlgorithm::new(rule).with_max_nodes(config.hashlife.max_nodes))
            }
        };
        Ok(algorithm)
    }
}

impl FromStr for AlgorithmType {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive" => Ok(AlgorithmType::Naive),
            "hashlife" | "hash-life" | "hash_life" => Ok(AlgorithmType::HashLife),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown algorithm '{0}', expected 'naive' or 'hashlife'")]
pub struct UnknownAlgorithm(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::presets;

    #[test]
    fn test_default_is_hashlife() {
        assert_eq!(AlgorithmType::default(), AlgorithmType::HashLife);
    }

    #[test]
    fn test_names_are_unique() {
        let names: Vec<_> = AlgorithmType::all().iter().map(|a| a.name()).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Naive".parse::<AlgorithmType>(), Ok(AlgorithmType::Naive));
        assert_eq!("hash-life".parse::<AlgorithmType>(), Ok(AlgorithmType::HashLife));
        assert!("quicklife".parse::<AlgorithmType>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&AlgorithmType::HashLife).unwrap();
        assert_eq!(json, "\"hashlife\"");
        let parsed: AlgorithmType = serde_json::from_str("\"hash-life\"").unwrap();
        assert_eq!(parsed, AlgorithmType::HashLife);
    }

    #[test]
    fn test_build_every_type() {
        let config = EngineConfig::default();
        let blinker = presets::blinker().cells;
        for kind in AlgorithmType::all() {
            let algorithm = kind.build(&config).unwrap();
            assert_eq!(algorithm.compute_generation_with_step(&blinker, 2), blinker);
        }
    }

    #[test]
    fn test_generations_iterator() {
        let config = EngineConfig::default();
        let algorithm = AlgorithmType::Naive.build(&config).unwrap();
        let blinker = presets::blinker().cells;

        let states: Vec<_> = generations_with_step(algorithm.as_ref(), &blinker, 1)
            .take(3)
            .collect();
        assert_eq!(states[0], blinker);
        assert_ne!(states[1], blinker);
        assert_eq!(states[2], blinker);
    }
}
