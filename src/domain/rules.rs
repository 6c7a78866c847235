use std::fmt;
use std::str::FromStr;

use ca_rules::ParseLife;

use super::Cell;

/// Trait for cellular automaton rules.
/// Both evaluators only ever ask a rule for the next state of one cell.
pub trait Rule: Send + Sync {
    /// Name of the rule
    fn name(&self) -> &'static str;

    /// Short description
    fn description(&self) -> &'static str;

    /// Apply rule to compute next cell state
    fn evolve(&self, current: Cell, neighbors: u8) -> Cell;
}

/// Errors from parsing `B.../S...` rule strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Rule '{rule}' is not a Life-like rule: {reason}")]
    InvalidNotation { rule: String, reason: String },
    #[error("Rules with birth on 0 neighbors cannot run on an unbounded grid")]
    BirthOnZero,
}

/// Outer-totalistic Life-like rule stored as two 9-bit masks,
/// bit `n` set means "applies with n live neighbors".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LifeRule {
    name: &'static str,
    description: &'static str,
    birth: u16,
    survival: u16,
}

impl LifeRule {
    const fn from_masks(
        name: &'static str,
        description: &'static str,
        birth: u16,
        survival: u16,
    ) -> Self {
        Self {
            name,
            description,
            birth,
            survival,
        }
    }

    /// Conway's Game of Life (B3/S23)
    pub const fn conway() -> Self {
        Self::from_masks("Conway", "B3/S23 - Classic", 1 << 3, (1 << 2) | (1 << 3))
    }

    /// HighLife (B36/S23), known for its replicator
    pub const fn highlife() -> Self {
        Self::from_masks(
            "HighLife",
            "B36/S23 - Replicators",
            (1 << 3) | (1 << 6),
            (1 << 2) | (1 << 3),
        )
    }

    /// Seeds (B2/S): every live cell dies each generation
    pub const fn seeds() -> Self {
        Self::from_masks("Seeds", "B2/S - Exploding", 1 << 2, 0)
    }

    /// Day & Night (B3678/S34678)
    pub const fn day_and_night() -> Self {
        Self::from_masks(
            "Day&Night",
            "B3678/S34678",
            (1 << 3) | (1 << 6) | (1 << 7) | (1 << 8),
            (1 << 3) | (1 << 4) | (1 << 6) | (1 << 7) | (1 << 8),
        )
    }

    pub const fn is_conway(&self) -> bool {
        self.birth == Self::conway().birth && self.survival == Self::conway().survival
    }

    /// Whether a dead cell with `n` neighbors is born
    pub const fn births_on(&self, n: u8) -> bool {
        self.birth & (1 << n) != 0
    }

    /// Whether a live cell with `n` neighbors survives
    pub const fn survives_on(&self, n: u8) -> bool {
        self.survival & (1 << n) != 0
    }

    /// Canonical `B.../S...` notation
    pub fn notation(&self) -> String {
        let digits = |mask: u16| -> String {
            (0..=8u8)
                .filter(|n| mask & (1 << n) != 0)
                .map(|n| char::from(b'0' + n))
                .collect()
        };
        format!("B{}/S{}", digits(self.birth), digits(self.survival))
    }
}

impl Default for LifeRule {
    fn default() -> Self {
        Self::conway()
    }
}

impl Rule for LifeRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn evolve(&self, current: Cell, neighbors: u8) -> Cell {
        let alive = match current {
            Cell::Alive => self.survives_on(neighbors),
            Cell::Dead => self.births_on(neighbors),
        };
        Cell::from(alive)
    }
}

/// Built from the birth and survival digits `ca_rules` parses.
/// Known presets keep their friendly names.
impl ParseLife for LifeRule {
    fn from_bs(b: Vec<u8>, s: Vec<u8>) -> Self {
        let mask = |digits: Vec<u8>| digits.into_iter().fold(0u16, |mask, n| mask | (1 << n));
        let (birth, survival) = (mask(b), mask(s));
        all_rules()
            .into_iter()
            .find(|r| r.birth == birth && r.survival == survival)
            .unwrap_or(Self::from_masks("Custom", "Life-like", birth, survival))
    }
}

/// Accepts the notations `ca_rules` knows for totalistic Life-like rules,
/// such as `B3/S23`, `B3S23` and `23/3`.
impl FromStr for LifeRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rule: LifeRule =
            ParseLife::parse_rule(s.trim()).map_err(|e| RuleError::InvalidNotation {
                rule: s.to_string(),
                reason: e.to_string(),
            })?;
        if rule.births_on(0) {
            return Err(RuleError::BirthOnZero);
        }
        Ok(rule)
    }
}

impl fmt::Display for LifeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

/// Get all preset rules
pub fn all_rules() -> Vec<LifeRule> {
    vec![
        LifeRule::conway(),
        LifeRule::highlife(),
        LifeRule::seeds(),
        LifeRule::day_and_night(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conway_matches_cell_evolve() {
        let rule = LifeRule::conway();
        for n in 0..=8 {
            assert_eq!(rule.evolve(Cell::Alive, n), Cell::Alive.evolve(n));
            assert_eq!(rule.evolve(Cell::Dead, n), Cell::Dead.evolve(n));
        }
        assert!(rule.is_conway());
    }

    #[test]
    fn test_highlife_reproduction() {
        let rule = LifeRule::highlife();
        assert_eq!(rule.evolve(Cell::Dead, 6), Cell::Alive);
        assert_eq!(rule.evolve(Cell::Dead, 3), Cell::Alive);
        assert!(!rule.is_conway());
    }

    #[test]
    fn test_seeds_always_dies() {
        let rule = LifeRule::seeds();
        for n in 0..=8 {
            assert_eq!(rule.evolve(Cell::Alive, n), Cell::Dead);
        }
        assert_eq!(rule.evolve(Cell::Dead, 2), Cell::Alive);
        assert_eq!(rule.evolve(Cell::Dead, 3), Cell::Dead);
    }

    #[test]
    fn test_parse_notation() {
        assert_eq!("B3/S23".parse::<LifeRule>().unwrap(), LifeRule::conway());
        assert_eq!("23/3".parse::<LifeRule>().unwrap(), LifeRule::conway());
        assert_eq!(" B3/S23 ".parse::<LifeRule>().unwrap(), LifeRule::conway());
        assert_eq!("B36/S23".parse::<LifeRule>().unwrap().name(), "HighLife");
        assert_eq!("B2/S".parse::<LifeRule>().unwrap(), LifeRule::seeds());

        let custom: LifeRule = "B34/S34".parse().unwrap();
        assert_eq!(custom.name(), "Custom");
        assert_eq!(custom.notation(), "B34/S34");
    }

    #[test]
    fn test_from_digits_matches_presets() {
        let rule = LifeRule::from_bs(vec![3, 6, 7, 8], vec![3, 4, 6, 7, 8]);
        assert_eq!(rule, LifeRule::day_and_night());
        assert_eq!(LifeRule::from_bs(vec![1], vec![]).name(), "Custom");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "nonsense".parse::<LifeRule>(),
            Err(RuleError::InvalidNotation { .. })
        ));
        assert!(matches!(
            "B39/S23".parse::<LifeRule>(),
            Err(RuleError::InvalidNotation { .. })
        ));
        assert_eq!("B03/S23".parse::<LifeRule>(), Err(RuleError::BirthOnZero));
    }

    #[test]
    fn test_notation_round_trips_presets() {
        for rule in all_rules() {
            assert_eq!(rule.notation().parse::<LifeRule>().unwrap(), rule);
        }
    }
}
