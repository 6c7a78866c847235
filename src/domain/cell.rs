/// State of a single grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Dead,
    Alive,
}

impl Cell {
    pub const fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }

    /// Conway's B3/S23 transition:
    /// a live cell with 2 or 3 neighbors survives, a dead cell with
    /// exactly 3 is born, everything else is dead next generation
    pub const fn evolve(self, neighbors: u8) -> Self {
        match (self, neighbors) {
            (Cell::Alive, 2 | 3) | (Cell::Dead, 3) => Cell::Alive,
            _ => Cell::Dead,
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lonely_and_crowded_cells_die() {
        for n in [0, 1, 4, 5, 8] {
            assert_eq!(Cell::Alive.evolve(n), Cell::Dead, "{} neighbors", n);
        }
    }

    #[test]
    fn test_survival_and_birth() {
        assert_eq!(Cell::Alive.evolve(2), Cell::Alive);
        assert_eq!(Cell::Alive.evolve(3), Cell::Alive);
        assert_eq!(Cell::Dead.evolve(3), Cell::Alive);
        assert_eq!(Cell::Dead.evolve(2), Cell::Dead);
    }

    #[test]
    fn test_from_bool() {
        assert!(Cell::from(true).is_alive());
        assert!(!Cell::from(false).is_alive());
    }
}
