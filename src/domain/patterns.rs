use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{CellState, Point};

/// A named arrangement of alive cells, anchored at the origin
#[derive(Clone, Debug)]
pub struct Pattern {
    pub name: &'static str,
    pub description: &'static str,
    pub cells: CellState,
}

impl Pattern {
    pub fn new(name: &'static str, description: &'static str, cells: &[(i32, i32)]) -> Self {
        Self {
            name,
            description,
            cells: CellState::from_coords(cells),
        }
    }

    /// The pattern's cells translated to `at`
    pub fn placed_at(&self, at: Point) -> CellState {
        self.cells.offset(at)
    }
}

/// Reproducible random state filling a `width` x `height` box at the origin
pub fn random_soup(width: u32, height: u32, density: f64, seed: u64) -> CellState {
    let density = density.clamp(0.0, 1.0);
    let mut rng = StdRng::seed_from_u64(seed);
    (0..height as i32)
        .flat_map(|y| (0..width as i32).map(move |x| Point::new(x, y)))
        .filter(|_| rng.random_bool(density))
        .collect()
}

/// Classic Game of Life patterns library
pub mod presets {
    use super::*;

    /// Glider - simplest spaceship, moves diagonally
    pub fn glider() -> Pattern {
        Pattern::new(
            "Glider",
            "Moves diagonally (period 4)",
            &[
                (1, 0),
                (2, 1),
                (0, 2), (1, 2), (2, 2),
            ],
        )
    }

    /// Blinker - period 2 oscillator
    pub fn blinker() -> Pattern {
        Pattern::new(
            "Blinker",
            "Oscillator (period 2)",
            &[
                (0, 1), (1, 1), (2, 1),
            ],
        )
    }

    /// Toad - period 2 oscillator
    pub fn toad() -> Pattern {
        Pattern::new(
            "Toad",
            "Oscillator (period 2)",
            &[
                (1, 0), (2, 0), (3, 0),
                (0, 1), (1, 1), (2, 1),
            ],
        )
    }

    /// Beacon - period 2 oscillator
    pub fn beacon() -> Pattern {
        Pattern::new(
            "Beacon",
            "Oscillator (period 2)",
            &[
                (0, 0), (1, 0),
                (0, 1),
                (3, 2),
                (2, 3), (3, 3),
            ],
        )
    }

    /// Pulsar - period 3 oscillator
    pub fn pulsar() -> Pattern {
        Pattern::new(
            "Pulsar",
            "Oscillator (period 3)",
            &[
                // Top
                (2, 0), (3, 0), (4, 0), (8, 0), (9, 0), (10, 0),
                // Upper middle
                (0, 2), (5, 2), (7, 2), (12, 2),
                (0, 3), (5, 3), (7, 3), (12, 3),
                (0, 4), (5, 4), (7, 4), (12, 4),
                // Center
                (2, 5), (3, 5), (4, 5), (8, 5), (9, 5), (10, 5),
                (2, 7), (3, 7), (4, 7), (8, 7), (9, 7), (10, 7),
                // Lower middle
                (0, 8), (5, 8), (7, 8), (12, 8),
                (0, 9), (5, 9), (7, 9), (12, 9),
                (0, 10), (5, 10), (7, 10), (12, 10),
                // Bottom
                (2, 12), (3, 12), (4, 12), (8, 12), (9, 12), (10, 12),
            ],
        )
    }

    /// Lightweight Spaceship (LWSS), travels left
    pub fn lwss() -> Pattern {
        Pattern::new(
            "LWSS",
            "Lightweight Spaceship (period 4)",
            &[
                (1, 0), (4, 0),
                (0, 1),
                (0, 2), (4, 2),
                (0, 3), (1, 3), (2, 3), (3, 3),
            ],
        )
    }

    /// Gosper Glider Gun - produces gliders indefinitely
    pub fn glider_gun() -> Pattern {
        Pattern::new(
            "Gosper Glider Gun",
            "Produces gliders (period 30)",
            &[
                // Left square
                (0, 4), (0, 5),
                (1, 4), (1, 5),

                // Left circle
                (10, 4), (10, 5), (10, 6),
                (11, 3), (11, 7),
                (12, 2), (12, 8),
                (13, 2), (13, 8),
                (14, 5),
                (15, 3), (15, 7),
                (16, 4), (16, 5), (16, 6),
                (17, 5),

                // Middle pieces
                (20, 2), (20, 3), (20, 4),
                (21, 2), (21, 3), (21, 4),
                (22, 1), (22, 5),
                (24, 0), (24, 1), (24, 5), (24, 6),

                // Right square
                (34, 2), (34, 3),
                (35, 2), (35, 3),
            ],
        )
    }

    /// R-pentomino - classic methuselah (stabilizes after 1103 generations)
    pub fn r_pentomino() -> Pattern {
        Pattern::new(
            "R-pentomino",
            "Methuselah - stabilizes at gen 1103",
            &[
                (1, 0), (2, 0),
                (0, 1), (1, 1),
                (1, 2),
            ],
        )
    }

    /// Acorn - small methuselah that stabilizes after 5206 generations
    pub fn acorn() -> Pattern {
        Pattern::new(
            "Acorn",
            "Methuselah - stabilizes at gen 5206",
            &[
                (1, 0),
                (3, 1),
                (0, 2), (1, 2), (4, 2), (5, 2), (6, 2),
            ],
        )
    }

    /// Block - simple still life
    pub fn block() -> Pattern {
        Pattern::new(
            "Block",
            "Still life",
            &[
                (0, 0), (1, 0),
                (0, 1), (1, 1),
            ],
        )
    }

    /// Get all available patterns
    pub fn all_patterns() -> Vec<Pattern> {
        vec![
            glider(),
            blinker(),
            toad(),
            beacon(),
            pulsar(),
            lwss(),
            glider_gun(),
            r_pentomino(),
            acorn(),
            block(),
        ]
    }

    /// Look a preset up by name, ignoring case, spaces and dashes
    pub fn find(name: &str) -> Option<Pattern> {
        let key = |s: &str| -> String {
            s.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect()
        };
        let wanted = key(name);
        all_patterns().into_iter().find(|p| key(p.name) == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::presets::*;
    use super::*;
    use crate::domain::{GameOfLifeAlgorithm, NaiveAlgorithm, point::pt};

    #[test]
    fn test_preset_populations() {
        assert_eq!(glider().cells.len(), 5);
        assert_eq!(pulsar().cells.len(), 48);
        assert_eq!(glider_gun().cells.len(), 36);
        assert_eq!(all_patterns().len(), 10);
    }

    #[test]
    fn test_presets_sit_near_origin() {
        for pattern in all_patterns() {
            let rect = pattern.cells.bounding_box().unwrap();
            assert!(rect.min.x >= 0 && rect.min.y >= 0, "{}", pattern.name);
            assert!(rect.min.x == 0 || rect.min.y == 0, "{}", pattern.name);
        }
    }

    #[test]
    fn test_find_is_forgiving() {
        assert_eq!(find("r-pentomino").unwrap().name, "R-pentomino");
        assert_eq!(find("GOSPER glider gun").unwrap().name, "Gosper Glider Gun");
        assert_eq!(find("lwss").unwrap().name, "LWSS");
        assert!(find("unicorn").is_none());
    }

    #[test]
    fn test_oscillator_periods() {
        let algorithm = NaiveAlgorithm::default();
        for (pattern, period) in [(toad(), 2), (beacon(), 2), (pulsar(), 3)] {
            let cells = &pattern.cells;
            assert_ne!(algorithm.compute_generation_with_step(cells, 1), *cells);
            assert_eq!(
                algorithm.compute_generation_with_step(cells, period),
                *cells,
                "{}",
                pattern.name
            );
        }
    }

    #[test]
    fn test_lwss_moves_left() {
        let algorithm = NaiveAlgorithm::default();
        let ship = lwss().cells;
        assert_eq!(
            algorithm.compute_generation_with_step(&ship, 4),
            ship.offset(pt(-2, 0))
        );
    }

    #[test]
    fn test_random_soup_is_reproducible() {
        let a = random_soup(32, 16, 0.3, 42);
        let b = random_soup(32, 16, 0.3, 42);
        let c = random_soup(32, 16, 0.3, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let rect = a.bounding_box().unwrap();
        assert!(rect.max.x < 32 && rect.max.y < 16);
        assert!(random_soup(10, 10, 0.0, 1).is_empty());
        assert_eq!(random_soup(10, 10, 1.0, 1).len(), 100);
    }

    #[test]
    fn test_placed_at() {
        let placed = block().placed_at(pt(5, -5));
        assert!(placed.contains(pt(5, -5)));
        assert!(placed.contains(pt(6, -4)));
    }
}
