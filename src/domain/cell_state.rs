//! Immutable set of alive cells on the unbounded grid.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::point::{Point, Rect};

/// The alive cells of one generation.
///
/// Equality and hashing are by content: two states holding the same
/// coordinates are equal regardless of how they were built. The set is
/// shared behind an `Arc`, so cloning a snapshot to hand it to another
/// thread does not copy cells.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct CellState {
    cells: Arc<BTreeSet<Point>>,
}

impl CellState {
    /// State with no alive cells
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: BTreeSet<Point>) -> Self {
        Self {
            cells: Arc::new(cells),
        }
    }

    /// Build from `(x, y)` pairs
    pub fn from_coords(coords: &[(i32, i32)]) -> Self {
        coords.iter().copied().map(Point::from).collect()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.cells.contains(&p)
    }

    /// Number of alive cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Alive cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().copied()
    }

    /// Union of both sets as a new state
    pub fn union(&self, other: &CellState) -> CellState {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        self.cells.union(&other.cells).copied().collect()
    }

    /// Every cell translated by `delta`.
    /// Cells that would leave the `i32` grid are dropped, the same as the
    /// evaluators do with cells born past the edge.
    pub fn offset(&self, delta: Point) -> CellState {
        if delta == Point::ORIGIN {
            return self.clone();
        }
        self.iter().filter_map(|p| p.checked_add(delta)).collect()
    }

    /// Smallest rect containing every alive cell, `None` when empty
    pub fn bounding_box(&self) -> Option<Rect> {
        let first = self.cells.first()?;
        let last = self.cells.last()?;
        let (min_x, max_x) = self
            .cells
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
        Some(Rect::new(Point::new(min_x, first.y), Point::new(max_x, last.y)))
    }

    /// Translate so the bounding box starts at the origin.
    /// A state wider than `i32::MAX` keeps only the cells that still fit.
    pub fn normalized(&self) -> CellState {
        match self.bounding_box() {
            Some(rect) if rect.min == Point::ORIGIN => self.clone(),
            Some(rect) => self.iter().filter_map(|p| p.checked_sub(rect.min)).collect(),
            None => self.clone(),
        }
    }
}

impl FromIterator<Point> for CellState {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::from_cells(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CellState {
    type Item = &'a Point;
    type IntoIter = std::collections::btree_set::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl fmt::Debug for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.cells.iter()).finish()
    }
}

/// Picture of the bounding box, `O` for alive and `.` for dead
impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(rect) = self.bounding_box() else {
            return Ok(());
        };
        for y in rect.min.y..=rect.max.y {
            let row: String = (rect.min.x..=rect.max.x)
                .map(|x| if self.contains(Point::new(x, y)) { 'O' } else { '.' })
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
