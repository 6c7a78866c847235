use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate on the unbounded grid.
/// `y` grows downwards, matching the row order of pattern files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Shorthand constructor, mostly for tests and presets
pub const fn pt(x: i32, y: i32) -> Point {
    Point { x, y }
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The Moore neighbors of this point that lie on the grid.
    /// Eight everywhere except along the `i32` edges.
    pub fn neighbors(self) -> impl Iterator<Item = Point> {
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| pt(dx, dy)))
            .filter(|&d| d != Point::ORIGIN)
            .filter_map(move |d| self.checked_add(d))
    }

    /// `self + delta`, or `None` when it leaves the grid
    pub fn checked_add(self, delta: Point) -> Option<Point> {
        Some(Point::new(
            self.x.checked_add(delta.x)?,
            self.y.checked_add(delta.y)?,
        ))
    }

    /// `self - other`, or `None` when it leaves the grid
    pub fn checked_sub(self, other: Point) -> Option<Point> {
        Some(Point::new(
            self.x.checked_sub(other.x)?,
            self.y.checked_sub(other.y)?,
        ))
    }
}

// Row-major so that iteration walks a pattern line by line.
impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive bounding box of a set of cells
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub const fn width(&self) -> u64 {
        (self.max.x as i64 - self.min.x as i64) as u64 + 1
    }

    pub const fn height(&self) -> u64 {
        (self.max.y as i64 - self.min.y as i64) as u64 + 1
    }

    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={} ({}x{})", self.min, self.max, self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_excludes_self() {
        let p = pt(3, -2);
        let neighbors: Vec<_> = p.neighbors().collect();
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&p));
        assert!(neighbors.contains(&pt(2, -3)));
        assert!(neighbors.contains(&pt(4, -1)));
    }

    #[test]
    fn test_row_major_order() {
        let mut points = vec![pt(5, 1), pt(0, 2), pt(-1, 1), pt(9, 0)];
        points.sort();
        assert_eq!(points, vec![pt(9, 0), pt(-1, 1), pt(5, 1), pt(0, 2)]);
    }

    #[test]
    fn test_rect_dimensions() {
        let rect = Rect::new(pt(-2, 0), pt(1, 4));
        assert_eq!(rect.width(), 4);
        assert_eq!(rect.height(), 5);
        assert!(rect.contains(pt(-2, 4)));
        assert!(!rect.contains(pt(2, 0)));
    }

    #[test]
    fn test_neighbors_stop_at_grid_edge() {
        let corner = pt(i32::MAX, i32::MIN);
        let neighbors: Vec<_> = corner.neighbors().collect();
        assert_eq!(neighbors.len(), 3);
        assert!(neighbors.contains(&pt(i32::MAX - 1, i32::MIN)));
        assert!(neighbors.contains(&pt(i32::MAX - 1, i32::MIN + 1)));
        assert!(neighbors.contains(&pt(i32::MAX, i32::MIN + 1)));
    }

    #[test]
    fn test_checked_arithmetic() {
        assert_eq!(pt(1, 2).checked_add(pt(3, -4)), Some(pt(4, -2)));
        assert_eq!(pt(i32::MAX, 0).checked_add(pt(1, 0)), None);
        assert_eq!(pt(0, i32::MIN).checked_sub(pt(0, 1)), None);
        assert_eq!(pt(5, 5).checked_sub(pt(2, 7)), Some(pt(3, -2)));
    }
}
