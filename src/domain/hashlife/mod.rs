//! HashLife evaluator.
//!
//! The cell state is loaded into a hash-consed quadtree. Advancing a level-L
//! node by `2^k` generations (`k <= L - 2`) yields its center level-(L-1)
//! node, computed recursively from nine overlapping sub-squares and memoized
//! per `(node, k)`. Arbitrary step counts are decomposed into powers of two.

mod node;

pub use node::{NodeId, NodeTable};

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use super::{Cell, CellState, GameOfLifeAlgorithm, LifeRule, Point, Rule};

/// Smallest root level; a level-3 root is 8x8 cells.
const MIN_ROOT_LEVEL: u8 = 3;

/// Accelerated evaluator.
///
/// The node table and memo survive between calls, so evaluating the same or
/// related patterns again reuses earlier work. Once the table holds more
/// than `max_nodes` nodes it is dropped before the next evaluation.
///
/// The table lock is held for the whole of
/// [`compute_generation_with_step`](GameOfLifeAlgorithm::compute_generation_with_step),
/// so concurrent calls on one instance run one after another. Use one
/// instance per thread for parallel evaluation.
#[derive(Debug)]
pub struct HashLifeAlgorithm {
    rule: LifeRule,
    max_nodes: usize,
    table: Mutex<NodeTable>,
}

impl Default for HashLifeAlgorithm {
    fn default() -> Self {
        Self::new(LifeRule::conway())
    }
}

impl HashLifeAlgorithm {
    pub fn new(rule: LifeRule) -> Self {
        Self {
            rule,
            max_nodes: 4_000_000,
            table: Mutex::new(NodeTable::new()),
        }
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// `(canonical nodes, memoized results)` currently held
    pub fn cache_stats(&self) -> (usize, usize) {
        let table = self.lock_table();
        (table.len(), table.cached_results())
    }

    /// Drop every node and memoized result
    pub fn clear_cache(&self) {
        *self.lock_table() = NodeTable::new();
    }

    fn lock_table(&self) -> MutexGuard<'_, NodeTable> {
        // A panic mid-evaluation can leave half-built memo entries behind.
        self.table.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            log::warn!("hashlife: node table poisoned, starting from scratch");
            let mut table = poisoned.into_inner();
            *table = NodeTable::new();
            table
        })
    }
}

impl GameOfLifeAlgorithm for HashLifeAlgorithm {
    fn compute_generation_with_step(&self, state: &CellState, step: u64) -> CellState {
        if step == 0 || state.is_empty() {
            return state.clone();
        }

        let start = Instant::now();
        let mut table = self.lock_table();
        if table.len() > self.max_nodes {
            log::warn!(
                "hashlife: {} nodes exceeds limit of {}, resetting table",
                table.len(),
                self.max_nodes
            );
            *table = NodeTable::new();
        }

        let mut result = state.clone();
        let mut remaining = step;
        while remaining > 0 && !result.is_empty() {
            // Cells spread at most one cell per generation, so nothing is
            // born past the grid edge within `edge_margin` generations.
            // At the edge, advance one generation at a time.
            let chunk = remaining.min(edge_margin(&result).max(1));
            result = jump(&mut table, &self.rule, &result, chunk);
            remaining -= chunk;
        }

        log::debug!(
            "hashlife: advanced {} generations, population {} -> {} in {:.3} ms ({} nodes, {} memoized)",
            step,
            state.len(),
            result.len(),
            start.elapsed().as_secs_f64() * 1000.0,
            table.len(),
            table.cached_results()
        );
        result
    }

    fn rule(&self) -> &LifeRule {
        &self.rule
    }
}

/// `state` after `step` generations, as one pass through the quadtree
fn jump(table: &mut NodeTable, rule: &LifeRule, state: &CellState, step: u64) -> CellState {
    let mut universe = Universe::load(table, rule, state);
    let mut remaining = step;
    let mut step_log2 = 0u8;
    while remaining > 0 && universe.population() > 0 {
        if remaining & 1 == 1 {
            universe.step_pow2(step_log2);
        }
        remaining >>= 1;
        step_log2 += 1;
    }
    universe.to_cell_state()
}

/// Generations before any cell of `state` could reach past the `i32` grid
fn edge_margin(state: &CellState) -> u64 {
    let Some(rect) = state.bounding_box() else {
        return u64::MAX;
    };
    let gaps = [
        i64::from(rect.min.x) - i64::from(i32::MIN),
        i64::from(i32::MAX) - i64::from(rect.max.x),
        i64::from(rect.min.y) - i64::from(i32::MIN),
        i64::from(i32::MAX) - i64::from(rect.max.y),
    ];
    gaps.into_iter().min().unwrap_or(0) as u64
}

/// A finite pattern placed in a quadtree root.
/// The root covers `[origin, origin + 2^level)` on both axes.
struct Universe<'a> {
    table: &'a mut NodeTable,
    rule: &'a LifeRule,
    root: NodeId,
    origin_x: i128,
    origin_y: i128,
}

impl<'a> Universe<'a> {
    fn load(table: &'a mut NodeTable, rule: &'a LifeRule, state: &CellState) -> Self {
        let Some(rect) = state.bounding_box() else {
            let root = table.empty(MIN_ROOT_LEVEL);
            return Self {
                table,
                rule,
                root,
                origin_x: 0,
                origin_y: 0,
            };
        };

        let side = rect.width().max(rect.height());
        let level = (u64::BITS - (side - 1).leading_zeros()).max(MIN_ROOT_LEVEL as u32) as u8;
        let cells: Vec<(i128, i128)> = state
            .iter()
            .map(|p| (p.x as i128 - rect.min.x as i128, p.y as i128 - rect.min.y as i128))
            .collect();
        let root = build(table, level, cells);

        Self {
            table,
            rule,
            root,
            origin_x: rect.min.x as i128,
            origin_y: rect.min.y as i128,
        }
    }

    fn level(&self) -> u8 {
        self.table.level(self.root)
    }

    fn population(&self) -> u64 {
        self.table.population(self.root)
    }

    /// Double the root, keeping the old root centered
    fn expand(&mut self) {
        let level = self.level();
        let [nw, ne, sw, se] = self.table.children(self.root);
        let e = self.table.empty(level - 1);

        let new_nw = self.table.branch([e, e, e, nw]);
        let new_ne = self.table.branch([e, e, ne, e]);
        let new_sw = self.table.branch([e, sw, e, e]);
        let new_se = self.table.branch([se, e, e, e]);
        self.root = self.table.branch([new_nw, new_ne, new_sw, new_se]);

        let half = 1i128 << (level - 1);
        self.origin_x -= half;
        self.origin_y -= half;
    }

    /// True when any live cell lies outside the center half of the root
    fn needs_expansion(&self) -> bool {
        let [nw, ne, sw, se] = self.table.children(self.root);
        let [nw_nw, nw_ne, nw_sw, _] = self.table.children(nw);
        let [ne_nw, ne_ne, _, ne_se] = self.table.children(ne);
        let [sw_nw, _, sw_sw, sw_se] = self.table.children(sw);
        let [_, se_ne, se_sw, se_se] = self.table.children(se);

        [
            nw_nw, nw_ne, nw_sw, ne_nw, ne_ne, ne_se, sw_nw, sw_sw, sw_se, se_ne, se_sw, se_se,
        ]
        .iter()
        .any(|&q| self.table.population(q) > 0)
    }

    /// Advance the whole pattern by exactly `2^step_log2` generations
    fn step_pow2(&mut self, step_log2: u8) {
        while self.level() < step_log2 + 2 {
            self.expand();
        }
        while self.needs_expansion() {
            self.expand();
        }
        // The pattern now sits in the center quarter; one more doubling
        // leaves room for it to grow by 2^step_log2 in every direction.
        self.expand();

        let level = self.level();
        self.root = advance(self.table, self.rule, self.root, step_log2);

        let quarter = 1i128 << (level - 2);
        self.origin_x += quarter;
        self.origin_y += quarter;
    }

    fn to_cell_state(&self) -> CellState {
        let mut cells = Vec::with_capacity(self.population() as usize);
        collect(
            &*self.table,
            self.root,
            self.origin_x,
            self.origin_y,
            &mut cells,
        );

        let mut dropped = 0usize;
        let state: CellState = cells
            .into_iter()
            .filter_map(|(x, y)| match (i32::try_from(x), i32::try_from(y)) {
                (Ok(x), Ok(y)) => Some(Point::new(x, y)),
                _ => {
                    dropped += 1;
                    None
                }
            })
            .collect();
        if dropped > 0 {
            log::trace!(
                "hashlife: {} cells born past the grid edge were dropped",
                dropped
            );
        }
        state
    }
}

/// Quadtree of `level` holding `cells`, given relative to its corner
fn build(table: &mut NodeTable, level: u8, cells: Vec<(i128, i128)>) -> NodeId {
    if cells.is_empty() {
        return table.empty(level);
    }
    if level == 0 {
        return NodeId::ALIVE;
    }

    let half = 1i128 << (level - 1);
    let mut quads: [Vec<(i128, i128)>; 4] = Default::default();
    for (x, y) in cells {
        let (qx, rx) = if x < half { (0, x) } else { (1, x - half) };
        let (qy, ry) = if y < half { (0, y) } else { (1, y - half) };
        quads[qy * 2 + qx].push((rx, ry));
    }

    let [nw, ne, sw, se] = quads;
    let children = [
        build(table, level - 1, nw),
        build(table, level - 1, ne),
        build(table, level - 1, sw),
        build(table, level - 1, se),
    ];
    table.branch(children)
}

/// Append the absolute coordinates of every live cell under `node`
fn collect(table: &NodeTable, node: NodeId, x: i128, y: i128, out: &mut Vec<(i128, i128)>) {
    if table.population(node) == 0 {
        return;
    }
    let level = table.level(node);
    if level == 0 {
        out.push((x, y));
        return;
    }

    let half = 1i128 << (level - 1);
    let [nw, ne, sw, se] = table.children(node);
    collect(table, nw, x, y, out);
    collect(table, ne, x + half, y, out);
    collect(table, sw, x, y + half, out);
    collect(table, se, x + half, y + half, out);
}

/// Center level-(L-1) node of a level-L node after `2^step_log2` generations.
/// Requires `2 <= L` and `step_log2 <= L - 2`.
fn advance(table: &mut NodeTable, rule: &LifeRule, node: NodeId, step_log2: u8) -> NodeId {
    let level = table.level(node);
    debug_assert!(level >= 2 && step_log2 <= level - 2);

    if table.population(node) == 0 {
        return table.empty(level - 1);
    }
    if let Some(result) = table.cached_result(node, step_log2) {
        return result;
    }

    let result = if level == 2 {
        advance_base(table, rule, node)
    } else {
        let [n00, n01, n02, n10, n11, n12, n20, n21, n22] = nine_sub_squares(table, node);
        // Full speed recurses twice with half the step each time; otherwise
        // the first round already covers the whole step.
        let first_step = if step_log2 == level - 2 {
            step_log2 - 1
        } else {
            step_log2
        };
        let r = [n00, n01, n02, n10, n11, n12, n20, n21, n22]
            .map(|n| advance(table, rule, n, first_step));

        let quads = [
            table.branch([r[0], r[1], r[3], r[4]]),
            table.branch([r[1], r[2], r[4], r[5]]),
            table.branch([r[3], r[4], r[6], r[7]]),
            table.branch([r[4], r[5], r[7], r[8]]),
        ];
        let finals = if step_log2 == level - 2 {
            quads.map(|q| advance(table, rule, q, first_step))
        } else {
            quads.map(|q| center(table, q))
        };
        table.branch(finals)
    };

    table.cache_result(node, step_log2, result);
    result
}

/// One generation of a 4x4 square, returning its 2x2 center
fn advance_base(table: &mut NodeTable, rule: &LifeRule, node: NodeId) -> NodeId {
    let [nw, ne, sw, se] = table.children(node);
    let [a, b, c, d] = [nw, ne, sw, se].map(|q| table.children(q).map(|leaf| table.is_alive(leaf)));

    // Row-major 4x4 grid
    let grid = [
        [a[0], a[1], b[0], b[1]],
        [a[2], a[3], b[2], b[3]],
        [c[0], c[1], d[0], d[1]],
        [c[2], c[3], d[2], d[3]],
    ];

    let next = |y: usize, x: usize| -> NodeId {
        let neighbors = (y - 1..=y + 1)
            .flat_map(|ny| (x - 1..=x + 1).map(move |nx| (nx, ny)))
            .filter(|&(nx, ny)| (nx, ny) != (x, y) && grid[ny][nx])
            .count() as u8;
        NodeTable::leaf(rule.evolve(Cell::from(grid[y][x]), neighbors).is_alive())
    };

    let center = [next(1, 1), next(1, 2), next(2, 1), next(2, 2)];
    table.branch(center)
}

/// The nine overlapping level-(L-1) squares of a level-L node, row-major
fn nine_sub_squares(table: &mut NodeTable, node: NodeId) -> [NodeId; 9] {
    let [nw, ne, sw, se] = table.children(node);
    [
        nw,
        horizontal_center(table, nw, ne),
        ne,
        vertical_center(table, nw, sw),
        center_of(table, [nw, ne, sw, se]),
        vertical_center(table, ne, se),
        sw,
        horizontal_center(table, sw, se),
        se,
    ]
}

/// Square straddling two side-by-side nodes
fn horizontal_center(table: &mut NodeTable, w: NodeId, e: NodeId) -> NodeId {
    let [_, w_ne, _, w_se] = table.children(w);
    let [e_nw, _, e_sw, _] = table.children(e);
    table.branch([w_ne, e_nw, w_se, e_sw])
}

/// Square straddling two stacked nodes
fn vertical_center(table: &mut NodeTable, n: NodeId, s: NodeId) -> NodeId {
    let [_, _, n_sw, n_se] = table.children(n);
    let [s_nw, s_ne, _, _] = table.children(s);
    table.branch([n_sw, n_se, s_nw, s_ne])
}

/// Square at the meeting point of four nodes
fn center_of(table: &mut NodeTable, [nw, ne, sw, se]: [NodeId; 4]) -> NodeId {
    let [_, _, _, nw_se] = table.children(nw);
    let [_, _, ne_sw, _] = table.children(ne);
    let [_, sw_ne, _, _] = table.children(sw);
    let [se_nw, _, _, _] = table.children(se);
    table.branch([nw_se, ne_sw, sw_ne, se_nw])
}

/// Center half of a single node
fn center(table: &mut NodeTable, node: NodeId) -> NodeId {
    let quads = table.children(node);
    center_of(table, quads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NaiveAlgorithm, point::pt, presets};

    #[test]
    fn test_zero_steps_is_identity() {
        let algorithm = HashLifeAlgorithm::default();
        let gun = presets::glider_gun().cells;
        assert_eq!(algorithm.compute_generation_with_step(&gun, 0), gun);
    }

    #[test]
    fn test_single_cell_dies() {
        let algorithm = HashLifeAlgorithm::default();
        let lonely = CellState::from_coords(&[(-40, 12)]);
        assert!(algorithm.compute_generation_with_step(&lonely, 1).is_empty());
    }

    #[test]
    fn test_block_still_life() {
        let algorithm = HashLifeAlgorithm::default();
        let block = presets::block().cells.offset(pt(-1000, 3));
        assert_eq!(algorithm.compute_generation_with_step(&block, 1), block);
        assert_eq!(algorithm.compute_generation_with_step(&block, 1 << 20), block);
    }

    #[test]
    fn test_blinker_period_two() {
        let algorithm = HashLifeAlgorithm::default();
        let blinker = presets::blinker().cells;
        let once = algorithm.compute_generation_with_step(&blinker, 1);
        assert_ne!(once, blinker);
        assert_eq!(once, CellState::from_coords(&[(1, 0), (1, 1), (1, 2)]));
        assert_eq!(algorithm.compute_generation_with_step(&blinker, 2), blinker);
        assert_eq!(algorithm.compute_generation_with_step(&blinker, 1001), once);
    }

    #[test]
    fn test_glider_travels_far() {
        let algorithm = HashLifeAlgorithm::default();
        let glider = presets::glider().cells;
        assert_eq!(
            algorithm.compute_generation_with_step(&glider, 4 * 10_000),
            glider.offset(pt(10_000, 10_000))
        );
    }

    #[test]
    fn test_matches_naive_on_methuselah() {
        let hashlife = HashLifeAlgorithm::default();
        let naive = NaiveAlgorithm::default();
        let r = presets::r_pentomino().cells;
        for step in [1, 2, 3, 7, 64, 100, 257] {
            assert_eq!(
                hashlife.compute_generation_with_step(&r, step),
                naive.compute_generation_with_step(&r, step),
                "step {}",
                step
            );
        }
    }

    #[test]
    fn test_matches_naive_with_other_rules() {
        let soup = crate::domain::random_soup(24, 24, 0.4, 99);
        for rule in [LifeRule::highlife(), LifeRule::day_and_night(), LifeRule::seeds()] {
            let hashlife = HashLifeAlgorithm::new(rule);
            let naive = NaiveAlgorithm::new(rule);
            assert_eq!(
                hashlife.compute_generation_with_step(&soup, 13),
                naive.compute_generation_with_step(&soup, 13),
                "{}",
                rule
            );
        }
    }

    #[test]
    fn test_edge_margin() {
        assert_eq!(edge_margin(&CellState::empty()), u64::MAX);
        let state = CellState::from_coords(&[(i32::MAX - 3, 0), (0, i32::MIN + 7)]);
        assert_eq!(edge_margin(&state), 3);
        let on_edge = CellState::from_coords(&[(i32::MIN, 5)]);
        assert_eq!(edge_margin(&on_edge), 0);
    }

    #[test]
    fn test_glider_crashing_into_grid_corner_matches_naive() {
        let glider = presets::glider().cells.offset(pt(i32::MAX - 20, i32::MAX - 20));
        let naive = NaiveAlgorithm::default();
        let hashlife = HashLifeAlgorithm::default();
        for step in [1, 30, 64, 100] {
            assert_eq!(
                hashlife.compute_generation_with_step(&glider, step),
                naive.compute_generation_with_step(&glider, step),
                "step {}",
                step
            );
        }
    }

    #[test]
    fn test_node_limit_resets_table() {
        let algorithm = HashLifeAlgorithm::default().with_max_nodes(10);
        let acorn = presets::acorn().cells;
        let first = algorithm.compute_generation_with_step(&acorn, 50);
        let (nodes, _) = algorithm.cache_stats();
        assert!(nodes > 10);

        // Next call starts over and still gets the same answer
        let second = algorithm.compute_generation_with_step(&acorn, 50);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cache_is_reused() {
        let algorithm = HashLifeAlgorithm::default();
        let gun = presets::glider_gun().cells;
        algorithm.compute_generation_with_step(&gun, 120);
        let (_, memoized) = algorithm.cache_stats();
        assert!(memoized > 0);

        algorithm.clear_cache();
        assert_eq!(algorithm.cache_stats(), (2, 0));
    }

    #[test]
    fn test_build_and_collect_round_trip() {
        let mut table = NodeTable::new();
        let rule = LifeRule::conway();
        let state = CellState::from_coords(&[(-3, -3), (4, 0), (0, 9), (17, 2)]);
        let universe = Universe::load(&mut table, &rule, &state);
        assert_eq!(universe.population(), 4);
        assert_eq!(universe.to_cell_state(), state);
    }
}
