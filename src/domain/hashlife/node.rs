//! Hash-consed quadtree nodes.
//!
//! Every distinct subtree is stored once in a [`NodeTable`] and referred to
//! by its [`NodeId`], so structural equality of subtrees is id equality and
//! results can be memoized per id.

use std::collections::HashMap;

/// Index of a canonical node in its [`NodeTable`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The dead single cell
    pub const DEAD: NodeId = NodeId(0);
    /// The alive single cell
    pub const ALIVE: NodeId = NodeId(1);

    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Children of an interior node in `[nw, ne, sw, se]` order
pub type Quad = [NodeId; 4];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Node {
    /// A single cell, level 0
    Leaf(bool),
    /// A `2^level` square made of four `2^(level-1)` quadrants
    Branch {
        level: u8,
        children: Quad,
        population: u64,
    },
}

/// Canonical node storage plus the memo of advanced results.
#[derive(Debug)]
pub struct NodeTable {
    nodes: Vec<Node>,
    index: HashMap<Node, NodeId>,
    /// `(node, log2 of generations)` to the advanced center
    results: HashMap<(NodeId, u8), NodeId>,
    /// Empty node per level, filled lazily
    empty: Vec<NodeId>,
}

impl Default for NodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTable {
    pub fn new() -> Self {
        let mut table = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            results: HashMap::new(),
            empty: vec![NodeId::DEAD],
        };
        table.intern(Node::Leaf(false));
        table.intern(Node::Leaf(true));
        table
    }

    fn intern(&mut self, node: Node) -> NodeId {
        if let Some(&id) = self.index.get(&node) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node.clone());
        self.index.insert(node, id);
        id
    }

    /// Canonical interior node with the given quadrants
    pub fn branch(&mut self, children: Quad) -> NodeId {
        let level = self.level(children[0]) + 1;
        debug_assert!(children.iter().all(|&c| self.level(c) + 1 == level));
        let population = children.iter().map(|&c| self.population(c)).sum();
        self.intern(Node::Branch {
            level,
            children,
            population,
        })
    }

    pub fn leaf(alive: bool) -> NodeId {
        if alive { NodeId::ALIVE } else { NodeId::DEAD }
    }

    pub fn level(&self, id: NodeId) -> u8 {
        match &self.nodes[id.index()] {
            Node::Leaf(_) => 0,
            Node::Branch { level, .. } => *level,
        }
    }

    pub fn population(&self, id: NodeId) -> u64 {
        match &self.nodes[id.index()] {
            Node::Leaf(alive) => *alive as u64,
            Node::Branch { population, .. } => *population,
        }
    }

    /// Quadrants of an interior node.
    /// Leaves have none; callers only descend from level 1 upwards.
    pub fn children(&self, id: NodeId) -> Quad {
        match &self.nodes[id.index()] {
            Node::Leaf(_) => {
                debug_assert!(false, "leaf {:?} has no children", id);
                [NodeId::DEAD; 4]
            }
            Node::Branch { children, .. } => *children,
        }
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.index()], Node::Leaf(true))
    }

    /// The all-dead node of `level`
    pub fn empty(&mut self, level: u8) -> NodeId {
        while self.empty.len() <= level as usize {
            let below = self.empty[self.empty.len() - 1];
            let next = self.branch([below; 4]);
            self.empty.push(next);
        }
        self.empty[level as usize]
    }

    pub fn cached_result(&self, id: NodeId, step_log2: u8) -> Option<NodeId> {
        self.results.get(&(id, step_log2)).copied()
    }

    pub fn cache_result(&mut self, id: NodeId, step_log2: u8, result: NodeId) {
        self.results.insert((id, step_log2), result);
    }

    /// Number of canonical nodes, leaves included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn cached_results(&self) -> usize {
        self.results.len()
    }
}
