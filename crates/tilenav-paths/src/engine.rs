use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::hash::Hash;

use crate::config::SearchConfig;

/// Index of a node in a search arena, or in a returned path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A search-time wrapper around a graph value.
///
/// `previous` points at the predecessor on the best path found so far. In a
/// path returned by [`GraphSearch::search`] it indexes into that path, so
/// `path[i].previous == Some(NodeId(i - 1))`.
#[derive(Clone, Debug, PartialEq)]
pub struct AstarNode<V> {
    pub value: V,
    pub previous: Option<NodeId>,
    /// `path_cost` plus the estimate to the goal.
    pub cost: f32,
    /// Actual cost accumulated from the start.
    pub path_cost: f32,
}

impl<V> AstarNode<V> {
    /// A node with no predecessor and zero costs.
    pub fn new(value: V) -> Self {
        Self {
            value,
            previous: None,
            cost: 0.0,
            path_cost: 0.0,
        }
    }
}

impl<V: fmt::Display> fmt::Display for AstarNode<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' cost {} path cost {}",
            self.value, self.cost, self.path_cost
        )
    }
}

// ---------------------------------------------------------------------------
// Open-set heap entry
// ---------------------------------------------------------------------------

/// Reference into the node arena, ordered for use in `BinaryHeap`.
///
/// Lowest `cost` pops first; equal costs pop in insertion order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenRef {
    pub(crate) idx: usize,
    pub(crate) cost: f32,
    pub(crate) seq: u64,
}

impl PartialEq for OpenRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for OpenRef {}

impl Ord for OpenRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed so BinaryHeap (max-heap) pops the smallest cost, then the
        // smallest sequence number.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// GraphSearch
// ---------------------------------------------------------------------------

/// Counters describing the most recent search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Nodes moved from the open set to the closed set.
    pub expanded: usize,
    /// Nodes inserted into (or replaced in) the open set, start included.
    pub opened: usize,
    /// Candidates dropped because their value was already closed.
    pub skipped_closed: usize,
    /// Candidates dropped because the open entry was at least as cheap.
    pub skipped_worse: usize,
}

/// Best-first (A*) search engine over any [`SearchSpace`](crate::SearchSpace).
///
/// `GraphSearch` owns the node arena, open and closed sets and scratch
/// buffers. Every call to [`search`](Self::search) starts from a clean state
/// but keeps the allocations, so one engine can serve many queries.
pub struct GraphSearch<V> {
    pub(crate) config: SearchConfig,
    pub(crate) nodes: Vec<AstarNode<V>>,
    pub(crate) open: HashMap<V, usize>,
    pub(crate) closed: HashMap<V, usize>,
    pub(crate) heap: BinaryHeap<OpenRef>,
    pub(crate) seq: u64,
    pub(crate) stats: SearchStats,
    // scratch buffers for expansion
    pub(crate) nbuf: Vec<V>,
    pub(crate) candidates: Vec<AstarNode<V>>,
}

impl<V: Clone + Eq + Hash> Default for GraphSearch<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Eq + Hash> GraphSearch<V> {
    /// Create an engine with the default (unbounded) configuration.
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    /// Create an engine with the given configuration.
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            open: HashMap::new(),
            closed: HashMap::new(),
            heap: BinaryHeap::new(),
            seq: 0,
            stats: SearchStats::default(),
            nbuf: Vec::new(),
            candidates: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[inline]
    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Counters from the last call to [`search`](Self::search).
    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Drop all per-search state, keeping allocations.
    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.open.clear();
        self.closed.clear();
        self.heap.clear();
        self.seq = 0;
        self.stats = SearchStats::default();
    }

    /// Store `node` in the arena and make it the open entry for its value,
    /// replacing any previous open entry.
    pub(crate) fn open_node(&mut self, node: AstarNode<V>) {
        let idx = self.nodes.len();
        let cost = node.cost;
        self.open.insert(node.value.clone(), idx);
        self.nodes.push(node);
        self.heap.push(OpenRef {
            idx,
            cost,
            seq: self.seq,
        });
        self.seq += 1;
        self.stats.opened += 1;
    }

    /// Pop the cheapest live open node. Heap entries whose node has since
    /// been replaced or closed are skipped.
    pub(crate) fn pop_open(&mut self) -> Option<usize> {
        while let Some(entry) = self.heap.pop() {
            let value = &self.nodes[entry.idx].value;
            if self.open.get(value) == Some(&entry.idx) {
                return Some(entry.idx);
            }
        }
        None
    }

    /// Move the open node at `idx` to the closed set.
    pub(crate) fn close_node(&mut self, idx: usize) {
        let value = self.nodes[idx].value.clone();
        self.open.remove(&value);
        self.closed.insert(value, idx);
        self.stats.expanded += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(value: u32, cost: f32) -> AstarNode<u32> {
        AstarNode {
            cost,
            ..AstarNode::new(value)
        }
    }

    #[test]
    fn pops_cheapest_then_oldest() {
        let mut gs = GraphSearch::new();
        gs.open_node(node(1, 5.0));
        gs.open_node(node(2, 3.0));
        gs.open_node(node(3, 5.0));
        gs.open_node(node(4, 3.0));
        let order: Vec<u32> = std::iter::from_fn(|| {
            let idx = gs.pop_open()?;
            gs.close_node(idx);
            Some(gs.nodes[idx].value)
        })
        .collect();
        assert_eq!(order, vec![2, 4, 1, 3]);
        assert_eq!(gs.stats().expanded, 4);
    }

    #[test]
    fn replaced_entries_are_stale() {
        let mut gs = GraphSearch::new();
        gs.open_node(node(7, 9.0));
        gs.open_node(node(8, 4.0));
        // Cheaper entry for 7 replaces the old one.
        gs.open_node(node(7, 1.0));
        let first = gs.pop_open().unwrap();
        assert_eq!(gs.nodes[first].value, 7);
        assert_eq!(gs.nodes[first].cost, 1.0);
        gs.close_node(first);
        let second = gs.pop_open().unwrap();
        assert_eq!(gs.nodes[second].value, 8);
        gs.close_node(second);
        // The 9.0 entry for 7 is still in the heap but no longer live.
        assert_eq!(gs.pop_open(), None);
    }

    #[test]
    fn reset_clears_state() {
        let mut gs = GraphSearch::new();
        gs.open_node(node(1, 1.0));
        gs.reset();
        assert!(gs.nodes.is_empty());
        assert_eq!(gs.pop_open(), None);
        assert_eq!(gs.stats(), SearchStats::default());
    }

    #[test]
    fn node_display() {
        let n = AstarNode {
            value: "a",
            previous: None,
            cost: 2.5,
            path_cost: 1.0,
        };
        assert_eq!(n.to_string(), "'a' cost 2.5 path cost 1");
    }
}
