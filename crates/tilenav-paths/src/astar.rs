use std::hash::Hash;

use crate::engine::{AstarNode, GraphSearch, NodeId};
use crate::traits::SearchSpace;

impl<V: Clone + Eq + Hash> GraphSearch<V> {
    /// Find a least-cost path from `start` to `end` through `space`.
    ///
    /// Returns the nodes from start to end inclusive, or `None` when the
    /// start cannot be costed, the open set runs dry, or the configured
    /// expansion budget is spent.
    ///
    /// Closed values are never reopened, even when a cheaper route to them
    /// turns up later. With a heuristic that is not consistent this can
    /// return a path that is not the cheapest one.
    pub fn search<S>(&mut self, space: &S, start: V, end: V) -> Option<Vec<AstarNode<V>>>
    where
        S: SearchSpace<Value = V> + ?Sized,
    {
        self.reset();

        let mut start_node = AstarNode::new(start);
        let Some(c) = space.cost_node(&start_node, None, &end) else {
            log::debug!("search: start node cannot be costed");
            return None;
        };
        start_node.cost = c.cost;
        start_node.path_cost = c.path_cost;
        self.open_node(start_node);

        let mut nbuf = std::mem::take(&mut self.nbuf);
        let mut candidates = std::mem::take(&mut self.candidates);

        let found = loop {
            let Some(best) = self.pop_open() else {
                break None;
            };

            if space.is_end_node(&self.nodes[best], &end) {
                break Some(best);
            }

            if let Some(max) = self.config.max_expansions {
                if self.stats.expanded >= max {
                    log::warn!("search: expansion budget of {max} spent, giving up");
                    break None;
                }
            }

            self.close_node(best);
            log::trace!(
                "search: expanding node {best} (cost {}, path cost {})",
                self.nodes[best].cost,
                self.nodes[best].path_cost
            );

            self.expand(space, best, &end, &mut nbuf, &mut candidates);

            for cand in candidates.drain(..) {
                if self.closed.contains_key(&cand.value) {
                    self.stats.skipped_closed += 1;
                    continue;
                }
                if let Some(&oi) = self.open.get(&cand.value) {
                    if self.nodes[oi].path_cost <= cand.path_cost {
                        self.stats.skipped_worse += 1;
                        continue;
                    }
                }
                self.open_node(cand);
            }
        };

        self.nbuf = nbuf;
        self.candidates = candidates;

        let stats = self.stats;
        match found {
            Some(end_idx) => {
                let path = self.complete_path(end_idx);
                log::debug!(
                    "search: found path of {} nodes, cost {}, after {} expansions",
                    path.len(),
                    self.nodes[end_idx].path_cost,
                    stats.expanded
                );
                Some(path)
            }
            None => {
                log::debug!("search: no path after {} expansions", stats.expanded);
                None
            }
        }
    }

    /// Produce the costed successors of the node at `idx` into `out`.
    ///
    /// Each candidate is a fresh node whose predecessor is `idx`. Candidates
    /// the space refuses to cost are left out.
    fn expand<S>(
        &self,
        space: &S,
        idx: usize,
        goal: &V,
        nbuf: &mut Vec<V>,
        out: &mut Vec<AstarNode<V>>,
    ) where
        S: SearchSpace<Value = V> + ?Sized,
    {
        let current = &self.nodes[idx];
        nbuf.clear();
        space.neighbors(&current.value, nbuf);

        out.clear();
        for value in nbuf.drain(..) {
            let mut cand = AstarNode {
                previous: Some(NodeId(idx)),
                ..AstarNode::new(value)
            };
            let Some(c) = space.cost_node(&cand, Some(current), goal) else {
                continue;
            };
            cand.cost = c.cost;
            cand.path_cost = c.path_cost;
            out.push(cand);
        }
    }

    /// Walk predecessors back from `end_idx` and return the path in start to
    /// end order, with `previous` re-pointed into the returned vector.
    fn complete_path(&self, end_idx: usize) -> Vec<AstarNode<V>> {
        let mut path = Vec::new();
        let mut cur = Some(end_idx);
        while let Some(i) = cur {
            let node = &self.nodes[i];
            path.push(node.clone());
            cur = node.previous.map(NodeId::index);
        }
        path.reverse();
        for (i, node) in path.iter_mut().enumerate() {
            node.previous = i.checked_sub(1).map(NodeId);
        }
        path
    }
}
