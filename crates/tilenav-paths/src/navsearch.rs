//! A* over a [`NavMap`].
//!
//! Vertices are the map's [`PointKey`]s and neighbours are the targets of a
//! point's links, in link order. Moving along a link costs its planar length
//! (plus [`NavCostConfig::layer_step_cost`] per layer crossed) times the
//! link's cost multiplier. The estimate is the weighted planar distance to
//! the goal, so with a weight of 1.0 and multipliers of at least 1.0 the
//! result is the cheapest path.

use tilenav_core::{NavMap, NavPoint, PointKey, Pos};

use crate::config::NavCostConfig;
use crate::engine::{AstarNode, GraphSearch};
use crate::traits::{NodeCost, SearchSpace};

/// A path through a navigation map.
#[derive(Clone, Debug, PartialEq)]
pub struct NavPath {
    /// Stored positions from start to goal, inclusive.
    pub positions: Vec<Pos>,
    /// Total traversal cost.
    pub cost: f32,
}

/// [`SearchSpace`] backed by a borrowed [`NavMap`].
///
/// The map must not change while a search over it is running; the borrow
/// enforces that.
#[derive(Clone, Copy, Debug)]
pub struct NavMapSearch<'a> {
    map: &'a NavMap,
    config: NavCostConfig,
}

impl<'a> NavMapSearch<'a> {
    pub fn new(map: &'a NavMap) -> Self {
        Self::with_config(map, NavCostConfig::default())
    }

    pub fn with_config(map: &'a NavMap, config: NavCostConfig) -> Self {
        Self { map, config }
    }

    #[inline]
    pub fn map(&self) -> &'a NavMap {
        self.map
    }

    #[inline]
    pub fn config(&self) -> &NavCostConfig {
        &self.config
    }

    /// Cost of following the link from `from` to `to`.
    ///
    /// `None` if there is no such link or its cost would be negative.
    pub fn step_cost(&self, from: &NavPoint, to: PointKey) -> Option<f32> {
        let link = from.link_to(to)?;
        let (a, b) = (from.position(), to.pos());
        let length = self.map.distance_between_points(a, b)
            + self.config.layer_step_cost * (b.layer - a.layer).abs();
        let cost = length * link.cost_multiplier;
        (cost >= 0.0).then_some(cost)
    }

    /// Estimated remaining cost from `from` to `goal`.
    #[inline]
    pub fn estimate(&self, from: Pos, goal: Pos) -> f32 {
        self.config.heuristic_weight * self.map.distance_between_points(from, goal)
    }

    /// Search from `start` to `end`, both given as positions on the map.
    ///
    /// Returns `None` if either endpoint is not on the map or no path
    /// connects them.
    pub fn find_path(
        &self,
        engine: &mut GraphSearch<PointKey>,
        start: Pos,
        end: Pos,
    ) -> Option<NavPath> {
        let Some(from) = self.map.key(start) else {
            log::debug!("find_path: start {start} is not on the map");
            return None;
        };
        let Some(to) = self.map.key(end) else {
            log::debug!("find_path: end {end} is not on the map");
            return None;
        };
        let nodes = engine.search(self, from, to)?;
        let cost = nodes.last().map_or(0.0, |n| n.path_cost);
        Some(NavPath {
            positions: nodes.iter().map(|n| n.value.pos()).collect(),
            cost,
        })
    }
}

impl SearchSpace for NavMapSearch<'_> {
    type Value = PointKey;

    fn neighbors(&self, value: &PointKey, buf: &mut Vec<PointKey>) {
        if let Some(point) = self.map.point_by_key(*value) {
            buf.extend(point.links().iter().map(|l| l.to));
        }
    }

    fn cost_node(
        &self,
        node: &AstarNode<PointKey>,
        previous: Option<&AstarNode<PointKey>>,
        goal: &PointKey,
    ) -> Option<NodeCost> {
        self.map.point_by_key(node.value)?;
        let path_cost = match previous {
            None => 0.0,
            Some(prev) => {
                let from = self.map.point_by_key(prev.value)?;
                prev.path_cost + self.step_cost(from, node.value)?
            }
        };
        Some(NodeCost::new(
            path_cost,
            self.estimate(node.value.pos(), goal.pos()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Pos {
        Pos::new(x, y, 0.0)
    }

    fn map_with(points: &[Pos], links: &[(Pos, Pos, f32)]) -> NavMap {
        let mut map = NavMap::new();
        for &q in points {
            map.add_point(q);
        }
        for &(a, b, m) in links {
            assert!(map.add_point_link(a, b, m));
        }
        map
    }

    #[test]
    fn start_equals_end() {
        let a = p(0.0, 0.0);
        let map = map_with(&[a], &[]);
        let mut engine = GraphSearch::new();
        let path = NavMapSearch::new(&map).find_path(&mut engine, a, a).unwrap();
        assert_eq!(path.positions, vec![a]);
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn chain_then_shortcut() {
        let (a, b, c) = (p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0));
        let mut map = map_with(&[a, b, c], &[(a, b, 1.0), (b, c, 1.0)]);
        let mut engine = GraphSearch::new();

        let path = NavMapSearch::new(&map).find_path(&mut engine, a, c).unwrap();
        assert_eq!(path.positions, vec![a, b, c]);
        assert!((path.cost - 2.0 * 2f32.sqrt()).abs() < 1e-5);

        map.add_point_link(a, c, 1.0);
        let path = NavMapSearch::new(&map).find_path(&mut engine, a, c).unwrap();
        assert_eq!(path.positions, vec![a, c]);
        assert!((path.cost - 2.0).abs() < 1e-5);
    }

    #[test]
    fn multiplier_steers_route() {
        let (a, b, c) = (p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0));
        // Direct link through a swamp costs 2 * 3 = 6, detour ~2.83.
        let map = map_with(&[a, b, c], &[(a, b, 1.0), (b, c, 1.0), (a, c, 3.0)]);
        let mut engine = GraphSearch::new();
        let path = NavMapSearch::new(&map).find_path(&mut engine, a, c).unwrap();
        assert_eq!(path.positions, vec![a, b, c]);
    }

    #[test]
    fn disconnected_components() {
        let (a, b, c, d) = (p(0.0, 0.0), p(1.0, 0.0), p(5.0, 0.0), p(6.0, 0.0));
        let map = map_with(&[a, b, c, d], &[(a, b, 1.0), (c, d, 1.0)]);
        let mut engine = GraphSearch::new();
        assert!(NavMapSearch::new(&map).find_path(&mut engine, a, d).is_none());
    }

    #[test]
    fn endpoints_off_the_map() {
        let a = p(0.0, 0.0);
        let map = map_with(&[a], &[]);
        let mut engine = GraphSearch::new();
        let search = NavMapSearch::new(&map);
        assert!(search.find_path(&mut engine, a, p(3.0, 3.0)).is_none());
        assert!(search.find_path(&mut engine, p(3.0, 3.0), a).is_none());
    }

    #[test]
    fn jittered_endpoints_resolve() {
        let (a, b) = (p(0.0, 0.0), p(1.0, 0.0));
        let map = map_with(&[a, b], &[(a, b, 1.0)]);
        let mut engine = GraphSearch::new();
        let path = NavMapSearch::new(&map)
            .find_path(&mut engine, p(0.002, -0.003), p(0.997, 0.001))
            .unwrap();
        assert_eq!(path.positions.len(), 2);
        assert_eq!(path.positions[1].x, 1.0);
    }

    #[test]
    fn layer_change_costs_extra() {
        let low = Pos::new(0.0, 0.0, 0.0);
        let high = Pos::new(0.0, 0.0, 1.0);
        let map = map_with(&[low, high], &[(low, high, 2.0)]);
        let mut engine = GraphSearch::new();

        let path = NavMapSearch::new(&map).find_path(&mut engine, low, high).unwrap();
        assert_eq!(path.cost, 2.0);

        let free_stairs = NavCostConfig {
            layer_step_cost: 0.0,
            ..NavCostConfig::default()
        };
        let path = NavMapSearch::with_config(&map, free_stairs)
            .find_path(&mut engine, low, high)
            .unwrap();
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn negative_multiplier_is_impassable() {
        let (a, b) = (p(0.0, 0.0), p(1.0, 0.0));
        let map = map_with(&[a, b], &[(a, b, -1.0)]);
        let mut engine = GraphSearch::new();
        assert!(NavMapSearch::new(&map).find_path(&mut engine, a, b).is_none());
    }

    #[test]
    fn inflated_heuristic_trades_optimality() {
        let (a, b, c, g) = (p(0.0, 0.0), p(2.0, 2.0), p(2.0, 0.0), p(4.0, 0.0));
        // Over b: ~5.66. Over c: 2*2 + 2*2 = 8.
        let map = map_with(
            &[a, b, c, g],
            &[(a, b, 1.0), (b, g, 1.0), (a, c, 2.0), (c, g, 2.0)],
        );
        let mut engine = GraphSearch::new();

        let path = NavMapSearch::new(&map).find_path(&mut engine, a, g).unwrap();
        assert_eq!(path.positions, vec![a, b, g]);

        let greedy = NavCostConfig {
            heuristic_weight: 10.0,
            ..NavCostConfig::default()
        };
        let path = NavMapSearch::with_config(&map, greedy)
            .find_path(&mut engine, a, g)
            .unwrap();
        assert_eq!(path.positions, vec![a, c, g]);
        assert_eq!(path.cost, 8.0);
    }

    #[test]
    fn removed_point_breaks_route() {
        let (a, b, c) = (p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0));
        let mut map = map_with(&[a, b, c], &[(a, b, 1.0), (b, c, 1.0)]);
        let mut engine = GraphSearch::new();
        assert!(NavMapSearch::new(&map).find_path(&mut engine, a, c).is_some());
        map.remove_point(b);
        assert!(NavMapSearch::new(&map).find_path(&mut engine, a, c).is_none());
    }

    #[test]
    fn random_grids_match_uniform_cost_search() {
        let mut engine = GraphSearch::new();
        let uniform = NavCostConfig {
            heuristic_weight: 0.0,
            ..NavCostConfig::default()
        };
        for _ in 0..30 {
            let mut map = NavMap::new();
            for y in 0..8 {
                for x in 0..8 {
                    if rand::random_range(0..10) < 8 {
                        map.add_point(p(x as f32, y as f32));
                    }
                }
            }
            crate::link_adjacent(&mut map, crate::Adjacency::All, 1.0);

            // Roughen some links.
            let pairs: Vec<(Pos, Pos)> = map
                .points()
                .flat_map(|pt| pt.links().iter().map(move |l| (pt.position(), l.to.pos())))
                .filter(|(a, b)| a.cell() < b.cell())
                .collect();
            for (a, b) in pairs {
                if rand::random_range(0..3) == 0 {
                    map.break_point_link(a, b);
                    map.add_point_link(a, b, rand::random_range(1.0..3.0));
                }
            }

            let positions: Vec<Pos> = map.points().map(NavPoint::position).collect();
            if positions.is_empty() {
                continue;
            }
            for _ in 0..10 {
                let start = positions[rand::random_range(0..positions.len())];
                let end = positions[rand::random_range(0..positions.len())];
                let astar = NavMapSearch::new(&map).find_path(&mut engine, start, end);
                let ucs =
                    NavMapSearch::with_config(&map, uniform).find_path(&mut engine, start, end);
                match (astar, ucs) {
                    (Some(a), Some(u)) => {
                        assert!((a.cost - u.cost).abs() < 1e-3, "{} vs {}", a.cost, u.cost);
                        assert_eq!(a.positions[0], start);
                        assert_eq!(*a.positions.last().unwrap(), end);
                        for w in a.positions.windows(2) {
                            assert!(map.link_cost_multiplier(w[0], w[1]).is_some());
                        }
                    }
                    (None, None) => {}
                    (a, u) => panic!("reachability differs: {a:?} vs {u:?}"),
                }
            }
        }
    }

    #[test]
    fn path_nodes_carry_costs() {
        let (a, b, c) = (p(0.0, 0.0), p(3.0, 0.0), p(3.0, 4.0));
        let map = map_with(&[a, b, c], &[(a, b, 1.0), (b, c, 1.0)]);
        let search = NavMapSearch::new(&map);
        let mut engine = GraphSearch::new();
        let (ka, kc) = (map.key(a).unwrap(), map.key(c).unwrap());
        let nodes = engine.search(&search, ka, kc).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].path_cost, 0.0);
        assert_eq!(nodes[0].cost, 5.0);
        assert_eq!(nodes[1].path_cost, 3.0);
        assert_eq!(nodes[1].cost, 7.0);
        assert_eq!(nodes[2].path_cost, 7.0);
        assert_eq!(nodes[2].cost, 7.0);
    }
}
