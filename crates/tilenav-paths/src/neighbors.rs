use tilenav_core::{NavLink, NavMap, Pos};

/// Which tile neighbours count as adjacent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Adjacency {
    /// Up, right, down, left.
    #[default]
    Cardinal,
    /// Cardinal plus the four diagonals.
    All,
}

const CARDINAL_STEPS: [(f32, f32); 4] = [(0.0, -1.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)];
const ALL_STEPS: [(f32, f32); 8] = [
    (0.0, -1.0),
    (1.0, -1.0),
    (1.0, 0.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (-1.0, 1.0),
    (-1.0, 0.0),
    (-1.0, -1.0),
];

impl Adjacency {
    /// Unit tile steps in clockwise order starting north.
    pub fn steps(self) -> &'static [(f32, f32)] {
        match self {
            Self::Cardinal => &CARDINAL_STEPS,
            Self::All => &ALL_STEPS,
        }
    }

    /// Tiles next to `p` on its own layer, on a grid of the given spacing.
    pub fn around(self, p: Pos, spacing: f32) -> impl Iterator<Item = Pos> {
        self.steps()
            .iter()
            .map(move |&(dx, dy)| p.shift(dx * spacing, dy * spacing, 0.0))
    }
}

/// Link every point of `map` to its existing same-layer tile neighbours.
///
/// Points are visited in cell order so link order (and with it tie
/// breaking during search) does not depend on hash iteration. Diagonal links
/// are added without checking the two orthogonal tiles they cut across.
/// Returns the number of undirected links added.
pub fn link_adjacent(map: &mut NavMap, adjacency: Adjacency, spacing: f32) -> usize {
    let mut positions: Vec<Pos> = map.points().map(|p| p.position()).collect();
    positions.sort_by_key(|p| p.cell());

    let mut added = 0;
    let mut targets = Vec::with_capacity(adjacency.steps().len());
    for p in positions {
        targets.clear();
        targets.extend(
            adjacency
                .around(p, spacing)
                .filter(|&n| map.has_point(n) && map.link_cost_multiplier(p, n).is_none()),
        );
        for &n in &targets {
            if map.add_point_link(p, n, NavLink::DEFAULT_COST_MULTIPLIER) {
                added += 1;
            }
        }
    }
    log::debug!("link_adjacent: added {added} links over {} points", map.len());
    added
}
