//! Tunables for the search engine and the navigation-map search space.

/// Limits applied by [`GraphSearch`](crate::GraphSearch).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SearchConfig {
    /// Give up (no path) after closing this many nodes. `None` searches until
    /// the goal is found or the open set is empty.
    pub max_expansions: Option<usize>,
}

/// Costing used by [`NavMapSearch`](crate::NavMapSearch).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct NavCostConfig {
    /// Scale of the planar-distance estimate. Values above 1.0 find paths
    /// faster but may miss the cheapest one.
    pub heuristic_weight: f32,
    /// Base cost of moving one layer up or down, added to the planar length
    /// of a link before its multiplier is applied.
    pub layer_step_cost: f32,
}

impl Default for NavCostConfig {
    fn default() -> Self {
        Self {
            heuristic_weight: 1.0,
            layer_step_cost: 1.0,
        }
    }
}
