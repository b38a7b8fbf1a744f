//! Best-first graph search for layered tile maps.
//!
//! This crate provides a reusable A* engine and a ready-made search space
//! over a [`tilenav_core::NavMap`]:
//!
//! - **A\*** least-cost search over any graph ([`GraphSearch::search`])
//! - **Navigation map search** between two positions ([`NavMapSearch::find_path`])
//! - **Tile adjacency** helpers for wiring up grid maps ([`link_adjacent`])
//!
//! [`GraphSearch`] owns and reuses its internal arena, open and closed sets,
//! so repeated queries settle into few allocations.
//!
//! # Extension points
//!
//! | Item | Supplies |
//! |---|---|
//! | [`SearchSpace`] | neighbours, node costing, end test |
//! | [`fn_space`] / [`FnSpace`] | the same from closures |
//! | [`NavMapSearch`] | a [`SearchSpace`] over a navigation map |

mod astar;
mod config;
mod engine;
mod navsearch;
mod neighbors;
mod traits;

pub use config::{NavCostConfig, SearchConfig};
pub use engine::{AstarNode, GraphSearch, NodeId, SearchStats};
pub use navsearch::{NavMapSearch, NavPath};
pub use neighbors::{Adjacency, link_adjacent};
pub use traits::{FnSpace, NodeCost, SearchSpace, fn_space};
