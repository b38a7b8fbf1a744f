//! **tilenav-core**: layered tile positions and navigation maps.
//!
//! This crate provides the foundational types used across *tilenav*:
//! tolerant positions on a layered 2D tile map, compass directions, and the
//! mutable navigation graph that pathfinding runs over.

pub mod direction;
pub mod geom;
pub mod navmap;

pub use direction::{Direction, EightDirection, RotationalDirection};
pub use geom::{Bounds, POS_EPSILON, ParsePosError, Pos, PosCell};
pub use navmap::{NavLink, NavMap, NavMapError, NavPoint, PointKey};
