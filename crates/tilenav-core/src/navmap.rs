//! Navigation map: points on a layered tile map and the weighted links
//! between them.
//!
//! The map is a simple undirected graph stored as pairs of directed links.
//! [`NavPoint`] only knows how to add or break its own outgoing links;
//! [`NavMap`] keeps both directions in step.
//!
//! Points are indexed by the [`PosCell`] of their stored position. Because
//! unequal positions never share a cell, each cell holds at most one point,
//! and a lookup only has to probe the cells around the query.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::direction::EightDirection;
use crate::geom::{Bounds, Pos, PosCell};

// ---------------------------------------------------------------------------
// PointKey
// ---------------------------------------------------------------------------

/// Identity of a point stored in a [`NavMap`]: its canonical position.
///
/// Keys compare and hash exactly (by cell), so they can be used as
/// `HashMap` keys where a bare [`Pos`] cannot. Obtain one with
/// [`NavMap::key`].
#[derive(Copy, Clone, Debug)]
pub struct PointKey {
    pos: Pos,
    cell: PosCell,
}

impl PointKey {
    #[inline]
    fn new(pos: Pos) -> Self {
        Self {
            pos,
            cell: pos.cell(),
        }
    }

    /// The stored position of the point.
    #[inline]
    pub fn pos(self) -> Pos {
        self.pos
    }

    /// The index cell of the point.
    #[inline]
    pub fn cell(self) -> PosCell {
        self.cell
    }
}

impl PartialEq for PointKey {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}

impl Eq for PointKey {}

impl Hash for PointKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cell.hash(state);
    }
}

impl fmt::Display for PointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.pos, f)
    }
}

// ---------------------------------------------------------------------------
// NavLink / NavPoint
// ---------------------------------------------------------------------------

/// Directed link from one point to a neighbouring point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NavLink {
    pub to: PointKey,
    /// Scales the traversal cost of the link, e.g. above 1.0 for rough
    /// terrain.
    pub cost_multiplier: f32,
}

impl NavLink {
    /// Multiplier used when the caller has no reason to bias the link.
    pub const DEFAULT_COST_MULTIPLIER: f32 = 1.0;
}

/// A navigable position and its ordered outgoing links.
#[derive(Clone, Debug)]
pub struct NavPoint {
    key: PointKey,
    links: Vec<NavLink>,
}

impl NavPoint {
    fn new(key: PointKey) -> Self {
        Self {
            key,
            links: Vec::new(),
        }
    }

    #[inline]
    pub fn position(&self) -> Pos {
        self.key.pos
    }

    #[inline]
    pub fn key(&self) -> PointKey {
        self.key
    }

    /// Outgoing links in the order they were added.
    #[inline]
    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    /// The link to `to`, if any.
    pub fn link_to(&self, to: PointKey) -> Option<&NavLink> {
        self.links.iter().find(|l| l.to == to)
    }

    /// Add a one-way link to `to`.
    ///
    /// Returns `false` without touching the existing link when one to the
    /// same target is already present; its multiplier is not updated.
    pub fn add_link(&mut self, to: PointKey, cost_multiplier: f32) -> bool {
        if self.link_to(to).is_some() {
            return false;
        }
        self.links.push(NavLink { to, cost_multiplier });
        true
    }

    /// Break the one-way link to `to`. Returns whether a link was removed.
    pub fn break_link(&mut self, to: PointKey) -> bool {
        match self.links.iter().position(|l| l.to == to) {
            Some(i) => {
                self.links.remove(i);
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// NavMap
// ---------------------------------------------------------------------------

/// Errors reported by [`NavMap`] queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMapError {
    /// The query needs at least one point.
    Empty,
}

impl fmt::Display for NavMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "navigation map has no points"),
        }
    }
}

impl std::error::Error for NavMapError {}

/// A mutable graph of navigable positions.
///
/// `Clone` is a deep copy: the clone shares no state with the original.
#[derive(Clone, Debug, Default)]
pub struct NavMap {
    points: HashMap<PosCell, NavPoint>,
}

impl NavMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every point.
    pub fn reset(&mut self) {
        self.points.clear();
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Resolve `pos` to the key of the stored point equal to it.
    ///
    /// If several stored points lie within tolerance of `pos` (equality is
    /// not transitive), the closest one wins.
    pub fn key(&self, pos: Pos) -> Option<PointKey> {
        let mut best: Option<(f32, PointKey)> = None;
        for cell in pos.cell_neighborhood() {
            let Some(point) = self.points.get(&cell) else {
                continue;
            };
            let stored = point.position();
            if stored != pos {
                continue;
            }
            let d = (stored.x - pos.x)
                .abs()
                .max((stored.y - pos.y).abs())
                .max((stored.layer - pos.layer).abs());
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, point.key));
            }
        }
        best.map(|(_, key)| key)
    }

    /// Whether a point equal to `pos` exists.
    #[inline]
    pub fn has_point(&self, pos: Pos) -> bool {
        self.key(pos).is_some()
    }

    /// The point equal to `pos`.
    pub fn point(&self, pos: Pos) -> Option<&NavPoint> {
        self.key(pos).and_then(|k| self.points.get(&k.cell))
    }

    /// The point stored under `key`.
    #[inline]
    pub fn point_by_key(&self, key: PointKey) -> Option<&NavPoint> {
        self.points.get(&key.cell)
    }

    /// Iterate over all points, in no particular order.
    pub fn points(&self) -> impl Iterator<Item = &NavPoint> {
        self.points.values()
    }

    /// Total number of directed links (each undirected link counts twice).
    pub fn link_count(&self) -> usize {
        self.points.values().map(|p| p.links.len()).sum()
    }

    /// Add a point with no links.
    ///
    /// Returns `false` (and changes nothing) if an equal point exists, if
    /// `pos` is not finite, or if it is so far out that its cell is already
    /// taken by another point.
    pub fn add_point(&mut self, pos: Pos) -> bool {
        if !pos.is_finite() {
            log::debug!("refusing point {pos}: not finite");
            return false;
        }
        if self.has_point(pos) {
            return false;
        }
        let key = PointKey::new(pos);
        match self.points.entry(key.cell) {
            Entry::Occupied(e) => {
                log::debug!(
                    "refusing point {pos}: cell {:?} already holds {}",
                    key.cell,
                    e.get().position()
                );
                false
            }
            Entry::Vacant(e) => {
                e.insert(NavPoint::new(key));
                true
            }
        }
    }

    /// Link `a` and `b` in both directions with `cost_multiplier`.
    ///
    /// Returns `false` without mutating anything unless both points exist.
    /// Each direction is only added when missing, so repeated calls never
    /// duplicate links and never change the multiplier of a link that is
    /// already there. Linking a point to itself adds a single link.
    pub fn add_point_link(&mut self, a: Pos, b: Pos, cost_multiplier: f32) -> bool {
        let (Some(ka), Some(kb)) = (self.key(a), self.key(b)) else {
            log::debug!("refusing link {a} <-> {b}: missing endpoint");
            return false;
        };
        if let Some(pa) = self.points.get_mut(&ka.cell) {
            pa.add_link(kb, cost_multiplier);
        }
        if let Some(pb) = self.points.get_mut(&kb.cell) {
            pb.add_link(ka, cost_multiplier);
        }
        true
    }

    /// Remove the point equal to `pos` and every link pointing at it.
    pub fn remove_point(&mut self, pos: Pos) {
        let Some(key) = self.key(pos) else {
            return;
        };
        self.points.remove(&key.cell);
        for point in self.points.values_mut() {
            point.break_link(key);
        }
    }

    /// Break the link between `a` and `b` in both directions, if present.
    pub fn break_point_link(&mut self, a: Pos, b: Pos) {
        let (Some(ka), Some(kb)) = (self.key(a), self.key(b)) else {
            return;
        };
        if let Some(pa) = self.points.get_mut(&ka.cell) {
            pa.break_link(kb);
        }
        if let Some(pb) = self.points.get_mut(&kb.cell) {
            pb.break_link(ka);
        }
    }

    /// Cost multiplier of the link from `a` to `b`, if linked.
    pub fn link_cost_multiplier(&self, a: Pos, b: Pos) -> Option<f32> {
        let kb = self.key(b)?;
        self.point(a)?.link_to(kb).map(|l| l.cost_multiplier)
    }

    /// Planar distance between two positions; see [`Pos::planar_distance`].
    ///
    /// The layer is ignored, so this suits layer-indifferent heuristics
    /// (stairs, elevation) but is not a 3D distance.
    #[inline]
    pub fn distance_between_points(&self, a: Pos, b: Pos) -> f32 {
        a.planar_distance(b)
    }

    /// Smallest box covering every point.
    pub fn bounds(&self) -> Result<Bounds, NavMapError> {
        let mut positions = self.points.values().map(NavPoint::position);
        let first = positions.next().ok_or(NavMapError::Empty)?;
        Ok(positions.fold(Bounds::at(first), Bounds::include))
    }

    /// Overlay `other` onto this map at `position`, rotated to `direction`.
    ///
    /// Not implemented: nothing is merged and `true` is always returned.
    /// How offsets, rotation and colliding points should combine is still
    /// undecided.
    pub fn superimpose(&mut self, other: &NavMap, position: Pos, direction: EightDirection) -> bool {
        log::warn!(
            "superimpose of {} points at {position} facing {direction:?} is not implemented",
            other.len()
        );
        true
    }
}
