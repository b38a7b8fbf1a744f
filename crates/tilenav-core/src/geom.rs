//! Geometry primitives: [`Pos`], [`PosCell`] and [`Bounds`].
//!
//! A [`Pos`] is a location on a layered tile map. Positions compare equal
//! when every component is within [`POS_EPSILON`] of the other, so small
//! floating-point drift never produces a "new" location.

use std::fmt;
use std::num::ParseFloatError;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::direction::EightDirection;

/// Per-component tolerance used by [`Pos`] equality.
pub const POS_EPSILON: f32 = 0.005;

// ---------------------------------------------------------------------------
// Pos
// ---------------------------------------------------------------------------

/// A position on a layered 2D tile map: `x`, `y` and the `layer` it sits on.
///
/// Equality is tolerant: two positions are equal when every component
/// differs by less than [`POS_EPSILON`]. That relation is not transitive,
/// which is why `Pos` deliberately implements neither `Eq` nor `Hash`; use
/// [`Pos::cell`] when an exact key is needed.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub x: f32,
    pub y: f32,
    pub layer: f32,
}

impl Pos {
    /// Origin on layer 0.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        layer: 0.0,
    };

    /// Create a new position.
    #[inline]
    pub const fn new(x: f32, y: f32, layer: f32) -> Self {
        Self { x, y, layer }
    }

    /// Return a position shifted by (dx, dy, dlayer).
    #[inline]
    pub fn shift(self, dx: f32, dy: f32, dlayer: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.layer + dlayer)
    }

    /// Whether every component is a finite number.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.layer.is_finite()
    }

    /// Rotate around `center` in the X,Y plane, keeping the layer.
    ///
    /// The angle is measured from `Down`, the resting orientation, in the
    /// same clockwise order as [`EightDirection::to_degrees`]: `Down` leaves
    /// the position unchanged and `Up` turns it half way round.
    pub fn rotate_around(self, direction: EightDirection, center: Pos) -> Self {
        let angle = f64::from(direction.to_degrees() - 180.0).to_radians();
        let (sin, cos) = angle.sin_cos();
        let dx = f64::from(self.x - center.x);
        let dy = f64::from(self.y - center.y);
        Self::new(
            (cos * dx - sin * dy + f64::from(center.x)) as f32,
            (sin * dx + cos * dy + f64::from(center.y)) as f32,
            self.layer,
        )
    }

    /// Euclidean distance over X and Y only.
    ///
    /// The layer does not take part: two positions stacked on different
    /// layers at the same X,Y are distance 0 apart. This is not a 3D metric.
    #[inline]
    pub fn planar_distance(self, other: Pos) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// The epsilon-sized cell this position falls in.
    ///
    /// Two positions that are not equal never share a cell. Two equal
    /// positions share a cell or sit in adjacent ones, see
    /// [`Pos::cell_neighborhood`].
    ///
    /// Both only hold while `|v| / POS_EPSILON` fits an `i64`: beyond that
    /// cells saturate and NaN falls in cell 0. [`NavMap`](crate::NavMap)
    /// refuses points it cannot store under a cell of their own.
    #[inline]
    pub fn cell(self) -> PosCell {
        PosCell {
            x: quantize(self.x),
            y: quantize(self.y),
            layer: quantize(self.layer),
        }
    }

    /// Every cell that may hold a position equal to `self`: the own cell
    /// first, then its 26 neighbours.
    ///
    /// Cells at the edge of the `i64` range are clamped, so far out the
    /// same cell may come up more than once.
    pub fn cell_neighborhood(self) -> impl Iterator<Item = PosCell> {
        let c = self.cell();
        std::iter::once(c).chain(NEIGHBORHOOD.iter().map(move |&(dx, dy, dl)| PosCell {
            x: c.x.saturating_add(dx),
            y: c.y.saturating_add(dy),
            layer: c.layer.saturating_add(dl),
        }))
    }
}

#[inline]
fn within_epsilon(a: f32, b: f32) -> bool {
    (f64::from(a) - f64::from(b)).abs() < f64::from(POS_EPSILON)
}

#[inline]
fn quantize(v: f32) -> i64 {
    (f64::from(v) / f64::from(POS_EPSILON)).floor() as i64
}

static NEIGHBORHOOD: [(i64, i64, i64); 26] = {
    let mut out = [(0, 0, 0); 26];
    let mut i = 0;
    let mut dx = -1;
    while dx <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dl = -1;
            while dl <= 1 {
                if !(dx == 0 && dy == 0 && dl == 0) {
                    out[i] = (dx, dy, dl);
                    i += 1;
                }
                dl += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    out
};

// --- trait impls for Pos ---

/// Adds X and Y; the layer of the left operand is kept.
impl Add for Pos {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.layer)
    }
}

/// Subtracts X and Y; the layer of the left operand is kept.
impl Sub for Pos {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.layer)
    }
}

impl PartialEq for Pos {
    fn eq(&self, other: &Self) -> bool {
        within_epsilon(self.x, other.x)
            && within_epsilon(self.y, other.y)
            && within_epsilon(self.layer, other.layer)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.x, self.y, self.layer)
    }
}

impl FromStr for Pos {
    type Err = ParsePosError;

    /// Parse the `<x, y, layer>` form produced by `Display`.
    ///
    /// Whitespace and angle brackets are stripped before splitting on
    /// commas, so `"<1,2,0>"` and `"1, 2, 0"` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '<' && *c != '>')
            .collect();
        let parts: Vec<&str> = cleaned.split(',').collect();
        if parts.len() != 3 {
            return Err(ParsePosError::ComponentCount(parts.len()));
        }
        let component = |index: usize| {
            parts[index]
                .parse::<f32>()
                .map_err(|source| ParsePosError::InvalidComponent { index, source })
        };
        Ok(Pos::new(component(0)?, component(1)?, component(2)?))
    }
}

/// Errors that can occur when parsing a [`Pos`] literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsePosError {
    /// The literal did not have exactly three comma-separated components.
    ComponentCount(usize),
    /// A component was not a valid float.
    InvalidComponent {
        index: usize,
        source: ParseFloatError,
    },
}

impl fmt::Display for ParsePosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComponentCount(n) => {
                write!(f, "position literal needs 3 components, found {n}")
            }
            Self::InvalidComponent { index, source } => {
                let name = match *index {
                    0 => "x",
                    1 => "y",
                    2 => "layer",
                    _ => "unknown",
                };
                write!(f, "invalid {name} component in position literal: {source}")
            }
        }
    }
}

impl std::error::Error for ParsePosError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidComponent { source, .. } => Some(source),
            Self::ComponentCount(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// PosCell
// ---------------------------------------------------------------------------

/// Integer cell of side [`POS_EPSILON`] holding a [`Pos`].
///
/// Unlike `Pos`, a cell is an exact key (`Eq + Hash + Ord`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PosCell {
    pub x: i64,
    pub y: i64,
    pub layer: i64,
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Axis-aligned box covering a set of positions, inclusive on both ends.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: Pos,
    pub max: Pos,
}

impl Bounds {
    /// Bounds of a single position.
    #[inline]
    pub const fn at(p: Pos) -> Self {
        Self { min: p, max: p }
    }

    /// Grow the bounds so they cover `p`.
    #[inline]
    pub fn include(self, p: Pos) -> Self {
        Self {
            min: Pos::new(
                self.min.x.min(p.x),
                self.min.y.min(p.y),
                self.min.layer.min(p.layer),
            ),
            max: Pos::new(
                self.max.x.max(p.x),
                self.max.y.max(p.y),
                self.max.layer.max(p.layer),
            ),
        }
    }

    /// Whether `p` lies inside the bounds.
    #[inline]
    pub fn contains(self, p: Pos) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.layer >= self.min.layer
            && p.layer <= self.max.layer
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.min, self.max)
    }
}
