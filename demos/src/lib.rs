//! Shared navigation demo model: multi-layer ASCII layouts turned into
//! navigation maps, and path rendering back onto the text.
//!
//! Layout format: one block of equally wide lines per layer, layers
//! separated by a `---` line, bottom layer first.
//!
//! | Rune | Meaning |
//! |---|---|
//! | `.` | floor |
//! | `#` | wall (not navigable) |
//! | `~` | swamp: every link touching it costs [`SWAMP_COST`] times more |
//! | `S` | stairs: linked to the same tile on the next layer up |

use std::fmt;

use tilenav_core::{NavMap, Pos};
use tilenav_paths::{Adjacency, NavCostConfig, SearchConfig, link_adjacent};

/// Cost multiplier of links into or out of a swamp tile.
pub const SWAMP_COST: f32 = 3.0;

/// Runes accepted by [`Layout::parse`].
pub const RUNES: &str = ".#~S";

/// Built-in two-layer layout used when no file is given.
pub const DEFAULT_LAYOUT: &str = "\
##########
#..~~~..S#
#.##~#...#
#..#~#.#.#
#S.#...#.#
##########
---
##########
#.......S#
#.######.#
#.#....#.#
#S..##...#
##########";

/// Settings read from the demo's JSON config file.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub search: SearchConfig,
    pub cost: NavCostConfig,
    pub adjacency: Adjacency,
}

/// A parsed multi-layer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// `layers[layer][y][x]`
    layers: Vec<Vec<Vec<char>>>,
    width: usize,
    height: usize,
}

impl Layout {
    /// Parse a layout. Leading/trailing whitespace of the whole text is
    /// trimmed, individual lines are kept as they are.
    pub fn parse(s: &str) -> Result<Self, LayoutError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LayoutError::Empty);
        }
        let mut layers: Vec<Vec<Vec<char>>> = vec![Vec::new()];
        for line in s.lines() {
            if line.trim() == "---" {
                layers.push(Vec::new());
                continue;
            }
            let layer = layers.len() - 1;
            let y = layers[layer].len();
            let row: Vec<char> = line.chars().collect();
            if let Some(x) = row.iter().position(|c| !RUNES.contains(*c)) {
                return Err(LayoutError::InvalidRune {
                    ch: row[x],
                    pos: Pos::new(x as f32, y as f32, layer as f32),
                });
            }
            layers[layer].push(row);
        }

        let width = layers[0].first().map_or(0, Vec::len);
        let height = layers[0].len();
        for (layer, rows) in layers.iter().enumerate() {
            if rows.len() != height || rows.iter().any(|r| r.len() != width) || width == 0 {
                return Err(LayoutError::InconsistentSize { layer });
            }
        }
        Ok(Self {
            layers,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn layers(&self) -> usize {
        self.layers.len()
    }

    /// Rune at a tile, `None` outside the layout.
    pub fn tile(&self, x: usize, y: usize, layer: usize) -> Option<char> {
        self.layers.get(layer)?.get(y)?.get(x).copied()
    }

    fn walkable(&self, x: usize, y: usize, layer: usize) -> bool {
        matches!(self.tile(x, y, layer), Some('.' | '~' | 'S'))
    }

    fn tiles(&self) -> impl Iterator<Item = (usize, usize, usize, char)> + '_ {
        self.layers.iter().enumerate().flat_map(|(l, rows)| {
            rows.iter().enumerate().flat_map(move |(y, row)| {
                row.iter().enumerate().map(move |(x, &ch)| (x, y, l, ch))
            })
        })
    }

    /// Build the navigation map: one point per walkable tile, linked to its
    /// neighbours on the same layer, swamps weighted, stairs connected.
    pub fn build_map(&self, adjacency: Adjacency) -> NavMap {
        let mut map = NavMap::new();
        for (x, y, l, _) in self.tiles() {
            if self.walkable(x, y, l) {
                map.add_point(tile_pos(x, y, l));
            }
        }
        link_adjacent(&mut map, adjacency, 1.0);

        for (x, y, l, ch) in self.tiles() {
            let here = tile_pos(x, y, l);
            match ch {
                '~' => {
                    let targets: Vec<Pos> = map
                        .point(here)
                        .map(|p| p.links().iter().map(|link| link.to.pos()).collect())
                        .unwrap_or_default();
                    for t in targets {
                        map.break_point_link(here, t);
                        map.add_point_link(here, t, SWAMP_COST);
                    }
                }
                'S' if self.walkable(x, y, l + 1) => {
                    map.add_point_link(here, tile_pos(x, y, l + 1), 1.0);
                }
                _ => {}
            }
        }
        log::info!(
            "built map of {} points and {} links from {}x{}x{} layout",
            map.len(),
            map.link_count() / 2,
            self.width,
            self.height,
            self.layers()
        );
        map
    }

    /// Render the layout with `path` drawn as `*`, its start as `A` and its
    /// end as `B`.
    pub fn render(&self, path: &[Pos]) -> String {
        let mut layers = self.layers.clone();
        for (i, p) in path.iter().enumerate() {
            let (x, y, l) = (p.x.round(), p.y.round(), p.layer.round());
            if x < 0.0 || y < 0.0 || l < 0.0 {
                continue;
            }
            let Some(cell) = layers
                .get_mut(l as usize)
                .and_then(|rows| rows.get_mut(y as usize))
                .and_then(|row| row.get_mut(x as usize))
            else {
                continue;
            };
            *cell = if i == 0 {
                'A'
            } else if i + 1 == path.len() {
                'B'
            } else {
                '*'
            };
        }
        layers
            .iter()
            .map(|rows| {
                rows.iter()
                    .map(|r| r.iter().collect::<String>())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n---\n")
    }
}

#[inline]
fn tile_pos(x: usize, y: usize, layer: usize) -> Pos {
    Pos::new(x as f32, y as f32, layer as f32)
}

/// Errors that can occur when parsing a layout.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The layout has no lines.
    Empty,
    /// A layer's lines differ in width, or its height differs from the
    /// first layer.
    InconsistentSize { layer: usize },
    /// A character outside [`RUNES`] was found.
    InvalidRune { ch: char, pos: Pos },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "layout is empty"),
            Self::InconsistentSize { layer } => {
                write!(f, "layout: inconsistent size on layer {layer}")
            }
            Self::InvalidRune { ch, pos } => {
                write!(f, "layout contains invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tilenav_paths::{GraphSearch, NavMapSearch};

    #[test]
    fn parse_default_layout() {
        let layout = Layout::parse(DEFAULT_LAYOUT).unwrap();
        assert_eq!(layout.width(), 10);
        assert_eq!(layout.height(), 6);
        assert_eq!(layout.layers(), 2);
        assert_eq!(layout.tile(8, 1, 0), Some('S'));
        assert_eq!(layout.tile(10, 1, 0), None);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Layout::parse("  \n "), Err(LayoutError::Empty));
        assert_eq!(
            Layout::parse("...\n..\n"),
            Err(LayoutError::InconsistentSize { layer: 0 })
        );
        assert_eq!(
            Layout::parse("...\n...\n---\n..."),
            Err(LayoutError::InconsistentSize { layer: 1 })
        );
        let err = Layout::parse("...\n.x.").unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidRune {
                ch: 'x',
                pos: Pos::new(1.0, 1.0, 0.0)
            }
        );
        assert!(err.to_string().contains("<1, 1, 0>"));
    }

    #[test]
    fn build_links_floor_swamp_and_stairs() {
        let layout = Layout::parse(".~.\n---\n..S").unwrap();
        let map = layout.build_map(Adjacency::Cardinal);
        assert_eq!(map.len(), 6);
        let (a, swamp) = (Pos::new(0.0, 0.0, 0.0), Pos::new(1.0, 0.0, 0.0));
        assert_eq!(map.link_cost_multiplier(a, swamp), Some(SWAMP_COST));
        assert_eq!(map.link_cost_multiplier(swamp, a), Some(SWAMP_COST));
        // Stairs on the top layer have nothing above them.
        assert_eq!(map.link_count(), 8);
    }

    #[test]
    fn stairs_connect_layers() {
        let layout = Layout::parse(DEFAULT_LAYOUT).unwrap();
        let map = layout.build_map(Adjacency::Cardinal);
        let mut engine = GraphSearch::new();
        let path = NavMapSearch::new(&map)
            .find_path(&mut engine, Pos::new(1.0, 1.0, 0.0), Pos::new(3.0, 3.0, 1.0))
            .unwrap();
        assert!(path.positions.iter().any(|p| p.layer == 1.0));
        assert_eq!(*path.positions.last().unwrap(), Pos::new(3.0, 3.0, 1.0));
    }

    #[test]
    fn render_marks_path() {
        let layout = Layout::parse("...\n...").unwrap();
        let path = [
            Pos::new(0.0, 0.0, 0.0),
            Pos::new(1.0, 0.0, 0.0),
            Pos::new(1.0, 1.0, 0.0),
        ];
        assert_eq!(layout.render(&path), "A*.\n.B.");
    }

    #[test]
    fn config_defaults_fill_gaps() {
        let c: DemoConfig =
            serde_json::from_str(r#"{"search": {"max_expansions": 50}, "adjacency": "All"}"#)
                .unwrap();
        assert_eq!(c.search.max_expansions, Some(50));
        assert_eq!(c.cost, NavCostConfig::default());
        assert_eq!(c.adjacency, Adjacency::All);
    }
}
