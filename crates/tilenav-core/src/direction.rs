//! Compass directions on the tile map and rotation between them.

/// Rotation sense used by [`Direction::rotate`] and [`EightDirection::rotate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationalDirection {
    Clockwise,
    AntiClockwise,
}

impl RotationalDirection {
    #[inline]
    fn step(self, len: usize) -> usize {
        match self {
            Self::Clockwise => 1,
            Self::AntiClockwise => len - 1,
        }
    }
}

/// The four cardinal directions, in clockwise order starting at `Down`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Down,
    Left,
    Up,
    Right,
}

impl Direction {
    /// All directions, in declaration (clockwise) order.
    pub const ALL: [Direction; 4] = [Self::Down, Self::Left, Self::Up, Self::Right];

    /// Step one place clockwise or anti-clockwise, wrapping around.
    #[inline]
    pub fn rotate(self, rot: RotationalDirection) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self as usize + rot.step(len)) % len]
    }

    /// Euler angle in degrees; `Down` faces 180.
    #[inline]
    pub fn to_degrees(self) -> f32 {
        180.0 + 90.0 * self as usize as f32
    }
}

/// The eight compass directions, in clockwise order starting at `Down`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EightDirection {
    Down,
    DownLeft,
    Left,
    LeftUp,
    Up,
    UpRight,
    Right,
    RightDown,
}

impl EightDirection {
    /// All directions, in declaration (clockwise) order.
    pub const ALL: [EightDirection; 8] = [
        Self::Down,
        Self::DownLeft,
        Self::Left,
        Self::LeftUp,
        Self::Up,
        Self::UpRight,
        Self::Right,
        Self::RightDown,
    ];

    /// Step one place clockwise or anti-clockwise, wrapping around.
    #[inline]
    pub fn rotate(self, rot: RotationalDirection) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self as usize + rot.step(len)) % len]
    }

    /// Euler angle in degrees; `Down` faces 180.
    #[inline]
    pub fn to_degrees(self) -> f32 {
        180.0 + 45.0 * self as usize as f32
    }
}

impl From<Direction> for EightDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Up => Self::Up,
            Direction::Right => Self::Right,
        }
    }
}
