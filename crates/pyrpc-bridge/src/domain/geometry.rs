//! Where a session is: world, dimension and coordinates.

use std::fmt;

/// Host world (server level set) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(pub u32);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world-{}", self.0)
    }
}

/// A dimension inside a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DimensionId {
    pub world: WorldId,
    pub dimension: i32,
}

impl DimensionId {
    #[must_use]
    pub const fn new(world: WorldId, dimension: i32) -> Self {
        Self { world, dimension }
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/dim-{}", self.world, self.dimension)
    }
}

/// A point in a specific dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub dimension: DimensionId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    #[must_use]
    pub const fn new(dimension: DimensionId, x: f64, y: f64, z: f64) -> Self {
        Self { dimension, x, y, z }
    }

    /// Squared euclidean distance, or `None` across dimensions.
    #[must_use]
    pub fn distance_squared(&self, other: &Position) -> Option<f64> {
        if self.dimension != other.dimension {
            return None;
        }
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        Some(dx * dx + dy * dy + dz * dz)
    }

    /// Same dimension and within `distance` (inclusive).
    #[must_use]
    pub fn is_within(&self, other: &Position, distance: f64) -> bool {
        self.distance_squared(other)
            .is_some_and(|d2| d2 <= distance * distance)
    }
}

/// Which sessions a broadcast reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BroadcastScope {
    /// Every connected session.
    #[default]
    All,
    /// Sessions in any dimension of one world.
    World(WorldId),
    /// Sessions in one dimension.
    Dimension(DimensionId),
}

impl BroadcastScope {
    /// Whether a session at `position` falls inside this scope.
    ///
    /// A session with no known position only matches [`BroadcastScope::All`].
    #[must_use]
    pub fn contains(&self, position: Option<&Position>) -> bool {
        match (self, position) {
            (BroadcastScope::All, _) => true,
            (BroadcastScope::World(world), Some(p)) => p.dimension.world == *world,
            (BroadcastScope::Dimension(dim), Some(p)) => p.dimension == *dim,
            (_, None) => false,
        }
    }
}
