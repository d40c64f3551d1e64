use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Terrain {
    Flat = 0,
    Hilly = 1,
    Forest = 2,
    Blocked = 3,
}

impl Terrain {
    pub const ALL: [Terrain; 4] = [
        Terrain::Flat,
        Terrain::Hilly,
        Terrain::Forest,
        Terrain::Blocked,
    ];

    /// Terrains a passable cell can be generated with.
    pub const OPEN: [Terrain; 3] = [Terrain::Flat, Terrain::Hilly, Terrain::Forest];

    /// Permissive mapping used by the cell constructor: unknown codes become `Blocked`.
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Terrain::Flat,
            1 => Terrain::Hilly,
            2 => Terrain::Forest,
            _ => Terrain::Blocked,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Terrain::Flat),
            1 => Some(Terrain::Hilly),
            2 => Some(Terrain::Forest),
            3 => Some(Terrain::Blocked),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn is_passable(self) -> bool {
        !matches!(self, Terrain::Blocked)
    }

    /// Detection multiplier once the cell has been visited and its terrain is known.
    pub const fn visited_multiplier(self) -> f64 {
        match self {
            Terrain::Flat => 0.8,
            Terrain::Hilly => 0.5,
            Terrain::Forest => 0.2,
            Terrain::Blocked => 0.0,
        }
    }

    /// Chance that examining the target's cell still misses it.
    pub const fn false_negative_rate(self) -> f64 {
        match self {
            Terrain::Flat => 0.2,
            Terrain::Hilly => 0.5,
            Terrain::Forest => 0.8,
            Terrain::Blocked => 1.0,
        }
    }
}

impl TryFrom<i32> for Terrain {
    type Error = TerrainError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(Terrain::from_index)
            .ok_or(TerrainError::InvalidTerrainCode { code })
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Terrain::Flat => "flat",
            Terrain::Hilly => "hilly",
            Terrain::Forest => "forest",
            Terrain::Blocked => "blocked",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainError {
    InvalidTerrainCode { code: i32 },
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainError::InvalidTerrainCode { code } => {
                write!(f, "terrain code {code} is not one of 0, 1, 2 or 3")
            }
        }
    }
}

impl std::error::Error for TerrainError {}
