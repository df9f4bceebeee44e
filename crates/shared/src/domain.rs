use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Opaque game token assigned by the remote authority.
///
/// The authority may encode it as a JSON string or integer; both decode to the
/// same textual token, which is echoed back verbatim in request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GameId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawGameId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        let raw = match RawGameId::deserialize(deserializer)? {
            RawGameId::Text(text) => text,
            RawGameId::Signed(n) => n.to_string(),
            RawGameId::Unsigned(n) => n.to_string(),
        };
        if raw.trim().is_empty() {
            return Err(de::Error::custom("game id must not be empty"));
        }
        Ok(Self(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("board size must be between {min} and {max}, got {requested}")]
pub struct BoardSizeError {
    pub requested: i64,
    pub min: u8,
    pub max: u8,
}

/// Side length of a square board, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BoardSize(u8);

impl BoardSize {
    pub const MIN: u8 = 3;
    pub const MAX: u8 = 10;

    pub fn new(requested: i64) -> Result<Self, BoardSizeError> {
        if requested < i64::from(Self::MIN) || requested > i64::from(Self::MAX) {
            return Err(BoardSizeError {
                requested,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(requested as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn side(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self(4)
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four slide directions understood by the remote authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    pub const ALL: [MoveDirection; 4] = [
        MoveDirection::Up,
        MoveDirection::Down,
        MoveDirection::Left,
        MoveDirection::Right,
    ];

    /// Wire spelling used in the `direction` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            MoveDirection::Up => "UP",
            MoveDirection::Down => "DOWN",
            MoveDirection::Left => "LEFT",
            MoveDirection::Right => "RIGHT",
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown move direction '{0}'")]
pub struct UnknownDirection(pub String);

impl FromStr for MoveDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveDirection::ALL
            .into_iter()
            .find(|direction| direction.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDirection(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardShapeError {
    #[error("board has no rows")]
    Empty,
    #[error("board row {row} has {actual} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("board side {side} is outside {min}..={max}")]
    SideOutOfRange { side: usize, min: u8, max: u8 },
}

/// Square matrix of tile values; 0 marks an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardSnapshot {
    rows: Vec<Vec<u32>>,
}

impl BoardSnapshot {
    pub fn try_from_rows(rows: Vec<Vec<u32>>) -> Result<Self, BoardShapeError> {
        if rows.is_empty() {
            return Err(BoardShapeError::Empty);
        }
        let side = rows.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != side) {
            return Err(BoardShapeError::NotSquare {
                row,
                expected: side,
                actual: cells.len(),
            });
        }
        if BoardSize::new(side as i64).is_err() {
            return Err(BoardShapeError::SideOutOfRange {
                side,
                min: BoardSize::MIN,
                max: BoardSize::MAX,
            });
        }
        Ok(Self { rows })
    }

    pub fn side(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }
}
