use serde::{Deserialize, Serialize};

use crate::domain::{BoardSize, GameId, MoveDirection};

/// Full game representation returned by create, move and fetch calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateResponse {
    pub id: GameId,
    pub board: Vec<Vec<u32>>,
    pub score: u64,
    pub game_over: bool,
    #[serde(default)]
    pub won: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameQuery {
    pub board_size: u8,
}

impl From<BoardSize> for CreateGameQuery {
    fn from(size: BoardSize) -> Self {
        Self {
            board_size: size.get(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveQuery {
    pub direction: MoveDirection,
}
