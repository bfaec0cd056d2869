// src/record.rs
// Persisted form of a game, as stored in the game registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::BoardState;

/// One saved game. `winner` is empty while the game is unfinished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Players")]
    pub players: Vec<String>,
    #[serde(rename = "CurrentTurn")]
    pub current_turn: usize,
    #[serde(rename = "Winner", default)]
    pub winner: String,
    #[serde(rename = "Status")]
    pub status: BTreeMap<String, BoardState>,
}

impl GameRecord {
    pub fn is_finished(&self) -> bool {
        !self.winner.is_empty()
    }

    /// True if the record was played by exactly these players, in this order.
    pub fn is_between(&self, first: &str, second: &str) -> bool {
        matches!(self.players.as_slice(), [a, b] if a == first && b == second)
    }
}
