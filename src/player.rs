// src/player.rs
// Player identity, cumulative statistics and the board each player owns during a game.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::defs::Number;
use crate::error::GameResult;

/// Anything that can be matched against a stored account by username.
pub trait Identity {
    fn username(&self) -> &str;

    fn same_identity(&self, other: &impl Identity) -> bool {
        self.username() == other.username()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
}

impl Account {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl Identity for Account {
    fn username(&self) -> &str {
        &self.username
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerStats {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
}

impl PlayerStats {
    /// Percentage of games won, 0 before the first game.
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.games_played) * 100.0
        }
    }

    pub fn record_game(&mut self, won: bool) {
        self.games_played += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

/// Stored form of a player, one entry of the account file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub username: String,
    pub password: String,
    pub game_count: u32,
    pub win_count: u32,
    pub lose_count: u32,
    pub win_rate: f64,
}

impl PlayerRecord {
    /// Counters from the record. The stored win rate is derived data and is not read.
    pub fn stats(&self) -> PlayerStats {
        PlayerStats {
            games_played: self.game_count,
            wins: self.win_count,
            losses: self.lose_count,
        }
    }
}

impl Identity for PlayerRecord {
    fn username(&self) -> &str {
        &self.username
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    account: Account,
    stats: PlayerStats,
    board: Board,
}

impl Player {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            stats: PlayerStats::default(),
            board: Board::new(),
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn win_rate(&self) -> f64 {
        self.stats.win_rate()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn generate_board(&mut self) {
        self.board.generate();
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    /// Whether this player's board held `number`.
    pub fn mark_number(&mut self, number: Number) -> GameResult<bool> {
        self.board.mark(number)
    }

    pub fn check_win(&self) -> GameResult<bool> {
        Ok(self.board.has_bingo()?.1)
    }

    /// Count one finished game. Must be called exactly once per game and player.
    pub fn update_stats(&mut self, won: bool) {
        self.stats.record_game(won);
    }

    pub fn to_record(&self) -> PlayerRecord {
        PlayerRecord {
            username: self.account.username.clone(),
            password: self.account.password.clone(),
            game_count: self.stats.games_played,
            win_count: self.stats.wins,
            lose_count: self.stats.losses,
            win_rate: self.stats.win_rate(),
        }
    }

    pub fn from_record(record: &PlayerRecord) -> Self {
        Self {
            account: Account::new(&record.username, &record.password),
            stats: record.stats(),
            board: Board::new(),
        }
    }
}

impl Identity for Player {
    fn username(&self) -> &str {
        &self.account.username
    }
}
