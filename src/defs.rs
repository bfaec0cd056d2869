// src/defs.rs
// Board geometry and game-wide constants.

pub type Number = u8;

pub const BOARD_SIZE: usize = 5;

pub const FIRSTNUMBER: Number = 1;
pub const LASTNUMBER: Number = (BOARD_SIZE * BOARD_SIZE) as Number - 1 + FIRSTNUMBER;

// 5 rows + 5 columns + 2 diagonals
pub const CANDIDATE_LINES: usize = 2 * BOARD_SIZE + 2;

// Completed lines needed to call bingo
pub const WINNING_LINES: usize = 5;

pub const PLAYERS_PER_GAME: usize = 2;

pub const GAME_ID_PREFIX: &str = "Game_";

// Persisted marker for a called cell, and its on-screen counterpart
pub const MARKED_STATE: &str = "x";
pub const MARKED_DISPLAY: &str = "X";

pub fn is_valid_number(value: i64) -> bool {
    (FIRSTNUMBER as i64..=LASTNUMBER as i64).contains(&value)
}
