// lib.rs
// Library modules for the bingo game

pub mod defs;
pub mod error;
pub mod board;
pub mod pouch;
pub mod player;
pub mod record;
pub mod store;
pub mod game;
pub mod accounts;
pub mod leaderboard;
pub mod config;
pub mod logging;
pub mod terminal;
