// src/game.rs
// This module provides the Game struct: the two players, the shared pouch of called numbers,
// the turn pointer and the win state. It validates and resolves one turn at a time.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Local};
use rand::Rng;
use tracing::{error, info, warn};

use crate::board::Board;
use crate::defs::{GAME_ID_PREFIX, Number, PLAYERS_PER_GAME, is_valid_number};
use crate::error::{GameError, GameResult};
use crate::player::{Identity, Player, PlayerRecord};
use crate::pouch::Pouch;
use crate::record::GameRecord;
use crate::store::{GameRegistry, PlayerStore};

pub const QUIT_INPUT: &str = "Q";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    InProgress,
    Over,
}

/// Result of one call to [`Game::play_turn`]. Only `Called` and `Won` consume the turn;
/// the input variants leave the game untouched so the same player is asked again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Quit,
    NotANumber(String),
    OutOfRange(i64),
    AlreadyCalled(Number),
    Called { number: Number, next_turn: usize },
    Won { number: Number, winner: usize, persisted: bool },
}

impl TurnOutcome {
    pub fn consumed_turn(&self) -> bool {
        matches!(self, TurnOutcome::Called { .. } | TurnOutcome::Won { .. })
    }
}

/// Supplies input to [`Game::continue_until_over`] and is told what each input did.
pub trait TurnDriver {
    /// Next input for the current player. `None` means no more input and quits the game.
    fn next_input(&mut self, game: &Game) -> Option<String>;

    fn on_outcome(&mut self, game: &Game, outcome: &TurnOutcome);
}

#[derive(Debug, Clone)]
pub struct Game {
    id: String,
    created_at: DateTime<Local>,
    players: Vec<Player>,
    pouch: Pouch,
    current_turn: usize,
    winner: Option<usize>,
    state: GameState,
    saved: bool,
}

impl Game {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            created_at: Local::now(),
            players: Vec::new(),
            pouch: Pouch::new(),
            current_turn: 0,
            winner: None,
            state: GameState::NotStarted,
            saved: false,
        }
    }

    /// A new game named after the first free `Game_N` in the registry.
    pub fn create<R: GameRegistry + ?Sized>(registry: &R) -> GameResult<Self> {
        Ok(Self::new(&registry.next_unused_id(GAME_ID_PREFIX)?))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn into_players(self) -> Vec<Player> {
        self.players
    }

    pub fn called(&self) -> &Pouch {
        &self.pouch
    }

    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_turn)
    }

    pub fn winner_index(&self) -> Option<usize> {
        self.winner
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.and_then(|index| self.players.get(index))
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == GameState::Over
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Get game information as a formatted string for logging
    pub fn game_info(&self) -> String {
        let names: Vec<&str> = self.players.iter().map(Identity::username).collect();
        format!(
            "Game[id={}, created={}, players={:?}, called={}, turn={}, state={:?}]",
            self.id,
            self.created_at.format("%Y-%m-%d %H:%M:%S"),
            names,
            self.pouch.len(),
            self.current_turn,
            self.state
        )
    }

    pub fn start(&mut self, players: &[Player]) -> GameResult<()> {
        self.start_with(players, &mut rand::rng())
    }

    /// Begin a match between exactly two distinct players, dealing each a fresh board.
    /// On error the game is left exactly as it was.
    pub fn start_with<R: Rng + ?Sized>(&mut self, players: &[Player], rng: &mut R) -> GameResult<()> {
        if players.len() != PLAYERS_PER_GAME {
            return Err(GameError::InvalidPlayerCount(players.len()));
        }
        let mut seen = HashSet::new();
        for player in players {
            if !seen.insert(player.username()) {
                return Err(GameError::DuplicatePlayer(player.username().to_string()));
            }
        }

        self.players = players.to_vec();
        for player in &mut self.players {
            player.board_mut().generate_with(rng);
        }
        self.pouch.clear();
        self.current_turn = 0;
        self.winner = None;
        self.saved = false;
        self.state = GameState::InProgress;

        info!("Game started: {}", self.game_info());
        Ok(())
    }

    /// Resolve one input from the current player.
    ///
    /// A valid number is marked on every board, not only the current player's, and every
    /// board is then checked in player order: the first one with five completed lines wins,
    /// whoever called the number. On a win both players' statistics are updated once, the
    /// player records are re-saved and any saved copy of this game is removed. A failure to
    /// persist is logged and reported as `persisted: false`; the game itself stays finished.
    pub fn play_turn<S>(&mut self, input: &str, store: &mut S) -> GameResult<TurnOutcome>
    where
        S: GameRegistry + PlayerStore + ?Sized,
    {
        if self.state != GameState::InProgress {
            return Err(GameError::NotInProgress(self.state));
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case(QUIT_INPUT) {
            self.state = GameState::Over;
            info!("Game {} quit before a winner", self.id);
            return Ok(TurnOutcome::Quit);
        }

        let value: i64 = match input.parse() {
            Ok(value) => value,
            Err(_) => return Ok(TurnOutcome::NotANumber(input.to_string())),
        };
        if !is_valid_number(value) {
            return Ok(TurnOutcome::OutOfRange(value));
        }
        let number = value as Number;
        if self.pouch.contains(number) {
            return Ok(TurnOutcome::AlreadyCalled(number));
        }

        for player in &mut self.players {
            player.mark_number(number)?;
        }
        self.pouch.call(number);

        let mut winner = None;
        for (index, player) in self.players.iter().enumerate() {
            if player.check_win()? {
                winner = Some(index);
                break;
            }
        }

        let Some(winner) = winner else {
            self.current_turn = (self.current_turn + 1) % self.players.len();
            return Ok(TurnOutcome::Called {
                number,
                next_turn: self.current_turn,
            });
        };

        self.winner = Some(winner);
        self.state = GameState::Over;
        for (index, player) in self.players.iter_mut().enumerate() {
            player.update_stats(index == winner);
        }
        info!(
            "Game {} won by {} on number {number}",
            self.id,
            self.players[winner].username()
        );

        let persisted = match self.persist_result(store) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to persist result of game {}: {e}", self.id);
                false
            }
        };
        Ok(TurnOutcome::Won {
            number,
            winner,
            persisted,
        })
    }

    fn persist_result<S>(&self, store: &mut S) -> GameResult<()>
    where
        S: GameRegistry + PlayerStore + ?Sized,
    {
        let records: Vec<PlayerRecord> = self.players.iter().map(Player::to_record).collect();
        store.upsert_players(&records)?;
        let id = self.id.clone();
        store.remove_where(&move |record: &GameRecord| record.id == id)?;
        Ok(())
    }

    /// Keep asking the driver for input until the game is over. Returns the last outcome.
    pub fn continue_until_over<D, S>(&mut self, driver: &mut D, store: &mut S) -> GameResult<TurnOutcome>
    where
        D: TurnDriver + ?Sized,
        S: GameRegistry + PlayerStore + ?Sized,
    {
        if self.state != GameState::InProgress {
            return Err(GameError::NotInProgress(self.state));
        }
        loop {
            let input = driver
                .next_input(self)
                .unwrap_or_else(|| QUIT_INPUT.to_string());
            let outcome = self.play_turn(&input, store)?;
            driver.on_outcome(self, &outcome);
            if self.is_over() {
                return Ok(outcome);
            }
        }
    }

    pub fn to_record(&self) -> GameResult<GameRecord> {
        let mut status = BTreeMap::new();
        for player in &self.players {
            status.insert(player.username().to_string(), player.board().serialize_state()?);
        }
        Ok(GameRecord {
            id: self.id.clone(),
            players: self
                .players
                .iter()
                .map(|player| player.username().to_string())
                .collect(),
            current_turn: self.current_turn,
            winner: self
                .winner()
                .map(|player| player.username().to_string())
                .unwrap_or_default(),
            status,
        })
    }

    /// Save an unfinished game so it can be resumed later.
    pub fn save<R: GameRegistry + ?Sized>(&mut self, registry: &mut R) -> GameResult<()> {
        if self.winner.is_some() {
            return Err(GameError::AlreadyFinished(self.id.clone()));
        }
        if self.players.is_empty() {
            return Err(GameError::NotInProgress(self.state));
        }
        let record = self.to_record()?;
        registry
            .save(&record)
            .inspect_err(|e| error!("Failed to save game {}: {e}", self.id))?;
        self.saved = true;
        info!("Game saved: {}", self.id);
        Ok(())
    }

    /// Rebuild a game from its record. `known` supplies the accounts (with their current
    /// statistics) for the usernames in the record. The called numbers are the marked cells,
    /// which both boards must agree on since every call marks both.
    pub fn from_record(record: &GameRecord, known: &[Player]) -> GameResult<Self> {
        let invalid = |reason: String| GameError::InvalidRecord {
            id: record.id.clone(),
            reason,
        };

        if record.players.len() != PLAYERS_PER_GAME {
            return Err(invalid(format!("expected {PLAYERS_PER_GAME} players, found {}", record.players.len())));
        }
        if record.current_turn >= PLAYERS_PER_GAME {
            return Err(invalid(format!("current turn {} out of range", record.current_turn)));
        }
        let mut seen = HashSet::new();
        for username in &record.players {
            if !seen.insert(username.as_str()) {
                return Err(GameError::DuplicatePlayer(username.clone()));
            }
        }

        let mut players = Vec::with_capacity(PLAYERS_PER_GAME);
        for username in &record.players {
            let mut player = known
                .iter()
                .find(|player| player.username() == username)
                .cloned()
                .ok_or_else(|| GameError::UnknownPlayer(username.clone()))?;
            let state = record
                .status
                .get(username)
                .ok_or_else(|| invalid(format!("no board for {username}")))?;
            player.set_board(Board::from_state(state)?);
            players.push(player);
        }

        let called = players[0].board().called_numbers();
        if players.iter().any(|player| player.board().called_numbers() != called) {
            return Err(invalid("boards disagree on the called numbers".to_string()));
        }

        let winner = if record.winner.is_empty() {
            None
        } else {
            let index = players
                .iter()
                .position(|player| player.username() == record.winner)
                .ok_or_else(|| invalid(format!("winner {} is not a player", record.winner)))?;
            Some(index)
        };
        if winner.is_some() {
            warn!("Loaded finished game {}", record.id);
        }

        Ok(Self {
            id: record.id.clone(),
            created_at: Local::now(),
            players,
            pouch: Pouch::from_called(called),
            current_turn: record.current_turn,
            winner,
            state: if winner.is_some() {
                GameState::Over
            } else {
                GameState::InProgress
            },
            saved: true,
        })
    }
}
