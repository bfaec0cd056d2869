// src/terminal.rs
// This module handles terminal input/output for the Bingo game: the sign-in flow,
// the main menu and the per-turn prompts.

use std::io::{self, BufRead, Write};

use chrono::Local;
use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use tracing::{error, info, warn};

use crate::accounts;
use crate::board::Board;
use crate::defs::{FIRSTNUMBER, LASTNUMBER, MARKED_DISPLAY};
use crate::error::{GameError, GameResult};
use crate::game::{Game, TurnDriver, TurnOutcome};
use crate::leaderboard;
use crate::player::{Identity, Player};
use crate::record::GameRecord;
use crate::store::{GameRegistry, PlayerStore};

/// Board text with called cells in bold yellow.
pub fn paint_board(board: &Board) -> GameResult<String> {
    board.render_with(&format!("\x1b[1;33m{MARKED_DISPLAY:>3}\x1b[0m")) // Bold yellow for marked numbers
}

/// Line-based console. Remembers when input has run out so callers can wind down.
pub struct Console<R, W> {
    input: R,
    out: W,
    at_eof: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            at_eof: false,
        }
    }

    pub fn at_eof(&self) -> bool {
        self.at_eof
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Next line without its surrounding whitespace, `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.at_eof = true;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        self.read_line()
    }

    pub fn pause(&mut self) -> io::Result<()> {
        self.prompt("\nPress Enter to continue...")?;
        Ok(())
    }

    pub fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        writeln!(self.out, "Current Time: {}", Local::now().format("%a %b %e %H:%M:%S %Y"))?;
        Ok(())
    }

    fn show_board(&mut self, player: &Player) -> io::Result<()> {
        let painted = paint_board(player.board()).map_err(io::Error::other)?;
        write!(self.out, "{painted}")
    }

    fn ask_number(&mut self, game: &Game) -> io::Result<Option<String>> {
        let Some(player) = game.current_player() else {
            return Ok(None);
        };
        self.clear()?;
        writeln!(self.out, "{}'s turn.", player.username())?;
        writeln!(self.out, "Your board:")?;
        self.show_board(player)?;
        let called: Vec<String> = game.called().called().map(|n| n.to_string()).collect();
        if !called.is_empty() {
            writeln!(self.out, "\nCalled so far: {}", called.join(" "))?;
        }
        self.prompt(&format!("\nEnter a number ({FIRSTNUMBER}-{LASTNUMBER}) or 'Q' to quit: "))
    }

    fn report(&mut self, game: &Game, outcome: &TurnOutcome) -> io::Result<()> {
        match outcome {
            TurnOutcome::Quit => {
                writeln!(self.out, "\nGame {} stopped.", game.id())?;
            }
            TurnOutcome::NotANumber(_) => {
                writeln!(
                    self.out,
                    "Invalid input. Please enter a number between {FIRSTNUMBER}-{LASTNUMBER} or 'Q' to quit."
                )?;
            }
            TurnOutcome::OutOfRange(_) => {
                writeln!(
                    self.out,
                    "Invalid number. Please choose a number between {FIRSTNUMBER} and {LASTNUMBER}."
                )?;
            }
            TurnOutcome::AlreadyCalled(number) => {
                writeln!(self.out, "Number {number} was already used. Try another number.")?;
            }
            TurnOutcome::Called { number, next_turn } => {
                let players = game.players();
                let caller = (next_turn + players.len() - 1) % players.len();
                writeln!(
                    self.out,
                    "{}'s board after marking {number}:",
                    players[caller].username()
                )?;
                self.show_board(&players[caller])?;
                self.pause()?;
            }
            TurnOutcome::Won {
                number,
                winner,
                persisted,
            } => {
                let players = game.players();
                writeln!(self.out, "\nNumber {number} completes the board.")?;
                writeln!(self.out, "{} wins!", players[*winner].username())?;
                writeln!(self.out, "\nFinal boards:")?;
                for player in players {
                    writeln!(self.out, "\n{}'s board:", player.username())?;
                    self.show_board(player)?;
                }
                if *persisted {
                    writeln!(self.out, "\nPlayer data updated.")?;
                } else {
                    writeln!(self.out, "\nError: Could not save player data.")?;
                }
                self.prompt("\nGame over. Press Enter to continue...")?;
            }
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> TurnDriver for Console<R, W> {
    fn next_input(&mut self, game: &Game) -> Option<String> {
        self.ask_number(game)
            .inspect_err(|e| error!("Console read failed: {e}"))
            .ok()
            .flatten()
    }

    fn on_outcome(&mut self, game: &Game, outcome: &TurnOutcome) {
        if let Err(e) = self.report(game, outcome) {
            error!("Console write failed: {e}");
        }
    }
}

/// One interactive session: two signed-in players and the main menu.
pub struct Shell<R, W, S> {
    console: Console<R, W>,
    store: S,
    players: Vec<Player>,
}

impl<R, W, S> Shell<R, W, S>
where
    R: BufRead,
    W: Write,
    S: GameRegistry + PlayerStore,
{
    pub fn new(input: R, out: W, store: S) -> Self {
        Self {
            console: Console::new(input, out),
            store,
            players: Vec::new(),
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn into_parts(self) -> (W, S) {
        (self.console.into_output(), self.store)
    }

    /// Sign in both players, then serve the menu until Exit or end of input.
    pub fn run(&mut self) -> GameResult<()> {
        self.console.clear()?;
        writeln!(self.console.out, "===== BINGO =====")?;

        let Some(first) = self.authenticate(1, None)? else {
            return self.goodbye();
        };
        let Some(second) = self.authenticate(2, Some(first.username()))? else {
            return self.goodbye();
        };
        info!("Session players: {} and {}", first.username(), second.username());
        self.players = vec![first, second];

        loop {
            self.console.clear()?;
            writeln!(self.console.out, "\n=== Bingo Game Menu ===")?;
            writeln!(self.console.out, "1. View Rules")?;
            writeln!(self.console.out, "2. Start Game")?;
            writeln!(self.console.out, "3. Load Saved Game")?;
            writeln!(self.console.out, "4. Search Record")?;
            writeln!(self.console.out, "5. View Leaderboard")?;
            writeln!(self.console.out, "6. Exit")?;
            let Some(choice) = self.console.prompt("Choose (1-6): ")? else {
                return self.goodbye();
            };

            let result = match choice.as_str() {
                "1" => self.show_rules(),
                "2" => self.start_game(),
                "3" => self.load_game(),
                "4" => self.search_record(),
                "5" => self.show_leaderboard(),
                "6" => return self.goodbye(),
                _ => {
                    writeln!(self.console.out, "Please enter a number between 1 and 6.")?;
                    self.console.pause().map_err(GameError::from)
                }
            };
            if let Err(e) = result {
                error!("Menu action {choice} failed: {e}");
                writeln!(self.console.out, "Error: {e}")?;
            }
            if self.console.at_eof() {
                return self.goodbye();
            }
        }
    }

    fn goodbye(&mut self) -> GameResult<()> {
        writeln!(self.console.out, "\nThank you for playing! Goodbye!")?;
        self.console.out.flush()?;
        Ok(())
    }

    fn read_credentials(&mut self, title: &str) -> GameResult<Option<(String, String)>> {
        writeln!(self.console.out, "===== {title} =====")?;
        let Some(username) = self.console.prompt("Name : ")? else {
            return Ok(None);
        };
        let Some(password) = self.console.prompt("Password : ")? else {
            return Ok(None);
        };
        Ok(Some((username, password)))
    }

    /// Sign in or sign up the player for `slot`. `taken` is the name already seated.
    fn authenticate(&mut self, slot: usize, taken: Option<&str>) -> GameResult<Option<Player>> {
        loop {
            writeln!(self.console.out, "Player {slot} : ")?;
            writeln!(self.console.out, "1. SignIn")?;
            writeln!(self.console.out, "2. SignUp")?;
            let Some(choice) = self.console.prompt("Choose (1-2): ")? else {
                return Ok(None);
            };

            let attempt = match choice.as_str() {
                "1" => {
                    let Some((username, password)) = self.read_credentials("SignIn")? else {
                        return Ok(None);
                    };
                    accounts::sign_in(&self.store, &username, &password)
                }
                "2" => {
                    let Some((username, password)) = self.read_credentials("SignUp")? else {
                        return Ok(None);
                    };
                    accounts::sign_up(&mut self.store, &username, &password)
                }
                _ => {
                    writeln!(self.console.out, "Invalid choice input! Please enter again.")?;
                    continue;
                }
            };

            match attempt {
                Ok(player) if taken == Some(player.username()) => {
                    writeln!(
                        self.console.out,
                        "This account already signed in as Player 1. Please sign in with another account."
                    )?;
                }
                Ok(player) => {
                    writeln!(self.console.out, "Player {slot} : {} is ready!!", player.username())?;
                    return Ok(Some(player));
                }
                Err(GameError::InvalidCredentials) => {
                    writeln!(self.console.out, "Invalid username or password!")?;
                }
                Err(GameError::AccountExists(name)) => {
                    writeln!(self.console.out, "Username {name} is already taken.")?;
                }
                Err(GameError::InvalidField(field)) => {
                    writeln!(self.console.out, "The {field} must be non-empty without spaces.")?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn show_rules(&mut self) -> GameResult<()> {
        self.console.clear()?;
        let out = &mut self.console.out;
        writeln!(out, "\n=== Bingo Rules ===")?;
        writeln!(out, "1. You will get a 5x5 board with numbers {FIRSTNUMBER}-{LASTNUMBER}")?;
        writeln!(out, "2. Take turns picking numbers")?;
        writeln!(out, "3. Numbers get marked with {MARKED_DISPLAY} on both boards")?;
        writeln!(out, "4. Get 5 lines to win (rows/columns/diagonals)")?;
        writeln!(out, "5. Can't see other player's board")?;
        writeln!(out, "6. Enter {FIRSTNUMBER}-{LASTNUMBER} to play or Q to quit")?;
        self.console.prompt("\nHit Enter to back game menu...")?;
        Ok(())
    }

    fn start_game(&mut self) -> GameResult<()> {
        let mut game = Game::create(&self.store)?;
        game.start(&self.players)?;

        self.console.clear()?;
        writeln!(self.console.out, "\n=== Game Starting ===")?;
        writeln!(self.console.out, "{}", "=".repeat(30))?;
        for (index, player) in game.players().iter().enumerate() {
            writeln!(self.console.out, "Player {}: {}", index + 1, player.username())?;
        }
        if self.console.prompt("\nPress Enter to start the game...")?.is_none() {
            return Ok(());
        }
        self.play(game)
    }

    /// Run the game to its end, offer to save it after a quit and take the players back.
    fn play(&mut self, mut game: Game) -> GameResult<()> {
        let outcome = game.continue_until_over(&mut self.console, &mut self.store)?;

        if outcome == TurnOutcome::Quit && !self.console.at_eof() {
            let answer = self.console.prompt("Do you want to save the game state? (Y/N): ")?;
            if answer.is_some_and(|answer| answer.eq_ignore_ascii_case("y")) {
                match game.save(&mut self.store) {
                    Ok(()) => writeln!(self.console.out, "Game saved successfully in room: {}", game.id())?,
                    Err(e) => {
                        warn!("Save of {} refused: {e}", game.id());
                        writeln!(self.console.out, "Error: Could not save game state.")?;
                    }
                }
            }
        }

        self.players = game.into_players();
        Ok(())
    }

    fn load_game(&mut self) -> GameResult<()> {
        let names: Vec<String> = self.players.iter().map(|p| p.username().to_string()).collect();
        let saved: Vec<GameRecord> = self
            .store
            .load_all()?
            .into_iter()
            .filter(|record| !record.is_finished() && record.is_between(&names[0], &names[1]))
            .collect();

        self.console.clear()?;
        writeln!(self.console.out, "\n=== Load Game ===")?;
        if saved.is_empty() {
            writeln!(self.console.out, "\nNo saved games found.")?;
            self.console.pause()?;
            return Ok(());
        }

        writeln!(self.console.out, "\nAvailable saved games:")?;
        writeln!(self.console.out, "{}", "=".repeat(50))?;
        writeln!(self.console.out, "{:<10}{:<20}", "Number", "Game ID")?;
        writeln!(self.console.out, "{}", "-".repeat(50))?;
        for (index, record) in saved.iter().enumerate() {
            writeln!(self.console.out, "{:<10}{:<20}", index + 1, record.id)?;
        }
        writeln!(self.console.out, "{}", "=".repeat(50))?;

        let Some(choice) = self
            .console
            .prompt("\nEnter Number shown above to load (0 or other to cancel): ")?
        else {
            return Ok(());
        };
        let record = match choice.parse::<usize>() {
            Ok(0) => return Ok(()),
            Ok(n) if n <= saved.len() => &saved[n - 1],
            Ok(_) => {
                writeln!(self.console.out, "Please enter a number between 1 and {}.", saved.len())?;
                self.console.pause()?;
                return Ok(());
            }
            Err(_) => {
                writeln!(self.console.out, "Invalid input. Please enter a number from the list above.")?;
                self.console.pause()?;
                return Ok(());
            }
        };

        let game = Game::from_record(record, &self.players)?;
        info!("Game loaded: {}", game.game_info());
        writeln!(self.console.out, "Game {} loaded.", game.id())?;
        if self.console.prompt("\nPress Enter to start the game...")?.is_none() {
            return Ok(());
        }
        self.play(game)
    }

    fn search_record(&mut self) -> GameResult<()> {
        let records = self.store.load_players()?;
        self.console.clear()?;
        if records.is_empty() {
            writeln!(self.console.out, "No players found.")?;
            self.console.pause()?;
            return Ok(());
        }

        loop {
            writeln!(self.console.out, "\n=== Search Player Record ===")?;
            for (index, record) in records.iter().enumerate() {
                writeln!(self.console.out, "{}. {}", index + 1, record.username)?;
            }
            let Some(choice) = self.console.prompt("Enter Player Number: ")? else {
                return Ok(());
            };
            match choice.parse::<usize>() {
                Ok(n) if (1..=records.len()).contains(&n) => {
                    writeln!(self.console.out)?;
                    write!(self.console.out, "{}", leaderboard::render_record(&records[n - 1]))?;
                    self.console.pause()?;
                    return Ok(());
                }
                _ => writeln!(self.console.out, "Invalid input! Please enter again.")?,
            }
        }
    }

    fn show_leaderboard(&mut self) -> GameResult<()> {
        let records = self.store.load_players()?;
        self.console.clear()?;
        writeln!(self.console.out)?;
        write!(self.console.out, "{}", leaderboard::render(&records))?;
        self.console.pause()?;
        Ok(())
    }
}
