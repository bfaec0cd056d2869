// src/accounts.rs
// Sign-up and sign-in against the player store.

use tracing::info;

use crate::error::{GameError, GameResult};
use crate::player::{Account, Player};
use crate::store::PlayerStore;

fn validate(value: &str, field: &'static str) -> GameResult<()> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(GameError::InvalidField(field));
    }
    Ok(())
}

/// Register a new account with zeroed statistics.
pub fn sign_up<S: PlayerStore + ?Sized>(store: &mut S, username: &str, password: &str) -> GameResult<Player> {
    validate(username, "username")?;
    validate(password, "password")?;
    if store.find_player(username)?.is_some() {
        return Err(GameError::AccountExists(username.to_string()));
    }

    let player = Player::new(Account::new(username, password));
    store.add_player(player.to_record())?;
    info!("Account created: {username}");
    Ok(player)
}

/// Load the stored player, statistics included, if the credentials match.
pub fn sign_in<S: PlayerStore + ?Sized>(store: &S, username: &str, password: &str) -> GameResult<Player> {
    match store.find_player(username)? {
        Some(record) if record.password == password => {
            info!("Signed in: {username}");
            Ok(Player::from_record(&record))
        }
        _ => {
            info!("Sign-in refused for {username}");
            Err(GameError::InvalidCredentials)
        }
    }
}
