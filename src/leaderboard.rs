// src/leaderboard.rs
// Ranking and text tables for player statistics.

use std::fmt::Write as _;

use crate::player::PlayerRecord;

fn win_rate(record: &PlayerRecord) -> f64 {
    record.stats().win_rate()
}

/// Players by win rate, best first. Ties keep their stored order.
pub fn rank(records: &[PlayerRecord]) -> Vec<&PlayerRecord> {
    let mut ranked: Vec<&PlayerRecord> = records.iter().collect();
    ranked.sort_by(|a, b| win_rate(b).total_cmp(&win_rate(a)));
    ranked
}

pub fn render(records: &[PlayerRecord]) -> String {
    let mut out = String::from("=== Leaderboard ===\n");
    if records.is_empty() {
        out.push_str("No records found.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<10}{:<20}{:<15}{:<10}Win Rate (%)",
        "Rank", "Name", "Games Played", "Wins"
    );
    let _ = writeln!(out, "{}", "-".repeat(65));
    for (position, record) in rank(records).into_iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<10}{:<20}{:<15}{:<10}{:.2}",
            position + 1,
            record.username,
            record.game_count,
            record.win_count,
            win_rate(record)
        );
    }
    out
}

/// Statistics block for a single player.
pub fn render_record(record: &PlayerRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Bingo Game Statistics for {}:", record.username);
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(out, "Total Games Completed: {}", record.game_count);
    let _ = writeln!(out, "Victories: {}", record.win_count);
    let _ = writeln!(out, "Losses: {}", record.lose_count);
    let _ = writeln!(out, "Win Rate: {:.1}%", win_rate(record));
    out
}
