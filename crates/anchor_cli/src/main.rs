//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `anchor_core` linkage.
//! - Print today's board when `ANCHOR_DB_PATH` points at a database.

use anchor_core::db::open_db;
use anchor_core::{sqlite_service, ChangeFeed, NormalizedDay};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    println!("anchor_core ping={}", anchor_core::ping());
    println!("anchor_core version={}", anchor_core::core_version());

    let Some(db_path) = std::env::var("ANCHOR_DB_PATH")
        .ok()
        .filter(|raw| !raw.trim().is_empty())
    else {
        return ExitCode::SUCCESS;
    };

    match print_board(db_path.trim()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("anchor_cli board failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_board(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let service = sqlite_service(&conn, Arc::new(ChangeFeed::new()));
    let board = service.today_board(NormalizedDay::today())?;

    println!(
        "day={} items={} completed={}",
        board.day,
        board.cards.len(),
        board.completed_count()
    );
    for card in &board.cards {
        println!(
            "[{}] {} ({}, {}/{})",
            if card.is_completed { "x" } else { " " },
            card.item.title,
            card.item.category.display_name(),
            card.record.as_ref().map_or(0, |record| record.count),
            card.item.target_count
        );
    }
    Ok(())
}
