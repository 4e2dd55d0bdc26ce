//! `deal`: shows who deals and the opening hands for a seed.

use super::resolve_config;
use crate::error::CliError;
use crate::ui;
use besigue_engine::engine::Engine;
use std::io::Write;

pub fn handle_deal_command(
    seed: Option<u64>,
    players: Option<usize>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = resolve_config(players, seed, None)?;
    let seed = cfg.seed.unwrap_or_else(rand::random);
    let mut eng = Engine::with_ai_players(cfg.rules, cfg.players, Some(seed))?;
    eng.start_new_game()?;

    writeln!(out, "Seed: {}", seed)?;
    let dealer = eng
        .dealer()
        .ok_or_else(|| CliError::Engine("no dealer after the deal".into()))?;
    writeln!(out, "Dealer: {}", eng.players()[dealer].name())?;
    writeln!(out, "Leader: {}", eng.players()[eng.leader()].name())?;
    for p in eng.players() {
        writeln!(out, "Hand {}: {}", p.name(), ui::format_cards(p.held()))?;
    }
    writeln!(out, "Draw pile: {}", eng.draw_pile_len())?;
    Ok(())
}
