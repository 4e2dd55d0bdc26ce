//! `sim`: AI-only games with every round written as a JSONL record.
//!
//! Game `g` (0-based) uses seed `base + g`, and seat `s` of that game gets a
//! provider seeded with `base + g + s`, so a base seed reproduces the whole
//! run. Output files ending in `.zst` are zstd-compressed.

use super::resolve_config;
use crate::error::CliError;
use crate::io_utils::create_output;
use crate::ui;
use besigue_ai::autoplay::run_game;
use besigue_ai::pacing::Pacer;
use besigue_ai::{DecisionProvider, create_provider};
use besigue_engine::engine::Engine;
use besigue_engine::logger::RoundLogger;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SimOptions {
    pub games: u32,
    pub players: Option<usize>,
    pub seed: Option<u64>,
    pub output: Option<String>,
    pub ai: Option<String>,
    pub max_rounds: u32,
    pub winning_score: Option<i32>,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            games: 1,
            players: None,
            seed: None,
            output: None,
            ai: None,
            max_rounds: 200,
            winning_score: None,
        }
    }
}

pub fn handle_sim_command(
    opts: SimOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if opts.games == 0 {
        ui::write_error(err, "games must be >= 1")?;
        return Err(CliError::InvalidInput("games must be >= 1".to_string()));
    }
    if opts.max_rounds == 0 {
        ui::write_error(err, "max-rounds must be >= 1")?;
        return Err(CliError::InvalidInput("max-rounds must be >= 1".to_string()));
    }

    let cfg = resolve_config(opts.players, opts.seed, opts.winning_score)?;
    let ai_kind = opts.ai.unwrap_or_else(|| cfg.ai.clone());
    let base_seed = cfg.seed.unwrap_or_else(rand::random);

    let mut logger = match opts.output.as_deref() {
        Some(path) => match create_output(Path::new(path)) {
            Ok(w) => Some(RoundLogger::with_writer(w)),
            Err(e) => {
                ui::write_error(err, &e)?;
                return Err(CliError::Io(std::io::Error::other(e)));
            }
        },
        None => None,
    };

    writeln!(
        out,
        "sim: games={} players={} ai={} seed={}",
        opts.games, cfg.players, ai_kind, base_seed
    )?;

    let mut wins = vec![0u32; cfg.players];
    let mut rounds_total = 0usize;
    let mut unfinished = 0u32;

    for g in 0..opts.games {
        let seed = base_seed.wrapping_add(g as u64);
        let providers = (0..cfg.players)
            .map(|seat| create_provider(&ai_kind, Some(seed.wrapping_add(seat as u64))))
            .collect::<Result<Vec<Box<dyn DecisionProvider>>, _>>()?;
        let seats: Vec<&dyn DecisionProvider> = providers.iter().map(|p| p.as_ref()).collect();

        let mut eng = Engine::with_ai_players(cfg.rules.clone(), cfg.players, Some(seed))?;
        let summary = run_game(&mut eng, &seats, &Pacer::immediate(), opts.max_rounds)?;

        if let Some(log) = logger.as_mut() {
            for rec in &summary.rounds {
                let mut rec = rec.clone();
                rec.meta = Some(serde_json::json!({ "game": g + 1, "ai": ai_kind }));
                log.write(&rec)?;
            }
        }
        rounds_total += summary.rounds.len();

        match summary.standings.first() {
            Some(top) if summary.completed => {
                wins[top.player] += 1;
                writeln!(
                    out,
                    "Game {}: seed={} rounds={} winner={} ({})",
                    g + 1,
                    seed,
                    summary.rounds.len(),
                    eng.players()[top.player].name(),
                    top.total
                )?;
            }
            _ => {
                unfinished += 1;
                ui::display_warning(
                    err,
                    &format!(
                        "game {} (seed {}) stopped after {} rounds without a winner",
                        g + 1,
                        seed,
                        summary.rounds.len()
                    ),
                )?;
            }
        }
        tracing::info!(game = g + 1, seed, rounds = summary.rounds.len(), "game simulated");
    }

    writeln!(out, "Simulated: {} games, {} rounds", opts.games, rounds_total)?;
    let tally: Vec<String> = wins
        .iter()
        .enumerate()
        .map(|(i, w)| format!("P{}={}", i + 1, w))
        .collect();
    writeln!(out, "Wins: {}", tally.join(" "))?;
    if unfinished > 0 {
        writeln!(out, "Unfinished: {}", unfinished)?;
    }
    Ok(())
}
