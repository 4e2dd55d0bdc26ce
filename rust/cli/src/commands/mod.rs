//! Command handlers, one module per subcommand.
//!
//! Each module exposes `handle_<command>_command(...) -> Result<(), CliError>`
//! taking its output streams as `&mut dyn Write`, so tests can capture them.

mod cfg;
mod deal;
mod play;
mod rng;
mod sim;
mod stats;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use play::{PlayOptions, handle_play_command};
pub use rng::handle_rng_command;
pub use sim::{SimOptions, handle_sim_command};
pub use stats::handle_stats_command;

use crate::config::{self, Config};
use crate::error::CliError;
use besigue_engine::rules::RulesConfig;

/// Loads the layered configuration and applies the command-line overrides.
fn resolve_config(
    players: Option<usize>,
    seed: Option<u64>,
    winning_score: Option<i32>,
) -> Result<Config, CliError> {
    let mut cfg = config::load()?;
    if let Some(score) = winning_score {
        cfg.rules.winning_score = score;
        cfg.rules.validate()?;
    }
    if let Some(n) = players {
        RulesConfig::check_player_count(n)?;
        cfg.players = n;
    }
    if seed.is_some() {
        cfg.seed = seed;
    }
    Ok(cfg)
}
