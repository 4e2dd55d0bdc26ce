//! # Bésigue CLI Library
//!
//! Command-line front end for the Bésigue rules engine. The binary is a thin
//! wrapper around [`run`], which parses arguments and dispatches to one
//! handler per subcommand, writing to the streams it is given.
//!
//! ## Available Subcommands
//!
//! - `play`: Play at the terminal against AI seats, or watch AI seats play
//! - `sim`: Run AI-only games and record every round as JSONL
//! - `stats`: Aggregate statistics from round records
//! - `deal`: Show the dealer and opening hands for a seed
//! - `cfg`: Display the resolved configuration
//! - `rng`: Sample the seeded ChaCha20 stream
//!
//! ## Exit Codes
//!
//! `0` on success, `2` on any error, `130` when an interactive game is quit.

use clap::Parser;
use std::io::Write;

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod io_utils;
pub mod logging;
mod macros;
pub mod ui;

use cli::{BesigueCli, Commands};
use commands::{
    handle_cfg_command, handle_deal_command, handle_play_command, handle_rng_command,
    handle_sim_command, handle_stats_command,
};

pub use cli::Vs;
pub use commands::{PlayOptions, SimOptions};
pub use error::{BatchValidationError, CliError};

const COMMANDS: &[&str] = &["play", "sim", "stats", "deal", "cfg", "rng"];

/// Parses `args` and runs the selected command, returning the exit code.
///
/// Help and version go to `out` with code `0`; argument errors print the
/// command list to `err` with code `2`.
///
/// # Example
///
/// ```
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let code = besigue_cli::run(["besigue", "rng", "--seed", "42"], &mut out, &mut err);
/// assert_eq!(code, 0);
/// assert!(String::from_utf8(out).unwrap().starts_with("RNG sample:"));
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match BesigueCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    write_or_exit!(err, "{}", e);
                    write_or_exit!(err, "Bésigue CLI");
                    write_or_exit!(err, "Usage: besigue <command> [options]\n");
                    write_or_exit!(err, "Commands:");
                    for c in COMMANDS {
                        write_or_exit!(err, "  {}", c);
                    }
                    write_or_exit!(err, "\nFor full help, run: besigue --help");
                    exit_code::ERROR
                }
            };
        }
    };

    match cli.cmd {
        Commands::Cfg => exit_code_for!(err, handle_cfg_command(out)),
        Commands::Rng { seed } => exit_code_for!(err, handle_rng_command(seed, out)),
        Commands::Deal { seed, players } => {
            exit_code_for!(err, handle_deal_command(seed, players, out))
        }
        Commands::Stats { input } => exit_code_for!(err, handle_stats_command(&input, out, err)),
        Commands::Sim {
            games,
            players,
            seed,
            output,
            ai,
            max_rounds,
            winning_score,
        } => {
            let opts = SimOptions {
                games,
                players,
                seed,
                output,
                ai,
                max_rounds,
                winning_score,
            };
            exit_code_for!(err, handle_sim_command(opts, out, err))
        }
        Commands::Play {
            vs,
            players,
            seed,
            delay_ms,
            winning_score,
        } => {
            let opts = PlayOptions {
                vs,
                players,
                seed,
                delay_ms,
                winning_score,
            };
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            exit_code_for!(err, handle_play_command(opts, out, err, &mut stdin_lock))
        }
    }
}
