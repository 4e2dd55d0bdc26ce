//! Command-line argument definitions.
//!
//! Flags left unset fall back to the resolved configuration (see
//! [`crate::config`]), so every command can run with no arguments at all.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "besigue",
    version,
    about = "Bésigue rules engine CLI: play, simulate and inspect games"
)]
pub struct BesigueCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a game at the terminal against AI seats, or watch AI seats play
    Play {
        #[arg(long, value_enum, default_value_t = Vs::Ai)]
        vs: Vs,
        /// Number of seats (2-4)
        #[arg(long)]
        players: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Delay before each AI decision, in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        /// Total that ends the game
        #[arg(long)]
        winning_score: Option<i32>,
    },
    /// Run AI-only games and record every round as JSONL
    Sim {
        #[arg(long, default_value_t = 1)]
        games: u32,
        #[arg(long)]
        players: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Output file (`.jsonl` or `.jsonl.zst`)
        #[arg(long)]
        output: Option<String>,
        /// AI type for every seat
        #[arg(long)]
        ai: Option<String>,
        /// Abort a game that has not finished after this many rounds
        #[arg(long, default_value_t = 200)]
        max_rounds: u32,
        /// Total that ends each game
        #[arg(long)]
        winning_score: Option<i32>,
    },
    /// Aggregate statistics from round records
    Stats {
        /// JSONL file, JSONL.zst file or directory of them
        #[arg(long)]
        input: String,
    },
    /// Show the dealer and the opening hands for a seed
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        players: Option<usize>,
    },
    /// Print the resolved configuration and where each value came from
    Cfg,
    /// Print a sample of the seeded ChaCha20 stream
    Rng {
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Who fills the seats other than yours in `play`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Vs {
    /// Seat 0 is yours; the others are AI.
    Human,
    /// Every seat is AI; the game is printed as it is played.
    Ai,
}

impl Vs {
    /// # Examples
    ///
    /// ```
    /// # use besigue_cli::Vs;
    /// assert_eq!(Vs::Ai.as_str(), "ai");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Vs::Human => "human",
            Vs::Ai => "ai",
        }
    }
}
