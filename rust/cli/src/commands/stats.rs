//! `stats`: aggregates round records from JSONL files.
//!
//! Accepts a `.jsonl` / `.jsonl.zst` file or a directory searched
//! recursively. Reports rounds, finished games, wins per seat, average meld
//! points per round and the number of unusable lines. A final line without a
//! trailing newline that fails to parse counts as incomplete rather than
//! corrupted (a writer may still be appending to it).

use crate::error::{BatchValidationError, CliError};
use crate::io_utils::{find_record_files, read_text_auto};
use crate::ui;
use besigue_engine::logger::RoundRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Default, Serialize)]
struct StatsSummary {
    rounds: u64,
    games: u64,
    /// Keyed by `p<seat>`, seats counted from 0.
    wins: BTreeMap<String, u64>,
    avg_meld_points: f64,
    avg_round_score: BTreeMap<String, f64>,
    corrupted: u64,
    incomplete: u64,
}

#[derive(Default)]
struct StatsState {
    rounds: u64,
    games: u64,
    wins: BTreeMap<String, u64>,
    meld_points: i64,
    round_totals: BTreeMap<usize, (i64, u64)>,
    corrupted: u64,
    incomplete: u64,
}

impl StatsState {
    fn add(&mut self, rec: &RoundRecord) {
        self.rounds += 1;
        self.meld_points += rec.melds.iter().map(|m| m.points as i64).sum::<i64>();
        for s in &rec.scores {
            let e = self.round_totals.entry(s.player).or_default();
            e.0 += s.total as i64;
            e.1 += 1;
        }
        if let Some(winner) = &rec.result {
            self.games += 1;
            *self.wins.entry(winner.clone()).or_default() += 1;
        }
    }

    fn consume(
        &mut self,
        source: &str,
        content: &str,
        err: &mut dyn Write,
    ) -> Result<(), CliError> {
        let has_trailing_nl = content.ends_with('\n');
        let lines: Vec<(usize, &str)> = content
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .collect();
        for (i, &(lineno, line)) in lines.iter().enumerate() {
            match serde_json::from_str::<RoundRecord>(line) {
                Ok(rec) => self.add(&rec),
                Err(_) if i == lines.len() - 1 && !has_trailing_nl => self.incomplete += 1,
                Err(e) => {
                    self.corrupted += 1;
                    let failure = BatchValidationError {
                        item_context: format!("{}:{}", source, lineno + 1),
                        message: e.to_string(),
                    };
                    tracing::warn!(%failure, "corrupted round record");
                    ui::display_warning(err, &failure.to_string())?;
                }
            }
        }
        Ok(())
    }

    fn summary(self) -> StatsSummary {
        let avg = |sum: i64, n: u64| {
            if n == 0 {
                0.0
            } else {
                (sum as f64 / n as f64 * 100.0).round() / 100.0
            }
        };
        StatsSummary {
            rounds: self.rounds,
            games: self.games,
            wins: self.wins,
            avg_meld_points: avg(self.meld_points, self.rounds),
            avg_round_score: self
                .round_totals
                .into_iter()
                .map(|(p, (sum, n))| (format!("p{}", p), avg(sum, n)))
                .collect(),
            corrupted: self.corrupted,
            incomplete: self.incomplete,
        }
    }
}

pub fn handle_stats_command(
    input: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = Path::new(input);
    let mut state = StatsState::default();

    if path.is_dir() {
        for file in find_record_files(path) {
            let name = file.to_string_lossy().to_string();
            match read_text_auto(&name) {
                Ok(content) => state.consume(&name, &content, err)?,
                Err(e) => {
                    state.corrupted += 1;
                    ui::display_warning(err, &format!("Failed to read {}: {}", name, e))?;
                }
            }
        }
    } else {
        match read_text_auto(input) {
            Ok(s) => state.consume(input, &s, err)?,
            Err(e) => {
                ui::write_error(err, &format!("Failed to read {}: {}", input, e))?;
                return Err(CliError::InvalidInput(format!(
                    "Failed to read {}: {}",
                    input, e
                )));
            }
        }
    }

    if state.incomplete > 0 {
        ui::display_warning(
            err,
            &format!("Discarded {} incomplete final line(s)", state.incomplete),
        )?;
    }
    if state.rounds == 0 && (state.corrupted > 0 || state.incomplete > 0) {
        ui::write_error(err, "No valid round records")?;
        return Err(CliError::InvalidInput("No valid round records".to_string()));
    }

    let json_output = serde_json::to_string_pretty(&state.summary())
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize stats: {}", e)))?;
    writeln!(out, "{}", json_output)?;
    Ok(())
}
