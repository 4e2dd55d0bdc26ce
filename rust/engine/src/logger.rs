use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cards::Suit;
use crate::events::RoundScore;
use crate::melds::MeldType;

/// One declared meld in a round summary.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct MeldEntry {
    pub player: usize,
    pub meld_type: MeldType,
    pub points: i32,
}

/// Summary of a finished round, one JSON object per line in a round log.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// `YYYYMMDD-NNNNNN`, assigned by [`RoundLogger::next_id`].
    pub round_id: String,
    /// Seed of the game the round belongs to.
    pub seed: Option<u64>,
    pub round: u32,
    pub players: usize,
    pub dealer: Option<usize>,
    pub trump: Option<Suit>,
    pub tricks: u32,
    #[serde(default)]
    pub melds: Vec<MeldEntry>,
    pub scores: Vec<RoundScore>,
    /// Winner (`p<seat>`) when this round ended the game.
    pub result: Option<String>,
    /// RFC3339, filled in on write when missing.
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

pub fn format_round_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends [`RoundRecord`]s to a JSONL file, LF line endings only.
pub struct RoundLogger {
    writer: Option<Box<dyn Write + Send>>,
    date: String,
    seq: u32,
}

impl RoundLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self::with_writer(Box::new(BufWriter::new(f))))
    }

    /// Logger over any sink, e.g. a compressing encoder.
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Some(writer),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        }
    }

    /// Logger that only numbers ids, writing nothing.
    pub fn detached(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_round_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.round_id.is_empty() {
            rec.round_id = self.next_id();
        }
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
