//! Terminal formatting helpers shared by the commands.

use besigue_engine::arena::CardId;
use besigue_engine::cards::Suit;
use besigue_engine::melds::{MeldCandidate, MeldType};
use besigue_engine::player::Player;
use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Space-separated cards, e.g. `7♥ A♠ JOKER`.
pub fn format_cards(cards: &[CardId]) -> String {
    cards
        .iter()
        .map(|c| c.card().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cards numbered for selection, e.g. `[0] 7♥ [1] A♠`.
pub fn format_numbered(cards: &[CardId]) -> String {
    cards
        .iter()
        .enumerate()
        .map(|(i, c)| format!("[{}] {}", i, c.card()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn meld_name(meld_type: MeldType) -> &'static str {
    match meld_type {
        MeldType::Besigue => "Bésigue",
        MeldType::CommonMarriage => "Common marriage",
        MeldType::RoyalMarriage => "Royal marriage",
        MeldType::FourJacks => "Four jacks",
        MeldType::FourQueens => "Four queens",
        MeldType::FourKings => "Four kings",
        MeldType::FourAces => "Four aces",
        MeldType::FourJokers => "Four jokers",
        MeldType::Sequence => "Sequence",
    }
}

pub fn format_candidate(candidate: &MeldCandidate) -> String {
    format!(
        "{} ({}) for {}",
        meld_name(candidate.meld_type),
        format_cards(&candidate.cards),
        candidate.points
    )
}

pub fn format_trump(trump: Option<Suit>) -> String {
    match trump {
        Some(s) => format!("{:?} {}", s, s.symbol()),
        None => "not set".into(),
    }
}

/// One line per player: `P1: 230 (tricks 3, brisques 5)`.
pub fn write_scores(out: &mut dyn Write, players: &[Player]) -> std::io::Result<()> {
    for p in players {
        writeln!(
            out,
            "  {}: {} (tricks {}, brisques {})",
            p.name(),
            p.total(),
            p.trick_wins(),
            p.brisques()
        )?;
    }
    Ok(())
}
