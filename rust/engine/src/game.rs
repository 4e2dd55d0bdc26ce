use serde::{Deserialize, Serialize};

use crate::arena::CardId;
use crate::cards::{Card, Suit};
use crate::melds::Meld;
use crate::player::{Player, PlayerKind, ScoreSheet};

/// Lifecycle of a game. Linear, with one loop from `Scoring` back to
/// `DealerDetermination` for the next round.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    DealerDetermination,
    Playing,
    /// Draw pile exhausted: no melding, strict follow/overtake play.
    Endgame,
    Scoring,
    GameOver,
}

impl Phase {
    /// Phases in which cards are drawn and played.
    pub fn is_trick_phase(self) -> bool {
        matches!(self, Phase::Playing | Phase::Endgame)
    }
}

/// The single action the engine expects next.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "player", rename_all = "snake_case")]
pub enum Turn {
    Draw(usize),
    Play(usize),
}

impl Turn {
    pub fn player(self) -> usize {
        match self {
            Turn::Draw(p) | Turn::Play(p) => p,
        }
    }
}

/// One play into a trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickPlay {
    pub player: usize,
    pub card: CardId,
}

/// A resolved trick kept in the round history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTrick {
    pub number: u32,
    pub leader: usize,
    pub plays: Vec<TrickPlay>,
    pub winner: usize,
}

impl CompletedTrick {
    pub fn cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.plays.iter().map(|p| p.card)
    }
}

/// Read-only view of one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: usize,
    pub name: String,
    pub kind: PlayerKind,
    pub held: Vec<Card>,
    pub melded: Vec<Card>,
    pub melds: Vec<Meld>,
    pub score: ScoreSheet,
    pub total: i32,
    pub trick_wins: u32,
    pub brisques: u32,
    pub is_dealer: bool,
    pub is_current: bool,
}

impl From<&Player> for PlayerView {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id(),
            name: p.name().to_string(),
            kind: p.kind(),
            held: p.held().iter().map(|id| id.card()).collect(),
            melded: p.melded().iter().map(|id| id.card()).collect(),
            melds: p.melds().to_vec(),
            score: p.score(),
            total: p.total(),
            trick_wins: p.trick_wins(),
            brisques: p.brisques(),
            is_dealer: p.is_dealer(),
            is_current: p.is_current(),
        }
    }
}

/// Immutable snapshot of the round, produced on demand after any transition.
/// Observers read snapshots instead of engine internals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: Phase,
    pub round: u32,
    pub trump: Option<Suit>,
    pub dealer: Option<usize>,
    pub leader: usize,
    pub turn: Option<Turn>,
    pub meld_window: Option<usize>,
    pub endgame: bool,
    pub current_trick: Vec<Card>,
    pub tricks_played: u32,
    pub draw_pile: usize,
    pub players: Vec<PlayerView>,
}
