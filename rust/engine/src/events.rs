//! Output events for presentation and networking layers.
//!
//! Events are fire-and-forget: nothing in the engine depends on them being
//! consumed. They queue inside the engine until drained and are pushed to any
//! registered [`EventSink`] as they happen.

use serde::{Deserialize, Serialize};

use crate::arena::CardId;
use crate::cards::Suit;
use crate::game::Phase;
use crate::melds::Meld;

/// End-of-round scoring line for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScore {
    pub player: usize,
    pub brisques: u32,
    /// Brisques converted to points (otherwise the penalty applied).
    pub converted: bool,
    /// Points added (or, negative, deducted) by brisque scoring.
    pub brisque_points: i32,
    pub last_trick_bonus: i32,
    pub total: i32,
}

/// Final placing of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub place: usize,
    pub player: usize,
    pub total: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    DealerChosen {
        round: u32,
        dealer: usize,
        leader: usize,
    },
    CardDrawn {
        player: usize,
        card: CardId,
        remaining: usize,
    },
    CardPlayed {
        player: usize,
        card: CardId,
    },
    TrickCompleted {
        number: u32,
        winner: usize,
        cards: Vec<CardId>,
    },
    MeldDeclared {
        player: usize,
        meld: Meld,
    },
    TrumpEstablished {
        suit: Suit,
        by: usize,
    },
    EndgameStarted {
        round: u32,
    },
    RoundScored {
        round: u32,
        scores: Vec<RoundScore>,
    },
    GameOver {
        standings: Vec<Standing>,
    },
}

/// Synchronous observer of engine events.
pub trait EventSink: Send {
    fn on_event(&mut self, event: &GameEvent);
}

/// Sink that forwards every event to `tracing` at debug level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&mut self, event: &GameEvent) {
        tracing::debug!(event = ?event, "game event");
    }
}
