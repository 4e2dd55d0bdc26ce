use thiserror::Error;

use crate::cards::Card;
use crate::game::Phase;
use crate::melds::MeldType;

/// Why a card play was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardRejection {
    /// The card is not in the player's held pile.
    NotHeld,
    /// Endgame: a card of the lead suit is held.
    MustFollowSuit,
    /// Endgame: a higher card of the lead suit is held.
    MustOvertake,
    /// Endgame: the lead suit cannot be followed but a trump is held.
    MustTrump,
}

/// Why a meld declaration was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeldRejection {
    /// Melding is disabled in the endgame.
    MeldingDisabled,
    /// The declarer did not win the most recent trick.
    NotTrickWinner,
    /// No meld-offer window is open.
    WindowClosed,
    /// Wrong number of cards for this meld type.
    WrongCardCount,
    /// A contributing card is not held or melded by the declarer.
    MissingCard,
    /// The same card was listed twice.
    DuplicateCard,
    /// Every contributing card is already melded.
    NoHeldCard,
    /// A contributing card already carries this meld type's tag.
    AlreadyTagged,
    /// The cards do not form this meld type.
    WrongShape,
    /// Only a common marriage may be declared before trump is established.
    TrumpNotEstablished,
    /// A sequence needs an intact royal marriage.
    NoRoyalMarriage,
    /// This type was already declared in the current window.
    AlreadyDeclaredThisWindow,
    /// This type may be declared once per game and already was.
    AlreadyDeclaredThisGame,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("It's not player {actual}'s turn (expected {expected:?})")]
    InvalidActor {
        expected: Option<usize>,
        actual: usize,
    },
    #[error("Illegal card {card}: {reason:?}")]
    IllegalCard { card: Card, reason: CardRejection },
    #[error("Illegal meld {meld_type:?}: {reason:?}")]
    IllegalMeld {
        meld_type: MeldType,
        reason: MeldRejection,
    },
    #[error("Action not allowed in phase {actual:?}")]
    PhaseMismatch { actual: Phase },
    #[error("Unsupported player count: {0} (2-4 players)")]
    InvalidPlayerCount(usize),
    #[error("Unknown player {0}")]
    UnknownPlayer(usize),
    #[error("Deck exhausted: needed {needed}, remaining {remaining}")]
    DeckExhausted { needed: usize, remaining: usize },
    #[error("Invalid round layout: {0}")]
    InvalidLayout(String),
    #[error("Invalid rules configuration: {0}")]
    InvalidConfig(String),
    #[error("Card conservation violated: {0}")]
    InvariantViolation(String),
}

impl GameError {
    pub fn illegal_meld(meld_type: MeldType, reason: MeldRejection) -> Self {
        GameError::IllegalMeld { meld_type, reason }
    }

    pub fn illegal_card(card: Card, reason: CardRejection) -> Self {
        GameError::IllegalCard { card, reason }
    }
}
