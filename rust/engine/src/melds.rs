//! Meld detection, validation and scoring.
//!
//! Meld categories are a closed enum. [`MELD_RULES`] maps each one to its
//! [`Shape`], card count and declaration limit; detection and validation both
//! read the table.

use serde::{Deserialize, Serialize};

use crate::arena::{CardArena, CardId};
use crate::cards::{all_suits, Card, Rank, Suit};
use crate::errors::{GameError, MeldRejection};
use crate::rules::MeldPoints;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum MeldType {
    Besigue,
    CommonMarriage,
    RoyalMarriage,
    FourJacks,
    FourQueens,
    FourKings,
    FourAces,
    FourJokers,
    Sequence,
}

impl MeldType {
    pub(crate) fn bit(self) -> u16 {
        1 << (self as u16)
    }

    pub fn rule(self) -> &'static MeldRule {
        &MELD_RULES[self as usize]
    }

    pub fn all() -> impl Iterator<Item = MeldType> {
        MELD_RULES.iter().map(|r| r.meld_type)
    }
}

/// Card pattern a meld type requires.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Shape {
    /// Queen of spades and Jack of diamonds.
    Besigue,
    /// King and Queen of one suit; royal when that suit is trump.
    Marriage { royal: bool },
    /// Four cards of one rank; jokers may fill in for naturals.
    FourOfKind(Rank),
    FourJokers,
    /// Trump Ace, Ten and Jack added to a declared royal marriage.
    Sequence,
}

#[derive(Debug)]
pub struct MeldRule {
    pub meld_type: MeldType,
    pub shape: Shape,
    pub cards: usize,
    pub once_per_game: bool,
}

pub const MELD_RULES: [MeldRule; 9] = [
    MeldRule {
        meld_type: MeldType::Besigue,
        shape: Shape::Besigue,
        cards: 2,
        once_per_game: false,
    },
    MeldRule {
        meld_type: MeldType::CommonMarriage,
        shape: Shape::Marriage { royal: false },
        cards: 2,
        once_per_game: false,
    },
    MeldRule {
        meld_type: MeldType::RoyalMarriage,
        shape: Shape::Marriage { royal: true },
        cards: 2,
        once_per_game: false,
    },
    MeldRule {
        meld_type: MeldType::FourJacks,
        shape: Shape::FourOfKind(Rank::Jack),
        cards: 4,
        once_per_game: false,
    },
    MeldRule {
        meld_type: MeldType::FourQueens,
        shape: Shape::FourOfKind(Rank::Queen),
        cards: 4,
        once_per_game: false,
    },
    MeldRule {
        meld_type: MeldType::FourKings,
        shape: Shape::FourOfKind(Rank::King),
        cards: 4,
        once_per_game: false,
    },
    MeldRule {
        meld_type: MeldType::FourAces,
        shape: Shape::FourOfKind(Rank::Ace),
        cards: 4,
        once_per_game: false,
    },
    MeldRule {
        meld_type: MeldType::FourJokers,
        shape: Shape::FourJokers,
        cards: 4,
        once_per_game: true,
    },
    MeldRule {
        meld_type: MeldType::Sequence,
        shape: Shape::Sequence,
        cards: 3,
        once_per_game: false,
    },
];

/// A declared meld. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub meld_type: MeldType,
    pub cards: Vec<CardId>,
    pub points: i32,
    pub round: u32,
}

/// A meld the player could declare right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeldCandidate {
    pub meld_type: MeldType,
    pub cards: Vec<CardId>,
    pub points: i32,
}

/// Outcome of a successful validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedMeld {
    /// Type to record; a first marriage is re-typed as royal.
    pub meld_type: MeldType,
    pub points: i32,
    /// Trump suit set by this declaration, if any.
    pub establishes_trump: Option<Suit>,
}

/// The declarer's cards.
#[derive(Debug, Clone, Copy)]
pub struct PlayerCards<'a> {
    pub held: &'a [CardId],
    pub melded: &'a [CardId],
}

impl PlayerCards<'_> {
    fn is_held(&self, id: CardId) -> bool {
        self.held.contains(&id)
    }

    fn owns(&self, id: CardId) -> bool {
        self.is_held(id) || self.melded.contains(&id)
    }

    /// Held cards first, then melded ones.
    fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.held.iter().chain(self.melded.iter()).copied()
    }
}

/// Round state the meld rules depend on.
#[derive(Debug, Clone, Copy)]
pub struct MeldContext<'a> {
    pub arena: &'a CardArena,
    pub trump: Option<Suit>,
    /// King and Queen of an intact royal marriage that has not yet backed a
    /// sequence.
    pub intact_royal_marriage: Option<[CardId; 2]>,
    pub points: &'a MeldPoints,
    pub trump_doubling: bool,
}

impl MeldContext<'_> {
    fn untagged(&self, id: CardId, meld_type: MeldType) -> bool {
        !self.arena.tags(id).contains(meld_type)
    }

    fn score(&self, meld_type: MeldType, cards: &[CardId]) -> i32 {
        let base = self.points.base(meld_type);
        match (meld_type.rule().shape, self.trump) {
            (Shape::FourOfKind(_), Some(t))
                if self.trump_doubling && cards.iter().all(|id| id.card().is_suit(t)) =>
            {
                base * 2
            }
            _ => base,
        }
    }
}

/// Exact cards an exact-shape meld needs, or `None` when the shape is not
/// available under the current trump.
fn required_cards(shape: Shape, suit: Option<Suit>, trump: Option<Suit>) -> Option<Vec<Card>> {
    match shape {
        Shape::Besigue => Some(vec![
            Card::new(Suit::Spades, Rank::Queen),
            Card::new(Suit::Diamonds, Rank::Jack),
        ]),
        Shape::Marriage { .. } => {
            let s = suit?;
            Some(vec![Card::new(s, Rank::King), Card::new(s, Rank::Queen)])
        }
        Shape::Sequence => {
            let t = trump?;
            Some(vec![
                Card::new(t, Rank::Ace),
                Card::new(t, Rank::Ten),
                Card::new(t, Rank::Jack),
            ])
        }
        Shape::FourOfKind(_) | Shape::FourJokers => None,
    }
}

/// Whether `meld_type` is allowed at all given the trump state.
fn gate(meld_type: MeldType, ctx: &MeldContext) -> Result<(), MeldRejection> {
    match (meld_type, ctx.trump) {
        (MeldType::CommonMarriage, None) => Ok(()),
        (_, None) => Err(MeldRejection::TrumpNotEstablished),
        (MeldType::Sequence, Some(_)) if ctx.intact_royal_marriage.is_none() => {
            Err(MeldRejection::NoRoyalMarriage)
        }
        _ => Ok(()),
    }
}

/// Picks one untagged card per requirement, held copies first.
fn pick_exact(
    required: &[Card],
    meld_type: MeldType,
    cards: PlayerCards,
    ctx: &MeldContext,
) -> Option<Vec<CardId>> {
    let mut chosen = Vec::with_capacity(required.len());
    for want in required {
        let id = cards
            .iter()
            .find(|&id| id.card() == *want && ctx.untagged(id, meld_type) && !chosen.contains(&id))?;
        chosen.push(id);
    }
    // held copies were preferred, so no held card here means none exists
    chosen.iter().any(|&id| cards.is_held(id)).then_some(chosen)
}

fn pick_four_of_kind(
    rank: Rank,
    meld_type: MeldType,
    cards: PlayerCards,
    ctx: &MeldContext,
) -> Option<Vec<CardId>> {
    let naturals: Vec<CardId> = cards
        .iter()
        .filter(|id| id.card().rank() == Some(rank) && ctx.untagged(*id, meld_type))
        .collect();
    if naturals.is_empty() {
        return None;
    }

    if let Some(t) = ctx.trump {
        let trumps: Vec<CardId> = naturals
            .iter()
            .copied()
            .filter(|id| id.card().is_suit(t))
            .collect();
        if trumps.len() >= 4 {
            let pick: Vec<CardId> = trumps.into_iter().take(4).collect();
            if pick.iter().any(|&id| cards.is_held(id)) {
                return Some(pick);
            }
        }
    }

    let jokers = cards
        .iter()
        .filter(|id| id.card().is_joker() && ctx.untagged(*id, meld_type));
    let pick: Vec<CardId> = naturals.iter().copied().chain(jokers).take(4).collect();
    if pick.len() == 4 && pick.iter().any(|&id| cards.is_held(id)) {
        Some(pick)
    } else {
        None
    }
}

fn pick_jokers(meld_type: MeldType, cards: PlayerCards, ctx: &MeldContext) -> Option<Vec<CardId>> {
    let pick: Vec<CardId> = cards
        .iter()
        .filter(|id| id.card().is_joker() && ctx.untagged(*id, meld_type))
        .take(4)
        .collect();
    (pick.len() == 4 && pick.iter().any(|&id| cards.is_held(id))).then_some(pick)
}

/// Every meld the player could declare, one candidate per type (and per suit
/// for marriages), in rule-table order.
pub fn detect(cards: PlayerCards, ctx: &MeldContext) -> Vec<MeldCandidate> {
    let mut out = Vec::new();
    for rule in MELD_RULES.iter() {
        let meld_type = rule.meld_type;
        if gate(meld_type, ctx).is_err() {
            continue;
        }
        match rule.shape {
            Shape::Marriage { royal } => {
                for suit in all_suits() {
                    let is_trump = ctx.trump == Some(suit);
                    if ctx.trump.is_some() && royal != is_trump {
                        continue;
                    }
                    let Some(req) = required_cards(rule.shape, Some(suit), ctx.trump) else {
                        continue;
                    };
                    if let Some(ids) = pick_exact(&req, meld_type, cards, ctx) {
                        // a first marriage is scored as royal
                        let points = if ctx.trump.is_none() {
                            ctx.points.base(MeldType::RoyalMarriage)
                        } else {
                            ctx.score(meld_type, &ids)
                        };
                        out.push(MeldCandidate {
                            meld_type,
                            cards: ids,
                            points,
                        });
                    }
                }
            }
            Shape::FourOfKind(rank) => {
                if let Some(ids) = pick_four_of_kind(rank, meld_type, cards, ctx) {
                    out.push(MeldCandidate {
                        meld_type,
                        points: ctx.score(meld_type, &ids),
                        cards: ids,
                    });
                }
            }
            Shape::FourJokers => {
                if let Some(ids) = pick_jokers(meld_type, cards, ctx) {
                    out.push(MeldCandidate {
                        meld_type,
                        points: ctx.score(meld_type, &ids),
                        cards: ids,
                    });
                }
            }
            Shape::Besigue | Shape::Sequence => {
                let Some(req) = required_cards(rule.shape, None, ctx.trump) else {
                    continue;
                };
                if let Some(ids) = pick_exact(&req, meld_type, cards, ctx) {
                    out.push(MeldCandidate {
                        meld_type,
                        points: ctx.score(meld_type, &ids),
                        cards: ids,
                    });
                }
            }
        }
    }
    out
}

/// Checks that `chosen` forms `meld_type` for this player. Does not check the
/// meld-offer window or declaration limits; the engine owns those.
pub fn validate(
    meld_type: MeldType,
    chosen: &[CardId],
    cards: PlayerCards,
    ctx: &MeldContext,
) -> Result<ValidatedMeld, GameError> {
    let reject = |reason| GameError::illegal_meld(meld_type, reason);
    let rule = meld_type.rule();

    if chosen.len() != rule.cards {
        return Err(reject(MeldRejection::WrongCardCount));
    }
    for (i, id) in chosen.iter().enumerate() {
        if chosen[..i].contains(id) {
            return Err(reject(MeldRejection::DuplicateCard));
        }
        if !cards.owns(*id) {
            return Err(reject(MeldRejection::MissingCard));
        }
    }
    if !chosen.iter().any(|&id| cards.is_held(id)) {
        return Err(reject(MeldRejection::NoHeldCard));
    }
    if chosen.iter().any(|&id| !ctx.untagged(id, meld_type)) {
        return Err(reject(MeldRejection::AlreadyTagged));
    }
    gate(meld_type, ctx).map_err(reject)?;

    let faces: Vec<Card> = chosen.iter().map(|id| id.card()).collect();
    let shape_ok = match rule.shape {
        Shape::Marriage { royal } => {
            let suit = faces[0].suit();
            let same_suit_pair = suit.and_then(|s| required_cards(rule.shape, Some(s), ctx.trump));
            let suit_fits = match ctx.trump {
                None => true,
                Some(t) => (suit == Some(t)) == royal,
            };
            suit_fits && same_suit_pair.is_some_and(|req| same_faces(&faces, &req))
        }
        Shape::Besigue | Shape::Sequence => required_cards(rule.shape, None, ctx.trump)
            .is_some_and(|req| same_faces(&faces, &req)),
        Shape::FourOfKind(rank) => {
            faces.iter().all(|c| c.is_joker() || c.rank() == Some(rank))
                && faces.iter().any(|c| c.rank() == Some(rank))
        }
        Shape::FourJokers => faces.iter().all(Card::is_joker),
    };
    if !shape_ok {
        return Err(reject(MeldRejection::WrongShape));
    }

    if meld_type == MeldType::CommonMarriage && ctx.trump.is_none() {
        return Ok(ValidatedMeld {
            meld_type: MeldType::RoyalMarriage,
            points: ctx.points.base(MeldType::RoyalMarriage),
            establishes_trump: faces[0].suit(),
        });
    }
    Ok(ValidatedMeld {
        meld_type,
        points: ctx.score(meld_type, chosen),
        establishes_trump: None,
    })
}

fn same_faces(faces: &[Card], required: &[Card]) -> bool {
    let mut a = faces.to_vec();
    let mut b = required.to_vec();
    a.sort();
    b.sort();
    a == b
}
