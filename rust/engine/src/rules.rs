use serde::{Deserialize, Serialize};

use crate::cards::{Card, Suit};
use crate::errors::{CardRejection, GameError};
use crate::melds::MeldType;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// How the dealer of each round is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealerMethod {
    /// Uniformly random seat.
    Random,
    /// Seats draw in turn; the first Jack deals.
    DrawJacks,
}

/// Base points for each meld type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeldPoints {
    pub besigue: i32,
    pub common_marriage: i32,
    pub royal_marriage: i32,
    pub four_jacks: i32,
    pub four_queens: i32,
    pub four_kings: i32,
    pub four_aces: i32,
    pub four_jokers: i32,
    pub sequence: i32,
}

impl Default for MeldPoints {
    fn default() -> Self {
        Self {
            besigue: 40,
            common_marriage: 20,
            royal_marriage: 40,
            four_jacks: 40,
            four_queens: 60,
            four_kings: 80,
            four_aces: 100,
            four_jokers: 200,
            sequence: 250,
        }
    }
}

impl MeldPoints {
    pub fn base(&self, meld_type: MeldType) -> i32 {
        match meld_type {
            MeldType::Besigue => self.besigue,
            MeldType::CommonMarriage => self.common_marriage,
            MeldType::RoyalMarriage => self.royal_marriage,
            MeldType::FourJacks => self.four_jacks,
            MeldType::FourQueens => self.four_queens,
            MeldType::FourKings => self.four_kings,
            MeldType::FourAces => self.four_aces,
            MeldType::FourJokers => self.four_jokers,
            MeldType::Sequence => self.sequence,
        }
    }
}

/// Every rule constant of a game. Read-only once the engine is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Cards dealt to each player at the start of a round.
    pub hand_size: usize,
    /// Maximum held cards while the draw pile is non-empty.
    pub max_held: usize,
    pub meld_points: MeldPoints,
    /// Four-of-a-kind made entirely of trump-suit naturals scores twice.
    pub trump_doubling: bool,
    /// Points per brisque when brisques convert.
    pub brisque_value: i32,
    /// Brisques needed to convert.
    pub min_brisques: u32,
    /// Running total needed to convert.
    pub min_score_for_brisques: i32,
    /// Once any player reaches this total, nobody converts brisques.
    pub brisque_cutoff: i32,
    /// Deducted from players who do not convert.
    pub brisque_penalty: i32,
    /// Awarded to the winner of the last trick of a round.
    pub last_trick_bonus: i32,
    /// A round ends the game once any total reaches this.
    pub winning_score: i32,
    pub dealer_method: DealerMethod,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            hand_size: 9,
            max_held: 9,
            meld_points: MeldPoints::default(),
            trump_doubling: true,
            brisque_value: 10,
            min_brisques: 5,
            min_score_for_brisques: 100,
            brisque_cutoff: 900,
            brisque_penalty: 20,
            last_trick_bonus: 10,
            winning_score: 1000,
            dealer_method: DealerMethod::DrawJacks,
        }
    }
}

impl RulesConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.hand_size == 0 {
            return Err(GameError::InvalidConfig("hand_size must be > 0".into()));
        }
        if self.max_held < self.hand_size {
            return Err(GameError::InvalidConfig(
                "max_held must be >= hand_size".into(),
            ));
        }
        if self.hand_size * MAX_PLAYERS > crate::cards::POOL_SIZE {
            return Err(GameError::InvalidConfig(
                "hand_size too large for the pool".into(),
            ));
        }
        if self.winning_score <= 0 {
            return Err(GameError::InvalidConfig("winning_score must be > 0".into()));
        }
        if self.brisque_penalty < 0 || self.brisque_value < 0 {
            return Err(GameError::InvalidConfig(
                "brisque value and penalty must be >= 0".into(),
            ));
        }
        Ok(())
    }

    pub fn check_player_count(n: usize) -> Result<(), GameError> {
        if (MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
            Ok(())
        } else {
            Err(GameError::InvalidPlayerCount(n))
        }
    }
}

/// Suit of the first non-joker card in play order.
pub fn lead_suit(trick: &[Card]) -> Option<Suit> {
    trick.iter().find_map(|c| c.suit())
}

/// Position (in play order) of the card that wins `trick`.
///
/// Highest trump wins; otherwise the highest card of the lead suit; if
/// neither exists (all jokers) the leader, position 0, wins. Equal ranks never
/// overtake an earlier card.
pub fn winning_position(trick: &[Card], trump: Option<Suit>) -> usize {
    let best_of = |suit: Suit| -> Option<usize> {
        let mut best: Option<(usize, crate::cards::Rank)> = None;
        for (pos, card) in trick.iter().enumerate() {
            if let Card::Suited { suit: s, rank } = *card {
                if s == suit && best.is_none_or(|(_, r)| rank > r) {
                    best = Some((pos, rank));
                }
            }
        }
        best.map(|(pos, _)| pos)
    };

    if let Some(pos) = trump.and_then(best_of) {
        return pos;
    }
    lead_suit(trick).and_then(best_of).unwrap_or(0)
}

/// Seat that wins a trick led by `leader` in a game of `player_count` seats.
pub fn trick_winner(trick: &[Card], leader: usize, trump: Option<Suit>, player_count: usize) -> usize {
    (leader + winning_position(trick, trump)) % player_count
}

/// Checks whether `card` may be played from `held` onto `trick`.
///
/// Outside the endgame any held card is playable. In the endgame the player
/// must follow the lead suit, must beat the best lead-suit card when able, and
/// must trump when unable to follow.
pub fn check_play(
    held: &[Card],
    card: Card,
    trick: &[Card],
    trump: Option<Suit>,
    endgame: bool,
) -> Result<(), CardRejection> {
    if !held.contains(&card) {
        return Err(CardRejection::NotHeld);
    }
    if !endgame {
        return Ok(());
    }
    let Some(lead) = lead_suit(trick) else {
        return Ok(());
    };

    let following: Vec<Card> = held.iter().copied().filter(|c| c.is_suit(lead)).collect();
    if !following.is_empty() {
        if !card.is_suit(lead) {
            return Err(CardRejection::MustFollowSuit);
        }
        let best = trick
            .iter()
            .filter(|c| c.is_suit(lead))
            .filter_map(|c| c.rank())
            .max();
        let can_overtake = |c: &Card| match (c.rank(), best) {
            (Some(r), Some(b)) => r > b,
            _ => false,
        };
        if following.iter().any(can_overtake) && !can_overtake(&card) {
            return Err(CardRejection::MustOvertake);
        }
        return Ok(());
    }

    if let Some(t) = trump {
        if held.iter().any(|c| c.is_suit(t)) && !card.is_suit(t) {
            return Err(CardRejection::MustTrump);
        }
    }
    Ok(())
}

/// Subset of `held` that [`check_play`] accepts, in held order.
pub fn playable_cards(held: &[Card], trick: &[Card], trump: Option<Suit>, endgame: bool) -> Vec<Card> {
    held.iter()
        .copied()
        .filter(|&c| check_play(held, c, trick, trump, endgame).is_ok())
        .collect()
}
