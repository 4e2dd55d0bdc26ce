use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of physical cards in the Bésigue pool: four 32-card packs plus four jokers.
pub const POOL_SIZE: usize = 132;

/// Number of distinct suit/rank pairs in one pack.
pub const PACK_SIZE: usize = 32;

/// Number of packs shuffled together.
pub const PACKS: usize = 4;

/// Number of jokers added to the pool.
pub const JOKERS: usize = 4;

/// Represents one of the four suits of a piquet pack.
/// Used as a component of [`Card`] and as the trump designation of a round.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Hearts suit (♥)
    Hearts,
    /// Diamonds suit (♦)
    Diamonds,
    /// Clubs suit (♣)
    Clubs,
    /// Spades suit (♠)
    Spades,
}

impl Suit {
    pub fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }
}

/// Represents the rank of a card from Seven through Ace.
///
/// Declaration order is the trick-taking order: the Ten ranks above the King
/// and below the Ace, so the derived `Ord` can be used directly when comparing
/// cards of the same suit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    Seven,
    Eight,
    Nine,
    Jack,
    Queen,
    King,
    Ten,
    Ace,
}

impl Rank {
    /// Aces and Tens are brisques.
    pub fn is_brisque(self) -> bool {
        matches!(self, Rank::Ace | Rank::Ten)
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ten => "10",
            Rank::Ace => "A",
        }
    }
}

/// A single playing card: a suited card or a joker.
///
/// Cards carry no identity of their own. Four physical copies of every suited
/// card exist in the pool; the arena addresses them by [`crate::arena::CardId`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Card {
    Suited { suit: Suit, rank: Rank },
    Joker,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Card::Suited { suit, rank }
    }

    pub fn suit(&self) -> Option<Suit> {
        match self {
            Card::Suited { suit, .. } => Some(*suit),
            Card::Joker => None,
        }
    }

    pub fn rank(&self) -> Option<Rank> {
        match self {
            Card::Suited { rank, .. } => Some(*rank),
            Card::Joker => None,
        }
    }

    pub fn is_joker(&self) -> bool {
        matches!(self, Card::Joker)
    }

    pub fn is_suit(&self, suit: Suit) -> bool {
        self.suit() == Some(suit)
    }

    pub fn is_brisque(&self) -> bool {
        self.rank().is_some_and(Rank::is_brisque)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Suited { suit, rank } => write!(f, "{}{}", rank.label(), suit.symbol()),
            Card::Joker => write!(f, "JOKER"),
        }
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 8] {
    [
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ten,
        Rank::Ace,
    ]
}

/// One 32-card piquet pack in suit-major order.
pub fn piquet_pack() -> Vec<Card> {
    let mut v = Vec::with_capacity(PACK_SIZE);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card::new(s, r));
        }
    }
    v
}

/// The full 132-card pool in slot order: four packs followed by the jokers.
pub fn full_pool() -> Vec<Card> {
    let mut v = Vec::with_capacity(POOL_SIZE);
    for _ in 0..PACKS {
        v.extend(piquet_pack());
    }
    v.extend(std::iter::repeat_n(Card::Joker, JOKERS));
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn full_pool_has_four_copies_of_each_pair_and_four_jokers() {
        let pool = full_pool();
        assert_eq!(pool.len(), POOL_SIZE);
        let mut counts: HashMap<Card, usize> = HashMap::new();
        for c in pool {
            *counts.entry(c).or_default() += 1;
        }
        assert_eq!(counts.len(), PACK_SIZE + 1);
        assert!(counts.values().all(|&n| n == 4));
    }

    #[test]
    fn ten_ranks_between_king_and_ace() {
        assert!(Rank::Ten > Rank::King);
        assert!(Rank::Ace > Rank::Ten);
        assert!(Rank::Seven < Rank::Eight);
    }

    #[test]
    fn display_uses_rank_and_suit_symbol() {
        assert_eq!(Card::new(Suit::Spades, Rank::Queen).to_string(), "Q♠");
        assert_eq!(Card::new(Suit::Hearts, Rank::Ten).to_string(), "10♥");
        assert_eq!(Card::Joker.to_string(), "JOKER");
    }

    #[test]
    fn jokers_have_no_suit_and_are_not_brisques() {
        assert_eq!(Card::Joker.suit(), None);
        assert!(!Card::Joker.is_brisque());
        assert!(Card::new(Suit::Clubs, Rank::Ace).is_brisque());
    }
}
