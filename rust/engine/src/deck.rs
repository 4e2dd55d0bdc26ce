use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::collections::VecDeque;

use crate::arena::CardId;
use crate::cards::POOL_SIZE;

/// Source of cards consumed by the round engine and the tie-break procedure.
pub trait DeckProvider {
    /// Randomizes the order of the remaining cards.
    fn shuffle(&mut self);

    /// Takes the next card from the front. `None` when empty.
    fn draw(&mut self) -> Option<CardId>;

    /// Removes `player_count * hand_size` cards from the front and returns one
    /// batch per player. Returns `None` without removing anything if the deck
    /// is too small.
    fn deal_initial(&mut self, player_count: usize, hand_size: usize) -> Option<Vec<Vec<CardId>>>;

    /// Puts cards back at the bottom.
    fn return_cards(&mut self, ids: &[CardId]);

    fn remaining(&self) -> usize;
}

/// Cards dealt per pass in [`Deck::deal_initial`].
pub const DEAL_BATCH: usize = 3;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: VecDeque<CardId>,
    rng: ChaCha20Rng,
}

impl Deck {
    /// Full 132-card deck in slot order; call [`DeckProvider::shuffle`] before dealing.
    pub fn new_with_seed(seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep initial order until shuffle is called explicitly
        Self {
            cards: CardId::all().collect(),
            rng,
        }
    }

    /// Stacked deck drawing `order` front to back.
    pub fn from_order(order: Vec<CardId>, seed: u64) -> Self {
        Self {
            cards: order.into(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Rebuilds the full 132-card deck in slot order.
    pub fn reset(&mut self) {
        self.cards = CardId::all().collect();
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardId> {
        self.cards.iter()
    }
}

impl DeckProvider for Deck {
    fn shuffle(&mut self) {
        self.cards.make_contiguous().shuffle(&mut self.rng);
    }

    fn draw(&mut self) -> Option<CardId> {
        self.cards.pop_front()
    }

    // Three passes of DEAL_BATCH cards to each player in seat order.
    fn deal_initial(&mut self, player_count: usize, hand_size: usize) -> Option<Vec<Vec<CardId>>> {
        if player_count * hand_size > self.cards.len() {
            return None;
        }
        let mut hands = vec![Vec::with_capacity(hand_size); player_count];
        while hands.iter().any(|h| h.len() < hand_size) {
            for hand in hands.iter_mut() {
                let take = DEAL_BATCH.min(hand_size - hand.len());
                for _ in 0..take {
                    hand.push(self.cards.pop_front()?);
                }
            }
        }
        Some(hands)
    }

    fn return_cards(&mut self, ids: &[CardId]) {
        self.cards.extend(ids.iter().copied());
    }

    fn remaining(&self) -> usize {
        self.cards.len()
    }
}

/// True when `ids` is exactly the 132-card pool, each slot once.
pub fn is_complete_pool(ids: &[CardId]) -> bool {
    if ids.len() != POOL_SIZE {
        return false;
    }
    let mut seen = [false; POOL_SIZE];
    for id in ids {
        if seen[id.index()] {
            return false;
        }
        seen[id.index()] = true;
    }
    true
}
