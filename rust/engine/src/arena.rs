//! Card arena: every physical card lives in exactly one slot.
//!
//! A [`CardId`] is a stable index into the 132-card pool. The card behind a
//! slot never changes; only its [`Location`] and the set of meld types it has
//! already contributed to ([`MeldTags`]) are mutable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::{all_ranks, all_suits, Card, JOKERS, PACK_SIZE, POOL_SIZE};
use crate::melds::MeldType;

/// Stable address of one physical card in the pool.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl CardId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The card held by this slot.
    ///
    /// Slots 0..128 are four suit-major packs, slots 128..132 are jokers.
    pub fn card(self) -> Card {
        let i = self.index();
        if i >= POOL_SIZE - JOKERS {
            return Card::Joker;
        }
        let within = i % PACK_SIZE;
        let suit = all_suits()[within / 8];
        let rank = all_ranks()[within % 8];
        Card::new(suit, rank)
    }

    pub fn all() -> impl Iterator<Item = CardId> {
        (0..POOL_SIZE as u8).map(CardId)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.card(), self.0)
    }
}

/// Where a card currently sits.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Location {
    DrawPile,
    Held(usize),
    Melded(usize),
    Trick,
    History,
}

/// Bitset of meld types a card has already been declared in.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MeldTags(u16);

impl MeldTags {
    pub fn contains(self, meld_type: MeldType) -> bool {
        self.0 & meld_type.bit() != 0
    }

    pub fn insert(&mut self, meld_type: MeldType) {
        self.0 |= meld_type.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    location: Location,
    tags: MeldTags,
}

/// Per-slot location and meld-tag registry for the whole pool.
#[derive(Debug, Clone)]
pub struct CardArena {
    slots: Vec<Slot>,
}

impl Default for CardArena {
    fn default() -> Self {
        Self::new()
    }
}

impl CardArena {
    /// All cards start in the draw pile with no tags.
    pub fn new() -> Self {
        Self {
            slots: vec![
                Slot {
                    location: Location::DrawPile,
                    tags: MeldTags::default(),
                };
                POOL_SIZE
            ],
        }
    }

    pub fn location(&self, id: CardId) -> Location {
        self.slots[id.index()].location
    }

    pub fn set_location(&mut self, id: CardId, location: Location) {
        self.slots[id.index()].location = location;
    }

    pub fn tags(&self, id: CardId) -> MeldTags {
        self.slots[id.index()].tags
    }

    pub fn tag(&mut self, id: CardId, meld_type: MeldType) {
        self.slots[id.index()].tags.insert(meld_type);
    }

    /// Returns every card to the draw pile and forgets all meld tags.
    pub fn collect_all(&mut self) {
        for slot in &mut self.slots {
            slot.location = Location::DrawPile;
            slot.tags = MeldTags::default();
        }
    }

    /// Number of cards the arena places at `location`.
    pub fn count_at(&self, location: Location) -> usize {
        self.slots.iter().filter(|s| s.location == location).count()
    }

}
