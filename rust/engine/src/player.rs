use serde::{Deserialize, Serialize};

use crate::arena::CardId;
use crate::cards::{Card, Suit};
use crate::errors::{CardRejection, GameError};
use crate::melds::{Meld, MeldType};
use crate::rules::check_play;

/// Who makes decisions for a seat.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Human,
    Ai,
}

/// Point breakdown of a player's cumulative total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    /// Last-trick bonuses.
    pub trick: i32,
    /// Converted brisques minus penalties.
    pub brisque: i32,
    pub meld: i32,
}

impl ScoreSheet {
    pub fn total(&self) -> i32 {
        self.trick + self.brisque + self.meld
    }
}

/// A seat at the table: identity, cards, declared melds and score.
#[derive(Debug, Clone)]
pub struct Player {
    id: usize,
    name: String,
    kind: PlayerKind,
    held: Vec<CardId>,
    melded: Vec<CardId>,
    melds: Vec<Meld>,
    /// Once-per-game meld types already declared.
    declared_once: Vec<MeldType>,
    score: ScoreSheet,
    trick_wins: u32,
    brisques: u32,
    is_dealer: bool,
    is_current: bool,
}

impl Player {
    pub fn new(id: usize, name: impl Into<String>, kind: PlayerKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            held: Vec::new(),
            melded: Vec::new(),
            melds: Vec::new(),
            declared_once: Vec::new(),
            score: ScoreSheet::default(),
            trick_wins: 0,
            brisques: 0,
            is_dealer: false,
            is_current: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> PlayerKind {
        self.kind
    }
    pub fn held(&self) -> &[CardId] {
        &self.held
    }
    pub fn melded(&self) -> &[CardId] {
        &self.melded
    }
    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }
    pub fn score(&self) -> ScoreSheet {
        self.score
    }
    pub fn total(&self) -> i32 {
        self.score.total()
    }
    pub fn trick_wins(&self) -> u32 {
        self.trick_wins
    }
    pub fn brisques(&self) -> u32 {
        self.brisques
    }
    pub fn is_dealer(&self) -> bool {
        self.is_dealer
    }
    pub fn is_current(&self) -> bool {
        self.is_current
    }

    pub fn held_cards(&self) -> Vec<Card> {
        self.held.iter().map(|id| id.card()).collect()
    }

    pub fn card_count(&self) -> usize {
        self.held.len() + self.melded.len()
    }

    pub fn has_no_cards(&self) -> bool {
        self.held.is_empty() && self.melded.is_empty()
    }

    pub fn add_cards(&mut self, ids: &[CardId]) {
        self.held.extend_from_slice(ids);
    }

    /// Removes `id` from the held pile.
    pub fn remove_card(&mut self, id: CardId) -> Result<CardId, GameError> {
        match self.held.iter().position(|&h| h == id) {
            Some(pos) => Ok(self.held.remove(pos)),
            None => Err(GameError::illegal_card(id.card(), CardRejection::NotHeld)),
        }
    }

    pub fn cards_of_suit(&self, suit: Suit) -> Vec<CardId> {
        self.held
            .iter()
            .copied()
            .filter(|id| id.card().is_suit(suit))
            .collect()
    }

    pub fn can_follow_suit(&self, suit: Suit) -> bool {
        self.held.iter().any(|id| id.card().is_suit(suit))
    }

    /// Held cards that may be played onto `trick`.
    pub fn playable_cards(&self, trick: &[Card], trump: Option<Suit>, endgame: bool) -> Vec<CardId> {
        let faces = self.held_cards();
        self.held
            .iter()
            .copied()
            .filter(|id| check_play(&faces, id.card(), trick, trump, endgame).is_ok())
            .collect()
    }

    /// Moves the held copies among `ids` to the melded pile.
    pub(crate) fn meld_from_held(&mut self, ids: &[CardId]) -> Vec<CardId> {
        let mut moved = Vec::new();
        for &id in ids {
            if let Some(pos) = self.held.iter().position(|&h| h == id) {
                self.held.remove(pos);
                self.melded.push(id);
                moved.push(id);
            }
        }
        moved
    }

    /// Endgame: melded cards become ordinary held cards.
    pub(crate) fn return_melded(&mut self) -> Vec<CardId> {
        let back = std::mem::take(&mut self.melded);
        self.held.extend_from_slice(&back);
        back
    }

    pub(crate) fn record_meld(&mut self, meld: Meld) {
        if meld.meld_type.rule().once_per_game && !self.declared_once.contains(&meld.meld_type) {
            self.declared_once.push(meld.meld_type);
        }
        self.score.meld += meld.points;
        self.melds.push(meld);
    }

    pub fn declared_this_game(&self, meld_type: MeldType) -> bool {
        self.declared_once.contains(&meld_type)
    }

    /// Royal marriages whose cards are all still melded.
    pub fn intact_royal_marriages(&self) -> impl Iterator<Item = &[CardId]> + '_ {
        self.melds
            .iter()
            .filter(|m| {
                m.meld_type == MeldType::RoyalMarriage
                    && m.cards.iter().all(|id| self.melded.contains(id))
            })
            .map(|m| m.cards.as_slice())
    }

    pub(crate) fn win_trick(&mut self, brisques: u32) {
        self.trick_wins += 1;
        self.brisques += brisques;
    }

    pub(crate) fn add_trick_points(&mut self, points: i32) {
        self.score.trick += points;
    }

    pub(crate) fn add_brisque_points(&mut self, points: i32) {
        self.score.brisque += points;
    }

    pub(crate) fn set_dealer(&mut self, dealer: bool) {
        self.is_dealer = dealer;
    }

    pub(crate) fn set_current(&mut self, current: bool) {
        self.is_current = current;
    }

    /// Clears cards, melds and per-round counters; keeps the score.
    pub(crate) fn reset_round(&mut self) {
        self.held.clear();
        self.melded.clear();
        self.melds.clear();
        self.trick_wins = 0;
        self.brisques = 0;
        self.is_dealer = false;
        self.is_current = false;
    }

    /// Clears everything for a new game.
    pub(crate) fn reset_game(&mut self) {
        self.reset_round();
        self.score = ScoreSheet::default();
        self.declared_once.clear();
    }

    pub(crate) fn set_melded(&mut self, ids: Vec<CardId>) {
        self.melded = ids;
    }

    pub(crate) fn set_score(&mut self, score: ScoreSheet) {
        self.score = score;
    }
}
