//! Uniformly random legal player, seeded for reproducible runs.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::DecisionProvider;
use besigue_engine::arena::CardId;
use besigue_engine::engine::Engine;
use besigue_engine::melds::MeldCandidate;

/// Picks a random legal card and declares each offered meld with even odds.
#[derive(Debug)]
pub struct RandomProvider {
    rng: Mutex<StdRng>,
}

impl RandomProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut guard = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl DecisionProvider for RandomProvider {
    fn decide_melds(&self, engine: &Engine, player: usize) -> Vec<MeldCandidate> {
        let options = engine.meld_options(player);
        self.with_rng(|rng| options.into_iter().filter(|_| rng.random_bool(0.5)).collect())
    }

    fn choose_card_to_play(&self, engine: &Engine, player: usize) -> Option<CardId> {
        let legal = engine.playable_cards(player);
        self.with_rng(|rng| legal.choose(rng).copied())
    }

    fn name(&self) -> &str {
        "RandomAI"
    }
}
