//! # besigue-ai: Decision Providers for Bésigue
//!
//! Computer players for the Bésigue engine. A provider looks at the engine
//! read-only and answers two questions for a seat: which melds to declare in
//! its meld-offer window, and which card to play. Providers never mutate the
//! engine; [`autoplay`] applies their answers.
//!
//! ## Core Components
//!
//! - [`DecisionProvider`] - Interface for computer seats
//! - [`baseline`] - Rule-of-thumb player used for simulations
//! - [`random`] - Seeded uniformly random legal player
//! - [`pacing`] - Cosmetic delay around decisions
//! - [`autoplay`] - Drives AI turns and whole games
//! - [`create_provider`] - Factory by name
//!
//! ## Quick Start
//!
//! ```rust
//! use besigue_ai::create_provider;
//! use besigue_engine::engine::Engine;
//! use besigue_engine::game::Turn;
//! use besigue_engine::rules::RulesConfig;
//!
//! let ai = create_provider("baseline", None).unwrap();
//! let mut engine = Engine::with_ai_players(RulesConfig::default(), 2, Some(42)).unwrap();
//! engine.start_new_game().unwrap();
//!
//! let Some(Turn::Play(p)) = engine.turn() else { unreachable!() };
//! let card = ai.choose_card_to_play(&engine, p).expect("a held card");
//! engine.play_card(p, card).unwrap();
//! ```

use besigue_engine::arena::CardId;
use besigue_engine::engine::Engine;
use besigue_engine::melds::MeldCandidate;

pub mod autoplay;
pub mod baseline;
pub mod pacing;
pub mod random;

/// Interface for computer-controlled seats.
///
/// Both decisions are synchronous and read the engine without changing it, so
/// tests can call them directly and deterministically.
///
/// # Example Implementation
///
/// ```rust
/// use besigue_ai::DecisionProvider;
/// use besigue_engine::arena::CardId;
/// use besigue_engine::engine::Engine;
/// use besigue_engine::melds::MeldCandidate;
///
/// struct FirstCard;
///
/// impl DecisionProvider for FirstCard {
///     fn decide_melds(&self, _engine: &Engine, _player: usize) -> Vec<MeldCandidate> {
///         Vec::new()
///     }
///
///     fn choose_card_to_play(&self, engine: &Engine, player: usize) -> Option<CardId> {
///         engine.playable_cards(player).first().copied()
///     }
///
///     fn name(&self) -> &str {
///         "FirstCard"
///     }
/// }
/// ```
pub trait DecisionProvider: Send + Sync {
    /// Melds to declare, in order, while `player`'s meld-offer window is open.
    ///
    /// Candidates are declared one after another; a candidate invalidated by
    /// an earlier declaration is skipped.
    fn decide_melds(&self, engine: &Engine, player: usize) -> Vec<MeldCandidate>;

    /// Card to play into the current trick. `None` when the player holds no
    /// playable card.
    fn choose_card_to_play(&self, engine: &Engine, player: usize) -> Option<CardId>;

    fn name(&self) -> &str;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown AI type: {0}")]
pub struct UnknownProvider(pub String);

/// Provider names accepted by [`create_provider`].
pub const PROVIDERS: [&str; 2] = ["baseline", "random"];

/// Creates a provider by name.
///
/// `seed` only affects randomized providers.
///
/// # Example
///
/// ```rust
/// use besigue_ai::create_provider;
///
/// let ai = create_provider("baseline", None).unwrap();
/// assert_eq!(ai.name(), "BaselineAI");
/// assert!(create_provider("oracle", None).is_err());
/// ```
pub fn create_provider(
    kind: &str,
    seed: Option<u64>,
) -> Result<Box<dyn DecisionProvider>, UnknownProvider> {
    match kind {
        "baseline" => Ok(Box::new(baseline::BaselineProvider::new())),
        "random" => Ok(Box::new(random::RandomProvider::new(seed.unwrap_or(0)))),
        other => Err(UnknownProvider(other.to_string())),
    }
}
