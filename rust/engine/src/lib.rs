//! # besigue-engine: Bésigue Rules Engine
//!
//! A deterministic rules engine for multi-pack Bésigue (Rubicon-style, 2-4
//! players, four piquet packs plus four jokers). It owns the round state
//! machine: dealer determination, dealing, the draw/play cycle, melding,
//! trick resolution, endgame play, end-of-round scoring and game-over
//! detection with tie-breaks.
//!
//! ## Core Modules
//!
//! - [`cards`] - Suits, ranks and the 132-card pool
//! - [`arena`] - Stable card identities with location and meld tags
//! - [`deck`] - Seeded ChaCha20 draw pile and dealing
//! - [`rules`] - Rule constants, trick winner and play legality
//! - [`melds`] - Meld table, detection and validation
//! - [`player`] - Seat state and score sheet
//! - [`engine`] - The round state machine
//! - [`game`] - Phases, turns and read-only snapshots
//! - [`events`] - Output events and sinks
//! - [`tiebreak`] - Draw-for-Jacks ordering of tied players
//! - [`logger`] - JSONL round records
//! - [`errors`] - Rejection reasons
//!
//! ## Quick Start
//!
//! ```rust
//! use besigue_engine::engine::Engine;
//! use besigue_engine::game::Phase;
//! use besigue_engine::rules::RulesConfig;
//!
//! let mut engine = Engine::with_ai_players(RulesConfig::default(), 3, Some(42)).unwrap();
//! engine.start_new_game().unwrap();
//! assert_eq!(engine.phase(), Phase::Playing);
//! for p in engine.players() {
//!     assert_eq!(p.held().len(), 9);
//! }
//! assert_eq!(engine.draw_pile_len(), 132 - 27);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! The same seed always produces the same deal:
//!
//! ```rust
//! use besigue_engine::deck::{Deck, DeckProvider};
//!
//! let mut a = Deck::new_with_seed(42);
//! let mut b = Deck::new_with_seed(42);
//! a.shuffle();
//! b.shuffle();
//! assert_eq!(a.draw(), b.draw());
//! ```

pub mod arena;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod game;
pub mod logger;
pub mod melds;
pub mod player;
pub mod rules;
pub mod tiebreak;
