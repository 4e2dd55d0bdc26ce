//! Applies provider decisions to an engine.
//!
//! [`step`] advances one expected action for an AI seat; [`run_game`] plays a
//! whole game with every seat computer-controlled.

use besigue_engine::arena::CardId;
use besigue_engine::engine::{DrawOutcome, Engine, PlayOutcome};
use besigue_engine::errors::GameError;
use besigue_engine::events::Standing;
use besigue_engine::game::{Phase, Turn};
use besigue_engine::logger::RoundRecord;
use besigue_engine::melds::Meld;
use besigue_engine::player::PlayerKind;

use crate::DecisionProvider;
use crate::pacing::Pacer;

/// What a single [`step`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Drew {
        player: usize,
        melds: Vec<Meld>,
        outcome: DrawOutcome,
    },
    Played {
        player: usize,
        melds: Vec<Meld>,
        card: CardId,
        outcome: PlayOutcome,
    },
    /// A human seat is expected to act.
    AwaitingHuman(Turn),
    /// The round is scored; call `start_next_round`.
    RoundOver,
    GameOver,
}

/// Declares the provider's melds if `player`'s window is open. Rejected
/// candidates are skipped.
pub fn declare_melds(
    engine: &mut Engine,
    provider: &dyn DecisionProvider,
    pacer: &Pacer,
    player: usize,
) -> Vec<Meld> {
    if engine.meld_window() != Some(player) {
        return Vec::new();
    }
    let wanted = pacer.decide(|| provider.decide_melds(engine, player));
    let mut declared = Vec::new();
    for candidate in wanted {
        match engine.declare_meld(player, candidate.meld_type, &candidate.cards) {
            Ok(meld) => declared.push(meld),
            Err(e) => tracing::debug!(player, error = %e, "meld candidate skipped"),
        }
    }
    declared
}

/// Performs the next expected action if it belongs to an AI seat.
///
/// `providers` is indexed by seat; human seats may hold any provider, it is
/// never consulted for them.
pub fn step(
    engine: &mut Engine,
    providers: &[&dyn DecisionProvider],
    pacer: &Pacer,
) -> Result<StepResult, GameError> {
    match engine.phase() {
        Phase::GameOver => return Ok(StepResult::GameOver),
        Phase::Scoring => return Ok(StepResult::RoundOver),
        Phase::Playing | Phase::Endgame => {}
        actual => return Err(GameError::PhaseMismatch { actual }),
    }
    let turn = engine
        .turn()
        .ok_or(GameError::PhaseMismatch { actual: engine.phase() })?;
    let player = turn.player();
    if engine.player(player)?.kind() == PlayerKind::Human {
        return Ok(StepResult::AwaitingHuman(turn));
    }
    let provider = *providers.get(player).ok_or(GameError::UnknownPlayer(player))?;

    let melds = declare_melds(engine, provider, pacer, player);
    match turn {
        Turn::Draw(p) => {
            let outcome = engine.draw(p)?;
            Ok(StepResult::Drew {
                player: p,
                melds,
                outcome,
            })
        }
        Turn::Play(p) => {
            let card = pacer
                .decide(|| provider.choose_card_to_play(engine, p))
                .filter(|c| engine.playable_cards(p).contains(c));
            let card = match card {
                Some(c) => c,
                None => {
                    tracing::warn!(player = p, ai = provider.name(), "no legal choice, using first playable card");
                    engine
                        .playable_cards(p)
                        .first()
                        .copied()
                        .ok_or_else(|| GameError::InvariantViolation(format!("player {} has no playable card", p)))?
                }
            };
            let outcome = engine.play_card(p, card)?;
            Ok(StepResult::Played {
                player: p,
                melds,
                card,
                outcome,
            })
        }
    }
}

/// Result of [`run_game`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub seed: u64,
    pub rounds: Vec<RoundRecord>,
    pub standings: Vec<Standing>,
    /// False when `max_rounds` stopped the game early.
    pub completed: bool,
}

/// Plays a new game to the end with every seat AI-controlled.
pub fn run_game(
    engine: &mut Engine,
    providers: &[&dyn DecisionProvider],
    pacer: &Pacer,
    max_rounds: u32,
) -> Result<GameSummary, GameError> {
    if engine.players().iter().any(|p| p.kind() == PlayerKind::Human) {
        return Err(GameError::InvalidConfig(
            "autoplay needs every seat to be AI-controlled".into(),
        ));
    }
    engine.start_new_game()?;
    let mut rounds = Vec::new();
    loop {
        match step(engine, providers, pacer)? {
            StepResult::RoundOver | StepResult::GameOver => {
                if let Some(rec) = engine.last_round_record() {
                    rounds.push(rec.clone());
                }
                if engine.phase() == Phase::GameOver {
                    break;
                }
                if engine.round() >= max_rounds {
                    tracing::warn!(rounds = engine.round(), "round limit reached before game over");
                    return Ok(GameSummary {
                        seed: engine.seed(),
                        rounds,
                        standings: Vec::new(),
                        completed: false,
                    });
                }
                engine.start_next_round()?;
            }
            StepResult::AwaitingHuman(turn) => {
                return Err(GameError::InvalidActor {
                    expected: Some(turn.player()),
                    actual: turn.player(),
                });
            }
            StepResult::Drew { .. } | StepResult::Played { .. } => {}
        }
    }
    Ok(GameSummary {
        seed: engine.seed(),
        rounds,
        standings: engine.standings().to_vec(),
        completed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineProvider;
    use crate::random::RandomProvider;
    use besigue_engine::engine::Seat;
    use besigue_engine::rules::RulesConfig;

    fn config() -> RulesConfig {
        RulesConfig {
            winning_score: 400,
            ..RulesConfig::default()
        }
    }

    #[test]
    fn test_run_game_finishes_with_standings() {
        let ai = BaselineProvider::new();
        let providers: [&dyn DecisionProvider; 3] = [&ai, &ai, &ai];
        let mut eng = Engine::with_ai_players(config(), 3, Some(12)).unwrap();
        let summary = run_game(&mut eng, &providers, &Pacer::immediate(), 100).unwrap();
        assert!(summary.completed);
        assert_eq!(summary.standings.len(), 3);
        assert_eq!(summary.rounds.len() as u32, eng.round());
        assert!(summary.standings[0].total >= 400);
        assert_eq!(summary.seed, 12);
    }

    #[test]
    fn test_mixed_providers_are_reproducible() {
        let run = || {
            let base = BaselineProvider::new();
            let rnd = RandomProvider::new(5);
            let providers: [&dyn DecisionProvider; 2] = [&base, &rnd];
            let mut eng = Engine::with_ai_players(config(), 2, Some(33)).unwrap();
            run_game(&mut eng, &providers, &Pacer::immediate(), 100).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_step_waits_for_humans() {
        let ai = BaselineProvider::new();
        let providers: [&dyn DecisionProvider; 2] = [&ai, &ai];
        let seats = vec![Seat::human("You"), Seat::human("Also you")];
        let mut eng = Engine::new(RulesConfig::default(), seats, Some(1)).unwrap();
        eng.start_new_game().unwrap();
        let turn = eng.turn().unwrap();
        assert_eq!(
            step(&mut eng, &providers, &Pacer::immediate()).unwrap(),
            StepResult::AwaitingHuman(turn)
        );
        assert!(run_game(&mut eng, &providers, &Pacer::immediate(), 5).is_err());
    }

    #[test]
    fn test_round_limit_stops_early() {
        let ai = BaselineProvider::new();
        let providers: [&dyn DecisionProvider; 2] = [&ai, &ai];
        let cfg = RulesConfig {
            winning_score: 1_000_000,
            ..RulesConfig::default()
        };
        let mut eng = Engine::with_ai_players(cfg, 2, Some(2)).unwrap();
        let summary = run_game(&mut eng, &providers, &Pacer::immediate(), 2).unwrap();
        assert!(!summary.completed);
        assert_eq!(summary.rounds.len(), 2);
        assert!(summary.standings.is_empty());
    }
}
