use besigue_engine::cards::{all_suits, full_pool, POOL_SIZE};
use besigue_engine::deck::{is_complete_pool, Deck, DeckProvider};
use besigue_engine::engine::Engine;
use besigue_engine::game::{Phase, Turn};
use besigue_engine::rules::{trick_winner, winning_position, RulesConfig};
use proptest::prelude::*;

/// Plays one round choosing among legal actions with `picks`, checking
/// conservation after every transition.
fn run_round(seed: u64, players: usize, picks: &[usize]) -> Result<Engine, TestCaseError> {
    let mut eng = Engine::with_ai_players(RulesConfig::default(), players, Some(seed))
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    eng.start_new_game().map_err(|e| TestCaseError::fail(e.to_string()))?;
    let mut i = 0usize;
    let mut next = || {
        i += 1;
        picks[i % picks.len()]
    };

    while eng.phase().is_trick_phase() {
        if let Some(p) = eng.meld_window() {
            let options = eng.meld_options(p);
            let k = next();
            // skip melding on some turns
            if k % 3 != 0 && !options.is_empty() {
                let m = &options[k % options.len()];
                eng.declare_meld(p, m.meld_type, &m.cards)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
            }
        }
        match eng.turn() {
            Some(Turn::Draw(p)) => {
                eng.draw(p).map_err(|e| TestCaseError::fail(e.to_string()))?;
            }
            Some(Turn::Play(p)) => {
                let legal = eng.playable_cards(p);
                prop_assert!(!legal.is_empty());
                let card = legal[next() % legal.len()];
                eng.play_card(p, card).map_err(|e| TestCaseError::fail(e.to_string()))?;
            }
            None => prop_assert!(false, "no turn during {:?}", eng.phase()),
        }
        prop_assert!(eng.check_conservation().is_ok(), "{:?}", eng.check_conservation());
        if eng.draw_pile_len() > 0 {
            prop_assert!(eng.players().iter().all(|p| p.held().len() <= 9));
        }
    }
    Ok(eng)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn cards_are_conserved_through_a_round(
        seed in any::<u64>(),
        players in 2usize..=4,
        picks in prop::collection::vec(0usize..64, 1..32),
    ) {
        let eng = run_round(seed, players, &picks)?;
        prop_assert!(matches!(eng.phase(), Phase::Scoring | Phase::GameOver));
        let cards: usize = eng.history().iter().map(|t| t.plays.len()).sum();
        prop_assert_eq!(cards, POOL_SIZE);
    }

    #[test]
    fn reshuffle_preserves_composition(seed in any::<u64>(), take in 0usize..132) {
        let mut deck = Deck::new_with_seed(seed);
        deck.shuffle();
        let drawn: Vec<_> = (0..take).filter_map(|_| deck.draw()).collect();
        deck.return_cards(&drawn);
        deck.shuffle();
        let all: Vec<_> = deck.iter().copied().collect();
        prop_assert!(is_complete_pool(&all));
    }

    #[test]
    fn trick_winner_is_a_pure_seat_choice(
        pool in prop::collection::vec(prop::sample::select(full_pool()), 4),
        players in 2usize..=4,
        leader in 0usize..4,
        trump in prop::option::of(prop::sample::select(all_suits().to_vec())),
    ) {
        let trick = &pool[..players];
        let leader = leader % players;
        let winner = trick_winner(trick, leader, trump, players);
        prop_assert_eq!(winner, trick_winner(trick, leader, trump, players));
        prop_assert!(winner < players);

        let pos = winning_position(trick, trump);
        prop_assert_eq!(pos, winning_position(trick, trump));
        prop_assert_eq!(winner, (leader + pos) % players);
        if trick.iter().all(|c| c.is_joker()) {
            prop_assert_eq!(pos, 0);
        } else {
            prop_assert!(!trick[pos].is_joker(), "joker won {:?}", trick);
        }
    }
}
