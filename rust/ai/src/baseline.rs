//! Baseline computer player.
//!
//! Plays by simple card economy and is fully deterministic, which makes it the
//! reference opponent for simulations.

use crate::DecisionProvider;
use besigue_engine::arena::CardId;
use besigue_engine::cards::{Card, Suit};
use besigue_engine::engine::Engine;
use besigue_engine::melds::MeldCandidate;
use besigue_engine::rules::winning_position;

/// Rule-of-thumb player.
///
/// # Strategy
///
/// **Melding:** declares every offered meld, most valuable first.
///
/// **Leading:** plays its cheapest card.
///
/// **Following:** takes the trick with the cheapest winning card when the
/// trick holds a brisque (Ace or Ten) or the player can win with a card worth
/// less than the best card already played; otherwise discards its cheapest
/// card.
///
/// Jokers score only as melds and are kept back while anything cheaper is
/// available.
///
/// # Example
///
/// ```rust
/// use besigue_ai::baseline::BaselineProvider;
/// use besigue_ai::DecisionProvider;
///
/// let ai = BaselineProvider::new();
/// assert_eq!(ai.name(), "BaselineAI");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BaselineProvider;

impl BaselineProvider {
    pub fn new() -> Self {
        Self
    }

    /// How reluctant the player is to give up `card`.
    fn cost(card: Card, trump: Option<Suit>) -> u8 {
        match card {
            Card::Joker => 30,
            Card::Suited { suit, rank } => {
                let base = rank as u8;
                if Some(suit) == trump { base + 10 } else { base }
            }
        }
    }

    fn cheapest(cards: &[CardId], trump: Option<Suit>) -> Option<CardId> {
        cards
            .iter()
            .copied()
            .min_by_key(|id| (Self::cost(id.card(), trump), id.index()))
    }
}

impl DecisionProvider for BaselineProvider {
    fn decide_melds(&self, engine: &Engine, player: usize) -> Vec<MeldCandidate> {
        let mut options = engine.meld_options(player);
        options.sort_by(|a, b| b.points.cmp(&a.points));
        options
    }

    fn choose_card_to_play(&self, engine: &Engine, player: usize) -> Option<CardId> {
        let legal = engine.playable_cards(player);
        let trump = engine.trump();
        let trick = engine.current_trick_cards();
        if trick.is_empty() {
            return Self::cheapest(&legal, trump);
        }

        let winners: Vec<CardId> = legal
            .iter()
            .copied()
            .filter(|id| {
                let mut after = trick.clone();
                after.push(id.card());
                winning_position(&after, trump) == trick.len()
            })
            .collect();

        let brisque_on_table = trick.iter().any(Card::is_brisque);
        if let Some(best_win) = Self::cheapest(&winners, trump) {
            let leading = trick[winning_position(&trick, trump)];
            let cheap_win = Self::cost(best_win.card(), trump) < Self::cost(leading, trump);
            if brisque_on_table || cheap_win {
                return Some(best_win);
            }
        }
        Self::cheapest(&legal, trump)
    }

    fn name(&self) -> &str {
        "BaselineAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use besigue_engine::cards::Rank;
    use besigue_engine::engine::{RoundLayout, Seat};
    use besigue_engine::game::Turn;
    use besigue_engine::melds::MeldType;
    use besigue_engine::rules::RulesConfig;

    fn engine(layout: RoundLayout) -> Engine {
        let seats = vec![Seat::ai("A"), Seat::ai("B")];
        Engine::from_layout(RulesConfig::default(), seats, layout, Some(1)).unwrap()
    }

    #[test]
    fn test_cost_orders_trump_and_jokers_last() {
        let trump = Some(Suit::Hearts);
        let seven_h = Card::new(Suit::Hearts, Rank::Seven);
        let ace_s = Card::new(Suit::Spades, Rank::Ace);
        assert!(BaselineProvider::cost(ace_s, trump) < BaselineProvider::cost(seven_h, trump));
        assert!(BaselineProvider::cost(seven_h, trump) < BaselineProvider::cost(Card::Joker, trump));
    }

    #[test]
    fn test_leads_cheapest_card() {
        let eng = engine(RoundLayout {
            hands: vec![
                vec![
                    Card::new(Suit::Clubs, Rank::Ace),
                    Card::new(Suit::Clubs, Rank::Eight),
                    Card::Joker,
                ],
                vec![
                    Card::new(Suit::Spades, Rank::Seven),
                    Card::new(Suit::Spades, Rank::Eight),
                    Card::new(Suit::Spades, Rank::Nine),
                ],
            ],
            draw_pile: vec![
                Card::new(Suit::Diamonds, Rank::Seven),
                Card::new(Suit::Diamonds, Rank::Eight),
            ],
            leader: 0,
            opening_trick: true,
            ..Default::default()
        });
        let card = BaselineProvider::new().choose_card_to_play(&eng, 0).unwrap();
        assert_eq!(card.card(), Card::new(Suit::Clubs, Rank::Eight));
    }

    #[test]
    fn test_takes_brisque_with_cheapest_winner() {
        let mut eng = engine(RoundLayout {
            hands: vec![
                vec![
                    Card::new(Suit::Spades, Rank::Ten),
                    Card::new(Suit::Clubs, Rank::Seven),
                ],
                vec![
                    Card::new(Suit::Spades, Rank::Ace),
                    Card::new(Suit::Hearts, Rank::Seven),
                ],
            ],
            draw_pile: vec![
                Card::new(Suit::Diamonds, Rank::Seven),
                Card::new(Suit::Diamonds, Rank::Eight),
            ],
            trump: Some(Suit::Hearts),
            leader: 0,
            opening_trick: true,
            ..Default::default()
        });
        let ten = eng.players()[0].held()[0];
        eng.play_card(0, ten).unwrap();
        assert_eq!(eng.turn(), Some(Turn::Play(1)));
        // both win; the Ace costs less than a trump
        let card = BaselineProvider::new().choose_card_to_play(&eng, 1).unwrap();
        assert_eq!(card.card(), Card::new(Suit::Spades, Rank::Ace));
    }

    #[test]
    fn test_discards_when_trick_is_worthless() {
        let mut eng = engine(RoundLayout {
            hands: vec![
                vec![
                    Card::new(Suit::Spades, Rank::Eight),
                    Card::new(Suit::Clubs, Rank::Seven),
                ],
                vec![
                    Card::new(Suit::Hearts, Rank::King),
                    Card::new(Suit::Clubs, Rank::Nine),
                ],
            ],
            draw_pile: vec![
                Card::new(Suit::Diamonds, Rank::Seven),
                Card::new(Suit::Diamonds, Rank::Eight),
            ],
            trump: Some(Suit::Hearts),
            leader: 0,
            opening_trick: true,
            ..Default::default()
        });
        let eight = eng.players()[0].held()[0];
        eng.play_card(0, eight).unwrap();
        let card = BaselineProvider::new().choose_card_to_play(&eng, 1).unwrap();
        assert_eq!(card.card(), Card::new(Suit::Clubs, Rank::Nine));
    }

    #[test]
    fn test_melds_sorted_by_points() {
        let eng = engine(RoundLayout {
            hands: vec![
                vec![
                    Card::new(Suit::Spades, Rank::Queen),
                    Card::new(Suit::Diamonds, Rank::Jack),
                    Card::new(Suit::Clubs, Rank::King),
                    Card::new(Suit::Clubs, Rank::Queen),
                    Card::Joker,
                    Card::Joker,
                    Card::Joker,
                    Card::Joker,
                ],
                vec![
                    Card::new(Suit::Hearts, Rank::Seven),
                    Card::new(Suit::Hearts, Rank::Eight),
                    Card::new(Suit::Hearts, Rank::Nine),
                    Card::new(Suit::Hearts, Rank::Jack),
                    Card::new(Suit::Diamonds, Rank::Seven),
                    Card::new(Suit::Diamonds, Rank::Eight),
                    Card::new(Suit::Diamonds, Rank::Nine),
                    Card::new(Suit::Spades, Rank::Seven),
                ],
            ],
            draw_pile: vec![
                Card::new(Suit::Spades, Rank::Eight),
                Card::new(Suit::Spades, Rank::Nine),
            ],
            trump: Some(Suit::Hearts),
            leader: 0,
            meld_window: true,
            ..Default::default()
        });
        let melds = BaselineProvider::new().decide_melds(&eng, 0);
        assert_eq!(melds[0].meld_type, MeldType::FourJokers);
        assert!(melds.windows(2).all(|w| w[0].points >= w[1].points));
        assert!(melds.iter().any(|m| m.meld_type == MeldType::Besigue));
        assert!(BaselineProvider::new().decide_melds(&eng, 1).is_empty());
    }
}
