use std::collections::HashMap;

use besigue_engine::cards::{Card, Rank, Suit};
use besigue_engine::deck::{Deck, DeckProvider};

#[test]
fn fresh_deck_has_four_of_each_card_and_four_jokers() {
    let mut deck = Deck::new_with_seed(42);
    deck.shuffle();
    let mut counts: HashMap<Card, usize> = HashMap::new();
    while let Some(id) = deck.draw() {
        *counts.entry(id.card()).or_default() += 1;
    }
    assert_eq!(counts.len(), 33);
    assert_eq!(counts[&Card::Joker], 4);
    assert!(counts.values().all(|&n| n == 4));
    assert_eq!(counts[&Card::new(Suit::Spades, Rank::Queen)], 4);
}

#[test]
fn shuffle_is_deterministic_with_same_seed() {
    let mut d1 = Deck::new_with_seed(12345);
    let mut d2 = Deck::new_with_seed(12345);
    d1.shuffle();
    d2.shuffle();
    let a: Vec<_> = (0..20).map(|_| d1.draw().unwrap()).collect();
    let b: Vec<_> = (0..20).map(|_| d2.draw().unwrap()).collect();
    assert_eq!(a, b, "same seed must yield identical order");
}

#[test]
fn shuffle_differs_with_different_seed() {
    let mut d1 = Deck::new_with_seed(1);
    let mut d2 = Deck::new_with_seed(2);
    d1.shuffle();
    d2.shuffle();
    let a: Vec<_> = (0..20).map(|_| d1.draw().unwrap()).collect();
    let b: Vec<_> = (0..20).map(|_| d2.draw().unwrap()).collect();
    assert_ne!(a, b);
}

#[test]
fn initial_deal_gives_equal_hands_and_leaves_the_rest() {
    for players in 2..=4 {
        let mut deck = Deck::new_with_seed(7);
        deck.shuffle();
        let hands = deck.deal_initial(players, 9).unwrap();
        assert_eq!(hands.len(), players);
        assert!(hands.iter().all(|h| h.len() == 9));
        assert_eq!(deck.remaining(), 132 - 9 * players);
        // what is left divides evenly into draw cycles
        assert_eq!(deck.remaining() % players, 0);
    }
}

#[test]
fn deal_fails_without_touching_a_short_deck() {
    let mut deck = Deck::new_with_seed(1);
    for _ in 0..120 {
        deck.draw();
    }
    assert!(deck.deal_initial(2, 9).is_none());
    assert_eq!(deck.remaining(), 12);
}
