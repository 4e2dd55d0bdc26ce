//! Tie-break by drawing for Jacks.
//!
//! Tied players draw one card each in seating order. Anyone drawing a Jack
//! drops below the players who did not; the non-Jack drawers repeat until one
//! remains or a pass changes nothing.

use crate::arena::CardId;
use crate::cards::Rank;
use crate::deck::DeckProvider;
use crate::events::Standing;

/// Orders a tied group. `tied` is in seating order. Every card drawn goes
/// back to the bottom of `deck` before returning.
pub fn break_tie<D: DeckProvider + ?Sized>(tied: &[usize], deck: &mut D) -> Vec<usize> {
    let mut used = Vec::new();
    let order = draw_for_jacks(tied, deck, &mut used);
    deck.return_cards(&used);
    order
}

fn draw_for_jacks<D: DeckProvider + ?Sized>(
    tied: &[usize],
    deck: &mut D,
    used: &mut Vec<CardId>,
) -> Vec<usize> {
    let mut remaining = tied.to_vec();
    let mut demoted: Vec<usize> = Vec::new();

    while remaining.len() > 1 {
        let mut drawn = Vec::with_capacity(remaining.len());
        for _ in 0..remaining.len() {
            let Some(id) = deck.draw() else {
                tracing::warn!("tie-break pool exhausted, keeping current order");
                remaining.extend(demoted);
                return remaining;
            };
            used.push(id);
            drawn.push(id);
        }

        let mut jacks = Vec::new();
        let mut others = Vec::new();
        for (&p, id) in remaining.iter().zip(drawn) {
            if id.card().rank() == Some(Rank::Jack) {
                jacks.push(p);
            } else {
                others.push(p);
            }
        }
        tracing::debug!(?jacks, ?others, "tie-break pass");
        if jacks.is_empty() || others.is_empty() {
            break;
        }
        jacks.extend(demoted);
        demoted = jacks;
        remaining = others;
    }

    remaining.extend(demoted);
    remaining
}

/// Final standings from `(player, total)` pairs in seating order, highest
/// total first, equal totals resolved with [`break_tie`]. Each tied group
/// draws from the whole of `deck`, reshuffled.
pub fn standings<D: DeckProvider + ?Sized>(totals: &[(usize, i32)], deck: &mut D) -> Vec<Standing> {
    let mut sorted = totals.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut order = Vec::with_capacity(sorted.len());
    let mut i = 0;
    while i < sorted.len() {
        let total = sorted[i].1;
        let group: Vec<usize> = sorted[i..]
            .iter()
            .take_while(|(_, t)| *t == total)
            .map(|(p, _)| *p)
            .collect();
        i += group.len();
        let resolved = if group.len() > 1 {
            deck.shuffle();
            break_tie(&group, deck)
        } else {
            group
        };
        order.extend(resolved.into_iter().map(|p| (p, total)));
    }

    order
        .into_iter()
        .enumerate()
        .map(|(i, (player, total))| Standing {
            place: i + 1,
            player,
            total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Suit, POOL_SIZE};
    use crate::deck::Deck;

    fn id(card: Card) -> CardId {
        CardId::all().find(|i| i.card() == card).unwrap()
    }

    fn jack() -> CardId {
        id(Card::new(Suit::Clubs, Rank::Jack))
    }

    fn seven() -> CardId {
        id(Card::new(Suit::Clubs, Rank::Seven))
    }

    #[test]
    fn jack_drawer_is_demoted() {
        let mut deck = Deck::from_order(vec![jack(), seven()], 0);
        assert_eq!(break_tie(&[0, 1], &mut deck), vec![1, 0]);
    }

    #[test]
    fn no_jack_keeps_order() {
        let mut deck = Deck::from_order(vec![seven(), seven()], 0);
        assert_eq!(break_tie(&[2, 3], &mut deck), vec![2, 3]);
    }

    #[test]
    fn repeats_among_undecided() {
        // pass 1: p0 draws a Jack and drops; pass 2: p1 Jack, p2 not
        let order = vec![jack(), seven(), seven(), jack(), seven()];
        let mut deck = Deck::from_order(order, 0);
        assert_eq!(break_tie(&[0, 1, 2], &mut deck), vec![2, 1, 0]);
    }

    #[test]
    fn all_jacks_changes_nothing() {
        let mut deck = Deck::from_order(vec![jack(), jack()], 0);
        assert_eq!(break_tie(&[0, 1], &mut deck), vec![0, 1]);
    }

    #[test]
    fn standings_sort_by_total_and_number_places() {
        let mut deck = Deck::new_with_seed(5);
        let s = standings(&[(0, 300), (1, 1200), (2, 500)], &mut deck);
        let players: Vec<usize> = s.iter().map(|x| x.player).collect();
        assert_eq!(players, vec![1, 2, 0]);
        assert_eq!(s[0].place, 1);
        assert_eq!(s[2].place, 3);
    }

    #[test]
    fn standings_keep_tied_players_adjacent() {
        let mut deck = Deck::new_with_seed(11);
        let s = standings(&[(0, 1000), (1, 400), (2, 1000)], &mut deck);
        let top: Vec<usize> = s[..2].iter().map(|x| x.player).collect();
        assert!(top.contains(&0) && top.contains(&2));
        assert_eq!(s[2].player, 1);
    }

    #[test]
    fn drawn_cards_return_to_the_pool() {
        let order = vec![jack(), seven(), seven(), jack(), seven()];
        let mut deck = Deck::from_order(order, 0);
        break_tie(&[0, 1, 2], &mut deck);
        assert_eq!(deck.remaining(), 5);
    }

    #[test]
    fn every_tied_group_draws_from_a_full_pool() {
        let mut deck = Deck::new_with_seed(21);
        let s = standings(&[(0, 700), (1, 700), (2, 300), (3, 300)], &mut deck);
        assert_eq!(s.len(), 4);
        assert_eq!(deck.remaining(), POOL_SIZE);
        let bottom: Vec<usize> = s[2..].iter().map(|x| x.player).collect();
        assert!(bottom.contains(&2) && bottom.contains(&3));
    }
}
