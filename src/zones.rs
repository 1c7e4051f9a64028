//! Ordered card zones (deck, hand, carrion, exile)
//!
//! The field is not a `CardZone` — a field has exactly 3 slots, a type-level
//! invariant modeled as `[Option<CardId>; 3]` on `Player` rather than a
//! runtime-checked `Vec`. These zones cover everything else: deck (top =
//! `Vec` end, matching the teacher's library convention), hand, carrion
//! (dead creatures, ordered by death), and exile (spent non-creature cards).

use crate::core::CardId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Field,
    Carrion,
    Exile,
}

/// Most zones hold a small, bounded number of cards (a hand rarely exceeds
/// a handful, a field is capped elsewhere) so the backing store is inlined
/// for the common case instead of always heap-allocating a `Vec`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardZone {
    pub zone_type: Zone,
    pub cards: SmallVec<[CardId; 8]>,
}

impl CardZone {
    pub fn new(zone_type: Zone) -> Self {
        CardZone {
            zone_type,
            cards: SmallVec::new(),
        }
    }

    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    pub fn remove(&mut self, card_id: CardId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&id| id == card_id) {
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw from the top of the deck.
    pub fn draw_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    pub fn peek_top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    pub fn add_to_bottom(&mut self, card_id: CardId) {
        self.cards.insert(0, card_id);
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityStore;
    use crate::core::Card;

    fn card_id(n: u32) -> CardId {
        let mut store: EntityStore<Card> = EntityStore::new();
        for _ in 0..n {
            store.next_id();
        }
        store.next_id()
    }

    #[test]
    fn deck_draws_from_the_top() {
        let mut deck = CardZone::new(Zone::Deck);
        let bottom = card_id(0);
        let middle = card_id(1);
        let top = card_id(2);

        deck.add(bottom);
        deck.add(middle);
        deck.add(top);

        assert_eq!(deck.peek_top(), Some(top));
        assert_eq!(deck.draw_top(), Some(top));
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.draw_top(), Some(middle));
        assert_eq!(deck.draw_top(), Some(bottom));
        assert!(deck.is_empty());
        assert_eq!(deck.draw_top(), None);
    }

    #[test]
    fn remove_drops_exactly_one_membership() {
        let mut hand = CardZone::new(Zone::Hand);
        let a = card_id(0);
        let b = card_id(1);
        hand.add(a);
        hand.add(b);

        assert!(hand.remove(a));
        assert_eq!(hand.len(), 1);
        assert!(!hand.contains(a));
        assert!(hand.contains(b));
    }
}
