//! Player representation

use crate::core::{CardId, GameEntity, PlayerId, PlayerName};
use crate::zones::{CardZone, Zone};
use serde::{Deserialize, Serialize};

pub const STARTING_HP: i32 = 10;
pub const FIELD_SLOTS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,

    /// Small integer; the player has lost once this drops to 0 or below.
    pub hp: i32,

    pub deck: CardZone,
    pub hand: CardZone,
    /// Exactly 3 slots, each either empty or a creature instance. Fixed-size
    /// so "a field has exactly 3 slots" is enforced by the type, not by a
    /// runtime length check.
    pub field: [Option<CardId>; FIELD_SLOTS],
    /// Dead creatures, ordered by death; feeds Scavenge.
    pub carrion: CardZone,
    /// Spent non-creature cards.
    pub exile: CardZone,

    /// One non-free card per turn.
    pub card_played_this_turn_count: u8,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>) -> Self {
        Player {
            id,
            name: name.into(),
            hp: STARTING_HP,
            deck: CardZone::new(Zone::Deck),
            hand: CardZone::new(Zone::Hand),
            field: [None; FIELD_SLOTS],
            carrion: CardZone::new(Zone::Carrion),
            exile: CardZone::new(Zone::Exile),
            card_played_this_turn_count: 0,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    pub fn lose_hp(&mut self, amount: i32) {
        self.hp -= amount;
    }

    pub fn gain_hp(&mut self, amount: i32) {
        self.hp += amount;
    }

    pub fn empty_slots(&self) -> usize {
        self.field.iter().filter(|s| s.is_none()).count()
    }

    pub fn field_creatures(&self) -> impl Iterator<Item = CardId> + '_ {
        self.field.iter().filter_map(|s| *s)
    }

    pub fn first_empty_slot(&self) -> Option<usize> {
        self.field.iter().position(|s| s.is_none())
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityStore;

    fn new_player() -> Player {
        let mut store: EntityStore<Player> = EntityStore::new();
        let id = store.next_id();
        Player::new(id, "Alice")
    }

    #[test]
    fn starts_at_ten_hp_undefeated() {
        let player = new_player();
        assert_eq!(player.hp, STARTING_HP);
        assert!(!player.is_defeated());
    }

    #[test]
    fn lethal_at_hp_zero_or_below() {
        let mut player = new_player();
        player.lose_hp(10);
        assert_eq!(player.hp, 0);
        assert!(player.is_defeated());

        player.lose_hp(5);
        assert!(player.is_defeated());
    }

    #[test]
    fn field_starts_empty_with_three_slots() {
        let player = new_player();
        assert_eq!(player.field.len(), FIELD_SLOTS);
        assert_eq!(player.empty_slots(), 3);
        assert_eq!(player.first_empty_slot(), Some(0));
    }
}
