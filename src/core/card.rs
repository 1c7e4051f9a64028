//! Card instances
//!
//! A `Card` is a live battlefield/hand/deck instance, not a catalog entry:
//! the kernel never loads or interprets card-effect scripts, it only reads
//! the closed fields below. `definition_id` names which catalog entry this
//! instance came from (useful for transposition fingerprinting and tests);
//! `id` is the per-game-unique entity id moves and zones reference.

use crate::core::keyword::{EffectFamilyTag, Keyword};
use crate::core::CardId;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Predator,
    Prey,
    Creature,
    Spell,
    FreeSpell,
    Trap,
}

impl CardType {
    pub fn is_creature_like(&self) -> bool {
        matches!(
            self,
            CardType::Predator | CardType::Prey | CardType::Creature
        )
    }
}

/// Trigger points a card's `effects` table may key off. The kernel only
/// reads this table through `ai::threat_analyzer`'s per-creature scoring and
/// `ai::selection_enumerator`'s noisy-move classification; it never executes
/// the effect itself (that's the simulator's job).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEvent {
    OnPlay,
    OnBeforeCombat,
    OnStart,
    OnEnd,
    OnDeath,
    OnEntryConsumption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayedVia {
    Normal,
    DryDrop,
    Free,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Entity id within this game; stable under clone.
    pub id: CardId,
    /// Catalog identity this instance was created from.
    pub definition_id: String,
    pub card_type: CardType,

    pub atk: i32,
    pub hp: i32,
    pub current_atk: i32,
    pub current_hp: i32,

    pub keywords: FxHashSet<Keyword>,

    /// Prey feed value; for edible predators this equals `current_atk`.
    pub nutrition: i32,

    pub has_attacked: bool,
    pub frozen: bool,
    pub paralyzed: bool,
    pub webbed: bool,
    pub has_barrier: bool,
    pub abilities_cancelled: bool,
    /// Played without consuming prey: all keyword abilities and triggered
    /// effects are suppressed for this card's lifetime.
    pub dry_dropped: bool,
    pub summoned_turn: u32,
    pub played_via: PlayedVia,
    pub is_token: bool,

    pub effects: FxHashMap<TriggerEvent, EffectFamilyTag>,
}

impl Card {
    pub fn new(
        id: CardId,
        definition_id: impl Into<String>,
        card_type: CardType,
        atk: i32,
        hp: i32,
    ) -> Self {
        Card {
            id,
            definition_id: definition_id.into(),
            card_type,
            atk,
            hp,
            current_atk: atk,
            current_hp: hp,
            keywords: FxHashSet::default(),
            nutrition: atk,
            has_attacked: false,
            frozen: false,
            paralyzed: false,
            webbed: false,
            has_barrier: false,
            abilities_cancelled: false,
            dry_dropped: false,
            summoned_turn: 0,
            played_via: PlayedVia::Normal,
            is_token: false,
            effects: FxHashMap::default(),
        }
    }

    pub fn with_keyword(mut self, k: Keyword) -> Self {
        self.keywords.insert(k);
        self
    }

    pub fn with_summoned_turn(mut self, turn: u32) -> Self {
        self.summoned_turn = turn;
        self
    }

    /// Raw membership test, ignoring dry-drop/abilities-cancelled
    /// suppression. `ai::keyword_oracle::has_keyword` is the gated version
    /// every other component should call.
    pub fn has_raw_keyword(&self, k: Keyword) -> bool {
        self.keywords.contains(&k)
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityStore;

    #[test]
    fn new_card_has_matching_current_stats() {
        let mut store: EntityStore<Card> = EntityStore::new();
        let id = store.next_id();
        let card = Card::new(id, "bear", CardType::Creature, 4, 4);
        assert_eq!(card.current_atk, 4);
        assert_eq!(card.current_hp, 4);
        assert_eq!(card.nutrition, 4);
        assert!(card.is_alive());
    }

    #[test]
    fn raw_keyword_lookup_does_not_gate_on_dry_drop() {
        let mut store: EntityStore<Card> = EntityStore::new();
        let id = store.next_id();
        let mut card =
            Card::new(id, "viper", CardType::Predator, 2, 2).with_keyword(Keyword::Toxic);
        card.dry_dropped = true;
        // Raw lookup still reports true; gating is the oracle's job.
        assert!(card.has_raw_keyword(Keyword::Toxic));
    }
}
