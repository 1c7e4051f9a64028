//! Moves and the selections that fully specify them

use crate::core::CardId;
use serde::{Deserialize, Serialize};

pub type SlotIndex = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackTarget {
    Player,
    Creature { instance_id: CardId },
}

/// A resolved answer to one selection request raised while replaying a
/// `PlayCard` against the simulator. `selections` on a `Move::PlayCard` is a
/// sequence of these, positionally matched to the order requests are raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Target { value: CardId },
    Option { value: usize },
    /// Prey list for a predator's entry consumption.
    Consumption { values: Vec<CardId> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    PlayCard {
        card: CardId,
        slot: Option<SlotIndex>,
        dry_drop: bool,
        is_free: bool,
        selections: Vec<Selection>,
    },
    Attack {
        attacker_instance_id: CardId,
        target: AttackTarget,
    },
    EndTurn,
}

impl Move {
    pub fn is_end_turn(&self) -> bool {
        matches!(self, Move::EndTurn)
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, Move::Attack { .. })
    }

    /// Structural equality used for killer-move comparison: `PlayCard`
    /// compares by card id + dry-drop (ignoring the resolved selections),
    /// `Attack` by attacker + target kind/instance, `EndTurn` by variant.
    pub fn same_shape(&self, other: &Move) -> bool {
        match (self, other) {
            (
                Move::PlayCard {
                    card: c1,
                    dry_drop: d1,
                    ..
                },
                Move::PlayCard {
                    card: c2,
                    dry_drop: d2,
                    ..
                },
            ) => c1 == c2 && d1 == d2,
            (
                Move::Attack {
                    attacker_instance_id: a1,
                    target: t1,
                },
                Move::Attack {
                    attacker_instance_id: a2,
                    target: t2,
                },
            ) => a1 == a2 && t1 == t2,
            (Move::EndTurn, Move::EndTurn) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, EntityStore};

    fn ids(n: usize) -> Vec<CardId> {
        let mut store: EntityStore<Card> = EntityStore::new();
        (0..n).map(|_| store.next_id()).collect()
    }

    #[test]
    fn same_shape_ignores_resolved_selections() {
        let cs = ids(1);
        let a = Move::PlayCard {
            card: cs[0],
            slot: Some(0),
            dry_drop: false,
            is_free: false,
            selections: vec![Selection::Option { value: 0 }],
        };
        let b = Move::PlayCard {
            card: cs[0],
            slot: Some(1),
            dry_drop: false,
            is_free: false,
            selections: vec![Selection::Option { value: 1 }],
        };
        assert!(a.same_shape(&b));
    }

    #[test]
    fn attacks_differ_by_target() {
        let cs = ids(2);
        let face = Move::Attack {
            attacker_instance_id: cs[0],
            target: AttackTarget::Player,
        };
        let creature = Move::Attack {
            attacker_instance_id: cs[0],
            target: AttackTarget::Creature {
                instance_id: cs[1],
            },
        };
        assert!(!face.same_shape(&creature));
    }
}
