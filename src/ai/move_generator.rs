//! Legal move generation and the heuristic ordering search relies on
//!
//! `generate_moves` enumerates every `Move` legal for `me` in `state`
//! against a `Simulator`, using `selection_enumerator` to discover the
//! selection paths a `PlayCard` needs. `order_key` scores a move for search
//! ordering; callers sort descending by it.

use crate::ai::{keyword_oracle, selection_enumerator, threat_analyzer};
use crate::core::{CardId, CardType, EffectFamilyTag, TriggerEvent};
use crate::game::{Phase, State};
use crate::moves::{AttackTarget, Move};
use crate::sim::Simulator;

/// Sentinel returned by `generate_moves` when `me` is not the active player;
/// the search treats this as a terminal-equivalent node.
pub const PASS: Move = Move::EndTurn;

pub fn generate_moves(simulator: &dyn Simulator, state: &State, me: usize) -> Vec<Move> {
    if state.active_player_index != me {
        return vec![PASS];
    }

    let mut moves = Vec::new();

    if state.phase == Phase::Main {
        moves.extend(generate_card_plays(simulator, state, me));
    }
    moves.extend(generate_attacks(state, me));
    moves.push(Move::EndTurn);

    moves
}

fn generate_card_plays(simulator: &dyn Simulator, state: &State, me: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    let hand: Vec<CardId> = state.player(me).hand.cards.to_vec();

    for card_id in hand {
        let Ok(card) = state.cards.get(card_id) else {
            continue;
        };
        if matches!(card.card_type, CardType::Trap) {
            continue;
        }
        let is_free = matches!(card.card_type, CardType::FreeSpell)
            || card.has_raw_keyword(crate::core::Keyword::FreePlay);
        if state.card_played_this_turn && !is_free {
            continue;
        }

        if card.card_type.is_creature_like() {
            let empty_slots: Vec<usize> = state
                .player(me)
                .field
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.is_none())
                .map(|(idx, _)| idx)
                .collect();
            if empty_slots.is_empty() {
                continue;
            }
            // Selection paths don't depend on which empty slot is eventually
            // chosen, so enumerate them once and emit one move per
            // (slot, path) pair rather than re-probing per slot.
            let paths = selection_enumerator::enumerate_selection_paths(
                simulator, state, card_id, None, false, is_free, me,
            );
            for slot in &empty_slots {
                for path in &paths {
                    moves.push(Move::PlayCard {
                        card: card_id,
                        slot: Some(*slot),
                        dry_drop: false,
                        is_free,
                        selections: path.selections.clone(),
                    });
                }
            }
            if matches!(card.card_type, CardType::Predator) {
                for slot in &empty_slots {
                    moves.push(Move::PlayCard {
                        card: card_id,
                        slot: Some(*slot),
                        dry_drop: true,
                        is_free,
                        selections: Vec::new(),
                    });
                }
            }
        } else {
            let target_group = card.effects.get(&TriggerEvent::OnPlay).and_then(|tag| {
                if let EffectFamilyTag::SelectFromGroup { kind, .. } = tag {
                    Some(*kind)
                } else {
                    None
                }
            });
            if let Some(group) = target_group {
                if resolve_group_is_empty(state, me, group) {
                    continue;
                }
            }
            let paths = selection_enumerator::enumerate_selection_paths(
                simulator, state, card_id, None, false, is_free, me,
            );
            for path in paths {
                moves.push(Move::PlayCard {
                    card: card_id,
                    slot: None,
                    dry_drop: false,
                    is_free,
                    selections: path.selections,
                });
            }
        }
    }

    moves
}

fn resolve_group_is_empty(state: &State, me: usize, group: crate::core::TargetGroup) -> bool {
    use crate::core::TargetGroup;
    let opp = state.opponent_index(me);
    let count = match group {
        TargetGroup::FriendlyCreatures | TargetGroup::FriendlyCreature => {
            state.player(me).field_creatures().count()
        }
        TargetGroup::EnemyCreatures | TargetGroup::EnemyCreature => {
            state.player(opp).field_creatures().count()
        }
        TargetGroup::AllCreatures | TargetGroup::AnyCreature => {
            state.player(me).field_creatures().count() + state.player(opp).field_creatures().count()
        }
        _ => 1, // predator/prey/carrion groups: generator defers emptiness to the enumerator
    };
    count == 0
}

fn generate_attacks(state: &State, me: usize) -> Vec<Move> {
    let opp = state.opponent_index(me);
    let mut moves = Vec::new();

    let lure_creatures: Vec<CardId> = state
        .player(opp)
        .field_creatures()
        .filter(|&id| {
            state
                .cards
                .get(id)
                .map(|c| keyword_oracle::has_lure(c) && !keyword_oracle::is_hidden(c))
                .unwrap_or(false)
        })
        .collect();

    let creature_targets: Vec<CardId> = if !lure_creatures.is_empty() {
        lure_creatures.clone()
    } else {
        state
            .player(opp)
            .field_creatures()
            .filter(|&id| {
                state
                    .cards
                    .get(id)
                    .map(|c| !keyword_oracle::is_hidden(c) && c.is_alive())
                    .unwrap_or(false)
            })
            .collect()
    };

    for attacker in state.player(me).field_creatures() {
        let Ok(card) = state.cards.get(attacker) else {
            continue;
        };
        if !keyword_oracle::can_attack(card) {
            continue;
        }

        for &target in &creature_targets {
            moves.push(Move::Attack {
                attacker_instance_id: attacker,
                target: AttackTarget::Creature { instance_id: target },
            });
        }

        if lure_creatures.is_empty() && keyword_oracle::can_attack_player(card, state.turn) {
            moves.push(Move::Attack {
                attacker_instance_id: attacker,
                target: AttackTarget::Player,
            });
        }
    }

    moves
}

/// Heuristic ordering score; higher sorts first.
pub fn order_key(state: &State, me: usize, mv: &Move) -> i32 {
    match mv {
        Move::EndTurn => -100,
        Move::Attack {
            attacker_instance_id,
            target,
        } => order_attack_key(state, me, *attacker_instance_id, target),
        Move::PlayCard {
            card,
            is_free,
            selections,
            ..
        } => order_play_key(state, me, *card, *is_free, selections),
    }
}

fn order_attack_key(state: &State, me: usize, attacker: CardId, target: &AttackTarget) -> i32 {
    let Ok(card) = state.cards.get(attacker) else {
        return 0;
    };
    let opp_lethal = threat_analyzer::detect_our_lethal(state, me);

    match target {
        AttackTarget::Player => {
            if opp_lethal.is_lethal && card.current_atk >= state.player(state.opponent_index(me)).hp
            {
                return 10000;
            }
            if opp_lethal.is_lethal {
                50 + 5 * card.current_atk
            } else {
                100 + 10 * card.current_atk
            }
        }
        AttackTarget::Creature { instance_id } => {
            let my_hp = state.player(me).hp;
            if let Ok(def) = state.cards.get(*instance_id) {
                if def.current_atk >= my_hp {
                    200 + 10 * card.current_atk
                } else {
                    80 + 5 * def.current_atk
                }
            } else {
                0
            }
        }
    }
}

fn order_play_key(
    state: &State,
    me: usize,
    card_id: CardId,
    is_free: bool,
    _selections: &[crate::moves::Selection],
) -> i32 {
    let Ok(card) = state.cards.get(card_id) else {
        return 0;
    };

    if card.card_type.is_creature_like() {
        let haste = keyword_oracle::has_haste(card);
        if haste {
            let would_be_lethal = card.current_atk >= state.player(state.opponent_index(me)).hp;
            if would_be_lethal {
                return 9000;
            }
            return 90 + 5 * card.current_atk;
        }
        return 70 + card.current_atk + card.current_hp;
    }

    let Some(tag) = card.effects.get(&TriggerEvent::OnPlay) else {
        return if is_free { 10 } else { 0 };
    };

    let opp_hp = state.player(state.opponent_index(me)).hp;
    match tag {
        EffectFamilyTag::DamageOpponent if 3 >= opp_hp => 8000,
        _ if tag.is_board_wipe() => 250,
        EffectFamilyTag::Kill | EffectFamilyTag::DestroyCreature => {
            let kills_lethal_threat = threat_analyzer::find_must_kill_targets(state, me)
                .iter()
                .any(|t| matches!(t.priority, threat_analyzer::MustKillPriority::Critical));
            if kills_lethal_threat {
                300
            } else {
                120
            }
        }
        EffectFamilyTag::SelectFromGroup { steal: true, .. } => {
            let steals_lethal_threat = threat_analyzer::find_must_kill_targets(state, me)
                .iter()
                .any(|t| matches!(t.priority, threat_analyzer::MustKillPriority::Critical));
            if steals_lethal_threat {
                350
            } else {
                100
            }
        }
        _ if tag.is_removal() => 150,
        _ => 30,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardType, EntityStore, Player};
    use crate::sim::RulesEngine;

    fn base_state() -> State {
        let mut players_store: EntityStore<Player> = EntityStore::new();
        let p0 = players_store.next_id();
        let p1 = players_store.next_id();
        let mut state = State::new_two_player(Player::new(p0, "Us"), Player::new(p1, "Them"));
        state.phase = Phase::Main;
        state
    }

    #[test]
    fn inactive_player_only_gets_pass() {
        let mut state = base_state();
        state.active_player_index = 1;
        let engine = RulesEngine::new();
        let moves = generate_moves(&engine, &state, 0);
        assert_eq!(moves, vec![PASS]);
    }

    #[test]
    fn empty_hand_and_field_yields_only_end_turn() {
        let state = base_state();
        let engine = RulesEngine::new();
        let moves = generate_moves(&engine, &state, 0);
        assert_eq!(moves, vec![Move::EndTurn]);
    }

    #[test]
    fn lure_creature_forces_attacks_onto_itself() {
        let mut state = base_state();
        let attacker_id = state.next_card_id();
        let mut attacker = Card::new(attacker_id, "bear", CardType::Creature, 4, 4);
        attacker.summoned_turn = 0;
        state.turn = 1;
        state.cards.insert(attacker_id, attacker);
        state.players[0].field[0] = Some(attacker_id);

        let lure_id = state.next_card_id();
        let lure = Card::new(lure_id, "decoy", CardType::Creature, 1, 5)
            .with_keyword(crate::core::Keyword::Lure);
        state.cards.insert(lure_id, lure);
        state.players[1].field[0] = Some(lure_id);

        let other_id = state.next_card_id();
        let other = Card::new(other_id, "rogue", CardType::Creature, 2, 2);
        state.cards.insert(other_id, other);
        state.players[1].field[1] = Some(other_id);

        let engine = RulesEngine::new();
        let moves = generate_moves(&engine, &state, 0);
        let attacks: Vec<&Move> = moves.iter().filter(|m| m.is_attack()).collect();
        assert_eq!(attacks.len(), 1);
        assert!(matches!(
            attacks[0],
            Move::Attack {
                target: AttackTarget::Creature { instance_id },
                ..
            } if *instance_id == lure_id
        ));
    }
}
