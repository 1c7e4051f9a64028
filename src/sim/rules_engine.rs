//! Reference `Simulator` implementation
//!
//! A narrow, deterministic executor over exactly the fields and closed
//! keyword/effect-family vocabulary the data model enumerates. It is not a
//! card-catalog engine: there is no card-text parser and no scripting
//! surface, only the handful of effect families the kernel itself is
//! allowed to recognize. It exists so `find_best_move` can be driven and
//! tested end to end without a host application's own rules engine.

use crate::ai::keyword_oracle;
use crate::core::keyword::TargetGroup;
use crate::core::{CardType, EffectFamilyTag, Keyword, TriggerEvent};
use crate::game::State;
use crate::moves::AttackTarget;
use crate::sim::simulator::{ExecuteResult, SelectionCallbacks, SelectionRequest, SimAction, Simulator};
use crate::zones::Zone;

#[derive(Debug, Default, Clone, Copy)]
pub struct RulesEngine;

impl RulesEngine {
    pub fn new() -> Self {
        RulesEngine
    }

    fn kill_creature(state: &mut State, player_index: usize, slot: usize) {
        let Some(card_id) = state.players[player_index].field[slot] else {
            return;
        };
        state.players[player_index].field[slot] = None;
        let is_token = state
            .cards
            .get(card_id)
            .map(|c| c.is_token)
            .unwrap_or(false);
        if is_token {
            state.players[player_index].exile.add(card_id);
        } else {
            state.players[player_index].carrion.add(card_id);
        }
    }

    fn sweep_dead(state: &mut State) {
        for player_index in 0..2 {
            for slot in 0..state.players[player_index].field.len() {
                if let Some(card_id) = state.players[player_index].field[slot] {
                    let dead = state
                        .cards
                        .get(card_id)
                        .map(|c| c.current_hp <= 0)
                        .unwrap_or(false);
                    if dead {
                        Self::kill_creature(state, player_index, slot);
                    }
                }
            }
        }
    }

    fn resolve_target_group(state: &State, caster_index: usize, group: TargetGroup) -> Vec<crate::core::CardId> {
        let opp_index = state.opponent_index(caster_index);
        let friendly_field = || state.players[caster_index].field_creatures();
        let enemy_field = || state.players[opp_index].field_creatures();

        let is_predator = |id: crate::core::CardId| {
            state
                .cards
                .get(id)
                .map(|c| matches!(c.card_type, CardType::Predator))
                .unwrap_or(false)
        };
        let is_prey =
            |id: crate::core::CardId| state.cards.get(id).map(|c| matches!(c.card_type, CardType::Prey)).unwrap_or(false);

        match group {
            TargetGroup::FriendlyCreatures | TargetGroup::FriendlyCreature => friendly_field().collect(),
            TargetGroup::FriendlyPredators | TargetGroup::FriendlyPredator => {
                friendly_field().filter(|id| is_predator(*id)).collect()
            }
            TargetGroup::FriendlyPrey => friendly_field().filter(|id| is_prey(*id)).collect(),
            TargetGroup::EnemyCreatures | TargetGroup::EnemyCreature => enemy_field().collect(),
            TargetGroup::EnemyPredators | TargetGroup::EnemyPredator => {
                enemy_field().filter(|id| is_predator(*id)).collect()
            }
            TargetGroup::EnemyPrey => enemy_field().filter(|id| is_prey(*id)).collect(),
            TargetGroup::AllCreatures | TargetGroup::AnyCreature => {
                friendly_field().chain(enemy_field()).collect()
            }
            TargetGroup::Carrion => state.players[caster_index]
                .carrion
                .cards
                .iter()
                .chain(state.players[opp_index].carrion.cards.iter())
                .copied()
                .collect(),
            TargetGroup::FriendlyCarrion => state.players[caster_index].carrion.cards.to_vec(),
            TargetGroup::EnemyCarrion => state.players[opp_index].carrion.cards.to_vec(),
        }
    }

    fn available_prey(state: &State, player_index: usize, predator: crate::core::CardId) -> Vec<crate::core::CardId> {
        state.players[player_index]
            .field_creatures()
            .filter(|&id| id != predator)
            .filter(|&id| {
                state
                    .cards
                    .get(id)
                    .map(|c| matches!(c.card_type, CardType::Prey) && !c.has_raw_keyword(Keyword::Inedible))
                    .unwrap_or(false)
            })
            .collect()
    }

    fn apply_effect(
        state: &mut State,
        caster_index: usize,
        tag: &EffectFamilyTag,
        chosen_target: Option<crate::core::CardId>,
    ) {
        let opp_index = state.opponent_index(caster_index);
        match tag {
            EffectFamilyTag::DamageOpponent => {
                state.players[opp_index].lose_hp(3);
            }
            EffectFamilyTag::Heal => {
                state.players[caster_index].gain_hp(3);
            }
            EffectFamilyTag::Draw => {
                state.draw_card(caster_index);
            }
            EffectFamilyTag::DamageAllEnemyCreatures | EffectFamilyTag::DamageAll => {
                for id in state.players[opp_index].field_creatures().collect::<Vec<_>>() {
                    if let Ok(card) = state.cards.get_mut(id) {
                        card.current_hp -= 2;
                    }
                }
                Self::sweep_dead(state);
            }
            EffectFamilyTag::KillAllEnemyCreatures | EffectFamilyTag::KillAll => {
                for id in state.players[opp_index].field_creatures().collect::<Vec<_>>() {
                    if let Ok(card) = state.cards.get_mut(id) {
                        card.current_hp = 0;
                    }
                }
                Self::sweep_dead(state);
            }
            EffectFamilyTag::FreezeAllEnemies | EffectFamilyTag::FreezeAllCreatures => {
                for id in state.players[opp_index].field_creatures().collect::<Vec<_>>() {
                    if let Ok(card) = state.cards.get_mut(id) {
                        card.frozen = true;
                    }
                }
            }
            EffectFamilyTag::Damage | EffectFamilyTag::DamageCreature => {
                if let Some(target) = chosen_target {
                    if let Ok(card) = state.cards.get_mut(target) {
                        card.current_hp -= 3;
                    }
                }
                Self::sweep_dead(state);
            }
            EffectFamilyTag::Kill | EffectFamilyTag::DestroyCreature => {
                if let Some(target) = chosen_target {
                    if let Ok(card) = state.cards.get_mut(target) {
                        card.current_hp = 0;
                    }
                }
                Self::sweep_dead(state);
            }
            EffectFamilyTag::SelectFromGroup { damage, steal, .. } => {
                if let Some(target) = chosen_target {
                    if let Some(amount) = damage {
                        if let Ok(card) = state.cards.get_mut(target) {
                            card.current_hp -= amount;
                        }
                        Self::sweep_dead(state);
                    }
                    if *steal {
                        if let Some(slot) = state.players[caster_index].first_empty_slot() {
                            for p in 0..2 {
                                if let Some(s) = state.players[p].field.iter().position(|c| *c == Some(target)) {
                                    state.players[p].field[s] = None;
                                    state.players[caster_index].field[slot] = Some(target);
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn execute_play_card(
        &self,
        state: &State,
        actor_index: usize,
        card_id: crate::core::CardId,
        slot: Option<usize>,
        dry_drop: bool,
        is_free: bool,
        callbacks: &mut dyn SelectionCallbacks,
    ) -> ExecuteResult {
        let mut state = state.clone();

        if !state.phase.permits_card_plays() {
            return ExecuteResult::failed(state, "cards can only be played in Main phase");
        }
        if !state.players[actor_index].hand.contains(card_id) {
            return ExecuteResult::failed(state, "card is not in hand");
        }
        let (card_type, already_limited) = match state.cards.get(card_id) {
            Ok(card) => (card.card_type, state.card_played_this_turn),
            Err(_) => return ExecuteResult::failed(state, "unknown card"),
        };
        if already_limited && !is_free {
            return ExecuteResult::failed(state, "one non-free card per turn already played");
        }

        if card_type.is_creature_like() {
            let target_slot = match slot.or_else(|| state.players[actor_index].first_empty_slot()) {
                Some(s) => s,
                None => return ExecuteResult::failed(state, "no empty field slot"),
            };
            if state.players[actor_index].field[target_slot].is_some() {
                return ExecuteResult::failed(state, "slot is occupied");
            }

            if matches!(card_type, CardType::Predator) && !dry_drop {
                let prey = Self::available_prey(&state, actor_index, card_id);
                if prey.is_empty() {
                    return ExecuteResult::failed(state, "no prey available to consume");
                }
                let request = SelectionRequest::SelectConsumption {
                    available_prey: prey,
                    predator: card_id,
                    empty_slot: target_slot,
                    is_free,
                };
                match callbacks.on_selection_needed(&request) {
                    Some(crate::moves::Selection::Consumption { values }) => {
                        let mut nutrition_sum = 0;
                        for prey_id in &values {
                            if let Ok(prey_card) = state.cards.get(*prey_id) {
                                nutrition_sum += prey_card.nutrition;
                            }
                            state.players[actor_index].field.iter_mut().for_each(|s| {
                                if *s == Some(*prey_id) {
                                    *s = None;
                                }
                            });
                            let is_token = state
                                .cards
                                .get(*prey_id)
                                .map(|c| c.is_token)
                                .unwrap_or(false);
                            if is_token {
                                state.players[actor_index].exile.add(*prey_id);
                            } else {
                                state.players[actor_index].carrion.add(*prey_id);
                            }
                        }
                        state.players[actor_index].hand.remove(card_id);
                        if let Ok(card) = state.cards.get_mut(card_id) {
                            card.dry_dropped = false;
                            card.summoned_turn = state.turn;
                            card.current_atk += nutrition_sum / 2;
                        }
                        state.players[actor_index].field[target_slot] = Some(card_id);
                    }
                    Some(_) => return ExecuteResult::failed(state, "wrong selection kind for consumption"),
                    None => return ExecuteResult::awaiting_selection(state),
                }
            } else {
                state.players[actor_index].hand.remove(card_id);
                if let Ok(card) = state.cards.get_mut(card_id) {
                    card.dry_dropped = dry_drop;
                    card.summoned_turn = state.turn;
                }
                state.players[actor_index].field[target_slot] = Some(card_id);
            }
        } else {
            let effect = state
                .cards
                .get(card_id)
                .ok()
                .and_then(|c| c.effects.get(&TriggerEvent::OnPlay).cloned());

            if let Some(tag) = &effect {
                let needs_target = matches!(tag, EffectFamilyTag::SelectFromGroup { .. })
                    || matches!(
                        tag,
                        EffectFamilyTag::Damage | EffectFamilyTag::DamageCreature | EffectFamilyTag::Kill | EffectFamilyTag::DestroyCreature
                    );
                if needs_target {
                    let group = match tag {
                        EffectFamilyTag::SelectFromGroup { kind, .. } => *kind,
                        _ => TargetGroup::EnemyCreature,
                    };
                    let candidates = Self::resolve_target_group(&state, actor_index, group);
                    if candidates.is_empty() {
                        return ExecuteResult::failed(state, "no valid targets for this effect");
                    }
                    let request = SelectionRequest::SelectTarget {
                        candidates: candidates.clone(),
                    };
                    match callbacks.on_selection_needed(&request) {
                        Some(crate::moves::Selection::Target { value }) => {
                            Self::apply_effect(&mut state, actor_index, tag, Some(value));
                        }
                        Some(_) => return ExecuteResult::failed(state, "wrong selection kind for spell target"),
                        None => return ExecuteResult::awaiting_selection(state),
                    }
                } else {
                    Self::apply_effect(&mut state, actor_index, tag, None);
                }
            }
            state.players[actor_index].hand.remove(card_id);
            state.players[actor_index].exile.add(card_id);
        }

        if !is_free {
            state.card_played_this_turn = true;
        }
        ExecuteResult::ok(state)
    }

    fn execute_declare_attack(
        &self,
        state: &State,
        actor_index: usize,
        attacker_id: crate::core::CardId,
        target: AttackTarget,
    ) -> ExecuteResult {
        let mut state = state.clone();
        let opp_index = state.opponent_index(actor_index);

        if !state.players[actor_index].field_creatures().any(|id| id == attacker_id) {
            return ExecuteResult::failed(state, "attacker is not on your field");
        }
        let attacker = match state.cards.get(attacker_id) {
            Ok(c) => c.clone(),
            Err(_) => return ExecuteResult::failed(state, "unknown attacker"),
        };
        if !keyword_oracle::can_attack(&attacker) {
            return ExecuteResult::failed(state, "attacker cannot attack");
        }

        match target {
            AttackTarget::Player => {
                state.players[opp_index].lose_hp(attacker.current_atk);
            }
            AttackTarget::Creature { instance_id } => {
                let defender = match state.cards.get(instance_id) {
                    Ok(c) => c.clone(),
                    Err(_) => return ExecuteResult::failed(state, "unknown defender"),
                };

                let dmg_to_def = if keyword_oracle::has_barrier(&defender) {
                    0
                } else {
                    attacker.current_atk
                };
                let dmg_to_atk = if keyword_oracle::has_barrier(&attacker) {
                    0
                } else {
                    defender.current_atk
                };

                let mut we_kill = dmg_to_def >= defender.current_hp
                    || (keyword_oracle::has_toxic(&attacker) && dmg_to_def > 0);
                let mut they_kill = dmg_to_atk >= attacker.current_hp
                    || (keyword_oracle::has_toxic(&defender) && dmg_to_atk > 0)
                    || (keyword_oracle::has_neurotoxic(&defender) && dmg_to_def > 0);
                if keyword_oracle::has_ambush(&attacker) && we_kill {
                    they_kill = false;
                }
                if keyword_oracle::has_ambush(&defender) && they_kill {
                    we_kill = false;
                }

                if let Ok(card) = state.cards.get_mut(instance_id) {
                    card.current_hp -= dmg_to_def;
                    if we_kill {
                        card.current_hp = card.current_hp.min(0);
                    }
                    if dmg_to_def > 0 && card.has_barrier {
                        card.has_barrier = false;
                    }
                }
                if let Ok(card) = state.cards.get_mut(attacker_id) {
                    card.current_hp -= dmg_to_atk;
                    if they_kill {
                        card.current_hp = card.current_hp.min(0);
                    }
                    if dmg_to_atk > 0 && card.has_barrier {
                        card.has_barrier = false;
                    }
                }
            }
        }

        if let Ok(card) = state.cards.get_mut(attacker_id) {
            card.has_attacked = true;
        }
        Self::sweep_dead(&mut state);
        ExecuteResult::ok(state)
    }

    fn execute_end_turn(&self, state: &State) -> ExecuteResult {
        let mut state = state.clone();
        let next_index = state.opponent_index(state.active_player_index);
        state.active_player_index = next_index;
        state.turn += 1;
        state.phase = crate::game::Phase::Main;
        state.card_played_this_turn = false;
        state.pending_consumption = false;
        state.extended_consumption = false;
        state.pending_reaction = false;
        state.pending_placement = false;

        for id in state.players[next_index].field_creatures().collect::<Vec<_>>() {
            if let Ok(card) = state.cards.get_mut(id) {
                card.has_attacked = false;
                card.frozen = false;
                card.paralyzed = false;
                card.webbed = false;
            }
        }
        state.draw_card(next_index);
        ExecuteResult::ok(state)
    }
}

impl Simulator for RulesEngine {
    fn clone_state(&self, state: &State) -> State {
        state.clone_for_simulation()
    }

    fn execute(
        &self,
        state: &State,
        action: SimAction,
        actor_index: usize,
        callbacks: &mut dyn SelectionCallbacks,
    ) -> ExecuteResult {
        match action {
            SimAction::PlayCard {
                card,
                slot,
                dry_drop,
                is_free,
            } => self.execute_play_card(state, actor_index, card, slot, dry_drop, is_free, callbacks),
            SimAction::DeclareAttack {
                attacker_instance_id,
                target,
            } => self.execute_declare_attack(state, actor_index, attacker_instance_id, target),
            SimAction::SelectConsumptionTargets { .. } => {
                ExecuteResult::failed(state.clone(), "no pending consumption to resolve")
            }
            SimAction::EndTurn => self.execute_end_turn(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, EntityStore, Player};
    use crate::game::Phase;
    use crate::sim::simulator::NoSelections;

    fn fresh_state() -> (State, crate::core::PlayerId, crate::core::PlayerId) {
        let mut players: EntityStore<Player> = EntityStore::new();
        let p0 = players.next_id();
        let p1 = players.next_id();
        let mut state = State::new_two_player(Player::new(p0, "Alice"), Player::new(p1, "Bob"));
        state.phase = Phase::Main;
        (state, p0, p1)
    }

    #[test]
    fn attack_reduces_opponent_hp() {
        let (mut state, ..) = fresh_state();
        let bear_id = state.next_card_id();
        let mut bear = Card::new(bear_id, "bear", CardType::Creature, 4, 4);
        bear.summoned_turn = state.turn;
        state.cards.insert(bear_id, bear);
        state.players[0].field[0] = Some(bear_id);

        let engine = RulesEngine::new();
        let result = engine.execute(
            &state,
            SimAction::DeclareAttack {
                attacker_instance_id: bear_id,
                target: AttackTarget::Player,
            },
            0,
            &mut NoSelections,
        );
        assert!(result.success);
        assert_eq!(result.state.players[1].hp, 6);
    }

    #[test]
    fn barrier_absorbs_exactly_one_hit() {
        let (mut state, ..) = fresh_state();
        let atk_id = state.next_card_id();
        let mut attacker = Card::new(atk_id, "striker", CardType::Creature, 3, 3);
        attacker.summoned_turn = state.turn;
        state.cards.insert(atk_id, attacker);
        state.players[0].field[0] = Some(atk_id);

        let def_id = state.next_card_id();
        let mut defender = Card::new(def_id, "shielded", CardType::Creature, 3, 3);
        defender.has_barrier = true;
        state.cards.insert(def_id, defender);
        state.players[1].field[0] = Some(def_id);

        let engine = RulesEngine::new();
        let result = engine.execute(
            &state,
            SimAction::DeclareAttack {
                attacker_instance_id: atk_id,
                target: AttackTarget::Creature { instance_id: def_id },
            },
            0,
            &mut NoSelections,
        );
        assert!(result.success);
        let defender_after = result.state.cards.get(def_id).unwrap();
        assert_eq!(defender_after.current_hp, 3);
        assert!(!defender_after.has_barrier);
        // Attacker took the counter-hit and died.
        assert_eq!(result.state.players[0].field[0], None);
    }

    #[test]
    fn end_turn_flips_active_player_and_draws() {
        let (mut state, ..) = fresh_state();
        let card_id = state.next_card_id();
        let card = Card::new(card_id, "seed", CardType::Creature, 1, 1);
        state.cards.insert(card_id, card);
        state.players[1].deck.add(card_id);

        let engine = RulesEngine::new();
        let result = engine.execute(&state, SimAction::EndTurn, 0, &mut NoSelections);
        assert!(result.success);
        assert_eq!(result.state.active_player_index, 1);
        assert_eq!(result.state.turn, 2);
        assert!(!result.state.card_played_this_turn);
        assert_eq!(result.state.players[1].hand.len(), 1);
    }
}
