//! Whole-board threat assessment
//!
//! Generalizes the combat-math style of a per-attacker heuristic controller
//! into whole-board lethal detection, threat ranking, and kill-combination
//! search. All operations are total: degenerate states (no creatures, no
//! valid attackers) return safe defaults rather than erroring.

use crate::ai::keyword_oracle;
use crate::core::{Card, CardId, Keyword};
use crate::game::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LethalReport {
    pub is_lethal: bool,
    pub damage: i32,
    /// Positive = damage beyond what's needed (surplus); negative = how
    /// much more damage is required (deficit), expressed as a signed delta.
    pub deficit_or_surplus: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MustKillPriority {
    Critical,
    High,
}

#[derive(Debug, Clone)]
pub struct MustKillTarget {
    pub creature: CardId,
    pub priority: MustKillPriority,
}

#[derive(Debug, Clone)]
pub struct KillOption {
    pub attackers: Vec<CardId>,
}

#[derive(Debug, Clone, Default)]
pub struct SurvivalOptions {
    pub kill_options: Vec<KillOption>,
    pub softening_damage: i32,
    pub blockers: Vec<CardId>,
    pub critical_threats: Vec<MustKillTarget>,
}

fn card(state: &State, id: CardId) -> Option<&Card> {
    state.cards.get(id).ok()
}

/// Sum of `current_atk` over a side's field creatures that `can_attack` and
/// are either Haste or were summoned before the current turn.
fn attack_potential(state: &State, side_index: usize) -> i32 {
    state
        .players[side_index]
        .field_creatures()
        .filter_map(|id| card(state, id))
        .filter(|c| keyword_oracle::can_attack(c) && (keyword_oracle::has_haste(c) || c.summoned_turn < state.turn))
        .map(|c| c.current_atk)
        .sum()
}

pub fn assess_incoming_damage(state: &State, me: usize) -> i32 {
    attack_potential(state, state.opponent_index(me))
}

/// Analogous to `assess_incoming_damage`, additionally excluding creatures
/// that have already attacked this turn (already excluded by `can_attack`,
/// kept as a distinct entry point since the two sides use different actor
/// perspectives).
pub fn assess_outgoing_damage(state: &State, me: usize) -> i32 {
    attack_potential(state, me)
}

pub fn detect_lethal(state: &State, target_index: usize, incoming_damage: i32) -> LethalReport {
    let hp = state.player(target_index).hp;
    let is_lethal = incoming_damage >= hp;
    LethalReport {
        is_lethal,
        damage: incoming_damage,
        deficit_or_surplus: incoming_damage - hp,
    }
}

pub fn detect_our_lethal(state: &State, me: usize) -> LethalReport {
    let damage = assess_outgoing_damage(state, me);
    detect_lethal(state, state.opponent_index(me), damage)
}

pub fn detect_opponent_lethal(state: &State, me: usize) -> LethalReport {
    let damage = assess_incoming_damage(state, me);
    detect_lethal(state, me, damage)
}

/// `(creature, score, reasons)`, descending by score.
pub fn rank_threats(state: &State, me: usize) -> Vec<(CardId, i32, Vec<&'static str>)> {
    let opp_index = state.opponent_index(me);
    let mut ranked: Vec<(CardId, i32, Vec<&'static str>)> = state
        .players[opp_index]
        .field_creatures()
        .filter_map(|id| card(state, id).map(|c| (id, c)))
        .map(|(id, c)| {
            let (score, reasons) = threat_score(c);
            (id, score, reasons)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn threat_score(card: &Card) -> (i32, Vec<&'static str>) {
    let mut score = 0i32;
    let mut reasons = Vec::new();

    score += 10 * card.current_atk;
    score += 2 * card.current_hp;
    if keyword_oracle::can_attack(card) {
        score += 10;
        reasons.push("can attack this turn");
    }
    if keyword_oracle::has_toxic(card) {
        score += 25;
        reasons.push("Toxic");
    }
    if keyword_oracle::has_neurotoxic(card) {
        score += 20;
        reasons.push("Neurotoxic");
    }
    if keyword_oracle::has_ambush(card) {
        score += 15;
        reasons.push("Ambush");
    }
    if keyword_oracle::is_invisible(card) {
        score += 15;
        reasons.push("Invisible");
    }
    if keyword_oracle::has_barrier(card) {
        score += 10;
        reasons.push("Barrier");
    }
    if keyword_oracle::is_hidden(card) {
        score += 10;
        reasons.push("Hidden");
    }
    if card.has_raw_keyword(Keyword::Poisonous) {
        score += 8;
        reasons.push("Poisonous");
    }
    if keyword_oracle::has_haste(card) {
        score += 5;
        reasons.push("Haste");
    }
    if card.effects.contains_key(&crate::core::TriggerEvent::OnBeforeCombat) {
        score += 10;
        reasons.push("onBeforeCombat");
    }
    if card.effects.contains_key(&crate::core::TriggerEvent::OnEnd) {
        score += 8;
        reasons.push("onEnd");
    }
    if card.effects.contains_key(&crate::core::TriggerEvent::OnStart) {
        score += 8;
        reasons.push("onStart");
    }
    if keyword_oracle::is_passive(card) {
        score -= 20;
        reasons.push("Passive");
    }
    if keyword_oracle::is_harmless(card) {
        score -= 25;
        reasons.push("Harmless");
    }
    if card.frozen || card.webbed {
        score -= 15;
        reasons.push("Frozen or Webbed");
    }

    (score.max(0), reasons)
}

pub fn find_must_kill_targets(state: &State, me: usize) -> Vec<MustKillTarget> {
    let opp_index = state.opponent_index(me);
    let my_hp = state.player(me).hp;
    let ranked = rank_threats(state, me);
    let threat_scores: std::collections::HashMap<CardId, i32> =
        ranked.iter().map(|(id, score, _)| (*id, *score)).collect();

    state
        .players[opp_index]
        .field_creatures()
        .filter_map(|id| card(state, id).map(|c| (id, c)))
        .filter_map(|(id, c)| {
            if c.current_atk >= my_hp {
                Some(MustKillTarget {
                    creature: id,
                    priority: MustKillPriority::Critical,
                })
            } else if keyword_oracle::has_toxic(c) || threat_scores.get(&id).copied().unwrap_or(0) >= 60 {
                Some(MustKillTarget {
                    creature: id,
                    priority: MustKillPriority::High,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Every attacker that alone can kill `target`, and every unordered pair
/// whose summed damage does. Sorted by fewest losses (solo solutions first).
pub fn analyze_kill_options(state: &State, target: CardId, me: usize) -> Vec<KillOption> {
    let Some(target_card) = card(state, target) else {
        return Vec::new();
    };
    let target_hp = target_card.current_hp;
    let target_has_barrier = keyword_oracle::has_barrier(target_card);

    let attackers: Vec<(CardId, &Card)> = state
        .players[me]
        .field_creatures()
        .filter_map(|id| card(state, id).map(|c| (id, c)))
        .filter(|(_, c)| keyword_oracle::can_attack(c))
        .collect();

    let kills_alone = |c: &Card| -> bool {
        let dmg = if target_has_barrier { 0 } else { c.current_atk };
        dmg >= target_hp || (keyword_oracle::has_toxic(c) && dmg > 0)
    };

    let mut options = Vec::new();
    for (id, c) in &attackers {
        if kills_alone(c) {
            options.push(KillOption {
                attackers: vec![*id],
            });
        }
    }

    if options.is_empty() {
        for i in 0..attackers.len() {
            for j in (i + 1)..attackers.len() {
                let (id_a, a) = attackers[i];
                let (id_b, b) = attackers[j];
                let dmg = if target_has_barrier {
                    0
                } else {
                    a.current_atk + b.current_atk
                };
                let toxic_assist = keyword_oracle::has_toxic(a) || keyword_oracle::has_toxic(b);
                if dmg >= target_hp || (toxic_assist && dmg > 0) {
                    options.push(KillOption {
                        attackers: vec![id_a, id_b],
                    });
                }
            }
        }
    }

    options.sort_by_key(|o| o.attackers.len());
    options
}

pub fn analyze_softening_potential(state: &State, me: usize) -> (i32, i32) {
    let max_damage = assess_outgoing_damage(state, me);
    let opp_index = state.opponent_index(me);
    let remaining = (state.player(opp_index).hp - max_damage).max(0);
    (max_damage, remaining)
}

/// Lure creatures, and any creature with at least 2 HP, count as blockers.
pub fn analyze_defensive_position(state: &State, me: usize) -> Vec<CardId> {
    state
        .players[me]
        .field_creatures()
        .filter(|&id| {
            card(state, id)
                .map(|c| keyword_oracle::has_lure(c) || c.current_hp >= 2)
                .unwrap_or(false)
        })
        .collect()
}

pub fn analyze_survival_options(state: &State, me: usize) -> SurvivalOptions {
    let opponent_lethal = detect_opponent_lethal(state, me);
    let must_kills = find_must_kill_targets(state, me);
    let mut kill_options = Vec::new();
    for target in &must_kills {
        kill_options.extend(analyze_kill_options(state, target.creature, me));
    }
    let (softening_damage, _) = analyze_softening_potential(state, me);
    let blockers = analyze_defensive_position(state, me);

    SurvivalOptions {
        kill_options,
        softening_damage,
        blockers,
        critical_threats: if opponent_lethal.is_lethal {
            must_kills
                .into_iter()
                .filter(|t| matches!(t.priority, MustKillPriority::Critical))
                .collect()
        } else {
            Vec::new()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardType, EntityStore, Player};

    fn state_with_attacker(atk: i32, hp: i32) -> (State, usize) {
        let mut players: EntityStore<Player> = EntityStore::new();
        let p0 = players.next_id();
        let p1 = players.next_id();
        let mut state = State::new_two_player(Player::new(p0, "Us"), Player::new(p1, "Them"));
        let id = state.next_card_id();
        let mut c = Card::new(id, "bear", CardType::Creature, atk, hp);
        c.summoned_turn = 0;
        state.turn = 1;
        state.cards.insert(id, c);
        state.players[0].field[0] = Some(id);
        (state, 0)
    }

    #[test]
    fn lethal_detected_when_damage_meets_hp() {
        let (state, me) = state_with_attacker(10, 4);
        let report = detect_our_lethal(&state, me);
        assert!(report.is_lethal);
        assert_eq!(report.damage, 10);
    }

    #[test]
    fn must_kill_critical_when_attack_meets_our_hp() {
        let mut players: EntityStore<Player> = EntityStore::new();
        let p0 = players.next_id();
        let p1 = players.next_id();
        let mut state = State::new_two_player(Player::new(p0, "Us"), Player::new(p1, "Them"));
        state.players[0].hp = 8;
        let goblin_id = state.next_card_id();
        let mut goblin = Card::new(goblin_id, "goblin", CardType::Creature, 9, 1);
        goblin.summoned_turn = 0;
        state.turn = 1;
        state.cards.insert(goblin_id, goblin);
        state.players[1].field[0] = Some(goblin_id);

        let targets = find_must_kill_targets(&state, 0);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].priority, MustKillPriority::Critical);

        let archer_id = state.next_card_id();
        let archer = Card::new(archer_id, "archer", CardType::Creature, 3, 3);
        state.cards.insert(archer_id, archer);
        state.players[0].field[0] = Some(archer_id);

        let options = analyze_kill_options(&state, goblin_id, 0);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].attackers, vec![archer_id]);
    }

    #[test]
    fn degenerate_board_returns_safe_defaults() {
        let mut players: EntityStore<Player> = EntityStore::new();
        let p0 = players.next_id();
        let p1 = players.next_id();
        let state = State::new_two_player(Player::new(p0, "Us"), Player::new(p1, "Them"));
        assert!(rank_threats(&state, 0).is_empty());
        assert!(find_must_kill_targets(&state, 0).is_empty());
        assert_eq!(assess_incoming_damage(&state, 0), 0);
    }
}
