//! Pairwise and whole-phase combat scoring
//!
//! Generalizes a per-attacker combat-math heuristic into a reusable trade
//! classifier (`analyze_trade`), a per-attack scorer (`evaluate_attack`), a
//! best-target chooser, and a whole-combat-phase planner.

use crate::ai::{keyword_oracle, threat_analyzer};
use crate::core::{Card, CardId};
use crate::game::State;
use crate::moves::AttackTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOutcome {
    WeWin,
    Trade,
    WeLose,
    Neither,
}

#[derive(Debug, Clone)]
pub struct PlannedAttack {
    pub attacker: CardId,
    pub target: AttackTarget,
    pub score: i32,
}

#[derive(Debug, Clone)]
pub struct CombatPlan {
    pub attacks: Vec<PlannedAttack>,
    /// Set when the plan is "swing everything at the opponent's face", in
    /// which case `attacks` targets only `AttackTarget::Player`.
    pub is_lethal_plan: bool,
}

fn card(state: &State, id: CardId) -> Option<&Card> {
    state.cards.get(id).ok()
}

/// `atk + hp`, the value unit the trade-outcome formulas use (distinct from
/// the board-value formula `2*atk + hp` the position evaluator uses).
fn combat_value(card: &Card) -> i32 {
    card.current_atk + card.current_hp
}

/// Symmetric pairwise combat exchange. Ambush on the attacker negates the
/// defender's ability to kill back (the attacker strikes before it can be
/// struck); nothing negates the attacker's own kill.
pub fn analyze_trade(state: &State, attacker: CardId, defender: CardId) -> TradeOutcome {
    let (Some(att), Some(def)) = (card(state, attacker), card(state, defender)) else {
        return TradeOutcome::Neither;
    };

    let dmg_to_def = if keyword_oracle::has_barrier(def) {
        0
    } else {
        att.current_atk
    };
    let dmg_to_att = if keyword_oracle::has_barrier(att) {
        0
    } else {
        def.current_atk
    };

    let we_kill = dmg_to_def >= def.current_hp || (keyword_oracle::has_toxic(att) && dmg_to_def > 0);
    let mut they_kill =
        dmg_to_att >= att.current_hp || (keyword_oracle::has_toxic(def) && dmg_to_att > 0);
    if keyword_oracle::has_ambush(att) && we_kill {
        they_kill = false;
    }

    match (we_kill, they_kill) {
        (true, false) => TradeOutcome::WeWin,
        (true, true) => TradeOutcome::Trade,
        (false, true) => TradeOutcome::WeLose,
        (false, false) => TradeOutcome::Neither,
    }
}

pub fn evaluate_attack(state: &State, attacker: CardId, target: AttackTarget, me: usize) -> i32 {
    let Some(att) = card(state, attacker) else {
        return 0;
    };
    let opp_index = state.opponent_index(me);

    match target {
        AttackTarget::Player => {
            let opp_hp = state.player(opp_index).hp;
            if att.current_atk >= opp_hp {
                return 1000;
            }
            let has_blockers = state.player(opp_index).field_creatures().next().is_some();
            let mut score = 10 * att.current_atk;
            if !has_blockers {
                score += 15;
            }
            if opp_hp <= 5 {
                score += 10;
            }
            score
        }
        AttackTarget::Creature { instance_id } => {
            let Some(def) = card(state, instance_id) else {
                return 0;
            };
            let trade = analyze_trade(state, attacker, instance_id);
            let dmg_to_def = if keyword_oracle::has_barrier(def) {
                0
            } else {
                att.current_atk
            };
            let mut score = match trade {
                TradeOutcome::WeWin => 30 + combat_value(def),
                TradeOutcome::Trade => 15 + (combat_value(def) - combat_value(att)),
                TradeOutcome::WeLose => -20,
                TradeOutcome::Neither => 2 + dmg_to_def,
            };

            let ranked = threat_analyzer::rank_threats(state, me);
            if let Some(rank) = ranked.iter().position(|(id, _, _)| *id == instance_id) {
                if rank == 0 {
                    score += 15;
                } else if rank == 1 {
                    score += 8;
                }
            }

            let must_kills = threat_analyzer::find_must_kill_targets(state, me);
            let kills = matches!(trade, TradeOutcome::WeWin | TradeOutcome::Trade);
            if let Some(must_kill) = must_kills.iter().find(|t| t.creature == instance_id) {
                if kills {
                    match must_kill.priority {
                        threat_analyzer::MustKillPriority::Critical => score += 200,
                        threat_analyzer::MustKillPriority::High => score += 25,
                    }
                }
            }

            if keyword_oracle::has_neurotoxic(def) && !kills {
                score -= 15;
            }

            score
        }
    }
}

/// Best target for one attacker, short-circuiting with a +500 bonus the
/// moment a killable critical must-kill target is found rather than scoring
/// every remaining candidate.
pub fn find_best_target(state: &State, attacker: CardId, me: usize) -> Option<(AttackTarget, i32)> {
    let opp_index = state.opponent_index(me);
    let must_kills = threat_analyzer::find_must_kill_targets(state, me);

    let mut best: Option<(AttackTarget, i32)> = None;
    for instance_id in state.player(opp_index).field_creatures() {
        if card(state, instance_id)
            .map(keyword_oracle::is_hidden)
            .unwrap_or(true)
        {
            continue;
        }
        let target = AttackTarget::Creature { instance_id };
        let score = evaluate_attack(state, attacker, target.clone(), me);

        let is_critical_kill = must_kills.iter().any(|t| {
            t.creature == instance_id
                && matches!(t.priority, threat_analyzer::MustKillPriority::Critical)
        }) && matches!(
            analyze_trade(state, attacker, instance_id),
            TradeOutcome::WeWin | TradeOutcome::Trade
        );
        if is_critical_kill {
            return Some((target, score + 500));
        }

        if best.as_ref().map(|(_, s)| score > *s).unwrap_or(true) {
            best = Some((target, score));
        }
    }

    let face_score = evaluate_attack(state, attacker, AttackTarget::Player, me);
    if best.as_ref().map(|(_, s)| face_score > *s).unwrap_or(true) {
        best = Some((AttackTarget::Player, face_score));
    }

    best
}

pub fn plan_combat_phase(state: &State, me: usize) -> CombatPlan {
    let attackers: Vec<CardId> = state
        .player(me)
        .field_creatures()
        .filter(|&id| {
            card(state, id)
                .map(|c| keyword_oracle::can_attack_player(c, state.turn))
                .unwrap_or(false)
        })
        .collect();

    let face_lethal = threat_analyzer::detect_our_lethal(state, me);
    if face_lethal.is_lethal {
        let attacks = attackers
            .iter()
            .map(|&attacker| PlannedAttack {
                attacker,
                target: AttackTarget::Player,
                score: 1000,
            })
            .collect();
        return CombatPlan {
            attacks,
            is_lethal_plan: true,
        };
    }

    let mut attacks: Vec<PlannedAttack> = attackers
        .into_iter()
        .filter_map(|attacker| {
            find_best_target(state, attacker, me).map(|(target, score)| PlannedAttack {
                attacker,
                target,
                score,
            })
        })
        .filter(|a| a.score > -50)
        .collect();
    attacks.sort_by(|a, b| b.score.cmp(&a.score));

    CombatPlan {
        attacks,
        is_lethal_plan: false,
    }
}
