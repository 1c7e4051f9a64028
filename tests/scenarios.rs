//! Literal end-to-end scenarios from the decision-kernel contract.
//!
//! Each test builds one fixed, deterministic board and checks the exact
//! outcome the kernel is contractually required to produce for it.

use duel_kernel::ai::{combat_evaluator, threat_analyzer};
use duel_kernel::core::{Card, CardType, EntityStore, Keyword, Player};
use duel_kernel::game::{Phase, State};
use duel_kernel::moves::{AttackTarget, Move};
use duel_kernel::sim::RulesEngine;
use duel_kernel::{find_best_move, KernelConfig, KernelLogger};

fn fresh_state() -> State {
    let mut players: EntityStore<Player> = EntityStore::new();
    let p0 = players.next_id();
    let p1 = players.next_id();
    let mut state = State::new_two_player(Player::new(p0, "Us"), Player::new(p1, "Them"));
    state.phase = Phase::Main;
    state
}

/// Scenario 1: lethal on board routes every attacker into the opponent's
/// face with a score above the lethal ceiling.
#[test]
fn scenario_lethal_on_board() {
    let mut state = fresh_state();
    state.players[1].hp = 3;

    let bear_id = state.next_card_id();
    let mut bear = Card::new(bear_id, "bear", CardType::Creature, 4, 4).with_keyword(Keyword::Haste);
    bear.summoned_turn = state.turn;
    state.cards.insert(bear_id, bear);
    state.players[0].field[0] = Some(bear_id);

    let wolf_id = state.next_card_id();
    let mut wolf = Card::new(wolf_id, "wolf", CardType::Creature, 2, 2);
    wolf.summoned_turn = 0;
    state.turn = 1;
    state.cards.insert(wolf_id, wolf);
    state.players[0].field[1] = Some(wolf_id);

    let engine = RulesEngine::new();
    let config = KernelConfig {
        max_depth: 3,
        max_time_ms: 1000,
        ..Default::default()
    };
    let logger = KernelLogger::new();
    let result = find_best_move(&engine, &state, 0, &config, &logger);

    assert!(result.score >= 1000, "expected lethal score, got {}", result.score);
    assert!(matches!(
        result.mv,
        Some(Move::Attack {
            target: AttackTarget::Player,
            ..
        })
    ));

    let plan = combat_evaluator::plan_combat_phase(&state, 0);
    assert!(plan.is_lethal_plan);
    assert!(plan
        .attacks
        .iter()
        .all(|a| matches!(a.target, AttackTarget::Player)));
}

/// Scenario 2: a critical must-kill target has exactly one single-attacker
/// kill solution, and the critical-kill-priority property holds.
#[test]
fn scenario_must_kill_survival() {
    let mut state = fresh_state();
    state.players[0].hp = 8;

    let goblin_id = state.next_card_id();
    let mut goblin = Card::new(goblin_id, "goblin", CardType::Creature, 9, 1);
    goblin.summoned_turn = 0;
    state.turn = 1;
    state.cards.insert(goblin_id, goblin);
    state.players[1].field[0] = Some(goblin_id);

    let archer_id = state.next_card_id();
    let archer = Card::new(archer_id, "archer", CardType::Creature, 3, 3);
    state.cards.insert(archer_id, archer);
    state.players[0].field[0] = Some(archer_id);

    let mage_id = state.next_card_id();
    let mage = Card::new(mage_id, "mage", CardType::Creature, 1, 1);
    state.cards.insert(mage_id, mage);
    state.players[0].field[1] = Some(mage_id);

    let must_kills = threat_analyzer::find_must_kill_targets(&state, 0);
    assert_eq!(must_kills.len(), 1);
    assert_eq!(
        must_kills[0].priority,
        threat_analyzer::MustKillPriority::Critical
    );

    let options = threat_analyzer::analyze_kill_options(&state, goblin_id, 0);
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].attackers, vec![archer_id]);

    let (target, score) = combat_evaluator::find_best_target(&state, archer_id, 0).unwrap();
    assert!(matches!(
        target,
        AttackTarget::Creature { instance_id } if instance_id == goblin_id
    ));
    assert!(score >= 500);
}

/// Scenario 3: a Toxic attacker trades into a much tougher creature with a
/// positive score because the defender it kills outvalues it.
#[test]
fn scenario_toxic_trade() {
    let mut state = fresh_state();
    let attacker_id = state.next_card_id();
    let attacker = Card::new(attacker_id, "viper", CardType::Creature, 2, 2).with_keyword(Keyword::Toxic);
    state.cards.insert(attacker_id, attacker);
    state.players[0].field[0] = Some(attacker_id);

    let defender_id = state.next_card_id();
    let defender = Card::new(defender_id, "ogre", CardType::Creature, 6, 6);
    state.cards.insert(defender_id, defender);
    state.players[1].field[0] = Some(defender_id);

    assert_eq!(
        combat_evaluator::analyze_trade(&state, attacker_id, defender_id),
        combat_evaluator::TradeOutcome::Trade
    );

    let score = combat_evaluator::evaluate_attack(
        &state,
        attacker_id,
        AttackTarget::Creature {
            instance_id: defender_id,
        },
        0,
    );
    // Base trade score 15 + (12 - 4) = 23, plus +15 for ranking first in
    // rank_threats and +25 for being a High-priority must-kill (threat score
    // 10*6 + 2*6 + 10 = 82 >= 60) that the trade kills.
    assert_eq!(score, 23 + 15 + 25);
}

/// Scenario 4: Barrier absorbs the hit entirely; with no Toxic assist the
/// attacker still takes lethal return damage.
#[test]
fn scenario_barrier_nullifies() {
    let mut state = fresh_state();
    let attacker_id = state.next_card_id();
    let attacker = Card::new(attacker_id, "bruiser", CardType::Creature, 3, 3);
    state.cards.insert(attacker_id, attacker);
    state.players[0].field[0] = Some(attacker_id);

    let defender_id = state.next_card_id();
    let mut defender = Card::new(defender_id, "shielded", CardType::Creature, 3, 3);
    defender.has_barrier = true;
    state.cards.insert(defender_id, defender);
    state.players[1].field[0] = Some(defender_id);

    assert_eq!(
        combat_evaluator::analyze_trade(&state, attacker_id, defender_id),
        combat_evaluator::TradeOutcome::WeLose
    );

    let score = combat_evaluator::evaluate_attack(
        &state,
        attacker_id,
        AttackTarget::Creature {
            instance_id: defender_id,
        },
        0,
    );
    // Base WeLose score -20, plus +15 for the Barrier defender ranking first
    // in rank_threats; not a must-kill (threat score 36 + 10 + 10 = 56 < 60).
    assert_eq!(score, -20 + 15);
}

/// Scenario 5: an Ambush attacker that lands a kill takes no return damage.
#[test]
fn scenario_ambush_safety() {
    let mut state = fresh_state();
    let attacker_id = state.next_card_id();
    let attacker = Card::new(attacker_id, "falcon", CardType::Creature, 4, 2).with_keyword(Keyword::Ambush);
    state.cards.insert(attacker_id, attacker);
    state.players[0].field[0] = Some(attacker_id);

    let defender_id = state.next_card_id();
    let defender = Card::new(defender_id, "brute", CardType::Creature, 3, 3);
    state.cards.insert(defender_id, defender);
    state.players[1].field[0] = Some(defender_id);

    assert_eq!(
        combat_evaluator::analyze_trade(&state, attacker_id, defender_id),
        combat_evaluator::TradeOutcome::WeWin
    );

    let score = combat_evaluator::evaluate_attack(
        &state,
        attacker_id,
        AttackTarget::Creature {
            instance_id: defender_id,
        },
        0,
    );
    assert!(score >= 30 + (3 + 3));
}

/// Scenario 6: a dry-dropped predator loses every keyword bonus even though
/// its raw keyword set is untouched.
#[test]
fn scenario_dry_drop_suppression() {
    let mut state = fresh_state();
    let predator_id = state.next_card_id();
    let mut predator = Card::new(predator_id, "viper", CardType::Predator, 3, 3)
        .with_keyword(Keyword::Haste)
        .with_keyword(Keyword::Toxic);
    predator.dry_dropped = true;
    state.cards.insert(predator_id, predator);
    state.players[0].field[0] = Some(predator_id);

    use duel_kernel::ai::keyword_oracle;
    let card = state.cards.get(predator_id).unwrap();
    assert!(!keyword_oracle::has_haste(card));
    assert!(!keyword_oracle::has_toxic(card));
    assert!(card.has_raw_keyword(Keyword::Haste));
    assert!(card.has_raw_keyword(Keyword::Toxic));

    // can_attack still works off base stats, ignoring the suppressed keywords.
    assert!(keyword_oracle::can_attack(card));
}

/// Boundary: empty hand and empty field generates only `EndTurn`.
#[test]
fn boundary_empty_hand_and_field_only_end_turn() {
    let state = fresh_state();
    let engine = RulesEngine::new();
    let moves = duel_kernel::ai::move_generator::generate_moves(&engine, &state, 0);
    assert_eq!(moves, vec![Move::EndTurn]);
}

/// Purity: a public call never mutates the input state.
#[test]
fn purity_find_best_move_does_not_mutate_input() {
    let mut state = fresh_state();
    state.players[1].hp = 3;
    let bear_id = state.next_card_id();
    let mut bear = Card::new(bear_id, "bear", CardType::Creature, 4, 4).with_keyword(Keyword::Haste);
    bear.summoned_turn = state.turn;
    state.cards.insert(bear_id, bear);
    state.players[0].field[0] = Some(bear_id);

    let before = state.clone();
    let engine = RulesEngine::new();
    let config = KernelConfig {
        max_depth: 2,
        max_time_ms: 300,
        ..Default::default()
    };
    let logger = KernelLogger::new();
    let _ = find_best_move(&engine, &state, 0, &config, &logger);

    assert_eq!(state.turn, before.turn);
    assert_eq!(state.players[0].hp, before.players[0].hp);
    assert_eq!(state.players[1].hp, before.players[1].hp);
    assert_eq!(state.cards.len(), before.cards.len());
}

/// Determinism: two runs of the same fixed state/config return identical
/// move, score, depth, and node count.
#[test]
fn determinism_same_inputs_same_result() {
    let mut state = fresh_state();
    let archer_id = state.next_card_id();
    let archer = Card::new(archer_id, "archer", CardType::Creature, 3, 3);
    state.cards.insert(archer_id, archer);
    state.players[0].field[0] = Some(archer_id);

    let goblin_id = state.next_card_id();
    let mut goblin = Card::new(goblin_id, "goblin", CardType::Creature, 9, 1);
    goblin.summoned_turn = 0;
    state.cards.insert(goblin_id, goblin);
    state.players[1].field[0] = Some(goblin_id);

    let engine = RulesEngine::new();
    let config = KernelConfig {
        max_depth: 3,
        max_time_ms: 2000,
        ..Default::default()
    };
    let logger = KernelLogger::new();

    let r1 = find_best_move(&engine, &state, 0, &config, &logger);
    let r2 = find_best_move(&engine, &state, 0, &config, &logger);

    assert_eq!(r1.mv, r2.mv);
    assert_eq!(r1.score, r2.score);
    assert_eq!(r1.depth, r2.depth);
    assert_eq!(r1.stats.nodes_visited, r2.stats.nodes_visited);
}
