//! Iterative-deepening alpha-beta search
//!
//! A classic (non-negamax) alpha-beta: every static score is always from
//! `me`'s absolute perspective, and `maximizing` flips only when the move
//! under consideration is `EndTurn` (card plays and attacks leave priority
//! with the same player, so the side trying to maximize doesn't change).
//! PVS narrows later siblings to a null window; LMR additionally searches
//! them at reduced depth first. A transposition table and two killer-move
//! slots per depth drive move ordering; futility pruning trims clearly
//! hopeless card plays near the leaves.

use std::cell::Cell;
use std::hash::Hasher;
use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHasher};

use crate::ai::{combat_evaluator, move_generator, position_evaluator};
use crate::config::KernelConfig;
use crate::core::CardId;
use crate::game::State;
use crate::logger::KernelLogger;
use crate::moves::{AttackTarget, Move};
use crate::sim::{SimAction, Simulator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    pub nodes_visited: u64,
    pub tt_hits: u64,
    pub cutoffs: u64,
    pub quiescence_nodes: u64,
    /// Card plays skipped by futility pruning.
    pub pruned: u64,
    /// Deepest iterative-deepening depth that completed without timing out.
    pub max_depth_reached: u32,
    /// PVS/LMR null-window searches that were re-searched at full depth
    /// and/or full window.
    pub re_searches: u64,
    /// Beta cutoffs caused by a move that was already a recorded killer for
    /// that depth before this node searched it.
    pub killer_hits: u64,
}

#[derive(Debug, Clone)]
pub struct FindBestMoveResult {
    pub mv: Option<Move>,
    pub score: i32,
    pub depth: u32,
    pub stats: SearchStats,
    pub time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone)]
struct TtEntry {
    score: i32,
    mv: Option<Move>,
    depth: u32,
    flag: Bound,
}

fn fingerprint(state: &State) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write_u32(state.turn);
    hasher.write_u8(state.phase as u8);
    hasher.write_usize(state.active_player_index);
    hasher.write_u8(state.card_played_this_turn as u8);

    for side in 0..2 {
        let player = state.player(side);
        hasher.write_i32(player.hp);
        hasher.write_usize(player.hand.len());
        hasher.write_usize(player.deck.len());
        hasher.write_usize(player.carrion.len());

        for slot in player.field.iter() {
            match slot {
                None => hasher.write_u32(u32::MAX),
                Some(id) => {
                    hasher.write_u32(id.as_u32());
                    if let Ok(card) = state.cards.get(*id) {
                        hasher.write_i32(card.current_atk);
                        hasher.write_i32(card.current_hp);
                        hasher.write_u8(card.has_attacked as u8);
                        hasher.write_u8(card.frozen as u8);
                        hasher.write_u32(card.summoned_turn);
                    }
                }
            }
        }
    }

    hasher.finish()
}

struct SearchContext<'a> {
    simulator: &'a dyn Simulator,
    config: &'a KernelConfig,
    logger: &'a KernelLogger,
    me: usize,
    table: FxHashMap<u64, TtEntry>,
    killers: Vec<Vec<Option<Move>>>,
    stats: SearchStats,
    deadline: Instant,
    timed_out: Cell<bool>,
}

impl<'a> SearchContext<'a> {
    fn killer_slots(&self) -> usize {
        self.config.killers_per_depth.max(1) as usize
    }

    fn record_killer(&mut self, depth: u32, mv: &Move) {
        if mv.is_end_turn() {
            return;
        }
        let slots = self.killer_slots();
        let depth_idx = depth as usize;
        if depth_idx >= self.killers.len() {
            self.killers.resize(depth_idx + 1, Vec::new());
        }
        let entry = &mut self.killers[depth_idx];
        if entry.is_empty() {
            entry.resize(slots, None);
        }
        if entry[0].as_ref().map(|k| k.same_shape(mv)).unwrap_or(false) {
            return;
        }
        for i in (1..slots).rev() {
            entry[i] = entry[i - 1].take();
        }
        entry[0] = Some(mv.clone());
    }

    fn killer_rank(&self, depth: u32, mv: &Move) -> i32 {
        let depth_idx = depth as usize;
        let Some(entry) = self.killers.get(depth_idx) else {
            return 0;
        };
        for (i, slot) in entry.iter().enumerate() {
            if slot.as_ref().map(|k| k.same_shape(mv)).unwrap_or(false) {
                return entry.len() as i32 - i as i32;
            }
        }
        0
    }
}

fn apply_move(
    simulator: &dyn Simulator,
    state: &State,
    mv: &Move,
    actor: usize,
) -> Option<State> {
    let probe_state = state.clone_for_simulation();
    let mut callbacks = ReplayCallbacks {
        selections: match mv {
            Move::PlayCard { selections, .. } => selections.clone(),
            _ => Vec::new(),
        },
        cursor: 0,
    };
    let action = match mv {
        Move::PlayCard {
            card,
            slot,
            dry_drop,
            is_free,
            ..
        } => SimAction::PlayCard {
            card: *card,
            slot: *slot,
            dry_drop: *dry_drop,
            is_free: *is_free,
        },
        Move::Attack {
            attacker_instance_id,
            target,
        } => SimAction::DeclareAttack {
            attacker_instance_id: *attacker_instance_id,
            target: target.clone(),
        },
        Move::EndTurn => SimAction::EndTurn,
    };
    let result = simulator.execute(&probe_state, action, actor, &mut callbacks);
    if result.success {
        Some(result.state)
    } else {
        None
    }
}

struct ReplayCallbacks {
    selections: Vec<crate::moves::Selection>,
    cursor: usize,
}

impl crate::sim::SelectionCallbacks for ReplayCallbacks {
    fn on_selection_needed(
        &mut self,
        _request: &crate::sim::SelectionRequest,
    ) -> Option<crate::moves::Selection> {
        let selection = self.selections.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(selection)
    }
}

fn optimistic_gain(state: &State, card_id: CardId) -> i32 {
    state
        .cards
        .get(card_id)
        .map(|c| 10 * c.current_atk + 5 * c.current_hp + 50)
        .unwrap_or(50)
}

fn is_high_impact(state: &State, mv: &Move) -> bool {
    match mv {
        Move::PlayCard { card, is_free, .. } => {
            let Ok(c) = state.cards.get(*card) else {
                return false;
            };
            *is_free
                || crate::ai::keyword_oracle::has_haste(c)
                || c.effects.values().any(|tag| tag.is_removal() || tag.is_board_wipe())
        }
        Move::Attack { .. } => true,
        Move::EndTurn => false,
    }
}

fn quiescence(ctx: &mut SearchContext, state: &State, q_depth: u32, mut alpha: i32, mut beta: i32) -> i32 {
    ctx.stats.quiescence_nodes += 1;
    let stand_pat = position_evaluator::evaluate_position(state, ctx.me);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }
    if q_depth >= 4 {
        return alpha;
    }

    let moves = move_generator::generate_moves(ctx.simulator, state, state.active_player_index);
    let noisy: Vec<Move> = moves
        .into_iter()
        .filter(|mv| match mv {
            Move::Attack { .. } => true,
            Move::PlayCard { card, .. } => state
                .cards
                .get(*card)
                .map(|c| {
                    crate::ai::keyword_oracle::has_haste(c)
                        || crate::ai::keyword_oracle::has_toxic(c)
                        || c.effects.values().any(|tag| tag.is_noisy())
                })
                .unwrap_or(false),
            Move::EndTurn => false,
        })
        .collect();

    for mv in noisy {
        let Some(next_state) = apply_move(ctx.simulator, state, &mv, state.active_player_index) else {
            continue;
        };
        let score = quiescence(ctx, &next_state, q_depth + 1, alpha, beta);
        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

fn leaf_eval(ctx: &mut SearchContext, state: &State) -> i32 {
    if ctx.config.enable_quiescence {
        quiescence(ctx, state, 0, i32::MIN + 1, i32::MAX - 1)
    } else {
        position_evaluator::evaluate_position(state, ctx.me)
    }
}

#[allow(clippy::too_many_arguments)]
fn alpha_beta(
    ctx: &mut SearchContext,
    state: &State,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    is_pv: bool,
) -> (i32, Option<Move>) {
    ctx.stats.nodes_visited += 1;

    if ctx.timed_out.get() || Instant::now() >= ctx.deadline {
        ctx.timed_out.set(true);
        return (leaf_eval(ctx, state), None);
    }

    if depth == 0 {
        return (leaf_eval(ctx, state), None);
    }

    if state.is_game_over() {
        let score = match state.winner() {
            Some(w) if w == ctx.me => 10000,
            Some(_) => -10000,
            None => 0,
        };
        return (score, None);
    }

    let key = fingerprint(state);
    if let Some(entry) = ctx.table.get(&key) {
        if entry.depth >= depth {
            let usable = match entry.flag {
                Bound::Exact => true,
                Bound::Lower => entry.score >= beta,
                Bound::Upper => entry.score <= alpha,
            };
            if usable {
                ctx.stats.tt_hits += 1;
                return (entry.score, entry.mv.clone());
            }
        }
    }

    let actor = state.active_player_index;
    let mut moves = move_generator::generate_moves(ctx.simulator, state, actor);
    if moves.is_empty() {
        return (leaf_eval(ctx, state), None);
    }
    if moves.len() > 1 && depth > 1 {
        moves.retain(|mv| !mv.is_end_turn());
    }

    // Killer moves first, then heuristic order, preserving stability for ties.
    {
        let ctx_ref = &*ctx;
        moves.sort_by(|a, b| {
            let ka = ctx_ref.killer_rank(depth, a);
            let kb = ctx_ref.killer_rank(depth, b);
            kb.cmp(&ka).then_with(|| {
                let oa = move_generator::order_key(state, ctx_ref.me, a);
                let ob = move_generator::order_key(state, ctx_ref.me, b);
                ob.cmp(&oa)
            })
        });
    }

    let static_eval = if depth <= 2 && !is_pv {
        Some(position_evaluator::evaluate_position(state, ctx.me))
    } else {
        None
    };

    let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
    let mut best_move: Option<Move> = None;
    let orig_alpha = alpha;

    for (idx, mv) in moves.iter().enumerate() {
        if let Some(se) = static_eval {
            if let Move::PlayCard { card, .. } = mv {
                if !is_high_impact(state, mv) {
                    let gain = optimistic_gain(state, *card);
                    let skip = if maximizing {
                        se + gain <= alpha
                    } else {
                        se - gain >= beta
                    };
                    if skip {
                        ctx.stats.pruned += 1;
                        continue;
                    }
                }
            }
        }

        let Some(next_state) = apply_move(ctx.simulator, state, mv, actor) else {
            continue;
        };
        let next_maximizing = maximizing ^ mv.is_end_turn();

        let score = if idx == 0 {
            alpha_beta(ctx, &next_state, depth - 1, alpha, beta, next_maximizing, is_pv).0
        } else {
            let reduction = if idx >= ctx.config.lmr_full_depth_moves as usize
                && depth >= ctx.config.lmr_min_depth
                && !is_pv
                && !mv.is_attack()
                && !is_high_impact(state, mv)
            {
                if idx >= 12 {
                    3
                } else if idx >= 6 {
                    2
                } else {
                    1
                }
                .min(depth.saturating_sub(1))
            } else {
                0
            };

            let (null_lo, null_hi) = if maximizing {
                (alpha, alpha + 1)
            } else {
                (beta - 1, beta)
            };
            let mut s = alpha_beta(
                ctx,
                &next_state,
                depth.saturating_sub(1 + reduction),
                null_lo,
                null_hi,
                next_maximizing,
                false,
            )
            .0;

            let improved = if maximizing { s > alpha } else { s < beta };
            if reduction > 0 && improved {
                ctx.stats.re_searches += 1;
                s = alpha_beta(ctx, &next_state, depth - 1, null_lo, null_hi, next_maximizing, false).0;
            }

            let needs_full_window = if maximizing {
                s > alpha && s < beta
            } else {
                s < beta && s > alpha
            };
            if needs_full_window {
                ctx.stats.re_searches += 1;
                alpha_beta(ctx, &next_state, depth - 1, alpha, beta, next_maximizing, true).0
            } else {
                s
            }
        };

        if maximizing {
            if score > best_score {
                best_score = score;
                best_move = Some(mv.clone());
            }
            if score > alpha {
                alpha = score;
            }
        } else {
            if score < best_score {
                best_score = score;
                best_move = Some(mv.clone());
            }
            if score < beta {
                beta = score;
            }
        }

        if alpha >= beta {
            ctx.stats.cutoffs += 1;
            if ctx.killer_rank(depth, mv) > 0 {
                ctx.stats.killer_hits += 1;
            }
            ctx.record_killer(depth, mv);
            break;
        }
    }

    let flag = if best_score <= orig_alpha {
        Bound::Upper
    } else if best_score >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    };

    if ctx.table.len() < ctx.config.max_table_size as usize {
        ctx.table.insert(
            key,
            TtEntry {
                score: best_score,
                mv: best_move.clone(),
                depth,
                flag,
            },
        );
    }

    (best_score, best_move)
}

fn new_context<'a>(
    simulator: &'a dyn Simulator,
    config: &'a KernelConfig,
    logger: &'a KernelLogger,
    me: usize,
) -> SearchContext<'a> {
    SearchContext {
        simulator,
        config,
        logger,
        me,
        table: FxHashMap::default(),
        killers: Vec::new(),
        stats: SearchStats::default(),
        deadline: Instant::now() + Duration::from_millis(config.max_time_ms),
        timed_out: Cell::new(false),
    }
}

struct DepthOutcome {
    best: Option<(Move, i32)>,
    should_stop: bool,
}

/// Runs exactly one iterative-deepening depth. Both the sync and async entry
/// points call this same routine once per depth; only the loop that drives
/// it (and whether that loop awaits between calls) differs between them.
fn run_one_depth(ctx: &mut SearchContext, state: &State, depth: u32, start: Instant) -> DepthOutcome {
    ctx.logger.depth_start(depth);
    let (score, mv) = alpha_beta(ctx, state, depth, i32::MIN + 1, i32::MAX - 1, true, true);

    if ctx.timed_out.get() {
        return DepthOutcome {
            best: None,
            should_stop: true,
        };
    }

    if mv.is_some() {
        ctx.logger.depth_done(depth, score, ctx.stats.nodes_visited);
    }

    let elapsed_past_budget =
        Instant::now().duration_since(start) > Duration::from_millis(ctx.config.max_time_ms * 8 / 10);
    let should_stop =
        elapsed_past_budget || score > 9000 || (score < -9000 && depth >= 3);

    DepthOutcome {
        best: mv.map(|mv| (mv, score)),
        should_stop,
    }
}

fn finalize(
    best: Option<(Move, i32, u32)>,
    start: Instant,
    stats: SearchStats,
) -> FindBestMoveResult {
    let time_ms = start.elapsed().as_millis() as u64;
    match best {
        Some((mv, score, depth)) => FindBestMoveResult {
            mv: Some(mv),
            score,
            depth,
            stats,
            time_ms,
        },
        None => FindBestMoveResult {
            mv: None,
            score: i32::MIN,
            depth: 0,
            stats,
            time_ms,
        },
    }
}

pub fn find_best_move(
    simulator: &dyn Simulator,
    state: &State,
    me: usize,
    config: &KernelConfig,
    logger: &KernelLogger,
) -> FindBestMoveResult {
    let start = Instant::now();
    let mut ctx = new_context(simulator, config, logger, me);
    let mut best: Option<(Move, i32, u32)> = None;

    for depth in 1..=config.max_depth {
        let outcome = run_one_depth(&mut ctx, state, depth, start);
        if let Some((mv, score)) = outcome.best {
            best = Some((mv, score, depth));
            ctx.stats.max_depth_reached = depth;
        }
        if outcome.should_stop {
            break;
        }
    }

    finalize(best, start, ctx.stats)
}

/// Shares `run_one_depth` with the sync entry point; the only difference is
/// this loop actually awaits `tokio::task::yield_now()` between depths.
pub async fn find_best_move_async(
    simulator: &dyn Simulator,
    state: &State,
    me: usize,
    config: &KernelConfig,
    logger: &KernelLogger,
) -> FindBestMoveResult {
    let start = Instant::now();
    let mut ctx = new_context(simulator, config, logger, me);
    let mut best: Option<(Move, i32, u32)> = None;

    for depth in 1..=config.max_depth {
        let outcome = run_one_depth(&mut ctx, state, depth, start);
        if let Some((mv, score)) = outcome.best {
            best = Some((mv, score, depth));
            ctx.stats.max_depth_reached = depth;
        }
        if outcome.should_stop {
            break;
        }
        tokio::task::yield_now().await;
    }

    finalize(best, start, ctx.stats)
}

/// Thin helper mirroring `combat_evaluator::plan_combat_phase` scores into
/// the ordering context the move generator uses; exposed so callers can
/// preview the recommended attack plan without running a full search.
pub fn preview_combat_plan(state: &State, me: usize) -> Vec<(CardId, AttackTarget, i32)> {
    combat_evaluator::plan_combat_phase(state, me)
        .attacks
        .into_iter()
        .map(|a| (a.attacker, a.target, a.score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardType, EntityStore, Player};
    use crate::sim::RulesEngine;

    fn lethal_state() -> State {
        let mut players_store: EntityStore<Player> = EntityStore::new();
        let p0 = players_store.next_id();
        let p1 = players_store.next_id();
        let mut state = State::new_two_player(Player::new(p0, "Us"), Player::new(p1, "Them"));
        state.phase = crate::game::Phase::Main;
        state.players[1].hp = 3;

        let bear_id = state.next_card_id();
        let mut bear = Card::new(bear_id, "bear", CardType::Creature, 4, 4)
            .with_keyword(crate::core::Keyword::Haste);
        bear.summoned_turn = state.turn;
        state.cards.insert(bear_id, bear);
        state.players[0].field[0] = Some(bear_id);

        state
    }

    #[test]
    fn finds_lethal_attack_on_board() {
        let state = lethal_state();
        let engine = RulesEngine::new();
        let config = KernelConfig {
            max_depth: 2,
            max_time_ms: 500,
            ..Default::default()
        };
        let logger = KernelLogger::new();
        let result = find_best_move(&engine, &state, 0, &config, &logger);
        assert!(result.score >= 1000);
        assert!(matches!(
            result.mv,
            Some(Move::Attack {
                target: AttackTarget::Player,
                ..
            })
        ));
    }

    #[test]
    fn fingerprint_is_stable_for_equal_states() {
        let state = lethal_state();
        assert_eq!(fingerprint(&state), fingerprint(&state));
    }

    #[test]
    fn max_depth_reached_matches_returned_depth() {
        let state = lethal_state();
        let engine = RulesEngine::new();
        let config = KernelConfig {
            max_depth: 2,
            max_time_ms: 500,
            ..Default::default()
        };
        let logger = KernelLogger::new();
        let result = find_best_move(&engine, &state, 0, &config, &logger);
        assert_eq!(result.stats.max_depth_reached, result.depth);
    }
}
