//! Whole-position scoring used as the static leaf evaluation in search
//!
//! `evaluate_position` is the sum of three signed terms: material, threats,
//! and quality. All three are pure functions of `state` from one player's
//! perspective; nothing here mutates or calls the simulator.

use crate::ai::{keyword_oracle, threat_analyzer};
use crate::core::{Card, Keyword};
use crate::game::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvantageBand {
    Even,
    SlightEdgeOrDisadvantage,
    AheadOrBehind,
    WinningOrLosing,
}

impl AdvantageBand {
    /// The human-readable label the public contract names, picking the
    /// edge/disadvantage (or ahead/behind, winning/losing) half from the
    /// sign of the already-perspective-flipped score.
    pub fn label(&self, score: i32) -> &'static str {
        match (self, score >= 0) {
            (AdvantageBand::Even, _) => "Even",
            (AdvantageBand::SlightEdgeOrDisadvantage, true) => "Slight edge",
            (AdvantageBand::SlightEdgeOrDisadvantage, false) => "Slight disadvantage",
            (AdvantageBand::AheadOrBehind, true) => "Ahead",
            (AdvantageBand::AheadOrBehind, false) => "Behind",
            (AdvantageBand::WinningOrLosing, true) => "Winning",
            (AdvantageBand::WinningOrLosing, false) => "Losing",
        }
    }
}

fn board_value(state: &State, side: usize) -> i32 {
    state
        .player(side)
        .field_creatures()
        .filter_map(|id| state.cards.get(id).ok())
        .map(|c| 2 * c.current_atk + c.current_hp + keyword_bonus(state, side, c))
        .sum()
}

fn keyword_bonus(state: &State, owner: usize, creature: &Card) -> i32 {
    let opp = state.opponent_index(owner);
    let mut bonus = 0;

    if keyword_oracle::has_toxic(creature) {
        let count = state
            .player(opp)
            .field_creatures()
            .filter_map(|id| state.cards.get(id).ok())
            .filter(|c| c.current_hp >= 4)
            .count() as i32;
        bonus += 4 + 3 * count;
    }
    if keyword_oracle::has_haste(creature) {
        bonus += if keyword_oracle::can_attack(creature) { 8 } else { 2 };
    }
    if keyword_oracle::has_barrier(creature) {
        let total_opp_atk: i32 = state
            .player(opp)
            .field_creatures()
            .filter_map(|id| state.cards.get(id).ok())
            .map(|c| c.current_atk)
            .sum();
        bonus += total_opp_atk.min(10);
    }
    if keyword_oracle::has_ambush(creature) {
        let count = state
            .player(opp)
            .field_creatures()
            .filter_map(|id| state.cards.get(id).ok())
            .filter(|c| c.current_hp <= creature.current_atk)
            .count() as i32;
        bonus += 2 + 2 * count;
    }
    if keyword_oracle::has_lure(creature) {
        let valuable = state
            .player(owner)
            .field_creatures()
            .filter_map(|id| state.cards.get(id).ok())
            .filter(|c| {
                c.current_atk >= 3 || keyword_oracle::has_toxic(c) || keyword_oracle::has_ambush(c)
            })
            .count() as i32;
        bonus += 2 + 3 * valuable;
    }
    if creature.has_raw_keyword(Keyword::Regeneration) {
        let missing_hp = (creature.hp - creature.current_hp).max(0);
        bonus += 2 + missing_hp;
    }
    if keyword_oracle::is_hidden(creature) {
        bonus += 4;
    }
    if keyword_oracle::is_harmless(creature) {
        bonus -= 5;
    }
    if keyword_oracle::is_passive(creature) {
        bonus -= 3;
    }

    bonus
}

fn material(state: &State, me: usize) -> i32 {
    let opp = state.opponent_index(me);
    let hp_diff = state.player(me).hp - state.player(opp).hp;
    let board_diff = board_value(state, me) - board_value(state, opp);
    let hand_diff = state.player(me).hand.len() as i32 - state.player(opp).hand.len() as i32;
    let deck_diff = state.player(me).deck.len() as i32 - state.player(opp).deck.len() as i32;

    hp_diff * 10 + board_diff + hand_diff * 8 + (deck_diff as f64 * 0.5).round() as i32
}

fn threats(state: &State, me: usize) -> i32 {
    let opp = state.opponent_index(me);
    let my_hp = state.player(me).hp;
    let mut score = 0;

    if threat_analyzer::detect_opponent_lethal(state, me).is_lethal {
        score -= 100;
    }
    for c in state
        .player(opp)
        .field_creatures()
        .filter_map(|id| state.cards.get(id).ok())
    {
        if c.current_atk >= my_hp {
            let overkill = (c.current_atk - my_hp).max(0);
            score -= 50 + 10 * overkill;
        }
    }
    if threat_analyzer::detect_our_lethal(state, me).is_lethal {
        score += 100;
    }
    score -= 15 * threat_analyzer::find_must_kill_targets(state, me).len() as i32;

    score
}

fn quality(state: &State, me: usize) -> i32 {
    let mut score = 2 * state.player(me).empty_slots() as i32;
    score -= 3
        * state
            .player(me)
            .field_creatures()
            .filter_map(|id| state.cards.get(id).ok())
            .filter(|c| c.current_hp == 1)
            .count() as i32;
    score
}

pub fn evaluate_position(state: &State, me: usize) -> i32 {
    material(state, me) + threats(state, me) + quality(state, me)
}

pub fn calculate_advantage(state: &State, perspective: usize) -> (i32, AdvantageBand) {
    let raw = evaluate_position(state, 0) - evaluate_position(state, 1);
    let score = if perspective == 1 { -raw } else { raw };
    let magnitude = score.abs();
    let band = if magnitude <= 20 {
        AdvantageBand::Even
    } else if magnitude <= 100 {
        AdvantageBand::SlightEdgeOrDisadvantage
    } else if magnitude <= 299 {
        AdvantageBand::AheadOrBehind
    } else {
        AdvantageBand::WinningOrLosing
    };
    (score, band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardType, Card, EntityStore, Player};

    fn base_state() -> State {
        let mut players_store: EntityStore<Player> = EntityStore::new();
        let p0 = players_store.next_id();
        let p1 = players_store.next_id();
        State::new_two_player(Player::new(p0, "Us"), Player::new(p1, "Them"))
    }

    #[test]
    fn empty_board_is_even() {
        let state = base_state();
        let (score, band) = calculate_advantage(&state, 0);
        assert_eq!(score, 0);
        assert_eq!(band, AdvantageBand::Even);
    }

    #[test]
    fn hp_lead_moves_the_score() {
        let mut state = base_state();
        state.players[0].hp = 10;
        state.players[1].hp = 4;
        let (score, band) = calculate_advantage(&state, 0);
        assert_eq!(score, 60);
        assert_eq!(band, AdvantageBand::SlightEdgeOrDisadvantage);

        let (flipped, flipped_band) = calculate_advantage(&state, 1);
        assert_eq!(flipped, -60);
        assert_eq!(band.label(score), "Slight edge");
        assert_eq!(flipped_band.label(flipped), "Slight disadvantage");
    }

    #[test]
    fn toxic_creature_gets_a_context_aware_bonus() {
        let mut state = base_state();
        let toxic_id = state.next_card_id();
        let toxic = Card::new(toxic_id, "viper", CardType::Creature, 1, 1)
            .with_keyword(crate::core::Keyword::Toxic);
        state.cards.insert(toxic_id, toxic);
        state.players[0].field[0] = Some(toxic_id);

        let big_id = state.next_card_id();
        let big = Card::new(big_id, "ogre", CardType::Creature, 6, 6);
        state.cards.insert(big_id, big);
        state.players[1].field[0] = Some(big_id);

        // base board value 1: 2*1+1=3, bonus 4+3*1 (one opp creature hp>=4)=7 -> 10
        assert_eq!(board_value(&state, 0), 10);
    }
}
