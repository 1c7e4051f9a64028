//! Probe-replay selection enumeration
//!
//! Discovers every fully-specified way to play a card by replaying
//! `PlayCard` against a `Simulator` with a callback that answers whatever
//! has already been committed and stops at the first open choice. Each open
//! choice branches into one child probe per candidate, recursing up to a
//! depth cap.

use crate::core::CardId;
use crate::game::State;
use crate::moves::{Selection, SlotIndex};
use crate::sim::{SelectionCallbacks, SelectionRequest, SimAction, Simulator};

const MAX_DEPTH: u32 = 5;

/// Replays pre-committed `Selection`s in order; the first request beyond the
/// committed prefix is captured rather than answered.
struct ProbeCallbacks<'a> {
    committed: &'a [Selection],
    cursor: usize,
    captured: Option<SelectionRequest>,
}

impl<'a> ProbeCallbacks<'a> {
    fn new(committed: &'a [Selection]) -> Self {
        ProbeCallbacks {
            committed,
            cursor: 0,
            captured: None,
        }
    }
}

impl<'a> SelectionCallbacks for ProbeCallbacks<'a> {
    fn on_selection_needed(&mut self, request: &SelectionRequest) -> Option<Selection> {
        if let Some(selection) = self.committed.get(self.cursor) {
            self.cursor += 1;
            return Some(selection.clone());
        }
        self.captured = Some(request.clone());
        None
    }
}

/// One fully-specified way to resolve every selection point of a `PlayCard`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPath {
    pub selections: Vec<Selection>,
}

fn candidates_for(request: &SelectionRequest) -> Vec<Selection> {
    match request {
        SelectionRequest::SelectTarget { candidates } => candidates
            .iter()
            .map(|&value| Selection::Target { value })
            .collect(),
        SelectionRequest::SelectOption { options } => (0..options.len())
            .map(|value| Selection::Option { value })
            .collect(),
        SelectionRequest::SelectConsumption { available_prey, .. } => {
            // One path per candidate prey list: the empty list (no
            // consumption, i.e. dry-drop-equivalent within a non-dry play)
            // plus one singleton per available prey.
            let mut paths = vec![Selection::Consumption { values: Vec::new() }];
            paths.extend(available_prey.iter().map(|&prey| Selection::Consumption {
                values: vec![prey],
            }));
            paths
        }
    }
}

/// Enumerate every fully-specified selection path for playing `card`.
pub fn enumerate_selection_paths(
    simulator: &dyn Simulator,
    state: &State,
    card: CardId,
    slot: Option<SlotIndex>,
    dry_drop: bool,
    is_free: bool,
    actor_index: usize,
) -> Vec<SelectionPath> {
    let mut results = Vec::new();
    probe(
        simulator,
        state,
        card,
        slot,
        dry_drop,
        is_free,
        actor_index,
        Vec::new(),
        0,
        &mut results,
    );
    results
}

#[allow(clippy::too_many_arguments)]
fn probe(
    simulator: &dyn Simulator,
    state: &State,
    card: CardId,
    slot: Option<SlotIndex>,
    dry_drop: bool,
    is_free: bool,
    actor_index: usize,
    committed: Vec<Selection>,
    depth: u32,
    results: &mut Vec<SelectionPath>,
) {
    if depth > MAX_DEPTH {
        return;
    }

    let probe_state = state.clone_for_simulation();
    let mut callbacks = ProbeCallbacks::new(&committed);
    let action = SimAction::PlayCard {
        card,
        slot,
        dry_drop,
        is_free,
    };
    let outcome = simulator.execute(&probe_state, action, actor_index, &mut callbacks);

    if outcome.success {
        results.push(SelectionPath {
            selections: committed,
        });
        return;
    }

    if !outcome.needs_selection {
        return;
    }

    let Some(request) = callbacks.captured else {
        return;
    };

    for candidate in candidates_for(&request) {
        let mut next = committed.clone();
        next.push(candidate);
        probe(
            simulator,
            state,
            card,
            slot,
            dry_drop,
            is_free,
            actor_index,
            next,
            depth + 1,
            results,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardType, EntityStore, Player};
    use crate::sim::RulesEngine;

    fn two_player_state_with_hand_card() -> (State, CardId) {
        let mut players_store: EntityStore<Player> = EntityStore::new();
        let p0 = players_store.next_id();
        let p1 = players_store.next_id();
        let mut state = State::new_two_player(Player::new(p0, "Us"), Player::new(p1, "Them"));
        state.phase = crate::game::Phase::Main;
        let card_id = state.next_card_id();
        let card = Card::new(card_id, "bear", CardType::Creature, 2, 2);
        state.cards.insert(card_id, card);
        state.players[0].hand.add(card_id);
        (state, card_id)
    }

    #[test]
    fn a_creature_with_no_selections_has_exactly_one_path() {
        let (state, card_id) = two_player_state_with_hand_card();
        let engine = RulesEngine::new();
        let paths = enumerate_selection_paths(&engine, &state, card_id, Some(0), false, false, 0);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].selections.is_empty());
    }
}
