//! Game state
//!
//! `State` is the value the kernel receives from the rules engine, clones
//! for every search node, and never mutates in place from the outside. It
//! owns the card arena; players are a fixed two-element array since this is
//! strictly a two-player game (no N-player generalization).

use crate::core::{Card, CardId, EntityStore, Player};
use crate::game::Phase;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    pub cards: EntityStore<Card>,
    pub players: [Player; 2],

    /// 1-based.
    pub turn: u32,
    pub phase: Phase,
    /// 0 or 1.
    pub active_player_index: usize,
    /// One non-free card per turn.
    pub card_played_this_turn: bool,

    /// Set while a predator's entry-consumption choice is outstanding.
    pub pending_consumption: bool,
    /// Set while the enumerator has extended the normal consumption window
    /// (e.g. via an effect that grants an extra consumption step).
    pub extended_consumption: bool,
    /// Set while a triggered reaction (effect response) is outstanding.
    pub pending_reaction: bool,
    /// Set while a card is choosing its battlefield slot.
    pub pending_placement: bool,
    /// True for clones created by the selection enumerator / search to
    /// probe the simulator; never true for a state a caller passes in.
    pub is_simulation: bool,
}

impl State {
    pub fn new_two_player(p0: Player, p1: Player) -> Self {
        State {
            cards: EntityStore::new(),
            players: [p0, p1],
            turn: 1,
            phase: Phase::Setup,
            active_player_index: 0,
            card_played_this_turn: false,
            pending_consumption: false,
            extended_consumption: false,
            pending_reaction: false,
            pending_placement: false,
            is_simulation: false,
        }
    }

    pub fn next_card_id(&mut self) -> CardId {
        self.cards.next_id()
    }

    pub fn active_player(&self) -> &Player {
        &self.players[self.active_player_index]
    }

    pub fn active_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.active_player_index]
    }

    pub fn opponent_index(&self, player_index: usize) -> usize {
        1 - player_index
    }

    pub fn player(&self, index: usize) -> &Player {
        &self.players[index]
    }

    pub fn player_mut(&mut self, index: usize) -> &mut Player {
        &mut self.players[index]
    }

    pub fn opponent_of(&self, player_index: usize) -> &Player {
        &self.players[self.opponent_index(player_index)]
    }

    pub fn get_card(&self, id: CardId) -> crate::Result<&Card> {
        self.cards.get(id)
    }

    pub fn get_card_mut(&mut self, id: CardId) -> crate::Result<&mut Card> {
        self.cards.get_mut(id)
    }

    /// Move a card from wherever it sits in a player's deck/hand/carrion/
    /// exile zones to another such zone. Does not touch the field array;
    /// callers manipulate `field` slots directly since they're positional.
    pub fn move_card_between_zones(
        &mut self,
        player_index: usize,
        card_id: CardId,
        from: crate::zones::Zone,
        to: crate::zones::Zone,
    ) {
        use crate::zones::Zone;
        let player = &mut self.players[player_index];
        let removed = match from {
            Zone::Deck => player.deck.remove(card_id),
            Zone::Hand => player.hand.remove(card_id),
            Zone::Carrion => player.carrion.remove(card_id),
            Zone::Exile => player.exile.remove(card_id),
            Zone::Field => false,
        };
        if !removed {
            return;
        }
        match to {
            Zone::Deck => player.deck.add(card_id),
            Zone::Hand => player.hand.add(card_id),
            Zone::Carrion => player.carrion.add(card_id),
            Zone::Exile => player.exile.add(card_id),
            Zone::Field => {}
        }
    }

    pub fn draw_card(&mut self, player_index: usize) -> Option<CardId> {
        let drawn = self.players[player_index].deck.draw_top();
        if let Some(card_id) = drawn {
            self.players[player_index].hand.add(card_id);
        }
        drawn
    }

    pub fn is_game_over(&self) -> bool {
        self.players[0].is_defeated() || self.players[1].is_defeated()
    }

    /// `None` on a double-KO draw.
    pub fn winner(&self) -> Option<usize> {
        match (self.players[0].is_defeated(), self.players[1].is_defeated()) {
            (true, true) => None,
            (true, false) => Some(1),
            (false, true) => Some(0),
            (false, false) => None,
        }
    }

    /// Returns a clone with `is_simulation` set, as the selection enumerator
    /// and search use for probing the simulator without side-effecting the
    /// caller's state.
    pub fn clone_for_simulation(&self) -> State {
        let mut cloned = self.clone();
        cloned.is_simulation = true;
        cloned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityStore, Player};

    fn two_player_state() -> State {
        let mut players_store: EntityStore<Player> = EntityStore::new();
        let p0_id = players_store.next_id();
        let p1_id = players_store.next_id();
        State::new_two_player(Player::new(p0_id, "Alice"), Player::new(p1_id, "Bob"))
    }

    #[test]
    fn new_state_starts_at_turn_one_setup_phase() {
        let state = two_player_state();
        assert_eq!(state.turn, 1);
        assert_eq!(state.phase, Phase::Setup);
        assert_eq!(state.active_player_index, 0);
        assert!(!state.is_game_over());
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn game_over_when_either_player_is_defeated() {
        let mut state = two_player_state();
        state.players[1].lose_hp(100);
        assert!(state.is_game_over());
        assert_eq!(state.winner(), Some(0));
    }

    #[test]
    fn simulation_clone_is_flagged_and_independent() {
        let state = two_player_state();
        let mut sim = state.clone_for_simulation();
        assert!(sim.is_simulation);
        assert!(!state.is_simulation);
        sim.players[0].lose_hp(5);
        assert_eq!(state.players[0].hp, crate::core::player::STARTING_HP);
    }
}
