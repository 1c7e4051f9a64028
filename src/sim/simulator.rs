//! The narrow interface the kernel consumes from a rules engine

use crate::core::CardId;
use crate::moves::{AttackTarget, Selection, SlotIndex};
use crate::game::State;

/// One action the kernel can ask a simulator to execute. Mirrors `Move`
/// closely but drops the pre-resolved `selections` queue — those are
/// answered live through `SelectionCallbacks` as the engine raises requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimAction {
    PlayCard {
        card: CardId,
        slot: Option<SlotIndex>,
        dry_drop: bool,
        is_free: bool,
    },
    DeclareAttack {
        attacker_instance_id: CardId,
        target: AttackTarget,
    },
    /// Finishes the pending-consumption protocol raised by a predator's
    /// entry consumption request.
    SelectConsumptionTargets { prey: Vec<CardId> },
    EndTurn,
}

/// A request for a user (or, inside the kernel, the selection enumerator)
/// to resolve one choice mid-execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRequest {
    SelectTarget { candidates: Vec<CardId> },
    SelectOption { options: Vec<String> },
    /// The "pending consumption" protocol: a predator dropped non-dry needs
    /// prey to consume from an empty-slot placement.
    SelectConsumption {
        available_prey: Vec<CardId>,
        predator: CardId,
        empty_slot: SlotIndex,
        is_free: bool,
    },
}

/// Answers selection requests raised mid-`execute`.
///
/// The rules engine calls `on_selection_needed` synchronously at each choice
/// point. A callback that has a pre-committed answer (the selection
/// enumerator replaying a candidate path) returns it immediately; a callback
/// with nothing left pre-committed returns `None`, which the engine treats
/// as "capture this request and stop" rather than as a failure.
pub trait SelectionCallbacks {
    fn on_selection_needed(&mut self, request: &SelectionRequest) -> Option<Selection>;
}

/// A callback that never has an answer, used by callers that just want to
/// know whether execution would need one (e.g. checking an empty target
/// group before generating a move at all).
pub struct NoSelections;

impl SelectionCallbacks for NoSelections {
    fn on_selection_needed(&mut self, _request: &SelectionRequest) -> Option<Selection> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct ExecuteResult {
    pub success: bool,
    pub state: State,
    pub error: Option<String>,
    /// Set when execution stopped because a callback returned `None` for a
    /// selection request; the caller inspects the captured request (stashed
    /// by the callback implementation, not returned here) to decide how to
    /// branch.
    pub needs_selection: bool,
}

impl ExecuteResult {
    pub fn ok(state: State) -> Self {
        ExecuteResult {
            success: true,
            state,
            error: None,
            needs_selection: false,
        }
    }

    pub fn failed(state: State, error: impl Into<String>) -> Self {
        ExecuteResult {
            success: false,
            state,
            error: Some(error.into()),
            needs_selection: false,
        }
    }

    pub fn awaiting_selection(state: State) -> Self {
        ExecuteResult {
            success: false,
            state,
            error: None,
            needs_selection: true,
        }
    }
}

/// Deep-copy and single-action-execution interface the kernel depends on.
pub trait Simulator {
    /// Deep copy preserving all identities, zones, and flags.
    fn clone_state(&self, state: &State) -> State {
        state.clone()
    }

    fn execute(
        &self,
        state: &State,
        action: SimAction,
        actor_index: usize,
        callbacks: &mut dyn SelectionCallbacks,
    ) -> ExecuteResult;
}
