//! Turn phases

use serde::{Deserialize, Serialize};

/// Phase of the current turn. Only `Main` permits card plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    Start,
    Main,
    Combat,
    End,
}

impl Phase {
    pub fn permits_card_plays(&self) -> bool {
        matches!(self, Phase::Main)
    }

    pub fn next(&self) -> Phase {
        match self {
            Phase::Setup => Phase::Start,
            Phase::Start => Phase::Main,
            Phase::Main => Phase::Combat,
            Phase::Combat => Phase::End,
            Phase::End => Phase::Start,
        }
    }
}
