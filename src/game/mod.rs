//! Game state and turn structure consumed by the decision kernel

pub mod phase;
pub mod state;

pub use phase::Phase;
pub use state::State;
