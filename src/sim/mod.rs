//! Rules-engine boundary
//!
//! The kernel never embeds card-script logic; it drives a `Simulator`
//! implementation through this narrow interface. `RulesEngine` is the
//! concrete implementation shipped with this crate so the kernel can be
//! exercised and tested end to end without a host application supplying its
//! own rules engine.

pub mod rules_engine;
pub mod simulator;

pub use rules_engine::RulesEngine;
pub use simulator::{
    ExecuteResult, SelectionCallbacks, SelectionRequest, SimAction, Simulator,
};
