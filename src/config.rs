//! Search configuration surface

use serde::{Deserialize, Serialize};

/// Tunable knobs for `find_best_move` / `find_best_move_async`.
///
/// Defaults match the documented contract exactly; changing a constant here
/// must not violate lethal-dominance or critical-kill-priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelConfig {
    pub max_time_ms: u64,
    pub max_depth: u32,
    pub verbose: bool,
    pub enable_quiescence: bool,
    pub max_table_size: u32,
    pub killers_per_depth: u32,
    pub lmr_full_depth_moves: u32,
    pub lmr_min_depth: u32,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            max_time_ms: 2000,
            max_depth: 10,
            verbose: false,
            enable_quiescence: false,
            max_table_size: 100_000,
            killers_per_depth: 2,
            lmr_full_depth_moves: 3,
            lmr_min_depth: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let cfg = KernelConfig::default();
        assert_eq!(cfg.max_time_ms, 2000);
        assert_eq!(cfg.max_depth, 10);
        assert!(!cfg.verbose);
        assert!(!cfg.enable_quiescence);
        assert_eq!(cfg.max_table_size, 100_000);
        assert_eq!(cfg.killers_per_depth, 2);
        assert_eq!(cfg.lmr_full_depth_moves, 3);
        assert_eq!(cfg.lmr_min_depth, 2);
    }
}
