//! Ambient logging for search and controller decisions
//!
//! Mirrors the teacher's centralized `GameLogger`: a small verbosity-gated
//! println logger, not a tracing subscriber, because nothing downstream of
//! this crate consumes structured log records yet.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VerbosityLevel {
    Silent,
    Normal,
    Verbose,
}

impl Default for VerbosityLevel {
    fn default() -> Self {
        VerbosityLevel::Silent
    }
}

/// Logs search progress and controller-style decisions.
///
/// Silent by default, as befits a library whose primary caller is a search
/// loop run thousands of times per second; never required for correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelLogger {
    verbosity: VerbosityLevel,
}

impl KernelLogger {
    pub fn new() -> Self {
        KernelLogger {
            verbosity: VerbosityLevel::default(),
        }
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        KernelLogger { verbosity }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Depth-loop progress: entering a new iterative-deepening depth.
    #[inline]
    pub fn depth_start(&self, depth: u32) {
        if self.verbosity >= VerbosityLevel::Normal {
            println!("search: starting depth {depth}");
        }
    }

    #[inline]
    pub fn depth_done(&self, depth: u32, score: i32, nodes: u64) {
        if self.verbosity >= VerbosityLevel::Normal {
            println!("search: depth {depth} done, score={score}, nodes={nodes}");
        }
    }

    /// "Chose X because Y" style explanation, matching the teacher's
    /// `controller_choice` call sites.
    #[inline]
    pub fn controller_choice(&self, component: &str, message: &str) {
        if self.verbosity >= VerbosityLevel::Verbose {
            println!("  >>> {component}: {message}");
        }
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Verbose {
            println!("  {message}");
        }
    }
}

impl Default for KernelLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_silent() {
        let logger = KernelLogger::new();
        assert_eq!(logger.verbosity(), VerbosityLevel::Silent);
    }

    #[test]
    fn verbosity_is_settable() {
        let mut logger = KernelLogger::new();
        logger.set_verbosity(VerbosityLevel::Verbose);
        assert_eq!(logger.verbosity(), VerbosityLevel::Verbose);
    }
}
