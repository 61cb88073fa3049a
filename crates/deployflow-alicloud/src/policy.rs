//! Strategy-dependent decisions

use deployflow_core::{StageConfig, Strategy};

/// How the source server group's capacity survives a deployment
///
/// Snapshot/restore and pin/unpin are alternatives; a strategy uses one or
/// the other, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityPreservation {
    /// Capture capacity in an additional step, restore it after the deploy
    Snapshot,
    /// Pin minimum capacity before the deploy, unpin afterwards
    Pin,
}

impl CapacityPreservation {
    pub fn for_strategy(strategy: &Strategy) -> Self {
        if requires_pinning(strategy) {
            CapacityPreservation::Pin
        } else {
            CapacityPreservation::Snapshot
        }
    }
}

/// Whether the source server group is pinned for the duration of the deploy
pub fn requires_pinning(strategy: &Strategy) -> bool {
    match strategy {
        Strategy::RollingRedBlack => true,
        // Pinning has only been rolled out for rolling red/black.
        Strategy::None
        | Strategy::RedBlack
        | Strategy::Highlander
        | Strategy::Monitored
        | Strategy::Custom
        | Strategy::Other(_) => false,
    }
}

/// Whether a cluster size check must pass before the deploy starts
pub fn requires_precondition_gate(config: &StageConfig) -> bool {
    match &config.strategy {
        Strategy::RollingRedBlack => config.has_max_initial_count(),
        Strategy::None
        | Strategy::RedBlack
        | Strategy::Highlander
        | Strategy::Monitored
        | Strategy::Custom
        | Strategy::Other(_) => false,
    }
}
