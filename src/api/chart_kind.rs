use serde::{Deserialize, Serialize};

use crate::sync::ModePolicy;

/// One-way signals gating a controller's first paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadinessFlag {
    SurfaceMounted,
    PrimaryData,
    CategorySelection,
}

/// The two chart widgets sharing the synchronization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    /// Stacked month-over-month comparison filtered by a category selection.
    Comparison,
    /// Drill-in/drill-out category breakdown.
    Breakdown,
}

impl ChartKind {
    #[must_use]
    pub fn required_flags(self) -> &'static [ReadinessFlag] {
        match self {
            Self::Comparison => &[
                ReadinessFlag::SurfaceMounted,
                ReadinessFlag::PrimaryData,
                ReadinessFlag::CategorySelection,
            ],
            Self::Breakdown => &[ReadinessFlag::SurfaceMounted, ReadinessFlag::PrimaryData],
        }
    }

    #[must_use]
    pub fn mode_policy(self) -> ModePolicy {
        match self {
            Self::Comparison => ModePolicy::AnimateChanges,
            Self::Breakdown => ModePolicy::AnimateDepthChanges,
        }
    }

    #[must_use]
    pub fn suppresses_identical_payloads(self) -> bool {
        matches!(self, Self::Comparison)
    }

    #[must_use]
    pub fn is_stacked(self) -> bool {
        matches!(self, Self::Comparison)
    }

    #[must_use]
    pub fn uses_category_selection(self) -> bool {
        self.required_flags()
            .contains(&ReadinessFlag::CategorySelection)
    }
}
