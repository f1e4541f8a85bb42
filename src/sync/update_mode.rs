use serde::{Deserialize, Serialize};
use tracing::trace;

/// Redraw style hint passed to the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UpdateMode {
    #[default]
    Instant,
    Animated,
}

/// Immutable redraw request; a newer one supersedes it inside a coalescing window.
#[derive(Debug, Clone, PartialEq)]
pub struct RedrawRequest<P> {
    pub payload: P,
    pub mode: UpdateMode,
}

impl<P> RedrawRequest<P> {
    #[must_use]
    pub fn new(payload: P, mode: UpdateMode) -> Self {
        Self { payload, mode }
    }
}

/// How later data changes animate once the chart has painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModePolicy {
    /// Every change after the first paint animates.
    AnimateChanges,
    /// Only changes of nesting depth (drill in/out) animate.
    AnimateDepthChanges,
}

/// Why the chart's inputs changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawTrigger {
    DataChanged { depth: usize },
    SelectionChanged,
    ColorMapChanged,
    VisibilityChanged { visible: bool },
}

/// Chooses instant vs. animated redraws from the reason a chart changed.
///
/// Returns `None` when the trigger needs no redraw now, e.g. a color change on
/// a hidden chart that is buffered until the chart becomes visible.
#[derive(Debug, Clone)]
pub struct UpdateModeSelector {
    policy: ModePolicy,
    initialized: bool,
    last_depth: Option<usize>,
    visible: bool,
    pending_color_change: bool,
}

impl UpdateModeSelector {
    #[must_use]
    pub fn new(policy: ModePolicy) -> Self {
        Self {
            policy,
            initialized: false,
            last_depth: None,
            visible: true,
            pending_color_change: false,
        }
    }

    #[must_use]
    pub fn policy(&self) -> ModePolicy {
        self.policy
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn has_pending_color_change(&self) -> bool {
        self.pending_color_change
    }

    pub fn select(&mut self, trigger: RedrawTrigger) -> Option<UpdateMode> {
        let mode = match trigger {
            RedrawTrigger::DataChanged { depth } => {
                let previous_depth = self.last_depth.replace(depth);
                if !std::mem::replace(&mut self.initialized, true) {
                    Some(UpdateMode::Instant)
                } else {
                    match self.policy {
                        ModePolicy::AnimateChanges => Some(UpdateMode::Animated),
                        ModePolicy::AnimateDepthChanges if previous_depth != Some(depth) => {
                            Some(UpdateMode::Animated)
                        }
                        ModePolicy::AnimateDepthChanges => Some(UpdateMode::Instant),
                    }
                }
            }
            RedrawTrigger::SelectionChanged => {
                if std::mem::replace(&mut self.initialized, true) {
                    Some(UpdateMode::Animated)
                } else {
                    Some(UpdateMode::Instant)
                }
            }
            RedrawTrigger::ColorMapChanged => {
                if self.visible {
                    Some(UpdateMode::Instant)
                } else {
                    self.pending_color_change = true;
                    None
                }
            }
            RedrawTrigger::VisibilityChanged { visible } => {
                self.visible = visible;
                if visible && std::mem::take(&mut self.pending_color_change) {
                    Some(UpdateMode::Instant)
                } else {
                    None
                }
            }
        };

        trace!(?trigger, ?mode, "update mode selected");
        mode
    }
}
