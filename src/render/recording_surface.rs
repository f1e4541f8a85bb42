use std::cell::RefCell;
use std::rc::Rc;

use crate::core::ChartDataSnapshot;
use crate::error::{SyncError, SyncResult};
use crate::render::{RenderSurface, SurfaceOptions};
use crate::sync::UpdateMode;

/// One call observed by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Create {
        payload: ChartDataSnapshot,
        options: SurfaceOptions,
    },
    Update {
        payload: ChartDataSnapshot,
        options: SurfaceOptions,
        mode: UpdateMode,
    },
    Destroy,
}

/// Shared view of the calls a surface received, readable after the owning
/// controller took the surface.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    calls: Rc<RefCell<Vec<SurfaceCall>>>,
}

impl SurfaceLog {
    #[must_use]
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.borrow().clone()
    }

    /// Modes of every paint in order; `create` counts as an instant paint.
    #[must_use]
    pub fn paints(&self) -> Vec<UpdateMode> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Create { .. } => Some(UpdateMode::Instant),
                SurfaceCall::Update { mode, .. } => Some(*mode),
                SurfaceCall::Destroy => None,
            })
            .collect()
    }

    #[must_use]
    pub fn last_payload(&self) -> Option<ChartDataSnapshot> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            SurfaceCall::Create { payload, .. } | SurfaceCall::Update { payload, .. } => {
                Some(payload.clone())
            }
            SurfaceCall::Destroy => None,
        })
    }

    #[must_use]
    pub fn destroyed(&self) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|call| matches!(call, SurfaceCall::Destroy))
    }

    fn push(&self, call: SurfaceCall) {
        self.calls.borrow_mut().push(call);
    }
}

/// Headless surface used by tests and hosts without a drawing backend.
///
/// It still validates options so tests catch degenerate axes before a real
/// backend sees them.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    log: SurfaceLog,
    fail_updates: bool,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> (Self, SurfaceLog) {
        let surface = Self::default();
        let log = surface.log.clone();
        (surface, log)
    }

    /// Makes every `update` fail after recording it.
    #[must_use]
    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }
}

impl RenderSurface for RecordingSurface {
    fn create(&mut self, payload: &ChartDataSnapshot, options: &SurfaceOptions) -> SyncResult<()> {
        options.validate()?;
        self.log.push(SurfaceCall::Create {
            payload: payload.clone(),
            options: *options,
        });
        Ok(())
    }

    fn update(
        &mut self,
        payload: &ChartDataSnapshot,
        options: &SurfaceOptions,
        mode: UpdateMode,
    ) -> SyncResult<()> {
        options.validate()?;
        self.log.push(SurfaceCall::Update {
            payload: payload.clone(),
            options: *options,
            mode,
        });
        if self.fail_updates {
            return Err(SyncError::Surface("injected update failure".to_owned()));
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.log.push(SurfaceCall::Destroy);
    }
}
