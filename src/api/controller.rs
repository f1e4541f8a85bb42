use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{CategoryColorMap, ChartDataSnapshot};
use crate::error::SyncResult;
use crate::render::{RenderSurface, SurfaceOptions};
use crate::sync::{
    ReadinessBarrier, RedrawCoalescer, RedrawRequest, RedrawTrigger, UpdateMode,
    UpdateModeSelector,
};

use super::{ChartKind, ControllerConfig, ReadinessFlag};

/// Lifecycle of one chart widget's controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    Constructed,
    AwaitingReadiness,
    Idle,
    RedrawPending,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControllerStats {
    pub redraws: u64,
    pub suppressed: u64,
    pub coalesced: u64,
    pub buffered_color_changes: u64,
    pub surface_failures: u64,
}

/// Decides when and how a chart widget's surface redraws.
///
/// Inputs arrive through the setters for the widget's whole visible lifetime.
/// Nothing reaches the surface until every readiness flag required by the
/// chart kind is raised; the first paint is then an instant `create` with the
/// data current at that moment. Later inputs pick an update mode, wait out the
/// coalescing window and are applied from `tick_at`.
///
/// Rendering is best-effort: surface failures are logged and never returned.
pub struct ChartController<S: RenderSurface> {
    kind: ChartKind,
    config: ControllerConfig,
    state: ControllerState,
    barrier: ReadinessBarrier<ReadinessFlag>,
    coalescer: RedrawCoalescer<RedrawRequest<ChartDataSnapshot>>,
    selector: UpdateModeSelector,
    surface: Option<S>,
    surface_created: bool,
    data: ChartDataSnapshot,
    selection: Vec<String>,
    colors: CategoryColorMap,
    rendered: Option<ChartDataSnapshot>,
    suppress_identical: bool,
    stats: ControllerStats,
}

impl<S: RenderSurface> ChartController<S> {
    pub fn new(kind: ChartKind, config: ControllerConfig) -> SyncResult<Self> {
        config.validate()?;
        let colors = config.empty_color_map()?;
        let suppress_identical = config
            .suppress_identical_payloads
            .unwrap_or_else(|| kind.suppresses_identical_payloads());

        Ok(Self {
            kind,
            state: ControllerState::Constructed,
            barrier: ReadinessBarrier::new(kind.required_flags().iter().copied()),
            coalescer: RedrawCoalescer::new(config.coalesce_window()),
            selector: UpdateModeSelector::new(kind.mode_policy()),
            surface: None,
            surface_created: false,
            data: ChartDataSnapshot::empty(),
            selection: Vec::new(),
            colors,
            rendered: None,
            suppress_identical,
            stats: ControllerStats::default(),
            config,
        })
    }

    #[must_use]
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.barrier.is_all_ready()
    }

    #[must_use]
    pub fn missing_flags(&self) -> Vec<ReadinessFlag> {
        self.barrier.missing()
    }

    #[must_use]
    pub fn has_pending_redraw(&self) -> bool {
        self.coalescer.has_pending()
    }

    #[must_use]
    pub fn rendered_payload(&self) -> Option<&ChartDataSnapshot> {
        self.rendered.as_ref()
    }

    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> ControllerStats {
        ControllerStats {
            coalesced: self.coalescer.stats().superseded,
            ..self.stats
        }
    }

    /// Time until the pending redraw is due, for hosts scheduling their next tick.
    #[must_use]
    pub fn time_until_flush(&self, now: Instant) -> Option<Duration> {
        if self.state == ControllerState::Destroyed {
            return None;
        }
        self.coalescer.time_until_flush(now)
    }

    /// Runs `waiter` once every readiness flag is raised, right before the
    /// initial paint; immediately when already ready.
    pub fn when_ready(&mut self, waiter: impl FnOnce() + 'static) {
        if self.state == ControllerState::Destroyed {
            return;
        }
        self.barrier.when_all_ready(waiter);
    }

    /// Hands the controller its exclusively owned surface.
    ///
    /// A surface the controller refuses (after teardown, or a second mount)
    /// is destroyed before being dropped.
    pub fn mount_surface(&mut self, mut surface: S) {
        if self.state == ControllerState::Destroyed {
            trace!(kind = ?self.kind, "destroying surface mounted after teardown");
            surface.destroy();
            return;
        }
        if self.surface.is_some() {
            warn!(kind = ?self.kind, "surface already mounted; keeping the first one");
            surface.destroy();
            return;
        }
        self.surface = Some(surface);
        self.raise(ReadinessFlag::SurfaceMounted);
    }

    pub fn set_data(&mut self, snapshot: ChartDataSnapshot) {
        self.set_data_at(snapshot, Instant::now());
    }

    pub fn set_data_at(&mut self, snapshot: ChartDataSnapshot, now: Instant) {
        if !self.accept_input("data") {
            return;
        }
        self.data = snapshot.sanitized();
        trace!(
            kind = ?self.kind,
            labels = self.data.labels.len(),
            series = self.data.series.len(),
            depth = self.data.nesting_depth(),
            "chart data received"
        );
        let mode = self.selector.select(RedrawTrigger::DataChanged {
            depth: self.data.nesting_depth(),
        });
        self.route(ReadinessFlag::PrimaryData, mode, now);
    }

    pub fn set_category_selection(&mut self, selection: Vec<String>) {
        self.set_category_selection_at(selection, Instant::now());
    }

    pub fn set_category_selection_at(&mut self, selection: Vec<String>, now: Instant) {
        if !self.kind.uses_category_selection() {
            debug!(kind = ?self.kind, "chart kind has no category selection; ignoring");
            return;
        }
        if !self.accept_input("category selection") {
            return;
        }
        self.selection = selection;
        let mode = self.selector.select(RedrawTrigger::SelectionChanged);
        self.route(ReadinessFlag::CategorySelection, mode, now);
    }

    pub fn set_color_map(&mut self, colors: CategoryColorMap) {
        self.set_color_map_at(colors, Instant::now());
    }

    /// Replaces category colors; a hidden chart defers the redraw until visible.
    pub fn set_color_map_at(&mut self, colors: CategoryColorMap, now: Instant) {
        if self.state == ControllerState::Destroyed {
            return;
        }
        self.colors = colors;
        match self.selector.select(RedrawTrigger::ColorMapChanged) {
            Some(mode) => self.submit(mode, now),
            None => {
                self.stats.buffered_color_changes += 1;
                trace!(kind = ?self.kind, "color change buffered while hidden");
            }
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.set_visible_at(visible, Instant::now());
    }

    pub fn set_visible_at(&mut self, visible: bool, now: Instant) {
        if self.state == ControllerState::Destroyed {
            return;
        }
        if let Some(mode) = self
            .selector
            .select(RedrawTrigger::VisibilityChanged { visible })
        {
            self.submit(mode, now);
        }
    }

    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// Applies the coalesced redraw once its window has elapsed.
    ///
    /// Returns `true` when the surface was painted.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if self.state == ControllerState::Destroyed {
            return false;
        }
        let Some(request) = self.coalescer.tick_at(now) else {
            return false;
        };
        self.state = ControllerState::Idle;
        self.paint(request)
    }

    /// Tears the controller down: drops any pending redraw and readiness
    /// waiters, then destroys the surface. Idempotent.
    pub fn destroy(&mut self) {
        if self.state == ControllerState::Destroyed {
            return;
        }
        let dropped = self.coalescer.cancel();
        self.barrier.cancel_waiters();
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
        }
        self.state = ControllerState::Destroyed;
        debug!(kind = ?self.kind, dropped_pending = dropped, "chart controller destroyed");
    }

    fn accept_input(&mut self, input: &'static str) -> bool {
        match self.state {
            ControllerState::Destroyed => {
                trace!(kind = ?self.kind, input, "ignoring input after teardown");
                false
            }
            ControllerState::Constructed => {
                self.state = ControllerState::AwaitingReadiness;
                true
            }
            _ => true,
        }
    }

    fn route(&mut self, flag: ReadinessFlag, mode: Option<UpdateMode>, now: Instant) {
        if !self.barrier.is_all_ready() {
            self.raise(flag);
            return;
        }
        if let Some(mode) = mode {
            self.submit(mode, now);
        }
    }

    fn raise(&mut self, flag: ReadinessFlag) {
        match self.barrier.set_ready(flag) {
            Ok(true) => self.initial_paint(),
            Ok(false) => {}
            Err(err) => warn!(kind = ?self.kind, error = %err, "readiness flag rejected"),
        }
    }

    fn initial_paint(&mut self) {
        debug!(kind = ?self.kind, "readiness resolved; painting");
        self.state = ControllerState::Idle;
        let request = RedrawRequest::new(self.render_payload(), UpdateMode::Instant);
        self.paint(request);
    }

    fn submit(&mut self, mode: UpdateMode, now: Instant) {
        if !self.barrier.is_all_ready() {
            return;
        }
        let request = RedrawRequest::new(self.render_payload(), mode);
        self.coalescer.submit_at(request, now);
        self.state = ControllerState::RedrawPending;
    }

    fn render_payload(&self) -> ChartDataSnapshot {
        let visible = if self.kind.uses_category_selection() {
            self.data.filtered_to(&self.selection)
        } else {
            self.data.clone()
        };
        visible.styled(&self.colors)
    }

    fn paint(&mut self, request: RedrawRequest<ChartDataSnapshot>) -> bool {
        if self.suppress_identical && self.rendered.as_ref() == Some(&request.payload) {
            self.stats.suppressed += 1;
            trace!(kind = ?self.kind, "payload unchanged; redraw suppressed");
            return false;
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };

        let stacked = self.kind.is_stacked();
        let options = SurfaceOptions::for_payload(&request.payload, self.config.max_ticks, stacked);
        let result = if self.surface_created {
            surface.update(&request.payload, &options, request.mode)
        } else {
            surface.create(&request.payload, &options)
        };

        match result {
            Ok(()) => {
                self.surface_created = true;
                self.stats.redraws += 1;
                trace!(kind = ?self.kind, mode = ?request.mode, "surface painted");
                self.rendered = Some(request.payload);
                true
            }
            Err(err) => {
                self.stats.surface_failures += 1;
                warn!(kind = ?self.kind, error = %err, "surface redraw failed; skipping");
                false
            }
        }
    }
}

impl<S: RenderSurface> Drop for ChartController<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}
