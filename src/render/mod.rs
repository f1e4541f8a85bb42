mod options;
mod recording_surface;

pub use options::SurfaceOptions;
pub use recording_surface::{RecordingSurface, SurfaceCall, SurfaceLog};

use crate::core::ChartDataSnapshot;
use crate::error::SyncResult;
use crate::sync::UpdateMode;

/// Contract implemented by the drawing backend behind a chart widget.
///
/// The surface is opaque: it receives a fully styled payload plus freshly
/// computed options and owns all pixel work. Controllers call `create` once,
/// `update` for every later redraw and `destroy` on teardown.
pub trait RenderSurface {
    fn create(&mut self, payload: &ChartDataSnapshot, options: &SurfaceOptions) -> SyncResult<()>;

    fn update(
        &mut self,
        payload: &ChartDataSnapshot,
        options: &SurfaceOptions,
        mode: UpdateMode,
    ) -> SyncResult<()>;

    fn destroy(&mut self);
}
