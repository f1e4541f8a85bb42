//! chart-sync: redraw synchronization for expense chart widgets.
//!
//! The crate decides when a chart surface may redraw, coalesces bursts of
//! input into single redraws, picks instant vs. animated updates, scales
//! axes to nice numbers and keeps sibling widget widths aligned. Drawing
//! itself stays behind the `render::RenderSurface` contract.

pub mod api;
pub mod core;
pub mod error;
pub mod layout;
pub mod render;
pub mod sync;
pub mod telemetry;

pub use api::{ChartController, ChartKind, ControllerConfig};
pub use error::{SyncError, SyncResult};
