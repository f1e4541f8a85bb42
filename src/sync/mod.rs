//! Coordination primitives shared by the chart controllers.

mod coalescer;
mod readiness;
mod update_mode;

pub use coalescer::{CoalescerStats, DEFAULT_COALESCE_WINDOW, RedrawCoalescer};
pub use readiness::{ReadinessBarrier, ReadyWaiter};
pub use update_mode::{ModePolicy, RedrawRequest, RedrawTrigger, UpdateMode, UpdateModeSelector};
