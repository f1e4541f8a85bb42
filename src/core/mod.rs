pub mod color;
pub mod nice_scale;
pub mod snapshot;

pub use color::{CategoryColorMap, Color};
pub use nice_scale::{TickRange, compute_ticks};
pub use snapshot::{ChartDataSnapshot, SeriesData, SeriesStyle, month_labels};
