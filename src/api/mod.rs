mod chart_kind;
mod controller;
mod controller_config;

pub use chart_kind::{ChartKind, ReadinessFlag};
pub use controller::{ChartController, ControllerState, ControllerStats};
pub use controller_config::ControllerConfig;
