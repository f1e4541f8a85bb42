//! Width alignment between sibling widgets on one screen.

mod width_consumers;
mod width_probe;
mod width_registry;

pub use width_consumers::{CenterOnPeer, LayoutElement, MatchMaxWidth};
pub use width_probe::{MeasureWidth, ProbeConfig, ProbeStatus, WidthProbe};
pub use width_registry::{
    LayoutWidthRegistry, SharedWidthRegistry, SubscriptionId, WidthObserver, WidthSnapshot,
};
