use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};

use super::LayoutWidthRegistry;

/// Read access to an element's rendered width.
pub trait MeasureWidth {
    fn measured_width(&self) -> u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> SyncResult<()> {
        if self.interval_ms == 0 {
            return Err(SyncError::InvalidConfig(
                "probe interval_ms must be > 0".to_owned(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(SyncError::InvalidConfig(
                "probe max_attempts must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_interval_ms() -> u64 {
    100
}

fn default_max_attempts() -> u32 {
    50
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Waiting { next_poll: Instant },
    Converged(u32),
    GaveUp,
    Cancelled,
}

impl ProbeStatus {
    #[must_use]
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Waiting { .. })
    }
}

/// One-shot width measurement.
///
/// Polls on a fixed interval until the element first reports a non-zero
/// width, registers it once and stops. Later resizes are not tracked. The
/// probe gives up after `max_attempts` zero readings.
#[derive(Debug, Clone)]
pub struct WidthProbe {
    element_id: String,
    config: ProbeConfig,
    attempts: u32,
    status: ProbeStatus,
}

impl WidthProbe {
    /// Creates a probe whose first poll is due at `now`.
    pub fn new(
        element_id: impl Into<String>,
        config: ProbeConfig,
        now: Instant,
    ) -> SyncResult<Self> {
        config.validate()?;
        Ok(Self {
            element_id: element_id.into(),
            config,
            attempts: 0,
            status: ProbeStatus::Waiting { next_poll: now },
        })
    }

    #[must_use]
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    #[must_use]
    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn time_until_poll(&self, now: Instant) -> Option<Duration> {
        match self.status {
            ProbeStatus::Waiting { next_poll } => {
                Some(next_poll.checked_duration_since(now).unwrap_or(Duration::ZERO))
            }
            _ => None,
        }
    }

    pub fn poll<M: MeasureWidth>(
        &mut self,
        element: &M,
        registry: &mut LayoutWidthRegistry,
    ) -> ProbeStatus {
        self.poll_at(Instant::now(), element, registry)
    }

    /// Measures `element` if a poll is due; finished probes are inert.
    pub fn poll_at<M: MeasureWidth>(
        &mut self,
        now: Instant,
        element: &M,
        registry: &mut LayoutWidthRegistry,
    ) -> ProbeStatus {
        let ProbeStatus::Waiting { next_poll } = self.status else {
            return self.status;
        };
        if now < next_poll {
            return self.status;
        }

        self.attempts += 1;
        let width = element.measured_width();
        self.status = if width > 0 {
            registry.register_width(&self.element_id, width);
            debug!(
                element_id = %self.element_id,
                width,
                attempts = self.attempts,
                "width converged"
            );
            ProbeStatus::Converged(width)
        } else if self.attempts >= self.config.max_attempts {
            warn!(
                element_id = %self.element_id,
                attempts = self.attempts,
                "element never reported a width; giving up"
            );
            ProbeStatus::GaveUp
        } else {
            ProbeStatus::Waiting {
                next_poll: now + self.config.interval(),
            }
        };
        self.status
    }

    /// Stops a pending probe; used when the owning widget is torn down.
    pub fn cancel(&mut self) {
        if !self.status.is_finished() {
            self.status = ProbeStatus::Cancelled;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::{Duration, Instant};

    use super::{MeasureWidth, ProbeConfig, ProbeStatus, WidthProbe};
    use crate::layout::LayoutWidthRegistry;

    struct FakeElement {
        width: Cell<u32>,
    }

    impl MeasureWidth for FakeElement {
        fn measured_width(&self) -> u32 {
            self.width.get()
        }
    }

    #[test]
    fn probe_polls_until_first_non_zero_width() {
        let start = Instant::now();
        let element = FakeElement {
            width: Cell::new(0),
        };
        let mut registry = LayoutWidthRegistry::new();
        let mut probe =
            WidthProbe::new("total", ProbeConfig::default(), start).expect("probe config");

        assert_eq!(
            probe.poll_at(start, &element, &mut registry),
            ProbeStatus::Waiting {
                next_poll: start + Duration::from_millis(100)
            }
        );
        let early = probe.poll_at(start + Duration::from_millis(50), &element, &mut registry);
        assert!(!early.is_finished());
        assert_eq!(probe.attempts(), 1);

        element.width.set(240);
        assert_eq!(
            probe.poll_at(start + Duration::from_millis(100), &element, &mut registry),
            ProbeStatus::Converged(240)
        );
        assert_eq!(registry.width("total"), Some(240));

        element.width.set(300);
        probe.poll_at(start + Duration::from_millis(500), &element, &mut registry);
        assert_eq!(registry.width("total"), Some(240));
    }

    #[test]
    fn probe_gives_up_after_max_attempts() {
        let start = Instant::now();
        let element = FakeElement {
            width: Cell::new(0),
        };
        let mut registry = LayoutWidthRegistry::new();
        let config = ProbeConfig {
            interval_ms: 10,
            max_attempts: 3,
        };
        let mut probe = WidthProbe::new("never", config, start).expect("probe config");

        for step in 0..3 {
            probe.poll_at(start + Duration::from_millis(10 * step), &element, &mut registry);
        }
        assert_eq!(probe.status(), ProbeStatus::GaveUp);
        assert_eq!(probe.time_until_poll(start), None);
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn cancelled_probe_never_registers() {
        let start = Instant::now();
        let element = FakeElement {
            width: Cell::new(90),
        };
        let mut registry = LayoutWidthRegistry::new();
        let mut probe =
            WidthProbe::new("gone", ProbeConfig::default(), start).expect("probe config");
        probe.cancel();

        assert_eq!(
            probe.poll_at(start, &element, &mut registry),
            ProbeStatus::Cancelled
        );
        assert_eq!(registry.width("gone"), None);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = ProbeConfig {
            interval_ms: 0,
            max_attempts: 1,
        };
        assert!(WidthProbe::new("x", config, Instant::now()).is_err());
    }
}
