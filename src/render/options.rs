use serde::{Deserialize, Serialize};

use crate::core::{ChartDataSnapshot, TickRange, compute_ticks};
use crate::error::{SyncError, SyncResult};

/// Style/options block handed to the surface with every create/update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceOptions {
    pub ticks: TickRange,
    pub max_ticks: usize,
    pub category_count: usize,
    pub stacked: bool,
}

impl SurfaceOptions {
    /// Derives options for `payload`; ticks are recomputed from its value range.
    #[must_use]
    pub fn for_payload(payload: &ChartDataSnapshot, max_ticks: usize, stacked: bool) -> Self {
        let (low, high) = payload.value_range(stacked);
        Self {
            ticks: compute_ticks(max_ticks, low, high),
            max_ticks,
            category_count: payload.series.len(),
            stacked,
        }
    }

    pub fn validate(&self) -> SyncResult<()> {
        let ticks = self.ticks;
        if !ticks.nice_min.is_finite() || !ticks.nice_max.is_finite() {
            return Err(SyncError::InvalidData(
                "axis bounds must be finite".to_owned(),
            ));
        }
        if !ticks.tick_spacing.is_finite() || ticks.tick_spacing <= 0.0 {
            return Err(SyncError::InvalidData(
                "tick spacing must be finite and > 0".to_owned(),
            ));
        }
        if ticks.nice_max < ticks.nice_min {
            return Err(SyncError::InvalidData(
                "axis max must not be below axis min".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SurfaceOptions;
    use crate::core::{ChartDataSnapshot, SeriesData};

    #[test]
    fn stacked_totals_near_float_limit_keep_a_covering_axis() {
        let snapshot = ChartDataSnapshot::new(
            vec!["Jan".to_owned()],
            vec![
                SeriesData::new("food", "Food", vec![1e308]),
                SeriesData::new("rent", "Rent", vec![1e308]),
            ],
        );

        let options = SurfaceOptions::for_payload(&snapshot, 7, true);
        assert!(options.validate().is_ok());
        assert_eq!(options.ticks.nice_min, 0.0);
        assert!(options.ticks.nice_max >= 1e308);
        assert!(options.ticks.values().iter().all(|value| value.is_finite()));
    }
}
