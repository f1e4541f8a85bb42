use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

use super::color::{CategoryColorMap, Color};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesStyle {
    /// Resolved from the category color map before the payload reaches a surface.
    #[serde(default)]
    pub color: Option<Color>,
}

/// One stacked/segmented series keyed by expense category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    pub category: String,
    pub label: String,
    pub values: Vec<f64>,
    #[serde(default)]
    pub style: SeriesStyle,
}

impl SeriesData {
    #[must_use]
    pub fn new(category: impl Into<String>, label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            category: category.into(),
            label: label.into(),
            values,
            style: SeriesStyle::default(),
        }
    }

    /// Converts decimal expense amounts into plottable values.
    pub fn from_decimal_amounts(
        category: impl Into<String>,
        label: impl Into<String>,
        amounts: &[Decimal],
    ) -> SyncResult<Self> {
        let values = amounts
            .iter()
            .map(|amount| {
                amount.to_f64().ok_or_else(|| {
                    SyncError::InvalidData(format!("amount {amount} is not representable"))
                })
            })
            .collect::<SyncResult<Vec<_>>>()?;
        Ok(Self::new(category, label, values))
    }
}

/// Labels plus series for either chart variant.
///
/// `drill_path` is empty for the comparison chart and for the top level of the
/// breakdown chart; each drilled-into category appends one segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartDataSnapshot {
    pub labels: Vec<String>,
    pub series: Vec<SeriesData>,
    #[serde(default)]
    pub drill_path: Vec<String>,
}

impl ChartDataSnapshot {
    #[must_use]
    pub fn new(labels: Vec<String>, series: Vec<SeriesData>) -> Self {
        Self {
            labels,
            series,
            drill_path: Vec::new(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_drill_path(mut self, drill_path: Vec<String>) -> Self {
        self.drill_path = drill_path;
        self
    }

    #[must_use]
    pub fn nesting_depth(&self) -> usize {
        self.drill_path.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.series.iter().all(|series| series.values.is_empty())
    }

    /// Parses a collaborator JSON payload; malformed input yields an empty snapshot.
    #[must_use]
    pub fn from_json_lenient(input: &str) -> Self {
        match serde_json::from_str::<Self>(input) {
            Ok(snapshot) => snapshot.sanitized(),
            Err(err) => {
                tracing::warn!(error = %err, "treating malformed chart payload as empty");
                Self::empty()
            }
        }
    }

    /// Normalizes upstream data: non-finite values become zero and every
    /// series is padded or truncated to the label count.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let label_count = self.labels.len();
        for series in &mut self.series {
            series.values.resize(label_count, 0.0);
            for value in &mut series.values {
                if !value.is_finite() {
                    *value = 0.0;
                }
            }
        }
        self
    }

    /// Keeps only series whose category appears in `selection` (case-insensitive).
    #[must_use]
    pub fn filtered_to(&self, selection: &[String]) -> Self {
        let wanted: Vec<String> = selection.iter().map(|key| key.to_lowercase()).collect();
        Self {
            labels: self.labels.clone(),
            series: self
                .series
                .iter()
                .filter(|series| wanted.contains(&series.category.to_lowercase()))
                .cloned()
                .collect(),
            drill_path: self.drill_path.clone(),
        }
    }

    /// Resolves every series color through `colors`.
    #[must_use]
    pub fn styled(mut self, colors: &CategoryColorMap) -> Self {
        for series in &mut self.series {
            series.style.color = Some(colors.color_for(&series.category));
        }
        self
    }

    /// Min/max of the plotted values, stacking per label when `stacked`.
    ///
    /// Zero is always included so bars grow from the axis. Non-finite values
    /// are skipped and stacked sums saturate at `±f64::MAX`.
    #[must_use]
    pub fn value_range(&self, stacked: bool) -> (f64, f64) {
        let mut low = 0.0_f64;
        let mut high = 0.0_f64;

        if stacked {
            for index in 0..self.labels.len() {
                let (mut positive, mut negative) = (0.0_f64, 0.0_f64);
                let values = self.series.iter().filter_map(|s| s.values.get(index));
                for value in values.filter(|value| value.is_finite()) {
                    if *value >= 0.0 {
                        positive = (positive + value).min(f64::MAX);
                    } else {
                        negative = (negative + value).max(-f64::MAX);
                    }
                }
                high = high.max(positive);
                low = low.min(negative);
            }
        } else {
            let values = self.series.iter().flat_map(|s| s.values.iter());
            for value in values.filter(|value| value.is_finite()) {
                high = high.max(*value);
                low = low.min(*value);
            }
        }

        (low, high)
    }
}

/// `count` month labels ending at the month of `last`, oldest first.
#[must_use]
pub fn month_labels(last: NaiveDate, count: usize) -> Vec<String> {
    let Some(anchor) = last.with_day(1) else {
        return Vec::new();
    };
    (0..count)
        .rev()
        .filter_map(|back| anchor.checked_sub_months(Months::new(back as u32)))
        .map(|month| month.format("%b %Y").to_string())
        .collect()
}
