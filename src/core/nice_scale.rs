use serde::{Deserialize, Serialize};

/// Axis bounds and spacing rounded to human-friendly values.
///
/// Derived on every redraw from the current data range; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRange {
    /// Number of tick intervals between `nice_min` and `nice_max`.
    pub tick_count: usize,
    pub tick_spacing: f64,
    pub nice_min: f64,
    pub nice_max: f64,
}

impl TickRange {
    /// Tick positions from `nice_min` to `nice_max` inclusive.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        (0..=self.tick_count)
            .map(|index| (self.nice_min + self.tick_spacing * index as f64).min(self.nice_max))
            .collect()
    }

    #[must_use]
    pub fn span(&self) -> f64 {
        self.nice_max - self.nice_min
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NiceRounding {
    Ceil,
    Round,
}

/// Rounds `value` to 1, 2, 5 or 10 times a power of ten.
///
/// Results that would overflow fall back to `value` itself.
fn nice_number(value: f64, rounding: NiceRounding) -> f64 {
    if value.is_nan() || value <= 0.0 {
        return 1.0;
    }
    if value.is_infinite() {
        return f64::MAX;
    }

    let exponent = value.log10().floor();
    let magnitude = 10.0_f64.powf(exponent);
    let fraction = value / magnitude;

    let nice_fraction = match rounding {
        NiceRounding::Round => {
            if fraction < 1.5 {
                1.0
            } else if fraction < 3.0 {
                2.0
            } else if fraction < 7.0 {
                5.0
            } else {
                10.0
            }
        }
        NiceRounding::Ceil => {
            if fraction <= 1.0 {
                1.0
            } else if fraction <= 2.0 {
                2.0
            } else if fraction <= 5.0 {
                5.0
            } else {
                10.0
            }
        }
    };

    let nice = nice_fraction * magnitude;
    if nice.is_finite() { nice } else { value }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Computes nice axis bounds for `[min_point, max_point]` using at most
/// `max_ticks` ticks.
///
/// Degenerate input never faults: `max_ticks < 2` is clamped to 2, non-finite
/// bounds are read as `0.0`, reversed bounds are swapped and an empty range
/// is widened to `1.0` above `min_point` (proportionally for large
/// magnitudes).
///
/// `nice_min <= min_point` and `nice_max >= max_point` hold exactly. A bound
/// whose nice multiple is not representable saturates to `±f64::MAX`.
#[must_use]
pub fn compute_ticks(max_ticks: usize, min_point: f64, max_point: f64) -> TickRange {
    let max_ticks = max_ticks.max(2);
    let (mut low, mut high) = (finite_or_zero(min_point), finite_or_zero(max_point));
    if high < low {
        std::mem::swap(&mut low, &mut high);
    }
    if high - low <= 0.0 {
        let widen = (low.abs() * 1e-9).max(1.0);
        if (low + widen).is_finite() {
            high = low + widen;
        } else {
            low -= widen;
        }
    }

    let span = (high - low).min(f64::MAX);
    let range = nice_number(span, NiceRounding::Ceil);
    let tick_spacing = nice_number(range / (max_ticks - 1) as f64, NiceRounding::Round);

    let mut first_step = (low / tick_spacing).floor();
    let mut last_step = (high / tick_spacing).ceil();
    if first_step * tick_spacing > low {
        first_step -= 1.0;
    }
    if last_step * tick_spacing < high {
        last_step += 1.0;
    }

    let nice_min = (first_step * tick_spacing).max(-f64::MAX);
    let nice_max = (last_step * tick_spacing).min(f64::MAX);
    let tick_count = (last_step - first_step) as usize;

    TickRange {
        tick_count,
        tick_spacing,
        nice_min,
        nice_max,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{NiceRounding, compute_ticks, nice_number};

    #[test]
    fn nice_number_rounds_to_one_two_five_ten() {
        assert_relative_eq!(nice_number(1.2, NiceRounding::Round), 1.0);
        assert_relative_eq!(nice_number(2.9, NiceRounding::Round), 2.0);
        assert_relative_eq!(nice_number(6.9, NiceRounding::Round), 5.0);
        assert_relative_eq!(nice_number(8.0, NiceRounding::Round), 10.0);
        assert_relative_eq!(nice_number(1.2, NiceRounding::Ceil), 2.0);
        assert_relative_eq!(nice_number(420.0, NiceRounding::Ceil), 500.0);
        assert_relative_eq!(nice_number(0.031, NiceRounding::Ceil), 0.05);
    }

    #[test]
    fn expense_range_produces_round_axis() {
        let ticks = compute_ticks(7, 0.0, 1_834.5);
        assert_relative_eq!(ticks.tick_spacing, 500.0);
        assert_relative_eq!(ticks.nice_min, 0.0);
        assert_relative_eq!(ticks.nice_max, 2_000.0);
        assert_eq!(ticks.tick_count, 4);
        assert_eq!(ticks.values(), vec![0.0, 500.0, 1_000.0, 1_500.0, 2_000.0]);
    }

    #[test]
    fn zero_range_is_widened_instead_of_faulting() {
        let ticks = compute_ticks(7, 0.0, 0.0);
        assert!(ticks.nice_max.is_finite());
        assert!(ticks.nice_max >= 0.0);
        assert!(ticks.tick_spacing > 0.0);
        assert_relative_eq!(ticks.nice_max, 1.0);
    }

    #[test]
    fn reversed_and_non_finite_bounds_are_guarded() {
        let reversed = compute_ticks(5, 80.0, 10.0);
        assert!(reversed.nice_min <= 10.0);
        assert!(reversed.nice_max >= 80.0);

        let nan = compute_ticks(5, f64::NAN, f64::INFINITY);
        assert!(nan.nice_min.is_finite());
        assert!(nan.nice_max.is_finite());
    }

    #[test]
    fn overflowing_span_keeps_finite_bounds() {
        let ticks = compute_ticks(7, -1e308, 1e308);
        assert!(ticks.nice_min.is_finite() && ticks.nice_min <= -1e308);
        assert!(ticks.nice_max.is_finite() && ticks.nice_max >= 1e308);
        assert!(ticks.tick_spacing.is_finite() && ticks.tick_spacing > 0.0);
        assert!(ticks.tick_count <= 16);
        assert!(ticks.values().iter().all(|value| value.is_finite()));

        let edge = compute_ticks(7, 0.0, f64::MAX);
        assert_eq!(edge.nice_max, f64::MAX);
        assert!(edge.values().iter().all(|value| value.is_finite()));
    }

    #[test]
    fn bounds_cover_range_despite_rounding() {
        let ticks = compute_ticks(7, 223.100_000_000_000_02, 223.400_000_000_000_03);
        assert!(ticks.nice_min <= 223.100_000_000_000_02);
        assert!(ticks.nice_max >= 223.400_000_000_000_03);
        assert_eq!(ticks.values().len(), ticks.tick_count + 1);
    }

    #[test]
    fn empty_range_at_large_magnitude_still_has_ticks() {
        let ticks = compute_ticks(7, 1e300, 1e300);
        assert!(ticks.nice_max > ticks.nice_min);
        assert!(ticks.tick_count >= 1);
    }

    #[test]
    fn single_tick_request_is_clamped() {
        let ticks = compute_ticks(0, 0.0, 10.0);
        assert!(ticks.tick_spacing.is_finite());
        assert!(ticks.nice_max >= 10.0);
    }
}
