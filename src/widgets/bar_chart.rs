// File: src/widgets/bar_chart.rs
// Baseline vs. current throughput comparison with a latest-delta highlight

use serde::Serialize;

use super::ChartError;
use crate::data_models::TimeSample;

pub const TITLE: &str = "Throughput Performance";
pub const BASELINE_LABEL: &str = "Baseline";
pub const BASELINE_COLOR: &str = "#60a5fa";
pub const CURRENT_LABEL: &str = "RRM-Plus";
pub const CURRENT_COLOR: &str = "#f97316";
pub const UNIT: &str = "Mbps";

/// Sentinel shown when the delta has no defined value
pub const DELTA_UNAVAILABLE: &str = "N/A";

/// One time bucket with both bar heights as fractions of the chart height
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroupView {
    pub label: String,
    pub baseline: f64,
    pub current: f64,
    pub baseline_fraction: f64,
    pub current_fraction: f64,
}

impl BarGroupView {
    pub fn baseline_tooltip(&self) -> String {
        format!("Baseline: {} {}", self.baseline, UNIT)
    }

    pub fn current_tooltip(&self) -> String {
        format!("Current: {} {}", self.current, UNIT)
    }
}

/// Highlight derived from the most recent sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaHighlight {
    pub current_value: f64,
    /// Undefined when the baseline is zero
    pub delta_percent: Option<f64>,
}

impl DeltaHighlight {
    fn from_sample(sample: &TimeSample) -> Self {
        let delta_percent = if sample.baseline > 0.0 {
            Some((sample.current / sample.baseline - 1.0) * 100.0)
        } else {
            None
        };

        Self {
            current_value: sample.current,
            delta_percent,
        }
    }

    /// Signed badge text ("+15.6%") or the sentinel
    pub fn badge(&self) -> String {
        match self.delta_percent {
            Some(delta) => format!("{:+.1}%", delta),
            None => DELTA_UNAVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartView {
    pub scale_max: f64,
    pub groups: Vec<BarGroupView>,
    pub highlight: DeltaHighlight,
}

impl BarChartView {
    /// Scale every bar against the largest value of either series.
    ///
    /// An all-zero chart renders every bar at zero height.
    pub fn build(samples: &[TimeSample]) -> Result<Self, ChartError> {
        let last = samples.last().ok_or(ChartError::NoSamples)?;

        if let Some(bad) = samples
            .iter()
            .find(|s| !s.baseline.is_finite() || !s.current.is_finite())
        {
            return Err(ChartError::NonFiniteSample {
                label: bad.label.clone(),
            });
        }

        let scale_max = samples
            .iter()
            .map(|s| s.baseline.max(s.current))
            .fold(0.0_f64, f64::max);

        let fraction = |value: f64| {
            if scale_max > 0.0 {
                (value / scale_max).clamp(0.0, 1.0)
            } else {
                0.0
            }
        };

        let groups = samples
            .iter()
            .map(|s| BarGroupView {
                label: s.label.clone(),
                baseline: s.baseline,
                current: s.current,
                baseline_fraction: fraction(s.baseline),
                current_fraction: fraction(s.current),
            })
            .collect();

        Ok(Self {
            scale_max,
            groups,
            highlight: DeltaHighlight::from_sample(last),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixtures;

    fn sample(label: &str, baseline: f64, current: f64) -> TimeSample {
        TimeSample {
            label: label.to_string(),
            baseline,
            current,
        }
    }

    #[test]
    fn empty_series_is_rejected() {
        assert_eq!(BarChartView::build(&[]), Err(ChartError::NoSamples));
        assert_eq!(
            ChartError::NoSamples.to_string(),
            "cannot render chart with zero samples"
        );
    }

    #[test]
    fn fractions_are_bounded_and_max_is_one() {
        let chart = BarChartView::build(&Fixtures::demo().throughput_history).unwrap();
        assert_eq!(chart.scale_max, 61.0);

        for group in &chart.groups {
            assert!((0.0..=1.0).contains(&group.baseline_fraction));
            assert!((0.0..=1.0).contains(&group.current_fraction));
        }
        assert!(chart.groups.iter().any(|g| g.current_fraction == 1.0));
        assert_eq!(chart.groups[0].label, "00:00");
    }

    #[test]
    fn baseline_series_can_hold_the_maximum() {
        let chart = BarChartView::build(&[sample("a", 80.0, 20.0), sample("b", 10.0, 40.0)]).unwrap();
        assert_eq!(chart.groups[0].baseline_fraction, 1.0);
        assert_eq!(chart.groups[1].current_fraction, 0.5);
    }

    #[test]
    fn all_zero_chart_is_flat() {
        let chart = BarChartView::build(&[sample("a", 0.0, 0.0), sample("b", 0.0, 0.0)]).unwrap();
        assert_eq!(chart.scale_max, 0.0);
        assert!(chart
            .groups
            .iter()
            .all(|g| g.baseline_fraction == 0.0 && g.current_fraction == 0.0));
    }

    #[test]
    fn delta_of_last_sample() {
        let chart = BarChartView::build(&[sample("x", 10.0, 10.0), sample("00:00", 45.0, 52.0)]).unwrap();
        let delta = chart.highlight.delta_percent.unwrap();
        assert!((delta - 15.555).abs() < 0.01);
        assert_eq!(chart.highlight.current_value, 52.0);
        assert_eq!(chart.highlight.badge(), "+15.6%");
    }

    #[test]
    fn zero_baseline_yields_sentinel() {
        let chart = BarChartView::build(&[sample("00:00", 0.0, 30.0)]).unwrap();
        assert_eq!(chart.highlight.delta_percent, None);
        assert_eq!(chart.highlight.badge(), DELTA_UNAVAILABLE);
    }

    #[test]
    fn negative_delta_keeps_sign() {
        let chart = BarChartView::build(&[sample("00:00", 50.0, 48.5)]).unwrap();
        assert_eq!(chart.highlight.badge(), "-3.0%");
    }

    #[test]
    fn non_finite_sample_fails_fast() {
        let err = BarChartView::build(&[sample("04:00", f64::NAN, 1.0)]).unwrap_err();
        assert_eq!(err, ChartError::NonFiniteSample { label: "04:00".to_string() });
    }

    #[test]
    fn tooltips_name_the_series() {
        let chart = BarChartView::build(&[sample("00:00", 45.0, 52.0)]).unwrap();
        assert_eq!(chart.groups[0].baseline_tooltip(), "Baseline: 45 Mbps");
        assert_eq!(chart.groups[0].current_tooltip(), "Current: 52 Mbps");
    }
}
