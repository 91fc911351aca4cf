// File: src/widgets/metric_tile.rs
// KPI tile projection

use serde::{Deserialize, Serialize};

use crate::data_models::Metric;

/// Direction of the trend badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendGlyph {
    Up,
    Down,
    None,
}

impl TrendGlyph {
    pub fn symbol(&self) -> &'static str {
        match self {
            TrendGlyph::Up => "▲",
            TrendGlyph::Down => "▼",
            TrendGlyph::None => "",
        }
    }

    /// Badge polarity class; up is the good direction
    pub fn polarity(&self) -> Option<&'static str> {
        match self {
            TrendGlyph::Up => Some("positive"),
            TrendGlyph::Down => Some("negative"),
            TrendGlyph::None => None,
        }
    }
}

/// Display record for one metric tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTileView {
    pub title: String,
    pub headline: String,
    pub trend_glyph: TrendGlyph,
    pub trend_magnitude: Option<String>,
}

impl MetricTileView {
    /// Pure projection of a metric; the value is assumed finite
    pub fn from_metric(metric: &Metric) -> Self {
        let trend = metric.trend_percent.filter(|t| *t != 0.0);
        let trend_glyph = match trend {
            Some(t) if t > 0.0 => TrendGlyph::Up,
            Some(_) => TrendGlyph::Down,
            None => TrendGlyph::None,
        };

        Self {
            title: metric.title.clone(),
            headline: format!("{:.1}{}", metric.value, metric.unit),
            trend_glyph,
            trend_magnitude: trend.map(|t| format!("{:.1}", t.abs())),
        }
    }

    /// Badge text such as "22.3%", absent when no trend is shown
    pub fn badge(&self) -> Option<String> {
        self.trend_magnitude.as_ref().map(|m| format!("{}%", m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(value: f64, unit: &str, trend: Option<f64>) -> Metric {
        Metric {
            title: "Uplink PER".to_string(),
            value,
            unit: unit.to_string(),
            trend_percent: trend,
        }
    }

    #[test]
    fn positive_trend_points_up() {
        let tile = MetricTileView::from_metric(&metric(52.5, " Mbps", Some(28.5)));
        assert_eq!(tile.headline, "52.5 Mbps");
        assert_eq!(tile.trend_glyph, TrendGlyph::Up);
        assert_eq!(tile.trend_magnitude.as_deref(), Some("28.5"));
        assert_eq!(tile.badge().as_deref(), Some("28.5%"));
    }

    #[test]
    fn negative_trend_shows_magnitude() {
        let tile = MetricTileView::from_metric(&metric(2.34, "%", Some(-18.7)));
        assert_eq!(tile.headline, "2.3%");
        assert_eq!(tile.trend_glyph, TrendGlyph::Down);
        assert_eq!(tile.trend_magnitude.as_deref(), Some("18.7"));
        assert_eq!(tile.trend_glyph.polarity(), Some("negative"));
    }

    #[test]
    fn zero_or_missing_trend_has_no_badge() {
        for trend in [None, Some(0.0)] {
            let tile = MetricTileView::from_metric(&metric(0.18, "/AP/day", trend));
            assert_eq!(tile.headline, "0.2/AP/day");
            assert_eq!(tile.trend_glyph, TrendGlyph::None);
            assert!(tile.badge().is_none());
        }
    }
}
