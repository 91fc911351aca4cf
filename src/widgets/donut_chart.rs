// File: src/widgets/donut_chart.rs
// Interference distribution as a donut: angular layout, SVG wedge paths and legend
//
// Angles are in degrees, measured clockwise from 12 o'clock. Points are in
// screen coordinates (y grows downwards) inside a 200x200 view box.

use std::collections::HashSet;

use serde::Serialize;

use super::ChartError;
use crate::data_models::InterferenceSlice;

pub const TITLE: &str = "Interference Classification";
pub const VIEW_BOX: f64 = 200.0;
pub const CENTER: f64 = 100.0;
pub const OUTER_RADIUS: f64 = 70.0;
pub const HOLE_RADIUS: f64 = 40.0;

/// Rendering convention puts angle 0 at 12 o'clock
const REFERENCE_OFFSET_DEG: f64 = -90.0;

/// Point on a circle around the chart center for an angle in chart degrees
pub fn polar_point(angle_deg: f64, radius: f64) -> (f64, f64) {
    let theta = (angle_deg + REFERENCE_OFFSET_DEG).to_radians();
    (CENTER + radius * theta.cos(), CENTER + radius * theta.sin())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSlice {
    pub category: String,
    pub color: String,
    pub count: u64,
    pub percentage: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub start_point: (f64, f64),
    pub end_point: (f64, f64),
    pub large_arc: bool,
}

impl DonutSlice {
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle
    }

    /// Filled wedge from the center to both boundary points
    pub fn svg_path(&self) -> String {
        let c = fmt_coord(CENTER);
        let r = fmt_coord(OUTER_RADIUS);

        if self.sweep_angle >= 360.0 {
            // Boundary points coincide; draw the ring as two half arcs
            let (tx, ty) = polar_point(0.0, OUTER_RADIUS);
            let (bx, by) = polar_point(180.0, OUTER_RADIUS);
            return format!(
                "M {tx} {ty} A {r} {r} 0 1 1 {bx} {by} A {r} {r} 0 1 1 {tx} {ty} Z",
                tx = fmt_coord(tx),
                ty = fmt_coord(ty),
                bx = fmt_coord(bx),
                by = fmt_coord(by),
                r = r,
            );
        }

        let (x1, y1) = self.start_point;
        let (x2, y2) = self.end_point;
        format!(
            "M {c} {c} L {} {} A {r} {r} 0 {} 1 {} {} Z",
            fmt_coord(x1),
            fmt_coord(y1),
            u8::from(self.large_arc),
            fmt_coord(x2),
            fmt_coord(y2),
        )
    }

    pub fn tooltip(&self) -> String {
        format!("{}: {:.1}%", self.category, self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub category: String,
    pub percentage_rounded: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutChartView {
    pub total: u64,
    pub slices: Vec<DonutSlice>,
    pub legend: Vec<LegendEntry>,
}

impl DonutChartView {
    /// Lay the slices out in input order with a single running angle cursor.
    ///
    /// The last slice is closed at exactly 360 degrees so accumulated
    /// rounding never leaves a gap or overlap at 12 o'clock.
    pub fn build(slices: &[InterferenceSlice]) -> Result<Self, ChartError> {
        let mut seen = HashSet::new();
        for slice in slices {
            if !seen.insert(slice.category.as_str()) {
                return Err(ChartError::DuplicateCategory(slice.category.clone()));
            }
        }

        let total = slices
            .iter()
            .try_fold(0u64, |acc, s| acc.checked_add(s.count))
            .ok_or(ChartError::TotalOverflow)?;
        if total == 0 {
            return Err(ChartError::ZeroTotal);
        }

        let total_f = total as f64;
        let last_index = slices.len() - 1;
        let mut cursor = 0.0_f64;

        let laid_out: Vec<DonutSlice> = slices
            .iter()
            .enumerate()
            .map(|(i, slice)| {
                let share = slice.count as f64 / total_f;
                let start_angle = cursor;
                let sweep_angle = if i == last_index {
                    360.0 - start_angle
                } else {
                    share * 360.0
                };
                cursor += sweep_angle;

                DonutSlice {
                    category: slice.category.clone(),
                    color: slice.color.clone(),
                    count: slice.count,
                    percentage: share * 100.0,
                    start_angle,
                    sweep_angle,
                    start_point: polar_point(start_angle, OUTER_RADIUS),
                    end_point: polar_point(start_angle + sweep_angle, OUTER_RADIUS),
                    large_arc: sweep_angle > 180.0,
                }
            })
            .collect();

        let legend = laid_out
            .iter()
            .map(|s| LegendEntry {
                category: s.category.clone(),
                percentage_rounded: s.percentage.round() as u32,
                color: s.color.clone(),
            })
            .collect();

        Ok(Self {
            total,
            slices: laid_out,
            legend,
        })
    }
}

/// Trim coordinates to a stable, compact textual form
fn fmt_coord(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid printing "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixtures;

    fn slice(category: &str, count: u64) -> InterferenceSlice {
        InterferenceSlice {
            category: category.to_string(),
            count,
            color: "#000000".to_string(),
        }
    }

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn reference_distribution() {
        let chart = DonutChartView::build(&Fixtures::demo().interference).unwrap();
        assert_eq!(chart.total, 93);
        assert_eq!(chart.slices.len(), 5);

        assert!(close(chart.slices[0].percentage, 48.387, 0.01));
        assert!(close(chart.slices[4].percentage, 5.376, 0.01));
        assert_eq!(chart.slices[0].category, "WiFi");

        // contiguous, non-overlapping, ending at a full turn
        assert_eq!(chart.slices[0].start_angle, 0.0);
        for pair in chart.slices.windows(2) {
            assert_eq!(pair[0].end_angle(), pair[1].start_angle);
        }
        assert_eq!(chart.slices.last().unwrap().end_angle(), 360.0);

        let sweep: f64 = chart.slices.iter().map(|s| s.sweep_angle).sum();
        let percent: f64 = chart.slices.iter().map(|s| s.percentage).sum();
        assert!(close(sweep, 360.0, 1e-9));
        assert!(close(percent, 100.0, 1e-9));
    }

    #[test]
    fn legend_rounds_to_whole_percent() {
        let chart = DonutChartView::build(&Fixtures::demo().interference).unwrap();
        let rounded: Vec<u32> = chart.legend.iter().map(|l| l.percentage_rounded).collect();
        assert_eq!(rounded, vec![48, 25, 13, 9, 5]);
        assert_eq!(chart.legend[1].color, "#ec4899");
    }

    #[test]
    fn legend_sum_within_rounding_slack() {
        let inputs = [
            vec![slice("a", 1), slice("b", 1), slice("c", 1)],
            vec![slice("a", 7), slice("b", 13), slice("c", 29), slice("d", 51)],
            vec![slice("a", 1), slice("b", 2), slice("c", 3), slice("d", 4), slice("e", 5), slice("f", 6)],
        ];

        for input in inputs {
            let chart = DonutChartView::build(&input).unwrap();
            let sum: i64 = chart.legend.iter().map(|l| l.percentage_rounded as i64).sum();
            let slack = input.len() as i64 - 1;
            assert!((sum - 100).abs() <= slack, "legend sum {} for {:?}", sum, input);
        }
    }

    #[test]
    fn zero_total_is_rejected() {
        assert_eq!(DonutChartView::build(&[]), Err(ChartError::ZeroTotal));
        assert_eq!(
            DonutChartView::build(&[slice("a", 0), slice("b", 0)]),
            Err(ChartError::ZeroTotal)
        );
        assert_eq!(
            ChartError::ZeroTotal.to_string(),
            "cannot render a zero-total distribution"
        );
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let err = DonutChartView::build(&[slice("WiFi", u64::MAX), slice("BLE", 1)]).unwrap_err();
        assert_eq!(err, ChartError::TotalOverflow);
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let err = DonutChartView::build(&[slice("BLE", 1), slice("BLE", 2)]).unwrap_err();
        assert_eq!(err, ChartError::DuplicateCategory("BLE".to_string()));
    }

    #[test]
    fn input_order_is_kept_for_equal_counts() {
        let chart = DonutChartView::build(&[slice("z", 5), slice("a", 5)]).unwrap();
        assert_eq!(chart.slices[0].category, "z");
        assert_eq!(chart.slices[1].start_angle, 180.0);
        assert!(!chart.slices[0].large_arc);
    }

    #[test]
    fn large_arc_flag_above_half_turn() {
        let chart = DonutChartView::build(&[slice("big", 3), slice("small", 1)]).unwrap();
        assert!(chart.slices[0].large_arc);
        assert!(!chart.slices[1].large_arc);
        assert!(chart.slices[0].svg_path().contains(" 0 1 1 "));
    }

    #[test]
    fn wedge_path_starts_at_twelve_o_clock() {
        let chart = DonutChartView::build(&[slice("a", 1), slice("b", 1)]).unwrap();
        assert_eq!(chart.slices[0].svg_path(), "M 100 100 L 100 30 A 70 70 0 0 1 100 170 Z");
        assert_eq!(chart.slices[1].svg_path(), "M 100 100 L 100 170 A 70 70 0 0 1 100 30 Z");
    }

    #[test]
    fn single_slice_draws_full_ring() {
        let chart = DonutChartView::build(&[slice("only", 4), slice("empty", 0)]).unwrap();
        assert_eq!(chart.slices[0].sweep_angle, 360.0);
        assert_eq!(chart.slices[1].sweep_angle, 0.0);
        assert_eq!(
            chart.slices[0].svg_path(),
            "M 100 30 A 70 70 0 1 1 100 170 A 70 70 0 1 1 100 30 Z"
        );
    }

    #[test]
    fn tooltip_uses_one_decimal() {
        let chart = DonutChartView::build(&Fixtures::demo().interference).unwrap();
        assert_eq!(chart.slices[0].tooltip(), "WiFi: 48.4%");
    }
}
