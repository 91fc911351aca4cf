// File: src/widgets/mod.rs
// Presentation models for the dashboard widgets, shared by the CLI, TUI and Web views

pub mod ap_row;
pub mod bar_chart;
pub mod donut_chart;
pub mod metric_tile;

use thiserror::Error;

pub use ap_row::{AccessPointRow, ApRowView, ClientTableView, RowState};
pub use bar_chart::BarChartView;
pub use donut_chart::DonutChartView;
pub use metric_tile::{MetricTileView, TrendGlyph};

/// Degenerate chart input; surfaced to the caller rather than rendered
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("cannot render chart with zero samples")]
    NoSamples,

    #[error("cannot render chart: sample '{label}' has a non-finite value")]
    NonFiniteSample { label: String },

    #[error("cannot render a zero-total distribution")]
    ZeroTotal,

    #[error("distribution total overflows")]
    TotalOverflow,

    #[error("duplicate distribution category '{0}'")]
    DuplicateCategory(String),
}
