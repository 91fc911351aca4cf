// File: src/dashboard.rs
// Dashboard shell: active tab, KPI values, access point rows and view routing

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use crate::data_models::{AccessPoint, ChangeEvent, KpiSnapshot, Tab};
use crate::fixtures::Fixtures;
use crate::refresh::{KpiGenerator, RefreshTask};
use crate::widgets::{
    AccessPointRow, ApRowView, BarChartView, ChartError, DonutChartView, MetricTileView, RowState,
};

pub const TITLE: &str = "RRM-Plus Dashboard";
pub const SUBTITLE: &str = "Real-time WiFi Radio Resource Management";
pub const PERIOD_LABEL: &str = "Last 24 hours";
pub const FOOTER: &str = "Arista Networks RRM-Plus • Inter IIT Tech Meet 14.0 • Powered by AI & Additional Radio";

/// Rendered content of the active tab
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "tab", rename_all = "kebab-case")]
pub enum ShellView {
    Overview(OverviewView),
    AccessPoints(AccessPointsView),
    RecentChanges(RecentChangesView),
}

impl ShellView {
    pub fn tab(&self) -> Tab {
        match self {
            ShellView::Overview(_) => Tab::Overview,
            ShellView::AccessPoints(_) => Tab::AccessPoints,
            ShellView::RecentChanges(_) => Tab::RecentChanges,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewView {
    pub tiles: Vec<MetricTileView>,
    pub throughput: BarChartView,
    pub interference: DonutChartView,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessPointsView {
    pub title: &'static str,
    pub badge: String,
    pub rows: Vec<ApRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentChangesView {
    pub title: &'static str,
    pub badge: String,
    pub items: Vec<TimelineItemView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineItemView {
    pub ap_id: String,
    pub timestamp: String,
    pub action: String,
    pub details: String,
    pub reason: String,
}

impl From<&ChangeEvent> for TimelineItemView {
    fn from(change: &ChangeEvent) -> Self {
        Self {
            ap_id: change.ap_id.clone(),
            timestamp: change.timestamp.clone(),
            action: change.action.clone(),
            details: format!("{} → {}", change.from_value, change.to_value),
            reason: change.reason.clone(),
        }
    }
}

struct MountedRefresh {
    task: RefreshTask,
    kpi_rx: watch::Receiver<KpiSnapshot>,
}

/// Top-level view state.
///
/// Owns the active tab, the current KPI set and one row per access point.
/// Chart inputs are shared read-only fixtures.
pub struct DashboardShell {
    fixtures: Arc<Fixtures>,
    active_tab: Tab,
    kpis: KpiSnapshot,
    rows: Vec<AccessPointRow>,
    refresh: Option<MountedRefresh>,
}

impl DashboardShell {
    pub fn new(fixtures: Arc<Fixtures>) -> Self {
        let mut shell = Self {
            kpis: fixtures.initial_kpis,
            active_tab: Tab::default(),
            rows: Vec::new(),
            refresh: None,
            fixtures: fixtures.clone(),
        };
        shell.set_access_points(&fixtures.access_points);
        shell
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.active_tab != tab {
            tracing::debug!(from = self.active_tab.key(), to = tab.key(), "tab switched");
        }
        self.active_tab = tab;
    }

    /// Select a tab by its display label; unknown labels leave the tab unchanged
    pub fn select_tab_label(&mut self, label: &str) -> Option<Tab> {
        let tab = Tab::from_label(label)?;
        self.select_tab(tab);
        Some(tab)
    }

    pub fn kpis(&self) -> &KpiSnapshot {
        &self.kpis
    }

    /// Replace the whole KPI set at once
    pub fn apply_kpis(&mut self, kpis: KpiSnapshot) {
        self.kpis = kpis;
    }

    pub fn rows(&self) -> &[AccessPointRow] {
        &self.rows
    }

    /// Replace the access point collection; rows start collapsed again
    pub fn set_access_points(&mut self, access_points: &[Arc<AccessPoint>]) {
        self.rows = build_rows(access_points);
    }

    /// Activate the row of one access point; returns its new state, or
    /// `None` when no row has that id
    pub fn toggle_row(&mut self, ap_id: &str) -> Option<RowState> {
        self.rows
            .iter_mut()
            .find(|row| row.ap_id() == ap_id)
            .map(AccessPointRow::activate)
    }

    pub fn recent_changes(&self) -> &[ChangeEvent] {
        &self.fixtures.recent_changes
    }

    /// Start the periodic KPI refresh. A shell mounted twice keeps its
    /// first refresh task.
    pub fn mount<G: KpiGenerator>(&mut self, generator: G, period: Duration) {
        if self.is_mounted() {
            tracing::warn!("dashboard already mounted; ignoring second mount");
            return;
        }
        let (task, kpi_rx) = RefreshTask::start(generator, self.kpis, period);
        self.refresh = Some(MountedRefresh { task, kpi_rx });
    }

    pub fn is_mounted(&self) -> bool {
        self.refresh.is_some()
    }

    /// Adopt the latest refreshed KPI set, if a new one arrived since the
    /// last call. Returns whether the KPIs changed.
    pub fn poll_refresh(&mut self) -> bool {
        let Some(mounted) = self.refresh.as_mut() else {
            return false;
        };
        match mounted.kpi_rx.has_changed() {
            Ok(true) => {
                let kpis = *mounted.kpi_rx.borrow_and_update();
                self.apply_kpis(kpis);
                true
            }
            _ => false,
        }
    }

    /// Stop the refresh task and wait until it has exited
    pub async fn teardown(&mut self) {
        if let Some(mounted) = self.refresh.take() {
            let ticks = mounted.task.stop().await;
            tracing::info!(ticks, "dashboard torn down");
        }
    }

    pub fn metric_tiles(&self) -> Vec<MetricTileView> {
        self.kpis()
            .metrics()
            .iter()
            .map(MetricTileView::from_metric)
            .collect()
    }

    pub fn throughput_chart(&self) -> Result<BarChartView, ChartError> {
        BarChartView::build(&self.fixtures.throughput_history)
    }

    pub fn interference_chart(&self) -> Result<DonutChartView, ChartError> {
        DonutChartView::build(&self.fixtures.interference)
    }

    /// Render exactly the active tab
    pub fn render(&self) -> Result<ShellView, ChartError> {
        let view = match self.active_tab {
            Tab::Overview => ShellView::Overview(OverviewView {
                tiles: self.metric_tiles(),
                throughput: self.throughput_chart()?,
                interference: self.interference_chart()?,
            }),
            Tab::AccessPoints => ShellView::AccessPoints(AccessPointsView {
                title: "Access Point Status",
                badge: format!("{} APs", self.rows.len()),
                rows: self.rows.iter().map(AccessPointRow::view).collect(),
            }),
            Tab::RecentChanges => ShellView::RecentChanges(RecentChangesView {
                title: "Recent RRM Changes",
                badge: format!("{} changes", self.recent_changes().len()),
                items: self
                    .recent_changes()
                    .iter()
                    .map(TimelineItemView::from)
                    .collect(),
            }),
        };
        Ok(view)
    }
}

fn build_rows(access_points: &[Arc<AccessPoint>]) -> Vec<AccessPointRow> {
    access_points
        .iter()
        .cloned()
        .map(AccessPointRow::new)
        .collect()
}
