// File: src/data_models.rs
// Shared data structures and models for all interfaces

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::widgets::MetricTileView;

/// One scalar KPI as shown on a metric tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub title: String,
    pub value: f64,
    pub unit: String,
    pub trend_percent: Option<f64>,
}

/// One time bucket of the throughput comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSample {
    pub label: String,
    pub baseline: f64,
    pub current: f64,
}

/// One interference source category with its observation count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterferenceSlice {
    pub category: String,
    pub count: u64,
    pub color: String,
}

/// Access point health classification.
///
/// The set is open: statuses the dashboard does not know yet are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApStatus {
    Optimal,
    Warning,
    Critical,
    Other(String),
}

impl ApStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ApStatus::Optimal => "optimal",
            ApStatus::Warning => "warning",
            ApStatus::Critical => "critical",
            ApStatus::Other(s) => s,
        }
    }
}

impl From<String> for ApStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "optimal" => ApStatus::Optimal,
            "warning" => ApStatus::Warning,
            "critical" => ApStatus::Critical,
            _ => ApStatus::Other(value),
        }
    }
}

impl From<ApStatus> for String {
    fn from(value: ApStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ApStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wireless client associated with an access point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub rssi_dbm: i32,
    pub snr_db: i32,
    pub uplink_mbps: f64,
    pub downlink_mbps: f64,
}

/// Access point with its associated clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPoint {
    pub id: String,
    pub channel: u32,
    pub power_dbm: i32,
    pub rssi_dbm: i32,
    pub status: ApStatus,
    pub clients: Vec<Client>,
}

impl AccessPoint {
    /// Number of associated clients, always derived from the client list
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

/// One entry of the RRM change history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub timestamp: String,
    pub ap_id: String,
    pub action: String,
    pub from_value: String,
    pub to_value: String,
    pub reason: String,
}

/// The six KPI values refreshed by the periodic generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub edge_client_throughput: f64,
    pub retry_rate: f64,
    pub uplink_per: f64,
    pub steering_acceptance: f64,
    pub config_churn: f64,
    pub sensing_airtime_cost: f64,
}

impl Default for KpiSnapshot {
    fn default() -> Self {
        Self {
            edge_client_throughput: 52.5,
            retry_rate: 4.8,
            uplink_per: 2.3,
            steering_acceptance: 89.2,
            config_churn: 0.18,
            sensing_airtime_cost: 1.6,
        }
    }
}

impl KpiSnapshot {
    pub fn is_finite(&self) -> bool {
        [
            self.edge_client_throughput,
            self.retry_rate,
            self.uplink_per,
            self.steering_acceptance,
            self.config_churn,
            self.sensing_airtime_cost,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Project the snapshot onto the six overview tiles, in display order
    pub fn metrics(&self) -> Vec<Metric> {
        let tile = |title: &str, value: f64, unit: &str, trend: f64| Metric {
            title: title.to_string(),
            value,
            unit: unit.to_string(),
            trend_percent: Some(trend),
        };

        vec![
            tile("Edge Client Throughput", self.edge_client_throughput, " Mbps", 28.5),
            tile("P95 Retry Rate", self.retry_rate, "%", -22.3),
            tile("Uplink PER", self.uplink_per, "%", -18.7),
            tile("Steering Acceptance", self.steering_acceptance, "%", 12.4),
            tile("Config Churn", self.config_churn, "/AP/day", -5.2),
            tile("Sensing Overhead", self.sensing_airtime_cost, "%", 2.1),
        ]
    }
}

/// Dashboard tab; exactly one is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Overview,
    AccessPoints,
    RecentChanges,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::AccessPoints, Tab::RecentChanges];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::AccessPoints => "Access Points",
            Tab::RecentChanges => "Recent Changes",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::AccessPoints => "access-points",
            Tab::RecentChanges => "recent-changes",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::AccessPoints => 1,
            Tab::RecentChanges => 2,
        }
    }

    pub fn next(&self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    /// Map a display label or key to a tab ("Access Points", "access points"
    /// and "access-points" all resolve to the same tab)
    pub fn from_label(label: &str) -> Option<Self> {
        let key = normalize_label(label);
        Tab::ALL.into_iter().find(|tab| tab.key() == key)
    }
}

impl FromStr for Tab {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::from_label(s).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown tab '{}'. Use one of: overview, access-points, recent-changes",
                s
            )
        })
    }
}

fn normalize_label(label: &str) -> String {
    label
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// WebSocket message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WebSocketMessage {
    /// Request the rendered view of one tab
    GetDashboard { tab: Option<String> },

    /// Rendered tab view response
    Dashboard { view: serde_json::Value },

    /// Pushed after every KPI refresh tick
    KpiUpdate {
        kpis: KpiSnapshot,
        tiles: Vec<MetricTileView>,
        updated_at: i64,
    },

    /// Error response
    Error { message: String },

    /// Ping/Pong for connection health
    Ping,
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_labels_are_normalized() {
        assert_eq!(Tab::from_label("Access Points"), Some(Tab::AccessPoints));
        assert_eq!(Tab::from_label("  recent   CHANGES "), Some(Tab::RecentChanges));
        assert_eq!(Tab::from_label("access-points"), Some(Tab::AccessPoints));
        assert_eq!(Tab::from_label("Overview"), Some(Tab::Overview));
        assert_eq!(Tab::from_label("settings"), None);
        assert!("bogus".parse::<Tab>().is_err());
    }

    #[test]
    fn tab_cycling_wraps() {
        assert_eq!(Tab::Overview.next(), Tab::AccessPoints);
        assert_eq!(Tab::RecentChanges.next(), Tab::Overview);
        assert_eq!(Tab::Overview.previous(), Tab::RecentChanges);
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status: ApStatus = serde_json::from_str("\"degraded\"").unwrap();
        assert_eq!(status, ApStatus::Other("degraded".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"degraded\"");

        let status: ApStatus = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(status, ApStatus::Warning);
    }

    #[test]
    fn snapshot_projects_six_tiles() {
        let metrics = KpiSnapshot::default().metrics();
        assert_eq!(metrics.len(), 6);
        assert_eq!(metrics[0].title, "Edge Client Throughput");
        assert_eq!(metrics[0].value, 52.5);
        assert_eq!(metrics[4].unit, "/AP/day");
        assert_eq!(metrics[1].trend_percent, Some(-22.3));
    }

    #[test]
    fn non_finite_snapshot_is_detected() {
        let mut kpis = KpiSnapshot::default();
        assert!(kpis.is_finite());
        kpis.uplink_per = f64::NAN;
        assert!(!kpis.is_finite());
    }
}
