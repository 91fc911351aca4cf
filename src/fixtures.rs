// File: src/fixtures.rs
// Pre-built demo datasets consumed by every interface

use std::sync::Arc;

use crate::data_models::{
    AccessPoint, ApStatus, ChangeEvent, Client, InterferenceSlice, KpiSnapshot, TimeSample,
};

/// Static input data for the dashboard
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub initial_kpis: KpiSnapshot,
    pub throughput_history: Vec<TimeSample>,
    pub interference: Vec<InterferenceSlice>,
    pub access_points: Vec<Arc<AccessPoint>>,
    pub recent_changes: Vec<ChangeEvent>,
}

impl Fixtures {
    /// The reference deployment: five APs, six throughput buckets, five
    /// interference classes and four recent changes
    pub fn demo() -> Self {
        Self {
            initial_kpis: KpiSnapshot::default(),
            throughput_history: throughput_history(),
            interference: interference(),
            access_points: access_points().into_iter().map(Arc::new).collect(),
            recent_changes: recent_changes(),
        }
    }
}

fn sample(label: &str, baseline: f64, current: f64) -> TimeSample {
    TimeSample {
        label: label.to_string(),
        baseline,
        current,
    }
}

fn throughput_history() -> Vec<TimeSample> {
    vec![
        sample("00:00", 45.0, 52.0),
        sample("04:00", 48.0, 58.0),
        sample("08:00", 42.0, 56.0),
        sample("12:00", 38.0, 51.0),
        sample("16:00", 44.0, 59.0),
        sample("20:00", 46.0, 61.0),
    ]
}

fn slice(category: &str, count: u64, color: &str) -> InterferenceSlice {
    InterferenceSlice {
        category: category.to_string(),
        count,
        color: color.to_string(),
    }
}

fn interference() -> Vec<InterferenceSlice> {
    vec![
        slice("WiFi", 45, "#8b5cf6"),
        slice("BLE", 23, "#ec4899"),
        slice("ZigBee", 12, "#f97316"),
        slice("Microwave", 8, "#14b8a6"),
        slice("Other", 5, "#64748b"),
    ]
}

fn client(id: &str, rssi_dbm: i32, snr_db: i32, uplink: f64, downlink: f64) -> Client {
    Client {
        id: id.to_string(),
        rssi_dbm,
        snr_db,
        uplink_mbps: uplink,
        downlink_mbps: downlink,
    }
}

fn access_point(
    id: &str,
    channel: u32,
    power_dbm: i32,
    rssi_dbm: i32,
    status: ApStatus,
    clients: Vec<Client>,
) -> AccessPoint {
    AccessPoint {
        id: id.to_string(),
        channel,
        power_dbm,
        rssi_dbm,
        status,
        clients,
    }
}

fn access_points() -> Vec<AccessPoint> {
    vec![
        access_point("AP-01", 36, 17, -45, ApStatus::Optimal, vec![
            client("iPhone-User-1", -55, 35, 120.0, 350.0),
            client("Laptop-Admin", -60, 32, 80.0, 280.0),
            client("Pixel-Guest", -65, 29, 75.0, 250.0),
            client("Smart-TV", -58, 34, 10.0, 150.0),
        ]),
        access_point("AP-02", 48, 14, -52, ApStatus::Optimal, vec![
            client("MacBook-Dev", -50, 40, 250.0, 600.0),
            client("Galaxy-S23", -62, 31, 110.0, 320.0),
            client("Work-PC", -59, 33, 130.0, 400.0),
        ]),
        access_point("AP-03", 149, 20, -68, ApStatus::Warning, vec![
            client("Client-A", -70, 25, 40.0, 100.0),
            client("Client-B", -72, 24, 35.0, 90.0),
            client("Client-C", -68, 27, 50.0, 120.0),
            client("Client-D", -75, 22, 30.0, 80.0),
            client("Client-E", -71, 25, 45.0, 110.0),
        ]),
        access_point("AP-04", 157, 17, -48, ApStatus::Optimal, vec![
            client("iPad-Pro", -53, 38, 180.0, 500.0),
            client("Surface-Book", -56, 36, 150.0, 450.0),
        ]),
        access_point("AP-05", 36, 14, -50, ApStatus::Optimal, vec![
            client("Nest-Cam", -60, 32, 20.0, 20.0),
            client("Smart-Speaker", -58, 33, 15.0, 15.0),
            client("Thermostat", -61, 31, 5.0, 5.0),
        ]),
    ]
}

fn change(
    timestamp: &str,
    ap_id: &str,
    action: &str,
    from_value: &str,
    to_value: &str,
    reason: &str,
) -> ChangeEvent {
    ChangeEvent {
        timestamp: timestamp.to_string(),
        ap_id: ap_id.to_string(),
        action: action.to_string(),
        from_value: from_value.to_string(),
        to_value: to_value.to_string(),
        reason: reason.to_string(),
    }
}

fn recent_changes() -> Vec<ChangeEvent> {
    vec![
        change("14:23:15", "AP-03", "Channel change", "149", "157", "DFS event detected"),
        change("13:45:32", "AP-01", "Power adjustment", "20dBm", "17dBm", "Co-channel interference reduced"),
        change("12:18:09", "AP-05", "OBSS-PD tuned", "-82dBm", "-74dBm", "50% OBSS detected"),
        change("11:32:44", "AP-02", "Client steering", "AP-02", "AP-04", "Load balancing"),
    ]
}
