// File: src/widgets/ap_row.rs
// Expandable access-point row with its nested client table

use std::sync::Arc;

use serde::Serialize;

use crate::data_models::{AccessPoint, ApStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowState {
    #[default]
    Collapsed,
    Expanded,
}

impl RowState {
    pub fn toggled(self) -> Self {
        match self {
            RowState::Collapsed => RowState::Expanded,
            RowState::Expanded => RowState::Collapsed,
        }
    }

    pub fn chevron(&self) -> &'static str {
        match self {
            RowState::Collapsed => "▸",
            RowState::Expanded => "▾",
        }
    }
}

/// One access point row; owns nothing but its own open/closed flag
#[derive(Debug, Clone)]
pub struct AccessPointRow {
    ap: Arc<AccessPoint>,
    state: RowState,
}

impl AccessPointRow {
    pub fn new(ap: Arc<AccessPoint>) -> Self {
        Self {
            ap,
            state: RowState::default(),
        }
    }

    pub fn ap_id(&self) -> &str {
        &self.ap.id
    }

    pub fn state(&self) -> RowState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state() == RowState::Expanded
    }

    /// User activation (click, tap, Enter) flips the row
    pub fn activate(&mut self) -> RowState {
        self.state = self.state.toggled();
        tracing::debug!(ap = %self.ap.id, state = ?self.state, "row toggled");
        self.state
    }

    pub fn view(&self) -> ApRowView {
        let ap = &*self.ap;
        ApRowView {
            id: ap.id.clone(),
            chevron: self.state.chevron(),
            channel: ap.channel,
            power: format!("{} dBm", ap.power_dbm),
            client_count: ap.client_count(),
            rssi: format!("{} dBm", ap.rssi_dbm),
            status: ap.status.clone(),
            state: self.state,
            clients: self.is_expanded().then(|| ClientTableView::for_access_point(ap)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApRowView {
    pub id: String,
    pub chevron: &'static str,
    pub channel: u32,
    pub power: String,
    pub client_count: usize,
    pub rssi: String,
    pub status: ApStatus,
    pub state: RowState,
    /// Present only while the row is expanded
    pub clients: Option<ClientTableView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientTableView {
    pub title: String,
    pub rows: Vec<ClientRowView>,
}

impl ClientTableView {
    pub const HEADERS: [&'static str; 5] = ["Client ID", "RSSI", "SNR", "Uplink", "Downlink"];

    pub fn for_access_point(ap: &AccessPoint) -> Self {
        Self {
            title: format!("Clients connected to {}", ap.id),
            rows: ap
                .clients
                .iter()
                .map(|c| ClientRowView {
                    id: c.id.clone(),
                    rssi: format!("{} dBm", c.rssi_dbm),
                    snr: format!("{} dB", c.snr_db),
                    uplink: format!("{} Mbps", c.uplink_mbps),
                    downlink: format!("{} Mbps", c.downlink_mbps),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRowView {
    pub id: String,
    pub rssi: String,
    pub snr: String,
    pub uplink: String,
    pub downlink: String,
}
