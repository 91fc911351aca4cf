// File: src/web_server.rs
// Web server with dashboard and WebSocket API - live KPI refresh

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{ws::Message, ws::WebSocket, Path, Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, Router},
    Json,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::dashboard::{DashboardShell, ShellView};
use crate::data_models::{KpiSnapshot, WebSocketMessage};
use crate::fixtures::Fixtures;
use crate::html_view;
use crate::refresh::{RandomKpiGenerator, RefreshTask};
use crate::widgets::{ApRowView, MetricTileView};

/// Query parameters selecting the tab and the open rows
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub tab: Option<String>,
    /// Comma separated AP ids
    pub expand: Option<String>,
}

impl ViewQuery {
    fn expanded(&self) -> BTreeSet<String> {
        html_view::parse_expanded(self.expand.as_deref().unwrap_or_default())
    }
}

/// Current KPI values and their tile projection
#[derive(Debug, Serialize)]
pub struct KpiResponse {
    pub kpis: KpiSnapshot,
    pub tiles: Vec<MetricTileView>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub fixtures: Arc<Fixtures>,
    pub kpis: watch::Receiver<KpiSnapshot>,
}

impl AppState {
    /// Fresh shell for one request: latest KPIs, requested tab and rows
    fn shell_for(&self, query: &ViewQuery) -> Result<(DashboardShell, BTreeSet<String>), ApiError> {
        let mut shell = DashboardShell::new(self.fixtures.clone());
        shell.apply_kpis(*self.kpis.borrow());

        if let Some(label) = query.tab.as_deref() {
            shell
                .select_tab_label(label)
                .ok_or_else(|| ApiError::bad_request(format!("unknown tab '{}'", label)))?;
        }

        let mut expanded = BTreeSet::new();
        for ap_id in query.expanded() {
            if shell.toggle_row(&ap_id).is_some() {
                expanded.insert(ap_id);
            }
        }
        Ok((shell, expanded))
    }
}

/// Error response with a status and a plain-text message
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }
}

impl From<crate::widgets::ChartError> for ApiError {
    fn from(err: crate::widgets::ChartError) -> Self {
        tracing::error!("chart rendering failed: {}", err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Run the web server with the live KPI refresh
pub async fn run_web_mode(fixtures: Arc<Fixtures>, config: &AppConfig, enable_cors: bool) -> Result<()> {
    let (refresh, kpis) = RefreshTask::start(
        RandomKpiGenerator::new(),
        fixtures.initial_kpis,
        config.refresh_interval,
    );

    let app = router(AppState { fixtures, kpis }, enable_cors);

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;

    println!("🌐 Web dashboard available at: http://{}", addr);
    println!("🔌 WebSocket endpoint: ws://{}/ws", addr);
    println!("📊 API endpoints:");
    println!("   GET /api/dashboard?tab=<tab>&expand=<ids> - Rendered tab view");
    println!("   GET /api/kpis - Current KPI tiles");
    println!("   GET /api/access-points/:id - Access point with clients");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "web server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    let ticks = refresh.stop().await;
    tracing::info!(ticks, "web server stopped");

    served?;
    Ok(())
}

/// Build the router; split out so tests can drive the handlers
pub fn router(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(dashboard_html))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/kpis", get(get_kpis))
        .route("/api/access-points/:id", get(get_access_point))
        .route("/ws", get(websocket_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app = app.layer(
            ServiceBuilder::new().layer(
                CorsLayer::new()
                    .allow_origin(tower_http::cors::Any)
                    .allow_methods(tower_http::cors::Any)
                    .allow_headers(tower_http::cors::Any),
            ),
        );
    }

    app
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    println!("🛑 Shutting down web server");
}

/// Serve the rendered dashboard page
async fn dashboard_html(
    Query(query): Query<ViewQuery>,
    State(state): State<AppState>,
) -> Result<Html<String>, ApiError> {
    let (shell, expanded) = state.shell_for(&query)?;
    let view = shell.render()?;
    Ok(Html(html_view::render_page(&view, &expanded)))
}

/// Rendered view of the selected tab via REST API
async fn get_dashboard(
    Query(query): Query<ViewQuery>,
    State(state): State<AppState>,
) -> Result<Json<ShellView>, ApiError> {
    let (shell, _) = state.shell_for(&query)?;
    Ok(Json(shell.render()?))
}

/// Current KPI tiles via REST API
async fn get_kpis(State(state): State<AppState>) -> Json<KpiResponse> {
    Json(kpi_response(*state.kpis.borrow()))
}

fn kpi_response(kpis: KpiSnapshot) -> KpiResponse {
    KpiResponse {
        kpis,
        tiles: kpis.metrics().iter().map(MetricTileView::from_metric).collect(),
    }
}

/// Expanded row of one access point via REST API
async fn get_access_point(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApRowView>, StatusCode> {
    let mut shell = DashboardShell::new(state.fixtures.clone());
    shell.toggle_row(&id).ok_or(StatusCode::NOT_FOUND)?;

    shell
        .rows()
        .iter()
        .find(|row| row.ap_id() == id)
        .map(|row| Json(row.view()))
        .ok_or(StatusCode::NOT_FOUND)
}

/// WebSocket connection handler
async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Handle individual WebSocket connections
async fn handle_websocket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut kpis = state.kpis.clone();

    // Send the current KPIs right away
    let initial = kpi_update(*kpis.borrow_and_update());
    if send_json(&mut sender, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            changed = kpis.changed() => {
                if changed.is_err() {
                    // refresh stopped; the server is going down
                    break;
                }
                let update = kpi_update(*kpis.borrow_and_update());
                if send_json(&mut sender, &update).await.is_err() {
                    break;
                }
            }

            msg = receiver.next() => {
                let Some(Ok(msg)) = msg else {
                    break;
                };

                match msg {
                    Message::Text(text) => {
                        let response = match serde_json::from_str::<WebSocketMessage>(&text) {
                            Ok(request) => handle_websocket_message(request, &state),
                            Err(e) => WebSocketMessage::Error {
                                message: format!("Invalid message: {}", e),
                            },
                        };
                        if send_json(&mut sender, &response).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("websocket closed");
}

async fn send_json<S>(sender: &mut S, message: &WebSocketMessage) -> Result<()>
where
    S: futures::Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let json = serde_json::to_string(message)?;
    sender.send(Message::Text(json)).await?;
    Ok(())
}

fn kpi_update(kpis: KpiSnapshot) -> WebSocketMessage {
    let KpiResponse { kpis, tiles } = kpi_response(kpis);
    WebSocketMessage::KpiUpdate {
        kpis,
        tiles,
        updated_at: chrono::Utc::now().timestamp(),
    }
}

/// Handle individual WebSocket messages
fn handle_websocket_message(message: WebSocketMessage, state: &AppState) -> WebSocketMessage {
    match message {
        WebSocketMessage::GetDashboard { tab } => {
            let query = ViewQuery { tab, expand: None };
            let rendered = state
                .shell_for(&query)
                .and_then(|(shell, _)| shell.render().map_err(ApiError::from));

            match rendered.map(|view| serde_json::to_value(&view)) {
                Ok(Ok(view)) => WebSocketMessage::Dashboard { view },
                Ok(Err(e)) => WebSocketMessage::Error {
                    message: e.to_string(),
                },
                Err(e) => WebSocketMessage::Error { message: e.message },
            }
        }

        WebSocketMessage::Ping => WebSocketMessage::Pong,

        _ => WebSocketMessage::Error {
            message: "Unsupported message type".to_string(),
        },
    }
}
