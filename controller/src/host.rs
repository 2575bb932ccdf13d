use std::{
    collections::HashMap,
    io::ErrorKind,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::{net::TcpListener, sync::Mutex};
use tracing::{info, warn};

use climate_common::{ClimateMode, ClimateSession, RuntimeConfig};

#[derive(Clone)]
struct AppState {
    session: Arc<Mutex<ClimateSession>>,
}

#[derive(Clone)]
struct ConfigStore {
    path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let store = ConfigStore::from_env();
    let runtime = store.load_runtime_config().await.unwrap_or_else(|err| {
        warn!("failed to load runtime config: {err:#}");
        RuntimeConfig::default()
    });

    let port = std::env::var("CONTROLLER_HTTP_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(runtime.http_port);

    let mut session = ClimateSession::new(runtime.climate, runtime.initial)
        .context("invalid climate config")?;
    session.mount();

    let app_state = AppState {
        session: Arc::new(Mutex::new(session)),
    };

    let app = Router::new()
        .route("/api/snapshot", get(handle_get_snapshot))
        .route("/api/mode", post(handle_set_mode))
        .route("/api/fan", post(handle_set_fan))
        .route("/api/fan/up", post(handle_fan_up))
        .route("/api/fan/down", post(handle_fan_down))
        .route("/api/temp/up", post(handle_temp_up))
        .route("/api/temp/down", post(handle_temp_down))
        .route("/api/scan", get(handle_get_scan).post(handle_start_scan))
        .route("/api/widget/mount", post(handle_mount))
        .route("/api/widget/unmount", post(handle_unmount))
        .with_state(app_state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind climate controller at {addr}"))?;

    info!("climate controller listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    app_state.session.lock().await.unmount().await;
    info!("climate controller stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}

async fn handle_get_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.session.lock().await.snapshot().await;
    Json(snapshot)
}

async fn handle_set_mode(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let mode = match parse_mode_param(&params) {
        Ok(mode) => mode,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    state.session.lock().await.set_mode(mode).await;
    handle_get_snapshot(State(state)).await.into_response()
}

async fn handle_set_fan(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let speed = match parse_fan_param(&params) {
        Ok(speed) => speed,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    state.session.lock().await.set_fan_speed(speed).await;
    handle_get_snapshot(State(state)).await.into_response()
}

async fn handle_fan_up(State(state): State<AppState>) -> impl IntoResponse {
    state.session.lock().await.increment_fan().await;
    handle_get_snapshot(State(state)).await.into_response()
}

async fn handle_fan_down(State(state): State<AppState>) -> impl IntoResponse {
    state.session.lock().await.decrement_fan().await;
    handle_get_snapshot(State(state)).await.into_response()
}

async fn handle_temp_up(State(state): State<AppState>) -> impl IntoResponse {
    state.session.lock().await.increment_temp().await;
    handle_get_snapshot(State(state)).await.into_response()
}

async fn handle_temp_down(State(state): State<AppState>) -> impl IntoResponse {
    state.session.lock().await.decrement_temp().await;
    handle_get_snapshot(State(state)).await.into_response()
}

async fn handle_get_scan(State(state): State<AppState>) -> impl IntoResponse {
    let scan = state.session.lock().await.scan_snapshot();
    Json(scan)
}

async fn handle_start_scan(State(state): State<AppState>) -> impl IntoResponse {
    let scan = {
        let session = state.session.lock().await;
        session.start_scan();
        session.scan_snapshot()
    };
    Json(scan)
}

async fn handle_mount(State(state): State<AppState>) -> impl IntoResponse {
    state.session.lock().await.mount();
    handle_get_snapshot(State(state)).await.into_response()
}

async fn handle_unmount(State(state): State<AppState>) -> impl IntoResponse {
    state.session.lock().await.unmount().await;
    handle_get_snapshot(State(state)).await.into_response()
}

impl ConfigStore {
    fn from_env() -> Self {
        Self {
            path: std::env::var("CLIMATE_CONFIG").ok().map(PathBuf::from),
        }
    }

    async fn load_runtime_config(&self) -> anyhow::Result<RuntimeConfig> {
        let Some(path) = self.path.as_deref() else {
            return Ok(RuntimeConfig::default());
        };
        load_runtime_config_from(path).await
    }
}

async fn load_runtime_config_from(path: &Path) -> anyhow::Result<RuntimeConfig> {
    let runtime = match tokio::fs::read(path).await {
        Ok(raw) => serde_json::from_slice::<RuntimeConfig>(&raw)
            .with_context(|| format!("invalid runtime config at {}", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(RuntimeConfig::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()))
        }
    };
    runtime.climate.validate()?;
    Ok(runtime)
}

fn parse_mode_param(params: &HashMap<String, String>) -> Result<ClimateMode, &'static str> {
    let value = params.get("value").ok_or("Missing 'value' parameter")?;
    value
        .parse::<ClimateMode>()
        .map_err(|_| "Invalid mode. Use 'HEAT', 'COOL' or 'FAN_ONLY'")
}

fn parse_fan_param(params: &HashMap<String, String>) -> Result<i64, &'static str> {
    let value = params.get("value").ok_or("Missing 'value' parameter")?;
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| "Invalid fan speed value")
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
