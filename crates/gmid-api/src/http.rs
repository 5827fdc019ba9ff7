use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use gmid_core::config::SimulationConfig;
use gmid_core::device::{DeviceFamily, DeviceParameters};
use gmid_core::error::SimulationError;
use gmid_core::history::{HistoryEntry, Session, DEFAULT_HISTORY_DEPTH};
use gmid_core::runner::run_dc_sweep;
use gmid_core::sweep::{SweepPoint, SweepResult};

use crate::schema::SweepSummary;

pub struct HttpServerConfig {
    pub bind_addr: String,
    pub simulation: SimulationConfig,
    pub history_depth: usize,
}

impl HttpServerConfig {
    pub fn new(bind_addr: String, simulation: SimulationConfig) -> Self {
        Self {
            bind_addr,
            simulation,
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

#[derive(Clone)]
struct ApiState {
    session: Arc<Mutex<Session>>,
    config: Arc<SimulationConfig>,
}

#[derive(Debug, Deserialize)]
struct SweepRequest {
    device: String,
    /// Drawn width in microns, as entered at the front end.
    width_um: f64,
    length_um: f64,
    fingers: Option<u32>,
    mult: Option<u32>,
    vds: Option<f64>,
    vgs_max: Option<f64>,
    vgs_step: Option<f64>,
    vbs: Option<f64>,
}

#[derive(Debug, Serialize)]
struct SweepResponse {
    summary: SweepSummary,
    rows: Vec<SweepPoint>,
}

#[derive(Debug, Serialize)]
struct HistoryItem {
    rank: usize,
    summary: SweepSummary,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    entries: Vec<HistoryItem>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    details: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

pub async fn run(config: HttpServerConfig) -> Result<(), String> {
    let state = ApiState {
        session: Arc::new(Mutex::new(Session::new(config.history_depth))),
        config: Arc::new(config.simulation),
    };
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|err| format!("bind {} failed: {}", config.bind_addr, err))?;
    axum::serve(listener, app)
        .await
        .map_err(|err| format!("server error: {}", err))
}

/// Blocking front for callers without their own runtime.
pub fn serve_blocking(config: HttpServerConfig) -> Result<(), String> {
    let runtime = tokio::runtime::Runtime::new().map_err(|err| err.to_string())?;
    runtime.block_on(run(config))
}

fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/v1/sweep", post(run_sweep))
        .route("/v1/result", get(get_result))
        .route("/v1/history", get(get_history))
        .with_state(state)
}

async fn run_sweep(
    State(state): State<ApiState>,
    Json(payload): Json<SweepRequest>,
) -> impl IntoResponse {
    let params = match build_params(&payload) {
        Ok(params) => params,
        Err(err) => return err,
    };

    let result = match run_dc_sweep(&params, &state.config) {
        Ok(result) => result,
        Err(err) => return simulation_error(&err),
    };
    if result.is_empty() {
        return api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "NO_DATA",
            "simulation returned no rows",
            None,
        );
    }

    let mut session = match state.session.lock() {
        Ok(guard) => guard,
        Err(_) => {
            return api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "SESSION_ERROR",
                "session state is unavailable",
                None,
            );
        }
    };
    session.commit(params.clone(), result.clone());
    let entry = HistoryEntry { params, result };
    Json(entry_to_response(&entry)).into_response()
}

async fn get_result(State(state): State<ApiState>) -> impl IntoResponse {
    let session = match state.session.lock() {
        Ok(guard) => guard,
        Err(_) => {
            return api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "SESSION_ERROR",
                "session state is unavailable",
                None,
            );
        }
    };
    match &session.current {
        Some(entry) => Json(entry_to_response(entry)).into_response(),
        None => api_error(
            StatusCode::NOT_FOUND,
            "NO_RESULT",
            "no sweep has completed yet",
            None,
        ),
    }
}

async fn get_history(State(state): State<ApiState>) -> impl IntoResponse {
    let session = match state.session.lock() {
        Ok(guard) => guard,
        Err(_) => {
            return api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "SESSION_ERROR",
                "session state is unavailable",
                None,
            );
        }
    };
    let entries = session
        .ranked()
        .map(|(rank, entry)| HistoryItem {
            rank,
            summary: SweepSummary::from_entry(entry),
        })
        .collect();
    Json(HistoryResponse { entries }).into_response()
}

fn build_params(payload: &SweepRequest) -> Result<DeviceParameters, axum::response::Response> {
    let Some(family) = DeviceFamily::from_name(&payload.device) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "UNKNOWN_DEVICE",
            &format!("unknown device family: {}", payload.device),
            None,
        ));
    };
    // Front-end units are microns; the core works in meters.
    let mut params =
        DeviceParameters::new(family, payload.width_um * 1e-6, payload.length_um * 1e-6);
    if let Some(fingers) = payload.fingers {
        params.fingers = fingers;
    }
    if let Some(mult) = payload.mult {
        params.mult = mult;
    }
    if let Some(vds) = payload.vds {
        params.vds = vds;
    }
    if let Some(vgs_max) = payload.vgs_max {
        params.vgs_max = vgs_max;
    }
    if let Some(vgs_step) = payload.vgs_step {
        params.vgs_step = vgs_step;
    }
    if let Some(vbs) = payload.vbs {
        params.vbs = vbs;
    }
    if let Err(err) = params.validate() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_PARAMETERS",
            &err.to_string(),
            None,
        ));
    }
    Ok(params)
}

fn entry_to_response(entry: &HistoryEntry) -> SweepResponse {
    SweepResponse {
        summary: SweepSummary::from_entry(entry),
        rows: rows_of(&entry.result),
    }
}

fn rows_of(result: &SweepResult) -> Vec<SweepPoint> {
    result.points.clone()
}

fn simulation_error(err: &SimulationError) -> axum::response::Response {
    match err {
        SimulationError::InvalidParameters(message) => api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_PARAMETERS",
            message,
            None,
        ),
        SimulationError::ExecutableNotFound(message) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "EXECUTABLE_NOT_FOUND",
            message,
            None,
        ),
        SimulationError::SimulatorExecutionFailed {
            status,
            stdout,
            stderr,
        } => api_error(
            StatusCode::BAD_GATEWAY,
            "SIMULATOR_FAILED",
            &format!("simulator exited with {}", status),
            Some(vec![stdout.clone(), stderr.clone()]),
        ),
        SimulationError::NoOutputProduced { stdout, stderr } => api_error(
            StatusCode::BAD_GATEWAY,
            "NO_OUTPUT",
            "simulator produced no output file",
            Some(vec![stdout.clone(), stderr.clone()]),
        ),
        SimulationError::Io(err) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "IO_ERROR",
            &err.to_string(),
            None,
        ),
    }
}

fn api_error(
    status: StatusCode,
    code: &str,
    message: &str,
    details: Option<Vec<String>>,
) -> axum::response::Response {
    let body = ErrorResponse {
        error: ErrorBody {
            code: code.to_string(),
            message: message.to_string(),
            details,
        },
    };
    (status, Json(body)).into_response()
}
