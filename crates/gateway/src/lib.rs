//! HTTP relay gateway for Lookout.
//!
//! Stands between the device and a vision backend. The device posts a
//! base64 frame plus either a target name or a question; the gateway
//! decodes it, hands it to the configured [`Recognizer`] / [`Analyzer`],
//! and returns JSON.
//!
//! Routes:
//! - `POST /api/find-object`
//! - `POST /api/analyze`
//! - `ANY  /api/test`
//! - `GET  /health`
//!
//! Built on Axum. CORS is wide open (`*`) because the device app is not
//! served from the gateway's origin.

pub mod mock;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{any, get, post};
use axum::Router;
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

use lookout_core::capture::CaptureResult;
use lookout_core::recognizer::{Analyzer, Recognizer};
use lookout_core::relay::{
    ANALYZE_PATH, AnalyzeRequest, AnalyzeResponse, ErrorResponse, FIND_OBJECT_PATH,
    FindObjectRequest, FindObjectResponse, PROBE_PATH, ProbeResponse,
};

pub use mock::MockVision;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub recognizer: Arc<dyn Recognizer>,
    pub analyzer: Arc<dyn Analyzer>,
}

impl GatewayState {
    pub fn new(recognizer: Arc<dyn Recognizer>, analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            recognizer,
            analyzer,
        }
    }

    /// State backed by [`MockVision`] for both operations.
    pub fn mock() -> Self {
        let vision = Arc::new(MockVision);
        Self::new(vision.clone(), vision)
    }
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes and layers.
pub fn build_router(state: SharedState, config: &lookout_config::GatewayConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            FIND_OBJECT_PATH,
            post(find_object_handler)
                .options(preflight_handler)
                .fallback(method_not_allowed),
        )
        .route(
            ANALYZE_PATH,
            post(analyze_handler)
                .options(preflight_handler)
                .fallback(method_not_allowed),
        )
        .route(PROBE_PATH, any(probe_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server with the mock vision backend.
pub async fn start(config: lookout_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let app = build_router(Arc::new(GatewayState::mock()), &config.gateway);

    info!(addr = %addr, backend = "mock", "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// --- Errors ---

/// Every failure a handler can answer with.
#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    MethodNotAllowed,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(error) => (StatusCode::BAD_REQUEST, ErrorResponse::new(error)),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorResponse::new("Method not allowed"),
            ),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Internal server error").with_message(message),
            ),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

fn decode_frame(image: &str) -> Result<CaptureResult, ApiError> {
    CaptureResult::from_base64(image).map_err(|e| ApiError::BadRequest(format!("Invalid image: {e}")))
}

// --- Handlers ---

async fn find_object_handler(
    State(state): State<SharedState>,
    payload: Result<Json<FindObjectRequest>, JsonRejection>,
) -> Result<Json<FindObjectResponse>, ApiError> {
    let Json(req) = payload?;
    let object_name = req.object_name.trim();
    if req.image.is_empty() || object_name.is_empty() {
        return Err(ApiError::BadRequest("Missing image or objectName".into()));
    }

    let frame = decode_frame(&req.image)?;
    debug!(object = object_name, bytes = frame.len(), "Find-object request");

    match state.recognizer.recognize(&frame, object_name).await {
        Ok(outcome) => Ok(Json(FindObjectResponse {
            success: true,
            found: outcome.found,
            guidance: outcome.guidance,
            error: None,
        })),
        Err(e) => {
            error!(error = %e, backend = state.recognizer.name(), "Find object error");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

async fn analyze_handler(
    State(state): State<SharedState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(req) = payload?;
    let question = req.question.trim();
    if req.image.is_empty() || question.is_empty() {
        return Err(ApiError::BadRequest("Missing image or question".into()));
    }

    let frame = decode_frame(&req.image)?;
    debug!(question_len = question.len(), bytes = frame.len(), "Analyze request");

    match state.analyzer.analyze(&frame, question).await {
        Ok(answer) => Ok(Json(AnalyzeResponse {
            success: true,
            answer,
            error: None,
        })),
        Err(e) => {
            error!(error = %e, backend = state.analyzer.name(), "Analyze error");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn probe_handler() -> Json<ProbeResponse> {
    Json(ProbeResponse {
        success: true,
        message: "API is working!".into(),
        timestamp: Utc::now(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
