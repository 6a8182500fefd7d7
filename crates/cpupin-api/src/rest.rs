//! REST API handlers

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, Request, State,
    },
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use cpupin_core::ApiConfig;
use cpupin_scheduler::Scheduler;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub scheduler: Arc<Scheduler>,
    pub config: ApiConfig,
}

/// Create the API router
pub fn create_router(scheduler: Arc<Scheduler>, config: ApiConfig) -> Router {
    let state = Arc::new(AppState { scheduler, config });

    Router::new()
        .route("/v1/cpupin/", post(suggest_pinning))
        .route("/v1/cpupin", post(suggest_pinning))
        .route("/v1/status", get(get_status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_public_host,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reject requests addressed to anything but the public host
async fn require_public_host(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.debug {
        let host = request
            .headers()
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| request.uri().host())
            .unwrap_or_default();

        if host != state.config.public_host {
            warn!(host = %host, "Rejected request with invalid host");
            return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
        }
    }

    next.run(request).await
}

/// Fields of a pinning request, from the form body or the query string
#[derive(Debug, Default, Deserialize)]
pub struct PinningRequest {
    /// Requested vCPU count
    pub vcpu: Option<String>,
    /// Output of `lscpu -p`
    pub lscpu: Option<String>,
}

impl PinningRequest {
    /// Merge two sources, preferring fields present in `self`
    fn or(self, fallback: PinningRequest) -> PinningRequest {
        PinningRequest {
            vcpu: self.vcpu.or(fallback.vcpu),
            lscpu: self.lscpu.or(fallback.lscpu),
        }
    }
}

/// Suggest a vCPU pinning for the submitted topology
///
/// A body that is not form-encoded is treated as empty, so a missing
/// `vcpu` ends up as the same bad request as an unparsable one.
async fn suggest_pinning(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PinningRequest>, QueryRejection>,
    form: Result<Form<PinningRequest>, FormRejection>,
) -> Result<String, (StatusCode, String)> {
    let form = form.map(|Form(req)| req).unwrap_or_else(|rejection| {
        debug!(error = %rejection, "Ignoring request body");
        PinningRequest::default()
    });
    let query = query.map(|Query(req)| req).unwrap_or_default();
    let req = form.or(query);

    let raw_vcpu = req.vcpu.unwrap_or_default();
    let lscpu = req.lscpu.unwrap_or_default();

    let vcpu: usize = raw_vcpu.parse().map_err(|_| {
        warn!(vcpu = %raw_vcpu, "Unable to parse vcpu");
        (
            StatusCode::BAD_REQUEST,
            "Bad Request, unable to parse vcpu value".to_string(),
        )
    })?;

    info!(
        vcpu = vcpu,
        lscpu_bytes = lscpu.len(),
        "Received pinning request"
    );

    let fragment = state.scheduler.suggest(&lscpu, vcpu).map_err(|e| {
        warn!(error = %e, "Unable to suggest pinning");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal Server Error, unable to suggest response, error={}", e),
        )
    })?;

    Ok(fragment.to_string())
}

/// Service status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    pub debug: bool,
    pub public_host: String,
}

/// Get service status
async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        debug: state.config.debug,
        public_host: state.config.public_host.clone(),
    })
}
