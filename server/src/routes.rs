//! HTTP boundary: maps the three service operations onto routes and
//! status codes, and keeps store faults from leaking to clients.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use valentine_common::api::{
    self, Accepted, ErrorBody, ACCEPT_ROUTE, CREATE_PATH, GET_ROUTE,
};
use valentine_common::proposal::{NewProposal, Proposal};

use crate::service::{ProposalService, ServiceError};

pub struct AppState {
    pub service: ProposalService,
}

type ApiFailure = (StatusCode, Json<ErrorBody>);

fn not_found() -> ApiFailure {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new(api::NOT_FOUND_MESSAGE)),
    )
}

fn internal_error(err: &ServiceError) -> ApiFailure {
    tracing::error!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(api::INTERNAL_ERROR_MESSAGE)),
    )
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn create_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Proposal>), ApiFailure> {
    // Deserialize by hand so a malformed body surfaces as the contract's
    // 400 shape instead of axum's default rejection.
    let input: NewProposal = serde_json::from_value(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new(e.to_string())),
        )
    })?;

    match state.service.create(input).await {
        Ok(proposal) => Ok((StatusCode::CREATED, Json(proposal))),
        Err(ServiceError::Validation(err)) => {
            tracing::debug!(field = err.field, "create rejected");
            Err((StatusCode::BAD_REQUEST, Json(ErrorBody::from(err))))
        }
        Err(err) => Err(internal_error(&err)),
    }
}

async fn get_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Proposal>, ApiFailure> {
    match state.service.get(&id).await {
        Ok(Some(proposal)) => Ok(Json(proposal)),
        Ok(None) => Err(not_found()),
        Err(err) => Err(internal_error(&err)),
    }
}

async fn accept_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Accepted>, ApiFailure> {
    match state.service.accept(&id).await {
        Ok(Some(accepted)) => Ok(Json(accepted)),
        Ok(None) => Err(not_found()),
        Err(err) => Err(internal_error(&err)),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the application router. The UI is served from another origin,
/// so CORS stays permissive.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route(CREATE_PATH, post(create_handler))
        .route(GET_ROUTE, get(get_handler))
        .route(ACCEPT_ROUTE, post(accept_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// Serve `app(state)` on an already-bound listener. Shared by the binary
/// and the integration harness.
pub async fn run(
    listener: tokio::net::TcpListener,
    state: Arc<AppState>,
) -> std::io::Result<()> {
    axum::serve(listener, app(state)).await
}
