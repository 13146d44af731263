// src/services/api_server.rs
//! API Server for the birthday claim page.
//!
//! Exposes the claim page over HTTP so the browser front end and the
//! verification widget can drive it. The API is built using Axum and
//! includes endpoints for:
//! - Submitting wallet input and reading the rendered page state
//! - Fetching the active verification challenge
//! - Receiving the widget's completion callback

use crate::error::{ClaimError, Result};
use crate::models::outcome::VerificationOutcome;
use crate::models::session::SessionId;
use crate::services::page_loop::PageHandle;
use crate::services::session_controller::OutcomeDisposition;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

// API request and response structures

/// Request payload carrying the current content of the wallet input field
#[derive(Serialize, Deserialize)]
struct SubmitInputRequest {
    input: String,
}

/// Completion callback payload sent by the verification widget
#[derive(Serialize, Deserialize)]
struct VerificationCallbackRequest {
    session_id: String,
    #[serde(flatten)]
    outcome: VerificationOutcome,
}

/// Response for the completion callback
#[derive(Serialize)]
struct VerificationCallbackResponse {
    disposition: OutcomeDisposition,
}

/// Error body for failed requests
#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// API server state: the handle of the page loop it fronts
#[derive(Clone)]
pub struct ApiServer {
    page: PageHandle,
}

impl ApiServer {
    /// Creates a new instance of the API server
    ///
    /// # Arguments
    /// * `page` - Handle of the running page loop
    pub fn new(page: PageHandle) -> Self {
        ApiServer { page }
    }

    /// Builds the router with all routes and shared state
    pub fn router(&self) -> Router {
        Router::new()
            .route("/input", post(Self::submit_input_handler))
            .route("/claim", get(Self::claim_handler))
            .route("/session", get(Self::session_handler))
            .route("/verification-callback", post(Self::verification_callback_handler))
            .route("/health", get(Self::health_handler))
            .layer(CorsLayer::permissive())
            .with_state(Arc::new(self.clone()))
    }

    /// Starts the API server and begins listening for requests
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "127.0.0.1:3000")
    ///
    /// # Errors
    /// Returns `ClaimError::Io` if the address cannot be bound or serving fails
    pub async fn run(&self, addr: SocketAddr) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("API server listening on http://{}", addr);

        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    /// Feeds one change of the wallet input field to the page
    ///
    /// # Endpoint
    /// POST /input
    ///
    /// # Responses
    /// - 200 OK: The rendered page after the change
    /// - 500 Internal Server Error: The verification widget failed to render
    /// - 503 Service Unavailable: The page loop has stopped
    async fn submit_input_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<SubmitInputRequest>,
    ) -> Response {
        match state.page.submit_input(payload.input).await {
            Ok(view) => (StatusCode::OK, Json(view)).into_response(),
            Err(e) => error_response(e),
        }
    }

    /// Returns the rendered page
    ///
    /// # Endpoint
    /// GET /claim
    async fn claim_handler(State(state): State<Arc<ApiServer>>) -> Response {
        match state.page.view().await {
            Ok(view) => (StatusCode::OK, Json(view)).into_response(),
            Err(e) => error_response(e),
        }
    }

    /// Returns the challenge of the active verification session
    ///
    /// # Endpoint
    /// GET /session
    ///
    /// # Responses
    /// - 200 OK: Session id, widget payload and QR payload
    /// - 404 Not Found: No session is active
    async fn session_handler(State(state): State<Arc<ApiServer>>) -> Response {
        match state.page.challenge().await {
            Ok(Some(challenge)) => (StatusCode::OK, Json(challenge)).into_response(),
            Ok(None) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse { error: "no active verification session".into() }),
            )
                .into_response(),
            Err(e) => error_response(e),
        }
    }

    /// Completion callback of the verification widget
    ///
    /// # Endpoint
    /// POST /verification-callback
    ///
    /// # Request Body
    /// `{ "session_id": "...", "tx_hash": "0x..." }`, `tx_hash` optional
    ///
    /// # Responses
    /// - 200 OK: What the page did with the outcome. Stale and repeated
    ///   callbacks are answered with 200 as well; they are expected traffic.
    async fn verification_callback_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<VerificationCallbackRequest>,
    ) -> Response {
        let session_id = SessionId::from(payload.session_id);
        match state.page.deliver_outcome(session_id, payload.outcome).await {
            Ok(disposition) => (
                StatusCode::OK,
                Json(VerificationCallbackResponse { disposition }),
            )
                .into_response(),
            Err(e) => error_response(e),
        }
    }

    /// Liveness probe
    ///
    /// # Endpoint
    /// GET /health
    async fn health_handler() -> impl IntoResponse {
        Json(json!({ "status": "ok" }))
    }
}

fn error_response(e: ClaimError) -> Response {
    error!("Request failed: {}", e);
    let status = match e {
        ClaimError::PageClosed => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}
