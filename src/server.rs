//! HTTP surface for the generation workflows.
//!
//! Each workflow is one `POST` route taking the request JSON and answering
//! with either the validated object or `{ "error": "..." }`.

use crate::dispatch::{Dispatcher, ErrorKind, GenerationError};
use crate::request::{IdeaRequest, InsightRequest, RequestError, ScriptRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Leading text of axum's message for a body that parsed but did not fit the request type
const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Build the application router
pub fn router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/ideas", post(ideas_handler))
        .route("/api/script", post(script_handler))
        .route("/api/insights", post(insights_handler))
        .with_state(dispatcher)
}

/// Serve the router until the process is stopped
pub async fn serve(bind: &str, dispatcher: Dispatcher) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(dispatcher)).await
}

pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

pub async fn ideas_handler(
    State(dispatcher): State<Dispatcher>,
    payload: Result<Json<IdeaRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(request)) => respond(dispatcher.generate_ideas(request).await),
        Err(rejection) => reject(rejection),
    }
}

pub async fn script_handler(
    State(dispatcher): State<Dispatcher>,
    payload: Result<Json<ScriptRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(request)) => respond(dispatcher.generate_script(request).await),
        Err(rejection) => reject(rejection),
    }
}

pub async fn insights_handler(
    State(dispatcher): State<Dispatcher>,
    payload: Result<Json<InsightRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(request)) => respond(dispatcher.generate_insight(request).await),
        Err(rejection) => reject(rejection),
    }
}

fn respond(result: Result<crate::content::GeneratedContent, GenerationError>) -> Response {
    match result {
        Ok(content) => (StatusCode::OK, Json(content.into_value())).into_response(),
        Err(err) => error_response(&err),
    }
}

/// HTTP status for a failure class
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorKind::UpstreamFailure => StatusCode::BAD_GATEWAY,
        ErrorKind::MalformedOutput | ErrorKind::IncompleteOutput => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: &GenerationError) -> Response {
    (
        status_for(err.kind()),
        Json(json!({ "error": err.public_message() })),
    )
        .into_response()
}

fn reject(rejection: JsonRejection) -> Response {
    let text = rejection.body_text();
    let err = match rejection {
        JsonRejection::JsonDataError(_) => {
            RequestError::invalid_body(text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(&text))
        }
        JsonRejection::JsonSyntaxError(_) => unreadable("body is not valid JSON"),
        JsonRejection::MissingJsonContentType(_) => {
            unreadable("expected `Content-Type: application/json`")
        }
        _ => unreadable("body could not be read"),
    };
    warn!(field = err.field(), error = %text, "rejected request body");
    error_response(&GenerationError::InvalidRequest(err))
}

fn unreadable(detail: &str) -> RequestError {
    RequestError::InvalidBody {
        field: "body".to_string(),
        detail: detail.to_string(),
    }
}
