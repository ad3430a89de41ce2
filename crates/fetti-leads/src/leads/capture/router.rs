use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tokio::task;

use super::domain::LeadSubmission;
use super::notify::LeadNotifier;
use super::service::LeadCaptureService;
use super::store::LeadStore;
use super::summary::UnderwritingSummarizer;

/// Router exposing single-lead capture and the captured-lead listing.
pub fn lead_router<S, N, P>(service: Arc<LeadCaptureService<S, N, P>>) -> Router
where
    S: LeadStore + 'static,
    N: LeadNotifier + 'static,
    P: UnderwritingSummarizer + 'static,
{
    Router::new()
        .route(
            "/api/v1/leads",
            post(capture_handler::<S, N, P>).get(list_handler::<S, N, P>),
        )
        .with_state(service)
}

// Stores and notifiers are synchronous, so both handlers hop onto the blocking pool.
pub(crate) async fn capture_handler<S, N, P>(
    State(service): State<Arc<LeadCaptureService<S, N, P>>>,
    axum::Json(submission): axum::Json<LeadSubmission>,
) -> Response
where
    S: LeadStore + 'static,
    N: LeadNotifier + 'static,
    P: UnderwritingSummarizer + 'static,
{
    match task::spawn_blocking(move || service.capture(submission)).await {
        Ok(Ok(receipt)) => {
            let payload = json!({
                "lead": receipt.lead,
                "score": receipt.outcome.total,
                "score_band": receipt.outcome.band.label(),
                "score_reasons": receipt.outcome.reasons(),
                "notification": receipt.notification,
                "message": receipt.notification.message(),
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Ok(Err(err)) => error_response(err.to_string()),
        Err(err) => error_response(format!("lead capture task failed: {err}")),
    }
}

pub(crate) async fn list_handler<S, N, P>(
    State(service): State<Arc<LeadCaptureService<S, N, P>>>,
) -> Response
where
    S: LeadStore + 'static,
    N: LeadNotifier + 'static,
    P: UnderwritingSummarizer + 'static,
{
    match task::spawn_blocking(move || service.captured()).await {
        Ok(Ok(leads)) => {
            let payload = json!({
                "count": leads.len(),
                "leads": leads,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(Err(err)) => error_response(err.to_string()),
        Err(err) => error_response(format!("lead listing task failed: {err}")),
    }
}

fn error_response(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
