use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_waitlist_entry::aggregate::{
    JoinWaitlistResponse, WaitlistCountResponse, WaitlistEntryConfirmation,
};
use serde_json::Value;

use super::api_error::{ApiError, MSG_COUNT_FAILED, MSG_JOIN_FAILED};
use crate::domain::a001_waitlist_entry::service::JoinError;
use crate::routes::AppState;

pub const MSG_JOINED: &str = "Successfully joined the waitlist";

/// GET /api/waitlist/count
pub async fn get_count(
    State(state): State<AppState>,
) -> Result<Json<WaitlistCountResponse>, ApiError> {
    match state.waitlist.count().await {
        Ok(count) => Ok(Json(WaitlistCountResponse { count })),
        Err(e) => Err(ApiError::internal(MSG_COUNT_FAILED, &e)),
    }
}

/// POST /api/waitlist
pub async fn join(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<JoinWaitlistResponse>), ApiError> {
    let Json(raw) = payload.map_err(|rejection| {
        tracing::debug!("Rejected waitlist request body: {}", rejection.body_text());
        ApiError::InvalidBody(rejection.body_text())
    })?;

    match state.waitlist.join(&raw).await {
        Ok(entry) => Ok((
            StatusCode::CREATED,
            Json(JoinWaitlistResponse {
                message: MSG_JOINED.to_string(),
                entry: WaitlistEntryConfirmation::from(&entry),
            }),
        )),
        Err(JoinError::Validation(v)) => {
            tracing::debug!("Waitlist signup failed validation: {}", v);
            Err(ApiError::Validation(v))
        }
        Err(JoinError::DuplicateEmail(_)) => Err(ApiError::DuplicateEmail),
        Err(JoinError::Storage(e)) => Err(ApiError::internal(MSG_JOIN_FAILED, &e)),
    }
}
