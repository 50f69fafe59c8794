use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::parent_dto::{SubmitParentPayload, UpdateParentStatusPayload},
    error::Result,
    models::parent::ParentStatus,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/parents/submit",
    responses(
        (status = 201, description = "Parent application submitted"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn submit_application(
    State(state): State<AppState>,
    Json(payload): Json<SubmitParentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let parent = state.parent_service.submit(payload).await?;
    Ok((StatusCode::CREATED, Json(parent)))
}

#[utoipa::path(
    get,
    path = "/api/parents/all",
    responses((status = 200, description = "All parent applications, newest first"))
)]
#[axum::debug_handler]
pub async fn list_applications(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let items = state.parent_service.list_all().await?;
    Ok(Json(items))
}

#[utoipa::path(
    delete,
    path = "/api/parents/delete/{id}",
    responses(
        (status = 204, description = "Parent application deleted"),
        (status = 404, description = "Parent application not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.parent_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/parents/{id}/status",
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Parent application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateParentStatusPayload>,
) -> Result<impl IntoResponse> {
    let status = ParentStatus::from_str(&payload.status)?;
    let parent = state.parent_service.update_status(id, status).await?;
    Ok(Json(parent))
}

/// Applies one more rejection to the request; the fifth one closes it as
/// not_done.
#[utoipa::path(
    put,
    path = "/api/parents/{id}/reject",
    responses(
        (status = 200, description = "Rejection recorded"),
        (status = 404, description = "Parent application not found")
    )
)]
#[axum::debug_handler]
pub async fn record_rejection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let parent = state.parent_service.record_rejection(id).await?;
    Ok(Json(parent))
}
