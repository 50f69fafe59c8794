use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::admin_dto::AdminLoginPayload,
    dto::teacher_dto::TeacherResponse,
    error::Result,
    utils::token,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/admin/login",
    responses(
        (status = 200, description = "Logged in"),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<AdminLoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let admin = state
        .admin_service
        .verify_credentials(&payload.email, &payload.password)
        .await?;
    let token = token::issue_token(admin.id, "admin", 24)?;
    Ok(Json(json!({ "success": true, "token": token })))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses((status = 200, description = "Dashboard headline counters"))
)]
#[axum::debug_handler]
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.admin_service.dashboard_stats().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/admin/applications",
    responses((status = 200, description = "All teacher applications, newest first"))
)]
#[axum::debug_handler]
pub async fn list_applications(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let teachers = state.teacher_service.list_all().await?;
    let data: Vec<TeacherResponse> = teachers.into_iter().map(Into::into).collect();
    Ok(Json(data))
}
