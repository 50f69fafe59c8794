use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::teacher_dto::{
        AuthResponse, CheckRegistrationQuery, DecisionPayload, LoginPayload, SignupPayload,
        TeacherResponse, UpdateTeacherStatusPayload,
    },
    dto::parent_dto::UpdateParentStatusPayload,
    error::{Error, Result},
    middleware::auth::Claims,
    models::parent::ParentStatus,
    models::teacher::TeacherStatus,
    services::notification_service::DashboardEvent,
    utils::{crypto, token},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/teacher-apply/signup",
    responses(
        (status = 201, description = "Registration successful"),
        (status = 400, description = "Invalid payload or email already registered")
    )
)]
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let password_hash = crypto::hash_password(&payload.password)
        .map_err(|e| Error::Internal(format!("failed to hash password: {}", e)))?;
    let teacher = state.teacher_service.create(payload, password_hash).await?;
    let token = token::issue_token(teacher.id, "teacher", 30 * 24)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            teacher: teacher.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/teacher-apply/login",
    responses(
        (status = 200, description = "Logged in"),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let Some(teacher) = state.teacher_service.get_by_email(&payload.email).await? else {
        return Err(Error::Unauthorized("Invalid credentials".to_string()));
    };
    let ok = crypto::verify_password(&payload.password, &teacher.password_hash)
        .map_err(|e| Error::Internal(format!("password verification failed: {}", e)))?;
    if !ok {
        return Err(Error::Unauthorized("Invalid credentials".to_string()));
    }
    let token = token::issue_token(teacher.id, "teacher", 24)?;
    Ok(Json(AuthResponse {
        token,
        teacher: teacher.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/teacher-apply/check-registration",
    responses((status = 200, description = "Registration flag for an email"))
)]
#[axum::debug_handler]
pub async fn check_registration(
    State(state): State<AppState>,
    Query(query): Query<CheckRegistrationQuery>,
) -> Result<impl IntoResponse> {
    let Some(email) = query.email else {
        return Err(Error::BadRequest("Email is required".to_string()));
    };
    let registered = state.teacher_service.get_by_email(&email).await?.is_some();
    Ok(Json(json!({ "is_registered": registered })))
}

#[utoipa::path(
    get,
    path = "/api/teacher-apply/profile",
    responses(
        (status = 200, description = "Own profile"),
        (status = 404, description = "Teacher not found")
    )
)]
#[axum::debug_handler]
pub async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let teacher_id = token::subject_id(&claims)?;
    let teacher = state.teacher_service.get_by_id(teacher_id).await?;
    Ok(Json(TeacherResponse::from(teacher)))
}

#[utoipa::path(
    get,
    path = "/api/teacher-apply/all",
    responses((status = 200, description = "All teacher profiles"))
)]
#[axum::debug_handler]
pub async fn list_teachers(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let teachers = state.teacher_service.list_all().await?;
    let data: Vec<TeacherResponse> = teachers.into_iter().map(Into::into).collect();
    Ok(Json(data))
}

#[utoipa::path(
    get,
    path = "/api/teacher-apply/status/{status}",
    responses(
        (status = 200, description = "Teachers filtered by status"),
        (status = 400, description = "Invalid status")
    )
)]
#[axum::debug_handler]
pub async fn list_teachers_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<impl IntoResponse> {
    let status = TeacherStatus::from_str(&status)?;
    let teachers = state.teacher_service.list_by_status(status).await?;
    let data: Vec<TeacherResponse> = teachers.into_iter().map(Into::into).collect();
    Ok(Json(data))
}

#[utoipa::path(
    put,
    path = "/api/teacher-apply/{id}/status",
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Teacher not found")
    )
)]
#[axum::debug_handler]
pub async fn update_teacher_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTeacherStatusPayload>,
) -> Result<impl IntoResponse> {
    let status = TeacherStatus::from_str(&payload.status)?;
    let teacher = state.teacher_service.set_status(id, status).await?;

    state
        .notification_service
        .broadcast(&DashboardEvent::StatusUpdate {
            teacher_id: teacher.id,
            vacancy_id: None,
            status: teacher.status.clone(),
        });

    Ok(Json(TeacherResponse::from(teacher)))
}

#[utoipa::path(
    put,
    path = "/api/teacher-apply/accept/{teacher_id}/{vacancy_id}",
    responses(
        (status = 200, description = "Teacher accepted"),
        (status = 404, description = "Teacher not found")
    )
)]
#[axum::debug_handler]
pub async fn accept_application(
    State(state): State<AppState>,
    Path((teacher_id, vacancy_id)): Path<(Uuid, Uuid)>,
    payload: Option<Json<DecisionPayload>>,
) -> Result<impl IntoResponse> {
    let parent_id = payload.and_then(|Json(p)| p.parent_id);
    let teacher = state
        .teacher_service
        .accept_application(teacher_id, vacancy_id, parent_id)
        .await?;

    state
        .notification_service
        .broadcast(&DashboardEvent::StatusUpdate {
            teacher_id: teacher.id,
            vacancy_id: Some(vacancy_id),
            status: teacher.status.clone(),
        });

    Ok(Json(json!({
        "message": "Teacher accepted successfully",
        "data": TeacherResponse::from(teacher),
    })))
}

#[utoipa::path(
    put,
    path = "/api/teacher-apply/reject/{teacher_id}/{vacancy_id}",
    responses(
        (status = 200, description = "Teacher rejected"),
        (status = 404, description = "Teacher not found")
    )
)]
#[axum::debug_handler]
pub async fn reject_application(
    State(state): State<AppState>,
    Path((teacher_id, vacancy_id)): Path<(Uuid, Uuid)>,
    payload: Option<Json<DecisionPayload>>,
) -> Result<impl IntoResponse> {
    let parent_id = payload.and_then(|Json(p)| p.parent_id);
    let teacher = state
        .teacher_service
        .reject_application(teacher_id, vacancy_id, parent_id)
        .await?;

    state
        .notification_service
        .broadcast(&DashboardEvent::StatusUpdate {
            teacher_id: teacher.id,
            vacancy_id: Some(vacancy_id),
            status: teacher.status.clone(),
        });

    Ok(Json(json!({
        "message": "Teacher rejected successfully",
        "data": TeacherResponse::from(teacher),
    })))
}

#[utoipa::path(
    put,
    path = "/api/teacher-apply/vacancy-status/{parent_id}",
    responses(
        (status = 200, description = "Parent request status updated"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Parent request not found")
    )
)]
#[axum::debug_handler]
pub async fn update_parent_vacancy_status(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
    Json(payload): Json<UpdateParentStatusPayload>,
) -> Result<impl IntoResponse> {
    let status = ParentStatus::from_str(&payload.status)?;
    let parent = state.parent_service.update_status(parent_id, status).await?;
    Ok(Json(parent))
}

#[utoipa::path(
    get,
    path = "/api/teacher-apply/available-vacancies",
    responses((status = 200, description = "Open featured vacancies"))
)]
#[axum::debug_handler]
pub async fn available_vacancies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let items = state.vacancy_service.list_featured().await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/teacher-apply/my-applications",
    responses((status = 200, description = "Own applications grouped by vacancy"))
)]
#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let teacher_id = token::subject_id(&claims)?;
    let applications = state
        .vacancy_service
        .applications_for_teacher(teacher_id)
        .await?;
    Ok(Json(applications))
}
