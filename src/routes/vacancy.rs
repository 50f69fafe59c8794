use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::vacancy_dto::{
        ApplyResponse, CreateVacancyPayload, UpdateApplicationStatusPayload,
        UpdateVacancyPayload, UpdateVacancyStatusPayload,
    },
    error::{Error, Result},
    middleware::auth::Claims,
    models::vacancy::{ApplicationStatus, VacancyStatus},
    services::notification_service::DashboardEvent,
    utils::token::subject_id,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/vacancies",
    responses(
        (status = 201, description = "Vacancy created successfully"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_vacancy(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateVacancyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let created_by = subject_id(&claims)?;
    let vacancy = state.vacancy_service.create(created_by, payload).await?;
    Ok((StatusCode::CREATED, Json(vacancy)))
}

#[utoipa::path(
    put,
    path = "/api/vacancies/{id}",
    responses(
        (status = 200, description = "Vacancy updated successfully"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn update_vacancy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVacancyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let vacancy = state.vacancy_service.update(id, payload).await?;
    Ok(Json(vacancy))
}

#[utoipa::path(
    delete,
    path = "/api/vacancies/{id}",
    responses(
        (status = 204, description = "Vacancy deleted successfully"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_vacancy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.vacancy_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/vacancies",
    responses((status = 200, description = "List of vacancies"))
)]
#[axum::debug_handler]
pub async fn list_vacancies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let items = state.vacancy_service.list().await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/vacancies/featured",
    responses((status = 200, description = "Open featured vacancies"))
)]
#[axum::debug_handler]
pub async fn list_featured_vacancies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let items = state.vacancy_service.list_featured().await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/vacancies/{id}",
    responses(
        (status = 200, description = "Vacancy found"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn get_vacancy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let vacancy = state.vacancy_service.get_by_id(id).await?;
    Ok(Json(vacancy))
}

#[utoipa::path(
    patch,
    path = "/api/vacancies/{id}/status",
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn update_vacancy_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVacancyStatusPayload>,
) -> Result<impl IntoResponse> {
    let status = VacancyStatus::from_str(&payload.status)?;
    if !status.is_admin_settable() {
        return Err(Error::InvalidStatus(format!(
            "vacancy status cannot be set to '{}'",
            status.as_str()
        )));
    }
    let vacancy = state.vacancy_service.set_status(id, status).await?;
    Ok(Json(vacancy))
}

#[utoipa::path(
    get,
    path = "/api/vacancies/{id}/applicants",
    responses(
        (status = 200, description = "Applicants with profile data"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn list_applicants(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let applicants = state.vacancy_service.applicants(id).await?;
    Ok(Json(applicants))
}

/// The application queue entry point: one atomic check-and-append, then a
/// NEW_APPLICATION push to every connected dashboard observer.
#[utoipa::path(
    post,
    path = "/api/vacancies/{id}/apply",
    responses(
        (status = 200, description = "Application submitted"),
        (status = 400, description = "Duplicate application or vacancy at capacity"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn apply_for_vacancy(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let teacher_id = subject_id(&claims)?;
    let (vacancy, application) = state
        .vacancy_service
        .apply_to_vacancy(id, teacher_id)
        .await?;
    let teacher = state.teacher_service.get_by_id(teacher_id).await?;

    state
        .notification_service
        .broadcast(&DashboardEvent::NewApplication {
            applied_at: application.applied_at,
            status: application.status,
            vacancy,
            teacher,
        });

    Ok(Json(ApplyResponse {
        message: "Application submitted successfully".to_string(),
        application,
    }))
}

#[utoipa::path(
    put,
    path = "/api/vacancies/{id}/applications/{application_id}/status",
    responses(
        (status = 200, description = "Application status updated"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Vacancy or application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Path((vacancy_id, application_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    let status = ApplicationStatus::from_str(&payload.status)?;
    let vacancy = state
        .vacancy_service
        .set_application_status(vacancy_id, application_id, status)
        .await?;
    Ok(Json(vacancy))
}
