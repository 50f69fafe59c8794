use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vacancy::{ApplicationStatus, Vacancy, VacancyApplication};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVacancyPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[validate(length(min = 1))]
    pub salary: String,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateVacancyPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub subject: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    #[validate(length(min = 1))]
    pub salary: Option<String>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVacancyStatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateApplicationStatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResponse {
    pub message: String,
    pub application: VacancyApplication,
}

/// Flattened view of one embedded application joined with the applicant's
/// public profile, as rendered on the dashboard's applicant list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantSummary {
    pub application_id: Uuid,
    pub teacher_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub subjects: Vec<String>,
    pub cv_url: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

/// One entry of a teacher's own application history, grouped by vacancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherApplicationView {
    pub id: Uuid,
    pub vacancy: VacancySummary,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancySummary {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: String,
    pub status: String,
}

impl From<&Vacancy> for VacancySummary {
    fn from(value: &Vacancy) -> Self {
        Self {
            id: value.id,
            title: value.title.clone(),
            subject: value.subject.clone(),
            description: value.description.clone(),
            requirements: value.requirements.clone(),
            salary: value.salary.clone(),
            status: value.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_rejects_blank_title() {
        let payload = CreateVacancyPayload {
            title: "".into(),
            subject: "English".into(),
            description: "Spoken English, grades 5-7".into(),
            requirements: vec![],
            salary: "8000/mo".into(),
            featured: false,
        };
        assert!(payload.validate().is_err());
    }
}
