use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::teacher::Teacher;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupPayload {
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub grade: i32,
    #[validate(length(min = 1))]
    pub subjects: Vec<String>,
    pub agreement_accepted: bool,
    pub cv_url: Option<String>,
    #[serde(default)]
    pub certificates: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CheckRegistrationQuery {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTeacherStatusPayload {
    pub status: String,
}

/// Body of the accept/reject decision endpoints. The dashboard sends the
/// linked parent request id as `parentId` when the vacancy was created from
/// one.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DecisionPayload {
    #[serde(alias = "parentId")]
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub grade: i32,
    pub subjects: Vec<String>,
    pub agreement_accepted: bool,
    pub cv_url: Option<String>,
    pub certificates: Vec<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub teacher: TeacherResponse,
}

impl From<Teacher> for TeacherResponse {
    fn from(value: Teacher) -> Self {
        Self {
            id: value.id,
            full_name: value.full_name,
            email: value.email,
            phone: value.phone,
            address: value.address,
            latitude: value.latitude,
            longitude: value.longitude,
            grade: value.grade,
            subjects: value.subjects,
            agreement_accepted: value.agreement_accepted,
            cv_url: value.cv_url,
            certificates: value.certificates,
            status: value.status,
            created_at: value.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_payload_accepts_camel_case_key() {
        let payload: DecisionPayload =
            serde_json::from_str(r#"{"parentId":"7f4df6a5-6d9f-4e30-8f3a-52cf80f1a2bd"}"#)
                .unwrap();
        assert!(payload.parent_id.is_some());

        let empty: DecisionPayload = serde_json::from_str("{}").unwrap();
        assert!(empty.parent_id.is_none());
    }

    #[test]
    fn signup_requires_at_least_one_subject() {
        let payload = SignupPayload {
            full_name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "555-0100".into(),
            password: "correcthorse".into(),
            address: "12 Main St".into(),
            latitude: None,
            longitude: None,
            grade: 10,
            subjects: vec![],
            agreement_accepted: true,
            cv_url: None,
            certificates: vec![],
        };
        assert!(payload.validate().is_err());
    }
}
