use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::Error;

/// A teacher's direct-signup profile. Its status is an independent state
/// machine from the per-vacancy application status, even though the two
/// share vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Teacher {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
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
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeacherStatus {
    Pending,
    Approved,
    Rejected,
}

impl TeacherStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeacherStatus::Pending => "pending",
            TeacherStatus::Approved => "approved",
            TeacherStatus::Rejected => "rejected",
        }
    }

    /// Admin review can only move a profile to approved or rejected; there is
    /// no transition back to pending.
    pub fn is_admin_decision(&self) -> bool {
        matches!(self, TeacherStatus::Approved | TeacherStatus::Rejected)
    }
}

impl std::str::FromStr for TeacherStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TeacherStatus::Pending),
            "approved" => Ok(TeacherStatus::Approved),
            "rejected" => Ok(TeacherStatus::Rejected),
            other => Err(Error::InvalidStatus(format!(
                "unknown teacher status '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_parses_known_values_only() {
        assert_eq!(
            TeacherStatus::from_str("approved").unwrap(),
            TeacherStatus::Approved
        );
        assert!(TeacherStatus::from_str("accepted").is_err());
        assert!(TeacherStatus::from_str("").is_err());
    }

    #[test]
    fn admin_decision_targets() {
        assert!(TeacherStatus::Approved.is_admin_decision());
        assert!(TeacherStatus::Rejected.is_admin_decision());
        assert!(!TeacherStatus::Pending.is_admin_decision());
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let teacher = Teacher {
            id: Uuid::new_v4(),
            full_name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "555-0100".into(),
            password_hash: "$argon2id$secret".into(),
            address: "12 Main St".into(),
            latitude: None,
            longitude: None,
            grade: 9,
            subjects: vec!["Math".into()],
            agreement_accepted: true,
            cv_url: None,
            certificates: vec![],
            status: "pending".into(),
            created_at: None,
            updated_at: None,
        };
        let json = serde_json::to_value(&teacher).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
