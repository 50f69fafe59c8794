use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::Error;

/// A tutoring position posting. Applications are embedded in the row so the
/// capacity and no-duplicate invariants can be enforced by one conditional
/// UPDATE against this single document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vacancy {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: String,
    pub status: String,
    pub featured: bool,
    pub created_by: Uuid,
    pub applications: Json<Vec<VacancyApplication>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Vacancy {
    pub fn application_for(&self, teacher_id: Uuid) -> Option<&VacancyApplication> {
        self.applications.iter().find(|a| a.teacher_id == teacher_id)
    }
}

/// One teacher's bid against a vacancy. Created only by the atomic queue
/// insert, mutated only through the per-application status update, never
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyApplication {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

impl VacancyApplication {
    pub fn new(teacher_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            teacher_id,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(Error::InvalidStatus(format!(
                "unknown application status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VacancyStatus {
    Open,
    Closed,
    Pending,
}

impl VacancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacancyStatus::Open => "open",
            VacancyStatus::Closed => "closed",
            VacancyStatus::Pending => "pending",
        }
    }

    /// The status endpoint only toggles a posting between open and closed;
    /// `pending` is reserved for drafts created from a parent request.
    pub fn is_admin_settable(&self) -> bool {
        matches!(self, VacancyStatus::Open | VacancyStatus::Closed)
    }
}

impl std::str::FromStr for VacancyStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(VacancyStatus::Open),
            "closed" => Ok(VacancyStatus::Closed),
            "pending" => Ok(VacancyStatus::Pending),
            other => Err(Error::InvalidStatus(format!(
                "unknown vacancy status '{}'",
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
    fn application_status_round_trips() {
        for raw in ["pending", "accepted", "rejected"] {
            let status = ApplicationStatus::from_str(raw).unwrap();
            assert_eq!(status.as_str(), raw);
        }
        assert!(ApplicationStatus::from_str("approved").is_err());
    }

    #[test]
    fn vacancy_status_settable_set_excludes_pending() {
        assert!(VacancyStatus::Open.is_admin_settable());
        assert!(VacancyStatus::Closed.is_admin_settable());
        assert!(!VacancyStatus::Pending.is_admin_settable());
    }

    #[test]
    fn new_applications_start_pending() {
        let teacher = Uuid::new_v4();
        let app = VacancyApplication::new(teacher);
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.teacher_id, teacher);
    }

    #[test]
    fn application_lookup_by_teacher() {
        let teacher = Uuid::new_v4();
        let vacancy = Vacancy {
            id: Uuid::new_v4(),
            title: "Math tutor".into(),
            subject: "Mathematics".into(),
            description: "Grade 9 algebra".into(),
            requirements: vec![],
            salary: "Negotiable".into(),
            status: "open".into(),
            featured: false,
            created_by: Uuid::new_v4(),
            applications: Json(vec![VacancyApplication::new(teacher)]),
            created_at: None,
            updated_at: None,
        };
        assert!(vacancy.application_for(teacher).is_some());
        assert!(vacancy.application_for(Uuid::new_v4()).is_none());
    }
}
