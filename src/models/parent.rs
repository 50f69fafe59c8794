use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::Error;

/// A parent's submitted request for a tutor. `application_number` is assigned
/// sequentially at insert time; vacancy linkage, the rejection counter and the
/// pending-phase timestamp travel with the request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ParentRequest {
    pub id: Uuid,
    pub application_number: i32,
    pub parent_name: String,
    pub phone: String,
    pub address: String,
    pub student_name: String,
    pub grade: String,
    pub subjects: Vec<String>,
    pub preferred_time: String,
    pub submission_date: Option<DateTime<Utc>>,
    pub status: String,
    pub vacancy_id: Option<Uuid>,
    pub rejected_count: i32,
    pub vacancy_created_at: Option<DateTime<Utc>>,
    pub accepted_teacher_id: Option<Uuid>,
}

impl ParentRequest {
    /// Applies one teacher rejection to this request. Once the counter
    /// reaches `limit`, the request is closed as not_done and stays there
    /// until somebody re-opens it by hand.
    pub fn register_rejection(&mut self, limit: i32) {
        self.rejected_count += 1;
        if self.rejected_count >= limit {
            self.status = ParentStatus::NotDone.as_str().to_string();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentStatus {
    New,
    Pending,
    Done,
    NotDone,
}

impl ParentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentStatus::New => "new",
            ParentStatus::Pending => "pending",
            ParentStatus::Done => "done",
            ParentStatus::NotDone => "not_done",
        }
    }
}

impl std::str::FromStr for ParentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ParentStatus::New),
            "pending" => Ok(ParentStatus::Pending),
            "done" => Ok(ParentStatus::Done),
            "not_done" => Ok(ParentStatus::NotDone),
            other => Err(Error::InvalidStatus(format!(
                "unknown parent request status '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn request(status: &str, rejected_count: i32) -> ParentRequest {
        ParentRequest {
            id: Uuid::new_v4(),
            application_number: 1,
            parent_name: "A. Parent".into(),
            phone: "555-0199".into(),
            address: "7 Oak Ave".into(),
            student_name: "Sam".into(),
            grade: "8".into(),
            subjects: vec!["Physics".into()],
            preferred_time: "evening".into(),
            submission_date: None,
            status: status.into(),
            vacancy_id: None,
            rejected_count,
            vacancy_created_at: None,
            accepted_teacher_id: None,
        }
    }

    #[test]
    fn status_parses_snake_case() {
        assert_eq!(
            ParentStatus::from_str("not_done").unwrap(),
            ParentStatus::NotDone
        );
        assert!(ParentStatus::from_str("notdone").is_err());
    }

    #[test]
    fn rejection_below_limit_keeps_status() {
        let mut req = request("pending", 2);
        req.register_rejection(5);
        assert_eq!(req.rejected_count, 3);
        assert_eq!(req.status, "pending");
    }

    #[test]
    fn fifth_rejection_closes_the_request() {
        let mut req = request("pending", 4);
        req.register_rejection(5);
        assert_eq!(req.rejected_count, 5);
        assert_eq!(req.status, "not_done");
    }

    #[test]
    fn rejections_past_the_limit_stay_closed() {
        let mut req = request("not_done", 5);
        req.register_rejection(5);
        assert_eq!(req.rejected_count, 6);
        assert_eq!(req.status, "not_done");
    }
}
